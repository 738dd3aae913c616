pub mod config;
pub mod rename;

use std::env;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Command;
use clap_complete::Shell;
use colored::Colorize;
use difference::{Changeset, Difference};
use unicode_normalization::UnicodeNormalization;
use walkdir::WalkDir;

/// Append an extension to `PathBuf`, which is missing from the standard lib :(
pub fn append_extension_to_path(path: PathBuf, extension: impl AsRef<OsStr>) -> PathBuf {
    let mut os_string: OsString = path.into();
    os_string.push(".");
    os_string.push(extension);
    os_string.into()
}

/// Split a path into its file stem and extension, both in Unicode NFC.
///
/// macOS hands out decomposed names, so "é" arrives as "e\u{301}".
pub fn normalized_stem_and_extension(path: &Path) -> Result<(String, String)> {
    let stem = path.file_stem().context("Failed to get file stem")?;
    let extension = path.extension().unwrap_or_default();
    Ok((
        os_str_to_string(stem).nfc().collect(),
        os_str_to_string(extension).nfc().collect(),
    ))
}

/// True when no regular file exists anywhere below `dir`.
/// Empty subdirectories do not count.
pub fn contains_no_files(dir: &Path) -> bool {
    !WalkDir::new(dir)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .any(|entry| entry.file_type().is_file())
}

/// Resolve an optional input path to an absolute, canonical path.
///
/// A missing or blank path means the current working directory.
/// ```rust
/// use std::path::Path;
/// use media_rename::resolve_input_path;
///
/// let absolute_path = resolve_input_path(Some(Path::new("src"))).unwrap();
/// assert!(absolute_path.is_absolute());
/// ```
pub fn resolve_input_path(path: Option<&Path>) -> Result<PathBuf> {
    let trimmed = path.map(|p| p.to_string_lossy().trim().to_string()).unwrap_or_default();
    let input_path = if trimmed.is_empty() {
        env::current_dir().context("Failed to get current working directory")?
    } else {
        PathBuf::from(trimmed)
    };
    dunce::canonicalize(&input_path).with_context(|| {
        format!(
            "Input path does not exist or is not accessible: '{}'",
            input_path.display()
        )
    })
}

/// Resolve an input path that must point to an existing directory.
pub fn resolve_input_directory(path: Option<&Path>) -> Result<PathBuf> {
    let resolved = resolve_input_path(path)?;
    if !resolved.is_dir() {
        anyhow::bail!("Input path is not a directory: '{}'", resolved.display());
    }
    Ok(resolved)
}

/// Display form of `full_path` relative to `root`.
///
/// Paths outside `root`, and `root` itself, fall back to the bare file name.
///
/// ```rust
/// use std::path::Path;
/// use media_rename::get_relative_path_or_filename;
///
/// let root = Path::new("/root/dir");
/// let full_path = root.join("[indexed]/the_matrix/file.mp4");
/// assert_eq!(get_relative_path_or_filename(&full_path, root), "[indexed]/the_matrix/file.mp4");
/// assert_eq!(get_relative_path_or_filename(Path::new("/other/another.mkv"), root), "another.mkv");
/// ```
#[must_use]
pub fn get_relative_path_or_filename(full_path: &Path, root: &Path) -> String {
    match full_path.strip_prefix(root) {
        Ok(relative) if !relative.as_os_str().is_empty() => relative.display().to_string(),
        _ => full_path
            .file_name()
            .map_or_else(|| full_path.display().to_string(), |name| name.to_string_lossy().to_string()),
    }
}

/// Lossy `OsStr` conversion that drops invalid sequences instead of inserting U+FFFD.
pub fn os_str_to_string(name: &OsStr) -> String {
    name.to_str()
        .map_or_else(|| name.to_string_lossy().replace('\u{FFFD}', ""), str::to_string)
}

pub fn path_to_string(path: &Path) -> String {
    os_str_to_string(path.as_os_str())
}

#[must_use]
pub fn path_to_filename_string(path: &Path) -> String {
    os_str_to_string(path.file_name().unwrap_or_default())
}

#[inline]
pub fn print_error(message: &str) {
    eprintln!("{}", format!("Error: {message}").red());
}

#[macro_export]
macro_rules! print_error {
    ($($arg:tt)*) => {
        $crate::print_error(&format!($($arg)*))
    };
}

#[inline]
pub fn print_warning(message: &str) {
    eprintln!("{}", message.yellow());
}

#[macro_export]
macro_rules! print_warning {
    ($($arg:tt)*) => {
        $crate::print_warning(&format!($($arg)*))
    };
}

#[inline]
pub fn print_bold(message: &str) {
    println!("{}", message.bold());
}

#[macro_export]
macro_rules! print_bold {
    ($($arg:tt)*) => {
        $crate::print_bold(&format!($($arg)*))
    };
}

#[inline]
pub fn print_green(message: &str) {
    println!("{}", message.green());
}

#[macro_export]
macro_rules! print_green {
    ($($arg:tt)*) => {
        $crate::print_green(&format!($($arg)*))
    };
}

/// Leading padding for the old and new line so that the first
/// shared run of at least three non-blank characters lines up.
fn alignment_padding(old: &str, new: &str, diffs: &[Difference]) -> (usize, usize) {
    let anchor = diffs.iter().find_map(|diff| match diff {
        Difference::Same(text) if text.chars().count() >= 3 && !text.trim().is_empty() => {
            Some((old.find(text.as_str())?, new.find(text.as_str())?))
        }
        _ => None,
    });
    anchor.map_or((0, 0), |(old_index, new_index)| {
        (new_index.saturating_sub(old_index), old_index.saturating_sub(new_index))
    })
}

fn highlight(text: &str, added: bool) -> String {
    let blank = text.chars().all(char::is_whitespace);
    match (added, blank) {
        (true, true) => text.on_green().to_string(),
        (true, false) => text.green().to_string(),
        (false, true) => text.on_red().to_string(),
        (false, false) => text.red().to_string(),
    }
}

/// Colour the differences between two names, padded so the shared part lines up.
///
/// ```text
///           Dark Knight Rises (2012).mkv
/// [indexed]/dark_knight_rises/Dark Knight Rises (2012).mkv
/// ```
pub fn color_diff(old: &str, new: &str) -> (String, String) {
    let changeset = Changeset::new(old, new, "");
    let (old_padding, new_padding) = alignment_padding(old, new, &changeset.diffs);
    let mut old_diff = " ".repeat(old_padding);
    let mut new_diff = " ".repeat(new_padding);

    for diff in &changeset.diffs {
        match diff {
            Difference::Same(text) => {
                old_diff.push_str(text);
                new_diff.push_str(text);
            }
            Difference::Add(text) => new_diff.push_str(&highlight(text, true)),
            Difference::Rem(text) => old_diff.push_str(&highlight(text, false)),
        }
    }

    (old_diff, new_diff)
}

/// Print the old name above the new one, or just once if nothing changed.
pub fn show_diff(old: &str, new: &str) {
    let (old_diff, new_diff) = color_diff(old, new);
    println!("{old_diff}");
    if old != new {
        println!("{new_diff}");
    }
}

/// Write a completion script for `shell` into the user's completion directory.
pub fn generate_shell_completion(shell: Shell, mut command: Command, command_name: &str) -> Result<()> {
    let out_dir = shell_completion_dir(shell, command_name)?;
    let path = clap_complete::generate_to(shell, &mut command, command_name, out_dir)?;
    println!("Completion file generated to: {}", path.display());
    Ok(())
}

/// User completion directory for `shell`, created if missing.
/// With oh-my-zsh installed, zsh completions go into a custom plugin folder.
fn shell_completion_dir(shell: Shell, name: &str) -> Result<PathBuf> {
    let home = dirs::home_dir().context("Failed to get home directory")?;
    let omz_plugins = home.join(".oh-my-zsh/custom/plugins");

    let dir = match shell {
        Shell::Zsh if omz_plugins.is_dir() => omz_plugins.join(name),
        Shell::Zsh => home.join(".zsh/completions"),
        Shell::Bash => home.join(".bash_completion.d"),
        Shell::Fish => home.join(".config/fish/completions"),
        Shell::Elvish => home.join(".elvish"),
        Shell::PowerShell if cfg!(windows) => home.join(r"Documents\PowerShell\completions"),
        Shell::PowerShell => home.join(".config/powershell/completions"),
        _ => anyhow::bail!("Unsupported shell"),
    };

    std::fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    Ok(dir)
}
