//! Concurrent rename execution.
//!
//! This is the only place where files are renamed or moved.
//! Each rename runs on the blocking thread pool, limited by a semaphore.
//! Existence is checked before the batch is submitted, not atomically with the rename:
//! two sources planned to the same target can both pass the check,
//! and the later rename then fails or replaces the earlier one depending on the platform.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use indicatif::ProgressBar;
#[cfg(not(test))]
use indicatif::ProgressStyle;
use tokio::sync::Semaphore;
use unicode_normalization::UnicodeNormalization;

use crate::print_error;
use crate::rename::types::RenameResult;

#[cfg(not(test))]
const PROGRESS_BAR_CHARS: &str = "=> ";
#[cfg(not(test))]
const PROGRESS_BAR_TEMPLATE: &str = "[{elapsed_precise}] {bar:80.cyan/blue} {pos}/{len} {percent}%";

/// Runs renames concurrently on a bounded worker pool.
#[derive(Debug, Clone)]
pub struct RenameExecutor {
    semaphore: Arc<Semaphore>,
    show_progress: bool,
}

impl Default for RenameExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl RenameExecutor {
    /// Create an executor sized for I/O-bound work.
    #[must_use]
    pub fn new() -> Self {
        Self::with_workers(num_cpus::get_physical() * 2)
    }

    /// Create an executor with a fixed number of concurrent renames.
    #[must_use]
    pub fn with_workers(workers: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(workers.max(1))),
            show_progress: false,
        }
    }

    /// Show a progress bar while committing.
    #[must_use]
    pub const fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Rename every `(source, target)` pair and return the renames that succeeded.
    ///
    /// Failures are printed and left out of the result; they never stop the other renames.
    /// The result is in completion order.
    pub async fn commit(&self, pairs: Vec<(PathBuf, PathBuf)>) -> Vec<RenameResult> {
        if pairs.is_empty() {
            return Vec::new();
        }

        let progress_bar = self.create_progress_bar(pairs.len() as u64);

        let mut tasks: FuturesUnordered<_> = pairs
            .into_iter()
            .map(|(source, target)| rename_task(Arc::clone(&self.semaphore), source, target))
            .collect();

        let mut results = Vec::new();
        while let Some(result) = tasks.next().await {
            match result {
                Ok(rename) => results.push(rename),
                Err(error) => print_error!("{error:#}"),
            }
            progress_bar.inc(1);
        }

        progress_bar.finish_and_clear();
        results
    }

    /// Create a progress bar that is hidden during tests or when disabled.
    fn create_progress_bar(&self, len: u64) -> ProgressBar {
        #[cfg(test)]
        {
            let _ = (len, self.show_progress);
            ProgressBar::hidden()
        }
        #[cfg(not(test))]
        {
            if !self.show_progress {
                return ProgressBar::hidden();
            }
            let progress_bar = ProgressBar::new(len);
            if let Ok(style) = ProgressStyle::default_bar().template(PROGRESS_BAR_TEMPLATE) {
                progress_bar.set_style(style.progress_chars(PROGRESS_BAR_CHARS));
            }
            progress_bar
        }
    }
}

/// Check if a planned rename should be skipped.
///
/// A rename is skipped if the target is the source itself,
/// if the names only differ in Unicode normalization form,
/// or if something already exists at the target path.
/// For case-only changes the target only counts as existing
/// if the directory has an entry with exactly that name,
/// so case-insensitive filesystems do not report the source file itself as a collision.
#[must_use]
pub fn should_skip(source: &Path, target: &Path) -> bool {
    if source == target || is_normalization_only_change(source, target) {
        return true;
    }
    if is_case_only_change(source, target) {
        return exact_entry_exists(target);
    }
    fs::symlink_metadata(target).is_ok()
}

/// Check if the paths differ only by letter case.
#[must_use]
pub fn is_case_only_change(source: &Path, target: &Path) -> bool {
    source != target && folded_path(source) == folded_path(target)
}

/// Same directory and the same file name after NFC normalization.
fn is_normalization_only_change(source: &Path, target: &Path) -> bool {
    source.parent() == target.parent() && nfc_file_name(source) == nfc_file_name(target)
}

fn folded_path(path: &Path) -> String {
    crate::path_to_string(path).nfc().collect::<String>().to_lowercase()
}

fn nfc_file_name(path: &Path) -> String {
    crate::path_to_filename_string(path).nfc().collect()
}

fn exact_entry_exists(path: &Path) -> bool {
    let Some(name) = path.file_name() else {
        return false;
    };
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    fs::read_dir(parent).is_ok_and(|entries| entries.filter_map(std::result::Result::ok).any(|entry| entry.file_name() == name))
}

/// Wait for a worker slot and perform one rename on the blocking pool.
async fn rename_task(semaphore: Arc<Semaphore>, source: PathBuf, target: PathBuf) -> Result<RenameResult> {
    let _permit = semaphore
        .acquire_owned()
        .await
        .map_err(|error| anyhow!("Rename pool closed: {error}"))?;
    tokio::task::spawn_blocking(move || -> Result<RenameResult> {
        rename_file(&source, &target)
            .with_context(|| format!("Failed to rename {} -> {}", source.display(), target.display()))?;
        Ok(RenameResult::new(source, target))
    })
    .await
    .map_err(|error| anyhow!("Rename task failed: {error}"))?
}

fn rename_file(source: &Path, target: &Path) -> io::Result<()> {
    if is_case_only_change(source, target) {
        rename_with_temp_file(source, target)
    } else {
        fs::rename(source, target)
    }
}

/// Rename a file with an intermediate temp file to work around case-insensitive file systems.
fn rename_with_temp_file(source: &Path, target: &Path) -> io::Result<()> {
    let temp_file = unused_temp_path(target);
    fs::rename(source, &temp_file)?;
    fs::rename(&temp_file, target)
}

/// First of `<target>.tmp`, `<target>.1.tmp`, `<target>.2.tmp`... that does not exist.
fn unused_temp_path(target: &Path) -> PathBuf {
    let mut temp_file = crate::append_extension_to_path(target.to_path_buf(), "tmp");
    let mut index = 1;
    while fs::symlink_metadata(&temp_file).is_ok() {
        temp_file = crate::append_extension_to_path(target.to_path_buf(), format!("{index}.tmp"));
        index += 1;
    }
    temp_file
}
