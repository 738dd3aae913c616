use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Video containers handled by the text operations.
pub const VIDEO_EXTENSIONS: [&str; 4] = ["mp4", "mkv", "avi", "mov"];

/// Screenshot formats handled by the screenshot matcher.
pub const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// An existing file that is a candidate for renaming.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileRef {
    /// Absolute path to the file.
    path: PathBuf,
    /// Filename without extension, NFC normalized.
    stem: String,
    /// Lowercase extension without the leading dot.
    extension: String,
}

/// A committed rename from `original` to `new`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenameResult {
    pub original: PathBuf,
    pub new: PathBuf,
}

/// One entry of a [`ChangeSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEntry {
    Renamed(RenameResult),
    /// Directory created by the batch that should be removed if it is empty after an undo.
    RemoveDirIfEmpty(PathBuf),
}

/// One reversible batch of committed renames.
///
/// Immutable once built: entries can only be read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    entries: Vec<ChangeEntry>,
}

impl FileRef {
    /// Create a file reference from a path.
    /// Does not touch the filesystem.
    ///
    /// # Errors
    /// Returns an error if the path has no file name.
    pub fn new(path: PathBuf) -> Result<Self> {
        let (stem, extension) = crate::normalized_stem_and_extension(&path)
            .with_context(|| format!("Invalid file path: {}", path.display()))?;
        Ok(Self {
            path,
            stem,
            extension: extension.to_lowercase(),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn stem(&self) -> &str {
        &self.stem
    }

    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    #[must_use]
    pub fn file_name(&self) -> String {
        crate::path_to_filename_string(&self.path)
    }

    /// Check if the extension is one of the given lowercase extensions.
    #[must_use]
    pub fn has_extension(&self, extensions: &[impl AsRef<str>]) -> bool {
        extensions.iter().any(|ext| ext.as_ref() == self.extension)
    }

    /// Path in the same directory with the given stem and the original extension casing.
    #[must_use]
    pub fn with_stem(&self, stem: &str) -> PathBuf {
        let original_extension = self.path.extension().map(crate::os_str_to_string).unwrap_or_default();
        if original_extension.is_empty() {
            self.path.with_file_name(stem)
        } else {
            self.path.with_file_name(format!("{stem}.{original_extension}"))
        }
    }
}

impl fmt::Display for FileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

impl RenameResult {
    #[must_use]
    pub const fn new(original: PathBuf, new: PathBuf) -> Self {
        Self { original, new }
    }
}

impl ChangeSet {
    #[must_use]
    pub const fn new(entries: Vec<ChangeEntry>) -> Self {
        Self { entries }
    }

    /// Build a change set from committed renames with a trailing container directory entry.
    /// The directory entry is only added if there is at least one rename.
    #[must_use]
    pub fn with_container(renames: Vec<RenameResult>, container: PathBuf) -> Self {
        if renames.is_empty() {
            return Self::default();
        }
        let mut entries: Vec<ChangeEntry> = renames.into_iter().map(ChangeEntry::Renamed).collect();
        entries.push(ChangeEntry::RemoveDirIfEmpty(container));
        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[ChangeEntry] {
        &self.entries
    }

    /// Iterate over committed renames, skipping directory entries.
    pub fn renames(&self) -> impl Iterator<Item = &RenameResult> {
        self.entries.iter().filter_map(|entry| match entry {
            ChangeEntry::Renamed(result) => Some(result),
            ChangeEntry::RemoveDirIfEmpty(_) => None,
        })
    }

    /// Iterate over directories marked for removal on undo.
    pub fn containers(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().filter_map(|entry| match entry {
            ChangeEntry::RemoveDirIfEmpty(path) => Some(path.as_path()),
            ChangeEntry::Renamed(_) => None,
        })
    }

    /// Number of committed renames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.renames().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<RenameResult>> for ChangeSet {
    fn from(renames: Vec<RenameResult>) -> Self {
        Self::new(renames.into_iter().map(ChangeEntry::Renamed).collect())
    }
}

/// Collect files directly inside `directory` with one of the given extensions.
/// Hidden files are skipped. Result is sorted by lowercase filename.
///
/// # Errors
/// Returns an error if the directory cannot be read.
pub fn collect_files(directory: &Path, extensions: &[impl AsRef<str>]) -> Result<Vec<FileRef>> {
    let mut files = Vec::new();
    let entries =
        std::fs::read_dir(directory).with_context(|| format!("Failed to read directory {}", directory.display()))?;
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        if name.as_encoded_bytes().first() == Some(&b'.') {
            continue;
        }
        let file = FileRef::new(entry.path())?;
        if file.has_extension(extensions) {
            files.push(file);
        }
    }
    files.sort_by_key(|file| file.file_name().to_lowercase());
    Ok(files)
}
