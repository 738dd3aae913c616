//! Group files that share repeated keyword phrases into `[indexed]/<phrase>/` folders.
//!
//! Phrases are contiguous two and three word windows of the tokenized filename.
//! Each candidate is scored, and phrases shared by at least two files become folders.
//! Longer phrases claim their files first so a file only ever moves into one folder.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::rename::executor::{RenameExecutor, should_skip};
use crate::rename::lexicon::{
    EnglishStopwords, NameHeuristic, ProbableName, ProfanityFilter, StopwordFilter, WordListProfanity,
};
use crate::rename::types::{ChangeSet, FileRef};
use crate::print_error;

/// Name of the container directory created for indexed files.
pub const INDEXED_DIR_NAME: &str = "[indexed]";

/// Phrase lengths in words.
const PHRASE_LENGTHS: [usize; 2] = [2, 3];

/// Minimum score for a phrase to be kept.
const MIN_SCORE: u8 = 3;

/// Minimum number of files for a phrase folder.
const MIN_GROUP_FILES: usize = 2;

/// A phrase and the files that will be moved into its folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseGroup {
    pub phrase: String,
    pub files: Vec<FileRef>,
}

/// Discovers repeated phrases and moves matching files into phrase folders.
pub struct PhraseIndexer {
    stopwords: Box<dyn StopwordFilter>,
    profanity: Box<dyn ProfanityFilter>,
    names: Box<dyn NameHeuristic>,
}

impl PhraseGroup {
    /// Subfolder name with spaces replaced by underscores.
    #[must_use]
    pub fn folder_name(&self) -> String {
        self.phrase.replace(' ', "_")
    }
}

impl Default for PhraseIndexer {
    fn default() -> Self {
        Self::new(EnglishStopwords::default(), WordListProfanity::default(), ProbableName)
    }
}

impl fmt::Debug for PhraseIndexer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhraseIndexer").finish_non_exhaustive()
    }
}

impl PhraseIndexer {
    #[must_use]
    pub fn new(
        stopwords: impl StopwordFilter + 'static,
        profanity: impl ProfanityFilter + 'static,
        names: impl NameHeuristic + 'static,
    ) -> Self {
        Self {
            stopwords: Box::new(stopwords),
            profanity: Box::new(profanity),
            names: Box::new(names),
        }
    }

    /// Lowercase alphanumeric tokens of a stem joined with single spaces.
    #[must_use]
    pub fn normalize_name(stem: &str) -> String {
        tokenize(stem)
            .iter()
            .map(|token| token.to_lowercase())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Score a candidate phrase given in its original casing.
    ///
    /// Returns `None` if the phrase is discarded:
    /// it contains a purely numeric word, does not look like a name, or scores below the minimum.
    #[must_use]
    pub fn score_phrase(&self, words: &[&str]) -> Option<u8> {
        if words.iter().any(|word| word.chars().all(|c| c.is_ascii_digit())) {
            return None;
        }
        let phrase = words.iter().map(|word| word.to_lowercase()).collect::<Vec<_>>().join(" ");
        if !self.names.looks_like_name(&phrase) {
            return None;
        }

        let mut score = 0;
        if words.len() >= 2 {
            score += 1;
        }
        if words.iter().all(|word| is_title_word(word)) {
            score += 1;
        }
        if !words.iter().any(|word| self.stopwords.is_stopword(word)) {
            score += 1;
        }
        if !self.profanity.is_profane(&phrase) {
            score += 1;
        }

        (score >= MIN_SCORE).then_some(score)
    }

    /// Map every accepted phrase to the files containing it.
    /// Two-word phrases that are reversals of each other are merged under one key.
    #[must_use]
    pub fn build_phrase_groups(&self, files: &[FileRef]) -> BTreeMap<String, BTreeSet<FileRef>> {
        let mut phrase_map: BTreeMap<String, BTreeSet<FileRef>> = BTreeMap::new();

        for file in files {
            let tokens = tokenize(file.stem());
            for length in PHRASE_LENGTHS {
                for window in tokens.windows(length) {
                    if self.score_phrase(window).is_some() {
                        let phrase = window.iter().map(|word| word.to_lowercase()).collect::<Vec<_>>().join(" ");
                        phrase_map.entry(phrase).or_default().insert(file.clone());
                    }
                }
            }
        }

        merge_reversed_phrases(&mut phrase_map);
        phrase_map
    }

    /// Keep phrases shared by at least two distinct filenames
    /// and assign files greedily, longest phrase first.
    /// A phrase left with fewer than two unclaimed files is dropped.
    #[must_use]
    pub fn select_groups(phrase_map: BTreeMap<String, BTreeSet<FileRef>>) -> Vec<PhraseGroup> {
        let mut candidates: Vec<(String, BTreeSet<FileRef>)> = phrase_map
            .into_iter()
            .filter(|(_, files)| {
                files.len() >= MIN_GROUP_FILES
                    && files.iter().map(FileRef::file_name).collect::<HashSet<_>>().len() >= MIN_GROUP_FILES
            })
            .collect();

        candidates.sort_by(|(a, _), (b, _)| {
            Reverse(a.split_whitespace().count())
                .cmp(&Reverse(b.split_whitespace().count()))
                .then_with(|| a.cmp(b))
        });

        let mut claimed: HashSet<PathBuf> = HashSet::new();
        let mut groups = Vec::new();
        for (phrase, files) in candidates {
            let unclaimed: Vec<FileRef> = files
                .into_iter()
                .filter(|file| !claimed.contains(file.path()))
                .collect();
            if unclaimed.len() < MIN_GROUP_FILES {
                continue;
            }
            claimed.extend(unclaimed.iter().map(|file| file.path().to_path_buf()));
            groups.push(PhraseGroup {
                phrase,
                files: unclaimed,
            });
        }
        groups
    }

    /// Compute the phrase groups for the given files without touching the filesystem.
    #[must_use]
    pub fn plan(&self, files: &[FileRef]) -> Vec<PhraseGroup> {
        Self::select_groups(self.build_phrase_groups(files))
    }

    /// Move grouped files into `directory/[indexed]/<phrase>/`.
    ///
    /// Moves for one phrase run concurrently; phrases are processed one after another.
    /// The returned change set ends with an entry for the `[indexed]` directory
    /// if at least one file was moved.
    ///
    /// # Errors
    /// Returns an error if the `[indexed]` directory cannot be created.
    pub async fn index(&self, directory: &Path, files: &[FileRef], executor: &RenameExecutor) -> Result<ChangeSet> {
        let groups = self.plan(files);
        if groups.is_empty() {
            return Ok(ChangeSet::default());
        }

        let indexed_dir = directory.join(INDEXED_DIR_NAME);
        fs::create_dir_all(&indexed_dir)
            .with_context(|| format!("Failed to create directory {}", indexed_dir.display()))?;

        let mut moved = Vec::new();
        for group in groups {
            let subfolder = indexed_dir.join(group.folder_name());
            if let Err(error) = fs::create_dir_all(&subfolder) {
                print_error!("Failed to create directory {}: {error}", subfolder.display());
                continue;
            }
            let pairs: Vec<(PathBuf, PathBuf)> = group
                .files
                .iter()
                .map(|file| (file.path().to_path_buf(), subfolder.join(file.file_name())))
                .filter(|(source, target)| !should_skip(source, target))
                .collect();
            moved.extend(executor.commit(pairs).await);
        }

        if moved.is_empty() {
            cleanup_indexed_dir(&indexed_dir)?;
        }
        Ok(ChangeSet::with_container(moved, indexed_dir))
    }
}

/// Remove the indexed directory and its subdirectories if no file remains anywhere below it.
/// Returns true if the directory was removed.
///
/// # Errors
/// Returns an error if an empty directory cannot be removed.
pub fn cleanup_indexed_dir(indexed_dir: &Path) -> Result<bool> {
    if !indexed_dir.is_dir() || !crate::contains_no_files(indexed_dir) {
        return Ok(false);
    }
    // Process from deepest to shallowest
    for entry in WalkDir::new(indexed_dir)
        .contents_first(true)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_dir())
    {
        fs::remove_dir(entry.path())
            .with_context(|| format!("Failed to remove directory {}", entry.path().display()))?;
    }
    Ok(true)
}

/// Split a stem into ASCII alphanumeric tokens, keeping the original casing.
fn tokenize(stem: &str) -> Vec<&str> {
    stem.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|token| !token.is_empty())
        .collect()
}

/// Uppercase first character followed by no uppercase characters.
fn is_title_word(word: &str) -> bool {
    let mut chars = word.chars();
    chars.next().is_some_and(char::is_uppercase) && !chars.any(char::is_uppercase)
}

fn merge_reversed_phrases(phrase_map: &mut BTreeMap<String, BTreeSet<FileRef>>) {
    let phrases: Vec<String> = phrase_map.keys().cloned().collect();
    for phrase in phrases {
        let words: Vec<&str> = phrase.split(' ').collect();
        if words.len() != 2 || !phrase_map.contains_key(&phrase) {
            continue;
        }
        let reversed = format!("{} {}", words[1], words[0]);
        if reversed == phrase {
            continue;
        }
        if let Some(files) = phrase_map.remove(&reversed) {
            phrase_map.entry(phrase).or_default().extend(files);
        }
    }
}

#[cfg(test)]
mod indexer_tests {
    use super::*;

    use std::fs::File;

    use tempfile::tempdir;

    use crate::rename::undo::UndoStack;

    fn file(name: &str) -> FileRef {
        FileRef::new(PathBuf::from(format!("/videos/{name}"))).unwrap()
    }

    struct NoStopwords;

    impl StopwordFilter for NoStopwords {
        fn is_stopword(&self, _word: &str) -> bool {
            false
        }
    }

    struct EverythingProfane;

    impl ProfanityFilter for EverythingProfane {
        fn is_profane(&self, _phrase: &str) -> bool {
            true
        }
    }

    #[test]
    fn normalize_name_strips_punctuation() {
        assert_eq!(PhraseIndexer::normalize_name("The.Matrix_(1999)  [1080p]"), "the matrix 1999 1080p");
    }

    #[test]
    fn title_cased_phrase_with_stopword_is_kept() {
        let indexer = PhraseIndexer::default();
        assert_eq!(indexer.score_phrase(&["The", "Matrix"]), Some(3));
        assert_eq!(indexer.score_phrase(&["Matrix", "Reloaded"]), Some(4));
        assert_eq!(indexer.score_phrase(&["matrix", "reloaded"]), Some(3));
    }

    #[test]
    fn numeric_phrase_is_discarded() {
        let indexer = PhraseIndexer::default();
        assert_eq!(indexer.score_phrase(&["2024", "1080"]), None);
        assert_eq!(indexer.score_phrase(&["Matrix", "1999"]), None);
    }

    #[test]
    fn low_score_phrase_is_discarded() {
        let indexer = PhraseIndexer::default();
        // Lowercase and containing a stopword: 1 + 0 + 0 + 1
        assert_eq!(indexer.score_phrase(&["the", "matrix"]), None);
    }

    #[test]
    fn injected_filters_change_scoring() {
        let lenient = PhraseIndexer::new(NoStopwords, WordListProfanity::default(), ProbableName);
        assert_eq!(lenient.score_phrase(&["the", "matrix"]), Some(3));

        let strict = PhraseIndexer::new(EnglishStopwords::default(), EverythingProfane, ProbableName);
        assert_eq!(strict.score_phrase(&["matrix", "reloaded"]), None);
        assert_eq!(strict.score_phrase(&["Matrix", "Reloaded"]), Some(3));
    }

    #[test]
    fn shared_phrase_forms_group() {
        let files = vec![file("The Matrix 1999.mp4"), file("The Matrix Reloaded 2003.mkv")];
        let groups = PhraseIndexer::default().plan(&files);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].phrase, "the matrix");
        assert_eq!(groups[0].folder_name(), "the_matrix");
        assert_eq!(groups[0].files.len(), 2);
    }

    #[test]
    fn reversed_two_word_phrases_are_merged() {
        let files = vec![file("Matrix Reloaded.mp4"), file("Reloaded Matrix.mkv")];
        let phrase_map = PhraseIndexer::default().build_phrase_groups(&files);
        assert!(phrase_map.contains_key("matrix reloaded"));
        assert!(!phrase_map.contains_key("reloaded matrix"));
        assert_eq!(phrase_map["matrix reloaded"].len(), 2);

        let groups = PhraseIndexer::select_groups(phrase_map);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].files.len(), 2);
    }

    #[test]
    fn single_file_phrase_is_dropped() {
        let files = vec![file("Blade Runner.mp4"), file("The Matrix.mkv")];
        assert!(PhraseIndexer::default().plan(&files).is_empty());
    }

    #[test]
    fn longer_phrase_claims_files_first() {
        let a = file("A.mp4");
        let b = file("B.mp4");
        let c = file("C.mp4");
        let mut phrase_map = BTreeMap::new();
        phrase_map.insert(
            "dark knight".to_string(),
            BTreeSet::from([a.clone(), b.clone(), c.clone()]),
        );
        phrase_map.insert("dark knight rises".to_string(), BTreeSet::from([a.clone(), b.clone()]));

        let groups = PhraseIndexer::select_groups(phrase_map);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].phrase, "dark knight rises");
        assert_eq!(groups[0].files, vec![a, b]);
    }

    #[test]
    fn shorter_phrase_keeps_enough_unclaimed_files() {
        let mut phrase_map = BTreeMap::new();
        phrase_map.insert(
            "dark knight".to_string(),
            BTreeSet::from([file("A.mp4"), file("B.mp4"), file("C.mp4"), file("D.mp4")]),
        );
        phrase_map.insert(
            "dark knight rises".to_string(),
            BTreeSet::from([file("A.mp4"), file("B.mp4")]),
        );

        let groups = PhraseIndexer::select_groups(phrase_map);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[1].phrase, "dark knight");
        assert_eq!(groups[1].files, vec![file("C.mp4"), file("D.mp4")]);
    }

    #[tokio::test]
    async fn index_moves_files_and_undo_restores() {
        let dir = tempdir().unwrap();
        let names = ["The Matrix 1999.mp4", "The Matrix Reloaded 2003.mkv", "Inception.mp4"];
        for name in names {
            File::create(dir.path().join(name)).unwrap();
        }
        let files = crate::rename::types::collect_files(dir.path(), &crate::rename::types::VIDEO_EXTENSIONS).unwrap();
        let executor = RenameExecutor::new();

        let change_set = PhraseIndexer::default().index(dir.path(), &files, &executor).await.unwrap();
        assert_eq!(change_set.len(), 2);

        let indexed_dir = dir.path().join(INDEXED_DIR_NAME);
        assert_eq!(change_set.containers().collect::<Vec<_>>(), vec![indexed_dir.as_path()]);
        assert!(indexed_dir.join("the_matrix").join("The Matrix 1999.mp4").is_file());
        assert!(indexed_dir.join("the_matrix").join("The Matrix Reloaded 2003.mkv").is_file());
        assert!(dir.path().join("Inception.mp4").is_file());

        let mut undo = UndoStack::new();
        undo.push(change_set);
        let reverted = undo.undo_last(&executor).await;
        assert_eq!(reverted.len(), 2);
        for name in names {
            assert!(dir.path().join(name).is_file());
        }
        assert!(!indexed_dir.exists());
    }

    #[tokio::test]
    async fn index_without_groups_creates_nothing() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("Inception.mp4")).unwrap();
        let files = crate::rename::types::collect_files(dir.path(), &crate::rename::types::VIDEO_EXTENSIONS).unwrap();

        let change_set = PhraseIndexer::default()
            .index(dir.path(), &files, &RenameExecutor::new())
            .await
            .unwrap();
        assert!(change_set.is_empty());
        assert!(!dir.path().join(INDEXED_DIR_NAME).exists());
    }

    #[test]
    fn cleanup_keeps_directory_with_files() {
        let dir = tempdir().unwrap();
        let indexed_dir = dir.path().join(INDEXED_DIR_NAME);
        fs::create_dir_all(indexed_dir.join("the_matrix")).unwrap();
        fs::create_dir_all(indexed_dir.join("dark_knight")).unwrap();
        File::create(indexed_dir.join("the_matrix").join("movie.mp4")).unwrap();

        assert!(!cleanup_indexed_dir(&indexed_dir).unwrap());
        assert!(indexed_dir.join("dark_knight").exists());

        fs::remove_file(indexed_dir.join("the_matrix").join("movie.mp4")).unwrap();
        assert!(cleanup_indexed_dir(&indexed_dir).unwrap());
        assert!(!indexed_dir.exists());
        assert!(!cleanup_indexed_dir(&indexed_dir).unwrap());
    }
}
