//! Narrow a list of files by a search term.

use rayon::prelude::*;
use unicode_segmentation::UnicodeSegmentation;

use crate::rename::similarity::partial_ratio;
use crate::rename::types::FileRef;

/// Minimum partial similarity score for a fuzzy match.
pub const DEFAULT_FUZZY_THRESHOLD: u8 = 70;

/// Search term with matching options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    pub term: String,
    /// Match by partial similarity instead of exact containment.
    pub fuzzy: bool,
    /// Match against the character-reversed stem.
    pub reversed: bool,
    pub threshold: u8,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            term: String::new(),
            fuzzy: false,
            reversed: false,
            threshold: DEFAULT_FUZZY_THRESHOLD,
        }
    }
}

impl FilterCriteria {
    #[must_use]
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            ..Default::default()
        }
    }

    /// Criteria that keeps every file.
    #[must_use]
    pub fn identity() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn fuzzy(mut self, fuzzy: bool) -> Self {
        self.fuzzy = fuzzy;
        self
    }

    #[must_use]
    pub const fn reversed(mut self, reversed: bool) -> Self {
        self.reversed = reversed;
        self
    }

    #[must_use]
    pub const fn threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.term.is_empty()
    }

    /// Check a single file stem against the criteria.
    #[must_use]
    pub fn matches(&self, stem: &str) -> bool {
        if self.is_identity() {
            return true;
        }
        let term = self.term.to_lowercase();
        let name = stem.to_lowercase();
        let name = if self.reversed {
            name.graphemes(true).rev().collect()
        } else {
            name
        };

        if self.fuzzy {
            partial_ratio(&term, &name) >= f64::from(self.threshold)
        } else {
            name.contains(&term)
        }
    }
}

/// Return the files whose stem matches the criteria, in input order.
#[must_use]
pub fn filter_files(files: &[FileRef], criteria: &FilterCriteria) -> Vec<FileRef> {
    if criteria.is_identity() {
        return files.to_vec();
    }
    files
        .par_iter()
        .filter(|file| criteria.matches(file.stem()))
        .cloned()
        .collect()
}
