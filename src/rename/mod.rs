//! Batch rename engine for media files.
//!
//! Files are narrowed with a [`FilterCriteria`], new names are computed by a [`Transform`],
//! and the [`RenameExecutor`] commits the renames concurrently.
//! Every committed batch is returned as a [`ChangeSet`] that can be pushed to an [`UndoStack`].
//! The [`PhraseIndexer`] groups files sharing repeated keyword phrases into `[indexed]` subfolders.

mod batch;
mod executor;
mod indexer;
mod lexicon;
mod matcher;
mod sanitize;
mod screenshot;
mod similarity;
mod transform;
mod types;
mod undo;

pub use batch::{plan_renames, run_batch};
pub use executor::{RenameExecutor, is_case_only_change, should_skip};
pub use indexer::{INDEXED_DIR_NAME, PhraseGroup, PhraseIndexer, cleanup_indexed_dir};
pub use lexicon::{EnglishStopwords, NameHeuristic, ProbableName, ProfanityFilter, StopwordFilter, WordListProfanity};
pub use matcher::{DEFAULT_FUZZY_THRESHOLD, FilterCriteria, filter_files};
pub use sanitize::{capitalize_word, capwords, clean_string};
pub use screenshot::{match_screenshots, pair_screenshots};
pub use similarity::{partial_ratio, ratio};
pub use transform::{CaseMode, ContainerFormat, Position, Transform};
pub use types::{ChangeEntry, ChangeSet, FileRef, IMAGE_EXTENSIONS, RenameResult, VIDEO_EXTENSIONS, collect_files};
pub use undo::UndoStack;
