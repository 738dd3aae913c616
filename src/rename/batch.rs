//! Plan and commit one transformation over a list of files.

use std::path::PathBuf;

use anyhow::Result;

use crate::rename::executor::{RenameExecutor, should_skip};
use crate::rename::matcher::{FilterCriteria, filter_files};
use crate::rename::transform::Transform;
use crate::rename::types::{ChangeSet, FileRef};

/// Compute the `(source, target)` pairs for a transformation.
///
/// Files that are not eligible, do not match the filter, would get an empty name,
/// would not change, or would collide with an existing path are left out.
///
/// # Errors
/// Returns an error if the transformation parameters are invalid.
pub fn plan_renames(
    files: &[FileRef],
    transform: &Transform,
    criteria: &FilterCriteria,
) -> Result<Vec<(PathBuf, PathBuf)>> {
    transform.validate()?;

    let eligible: Vec<FileRef> = files
        .iter()
        .filter(|file| transform.is_eligible(file))
        .cloned()
        .collect();

    Ok(filter_files(&eligible, criteria)
        .into_iter()
        .filter_map(|file| {
            let target = transform.target_path(&file)?;
            Some((file.path().to_path_buf(), target))
        })
        .filter(|(source, target)| !should_skip(source, target))
        .collect())
}

/// Apply a transformation and commit the resulting renames.
///
/// # Errors
/// Returns an error if the transformation parameters are invalid.
/// Individual rename failures are printed and left out of the change set.
pub async fn run_batch(
    files: &[FileRef],
    transform: &Transform,
    criteria: &FilterCriteria,
    executor: &RenameExecutor,
) -> Result<ChangeSet> {
    let pairs = plan_renames(files, transform, criteria)?;
    let renames = executor.commit(pairs).await;
    Ok(ChangeSet::from(renames))
}
