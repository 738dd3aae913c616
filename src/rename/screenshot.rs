//! Rename screenshots to match the videos they were taken from.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::rename::executor::{RenameExecutor, should_skip};
use crate::rename::types::{ChangeSet, FileRef, collect_files};

/// Pair videos and screenshots by position and compute the screenshot targets.
///
/// Both lists are sorted by lowercase filename and zipped up to the shorter one.
/// Each screenshot keeps its directory and gets the video stem with its own lowercase extension.
/// Pairs whose target already exists are left out.
#[must_use]
pub fn pair_screenshots(videos: &[FileRef], screenshots: &[FileRef]) -> Vec<(PathBuf, PathBuf)> {
    let mut videos = videos.to_vec();
    let mut screenshots = screenshots.to_vec();
    videos.sort_by_key(|file| file.file_name().to_lowercase());
    screenshots.sort_by_key(|file| file.file_name().to_lowercase());

    videos
        .iter()
        .zip(&screenshots)
        .map(|(video, screenshot)| {
            let target = screenshot
                .path()
                .with_file_name(format!("{}.{}", video.stem(), screenshot.extension()));
            (screenshot.path().to_path_buf(), target)
        })
        .filter(|(source, target)| !should_skip(source, target))
        .collect()
}

/// Rename the screenshots in `screenshot_dir` after the videos in `video_dir`.
///
/// # Errors
/// Returns an error if either directory cannot be read.
pub async fn match_screenshots(
    video_dir: &Path,
    screenshot_dir: &Path,
    video_extensions: &[impl AsRef<str>],
    image_extensions: &[impl AsRef<str>],
    executor: &RenameExecutor,
) -> Result<ChangeSet> {
    let videos = collect_files(video_dir, video_extensions)?;
    let screenshots = collect_files(screenshot_dir, image_extensions)?;
    let pairs = pair_screenshots(&videos, &screenshots);
    Ok(ChangeSet::from(executor.commit(pairs).await))
}
