use std::io::{self, Write};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use colored::Colorize;

use media_rename::rename::{
    ChangeSet, EnglishStopwords, FileRef, FilterCriteria, INDEXED_DIR_NAME, PhraseIndexer, ProbableName,
    RenameExecutor, Transform, UndoStack, WordListProfanity, cleanup_indexed_dir, collect_files, match_screenshots,
    pair_screenshots, plan_renames, run_batch,
};
use media_rename::{get_relative_path_or_filename, print_bold, print_green, print_warning, show_diff};

use crate::Command;
use crate::config::Config;

/// Runs one command against the input directory and offers to undo it.
#[derive(Debug)]
pub struct MediaRename {
    config: Config,
    executor: RenameExecutor,
    history: UndoStack,
}

impl MediaRename {
    pub fn new(config: Config) -> Self {
        let executor = RenameExecutor::new().with_progress(!config.verbose);
        Self {
            config,
            executor,
            history: UndoStack::new(),
        }
    }

    pub async fn run(mut self, command: Command) -> Result<()> {
        if self.config.debug {
            println!("{:#?}", self.config);
        }

        let start = Instant::now();
        let change_set = match &command {
            Command::Index => self.index().await?,
            Command::Cleanup => {
                self.cleanup()?;
                return Ok(());
            }
            Command::Screenshots { screenshots } => {
                let screenshot_dir = media_rename::resolve_input_directory(Some(screenshots.as_path()))?;
                self.screenshots(&screenshot_dir).await?
            }
            _ => {
                let Some(transform) = command.transform()? else {
                    return Ok(());
                };
                let criteria = if command.uses_filter() {
                    self.config.filter_criteria()
                } else {
                    FilterCriteria::identity()
                };
                self.transform(&transform, &criteria).await?
            }
        };

        if self.config.dryrun {
            return Ok(());
        }

        self.print_changes(&change_set);
        if self.config.verbose {
            println!("Finished in {:.2}s", start.elapsed().as_secs_f64());
        }

        if self.history.push(change_set) && !self.config.auto && ask_undo()? {
            let reverted = self.history.undo_last(&self.executor).await;
            print_green!("Reverted {} file(s)", reverted.len());
        }
        Ok(())
    }

    fn video_files(&self) -> Result<Vec<FileRef>> {
        collect_files(&self.config.path, self.config.video_extensions.as_slice())
    }

    async fn transform(&self, transform: &Transform, criteria: &FilterCriteria) -> Result<ChangeSet> {
        let files = self.video_files()?;
        if self.config.verbose {
            print_bold!("{}: {} file(s)", transform.description(), files.len());
        }

        if self.config.dryrun {
            let pairs = plan_renames(&files, transform, criteria)?;
            for (source, target) in &pairs {
                show_diff(&self.relative(source), &self.relative(target));
            }
            println!("Dry run: {} file(s) would be renamed", pairs.len());
            return Ok(ChangeSet::default());
        }

        run_batch(&files, transform, criteria, &self.executor).await
    }

    async fn index(&self) -> Result<ChangeSet> {
        let files = self.video_files()?;
        let indexer = PhraseIndexer::new(
            EnglishStopwords::with_extra(&self.config.extra_stopwords),
            WordListProfanity::with_extra(&self.config.extra_profanity),
            ProbableName,
        );

        if self.config.dryrun {
            let groups = indexer.plan(&files);
            for group in &groups {
                println!("{}: {} file(s)", group.folder_name().cyan().bold(), group.files.len());
                for file in &group.files {
                    println!("  {}", file.file_name());
                }
            }
            println!("Dry run: {} phrase folder(s) would be created", groups.len());
            return Ok(ChangeSet::default());
        }

        indexer.index(&self.config.path, &files, &self.executor).await
    }

    fn cleanup(&self) -> Result<()> {
        let indexed_dir = self.config.path.join(INDEXED_DIR_NAME);
        if self.config.dryrun {
            println!("{INDEXED_DIR_NAME} {}", cleanup_preview(&indexed_dir));
            return Ok(());
        }
        if cleanup_indexed_dir(&indexed_dir)? {
            print_green!("Removed {}", indexed_dir.display());
        } else if self.config.verbose {
            print_warning!("Nothing to clean up in {}", indexed_dir.display());
        }
        Ok(())
    }

    async fn screenshots(&self, screenshot_dir: &Path) -> Result<ChangeSet> {
        if self.config.dryrun {
            let videos = self.video_files()?;
            let screenshots = collect_files(screenshot_dir, self.config.image_extensions.as_slice())?;
            let pairs = pair_screenshots(&videos, &screenshots);
            for (source, target) in &pairs {
                show_diff(
                    &media_rename::path_to_filename_string(source),
                    &media_rename::path_to_filename_string(target),
                );
            }
            println!("Dry run: {} screenshot(s) would be renamed", pairs.len());
            return Ok(ChangeSet::default());
        }

        match_screenshots(
            &self.config.path,
            screenshot_dir,
            self.config.video_extensions.as_slice(),
            self.config.image_extensions.as_slice(),
            &self.executor,
        )
        .await
    }

    fn print_changes(&self, change_set: &ChangeSet) {
        if change_set.is_empty() {
            println!("No files renamed");
            return;
        }
        let mut renames: Vec<_> = change_set.renames().collect();
        renames.sort_by(|a, b| a.original.cmp(&b.original));
        for rename in renames {
            show_diff(&self.relative(&rename.original), &self.relative(&rename.new));
        }
        print_green!("Renamed {} file(s)", change_set.len());
    }

    fn relative(&self, path: &Path) -> String {
        get_relative_path_or_filename(path, &self.config.path)
    }
}

/// What cleanup would do to the indexed directory.
fn cleanup_preview(indexed_dir: &Path) -> &'static str {
    if !indexed_dir.is_dir() {
        "does not exist"
    } else if media_rename::contains_no_files(indexed_dir) {
        "would be removed"
    } else {
        "contains files"
    }
}

/// Ask the user whether the last batch should be reverted.
fn ask_undo() -> Result<bool> {
    print!("{}", "Undo changes? (y/n): ".magenta());
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut input = String::new();
    io::stdin().read_line(&mut input).context("Failed to read input")?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}
