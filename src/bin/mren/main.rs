mod cli;
mod config;

use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use media_rename::rename::{CaseMode, ContainerFormat, Position, Transform};

use crate::cli::MediaRename;
use crate::config::{Config, MrenConfig};

#[derive(Parser, Debug)]
#[command(author, version, name = env!("CARGO_BIN_NAME"), about = "Batch rename and organize media files")]
pub struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Input directory
    #[arg(short = 'd', long = "dir", global = true, value_hint = clap::ValueHint::DirPath)]
    path: Option<PathBuf>,

    /// Only rename files whose name contains TERM
    #[arg(short = 'F', long, global = true, name = "TERM")]
    filter: Option<String>,

    /// Use fuzzy matching for the filter term
    #[arg(short, long, global = true)]
    fuzzy: bool,

    /// Match the filter term against the reversed name
    #[arg(short, long, global = true)]
    reversed: bool,

    /// Minimum fuzzy match score
    #[arg(short, long, global = true, name = "SCORE", value_parser = clap::value_parser!(u8).range(0..=100))]
    threshold: Option<u8>,

    /// Keep changes without asking to undo
    #[arg(short, long, global = true)]
    auto: bool,

    /// Print debug information
    #[arg(short = 'D', long, global = true)]
    debug: bool,

    /// Only print changes without renaming files
    #[arg(short, long, global = true)]
    print: bool,

    /// Print verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Generate shell completion
    #[arg(short = 'l', long, name = "SHELL")]
    completion: Option<Shell>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add text to file names
    Add {
        text: String,

        #[arg(short = 'o', long, value_enum, default_value_t = Position::End)]
        position: Position,
    },

    /// Remove text from file names
    Remove { text: String },

    /// Move text to the start or end of file names
    Move {
        text: String,

        #[arg(short = 'o', long, value_enum, default_value_t = Position::Start)]
        position: Position,
    },

    /// Add or remove a prefix or suffix
    Prefix {
        prefix: String,

        #[arg(short = 'o', long, value_enum, default_value_t = Position::Start)]
        position: Position,

        /// Remove instead of adding
        #[arg(short = 'x', long)]
        remove: bool,
    },

    /// Change letter case
    Case {
        #[arg(value_enum)]
        mode: CaseMode,
    },

    /// Remove brackets and keep their content
    Brackets,

    /// Use dots as word separators
    Pirate {
        /// Capitalize each word
        #[arg(short = 'c', long)]
        capitalize: bool,
    },

    /// Capitalize words and use spaces as separators
    Normalize,

    /// Change the container extension between mp4 and mkv
    Convert {
        /// Target extension
        #[arg(name = "EXTENSION")]
        extension: String,
    },

    /// Move files sharing a phrase into [indexed] subfolders
    Index,

    /// Remove the [indexed] folder if it contains no files
    Cleanup,

    /// Rename screenshots to match video file names
    Screenshots {
        /// Directory containing the screenshots
        #[arg(value_hint = clap::ValueHint::DirPath)]
        screenshots: PathBuf,
    },
}

impl Command {
    /// Transformation for the rename commands, `None` for the others.
    ///
    /// # Errors
    /// Returns an error if the convert target extension is not supported.
    pub fn transform(&self) -> Result<Option<Transform>> {
        let transform = match self {
            Self::Add { text, position } => Transform::AddText {
                text: text.clone(),
                position: *position,
            },
            Self::Remove { text } => Transform::RemoveText { text: text.clone() },
            Self::Move { text, position } => Transform::MoveText {
                text: text.clone(),
                position: *position,
            },
            Self::Prefix {
                prefix,
                position,
                remove: false,
            } => Transform::AddPrefix {
                prefix: prefix.clone(),
                position: *position,
            },
            Self::Prefix {
                prefix,
                position,
                remove: true,
            } => Transform::RemovePrefix {
                prefix: prefix.clone(),
                position: *position,
            },
            Self::Case { mode } => Transform::Case(*mode),
            Self::Brackets => Transform::StripBrackets,
            Self::Pirate { capitalize } => Transform::Pirate {
                capitalized: *capitalize,
            },
            Self::Normalize => Transform::Normalize,
            Self::Convert { extension } => Transform::ConvertExtension(extension.parse::<ContainerFormat>()?),
            Self::Index | Self::Cleanup | Self::Screenshots { .. } => return Ok(None),
        };
        Ok(Some(transform))
    }

    /// Only the text commands narrow files with the search filter.
    pub const fn uses_filter(&self) -> bool {
        matches!(self, Self::Add { .. } | Self::Remove { .. } | Self::Move { .. })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(ref shell) = args.completion {
        return media_rename::generate_shell_completion(*shell, Args::command(), env!("CARGO_BIN_NAME"));
    }
    let Some(command) = args.command.clone() else {
        Args::command().print_help()?;
        return Ok(());
    };
    let config = Config::try_from_args(&args, MrenConfig::get_user_config())?;
    MediaRename::new(config).run(command).await
}
