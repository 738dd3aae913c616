//! Pure filename transformations.
//!
//! Every strategy maps an old stem to a new stem and never fails.
//! Parameter validation happens once per batch in [`Transform::validate`].

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;

use crate::rename::sanitize::{capitalize_word, capwords, clean_string};
use crate::rename::types::FileRef;

static RE_BRACKETS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\[\]{}()]").expect("Failed to create regex pattern for brackets"));

/// Where text is inserted or moved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Position {
    Start,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CaseMode {
    Upper,
    Lower,
}

/// Video containers that can be converted into each other by renaming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerFormat {
    Mp4,
    Mkv,
}

/// A filename transformation with its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transform {
    AddText { text: String, position: Position },
    RemoveText { text: String },
    MoveText { text: String, position: Position },
    AddPrefix { prefix: String, position: Position },
    RemovePrefix { prefix: String, position: Position },
    Case(CaseMode),
    StripBrackets,
    Pirate { capitalized: bool },
    Normalize,
    ConvertExtension(ContainerFormat),
}

impl ContainerFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            Self::Mkv => "mkv",
        }
    }

    /// The container files are converted from when targeting this one.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Mp4 => Self::Mkv,
            Self::Mkv => Self::Mp4,
        }
    }
}

impl FromStr for ContainerFormat {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        let extension = value.trim().trim_start_matches('.').to_lowercase();
        match extension.as_str() {
            "mp4" => Ok(Self::Mp4),
            "mkv" => Ok(Self::Mkv),
            _ => anyhow::bail!("Unsupported target extension: {value}"),
        }
    }
}

impl fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}", self.extension())
    }
}

impl Transform {
    /// Reject parameters that would make the whole batch meaningless.
    ///
    /// # Errors
    /// Returns an error if the text or prefix parameter is empty.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::AddText { text, .. } | Self::RemoveText { text } | Self::MoveText { text, .. } => {
                if text.trim().is_empty() {
                    anyhow::bail!("Text must not be empty");
                }
            }
            Self::AddPrefix { prefix, .. } | Self::RemovePrefix { prefix, .. } => {
                if prefix.trim().is_empty() {
                    anyhow::bail!("Prefix must not be empty");
                }
            }
            Self::Case(_) | Self::StripBrackets | Self::Pirate { .. } | Self::Normalize | Self::ConvertExtension(_) => {}
        }
        Ok(())
    }

    /// Check if the transform applies to the given file at all.
    #[must_use]
    pub fn is_eligible(&self, file: &FileRef) -> bool {
        match self {
            Self::ConvertExtension(target) => file.extension() == target.other().extension(),
            _ => true,
        }
    }

    /// Compute the new stem for the given stem.
    #[must_use]
    pub fn apply(&self, stem: &str) -> String {
        match self {
            Self::AddText { text, position } => add_text(stem, text, *position),
            Self::RemoveText { text } => remove_text(stem, text),
            Self::MoveText { text, position } => move_text(stem, text, *position),
            Self::AddPrefix { prefix, position } => add_prefix(stem, prefix, *position),
            Self::RemovePrefix { prefix, position } => remove_prefix(stem, prefix, *position),
            Self::Case(CaseMode::Upper) => stem.to_uppercase(),
            Self::Case(CaseMode::Lower) => stem.to_lowercase(),
            Self::StripBrackets => strip_brackets(stem),
            Self::Pirate { capitalized: false } => pirate(stem),
            Self::Pirate { capitalized: true } => pirate_capitalized(stem),
            Self::Normalize => normalize(stem),
            Self::ConvertExtension(_) => stem.to_string(),
        }
    }

    /// Full target path for the file.
    ///
    /// The new stem is sanitized and the original extension kept,
    /// except for extension conversion which only swaps the extension.
    /// Returns `None` if the new stem would be empty.
    #[must_use]
    pub fn target_path(&self, file: &FileRef) -> Option<PathBuf> {
        match self {
            Self::ConvertExtension(target) => Some(
                file.path()
                    .with_file_name(format!("{}.{}", file.stem(), target.extension())),
            ),
            _ => {
                let stem = clean_string(&self.apply(file.stem()));
                (!stem.is_empty()).then(|| file.with_stem(&stem))
            }
        }
    }

    /// Short description used in console output.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::AddText { .. } => "add text",
            Self::RemoveText { .. } => "remove text",
            Self::MoveText { .. } => "move text",
            Self::AddPrefix { .. } => "add prefix",
            Self::RemovePrefix { .. } => "remove prefix",
            Self::Case(CaseMode::Upper) => "uppercase",
            Self::Case(CaseMode::Lower) => "lowercase",
            Self::StripBrackets => "remove brackets",
            Self::Pirate { .. } => "pirate format",
            Self::Normalize => "normalize format",
            Self::ConvertExtension(_) => "convert extension",
        }
    }
}

fn add_text(stem: &str, text: &str, position: Position) -> String {
    let text = text.trim();
    match position {
        Position::Start => format!("{text} {stem}"),
        Position::End => format!("{stem} {text}"),
    }
}

fn remove_text(stem: &str, text: &str) -> String {
    stem.replace(text, "")
        .replace(&text.to_lowercase(), "")
        .replace(&text.to_uppercase(), "")
}

/// Move the first whitespace-token-aligned occurrence of `text` to the given position.
/// Returns the stem unchanged if the token sequence is not found.
fn move_text(stem: &str, text: &str, position: Position) -> String {
    let tokens: Vec<&str> = stem.split_whitespace().collect();
    let needle: Vec<String> = text.split_whitespace().map(str::to_lowercase).collect();
    if needle.is_empty() || needle.len() > tokens.len() {
        return stem.to_string();
    }

    let found = tokens.windows(needle.len()).position(|window| {
        window
            .iter()
            .zip(&needle)
            .all(|(token, expected)| token.to_lowercase() == *expected)
    });

    let Some(index) = found else {
        return stem.to_string();
    };

    let span = &tokens[index..index + needle.len()];
    let rest = tokens[..index].iter().chain(&tokens[index + needle.len()..]);
    let reordered: Vec<&str> = match position {
        Position::Start => span.iter().chain(rest).copied().collect(),
        Position::End => rest.chain(span).copied().collect(),
    };
    reordered.join(" ")
}

fn add_prefix(stem: &str, prefix: &str, position: Position) -> String {
    match position {
        Position::Start => format!("{} {stem}", prefix.trim_end()),
        Position::End => format!("{stem} {}", prefix.trim()),
    }
}

fn remove_prefix(stem: &str, prefix: &str, position: Position) -> String {
    match position {
        Position::Start => {
            let prefix = prefix.trim_end();
            stem.strip_prefix(prefix)
                .map_or_else(|| stem.to_string(), |rest| rest.trim_start().to_string())
        }
        Position::End => {
            let prefix = prefix.trim();
            stem.strip_suffix(prefix)
                .map_or_else(|| stem.to_string(), |rest| rest.trim_end().to_string())
        }
    }
}

fn strip_brackets(stem: &str) -> String {
    clean_string(&RE_BRACKETS.replace_all(stem, ""))
}

fn pirate(stem: &str) -> String {
    stem.to_lowercase().replace(' ', ".")
}

fn pirate_capitalized(stem: &str) -> String {
    stem.replace('.', " ")
        .split_whitespace()
        .map(capitalize_word)
        .collect::<Vec<_>>()
        .join(".")
}

fn normalize(stem: &str) -> String {
    capwords(&stem.replace('.', " "))
}

#[cfg(test)]
mod transform_tests {
    use super::*;

    fn apply(transform: &Transform, stem: &str) -> String {
        clean_string(&transform.apply(stem))
    }

    #[test]
    fn add_text_separates_with_single_space() {
        let start = Transform::AddText {
            text: "Director's Cut ".to_string(),
            position: Position::Start,
        };
        let end = Transform::AddText {
            text: "  1080p".to_string(),
            position: Position::End,
        };
        assert_eq!(apply(&start, "Blade Runner"), "Director's Cut Blade Runner");
        assert_eq!(apply(&end, "Blade Runner "), "Blade Runner 1080p");
    }

    #[test]
    fn remove_text_matches_case_variants() {
        let transform = Transform::RemoveText {
            text: "Sample".to_string(),
        };
        assert_eq!(apply(&transform, "Movie Sample sample SAMPLE part"), "Movie part");
        assert_eq!(apply(&transform, "Movie"), "Movie");
    }

    #[test]
    fn move_text_to_start_and_end() {
        let to_start = Transform::MoveText {
            text: "the matrix".to_string(),
            position: Position::Start,
        };
        let to_end = Transform::MoveText {
            text: "1999".to_string(),
            position: Position::End,
        };
        assert_eq!(apply(&to_start, "1999 The Matrix Remastered"), "The Matrix 1999 Remastered");
        assert_eq!(apply(&to_end, "1999 The Matrix Remastered"), "The Matrix Remastered 1999");
    }

    #[test]
    fn move_text_not_found_is_noop() {
        let transform = Transform::MoveText {
            text: "trix".to_string(),
            position: Position::Start,
        };
        assert_eq!(apply(&transform, "The Matrix"), "The Matrix");
    }

    #[test]
    fn move_text_uses_first_occurrence() {
        let transform = Transform::MoveText {
            text: "hd".to_string(),
            position: Position::End,
        };
        assert_eq!(apply(&transform, "HD Movie hd Extra"), "Movie hd Extra HD");
    }

    #[test]
    fn add_and_remove_prefix_at_start() {
        let add = Transform::AddPrefix {
            prefix: "[HD]".to_string(),
            position: Position::Start,
        };
        let remove = Transform::RemovePrefix {
            prefix: "[HD]".to_string(),
            position: Position::Start,
        };
        let added = apply(&add, "Movie");
        assert_eq!(added, "[HD] Movie");
        assert_eq!(apply(&remove, &added), "Movie");
        assert_eq!(apply(&remove, "Movie [HD]"), "Movie [HD]");
    }

    #[test]
    fn add_and_remove_prefix_at_end() {
        let add = Transform::AddPrefix {
            prefix: " x265 ".to_string(),
            position: Position::End,
        };
        let remove = Transform::RemovePrefix {
            prefix: "x265".to_string(),
            position: Position::End,
        };
        let added = apply(&add, "Movie");
        assert_eq!(added, "Movie x265");
        assert_eq!(apply(&remove, &added), "Movie");
        assert_eq!(apply(&remove, "x265 Movie"), "x265 Movie");
    }

    #[test]
    fn case_folding() {
        assert_eq!(apply(&Transform::Case(CaseMode::Upper), "The Matrix"), "THE MATRIX");
        assert_eq!(apply(&Transform::Case(CaseMode::Lower), "The Matrix"), "the matrix");
    }

    #[test]
    fn strip_brackets_keeps_content() {
        assert_eq!(
            apply(&Transform::StripBrackets, "Movie [1080p] (2020) {Extended}"),
            "Movie 1080p 2020 Extended"
        );
        assert_eq!(apply(&Transform::StripBrackets, "Movie ( ) Name"), "Movie Name");
    }

    #[test]
    fn pirate_formats() {
        assert_eq!(
            apply(&Transform::Pirate { capitalized: false }, "The Matrix Reloaded"),
            "the.matrix.reloaded"
        );
        assert_eq!(
            apply(&Transform::Pirate { capitalized: true }, "the matrix.RELOADED"),
            "The.Matrix.Reloaded"
        );
    }

    #[test]
    fn normalize_format() {
        assert_eq!(apply(&Transform::Normalize, "the.matrix.reloaded"), "The Matrix Reloaded");
        assert_eq!(apply(&Transform::Normalize, "..the..matrix"), "The Matrix");
    }

    #[test]
    fn validate_rejects_empty_text() {
        let transform = Transform::AddText {
            text: "  ".to_string(),
            position: Position::Start,
        };
        assert!(transform.validate().is_err());
        assert!(Transform::StripBrackets.validate().is_ok());
    }

    #[test]
    fn container_format_parsing() {
        assert_eq!(".MP4".parse::<ContainerFormat>().unwrap(), ContainerFormat::Mp4);
        assert_eq!("mkv".parse::<ContainerFormat>().unwrap(), ContainerFormat::Mkv);
        assert!(".avi".parse::<ContainerFormat>().is_err());
        assert_eq!(ContainerFormat::Mp4.other(), ContainerFormat::Mkv);
        assert_eq!(ContainerFormat::Mkv.to_string(), ".mkv");
    }

    #[test]
    fn conversion_eligibility_and_target() {
        let transform = Transform::ConvertExtension(ContainerFormat::Mp4);
        let mkv = FileRef::new(PathBuf::from("/videos/movie.mkv")).unwrap();
        let mp4 = FileRef::new(PathBuf::from("/videos/movie.mp4")).unwrap();
        assert!(transform.is_eligible(&mkv));
        assert!(!transform.is_eligible(&mp4));
        assert_eq!(transform.target_path(&mkv), Some(PathBuf::from("/videos/movie.mp4")));
    }

    #[test]
    fn target_path_sanitizes_stem() {
        let file = FileRef::new(PathBuf::from("/videos/ The  Matrix .mkv")).unwrap();
        assert_eq!(
            Transform::StripBrackets.target_path(&file),
            Some(PathBuf::from("/videos/The Matrix.mkv"))
        );
    }

    #[test]
    fn empty_stem_has_no_target() {
        let file = FileRef::new(PathBuf::from("/videos/Sample.mp4")).unwrap();
        let transform = Transform::RemoveText {
            text: "Sample".to_string(),
        };
        assert_eq!(transform.target_path(&file), None);
    }
}
