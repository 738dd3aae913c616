use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use itertools::Itertools;
use serde::Deserialize;

use media_rename::print_error;
use media_rename::rename::{DEFAULT_FUZZY_THRESHOLD, FilterCriteria, IMAGE_EXTENSIONS, VIDEO_EXTENSIONS};

use crate::Args;

/// Final config combined from CLI arguments and user config file.
#[derive(Debug)]
pub struct Config {
    pub(crate) auto: bool,
    pub(crate) debug: bool,
    pub(crate) dryrun: bool,
    pub(crate) extra_profanity: Vec<String>,
    pub(crate) extra_stopwords: Vec<String>,
    pub(crate) filter: String,
    pub(crate) fuzzy: bool,
    pub(crate) fuzzy_threshold: u8,
    pub(crate) image_extensions: Vec<String>,
    pub(crate) path: PathBuf,
    pub(crate) reversed: bool,
    pub(crate) verbose: bool,
    pub(crate) video_extensions: Vec<String>,
}

/// Config from the user config file
#[derive(Debug, Default, Deserialize)]
pub struct MrenConfig {
    #[serde(default)]
    auto: bool,
    #[serde(default)]
    debug: bool,
    #[serde(default)]
    dryrun: bool,
    #[serde(default)]
    extra_profanity: Vec<String>,
    #[serde(default)]
    extra_stopwords: Vec<String>,
    #[serde(default)]
    fuzzy: bool,
    #[serde(default)]
    fuzzy_threshold: Option<u8>,
    #[serde(default)]
    image_extensions: Vec<String>,
    #[serde(default)]
    reversed: bool,
    #[serde(default)]
    verbose: bool,
    #[serde(default)]
    video_extensions: Vec<String>,
}

/// Wrapper needed for parsing the user config file section.
#[derive(Debug, Default, Deserialize)]
struct UserConfig {
    #[serde(default)]
    mren: MrenConfig,
}

impl MrenConfig {
    /// Try to read user config from the file if it exists.
    /// Otherwise, fall back to default config.
    pub fn get_user_config() -> Self {
        media_rename::config::CONFIG_PATH
            .as_deref()
            .filter(|path| path.is_file())
            .and_then(|path| {
                fs::read_to_string(path)
                    .map_err(|e| {
                        print_error!("Error reading config file {}: {e}", path.display());
                    })
                    .ok()
            })
            .and_then(|config_string| {
                Self::from_toml_str(&config_string)
                    .map_err(|e| print_error!("{e}"))
                    .ok()
            })
            .unwrap_or_default()
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    /// Returns an error if the TOML string is invalid.
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        toml::from_str::<UserConfig>(toml_str)
            .map(|config| config.mren)
            .map_err(|e| anyhow::anyhow!("Failed to parse config: {e}"))
    }
}

impl Config {
    /// Create config from given command line args and user config file.
    ///
    /// # Errors
    /// Returns an error if the input path is not an existing directory.
    pub fn try_from_args(args: &Args, user_config: MrenConfig) -> Result<Self> {
        let path = media_rename::resolve_input_directory(args.path.as_deref())?;

        let video_extensions = merge_extensions(&VIDEO_EXTENSIONS, user_config.video_extensions);
        let image_extensions = merge_extensions(&IMAGE_EXTENSIONS, user_config.image_extensions);

        let extra_stopwords: Vec<String> = user_config
            .extra_stopwords
            .into_iter()
            .map(|word| word.trim().to_lowercase())
            .filter(|word| !word.is_empty())
            .unique()
            .collect();

        let extra_profanity: Vec<String> = user_config
            .extra_profanity
            .into_iter()
            .map(|word| word.trim().to_lowercase())
            .filter(|word| !word.is_empty())
            .unique()
            .collect();

        Ok(Self {
            auto: args.auto || user_config.auto,
            debug: args.debug || user_config.debug,
            dryrun: args.print || user_config.dryrun,
            extra_profanity,
            extra_stopwords,
            filter: args.filter.as_deref().map(str::trim).unwrap_or_default().to_string(),
            fuzzy: args.fuzzy || user_config.fuzzy,
            fuzzy_threshold: args
                .threshold
                .or(user_config.fuzzy_threshold)
                .unwrap_or(DEFAULT_FUZZY_THRESHOLD)
                .min(100),
            image_extensions,
            path,
            reversed: args.reversed || user_config.reversed,
            verbose: args.verbose || user_config.verbose,
            video_extensions,
        })
    }

    /// Search filter for the text commands.
    pub fn filter_criteria(&self) -> FilterCriteria {
        FilterCriteria::new(self.filter.clone())
            .fuzzy(self.fuzzy)
            .reversed(self.reversed)
            .threshold(self.fuzzy_threshold)
    }
}

/// Combine default extensions with user additions as lowercase values without the leading dot.
fn merge_extensions(defaults: &[&str], extra: Vec<String>) -> Vec<String> {
    defaults
        .iter()
        .map(|ext| (*ext).to_string())
        .chain(extra)
        .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
        .filter(|ext| !ext.is_empty())
        .unique()
        .collect()
}
