//! Integration tests for the sample config file.

use std::fs;
use std::path::Path;

/// Read the sample config file content.
fn read_sample_config() -> String {
    let config_path = Path::new("tests/fixtures/sample_config.toml");
    fs::read_to_string(config_path).expect("Failed to read sample config file")
}

#[test]
fn sample_config_is_valid_toml() {
    let config_content = read_sample_config();
    let result: Result<toml::Value, _> = toml::from_str(&config_content);
    assert!(result.is_ok(), "Sample config should be valid TOML: {:?}", result.err());
}

#[test]
fn mren_section_has_expected_keys() {
    let config_content = read_sample_config();
    let value: toml::Value = toml::from_str(&config_content).expect("should parse");
    let mren = value.get("mren").expect("should have mren section");

    for key in [
        "auto",
        "debug",
        "dryrun",
        "fuzzy",
        "reversed",
        "verbose",
        "fuzzy_threshold",
        "video_extensions",
        "image_extensions",
        "extra_stopwords",
        "extra_profanity",
    ] {
        assert!(mren.get(key).is_some(), "mren section should have {key}");
    }
}

#[test]
fn fuzzy_threshold_is_a_percentage() {
    let config_content = read_sample_config();
    let value: toml::Value = toml::from_str(&config_content).expect("should parse");
    let threshold = value
        .get("mren")
        .and_then(|mren| mren.get("fuzzy_threshold"))
        .and_then(toml::Value::as_integer)
        .expect("should have integer threshold");
    assert!((0..=100).contains(&threshold));
}

#[test]
fn extension_lists_are_strings() {
    let config_content = read_sample_config();
    let value: toml::Value = toml::from_str(&config_content).expect("should parse");
    let mren = value.get("mren").expect("should have mren section");

    for key in ["video_extensions", "image_extensions", "extra_stopwords"] {
        let list = mren.get(key).and_then(toml::Value::as_array).expect("should be an array");
        assert!(list.iter().all(toml::Value::is_str), "{key} should only contain strings");
    }
}
