//! Loader for RON content files at startup.

use bevy::prelude::*;
use ron::Options;
use std::fs;
use std::path::Path;

use crate::combat::{BossTuning, TUNING_SCHEMA_VERSION};

pub const BOSS_TUNING_FILE: &str = "boss_tuning.ron";

/// Error type for content loading failures.
#[derive(Debug)]
pub struct ContentLoadError {
    pub file: String,
    pub message: String,
}

impl std::fmt::Display for ContentLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to load {}: {}", self.file, self.message)
    }
}

impl std::error::Error for ContentLoadError {}

/// Create RON options with extensions enabled for more flexible parsing.
fn ron_options() -> Options {
    Options::default().with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
}

/// Load a single RON struct.
fn load_single_file<T>(path: &Path) -> Result<T, ContentLoadError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let file_name = path.display().to_string();
    let contents = fs::read_to_string(path).map_err(|e| ContentLoadError {
        file: file_name.clone(),
        message: format!("IO error: {}", e),
    })?;

    parse_single(&contents, file_name)
}

fn parse_single<T>(contents: &str, file_name: String) -> Result<T, ContentLoadError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    ron_options()
        .from_str(contents)
        .map_err(|e| ContentLoadError {
            file: file_name,
            message: format!("Parse error: {}", e),
        })
}

/// Parse and validate boss tuning from RON text.
pub fn parse_boss_tuning(contents: &str, file_name: &str) -> Result<BossTuning, ContentLoadError> {
    let tuning: BossTuning = parse_single(contents, file_name.to_string())?;
    check_boss_tuning(tuning, file_name)
}

/// Load `boss_tuning.ron` from `base_path` and validate it.
pub fn load_boss_tuning(base_path: &Path) -> Result<BossTuning, ContentLoadError> {
    let path = base_path.join(BOSS_TUNING_FILE);
    let tuning: BossTuning = load_single_file(&path)?;
    check_boss_tuning(tuning, &path.display().to_string())
}

fn check_boss_tuning(tuning: BossTuning, file_name: &str) -> Result<BossTuning, ContentLoadError> {
    if tuning.schema_version != TUNING_SCHEMA_VERSION {
        return Err(ContentLoadError {
            file: file_name.to_string(),
            message: format!(
                "Unsupported schema_version {} (expected {})",
                tuning.schema_version, TUNING_SCHEMA_VERSION
            ),
        });
    }
    tuning.validate().map_err(|e| ContentLoadError {
        file: file_name.to_string(),
        message: format!("Invalid tuning: {}", e),
    })?;
    Ok(tuning)
}

/// Startup loading: the file's tuning when it is usable, defaults otherwise.
pub fn load_boss_tuning_or_default(base_path: &Path) -> BossTuning {
    match load_boss_tuning(base_path) {
        Ok(tuning) => {
            info!(
                "Loaded boss tuning: {} health, {} phase thresholds",
                tuning.max_health,
                tuning.phase_thresholds.len()
            );
            tuning
        }
        Err(e) => {
            error!("{}; using built-in boss tuning", e);
            BossTuning::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::ConfigError;
    use std::path::PathBuf;

    fn data_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/data")
    }

    #[test]
    fn test_shipped_tuning_matches_defaults() {
        let tuning = load_boss_tuning(&data_dir()).unwrap();
        assert_eq!(tuning, BossTuning::default());
    }

    #[test]
    fn test_missing_file_reports_io_error() {
        let err = load_boss_tuning(Path::new("/nonexistent/data")).unwrap_err();
        assert!(err.message.starts_with("IO error"));
        assert!(err.file.ends_with(BOSS_TUNING_FILE));
    }

    #[test]
    fn test_malformed_file_reports_parse_error() {
        let err = parse_boss_tuning("(max_health: \"lots\")", "inline.ron").unwrap_err();
        assert!(err.message.starts_with("Parse error"));
        assert_eq!(err.file, "inline.ron");
    }

    #[test]
    fn test_invalid_tuning_is_rejected_after_parsing() {
        let mut tuning = BossTuning::default();
        tuning.phase_thresholds.reverse();
        let text = ron::ser::to_string(&tuning).unwrap();

        let err = parse_boss_tuning(&text, "reversed.ron").unwrap_err();
        assert_eq!(
            err.message,
            format!("Invalid tuning: {}", ConfigError::ThresholdsNotDescending)
        );
    }

    #[test]
    fn test_fallback_uses_defaults() {
        let tuning = load_boss_tuning_or_default(Path::new("/nonexistent/data"));
        assert_eq!(tuning, BossTuning::default());
    }
}
