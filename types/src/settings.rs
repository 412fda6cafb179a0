//! Persisted defaults for splitting runs.
//!
//! These are the values a front end falls back to when a flag is not given on
//! the command line. The engine itself never reads this file; callers turn it
//! into an engine configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which kind of excerpt a split produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitMode {
    /// Self-contained excerpt that can be replayed on its own
    #[default]
    Replay,
    /// Minimal excerpt containing only lines useful for analysis
    Analysis,
}

impl SplitMode {
    pub fn is_analysis(self) -> bool {
        matches!(self, SplitMode::Analysis)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitSettings {
    pub mode: SplitMode,
    /// Carry every global line seen before the start line into the excerpt
    pub include_globals: bool,
    /// Directory of TOML line definitions layered over the built-in table
    pub custom_definitions_dir: Option<PathBuf>,
    /// Directory output files are written to when no path is given
    pub output_dir: Option<PathBuf>,
}

impl Default for SplitSettings {
    fn default() -> Self {
        Self {
            mode: SplitMode::Replay,
            include_globals: true,
            custom_definitions_dir: None,
            output_dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_settings_use_defaults() {
        let settings: SplitSettings = toml::from_str("").unwrap();
        assert_eq!(settings, SplitSettings::default());
        assert!(settings.include_globals);
        assert_eq!(settings.mode, SplitMode::Replay);
    }

    #[test]
    fn test_parse_analysis_settings() {
        let toml = r#"
mode = "analysis"
include_globals = false
custom_definitions_dir = "/tmp/netlog/definitions"
"#;
        let settings: SplitSettings = toml::from_str(toml).unwrap();
        assert!(settings.mode.is_analysis());
        assert!(!settings.include_globals);
        assert_eq!(
            settings.custom_definitions_dir,
            Some(PathBuf::from("/tmp/netlog/definitions"))
        );
        assert!(settings.output_dir.is_none());
    }
}
