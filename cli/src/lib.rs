pub mod commands;
pub mod summary;

use netlog_types::SplitSettings;

const APP_NAME: &str = "netlog";

/// Load persisted defaults, falling back to built-in defaults when the
/// settings file is missing or unreadable.
pub fn load_settings() -> SplitSettings {
    match confy::load(APP_NAME, None) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load settings, using defaults");
            SplitSettings::default()
        }
    }
}

pub fn store_settings(settings: &SplitSettings) -> Result<(), String> {
    confy::store(APP_NAME, None, settings).map_err(|e| e.to_string())
}

pub fn settings_path() -> Result<std::path::PathBuf, String> {
    confy::get_configuration_file_path(APP_NAME, None).map_err(|e| e.to_string())
}
