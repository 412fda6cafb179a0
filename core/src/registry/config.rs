//! Loading line definitions from TOML
//!
//! Definitions come from two places:
//! - **Builtin**: compiled into the crate (`registry::builtin`)
//! - **Custom**: user TOML files, one or more `[[line]]` tables per file
//!
//! Custom definitions are layered over the builtin table; an entry with the
//! same tag replaces the builtin one.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::LineRegistry;
use super::schema::LineSchema;

/// Contents of one definition file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefinitionFile {
    #[serde(rename = "line", default)]
    pub lines: Vec<LineSchema>,
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Serialize error for {path:?}: {source}")]
    Serialize {
        path: PathBuf,
        source: toml::ser::Error,
    },

    #[error("Invalid definition for line type '{tag}' in {path:?}: {reason}")]
    InvalidDefinition {
        path: PathBuf,
        tag: String,
        reason: String,
    },
}

/// Build a registry from the builtin table plus an optional custom directory
///
/// A directory that does not exist is skipped. Files that fail to load are
/// logged and skipped so one bad file does not take the rest down.
pub fn load_definitions(custom_dir: Option<&Path>) -> Result<LineRegistry, RegistryError> {
    let mut registry = LineRegistry::builtin();

    if let Some(dir) = custom_dir
        && dir.exists()
    {
        load_directory(&mut registry, dir)?;
    }

    tracing::info!(line_types = registry.len(), "Loaded line definitions");
    Ok(registry)
}

fn load_directory(registry: &mut LineRegistry, dir: &Path) -> Result<(), RegistryError> {
    let entries = fs::read_dir(dir).map_err(|e| RegistryError::Io {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    paths.sort();

    for path in paths {
        match load_file(&path) {
            Ok(file) => {
                let replaced = registry.add_definitions(file);
                if !replaced.is_empty() {
                    tracing::debug!(file = ?path.file_name(), ?replaced, "Custom definitions replaced line types");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Skipping definition file");
            }
        }
    }

    Ok(())
}

/// Load and validate a single definition file
pub fn load_file(path: &Path) -> Result<DefinitionFile, RegistryError> {
    let contents = fs::read_to_string(path).map_err(|e| RegistryError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_definitions(&contents, path)
}

/// Parse definition TOML; `origin` is only used in error messages
pub fn parse_definitions(contents: &str, origin: &Path) -> Result<DefinitionFile, RegistryError> {
    let file: DefinitionFile = toml::from_str(contents).map_err(|e| RegistryError::Parse {
        path: origin.to_path_buf(),
        source: e,
    })?;

    for schema in &file.lines {
        schema
            .validate()
            .map_err(|reason| RegistryError::InvalidDefinition {
                path: origin.to_path_buf(),
                tag: schema.tag.clone(),
                reason,
            })?;
    }

    Ok(file)
}

/// Save definitions to a TOML file
pub fn save_file(path: &Path, file: &DefinitionFile) -> Result<(), RegistryError> {
    let contents = toml::to_string_pretty(file).map_err(|e| RegistryError::Serialize {
        path: path.to_path_buf(),
        source: e,
    })?;

    fs::write(path, contents).map_err(|e| RegistryError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Default directory for custom definitions
pub fn default_custom_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("netlog").join("definitions"))
}
