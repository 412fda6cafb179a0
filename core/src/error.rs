//! Crate-level error type

use crate::matcher::MatcherError;
use crate::reader::ReadError;
use crate::registry::RegistryError;

/// Any failure that can stop a split before or outside line processing.
#[derive(Debug, thiserror::Error)]
pub enum SplitError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Matcher(#[from] MatcherError),

    #[error(transparent)]
    Read(#[from] ReadError),

    #[error("Zone {ordinal} not found (log has {available} zone changes)")]
    ZoneNotFound { ordinal: usize, available: usize },

    #[error("Line {line} out of range (log has {total} lines)")]
    LineOutOfRange { line: usize, total: usize },
}
