//! Types shared between the netlog engine and its front ends.

pub mod formatting;
pub mod settings;

pub use settings::{SplitMode, SplitSettings};
