pub mod error;
pub mod game_data;
pub mod line;
pub mod matcher;
pub mod notify;
pub mod reader;
pub mod registry;
pub mod splitter;
pub mod zone_index;

// Re-exports for convenience
pub use error::SplitError;
pub use line::{LineSortKey, LogLine};
pub use notify::{CollectingNotifier, Notifier, TracingNotifier, UnknownType};
pub use reader::{LogFile, ReadError};
pub use registry::{LineRegistry, LineRole, LineSchema, RegistryError};
pub use splitter::{Emit, Phase, SplitStats, Splitter, SplitterConfig};
pub use zone_index::{ZoneIndex, ZoneSegment};
