//! Run summaries, printed for humans or as JSON.

use std::path::PathBuf;

use netlog_core::{CollectingNotifier, SplitStats, Splitter};
use netlog_types::formatting::{format_pct_ratio, format_thousands};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SplitSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Zone the excerpt was taken from, when split by zone
    pub zone: Option<String>,
    pub lines_read: usize,
    pub started: bool,
    pub done: bool,
    pub stats: SplitStats,
    pub unknown_tags: Vec<String>,
}

impl SplitSummary {
    pub fn from_splitter(
        input: PathBuf,
        output: PathBuf,
        zone: Option<String>,
        lines_read: usize,
        splitter: &Splitter<CollectingNotifier>,
    ) -> Self {
        Self {
            input,
            output,
            zone,
            lines_read,
            started: splitter.was_started(),
            done: splitter.is_done(),
            stats: splitter.stats(),
            unknown_tags: splitter.notifier().tags(),
        }
    }

    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string_pretty(self).map_err(|e| e.to_string())
    }

    pub fn render(&self) -> String {
        let mut out = format!(
            "{} -> {}\n",
            self.input.display(),
            self.output.display()
        );
        if let Some(zone) = &self.zone {
            out.push_str(&format!("  zone:      {zone}\n"));
        }
        out.push_str(&format!(
            "  emitted:   {} of {} lines ({})\n",
            format_thousands(self.stats.lines_emitted),
            format_thousands(self.lines_read as u64),
            format_pct_ratio(self.stats.lines_emitted, self.lines_read as u64)
        ));
        out.push_str(&format!(
            "  flushed:   {}\n",
            format_thousands(self.stats.flushed)
        ));
        if self.stats.dropped_by_filter > 0 {
            out.push_str(&format!(
                "  filtered:  {}\n",
                format_thousands(self.stats.dropped_by_filter)
            ));
        }
        if !self.unknown_tags.is_empty() {
            out.push_str(&format!(
                "  unknown:   {} line(s) of type {}\n",
                format_thousands(self.stats.unknown_lines),
                self.unknown_tags.join(", ")
            ));
        }
        if !self.started {
            out.push_str("  start line never seen, nothing written\n");
        }
        out
    }
}
