//! Zone indexing
//!
//! Lightweight pass over a log that records every zone change and the range
//! of lines spent in that zone. Used to pick a segment to split without
//! knowing its exact boundary lines up front.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::line::LogLine;
use crate::registry::{LineRegistry, LineRole};
use crate::splitter::SplitterConfig;

/// One stay in a zone, from its zone change line to the line before the next one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneSegment {
    /// 1-based position among the zone changes of the log
    pub ordinal: usize,
    pub zone_id: String,
    pub zone_name: String,
    /// 1-based line number of the zone change line
    pub first_line: usize,
    /// 1-based line number of the last line in the zone (inclusive)
    pub last_line: usize,
    pub line_count: usize,
    /// Exact text of the zone change line
    pub start_text: String,
    /// Exact text of the last line in the zone
    pub stop_text: String,
    pub started_at: Option<DateTime<FixedOffset>>,
    pub ended_at: Option<DateTime<FixedOffset>>,
}

impl ZoneSegment {
    /// Format for display: "Name (ID)", or just the ID for unnamed zones
    pub fn display_name(&self) -> String {
        if self.zone_name.is_empty() {
            return self.zone_id.clone();
        }
        format!("{} ({})", self.zone_name, self.zone_id)
    }

    /// Seconds between the first and last timestamps, if both parse
    pub fn duration_secs(&self) -> Option<i64> {
        let (start, end) = (self.started_at?, self.ended_at?);
        Some((end - start).num_seconds())
    }

    /// Splitter configuration that extracts exactly this segment
    pub fn splitter_config(&self) -> SplitterConfig {
        SplitterConfig::new(self.start_text.clone(), self.stop_text.clone())
    }
}

/// Every zone change of one log, in order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ZoneIndex {
    segments: Vec<ZoneSegment>,
    /// Lines before the first zone change
    pub preamble_lines: usize,
    pub total_lines: usize,
}

impl ZoneIndex {
    /// Index zone changes using the registry's zone-change types.
    pub fn scan<'a>(registry: &LineRegistry, lines: impl IntoIterator<Item = &'a str>) -> Self {
        let mut index = ZoneIndex::default();
        let mut prev: Option<&'a str> = None;

        for (idx, raw) in lines.into_iter().enumerate() {
            let line_number = idx + 1;
            let line = LogLine::parse(raw);

            let zone_fields = registry.get(line.tag()).and_then(|schema| match schema.role {
                LineRole::ZoneChange { id, name } => Some((id, name)),
                _ => None,
            });

            if let Some((id_field, name_field)) = zone_fields {
                if let Some(prev) = prev {
                    index.close_current(line_number - 1, prev);
                }
                index.segments.push(ZoneSegment {
                    ordinal: index.segments.len() + 1,
                    zone_id: line.field(id_field).unwrap_or_default().to_string(),
                    zone_name: line.field(name_field).unwrap_or_default().to_string(),
                    first_line: line_number,
                    last_line: line_number,
                    line_count: 1,
                    start_text: raw.to_string(),
                    stop_text: raw.to_string(),
                    started_at: line.timestamp(),
                    ended_at: line.timestamp(),
                });
            } else if index.segments.is_empty() {
                index.preamble_lines += 1;
            }

            index.total_lines = line_number;
            prev = Some(raw);
        }

        if let Some(prev) = prev {
            index.close_current(index.total_lines, prev);
        }

        tracing::debug!(
            zones = index.segments.len(),
            lines = index.total_lines,
            "Indexed zone changes"
        );
        index
    }

    fn close_current(&mut self, last_line: usize, last_text: &str) {
        let Some(current) = self.segments.last_mut() else {
            return;
        };
        current.last_line = last_line;
        current.line_count = last_line - current.first_line + 1;
        current.stop_text = last_text.to_string();
        if let Some(ts) = LogLine::parse(last_text).timestamp() {
            current.ended_at = Some(ts);
        }
    }

    pub fn segments(&self) -> &[ZoneSegment] {
        &self.segments
    }

    /// Look up a segment by its 1-based ordinal
    pub fn get(&self, ordinal: usize) -> Option<&ZoneSegment> {
        ordinal.checked_sub(1).and_then(|i| self.segments.get(i))
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ZoneSegment> {
        self.segments.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines() -> Vec<String> {
        vec![
            "253|2024-03-01T20:00:00.0000000+01:00|FFXIV_ACT_Plugin Version: 2.7|h".to_string(),
            "01|2024-03-01T20:00:05.0000000+01:00|3E8|Limsa Lominsa|h".to_string(),
            "21|2024-03-01T20:00:06.0000000+01:00|10FF0001|Tank|1D6B|Holy Spirit|h".to_string(),
            "01|2024-03-01T20:01:00.0000000+01:00|44A|The Arena|h".to_string(),
            "21|2024-03-01T20:02:00.0000000+01:00|4000A1B2|Boss|9A3F|Megaflare|h".to_string(),
            "21|2024-03-01T20:11:30.0000000+01:00|4000A1B2|Boss|9A3F|Gigaflare|h".to_string(),
        ]
    }

    fn scan(lines: &[String]) -> ZoneIndex {
        ZoneIndex::scan(&LineRegistry::builtin(), lines.iter().map(String::as_str))
    }

    #[test]
    fn test_scan_finds_each_zone_change() {
        let lines = lines();
        let index = scan(&lines);

        assert_eq!(index.len(), 2);
        assert_eq!(index.preamble_lines, 1);
        assert_eq!(index.total_lines, 6);

        let first = index.get(1).unwrap();
        assert_eq!(first.zone_name, "Limsa Lominsa");
        assert_eq!((first.first_line, first.last_line, first.line_count), (2, 3, 2));
        assert_eq!(first.start_text, lines[1]);
        assert_eq!(first.stop_text, lines[2]);

        let second = index.get(2).unwrap();
        assert_eq!(second.display_name(), "The Arena (44A)");
        assert_eq!((second.first_line, second.last_line, second.line_count), (4, 6, 3));
        assert_eq!(second.stop_text, lines[5]);
        assert_eq!(second.duration_secs(), Some(630));
    }

    #[test]
    fn test_get_is_one_based() {
        let index = scan(&lines());
        assert!(index.get(0).is_none());
        assert!(index.get(3).is_none());
        assert_eq!(index.get(1).unwrap().ordinal, 1);
    }

    #[test]
    fn test_no_zone_changes() {
        let lines = vec!["21|ts|4000A1B2|Boss|9A3F|Megaflare|h".to_string()];
        let index = scan(&lines);
        assert!(index.is_empty());
        assert_eq!(index.preamble_lines, 1);
    }

    #[test]
    fn test_single_line_zone_and_unnamed_zone() {
        let lines = vec!["01|not a time|3E8||h".to_string()];
        let index = scan(&lines);
        let zone = index.get(1).unwrap();
        assert_eq!(zone.line_count, 1);
        assert_eq!(zone.start_text, zone.stop_text);
        assert_eq!(zone.display_name(), "3E8");
        assert_eq!(zone.duration_secs(), None);
    }

    #[test]
    fn test_serializes_for_json_output() {
        let index = scan(&lines());
        let value = serde_json::to_value(&index).unwrap();
        assert_eq!(value["total_lines"], 6);
        assert_eq!(value["segments"][1]["zone_name"], "The Arena");
        assert_eq!(value["segments"][1]["first_line"], 4);
        assert!(value["segments"][1]["started_at"].is_string());
    }

    #[test]
    fn test_splitter_config_bounds_segment() {
        let lines = lines();
        let index = scan(&lines);
        let config = index.get(2).unwrap().splitter_config();
        assert_eq!(config.start_line.as_deref(), Some(lines[3].as_str()));
        assert_eq!(config.stop_line.as_deref(), Some(lines[5].as_str()));
    }
}
