//! Raw network log lines.
//!
//! A line is pipe-delimited: field 0 is the type tag, field 1 the ISO-8601
//! timestamp, the rest depends on the type.
//!
//! `00|2024-03-01T20:14:07.1230000+01:00|0839|ff5|The arena will be sealed off in 15 seconds!|c1b1e2f4...`

use chrono::{DateTime, FixedOffset};
use memchr::memchr_iter;
use std::cmp::Ordering;

pub const FIELD_SEPARATOR: char = '|';

/// Index of the timestamp field in every line.
pub const TIMESTAMP_FIELD: usize = 1;

/// A borrowed line split into its fields. Nothing is validated beyond splitting.
#[derive(Debug, Clone)]
pub struct LogLine<'a> {
    raw: &'a str,
    fields: Vec<&'a str>,
}

impl<'a> LogLine<'a> {
    pub fn parse(raw: &'a str) -> Self {
        let mut fields = Vec::with_capacity(16);
        let mut start = 0;
        for end in memchr_iter(b'|', raw.as_bytes()) {
            fields.push(&raw[start..end]);
            start = end + 1;
        }
        fields.push(&raw[start..]);
        Self { raw, fields }
    }

    pub fn raw(&self) -> &'a str {
        self.raw
    }

    /// Type tag (field 0). Empty for an empty line.
    pub fn tag(&self) -> &'a str {
        self.fields[0]
    }

    /// Field at `index`, or `None` when the line is too short.
    pub fn field(&self, index: usize) -> Option<&'a str> {
        self.fields.get(index).copied()
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn timestamp(&self) -> Option<DateTime<FixedOffset>> {
        parse_timestamp(self.field(TIMESTAMP_FIELD)?)
    }

    /// Rebuild the line with some fields swapped out.
    ///
    /// `replacements` holds `(index, value)` pairs; indexes past the end are ignored.
    pub fn with_fields(&self, replacements: &[(usize, &str)]) -> String {
        let mut out = String::with_capacity(self.raw.len() + 32);
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                out.push(FIELD_SEPARATOR);
            }
            let value = replacements
                .iter()
                .rev()
                .find(|(idx, _)| *idx == i)
                .map_or(*field, |(_, v)| *v);
            out.push_str(value);
        }
        out
    }
}

pub fn parse_timestamp(field: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(field.trim()).ok()
}

/// Ordering key for lines re-sorted during a flush: timestamp, then type tag.
///
/// Lines without a parseable timestamp sort first. Numeric tags compare
/// numerically so `"03"` sorts before `"253"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSortKey {
    timestamp: Option<DateTime<FixedOffset>>,
    tag: String,
}

impl LineSortKey {
    pub fn of(raw: &str) -> Self {
        let line = LogLine::parse(raw);
        Self {
            timestamp: line.timestamp(),
            tag: line.tag().to_string(),
        }
    }
}

impl Ord for LineSortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.timestamp
            .cmp(&other.timestamp)
            .then_with(|| compare_tags(&self.tag, &other.tag))
    }
}

impl PartialOrd for LineSortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn compare_tags(a: &str, b: &str) -> Ordering {
    match (a.parse::<u32>(), b.parse::<u32>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
