//! Filter matcher builder.
//!
//! Turns the declarative `FieldFilter`s of a schema into compiled matchers.
//! Each constraint pattern must match its whole field; a filter matches a line
//! when every constraint holds. Compilation happens once, when an engine is
//! built, never per line.

use hashbrown::HashMap;
use regex::Regex;

use crate::line::LogLine;
use crate::registry::{AnalysisInclusion, FieldFilter, LineRegistry, LineSchema};

#[derive(Debug, thiserror::Error)]
pub enum MatcherError {
    #[error("Invalid pattern for line type '{tag}' field {field}: {source}")]
    InvalidPattern {
        tag: String,
        field: usize,
        source: regex::Error,
    },
}

/// A compiled filter for one line type.
#[derive(Debug, Clone)]
pub struct LineMatcher {
    tag: String,
    fields: Vec<(usize, Regex)>,
}

impl LineMatcher {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Test an already split line. Missing fields never match.
    pub fn matches(&self, line: &LogLine<'_>) -> bool {
        line.tag() == self.tag
            && self
                .fields
                .iter()
                .all(|(idx, re)| line.field(*idx).is_some_and(|value| re.is_match(value)))
    }

    /// Test a raw line
    pub fn matches_raw(&self, raw: &str) -> bool {
        self.matches(&LogLine::parse(raw))
    }
}

/// Compile one filter for `tag`.
pub fn build_matcher(tag: &str, filter: &FieldFilter) -> Result<LineMatcher, MatcherError> {
    let fields = filter
        .fields
        .iter()
        .map(|constraint| {
            Regex::new(&format!("^(?:{})$", constraint.pattern))
                .map(|re| (constraint.field, re))
                .map_err(|source| MatcherError::InvalidPattern {
                    tag: tag.to_string(),
                    field: constraint.field,
                    source,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(LineMatcher {
        tag: tag.to_string(),
        fields,
    })
}

/// Compile every filter of a schema, in declaration order.
pub fn build_schema_matchers(schema: &LineSchema) -> Result<Vec<LineMatcher>, MatcherError> {
    schema
        .filters
        .iter()
        .map(|filter| build_matcher(&schema.tag, filter))
        .collect()
}

/// Compile the filters of every `filter`-mode schema in the registry, keyed by tag.
pub fn compile_registry(
    registry: &LineRegistry,
) -> Result<HashMap<String, Vec<LineMatcher>>, MatcherError> {
    let mut compiled = HashMap::new();
    for schema in registry.iter() {
        if schema.analysis != AnalysisInclusion::Filter {
            continue;
        }
        if schema.filters.is_empty() {
            tracing::warn!(tag = %schema.tag, name = %schema.name, "Filter-mode line type has no filters; it will never pass");
        }
        compiled.insert(schema.tag.clone(), build_schema_matchers(schema)?);
    }
    Ok(compiled)
}
