//! Per-type line schemas.

use serde::{Deserialize, Serialize};

/// How a line type takes part in analysis filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisInclusion {
    /// Always kept
    All,
    /// Kept when one of the schema's filters matches
    Filter,
    /// Never kept
    #[default]
    None,
}

/// What a line type means to the segmenter, with the field positions that meaning needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineRole {
    #[default]
    Generic,
    /// The player changed zones; combatant ids are reassigned by the game
    ZoneChange { id: usize, name: usize },
    CombatantAdded { id: usize, name: usize },
    CombatantRemoved { id: usize, name: usize },
    /// One key/value pair of a substitution batch
    Substitution { key: usize, value: usize },
    /// An action used by a combatant
    Ability { name: usize },
}

impl LineRole {
    /// Field positions referenced by this role.
    fn field_indexes(self) -> Vec<usize> {
        match self {
            LineRole::Generic => Vec::new(),
            LineRole::ZoneChange { id, name }
            | LineRole::CombatantAdded { id, name }
            | LineRole::CombatantRemoved { id, name } => vec![id, name],
            LineRole::Substitution { key, value } => vec![key, value],
            LineRole::Ability { name } => vec![name],
        }
    }
}

/// A single field constraint: the field at `field` must fully match `pattern` (a regex).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldConstraint {
    pub field: usize,
    pub pattern: String,
}

/// A set of constraints that must all hold for a line to match.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FieldFilter {
    #[serde(default)]
    pub fields: Vec<FieldConstraint>,
}

impl FieldFilter {
    pub fn new(constraints: &[(usize, &str)]) -> Self {
        Self {
            fields: constraints
                .iter()
                .map(|(field, pattern)| FieldConstraint {
                    field: *field,
                    pattern: (*pattern).to_string(),
                })
                .collect(),
        }
    }
}

/// Immutable description of one line type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSchema {
    pub tag: String,
    pub name: String,
    #[serde(default)]
    pub role: LineRole,
    /// Every instance seen before the start line is carried into the excerpt
    #[serde(default)]
    pub global_include: bool,
    /// Only the latest instance seen before the start line is carried
    #[serde(default)]
    pub last_include: bool,
    /// Fields that may hold a substitution key
    #[serde(default)]
    pub substitutable_fields: Vec<usize>,
    /// Fields holding combatant ids
    #[serde(default)]
    pub combatant_id_fields: Vec<usize>,
    #[serde(default)]
    pub analysis: AnalysisInclusion,
    #[serde(default)]
    pub filters: Vec<FieldFilter>,
}

impl LineSchema {
    pub fn new(tag: &str, name: &str) -> Self {
        Self {
            tag: tag.to_string(),
            name: name.to_string(),
            role: LineRole::Generic,
            global_include: false,
            last_include: false,
            substitutable_fields: Vec::new(),
            combatant_id_fields: Vec::new(),
            analysis: AnalysisInclusion::None,
            filters: Vec::new(),
        }
    }

    // --- Builder helpers (used by the built-in table and tests) ---

    pub fn role(mut self, role: LineRole) -> Self {
        self.role = role;
        self
    }

    pub fn global(mut self) -> Self {
        self.global_include = true;
        self
    }

    pub fn last(mut self) -> Self {
        self.last_include = true;
        self
    }

    pub fn substitutable(mut self, fields: &[usize]) -> Self {
        self.substitutable_fields = fields.to_vec();
        self
    }

    pub fn combatant_ids(mut self, fields: &[usize]) -> Self {
        self.combatant_id_fields = fields.to_vec();
        self
    }

    pub fn analysis_all(mut self) -> Self {
        self.analysis = AnalysisInclusion::All;
        self
    }

    /// Mark as `filter` and append one filter built from `(field, pattern)` pairs.
    pub fn filter(mut self, constraints: &[(usize, &str)]) -> Self {
        self.analysis = AnalysisInclusion::Filter;
        self.filters.push(FieldFilter::new(constraints));
        self
    }

    // --- Queries ---

    pub fn is_ability(&self) -> bool {
        matches!(self.role, LineRole::Ability { .. })
    }

    /// Check the definition is usable. Field 0 and 1 are the tag and timestamp,
    /// so no role, id, or substitution field may point at them.
    pub fn validate(&self) -> Result<(), String> {
        if self.tag.is_empty() {
            return Err("tag is empty".to_string());
        }
        if self.tag.contains('|') {
            return Err("tag contains the field separator".to_string());
        }

        let reserved = |idx: usize| idx < 2;
        if let Some(idx) = self.role.field_indexes().iter().find(|i| reserved(**i)) {
            return Err(format!("role field {idx} overlaps tag/timestamp"));
        }
        if let Some(idx) = self.substitutable_fields.iter().find(|i| reserved(**i)) {
            return Err(format!("substitutable field {idx} overlaps tag/timestamp"));
        }
        if let Some(idx) = self.combatant_id_fields.iter().find(|i| reserved(**i)) {
            return Err(format!("combatant id field {idx} overlaps tag/timestamp"));
        }
        if self.analysis != AnalysisInclusion::Filter && !self.filters.is_empty() {
            return Err("filters given but analysis inclusion is not `filter`".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_schema_toml() {
        let toml = r#"
tag = "21"
name = "Ability"
substitutable_fields = [5]
combatant_id_fields = [2]
analysis = "filter"

[role]
kind = "ability"
name = 5

[[filters]]
fields = [{ field = 2, pattern = "4[0-9A-F]{7}" }]
"#;
        let schema: LineSchema = toml::from_str(toml).unwrap();
        assert_eq!(schema.role, LineRole::Ability { name: 5 });
        assert_eq!(schema.analysis, AnalysisInclusion::Filter);
        assert_eq!(schema.filters[0].fields[0].field, 2);
        assert!(!schema.global_include);
        assert!(schema.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_reserved_fields() {
        let schema = LineSchema::new("99", "Broken").combatant_ids(&[1]);
        assert!(schema.validate().is_err());

        let schema = LineSchema::new("99", "Broken").role(LineRole::Ability { name: 0 });
        assert!(schema.validate().is_err());

        let schema = LineSchema::new("", "Broken");
        assert!(schema.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_filters_without_filter_inclusion() {
        let mut schema = LineSchema::new("99", "Odd").filter(&[(2, "x")]);
        schema.analysis = AnalysisInclusion::All;
        assert!(schema.validate().is_err());
    }
}
