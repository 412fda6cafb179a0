//! Default-deny analysis filter.
//!
//! Narrows a segment to lines useful for post-hoc encounter analysis. Checks
//! run cheapest first: inclusion policy, ignored combatants, ignored
//! abilities, then the compiled per-type matchers.

use hashbrown::{HashMap, HashSet};

use crate::game_data::{is_ignored_ability_name, is_ignored_combatant_name};
use crate::line::LogLine;
use crate::matcher::{LineMatcher, MatcherError, compile_registry};
use crate::registry::{AnalysisInclusion, LineRegistry, LineRole, LineSchema};

#[derive(Debug, Clone)]
pub struct AnalysisFilter {
    matchers: HashMap<String, Vec<LineMatcher>>,
    /// Ids of live combatants whose name is on the ignore list.
    /// Only a matching remove line takes an id out; zone changes do not.
    ignored_ids: HashSet<String>,
}

impl AnalysisFilter {
    pub fn new(registry: &LineRegistry) -> Result<Self, MatcherError> {
        Ok(Self {
            matchers: compile_registry(registry)?,
            ignored_ids: HashSet::new(),
        })
    }

    /// Track ignored combatants. Must see every line, in order, whether or not
    /// the line is later tested with [`passes`](Self::passes).
    pub fn observe(&mut self, line: &LogLine<'_>, schema: &LineSchema) {
        match schema.role {
            LineRole::CombatantAdded { id, name } => {
                if let (Some(id), Some(name)) = (line.field(id), line.field(name))
                    && is_ignored_combatant_name(name)
                {
                    self.ignored_ids.insert(id.to_string());
                }
            }
            LineRole::CombatantRemoved { id, .. } => {
                if let Some(id) = line.field(id) {
                    self.ignored_ids.remove(id);
                }
            }
            _ => {}
        }
    }

    pub fn passes(&self, line: &LogLine<'_>, schema: &LineSchema) -> bool {
        match schema.analysis {
            AnalysisInclusion::All => return true,
            AnalysisInclusion::None => return false,
            AnalysisInclusion::Filter => {}
        }

        if self.references_ignored_combatant(line, schema) {
            return false;
        }

        if let LineRole::Ability { name } = schema.role
            && line.field(name).is_some_and(is_ignored_ability_name)
        {
            return false;
        }

        self.matchers
            .get(schema.tag.as_str())
            .is_some_and(|matchers| matchers.iter().any(|m| m.matches(line)))
    }

    fn references_ignored_combatant(&self, line: &LogLine<'_>, schema: &LineSchema) -> bool {
        schema
            .combatant_id_fields
            .iter()
            .filter_map(|idx| line.field(*idx))
            .any(|id| self.ignored_ids.contains(id))
    }

    pub fn is_ignored(&self, id: &str) -> bool {
        self.ignored_ids.contains(id)
    }

    pub fn ignored_count(&self) -> usize {
        self.ignored_ids.len()
    }

    pub fn clear(&mut self) {
        self.ignored_ids.clear();
    }
}
