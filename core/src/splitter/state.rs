//! Mutable state carried by a splitter across lines.
//!
//! All three containers remember insertion order through a sequence number so
//! the flush batch is deterministic before it is re-sorted by timestamp.

use hashbrown::HashMap;

#[derive(Debug, Clone)]
struct Sequenced {
    line: String,
    seq: u64,
}

fn ordered_lines<'a>(entries: impl Iterator<Item = &'a Sequenced>) -> Vec<&'a str> {
    let mut entries: Vec<&Sequenced> = entries.collect();
    entries.sort_by_key(|e| e.seq);
    entries.into_iter().map(|e| e.line.as_str()).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Combatants
// ─────────────────────────────────────────────────────────────────────────────

/// Live combatants: id → the latest line that added it.
#[derive(Debug, Clone, Default)]
pub struct CombatantRegistry {
    added: HashMap<String, Sequenced>,
    next_seq: u64,
}

impl CombatantRegistry {
    /// Insert or refresh the record for `id`
    pub fn upsert(&mut self, id: &str, line: &str) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.added.insert(
            id.to_string(),
            Sequenced {
                line: line.to_string(),
                seq,
            },
        );
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.added.remove(id).is_some()
    }

    /// Drop every record; the game reassigns ids on zone change
    pub fn clear(&mut self) {
        self.added.clear();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.added.contains_key(id)
    }

    pub fn added_line(&self, id: &str) -> Option<&str> {
        self.added.get(id).map(|e| e.line.as_str())
    }

    pub fn len(&self) -> usize {
        self.added.len()
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
    }

    /// Added lines in the order they were last upserted
    pub fn lines(&self) -> Vec<&str> {
        ordered_lines(self.added.values())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Substitutions
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct Substitution {
    value: String,
    source: Sequenced,
}

/// Key → value table of the current substitution batch.
///
/// A batch is *settled* once a zone change is seen after its last line; the
/// next substitution line then starts a fresh batch.
#[derive(Debug, Clone, Default)]
pub struct SubstitutionBatch {
    entries: HashMap<String, Substitution>,
    settled: bool,
    next_seq: u64,
}

impl SubstitutionBatch {
    /// Record one key/value pair along with the line that defined it
    pub fn record(&mut self, key: &str, value: &str, line: &str) {
        if self.settled {
            tracing::debug!(stale_keys = self.entries.len(), "New substitution batch");
            self.entries.clear();
            self.settled = false;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert(
            key.to_string(),
            Substitution {
                value: value.to_string(),
                source: Sequenced {
                    line: line.to_string(),
                    seq,
                },
            },
        );
    }

    /// Mark the batch as complete
    pub fn settle(&mut self) {
        self.settled = true;
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    pub fn resolve(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|s| s.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.settled = false;
    }

    /// Defining lines in arrival order
    pub fn lines(&self) -> Vec<&str> {
        ordered_lines(self.entries.values().map(|s| &s.source))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Pre-start buffers
// ─────────────────────────────────────────────────────────────────────────────

/// Lines held back until streaming starts.
#[derive(Debug, Clone, Default)]
pub struct BufferSet {
    global_lines: Vec<String>,
    last_include: HashMap<String, Sequenced>,
    next_seq: u64,
}

impl BufferSet {
    pub fn push_global(&mut self, line: &str) {
        self.global_lines.push(line.to_string());
    }

    /// Keep only the latest line of `tag`
    pub fn set_last(&mut self, tag: &str, line: &str) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.last_include.insert(
            tag.to_string(),
            Sequenced {
                line: line.to_string(),
                seq,
            },
        );
    }

    pub fn global_lines(&self) -> &[String] {
        &self.global_lines
    }

    pub fn last_line(&self, tag: &str) -> Option<&str> {
        self.last_include.get(tag).map(|e| e.line.as_str())
    }

    /// Latest line per type, in the order each type was last updated
    pub fn last_lines(&self) -> Vec<&str> {
        ordered_lines(self.last_include.values())
    }

    pub fn len(&self) -> usize {
        self.global_lines.len() + self.last_include.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.global_lines.clear();
        self.last_include.clear();
    }
}
