//! One-time flush of buffered pre-start state.
//!
//! When streaming begins the consumer has seen nothing yet, so everything it
//! needs to make sense of the excerpt is emitted at once: buffered globals and
//! last-per-type lines, live combatants, the live substitution batch and the
//! start line, re-sorted by timestamp and type.

use super::state::{BufferSet, CombatantRegistry, SubstitutionBatch};
use crate::line::LineSortKey;

/// Which buffers a flush draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushStrategy {
    /// Everything needed to replay the excerpt in isolation
    Replay,
    /// Only what survives the analysis filter; globals and last-per-type lines are dropped
    Analysis,
}

impl FlushStrategy {
    fn carries_setup_lines(self) -> bool {
        matches!(self, FlushStrategy::Replay)
    }

    fn filters_state_lines(self) -> bool {
        matches!(self, FlushStrategy::Analysis)
    }
}

/// Live state handed to the flush.
pub struct FlushSources<'a> {
    pub buffers: &'a BufferSet,
    pub combatants: &'a CombatantRegistry,
    pub substitutions: &'a SubstitutionBatch,
    /// Held start line; `None` when it was refused by the filter
    pub start_line: Option<&'a str>,
    /// Line that triggered the flush; it is emitted right after the batch
    pub pending_line: Option<&'a str>,
}

/// Assemble and sort the flush batch.
///
/// `admit` decides whether a combatant or substitution line is kept; it is
/// only consulted by strategies that filter state lines. A given start line
/// is always kept and never duplicated. The pending line is left out, since
/// it is emitted on its own.
pub fn assemble(
    strategy: FlushStrategy,
    sources: FlushSources<'_>,
    mut admit: impl FnMut(&str) -> bool,
) -> Vec<String> {
    let FlushSources {
        buffers,
        combatants,
        substitutions,
        start_line,
        pending_line,
    } = sources;

    let mut batch: Vec<String> = Vec::with_capacity(
        buffers.len() + combatants.len() + substitutions.len() + 1,
    );

    if strategy.carries_setup_lines() {
        batch.extend(buffers.global_lines().iter().cloned());
        batch.extend(buffers.last_lines().into_iter().map(str::to_string));
    }

    let state_lines = combatants.lines().into_iter().chain(substitutions.lines());
    for line in state_lines {
        if start_line == Some(line) || pending_line == Some(line) {
            continue;
        }
        if strategy.filters_state_lines() && !admit(line) {
            continue;
        }
        batch.push(line.to_string());
    }

    batch.extend(start_line.map(str::to_string));

    // Stable: lines with equal keys keep assembly order
    batch.sort_by_cached_key(|line| LineSortKey::of(line));
    batch
}
