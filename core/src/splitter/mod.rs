//! Encounter segmentation engine.
//!
//! The splitter turns an unbounded stream of raw log lines into one
//! self-contained excerpt bounded by a start line and a stop line:
//! - NotStarted: Lines only update state, nothing is emitted
//! - Buffering: Start line seen; setup lines (globals, last-per-type) are still absorbed
//! - Streaming: Lines pass through, optionally via the analysis filter
//!
//! The first non-setup line after the start line triggers a one-time flush of
//! everything a consumer needs to read the excerpt on its own. State is
//! maintained from the very first line, so the flush reflects the whole
//! history of the stream even though nothing before the start line is emitted.

mod analysis;
mod flush;
mod state;


pub use analysis::AnalysisFilter;
pub use flush::{FlushSources, FlushStrategy};
pub use state::{BufferSet, CombatantRegistry, SubstitutionBatch};

use std::borrow::Cow;
use std::sync::Arc;

use hashbrown::HashSet;
use serde::Serialize;

use crate::line::LogLine;
use crate::matcher::MatcherError;
use crate::notify::{Notifier, TracingNotifier};
use crate::registry::{LineRegistry, LineRole, LineSchema};

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Constructor-time configuration of a splitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitterConfig {
    /// Exact text of the first line of the excerpt; `None` starts at the first line
    pub start_line: Option<String>,
    /// Exact text of the last line of the excerpt (inclusive); `None` never stops
    pub stop_line: Option<String>,
    /// Honor `global_include` line types
    pub include_globals: bool,
    /// Narrow the excerpt with the analysis filter
    pub analysis_filter: bool,
}

impl SplitterConfig {
    pub fn new(start_line: impl Into<String>, stop_line: impl Into<String>) -> Self {
        Self {
            start_line: Some(start_line.into()),
            stop_line: Some(stop_line.into()),
            include_globals: true,
            analysis_filter: false,
        }
    }

    /// Process a whole stream: start at the first line, never stop
    pub fn process_all() -> Self {
        Self {
            start_line: None,
            stop_line: None,
            include_globals: true,
            analysis_filter: false,
        }
    }

    pub fn with_globals(mut self, include_globals: bool) -> Self {
        self.include_globals = include_globals;
        self
    }

    pub fn with_analysis_filter(mut self, analysis_filter: bool) -> Self {
        self.analysis_filter = analysis_filter;
        self
    }

    fn flush_strategy(&self) -> FlushStrategy {
        if self.analysis_filter {
            FlushStrategy::Analysis
        } else {
            FlushStrategy::Replay
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Output
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    NotStarted,
    Buffering,
    Streaming,
}

/// What a single `process` call produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emit {
    /// Still buffering, already stopped, or filtered out
    Nothing,
    /// Normal pass-through
    Line(String),
    /// The one-time flush, followed by the line that triggered it when that line survived filtering
    Flush {
        batch: Vec<String>,
        line: Option<String>,
    },
}

impl Emit {
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn len(&self) -> usize {
        match self {
            Emit::Nothing => 0,
            Emit::Line(_) => 1,
            Emit::Flush { batch, line } => batch.len() + usize::from(line.is_some()),
        }
    }

    /// Borrow every emitted line, in output order
    pub fn lines(&self) -> Vec<&str> {
        match self {
            Emit::Nothing => Vec::new(),
            Emit::Line(line) => vec![line.as_str()],
            Emit::Flush { batch, line } => batch
                .iter()
                .map(String::as_str)
                .chain(line.as_deref())
                .collect(),
        }
    }
}

impl IntoIterator for Emit {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        match self {
            Emit::Nothing => Vec::new().into_iter(),
            Emit::Line(line) => vec![line].into_iter(),
            Emit::Flush { mut batch, line } => {
                batch.extend(line);
                batch.into_iter()
            }
        }
    }
}

/// Counters kept by a splitter over its lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SplitStats {
    /// Lines handed to `process` before the engine stopped
    pub lines_seen: u64,
    pub lines_emitted: u64,
    /// Size of the flush batch (0 until streaming starts)
    pub flushed: u64,
    pub dropped_by_filter: u64,
    /// Lines of unknown type seen past the start line
    pub unknown_lines: u64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Splitter
// ─────────────────────────────────────────────────────────────────────────────

/// Single-stream segmentation engine. One instance per stream; instances share
/// nothing but the read-only registry.
pub struct Splitter<N: Notifier = TracingNotifier> {
    config: SplitterConfig,
    registry: Arc<LineRegistry>,
    notifier: N,
    analysis: Option<AnalysisFilter>,

    phase: Phase,
    stopped: bool,
    /// Decoded start line, held until the flush
    held_start: Option<String>,
    buffers: BufferSet,
    combatants: CombatantRegistry,
    substitutions: SubstitutionBatch,
    reported_tags: HashSet<String>,
    stats: SplitStats,
}

impl Splitter<TracingNotifier> {
    pub fn new(config: SplitterConfig, registry: Arc<LineRegistry>) -> Result<Self, MatcherError> {
        Self::with_notifier(config, registry, TracingNotifier)
    }
}

impl<N: Notifier> Splitter<N> {
    /// Build a splitter reporting unknown types to `notifier`.
    ///
    /// In analysis mode every filter of the registry is compiled here; an
    /// invalid pattern fails construction.
    pub fn with_notifier(
        config: SplitterConfig,
        registry: Arc<LineRegistry>,
        notifier: N,
    ) -> Result<Self, MatcherError> {
        let analysis = if config.analysis_filter {
            Some(AnalysisFilter::new(&registry)?)
        } else {
            None
        };

        Ok(Self {
            config,
            registry,
            notifier,
            analysis,
            phase: Phase::NotStarted,
            stopped: false,
            held_start: None,
            buffers: BufferSet::default(),
            combatants: CombatantRegistry::default(),
            substitutions: SubstitutionBatch::default(),
            reported_tags: HashSet::new(),
            stats: SplitStats::default(),
        })
    }

    // --- Accessors ---

    /// True once the stop line has been processed
    pub fn is_done(&self) -> bool {
        self.stopped
    }

    /// True once the start line has been seen
    pub fn was_started(&self) -> bool {
        self.phase != Phase::NotStarted
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &SplitterConfig {
        &self.config
    }

    pub fn stats(&self) -> SplitStats {
        self.stats
    }

    pub fn combatants(&self) -> &CombatantRegistry {
        &self.combatants
    }

    pub fn substitutions(&self) -> &SubstitutionBatch {
        &self.substitutions
    }

    pub fn analysis_filter(&self) -> Option<&AnalysisFilter> {
        self.analysis.as_ref()
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn into_notifier(self) -> N {
        self.notifier
    }

    /// Return to `NotStarted` with all stream state cleared. Configuration and
    /// compiled matchers are kept.
    pub fn reset(&mut self) {
        self.phase = Phase::NotStarted;
        self.stopped = false;
        self.held_start = None;
        self.buffers.clear();
        self.combatants.clear();
        self.substitutions.clear();
        self.reported_tags.clear();
        self.stats = SplitStats::default();
        if let Some(filter) = &mut self.analysis {
            filter.clear();
        }
    }

    // --- Processing ---

    /// Feed the next line of the stream.
    pub fn process(&mut self, line: &str) -> Emit {
        if self.stopped {
            return Emit::Nothing;
        }
        self.stats.lines_seen += 1;

        if self.config.stop_line.as_deref() == Some(line) {
            tracing::debug!(started = self.was_started(), "Stop line reached");
            self.stopped = true;
        }

        let is_start = self.phase == Phase::NotStarted
            && self
                .config
                .start_line
                .as_deref()
                .is_none_or(|start| start == line);

        let decoded = self.decode_line(line);
        let parsed = LogLine::parse(&decoded);
        let registry = Arc::clone(&self.registry);
        let schema = registry.get(parsed.tag());

        self.maintain_state(&parsed, schema);

        let emit = match self.phase {
            Phase::NotStarted if is_start => {
                tracing::debug!(
                    buffered = self.buffers.len(),
                    combatants = self.combatants.len(),
                    substitutions = self.substitutions.len(),
                    "Start line reached"
                );
                if schema.is_none() {
                    self.stats.unknown_lines += 1;
                    self.report_unknown(&parsed);
                }
                self.phase = Phase::Buffering;
                self.held_start = Some(parsed.raw().to_string());
                Emit::Nothing
            }
            Phase::NotStarted => {
                if let Some(schema) = schema {
                    self.buffer_setup_line(&parsed, schema);
                }
                Emit::Nothing
            }
            Phase::Buffering if schema.is_some_and(|s| self.is_setup_line(s)) => {
                if let Some(schema) = schema {
                    self.buffer_setup_line(&parsed, schema);
                }
                Emit::Nothing
            }
            Phase::Buffering => {
                let batch = self.flush(Some(parsed.raw()));
                self.phase = Phase::Streaming;
                let line = self.stream_line(&parsed, schema);
                Emit::Flush { batch, line }
            }
            Phase::Streaming => match self.stream_line(&parsed, schema) {
                Some(line) => Emit::Line(line),
                None => Emit::Nothing,
            },
        };

        // Stopped before any non-setup line: the excerpt is the flush alone
        let emit = if self.stopped && self.phase == Phase::Buffering {
            self.phase = Phase::Streaming;
            Emit::Flush {
                batch: self.flush(None),
                line: None,
            }
        } else {
            emit
        };

        self.stats.lines_emitted += emit.len() as u64;
        emit
    }

    /// Feed lines until the stream ends or the stop line is processed,
    /// handing every emitted line to `sink`.
    pub fn run<'a, I, E>(
        &mut self,
        lines: I,
        mut sink: impl FnMut(String) -> Result<(), E>,
    ) -> Result<(), E>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for line in lines {
            for out in self.process(line) {
                sink(out)?;
            }
            if self.stopped {
                break;
            }
        }
        Ok(())
    }

    /// Replace substitution keys in the line's substitutable fields.
    /// Lines with nothing to replace are returned as-is.
    pub fn decode_line<'l>(&self, line: &'l str) -> Cow<'l, str> {
        if self.substitutions.is_empty() {
            return Cow::Borrowed(line);
        }
        let parsed = LogLine::parse(line);
        let Some(schema) = self.registry.get(parsed.tag()) else {
            return Cow::Borrowed(line);
        };

        let replacements: Vec<(usize, &str)> = schema
            .substitutable_fields
            .iter()
            .filter_map(|&idx| {
                let key = parsed.field(idx)?;
                self.substitutions.resolve(key).map(|value| (idx, value))
            })
            .collect();

        if replacements.is_empty() {
            Cow::Borrowed(line)
        } else {
            Cow::Owned(parsed.with_fields(&replacements))
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    /// Registry upkeep that happens for every line regardless of phase.
    fn maintain_state(&mut self, line: &LogLine<'_>, schema: Option<&LineSchema>) {
        let Some(schema) = schema else {
            return;
        };

        match schema.role {
            LineRole::ZoneChange { .. } => {
                self.combatants.clear();
                self.substitutions.settle();
            }
            LineRole::CombatantAdded { id, .. } => {
                if let Some(id) = line.field(id) {
                    self.combatants.upsert(id, line.raw());
                }
            }
            LineRole::CombatantRemoved { id, .. } => {
                if let Some(id) = line.field(id) {
                    self.combatants.remove(id);
                }
            }
            LineRole::Substitution { key, value } => {
                if let (Some(key), Some(value)) = (line.field(key), line.field(value)) {
                    self.substitutions.record(key, value, line.raw());
                }
            }
            LineRole::Ability { .. } | LineRole::Generic => {}
        }

        if let Some(filter) = &mut self.analysis {
            filter.observe(line, schema);
        }
    }

    fn is_setup_line(&self, schema: &LineSchema) -> bool {
        (schema.global_include && self.config.include_globals) || schema.last_include
    }

    fn buffer_setup_line(&mut self, line: &LogLine<'_>, schema: &LineSchema) {
        if schema.global_include && self.config.include_globals {
            self.buffers.push_global(line.raw());
        } else if schema.last_include {
            self.buffers.set_last(&schema.tag, line.raw());
        }
    }

    fn flush(&mut self, pending_line: Option<&str>) -> Vec<String> {
        let start_line = self.held_start.take().unwrap_or_default();

        // Without a configured start line the first line is just the first
        // line of the stream, so analysis mode filters it like any other.
        let keep_start = self.config.start_line.is_some()
            || self.analysis.is_none()
            || self.admits(&start_line);
        if !keep_start {
            self.stats.dropped_by_filter += 1;
        }

        let batch = flush::assemble(
            self.config.flush_strategy(),
            FlushSources {
                buffers: &self.buffers,
                combatants: &self.combatants,
                substitutions: &self.substitutions,
                start_line: keep_start.then_some(start_line.as_str()),
                pending_line,
            },
            |raw| self.admits(raw),
        );

        self.buffers.clear();
        self.stats.flushed = batch.len() as u64;
        tracing::debug!(lines = batch.len(), strategy = ?self.config.flush_strategy(), "Flushed pre-start state");
        batch
    }

    /// Whether a raw line survives the analysis filter. Unknown types never do.
    fn admits(&self, raw: &str) -> bool {
        let line = LogLine::parse(raw);
        match (&self.analysis, self.registry.get(line.tag())) {
            (Some(filter), Some(schema)) => filter.passes(&line, schema),
            (None, Some(_)) => true,
            (_, None) => false,
        }
    }

    /// Streaming-phase handling of one line. Returns the line to emit, if any.
    fn stream_line(&mut self, line: &LogLine<'_>, schema: Option<&LineSchema>) -> Option<String> {
        let Some(schema) = schema else {
            self.stats.unknown_lines += 1;
            self.report_unknown(line);
            if self.analysis.is_some() {
                self.stats.dropped_by_filter += 1;
                return None;
            }
            return Some(line.raw().to_string());
        };

        if let Some(filter) = &self.analysis
            && !filter.passes(line, schema)
        {
            self.stats.dropped_by_filter += 1;
            return None;
        }

        Some(line.raw().to_string())
    }

    fn report_unknown(&mut self, line: &LogLine<'_>) {
        let tag = line.tag();
        if self.reported_tags.insert(tag.to_string()) {
            self.notifier.report_unknown_type(tag, line.raw());
        }
    }
}
