//! Error reporting for lines the registry does not know.

/// Receives non-fatal reports from a splitter.
pub trait Notifier {
    /// Called for the first line of each unrecognized type tag seen past the start line
    fn report_unknown_type(&mut self, tag: &str, line: &str);
}

impl<N: Notifier + ?Sized> Notifier for &mut N {
    fn report_unknown_type(&mut self, tag: &str, line: &str) {
        (**self).report_unknown_type(tag, line);
    }
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn report_unknown_type(&mut self, tag: &str, line: &str) {
        (**self).report_unknown_type(tag, line);
    }
}

/// Logs reports through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn report_unknown_type(&mut self, tag: &str, line: &str) {
        tracing::warn!(tag, line, "Unknown line type");
    }
}

/// A single unknown-type report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownType {
    pub tag: String,
    pub line: String,
}

/// Keeps every report, for summaries and tests.
#[derive(Debug, Clone, Default)]
pub struct CollectingNotifier {
    reports: Vec<UnknownType>,
}

impl CollectingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> &[UnknownType] {
        &self.reports
    }

    pub fn tags(&self) -> Vec<String> {
        self.reports.iter().map(|r| r.tag.clone()).collect()
    }
}

impl Notifier for CollectingNotifier {
    fn report_unknown_type(&mut self, tag: &str, line: &str) {
        self.reports.push(UnknownType {
            tag: tag.to_string(),
            line: line.to_string(),
        });
    }
}
