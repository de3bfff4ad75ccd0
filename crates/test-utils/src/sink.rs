use vc6batch::batch::LogSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

/// Sink that keeps every line for later assertions.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub lines: Vec<(Severity, String)>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn infos(&self) -> Vec<&str> {
        self.with_severity(Severity::Info)
    }

    pub fn errors(&self) -> Vec<&str> {
        self.with_severity(Severity::Error)
    }

    fn with_severity(&self, severity: Severity) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|(s, _)| *s == severity)
            .map(|(_, line)| line.as_str())
            .collect()
    }
}

impl LogSink for RecordingSink {
    fn info(&mut self, message: &str) {
        self.lines.push((Severity::Info, message.to_string()));
    }

    fn error(&mut self, message: &str) {
        self.lines.push((Severity::Error, message.to_string()));
    }
}
