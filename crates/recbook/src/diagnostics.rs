//! Collected parse and load messages

use std::fmt;

use crate::error::{Error, Pos};

/// How serious a reported problem is
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    Warning,
    Error,
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
            Self::Fatal => write!(f, "fatal"),
        }
    }
}

/// One collected message
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostic {
    pub severity: Severity,
    pub pos: Option<Pos>,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.pos {
            Some(pos) => write!(
                f,
                "{}:{}: {}: {}",
                pos.line, pos.col, self.severity, self.message
            ),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

/// Receives problems found while turning a tree into configuration entities.
///
/// `log_message` records a problem that does not stop loading. `on_error`
/// asks whether loading should continue past a condition that would
/// otherwise abort it, such as a document written by a newer release.
pub trait ErrorSink {
    fn log_message(&mut self, message: &str);

    fn on_error(&mut self, message: &str) -> bool {
        self.log_message(message);
        false
    }
}

/// Accumulates parse and load messages in the order they were reported
#[derive(Clone, Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
    filename: Option<String>,
    accept_newer: bool,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `on_error` confirmations with "continue"
    pub fn accepting_newer(mut self) -> Self {
        self.accept_newer = true;
        self
    }

    /// Prefix rendered messages with a file name
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn push(&mut self, severity: Severity, pos: Option<Pos>, message: impl Into<String>) {
        let message = message.into();
        match severity {
            Severity::Warning => tracing::warn!(%message, "diagnostic"),
            Severity::Error | Severity::Fatal => tracing::debug!(%severity, %message, "diagnostic"),
        }
        self.entries.push(Diagnostic {
            severity,
            pos,
            message,
        });
    }

    /// Record an error value, keeping its location if it has one
    pub fn push_error(&mut self, severity: Severity, err: &Error) {
        let pos = err.has_location().then(|| err.span().start);
        self.push(severity, pos, err.message());
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.severity >= Severity::Error)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            if let Some(filename) = &self.filename {
                write!(f, "{filename}:")?;
            }
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}

impl ErrorSink for Diagnostics {
    fn log_message(&mut self, message: &str) {
        self.push(Severity::Error, None, message);
    }

    fn on_error(&mut self, message: &str) -> bool {
        self.push(Severity::Warning, None, message);
        self.accept_newer
    }
}
