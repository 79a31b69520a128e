//! Error types for recbook

use std::fmt;
use thiserror::Error;

/// Position in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pos {
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.offset, self.line, self.col)
    }
}

impl Pos {
    pub const fn new(offset: usize, line: u32, col: u32) -> Self {
        Self { offset, line, col }
    }
}

/// Span representing a range in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    pub const fn new(start: Pos, end: Pos) -> Self {
        Self { start, end }
    }

    pub const fn at(pos: Pos) -> Self {
        Self::new(pos, pos)
    }

    pub const fn empty() -> Self {
        Self {
            start: Pos::new(0, 0, 0),
            end: Pos::new(0, 0, 0),
        }
    }
}

/// Error kind for detailed categorization
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed markup
    Syntax,
    MismatchedTag { expected: String, found: String },
    InvalidEntity,
    InvalidUtf8,
    MaxDepthExceeded { max: u16 },
    MaxSizeExceeded { max: usize },
    /// Document root has the wrong name
    InvalidRoot { expected: String, found: String },
    MissingAttribute { element: String, attribute: String },
    InvalidAttribute {
        element: String,
        attribute: String,
        detail: String,
    },
    /// Version text that is not `major[.minor]`
    InvalidVersion { text: String },
    /// Document version outside what this crate can read
    UnsupportedVersion { version: String },
    /// Newer document that the error sink declined to read
    NewerVersionRejected { version: String },
    MissingConfiguration,
    DuplicateConfiguration,
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax => write!(f, "syntax error"),
            Self::MismatchedTag { expected, found } => {
                write!(f, "mismatched closing tag: expected </{expected}>, found </{found}>")
            }
            Self::InvalidEntity => write!(f, "invalid entity reference"),
            Self::InvalidUtf8 => write!(f, "invalid utf-8"),
            Self::MaxDepthExceeded { max } => write!(f, "max depth exceeded: {max}"),
            Self::MaxSizeExceeded { max } => write!(f, "max size exceeded: {max}"),
            Self::InvalidRoot { expected, found } => {
                write!(f, "invalid root element: expected <{expected}>, found <{found}>")
            }
            Self::MissingAttribute { element, attribute } => {
                write!(f, "<{element}> is missing required attribute '{attribute}'")
            }
            Self::InvalidAttribute {
                element,
                attribute,
                detail,
            } => {
                if detail.is_empty() {
                    write!(f, "<{element}> has an invalid value for '{attribute}'")
                } else {
                    write!(
                        f,
                        "<{element}> has an invalid value for '{attribute}': {detail}"
                    )
                }
            }
            Self::InvalidVersion { text } => write!(f, "invalid version: '{text}'"),
            Self::UnsupportedVersion { version } => {
                write!(f, "unsupported document version: {version}")
            }
            Self::NewerVersionRejected { version } => {
                write!(f, "document version {version} is newer than supported")
            }
            Self::MissingConfiguration => write!(f, "missing <Configuration> element"),
            Self::DuplicateConfiguration => {
                write!(f, "more than one <Configuration> element")
            }
            Self::Io => write!(f, "i/o error"),
        }
    }
}

/// Main error type for recbook
#[derive(Error, Clone, Debug, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    span: Span,
    message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, span: Span) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            span,
            message,
        }
    }

    pub fn with_message(kind: ErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    /// Error with no source location, used for semantic (post-parse) failures
    pub fn semantic(kind: ErrorKind) -> Self {
        Self::new(kind, Span::empty())
    }

    pub fn missing_attribute(element: &str, attribute: &str) -> Self {
        Self::semantic(ErrorKind::MissingAttribute {
            element: element.to_string(),
            attribute: attribute.to_string(),
        })
    }

    pub fn invalid_attribute(element: &str, attribute: &str, detail: impl Into<String>) -> Self {
        Self::semantic(ErrorKind::InvalidAttribute {
            element: element.to_string(),
            attribute: attribute.to_string(),
            detail: detail.into(),
        })
    }

    pub fn io(err: &std::io::Error) -> Self {
        Self::with_message(ErrorKind::Io, Span::empty(), err.to_string())
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Create error at specific position
    pub fn at(kind: ErrorKind, offset: usize, line: u32, col: u32) -> Self {
        let pos = Pos::new(offset, line, col);
        Self::new(kind, Span::new(pos, pos))
    }

    /// Whether the error carries a source location
    pub fn has_location(&self) -> bool {
        self.span.start.line > 0
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_location() {
            write!(f, "error at {}: {}", self.span.start, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::io(&err)
    }
}

/// Result type alias for recbook
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pos_display() {
        let pos = Pos::new(42, 10, 5);
        assert_eq!(pos.to_string(), "42:10:5");
    }

    #[test]
    fn test_error_creation() {
        let err = Error::at(ErrorKind::Syntax, 0, 1, 1);
        assert_eq!(err.kind(), &ErrorKind::Syntax);
        assert!(err.has_location());
    }

    #[test]
    fn test_error_display_with_location() {
        let err = Error::at(ErrorKind::InvalidEntity, 10, 2, 5);
        let display = err.to_string();
        assert!(display.contains("error at 10:2:5"));
        assert!(display.contains("invalid entity reference"));
    }

    #[test]
    fn test_semantic_error_display() {
        let err = Error::missing_attribute("Level", "Name");
        assert!(!err.has_location());
        assert_eq!(
            err.to_string(),
            "<Level> is missing required attribute 'Name'"
        );
    }

    #[test]
    fn test_invalid_attribute_detail() {
        let err = Error::invalid_attribute("Configuration", "update", "expected 'y' or 'n'");
        assert!(err.to_string().ends_with("'update': expected 'y' or 'n'"));
        let bare = Error::invalid_attribute("Title", "ValidFrom", "");
        assert_eq!(bare.to_string(), "<Title> has an invalid value for 'ValidFrom'");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert_eq!(err.kind(), &ErrorKind::Io);
        assert_eq!(err.message(), "gone");
    }
}
