//! Document source abstraction

use std::path::Path;

use crate::error::Result;

/// A document to be parsed, borrowed or read from disk
#[derive(Clone, Debug)]
pub struct Input<'a> {
    source: std::borrow::Cow<'a, [u8]>,
    filename: Option<String>,
}

impl<'a> Input<'a> {
    /// Create from byte slice
    pub fn from_bytes(source: &'a [u8]) -> Self {
        Self {
            source: std::borrow::Cow::Borrowed(source),
            filename: None,
        }
    }

    /// Create from string
    pub fn from_str(source: &'a str) -> Self {
        Self::from_bytes(source.as_bytes())
    }

    /// Read a whole file; the path becomes the diagnostic label
    pub fn from_path(path: impl AsRef<Path>) -> Result<Input<'static>> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        Ok(Input {
            source: std::borrow::Cow::Owned(bytes),
            filename: Some(path.display().to_string()),
        })
    }

    /// Set filename for error reporting
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.source
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    pub fn len(&self) -> usize {
        self.source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }
}

impl<'a> From<&'a str> for Input<'a> {
    fn from(s: &'a str) -> Self {
        Self::from_str(s)
    }
}

impl<'a> From<&'a [u8]> for Input<'a> {
    fn from(b: &'a [u8]) -> Self {
        Self::from_bytes(b)
    }
}
