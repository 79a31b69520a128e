//! Document version numbers

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, ErrorKind};

/// A `major.minor` document version, ordered by major then minor
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Version {
    major: u16,
    minor: u16,
}

impl Version {
    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }

    pub const fn major(self) -> u16 {
        self.major
    }

    pub const fn minor(self) -> u16 {
        self.minor
    }
}

impl FromStr for Version {
    type Err = Error;

    /// `"major.minor"`, or a bare `"major"` meaning minor 0
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::semantic(ErrorKind::InvalidVersion {
            text: s.to_string(),
        });
        let (major, minor) = match s.split_once('.') {
            Some((major, minor)) => (major, Some(minor)),
            None => (s, None),
        };
        let major = parse_component(major).ok_or_else(invalid)?;
        let minor = match minor {
            Some(minor) => parse_component(minor).ok_or_else(invalid)?,
            None => 0,
        };
        Ok(Self { major, minor })
    }
}

fn parse_component(text: &str) -> Option<u16> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
