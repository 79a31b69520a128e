//! Point categories outside the normal run scoring

use std::fmt;
use std::str::FromStr;

use super::names::{
    ATTRIB_OTHER_PTS_COUNT, ATTRIB_OTHER_PTS_DEFAULT, ATTRIB_OTHER_PTS_NAME, TREE_OTHER_PTS,
};
use super::{optional, required_name};
use crate::error::{Error, Result};
use crate::merge::Named;
use crate::tree::ElementNode;

/// How other points accumulate
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PointsTally {
    /// Across all runs
    #[default]
    All,
    AllByEvent,
    Level,
    LevelByEvent,
}

impl PointsTally {
    pub const ALL: [Self; 4] = [Self::All, Self::AllByEvent, Self::Level, Self::LevelByEvent];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::AllByEvent => "AllByEvent",
            Self::Level => "Level",
            Self::LevelByEvent => "LevelByEvent",
        }
    }
}

impl fmt::Display for PointsTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PointsTally {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|t| t.as_str() == s).ok_or(())
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OtherPoints {
    pub name: String,
    pub tally: PointsTally,
    pub default_value: f64,
    pub desc: String,
}

impl OtherPoints {
    pub fn new(name: impl Into<String>, tally: PointsTally) -> Self {
        Self {
            name: name.into(),
            tally,
            ..Self::default()
        }
    }

    pub fn load(node: &ElementNode) -> Result<Self> {
        let name = required_name(node, ATTRIB_OTHER_PTS_NAME)?;
        let count = required_name(node, ATTRIB_OTHER_PTS_COUNT)?;
        let tally = count.parse().map_err(|()| {
            let valid: Vec<_> = PointsTally::ALL.iter().map(|t| t.as_str()).collect();
            Error::invalid_attribute(
                TREE_OTHER_PTS,
                ATTRIB_OTHER_PTS_COUNT,
                format!("valid values: {}", valid.join(", ")),
            )
        })?;
        Ok(Self {
            name,
            tally,
            default_value: optional(node, ATTRIB_OTHER_PTS_DEFAULT, 0.0)?,
            desc: node.value(),
        })
    }

    pub fn save(&self, parent: &mut ElementNode) {
        let node = parent.add_element_node(TREE_OTHER_PTS);
        node.add_attrib(ATTRIB_OTHER_PTS_NAME, &self.name);
        node.add_attrib_value(ATTRIB_OTHER_PTS_DEFAULT, &self.default_value);
        node.add_attrib(ATTRIB_OTHER_PTS_COUNT, self.tally.as_str());
        if !self.desc.is_empty() {
            node.set_value(&self.desc);
        }
    }
}

impl Named for OtherPoints {
    fn name(&self) -> &str {
        &self.name
    }
}
