//! Titles a venue awards

use time::Date;

use super::names::{
    ATTRIB_TITLES_INCREMENT, ATTRIB_TITLES_LONG_NAME, ATTRIB_TITLES_MULTIPLE,
    ATTRIB_TITLES_NAME, ATTRIB_TITLES_ON_FIRST, ATTRIB_TITLES_PREFIX, ATTRIB_TITLES_START_AT,
    ATTRIB_TITLES_VALID_FROM, ATTRIB_TITLES_VALID_TO, TREE_TITLES,
};
use super::{optional, optional_date, optional_string, required_name, LoadContext};
use crate::error::Result;
use crate::merge::Named;
use crate::tree::{AttribLookup, DateFormat, ElementNode, Version};

/// Format version that replaced `Multiple` with start/increment/on-first
const SPLIT_MULTIPLE: Version = Version::new(14, 0);

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Title {
    pub name: String,
    pub long_name: String,
    pub desc: String,
    /// Shown before the dog's name rather than after
    pub prefix: bool,
    pub valid_from: Option<Date>,
    pub valid_to: Option<Date>,
    /// First instance number of a repeatable title; 0 if not repeatable
    pub multiple_start_at: i16,
    pub multiple_increment: u16,
    /// Number the first instance too
    pub multiple_on_first: bool,
}

impl Default for Title {
    fn default() -> Self {
        Self {
            name: String::new(),
            long_name: String::new(),
            desc: String::new(),
            prefix: false,
            valid_from: None,
            valid_to: None,
            multiple_start_at: 0,
            multiple_increment: 1,
            multiple_on_first: false,
        }
    }
}

impl Title {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn is_repeatable(&self) -> bool {
        self.multiple_start_at > 0
    }

    pub fn load(node: &ElementNode, ctx: &mut LoadContext<'_>) -> Result<Self> {
        let mut title = Self {
            name: required_name(node, ATTRIB_TITLES_NAME)?,
            long_name: optional_string(node, ATTRIB_TITLES_LONG_NAME),
            desc: node.value(),
            prefix: optional(node, ATTRIB_TITLES_PREFIX, false)?,
            valid_from: optional_date(node, ATTRIB_TITLES_VALID_FROM, ctx.dates)?,
            valid_to: optional_date(node, ATTRIB_TITLES_VALID_TO, ctx.dates)?,
            ..Self::default()
        };

        if ctx.version < SPLIT_MULTIPLE {
            match node.get_attrib::<i16>(ATTRIB_TITLES_MULTIPLE) {
                AttribLookup::Found(1) => {
                    title.multiple_start_at = 1;
                    title.multiple_on_first = true;
                }
                AttribLookup::Found(2) => {
                    title.multiple_start_at = 1;
                    title.multiple_on_first = false;
                }
                _ => {}
            }
        } else {
            title.multiple_start_at = optional(node, ATTRIB_TITLES_START_AT, 0)?;
        }

        if title.is_repeatable() {
            title.multiple_increment = optional(node, ATTRIB_TITLES_INCREMENT, 1)?;
            title.multiple_on_first =
                optional(node, ATTRIB_TITLES_ON_FIRST, title.multiple_on_first)?;
        }
        Ok(title)
    }

    pub fn save(&self, parent: &mut ElementNode, dates: &dyn DateFormat) {
        let node = parent.add_element_node(TREE_TITLES);
        node.add_attrib(ATTRIB_TITLES_NAME, &self.name);
        if !self.long_name.is_empty() {
            node.add_attrib(ATTRIB_TITLES_LONG_NAME, &self.long_name);
        }
        if !self.desc.is_empty() {
            node.set_value(&self.desc);
        }
        if self.prefix {
            node.add_attrib_value(ATTRIB_TITLES_PREFIX, &self.prefix);
        }
        if let Some(date) = self.valid_from {
            node.add_attrib_date(ATTRIB_TITLES_VALID_FROM, date, dates);
        }
        if let Some(date) = self.valid_to {
            node.add_attrib_date(ATTRIB_TITLES_VALID_TO, date, dates);
        }
        if self.is_repeatable() {
            node.add_attrib_value(ATTRIB_TITLES_START_AT, &self.multiple_start_at);
            if self.multiple_increment > 1 {
                node.add_attrib_value(ATTRIB_TITLES_INCREMENT, &self.multiple_increment);
            }
            if self.multiple_on_first {
                node.add_attrib_value(ATTRIB_TITLES_ON_FIRST, &self.multiple_on_first);
            }
        }
    }

    /// Whether the title could be earned on `date`
    pub fn is_valid_on(&self, date: Date) -> bool {
        self.valid_from.map_or(true, |from| from <= date)
            && self.valid_to.map_or(true, |to| date <= to)
    }
}

impl Named for Title {
    fn name(&self) -> &str {
        &self.name
    }
}
