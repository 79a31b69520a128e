//! Calendar site descriptors

use std::collections::BTreeMap;

use super::names::{
    ATTRIB_CAL_SITE_HELP, ATTRIB_CAL_SITE_NAME, ATTRIB_CAL_SITE_SEARCH, ATTRIB_LOC_CODE_CODE,
    ATTRIB_LOC_CODE_NAME, ATTRIB_VENUE_CODE_CODE, ATTRIB_VENUE_CODE_VENUE, TREE_CAL_SITE,
    TREE_CAL_SITE_DESC, TREE_LOC_CODE, TREE_VENUE_CODE,
};
use super::{child_text, optional_string, save_child_text};
use crate::error::{Error, Result};
use crate::merge::Named;
use crate::tree::ElementNode;

/// A site that publishes trial calendars, with the location and venue
/// codes it understands
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalSite {
    pub name: String,
    pub search_url: String,
    pub help_url: String,
    pub desc: String,
    /// Location code to display name
    pub locations: BTreeMap<String, String>,
    /// Site venue code to venue name
    pub venues: BTreeMap<String, String>,
}

impl CalSite {
    pub fn new(name: impl Into<String>, search_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            search_url: search_url.into(),
            ..Self::default()
        }
    }

    pub fn load(node: &ElementNode) -> Result<Self> {
        // present-but-empty is accepted for both required attributes
        let name = node
            .attrib(ATTRIB_CAL_SITE_NAME)
            .ok_or_else(|| Error::missing_attribute(TREE_CAL_SITE, ATTRIB_CAL_SITE_NAME))?;
        let search = node
            .attrib(ATTRIB_CAL_SITE_SEARCH)
            .ok_or_else(|| Error::missing_attribute(TREE_CAL_SITE, ATTRIB_CAL_SITE_SEARCH))?;
        let mut site = Self::new(name, search);
        site.help_url = optional_string(node, ATTRIB_CAL_SITE_HELP);
        site.desc = child_text(node, TREE_CAL_SITE_DESC);

        for child in node.elements() {
            let (map, code_attrib, value_attrib) = match child.name() {
                TREE_LOC_CODE => (&mut site.locations, ATTRIB_LOC_CODE_CODE, ATTRIB_LOC_CODE_NAME),
                TREE_VENUE_CODE => (&mut site.venues, ATTRIB_VENUE_CODE_CODE, ATTRIB_VENUE_CODE_VENUE),
                _ => continue,
            };
            match child.attrib(code_attrib) {
                Some(code) if !code.is_empty() => {
                    map.insert(code.to_string(), optional_string(child, value_attrib));
                }
                _ => {}
            }
        }
        Ok(site)
    }

    pub fn save(&self, parent: &mut ElementNode) {
        let node = parent.add_element_node(TREE_CAL_SITE);
        node.add_attrib(ATTRIB_CAL_SITE_NAME, &self.name);
        node.add_attrib(ATTRIB_CAL_SITE_SEARCH, &self.search_url);
        if !self.help_url.is_empty() {
            node.add_attrib(ATTRIB_CAL_SITE_HELP, &self.help_url);
        }
        save_child_text(node, TREE_CAL_SITE_DESC, &self.desc);
        for (code, name) in &self.locations {
            let loc = node.add_element_node(TREE_LOC_CODE);
            loc.add_attrib(ATTRIB_LOC_CODE_CODE, code);
            loc.add_attrib(ATTRIB_LOC_CODE_NAME, name);
        }
        for (code, venue) in &self.venues {
            let entry = node.add_element_node(TREE_VENUE_CODE);
            entry.add_attrib(ATTRIB_VENUE_CODE_CODE, code);
            if !venue.is_empty() {
                entry.add_attrib(ATTRIB_VENUE_CODE_VENUE, venue);
            }
        }
    }
}

impl Named for CalSite {
    fn name(&self) -> &str {
        &self.name
    }
}
