//! Configuration entity hierarchy
//!
//! Every entity loads from and saves to an [`ElementNode`]. Loading takes a
//! [`LoadContext`] carrying the document's format version, the date format
//! and the error sink; saving appends a child element to a parent node.

pub mod action;
pub mod cal_site;
pub mod configuration;
pub mod division;
pub mod event;
pub mod fault;
pub mod level;
pub mod multi_q;
pub mod names;
pub mod other_points;
pub mod points;
pub mod title;
pub mod venue;

pub use action::{ActionVerb, ConfigAction};
pub use cal_site::CalSite;
pub use configuration::{Configuration, UpdateOutcome};
pub use division::{verify_div_level, Division, SubLevelRemoval};
pub use event::{Event, Scoring, ScoringStyle};
pub use fault::Fault;
pub use level::{Level, SubLevel};
pub use multi_q::{MultiQ, MultiQItem};
pub use other_points::{OtherPoints, PointsTally};
pub use points::{LifetimePoints, PlaceInfo, TitlePoints, TitlePointsKind};
pub use title::Title;
pub use venue::Venue;

use time::Date;
use tracing::warn;

use crate::diagnostics::ErrorSink;
use crate::error::{Error, Result};
use crate::tree::{AttribLookup, AttribValue, DateFormat, ElementNode, Version};

/// State shared by every entity loader during one document load
pub struct LoadContext<'a> {
    /// Format version of the document being read
    pub version: Version,
    pub dates: &'a dyn DateFormat,
    pub errors: &'a mut dyn ErrorSink,
}

impl<'a> LoadContext<'a> {
    pub fn new(version: Version, dates: &'a dyn DateFormat, errors: &'a mut dyn ErrorSink) -> Self {
        Self {
            version,
            dates,
            errors,
        }
    }

    /// Record a child that failed to load and is being left out
    pub(crate) fn skip(&mut self, element: &str, err: &Error) {
        warn!(element, error = %err, "skipping entity");
        self.errors
            .log_message(&format!("Skipped <{element}>: {err}"));
    }
}

impl std::fmt::Debug for LoadContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadContext")
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

/// A required, non-empty string attribute
pub(crate) fn required_name(node: &ElementNode, attrib: &str) -> Result<String> {
    match node.attrib(attrib) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(Error::missing_attribute(node.name(), attrib)),
    }
}

/// An optional string attribute; absent reads as empty
pub(crate) fn optional_string(node: &ElementNode, attrib: &str) -> String {
    node.attrib(attrib).unwrap_or_default().to_string()
}

/// A typed attribute that must be present and valid
pub(crate) fn required<T: AttribValue>(node: &ElementNode, attrib: &str) -> Result<T> {
    match node.get_attrib(attrib) {
        AttribLookup::Found(value) => Ok(value),
        AttribLookup::NotFound => Err(Error::missing_attribute(node.name(), attrib)),
        AttribLookup::Invalid => Err(invalid(node, attrib)),
    }
}

/// A typed attribute that may be absent but must be valid when present
pub(crate) fn optional<T: AttribValue>(node: &ElementNode, attrib: &str, default: T) -> Result<T> {
    match node.get_attrib(attrib) {
        AttribLookup::Found(value) => Ok(value),
        AttribLookup::NotFound => Ok(default),
        AttribLookup::Invalid => Err(invalid(node, attrib)),
    }
}

pub(crate) fn optional_date(
    node: &ElementNode,
    attrib: &str,
    dates: &dyn DateFormat,
) -> Result<Option<Date>> {
    match node.get_attrib_date(attrib, dates) {
        AttribLookup::Found(date) => Ok(Some(date)),
        AttribLookup::NotFound => Ok(None),
        AttribLookup::Invalid => Err(invalid(node, attrib)),
    }
}

fn invalid(node: &ElementNode, attrib: &str) -> Error {
    let value = node.attrib(attrib).unwrap_or_default();
    Error::invalid_attribute(node.name(), attrib, format!("'{value}'"))
}

/// Text of the first child element named `name`, or empty
pub(crate) fn child_text(node: &ElementNode, name: &str) -> String {
    node.elements()
        .find(|child| child.name() == name)
        .map(ElementNode::value)
        .unwrap_or_default()
}

/// Append `<name>text</name>` unless `text` is empty
pub(crate) fn save_child_text(parent: &mut ElementNode, name: &str, text: &str) {
    if !text.is_empty() {
        parent.add_element_node(name).set_value(text);
    }
}
