//! Multiple-qualification rules: a set of qualifying runs that together earn
//! an extra award

use std::collections::BTreeSet;

use time::Date;

use super::division::Division;
use super::event::Event;
use super::names::{
    ATTRIB_MULTI_Q_ITEM_DIVISION, ATTRIB_MULTI_Q_ITEM_EVENT, ATTRIB_MULTI_Q_ITEM_LEVEL,
    ATTRIB_MULTI_Q_NAME, ATTRIB_MULTI_Q_SHORT_NAME, ATTRIB_MULTI_Q_VALID_FROM,
    ATTRIB_MULTI_Q_VALID_TO, TREE_MULTI_Q, TREE_MULTI_Q_ITEM,
};
use super::{optional_date, required_name, LoadContext};
use crate::error::{Error, Result};
use crate::merge::Named;
use crate::tree::{DateFormat, ElementNode};

/// One run that must qualify
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MultiQItem {
    pub division: String,
    /// Always a level name, never a sub-level
    pub level: String,
    pub event: String,
}

impl MultiQItem {
    pub fn new(
        division: impl Into<String>,
        level: impl Into<String>,
        event: impl Into<String>,
    ) -> Self {
        Self {
            division: division.into(),
            level: level.into(),
            event: event.into(),
        }
    }

    /// Load an item, resolving a sub-level to the level that owns it
    pub fn load(node: &ElementNode, divisions: &[Division], events: &[Event]) -> Result<Self> {
        let division = required_name(node, ATTRIB_MULTI_Q_ITEM_DIVISION)?;
        let level = required_name(node, ATTRIB_MULTI_Q_ITEM_LEVEL)?;
        let event = required_name(node, ATTRIB_MULTI_Q_ITEM_EVENT)?;

        let owner = divisions
            .iter()
            .find(|d| d.name == division)
            .and_then(|d| d.find_level(&level).or_else(|| d.find_leaf(&level)))
            .ok_or_else(|| {
                Error::invalid_attribute(
                    TREE_MULTI_Q_ITEM,
                    ATTRIB_MULTI_Q_ITEM_LEVEL,
                    format!("unknown division/level {division}/{level}"),
                )
            })?;
        if !events.iter().any(|e| e.name == event) {
            return Err(Error::invalid_attribute(
                TREE_MULTI_Q_ITEM,
                ATTRIB_MULTI_Q_ITEM_EVENT,
                format!("unknown event {event}"),
            ));
        }
        Ok(Self {
            division,
            level: owner.name.clone(),
            event,
        })
    }

    pub fn save(&self, parent: &mut ElementNode) {
        let node = parent.add_element_node(TREE_MULTI_Q_ITEM);
        node.add_attrib(ATTRIB_MULTI_Q_ITEM_DIVISION, &self.division);
        node.add_attrib(ATTRIB_MULTI_Q_ITEM_LEVEL, &self.level);
        node.add_attrib(ATTRIB_MULTI_Q_ITEM_EVENT, &self.event);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MultiQ {
    pub name: String,
    pub short_name: String,
    pub valid_from: Option<Date>,
    pub valid_to: Option<Date>,
    pub items: BTreeSet<MultiQItem>,
}

impl MultiQ {
    pub fn new(name: impl Into<String>, short_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            short_name: short_name.into(),
            ..Self::default()
        }
    }

    pub fn with_items(mut self, items: impl IntoIterator<Item = MultiQItem>) -> Self {
        self.items.extend(items);
        self
    }

    /// Whether `division`/`level`/`event` is one of the qualifying runs
    pub fn contains(&self, division: &str, level: &str, event: &str) -> bool {
        self.items
            .iter()
            .any(|i| i.division == division && i.level == level && i.event == event)
    }

    pub fn load(
        node: &ElementNode,
        divisions: &[Division],
        events: &[Event],
        ctx: &mut LoadContext<'_>,
    ) -> Result<Self> {
        let mut multi_q = Self {
            name: required_name(node, ATTRIB_MULTI_Q_NAME)?,
            short_name: required_name(node, ATTRIB_MULTI_Q_SHORT_NAME)?,
            valid_from: optional_date(node, ATTRIB_MULTI_Q_VALID_FROM, ctx.dates)?,
            valid_to: optional_date(node, ATTRIB_MULTI_Q_VALID_TO, ctx.dates)?,
            items: BTreeSet::new(),
        };
        for child in node.elements().filter(|c| c.name() == TREE_MULTI_Q_ITEM) {
            match MultiQItem::load(child, divisions, events) {
                Ok(item) => {
                    multi_q.items.insert(item);
                }
                Err(err) => ctx.skip(TREE_MULTI_Q_ITEM, &err),
            }
        }
        Ok(multi_q)
    }

    pub fn save(&self, parent: &mut ElementNode, dates: &dyn DateFormat) {
        let node = parent.add_element_node(TREE_MULTI_Q);
        node.add_attrib(ATTRIB_MULTI_Q_NAME, &self.name);
        node.add_attrib(ATTRIB_MULTI_Q_SHORT_NAME, &self.short_name);
        if let Some(date) = self.valid_from {
            node.add_attrib_date(ATTRIB_MULTI_Q_VALID_FROM, date, dates);
        }
        if let Some(date) = self.valid_to {
            node.add_attrib_date(ATTRIB_MULTI_Q_VALID_TO, date, dates);
        }
        for item in &self.items {
            item.save(node);
        }
    }
}

impl Named for MultiQ {
    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Level;
    use crate::diagnostics::Diagnostics;
    use crate::tree::{parse_str, IsoDate, Version};

    fn divisions() -> Vec<Division> {
        vec![Division::new("Standard").with_levels([
            Level::new("Novice").with_sub_levels(["Novice A", "Novice B"]),
            Level::new("Masters"),
        ])]
    }

    fn events() -> Vec<Event> {
        vec![Event::new("Jumpers"), Event::new("Standard")]
    }

    #[test]
    fn test_load_resolves_sub_levels() -> Result<()> {
        let node = parse_str(
            r#"<MultiQ Name="Double Q" SName="QQ" ValidFrom="2005-06-01">
                <MultiQItem Div="Standard" Level="Novice A" Event="Jumpers"/>
                <MultiQItem Div="Standard" Level="Novice" Event="Standard"/>
                <MultiQItem Div="Standard" Level="Masters" Event="Snooker"/>
                <MultiQItem Div="Veterans" Level="Masters" Event="Jumpers"/>
            </MultiQ>"#,
        )?;
        let mut diagnostics = Diagnostics::new();
        let mut ctx = LoadContext::new(Version::new(15, 3), &IsoDate, &mut diagnostics);
        let multi_q = MultiQ::load(&node, &divisions(), &events(), &mut ctx)?;
        assert_eq!(multi_q.items.len(), 2);
        assert!(multi_q.contains("Standard", "Novice", "Jumpers"));
        assert!(multi_q.contains("Standard", "Novice", "Standard"));
        assert_eq!(diagnostics.len(), 2);
        Ok(())
    }

    #[test]
    fn test_short_name_required() -> Result<()> {
        let node = parse_str(r#"<MultiQ Name="Double Q"/>"#)?;
        let mut diagnostics = Diagnostics::new();
        let mut ctx = LoadContext::new(Version::new(15, 3), &IsoDate, &mut diagnostics);
        assert!(MultiQ::load(&node, &divisions(), &events(), &mut ctx).is_err());
        Ok(())
    }

    #[test]
    fn test_save_round_trip() -> Result<()> {
        let multi_q = MultiQ::new("Double Q", "QQ").with_items([
            MultiQItem::new("Standard", "Masters", "Jumpers"),
            MultiQItem::new("Standard", "Masters", "Standard"),
        ]);
        let mut parent = ElementNode::new("Venue");
        multi_q.save(&mut parent, &IsoDate);
        let node = parent.element_node(0).cloned().unwrap_or_default();
        assert_eq!(node.child_count(), 2);
        let mut diagnostics = Diagnostics::new();
        let mut ctx = LoadContext::new(Version::new(15, 3), &IsoDate, &mut diagnostics);
        assert_eq!(MultiQ::load(&node, &divisions(), &events(), &mut ctx)?, multi_q);
        Ok(())
    }
}
