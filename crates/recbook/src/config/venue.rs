//! Venues: the organizations whose rules a configuration describes

use tracing::debug;

use super::division::Division;
use super::event::Event;
use super::multi_q::{MultiQ, MultiQItem};
use super::names::{
    ATTRIB_LIFETIME_NAME_NAME, ATTRIB_VENUE_ICON, ATTRIB_VENUE_LONG_NAME, ATTRIB_VENUE_NAME,
    ATTRIB_VENUE_URL, TREE_DIVISION, TREE_EVENT, TREE_MULTI_Q, TREE_TITLES, TREE_VENUE,
    TREE_VENUE_DESC, TREE_VENUE_LIFETIME_NAME,
};
use super::title::Title;
use super::{optional, optional_string, required_name, LoadContext};
use crate::error::Result;
use crate::merge::{self, keep, replace, reorder_by, Indent, Messages, Named, Section};
use crate::tree::{DateFormat, ElementNode, Version};

/// Scoring-rule double Qs were replaced by multiple-Q rules
const DOUBLE_Q_RETIRED: Version = Version::new(11, 0);
const DOUBLE_Q_NAME: &str = "Double Q";
const DOUBLE_Q_SHORT_NAME: &str = "QQ";

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Venue {
    pub name: String,
    pub long_name: String,
    pub url: String,
    pub desc: String,
    pub icon: i32,
    /// Names under which lifetime points are accumulated
    pub lifetime_names: Vec<String>,
    pub titles: Vec<Title>,
    pub divisions: Vec<Division>,
    pub events: Vec<Event>,
    pub multi_qs: Vec<MultiQ>,
}

impl Venue {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_divisions(mut self, divisions: impl IntoIterator<Item = Division>) -> Self {
        self.divisions.extend(divisions);
        self
    }

    pub fn find_division(&self, name: &str) -> Option<&Division> {
        self.divisions.iter().find(|d| d.name == name)
    }

    pub fn find_division_mut(&mut self, name: &str) -> Option<&mut Division> {
        self.divisions.iter_mut().find(|d| d.name == name)
    }

    pub fn find_event(&self, name: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.name == name)
    }

    pub fn find_title(&self, name: &str) -> Option<&Title> {
        self.titles.iter().find(|t| t.name == name)
    }

    /// Load a venue. Divisions load first since events and multiple-Q
    /// rules are checked against them; bad children are reported and left
    /// out.
    pub fn load(node: &ElementNode, ctx: &mut LoadContext<'_>) -> Result<Self> {
        let mut venue = Self {
            name: required_name(node, ATTRIB_VENUE_NAME)?,
            long_name: optional_string(node, ATTRIB_VENUE_LONG_NAME),
            url: optional_string(node, ATTRIB_VENUE_URL),
            icon: optional(node, ATTRIB_VENUE_ICON, 0)?,
            ..Self::default()
        };

        for child in node.elements() {
            match child.name() {
                TREE_VENUE_DESC => venue.desc = child.value(),
                TREE_VENUE_LIFETIME_NAME => match required_name(child, ATTRIB_LIFETIME_NAME_NAME) {
                    Ok(name) if !venue.lifetime_names.contains(&name) => {
                        venue.lifetime_names.push(name);
                    }
                    Ok(_) => {}
                    Err(err) => ctx.skip(TREE_VENUE_LIFETIME_NAME, &err),
                },
                TREE_TITLES => match Title::load(child, ctx) {
                    Ok(title) => venue.titles.push(title),
                    Err(err) => ctx.skip(TREE_TITLES, &err),
                },
                TREE_DIVISION => match Division::load(child, &mut venue.titles, ctx) {
                    Ok(division) => venue.divisions.push(division),
                    Err(err) => ctx.skip(TREE_DIVISION, &err),
                },
                _ => {}
            }
        }

        for child in node.elements().filter(|c| c.name() == TREE_EVENT) {
            match Event::load(child, &venue.divisions, ctx) {
                Ok(event) => venue.events.push(event),
                Err(err) => ctx.skip(TREE_EVENT, &err),
            }
        }

        for child in node.elements().filter(|c| c.name() == TREE_MULTI_Q) {
            match MultiQ::load(child, &venue.divisions, &venue.events, ctx) {
                Ok(multi_q) => venue.multi_qs.push(multi_q),
                Err(err) => ctx.skip(TREE_MULTI_Q, &err),
            }
        }
        if ctx.version < DOUBLE_Q_RETIRED {
            venue.convert_double_qs();
        }

        debug!(
            venue = %venue.name,
            titles = venue.titles.len(),
            divisions = venue.divisions.len(),
            events = venue.events.len(),
            "loaded venue"
        );
        Ok(venue)
    }

    /// Gather every scoring rule flagged `doubleQ` into one multiple-Q
    /// rule. A single flagged rule cannot form a pair and is dropped.
    fn convert_double_qs(&mut self) {
        let mut items = Vec::new();
        for event in &mut self.events {
            for scoring in event.scorings.iter_mut().filter(|s| s.double_q) {
                scoring.double_q = false;
                items.push(MultiQItem::new(&scoring.division, &scoring.level, &event.name));
            }
        }
        if items.len() > 1 {
            debug!(venue = %self.name, rules = items.len(), "converted double Qs");
            self.multi_qs
                .push(MultiQ::new(DOUBLE_Q_NAME, DOUBLE_Q_SHORT_NAME).with_items(items));
        }
    }

    pub fn save(&self, parent: &mut ElementNode, dates: &dyn DateFormat) {
        let node = parent.add_element_node(TREE_VENUE);
        node.add_attrib(ATTRIB_VENUE_NAME, &self.name);
        if !self.long_name.is_empty() {
            node.add_attrib(ATTRIB_VENUE_LONG_NAME, &self.long_name);
        }
        if !self.url.is_empty() {
            node.add_attrib(ATTRIB_VENUE_URL, &self.url);
        }
        node.add_attrib_value(ATTRIB_VENUE_ICON, &self.icon);
        super::save_child_text(node, TREE_VENUE_DESC, &self.desc);
        for name in &self.lifetime_names {
            node.add_element_node(TREE_VENUE_LIFETIME_NAME)
                .add_attrib(ATTRIB_LIFETIME_NAME_NAME, name);
        }
        for title in &self.titles {
            title.save(node, dates);
        }
        for division in &self.divisions {
            division.save(node);
        }
        for event in &self.events {
            event.save(node, dates);
        }
        for multi_q in &self.multi_qs {
            multi_q.save(node, dates);
        }
    }

    /// Merge `incoming` into this venue, returning the report when
    /// anything changed. Nothing the live venue has is ever removed except
    /// multiple-Q rules, which are replaced as a whole.
    pub fn update(
        &mut self,
        incoming: &Self,
        indent: Indent,
        messages: &dyn Messages,
    ) -> Option<String> {
        let mut changed = false;
        if self.long_name != incoming.long_name {
            self.long_name.clone_from(&incoming.long_name);
            changed = true;
        }
        if self.url != incoming.url {
            self.url.clone_from(&incoming.url);
            changed = true;
        }
        if self.desc != incoming.desc {
            self.desc.clone_from(&incoming.desc);
            changed = true;
        }
        if self.icon != incoming.icon {
            self.icon = incoming.icon;
            changed = true;
        }

        let mut body = String::new();

        let lifetime = merge::reconcile(
            &mut self.lifetime_names,
            &incoming.lifetime_names,
            indent,
            keep,
        );
        merge::write_section(&mut body, indent, messages, Section::LifetimeNames, &lifetime);
        changed |= lifetime.changed();

        let mut titles = merge::reconcile(&mut self.titles, &incoming.titles, indent, replace);
        titles.reordered = reorder_by(&mut self.titles, &incoming.titles);
        merge::write_section(&mut body, indent, messages, Section::Titles, &titles);
        changed |= titles.changed();

        let mut divisions = merge::reconcile(
            &mut self.divisions,
            &incoming.divisions,
            indent,
            |live, other| live.update(other, indent.nested(), messages),
        );
        divisions.reordered = reorder_by(&mut self.divisions, &incoming.divisions);
        merge::write_section(&mut body, indent, messages, Section::Divisions, &divisions);
        changed |= divisions.changed();

        let mut events = merge::reconcile(
            &mut self.events,
            &incoming.events,
            indent,
            |live, other| live.update(other, indent.nested(), messages),
        );
        events.reordered = reorder_by(&mut self.events, &incoming.events);
        merge::write_section(&mut body, indent, messages, Section::Events, &events);
        changed |= events.changed();

        let multi_qs = merge::replace_all(&mut self.multi_qs, &incoming.multi_qs, indent, false);
        merge::write_section(&mut body, indent, messages, Section::MultiQs, &multi_qs);
        changed |= multi_qs.changed();

        changed.then(|| {
            let mut report = indent.header(&self.name);
            report.push_str(&body);
            report
        })
    }
}

impl Named for Venue {
    fn name(&self) -> &str {
        &self.name
    }
}
