//! Rename and delete instructions carried by a reference configuration
//!
//! Actions run against the live configuration before the merge so that
//! entities the reference renamed are matched under their new names.
//! An action stamped with a configuration version only runs on live
//! configurations older than that version.

use std::fmt;
use std::mem;
use std::str::FromStr;

use tracing::debug;

use super::configuration::Configuration;
use super::multi_q::MultiQItem;
use super::names::{
    ATTRIB_ACTION_CONFIG, ATTRIB_ACTION_DIVISION, ATTRIB_ACTION_NEW_NAME, ATTRIB_ACTION_OLD_NAME,
    ATTRIB_ACTION_VENUE, ATTRIB_ACTION_VERB, TREE_ACTION,
};
use super::venue::Venue;
use super::{optional, optional_string, required, required_name, LoadContext};
use crate::error::{Error, Result};
use crate::merge::{Indent, Messages};
use crate::tree::{ElementNode, Version};

/// `Config` became mandatory on actions
const CONFIG_REQUIRED: Version = Version::new(12, 12);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionVerb {
    DeleteCalPlugin,
    RenameTitle,
    DeleteTitle,
    RenameEvent,
    DeleteEvent,
    RenameLevel,
    DeleteLevel,
    RenameDivision,
    DeleteDivision,
    RenameVenue,
    DeleteVenue,
}

impl ActionVerb {
    pub const ALL: [Self; 11] = [
        Self::DeleteCalPlugin,
        Self::RenameTitle,
        Self::DeleteTitle,
        Self::RenameEvent,
        Self::DeleteEvent,
        Self::RenameLevel,
        Self::DeleteLevel,
        Self::RenameDivision,
        Self::DeleteDivision,
        Self::RenameVenue,
        Self::DeleteVenue,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::DeleteCalPlugin => "DeleteCalPlugin",
            Self::RenameTitle => "RenameTitle",
            Self::DeleteTitle => "DeleteTitle",
            Self::RenameEvent => "RenameEvent",
            Self::DeleteEvent => "DeleteEvent",
            Self::RenameLevel => "RenameLevel",
            Self::DeleteLevel => "DeleteLevel",
            Self::RenameDivision => "RenameDivision",
            Self::DeleteDivision => "DeleteDivision",
            Self::RenameVenue => "RenameVenue",
            Self::DeleteVenue => "DeleteVenue",
        }
    }

    pub fn is_rename(self) -> bool {
        matches!(
            self,
            Self::RenameTitle
                | Self::RenameEvent
                | Self::RenameLevel
                | Self::RenameDivision
                | Self::RenameVenue
        )
    }
}

impl fmt::Display for ActionVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionVerb {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|verb| verb.as_str() == s).ok_or(())
    }
}

/// One rename or delete. Loaded with the configuration, never saved.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConfigAction {
    pub verb: ActionVerb,
    /// Configuration version that introduced the change; 0 runs always
    pub config: u32,
    pub venue: String,
    pub division: String,
    pub old_name: String,
    /// Target of a rename. Deletes ignore it.
    pub new_name: String,
}

impl ConfigAction {
    pub fn new(verb: ActionVerb, old_name: impl Into<String>) -> Self {
        Self {
            verb,
            config: 0,
            venue: String::new(),
            division: String::new(),
            old_name: old_name.into(),
            new_name: String::new(),
        }
    }

    pub fn in_venue(mut self, venue: impl Into<String>) -> Self {
        self.venue = venue.into();
        self
    }

    pub fn in_division(mut self, division: impl Into<String>) -> Self {
        self.division = division.into();
        self
    }

    pub fn renamed_to(mut self, new_name: impl Into<String>) -> Self {
        self.new_name = new_name.into();
        self
    }

    pub fn since(mut self, config: u32) -> Self {
        self.config = config;
        self
    }

    pub fn load(node: &ElementNode, ctx: &mut LoadContext<'_>) -> Result<Self> {
        let verb = required_name(node, ATTRIB_ACTION_VERB)?;
        let verb = verb.parse().map_err(|()| {
            let valid: Vec<_> = ActionVerb::ALL.iter().map(|v| v.as_str()).collect();
            Error::invalid_attribute(
                TREE_ACTION,
                ATTRIB_ACTION_VERB,
                format!("valid values: {}", valid.join(", ")),
            )
        })?;
        let config = if ctx.version < CONFIG_REQUIRED {
            optional(node, ATTRIB_ACTION_CONFIG, 0)?
        } else {
            required(node, ATTRIB_ACTION_CONFIG)?
        };
        Ok(Self {
            verb,
            config,
            venue: optional_string(node, ATTRIB_ACTION_VENUE),
            division: optional_string(node, ATTRIB_ACTION_DIVISION),
            old_name: optional_string(node, ATTRIB_ACTION_OLD_NAME),
            new_name: optional_string(node, ATTRIB_ACTION_NEW_NAME),
        })
    }

    /// Whether a live configuration at `version` still needs this action
    pub fn is_pending(&self, version: u32) -> bool {
        self.config == 0 || version < self.config
    }

    /// Apply to `config`, appending a report line when something changed
    pub fn apply(
        &self,
        config: &mut Configuration,
        indent: Indent,
        messages: &dyn Messages,
        report: &mut String,
    ) -> bool {
        if self.verb.is_rename() && self.new_name.is_empty() {
            return false;
        }
        let mut repairs = String::new();
        let changed = match self.verb {
            ActionVerb::DeleteCalPlugin => {
                let before = config.cal_sites.len();
                config.cal_sites.retain(|site| site.name != self.old_name);
                config.cal_sites.len() != before
            }
            ActionVerb::RenameVenue => {
                let Some(index) = config.venues.iter().position(|v| v.name == self.old_name)
                else {
                    return false;
                };
                if config.find_venue(&self.new_name).is_some() {
                    config.venues.remove(index);
                } else if let Some(venue) = config.venues.get_mut(index) {
                    venue.name.clone_from(&self.new_name);
                }
                true
            }
            ActionVerb::DeleteVenue => {
                let before = config.venues.len();
                config.venues.retain(|v| v.name != self.old_name);
                config.venues.len() != before
            }
            _ => match config.find_venue_mut(&self.venue) {
                Some(venue) => self.apply_to_venue(venue, indent, messages, &mut repairs),
                None => false,
            },
        };
        if changed {
            debug!(verb = %self.verb, venue = %self.venue, name = %self.old_name, "applied action");
            report.push_str(&indent.body());
            report.push_str(&messages.action(self));
            report.push('\n');
            report.push_str(&repairs);
        }
        changed
    }

    fn apply_to_venue(
        &self,
        venue: &mut Venue,
        indent: Indent,
        messages: &dyn Messages,
        repairs: &mut String,
    ) -> bool {
        let (old, new) = (self.old_name.as_str(), self.new_name.as_str());
        match self.verb {
            ActionVerb::RenameTitle => {
                let Some(index) = venue.titles.iter().position(|t| t.name == old) else {
                    return false;
                };
                if venue.find_title(new).is_some() {
                    venue.titles.remove(index);
                } else if let Some(title) = venue.titles.get_mut(index) {
                    title.name = new.to_string();
                }
                true
            }
            ActionVerb::DeleteTitle => {
                let before = venue.titles.len();
                venue.titles.retain(|t| t.name != old);
                venue.titles.len() != before
            }
            ActionVerb::RenameEvent => {
                let Some(index) = venue.events.iter().position(|e| e.name == old) else {
                    return false;
                };
                edit_multi_q_items(venue, |item| {
                    if item.event == old {
                        item.event = new.to_string();
                    }
                    true
                });
                if venue.find_event(new).is_some() {
                    venue.events.remove(index);
                } else if let Some(event) = venue.events.get_mut(index) {
                    event.name = new.to_string();
                }
                true
            }
            ActionVerb::DeleteEvent => {
                let before = venue.events.len();
                venue.events.retain(|e| e.name != old);
                edit_multi_q_items(venue, |item| item.event != old);
                venue.events.len() != before
            }
            ActionVerb::RenameDivision => {
                let Some(index) = venue.divisions.iter().position(|d| d.name == old) else {
                    return false;
                };
                let merge_into_existing = venue.find_division(new).is_some();
                for scoring in venue.events.iter_mut().flat_map(|e| e.scorings.iter_mut()) {
                    if scoring.division == old {
                        scoring.division = new.to_string();
                    }
                }
                edit_multi_q_items(venue, |item| {
                    if item.division == old {
                        item.division = new.to_string();
                    }
                    true
                });
                if merge_into_existing {
                    venue.divisions.remove(index);
                } else if let Some(division) = venue.divisions.get_mut(index) {
                    division.name = new.to_string();
                }
                true
            }
            ActionVerb::DeleteDivision => {
                let before = venue.divisions.len();
                venue.divisions.retain(|d| d.name != old);
                for event in &mut venue.events {
                    event.scorings.retain(|s| s.division != old);
                }
                edit_multi_q_items(venue, |item| item.division != old);
                venue.divisions.len() != before
            }
            ActionVerb::RenameLevel => self.rename_level(venue, indent, messages, repairs),
            ActionVerb::DeleteLevel => self.delete_level(venue, indent, messages, repairs),
            ActionVerb::DeleteCalPlugin | ActionVerb::RenameVenue | ActionVerb::DeleteVenue => {
                false
            }
        }
    }

    /// Rename a level, or a sub-level when no level has the old name. An
    /// existing target absorbs the renamed entry instead.
    fn rename_level(
        &self,
        venue: &mut Venue,
        indent: Indent,
        messages: &dyn Messages,
        repairs: &mut String,
    ) -> bool {
        let (div, old) = (self.division.as_str(), self.old_name.as_str());
        let new = self.new_name.as_str();
        let Some(division) = venue.find_division_mut(div) else {
            return false;
        };
        let is_level = division.find_level(old).is_some();
        if is_level {
            if division.find_level(new).is_some() {
                division.levels.retain(|level| level.name != old);
            } else if let Some(level) = division.levels.iter_mut().find(|l| l.name == old) {
                level.name = new.to_string();
            }
        } else {
            let Some(owner) = division.levels.iter().position(|l| l.find_sub_level(old).is_some())
            else {
                return false;
            };
            if division.find_leaf(new).is_some() {
                division.delete_sub_level_reported(old, indent.nested(), messages, repairs);
            } else if let Some(sub) = division
                .levels
                .get_mut(owner)
                .and_then(|l| l.sub_levels.iter_mut().find(|s| s.name == old))
            {
                sub.name = new.to_string();
            }
        }

        for scoring in venue.events.iter_mut().flat_map(|e| e.scorings.iter_mut()) {
            if scoring.division == div && scoring.level == old {
                scoring.level = new.to_string();
            }
        }
        if is_level {
            edit_multi_q_items(venue, |item| {
                if item.division == div && item.level == old {
                    item.level = new.to_string();
                }
                true
            });
        }
        true
    }

    fn delete_level(
        &self,
        venue: &mut Venue,
        indent: Indent,
        messages: &dyn Messages,
        repairs: &mut String,
    ) -> bool {
        let (div, old) = (self.division.as_str(), self.old_name.as_str());
        let Some(division) = venue.find_division_mut(div) else {
            return false;
        };
        let is_level = division.find_level(old).is_some();
        if is_level {
            division.levels.retain(|level| level.name != old);
        } else if division
            .delete_sub_level_reported(old, indent.nested(), messages, repairs)
            .is_none()
        {
            return false;
        }

        for event in &mut venue.events {
            event.scorings.retain(|s| !(s.division == div && s.level == old));
        }
        if is_level {
            edit_multi_q_items(venue, |item| !(item.division == div && item.level == old));
        }
        true
    }
}

/// Rewrite every multiple-Q item in `venue`; items `edit` rejects are dropped
fn edit_multi_q_items(venue: &mut Venue, mut edit: impl FnMut(&mut MultiQItem) -> bool) {
    for multi_q in &mut venue.multi_qs {
        multi_q.items = mem::take(&mut multi_q.items)
            .into_iter()
            .filter_map(|mut item| edit(&mut item).then_some(item))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CalSite, Division, Event, Level, MultiQ, Scoring, ScoringStyle, Title};
    use crate::diagnostics::Diagnostics;
    use crate::merge::EnglishMessages;
    use crate::tree::{parse_str, IsoDate};

    fn config() -> Configuration {
        let mut venue = Venue::new("USDAA").with_divisions([
            Division::new("Standard").with_levels([
                Level::new("Starters").with_sub_levels(["Starters A", "Starters B"]),
                Level::new("Masters"),
            ]),
            Division::new("Veterans").with_levels([Level::new("Masters")]),
        ]);
        venue.titles = vec![Title::new("AD"), Title::new("MAD")];
        venue.events = vec![
            Event::new("Jumpers").with_scorings([
                Scoring::new("Standard", "Masters", ScoringStyle::FaultsThenTime),
                Scoring::new("Veterans", "Masters", ScoringStyle::FaultsThenTime),
            ]),
            Event::new("Gamblers"),
        ];
        venue.multi_qs = vec![MultiQ::new("Double Q", "QQ").with_items([
            MultiQItem::new("Standard", "Masters", "Jumpers"),
            MultiQItem::new("Standard", "Masters", "Gamblers"),
        ])];

        let mut config = Configuration::new(5);
        config.cal_sites.push(CalSite::new("Old site", "http://old"));
        config.venues.push(venue);
        config
    }

    fn apply(config: &mut Configuration, action: &ConfigAction) -> (bool, String) {
        let mut report = String::new();
        let changed = action.apply(config, Indent(0), &EnglishMessages, &mut report);
        (changed, report)
    }

    fn usdaa(config: &Configuration) -> Venue {
        config.find_venue("USDAA").cloned().unwrap_or_default()
    }

    #[test]
    fn test_load_requires_known_verb() -> Result<()> {
        let mut diagnostics = Diagnostics::new();
        let mut ctx = LoadContext::new(Version::new(15, 3), &IsoDate, &mut diagnostics);
        let node = parse_str(
            r#"<Action Verb="RenameTitle" Config="7" Venue="USDAA" OldName="AD" NewName="ADCH"/>"#,
        )?;
        let action = ConfigAction::load(&node, &mut ctx)?;
        assert_eq!(
            action,
            ConfigAction::new(ActionVerb::RenameTitle, "AD")
                .in_venue("USDAA")
                .renamed_to("ADCH")
                .since(7)
        );

        let unknown = parse_str(r#"<Action Verb="Explode" Config="1"/>"#)?;
        assert!(ConfigAction::load(&unknown, &mut ctx).is_err());
        assert!(ConfigAction::load(&parse_str(r#"<Action Config="1"/>"#)?, &mut ctx).is_err());
        // Config became mandatory in 12.12
        let unstamped = parse_str(r#"<Action Verb="DeleteVenue" OldName="X"/>"#)?;
        assert!(ConfigAction::load(&unstamped, &mut ctx).is_err());
        let mut ctx = LoadContext::new(Version::new(12, 0), &IsoDate, &mut diagnostics);
        assert_eq!(ConfigAction::load(&unstamped, &mut ctx)?.config, 0);
        Ok(())
    }

    #[test]
    fn test_pending_by_config_version() {
        let action = ConfigAction::new(ActionVerb::DeleteVenue, "X");
        assert!(action.is_pending(100));
        let stamped = action.since(6);
        assert!(stamped.is_pending(5));
        assert!(!stamped.is_pending(6));
    }

    #[test]
    fn test_rename_without_target_is_ignored() {
        let mut config = config();
        let rename = ConfigAction::new(ActionVerb::RenameVenue, "USDAA");
        assert!(!apply(&mut config, &rename).0);
        assert!(config.find_venue("USDAA").is_some());
    }

    #[test]
    fn test_rename_and_delete_venue() {
        let mut config = config();
        config.venues.push(Venue::new("AKC"));

        let rename = ConfigAction::new(ActionVerb::RenameVenue, "USDAA").renamed_to("US");
        let (changed, report) = apply(&mut config, &rename);
        assert!(changed);
        assert_eq!(report, "Venue 'USDAA' renamed to 'US'\n");
        assert!(config.find_venue("US").is_some());

        // renaming onto an existing venue drops the old one
        apply(&mut config, &ConfigAction::new(ActionVerb::RenameVenue, "US").renamed_to("AKC"));
        let names: Vec<_> = config.venues.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, ["AKC"]);

        assert!(apply(&mut config, &ConfigAction::new(ActionVerb::DeleteVenue, "AKC")).0);
        assert!(config.venues.is_empty());
        assert!(!apply(&mut config, &ConfigAction::new(ActionVerb::DeleteVenue, "AKC")).0);
    }

    #[test]
    fn test_title_actions() {
        let mut config = config();
        let rename = ConfigAction::new(ActionVerb::RenameTitle, "AD")
            .in_venue("USDAA")
            .renamed_to("MAD");
        assert!(apply(&mut config, &rename).0);
        let names: Vec<_> = usdaa(&config).titles.iter().map(|t| t.name.clone()).collect();
        assert_eq!(names, ["MAD"]);

        let delete = ConfigAction::new(ActionVerb::DeleteTitle, "MAD").in_venue("USDAA");
        let (changed, report) = apply(&mut config, &delete);
        assert!(changed);
        assert_eq!(report, "USDAA: title 'MAD' deleted\n");
        assert!(usdaa(&config).titles.is_empty());
    }

    #[test]
    fn test_event_actions_follow_multi_q() {
        let mut config = config();
        let rename = ConfigAction::new(ActionVerb::RenameEvent, "Jumpers")
            .in_venue("USDAA")
            .renamed_to("Jumping");
        assert!(apply(&mut config, &rename).0);
        let venue = usdaa(&config);
        assert!(venue.find_event("Jumping").is_some());
        assert!(venue.multi_qs[0].contains("Standard", "Masters", "Jumping"));

        let delete = ConfigAction::new(ActionVerb::DeleteEvent, "Gamblers").in_venue("USDAA");
        assert!(apply(&mut config, &delete).0);
        let venue = usdaa(&config);
        assert_eq!(venue.events.len(), 1);
        assert_eq!(venue.multi_qs[0].items.len(), 1);
    }

    #[test]
    fn test_division_actions_follow_rules() {
        let mut config = config();
        let rename = ConfigAction::new(ActionVerb::RenameDivision, "Standard")
            .in_venue("USDAA")
            .renamed_to("Championship");
        assert!(apply(&mut config, &rename).0);
        let venue = usdaa(&config);
        assert!(venue.find_division("Championship").is_some());
        assert!(venue.events[0].find_scoring("Championship", "Masters").is_some());
        assert!(venue.multi_qs[0].contains("Championship", "Masters", "Gamblers"));

        let delete = ConfigAction::new(ActionVerb::DeleteDivision, "Veterans").in_venue("USDAA");
        assert!(apply(&mut config, &delete).0);
        let venue = usdaa(&config);
        assert_eq!(venue.divisions.len(), 1);
        assert_eq!(venue.events[0].scorings.len(), 1);
    }

    #[test]
    fn test_level_actions() {
        let mut config = config();
        let rename = ConfigAction::new(ActionVerb::RenameLevel, "Masters")
            .in_venue("USDAA")
            .in_division("Standard")
            .renamed_to("Elite");
        let (changed, report) = apply(&mut config, &rename);
        assert!(changed);
        assert_eq!(report, "USDAA: level 'Masters' renamed to 'Elite'\n");
        let venue = usdaa(&config);
        let standard = venue.find_division("Standard").cloned().unwrap_or_default();
        assert!(standard.find_level("Elite").is_some());
        assert!(venue.events[0].find_scoring("Standard", "Elite").is_some());
        // the other division's level of the same name is untouched
        assert!(venue.events[0].find_scoring("Veterans", "Masters").is_some());
        assert!(venue.multi_qs[0].contains("Standard", "Elite", "Jumpers"));

        let sub = ConfigAction::new(ActionVerb::RenameLevel, "Starters A")
            .in_venue("USDAA")
            .in_division("Standard")
            .renamed_to("Starters 1");
        assert!(apply(&mut config, &sub).0);
        let standard = usdaa(&config).find_division("Standard").cloned().unwrap_or_default();
        assert!(standard.find_leaf("Starters 1").is_some());

        let delete = ConfigAction::new(ActionVerb::DeleteLevel, "Elite")
            .in_venue("USDAA")
            .in_division("Standard");
        assert!(apply(&mut config, &delete).0);
        let venue = usdaa(&config);
        assert!(venue.events[0].find_scoring("Standard", "Elite").is_none());
        assert!(venue.multi_qs[0].items.is_empty());
    }

    #[test]
    fn test_delete_last_sub_level_repairs_collision() {
        let mut config = Configuration::new(1);
        config.venues.push(Venue::new("USDAA").with_divisions([Division::new("Standard")
            .with_levels([
                Level::new("A").with_sub_levels(["A1"]),
                Level::new("B").with_sub_levels(["A"]),
            ])]));
        let delete = ConfigAction::new(ActionVerb::DeleteLevel, "A1")
            .in_venue("USDAA")
            .in_division("Standard");
        let (changed, report) = apply(&mut config, &delete);
        assert!(changed);
        assert_eq!(
            report,
            concat!(
                "USDAA: level 'A1' deleted\n",
                "   Level 'A' renamed to 'A?' to keep level names unique\n",
            )
        );
    }

    #[test]
    fn test_delete_cal_plugin() {
        let mut config = config();
        let delete = ConfigAction::new(ActionVerb::DeleteCalPlugin, "Old site");
        assert_eq!(
            apply(&mut config, &delete),
            (true, "Calendar site 'Old site' deleted\n".to_string())
        );
        assert!(config.cal_sites.is_empty());
    }
}
