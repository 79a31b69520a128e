//! The configuration root and the top of the merge

use tracing::{debug, info};

use super::action::ConfigAction;
use super::cal_site::CalSite;
use super::fault::Fault;
use super::names::{
    ATTRIB_CONFIG_UPDATE, ATTRIB_CONFIG_VERSION, TREE_ACTION, TREE_CAL_SITE, TREE_CONFIG,
    TREE_FAULT_TYPE, TREE_OTHER_PTS, TREE_VENUE,
};
use super::other_points::OtherPoints;
use super::venue::Venue;
use super::{optional, LoadContext};
use crate::error::Result;
use crate::merge::{self, keep, replace, reorder_by, Indent, Messages, Section, Tally};
use crate::tree::{DateFormat, ElementNode, Version};

/// Before this format version fault types and other points lived inside
/// each venue
const GLOBAL_FAULTS: Version = Version::new(3, 0);

/// Everything a book knows about the venues it records runs for
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Configuration {
    /// Whether the user accepts configuration updates
    pub update: bool,
    /// Revision of the configuration content
    pub version: u32,
    pub cal_sites: Vec<CalSite>,
    pub faults: Vec<Fault>,
    pub other_points: Vec<OtherPoints>,
    pub venues: Vec<Venue>,
    /// Renames and deletes to run before merging this configuration into
    /// another one. Never saved.
    pub actions: Vec<ConfigAction>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            update: true,
            version: 0,
            cal_sites: Vec::new(),
            faults: Vec::new(),
            other_points: Vec::new(),
            venues: Vec::new(),
            actions: Vec::new(),
        }
    }
}

// the update flag is a user preference and actions are transient
impl PartialEq for Configuration {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version
            && self.cal_sites == other.cal_sites
            && self.faults == other.faults
            && self.other_points == other.other_points
            && self.venues == other.venues
    }
}

/// Result of [`Configuration::update`]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Whether any content changed. A version bump alone does not count.
    pub changed: bool,
    /// Indented, human-readable account of the changes
    pub report: String,
    /// Counts summed over the top-level sections
    pub tally: Tally,
}

impl Configuration {
    pub fn new(version: u32) -> Self {
        Self {
            version,
            ..Self::default()
        }
    }

    pub fn find_venue(&self, name: &str) -> Option<&Venue> {
        self.venues.iter().find(|v| v.name == name)
    }

    pub fn find_venue_mut(&mut self, name: &str) -> Option<&mut Venue> {
        self.venues.iter_mut().find(|v| v.name == name)
    }

    pub fn load(node: &ElementNode, ctx: &mut LoadContext<'_>) -> Result<Self> {
        let mut config = Self {
            update: optional(node, ATTRIB_CONFIG_UPDATE, true)?,
            version: optional(node, ATTRIB_CONFIG_VERSION, 0)?,
            ..Self::default()
        };

        for child in node.elements() {
            match child.name() {
                TREE_ACTION => match ConfigAction::load(child, ctx) {
                    Ok(action) => config.actions.push(action),
                    Err(err) => ctx.skip(TREE_ACTION, &err),
                },
                TREE_CAL_SITE => match CalSite::load(child) {
                    Ok(site) => config.cal_sites.push(site),
                    Err(err) => ctx.skip(TREE_CAL_SITE, &err),
                },
                TREE_FAULT_TYPE => config.load_fault(child, ctx),
                TREE_OTHER_PTS => config.load_other_points(child, ctx),
                TREE_VENUE => {
                    if ctx.version < GLOBAL_FAULTS {
                        for nested in child.elements() {
                            match nested.name() {
                                TREE_FAULT_TYPE => config.load_fault(nested, ctx),
                                TREE_OTHER_PTS => config.load_other_points(nested, ctx),
                                _ => {}
                            }
                        }
                    }
                    match Venue::load(child, ctx) {
                        Ok(venue) => config.venues.push(venue),
                        Err(err) => ctx.skip(TREE_VENUE, &err),
                    }
                }
                _ => {}
            }
        }

        debug!(
            version = config.version,
            venues = config.venues.len(),
            faults = config.faults.len(),
            "loaded configuration"
        );
        Ok(config)
    }

    fn load_fault(&mut self, node: &ElementNode, ctx: &mut LoadContext<'_>) {
        match Fault::load(node) {
            Ok(fault) if !self.faults.contains(&fault) => self.faults.push(fault),
            Ok(_) => {}
            Err(err) => ctx.skip(TREE_FAULT_TYPE, &err),
        }
    }

    fn load_other_points(&mut self, node: &ElementNode, ctx: &mut LoadContext<'_>) {
        match OtherPoints::load(node) {
            Ok(other) if !self.other_points.iter().any(|o| o.name == other.name) => {
                self.other_points.push(other);
            }
            Ok(_) => {}
            Err(err) => ctx.skip(TREE_OTHER_PTS, &err),
        }
    }

    pub fn save(&self, parent: &mut ElementNode, dates: &dyn DateFormat) {
        let node = parent.add_element_node(TREE_CONFIG);
        if !self.update {
            node.add_attrib_value(ATTRIB_CONFIG_UPDATE, &self.update);
        }
        node.add_attrib_value(ATTRIB_CONFIG_VERSION, &self.version);
        for site in &self.cal_sites {
            site.save(node);
        }
        for fault in &self.faults {
            fault.save(node);
        }
        for other in &self.other_points {
            other.save(node);
        }
        for venue in &self.venues {
            venue.save(node, dates);
        }
    }

    /// Merge `incoming` into this configuration.
    ///
    /// The incoming actions still pending at this version run first.
    /// Calendar sites are replaced as a whole. Faults are only added. Other
    /// points and venues are added or updated but never removed. The
    /// version advances to the incoming one whenever that is newer.
    pub fn update(&mut self, incoming: &Self, messages: &dyn Messages) -> UpdateOutcome {
        let indent = Indent(0);
        let mut report = String::new();
        let mut tally = Tally::default();
        let mut changed = false;

        let mut applied = false;
        let version = self.version;
        for action in incoming.actions.iter().filter(|a| a.is_pending(version)) {
            applied |= action.apply(self, indent, messages, &mut report);
        }
        if applied {
            report.push('\n');
            changed = true;
        }

        let cal_sites = merge::replace_all(&mut self.cal_sites, &incoming.cal_sites, indent, true);
        merge::write_section(&mut report, indent, messages, Section::CalSites, &cal_sites);

        let faults = merge::reconcile(&mut self.faults, &incoming.faults, indent, keep);
        merge::write_section(&mut report, indent, messages, Section::Faults, &faults);

        let mut other_points =
            merge::reconcile(&mut self.other_points, &incoming.other_points, indent, replace);
        other_points.reordered = reorder_by(&mut self.other_points, &incoming.other_points);
        merge::write_section(&mut report, indent, messages, Section::OtherPoints, &other_points);

        let mut venues = merge::reconcile(&mut self.venues, &incoming.venues, indent, |live, other| {
            live.update(other, indent.nested(), messages)
        });
        venues.reordered = reorder_by(&mut self.venues, &incoming.venues);
        merge::write_section(&mut report, indent, messages, Section::Venues, &venues);

        for section in [&cal_sites, &faults, &other_points, &venues] {
            tally += section.tally;
            changed |= section.changed();
        }

        if self.version < incoming.version {
            debug!(from = self.version, to = incoming.version, "configuration version advanced");
            self.version = incoming.version;
        }
        if changed {
            self.update = true;
            info!(
                added = tally.added,
                updated = tally.updated,
                deleted = tally.deleted,
                "configuration merged"
            );
        }
        UpdateOutcome {
            changed,
            report,
            tally,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Division, Level, PointsTally};
    use crate::diagnostics::Diagnostics;
    use crate::merge::EnglishMessages;
    use crate::tree::{parse_str, IsoDate};

    fn load(xml: &str, version: Version) -> Result<(Configuration, Diagnostics)> {
        let node = parse_str(xml)?;
        let mut diagnostics = Diagnostics::new();
        let mut ctx = LoadContext::new(version, &IsoDate, &mut diagnostics);
        let config = Configuration::load(&node, &mut ctx)?;
        Ok((config, diagnostics))
    }

    fn usdaa(levels: &[&str]) -> Venue {
        Venue::new("USDAA").with_divisions([
            Division::new("Standard").with_levels(levels.iter().map(|&name| Level::new(name)))
        ])
    }

    #[test]
    fn test_load_skips_bad_children() -> Result<()> {
        let (config, diagnostics) = load(
            r#"<Configuration version="42" update="n">
                <CalSite name="Site" search="http://example.com?q="/>
                <FaultType>Refusal</FaultType>
                <FaultType/>
                <OtherPts Name="Top Ten" Count="All"/>
                <Venue Name="AKC"/>
                <Venue/>
            </Configuration>"#,
            Version::new(15, 3),
        )?;
        assert_eq!(config.version, 42);
        assert!(!config.update);
        assert_eq!(config.cal_sites.len(), 1);
        assert_eq!(config.faults, [Fault::new("Refusal")]);
        assert_eq!(config.venues.len(), 1);
        assert_eq!(diagnostics.len(), 2);
        Ok(())
    }

    #[test]
    fn test_invalid_update_flag_fails() {
        assert!(load(r#"<Configuration update="false"/>"#, Version::new(15, 3)).is_err());
    }

    #[test]
    fn test_old_files_lift_venue_faults() -> Result<()> {
        let (config, _) = load(
            r#"<Configuration>
                <Venue Name="AKC"><FaultType>Knocked bar</FaultType><OtherPts Name="OP" Count="Level"/></Venue>
                <Venue Name="USDAA"><FaultType>Knocked bar</FaultType></Venue>
            </Configuration>"#,
            Version::new(2, 0),
        )?;
        assert_eq!(config.faults, [Fault::new("Knocked bar")]);
        assert_eq!(config.other_points.len(), 1);
        assert_eq!(config.venues.len(), 2);
        Ok(())
    }

    #[test]
    fn test_save_omits_default_update_flag() {
        let mut parent = ElementNode::new("AgilityBook");
        Configuration::new(7).save(&mut parent, &IsoDate);
        let node = parent.element_node(0).cloned().unwrap_or_default();
        assert_eq!(node.attrib("update"), None);
        assert_eq!(node.attrib("version"), Some("7"));
    }

    #[test]
    fn test_equality_ignores_update_flag() {
        let mut other = Configuration::new(1);
        other.update = false;
        assert_eq!(Configuration::new(1), other);
    }

    #[test]
    fn test_update_adds_level_and_keeps_live_one() {
        let mut live = Configuration::new(1);
        live.venues.push(usdaa(&["Novice"]));
        let mut incoming = Configuration::new(2);
        incoming.venues.push(usdaa(&["Advanced"]));

        let outcome = live.update(&incoming, &EnglishMessages);
        assert!(outcome.changed);
        assert_eq!(live.version, 2);
        assert_eq!(
            outcome.report,
            concat!(
                "Venues: 0 added, 1 updated, 0 identical\n",
                "-USDAA\n",
                "   Divisions: 0 added, 1 updated, 0 identical\n",
                "   -Standard\n",
                "      Levels: 1 added, 0 updated, 0 identical\n",
                "      +Advanced\n",
            )
        );
        let division = live.find_venue("USDAA").and_then(|v| v.find_division("Standard"));
        assert!(division.is_some_and(|d| d.find_level("Novice").is_some()));
        assert!(division.is_some_and(|d| d.find_level("Advanced").is_some()));
    }

    #[test]
    fn test_version_bump_alone_is_not_a_change() {
        let mut live = Configuration::new(3);
        live.update = false;
        let incoming = Configuration::new(5);
        let outcome = live.update(&incoming, &EnglishMessages);
        assert!(!outcome.changed);
        assert!(outcome.report.is_empty());
        assert_eq!(live.version, 5);
        assert!(!live.update);

        // never goes backwards
        live.update(&Configuration::new(4), &EnglishMessages);
        assert_eq!(live.version, 5);
    }

    #[test]
    fn test_cal_sites_replaced_and_others_kept() {
        let mut live = Configuration::new(1);
        live.cal_sites.push(CalSite::new("Old", "http://old"));
        live.faults.push(Fault::new("Mine"));
        live.other_points.push(OtherPoints::new("Mine", PointsTally::All));

        let mut incoming = Configuration::new(1);
        incoming.cal_sites.push(CalSite::new("New", "http://new"));
        incoming.faults.push(Fault::new("Refusal"));

        let outcome = live.update(&incoming, &EnglishMessages);
        assert!(outcome.changed);
        assert_eq!(live.cal_sites, incoming.cal_sites);
        assert_eq!(live.faults, [Fault::new("Mine"), Fault::new("Refusal")]);
        assert_eq!(live.other_points.len(), 1);
        assert_eq!(
            outcome.report,
            concat!(
                "Calendar Sites: 1 added, 0 updated, 0 identical, 1 deleted\n",
                "+New\n",
                "Faults: 1 added, 0 identical\n",
                "+Refusal\n",
            )
        );
        assert_eq!(outcome.tally.added, 2);
        assert_eq!(outcome.tally.deleted, 1);
    }
}
