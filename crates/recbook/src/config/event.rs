//! Events and their scoring rules

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use time::Date;

use super::division::{verify_div_level, Division};
use super::names::{
    ATTRIB_EVENT_HAS_PARTNER, ATTRIB_EVENT_HAS_SUB_NAMES, ATTRIB_EVENT_HAS_TABLE, ATTRIB_EVENT_NAME,
    ATTRIB_EVENT_SHORT_NAME, ATTRIB_SCORING_BONUS_PTS, ATTRIB_SCORING_CLEAN, ATTRIB_SCORING_CLEAN_Q,
    ATTRIB_SCORING_CLOSING_PTS, ATTRIB_SCORING_DIVISION, ATTRIB_SCORING_DOUBLE_Q,
    ATTRIB_SCORING_DROP_FRACTIONS, ATTRIB_SCORING_FAULTS_ALLOWED, ATTRIB_SCORING_HAS_SUB_NAMES,
    ATTRIB_SCORING_HAS_TABLE, ATTRIB_SCORING_LEVEL, ATTRIB_SCORING_MACH_PTS,
    ATTRIB_SCORING_OPENING_PTS, ATTRIB_SCORING_SPEED_PTS, ATTRIB_SCORING_SUBTRACT_TIME_FAULTS,
    ATTRIB_SCORING_SUPER_Q, ATTRIB_SCORING_TIME_FAULTS_OVER, ATTRIB_SCORING_TIME_FAULTS_UNDER,
    ATTRIB_SCORING_TIME_FAULT_MULTIPLIER, ATTRIB_SCORING_TYPE, ATTRIB_SCORING_VALID_FROM,
    ATTRIB_SCORING_VALID_TO, ATTRIB_SCORING_WITH_FAULTS, TREE_EVENT, TREE_EVENT_DESC,
    TREE_LIFETIME_POINTS, TREE_LIFETIME_POINTS_LEGACY, TREE_PLACEMENTS, TREE_PLACE_INFO,
    TREE_SCORING, TREE_SCORING_NOTE, TREE_SUB_NAME, TREE_TITLE_POINTS, WILDCARD,
};
use super::points::{
    sort_lifetime_points, sort_places, sort_title_points, LifetimePoints, PlaceInfo, TitlePoints,
};
use super::{
    child_text, optional, optional_date, optional_string, required_name, save_child_text,
    LoadContext,
};
use crate::error::{Error, Result};
use crate::merge::{Indent, Messages, Named, Section, Tally};
use crate::tree::{DateFormat, ElementNode, Version};

/// Format version that moved table and sub-name settings onto scoring rules
const SCORING_OWNS_TABLE: Version = Version::new(15, 0);
/// Format versions up to this one implied dropped fractions for 100-point scoring
const IMPLIED_DROP_FRACTIONS: Version = Version::new(3, 0);
/// Title points moved from `Clean`/`WithFaults` attributes to child elements
const TITLE_POINTS_ELEMENTS: Version = Version::new(5, 0);
/// `machPts` was renamed `speedPts`
const SPEED_PTS_RENAMED: Version = Version::new(10, 1);
/// `LifeTime` children are only read from this version on
const LIFETIME_CHILDREN: Version = Version::new(10, 0);
/// Double Qs became multi-Q rules
const DOUBLE_Q_RETIRED: Version = Version::new(11, 0);
/// Speed points gained an explicit place schedule
const EXPLICIT_PLACE_INFO: Version = Version::new(12, 3);

/// How a run is scored
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScoringStyle {
    #[default]
    FaultsThenTime,
    Faults100ThenTime,
    Faults200ThenTime,
    OcScoreThenTime,
    ScoreThenTime,
    TimePlusFaults,
}

impl ScoringStyle {
    pub const ALL: [Self; 6] = [
        Self::FaultsThenTime,
        Self::Faults100ThenTime,
        Self::Faults200ThenTime,
        Self::OcScoreThenTime,
        Self::ScoreThenTime,
        Self::TimePlusFaults,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FaultsThenTime => "FaultsThenTime",
            Self::Faults100ThenTime => "Faults100ThenTime",
            Self::Faults200ThenTime => "Faults200ThenTime",
            Self::OcScoreThenTime => "OCScoreThenTime",
            Self::ScoreThenTime => "ScoreThenTime",
            Self::TimePlusFaults => "TimePlusFaults",
        }
    }
}

impl fmt::Display for ScoringStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScoringStyle {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|style| style.as_str() == s).ok_or(())
    }
}

/// Scoring for one division/level of an event during a date range
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scoring {
    pub division: String,
    pub level: String,
    pub valid_from: Option<Date>,
    pub valid_to: Option<Date>,
    pub style: ScoringStyle,
    pub drop_fractions: bool,
    pub clean_q: bool,
    pub time_faults_under: bool,
    pub time_faults_over: bool,
    pub subtract_time_faults: bool,
    pub time_fault_multiplier: f64,
    pub super_q: bool,
    pub speed_pts: bool,
    pub has_table: bool,
    pub has_sub_names: bool,
    pub sub_names: BTreeSet<String>,
    pub opening_pts: i16,
    pub closing_pts: i16,
    pub note: String,
    pub bonus_pts: bool,
    /// Speed point multipliers by place
    pub place_info: Vec<PlaceInfo>,
    pub title_points: Vec<TitlePoints>,
    pub lifetime_points: Vec<LifetimePoints>,
    /// Placement points by place
    pub placements: Vec<PlaceInfo>,
    /// `doubleQ` from files before 11.0. The venue turns flagged rules
    /// into a multi-Q rule and clears it; never saved.
    pub double_q: bool,
}

impl Scoring {
    pub fn new(division: impl Into<String>, level: impl Into<String>, style: ScoringStyle) -> Self {
        Self {
            division: division.into(),
            level: level.into(),
            style,
            time_fault_multiplier: 1.0,
            ..Self::default()
        }
    }

    /// Identity used when merging rule lists
    pub fn key(&self) -> (&str, &str) {
        (&self.division, &self.level)
    }

    /// Whether this rule covers `division`/`level`, honoring wildcards
    pub fn applies_to(&self, division: &str, level: &str) -> bool {
        (self.division == WILDCARD || self.division == division)
            && (self.level == WILDCARD || self.level == level)
    }

    pub fn load(
        node: &ElementNode,
        divisions: &[Division],
        ctx: &mut LoadContext<'_>,
    ) -> Result<Self> {
        let valid_from = optional_date(node, ATTRIB_SCORING_VALID_FROM, ctx.dates)?;
        let valid_to = optional_date(node, ATTRIB_SCORING_VALID_TO, ctx.dates)?;
        let division = required_name(node, ATTRIB_SCORING_DIVISION)?;
        let level = required_name(node, ATTRIB_SCORING_LEVEL)?;
        if !verify_div_level(divisions, &division, &level) {
            return Err(Error::invalid_attribute(
                TREE_SCORING,
                ATTRIB_SCORING_LEVEL,
                format!("unknown division/level {division}/{level}"),
            ));
        }

        let style_text = required_name(node, ATTRIB_SCORING_TYPE)?;
        let style: ScoringStyle = style_text.parse().map_err(|()| {
            let valid: Vec<_> = ScoringStyle::ALL.iter().map(|s| s.as_str()).collect();
            Error::invalid_attribute(
                TREE_SCORING,
                ATTRIB_SCORING_TYPE,
                format!("valid values: {}", valid.join(", ")),
            )
        })?;
        let implied_drop =
            style == ScoringStyle::Faults100ThenTime && ctx.version <= IMPLIED_DROP_FRACTIONS;

        let mut speed_pts = optional(node, ATTRIB_SCORING_SPEED_PTS, false)?;
        if ctx.version >= TITLE_POINTS_ELEMENTS && ctx.version < SPEED_PTS_RENAMED {
            speed_pts = optional(node, ATTRIB_SCORING_MACH_PTS, speed_pts)?;
        }
        let mut scoring = Self {
            division,
            level,
            valid_from,
            valid_to,
            style,
            drop_fractions: optional(node, ATTRIB_SCORING_DROP_FRACTIONS, implied_drop)?,
            clean_q: optional(node, ATTRIB_SCORING_CLEAN_Q, false)?,
            time_faults_under: optional(node, ATTRIB_SCORING_TIME_FAULTS_UNDER, false)?,
            time_faults_over: optional(node, ATTRIB_SCORING_TIME_FAULTS_OVER, false)?,
            subtract_time_faults: optional(node, ATTRIB_SCORING_SUBTRACT_TIME_FAULTS, false)?,
            time_fault_multiplier: optional(node, ATTRIB_SCORING_TIME_FAULT_MULTIPLIER, 1.0)?,
            super_q: optional(node, ATTRIB_SCORING_SUPER_Q, false)?,
            speed_pts,
            has_table: optional(node, ATTRIB_SCORING_HAS_TABLE, false)?,
            has_sub_names: optional(node, ATTRIB_SCORING_HAS_SUB_NAMES, false)?,
            sub_names: BTreeSet::new(),
            opening_pts: optional(node, ATTRIB_SCORING_OPENING_PTS, 0)?,
            closing_pts: optional(node, ATTRIB_SCORING_CLOSING_PTS, 0)?,
            note: child_text(node, TREE_SCORING_NOTE),
            bonus_pts: optional(node, ATTRIB_SCORING_BONUS_PTS, false)?,
            place_info: Vec::new(),
            title_points: Vec::new(),
            lifetime_points: Vec::new(),
            placements: Vec::new(),
            double_q: ctx.version < DOUBLE_Q_RETIRED
                && optional(node, ATTRIB_SCORING_DOUBLE_Q, false)?,
        };
        scoring.sub_names.extend(
            node.elements()
                .filter(|c| c.name() == TREE_SUB_NAME)
                .map(ElementNode::value)
                .filter(|name| !name.is_empty()),
        );

        if ctx.version < TITLE_POINTS_ELEMENTS {
            scoring.load_legacy_title_points(node)?;
            return Ok(scoring);
        }
        if scoring.speed_pts && ctx.version < EXPLICIT_PLACE_INFO {
            scoring.place_info.extend([PlaceInfo::new(1, 2.0), PlaceInfo::new(2, 1.5)]);
        }
        for child in node.elements() {
            match child.name() {
                TREE_PLACE_INFO => scoring.place_info.push(PlaceInfo::load(child)?),
                TREE_TITLE_POINTS => {
                    let (entry, lifetime) = TitlePoints::load(child, ctx.version)?;
                    scoring.title_points.push(entry);
                    scoring.lifetime_points.extend(lifetime);
                }
                TREE_LIFETIME_POINTS | TREE_LIFETIME_POINTS_LEGACY
                    if ctx.version >= LIFETIME_CHILDREN =>
                {
                    scoring.lifetime_points.push(LifetimePoints::load(child, ctx.version)?);
                }
                TREE_PLACEMENTS => {
                    for place in child.elements().filter(|c| c.name() == TREE_PLACE_INFO) {
                        scoring.placements.push(PlaceInfo::load(place)?);
                    }
                }
                _ => {}
            }
        }
        sort_places(&mut scoring.place_info);
        sort_title_points(&mut scoring.title_points);
        sort_lifetime_points(&mut scoring.lifetime_points);
        sort_places(&mut scoring.placements);
        Ok(scoring)
    }

    /// Before 5.0 title points were `Clean` (points for a clean run) plus
    /// `WithFaults` points allowed up to `FaultsAllowed` faults
    fn load_legacy_title_points(&mut self, node: &ElementNode) -> Result<()> {
        let clean: i16 = optional(node, ATTRIB_SCORING_CLEAN, 0)?;
        if clean > 0 {
            self.title_points.push(TitlePoints::new(f64::from(clean), 0.0));
        }
        let faults_allowed: i16 = optional(node, ATTRIB_SCORING_FAULTS_ALLOWED, 0)?;
        let with_faults: i16 = optional(node, ATTRIB_SCORING_WITH_FAULTS, 0)?;
        if faults_allowed > 0 && with_faults > 0 {
            self.title_points
                .push(TitlePoints::new(f64::from(with_faults), f64::from(faults_allowed)));
        }
        Ok(())
    }

    pub fn save(&self, parent: &mut ElementNode, dates: &dyn DateFormat) {
        let node = parent.add_element_node(TREE_SCORING);
        if let Some(date) = self.valid_from {
            node.add_attrib_date(ATTRIB_SCORING_VALID_FROM, date, dates);
        }
        if let Some(date) = self.valid_to {
            node.add_attrib_date(ATTRIB_SCORING_VALID_TO, date, dates);
        }
        node.add_attrib(ATTRIB_SCORING_DIVISION, &self.division);
        node.add_attrib(ATTRIB_SCORING_LEVEL, &self.level);
        node.add_attrib(ATTRIB_SCORING_TYPE, self.style.as_str());

        let flags = [
            (ATTRIB_SCORING_DROP_FRACTIONS, self.drop_fractions),
            (ATTRIB_SCORING_CLEAN_Q, self.clean_q),
            (ATTRIB_SCORING_TIME_FAULTS_UNDER, self.time_faults_under),
            (ATTRIB_SCORING_TIME_FAULTS_OVER, self.time_faults_over),
            (ATTRIB_SCORING_SUBTRACT_TIME_FAULTS, self.subtract_time_faults),
            (ATTRIB_SCORING_SUPER_Q, self.super_q),
            (ATTRIB_SCORING_SPEED_PTS, self.speed_pts),
            (ATTRIB_SCORING_HAS_TABLE, self.has_table),
            (ATTRIB_SCORING_HAS_SUB_NAMES, self.has_sub_names),
            (ATTRIB_SCORING_BONUS_PTS, self.bonus_pts),
        ];
        for (attrib, value) in flags {
            if value {
                node.add_attrib_value(attrib, &value);
            }
        }
        if (self.time_fault_multiplier - 1.0).abs() > f64::EPSILON {
            node.add_attrib_value(ATTRIB_SCORING_TIME_FAULT_MULTIPLIER, &self.time_fault_multiplier);
        }
        if self.opening_pts != 0 {
            node.add_attrib_value(ATTRIB_SCORING_OPENING_PTS, &self.opening_pts);
        }
        if self.closing_pts != 0 {
            node.add_attrib_value(ATTRIB_SCORING_CLOSING_PTS, &self.closing_pts);
        }
        save_child_text(node, TREE_SCORING_NOTE, &self.note);
        for name in &self.sub_names {
            node.add_element_node(TREE_SUB_NAME).set_value(name);
        }
        if self.speed_pts {
            for entry in &self.place_info {
                entry.save(node);
            }
        }
        for entry in &self.title_points {
            entry.save(node);
        }
        for entry in &self.lifetime_points {
            entry.save(node);
        }
        if !self.placements.is_empty() {
            let places = node.add_element_node(TREE_PLACEMENTS);
            for entry in &self.placements {
                entry.save(places);
            }
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Event {
    pub name: String,
    pub short_name: String,
    pub desc: String,
    pub has_partner: bool,
    pub scorings: Vec<Scoring>,
}

impl Event {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_scorings(mut self, scorings: impl IntoIterator<Item = Scoring>) -> Self {
        self.scorings.extend(scorings);
        self
    }

    /// First rule covering `division`/`level`
    pub fn find_scoring(&self, division: &str, level: &str) -> Option<&Scoring> {
        self.scorings.iter().find(|s| s.applies_to(division, level))
    }

    /// Load an event whose rules refer to `divisions`. Rules that fail to
    /// load are reported and left out.
    pub fn load(
        node: &ElementNode,
        divisions: &[Division],
        ctx: &mut LoadContext<'_>,
    ) -> Result<Self> {
        let mut event = Self {
            name: required_name(node, ATTRIB_EVENT_NAME)?,
            short_name: optional_string(node, ATTRIB_EVENT_SHORT_NAME),
            desc: child_text(node, TREE_EVENT_DESC),
            has_partner: optional(node, ATTRIB_EVENT_HAS_PARTNER, false)?,
            scorings: Vec::new(),
        };

        let legacy = ctx.version < SCORING_OWNS_TABLE;
        let (has_table, has_sub_names) = if legacy {
            (
                optional(node, ATTRIB_EVENT_HAS_TABLE, false)?,
                optional(node, ATTRIB_EVENT_HAS_SUB_NAMES, false)?,
            )
        } else {
            (false, false)
        };
        let mut sub_names = BTreeSet::new();

        for child in node.elements() {
            match child.name() {
                TREE_SCORING => match Scoring::load(child, divisions, ctx) {
                    Ok(scoring) => event.scorings.push(scoring),
                    Err(err) => ctx.skip(TREE_SCORING, &err),
                },
                TREE_SUB_NAME if legacy => {
                    sub_names.insert(child.value());
                }
                _ => {}
            }
        }

        if legacy && (has_table || has_sub_names) {
            for scoring in &mut event.scorings {
                scoring.has_table = has_table;
                scoring.has_sub_names = has_sub_names;
                scoring.sub_names.clone_from(&sub_names);
            }
        }
        Ok(event)
    }

    pub fn save(&self, parent: &mut ElementNode, dates: &dyn DateFormat) {
        let node = parent.add_element_node(TREE_EVENT);
        node.add_attrib(ATTRIB_EVENT_NAME, &self.name);
        if !self.short_name.is_empty() {
            node.add_attrib(ATTRIB_EVENT_SHORT_NAME, &self.short_name);
        }
        if self.has_partner {
            node.add_attrib_value(ATTRIB_EVENT_HAS_PARTNER, &self.has_partner);
        }
        save_child_text(node, TREE_EVENT_DESC, &self.desc);
        for scoring in &self.scorings {
            scoring.save(node, dates);
        }
    }

    /// Merge `incoming` into this event. The rule list is replaced
    /// wholesale; the report counts rules by division and level.
    pub fn update(
        &mut self,
        incoming: &Self,
        indent: Indent,
        messages: &dyn Messages,
    ) -> Option<String> {
        let mut changed = false;
        if self.short_name != incoming.short_name {
            self.short_name.clone_from(&incoming.short_name);
            changed = true;
        }
        if self.desc != incoming.desc {
            self.desc.clone_from(&incoming.desc);
            changed = true;
        }
        if self.has_partner != incoming.has_partner {
            self.has_partner = incoming.has_partner;
            changed = true;
        }

        let mut rules = Tally::default();
        let rules_changed = self.scorings != incoming.scorings;
        if rules_changed {
            for rule in &incoming.scorings {
                if self.scorings.contains(rule) {
                    rules.skipped += 1;
                } else if self.scorings.iter().any(|live| live.key() == rule.key()) {
                    rules.updated += 1;
                } else {
                    rules.added += 1;
                }
            }
            rules.deleted = self
                .scorings
                .iter()
                .filter(|live| !incoming.scorings.iter().any(|rule| rule.key() == live.key()))
                .count();
            self.scorings.clone_from(&incoming.scorings);
            changed = true;
        }

        changed.then(|| {
            let mut report = indent.header(&self.name);
            if rules.has_changes() {
                report.push_str(&indent.body());
                report.push_str(&messages.summary(Section::ScoringRules, &rules));
                report.push('\n');
            } else if rules_changed {
                // same rules, different order
                report.push_str(&indent.body());
                report.push_str(&messages.reordered(Section::ScoringRules));
                report.push('\n');
            }
            report
        })
    }
}

impl Named for Event {
    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Level;
    use crate::diagnostics::Diagnostics;
    use crate::merge::EnglishMessages;
    use crate::tree::{parse_str, IsoDate};

    fn divisions() -> Vec<Division> {
        vec![Division::new("Standard").with_levels([
            Level::new("Novice").with_sub_levels(["Novice A", "Novice B"]),
            Level::new("Masters"),
        ])]
    }

    fn load(xml: &str, version: Version) -> Result<(Event, Diagnostics)> {
        let node = parse_str(xml)?;
        let mut diagnostics = Diagnostics::new();
        let mut ctx = LoadContext::new(version, &IsoDate, &mut diagnostics);
        let event = Event::load(&node, &divisions(), &mut ctx)?;
        Ok((event, diagnostics))
    }

    #[test]
    fn test_load_event_with_rules() -> Result<()> {
        let (event, diagnostics) = load(
            r#"<Event Name="Jumpers" hasPartner="n">
                <Desc>Jumps only</Desc>
                <Scoring Division="Standard" Level="Novice" type="FaultsThenTime" cleanQ="y"/>
                <Scoring Division="*" Level="*" type="TimePlusFaults" timeFault="2.5"/>
                <Scoring Division="Standard" Level="Elite" type="FaultsThenTime"/>
                <Scoring Division="Standard" Level="Masters" type="Whatever"/>
            </Event>"#,
            Version::new(15, 3),
        )?;
        assert_eq!(event.desc, "Jumps only");
        assert_eq!(event.scorings.len(), 2);
        assert!(event.scorings[0].clean_q);
        assert_eq!(event.scorings[1].time_fault_multiplier, 2.5);
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(
            event.find_scoring("Standard", "Masters").map(|s| s.style),
            Some(ScoringStyle::TimePlusFaults)
        );
        Ok(())
    }

    #[test]
    fn test_legacy_table_migrates_to_rules() -> Result<()> {
        let (event, _) = load(
            r#"<Event Name="Gamblers" hasTable="y" hasSubNames="y">
                <Scoring Division="Standard" Level="Novice" type="ScoreThenTime"/>
                <SubName>Joker</SubName>
            </Event>"#,
            Version::new(14, 5),
        )?;
        let rule = &event.scorings[0];
        assert!(rule.has_table && rule.has_sub_names);
        assert!(rule.sub_names.contains("Joker"));
        Ok(())
    }

    #[test]
    fn test_implied_drop_fractions() -> Result<()> {
        let (event, _) = load(
            r#"<Event Name="Snooker"><Scoring Division="Standard" Level="Masters" type="Faults100ThenTime"/></Event>"#,
            Version::new(3, 0),
        )?;
        assert!(event.scorings[0].drop_fractions);
        Ok(())
    }

    #[test]
    fn test_invalid_partner_flag() {
        assert!(load(r#"<Event Name="Pairs" hasPartner="1"/>"#, Version::new(15, 3)).is_err());
    }

    #[test]
    fn test_save_load_round_trip() -> Result<()> {
        let mut rule = Scoring::new("Standard", "Novice A", ScoringStyle::OcScoreThenTime);
        rule.opening_pts = 20;
        rule.has_sub_names = true;
        rule.sub_names.insert("Gamble".to_string());
        rule.note = "opening period".to_string();
        let event = Event {
            short_name: "Gm".to_string(),
            has_partner: true,
            ..Event::new("Gamblers").with_scorings([rule])
        };
        let mut parent = ElementNode::new("Venue");
        event.save(&mut parent, &IsoDate);
        let node = parent.element_node(0).cloned().unwrap_or_default();
        let mut diagnostics = Diagnostics::new();
        let mut ctx = LoadContext::new(Version::new(15, 3), &IsoDate, &mut diagnostics);
        assert_eq!(Event::load(&node, &divisions(), &mut ctx)?, event);
        Ok(())
    }

    #[test]
    fn test_update_counts_rules() {
        let novice = Scoring::new("Standard", "Novice", ScoringStyle::FaultsThenTime);
        let masters = Scoring::new("Standard", "Masters", ScoringStyle::FaultsThenTime);
        let mut changed_masters = masters.clone();
        changed_masters.super_q = true;
        let open = Scoring::new("*", "*", ScoringStyle::TimePlusFaults);

        let mut live = Event::new("Jumpers").with_scorings([novice.clone(), masters, open]);
        let incoming = Event::new("Jumpers").with_scorings([
            novice,
            changed_masters,
            Scoring::new("Standard", "Novice B", ScoringStyle::FaultsThenTime),
        ]);
        let report = live.update(&incoming, Indent(2), &EnglishMessages);
        assert_eq!(live.scorings, incoming.scorings);
        assert_eq!(
            report.as_deref(),
            Some("   -Jumpers\n      Scoring Rules: 1 added, 1 updated, 1 identical, 1 deleted\n")
        );
    }

    #[test]
    fn test_point_schedules_survive_save() -> Result<()> {
        let (event, diagnostics) = load(
            r#"<Event Name="Jumpers">
                <Scoring Division="Standard" Level="Masters" type="FaultsThenTime" speedPts="y" bonusPts="y">
                    <PlaceInfo Place="2" Value="1.5"/>
                    <PlaceInfo Place="1" Value="2"/>
                    <TitlePoints Points="5" Faults="5"/>
                    <TitlePoints Points="10" Faults="0"/>
                    <LifetimePoints Points="10" Faults="0"/>
                    <Placements><PlaceInfo Place="1" Value="3" MustQ="n"/></Placements>
                </Scoring>
            </Event>"#,
            Version::new(15, 3),
        )?;
        assert!(diagnostics.is_empty());
        let rule = &event.scorings[0];
        assert!(rule.bonus_pts);
        assert_eq!(rule.place_info.iter().map(|p| p.place).collect::<Vec<_>>(), [1, 2]);
        assert_eq!(
            rule.title_points,
            [TitlePoints::new(10.0, 0.0), TitlePoints::new(5.0, 5.0)]
        );
        assert_eq!(rule.lifetime_points, [LifetimePoints::new(10.0, 0.0)]);
        assert_eq!(rule.placements.len(), 1);
        assert!(!rule.placements[0].must_q);

        let mut parent = ElementNode::new("Venue");
        event.save(&mut parent, &IsoDate);
        let node = parent.element_node(0).cloned().unwrap_or_default();
        let mut diagnostics = Diagnostics::new();
        let mut ctx = LoadContext::new(Version::new(15, 3), &IsoDate, &mut diagnostics);
        assert_eq!(Event::load(&node, &divisions(), &mut ctx)?, event);
        Ok(())
    }

    #[test]
    fn test_bad_title_points_fail_the_rule() -> Result<()> {
        let (event, diagnostics) = load(
            r#"<Event Name="Jumpers">
                <Scoring Division="Standard" Level="Masters" type="FaultsThenTime">
                    <TitlePoints Points="10"/>
                </Scoring>
            </Event>"#,
            Version::new(15, 3),
        )?;
        assert!(event.scorings.is_empty());
        assert_eq!(diagnostics.len(), 1);
        Ok(())
    }

    #[test]
    fn test_mach_points_become_speed_points() -> Result<()> {
        let (event, _) = load(
            r#"<Event Name="Jumpers">
                <Scoring Division="Standard" Level="Masters" type="FaultsThenTime" machPts="y"/>
            </Event>"#,
            Version::new(10, 0),
        )?;
        let rule = &event.scorings[0];
        assert!(rule.speed_pts);
        assert_eq!(rule.place_info, [PlaceInfo::new(1, 2.0), PlaceInfo::new(2, 1.5)]);
        Ok(())
    }

    #[test]
    fn test_legacy_title_points_attributes() -> Result<()> {
        let (event, _) = load(
            r#"<Event Name="Standard">
                <Scoring Division="Standard" Level="Masters" type="FaultsThenTime" Clean="10" FaultsAllowed="5" WithFaults="7" doubleQ="y"/>
            </Event>"#,
            Version::new(4, 0),
        )?;
        let rule = &event.scorings[0];
        assert_eq!(
            rule.title_points,
            [TitlePoints::new(10.0, 0.0), TitlePoints::new(7.0, 5.0)]
        );
        assert!(rule.double_q);
        Ok(())
    }
}
