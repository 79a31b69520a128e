use pretty_assertions::assert_eq;
use proptest::prelude::*;
use recbook::config::{
    ActionVerb, CalSite, ConfigAction, Division, Fault, Level, OtherPoints, PointsTally,
    SubLevelRemoval, Title, Venue,
};
use recbook::merge::{Indent, Messages, Section};
use recbook::{load_book_str, Configuration, Diagnostics, EnglishMessages};

const LIVE: &str = r#"<AgilityBook Book="15.3">
	<Configuration version="10">
		<FaultType>Refusal</FaultType>
		<OtherPts Name="Mine" Count="All"/>
		<Venue Name="USDAA">
			<Titles Name="AD"/>
			<Division Name="Standard">
				<Level Name="Novice"/>
			</Division>
		</Venue>
		<Venue Name="Local club"/>
	</Configuration>
</AgilityBook>"#;

const INCOMING: &str = r#"<AgilityBook Book="15.3">
	<Configuration version="11">
		<FaultType>Refusal</FaultType>
		<FaultType>Off course</FaultType>
		<Venue Name="USDAA">
			<Titles Name="AD" LongName="Agility Dog"/>
			<Division Name="Standard">
				<Level Name="Advanced"/>
			</Division>
		</Venue>
	</Configuration>
</AgilityBook>"#;

fn load(text: &str) -> Configuration {
    load_book_str(text, &mut Diagnostics::new())
        .map(|book| book.config)
        .unwrap_or_default()
}

#[test]
fn test_usdaa_level_merge() {
    let mut live = load(LIVE);
    let incoming = load(INCOMING);
    let outcome = live.update(&incoming, &EnglishMessages);

    assert!(outcome.changed);
    assert_eq!(
        outcome.report,
        concat!(
            "Faults: 1 added, 1 identical\n",
            "+Off course\n",
            "Venues: 0 added, 1 updated, 0 identical\n",
            "-USDAA\n",
            "   Titles: 0 added, 1 updated, 0 identical\n",
            "   Divisions: 0 added, 1 updated, 0 identical\n",
            "   -Standard\n",
            "      Levels: 1 added, 0 updated, 0 identical\n",
            "      +Advanced\n",
        )
    );

    let standard = live
        .find_venue("USDAA")
        .and_then(|v| v.find_division("Standard"))
        .cloned()
        .unwrap_or_default();
    let levels: Vec<_> = standard.levels.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(levels, ["Advanced", "Novice"]);
    assert_eq!(
        live.find_venue("USDAA")
            .and_then(|v| v.find_title("AD"))
            .map(|t| t.long_name.as_str()),
        Some("Agility Dog")
    );
    // live-only entities survive
    assert!(live.find_venue("Local club").is_some());
    assert_eq!(live.other_points.len(), 1);
    assert_eq!(live.version, 11);
}

#[test]
fn test_merge_is_idempotent() {
    let mut live = load(LIVE);
    let incoming = load(INCOMING);
    live.update(&incoming, &EnglishMessages);

    let merged = live.clone();
    let outcome = live.update(&incoming, &EnglishMessages);
    assert!(!outcome.changed, "{}", outcome.report);
    assert_eq!(live, merged);

    let mut copy = merged.clone();
    let outcome = copy.update(&merged, &EnglishMessages);
    assert!(!outcome.changed);
    assert_eq!(outcome.report, "");
}

#[test]
fn test_reorder_only_is_reported() {
    let mut live = Configuration::new(1);
    live.venues.push(Venue::new("A"));
    live.venues.push(Venue::new("B"));
    let mut incoming = Configuration::new(1);
    incoming.venues.push(Venue::new("B"));
    incoming.venues.push(Venue::new("A"));

    let outcome = live.update(&incoming, &EnglishMessages);
    assert!(outcome.changed);
    assert_eq!(outcome.report, "Venues: reordered\n");
    let names: Vec<_> = live.venues.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, ["B", "A"]);
}

#[test]
fn test_collision_repair_after_sub_level_deletion() {
    let mut division = Division::new("Standard").with_levels([
        Level::new("A").with_sub_levels(["A-Sub"]),
        Level::new("B").with_sub_levels(["A"]),
    ]);
    let mut report = String::new();
    let removal =
        division.delete_sub_level_reported("A-Sub", Indent(1), &EnglishMessages, &mut report);
    assert_eq!(
        removal,
        Some(SubLevelRemoval {
            level: "A?".to_string(),
            renamed_from: Some("A".to_string()),
        })
    );
    assert_eq!(report, "   Level 'A' renamed to 'A?' to keep level names unique\n");

    let mut leaves: Vec<&str> = division.levels.iter().flat_map(Level::leaf_names).collect();
    let count = leaves.len();
    leaves.sort_unstable();
    leaves.dedup();
    assert_eq!(leaves.len(), count);
}

#[test]
fn test_merge_keeps_leaf_names_unique() {
    let mut live = Configuration::new(1);
    live.venues.push(Venue::new("AKC").with_divisions([Division::new("D")
        .with_levels([Level::new("A").with_sub_levels(["X"]), Level::new("B")])]));
    let mut incoming = Configuration::new(1);
    incoming.venues.push(Venue::new("AKC").with_divisions([Division::new("D").with_levels([
        Level::new("X"),
        Level::new("B").with_sub_levels(["X", "B1"]),
    ])]));

    let outcome = live.update(&incoming, &EnglishMessages);
    assert!(outcome.report.contains("'X' not added: the name is already in use"));

    let division = live
        .find_venue("AKC")
        .and_then(|v| v.find_division("D"))
        .cloned()
        .unwrap_or_default();
    let leaves: Vec<&str> = division.levels.iter().flat_map(Level::leaf_names).collect();
    assert_eq!(leaves, ["B1", "X"]);
}

#[test]
fn test_actions_run_before_merge() {
    let mut live = load(LIVE);
    let incoming = load(&INCOMING.replace(
        "<Configuration version=\"11\">",
        concat!(
            "<Configuration version=\"11\">",
            "<Action Verb=\"RenameLevel\" Config=\"11\" Venue=\"USDAA\" Div=\"Standard\" ",
            "OldName=\"Novice\" NewName=\"Advanced\"/>",
            "<Action Verb=\"DeleteVenue\" Config=\"9\" OldName=\"Local club\"/>",
        ),
    ));
    assert_eq!(incoming.actions.len(), 2);

    let outcome = live.update(&incoming, &EnglishMessages);
    assert!(outcome.changed);
    // the stamp-9 delete is already behind a version 10 configuration
    assert!(
        outcome.report.starts_with("USDAA: level 'Novice' renamed to 'Advanced'\n\nFaults:"),
        "{}",
        outcome.report
    );
    assert!(live.find_venue("Local club").is_some());
    let standard = live
        .find_venue("USDAA")
        .and_then(|v| v.find_division("Standard"))
        .cloned()
        .unwrap_or_default();
    let levels: Vec<_> = standard.levels.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(levels, ["Advanced"]);
    assert!(live.actions.is_empty());

    // once at version 11 the rename is no longer pending
    let outcome = live.update(&incoming, &EnglishMessages);
    assert!(!outcome.changed, "{}", outcome.report);
}

#[test]
fn test_action_report_uses_injected_messages() {
    let mut live = Configuration::new(1);
    live.venues.push(Venue::new("AKC"));
    let mut incoming = live.clone();
    incoming.actions.push(ConfigAction::new(ActionVerb::RenameVenue, "AKC").renamed_to("CKC"));
    let outcome = live.update(&incoming, &Terse);
    assert!(outcome.report.starts_with("RenameVenue AKC\n\n"), "{}", outcome.report);
    assert!(live.find_venue("CKC").is_some());
}

/// Report text in another language
struct Terse;

impl Messages for Terse {
    fn section_name(&self, section: Section) -> &str {
        match section {
            Section::Venues => "V",
            Section::Titles => "T",
            _ => "?",
        }
    }

    fn added(&self) -> &str {
        "new"
    }

    fn updated(&self) -> &str {
        "chg"
    }

    fn identical(&self) -> &str {
        "same"
    }

    fn deleted(&self) -> &str {
        "del"
    }

    fn reordered_word(&self) -> &str {
        "moved"
    }

    fn level_renamed(&self, old: &str, new: &str) -> String {
        format!("{old}->{new}")
    }

    fn refused(&self, name: &str) -> String {
        format!("!{name}")
    }

    fn action(&self, action: &ConfigAction) -> String {
        format!("{} {}", action.verb, action.old_name)
    }
}

#[test]
fn test_injected_messages() {
    let mut live = Configuration::new(1);
    live.venues.push(Venue::new("AKC"));
    let mut incoming = live.clone();
    if let Some(venue) = incoming.venues.first_mut() {
        venue.titles.push(Title::new("CD"));
    }
    let outcome = live.update(&incoming, &Terse);
    assert_eq!(
        outcome.report,
        "V: 0 new, 1 chg, 0 same\n-AKC\n   T: 1 new, 0 chg, 0 same\n   +CD\n"
    );
}

fn arb_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[a-e]{1,2}", 0..6).prop_map(|set| set.into_iter().collect())
}

fn config_with(version: u32, faults: &[String], others: &[String], venues: &[String]) -> Configuration {
    let mut config = Configuration::new(version);
    config.faults = faults.iter().map(Fault::new).collect();
    config.other_points = others
        .iter()
        .map(|name| OtherPoints::new(name.clone(), PointsTally::All))
        .collect();
    config.venues = venues.iter().map(Venue::new).collect();
    config.cal_sites = venues
        .iter()
        .map(|name| CalSite::new(name.clone(), "http://example.com"))
        .collect();
    config
}

proptest! {
    #[test]
    fn merge_never_drops_names(
        live_names in (arb_names(), arb_names(), arb_names()),
        incoming_names in (arb_names(), arb_names(), arb_names()),
    ) {
        let mut live = config_with(1, &live_names.0, &live_names.1, &live_names.2);
        let incoming = config_with(1, &incoming_names.0, &incoming_names.1, &incoming_names.2);
        live.update(&incoming, &EnglishMessages);

        for name in &live_names.0 {
            prop_assert!(live.faults.iter().any(|f| &f.name == name));
        }
        for name in &live_names.1 {
            prop_assert!(live.other_points.iter().any(|o| &o.name == name));
        }
        for name in &live_names.2 {
            prop_assert!(live.find_venue(name).is_some());
        }
        // calendar sites follow the incoming list exactly
        prop_assert_eq!(&live.cal_sites, &incoming.cal_sites);
    }

    #[test]
    fn merge_version_is_monotonic(live_version in 0u32..100, incoming_version in 0u32..100) {
        let mut live = Configuration::new(live_version);
        let outcome = live.update(&Configuration::new(incoming_version), &EnglishMessages);
        prop_assert_eq!(live.version, live_version.max(incoming_version));
        prop_assert!(!outcome.changed);
    }

    #[test]
    fn merge_with_self_changes_nothing(names in (arb_names(), arb_names(), arb_names())) {
        let mut live = config_with(4, &names.0, &names.1, &names.2);
        let before = live.clone();
        let outcome = live.update(&before, &EnglishMessages);
        prop_assert!(!outcome.changed);
        prop_assert_eq!(live, before);
    }
}
