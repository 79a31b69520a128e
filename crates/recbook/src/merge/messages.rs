//! Report text provider

use super::Tally;
use crate::config::{ActionVerb, ConfigAction};

/// The list a summary line describes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Section {
    CalSites,
    Faults,
    OtherPoints,
    Venues,
    LifetimeNames,
    Titles,
    Divisions,
    Levels,
    SubLevels,
    Events,
    ScoringRules,
    MultiQs,
}

impl Section {
    /// Sections whose entries can never change in place
    fn add_only(self) -> bool {
        matches!(self, Self::Faults | Self::LifetimeNames | Self::SubLevels)
    }

    /// Sections replaced wholesale, so live-only entries are dropped
    fn tracks_deletions(self) -> bool {
        matches!(self, Self::CalSites | Self::ScoringRules | Self::MultiQs)
    }
}

/// Localized text for merge reports. Implementors supply the words; the
/// default methods assemble them into lines.
pub trait Messages {
    fn section_name(&self, section: Section) -> &str;

    fn added(&self) -> &str;
    fn updated(&self) -> &str;
    fn identical(&self) -> &str;
    fn deleted(&self) -> &str;
    fn reordered_word(&self) -> &str;

    /// `Name: N added, N updated, N identical[, N deleted]`
    fn summary(&self, section: Section, tally: &Tally) -> String {
        let mut parts = vec![format!("{} {}", tally.added, self.added())];
        if !section.add_only() && section != Section::MultiQs {
            parts.push(format!("{} {}", tally.updated, self.updated()));
        }
        parts.push(format!("{} {}", tally.skipped, self.identical()));
        if section.tracks_deletions() {
            parts.push(format!("{} {}", tally.deleted, self.deleted()));
        }
        format!("{}: {}", self.section_name(section), parts.join(", "))
    }

    fn reordered(&self, section: Section) -> String {
        format!("{}: {}", self.section_name(section), self.reordered_word())
    }

    fn level_renamed(&self, old: &str, new: &str) -> String;

    /// An incoming entry left out because its name is already taken
    fn refused(&self, name: &str) -> String;

    /// A rename or delete applied before the merge
    fn action(&self, action: &ConfigAction) -> String;
}

/// Built-in English text
#[derive(Clone, Copy, Debug, Default)]
pub struct EnglishMessages;

impl Messages for EnglishMessages {
    fn section_name(&self, section: Section) -> &str {
        match section {
            Section::CalSites => "Calendar Sites",
            Section::Faults => "Faults",
            Section::OtherPoints => "Other Points",
            Section::Venues => "Venues",
            Section::LifetimeNames => "Lifetime Names",
            Section::Titles => "Titles",
            Section::Divisions => "Divisions",
            Section::Levels => "Levels",
            Section::SubLevels => "Sub-Levels",
            Section::Events => "Events",
            Section::ScoringRules => "Scoring Rules",
            Section::MultiQs => "Multiple Qs",
        }
    }

    fn added(&self) -> &str {
        "added"
    }

    fn updated(&self) -> &str {
        "updated"
    }

    fn identical(&self) -> &str {
        "identical"
    }

    fn deleted(&self) -> &str {
        "deleted"
    }

    fn reordered_word(&self) -> &str {
        "reordered"
    }

    fn level_renamed(&self, old: &str, new: &str) -> String {
        format!("Level '{old}' renamed to '{new}' to keep level names unique")
    }

    fn refused(&self, name: &str) -> String {
        format!("'{name}' not added: the name is already in use")
    }

    fn action(&self, action: &ConfigAction) -> String {
        let ConfigAction {
            venue,
            old_name: old,
            new_name: new,
            ..
        } = action;
        match action.verb {
            ActionVerb::DeleteCalPlugin => format!("Calendar site '{old}' deleted"),
            ActionVerb::RenameVenue => format!("Venue '{old}' renamed to '{new}'"),
            ActionVerb::DeleteVenue => format!("Venue '{old}' deleted"),
            ActionVerb::RenameDivision => format!("{venue}: division '{old}' renamed to '{new}'"),
            ActionVerb::DeleteDivision => format!("{venue}: division '{old}' deleted"),
            ActionVerb::RenameLevel => format!("{venue}: level '{old}' renamed to '{new}'"),
            ActionVerb::DeleteLevel => format!("{venue}: level '{old}' deleted"),
            ActionVerb::RenameTitle => format!("{venue}: title '{old}' renamed to '{new}'"),
            ActionVerb::DeleteTitle => format!("{venue}: title '{old}' deleted"),
            ActionVerb::RenameEvent => format!("{venue}: event '{old}' renamed to '{new}'"),
            ActionVerb::DeleteEvent => format!("{venue}: event '{old}' deleted"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally() -> Tally {
        Tally {
            added: 1,
            updated: 2,
            skipped: 3,
            deleted: 4,
        }
    }

    #[test]
    fn test_summary_shapes() {
        let en = EnglishMessages;
        assert_eq!(
            en.summary(Section::Venues, &tally()),
            "Venues: 1 added, 2 updated, 3 identical"
        );
        assert_eq!(en.summary(Section::Faults, &tally()), "Faults: 1 added, 3 identical");
        assert_eq!(
            en.summary(Section::CalSites, &tally()),
            "Calendar Sites: 1 added, 2 updated, 3 identical, 4 deleted"
        );
        assert_eq!(
            en.summary(Section::MultiQs, &tally()),
            "Multiple Qs: 1 added, 3 identical, 4 deleted"
        );
    }

    #[test]
    fn test_reordered_line() {
        assert_eq!(EnglishMessages.reordered(Section::Levels), "Levels: reordered");
    }
}
