//! Levels and their sub-levels

use super::names::{
    ATTRIB_LEVEL_NAME, ATTRIB_LEVEL_SHORT_NAME, ATTRIB_SUB_LEVEL_NAME, TREE_LEVEL, TREE_SUB_LEVEL,
};
use super::{optional_string, required_name, LoadContext};
use crate::error::Result;
use crate::merge::{self, reorder_by, Indent, Messages, Named, Section};
use crate::tree::ElementNode;

/// A named subdivision of a level
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubLevel {
    pub name: String,
}

impl SubLevel {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn load(node: &ElementNode) -> Result<Self> {
        Ok(Self {
            name: required_name(node, ATTRIB_SUB_LEVEL_NAME)?,
        })
    }

    pub fn save(&self, parent: &mut ElementNode) {
        parent
            .add_element_node(TREE_SUB_LEVEL)
            .add_attrib(ATTRIB_SUB_LEVEL_NAME, &self.name);
    }
}

impl Named for SubLevel {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A competition level within a division
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Level {
    pub name: String,
    pub short_name: String,
    pub sub_levels: Vec<SubLevel>,
}

impl Level {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_sub_levels<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sub_levels.extend(names.into_iter().map(SubLevel::new));
        self
    }

    pub fn load(node: &ElementNode, ctx: &mut LoadContext<'_>) -> Result<Self> {
        let mut level = Self {
            name: required_name(node, ATTRIB_LEVEL_NAME)?,
            short_name: optional_string(node, ATTRIB_LEVEL_SHORT_NAME),
            sub_levels: Vec::new(),
        };
        for child in node.elements().filter(|c| c.name() == TREE_SUB_LEVEL) {
            match SubLevel::load(child) {
                Ok(sub) => level.sub_levels.push(sub),
                Err(err) => ctx.skip(TREE_SUB_LEVEL, &err),
            }
        }
        Ok(level)
    }

    pub fn save(&self, parent: &mut ElementNode) {
        let node = parent.add_element_node(TREE_LEVEL);
        node.add_attrib(ATTRIB_LEVEL_NAME, &self.name);
        if !self.short_name.is_empty() {
            node.add_attrib(ATTRIB_LEVEL_SHORT_NAME, &self.short_name);
        }
        for sub in &self.sub_levels {
            sub.save(node);
        }
    }

    pub fn find_sub_level(&self, name: &str) -> Option<&SubLevel> {
        self.sub_levels.iter().find(|sub| sub.name == name)
    }

    /// Names this level contributes to its division's leaf namespace
    pub fn leaf_names(&self) -> impl Iterator<Item = &str> {
        let own = self.sub_levels.is_empty().then_some(self.name.as_str());
        own.into_iter()
            .chain(self.sub_levels.iter().map(|sub| sub.name.as_str()))
    }

    /// Merge `incoming` into this level. Sub-levels are only ever added,
    /// and never under a name in `taken` (the leaves of sibling levels).
    pub fn update(
        &mut self,
        incoming: &Self,
        taken: &[String],
        indent: Indent,
        messages: &dyn Messages,
    ) -> Option<String> {
        let mut changed = false;
        if self.short_name != incoming.short_name {
            self.short_name.clone_from(&incoming.short_name);
            changed = true;
        }

        let mut subs = merge::reconcile_admitting(
            &mut self.sub_levels,
            &incoming.sub_levels,
            indent,
            |_, sub| !taken.contains(&sub.name),
            |_, _, _| None,
        );
        subs.reordered = reorder_by(&mut self.sub_levels, &incoming.sub_levels);
        changed |= subs.changed();

        changed.then(|| {
            let mut report = indent.header(&self.name);
            merge::write_section(&mut report, indent, messages, Section::SubLevels, &subs);
            report
        })
    }
}

impl Named for Level {
    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostics;
    use crate::merge::EnglishMessages;
    use crate::tree::{parse_str, IsoDate, Version};

    #[test]
    fn test_load_and_save() -> Result<()> {
        let node = parse_str(
            "<Level Name=\"Novice\" ShortName=\"N\"><SubLevel Name=\"N-A\"/><SubLevel/></Level>",
        )?;
        let mut diagnostics = Diagnostics::new();
        let mut ctx = LoadContext::new(Version::new(15, 3), &IsoDate, &mut diagnostics);
        let level = Level::load(&node, &mut ctx)?;
        assert_eq!(level.short_name, "N");
        assert_eq!(level.sub_levels, vec![SubLevel::new("N-A")]);
        assert_eq!(diagnostics.len(), 1);

        let mut parent = ElementNode::new("Division");
        level.save(&mut parent);
        assert_eq!(parent.element_node(0).and_then(|n| n.attrib("ShortName")), Some("N"));
        Ok(())
    }

    #[test]
    fn test_missing_name_fails() -> Result<()> {
        let node = parse_str("<Level ShortName=\"N\"/>")?;
        let mut diagnostics = Diagnostics::new();
        let mut ctx = LoadContext::new(Version::new(15, 3), &IsoDate, &mut diagnostics);
        assert!(Level::load(&node, &mut ctx).is_err());
        Ok(())
    }

    #[test]
    fn test_leaf_names() {
        let bare = Level::new("Open");
        assert_eq!(bare.leaf_names().collect::<Vec<_>>(), ["Open"]);
        let split = Level::new("Novice").with_sub_levels(["Novice A", "Novice B"]);
        assert_eq!(split.leaf_names().collect::<Vec<_>>(), ["Novice A", "Novice B"]);
    }

    #[test]
    fn test_update_adds_sub_levels_only() {
        let mut live = Level::new("Novice").with_sub_levels(["Mine", "B"]);
        let incoming = Level::new("Novice").with_sub_levels(["A", "B"]);
        let report = live.update(&incoming, &[], Indent(3), &EnglishMessages);
        let names: Vec<_> = live.sub_levels.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["A", "B", "Mine"]);
        assert_eq!(
            report.as_deref(),
            Some("      -Novice\n         Sub-Levels: 1 added, 1 identical\n         +A\n")
        );
    }

    #[test]
    fn test_update_identical_is_silent() {
        let mut live = Level::new("Novice").with_sub_levels(["A"]);
        let incoming = live.clone();
        assert_eq!(live.update(&incoming, &[], Indent(1), &EnglishMessages), None);
    }

    #[test]
    fn test_update_refuses_taken_sub_level() {
        let mut live = Level::new("Novice").with_sub_levels(["A"]);
        let incoming = Level::new("Novice").with_sub_levels(["A", "Open"]);
        let report = live.update(&incoming, &["Open".to_string()], Indent(1), &EnglishMessages);
        assert_eq!(live.sub_levels, vec![SubLevel::new("A")]);
        assert_eq!(
            report.as_deref(),
            Some("-Novice\n   'Open' not added: the name is already in use\n")
        );
    }
}
