//! Divisions and the leaf-level namespace they own

use tracing::{debug, info};

use super::level::Level;
use super::names::{ATTRIB_DIVISION_NAME, TREE_DIVISION, TREE_LEVEL, TREE_TITLES, WILDCARD};
use super::title::Title;
use super::{required_name, LoadContext};
use crate::error::Result;
use crate::merge::{self, reorder_by, Indent, Messages, Named, Section};
use crate::tree::{ElementNode, Version};

/// Appended to a level name until it no longer collides with a leaf
const COLLISION_MARKER: char = '?';
/// Titles moved from divisions up to their venue
const VENUE_OWNS_TITLES: Version = Version::new(12, 0);

/// A division of a venue. Every leaf identifier (each sub-level name, and
/// the name of each level without sub-levels) is unique within it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Division {
    pub name: String,
    pub levels: Vec<Level>,
}

/// What happened when a sub-level was deleted
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubLevelRemoval {
    /// The level that owned the sub-level, under its final name
    pub level: String,
    /// Previous level name when the deletion forced a rename
    pub renamed_from: Option<String>,
}

impl Division {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            levels: Vec::new(),
        }
    }

    pub fn with_levels(mut self, levels: impl IntoIterator<Item = Level>) -> Self {
        self.levels.extend(levels);
        self
    }

    /// Load a division. Files before 12.0 nested titles here; those are
    /// appended to `titles` (the venue's list) unless already present.
    pub fn load(
        node: &ElementNode,
        titles: &mut Vec<Title>,
        ctx: &mut LoadContext<'_>,
    ) -> Result<Self> {
        let mut division = Self::new(required_name(node, ATTRIB_DIVISION_NAME)?);
        for child in node.elements() {
            match child.name() {
                TREE_LEVEL => match Level::load(child, ctx) {
                    Ok(level) => division.levels.push(level),
                    Err(err) => ctx.skip(TREE_LEVEL, &err),
                },
                TREE_TITLES if ctx.version < VENUE_OWNS_TITLES => match Title::load(child, ctx) {
                    Ok(title) if titles.iter().any(|t| t.name == title.name) => {
                        debug!(division = %division.name, title = %title.name, "duplicate title");
                    }
                    Ok(title) => titles.push(title),
                    Err(err) => ctx.skip(TREE_TITLES, &err),
                },
                _ => {}
            }
        }
        Ok(division)
    }

    pub fn save(&self, parent: &mut ElementNode) {
        let node = parent.add_element_node(TREE_DIVISION);
        node.add_attrib(ATTRIB_DIVISION_NAME, &self.name);
        for level in &self.levels {
            level.save(node);
        }
    }

    pub fn find_level(&self, name: &str) -> Option<&Level> {
        self.levels.iter().find(|level| level.name == name)
    }

    /// The level owning leaf identifier `name`: either a level without
    /// sub-levels named `name`, or the parent of a sub-level named `name`
    pub fn find_leaf(&self, name: &str) -> Option<&Level> {
        self.levels
            .iter()
            .find(|level| level.leaf_names().any(|leaf| leaf == name))
    }

    /// Whether `name` is a level or leaf of this division
    pub fn verify_level(&self, name: &str) -> bool {
        self.find_level(name).is_some() || self.find_leaf(name).is_some()
    }

    /// Add a level unless its name or any of its sub-level names is
    /// already a leaf identifier here
    pub fn add_level(&mut self, level: Level) -> bool {
        if !admits_level(&self.levels, &level) {
            return false;
        }
        self.levels.push(level);
        true
    }

    /// Delete sub-level `name`. When it was its level's only sub-level the
    /// level becomes a leaf itself, and is renamed with trailing markers
    /// if its name is already taken by another leaf.
    pub fn delete_sub_level(&mut self, name: &str) -> Option<SubLevelRemoval> {
        let (level_index, sub_index) = self.levels.iter().enumerate().find_map(|(li, level)| {
            level
                .sub_levels
                .iter()
                .position(|sub| sub.name == name)
                .map(|si| (li, si))
        })?;

        let level = self.levels.get(level_index)?;
        let original = level.name.clone();
        let mut final_name = original.clone();
        if level.sub_levels.len() == 1 {
            while self.find_leaf(&final_name).is_some() {
                final_name.push(COLLISION_MARKER);
            }
        }

        let level = self.levels.get_mut(level_index)?;
        level.sub_levels.remove(sub_index);
        let renamed_from = (final_name != original).then(|| {
            level.name.clone_from(&final_name);
            original
        });
        if let Some(old) = &renamed_from {
            info!(division = %self.name, from = %old, to = %final_name, "level renamed");
        }
        Some(SubLevelRemoval {
            level: final_name,
            renamed_from,
        })
    }

    /// [`delete_sub_level`](Self::delete_sub_level), appending a report
    /// line when a rename happened
    pub fn delete_sub_level_reported(
        &mut self,
        name: &str,
        indent: Indent,
        messages: &dyn Messages,
        report: &mut String,
    ) -> Option<SubLevelRemoval> {
        let removal = self.delete_sub_level(name)?;
        if let Some(old) = &removal.renamed_from {
            report.push_str(&indent.body());
            report.push_str(&messages.level_renamed(old, &removal.level));
            report.push('\n');
        }
        Some(removal)
    }

    /// Merge `incoming` into this division
    pub fn update(
        &mut self,
        incoming: &Self,
        indent: Indent,
        messages: &dyn Messages,
    ) -> Option<String> {
        let mut levels = merge::reconcile_admitting(
            &mut self.levels,
            &incoming.levels,
            indent,
            admits_level,
            |levels, index, other| {
                let taken: Vec<String> = levels
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != index)
                    .flat_map(|(_, level)| level.leaf_names().map(str::to_string))
                    .collect();
                levels
                    .get_mut(index)?
                    .update(other, &taken, indent.nested(), messages)
            },
        );
        levels.reordered = reorder_by(&mut self.levels, &incoming.levels);

        levels.changed().then(|| {
            let mut report = indent.header(&self.name);
            merge::write_section(&mut report, indent, messages, Section::Levels, &levels);
            report
        })
    }
}

/// Whether `level` can join `levels` without breaking leaf uniqueness
fn admits_level(levels: &[Level], level: &Level) -> bool {
    let is_leaf = |name: &str| levels.iter().any(|l| l.leaf_names().any(|leaf| leaf == name));
    levels.iter().all(|l| l.name != level.name)
        && !is_leaf(&level.name)
        && !level.leaf_names().any(is_leaf)
}

impl Named for Division {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Whether `division`/`level` names something in `divisions`. Either part
/// may be the wildcard.
pub fn verify_div_level(divisions: &[Division], division: &str, level: &str) -> bool {
    divisions
        .iter()
        .filter(|d| division == WILDCARD || d.name == division)
        .any(|d| level == WILDCARD || d.verify_level(level))
}
