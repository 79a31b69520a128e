//! Point schedules carried by a scoring rule

use std::fmt;
use std::str::FromStr;

use super::names::{
    ATTRIB_LIFETIME_POINTS_FAULTS, ATTRIB_LIFETIME_POINTS_NAME, ATTRIB_LIFETIME_POINTS_POINTS,
    ATTRIB_LIFETIME_POINTS_SPEED_PTS, ATTRIB_PLACE_INFO_MUST_Q, ATTRIB_PLACE_INFO_PLACE,
    ATTRIB_PLACE_INFO_VALUE, ATTRIB_TITLE_POINTS_FAULTS, ATTRIB_TITLE_POINTS_LIFETIME,
    ATTRIB_TITLE_POINTS_POINTS, ATTRIB_TITLE_POINTS_TYPE, TREE_LIFETIME_POINTS, TREE_PLACE_INFO,
    TREE_TITLE_POINTS,
};
use super::{optional, optional_string, required};
use crate::error::{Error, Result};
use crate::tree::{ElementNode, Version};

/// `LifeTime="y"` on title points was replaced by its own element here
const LIFETIME_ELEMENT: Version = Version::new(10, 0);
/// Lifetime points became optional (speed points may stand in)
const OPTIONAL_LIFETIME_POINTS: Version = Version::new(14, 4);

/// How title points are computed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TitlePointsKind {
    /// Fixed points for runs within a fault allowance
    #[default]
    Normal,
    TimeToBeat,
    Uki,
}

impl TitlePointsKind {
    pub const ALL: [Self; 3] = [Self::Normal, Self::TimeToBeat, Self::Uki];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::TimeToBeat => "T2B",
            Self::Uki => "UKI",
        }
    }
}

impl fmt::Display for TitlePointsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TitlePointsKind {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == s).ok_or(())
    }
}

/// Title points earned with at most `faults` faults
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TitlePoints {
    pub points: f64,
    pub faults: f64,
    pub kind: TitlePointsKind,
}

impl TitlePoints {
    pub fn new(points: f64, faults: f64) -> Self {
        Self {
            points,
            faults,
            kind: TitlePointsKind::Normal,
        }
    }

    /// Load one entry. Files before 10.0 flag lifetime points with
    /// `LifeTime="y"`; such an entry is returned alongside.
    pub fn load(node: &ElementNode, version: Version) -> Result<(Self, Option<LifetimePoints>)> {
        let kind = match node.attrib(ATTRIB_TITLE_POINTS_TYPE) {
            None => TitlePointsKind::Normal,
            Some(text) => text.parse().map_err(|()| {
                let valid: Vec<_> = TitlePointsKind::ALL.iter().map(|k| k.as_str()).collect();
                Error::invalid_attribute(
                    TREE_TITLE_POINTS,
                    ATTRIB_TITLE_POINTS_TYPE,
                    format!("valid values: {}", valid.join(", ")),
                )
            })?,
        };
        if kind != TitlePointsKind::Normal {
            return Ok((
                Self {
                    kind,
                    ..Self::default()
                },
                None,
            ));
        }

        let entry = Self::new(
            required(node, ATTRIB_TITLE_POINTS_POINTS)?,
            required(node, ATTRIB_TITLE_POINTS_FAULTS)?,
        );
        let lifetime = (version < LIFETIME_ELEMENT
            && optional(node, ATTRIB_TITLE_POINTS_LIFETIME, false)?)
        .then(|| LifetimePoints::new(entry.points, entry.faults));
        Ok((entry, lifetime))
    }

    pub fn save(&self, parent: &mut ElementNode) {
        let node = parent.add_element_node(TREE_TITLE_POINTS);
        if self.kind == TitlePointsKind::Normal {
            node.add_attrib_value(ATTRIB_TITLE_POINTS_POINTS, &self.points);
            node.add_attrib_value(ATTRIB_TITLE_POINTS_FAULTS, &self.faults);
        } else {
            node.add_attrib(ATTRIB_TITLE_POINTS_TYPE, self.kind.as_str());
        }
    }
}

/// Lifetime points earned with at most `faults` faults
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LifetimePoints {
    /// Lifetime tally this entry feeds; empty is the venue default
    pub name: String,
    /// Award the run's speed points instead of `points`
    pub use_speed_pts: bool,
    pub points: f64,
    pub faults: f64,
}

impl LifetimePoints {
    pub fn new(points: f64, faults: f64) -> Self {
        Self {
            points,
            faults,
            ..Self::default()
        }
    }

    pub fn load(node: &ElementNode, version: Version) -> Result<Self> {
        let mut entry = if version < OPTIONAL_LIFETIME_POINTS {
            Self::new(required(node, ATTRIB_LIFETIME_POINTS_POINTS)?, 0.0)
        } else {
            Self {
                name: optional_string(node, ATTRIB_LIFETIME_POINTS_NAME),
                use_speed_pts: optional(node, ATTRIB_LIFETIME_POINTS_SPEED_PTS, false)?,
                points: optional(node, ATTRIB_LIFETIME_POINTS_POINTS, 0.0)?,
                faults: 0.0,
            }
        };
        entry.faults = required(node, ATTRIB_LIFETIME_POINTS_FAULTS)?;
        Ok(entry)
    }

    pub fn save(&self, parent: &mut ElementNode) {
        let node = parent.add_element_node(TREE_LIFETIME_POINTS);
        if !self.name.is_empty() {
            node.add_attrib(ATTRIB_LIFETIME_POINTS_NAME, &self.name);
        }
        node.add_attrib_value(ATTRIB_LIFETIME_POINTS_SPEED_PTS, &self.use_speed_pts);
        if !self.use_speed_pts {
            node.add_attrib_value(ATTRIB_LIFETIME_POINTS_POINTS, &self.points);
        }
        node.add_attrib_value(ATTRIB_LIFETIME_POINTS_FAULTS, &self.faults);
    }
}

/// Value of finishing in `place`
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlaceInfo {
    pub place: i16,
    pub value: f64,
    /// Only counts on a qualifying run
    pub must_q: bool,
}

impl PlaceInfo {
    pub fn new(place: i16, value: f64) -> Self {
        Self {
            place,
            value,
            must_q: true,
        }
    }

    pub fn load(node: &ElementNode) -> Result<Self> {
        Ok(Self {
            place: required(node, ATTRIB_PLACE_INFO_PLACE)?,
            value: required(node, ATTRIB_PLACE_INFO_VALUE)?,
            must_q: optional(node, ATTRIB_PLACE_INFO_MUST_Q, true)?,
        })
    }

    pub fn save(&self, parent: &mut ElementNode) {
        let node = parent.add_element_node(TREE_PLACE_INFO);
        node.add_attrib_value(ATTRIB_PLACE_INFO_PLACE, &self.place);
        node.add_attrib_value(ATTRIB_PLACE_INFO_VALUE, &self.value);
        if !self.must_q {
            node.add_attrib_value(ATTRIB_PLACE_INFO_MUST_Q, &self.must_q);
        }
    }
}

/// Stable orderings kept after every load
pub(crate) fn sort_title_points(entries: &mut [TitlePoints]) {
    entries.sort_by(|a, b| a.faults.total_cmp(&b.faults));
}

pub(crate) fn sort_lifetime_points(entries: &mut [LifetimePoints]) {
    entries.sort_by(|a, b| a.name.cmp(&b.name).then(a.faults.total_cmp(&b.faults)));
}

pub(crate) fn sort_places(entries: &mut [PlaceInfo]) {
    entries.sort_by_key(|entry| entry.place);
}
