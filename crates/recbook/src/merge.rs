//! Reconciliation of a live configuration with an incoming one
//!
//! Each sibling list goes through the same pass: incoming entities missing
//! from the live list are appended, equal ones are skipped, and differing
//! ones are updated in place (recursively for nested kinds). The list is
//! then rewritten in incoming order with live-only entities kept at the
//! end. Every pass contributes a summary line to an indented report.

pub mod messages;

pub use messages::{EnglishMessages, Messages, Section};

use std::ops::AddAssign;

/// Entities identified by name within their sibling list
pub trait Named {
    fn name(&self) -> &str;
}

impl Named for String {
    fn name(&self) -> &str {
        self
    }
}

/// Counts produced by one or more reconciliation passes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tally {
    pub added: usize,
    pub updated: usize,
    /// Present on both sides and identical
    pub skipped: usize,
    pub deleted: usize,
}

impl Tally {
    pub fn has_changes(&self) -> bool {
        self.added + self.updated + self.deleted > 0
    }
}

impl AddAssign for Tally {
    fn add_assign(&mut self, rhs: Self) {
        self.added += rhs.added;
        self.updated += rhs.updated;
        self.skipped += rhs.skipped;
        self.deleted += rhs.deleted;
    }
}

/// Report nesting level. Level `n` prints entity names as
/// `"   " * (n - 1) + "-"` and their details at `"   " * n`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Indent(pub usize);

const INDENT_UNIT: &str = "   ";

impl Indent {
    pub fn nested(self) -> Self {
        Self(self.0 + 1)
    }

    /// Prefix for a detail line
    pub fn body(self) -> String {
        INDENT_UNIT.repeat(self.0)
    }

    /// Header line introducing the changes made to `name`
    pub fn header(self, name: &str) -> String {
        format!("{}-{name}\n", INDENT_UNIT.repeat(self.0.saturating_sub(1)))
    }
}

/// Result of reconciling one list
#[derive(Debug, Default)]
pub(crate) struct Reconciled {
    pub tally: Tally,
    /// `+name` lines followed by nested reports, already indented
    pub lines: String,
    pub reordered: bool,
    /// Incoming names turned away by the admission check
    pub refused: Vec<String>,
}

impl Reconciled {
    pub fn changed(&self) -> bool {
        self.tally.has_changes() || self.reordered || !self.refused.is_empty()
    }
}

/// Add, skip or update each incoming entity against the live list.
///
/// `update` merges a differing incoming entity into its live counterpart
/// and returns the nested report, or `None` when nothing changed.
pub(crate) fn reconcile<T, F>(
    live: &mut Vec<T>,
    incoming: &[T],
    indent: Indent,
    mut update: F,
) -> Reconciled
where
    T: Named + PartialEq + Clone,
    F: FnMut(&mut T, &T) -> Option<String>,
{
    reconcile_admitting(
        live,
        incoming,
        indent,
        |_, _| true,
        |items, index, other| items.get_mut(index).and_then(|existing| update(existing, other)),
    )
}

/// [`reconcile`] for lists with a shared namespace. An incoming entity
/// without a live counterpart is only appended when `admit` accepts it
/// against the current live list; otherwise its name lands in
/// [`Reconciled::refused`]. `update` receives the whole live list and the
/// index of the entity to merge so it can consult the siblings.
pub(crate) fn reconcile_admitting<T, A, F>(
    live: &mut Vec<T>,
    incoming: &[T],
    indent: Indent,
    mut admit: A,
    mut update: F,
) -> Reconciled
where
    T: Named + PartialEq + Clone,
    A: FnMut(&[T], &T) -> bool,
    F: FnMut(&mut [T], usize, &T) -> Option<String>,
{
    let mut out = Reconciled::default();
    let mut nested = String::new();
    for item in incoming {
        match live.iter().position(|existing| existing.name() == item.name()) {
            None if !admit(live.as_slice(), item) => out.refused.push(item.name().to_string()),
            None => {
                out.lines.push_str(&format!("{}+{}\n", indent.body(), item.name()));
                live.push(item.clone());
                out.tally.added += 1;
            }
            Some(index) if live.get(index) == Some(item) => out.tally.skipped += 1,
            Some(index) => match update(live.as_mut_slice(), index, item) {
                Some(report) => {
                    nested.push_str(&report);
                    out.tally.updated += 1;
                }
                None => out.tally.skipped += 1,
            },
        }
    }
    out.lines.push_str(&nested);
    out
}

/// Replace `live` with `incoming` as a whole, counting what that does.
///
/// An incoming entity equal to a live one is skipped; otherwise, with
/// `by_name`, one sharing a live name is updated and the rest are added.
/// Live entities left out of `incoming` are counted as deleted (matched by
/// name with `by_name`, by value without).
pub(crate) fn replace_all<T>(
    live: &mut Vec<T>,
    incoming: &[T],
    indent: Indent,
    by_name: bool,
) -> Reconciled
where
    T: Named + PartialEq + Clone,
{
    let mut out = Reconciled::default();
    if live.as_slice() == incoming {
        return out;
    }
    for item in incoming {
        if live.contains(item) {
            out.tally.skipped += 1;
        } else if by_name && live.iter().any(|existing| existing.name() == item.name()) {
            out.tally.updated += 1;
        } else {
            out.lines.push_str(&format!("{}+{}\n", indent.body(), item.name()));
            out.tally.added += 1;
        }
    }
    out.tally.deleted = live
        .iter()
        .filter(|existing| {
            if by_name {
                !incoming.iter().any(|item| item.name() == existing.name())
            } else {
                !incoming.contains(existing)
            }
        })
        .count();
    out.reordered = !out.tally.has_changes();
    *live = incoming.to_vec();
    out
}

/// Replace a flat record wholesale
pub(crate) fn replace<T: Clone>(live: &mut T, incoming: &T) -> Option<String> {
    *live = incoming.clone();
    Some(String::new())
}

/// Never touch an existing entry
pub(crate) fn keep<T>(_live: &mut T, _incoming: &T) -> Option<String> {
    None
}

/// Rewrite `live` into the order of `reference`. Entities without a
/// counterpart in `reference` keep their relative order at the end.
/// Returns whether the order changed.
pub fn reorder_by<T: Named>(live: &mut Vec<T>, reference: &[T]) -> bool {
    let mut remaining: Vec<Option<T>> = live.drain(..).map(Some).collect();
    let before: Vec<usize> = (0..remaining.len()).collect();
    let mut order = Vec::with_capacity(remaining.len());
    for wanted in reference {
        let slot = remaining
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|item| item.name() == wanted.name()));
        if let Some(index) = slot {
            order.push(index);
        }
        if let Some(slot) = slot.and_then(|index| remaining.get_mut(index)) {
            if let Some(item) = slot.take() {
                live.push(item);
            }
        }
    }
    for (index, slot) in remaining.into_iter().enumerate() {
        if let Some(item) = slot {
            order.push(index);
            live.push(item);
        }
    }
    order != before
}

/// Append a section's summary and detail lines to `report` when it changed
pub(crate) fn write_section(
    report: &mut String,
    indent: Indent,
    messages: &dyn Messages,
    section: Section,
    result: &Reconciled,
) {
    if result.tally.has_changes() {
        report.push_str(&indent.body());
        report.push_str(&messages.summary(section, &result.tally));
        report.push('\n');
    } else if result.reordered {
        report.push_str(&indent.body());
        report.push_str(&messages.reordered(section));
        report.push('\n');
    }
    for name in &result.refused {
        report.push_str(&indent.body());
        report.push_str(&messages.refused(name));
        report.push('\n');
    }
    report.push_str(&result.lines);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Item {
        name: String,
        value: u8,
    }

    impl Named for Item {
        fn name(&self) -> &str {
            &self.name
        }
    }

    fn item(name: &str, value: u8) -> Item {
        Item {
            name: name.to_string(),
            value,
        }
    }

    fn names(items: &[Item]) -> Vec<&str> {
        items.iter().map(Named::name).collect()
    }

    #[test]
    fn test_indent_prefixes() {
        assert_eq!(Indent(0).body(), "");
        assert_eq!(Indent(0).header("x"), "-x\n");
        assert_eq!(Indent(2).body(), "      ");
        assert_eq!(Indent(2).header("Standard"), "   -Standard\n");
    }

    #[test]
    fn test_reconcile_counts() {
        let mut live = vec![item("a", 1), item("b", 1), item("keep", 0)];
        let incoming = vec![item("a", 1), item("b", 2), item("c", 3)];
        let result = reconcile(&mut live, &incoming, Indent(1), replace);
        assert_eq!(
            result.tally,
            Tally {
                added: 1,
                updated: 1,
                skipped: 1,
                deleted: 0
            }
        );
        assert_eq!(result.lines, "   +c\n");
        assert_eq!(names(&live), ["a", "b", "keep", "c"]);
        assert_eq!(live[1].value, 2);
    }

    #[test]
    fn test_reconcile_keep_counts_as_skipped() {
        let mut live = vec![item("a", 1)];
        let result = reconcile(&mut live, &[item("a", 9)], Indent(0), keep);
        assert_eq!(result.tally.skipped, 1);
        assert!(!result.changed());
        assert_eq!(live[0].value, 1);
    }

    #[test]
    fn test_replace_all_by_name() {
        let mut live = vec![item("a", 1), item("b", 1), item("gone", 0)];
        let incoming = vec![item("a", 1), item("b", 2), item("c", 3)];
        let result = replace_all(&mut live, &incoming, Indent(1), true);
        assert_eq!(
            result.tally,
            Tally {
                added: 1,
                updated: 1,
                skipped: 1,
                deleted: 1
            }
        );
        assert_eq!(result.lines, "   +c\n");
        assert_eq!(live, incoming);
    }

    #[test]
    fn test_replace_all_by_value() {
        let mut live = vec![item("a", 1), item("b", 1)];
        let incoming = vec![item("b", 2), item("a", 1)];
        let result = replace_all(&mut live, &incoming, Indent(1), false);
        assert_eq!((result.tally.added, result.tally.deleted), (1, 1));

        let mut same = vec![item("a", 1), item("b", 2)];
        let result = replace_all(&mut same, &incoming, Indent(1), false);
        assert!(result.reordered && !result.tally.has_changes());
        assert!(!replace_all(&mut same, &incoming, Indent(1), false).changed());
    }

    #[test]
    fn test_reorder_by() {
        let mut live = vec![item("x", 0), item("b", 0), item("a", 0)];
        let reference = vec![item("a", 0), item("b", 0), item("new", 0)];
        assert!(reorder_by(&mut live, &reference));
        assert_eq!(names(&live), ["a", "b", "x"]);
        assert!(!reorder_by(&mut live, &reference));
    }

    #[test]
    fn test_write_section_reordered_only() {
        let mut report = String::new();
        let result = Reconciled {
            reordered: true,
            ..Reconciled::default()
        };
        write_section(&mut report, Indent(1), &EnglishMessages, Section::Titles, &result);
        assert_eq!(report, "   Titles: reordered\n");
    }

    #[test]
    fn test_reconcile_admitting_refuses() {
        let mut live = vec![item("a", 1)];
        let incoming = vec![item("b", 1), item("c", 2)];
        let result = reconcile_admitting(
            &mut live,
            &incoming,
            Indent(1),
            |_, candidate| candidate.value != 2,
            |_, _, _| None,
        );
        assert_eq!(names(&live), ["a", "b"]);
        assert_eq!(result.tally.added, 1);
        assert_eq!(result.refused, ["c"]);
        assert!(result.changed());

        let mut report = String::new();
        write_section(&mut report, Indent(1), &EnglishMessages, Section::Levels, &result);
        assert_eq!(
            report,
            concat!(
                "   Levels: 1 added, 0 updated, 0 identical\n",
                "   'c' not added: the name is already in use\n",
                "   +b\n",
            )
        );
    }

    #[test]
    fn test_tally_add_assign() {
        let mut total = Tally::default();
        total += Tally {
            added: 1,
            updated: 2,
            skipped: 3,
            deleted: 4,
        };
        total += Tally {
            added: 1,
            ..Tally::default()
        };
        assert_eq!(total.added, 2);
        assert!(total.has_changes());
    }
}
