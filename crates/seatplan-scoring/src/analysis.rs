//! Breakdowns of a score for display.
//!
//! [`ViolationIndex`] groups violations by guest and by table so a canvas
//! can render badges without rescanning the whole list per element.
//! [`ScoreExplanation`] attributes penalty to constraints and affinity to
//! tables.

use std::collections::BTreeMap;

use seatplan_core::{ConstraintId, ConstraintType, GuestId, Priority, SeatingScore, TableId};

use crate::violation::Violation;

/// Violations indexed by the guests and tables they affect.
#[derive(Debug, Clone, Default)]
pub struct ViolationIndex {
    violations: Vec<Violation>,
    by_guest: BTreeMap<GuestId, Vec<usize>>,
    by_table: BTreeMap<TableId, Vec<usize>>,
}

impl ViolationIndex {
    pub fn new(violations: Vec<Violation>) -> Self {
        let mut by_guest: BTreeMap<GuestId, Vec<usize>> = BTreeMap::new();
        let mut by_table: BTreeMap<TableId, Vec<usize>> = BTreeMap::new();
        for (i, violation) in violations.iter().enumerate() {
            for guest in &violation.affected_guest_ids {
                by_guest.entry(guest.clone()).or_default().push(i);
            }
            for table in &violation.affected_table_ids {
                by_table.entry(table.clone()).or_default().push(i);
            }
        }
        Self {
            violations,
            by_guest,
            by_table,
        }
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn for_guest<'a>(&'a self, guest: &GuestId) -> impl Iterator<Item = &'a Violation> + 'a {
        let indices = self.by_guest.get(guest).map(Vec::as_slice).unwrap_or(&[]);
        indices.iter().map(|&i| &self.violations[i])
    }

    pub fn for_table<'a>(&'a self, table: &TableId) -> impl Iterator<Item = &'a Violation> + 'a {
        let indices = self.by_table.get(table).map(Vec::as_slice).unwrap_or(&[]);
        indices.iter().map(|&i| &self.violations[i])
    }

    /// Number of violations touching a guest.
    pub fn guest_badge(&self, guest: &GuestId) -> usize {
        self.by_guest.get(guest).map_or(0, Vec::len)
    }

    /// Number of violations touching a table.
    pub fn table_badge(&self, table: &TableId) -> usize {
        self.by_table.get(table).map_or(0, Vec::len)
    }

    /// Highest priority among a guest's violations.
    pub fn worst_priority(&self, guest: &GuestId) -> Option<Priority> {
        self.for_guest(guest).map(|v| v.priority).max()
    }

    /// Guests with at least one violation, in id order.
    pub fn flagged_guests(&self) -> impl Iterator<Item = &GuestId> {
        self.by_guest.keys()
    }
}

/// Penalty attributed to one violated constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintPenalty {
    pub constraint_id: ConstraintId,
    pub kind: ConstraintType,
    pub priority: Priority,
    pub magnitude: u32,
    pub penalty: f64,
}

/// Where a score comes from.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreExplanation {
    pub score: SeatingScore,
    pub constraint_penalties: Vec<ConstraintPenalty>,
    /// Affinity earned at each table; tables with no linked pair are absent.
    pub table_affinity: BTreeMap<TableId, f64>,
    pub violations: Vec<Violation>,
}

impl ScoreExplanation {
    pub fn total_penalty(&self) -> f64 {
        self.constraint_penalties.iter().map(|c| c.penalty).sum()
    }

    /// Penalties at a given priority.
    pub fn penalties_at(&self, priority: Priority) -> impl Iterator<Item = &ConstraintPenalty> {
        self.constraint_penalties
            .iter()
            .filter(move |c| c.priority == priority)
    }

    pub fn into_index(self) -> ViolationIndex {
        ViolationIndex::new(self.violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn violation(id: &str, priority: Priority, guests: &[&str], tables: &[&str]) -> Violation {
        Violation {
            constraint_id: id.into(),
            kind: ConstraintType::MustSitTogether,
            priority,
            description: String::new(),
            affected_guest_ids: guests.iter().map(|g| GuestId::from(*g)).collect(),
            affected_table_ids: tables.iter().map(|t| TableId::from(*t)).collect(),
            magnitude: 1,
        }
    }

    #[test]
    fn test_badges_by_guest_and_table() {
        let index = ViolationIndex::new(vec![
            violation("c1", Priority::Optional, &["a", "b"], &["t0", "t1"]),
            violation("c2", Priority::Required, &["a"], &["t0"]),
        ]);

        assert_eq!(index.len(), 2);
        assert_eq!(index.guest_badge(&"a".into()), 2);
        assert_eq!(index.guest_badge(&"b".into()), 1);
        assert_eq!(index.guest_badge(&"z".into()), 0);
        assert_eq!(index.table_badge(&"t0".into()), 2);
        assert_eq!(index.table_badge(&"t1".into()), 1);
        assert_eq!(index.worst_priority(&"a".into()), Some(Priority::Required));
        assert_eq!(index.worst_priority(&"b".into()), Some(Priority::Optional));
        assert_eq!(index.worst_priority(&"z".into()), None);

        let ids: Vec<&str> = index.for_table(&"t1".into()).map(|v| v.constraint_id.as_str()).collect();
        assert_eq!(ids, vec!["c1"]);
        assert_eq!(index.flagged_guests().count(), 2);
    }

    #[test]
    fn test_empty_index() {
        let index = ViolationIndex::default();
        assert!(index.is_empty());
        assert_eq!(index.for_guest(&"a".into()).count(), 0);
    }
}
