//! Violation detection.
//!
//! [`ViolationEvaluator`] grades an assignment against a constraint set and
//! reports every constraint it breaks. It is a pure function of its inputs:
//! evaluating the same assignment twice gives identical results, and
//! evaluators can be shared between threads.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use seatplan_config::{EngineConfig, NearFrontConfig};
use seatplan_core::{
    Assignment, ConstraintId, ConstraintType, Guest, GuestId, Position, Priority, Result,
    SeatingConstraint, SeatingProblem, Table, TableId,
};

use crate::rules::{assess, Breach, BreachKind, Member, MemberState, TableFacts};

/// Decides whether a table is wheelchair/step-free accessible.
pub type AccessibilityPredicate = Arc<dyn Fn(&Table) -> bool + Send + Sync>;

/// A constraint found unsatisfied by an assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub constraint_id: ConstraintId,
    pub kind: ConstraintType,
    pub priority: Priority,
    /// Human-readable summary naming the guests involved.
    pub description: String,
    pub affected_guest_ids: Vec<GuestId>,
    pub affected_table_ids: Vec<TableId>,
    /// How badly the constraint is broken; penalty is `weight * magnitude`.
    pub magnitude: u32,
}

/// Evaluates constraints against assignments.
///
/// Two constraint types depend on venue facts the domain model does not
/// carry:
/// - `near_front` needs a front anchor ([`with_front_anchor`](Self::with_front_anchor));
///   the closest `front_table_count` tables to it count as "front".
/// - `accessibility` needs a table predicate ([`with_accessibility`](Self::with_accessibility)).
///
/// Without them those constraints are never reported.
///
/// # Examples
///
/// ```
/// use seatplan_core::{Assignment, ConstraintType, Guest, Priority, Seat, SeatingConstraint, Table};
/// use seatplan_scoring::ViolationEvaluator;
///
/// let guests = vec![Guest::new("a", "Ann", "Lee"), Guest::new("b", "Ben", "Lee")];
/// let tables = vec![Table::new("t1", 4), Table::new("t2", 4)];
/// let constraints = vec![SeatingConstraint::new(
///     "couple",
///     ConstraintType::MustSitTogether,
///     ["a", "b"],
///     Priority::Required,
/// )];
///
/// let mut assignment = Assignment::new();
/// assignment.assign("a".into(), Seat::new("t1", 0));
/// assignment.assign("b".into(), Seat::new("t2", 0));
///
/// let violations = ViolationEvaluator::new()
///     .evaluate(&assignment, &tables, &guests, &constraints)
///     .unwrap();
/// assert_eq!(violations.len(), 1);
/// assert_eq!(violations[0].affected_guest_ids.len(), 2);
/// ```
#[derive(Clone)]
pub struct ViolationEvaluator {
    front_anchor: Option<Position>,
    front_table_count: usize,
    accessible: Option<AccessibilityPredicate>,
}

impl fmt::Debug for ViolationEvaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViolationEvaluator")
            .field("front_anchor", &self.front_anchor)
            .field("front_table_count", &self.front_table_count)
            .field("has_accessibility", &self.accessible.is_some())
            .finish()
    }
}

impl Default for ViolationEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl ViolationEvaluator {
    pub fn new() -> Self {
        Self {
            front_anchor: None,
            front_table_count: NearFrontConfig::DEFAULT_TABLE_COUNT,
            accessible: None,
        }
    }

    /// Takes the front table count from configuration.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new().with_front_table_count(config.near_front.table_count)
    }

    pub fn with_front_anchor(mut self, anchor: Position) -> Self {
        self.front_anchor = Some(anchor);
        self
    }

    pub fn with_front_table_count(mut self, count: usize) -> Self {
        self.front_table_count = count;
        self
    }

    pub fn with_accessibility<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Table) -> bool + Send + Sync + 'static,
    {
        self.accessible = Some(Arc::new(predicate));
        self
    }

    pub fn front_anchor(&self) -> Option<Position> {
        self.front_anchor
    }

    /// Marks which tables count as "front", by position in `tables`.
    ///
    /// The closest `front_table_count` tables to the anchor win, clamped to
    /// at least one and at most every table. Equal distances go to the
    /// earlier table. `None` when no anchor is set.
    pub fn front_tables(&self, tables: &[Table]) -> Option<Vec<bool>> {
        let anchor = self.front_anchor?;
        let mut by_distance: Vec<(f64, usize)> = tables
            .iter()
            .enumerate()
            .map(|(i, t)| (t.position.distance_to(&anchor), i))
            .collect();
        by_distance.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        let count = self.front_table_count.max(1).min(tables.len());
        let mut front = vec![false; tables.len()];
        for &(_, i) in by_distance.iter().take(count) {
            front[i] = true;
        }
        Some(front)
    }

    pub(crate) fn table_facts(&self, tables: &[Table]) -> TableFacts {
        TableFacts {
            front: self.front_tables(tables),
            accessible: self
                .accessible
                .as_ref()
                .map(|predicate| tables.iter().map(|t| predicate(t)).collect()),
        }
    }

    /// Reports every violated constraint, in constraint order.
    ///
    /// Guests or tables referenced by id but missing from `guests`/`tables`
    /// make a constraint unsatisfiable; it is reported, never panicked on.
    ///
    /// # Errors
    ///
    /// [`SeatingError::InvalidConstraint`](seatplan_core::SeatingError::InvalidConstraint)
    /// if a constraint has an empty guest set.
    pub fn evaluate(
        &self,
        assignment: &Assignment,
        tables: &[Table],
        guests: &[Guest],
        constraints: &[SeatingConstraint],
    ) -> Result<Vec<Violation>> {
        let facts = self.table_facts(tables);
        let table_index: HashMap<&TableId, usize> =
            tables.iter().enumerate().map(|(i, t)| (&t.id, i)).collect();
        let guest_index: HashMap<&GuestId, &Guest> = guests.iter().map(|g| (&g.id, g)).collect();

        let mut violations = Vec::new();
        for constraint in constraints {
            constraint.validate()?;
            let ids = constraint.members();
            let members: Vec<Member> = ids
                .iter()
                .map(|id| member(id, assignment, &guest_index, &table_index))
                .collect();
            if let Some(breach) = assess(constraint.kind, &members, &facts) {
                violations.push(describe(constraint, &ids, &breach, assignment, &guest_index));
            }
        }
        Ok(violations)
    }

    /// Evaluates a whole problem.
    pub fn evaluate_problem(
        &self,
        problem: &SeatingProblem,
        assignment: &Assignment,
    ) -> Result<Vec<Violation>> {
        self.evaluate(
            assignment,
            &problem.tables,
            &problem.guests,
            &problem.constraints,
        )
    }
}

/// Evaluates with a default [`ViolationEvaluator`]: no front anchor and no
/// accessibility predicate.
pub fn evaluate(
    assignment: &Assignment,
    tables: &[Table],
    guests: &[Guest],
    constraints: &[SeatingConstraint],
) -> Result<Vec<Violation>> {
    ViolationEvaluator::new().evaluate(assignment, tables, guests, constraints)
}

fn member(
    id: &GuestId,
    assignment: &Assignment,
    guests: &HashMap<&GuestId, &Guest>,
    tables: &HashMap<&TableId, usize>,
) -> Member {
    let Some(guest) = guests.get(id) else {
        return Member {
            state: MemberState::UnknownGuest,
            needs_access: false,
        };
    };
    let state = match assignment.table_of(id) {
        None => MemberState::Unassigned,
        Some(table) => tables
            .get(table)
            .map_or(MemberState::UnknownTable, |&i| MemberState::Seated(i)),
    };
    Member {
        state,
        needs_access: guest.has_accessibility_needs(),
    }
}

fn describe(
    constraint: &SeatingConstraint,
    ids: &[&GuestId],
    breach: &Breach,
    assignment: &Assignment,
    guests: &HashMap<&GuestId, &Guest>,
) -> Violation {
    let affected_guest_ids: Vec<GuestId> = breach
        .offenders
        .iter()
        .map(|&i| ids[i].clone())
        .collect();

    let mut affected_table_ids: Vec<TableId> = Vec::new();
    for id in &affected_guest_ids {
        if let Some(table) = assignment.table_of(id) {
            if !affected_table_ids.contains(table) {
                affected_table_ids.push(table.clone());
            }
        }
    }

    let names = affected_guest_ids
        .iter()
        .map(|id| {
            guests
                .get(id)
                .map_or_else(|| id.to_string(), |g| g.display_name())
        })
        .collect::<Vec<_>>()
        .join(", ");

    let summary = match breach.kind {
        BreachKind::Unresolvable => {
            format!("cannot be satisfied, unknown guest or table for {names}")
        }
        BreachKind::Split => format!("not seated together: {names}"),
        BreachKind::Crowded => format!("seated at the same table: {names}"),
        BreachKind::NotFront => format!("not seated near the front: {names}"),
        BreachKind::Inaccessible => format!("seated at an inaccessible table: {names}"),
    };
    let mut description = format!("{}: {summary}", constraint.kind.label());
    if let Some(extra) = constraint
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
    {
        description.push_str("; ");
        description.push_str(extra);
    }

    Violation {
        constraint_id: constraint.id.clone(),
        kind: constraint.kind,
        priority: constraint.priority,
        description,
        affected_guest_ids,
        affected_table_ids,
        magnitude: breach.magnitude,
    }
}
