// Constraint rules shared by the evaluator and the incremental director.
//
// Both callers reduce a constraint to a list of member states plus per-table
// facts, so the rule for each constraint type lives in exactly one place and
// a full evaluation always agrees with the director's running penalty.

use seatplan_core::ConstraintType;

// Where one constraint member currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MemberState {
    // The id is not in the supplied guest list.
    UnknownGuest,
    Unassigned,
    // Seated at a table id that is not in the supplied table list.
    UnknownTable,
    // Seated at the table with this index.
    Seated(usize),
}

impl MemberState {
    fn table(self) -> Option<usize> {
        match self {
            MemberState::Seated(table) => Some(table),
            _ => None,
        }
    }

    fn is_unresolvable(self) -> bool {
        matches!(self, MemberState::UnknownGuest | MemberState::UnknownTable)
    }
}

// One member as seen by a rule: location plus whether the guest carries an
// accessibility need.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Member {
    pub state: MemberState,
    pub needs_access: bool,
}

// Per-table facts some rules depend on, indexed by table position.
//
// `None` means the fact is not available, which turns the matching rule into
// a no-op.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct TableFacts {
    pub front: Option<Vec<bool>>,
    pub accessible: Option<Vec<bool>>,
}

// Why a constraint is violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BreachKind {
    // A member or their table is missing from the problem.
    Unresolvable,
    Split,
    Crowded,
    NotFront,
    Inaccessible,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Breach {
    pub kind: BreachKind,
    // Weighted by priority to give the penalty.
    pub magnitude: u32,
    // Indexes into the member slice.
    pub offenders: Vec<usize>,
}

// Assesses one constraint.
//
// Order matters: rules that cannot apply are no-ops first, then missing
// guests or tables make the constraint unsatisfiable, then the type rule.
pub(crate) fn assess(kind: ConstraintType, members: &[Member], facts: &TableFacts) -> Option<Breach> {
    if members.is_empty() {
        return None;
    }
    match kind {
        ConstraintType::NearFront if facts.front.is_none() => return None,
        ConstraintType::Accessibility if facts.accessible.is_none() => return None,
        _ => {}
    }

    let unresolvable: Vec<usize> = members
        .iter()
        .enumerate()
        .filter(|(_, m)| m.state.is_unresolvable())
        .map(|(i, _)| i)
        .collect();
    if !unresolvable.is_empty() {
        return Some(Breach {
            kind: BreachKind::Unresolvable,
            magnitude: unresolvable.len() as u32,
            offenders: unresolvable,
        });
    }

    if kind.is_together() {
        together(members)
    } else if kind.is_apart() {
        apart(members)
    } else if kind == ConstraintType::NearFront {
        let front = facts.front.as_deref().unwrap_or(&[]);
        flag_seated(members, BreachKind::NotFront, |_, table| {
            !front.get(table).copied().unwrap_or(false)
        })
    } else {
        let accessible = facts.accessible.as_deref().unwrap_or(&[]);
        flag_seated(members, BreachKind::Inaccessible, |m, table| {
            m.needs_access && !accessible.get(table).copied().unwrap_or(false)
        })
    }
}

// Split across tables, or partly unassigned while someone is seated.
// Magnitude: extra tables used plus unassigned members.
fn together(members: &[Member]) -> Option<Breach> {
    let mut tables: Vec<usize> = members.iter().filter_map(|m| m.state.table()).collect();
    if tables.is_empty() {
        return None;
    }
    tables.sort_unstable();
    tables.dedup();
    let unassigned = members
        .iter()
        .filter(|m| m.state == MemberState::Unassigned)
        .count();
    let magnitude = (tables.len() - 1 + unassigned) as u32;
    (magnitude > 0).then(|| Breach {
        kind: BreachKind::Split,
        magnitude,
        offenders: (0..members.len()).collect(),
    })
}

// Two or more members at one table. Magnitude: surplus members per table.
fn apart(members: &[Member]) -> Option<Breach> {
    let mut offenders = Vec::new();
    let mut magnitude = 0u32;
    for (i, member) in members.iter().enumerate() {
        let Some(table) = member.state.table() else {
            continue;
        };
        if members[..i].iter().any(|m| m.state.table() == Some(table)) {
            magnitude += 1;
        }
        let sharing = members
            .iter()
            .enumerate()
            .any(|(j, m)| j != i && m.state.table() == Some(table));
        if sharing {
            offenders.push(i);
        }
    }
    (magnitude > 0).then_some(Breach {
        kind: BreachKind::Crowded,
        magnitude,
        offenders,
    })
}

fn flag_seated(
    members: &[Member],
    kind: BreachKind,
    offends: impl Fn(&Member, usize) -> bool,
) -> Option<Breach> {
    let offenders: Vec<usize> = members
        .iter()
        .enumerate()
        .filter(|(_, m)| m.state.table().is_some_and(|t| offends(m, t)))
        .map(|(i, _)| i)
        .collect();
    (!offenders.is_empty()).then(|| Breach {
        kind,
        magnitude: offenders.len() as u32,
        offenders,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(table: usize) -> Member {
        Member {
            state: MemberState::Seated(table),
            needs_access: false,
        }
    }

    fn state(state: MemberState) -> Member {
        Member {
            state,
            needs_access: false,
        }
    }

    #[test]
    fn test_together_split_magnitude() {
        let members = [at(0), at(1), at(1), state(MemberState::Unassigned)];
        let breach = assess(ConstraintType::MustSitTogether, &members, &TableFacts::default());
        let breach = breach.unwrap();
        assert_eq!(breach.kind, BreachKind::Split);
        assert_eq!(breach.magnitude, 2);
        assert_eq!(breach.offenders, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_together_nobody_seated_is_satisfied() {
        let members = [
            state(MemberState::Unassigned),
            state(MemberState::Unassigned),
        ];
        assert_eq!(assess(ConstraintType::SameTable, &members, &TableFacts::default()), None);
    }

    #[test]
    fn test_apart_counts_surplus_per_table() {
        let members = [at(0), at(0), at(0), at(1), at(2), at(2)];
        let breach = assess(ConstraintType::DifferentTable, &members, &TableFacts::default());
        let breach = breach.unwrap();
        assert_eq!(breach.magnitude, 3);
        assert_eq!(breach.offenders, vec![0, 1, 2, 4, 5]);
    }

    #[test]
    fn test_unknown_member_is_unresolvable() {
        let members = [at(0), state(MemberState::UnknownGuest)];
        let breach = assess(ConstraintType::MustNotSitTogether, &members, &TableFacts::default());
        let breach = breach.unwrap();
        assert_eq!(breach.kind, BreachKind::Unresolvable);
        assert_eq!(breach.offenders, vec![1]);
    }

    #[test]
    fn test_missing_facts_are_noops() {
        let members = [state(MemberState::UnknownGuest)];
        assert_eq!(assess(ConstraintType::NearFront, &members, &TableFacts::default()), None);
        assert_eq!(assess(ConstraintType::Accessibility, &members, &TableFacts::default()), None);
    }

    #[test]
    fn test_near_front_and_accessibility() {
        let facts = TableFacts {
            front: Some(vec![true, false]),
            accessible: Some(vec![false, true]),
        };
        let members = [at(0), at(1), state(MemberState::Unassigned)];
        let breach = assess(ConstraintType::NearFront, &members, &facts).unwrap();
        assert_eq!(breach.offenders, vec![1]);

        let mut needy = at(0);
        needy.needs_access = true;
        let members = [needy, at(0)];
        let breach = assess(ConstraintType::Accessibility, &members, &facts).unwrap();
        assert_eq!(breach.kind, BreachKind::Inaccessible);
        assert_eq!(breach.offenders, vec![0]);
    }
}
