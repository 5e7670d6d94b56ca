// Incremental score director for seating search.
//
// `SeatingDirector` holds the working assignment in index form (guests and
// tables by position) and keeps the score current as guests move. A move
// only touches the relationships and constraints of the guests it moves:
//
// ```text
// let mut director = SeatingDirector::new(&problem, &seed, &calculator);
// let delta = director.relocate(guest, Some(target))?;  // move, get delta
// director.relocate(guest, previous)?;                  // undo
// ```
//
// Every change goes through `relocate`; a swap is three relocations, and an
// undo is the same relocations replayed back.

use std::collections::HashMap;

use seatplan_core::{
    Assignment, ConstraintType, GuestId, Result, Seat, SeatingError, SeatingProblem, SeatingScore,
    TableId,
};

use crate::calculator::ScoreCalculator;
use crate::rules::{assess, Member, MemberState, TableFacts};

// Seat of a guest in index form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    pub table: usize,
    pub seat: u32,
}

impl Location {
    pub const fn new(table: usize, seat: u32) -> Self {
        Self { table, seat }
    }
}

// A constraint member: a known guest index, or an id with no guest behind it.
#[derive(Debug, Clone, Copy)]
enum MemberRef {
    Known(usize),
    Unknown,
}

#[derive(Debug, Clone)]
struct TrackedConstraint {
    kind: ConstraintType,
    weight: f64,
    members: Vec<MemberRef>,
}

// Working state for one search.
//
// Not thread-safe by intent: each run owns its own director.
#[derive(Debug, Clone)]
pub struct SeatingDirector {
    guest_ids: Vec<GuestId>,
    table_ids: Vec<TableId>,
    capacities: Vec<u32>,
    needs_access: Vec<bool>,

    location: Vec<Option<Location>>,
    // Occupant of every seat, per table.
    occupants: Vec<Vec<Option<usize>>>,
    seated: Vec<usize>,

    // Summed relationship weight to every linked guest.
    adjacency: Vec<Vec<(usize, f64)>>,
    constraints: Vec<TrackedConstraint>,
    constraints_of: Vec<Vec<usize>>,
    constraint_penalty: Vec<f64>,
    facts: TableFacts,

    affinity: f64,
    penalty: f64,
}

impl SeatingDirector {
    // Builds a director seeded with `assignment`.
    //
    // Seats of unknown guests, unknown tables, out-of-range seat indexes and
    // already-taken seats are skipped, so the working state always respects
    // capacity. Constraints with no members are ignored.
    pub fn new(problem: &SeatingProblem, assignment: &Assignment, calculator: &ScoreCalculator) -> Self {
        let guest_ids: Vec<GuestId> = problem.guests.iter().map(|g| g.id.clone()).collect();
        let guest_index: HashMap<&GuestId, usize> = problem
            .guests
            .iter()
            .enumerate()
            .map(|(i, g)| (&g.id, i))
            .collect();
        let table_ids: Vec<TableId> = problem.tables.iter().map(|t| t.id.clone()).collect();
        let table_index: HashMap<&TableId, usize> = problem
            .tables
            .iter()
            .enumerate()
            .map(|(i, t)| (&t.id, i))
            .collect();
        let capacities: Vec<u32> = problem.tables.iter().map(|t| t.capacity).collect();

        let mut adjacency: Vec<Vec<(usize, f64)>> = vec![Vec::new(); guest_ids.len()];
        let graph = calculator.affinity().graph(&problem.relationships);
        for (a, b, weight) in graph.pairs() {
            if let (Some(&ia), Some(&ib)) = (guest_index.get(a), guest_index.get(b)) {
                adjacency[ia].push((ib, weight));
                adjacency[ib].push((ia, weight));
            }
        }

        let mut constraints = Vec::new();
        let mut constraints_of: Vec<Vec<usize>> = vec![Vec::new(); guest_ids.len()];
        for constraint in &problem.constraints {
            let members: Vec<MemberRef> = constraint
                .members()
                .into_iter()
                .map(|id| guest_index.get(id).map_or(MemberRef::Unknown, |&i| MemberRef::Known(i)))
                .collect();
            if members.is_empty() {
                continue;
            }
            let index = constraints.len();
            for member in &members {
                if let MemberRef::Known(g) = member {
                    constraints_of[*g].push(index);
                }
            }
            constraints.push(TrackedConstraint {
                kind: constraint.kind,
                weight: calculator.weights().weight(constraint.priority),
                members,
            });
        }

        let mut director = Self {
            needs_access: problem
                .guests
                .iter()
                .map(|g| g.has_accessibility_needs())
                .collect(),
            location: vec![None; guest_ids.len()],
            occupants: capacities.iter().map(|&c| vec![None; c as usize]).collect(),
            seated: vec![0; table_ids.len()],
            constraint_penalty: vec![0.0; constraints.len()],
            facts: calculator.evaluator().table_facts(&problem.tables),
            guest_ids,
            table_ids,
            capacities,
            adjacency,
            constraints,
            constraints_of,
            affinity: 0.0,
            penalty: 0.0,
        };

        for (guest, seat) in assignment.iter() {
            let (Some(&g), Some(&t)) = (guest_index.get(guest), table_index.get(&seat.table_id)) else {
                continue;
            };
            if director.is_free(t, seat.seat_index) && director.location[g].is_none() {
                director.place(g, Location::new(t, seat.seat_index));
            }
        }
        director.recompute();
        director
    }

    pub fn guest_count(&self) -> usize {
        self.guest_ids.len()
    }

    pub fn table_count(&self) -> usize {
        self.table_ids.len()
    }

    pub fn guest_id(&self, guest: usize) -> &GuestId {
        &self.guest_ids[guest]
    }

    pub fn table_id(&self, table: usize) -> &TableId {
        &self.table_ids[table]
    }

    pub fn capacity(&self, table: usize) -> u32 {
        self.capacities[table]
    }

    pub fn seated_count(&self, table: usize) -> usize {
        self.seated[table]
    }

    pub fn location(&self, guest: usize) -> Option<Location> {
        self.location[guest]
    }

    pub fn has_free_seat(&self, table: usize) -> bool {
        self.seated[table] < self.capacities[table] as usize
    }

    // Lowest free seat index at a table.
    pub fn free_seat(&self, table: usize) -> Option<u32> {
        self.occupants[table]
            .iter()
            .position(Option::is_none)
            .map(|seat| seat as u32)
    }

    pub fn total_capacity(&self) -> usize {
        self.capacities.iter().map(|&c| c as usize).sum()
    }

    pub fn score(&self) -> SeatingScore {
        SeatingScore::of(self.affinity, self.penalty)
    }

    // Moves a guest to `target`, or unseats them with `None`.
    //
    // Returns the change in combined score.
    pub fn relocate(&mut self, guest: usize, target: Option<Location>) -> Result<f64> {
        if guest >= self.guest_ids.len() {
            return Err(SeatingError::InvalidInput(format!("no guest at index {guest}")));
        }
        let current = self.location[guest];
        if current == target {
            return Ok(0.0);
        }
        if let Some(to) = target {
            if !self.is_free(to.table, to.seat) {
                return Err(SeatingError::InvalidInput(format!(
                    "seat {} at table {} is not free",
                    to.seat,
                    self.table_ids.get(to.table).map_or("?", TableId::as_str)
                )));
            }
        }

        let before = self.affinity - self.penalty;
        let old_table = current.map(|l| l.table);
        let new_table = target.map(|l| l.table);
        if old_table != new_table {
            let mut delta = 0.0;
            for &(other, weight) in &self.adjacency[guest] {
                let other_table = self.location[other].map(|l| l.table);
                if other_table.is_none() {
                    continue;
                }
                if other_table == old_table {
                    delta -= weight;
                }
                if other_table == new_table {
                    delta += weight;
                }
            }
            self.affinity += delta;
        }

        if current.is_some() {
            self.unplace(guest);
        }
        if let Some(to) = target {
            self.place(guest, to);
        }

        if old_table != new_table {
            for i in 0..self.constraints_of[guest].len() {
                let index = self.constraints_of[guest][i];
                let updated = self.constraint_cost(index);
                self.penalty += updated - self.constraint_penalty[index];
                self.constraint_penalty[index] = updated;
            }
        }
        Ok(self.affinity - self.penalty - before)
    }

    // Exchanges the seats of two guests seated at different tables.
    pub fn swap(&mut self, a: usize, b: usize) -> Result<f64> {
        let (Some(la), Some(lb)) = (self.location(a), self.location(b)) else {
            return Err(SeatingError::InvalidInput(
                "swap needs two seated guests".to_string(),
            ));
        };
        let mut delta = self.relocate(b, None)?;
        delta += self.relocate(a, Some(lb))?;
        delta += self.relocate(b, Some(la))?;
        Ok(delta)
    }

    // Rebuilds affinity and penalty from scratch.
    //
    // Clears floating point drift accumulated by incremental updates.
    pub fn recompute(&mut self) {
        let mut affinity = 0.0;
        for (guest, neighbors) in self.adjacency.iter().enumerate() {
            let Some(here) = self.location[guest] else {
                continue;
            };
            for &(other, weight) in neighbors {
                if other > guest && self.location[other].map(|l| l.table) == Some(here.table) {
                    affinity += weight;
                }
            }
        }
        self.affinity = affinity;

        let mut penalty = 0.0;
        for index in 0..self.constraints.len() {
            let cost = self.constraint_cost(index);
            self.constraint_penalty[index] = cost;
            penalty += cost;
        }
        self.penalty = penalty;
    }

    pub fn to_assignment(&self) -> Assignment {
        self.location
            .iter()
            .enumerate()
            .filter_map(|(guest, location)| {
                location.map(|l| {
                    (
                        self.guest_ids[guest].clone(),
                        Seat::new(self.table_ids[l.table].clone(), l.seat),
                    )
                })
            })
            .collect()
    }

    fn is_free(&self, table: usize, seat: u32) -> bool {
        self.occupants
            .get(table)
            .and_then(|seats| seats.get(seat as usize))
            .is_some_and(Option::is_none)
    }

    fn place(&mut self, guest: usize, to: Location) {
        self.occupants[to.table][to.seat as usize] = Some(guest);
        self.seated[to.table] += 1;
        self.location[guest] = Some(to);
    }

    fn unplace(&mut self, guest: usize) {
        if let Some(from) = self.location[guest].take() {
            self.occupants[from.table][from.seat as usize] = None;
            self.seated[from.table] -= 1;
        }
    }

    fn constraint_cost(&self, index: usize) -> f64 {
        let constraint = &self.constraints[index];
        let members: Vec<Member> = constraint
            .members
            .iter()
            .map(|member| match *member {
                MemberRef::Unknown => Member {
                    state: MemberState::UnknownGuest,
                    needs_access: false,
                },
                MemberRef::Known(g) => Member {
                    state: self.location[g]
                        .map_or(MemberState::Unassigned, |l| MemberState::Seated(l.table)),
                    needs_access: self.needs_access[g],
                },
            })
            .collect();
        assess(constraint.kind, &members, &self.facts)
            .map_or(0.0, |breach| constraint.weight * f64::from(breach.magnitude))
    }
}
