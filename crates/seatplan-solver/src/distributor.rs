//! Bulk placement heuristics.
//!
//! The distributor places guests from scratch, fast and deterministically.
//! It is used for cold starts (first import, optimizer seeding) and for the
//! import preview. It never beats the optimizer; it only keeps declared
//! groups together when capacity allows.

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use seatplan_core::{Assignment, Guest, GuestId, Table};
use thiserror::Error;

/// Bulk placement policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionStrategy {
    /// Round-robin in input order.
    Even,
    /// Keep declared groups at one table where capacity allows.
    #[default]
    Groups,
    /// Place nobody.
    Skip,
    /// Preview alias for `Groups`; real optimization happens in the
    /// optimizer at commit time.
    Optimized,
}

impl DistributionStrategy {
    /// The strategy that actually runs.
    pub fn resolve(self) -> Self {
        match self {
            DistributionStrategy::Optimized => DistributionStrategy::Groups,
            other => other,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DistributionStrategy::Even => "even",
            DistributionStrategy::Groups => "groups",
            DistributionStrategy::Skip => "skip",
            DistributionStrategy::Optimized => "optimized",
        }
    }
}

impl fmt::Display for DistributionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown distribution strategy: {0}")]
pub struct ParseStrategyError(String);

impl FromStr for DistributionStrategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "even" => Ok(DistributionStrategy::Even),
            "groups" => Ok(DistributionStrategy::Groups),
            "skip" => Ok(DistributionStrategy::Skip),
            "optimized" => Ok(DistributionStrategy::Optimized),
            other => Err(ParseStrategyError(other.to_string())),
        }
    }
}

/// Result of a distribution run.
///
/// `tables` maps a table index to the guests placed there, in placement
/// order; tables that received nobody are absent. Guests that did not fit
/// are listed in `unassigned`, never dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Distribution {
    pub tables: BTreeMap<usize, Vec<GuestId>>,
    pub unassigned: Vec<GuestId>,
}

impl Distribution {
    pub fn placed_count(&self) -> usize {
        self.tables.values().map(Vec::len).sum()
    }

    pub fn table_of(&self, guest: &GuestId) -> Option<usize> {
        self.tables
            .iter()
            .find(|(_, guests)| guests.contains(guest))
            .map(|(&table, _)| table)
    }

    /// Converts to an assignment against real tables, numbering seats from 0.
    pub fn to_assignment(&self, tables: &[Table]) -> Assignment {
        Assignment::from_table_lists(&self.tables, tables)
    }

    fn place(&mut self, table: usize, guest: GuestId) {
        self.tables.entry(table).or_default().push(guest);
    }
}

/// Distributes guests over `table_count` tables that all seat `table_capacity`.
///
/// # Examples
///
/// ```
/// use seatplan_core::Guest;
/// use seatplan_solver::{distribute, DistributionStrategy};
///
/// let guests = vec![
///     Guest::new("a", "Ann", "Lee").with_group("A"),
///     Guest::new("b", "Ben", "Lee"),
///     Guest::new("c", "Cat", "Lee").with_group("A"),
/// ];
///
/// let result = distribute(&guests, 2, 2, DistributionStrategy::Groups);
/// assert_eq!(result.tables[&0], vec!["a".into(), "c".into()]);
/// assert_eq!(result.tables[&1], vec!["b".into()]);
/// ```
pub fn distribute(
    guests: &[Guest],
    table_count: usize,
    table_capacity: usize,
    strategy: DistributionStrategy,
) -> Distribution {
    distribute_with_capacities(guests, &vec![table_capacity; table_count], strategy)
}

/// Distributes guests over real tables, each with its own capacity.
pub fn distribute_tables(
    guests: &[Guest],
    tables: &[Table],
    strategy: DistributionStrategy,
) -> Distribution {
    let capacities: Vec<usize> = tables.iter().map(Table::seats).collect();
    distribute_with_capacities(guests, &capacities, strategy)
}

/// Distributes guests over tables with the given capacities.
///
/// Output depends only on the inputs; equal inputs give identical results.
pub fn distribute_with_capacities(
    guests: &[Guest],
    capacities: &[usize],
    strategy: DistributionStrategy,
) -> Distribution {
    match strategy.resolve() {
        DistributionStrategy::Skip => Distribution::default(),
        DistributionStrategy::Even => even(guests, capacities),
        _ => groups(guests, capacities),
    }
}

fn even(guests: &[Guest], capacities: &[usize]) -> Distribution {
    let mut result = Distribution::default();
    let mut free = capacities.to_vec();
    let mut next = 0;
    for guest in guests {
        let Some(table) = next_with_room(&free, next) else {
            result.unassigned.push(guest.id.clone());
            continue;
        };
        free[table] -= 1;
        result.place(table, guest.id.clone());
        next = (table + 1) % free.len();
    }
    result
}

fn groups(guests: &[Guest], capacities: &[usize]) -> Distribution {
    let mut buckets: Vec<(&str, Vec<&GuestId>)> = Vec::new();
    let mut ungrouped: Vec<&GuestId> = Vec::new();
    for guest in guests {
        match guest.group_label() {
            Some(label) => match buckets.iter_mut().find(|(l, _)| *l == label) {
                Some((_, members)) => members.push(&guest.id),
                None => buckets.push((label, vec![&guest.id])),
            },
            None => ungrouped.push(&guest.id),
        }
    }
    // Stable: equal sizes keep first-appearance order.
    buckets.sort_by_key(|(_, members)| Reverse(members.len()));
    buckets.push(("", ungrouped));

    let mut result = Distribution::default();
    let mut free = capacities.to_vec();
    for (_, members) in buckets {
        if members.is_empty() {
            continue;
        }
        let Some(roomiest) = most_room(&free) else {
            result
                .unassigned
                .extend(members.into_iter().cloned());
            continue;
        };

        let mut members = members.into_iter();
        let mut table = roomiest;
        // Fill the roomiest table, then spill into the following tables in
        // order, wrapping around.
        loop {
            while free[table] > 0 {
                let Some(guest) = members.next() else {
                    break;
                };
                free[table] -= 1;
                result.place(table, guest.clone());
            }
            if members.len() == 0 {
                break;
            }
            match next_with_room(&free, (table + 1) % free.len()) {
                Some(next) => table = next,
                None => {
                    result.unassigned.extend(members.cloned());
                    break;
                }
            }
        }
    }
    result
}

// Table with the most free seats, lowest index on ties. `None` when all are full.
fn most_room(free: &[usize]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (table, &room) in free.iter().enumerate() {
        if room > 0 && best.map_or(true, |b| room > free[b]) {
            best = Some(table);
        }
    }
    best
}

// First table with room at or after `start`, wrapping around.
fn next_with_room(free: &[usize], start: usize) -> Option<usize> {
    let count = free.len();
    (0..count)
        .map(|offset| (start + offset) % count)
        .find(|&table| free[table] > 0)
}
