//! Guest-to-seat assignments.

use std::collections::{BTreeMap, BTreeSet};

use super::{GuestId, Table, TableId};
use crate::error::{Result, SeatingError};

/// A seat: a table plus a seat index at that table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Seat {
    pub table_id: TableId,
    pub seat_index: u32,
}

impl Seat {
    pub fn new(table_id: impl Into<TableId>, seat_index: u32) -> Self {
        Self {
            table_id: table_id.into(),
            seat_index,
        }
    }
}

/// Mapping from a subset of guests to seats.
///
/// Guests absent from the map are unassigned. The map is ordered by guest id
/// so iteration, equality and debug output are deterministic.
///
/// Mutating methods do not enforce capacity on their own; use
/// [`Assignment::seat_guest`] for capacity-aware placement and
/// [`Assignment::check_capacity`] / [`Assignment::check_seats`] to validate
/// an assignment received from elsewhere.
///
/// # Examples
///
/// ```
/// use seatplan_core::{Assignment, Table};
///
/// let tables = vec![Table::new("t1", 2)];
/// let mut assignment = Assignment::new();
/// assignment.seat_guest("ann".into(), &tables[0]).unwrap();
/// assignment.seat_guest("bob".into(), &tables[0]).unwrap();
///
/// // The table is now full.
/// assert!(assignment.seat_guest("cat".into(), &tables[0]).is_err());
/// assert!(assignment.check_capacity(&tables).is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Assignment {
    seats: BTreeMap<GuestId, Seat>,
}

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an assignment from per-table guest lists, numbering seats
    /// `0..` in list order.
    ///
    /// Keys are indices into `tables`; lists for indices without a table are
    /// ignored, and guests beyond a table's capacity are left unassigned.
    pub fn from_table_lists(lists: &BTreeMap<usize, Vec<GuestId>>, tables: &[Table]) -> Self {
        let mut assignment = Self::new();
        for (&table_index, guests) in lists {
            let Some(table) = tables.get(table_index) else {
                continue;
            };
            for (seat_index, guest) in guests.iter().take(table.seats()).enumerate() {
                assignment.assign(guest.clone(), Seat::new(table.id.clone(), seat_index as u32));
            }
        }
        assignment
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn seat_of(&self, guest: &GuestId) -> Option<&Seat> {
        self.seats.get(guest)
    }

    pub fn table_of(&self, guest: &GuestId) -> Option<&TableId> {
        self.seats.get(guest).map(|seat| &seat.table_id)
    }

    pub fn is_assigned(&self, guest: &GuestId) -> bool {
        self.seats.contains_key(guest)
    }

    /// Places a guest on a seat, returning the seat they held before.
    pub fn assign(&mut self, guest: GuestId, seat: Seat) -> Option<Seat> {
        self.seats.insert(guest, seat)
    }

    /// Removes a guest from their seat, returning it.
    pub fn unassign(&mut self, guest: &GuestId) -> Option<Seat> {
        self.seats.remove(guest)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GuestId, &Seat)> {
        self.seats.iter()
    }

    /// Guests at a table, ordered by seat index.
    pub fn guests_at(&self, table: &TableId) -> Vec<&GuestId> {
        let mut at_table: Vec<(&GuestId, u32)> = self
            .seats
            .iter()
            .filter(|(_, seat)| &seat.table_id == table)
            .map(|(guest, seat)| (guest, seat.seat_index))
            .collect();
        at_table.sort_by_key(|&(guest, seat_index)| (seat_index, guest));
        at_table.into_iter().map(|(guest, _)| guest).collect()
    }

    pub fn seated_count(&self, table: &TableId) -> usize {
        self.seats
            .values()
            .filter(|seat| &seat.table_id == table)
            .count()
    }

    /// Number of seated guests per table id.
    pub fn occupancy(&self) -> BTreeMap<&TableId, usize> {
        let mut counts = BTreeMap::new();
        for seat in self.seats.values() {
            *counts.entry(&seat.table_id).or_insert(0) += 1;
        }
        counts
    }

    /// Lowest seat index at `table` that nobody occupies.
    pub fn first_free_seat(&self, table: &Table) -> Option<u32> {
        let taken: BTreeSet<u32> = self
            .seats
            .values()
            .filter(|seat| seat.table_id == table.id)
            .map(|seat| seat.seat_index)
            .collect();
        (0..table.capacity).find(|index| !taken.contains(index))
    }

    /// Seats a guest at the first free seat of `table`.
    ///
    /// # Errors
    ///
    /// Returns [`SeatingError::CapacityExceededInput`] if the table is full.
    pub fn seat_guest(&mut self, guest: GuestId, table: &Table) -> Result<Seat> {
        if self.table_of(&guest) == Some(&table.id) {
            if let Some(seat) = self.seat_of(&guest) {
                return Ok(seat.clone());
            }
        }
        let Some(seat_index) = self.first_free_seat(table) else {
            return Err(SeatingError::CapacityExceededInput {
                table_id: table.id.clone(),
                seated: self.seated_count(&table.id) + 1,
                capacity: table.capacity,
            });
        };
        let seat = Seat::new(table.id.clone(), seat_index);
        self.assign(guest, seat.clone());
        Ok(seat)
    }

    /// Checks that no table holds more guests than its capacity.
    ///
    /// Tables are checked in slice order; the first over-full table is
    /// reported. Guests seated at tables missing from `tables` are ignored.
    pub fn check_capacity(&self, tables: &[Table]) -> Result<()> {
        let occupancy = self.occupancy();
        for table in tables {
            let seated = occupancy.get(&table.id).copied().unwrap_or(0);
            if seated > table.seats() {
                return Err(SeatingError::CapacityExceededInput {
                    table_id: table.id.clone(),
                    seated,
                    capacity: table.capacity,
                });
            }
        }
        Ok(())
    }

    /// Checks that no two guests share a seat, that every seat index is
    /// within its table's capacity, and that every table exists.
    pub fn check_seats(&self, tables: &[Table]) -> Result<()> {
        let mut taken: BTreeMap<&Seat, &GuestId> = BTreeMap::new();
        for (guest, seat) in &self.seats {
            let Some(table) = tables.iter().find(|t| t.id == seat.table_id) else {
                return Err(SeatingError::InvalidInput(format!(
                    "guest {} is seated at unknown table {}",
                    guest, seat.table_id
                )));
            };
            if seat.seat_index >= table.capacity {
                return Err(SeatingError::InvalidInput(format!(
                    "guest {} has seat {} at table {} with capacity {}",
                    guest, seat.seat_index, table.id, table.capacity
                )));
            }
            if let Some(other) = taken.insert(seat, guest) {
                return Err(SeatingError::InvalidInput(format!(
                    "guests {} and {} share seat {} at table {}",
                    other, guest, seat.seat_index, seat.table_id
                )));
            }
        }
        Ok(())
    }
}

impl FromIterator<(GuestId, Seat)> for Assignment {
    fn from_iter<I: IntoIterator<Item = (GuestId, Seat)>>(iter: I) -> Self {
        Self {
            seats: iter.into_iter().collect(),
        }
    }
}
