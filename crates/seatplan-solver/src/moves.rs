//! Neighborhood moves and random move selection.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use smallvec::SmallVec;

use seatplan_core::Result;
use seatplan_scoring::{Location, SeatingDirector};

/// A change to the working assignment, in director index form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatMove {
    /// Seat a guest (seated or not) at a free seat on another table.
    Change {
        guest: usize,
        from: Option<Location>,
        to: Location,
    },
    /// Exchange the seats of two guests at different tables. Capacity neutral.
    Swap { a: usize, b: usize },
    /// An unassigned guest takes a seated guest's seat; the seated guest
    /// leaves the plan. Lets overflow guests in when every table is full.
    Displace {
        incoming: usize,
        outgoing: usize,
        at: Location,
    },
}

impl SeatMove {
    /// Applies the move and returns the change in combined score.
    pub fn do_move(&self, director: &mut SeatingDirector) -> Result<f64> {
        match *self {
            SeatMove::Change { guest, to, .. } => director.relocate(guest, Some(to)),
            SeatMove::Swap { a, b } => director.swap(a, b),
            SeatMove::Displace {
                incoming,
                outgoing,
                at,
            } => {
                let delta = director.relocate(outgoing, None)?;
                Ok(delta + director.relocate(incoming, Some(at))?)
            }
        }
    }

    /// Reverts a move previously applied with [`do_move`](Self::do_move).
    pub fn undo_move(&self, director: &mut SeatingDirector) -> Result<f64> {
        match *self {
            SeatMove::Change { guest, from, .. } => director.relocate(guest, from),
            SeatMove::Swap { a, b } => director.swap(a, b),
            SeatMove::Displace {
                incoming,
                outgoing,
                at,
            } => {
                let delta = director.relocate(incoming, None)?;
                Ok(delta + director.relocate(outgoing, Some(at))?)
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SeatMove::Change { .. } => "change",
            SeatMove::Swap { .. } => "swap",
            SeatMove::Displace { .. } => "displace",
        }
    }
}

/// Picks random moves from the current state.
#[derive(Debug, Clone)]
pub struct MoveSelector {
    swap_probability: f64,
    attempts: usize,
}

impl Default for MoveSelector {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl MoveSelector {
    /// `swap_probability` is the chance a seated guest is swapped rather
    /// than moved; clamped to `[0, 1]`.
    pub fn new(swap_probability: f64) -> Self {
        let swap_probability = if swap_probability.is_nan() {
            0.0
        } else {
            swap_probability.clamp(0.0, 1.0)
        };
        Self {
            swap_probability,
            attempts: 8,
        }
    }

    /// Draws a random doable move, or `None` if a handful of draws all
    /// landed on impossible moves.
    pub fn select(&self, director: &SeatingDirector, rng: &mut ChaCha8Rng) -> Option<SeatMove> {
        let guests = director.guest_count();
        let tables = director.table_count();
        if guests == 0 || tables == 0 {
            return None;
        }
        for _ in 0..self.attempts {
            let guest = rng.random_range(0..guests);
            let from = director.location(guest);

            if from.is_some() && guests > 1 && rng.random_bool(self.swap_probability) {
                let other = rng.random_range(0..guests);
                match (from, director.location(other)) {
                    (Some(a), Some(b)) if a.table != b.table => {
                        return Some(SeatMove::Swap { a: guest, b: other });
                    }
                    (Some(at), None) => {
                        return Some(SeatMove::Displace {
                            incoming: other,
                            outgoing: guest,
                            at,
                        });
                    }
                    _ => {}
                }
                continue;
            }

            let current = from.map(|l| l.table);
            let candidates: SmallVec<[usize; 16]> = (0..tables)
                .filter(|&t| Some(t) != current && director.has_free_seat(t))
                .collect();
            if candidates.is_empty() {
                // Every table is full: an unassigned guest can only come in
                // by taking someone's seat.
                if from.is_none() {
                    let other = rng.random_range(0..guests);
                    if let Some(at) = director.location(other) {
                        return Some(SeatMove::Displace {
                            incoming: guest,
                            outgoing: other,
                            at,
                        });
                    }
                }
                continue;
            }
            let table = candidates[rng.random_range(0..candidates.len())];
            if let Some(seat) = director.free_seat(table) {
                return Some(SeatMove::Change {
                    guest,
                    from,
                    to: Location::new(table, seat),
                });
            }
        }
        None
    }
}

/// True if any change, swap or displacement is possible from the current state.
pub fn any_move_exists(director: &SeatingDirector) -> bool {
    let tables_with_room = (0..director.table_count())
        .filter(|&t| director.has_free_seat(t))
        .count();
    let occupied_tables = (0..director.table_count())
        .filter(|&t| director.seated_count(t) > 0)
        .count();

    let unassigned = (0..director.guest_count()).any(|g| director.location(g).is_none());
    if unassigned && (tables_with_room > 0 || occupied_tables > 0) {
        return true;
    }
    if occupied_tables >= 2 {
        return true;
    }
    // A seated guest can move if some other table has room.
    occupied_tables == 1
        && (0..director.table_count())
            .any(|t| director.seated_count(t) == 0 && director.has_free_seat(t))
}
