//! Domain model for seating problems.
//!
//! All types are plain values. The engine never mutates them in place; every
//! call receives a full snapshot and returns new values.

mod assignment;
mod constraint;
mod guest;
mod ids;
mod problem;
mod relationship;
mod table;


pub use assignment::{Assignment, Seat};
pub use constraint::{ConstraintType, Priority, SeatingConstraint};
pub use guest::Guest;
pub use ids::{ConstraintId, GuestId, TableId};
pub use problem::SeatingProblem;
pub use relationship::{Relationship, RelationshipType};
pub use table::{Position, Table, TableShape};
