//! Seatplan Core - Domain types for seating assignment
//!
//! This crate provides the fundamental abstractions shared by every other
//! seatplan crate:
//! - Domain model: guests, tables, relationships, constraints, assignments
//! - The two-part [`SeatingScore`] (affinity and penalty)
//! - The [`SeatingError`] taxonomy
//! - Input validation helpers

pub mod domain;
pub mod error;
pub mod score;
pub mod validate;

pub use domain::{
    Assignment, ConstraintId, ConstraintType, Guest, GuestId, Position, Priority, Relationship,
    RelationshipType, Seat, SeatingConstraint, SeatingProblem, Table, TableId, TableShape,
};
pub use error::{Result, SeatingError};
pub use score::SeatingScore;
pub use validate::{validate_constraint, validate_problem};
