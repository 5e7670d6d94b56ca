//! Input validation.
//!
//! Validation never panics and never stops at the first problem: every
//! issue found is returned so a caller can show them all at once.

use std::collections::HashSet;

use crate::domain::{GuestId, SeatingConstraint, SeatingProblem};
use crate::error::{Result, SeatingError};

/// Validates a single constraint against the set of known guest ids.
///
/// # Errors
///
/// [`SeatingError::InvalidConstraint`] if the constraint has no members or
/// names a guest that is not in `known_guests`.
pub fn validate_constraint(
    constraint: &SeatingConstraint,
    known_guests: &HashSet<&GuestId>,
) -> Result<()> {
    constraint.validate()?;
    let unknown: Vec<&str> = constraint
        .members()
        .into_iter()
        .filter(|id| !known_guests.contains(id))
        .map(GuestId::as_str)
        .collect();
    if !unknown.is_empty() {
        return Err(SeatingError::InvalidConstraint {
            constraint_id: constraint.id.clone(),
            reason: format!("references unknown guest(s): {}", unknown.join(", ")),
        });
    }
    Ok(())
}

/// Validates every part of a problem and returns all problems found.
///
/// An empty vector means the problem is well formed.
pub fn validate_problem(problem: &SeatingProblem) -> Vec<SeatingError> {
    let mut errors = Vec::new();

    let mut guest_ids = HashSet::new();
    for guest in &problem.guests {
        if !guest_ids.insert(&guest.id) {
            errors.push(SeatingError::InvalidInput(format!(
                "duplicate guest id {}",
                guest.id
            )));
        }
    }

    let mut table_ids = HashSet::new();
    for table in &problem.tables {
        if let Err(e) = table.validate() {
            errors.push(e);
        }
        if !table_ids.insert(&table.id) {
            errors.push(SeatingError::InvalidInput(format!(
                "duplicate table id {}",
                table.id
            )));
        }
    }

    for relationship in &problem.relationships {
        if let Err(e) = relationship.validate() {
            errors.push(e);
        }
    }

    let mut constraint_ids = HashSet::new();
    for constraint in &problem.constraints {
        if !constraint_ids.insert(&constraint.id) {
            errors.push(SeatingError::InvalidInput(format!(
                "duplicate constraint id {}",
                constraint.id
            )));
        }
        if let Err(e) = validate_constraint(constraint, &guest_ids) {
            errors.push(e);
        }
    }

    errors
}
