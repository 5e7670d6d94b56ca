//! The full input snapshot handed to the engine.

use super::{Guest, GuestId, Relationship, SeatingConstraint, Table, TableId};

/// Guests, tables, relationships and constraints for one event.
///
/// Each engine call receives one of these by reference and treats it as an
/// immutable snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeatingProblem {
    pub guests: Vec<Guest>,
    pub tables: Vec<Table>,
    pub relationships: Vec<Relationship>,
    pub constraints: Vec<SeatingConstraint>,
}

impl SeatingProblem {
    pub fn new(guests: Vec<Guest>, tables: Vec<Table>) -> Self {
        Self {
            guests,
            tables,
            relationships: Vec::new(),
            constraints: Vec::new(),
        }
    }

    pub fn with_relationships(mut self, relationships: Vec<Relationship>) -> Self {
        self.relationships = relationships;
        self
    }

    pub fn with_constraints(mut self, constraints: Vec<SeatingConstraint>) -> Self {
        self.constraints = constraints;
        self
    }

    pub fn guest(&self, id: &GuestId) -> Option<&Guest> {
        self.guests.iter().find(|g| &g.id == id)
    }

    pub fn table(&self, id: &TableId) -> Option<&Table> {
        self.tables.iter().find(|t| &t.id == id)
    }

    /// Sum of all table capacities.
    pub fn total_capacity(&self) -> usize {
        self.tables.iter().map(Table::seats).sum()
    }
}
