//! Builders for guests, tables, relationships and constraints.

use seatplan_core::{
    Assignment, ConstraintType, Guest, GuestId, Priority, Relationship, RelationshipType, Seat,
    SeatingConstraint, Table,
};

/// A guest whose first name is the id and last name is "Test".
pub fn guest(id: &str) -> Guest {
    Guest::new(id, id, "Test")
}

/// A guest with a group label.
pub fn grouped(id: &str, group: &str) -> Guest {
    guest(id).with_group(group)
}

/// `n` ungrouped guests with ids `g0..g{n-1}`.
pub fn guests(n: usize) -> Vec<Guest> {
    (0..n).map(|i| guest(&format!("g{i}"))).collect()
}

/// `n` tables with ids `t0..t{n-1}`, laid out on a row 10 units apart.
pub fn tables(n: usize, capacity: u32) -> Vec<Table> {
    (0..n)
        .map(|i| Table::new(format!("t{i}"), capacity).with_position(i as f64 * 10.0, 0.0))
        .collect()
}

pub fn relationship(a: &str, b: &str, kind: RelationshipType, strength: u8) -> Relationship {
    Relationship::new(a, b, kind, strength)
}

pub fn friend(a: &str, b: &str, strength: u8) -> Relationship {
    relationship(a, b, RelationshipType::Friend, strength)
}

pub fn avoid(a: &str, b: &str, strength: u8) -> Relationship {
    relationship(a, b, RelationshipType::Avoid, strength)
}

pub fn constraint(
    id: &str,
    kind: ConstraintType,
    members: &[&str],
    priority: Priority,
) -> SeatingConstraint {
    SeatingConstraint::new(id, kind, members.iter().copied(), priority)
}

/// Seats each `(guest, table)` pair, numbering seats per table in order.
pub fn assignment(pairs: &[(&str, &str)]) -> Assignment {
    let mut result = Assignment::new();
    let mut next_seat: Vec<(&str, u32)> = Vec::new();
    for &(guest, table) in pairs {
        let seat_index = match next_seat.iter_mut().find(|(t, _)| *t == table) {
            Some((_, next)) => {
                let seat = *next;
                *next += 1;
                seat
            }
            None => {
                next_seat.push((table, 1));
                0
            }
        };
        result.assign(GuestId::from(guest), Seat::new(table, seat_index));
    }
    result
}
