//! A reception with families, colleagues and a couple of feuds.
//!
//! 18 guests at 4 tables of 6, so 6 seats stay empty.
//! Tables sit on a row with `t0` closest to the origin, which tests use as
//! the front anchor.

use seatplan_core::{ConstraintType, Priority, RelationshipType, SeatingProblem};

use crate::people::{constraint, grouped, guest, relationship, tables};

/// Builds the reception problem.
pub fn wedding() -> SeatingProblem {
    let guests = vec![
        grouped("ann", "Bride's family"),
        grouped("bea", "Bride's family"),
        grouped("cal", "Bride's family"),
        grouped("dan", "Bride's family"),
        grouped("eve", "Groom's family"),
        grouped("fay", "Groom's family"),
        grouped("gus", "Groom's family"),
        grouped("hal", "Work"),
        grouped("ivy", "Work"),
        grouped("jon", "Work"),
        grouped("kim", "Work"),
        guest("lou"),
        guest("max"),
        guest("ned"),
        guest("ola"),
        guest("pam").with_accessibility_need("wheelchair"),
        guest("quin"),
        guest("rex"),
    ];

    let relationships = vec![
        relationship("ann", "bea", RelationshipType::Family, 5),
        relationship("bea", "cal", RelationshipType::Family, 4),
        relationship("cal", "dan", RelationshipType::Family, 3),
        relationship("eve", "fay", RelationshipType::Partner, 5),
        relationship("fay", "gus", RelationshipType::Family, 4),
        relationship("hal", "ivy", RelationshipType::Colleague, 3),
        relationship("jon", "kim", RelationshipType::Colleague, 2),
        relationship("lou", "max", RelationshipType::Friend, 4),
        relationship("max", "ned", RelationshipType::Friend, 3),
        relationship("ola", "pam", RelationshipType::Friend, 5),
        relationship("quin", "rex", RelationshipType::Acquaintance, 1),
        relationship("dan", "gus", RelationshipType::Avoid, 5),
        relationship("ivy", "lou", RelationshipType::Avoid, 3),
    ];

    let constraints = vec![
        constraint(
            "couple",
            ConstraintType::MustSitTogether,
            &["eve", "fay"],
            Priority::Required,
        ),
        constraint(
            "feud",
            ConstraintType::MustNotSitTogether,
            &["dan", "gus"],
            Priority::Required,
        ),
        constraint(
            "siblings",
            ConstraintType::SameTable,
            &["ann", "bea", "cal"],
            Priority::Preferred,
        ),
        constraint(
            "managers",
            ConstraintType::DifferentTable,
            &["hal", "jon"],
            Priority::Optional,
        ),
        constraint(
            "front",
            ConstraintType::NearFront,
            &["ann", "eve"],
            Priority::Preferred,
        ),
        constraint(
            "access",
            ConstraintType::Accessibility,
            &["pam"],
            Priority::Required,
        ),
    ];

    SeatingProblem::new(guests, tables(4, 6))
        .with_relationships(relationships)
        .with_constraints(constraints)
}
