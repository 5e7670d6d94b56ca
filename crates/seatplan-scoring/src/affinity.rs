//! Affinity scoring from guest relationships.
//!
//! Relationship rows are directed in storage but symmetric here: each row is
//! folded into an [`AffinityGraph`] keyed by the unordered guest pair. When a
//! pair has several rows (say "friend" and "avoid"), their contributions are
//! summed rather than one overriding the other.

use std::collections::BTreeMap;

use seatplan_core::{Assignment, GuestId, Relationship};

/// Default factor applied to avoid strengths.
///
/// Seating two guests who avoid each other costs twice what seating two
/// friends of the same strength gains.
pub const AVOID_PENALTY_MULTIPLIER: f64 = 2.0;

/// Contribution of one relationship row when both guests share a table.
///
/// `+strength` for every type except avoid, `-strength * avoid_multiplier`
/// for avoid.
///
/// # Examples
///
/// ```
/// use seatplan_core::{Relationship, RelationshipType};
/// use seatplan_scoring::{relationship_contribution, AVOID_PENALTY_MULTIPLIER};
///
/// let friends = Relationship::new("a", "b", RelationshipType::Friend, 3);
/// let enemies = Relationship::new("a", "b", RelationshipType::Avoid, 5);
///
/// assert_eq!(relationship_contribution(&friends, AVOID_PENALTY_MULTIPLIER), 3.0);
/// assert_eq!(relationship_contribution(&enemies, AVOID_PENALTY_MULTIPLIER), -10.0);
/// ```
pub fn relationship_contribution(relationship: &Relationship, avoid_multiplier: f64) -> f64 {
    let strength = f64::from(relationship.strength);
    if relationship.is_avoid() {
        -strength * avoid_multiplier
    } else {
        strength
    }
}

/// Undirected, summed relationship weights keyed by guest pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AffinityGraph {
    weights: BTreeMap<(GuestId, GuestId), f64>,
}

impl AffinityGraph {
    /// Builds the graph with the default avoid multiplier.
    pub fn new(relationships: &[Relationship]) -> Self {
        Self::with_avoid_multiplier(relationships, AVOID_PENALTY_MULTIPLIER)
    }

    /// Builds the graph with a custom avoid multiplier.
    ///
    /// Rows linking a guest to themselves are skipped.
    pub fn with_avoid_multiplier(relationships: &[Relationship], avoid_multiplier: f64) -> Self {
        let mut weights = BTreeMap::new();
        for relationship in relationships {
            let (a, b) = relationship.pair();
            if a == b {
                continue;
            }
            *weights.entry((a.clone(), b.clone())).or_insert(0.0) +=
                relationship_contribution(relationship, avoid_multiplier);
        }
        Self { weights }
    }

    /// Summed weight between two guests, in either order.
    pub fn weight(&self, a: &GuestId, b: &GuestId) -> f64 {
        let key = if a <= b {
            (a.clone(), b.clone())
        } else {
            (b.clone(), a.clone())
        };
        self.weights.get(&key).copied().unwrap_or(0.0)
    }

    /// Every linked pair with its summed weight, in pair order.
    pub fn pairs(&self) -> impl Iterator<Item = (&GuestId, &GuestId, f64)> {
        self.weights.iter().map(|((a, b), w)| (a, b, *w))
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Affinity of an assignment: the summed weight of every linked pair
    /// seated at the same table.
    pub fn score(&self, assignment: &Assignment) -> f64 {
        self.pairs()
            .filter_map(|(a, b, w)| {
                let ta = assignment.table_of(a)?;
                let tb = assignment.table_of(b)?;
                (ta == tb).then_some(w)
            })
            .sum()
    }
}

/// Scores assignments by social fit.
///
/// # Examples
///
/// ```
/// use seatplan_core::{Assignment, Relationship, RelationshipType, Seat};
/// use seatplan_scoring::AffinityScorer;
///
/// let relationships = vec![Relationship::new("a", "b", RelationshipType::Avoid, 5)];
/// let mut assignment = Assignment::new();
/// assignment.assign("a".into(), Seat::new("t1", 0));
/// assignment.assign("b".into(), Seat::new("t1", 1));
///
/// assert_eq!(AffinityScorer::new().score(&assignment, &relationships), -10.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffinityScorer {
    avoid_multiplier: f64,
}

impl AffinityScorer {
    pub fn new() -> Self {
        Self {
            avoid_multiplier: AVOID_PENALTY_MULTIPLIER,
        }
    }

    pub fn with_avoid_multiplier(avoid_multiplier: f64) -> Self {
        Self { avoid_multiplier }
    }

    pub fn avoid_multiplier(&self) -> f64 {
        self.avoid_multiplier
    }

    /// Builds the normalized graph for repeated scoring.
    pub fn graph(&self, relationships: &[Relationship]) -> AffinityGraph {
        AffinityGraph::with_avoid_multiplier(relationships, self.avoid_multiplier)
    }

    /// Sums relationship contributions for every co-seated pair.
    ///
    /// Unassigned guests contribute nothing; rows naming guests absent from
    /// the assignment are skipped.
    pub fn score(&self, assignment: &Assignment, relationships: &[Relationship]) -> f64 {
        self.graph(relationships).score(assignment)
    }
}

impl Default for AffinityScorer {
    fn default() -> Self {
        Self::new()
    }
}
