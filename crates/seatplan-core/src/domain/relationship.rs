//! Declared relationships between guests.

use super::GuestId;
use crate::error::{Result, SeatingError};

/// Kind of relationship between two guests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RelationshipType {
    Family,
    Friend,
    Colleague,
    Acquaintance,
    Partner,
    /// The two guests should not share a table.
    Avoid,
}

impl RelationshipType {
    pub fn label(&self) -> &'static str {
        match self {
            RelationshipType::Family => "family",
            RelationshipType::Friend => "friend",
            RelationshipType::Colleague => "colleague",
            RelationshipType::Acquaintance => "acquaintance",
            RelationshipType::Partner => "partner",
            RelationshipType::Avoid => "avoid",
        }
    }
}

/// A relationship row as stored: directed from `guest_id` to `related_guest_id`.
///
/// The engine reads every row symmetrically; see [`Relationship::pair`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Relationship {
    pub guest_id: GuestId,
    pub related_guest_id: GuestId,
    pub kind: RelationshipType,
    pub strength: u8,
}

impl Relationship {
    /// Lowest legal strength.
    pub const MIN_STRENGTH: u8 = 1;
    /// Highest legal strength.
    pub const MAX_STRENGTH: u8 = 5;

    pub fn new(
        guest_id: impl Into<GuestId>,
        related_guest_id: impl Into<GuestId>,
        kind: RelationshipType,
        strength: u8,
    ) -> Self {
        Self {
            guest_id: guest_id.into(),
            related_guest_id: related_guest_id.into(),
            kind,
            strength,
        }
    }

    /// The unordered pair this row links, smaller id first.
    pub fn pair(&self) -> (&GuestId, &GuestId) {
        if self.guest_id <= self.related_guest_id {
            (&self.guest_id, &self.related_guest_id)
        } else {
            (&self.related_guest_id, &self.guest_id)
        }
    }

    pub fn involves(&self, guest: &GuestId) -> bool {
        &self.guest_id == guest || &self.related_guest_id == guest
    }

    pub fn is_avoid(&self) -> bool {
        self.kind == RelationshipType::Avoid
    }

    /// Rejects strengths outside `[1, 5]` and self-relationships.
    pub fn validate(&self) -> Result<()> {
        if !(Self::MIN_STRENGTH..=Self::MAX_STRENGTH).contains(&self.strength) {
            return Err(SeatingError::InvalidInput(format!(
                "relationship {} -> {} has strength {} outside [{}, {}]",
                self.guest_id,
                self.related_guest_id,
                self.strength,
                Self::MIN_STRENGTH,
                Self::MAX_STRENGTH
            )));
        }
        if self.guest_id == self.related_guest_id {
            return Err(SeatingError::InvalidInput(format!(
                "guest {} has a relationship with themselves",
                self.guest_id
            )));
        }
        Ok(())
    }
}
