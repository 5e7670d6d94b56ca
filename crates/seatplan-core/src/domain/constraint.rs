//! Seating constraints.

use super::{ConstraintId, GuestId};
use crate::error::{Result, SeatingError};

/// The rule a constraint expresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ConstraintType {
    MustSitTogether,
    MustNotSitTogether,
    /// Evaluated like `MustSitTogether`; kept apart for labeling.
    SameTable,
    /// Evaluated like `MustNotSitTogether`; kept apart for labeling.
    DifferentTable,
    NearFront,
    Accessibility,
}

impl ConstraintType {
    pub fn label(&self) -> &'static str {
        match self {
            ConstraintType::MustSitTogether => "must_sit_together",
            ConstraintType::MustNotSitTogether => "must_not_sit_together",
            ConstraintType::SameTable => "same_table",
            ConstraintType::DifferentTable => "different_table",
            ConstraintType::NearFront => "near_front",
            ConstraintType::Accessibility => "accessibility",
        }
    }

    /// True for the types that require members to share one table.
    pub fn is_together(&self) -> bool {
        matches!(
            self,
            ConstraintType::MustSitTogether | ConstraintType::SameTable
        )
    }

    /// True for the types that require members to be spread apart.
    pub fn is_apart(&self) -> bool {
        matches!(
            self,
            ConstraintType::MustNotSitTogether | ConstraintType::DifferentTable
        )
    }
}

/// How much a violation of a constraint costs.
///
/// Priority sets penalty weight only. Even a `Required` constraint never
/// makes a request infeasible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Priority {
    Optional,
    Preferred,
    Required,
}

impl Priority {
    pub fn label(&self) -> &'static str {
        match self {
            Priority::Required => "required",
            Priority::Preferred => "preferred",
            Priority::Optional => "optional",
        }
    }
}

/// A rule over a set of guests.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeatingConstraint {
    pub id: ConstraintId,
    pub kind: ConstraintType,
    pub guest_ids: Vec<GuestId>,
    pub priority: Priority,
    pub description: Option<String>,
}

impl SeatingConstraint {
    pub fn new(
        id: impl Into<ConstraintId>,
        kind: ConstraintType,
        guest_ids: impl IntoIterator<Item = impl Into<GuestId>>,
        priority: Priority,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            guest_ids: guest_ids.into_iter().map(Into::into).collect(),
            priority,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Member ids with duplicates removed, in first-seen order.
    pub fn members(&self) -> Vec<&GuestId> {
        let mut members: Vec<&GuestId> = Vec::with_capacity(self.guest_ids.len());
        for id in &self.guest_ids {
            if !members.contains(&id) {
                members.push(id);
            }
        }
        members
    }

    pub fn involves(&self, guest: &GuestId) -> bool {
        self.guest_ids.contains(guest)
    }

    /// Rejects constraints with no members.
    pub fn validate(&self) -> Result<()> {
        if self.guest_ids.is_empty() {
            return Err(SeatingError::InvalidConstraint {
                constraint_id: self.id.clone(),
                reason: "constraint applies to no guests".to_string(),
            });
        }
        Ok(())
    }
}
