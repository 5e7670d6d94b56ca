//! Guest records.

use super::GuestId;

/// A guest to be seated.
///
/// The group label is free text ("Bride's family"); blank labels are treated
/// as no group at all.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Guest {
    pub id: GuestId,
    pub first_name: String,
    pub last_name: String,
    pub group: Option<String>,
    pub accessibility_needs: Vec<String>,
    pub dietary_restrictions: Vec<String>,
}

impl Guest {
    /// Creates a guest with no group and no tags.
    pub fn new(
        id: impl Into<GuestId>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            group: None,
            accessibility_needs: Vec::new(),
            dietary_restrictions: Vec::new(),
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_accessibility_need(mut self, need: impl Into<String>) -> Self {
        self.accessibility_needs.push(need.into());
        self
    }

    pub fn with_dietary_restriction(mut self, restriction: impl Into<String>) -> Self {
        self.dietary_restrictions.push(restriction.into());
        self
    }

    /// Returns the trimmed group label, or `None` for ungrouped guests.
    pub fn group_label(&self) -> Option<&str> {
        self.group
            .as_deref()
            .map(str::trim)
            .filter(|label| !label.is_empty())
    }

    /// Returns "First Last", falling back to the id when both parts are blank.
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let name = name.trim();
        if name.is_empty() {
            self.id.to_string()
        } else {
            name.to_string()
        }
    }

    pub fn has_accessibility_needs(&self) -> bool {
        self.accessibility_needs
            .iter()
            .any(|need| !need.trim().is_empty())
    }
}
