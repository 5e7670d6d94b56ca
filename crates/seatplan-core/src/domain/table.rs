//! Tables and their placement on the venue floor.

use super::TableId;
use crate::error::{Result, SeatingError};

/// Table shape. Only seat geometry depends on it; the engine ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TableShape {
    #[default]
    Round,
    Rectangle,
    Square,
    Oval,
    HalfRound,
    Serpentine,
}

/// A point on the venue floor plan.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A table guests can be seated at.
///
/// Capacity is unsigned so it can never be negative; a capacity of zero is
/// rejected by [`Table::validate`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Table {
    pub id: TableId,
    pub name: String,
    pub shape: TableShape,
    pub capacity: u32,
    pub position: Position,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
}

impl Table {
    /// Creates a round table at the origin.
    pub fn new(id: impl Into<TableId>, capacity: u32) -> Self {
        let id = id.into();
        Self {
            name: id.to_string(),
            id,
            shape: TableShape::Round,
            capacity,
            position: Position::default(),
            width: 0.0,
            height: 0.0,
            rotation: 0.0,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_shape(mut self, shape: TableShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Position::new(x, y);
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    /// Capacity as a `usize`, for comparisons against guest counts.
    #[inline]
    pub fn seats(&self) -> usize {
        self.capacity as usize
    }

    /// Checks that the table can hold at least one guest.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(SeatingError::InvalidInput(format!(
                "table {} has capacity 0",
                self.id
            )));
        }
        Ok(())
    }
}
