//! SeatingScore - affinity and penalty of an assignment

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Sub};

/// The two components that grade an assignment.
///
/// `affinity` rewards co-seated guests with positive relationships (and may
/// be negative because of avoid pairs); `penalty` is the weighted cost of
/// violated constraints. Fitness is `affinity - penalty`; higher is better.
///
/// # Examples
///
/// ```
/// use seatplan_core::SeatingScore;
///
/// let a = SeatingScore::of(12.0, 0.0);
/// let b = SeatingScore::of(30.0, 100.0);
///
/// assert_eq!(b.combined(), -70.0);
/// assert!(a > b);
/// ```
#[derive(Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeatingScore {
    pub affinity: f64,
    pub penalty: f64,
}

impl SeatingScore {
    /// The zero score.
    pub const ZERO: SeatingScore = SeatingScore {
        affinity: 0.0,
        penalty: 0.0,
    };

    #[inline]
    pub const fn of(affinity: f64, penalty: f64) -> Self {
        SeatingScore { affinity, penalty }
    }

    /// Combined fitness: `affinity - penalty`.
    #[inline]
    pub fn combined(&self) -> f64 {
        self.affinity - self.penalty
    }

    /// True when no constraint is violated.
    #[inline]
    pub fn is_penalty_free(&self) -> bool {
        self.penalty <= 0.0
    }
}

impl PartialOrd for SeatingScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.combined().partial_cmp(&other.combined())
    }
}

impl Add for SeatingScore {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        SeatingScore::of(self.affinity + other.affinity, self.penalty + other.penalty)
    }
}

impl Sub for SeatingScore {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        SeatingScore::of(self.affinity - other.affinity, self.penalty - other.penalty)
    }
}

impl fmt::Debug for SeatingScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SeatingScore({}, {})",
            unsigned_zero(self.affinity),
            unsigned_zero(self.penalty)
        )
    }
}

impl fmt::Display for SeatingScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}affinity/{}penalty",
            unsigned_zero(self.affinity),
            unsigned_zero(self.penalty)
        )
    }
}

// Empty float sums come out as -0.0, which would print as "-0".
fn unsigned_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combined() {
        assert_eq!(SeatingScore::of(5.0, 2.0).combined(), 3.0);
        assert_eq!(SeatingScore::ZERO.combined(), 0.0);
    }

    #[test]
    fn test_ordering_uses_combined() {
        assert!(SeatingScore::of(10.0, 0.0) > SeatingScore::of(20.0, 15.0));
        assert!(SeatingScore::of(-3.0, 0.0) < SeatingScore::of(0.0, 0.0));
        assert_eq!(
            SeatingScore::of(4.0, 1.0).partial_cmp(&SeatingScore::of(3.0, 0.0)),
            Some(Ordering::Equal)
        );
    }

    #[test]
    fn test_arithmetic() {
        let a = SeatingScore::of(4.0, 1.0);
        let b = SeatingScore::of(1.0, 3.0);
        assert_eq!(a + b, SeatingScore::of(5.0, 4.0));
        assert_eq!(a - b, SeatingScore::of(3.0, -2.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            format!("{}", SeatingScore::of(-10.0, 1000.0)),
            "-10affinity/1000penalty"
        );
        assert_eq!(format!("{}", SeatingScore::of(-0.0, -0.0)), "0affinity/0penalty");
        assert_eq!(format!("{:?}", SeatingScore::of(-0.0, 2.5)), "SeatingScore(0, 2.5)");
        assert!(SeatingScore::of(3.0, 0.0).is_penalty_free());
        assert!(!SeatingScore::of(3.0, 1.0).is_penalty_free());
    }
}
