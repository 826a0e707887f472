use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Neg;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPosition {
    pub x: u32,
    pub y: u32,
}

impl GridPosition {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Applies `delta`, returning `None` if either coordinate would go negative
    /// or overflow. Upper grid bounds are the caller's concern.
    pub fn offset(&self, delta: Delta) -> Option<GridPosition> {
        let x = self.x.checked_add_signed(delta.dx)?;
        let y = self.y.checked_add_signed(delta.dy)?;
        Some(Self::new(x, y))
    }
}

impl fmt::Display for GridPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Relative offset between two grid positions. Ordered by `dx`, then `dy`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Delta {
    pub dx: i32,
    pub dy: i32,
}

impl Delta {
    pub const EAST: Delta = Delta { dx: 1, dy: 0 };
    pub const WEST: Delta = Delta { dx: -1, dy: 0 };
    pub const NORTH: Delta = Delta { dx: 0, dy: 1 };
    pub const SOUTH: Delta = Delta { dx: 0, dy: -1 };

    pub fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    /// Single-step N/E/S/W offsets are the only ones channels can carry.
    pub fn is_cardinal(&self) -> bool {
        Axis::of(*self).is_some()
    }
}

impl Neg for Delta {
    type Output = Delta;

    fn neg(self) -> Delta {
        Delta::new(-self.dx, -self.dy)
    }
}

impl fmt::Display for Delta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.dx, self.dy)
    }
}

/// Channel axis. X channels run along a row and carry horizontal
/// connections, Y channels run along a column and carry vertical ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub const ALL: [Axis; 2] = [Axis::X, Axis::Y];

    pub fn of(delta: Delta) -> Option<Axis> {
        match (delta.dx, delta.dy) {
            (1 | -1, 0) => Some(Axis::X),
            (0, 1 | -1) => Some(Axis::Y),
            _ => None,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "CHANX"),
            Axis::Y => write!(f, "CHANY"),
        }
    }
}
