//! Cell keys and world locations.
//!
//! A cell is a 16x16 column of the world grid and the unit of ownership.
//! `CellKey` is the natural key of a territory: world name plus integer cell
//! coordinates. Adjacency is 8-directional (Chebyshev distance 1).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::names::WorldName;

/// Width of a cell in world units.
pub const CELL_SIZE: f64 = 16.0;

/// Natural key of a cell: world plus integer cell coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellKey {
    world: WorldName,
    x: i32,
    z: i32,
}

impl CellKey {
    pub fn new(world: WorldName, x: i32, z: i32) -> Self {
        Self { world, x, z }
    }

    /// The cell that contains a world location.
    ///
    /// The float-to-int conversion saturates: coordinates past the `i32`
    /// cell range land in the edge cells and NaN lands in cell 0. Callers
    /// taking untrusted input check [`WorldLocation::is_finite`] first.
    pub fn containing(location: &WorldLocation) -> Self {
        Self {
            world: location.world().clone(),
            x: (location.x() / CELL_SIZE).floor() as i32,
            z: (location.z() / CELL_SIZE).floor() as i32,
        }
    }

    #[inline]
    pub fn world(&self) -> &WorldName {
        &self.world
    }

    #[inline]
    pub fn x(&self) -> i32 {
        self.x
    }

    #[inline]
    pub fn z(&self) -> i32 {
        self.z
    }

    /// The cell `dx`, `dz` cells away in the same world, or `None` when
    /// that falls outside the `i32` grid.
    pub fn offset(&self, dx: i32, dz: i32) -> Option<Self> {
        Some(Self {
            world: self.world.clone(),
            x: self.x.checked_add(dx)?,
            z: self.z.checked_add(dz)?,
        })
    }

    /// True when `other` is a different cell of the same world within
    /// Chebyshev distance 1 (orthogonal or diagonal neighbour).
    pub fn is_adjacent(&self, other: &CellKey) -> bool {
        if self.world != other.world || self == other {
            return false;
        }
        let dx = (i64::from(self.x) - i64::from(other.x)).abs();
        let dz = (i64::from(self.z) - i64::from(other.z)).abs();
        dx <= 1 && dz <= 1
    }

    /// True when `other` is in the same world and within Euclidean distance
    /// `radius` (`dx² + dz² <= radius²`). Never true for a negative radius.
    pub fn within_radius(&self, other: &CellKey, radius: i32) -> bool {
        if radius < 0 || self.world != other.world {
            return false;
        }
        let dx = i128::from(self.x) - i128::from(other.x);
        let dz = i128::from(self.z) - i128::from(other.z);
        let r = i128::from(radius);
        dx * dx + dz * dz <= r * r
    }

    /// The surrounding cells: eight, fewer at the edge of the grid.
    pub fn neighbors(&self) -> impl Iterator<Item = CellKey> + '_ {
        (-1..=1)
            .flat_map(|dx| (-1..=1).map(move |dz| (dx, dz)))
            .filter(|&(dx, dz)| dx != 0 || dz != 0)
            .filter_map(move |(dx, dz)| self.offset(dx, dz))
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}, {})", self.world, self.x, self.z)
    }
}

/// A point in a world: flag positions and actor positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldLocation {
    world: WorldName,
    x: f64,
    y: f64,
    z: f64,
}

impl WorldLocation {
    pub fn new(world: WorldName, x: f64, y: f64, z: f64) -> Self {
        Self { world, x, y, z }
    }

    #[inline]
    pub fn world(&self) -> &WorldName {
        &self.world
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn z(&self) -> f64 {
        self.z
    }

    pub fn cell(&self) -> CellKey {
        CellKey::containing(self)
    }

    /// False if any coordinate is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Integer block coordinates of this point.
    pub fn block(&self) -> (i64, i64, i64) {
        (
            self.x.floor() as i64,
            self.y.floor() as i64,
            self.z.floor() as i64,
        )
    }

    /// Two locations address the same flag when they fall in the same block.
    pub fn same_block(&self, other: &WorldLocation) -> bool {
        self.world == other.world && self.block() == other.block()
    }
}
