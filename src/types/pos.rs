//! Integer block coordinates.

use std::fmt;

/// Position of a block in the voxel grid. Equality is component-wise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The block directly beneath this one.
    pub fn below(self) -> Self {
        Self::new(self.x, self.y - 1, self.z)
    }

    /// The block directly above this one.
    pub fn above(self) -> Self {
        Self::new(self.x, self.y + 1, self.z)
    }

    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Horizontal center of the block column.
    pub fn center_xz(self) -> (f64, f64) {
        (self.x as f64 + 0.5, self.z as f64 + 0.5)
    }

    /// Squared horizontal distance from the block center to a continuous position.
    pub fn dist_sq_xz(self, px: f64, pz: f64) -> f64 {
        let (cx, cz) = self.center_xz();
        let dx = cx - px;
        let dz = cz - pz;
        dx * dx + dz * dz
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
