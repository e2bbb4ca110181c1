//! Grid axes and coordinate systems.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FargoError;

/// One of the three grid axes, in FARGO3D storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Position of the axis in `(x, y, z)` order.
    pub fn index(&self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }

    /// The two other axes, in `(x, y, z)` order.
    pub fn others(&self) -> (Axis, Axis) {
        match self {
            Axis::X => (Axis::Y, Axis::Z),
            Axis::Y => (Axis::X, Axis::Z),
            Axis::Z => (Axis::X, Axis::Y),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Axis {
    type Err = FargoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x" | "X" => Ok(Axis::X),
            "y" | "Y" => Ok(Axis::Y),
            "z" | "Z" => Ok(Axis::Z),
            other => Err(FargoError::invalid_argument(format!("unknown axis '{}'", other))),
        }
    }
}

/// Geometry of the simulation grid.
///
/// FARGO3D always stores azimuth along x for curvilinear grids:
///
/// | system      | x | y | z |
/// |-------------|---|---|---|
/// | Cartesian   | x | y | z |
/// | Cylindrical | φ | r | z |
/// | Spherical   | φ | r | θ |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateSystem {
    #[default]
    Cartesian,
    Cylindrical,
    Spherical,
}

impl CoordinateSystem {
    /// Compile option selecting this system.
    pub fn option_name(&self) -> &'static str {
        match self {
            CoordinateSystem::Cartesian => "CARTESIAN",
            CoordinateSystem::Cylindrical => "CYLINDRICAL",
            CoordinateSystem::Spherical => "SPHERICAL",
        }
    }

    /// Native name of a grid axis in this system.
    pub fn axis_label(&self, axis: Axis) -> &'static str {
        match (self, axis) {
            (CoordinateSystem::Cartesian, a) => a.as_str(),
            (_, Axis::X) => "φ",
            (_, Axis::Y) => "r",
            (CoordinateSystem::Cylindrical, Axis::Z) => "z",
            (CoordinateSystem::Spherical, Axis::Z) => "θ",
        }
    }

    pub fn is_curvilinear(&self) -> bool {
        !matches!(self, CoordinateSystem::Cartesian)
    }
}

impl fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CoordinateSystem::Cartesian => "cartesian",
            CoordinateSystem::Cylindrical => "cylindrical",
            CoordinateSystem::Spherical => "spherical",
        };
        f.write_str(name)
    }
}
