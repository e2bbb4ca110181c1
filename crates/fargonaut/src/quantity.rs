//! Physical quantities stored in FARGO3D snapshot files.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::axis::{Axis, CoordinateSystem};
use crate::error::FargoError;

/// A field quantity and, for vector quantities, its component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Quantity {
    /// Gas density, `gasdens`.
    Density,
    /// Gas energy, `gasenergy`.
    Energy,
    /// Gas velocity component, `gasvx`, `gasvy`, `gasvz`.
    Velocity(Axis),
    /// Magnetic field component, `bx`, `by`, `bz`.
    MagneticField(Axis),
}

impl Quantity {
    /// Every quantity FARGO3D can write.
    pub const ALL: [Quantity; 8] = [
        Quantity::Density,
        Quantity::Energy,
        Quantity::Velocity(Axis::X),
        Quantity::Velocity(Axis::Y),
        Quantity::Velocity(Axis::Z),
        Quantity::MagneticField(Axis::X),
        Quantity::MagneticField(Axis::Y),
        Quantity::MagneticField(Axis::Z),
    ];

    /// Snapshot file prefix.
    pub fn prefix(&self) -> &'static str {
        match self {
            Quantity::Density => "gasdens",
            Quantity::Energy => "gasenergy",
            Quantity::Velocity(Axis::X) => "gasvx",
            Quantity::Velocity(Axis::Y) => "gasvy",
            Quantity::Velocity(Axis::Z) => "gasvz",
            Quantity::MagneticField(Axis::X) => "bx",
            Quantity::MagneticField(Axis::Y) => "by",
            Quantity::MagneticField(Axis::Z) => "bz",
        }
    }

    /// Snapshot file name for output number `num`.
    pub fn file_name(&self, num: usize) -> String {
        format!("{}{}.dat", self.prefix(), num)
    }

    /// Axis along which values sit on the lower cell edge, if any.
    pub fn staggered_axis(&self) -> Option<Axis> {
        match self {
            Quantity::Density | Quantity::Energy => None,
            Quantity::Velocity(axis) | Quantity::MagneticField(axis) => Some(*axis),
        }
    }

    /// Colour bar label, e.g. `Σ_g` or `v_φ`.
    pub fn label(&self, system: CoordinateSystem) -> String {
        match self {
            Quantity::Density => "Σ_g".to_string(),
            Quantity::Energy => "e_g".to_string(),
            Quantity::Velocity(axis) => format!("v_{}", system.axis_label(*axis)),
            Quantity::MagneticField(axis) => format!("B_{}", system.axis_label(*axis)),
        }
    }

    /// Parse a snapshot file name like `gasvy12.dat` into quantity and number.
    pub fn parse_file_name(name: &str) -> Option<(Quantity, usize)> {
        let stem = name.strip_suffix(".dat")?;
        let digits = stem.len() - stem.trim_end_matches(|c: char| c.is_ascii_digit()).len();
        if digits == 0 {
            return None;
        }
        let (prefix, num) = stem.split_at(stem.len() - digits);
        // FARGO3D never zero-pads output numbers
        if num.len() > 1 && num.starts_with('0') {
            return None;
        }
        let quantity = prefix.parse().ok()?;
        Some((quantity, num.parse().ok()?))
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

impl FromStr for Quantity {
    type Err = FargoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Quantity::ALL
            .into_iter()
            .find(|q| q.prefix() == s)
            .ok_or_else(|| FargoError::UnsupportedQuantity(s.to_string()))
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.prefix())
    }
}
