//! Grid geometry shared by every field of a run.

use serde::Serialize;

use crate::axis::{Axis, CoordinateSystem};
use crate::domain::AxisDomain;
use crate::error::{FargoError, Result};
use crate::summary::Options;

/// The three axis domains and the coordinate system of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    x: AxisDomain,
    y: AxisDomain,
    z: AxisDomain,
    system: CoordinateSystem,
}

impl Grid {
    pub fn new(x: AxisDomain, y: AxisDomain, z: AxisDomain, system: CoordinateSystem) -> Self {
        Self { x, y, z, system }
    }

    pub fn domain(&self, axis: Axis) -> &AxisDomain {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }

    pub fn coordinate_system(&self) -> CoordinateSystem {
        self.system
    }

    /// Active cell counts `(nx, ny, nz)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.x.cells(), self.y.cells(), self.z.cells())
    }

    /// Total number of active cells.
    pub fn len(&self) -> usize {
        self.x.cells() * self.y.cells() * self.z.cells()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if any stored domain carries ghost cells.
    pub fn includes_ghosts(&self) -> bool {
        Axis::ALL.iter().any(|&a| self.domain(a).ghosts() > 0)
    }
}

/// Coordinate system selected by the compile options.
///
/// Returns `None` when no system option is present; FARGO3D then builds a
/// Cartesian grid.
pub fn coordinate_system_from_options(opts: &Options) -> Result<Option<CoordinateSystem>> {
    let found: Vec<CoordinateSystem> = [
        CoordinateSystem::Cartesian,
        CoordinateSystem::Cylindrical,
        CoordinateSystem::Spherical,
    ]
    .into_iter()
    .filter(|s| opts.contains_key(s.option_name()))
    .collect();

    match found.as_slice() {
        [] => Ok(None),
        [system] => Ok(Some(*system)),
        _ => Err(FargoError::malformed(format!(
            "conflicting coordinate system options: {}",
            found
                .iter()
                .map(|s| s.option_name())
                .collect::<Vec<_>>()
                .join(", ")
        ))),
    }
}

/// Serializable digest of a grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridSummary {
    pub coordinate_system: CoordinateSystem,
    pub shape: [usize; 3],
    pub ghosts: [usize; 3],
    /// `(min, max)` of the active edges per axis.
    pub extent: [(f64, f64); 3],
}

impl From<&Grid> for GridSummary {
    fn from(grid: &Grid) -> Self {
        let extent = |a: Axis| {
            let edges = grid.domain(a).edges();
            (edges[0], edges[edges.len() - 1])
        };
        Self {
            coordinate_system: grid.system,
            shape: [grid.x.cells(), grid.y.cells(), grid.z.cells()],
            ghosts: [grid.x.ghosts(), grid.y.ghosts(), grid.z.ghosts()],
            extent: [extent(Axis::X), extent(Axis::Y), extent(Axis::Z)],
        }
    }
}
