//! A single snapshot of one quantity, shaped onto the grid.

use std::sync::Arc;

use ndarray::{Array3, ShapeBuilder};
use tracing::debug;

use crate::axis::{Axis, CoordinateSystem};
use crate::error::{FargoError, Result};
use crate::grid::Grid;
use crate::output::Output;
use crate::quantity::Quantity;
use crate::snapshot;

/// Field values of one quantity at one output time.
///
/// `data[[i, j, k]]` is the value of cell `(i, j, k)`; the backing storage is
/// the snapshot in file order (x fastest), so
/// `data().as_slice_memory_order() == Some(raw())`.
#[derive(Debug, Clone)]
pub struct Field {
    grid: Arc<Grid>,
    quantity: Quantity,
    num: usize,
    raw: Vec<f64>,
    data: Array3<f64>,
    x: Vec<f64>,
    y: Vec<f64>,
    z: Vec<f64>,
}

impl Field {
    /// Load `quantity` at output number `num` from a run.
    pub fn new(output: &Output, quantity: Quantity, num: usize) -> Result<Self> {
        let path = output.directory().join(quantity.file_name(num));
        let grid = output.grid_arc();
        let raw = snapshot::read(&path, output.precision(), output.byte_order(), grid.len())?;
        let field = Self::from_raw(grid, quantity, num, raw)?;
        debug!(quantity = %quantity, num, shape = ?field.data.shape(), "loaded field");
        Ok(field)
    }

    /// Gas density at output `num`.
    pub fn density(output: &Output, num: usize) -> Result<Self> {
        Self::new(output, Quantity::Density, num)
    }

    /// Gas energy at output `num`.
    pub fn energy(output: &Output, num: usize) -> Result<Self> {
        Self::new(output, Quantity::Energy, num)
    }

    /// Gas velocity component along `axis` at output `num`.
    pub fn velocity(output: &Output, axis: Axis, num: usize) -> Result<Self> {
        Self::new(output, Quantity::Velocity(axis), num)
    }

    /// Magnetic field component along `axis` at output `num`.
    pub fn magnetic_field(output: &Output, axis: Axis, num: usize) -> Result<Self> {
        Self::new(output, Quantity::MagneticField(axis), num)
    }

    /// Build a field from values already in memory, in file order.
    pub fn from_raw(grid: Arc<Grid>, quantity: Quantity, num: usize, raw: Vec<f64>) -> Result<Self> {
        let (nx, ny, nz) = grid.shape();
        if raw.len() != grid.len() {
            return Err(FargoError::ShapeMismatch {
                context: quantity.file_name(num),
                expected: grid.len(),
                actual: raw.len(),
            });
        }

        let data = Array3::from_shape_vec((nx, ny, nz).f(), raw.clone()).map_err(|e| {
            FargoError::ShapeMismatch {
                context: format!("{}: {}", quantity.file_name(num), e),
                expected: grid.len(),
                actual: raw.len(),
            }
        })?;

        let coords = |axis: Axis| {
            let domain = grid.domain(axis);
            if quantity.staggered_axis() == Some(axis) {
                domain.lower_edges().to_vec()
            } else {
                domain.centers()
            }
        };
        let (x, y, z) = (coords(Axis::X), coords(Axis::Y), coords(Axis::Z));

        Ok(Self {
            grid,
            quantity,
            num,
            raw,
            data,
            x,
            y,
            z,
        })
    }

    /// Values exactly as stored in the snapshot file.
    pub fn raw(&self) -> &[f64] {
        &self.raw
    }

    /// Values shaped `(nx, ny, nz)`.
    pub fn data(&self) -> &Array3<f64> {
        &self.data
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn z(&self) -> &[f64] {
        &self.z
    }

    /// Coordinates of the values along `axis`.
    pub fn coords(&self, axis: Axis) -> &[f64] {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn num(&self) -> usize {
        self.num
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn coordinate_system(&self) -> CoordinateSystem {
        self.grid.coordinate_system()
    }
}
