//! Reader for FARGO3D simulation output.
//!
//! A run directory holds the run parameters (`variables.par`), the compile
//! options (`summary0.dat`), the cell edges of each axis (`domain_x.dat`,
//! `domain_y.dat`, `domain_z.dat`) and one raw binary file per quantity and
//! output number (`gasdens10.dat`, `gasvy10.dat`, ...).
//!
//! [`Output::open`] parses the metadata once; [`Output::get_field`] then loads
//! snapshots as [`Field`]s shaped onto the grid:
//!
//! ```no_run
//! use fargonaut::Output;
//!
//! let output = Output::open("outputs/fargo")?;
//! let dens = output.get_field("gasdens", 50)?;
//! assert_eq!(dens.data().shape(), &[output.nx(), output.ny(), output.nz()]);
//! # Ok::<(), fargonaut::FargoError>(())
//! ```
//!
//! # Grid layout
//!
//! Values are stored with x varying fastest. Curvilinear runs keep azimuth on
//! x: cylindrical grids are `(φ, r, z)` and spherical grids `(φ, r, θ)`.
//! Domain files may include ghost cells; their count per side is inferred from
//! the number of stored edges.

pub mod axis;
pub mod config;
pub mod domain;
pub mod error;
pub mod field;
pub mod grid;
pub mod output;
pub mod plot;
pub mod quantity;
pub mod snapshot;
pub mod summary;
pub mod variables;

pub use axis::{Axis, CoordinateSystem};
pub use config::{ByteOrder, Precision, ReaderConfig};
pub use domain::AxisDomain;
pub use error::{FargoError, Result};
pub use field::Field;
pub use grid::{Grid, GridSummary};
pub use output::{Output, RunSummary};
pub use plot::{Figure, Labels, Plane, PlotData1D, PlotData2D, PlotOptions, Selection, View};
pub use quantity::Quantity;
pub use summary::{OptionValue, Options};
pub use variables::Variables;
