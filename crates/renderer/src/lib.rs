//! Image rendering for field plots.
//!
//! Implements:
//! - Color maps with linear interpolation between stops
//! - Quadrilateral mesh fill (rectilinear or curvilinear meshes)
//! - Polyline plots
//! - PNG encoding (indexed or RGBA)

pub mod colormap;
pub mod error;
pub mod png;
pub mod raster;

pub use colormap::{Color, Colormap, ValueRange};
pub use error::{RenderError, RenderResult};
pub use raster::{render_line, render_mesh, Image, Mesh, RenderOptions};
