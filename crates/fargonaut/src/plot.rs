//! Plot preparation and rendering for fields.
//!
//! Plot data is computed exactly: 2D slices come with vertex meshes built
//! from the active cell edges, 1D lines with the field coordinates along the
//! line. Curvilinear grids can be drawn in their native coordinates
//! ([`View::Polar`]) or projected onto Cartesian axes ([`View::Cartesian`]).
//! Rendering goes through the `renderer` crate and produces an image without
//! text; axis and colour bar labels are returned alongside it.

use std::path::{Path, PathBuf};

use ndarray::{s, Array1, Array2, ArrayView1, Axis as NdAxis};
use renderer::{render_line, render_mesh, Colormap, Image, Mesh, RenderOptions};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::axis::{Axis, CoordinateSystem};
use crate::error::{FargoError, Result};
use crate::field::Field;

/// How a grid is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    /// Native grid coordinates (φ, r, z or φ, r, θ).
    #[default]
    Polar,
    /// Projected onto Cartesian x, y, z.
    Cartesian,
}

impl View {
    /// The view a grid is drawn in when none is requested.
    pub fn native(system: CoordinateSystem) -> Self {
        match system {
            CoordinateSystem::Cartesian => View::Cartesian,
            CoordinateSystem::Cylindrical | CoordinateSystem::Spherical => View::Polar,
        }
    }
}

/// A plane spanned by two grid axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plane {
    XY,
    XZ,
    YZ,
}

impl Plane {
    /// `(horizontal, vertical, normal)` axes.
    pub fn axes(&self) -> (Axis, Axis, Axis) {
        match self {
            Plane::XY => (Axis::X, Axis::Y, Axis::Z),
            Plane::XZ => (Axis::X, Axis::Z, Axis::Y),
            Plane::YZ => (Axis::Y, Axis::Z, Axis::X),
        }
    }
}

/// Part of a field to plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Selection {
    /// Slice through `plane` at cell `index` along the plane normal.
    Plane { plane: Plane, index: usize },
    /// Line along `axis` at cell indices of the other two axes, in x, y, z order.
    Line { axis: Axis, index: (usize, usize) },
}

/// Axis and colour bar labels.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Labels {
    pub x: String,
    pub y: String,
    /// Colour bar label; `None` for line plots.
    pub c: Option<String>,
}

/// A 2D slice ready for a colour mesh plot.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotData2D {
    /// Vertex x positions, `(na + 1, nb + 1)`.
    pub x: Array2<f64>,
    /// Vertex y positions, `(na + 1, nb + 1)`.
    pub y: Array2<f64>,
    /// Cell values, `(na, nb)`.
    pub c: Array2<f64>,
    pub labels: Labels,
}

/// A 1D line ready for a line plot.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotData1D {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub labels: Labels,
}

/// Options for [`Field::plot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotOptions {
    /// Defaults to [`View::native`] for the field's coordinate system.
    pub view: Option<View>,
    pub width: usize,
    pub height: usize,
    pub colorbar: bool,
    pub colormap: Colormap,
    /// Fixed colour range; defaults to the data range.
    pub value_range: Option<(f64, f64)>,
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    pub clabel: Option<String>,
    /// Write the rendered PNG here.
    pub output: Option<PathBuf>,
}

impl Default for PlotOptions {
    fn default() -> Self {
        let render = RenderOptions::default();
        Self {
            view: None,
            width: render.width,
            height: render.height,
            colorbar: render.colorbar,
            colormap: render.colormap,
            value_range: None,
            xlabel: None,
            ylabel: None,
            clabel: None,
            output: None,
        }
    }
}

impl PlotOptions {
    fn render_options(&self) -> RenderOptions {
        RenderOptions {
            width: self.width,
            height: self.height,
            colormap: self.colormap,
            colorbar: self.colorbar,
            value_range: self.value_range,
            ..Default::default()
        }
    }

    fn apply_labels(&self, labels: &mut Labels) {
        if let Some(x) = &self.xlabel {
            labels.x = x.clone();
        }
        if let Some(y) = &self.ylabel {
            labels.y = y.clone();
        }
        if let (Some(c), Some(label)) = (&self.clabel, labels.c.as_mut()) {
            *label = c.clone();
        }
    }
}

/// A rendered plot.
#[derive(Debug, Clone)]
pub struct Figure {
    pub image: Image,
    pub labels: Labels,
    pub selection: Selection,
}

impl Figure {
    /// Encode the image as PNG.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        Ok(self.image.to_png()?)
    }

    /// Write the image as a PNG file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.image.save_png(path)?;
        Ok(())
    }
}

impl Field {
    /// Slice through `plane` at cell `index` along the plane normal.
    pub fn plot_data_2d(&self, view: View, plane: Plane, index: usize) -> Result<PlotData2D> {
        let system = self.coordinate_system();
        let (a, b, normal) = plane.axes();
        let grid = self.grid();

        let n_normal = grid.domain(normal).cells();
        if index >= n_normal {
            return Err(FargoError::invalid_argument(format!(
                "{} index {} out of range for {} cells",
                normal, index, n_normal
            )));
        }
        check_view(system, view)?;

        let ea = grid.domain(a).edges();
        let eb = grid.domain(b).edges();
        let fixed = grid.domain(normal).edges()[index];

        let ga = Array2::from_shape_fn((ea.len(), eb.len()), |(i, _)| ea[i]);
        let gb = Array2::from_shape_fn((ea.len(), eb.len()), |(_, j)| eb[j]);
        let c = self
            .data()
            .index_axis(NdAxis(normal.index()), index)
            .to_owned();

        let (x, y) = match (view, system) {
            (View::Cartesian, CoordinateSystem::Cylindrical) => match plane {
                // (φ, r)
                Plane::XY => (
                    zip_map(&ga, &gb, |phi, r| r * phi.cos()),
                    zip_map(&ga, &gb, |phi, r| r * phi.sin()),
                ),
                // (φ, z) at fixed r
                Plane::XZ => (ga.mapv(|phi| fixed * phi.cos()), gb),
                // (r, z) at fixed φ
                Plane::YZ => (ga.mapv(|r| r * fixed.sin()), gb),
            },
            (View::Cartesian, CoordinateSystem::Spherical) => match plane {
                // (φ, r) at fixed θ
                Plane::XY => (
                    zip_map(&ga, &gb, |phi, r| r * phi.cos() * fixed.sin()),
                    zip_map(&ga, &gb, |phi, r| r * phi.sin() * fixed.sin()),
                ),
                // (φ, θ) at fixed r
                Plane::XZ => (
                    zip_map(&ga, &gb, |phi, theta| fixed * phi.cos() * theta.sin()),
                    gb.mapv(|theta| fixed * theta.cos()),
                ),
                // (r, θ) at fixed φ
                Plane::YZ => (
                    zip_map(&ga, &gb, |r, theta| r * fixed.sin() * theta.sin()),
                    zip_map(&ga, &gb, |r, theta| r * theta.cos()),
                ),
            },
            _ => (ga, gb),
        };

        Ok(PlotData2D {
            x,
            y,
            c,
            labels: Labels {
                x: view_label(system, view, a),
                y: view_label(system, view, b),
                c: Some(self.quantity().label(system)),
            },
        })
    }

    /// Line along `axis` at cell indices `(a, b)` of the other two axes.
    pub fn plot_data_1d(&self, view: View, axis: Axis, index: (usize, usize)) -> Result<PlotData1D> {
        let system = self.coordinate_system();
        let (p, q) = axis.others();
        let (ia, ib) = index;

        for (other, i) in [(p, ia), (q, ib)] {
            let n = self.coords(other).len();
            if i >= n {
                return Err(FargoError::invalid_argument(format!(
                    "{} index {} out of range for {} cells",
                    other, i, n
                )));
            }
        }
        check_view(system, view)?;

        let values: ArrayView1<f64> = match axis {
            Axis::X => self.data().slice(s![.., ia, ib]),
            Axis::Y => self.data().slice(s![ia, .., ib]),
            Axis::Z => self.data().slice(s![ia, ib, ..]),
        };
        let t = Array1::from(self.coords(axis).to_vec());

        let x = match (view, system, axis) {
            (View::Cartesian, CoordinateSystem::Cylindrical, Axis::X) => {
                let r = self.y()[ia];
                t.mapv(|phi| r * phi.cos())
            }
            (View::Cartesian, CoordinateSystem::Cylindrical, Axis::Y) => {
                let phi = self.x()[ia];
                t.mapv(|r| r * phi.sin())
            }
            (View::Cartesian, CoordinateSystem::Spherical, Axis::X) => {
                let (r, theta) = (self.y()[ia], self.z()[ib]);
                t.mapv(|phi| r * phi.cos() * theta.sin())
            }
            (View::Cartesian, CoordinateSystem::Spherical, Axis::Y) => {
                let (phi, theta) = (self.x()[ia], self.z()[ib]);
                t.mapv(|r| r * phi.sin() * theta.sin())
            }
            (View::Cartesian, CoordinateSystem::Spherical, Axis::Z) => {
                let r = self.y()[ib];
                t.mapv(|theta| r * theta.cos())
            }
            _ => t,
        };

        Ok(PlotData1D {
            x: x.to_vec(),
            y: values.to_vec(),
            labels: Labels {
                x: view_label(system, view, axis),
                y: self.quantity().label(system),
                c: None,
            },
        })
    }

    /// Prepare and render a plot of `selection`.
    pub fn plot(&self, selection: Selection, options: &PlotOptions) -> Result<Figure> {
        let render = options.render_options();
        let view = options
            .view
            .unwrap_or_else(|| View::native(self.coordinate_system()));

        let (image, mut labels) = match selection {
            Selection::Plane { plane, index } => {
                let data = self.plot_data_2d(view, plane, index)?;
                let (rows, cols) = data.c.dim();
                let mesh = Mesh::new(
                    rows,
                    cols,
                    data.x.iter().copied().collect(),
                    data.y.iter().copied().collect(),
                )?;
                let values: Vec<f64> = data.c.iter().copied().collect();
                (render_mesh(&mesh, &values, &render)?, data.labels)
            }
            Selection::Line { axis, index } => {
                let data = self.plot_data_1d(view, axis, index)?;
                (render_line(&data.x, &data.y, &render)?, data.labels)
            }
        };
        options.apply_labels(&mut labels);

        let figure = Figure {
            image,
            labels,
            selection,
        };

        if let Some(path) = &options.output {
            figure.save(path)?;
            info!(
                path = %path.display(),
                quantity = %self.quantity(),
                num = self.num(),
                "saved plot"
            );
        }

        Ok(figure)
    }
}

fn check_view(system: CoordinateSystem, view: View) -> Result<()> {
    if system == CoordinateSystem::Cartesian && view == View::Polar {
        return Err(FargoError::UnsupportedView(
            "polar view of a cartesian grid".to_string(),
        ));
    }
    Ok(())
}

fn view_label(system: CoordinateSystem, view: View, axis: Axis) -> String {
    match view {
        View::Polar => system.axis_label(axis).to_string(),
        View::Cartesian => axis.as_str().to_string(),
    }
}

fn zip_map(a: &Array2<f64>, b: &Array2<f64>, f: impl Fn(f64, f64) -> f64) -> Array2<f64> {
    ndarray::Zip::from(a).and(b).map_collect(|&u, &v| f(u, v))
}
