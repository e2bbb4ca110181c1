//! Rasterisation of quadrilateral meshes and polylines into RGBA images.
//!
//! Meshes are given as vertex coordinates of an `(rows + 1) x (cols + 1)`
//! lattice in row-major order, so both rectilinear and curvilinear (for
//! example polar grids drawn in Cartesian space) meshes are handled by the
//! same code path. Each cell is split into two triangles and filled with the
//! color of its value.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::colormap::{Color, Colormap, ValueRange};
use crate::error::{RenderError, RenderResult};
use crate::png::create_png_auto;

/// Rendering options shared by mesh and line plots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Image width in pixels, including the color bar.
    pub width: usize,
    /// Image height in pixels.
    pub height: usize,
    pub colormap: Colormap,
    /// Draw a vertical color bar on the right edge (mesh plots only).
    pub colorbar: bool,
    /// Fixed value range; defaults to the range of the finite data.
    pub value_range: Option<(f64, f64)>,
    pub background: Color,
    pub line_color: Color,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            colormap: Colormap::Viridis,
            colorbar: true,
            value_range: None,
            background: Color::white(),
            line_color: Color::rgb(31, 119, 180),
        }
    }
}

/// An RGBA image buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub width: usize,
    pub height: usize,
    /// RGBA pixel data (4 bytes per pixel), row-major from the top-left.
    pub pixels: Vec<u8>,
}

impl Image {
    pub fn new(width: usize, height: usize, background: Color) -> Self {
        let pixels = background.to_array().repeat(width * height);
        Self { width, height, pixels }
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 4;
        let px = &self.pixels[i..i + 4];
        Some(Color::new(px[0], px[1], px[2], px[3]))
    }

    pub fn set(&mut self, x: usize, y: usize, color: Color) {
        if x < self.width && y < self.height {
            let i = (y * self.width + x) * 4;
            self.pixels[i..i + 4].copy_from_slice(&color.to_array());
        }
    }

    pub fn to_png(&self) -> RenderResult<Vec<u8>> {
        create_png_auto(&self.pixels, self.width, self.height)
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        std::fs::write(path, self.to_png()?)?;
        Ok(())
    }
}

/// Vertex lattice of a quadrilateral mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    rows: usize,
    cols: usize,
    x: Vec<f64>,
    y: Vec<f64>,
}

impl Mesh {
    /// `x` and `y` hold `(rows + 1) * (cols + 1)` vertex coordinates, row-major.
    pub fn new(rows: usize, cols: usize, x: Vec<f64>, y: Vec<f64>) -> RenderResult<Self> {
        let expected = (rows + 1) * (cols + 1);
        if rows == 0 || cols == 0 || x.len() != expected || y.len() != expected {
            return Err(RenderError::InvalidDimensions(format!(
                "mesh of {}x{} cells needs {} vertices, got x={} y={}",
                rows,
                cols,
                expected,
                x.len(),
                y.len()
            )));
        }
        Ok(Self { rows, cols, x, y })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    fn vertex(&self, i: usize, j: usize) -> (f64, f64) {
        let idx = i * (self.cols + 1) + j;
        (self.x[idx], self.y[idx])
    }

    fn bounds(&self) -> Option<Bounds> {
        Bounds::of(&self.x, &self.y)
    }
}

#[derive(Debug, Clone, Copy)]
struct Bounds {
    x: ValueRange,
    y: ValueRange,
}

impl Bounds {
    fn of(xs: &[f64], ys: &[f64]) -> Option<Self> {
        Some(Self {
            x: ValueRange::from_values(xs)?,
            y: ValueRange::from_values(ys)?,
        })
    }
}

/// Maps data coordinates onto the pixel grid of the plot area.
struct Viewport {
    bounds: Bounds,
    width: usize,
    height: usize,
}

impl Viewport {
    fn to_pixel(&self, (x, y): (f64, f64)) -> (f64, f64) {
        let px = self.bounds.x.normalize(x) * (self.width - 1) as f64;
        let py = (1.0 - self.bounds.y.normalize(y)) * (self.height - 1) as f64;
        (px, py)
    }
}

/// Split the image width into plot area and color bar columns.
fn layout(opts: &RenderOptions, with_colorbar: bool) -> RenderResult<(usize, Option<usize>)> {
    if !with_colorbar {
        if opts.width < 2 || opts.height < 2 {
            return Err(RenderError::InvalidDimensions(format!(
                "image too small: {}x{}",
                opts.width, opts.height
            )));
        }
        return Ok((opts.width, None));
    }

    let bar = (opts.width / 16).max(4);
    let gap = bar / 2;
    let plot_width = opts.width.saturating_sub(bar + gap);
    if plot_width < 2 || opts.height < 2 {
        return Err(RenderError::InvalidDimensions(format!(
            "image too small for a color bar: {}x{}",
            opts.width, opts.height
        )));
    }
    Ok((plot_width, Some(plot_width + gap)))
}

fn value_range(values: &[f64], opts: &RenderOptions) -> RenderResult<ValueRange> {
    match opts.value_range {
        Some((min, max)) => Ok(ValueRange::new(min, max)),
        None => ValueRange::from_values(values).ok_or(RenderError::EmptyData),
    }
}

/// Fill every mesh cell with the color of its value.
///
/// `values` holds `rows * cols` entries, row-major. Non-finite values are
/// left transparent.
pub fn render_mesh(mesh: &Mesh, values: &[f64], opts: &RenderOptions) -> RenderResult<Image> {
    if values.len() != mesh.rows * mesh.cols {
        return Err(RenderError::InvalidDimensions(format!(
            "mesh has {} cells but {} values were given",
            mesh.rows * mesh.cols,
            values.len()
        )));
    }

    let range = value_range(values, opts)?;
    let bounds = mesh.bounds().ok_or(RenderError::EmptyData)?;
    let (plot_width, bar_start) = layout(opts, opts.colorbar)?;
    let viewport = Viewport {
        bounds,
        width: plot_width,
        height: opts.height,
    };

    let mut image = Image::new(opts.width, opts.height, opts.background);

    for i in 0..mesh.rows {
        for j in 0..mesh.cols {
            let value = values[i * mesh.cols + j];
            let color = if value.is_finite() {
                opts.colormap.color(range.normalize(value))
            } else {
                Color::transparent()
            };

            let v00 = viewport.to_pixel(mesh.vertex(i, j));
            let v10 = viewport.to_pixel(mesh.vertex(i + 1, j));
            let v11 = viewport.to_pixel(mesh.vertex(i + 1, j + 1));
            let v01 = viewport.to_pixel(mesh.vertex(i, j + 1));

            fill_triangle(&mut image, plot_width, [v00, v10, v11], color);
            fill_triangle(&mut image, plot_width, [v00, v11, v01], color);
        }
    }

    if let Some(start) = bar_start {
        draw_colorbar(&mut image, start, opts.colormap);
    }

    debug!(
        rows = mesh.rows,
        cols = mesh.cols,
        width = opts.width,
        height = opts.height,
        "Rendered mesh"
    );
    Ok(image)
}

fn edge(a: (f64, f64), b: (f64, f64), p: (f64, f64)) -> f64 {
    (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0)
}

fn fill_triangle(image: &mut Image, max_x: usize, tri: [(f64, f64); 3], color: Color) {
    const EPS: f64 = 1e-9;
    let [a, b, c] = tri;
    if edge(a, b, c).abs() < EPS {
        return;
    }

    let min_x = a.0.min(b.0).min(c.0).floor().max(0.0) as usize;
    let min_y = a.1.min(b.1).min(c.1).floor().max(0.0) as usize;
    let max_px = (a.0.max(b.0).max(c.0).ceil() as usize).min(max_x - 1);
    let max_py = (a.1.max(b.1).max(c.1).ceil() as usize).min(image.height - 1);

    for py in min_y..=max_py {
        for px in min_x..=max_px {
            let p = (px as f64, py as f64);
            let w0 = edge(b, c, p);
            let w1 = edge(c, a, p);
            let w2 = edge(a, b, p);
            let inside = (w0 >= -EPS && w1 >= -EPS && w2 >= -EPS)
                || (w0 <= EPS && w1 <= EPS && w2 <= EPS);
            if inside {
                image.set(px, py, color);
            }
        }
    }
}

fn draw_colorbar(image: &mut Image, start: usize, colormap: Colormap) {
    let span = (image.height - 1) as f64;
    for py in 0..image.height {
        let color = colormap.color(1.0 - py as f64 / span);
        for px in start..image.width {
            image.set(px, py, color);
        }
    }
}

/// Draw `ys` against `xs` as a polyline. Pairs with a non-finite coordinate
/// break the line.
pub fn render_line(xs: &[f64], ys: &[f64], opts: &RenderOptions) -> RenderResult<Image> {
    if xs.len() != ys.len() || xs.is_empty() {
        return Err(RenderError::InvalidDimensions(format!(
            "line needs matching non-empty coordinates, got x={} y={}",
            xs.len(),
            ys.len()
        )));
    }

    let points: Vec<Option<(f64, f64)>> = xs
        .iter()
        .zip(ys)
        .map(|(&x, &y)| (x.is_finite() && y.is_finite()).then_some((x, y)))
        .collect();
    let finite: Vec<(f64, f64)> = points.iter().flatten().copied().collect();
    if finite.is_empty() {
        return Err(RenderError::EmptyData);
    }

    let (fx, fy): (Vec<f64>, Vec<f64>) = finite.iter().copied().unzip();
    let y_range = match opts.value_range {
        Some((min, max)) => ValueRange::new(min, max),
        None => ValueRange::from_values(&fy).ok_or(RenderError::EmptyData)?,
    };
    let x_range = ValueRange::from_values(&fx).ok_or(RenderError::EmptyData)?;

    let (plot_width, _) = layout(opts, false)?;
    let viewport = Viewport {
        bounds: Bounds { x: x_range, y: y_range },
        width: plot_width,
        height: opts.height,
    };

    let mut image = Image::new(opts.width, opts.height, opts.background);
    let mut previous: Option<(f64, f64)> = None;
    for point in points {
        match point {
            Some(p) => {
                let current = viewport.to_pixel(p);
                match previous {
                    Some(prev) => draw_segment(&mut image, prev, current, opts.line_color),
                    None => image.set(current.0.round() as usize, current.1.round() as usize, opts.line_color),
                }
                previous = Some(current);
            }
            None => previous = None,
        }
    }

    Ok(image)
}

/// Bresenham segment between two pixel positions.
fn draw_segment(image: &mut Image, from: (f64, f64), to: (f64, f64), color: Color) {
    let (mut x0, mut y0) = (from.0.round() as i64, from.1.round() as i64);
    let (x1, y1) = (to.0.round() as i64, to.1.round() as i64);
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if x0 >= 0 && y0 >= 0 {
            image.set(x0 as usize, y0 as usize, color);
        }
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_opts(colorbar: bool) -> RenderOptions {
        RenderOptions {
            width: 20,
            height: 10,
            colorbar,
            ..Default::default()
        }
    }

    #[test]
    fn test_mesh_vertex_count_checked() {
        assert!(Mesh::new(2, 2, vec![0.0; 9], vec![0.0; 9]).is_ok());
        assert!(Mesh::new(2, 2, vec![0.0; 8], vec![0.0; 9]).is_err());
        assert!(Mesh::new(0, 2, vec![], vec![]).is_err());
    }

    #[test]
    fn test_layout_reserves_colorbar() {
        let (plot, bar) = layout(&small_opts(true), true).unwrap();
        assert_eq!(plot, 14);
        assert_eq!(bar, Some(16));
        assert_eq!(layout(&small_opts(false), false).unwrap(), (20, None));
    }

    #[test]
    fn test_fill_triangle_covers_interior() {
        let mut image = Image::new(10, 10, Color::white());
        fill_triangle(&mut image, 10, [(0.0, 0.0), (9.0, 0.0), (0.0, 9.0)], Color::black());
        assert_eq!(image.get(1, 1), Some(Color::black()));
        assert_eq!(image.get(9, 9), Some(Color::white()));
    }

    #[test]
    fn test_draw_segment_endpoints() {
        let mut image = Image::new(5, 5, Color::white());
        draw_segment(&mut image, (0.0, 0.0), (4.0, 4.0), Color::black());
        for i in 0..5 {
            assert_eq!(image.get(i, i), Some(Color::black()));
        }
        assert_eq!(image.get(4, 0), Some(Color::white()));
    }
}
