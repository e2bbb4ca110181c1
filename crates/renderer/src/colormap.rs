//! Color maps for field plots.

use serde::{Deserialize, Serialize};

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    pub const fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    pub const fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

const VIRIDIS: [Color; 5] = [
    Color::rgb(68, 1, 84),
    Color::rgb(59, 82, 139),
    Color::rgb(33, 145, 140),
    Color::rgb(94, 201, 98),
    Color::rgb(253, 231, 37),
];

const INFERNO: [Color; 5] = [
    Color::rgb(0, 0, 4),
    Color::rgb(87, 16, 110),
    Color::rgb(188, 55, 84),
    Color::rgb(249, 142, 9),
    Color::rgb(252, 255, 164),
];

const GRAYSCALE: [Color; 2] = [Color::rgb(0, 0, 0), Color::rgb(255, 255, 255)];

// Deep purple through blue, cyan, green, yellow, orange, red to dark red
const TEMPERATURE: [Color; 8] = [
    Color::rgb(25, 0, 76),
    Color::rgb(0, 0, 255),
    Color::rgb(0, 255, 255),
    Color::rgb(0, 255, 0),
    Color::rgb(255, 255, 0),
    Color::rgb(255, 165, 0),
    Color::rgb(255, 0, 0),
    Color::rgb(139, 0, 0),
];

/// A continuous color map over the unit interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colormap {
    #[default]
    Viridis,
    Inferno,
    Grayscale,
    Temperature,
}

impl Colormap {
    fn stops(self) -> &'static [Color] {
        match self {
            Colormap::Viridis => &VIRIDIS,
            Colormap::Inferno => &INFERNO,
            Colormap::Grayscale => &GRAYSCALE,
            Colormap::Temperature => &TEMPERATURE,
        }
    }

    /// Map a normalized value to a color. `t` is clamped to `[0, 1]`.
    pub fn color(self, t: f64) -> Color {
        let stops = self.stops();
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let segments = (stops.len() - 1) as f64;
        let pos = t * segments;
        let lower = (pos.floor() as usize).min(stops.len() - 2);
        interpolate_color(stops[lower], stops[lower + 1], (pos - lower as f64) as f32)
    }
}

/// Linear color interpolation
pub fn interpolate_color(color1: Color, color2: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let t_inv = 1.0 - t;
    let mix = |a: u8, b: u8| (a as f32 * t_inv + b as f32 * t).round() as u8;

    Color::new(
        mix(color1.r, color2.r),
        mix(color1.g, color2.g),
        mix(color1.b, color2.b),
        mix(color1.a, color2.a),
    )
}

/// Linear scaling of data values onto `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Range of the finite values, or `None` if there are none.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut finite = values.iter().copied().filter(|v| v.is_finite());
        let first = finite.next()?;
        let (min, max) = finite.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
        Some(Self { min, max })
    }

    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span.abs() < f64::EPSILON {
            return 0.5;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }
}
