//! Test data generators for synthetic FARGO3D runs.
//!
//! These generators create predictable, verifiable data patterns that can be
//! used across the test suite.

/// Creates field values with a predictable pattern.
///
/// Each cell value is `i + 100 * j + 10000 * k`, stored in FARGO3D file
/// order (x fastest, then y, then z). A value read back at `(i, j, k)` can
/// therefore be checked without knowing the layout.
///
/// Values are unique only while `nx <= 100` and `ny <= 100`; larger grids
/// panic rather than produce colliding cells.
///
/// # Example
///
/// ```
/// use test_utils::create_test_field;
///
/// let raw = create_test_field(4, 3, 2);
/// assert_eq!(raw.len(), 24);
/// assert_eq!(raw[1], 1.0);       // (1, 0, 0)
/// assert_eq!(raw[4], 100.0);     // (0, 1, 0)
/// assert_eq!(raw[12], 10000.0);  // (0, 0, 1)
/// ```
pub fn create_test_field(nx: usize, ny: usize, nz: usize) -> Vec<f64> {
    assert!(
        nx <= 100 && ny <= 100,
        "create_test_field supports at most 100 cells in x and y, got {}x{}",
        nx,
        ny
    );
    let mut data = Vec::with_capacity(nx * ny * nz);
    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                data.push(test_value(i, j, k));
            }
        }
    }
    data
}

/// Expected value of [`create_test_field`] at cell `(i, j, k)`.
///
/// Only meaningful for `i < 100` and `j < 100`.
pub fn test_value(i: usize, j: usize, k: usize) -> f64 {
    (i + 100 * j + 10000 * k) as f64
}

/// Creates uniformly spaced cell edges over `[min, max]` for `cells` active
/// cells, padded with `ghosts` cells of the same width on each side.
///
/// Returns `cells + 1 + 2 * ghosts` values.
pub fn uniform_edges(min: f64, max: f64, cells: usize, ghosts: usize) -> Vec<f64> {
    let width = (max - min) / cells.max(1) as f64;
    (0..cells + 1 + 2 * ghosts)
        .map(|i| min + (i as f64 - ghosts as f64) * width)
        .collect()
}

/// Creates a disc-like surface density profile `Σ ∝ r^-1/2`.
///
/// Values depend only on the radial index `j`; `r` holds the `ny` radii.
pub fn create_density_profile(nx: usize, r: &[f64], nz: usize) -> Vec<f64> {
    let mut data = Vec::with_capacity(nx * r.len() * nz);
    for _k in 0..nz {
        for &radius in r {
            for _i in 0..nx {
                data.push(radius.powf(-0.5));
            }
        }
    }
    data
}
