//! Cell-edge domains read from `domain_x.dat`, `domain_y.dat` and `domain_z.dat`.

use std::path::Path;

use tracing::debug;

use crate::error::{FargoError, Result};

/// Cell edges along one axis.
///
/// The stored edges may include ghost cells on both sides. The ghost count is
/// inferred from the number of stored edges and the active cell count, so
/// `stored_edges().len() == cells() + 1 + 2 * ghosts()` always holds.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisDomain {
    stored: Vec<f64>,
    cells: usize,
    ghosts: usize,
}

impl AxisDomain {
    /// Build a domain from stored edges and the active cell count.
    pub fn new(stored: Vec<f64>, cells: usize) -> Result<Self> {
        if cells == 0 {
            return Err(FargoError::malformed("axis must have at least one cell"));
        }
        let needed = cells + 1;
        if stored.len() < needed || (stored.len() - needed) % 2 != 0 {
            return Err(FargoError::malformed(format!(
                "{} edges cannot describe {} cells plus a whole number of ghost cells per side",
                stored.len(),
                cells
            )));
        }
        let ghosts = (stored.len() - needed) / 2;
        Ok(Self { stored, cells, ghosts })
    }

    /// Read a domain file holding one edge coordinate per line.
    pub fn from_file(path: &Path, cells: usize) -> Result<Self> {
        if !path.is_file() {
            return Err(FargoError::not_found("domain file", path));
        }
        let text = std::fs::read_to_string(path)?;
        let edges = parse_edges(&text).map_err(|msg| {
            FargoError::malformed(format!("{}: {}", path.display(), msg))
        })?;
        let domain = Self::new(edges, cells).map_err(|e| match e {
            FargoError::MalformedMetadata(msg) => {
                FargoError::malformed(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })?;
        debug!(
            path = %path.display(),
            cells,
            ghosts = domain.ghosts,
            "read domain"
        );
        Ok(domain)
    }

    /// Number of active (non-ghost) cells.
    pub fn cells(&self) -> usize {
        self.cells
    }

    /// Ghost cells on each side.
    pub fn ghosts(&self) -> usize {
        self.ghosts
    }

    /// Edges as stored on disk, ghost cells included.
    pub fn stored_edges(&self) -> &[f64] {
        &self.stored
    }

    /// The `cells + 1` edges of the active cells.
    pub fn edges(&self) -> &[f64] {
        &self.stored[self.ghosts..self.stored.len() - self.ghosts]
    }

    /// Lower edge of each active cell.
    pub fn lower_edges(&self) -> &[f64] {
        &self.edges()[..self.cells]
    }

    /// Midpoint of each active cell.
    pub fn centers(&self) -> Vec<f64> {
        self.edges().windows(2).map(|w| 0.5 * (w[0] + w[1])).collect()
    }
}

fn parse_edges(text: &str) -> std::result::Result<Vec<f64>, String> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .map(|(i, line)| {
            line.parse::<f64>()
                .map_err(|_| format!("line {}: '{}' is not a number", i + 1, line))
        })
        .collect()
}
