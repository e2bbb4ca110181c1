//! A FARGO3D output directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::axis::{Axis, CoordinateSystem};
use crate::config::{ByteOrder, Precision, ReaderConfig};
use crate::domain::AxisDomain;
use crate::error::{FargoError, Result};
use crate::field::Field;
use crate::grid::{coordinate_system_from_options, Grid, GridSummary};
use crate::quantity::Quantity;
use crate::summary::{parse_options, OptionValue, Options};
use crate::variables::{parse_variables, Variables};

/// Metadata of a simulation run, parsed when the directory is opened.
///
/// Fields are loaded on request with [`Output::get_field`]; nothing is cached.
#[derive(Debug, Clone)]
pub struct Output {
    directory: PathBuf,
    opts: Options,
    vars: Variables,
    grid: Arc<Grid>,
    precision: Precision,
    byte_order: ByteOrder,
}

impl Output {
    /// Open a run directory with the default reader configuration.
    pub fn open(directory: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(directory, &ReaderConfig::default())
    }

    /// Open a run directory.
    pub fn open_with_config(directory: impl AsRef<Path>, config: &ReaderConfig) -> Result<Self> {
        config.validate()?;
        let directory = directory.as_ref().to_path_buf();
        if !directory.is_dir() {
            return Err(FargoError::not_found("run directory", directory));
        }

        let vars = parse_variables(&read_text(&directory, &config.variables_file, "variables file")?);
        let nx = cell_count(&vars, "NX")?;
        let ny = cell_count(&vars, "NY")?;
        let nz = cell_count(&vars, "NZ")?;

        let opts = parse_options(&read_text(&directory, &config.summary_file, "summary file")?);
        let system = match coordinate_system_from_options(&opts)? {
            Some(system) => system,
            None => {
                warn!("no coordinate system option found, assuming cartesian");
                CoordinateSystem::Cartesian
            }
        };

        let grid = Grid::new(
            AxisDomain::from_file(&directory.join("domain_x.dat"), nx)?,
            AxisDomain::from_file(&directory.join("domain_y.dat"), ny)?,
            AxisDomain::from_file(&directory.join("domain_z.dat"), nz)?,
            system,
        );

        let precision = config.precision.unwrap_or(if opts.contains_key("FLOAT") {
            Precision::Single
        } else {
            Precision::Double
        });

        info!(
            directory = %directory.display(),
            nx,
            ny,
            nz,
            coordinate_system = %system,
            ?precision,
            "opened run"
        );

        Ok(Self {
            directory,
            opts,
            vars,
            grid: Arc::new(grid),
            precision,
            byte_order: config.byte_order,
        })
    }

    // ========================================================================
    // Options and variables
    // ========================================================================

    /// Compile option by name, without the `-D` prefix.
    pub fn get_opt(&self, name: &str) -> Result<&OptionValue> {
        self.opts
            .get(name)
            .ok_or_else(|| FargoError::OptionNotFound(name.to_string()))
    }

    /// True if the run was compiled with option `name`.
    pub fn has_opt(&self, name: &str) -> bool {
        self.opts.contains_key(name)
    }

    /// Run variable by name, as written in the variables file.
    pub fn get_var(&self, name: &str) -> Result<&str> {
        self.vars
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| FargoError::VariableNotFound(name.to_string()))
    }

    /// Run variable parsed into `T`.
    pub fn get_var_as<T: FromStr>(&self, name: &str) -> Result<T> {
        let value = self.get_var(name)?;
        value.parse().map_err(|_| {
            FargoError::malformed(format!(
                "variable {} = '{}' is not a valid {}",
                name,
                value,
                std::any::type_name::<T>()
            ))
        })
    }

    pub fn opts(&self) -> &Options {
        &self.opts
    }

    pub fn vars(&self) -> &Variables {
        &self.vars
    }

    // ========================================================================
    // Fields
    // ========================================================================

    /// Load the field named by its file prefix, e.g. `gasdens` or `gasvy`.
    pub fn get_field(&self, name: &str, num: usize) -> Result<Field> {
        let quantity: Quantity = name.parse()?;
        Field::new(self, quantity, num)
    }

    /// Output numbers with a snapshot file for `quantity`, ascending.
    pub fn snapshots(&self, quantity: Quantity) -> Result<Vec<usize>> {
        Ok(self.scan_snapshots()?.remove(&quantity).unwrap_or_default())
    }

    /// Quantities with at least one snapshot file.
    pub fn available_quantities(&self) -> Result<Vec<Quantity>> {
        Ok(self.scan_snapshots()?.into_keys().collect())
    }

    fn scan_snapshots(&self) -> Result<BTreeMap<Quantity, Vec<usize>>> {
        let mut found: BTreeMap<Quantity, Vec<usize>> = BTreeMap::new();
        for entry in std::fs::read_dir(&self.directory)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name();
            if let Some((quantity, num)) = name.to_str().and_then(Quantity::parse_file_name) {
                found.entry(quantity).or_default().push(num);
            }
        }
        for nums in found.values_mut() {
            nums.sort_unstable();
        }
        debug!(quantities = found.len(), "scanned snapshots");
        Ok(found)
    }

    /// Serializable digest of the run.
    pub fn summary(&self) -> Result<RunSummary> {
        let snapshots = self
            .scan_snapshots()?
            .into_iter()
            .map(|(q, nums)| (q.prefix().to_string(), nums))
            .collect();
        Ok(RunSummary {
            directory: self.directory.clone(),
            grid: GridSummary::from(self.grid.as_ref()),
            precision: self.precision,
            options: self.opts.clone(),
            variables: self.vars.clone(),
            snapshots,
        })
    }

    // ========================================================================
    // Grid
    // ========================================================================

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub(crate) fn grid_arc(&self) -> Arc<Grid> {
        Arc::clone(&self.grid)
    }

    pub fn coordinate_system(&self) -> CoordinateSystem {
        self.grid.coordinate_system()
    }

    /// Snapshot precision in use.
    pub fn precision(&self) -> Precision {
        self.precision
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    pub fn nx(&self) -> usize {
        self.grid.domain(Axis::X).cells()
    }

    pub fn ny(&self) -> usize {
        self.grid.domain(Axis::Y).cells()
    }

    pub fn nz(&self) -> usize {
        self.grid.domain(Axis::Z).cells()
    }

    pub fn nghx(&self) -> usize {
        self.grid.domain(Axis::X).ghosts()
    }

    pub fn nghy(&self) -> usize {
        self.grid.domain(Axis::Y).ghosts()
    }

    pub fn nghz(&self) -> usize {
        self.grid.domain(Axis::Z).ghosts()
    }

    /// Stored x edges, ghost cells included.
    pub fn domain_x(&self) -> &[f64] {
        self.grid.domain(Axis::X).stored_edges()
    }

    /// Stored y edges, ghost cells included.
    pub fn domain_y(&self) -> &[f64] {
        self.grid.domain(Axis::Y).stored_edges()
    }

    /// Stored z edges, ghost cells included.
    pub fn domain_z(&self) -> &[f64] {
        self.grid.domain(Axis::Z).stored_edges()
    }

    /// Active x edges.
    pub fn xdomain(&self) -> &[f64] {
        self.grid.domain(Axis::X).edges()
    }

    /// Active y edges.
    pub fn ydomain(&self) -> &[f64] {
        self.grid.domain(Axis::Y).edges()
    }

    /// Active z edges.
    pub fn zdomain(&self) -> &[f64] {
        self.grid.domain(Axis::Z).edges()
    }

    /// True if any domain file stores ghost cells.
    pub fn includes_ghosts(&self) -> bool {
        self.grid.includes_ghosts()
    }
}

/// Serializable description of a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub directory: PathBuf,
    pub grid: GridSummary,
    pub precision: Precision,
    pub options: Options,
    pub variables: Variables,
    /// Output numbers per quantity prefix.
    pub snapshots: IndexMap<String, Vec<usize>>,
}

fn read_text(directory: &Path, name: &str, what: &'static str) -> Result<String> {
    let path = directory.join(name);
    if !path.is_file() {
        return Err(FargoError::not_found(what, path));
    }
    debug!(path = %path.display(), "reading {}", what);
    // Undecodable bytes become U+FFFD; the line parsers skip what they cannot use.
    let bytes = std::fs::read(&path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn cell_count(vars: &Variables, key: &str) -> Result<usize> {
    let value = vars
        .get(key)
        .ok_or_else(|| FargoError::malformed(format!("required variable {} is missing", key)))?;
    match value.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(FargoError::malformed(format!(
            "{} must be a positive integer, got '{}'",
            key, value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_count() {
        let vars = parse_variables("NX 128\nNY 0\nNZ abc\n");
        assert_eq!(cell_count(&vars, "NX").unwrap(), 128);
        assert!(cell_count(&vars, "NY").is_err());
        assert!(cell_count(&vars, "NZ").is_err());
        let err = cell_count(&vars, "NW").unwrap_err();
        assert!(matches!(err, FargoError::MalformedMetadata(_)));
    }

    #[test]
    fn test_open_missing_directory() {
        let err = Output::open("/nonexistent/fargo/run").unwrap_err();
        assert!(err.is_not_found());
    }
}
