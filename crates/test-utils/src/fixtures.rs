//! Common test fixtures for fargonaut tests.
//!
//! [`RunDirBuilder`] writes a complete, throwaway FARGO3D run directory:
//! variables file, summary file, domain files and snapshots.

use std::f64::consts::PI;
use std::path::Path;

use tempfile::TempDir;

use crate::generators::uniform_edges;

/// Metadata file contents as FARGO3D writes them.
pub mod text {
    /// Summary with the options of a 2D isothermal cylindrical disc.
    pub const SUMMARY_CYLINDRICAL: &str = "==============================\n\
        SUMMARY:\n\
        ==============================\n\
        COMPILATION OPTION SECTION:\n\
        ==============================\n\
        -DX -DY -DISOTHERMAL -DCYLINDRICAL\n\
        Ghost (Nghx, Nghy, Nghz): 0, 3, 0\n";

    /// Variables with extra keys around the grid size.
    pub const VARIABLES: &str = "VAR1\tVAL1\nVAR2\tVAL2\nNX\t5\nNY\t3\nNZ\t3\nVARN\tVALN\n";
}

/// Builder for a temporary run directory.
///
/// # Example
///
/// ```
/// use test_utils::{create_test_field, RunDirBuilder};
///
/// let run = RunDirBuilder::new(8, 4, 1)
///     .cylindrical()
///     .ghosts(0, 3, 0)
///     .snapshot("gasdens0", create_test_field(8, 4, 1))
///     .build();
/// assert!(run.path().join("gasdens0.dat").exists());
/// ```
#[derive(Debug, Clone)]
pub struct RunDirBuilder {
    shape: [usize; 3],
    ghosts: [usize; 3],
    ranges: [(f64, f64); 3],
    system: Option<&'static str>,
    options: Vec<String>,
    variables: Vec<(String, String)>,
    snapshots: Vec<(String, Vec<f64>)>,
}

impl RunDirBuilder {
    /// Cartesian run of `nx * ny * nz` cells on `[-1, 1]` per axis.
    pub fn new(nx: usize, ny: usize, nz: usize) -> Self {
        Self {
            shape: [nx, ny, nz],
            ghosts: [0; 3],
            ranges: [(-1.0, 1.0); 3],
            system: Some("CARTESIAN"),
            options: Vec::new(),
            variables: Vec::new(),
            snapshots: Vec::new(),
        }
    }

    pub fn cartesian(mut self) -> Self {
        self.system = Some("CARTESIAN");
        self
    }

    /// φ in `[-π, π]`, r in `[0.4, 2.5]`.
    pub fn cylindrical(mut self) -> Self {
        self.system = Some("CYLINDRICAL");
        self.ranges[0] = (-PI, PI);
        self.ranges[1] = (0.4, 2.5);
        self
    }

    /// φ in `[-π, π]`, r in `[0.4, 2.5]`, θ in a band around the midplane.
    pub fn spherical(mut self) -> Self {
        self.system = Some("SPHERICAL");
        self.ranges[0] = (-PI, PI);
        self.ranges[1] = (0.4, 2.5);
        self.ranges[2] = (PI / 2.0 - 0.2, PI / 2.0 + 0.2);
        self
    }

    /// Leave the coordinate system option out of the summary.
    pub fn no_coordinate_system(mut self) -> Self {
        self.system = None;
        self
    }

    /// Ghost cells per side stored in each domain file.
    pub fn ghosts(mut self, x: usize, y: usize, z: usize) -> Self {
        self.ghosts = [x, y, z];
        self
    }

    /// Active extent along one axis (0 = x, 1 = y, 2 = z).
    pub fn range(mut self, axis: usize, min: f64, max: f64) -> Self {
        self.ranges[axis] = (min, max);
        self
    }

    /// Add a compile option token without the `-D`, e.g. `FLOAT` or `NGHY=3`.
    pub fn option(mut self, option: &str) -> Self {
        self.options.push(option.to_string());
        self
    }

    pub fn variable(mut self, key: &str, value: &str) -> Self {
        self.variables.push((key.to_string(), value.to_string()));
        self
    }

    /// Add a snapshot file `{stem}.dat`, e.g. `gasdens50`.
    ///
    /// Written as `f32` when the `FLOAT` option is set, `f64` otherwise.
    pub fn snapshot(mut self, stem: &str, values: Vec<f64>) -> Self {
        self.snapshots.push((stem.to_string(), values));
        self
    }

    /// Write everything into a fresh temporary directory.
    pub fn build(self) -> RunDir {
        let dir = tempfile::Builder::new()
            .prefix("fargo_run_")
            .tempdir()
            .expect("Failed to create temporary run directory");
        let run = RunDir { dir };

        let [nx, ny, nz] = self.shape;
        let mut vars = format!("Setup\tfargo\nNX\t{}\nNY\t{}\nNZ\t{}\n", nx, ny, nz);
        for (key, value) in &self.variables {
            vars.push_str(&format!("{}\t{}\n", key, value));
        }
        run.write_file("variables.par", vars.as_bytes());

        let mut defines = vec!["-DX".to_string(), "-DY".to_string()];
        if nz > 1 {
            defines.push("-DZ".to_string());
        }
        defines.extend(self.system.map(|s| format!("-D{}", s)));
        defines.extend(self.options.iter().map(|o| format!("-D{}", o)));
        let summary = format!(
            "==============================\nCOMPILATION OPTION SECTION:\n==============================\n{}\n",
            defines.join(" ")
        );
        run.write_file("summary0.dat", summary.as_bytes());

        for (axis, name) in ["domain_x.dat", "domain_y.dat", "domain_z.dat"].iter().enumerate() {
            let (min, max) = self.ranges[axis];
            let edges = uniform_edges(min, max, self.shape[axis], self.ghosts[axis]);
            let text: String = edges.iter().map(|e| format!("{:.17e}\n", e)).collect();
            run.write_file(name, text.as_bytes());
        }

        let single = self.options.iter().any(|o| o == "FLOAT");
        for (stem, values) in &self.snapshots {
            let bytes: Vec<u8> = if single {
                values.iter().flat_map(|&v| (v as f32).to_ne_bytes()).collect()
            } else {
                values.iter().flat_map(|&v| v.to_ne_bytes()).collect()
            };
            run.write_file(&format!("{}.dat", stem), &bytes);
        }

        run
    }
}

/// A temporary run directory, removed on drop.
#[derive(Debug)]
pub struct RunDir {
    dir: TempDir,
}

impl RunDir {
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Overwrite or add a file in the run directory.
    pub fn write_file(&self, name: &str, contents: &[u8]) {
        std::fs::write(self.dir.path().join(name), contents).expect("Failed to write run file");
    }

    pub fn remove_file(&self, name: &str) {
        std::fs::remove_file(self.dir.path().join(name)).expect("Failed to remove run file");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_writes_metadata() {
        let run = RunDirBuilder::new(4, 2, 1).cylindrical().ghosts(0, 3, 0).build();

        let summary = std::fs::read_to_string(run.path().join("summary0.dat")).unwrap();
        assert!(summary.contains("-DX -DY -DCYLINDRICAL"));

        let domain_y = std::fs::read_to_string(run.path().join("domain_y.dat")).unwrap();
        assert_eq!(domain_y.lines().count(), 2 + 1 + 6);
    }

    #[test]
    fn test_builder_snapshot_precision() {
        let run = RunDirBuilder::new(2, 1, 1)
            .option("FLOAT")
            .snapshot("gasdens0", vec![1.0, 2.0])
            .build();
        let len = std::fs::metadata(run.path().join("gasdens0.dat")).unwrap().len();
        assert_eq!(len, 8);
    }

    #[test]
    fn test_remove_file() {
        let run = RunDirBuilder::new(1, 1, 1).build();
        run.remove_file("summary0.dat");
        assert!(!run.path().join("summary0.dat").exists());
    }
}
