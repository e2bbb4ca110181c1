//! Path utilities for locating test data.
//!
//! Real FARGO3D runs are too large to keep in the repository. Tests that need
//! one look it up through `FARGONAUT_TEST_DATA_DIR` and skip otherwise.

use std::path::PathBuf;

/// Environment variable naming a directory of real runs.
pub const TEST_DATA_ENV: &str = "FARGONAUT_TEST_DATA_DIR";

/// Returns the workspace root directory.
///
/// This is determined by walking up from the test-utils manifest directory.
pub fn workspace_root() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir)
        .parent() // crates/
        .and_then(|p| p.parent()) // workspace root
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(manifest_dir))
}

/// Searches for a run directory by name.
///
/// This function checks the following locations in order:
/// 1. `$FARGONAUT_TEST_DATA_DIR/{name}` (if set)
/// 2. `testdata/{name}` at the workspace root
///
/// A candidate counts only if it contains a `variables.par`.
pub fn find_test_run(name: &str) -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(dir) = std::env::var(TEST_DATA_ENV) {
        candidates.push(PathBuf::from(dir).join(name));
    }
    candidates.push(workspace_root().join("testdata").join(name));

    candidates
        .into_iter()
        .find(|path| path.join("variables.par").is_file())
}
