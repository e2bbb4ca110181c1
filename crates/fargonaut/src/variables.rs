//! Parser for the run parameters in `variables.par`.

use indexmap::IndexMap;
use tracing::debug;

/// Run variables in file order. Values are kept as written.
pub type Variables = IndexMap<String, String>;

/// Parse `KEY<whitespace>VALUE` lines.
///
/// Blank lines, `#` comments and keys without a value are skipped. A repeated
/// key keeps its last value.
pub fn parse_variables(text: &str) -> Variables {
    let mut vars = Variables::new();

    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut parts = line.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some(key), Some(value)) => {
                vars.insert(key.to_string(), value.to_string());
            }
            _ => debug!(line = lineno + 1, "skipping variable without value"),
        }
    }

    vars
}
