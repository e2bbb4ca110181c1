//! Parser for the compile options recorded in `summary0.dat`.
//!
//! FARGO3D writes the options it was built with as one line of `-D` tokens
//! after the `COMPILATION OPTION SECTION:` header:
//!
//! ```text
//! ==============================
//! COMPILATION OPTION SECTION:
//! ==============================
//! -DX -DY -DISOTHERMAL -DCYLINDRICAL -DNGHY=3
//! ```

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, warn};

const SECTION_HEADER: &str = "COMPILATION OPTION SECTION:";

/// Value of a single compile option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// `-DNAME`
    Flag,
    /// `-DNAME=VALUE`
    Value(String),
}

impl OptionValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Flag => None,
            OptionValue::Value(v) => Some(v),
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Flag => f.write_str("true"),
            OptionValue::Value(v) => f.write_str(v),
        }
    }
}

/// Compile options in the order they were listed.
pub type Options = IndexMap<String, OptionValue>;

/// Parse the compile options out of summary file text.
///
/// Returns an empty map when the option section is absent.
pub fn parse_options(text: &str) -> Options {
    let mut opts = Options::new();

    let mut lines = text.lines();
    if !lines.any(|line| line.contains(SECTION_HEADER)) {
        warn!("summary has no compile option section");
        return opts;
    }

    let Some(line) = lines
        .map(str::trim)
        .find(|line| !line.is_empty() && !is_separator(line))
    else {
        warn!("compile option section is empty");
        return opts;
    };

    for token in line.split_whitespace() {
        let Some(option) = token.strip_prefix("-D") else {
            debug!(token, "skipping non-define token");
            continue;
        };
        match option.split_once('=') {
            Some((name, value)) => {
                opts.insert(name.to_string(), OptionValue::Value(value.to_string()));
            }
            None if !option.is_empty() => {
                opts.insert(option.to_string(), OptionValue::Flag);
            }
            None => debug!("skipping empty define"),
        }
    }

    debug!(count = opts.len(), "parsed compile options");
    opts
}

fn is_separator(line: &str) -> bool {
    line.chars().all(|c| c == '=')
}
