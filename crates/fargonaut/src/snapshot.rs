//! Decoding of raw snapshot files.
//!
//! Snapshots are headerless arrays of floats, x varying fastest. Single
//! precision values are widened to `f64`.

use std::path::Path;

use tracing::debug;

use crate::config::{ByteOrder, Precision};
use crate::error::{FargoError, Result};

/// Decode a snapshot buffer into `f64` values.
///
/// `context` names the source in shape errors.
pub fn decode(
    bytes: &[u8],
    precision: Precision,
    order: ByteOrder,
    context: &str,
) -> Result<Vec<f64>> {
    let size = precision.size();
    if bytes.len() % size != 0 {
        return Err(FargoError::ShapeMismatch {
            context: format!("{} ({}-byte values)", context, size),
            expected: bytes.len() / size + 1,
            actual: bytes.len() / size,
        });
    }

    let values = match precision {
        Precision::Double => bytes
            .chunks_exact(8)
            .map(|c| {
                let b = [c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]];
                match order {
                    ByteOrder::Native => f64::from_ne_bytes(b),
                    ByteOrder::Little => f64::from_le_bytes(b),
                    ByteOrder::Big => f64::from_be_bytes(b),
                }
            })
            .collect(),
        Precision::Single => bytes
            .chunks_exact(4)
            .map(|c| {
                let b = [c[0], c[1], c[2], c[3]];
                let v = match order {
                    ByteOrder::Native => f32::from_ne_bytes(b),
                    ByteOrder::Little => f32::from_le_bytes(b),
                    ByteOrder::Big => f32::from_be_bytes(b),
                };
                v as f64
            })
            .collect(),
    };

    Ok(values)
}

/// Read and decode a snapshot file, checking its value count.
pub fn read(
    path: &Path,
    precision: Precision,
    order: ByteOrder,
    expected: usize,
) -> Result<Vec<f64>> {
    if !path.is_file() {
        return Err(FargoError::not_found("snapshot", path));
    }
    let bytes = std::fs::read(path)?;
    let context = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let values = decode(&bytes, precision, order, &context)?;
    if values.len() != expected {
        return Err(FargoError::ShapeMismatch {
            context,
            expected,
            actual: values.len(),
        });
    }

    debug!(path = %path.display(), values = values.len(), ?precision, "read snapshot");
    Ok(values)
}

/// Encode values the way FARGO3D writes them. Used to build test runs.
pub fn encode(values: &[f64], precision: Precision, order: ByteOrder) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(values.len() * precision.size());
    for &v in values {
        match (precision, order) {
            (Precision::Double, ByteOrder::Native) => bytes.extend_from_slice(&v.to_ne_bytes()),
            (Precision::Double, ByteOrder::Little) => bytes.extend_from_slice(&v.to_le_bytes()),
            (Precision::Double, ByteOrder::Big) => bytes.extend_from_slice(&v.to_be_bytes()),
            (Precision::Single, ByteOrder::Native) => {
                bytes.extend_from_slice(&(v as f32).to_ne_bytes())
            }
            (Precision::Single, ByteOrder::Little) => {
                bytes.extend_from_slice(&(v as f32).to_le_bytes())
            }
            (Precision::Single, ByteOrder::Big) => {
                bytes.extend_from_slice(&(v as f32).to_be_bytes())
            }
        }
    }
    bytes
}
