use std::path::Path;

use ndarray::Array2;

use crate::error::{DatasetError, Result};

/// File extension of a binary range image.
pub const RANGE_IMAGE_EXTENSION: &str = "rimg";

const HEADER_LEN: usize = 2 * std::mem::size_of::<u64>();
const VALUE_LEN: usize = std::mem::size_of::<f32>();

// ---------------------------------------------------------------------------
// Codec seam
// ---------------------------------------------------------------------------

/// Reads one range image from disk into a `(channels, points_per_ring)` grid
/// of raw, unnormalized ranges.
pub trait RangeImageCodec: Send + Sync {
    fn read(&self, path: &Path) -> Result<Array2<f32>>;
}

// ---------------------------------------------------------------------------
// RimgCodec – the bundled `.rimg` layout
// ---------------------------------------------------------------------------

/// `.rimg` files, all little-endian:
///
/// ```text
/// ┌──────────────┬─────────────────────┬──────────────────────────────┐
/// │ channels:u64 │ points_per_ring:u64 │ ranges: f32 × channels × ppr │
/// └──────────────┴─────────────────────┴──────────────────────────────┘
/// ```
///
/// Ranges are stored row-major, one row per channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct RimgCodec;

impl RimgCodec {
    /// Decode a `.rimg` byte buffer. `path` is only used for error messages.
    pub fn decode(bytes: &[u8], path: &Path) -> Result<Array2<f32>> {
        if bytes.len() < HEADER_LEN {
            return Err(DatasetError::codec(
                path,
                format!("truncated header ({} bytes)", bytes.len()),
            ));
        }
        let (header, payload) = bytes.split_at(HEADER_LEN);
        let channels = read_dim(&header[..8], path)?;
        let points_per_ring = read_dim(&header[8..], path)?;
        if channels == 0 || points_per_ring == 0 {
            return Err(DatasetError::codec(
                path,
                format!("empty range image {channels}x{points_per_ring}"),
            ));
        }

        let expected = channels
            .checked_mul(points_per_ring)
            .and_then(|n| n.checked_mul(VALUE_LEN))
            .ok_or_else(|| DatasetError::codec(path, "range image dimensions overflow"))?;
        if payload.len() != expected {
            return Err(DatasetError::codec(
                path,
                format!(
                    "{channels}x{points_per_ring} range image needs {expected} payload bytes, found {}",
                    payload.len()
                ),
            ));
        }

        let values: Vec<f32> = payload
            .chunks_exact(VALUE_LEN)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();

        Array2::from_shape_vec((channels, points_per_ring), values)
            .map_err(|e| DatasetError::codec(path, e.to_string()))
    }

    /// Encode a grid into `.rimg` bytes.
    pub fn encode(grid: &Array2<f32>) -> Vec<u8> {
        let (channels, points_per_ring) = grid.dim();
        let mut bytes = Vec::with_capacity(HEADER_LEN + grid.len() * VALUE_LEN);
        bytes.extend_from_slice(&(channels as u64).to_le_bytes());
        bytes.extend_from_slice(&(points_per_ring as u64).to_le_bytes());
        // `iter()` walks in logical (row-major) order regardless of memory layout.
        for v in grid.iter() {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        bytes
    }

    /// Write a grid to `path` in `.rimg` layout.
    pub fn write(&self, path: &Path, grid: &Array2<f32>) -> Result<()> {
        std::fs::write(path, Self::encode(grid)).map_err(|e| DatasetError::io(path, e))
    }
}

impl RangeImageCodec for RimgCodec {
    fn read(&self, path: &Path) -> Result<Array2<f32>> {
        let bytes = std::fs::read(path).map_err(|e| DatasetError::io(path, e))?;
        Self::decode(&bytes, path)
    }
}

fn read_dim(bytes: &[u8], path: &Path) -> Result<usize> {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(bytes);
    usize::try_from(u64::from_le_bytes(raw))
        .map_err(|_| DatasetError::codec(path, "dimension does not fit in memory"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn encode_decode_keeps_row_order() {
        let grid = array![[1.0f32, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let bytes = RimgCodec::encode(&grid);
        assert_eq!(bytes.len(), 16 + 6 * 4);

        let back = RimgCodec::decode(&bytes, Path::new("mem.rimg")).unwrap();
        assert_eq!(back.dim(), (2, 3));
        assert_eq!(back, grid);
    }

    #[test]
    fn rejects_truncated_payload() {
        let grid = array![[1.0f32, 2.0], [3.0, 4.0]];
        let mut bytes = RimgCodec::encode(&grid);
        bytes.truncate(bytes.len() - 2);

        let err = RimgCodec::decode(&bytes, Path::new("short.rimg")).unwrap_err();
        assert!(matches!(err, DatasetError::Codec { .. }), "{err}");
    }

    #[test]
    fn rejects_short_header_and_empty_grid() {
        assert!(RimgCodec::decode(&[0u8; 7], Path::new("h.rimg")).is_err());

        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0u64.to_le_bytes());
        bytes.extend_from_slice(&8u64.to_le_bytes());
        assert!(RimgCodec::decode(&bytes, Path::new("z.rimg")).is_err());
    }
}
