use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// DatasetError – every failure the library can surface
// ---------------------------------------------------------------------------

/// Errors raised while indexing, loading, or reading range-image pairs.
///
/// None of these are retried: a bad tag, a half-captured scene, or a corrupt
/// file is a data error the caller has to fix on disk.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("scene '{scene}' has {inputs} input range images but {outputs} output range images")]
    PairingMismatch {
        scene: String,
        inputs: usize,
        outputs: usize,
    },

    #[error("malformed resolution tag '{0}': expected '<channels>_<points_per_ring>'")]
    MalformedResolutionTag(String),

    #[error("index {index} out of range for dataset of {len} pairs")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("no scan {scan} in scene '{scene}'")]
    ScanNotFound { scene: String, scan: u64 },

    #[error("no LiDAR profile for {channels} channels x {points_per_ring} points per ring")]
    ProfileNotFound {
        channels: usize,
        points_per_ring: usize,
    },

    #[error("invalid LiDAR profile {channels}_{points_per_ring}: {reason}")]
    InvalidProfile {
        channels: usize,
        points_per_ring: usize,
        reason: String,
    },

    #[error("{path}: expected a {expected:?} range image, got {got:?}")]
    ShapeMismatch {
        path: PathBuf,
        expected: (usize, usize),
        got: (usize, usize),
    },

    #[error("{path}: {reason}")]
    Codec { path: PathBuf, reason: String },

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("unknown dataset kind '{0}'")]
    UnknownDataset(String),

    #[error("array shape: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("manifest: {0}")]
    Csv(#[from] csv::Error),
}

impl DatasetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DatasetError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn codec(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        DatasetError::Codec {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, DatasetError>;
