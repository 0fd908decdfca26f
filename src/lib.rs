//! Paired LiDAR range-image dataset.
//!
//! Discovers `<directory>/<scene>/<resolution>/*.rimg` files, pairs each
//! low-resolution input scan with its high-resolution target, and serves
//! them clipped and normalized to `[-1, 1]` as `(1, channels, points)`
//! arrays, either from a preloaded corpus buffer or streamed per access.

pub mod config;
pub mod data;
pub mod error;

pub use config::DatasetConfig;
pub use data::codec::{RangeImageCodec, RimgCodec};
pub use data::pairs::{PairEntry, PairIndex};
pub use data::profile::{load_profile, LidarProfile};
pub use data::registry::{DatasetRegistry, PairedDataset};
pub use data::resolution::ResolutionTag;
pub use data::store::{RangeImagePair, SampleStore};
pub use error::{DatasetError, Result};
