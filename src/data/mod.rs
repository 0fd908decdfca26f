//! Data layer: discovery, decoding, normalization, and access.
//!
//! Architecture:
//! ```text
//!  <dir>/<scene>/<res>/*.rimg      <dir>/lidar_specification.yaml
//!        │                                 │
//!        ▼                                 ▼
//!   ┌──────────┐                     ┌──────────┐
//!   │  pairs   │  sort + pair        │ profile  │  res tag → LidarProfile
//!   └──────────┘                     └──────────┘
//!        │                                 │
//!        └───────────────┬─────────────────┘
//!                        ▼
//!   ┌──────────┐   ┌──────────┐   ┌───────────┐
//!   │  codec   │──▶│  store   │◀──│ transform │  clip + map to [-1, 1]
//!   └──────────┘   └──────────┘   └───────────┘
//!                        │
//!                        ▼
//!                  ┌──────────┐
//!                  │ registry │  kind → Box<dyn PairedDataset>
//!                  └──────────┘
//! ```

pub mod codec;
pub mod manifest;
pub mod pairs;
pub mod profile;
pub mod registry;
pub mod resolution;
pub mod store;
pub mod transform;
