use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use super::resolution::ResolutionTag;
use crate::error::{DatasetError, Result};

/// File name of the profile table inside a dataset directory.
pub const LIDAR_SPECIFICATION_FILE: &str = "lidar_specification.yaml";

// ---------------------------------------------------------------------------
// LidarProfile – one sensor configuration at one resolution
// ---------------------------------------------------------------------------

/// Range limits of a sensor at a given sampling density.
///
/// Field names follow the keys of `lidar_specification.yaml`:
///
/// ```yaml
/// - channels: 64
///   points_per_ring: 1024
///   min_v: -25.0
///   max_v: 15.0
///   min_r: 1.0
///   max_r: 100.0
///   norm_r: 120.0
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LidarProfile {
    pub channels: usize,
    pub points_per_ring: usize,
    /// Ranges below this are treated as invalid and zeroed.
    #[serde(rename = "min_r")]
    pub min_range: f32,
    /// Ranges above this are treated as no-return.
    #[serde(rename = "max_r")]
    pub max_range: f32,
    /// Scale of the normalization and value of the no-return sentinel.
    #[serde(rename = "norm_r")]
    pub normalization_range: f32,
    /// Lowest elevation angle in degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_v: Option<f32>,
    /// Highest elevation angle in degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_v: Option<f32>,
}

impl LidarProfile {
    /// Profile without vertical field-of-view information.
    pub fn new(
        channels: usize,
        points_per_ring: usize,
        min_range: f32,
        max_range: f32,
        normalization_range: f32,
    ) -> Self {
        Self {
            channels,
            points_per_ring,
            min_range,
            max_range,
            normalization_range,
            min_v: None,
            max_v: None,
        }
    }

    /// Grid shape `(channels, points_per_ring)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.channels, self.points_per_ring)
    }

    /// Number of values in one grid.
    pub fn flat_len(&self) -> usize {
        self.channels * self.points_per_ring
    }

    pub fn matches(&self, tag: ResolutionTag) -> bool {
        self.shape() == tag.shape()
    }

    /// Check the numeric invariants the transform relies on.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| DatasetError::InvalidProfile {
            channels: self.channels,
            points_per_ring: self.points_per_ring,
            reason: reason.to_string(),
        };

        if self.channels == 0 || self.points_per_ring == 0 {
            return Err(invalid("grid dimensions must be positive"));
        }
        if !(self.min_range >= 0.0) {
            return Err(invalid("min_r must be non-negative"));
        }
        if !(self.max_range > self.min_range) {
            return Err(invalid("max_r must exceed min_r"));
        }
        if !(self.normalization_range > 0.0) {
            return Err(invalid("norm_r must be positive"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

/// Parse a profile table from YAML text.
pub fn parse_profiles(yaml: &str) -> Result<Vec<LidarProfile>> {
    serde_yaml::from_str(yaml).map_err(|e| DatasetError::Config(e.to_string()))
}

/// Pick the first profile whose resolution equals `tag`, validating it.
pub fn select_profile(profiles: &[LidarProfile], tag: ResolutionTag) -> Result<LidarProfile> {
    let profile = profiles
        .iter()
        .find(|p| p.matches(tag))
        .copied()
        .ok_or(DatasetError::ProfileNotFound {
            channels: tag.channels(),
            points_per_ring: tag.points_per_ring(),
        })?;
    profile.validate()?;
    Ok(profile)
}

/// Load the profile for `tag` from a `lidar_specification.yaml` file.
pub fn load_profile(config_path: &Path, tag: ResolutionTag) -> Result<LidarProfile> {
    let text =
        std::fs::read_to_string(config_path).map_err(|e| DatasetError::io(config_path, e))?;
    let profiles = parse_profiles(&text)?;
    debug!(
        "{}: {} profiles, selecting {tag}",
        config_path.display(),
        profiles.len()
    );
    select_profile(&profiles, tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"
- channels: 32
  points_per_ring: 512
  min_v: -25.0
  max_v: 15.0
  min_r: 1.0
  max_r: 80.0
  norm_r: 100.0
- channels: 64
  points_per_ring: 1024
  min_r: 0.5
  max_r: 100.0
  norm_r: 120.0
"#;

    #[test]
    fn selects_matching_profile() {
        let profiles = parse_profiles(TABLE).unwrap();
        let p = select_profile(&profiles, "64_1024".parse().unwrap()).unwrap();
        assert_eq!(p.shape(), (64, 1024));
        assert_eq!(p.normalization_range, 120.0);
        assert_eq!(p.min_v, None);

        let p = select_profile(&profiles, "32_512".parse().unwrap()).unwrap();
        assert_eq!(p.min_v, Some(-25.0));
        assert_eq!(p.max_range, 80.0);
    }

    #[test]
    fn missing_resolution_is_an_error() {
        let profiles = parse_profiles(TABLE).unwrap();
        let err = select_profile(&profiles, "16_1024".parse().unwrap()).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::ProfileNotFound {
                channels: 16,
                points_per_ring: 1024
            }
        ));
    }

    #[test]
    fn rejects_inverted_range() {
        let profile = LidarProfile::new(16, 1024, 50.0, 10.0, 100.0);
        assert!(matches!(
            profile.validate(),
            Err(DatasetError::InvalidProfile { .. })
        ));
        assert!(LidarProfile::new(16, 1024, 0.0, 10.0, 0.0).validate().is_err());
        assert!(LidarProfile::new(16, 1024, 0.0, 10.0, 12.0).validate().is_ok());
    }
}
