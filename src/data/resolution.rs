use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DatasetError;

// ---------------------------------------------------------------------------
// ResolutionTag – "<channels>_<points_per_ring>"
// ---------------------------------------------------------------------------

/// A sampling density of the sensor, e.g. `64_1024`.
///
/// Doubles as the name of the per-scene sub-directory holding the range
/// images at that density. Both components are validated positive on parse,
/// so a `ResolutionTag` in hand is always usable as a grid shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResolutionTag {
    channels: usize,
    points_per_ring: usize,
}

impl ResolutionTag {
    /// Build a tag from its two components. Zero components are rejected.
    pub fn new(channels: usize, points_per_ring: usize) -> Result<Self, DatasetError> {
        if channels == 0 || points_per_ring == 0 {
            return Err(DatasetError::MalformedResolutionTag(format!(
                "{channels}_{points_per_ring}"
            )));
        }
        Ok(Self {
            channels,
            points_per_ring,
        })
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn points_per_ring(&self) -> usize {
        self.points_per_ring
    }

    /// Number of values in one grid at this resolution.
    pub fn flat_len(&self) -> usize {
        self.channels * self.points_per_ring
    }

    /// Grid shape as `(channels, points_per_ring)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.channels, self.points_per_ring)
    }
}

impl FromStr for ResolutionTag {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || DatasetError::MalformedResolutionTag(s.to_string());

        let mut parts = s.split('_');
        let (Some(c), Some(p), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(malformed());
        };
        let channels = c.parse::<usize>().map_err(|_| malformed())?;
        let points_per_ring = p.parse::<usize>().map_err(|_| malformed())?;

        Self::new(channels, points_per_ring).map_err(|_| malformed())
    }
}

impl TryFrom<String> for ResolutionTag {
    type Error = DatasetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ResolutionTag> for String {
    fn from(tag: ResolutionTag) -> Self {
        tag.to_string()
    }
}

impl fmt::Display for ResolutionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.channels, self.points_per_ring)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_tag() {
        let tag: ResolutionTag = "64_1024".parse().unwrap();
        assert_eq!(tag.channels(), 64);
        assert_eq!(tag.points_per_ring(), 1024);
        assert_eq!(tag.flat_len(), 64 * 1024);
        assert_eq!(tag.to_string(), "64_1024");
    }

    #[test]
    fn rejects_malformed_tags() {
        for bad in ["64", "64_", "_1024", "a_b", "0_1024", "64_0", "1_2_3", "", "64-1024"] {
            let err = bad.parse::<ResolutionTag>().unwrap_err();
            assert!(
                matches!(err, DatasetError::MalformedResolutionTag(ref t) if t == bad),
                "{bad}: {err}"
            );
        }
    }

    #[test]
    fn deserializes_from_string() {
        let tag: ResolutionTag = serde_json::from_str("\"32_512\"").unwrap();
        assert_eq!(tag.shape(), (32, 512));
        assert!(serde_json::from_str::<ResolutionTag>("\"32x512\"").is_err());
        assert_eq!(serde_json::to_string(&tag).unwrap(), "\"32_512\"");
    }
}
