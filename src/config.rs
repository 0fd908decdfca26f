use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::profile::LIDAR_SPECIFICATION_FILE;
use crate::data::resolution::ResolutionTag;
use crate::error::{DatasetError, Result};

/// Registry key of the paired range-image dataset.
pub const RANGE_IMAGES_KIND: &str = "range_images";

// ---------------------------------------------------------------------------
// DatasetConfig – constructor-time knobs
// ---------------------------------------------------------------------------

/// Everything needed to open a paired range-image dataset.
///
/// ```yaml
/// kind: range_images
/// directory: /data/carla
/// scene_ids: [town01, town02]
/// res_in: 16_1024
/// res_out: 64_1024
/// preload: true
/// ```
///
/// Resolution tags are validated while deserializing, so a malformed tag
/// fails here rather than at first access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    #[serde(default = "default_kind")]
    pub kind: String,
    pub directory: PathBuf,
    pub scene_ids: Vec<String>,
    pub res_in: ResolutionTag,
    pub res_out: ResolutionTag,
    /// Read and normalize the whole corpus up front.
    #[serde(default = "default_preload", alias = "memory_fetch")]
    pub preload: bool,
}

fn default_kind() -> String {
    RANGE_IMAGES_KIND.to_string()
}

fn default_preload() -> bool {
    true
}

impl DatasetConfig {
    pub fn new(
        directory: impl Into<PathBuf>,
        scene_ids: Vec<String>,
        res_in: ResolutionTag,
        res_out: ResolutionTag,
        preload: bool,
    ) -> Self {
        Self {
            kind: default_kind(),
            directory: directory.into(),
            scene_ids,
            res_in,
            res_out,
            preload,
        }
    }

    /// Path of the LiDAR profile table for this dataset.
    pub fn lidar_config_path(&self) -> PathBuf {
        self.directory.join(LIDAR_SPECIFICATION_FILE)
    }

    /// Load a configuration file. Dispatch by extension.
    ///
    /// Supported formats:
    /// * `.yaml` / `.yml`
    /// * `.json`
    pub fn load_file(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        let text = std::fs::read_to_string(path).map_err(|e| DatasetError::io(path, e))?;

        match ext.as_str() {
            "yaml" | "yml" => Self::from_yaml(&text),
            "json" => Self::from_json(&text),
            other => Err(DatasetError::Config(format!(
                "unsupported configuration extension: .{other}"
            ))),
        }
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).map_err(|e| DatasetError::Config(e.to_string()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| DatasetError::Config(e.to_string()))
    }
}
