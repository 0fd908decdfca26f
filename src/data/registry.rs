use std::collections::BTreeMap;

use super::store::{RangeImagePair, SampleStore};
use crate::config::{DatasetConfig, RANGE_IMAGES_KIND};
use crate::error::{DatasetError, Result};

// ---------------------------------------------------------------------------
// PairedDataset – the indexable-container surface the trainer sees
// ---------------------------------------------------------------------------

/// An indexable collection of normalized range-image pairs.
pub trait PairedDataset: Send + Sync {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, index: usize) -> Result<RangeImagePair>;

    fn get_by_scan(&self, scene_id: &str, scan_number: u64) -> Result<RangeImagePair>;
}

impl PairedDataset for SampleStore {
    fn len(&self) -> usize {
        SampleStore::len(self)
    }

    fn get(&self, index: usize) -> Result<RangeImagePair> {
        SampleStore::get(self, index)
    }

    fn get_by_scan(&self, scene_id: &str, scan_number: u64) -> Result<RangeImagePair> {
        SampleStore::get_by_scan(self, scene_id, scan_number)
    }
}

// ---------------------------------------------------------------------------
// DatasetRegistry – kind name → factory
// ---------------------------------------------------------------------------

/// Builds a dataset from its configuration.
pub type DatasetFactory = fn(&DatasetConfig) -> Result<Box<dyn PairedDataset>>;

/// Explicit mapping from a dataset kind (`config.kind`) to its factory.
///
/// Populated by whoever assembles the pipeline; there is no process-wide
/// instance.
#[derive(Clone, Default)]
pub struct DatasetRegistry {
    factories: BTreeMap<String, DatasetFactory>,
}

impl DatasetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the datasets this crate provides.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(RANGE_IMAGES_KIND, open_range_images);
        registry
    }

    /// Add or replace the factory for `kind`.
    pub fn register(&mut self, kind: &str, factory: DatasetFactory) -> &mut Self {
        self.factories.insert(kind.to_string(), factory);
        self
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Build the dataset named by `config.kind`.
    pub fn create(&self, config: &DatasetConfig) -> Result<Box<dyn PairedDataset>> {
        let factory = self
            .factories
            .get(&config.kind)
            .ok_or_else(|| DatasetError::UnknownDataset(config.kind.clone()))?;
        factory(config)
    }
}

fn open_range_images(config: &DatasetConfig) -> Result<Box<dyn PairedDataset>> {
    Ok(Box::new(SampleStore::open(config)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty(_: &DatasetConfig) -> Result<Box<dyn PairedDataset>> {
        Err(DatasetError::Config("empty".into()))
    }

    fn config(kind: &str) -> DatasetConfig {
        let mut cfg = DatasetConfig::new(
            "/nonexistent",
            vec![],
            "16_1024".parse().unwrap(),
            "64_1024".parse().unwrap(),
            false,
        );
        cfg.kind = kind.to_string();
        cfg
    }

    #[test]
    fn unknown_kind() {
        let registry = DatasetRegistry::with_builtin();
        let err = registry.create(&config("voxels")).err().unwrap();
        assert!(matches!(err, DatasetError::UnknownDataset(ref k) if k == "voxels"));
    }

    #[test]
    fn dispatches_to_registered_factory() {
        let mut registry = DatasetRegistry::with_builtin();
        registry.register("empty", empty);
        assert_eq!(registry.kinds().collect::<Vec<_>>(), ["empty", RANGE_IMAGES_KIND]);

        let err = registry.create(&config("empty")).err().unwrap();
        assert!(matches!(err, DatasetError::Config(ref m) if m == "empty"));
    }
}
