use std::path::{Path, PathBuf};

use log::debug;

use super::codec::RANGE_IMAGE_EXTENSION;
use super::resolution::ResolutionTag;
use crate::error::{DatasetError, Result};

// ---------------------------------------------------------------------------
// PairEntry – one (input, output) correspondence
// ---------------------------------------------------------------------------

/// One input/output range-image pair of the same scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairEntry {
    pub scene_id: String,
    pub input: PathBuf,
    pub output: PathBuf,
}

impl PairEntry {
    /// Scan number parsed from the output file stem, when the stem is a
    /// plain integer (`000042.rimg` → 42).
    pub fn scan_number(&self) -> Option<u64> {
        self.output
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| s.parse().ok())
    }
}

// ---------------------------------------------------------------------------
// PairIndex – flat, ordered list of pairs across scenes
// ---------------------------------------------------------------------------

/// Pairs discovered under `directory/<scene>/<resolution>/*.rimg`.
///
/// Within a scene, input and output files are matched by position after a
/// lexicographic sort of their paths. Nothing beyond the per-scene count is
/// checked, so files must be named such that sort order is scan order
/// (zero-padded scan numbers, or the same un-padded scheme on both sides).
#[derive(Debug, Clone)]
pub struct PairIndex {
    directory: PathBuf,
    res_in: ResolutionTag,
    res_out: ResolutionTag,
    entries: Vec<PairEntry>,
}

impl PairIndex {
    /// Scan every scene in the given order.
    ///
    /// Fails with [`DatasetError::PairingMismatch`] on the first scene whose
    /// input and output file counts differ; no partial index is returned.
    pub fn build(
        directory: &Path,
        scene_ids: &[String],
        res_in: ResolutionTag,
        res_out: ResolutionTag,
    ) -> Result<Self> {
        let mut entries = Vec::new();

        for scene_id in scene_ids {
            let scene_dir = directory.join(scene_id);
            let inputs = list_range_images(&scene_dir.join(res_in.to_string()))?;
            let outputs = list_range_images(&scene_dir.join(res_out.to_string()))?;

            if inputs.len() != outputs.len() {
                return Err(DatasetError::PairingMismatch {
                    scene: scene_id.clone(),
                    inputs: inputs.len(),
                    outputs: outputs.len(),
                });
            }
            debug!("scene {scene_id}: {} pairs", inputs.len());

            entries.extend(inputs.into_iter().zip(outputs).map(|(input, output)| PairEntry {
                scene_id: scene_id.clone(),
                input,
                output,
            }));
        }

        Ok(Self {
            directory: directory.to_path_buf(),
            res_in,
            res_out,
            entries,
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn res_in(&self) -> ResolutionTag {
        self.res_in
    }

    pub fn res_out(&self) -> ResolutionTag {
        self.res_out
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PairEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PairEntry> {
        self.entries.iter()
    }

    /// Output paths in index order.
    pub fn output_paths(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().map(|e| e.output.as_path())
    }

    /// Path an output range image of `scene_id` / `scan_number` would have
    /// under the naming convention `<scan_number>.rimg` (no zero padding).
    pub fn expected_output_path(&self, scene_id: &str, scan_number: u64) -> PathBuf {
        self.directory
            .join(scene_id)
            .join(self.res_out.to_string())
            .join(format!("{scan_number}.{RANGE_IMAGE_EXTENSION}"))
    }

    /// Position of the pair whose output path is exactly `path`.
    pub fn position_of_output(&self, path: &Path) -> Option<usize> {
        self.output_paths().position(|p| p == path)
    }
}

impl<'a> IntoIterator for &'a PairIndex {
    type Item = &'a PairEntry;
    type IntoIter = std::slice::Iter<'a, PairEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Sorted paths of the `.rimg` files directly inside `dir`.
fn list_range_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let suffix = format!(".{RANGE_IMAGE_EXTENSION}");
    let mut paths = Vec::new();

    for entry in std::fs::read_dir(dir).map_err(|e| DatasetError::io(dir, e))? {
        let entry = entry.map_err(|e| DatasetError::io(dir, e))?;
        let name = entry.file_name();
        if name.to_str().is_some_and(|n| n.ends_with(&suffix)) {
            paths.push(entry.path());
        }
    }

    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch_scene(root: &Path, scene: &str, tag: &str, names: &[&str]) {
        let dir = root.join(scene).join(tag);
        std::fs::create_dir_all(&dir).unwrap();
        for name in names {
            std::fs::write(dir.join(name), b"").unwrap();
        }
    }

    fn tags() -> (ResolutionTag, ResolutionTag) {
        ("16_1024".parse().unwrap(), "64_1024".parse().unwrap())
    }

    #[test]
    fn pairs_by_sorted_position_across_scenes() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        touch_scene(root, "b", "16_1024", &["02.rimg", "01.rimg", "notes.txt"]);
        touch_scene(root, "b", "64_1024", &["01.rimg", "02.rimg"]);
        touch_scene(root, "a", "16_1024", &["07.rimg"]);
        touch_scene(root, "a", "64_1024", &["07.rimg", "07.rimg.bak"]);

        let (res_in, res_out) = tags();
        let scenes = vec!["b".to_string(), "a".to_string()];
        let index = PairIndex::build(root, &scenes, res_in, res_out).unwrap();

        assert_eq!(index.len(), 3);
        let scenes_seen: Vec<&str> = index.iter().map(|e| e.scene_id.as_str()).collect();
        assert_eq!(scenes_seen, ["b", "b", "a"]);

        let first = index.get(0).unwrap();
        assert_eq!(first.input, root.join("b/16_1024/01.rimg"));
        assert_eq!(first.output, root.join("b/64_1024/01.rimg"));
        assert_eq!(first.scan_number(), Some(1));
        assert_eq!(index.get(2).unwrap().output, root.join("a/64_1024/07.rimg"));
    }

    #[test]
    fn unequal_counts_fail_the_whole_build() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        touch_scene(root, "ok", "16_1024", &["1.rimg"]);
        touch_scene(root, "ok", "64_1024", &["1.rimg"]);
        touch_scene(root, "bad", "16_1024", &["1.rimg", "2.rimg", "3.rimg", "4.rimg", "5.rimg"]);
        touch_scene(root, "bad", "64_1024", &["1.rimg", "2.rimg", "3.rimg", "4.rimg"]);

        let (res_in, res_out) = tags();
        let scenes = vec!["ok".to_string(), "bad".to_string()];
        let err = PairIndex::build(root, &scenes, res_in, res_out).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::PairingMismatch { ref scene, inputs: 5, outputs: 4 } if scene == "bad"
        ));
    }

    #[test]
    fn missing_resolution_directory_is_io_error() {
        let tmp = TempDir::new().unwrap();
        touch_scene(tmp.path(), "s", "16_1024", &["1.rimg"]);

        let (res_in, res_out) = tags();
        let err = PairIndex::build(tmp.path(), &["s".to_string()], res_in, res_out).unwrap_err();
        assert!(matches!(err, DatasetError::Io { .. }), "{err}");
    }

    #[test]
    fn lookup_uses_unpadded_scan_names() {
        let tmp = TempDir::new().unwrap();
        touch_scene(tmp.path(), "s", "16_1024", &["42.rimg"]);
        touch_scene(tmp.path(), "s", "64_1024", &["42.rimg"]);

        let (res_in, res_out) = tags();
        let index = PairIndex::build(tmp.path(), &["s".to_string()], res_in, res_out).unwrap();
        let path = index.expected_output_path("s", 42);
        assert_eq!(index.position_of_output(&path), Some(0));
        assert_eq!(index.position_of_output(&index.expected_output_path("s", 7)), None);
    }
}
