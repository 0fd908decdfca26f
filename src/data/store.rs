use std::path::Path;

use log::{debug, info};
use ndarray::{s, Array2, Array3, Axis};

use super::codec::{RangeImageCodec, RimgCodec};
use super::pairs::PairIndex;
use super::profile::{load_profile, LidarProfile};
use super::transform::{clip_and_normalize, normalize_range};
use crate::config::DatasetConfig;
use crate::error::{DatasetError, Result};

// ---------------------------------------------------------------------------
// RangeImagePair – what one access returns
// ---------------------------------------------------------------------------

/// A normalized input/output pair, each shaped `(1, channels, points_per_ring)`.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeImagePair {
    pub input: Array3<f32>,
    pub output: Array3<f32>,
}

// ---------------------------------------------------------------------------
// SampleStore
// ---------------------------------------------------------------------------

/// Random-access view over the pairs of a [`PairIndex`].
///
/// In preloaded mode every pair is read, packed and normalized into one
/// `(num_pairs, flat_in + flat_out)` corpus buffer during construction. Note
/// that the whole buffer, input half included, is normalized with
/// `profile_out`; streaming mode normalizes the input half with
/// `profile_in`. Both behaviors are kept as they are: the two modes only
/// agree when the profiles share their range parameters.
pub struct SampleStore<C: RangeImageCodec = RimgCodec> {
    index: PairIndex,
    profile_in: LidarProfile,
    profile_out: LidarProfile,
    codec: C,
    corpus: Option<Array2<f32>>,
}

impl SampleStore<RimgCodec> {
    /// Open the dataset described by `config`, reading both profiles from
    /// its `lidar_specification.yaml`.
    pub fn open(config: &DatasetConfig) -> Result<Self> {
        let lidar_config = config.lidar_config_path();
        let profile_in = load_profile(&lidar_config, config.res_in)?;
        let profile_out = load_profile(&lidar_config, config.res_out)?;
        let index = PairIndex::build(
            &config.directory,
            &config.scene_ids,
            config.res_in,
            config.res_out,
        )?;
        Self::new(index, profile_in, profile_out, config.preload)
    }

    pub fn new(
        index: PairIndex,
        profile_in: LidarProfile,
        profile_out: LidarProfile,
        preload: bool,
    ) -> Result<Self> {
        Self::with_codec(index, profile_in, profile_out, preload, RimgCodec)
    }
}

impl<C: RangeImageCodec> SampleStore<C> {
    pub fn with_codec(
        index: PairIndex,
        profile_in: LidarProfile,
        profile_out: LidarProfile,
        preload: bool,
        codec: C,
    ) -> Result<Self> {
        for (profile, tag) in [(&profile_in, index.res_in()), (&profile_out, index.res_out())] {
            if !profile.matches(tag) {
                return Err(DatasetError::Config(format!(
                    "profile {}_{} does not describe resolution {tag}",
                    profile.channels, profile.points_per_ring
                )));
            }
            profile.validate()?;
        }

        let mut store = Self {
            index,
            profile_in,
            profile_out,
            codec,
            corpus: None,
        };
        if preload {
            store.corpus = Some(store.load_corpus()?);
        }
        info!(
            "{} range image pairs ({} -> {}), {}",
            store.len(),
            store.index.res_in(),
            store.index.res_out(),
            if preload { "preloaded" } else { "streaming" }
        );
        Ok(store)
    }

    /// Read every pair into one buffer, then normalize it in a single pass.
    fn load_corpus(&self) -> Result<Array2<f32>> {
        let split = self.split_offset();
        let width = split + self.profile_out.flat_len();
        let mut flat = vec![0.0f32; self.index.len() * width];

        for (row, entry) in flat.chunks_exact_mut(width).zip(self.index.iter()) {
            let input = self.read_grid(&entry.input, &self.profile_in)?;
            let output = self.read_grid(&entry.output, &self.profile_out)?;
            let (head, tail) = row.split_at_mut(split);
            for (dst, src) in head.iter_mut().zip(input.iter()) {
                *dst = *src;
            }
            for (dst, src) in tail.iter_mut().zip(output.iter()) {
                *dst = *src;
            }
        }

        clip_and_normalize(&mut flat, &self.profile_out);

        let corpus = Array2::from_shape_vec((self.index.len(), width), flat)?;
        debug!(
            "corpus buffer {:?}, {:.1} MiB",
            corpus.dim(),
            (corpus.len() * std::mem::size_of::<f32>()) as f64 / (1024.0 * 1024.0)
        );
        Ok(corpus)
    }

    fn read_grid(&self, path: &Path, profile: &LidarProfile) -> Result<Array2<f32>> {
        let grid = self.codec.read(path)?;
        if grid.dim() != profile.shape() {
            return Err(DatasetError::ShapeMismatch {
                path: path.to_path_buf(),
                expected: profile.shape(),
                got: grid.dim(),
            });
        }
        Ok(grid)
    }

    /// Read and normalize a single grid with its own profile.
    fn stream_grid(&self, path: &Path, profile: &LidarProfile) -> Result<Array3<f32>> {
        let mut grid = self.read_grid(path, profile)?;
        grid.mapv_inplace(|v| normalize_range(v, profile));
        Ok(grid.insert_axis(Axis(0)))
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// The pair at `index`.
    pub fn get(&self, index: usize) -> Result<RangeImagePair> {
        let entry = self.index.get(index).ok_or(DatasetError::IndexOutOfRange {
            index,
            len: self.len(),
        })?;

        match &self.corpus {
            Some(corpus) => {
                let split = self.split_offset();
                let row = corpus.row(index);
                let (c_in, p_in) = self.profile_in.shape();
                let (c_out, p_out) = self.profile_out.shape();
                Ok(RangeImagePair {
                    input: row
                        .slice(s![..split])
                        .to_owned()
                        .into_shape_with_order((1, c_in, p_in))?,
                    output: row
                        .slice(s![split..])
                        .to_owned()
                        .into_shape_with_order((1, c_out, p_out))?,
                })
            }
            None => Ok(RangeImagePair {
                input: self.stream_grid(&entry.input, &self.profile_in)?,
                output: self.stream_grid(&entry.output, &self.profile_out)?,
            }),
        }
    }

    /// The pair whose output file is `<scene_id>/<res_out>/<scan_number>.rimg`.
    ///
    /// The path is matched exactly, so zero-padded file names are not found
    /// by their bare scan number.
    pub fn get_by_scan(&self, scene_id: &str, scan_number: u64) -> Result<RangeImagePair> {
        let expected = self.index.expected_output_path(scene_id, scan_number);
        let position =
            self.index
                .position_of_output(&expected)
                .ok_or_else(|| DatasetError::ScanNotFound {
                    scene: scene_id.to_string(),
                    scan: scan_number,
                })?;
        self.get(position)
    }

    pub fn is_preloaded(&self) -> bool {
        self.corpus.is_some()
    }

    /// Column where the output half starts in a corpus row.
    pub fn split_offset(&self) -> usize {
        self.profile_in.flat_len()
    }

    /// Bytes held by the corpus buffer; zero when streaming.
    pub fn memory_footprint(&self) -> usize {
        self.corpus
            .as_ref()
            .map_or(0, |c| c.len() * std::mem::size_of::<f32>())
    }

    pub fn profile_in(&self) -> &LidarProfile {
        &self.profile_in
    }

    pub fn profile_out(&self) -> &LidarProfile {
        &self.profile_out
    }

    pub fn pairs(&self) -> &PairIndex {
        &self.index
    }
}
