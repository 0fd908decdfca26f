use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;
use ndarray::Array3;

use rimg_pairs::data::manifest::write_manifest_file;
use rimg_pairs::{DatasetConfig, RangeImagePair, ResolutionTag, SampleStore};

/// Inspect a paired range-image dataset.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Dataset configuration file (.yaml, .yml or .json)
    #[arg(short, long, conflicts_with_all = ["directory", "scenes"])]
    config: Option<PathBuf>,

    /// Dataset directory holding scenes and lidar_specification.yaml
    #[arg(short, long)]
    directory: Option<PathBuf>,

    /// Scene ids, comma separated
    #[arg(short, long, value_delimiter = ',')]
    scenes: Vec<String>,

    /// Input resolution tag
    #[arg(long, default_value = "16_1024")]
    res_in: ResolutionTag,

    /// Output resolution tag
    #[arg(long, default_value = "64_1024")]
    res_out: ResolutionTag,

    /// Read pairs on demand instead of preloading the corpus
    #[arg(long)]
    streaming: bool,

    /// Print statistics of the pair at this index
    #[arg(short, long)]
    index: Option<usize>,

    /// Print statistics of the pair for `<scene>:<scan_number>`
    #[arg(long)]
    scan: Option<String>,

    /// Write the pair list to this CSV file
    #[arg(short, long)]
    manifest: Option<PathBuf>,
}

impl Args {
    fn dataset_config(&self) -> Result<DatasetConfig> {
        if let Some(path) = &self.config {
            let mut cfg = DatasetConfig::load_file(path)
                .with_context(|| format!("loading {}", path.display()))?;
            if self.streaming {
                cfg.preload = false;
            }
            return Ok(cfg);
        }

        let Some(directory) = &self.directory else {
            bail!("either --config or --directory is required");
        };
        if self.scenes.is_empty() {
            bail!("--scenes must name at least one scene");
        }
        Ok(DatasetConfig::new(
            directory.clone(),
            self.scenes.clone(),
            self.res_in,
            self.res_out,
            !self.streaming,
        ))
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = args.dataset_config()?;
    let store = SampleStore::open(&config)
        .with_context(|| format!("opening dataset at {}", config.directory.display()))?;

    println!(
        "{} pairs, {} -> {}, {}",
        store.len(),
        config.res_in,
        config.res_out,
        if store.is_preloaded() {
            format!(
                "preloaded ({:.1} MiB)",
                store.memory_footprint() as f64 / (1024.0 * 1024.0)
            )
        } else {
            "streaming".to_string()
        }
    );

    if let Some(index) = args.index {
        let pair = store
            .get(index)
            .with_context(|| format!("reading pair {index}"))?;
        print_pair(&format!("#{index}"), &pair);
    }

    if let Some(spec) = &args.scan {
        let (scene, scan) = spec
            .rsplit_once(':')
            .context("--scan expects <scene>:<scan_number>")?;
        let scan: u64 = scan
            .parse()
            .with_context(|| format!("'{scan}' is not a scan number"))?;
        let pair = store
            .get_by_scan(scene, scan)
            .with_context(|| format!("looking up {spec}"))?;
        print_pair(spec, &pair);
    }

    if let Some(path) = &args.manifest {
        write_manifest_file(store.pairs(), path)
            .with_context(|| format!("writing manifest {}", path.display()))?;
        info!("manifest written to {}", path.display());
    }

    Ok(())
}

fn print_pair(label: &str, pair: &RangeImagePair) {
    for (name, grid) in [("input", &pair.input), ("output", &pair.output)] {
        let (min, max, mean) = stats(grid);
        println!(
            "{label} {name:<6} {:?}  min {min:+.4}  max {max:+.4}  mean {mean:+.4}",
            grid.dim()
        );
    }
}

fn stats(grid: &Array3<f32>) -> (f32, f32, f32) {
    let min = grid.iter().copied().fold(f32::INFINITY, f32::min);
    let max = grid.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let mean = grid.mean().unwrap_or(f32::NAN);
    (min, max, mean)
}
