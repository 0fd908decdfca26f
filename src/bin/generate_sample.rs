use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use ndarray::Array2;

use rimg_pairs::data::profile::LIDAR_SPECIFICATION_FILE;
use rimg_pairs::{DatasetConfig, LidarProfile, RimgCodec};

/// Write a small synthetic paired range-image dataset.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Output dataset directory
    #[arg(short, long, default_value = "sample_data")]
    output: PathBuf,

    /// Scene ids, comma separated
    #[arg(short, long, value_delimiter = ',', default_value = "town01,town02")]
    scenes: Vec<String>,

    /// Scans per scene
    #[arg(short = 'n', long, default_value_t = 10)]
    scans: usize,

    /// PRNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f32(&mut self) -> f32 {
        ((self.next_u64() >> 40) as f32) / (1u64 << 24) as f32
    }
}

/// A room-like scene: walls at a distance that varies with azimuth and
/// elevation, a few dropped returns and some far-away hits.
fn generate_range_image(
    profile: &LidarProfile,
    scan: usize,
    rng: &mut SimpleRng,
) -> Array2<f32> {
    let (channels, points) = profile.shape();
    let drift = scan as f32 * 0.25;
    Array2::from_shape_fn((channels, points), |(ring, slot)| {
        let azimuth = slot as f32 / points as f32 * std::f32::consts::TAU;
        let elevation = ring as f32 / channels as f32;
        let r = rng.next_f32();
        if r < 0.03 {
            0.0
        } else if r > 0.98 {
            profile.max_range * 1.5
        } else {
            let wall = 12.0 + 8.0 * (azimuth * 2.0 + drift).sin().abs();
            wall * (0.6 + 0.4 * elevation) + rng.next_f32() * 0.05
        }
    })
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);

    let low = LidarProfile {
        min_v: Some(-15.0),
        max_v: Some(15.0),
        ..LidarProfile::new(16, 1024, 1.0, 80.0, 100.0)
    };
    let high = LidarProfile {
        min_v: Some(-15.0),
        max_v: Some(15.0),
        ..LidarProfile::new(64, 1024, 1.0, 80.0, 100.0)
    };

    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    let spec_path = args.output.join(LIDAR_SPECIFICATION_FILE);
    let yaml = serde_yaml::to_string(&[low, high]).context("serializing LiDAR profiles")?;
    std::fs::write(&spec_path, yaml)
        .with_context(|| format!("writing {}", spec_path.display()))?;

    let codec = RimgCodec;
    for scene in &args.scenes {
        for profile in [&low, &high] {
            let dir = args
                .output
                .join(scene)
                .join(format!("{}_{}", profile.channels, profile.points_per_ring));
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("creating {}", dir.display()))?;
            for scan in 0..args.scans {
                let grid = generate_range_image(profile, scan, &mut rng);
                // unpadded names keep `get_by_scan` lookups working
                codec
                    .write(&dir.join(format!("{scan}.rimg")), &grid)
                    .with_context(|| format!("writing scan {scan} of {scene}"))?;
            }
        }
        info!("{scene}: {} scans", args.scans);
    }

    write_config(&args.output, &args.scenes)?;

    println!(
        "Wrote {} scenes x {} scans to {}",
        args.scenes.len(),
        args.scans,
        args.output.display()
    );
    Ok(())
}

fn write_config(output: &Path, scenes: &[String]) -> Result<()> {
    let config = DatasetConfig::new(
        output,
        scenes.to_vec(),
        "16_1024".parse()?,
        "64_1024".parse()?,
        true,
    );
    let path = output.join("dataset.yaml");
    let yaml = serde_yaml::to_string(&config).context("serializing dataset config")?;
    std::fs::write(&path, yaml).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
