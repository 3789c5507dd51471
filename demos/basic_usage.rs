//! Basic usage of loamfeat
//!
//! Builds a synthetic 16-beam sweep of a room with a pillar standing in front
//! of one wall, extracts edge and planar features from it, and then runs a
//! short batch of frames in parallel.
//!
//! Run with `RUST_LOG=debug` to see the per-stage summaries.

use anyhow::Context;
use loamfeat_algorithms::FeatureExtractor;
use loamfeat_core::{ExtractionConfig, PointCloud, RingPoint};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const RINGS: u32 = 16;
const STEPS: usize = 1800;

/// One sweep: azimuth-major, all rings per step, 2cm range noise
fn synthetic_sweep(rng: &mut StdRng, yaw: f32) -> PointCloud<RingPoint> {
    let mut points = Vec::with_capacity(STEPS * RINGS as usize);
    for step in 0..STEPS {
        let fraction = step as f32 / STEPS as f32;
        let theta = 2.0 * std::f32::consts::PI * fraction + yaw;
        let (sin, cos) = theta.sin_cos();

        let mut range = (8.0 / cos.abs()).min(6.0 / sin.abs());
        // Pillar in front of the +x wall
        if theta.rem_euclid(2.0 * std::f32::consts::PI) < 0.08 {
            range = 4.0;
        }

        for ring in 0..RINGS {
            let elevation = (ring as f32 - 7.5) * 2.0_f32.to_radians();
            let noisy = range + rng.gen_range(-0.01..0.01);
            points.push(
                RingPoint::new(noisy * cos, noisy * sin, noisy * elevation.tan(), ring)
                    .with_intensity(rng.gen_range(0.0..255.0))
                    .with_time(fraction),
            );
        }
    }
    PointCloud::from_points(points)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("loamfeat basic usage");
    println!("====================");

    let config = ExtractionConfig::default().with_ring_count(RINGS);
    let extractor = FeatureExtractor::new(config).context("invalid extraction config")?;
    let mut rng = StdRng::seed_from_u64(7);

    let scan = synthetic_sweep(&mut rng, 0.0);
    println!("Sweep with {} points over {} rings", scan.len(), RINGS);

    let features = extractor.extract(&scan).context("feature extraction failed")?;
    let counts = features.counts();
    println!("\nFeatures:");
    println!("- sharp corners:      {}", counts.sharp_corners);
    println!("- less sharp corners: {}", counts.less_sharp_corners);
    println!("- flat surfaces:      {}", counts.flat_surfaces);
    println!("- less flat surfaces: {}", counts.less_flat_surfaces);

    if let Some(corner) = features.sharp_corners.iter().next() {
        println!(
            "\nFirst sharp corner at ({:.2}, {:.2}, {:.2}) on ring {}",
            corner.position.x, corner.position.y, corner.position.z, corner.ring
        );
    }

    let frames: Vec<_> = (0..4)
        .map(|i| synthetic_sweep(&mut rng, i as f32 * 0.01))
        .collect();
    println!("\nBatch of {} frames:", frames.len());
    for (i, result) in extractor.extract_batch(&frames).into_iter().enumerate() {
        let counts = result.with_context(|| format!("frame {i} failed"))?.counts();
        println!(
            "- frame {}: {} sharp, {} flat",
            i, counts.sharp_corners, counts.flat_surfaces
        );
    }

    // A sensor/config mismatch is reported, not silently tolerated
    let wrong = FeatureExtractor::new(ExtractionConfig::default().with_ring_count(32))?;
    if let Err(err) = wrong.extract(&scan) {
        log::warn!("expected failure with 32 rings configured: {err}");
        println!("\nWith 32 rings configured: {err}");
    }

    Ok(())
}
