//! Headless dustlight runner.
//!
//! Loads a simulation config from JSON (or uses defaults), steps it at a fixed
//! 60 Hz and logs respawn and light-volume statistics.
//!
//! Usage: `dustlight [config.json] [frames]`
//!
//! Set `RUST_LOG=debug` for per-frame respawn counts.

use anyhow::{Context, Result};
use dustlight::prelude::*;
use std::env;
use std::fs;

const DEFAULT_FRAMES: u64 = 600;
const REPORT_EVERY: u64 = 60;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let config = match args.get(1) {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {path}"))?;
            SimConfig::from_json(&json).with_context(|| format!("failed to load {path}"))?
        }
        None => SimConfig::default(),
    };
    let frames = match args.get(2) {
        Some(n) => n
            .parse::<u64>()
            .with_context(|| format!("frame count must be a non-negative integer, got {n:?}"))?,
        None => DEFAULT_FRAMES,
    };

    let mut sim = Simulation::new(config).context("failed to create simulation")?;
    let mut time = Time::new();
    time.set_fixed_delta(Some(1.0 / 60.0));

    log::info!(
        "running {frames} frames, light volume holds {:.1}% of particles",
        sim.inside_fraction() * 100.0
    );

    let mut respawned_total = 0usize;
    for _ in 0..frames {
        let (_, dt) = time.update();
        let report = sim.advance(dt);
        respawned_total += report.respawned;
        sim.mark_clean();

        if (report.frame + 1) % REPORT_EVERY == 0 {
            log::info!(
                "frame {:>6}: {:>7} respawned so far, {:.2}% lit",
                report.frame + 1,
                respawned_total,
                sim.inside_fraction() * 100.0
            );
        }
    }

    #[cfg(feature = "gpu")]
    compare_with_gpu(&sim);

    log::info!(
        "done: {} frames, {} respawns, {} of {} particles lit",
        sim.frame(),
        respawned_total,
        sim.inside_count(),
        sim.particle_count()
    );
    Ok(())
}

/// Run the GPU classifier over the final buffer and report disagreements.
#[cfg(feature = "gpu")]
fn compare_with_gpu(sim: &Simulation) {
    let classifier = match GpuClassifier::new() {
        Ok(classifier) => classifier,
        Err(e) => {
            log::warn!("skipping GPU comparison: {e}");
            return;
        }
    };
    match classifier.classify(sim.position_buffer(), sim.light_volume(), &sim.config().shading) {
        Ok(gpu) => {
            let mismatches = gpu
                .iter()
                .zip(sim.classifications())
                .filter(|(g, c)| **g != *c)
                .count();
            if mismatches == 0 {
                log::info!("GPU classifier agrees on all {} particles", gpu.len());
            } else {
                log::warn!("GPU classifier disagrees on {mismatches} particles");
            }
        }
        Err(e) => log::warn!("GPU classification failed: {e}"),
    }
}
