use std::hint::black_box;
use std::time::Instant;

use keystone_core::config::EngineConfig;
use keystone_core::cube::Cube;
use keystone_sim::store::StructureStore;
use keystone_sim::structural::{analyze, analyze_pairwise};

use crate::scenes::{generate_scene, SceneConfig};

/// Scenes up to this size are cross-checked against the O(n²) analysis.
const PAIRWISE_CHECK_LIMIT: usize = 5_000;

/// Timing data for a single benchmark run.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TimingSeries {
    pub mean_ms: f64,
    pub median_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

/// Result of a single scene benchmark.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct BenchmarkResult {
    pub scene_name: String,
    pub cube_count: u32,
    pub unstable_count: u32,
    pub iterations: u32,
    /// Per-iteration `analyze` times.
    pub timings: TimingSeries,
    /// One full confirm through the structure store, analysis included.
    pub confirm_ms: f64,
}

/// Times the support analysis on synthetic structures.
pub struct BenchmarkRunner {
    iterations: u32,
}

impl BenchmarkRunner {
    pub fn new(iterations: u32) -> Self {
        Self {
            iterations: iterations.max(1),
        }
    }

    /// Run a single benchmark scene and return timing results.
    pub fn run_scene(&self, config: &SceneConfig) -> BenchmarkResult {
        log::info!(
            "Running scene '{}' ({} target cubes)...",
            config.name,
            config.target_cubes
        );

        let cubes = generate_scene(config);
        log::info!("  Generated {} cubes", cubes.len());

        // Warm-up run, also the reference result
        let report = analyze(&cubes);
        if cubes.len() <= PAIRWISE_CHECK_LIMIT {
            let reference = analyze_pairwise(&cubes);
            if reference != report {
                log::error!(
                    "  Scene '{}': spatial-hash and pairwise analysis disagree",
                    config.name
                );
            }
        }

        let mut frame_times = Vec::with_capacity(self.iterations as usize);
        for _ in 0..self.iterations {
            let start = Instant::now();
            black_box(analyze(black_box(&cubes)));
            frame_times.push(start.elapsed().as_secs_f64() * 1000.0);
        }

        let confirm_ms = time_confirm(&cubes);
        let timings = compute_timings(&frame_times);
        log::info!(
            "  Done: mean={:.3}ms, p95={:.3}ms, confirm={:.3}ms, unstable={}",
            timings.mean_ms,
            timings.p95_ms,
            confirm_ms,
            report.unstable.len()
        );

        BenchmarkResult {
            scene_name: config.name.to_string(),
            cube_count: cubes.len() as u32,
            unstable_count: report.unstable.len() as u32,
            iterations: self.iterations,
            timings,
            confirm_ms,
        }
    }
}

/// Place every cube as a draft in a fresh store, then time the confirm.
fn time_confirm(cubes: &[Cube]) -> f64 {
    let Some(first) = cubes.first() else {
        return 0.0;
    };
    let mut store = StructureStore::new(EngineConfig::default(), (*first.material).clone());
    for cube in cubes {
        if let Err(e) = store.place_cell(cube.cell, cube.material.clone()) {
            log::warn!("  Skipping cube {}: {e}", cube.id);
        }
    }

    let start = Instant::now();
    if let Err(e) = store.confirm_draft() {
        log::warn!("  Confirm refused: {e}");
    }
    start.elapsed().as_secs_f64() * 1000.0
}

/// Compute timing statistics from a list of frame times in milliseconds.
pub fn compute_timings(times: &[f64]) -> TimingSeries {
    if times.is_empty() {
        return TimingSeries {
            mean_ms: 0.0,
            median_ms: 0.0,
            p95_ms: 0.0,
            p99_ms: 0.0,
            min_ms: 0.0,
            max_ms: 0.0,
        };
    }

    let mut sorted = times.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };
    let p95_idx = ((n as f64) * 0.95).ceil() as usize;
    let p99_idx = ((n as f64) * 0.99).ceil() as usize;

    TimingSeries {
        mean_ms: mean,
        median_ms: median,
        p95_ms: sorted[p95_idx.min(n - 1)],
        p99_ms: sorted[p99_idx.min(n - 1)],
        min_ms: sorted[0],
        max_ms: sorted[n - 1],
    }
}
