use std::path::PathBuf;
use std::process;

use keystone_bench::report;
use keystone_bench::runner::BenchmarkRunner;
use keystone_bench::scenes;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    let mut baseline_path: Option<PathBuf> = None;
    let mut output_path: Option<PathBuf> = None;
    let mut regression_threshold = 10.0f64;
    let mut iterations = 50u32;
    let mut scene_filter: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        let value = args.get(i + 1);
        match flag {
            "--baseline" | "--output" | "--regression-threshold" | "--iterations" | "--scene"
                if value.is_none() =>
            {
                eprintln!("Missing value for {}", flag);
                process::exit(1);
            }
            "--baseline" => baseline_path = value.map(PathBuf::from),
            "--output" => output_path = value.map(PathBuf::from),
            "--regression-threshold" => {
                regression_threshold = value
                    .and_then(|v| v.parse().ok())
                    .expect("invalid --regression-threshold value");
            }
            "--iterations" => {
                iterations = value
                    .and_then(|v| v.parse().ok())
                    .expect("invalid --iterations value");
            }
            "--scene" => scene_filter = value.cloned(),
            "--help" | "-h" => {
                eprintln!("Usage: bench-runner [OPTIONS]");
                eprintln!("  --baseline <path>              Load baseline JSON for comparison");
                eprintln!("  --output <path>                Save current results as JSON baseline");
                eprintln!(
                    "  --regression-threshold <pct>   Regression threshold percentage (default: 10)"
                );
                eprintln!("  --iterations <n>               Analysis runs per scene (default: 50)");
                eprintln!("  --scene <name>                 Only run scenes whose name contains <name>");
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                process::exit(1);
            }
        }
        i += 2;
    }

    let runner = BenchmarkRunner::new(iterations);

    let scene_configs: Vec<_> = scenes::standard_scenes()
        .into_iter()
        .filter(|s| scene_filter.as_deref().is_none_or(|f| s.name.contains(f)))
        .collect();
    if scene_configs.is_empty() {
        log::warn!("No scenes match the filter");
    }

    let results: Vec<_> = scene_configs
        .iter()
        .map(|config| runner.run_scene(config))
        .collect();

    // Print markdown summary
    println!("\n## Benchmark Results\n");
    println!("{}", report::format_markdown(&results));

    // Save output baseline
    if let Some(ref path) = output_path {
        let baseline = report::Baseline {
            timestamp: run_timestamp(),
            results: results.clone(),
        };
        report::save_baseline(path, &baseline).expect("failed to save baseline");
        log::info!("Saved baseline to {}", path.display());
    }

    // Compare against baseline
    if let Some(ref path) = baseline_path {
        if let Some(baseline) = report::load_baseline(path) {
            let regressions = report::compare(&results, &baseline, regression_threshold);
            println!(
                "{}",
                report::format_comparison(&regressions, regression_threshold)
            );
            if !regressions.is_empty() {
                eprintln!(
                    "ERROR: {} regressions detected, exiting with code 1",
                    regressions.len()
                );
                process::exit(1);
            }
        } else {
            log::warn!("Baseline file not found: {}", path.display());
        }
    }

    log::info!("Benchmark complete.");
}

/// Seconds since the Unix epoch, without a date-time dependency.
fn run_timestamp() -> String {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    format!("bench-{secs}")
}
