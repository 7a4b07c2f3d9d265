use bevy::prelude::*;

use clap::Parser;
use gamemath::math::determinism::{load_trace, run_scenario, save_trace};
use gamemath::math::{
    shutdown_game_math, GameMath, GameMathPlugin, MathConfig, DEFAULT_CONFIG_PATH,
};

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Runs the fast-math determinism scenario and compares it against a trace
/// recorded on another machine.
#[derive(Parser, Debug)]
#[command(name = "determinism_check", version)]
struct Args {
    /// Math config file (RON).
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Steps to run, overriding the config.
    #[arg(long)]
    samples: Option<usize>,

    /// Input sequence seed, overriding the config.
    #[arg(long)]
    seed: Option<u64>,

    /// Write the trace here.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Compare against a previously written trace.
    #[arg(long)]
    compare: Option<PathBuf>,

    /// Write the effective config as RON and exit.
    #[arg(long)]
    dump_config: Option<PathBuf>,
}

fn setup_file_logging() -> String {
    // Create logs directory if it doesn't exist
    let log_dir = PathBuf::from("logs");
    if let Err(e) = fs::create_dir_all(&log_dir) {
        eprintln!("Failed to create logs directory: {}", e);
    }

    cleanup_old_logs(&log_dir, 25);

    let now = chrono::Local::now();
    let log_filename = format!("gamemath_{}.log", now.format("%Y%m%d_%H%M%S"));
    let log_path_str = log_dir.join(&log_filename).to_string_lossy().to_string();

    let file_appender = RollingFileAppender::new(Rotation::NEVER, &log_dir, &log_filename);

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false);

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(false);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("gamemath=info,determinism_check=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();

    log_path_str
}

fn cleanup_old_logs(log_dir: &PathBuf, keep_count: usize) {
    if let Ok(entries) = fs::read_dir(log_dir) {
        let mut log_files: Vec<_> = entries
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(|s| s.starts_with("gamemath") && s.ends_with(".log"))
                    .unwrap_or(false)
            })
            .collect();

        // Oldest first
        log_files.sort_by_key(|e| e.metadata().ok().and_then(|m| m.modified().ok()));

        if log_files.len() > keep_count {
            for file in log_files.iter().take(log_files.len() - keep_count) {
                let _ = fs::remove_file(file.path());
            }
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    let log_file = setup_file_logging();
    info!("Logging to {}", log_file);

    let mut app = App::new();
    app.add_plugins(GameMathPlugin::with_config_path(&args.config));

    let config = app.world().resource::<MathConfig>().clone();

    if let Some(path) = &args.dump_config {
        return match config.save(&path.to_string_lossy()) {
            Ok(()) => {
                info!("Wrote config to {}", path.display());
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("Failed to write config to {}: {}", path.display(), e);
                ExitCode::FAILURE
            }
        };
    }

    let seed = args.seed.unwrap_or(config.scenario_seed);
    let samples = args.samples.unwrap_or(config.scenario_samples);

    let math = app.world().resource::<GameMath>().clone();
    let trace = run_scenario(&math, seed, samples);
    drop(math);

    info!(
        "Scenario seed {:#x}, {} steps, {} outputs, digest {:#010x}",
        seed,
        samples,
        trace.outputs.len(),
        trace.digest()
    );

    let mut status = ExitCode::SUCCESS;

    if let Some(path) = &args.out {
        match save_trace(&path.to_string_lossy(), &trace) {
            Ok(()) => info!("Saved trace to {}", path.display()),
            Err(e) => {
                error!("Failed to save trace to {}: {}", path.display(), e);
                status = ExitCode::FAILURE;
            }
        }
    }

    if let Some(path) = &args.compare {
        match load_trace(&path.to_string_lossy()) {
            Ok(reference) if reference.seed != seed || reference.sample_count != samples => {
                error!(
                    "Reference trace uses seed {:#x} and {} steps, rerun with matching flags",
                    reference.seed, reference.sample_count
                );
                status = ExitCode::FAILURE;
            }
            Ok(reference) => match trace.first_divergence(&reference) {
                None => info!(
                    "Trace matches {} (digest {:#010x})",
                    path.display(),
                    reference.digest()
                ),
                Some(i) => {
                    error!(
                        "DESYNC: output {} (step {}) differs from {}: {:#010x} vs {:#010x}",
                        i,
                        i / gamemath::math::determinism::OUTPUTS_PER_STEP,
                        path.display(),
                        trace.outputs.get(i).copied().unwrap_or_default(),
                        reference.outputs.get(i).copied().unwrap_or_default()
                    );
                    status = ExitCode::FAILURE;
                }
            },
            Err(e) => {
                error!("Failed to load trace {}: {}", path.display(), e);
                status = ExitCode::FAILURE;
            }
        }
    }

    shutdown_game_math(app.world_mut());
    status
}
