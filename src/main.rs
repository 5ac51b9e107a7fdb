/// shred - Secure file deletion
///
/// For each path:
/// 1. Overwrite the file with random data (3 passes by default)
/// 2. Sync every pass to stable storage
/// 3. Delete the file
///
/// Exit codes: 0 all paths shredded, 1 at least one path failed,
/// 2 configuration error.
use std::process::ExitCode;

use clap::Parser;
use kc_shred::cli::Cli;
use kc_shred::{Config, Shredder};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.resolve_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("shred: {}", e);
            return ExitCode::from(2);
        }
    };

    init_logging(&config);

    match run(&cli, &config) {
        0 => ExitCode::SUCCESS,
        failed => {
            tracing::error!(failed, total = cli.paths.len(), "some files were not shredded");
            ExitCode::from(1)
        }
    }
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_lowercase()));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Shred every path in order; returns how many failed.
fn run(cli: &Cli, config: &Config) -> usize {
    let mut shredder = Shredder::from_config(config);
    let mut failed = 0;

    for path in &cli.paths {
        match shredder.shred(path) {
            Ok(()) => {}
            Err(e) if e.is_not_found() && config.ignore_missing => {
                tracing::warn!(path = %path.display(), "no such file, skipping");
            }
            Err(e) if e.content_destroyed() => {
                tracing::warn!("{}", e);
                failed += 1;
            }
            Err(e) => {
                tracing::error!("{}", e);
                failed += 1;
            }
        }
    }

    tracing::debug!(total = cli.paths.len(), failed, "done");
    failed
}
