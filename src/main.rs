// src/main.rs

use env_logger::Env;
use log::{error, info, warn};
use num::BigInt;
use quadsieve::config::QsConfig;
use quadsieve::core::cancellation_token::CancellationToken;
use quadsieve::core::counters::Counters;
use quadsieve::pipeline;
use std::str::FromStr;

fn main() {
    // Load configuration first (before logging is initialized).
    let config = QsConfig::load().unwrap_or_else(|e| {
        eprintln!("Warning: failed to load config: {}. Using defaults.", e);
        QsConfig::default()
    });

    // Parse command-line arguments: the integer to factor is required.
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Please indicate the integer to factor");
        eprintln!("Usage: {} <integer>", args[0]);
        eprintln!("Example: {} 5959", args[0]);
        std::process::exit(1);
    }

    let n = match BigInt::from_str(&args[1]) {
        Ok(n) => n,
        Err(e) => {
            eprintln!("Error parsing integer '{}': {}", args[1], e);
            std::process::exit(1);
        }
    };

    // Initialize logging from config, overridable with QS_LOG_LEVEL.
    let log_level = std::env::var("QS_LOG_LEVEL").unwrap_or_else(|_| config.log_level.clone());
    let env = Env::default()
        .filter_or("QS_LOG_LEVEL", log_level)
        .write_style_or("QS_LOG_STYLE", "always");
    env_logger::Builder::from_env(env).init();

    // Configure the Rayon thread pool for the sieve phase.
    let num_threads = config.threads.unwrap_or_else(num_cpus::get);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
        .expect("Failed to configure thread pool");

    info!("work directory: {}", config.work_dir);
    info!("shard size: {}", config.shard_size);
    info!("threads: {} (total cores: {})", num_threads, num_cpus::get());

    // Graceful shutdown: CTRL-C cancels cooperatively between shards and
    // between combine attempts.
    let token = CancellationToken::new();
    let handler_token = token.clone();
    ctrlc::set_handler(move || {
        warn!("CTRL-C received, cancelling");
        handler_token.cancel();
    })
    .expect("Error setting CTRL-C handler");

    let counters = Counters::new();
    match pipeline::run(&n, &config, &counters, &token) {
        Ok(solution) => {
            println!("{}", solution);
        }
        Err(e) => {
            error!("factorization of {} failed: {}", n, e);
            std::process::exit(1);
        }
    }
}
