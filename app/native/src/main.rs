#![allow(clippy::multiple_crate_versions)]

//! Wallthumb - wallpaper thumbnail cache CLI.
//!
//! Logging goes to stderr and is controlled by the `WALLTHUMB_LOG` environment variable
//! (for example `WALLTHUMB_LOG=wallthumb_lib=debug`).

use tracing_subscriber::EnvFilter;
use wallthumb_lib::constants::LOG_ENV;

fn main() {
    init_tracing();

    if let Err(err) = wallthumb_lib::cli::run() {
        eprintln!("wallthumb: {err}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new("wallthumb_lib=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
