//! Tracing subscriber setup for the command-line tool

use tracing_subscriber::EnvFilter;

/// Default filter directive for a verbosity level
///
/// `quiet` limits output to errors; otherwise each `-v` adds a level on top
/// of `info`.
pub const fn default_directive(verbosity: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Install the global fmt subscriber writing to stderr
///
/// `RUST_LOG` takes precedence over the verbosity flags. Calling this more
/// than once keeps the first subscriber.
pub fn init_logging(verbosity: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity, quiet)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
