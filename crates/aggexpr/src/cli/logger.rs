//! Logging backend for the `log` facade used across the workspace

use log::LevelFilter;

/// Level for a `-v` count: warnings by default, then info, debug, trace
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Builder for the stderr logger. `RUST_LOG` directives are applied on top
/// of the level picked by `-v`.
pub fn builder(verbosity: u8) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level_for(verbosity))
        .parse_env(env_logger::Env::default())
        .format_timestamp(None)
        .target(env_logger::Target::Stderr);
    builder
}

/// Install the logger. A logger installed earlier wins.
pub fn init(verbosity: u8) {
    if let Err(err) = builder(verbosity).try_init() {
        log::debug!("logger already installed: {}", err);
    }
}
