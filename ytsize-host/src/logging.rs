// ============================================================================
// ytsize-host/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: env_logger Backend on Stderr
//
// The host uses the standard `log` crate with `env_logger` as the backend.
// Output always goes to stderr: stdout carries the native messaging protocol
// and a single stray byte there corrupts the response.
//
// USAGE:
// - default: info and above
// - --verbose: debug and above, including the engine's selection trace
// - RUST_LOG: overrides both (e.g. RUST_LOG=ytsize_core=trace)

use env_logger::{Builder, Target};
use log::LevelFilter;
use std::io::Write;

/// Installs the logger. Calling it twice is harmless.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let result = Builder::new()
        .target(Target::Stderr)
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| {
            let level_str = match record.level() {
                log::Level::Error => "ERROR",
                log::Level::Warn => "WARN ",
                log::Level::Info => "INFO ",
                log::Level::Debug => "DEBUG",
                log::Level::Trace => "TRACE",
            };
            writeln!(buf, "[host] {} {} {}", buf.timestamp(), level_str, record.args())
        })
        .try_init();

    if result.is_ok() {
        log::debug!("Logger initialized with level: {}", level);
    }
}
