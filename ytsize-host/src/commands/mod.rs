//! Command implementations for the host.
//!
//! Each submodule contains the implementation of one mode of operation.

/// Native messaging mode, used when the browser launches the host.
pub mod serve;

/// Manual `--probe` mode for checking a URL from a terminal.
pub mod probe;
