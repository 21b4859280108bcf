// ytsize-host/src/main.rs
//
// Entry point for the ytsize native messaging host.
//
// Responsibilities include:
// - Parsing command-line arguments, including the ones the browser appends.
// - Setting up logging on stderr.
// - Dispatching to native messaging mode or manual probing.
// - Managing process exit codes based on success or failure.

use clap::Parser;
use log::{debug, error};
use std::process;
use ytsize_host::{Cli, logging, run_native_host, run_probe};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if !cli.browser_args.is_empty() {
        debug!("Launched with browser arguments: {:?}", cli.browser_args);
    }

    let config = cli.core_config();
    let result = match cli.probe.as_deref() {
        Some(url) => run_probe(url, cli.duration_hint, cli.json, &config),
        None => run_native_host(&config),
    };

    if let Err(e) = result {
        error!("{}", e);
        process::exit(1);
    }
}
