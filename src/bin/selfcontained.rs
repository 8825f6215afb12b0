//! run-benchmark-selfcontained
//!
//! Starts the server under test, runs the benchmark clients against it,
//! stops the server and prints the mean and standard deviation.

use bench_harness::{
    app::{execute, handle_parse_error, install_panic_hook},
    cli::SelfContainedCli,
    config::{CliSource, ConfigParser},
};
use clap::Parser;
use std::process;

#[tokio::main]
async fn main() {
    install_panic_hook();

    let cli = match SelfContainedCli::try_parse() {
        Ok(cli) => cli,
        Err(e) => process::exit(handle_parse_error(e)),
    };

    // Only used when the configuration itself cannot be built
    let use_color = cli.display.wants_color();
    let verbose = cli.display.verbose;

    let code = execute(ConfigParser::new(CliSource::SelfContained(cli)), use_color, verbose).await;
    process::exit(code);
}
