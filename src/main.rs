//! Offline spread estimator: reads samples from a text file, tracks their
//! dispersion with a grid Bayes filter and prints one estimate per window.
use sigma_filter::config::Config;
use sigma_filter::datasource::DataSource;
use sigma_filter::session::EstimationSession;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::io::{self, BufWriter};
use std::path::PathBuf;

const ENV_PREFIX: &str = "SIGMAFILT";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Parser)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(name = env!("CARGO_BIN_NAME"))]
/// Bayesian spread (dispersion) tracker
///
/// JSON Configuration Syntax:
///
/// Config = {
///     ( "sample_rate" : number )*,
///     ( "window" : number )*,
///     "grid" : Grid,
///     ( "prior" : Prior )*,
///     ( "filter" : Filter )*,
/// };
/// Grid = { "pbins" : [ number+ ] } | { "start" : number, "step" : number, "bins" : number };
/// Prior = { "kind" : "uniform" } | { "kind" : "delta", "at" : number };
/// Filter = {
///     ( "alpha" : number )*,
///     ( "beta" : number )*,
///     ( "model" : "Gauss" | "Laplace" )*,
///     ( "pointmax" : bool )*,
/// };
///
/// Any value may be overridden from the environment, e.g.
/// SIGMAFILT_FILTER__ALPHA=0.02.
pub struct Cli {
    /// Configuration file to use (JSON format)
    #[arg(short = 'c')]
    config_path: PathBuf,

    /// Sample file, one sample per line (last column is used). "-" reads
    /// standard input.
    #[arg(short = 'f')]
    input_path: PathBuf,

    /// Dump the posterior of every window to a file.
    #[arg(short = 'o', value_names = [ "dump-path" ])]
    debug_output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = Config::new(&cli.config_path, ENV_PREFIX, ENV_SEPARATOR)
        .context("Failed to load config file")?;

    let mut source =
        DataSource::new_textfile_source(&cli.input_path).context("Failed to open sample input")?;
    let samples = source
        .next()
        .context("No samples in input")?
        .context("Failed to read samples")?;
    info!(
        "{} samples at {} Hz, {} per window",
        samples.len(),
        config.sample_rate,
        config.window
    );

    let mut session = EstimationSession::from_config(&config, cli.debug_output.as_deref())
        .context("Failed to configure estimator")?;
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let estimates = session.run(&samples, &mut out)?;
    info!("{} estimates written", estimates.len());

    Ok(())
}
