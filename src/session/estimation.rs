use std::io::Write;
use std::path::Path;

use crate::config::{Config, GridConfig, PriorConfig};
use crate::signal::{
    FilterParams, Grid, GridError, InitialPrior, ObserverError, ParamsError, PosteriorObserver,
    SigmaTracker, TrackerError,
};
use ndarray::Array1;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("can't construct grid")]
    Grid(#[from] GridError),
    #[error("invalid filter parameters")]
    Params(#[from] ParamsError),
    #[error("can't set up tracker")]
    Tracker(#[source] TrackerError),
    #[error("estimation failed")]
    Estimation(#[source] TrackerError),
    #[error("can't open posterior dump file")]
    DebugDumpError(#[from] ObserverError),
    #[error("unable to write estimates")]
    Output(#[source] std::io::Error),
}

/// One entry of a run's output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedEstimate {
    /// Start of the window, in seconds from the first sample.
    pub time_s: f64,
    pub value: f64,
}

/// A complete estimation run: tracker plus an optional posterior dump.
pub struct EstimationSession {
    pub tracker: SigmaTracker<f64>,
    pub dumper: PosteriorObserver,
}

impl EstimationSession {
    pub fn new(tracker: SigmaTracker<f64>, dumper: PosteriorObserver) -> Self {
        EstimationSession { tracker, dumper }
    }

    pub fn from_config(
        config: &Config,
        dump_override: Option<&Path>,
    ) -> Result<EstimationSession, SessionError> {
        let tracker = tracker_from_config(config)?;
        let dump = match dump_override {
            Some(path) => PosteriorObserver::new_posterior_dumper(path, config.sample_rate)?,
            None => PosteriorObserver::null(),
        };
        Ok(EstimationSession::new(tracker, dump))
    }

    /// Push `samples` through the tracker, including a final partial
    /// window, writing "<time_s> <estimate>" lines to `out`.
    pub fn run(
        &mut self,
        samples: &Array1<f64>,
        out: &mut impl Write,
    ) -> Result<Vec<TimedEstimate>, SessionError> {
        let sf = self.tracker.params().sf;
        let mut estimates = Vec::new();
        let mut failure: Option<SessionError> = None;
        let dumper = &mut self.dumper;
        let mut record = |e: crate::signal::Estimate<'_, f64>| {
            if failure.is_some() {
                return;
            }
            let estimate = TimedEstimate {
                time_s: e.start as f64 / sf,
                value: e.value,
            };
            let written = writeln!(out, "{} {}", estimate.time_s, estimate.value)
                .map_err(SessionError::Output)
                .and_then(|_| dumper.observe(&e).map_err(SessionError::from));
            match written {
                Ok(()) => estimates.push(estimate),
                Err(err) => failure = Some(err),
            }
        };
        self.tracker
            .process(samples, &mut record)
            .map_err(SessionError::Estimation)?;
        self.tracker
            .finish(&mut record)
            .map_err(SessionError::Estimation)?;
        if let Some(err) = failure {
            return Err(err);
        }
        self.dumper.flush()?;
        out.flush().map_err(SessionError::Output)?;
        Ok(estimates)
    }
}

fn grid_from_config(grid: &GridConfig) -> Result<Grid<f64>, GridError> {
    match grid {
        GridConfig::Explicit { pbins } => Grid::try_from(pbins.clone()),
        GridConfig::Uniform { start, step, bins } => Grid::uniform(*start, *step, *bins),
    }
}

fn tracker_from_config(config: &Config) -> Result<SigmaTracker<f64>, SessionError> {
    let filter = &config.filter;
    let params = FilterParams::builder()
        .sample_rate(config.sample_rate)
        .grid(grid_from_config(&config.grid)?)
        .alpha(filter.alpha)
        .beta(filter.beta)
        .model_name(&filter.model)
        .pointmax(filter.pointmax)
        .build()?;
    let prior = match config.prior {
        PriorConfig::Uniform => InitialPrior::Uniform,
        PriorConfig::Delta { at } => InitialPrior::Delta(at),
    };
    SigmaTracker::builder()
        .params(params)
        .window(config.window)
        .prior(prior)
        .build()
        .map_err(SessionError::Tracker)
}
