//! Grid-based Bayesian estimation of a signal's spread.
//!
//! `filter::bayes` holds the single predict/update step; `block` chains
//! steps over a sample stream.
pub mod block;
pub mod debug;
pub mod filter;
pub mod grid;
pub mod model;
pub mod params;

pub use block::tracker::{
    Estimate, InitialPrior, SigmaTracker, SigmaTrackerBuilder, TrackerError, DEFAULT_WINDOW,
};
pub use debug::{ObserverError, PosteriorDumper, PosteriorObserver};
pub use filter::bayes::{
    filter_step, likelihood, normalize, point_estimate, time_evolution, FilterStepError,
};
pub use grid::{Grid, GridError};
pub use model::{LikelihoodModel, ModelError, PointEstimate};
pub use params::{FilterParams, FilterParamsBuilder, ParamsError};
