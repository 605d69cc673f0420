//! Recursive Bayesian tracking of a signal's spread (e.g. the standard
//! deviation of surface EMG) on a fixed grid of candidate values.
pub mod config;
pub mod datasource;
pub mod session;
pub mod signal;
