use std::iter::Sum;

use log::{trace, warn};
use ndarray::{Array1, ArrayView1, ScalarOperand};
use thiserror::Error;

pub use num_traits::{Float, One, Zero};

use crate::signal::grid::Grid;
use crate::signal::model::{LikelihoodModel, PointEstimate};
use crate::signal::params::FilterParams;

#[derive(Error, Debug, PartialEq)]
pub enum FilterStepError {
    #[error("observation batch is empty")]
    EmptyBatch,
    #[error("prior has {prior} weights but the grid has {grid} points")]
    DimensionMismatch { prior: usize, grid: usize },
    #[error(
        "posterior mass is {sum}, cannot normalize; rescale the grid, \
         use fewer samples per step or evaluate likelihoods in log space"
    )]
    DegeneratePosterior { sum: f64 },
}

///
/// Run one predict/update cycle of the grid filter.
///
/// The prior is spread and relaxed over the time covered by `emg`
/// (`emg.len() / sf` seconds), weighted by the likelihood of `emg` at every
/// grid value, and normalized. Returns the point estimate selected by
/// `params.point` together with the normalized posterior.
///
/// Nothing is returned unless the whole step succeeds.
///
pub fn filter_step<T>(
    emg: ArrayView1<T>,
    prior: ArrayView1<T>,
    params: &FilterParams<T>,
) -> Result<(T, Array1<T>), FilterStepError>
where
    T: Float + Copy + Sum + One + Zero + ScalarOperand,
{
    if emg.is_empty() {
        return Err(FilterStepError::EmptyBatch);
    }
    if prior.len() != params.pbins.len() {
        return Err(FilterStepError::DimensionMismatch {
            prior: prior.len(),
            grid: params.pbins.len(),
        });
    }
    let n = batch_len::<T>(emg.len());
    let dt = n / params.sf;
    let predicted = time_evolution(prior, dt, params);
    let likelihood = likelihood(emg, &params.pbins, params.model);
    let posterior = normalize(likelihood * predicted)?;
    let estimate = point_estimate(posterior.view(), &params.pbins, params.point);
    trace!(
        "filter step: n={} dt={:?} estimate={:?}",
        emg.len(),
        dt.to_f64(),
        estimate.to_f64()
    );
    Ok((estimate, posterior))
}

/// Forward-Euler step of diffusion plus relaxation over `dt` seconds, with
/// reflecting boundaries at both ends of the grid. The result is not
/// normalized. `prior` must be aligned with `params.pbins`; an empty prior
/// gives an empty result.
pub fn time_evolution<T>(prior: ArrayView1<T>, dt: T, params: &FilterParams<T>) -> Array1<T>
where
    T: Float + Copy + Sum + One + Zero + ScalarOperand,
{
    let Some(last) = prior.len().checked_sub(1) else {
        return Array1::zeros(0);
    };
    let dsigma = params.pbins.step();
    let two = T::one() + T::one();
    let diffusion = dt * params.alpha;
    let drift = dt * params.beta;
    Array1::from_iter((0..prior.len()).map(|i| {
        let left = if i > 0 { prior[i - 1] } else { prior[0] };
        let right = if i < last { prior[i + 1] } else { prior[last] };
        let laplacian = left - two * prior[i] + right;
        diffusion * laplacian / (dsigma * dsigma) + drift + (T::one() - drift) * prior[i]
    }))
}

/// Probability density of the whole batch at every grid value, up to a
/// constant factor shared by all grid points.
pub fn likelihood<T>(emg: ArrayView1<T>, pbins: &Grid<T>, model: LikelihoodModel) -> Array1<T>
where
    T: Float + Copy + Sum + One + Zero + ScalarOperand,
{
    let n = batch_len::<T>(emg.len());
    match model {
        LikelihoodModel::Gauss => {
            let half = T::one() / (T::one() + T::one());
            let energy: T = emg.iter().map(|&x| x * x).sum();
            pbins
                .values()
                .mapv(|s| (-half * energy / (s * s)).exp() / s.powf(n))
        }
        LikelihoodModel::Laplace => {
            let magnitude: T = emg.iter().map(|&x| x.abs()).sum();
            pbins
                .values()
                .mapv(|s| (-magnitude / s).exp() / s.powf(n))
        }
    }
}

/// Scale weights to unit sum.
pub fn normalize<T>(weights: Array1<T>) -> Result<Array1<T>, FilterStepError>
where
    T: Float + Copy + Sum + One + Zero + ScalarOperand,
{
    let sum: T = weights.iter().copied().sum();
    if !(sum > T::zero()) || !sum.is_finite() {
        let sum = sum.to_f64().unwrap_or(f64::NAN);
        warn!("degenerate posterior, total mass {sum}");
        return Err(FilterStepError::DegeneratePosterior { sum });
    }
    Ok(weights.mapv(|w| w / sum))
}

/// Read a single value out of a posterior. The maximum-a-posteriori readout
/// picks the first grid point on ties.
pub fn point_estimate<T>(posterior: ArrayView1<T>, pbins: &Grid<T>, mode: PointEstimate) -> T
where
    T: Float + Copy + Sum + One + Zero + ScalarOperand,
{
    match mode {
        PointEstimate::Map => {
            let mut best = 0;
            for (i, &w) in posterior.iter().enumerate() {
                if w > posterior[best] {
                    best = i;
                }
            }
            pbins.values()[best]
        }
        PointEstimate::Mean => posterior
            .iter()
            .zip(pbins.values().iter())
            .map(|(&w, &s)| w * s)
            .sum(),
    }
}

fn batch_len<T: Float>(n: usize) -> T {
    // Every usize is representable (possibly rounded) as a float.
    T::from(n).unwrap_or_else(T::infinity)
}
