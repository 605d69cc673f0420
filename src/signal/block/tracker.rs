use std::iter::Sum;

use log::debug;
use ndarray::{Array1, ArrayView1, ScalarOperand};
use thiserror::Error;

pub use num_traits::{Float, One, Zero};

use crate::signal::filter::bayes::{filter_step, FilterStepError};
use crate::signal::params::FilterParams;

/// Samples per filter step when none is configured.
pub const DEFAULT_WINDOW: usize = 100;

#[derive(Error, Debug, PartialEq)]
pub enum TrackerError {
    #[error("no filter parameters supplied")]
    MissingParams,
    #[error("window must hold at least one sample")]
    ZeroWindow,
    #[error("initial prior has {prior} weights but the grid has {grid} points")]
    PriorLength { prior: usize, grid: usize },
    #[error("filter step failed")]
    Step(#[from] FilterStepError),
}

/// Distribution a tracker starts from (and returns to on reset).
#[derive(Debug, Clone)]
pub enum InitialPrior<T> {
    /// Equal weight on every grid point.
    Uniform,
    /// All weight on the grid point nearest to the given value.
    Delta(T),
    /// Caller-supplied weights, aligned with the grid.
    Custom(Array1<T>),
}

/// One readout of the tracked parameter.
pub struct Estimate<'a, T> {
    /// Absolute index of the first sample of the window.
    pub start: usize,
    /// Number of samples that went into this step.
    pub len: usize,
    pub value: T,
    pub posterior: ArrayView1<'a, T>,
}

/// Sequential estimator that chains filter steps over a sample stream.
///
/// Samples are gathered into fixed-size windows. Each complete window is
/// one filter step whose posterior becomes the prior of the next.
///
/// Signal flow (per window)
///
/// 1. Spread the current distribution over the window's duration.
/// 2. Weight it by the window's likelihood and normalize.
/// 3. Report the point estimate.
pub struct SigmaTracker<T>
where
    T: Float + Copy + Sum + One + Zero + ScalarOperand,
{
    params: FilterParams<T>,
    window: usize,
    initial: Array1<T>,
    distribution: Array1<T>,
    pending: Vec<T>,

    /// Number of samples consumed by completed steps.
    processed: usize,
}

impl<T: Float + Copy + Sum + One + Zero + ScalarOperand> SigmaTracker<T> {
    pub fn builder() -> SigmaTrackerBuilder<T> {
        SigmaTrackerBuilder::new()
    }

    pub fn reset(&mut self) {
        self.distribution = self.initial.clone();
        self.pending.clear();
        self.processed = 0;
    }

    /// Feed samples in. Every window completed by them produces one
    /// estimate, handed to `obs`. Returns the number of estimates made.
    ///
    /// On error the distribution stays at the last good posterior and the
    /// failed window is dropped.
    pub fn process(
        &mut self,
        input: &Array1<T>,
        mut obs: impl FnMut(Estimate<'_, T>),
    ) -> Result<usize, TrackerError> {
        self.pending.extend(input.iter().copied());
        let mut steps = 0;
        while self.pending.len() >= self.window {
            let batch: Vec<T> = self.pending.drain(..self.window).collect();
            self.step(&batch, &mut obs)?;
            steps += 1;
        }
        Ok(steps)
    }

    /// Run a final, shorter step over samples left over from `process`.
    pub fn finish(&mut self, mut obs: impl FnMut(Estimate<'_, T>)) -> Result<usize, TrackerError> {
        if self.pending.is_empty() {
            return Ok(0);
        }
        let batch = std::mem::take(&mut self.pending);
        self.step(&batch, &mut obs)?;
        Ok(1)
    }

    fn step(
        &mut self,
        batch: &[T],
        obs: &mut impl FnMut(Estimate<'_, T>),
    ) -> Result<(), TrackerError> {
        let start = self.processed;
        self.processed += batch.len();
        let (value, posterior) = filter_step(
            ArrayView1::from(batch),
            self.distribution.view(),
            &self.params,
        )?;
        debug!(
            "window at sample {start}: {} samples, estimate {:?}",
            batch.len(),
            value.to_f64()
        );
        self.distribution = posterior;
        obs(Estimate {
            start,
            len: batch.len(),
            value,
            posterior: self.distribution.view(),
        });
        Ok(())
    }

    /// Current distribution over the grid.
    pub fn distribution(&self) -> &Array1<T> {
        &self.distribution
    }

    pub fn params(&self) -> &FilterParams<T> {
        &self.params
    }

    /// Samples buffered towards the next window.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

pub struct SigmaTrackerBuilder<T> {
    params: Option<FilterParams<T>>,
    window: Option<usize>,
    prior: Option<InitialPrior<T>>,
}

impl<T: Float + Copy + Sum + One + Zero + ScalarOperand> Default for SigmaTrackerBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float + Copy + Sum + One + Zero + ScalarOperand> SigmaTrackerBuilder<T> {
    pub fn new() -> Self {
        Self {
            params: None,
            window: None,
            prior: None,
        }
    }

    /// Filter parameters shared by every step.
    pub fn params(mut self, params: FilterParams<T>) -> Self {
        self.params.replace(params);
        self
    }

    /// Number of samples per filter step.
    pub fn window(mut self, n: usize) -> Self {
        self.window.replace(n);
        self
    }

    /// Starting distribution.
    pub fn prior(mut self, prior: InitialPrior<T>) -> Self {
        self.prior.replace(prior);
        self
    }

    /// Construct a tracker.
    pub fn build(self) -> Result<SigmaTracker<T>, TrackerError> {
        let params = self.params.ok_or(TrackerError::MissingParams)?;
        let window = self.window.unwrap_or(DEFAULT_WINDOW);
        if window == 0 {
            return Err(TrackerError::ZeroWindow);
        }
        let g = params.pbins.len();
        let initial = match self.prior.unwrap_or(InitialPrior::Uniform) {
            InitialPrior::Uniform => {
                let g_t = T::from(g).unwrap_or_else(T::one);
                Array1::from_elem(g, T::one() / g_t)
            }
            InitialPrior::Delta(at) => {
                let mut weights = Array1::zeros(g);
                weights[params.pbins.nearest(at)] = T::one();
                weights
            }
            InitialPrior::Custom(weights) => {
                if weights.len() != g {
                    return Err(TrackerError::PriorLength {
                        prior: weights.len(),
                        grid: g,
                    });
                }
                weights
            }
        };
        let mut result = SigmaTracker {
            params,
            window,
            distribution: initial.clone(),
            initial,
            pending: Vec::with_capacity(window),
            processed: 0,
        };
        result.reset();
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn params() -> FilterParams<f64> {
        FilterParams::builder()
            .sample_rate(100.0)
            .pbins(vec![0.5, 1.0, 1.5, 2.0, 2.5])
            .alpha(0.01)
            .build()
            .expect("params")
    }

    #[test]
    fn test_one() {
        let t = SigmaTracker::builder()
            .params(params())
            .window(3)
            .build()
            .expect("works");
        assert_eq!(t.distribution(), &array![0.2, 0.2, 0.2, 0.2, 0.2]);
    }

    #[test]
    fn test_fails() {
        let err = SigmaTracker::builder()
            .params(params())
            .window(0)
            .build()
            .err()
            .unwrap_or_else(|| panic!("expecting an error"));
        assert!(matches!(err, TrackerError::ZeroWindow));

        let err = SigmaTracker::<f64>::builder()
            .build()
            .err()
            .unwrap_or_else(|| panic!("expecting an error"));
        assert!(matches!(err, TrackerError::MissingParams));

        let err = SigmaTracker::builder()
            .params(params())
            .prior(InitialPrior::Custom(array![0.5, 0.5]))
            .build()
            .err()
            .unwrap_or_else(|| panic!("expecting an error"));
        assert_eq!(err, TrackerError::PriorLength { prior: 2, grid: 5 });
    }

    #[test]
    fn delta_prior() {
        let t = SigmaTracker::builder()
            .params(params())
            .prior(InitialPrior::Delta(1.4))
            .build()
            .expect("works");
        assert_eq!(t.distribution(), &array![0.0, 0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn first_window_matches_single_step() {
        let mut t = SigmaTracker::builder()
            .params(params())
            .window(3)
            .build()
            .expect("works");
        let mut seen = Vec::new();
        let n = t
            .process(&array![0.1, -0.2, 0.15, 0.3], |e| {
                seen.push((e.start, e.len, e.value))
            })
            .expect("process");
        assert_eq!(n, 1);
        assert_eq!(t.pending(), 1);
        assert_eq!(seen.len(), 1);
        assert_eq!((seen[0].0, seen[0].1), (0, 3));
        assert_relative_eq!(seen[0].2, 0.6299468409254724, max_relative = 1e-12);
        assert_relative_eq!(t.distribution()[0], 0.8274122120101712, max_relative = 1e-12);
    }

    #[test]
    fn windows_span_calls() {
        let mut t = SigmaTracker::builder()
            .params(params())
            .window(4)
            .build()
            .expect("works");
        let mut starts = Vec::new();
        let mut record = |e: Estimate<'_, f64>| starts.push(e.start);
        assert_eq!(t.process(&array![0.5, 0.5, 0.5], &mut record).expect("ok"), 0);
        assert_eq!(t.process(&Array1::from_elem(6, 0.5), &mut record).expect("ok"), 2);
        assert_eq!(t.pending(), 1);
        assert_eq!(t.finish(&mut record).expect("ok"), 1);
        assert_eq!(t.finish(&mut record).expect("ok"), 0);
        assert_eq!(starts, vec![0, 4, 8]);
    }

    #[test]
    fn chaining_equals_manual_steps() {
        let p = params();
        let mut t = SigmaTracker::builder()
            .params(p.clone())
            .window(2)
            .build()
            .expect("works");
        let samples = array![0.4, -1.1, 0.9, 1.6];
        t.process(&samples, |_| ()).expect("ok");

        let prior = Array1::from_elem(5, 0.2);
        let (_, first) = filter_step(samples.slice(ndarray::s![0..2]), prior.view(), &p).expect("step");
        let (_, second) = filter_step(samples.slice(ndarray::s![2..4]), first.view(), &p).expect("step");
        assert_eq!(t.distribution(), &second);
    }

    #[test]
    fn reset_restores_prior() {
        let mut t = SigmaTracker::builder()
            .params(params())
            .window(2)
            .build()
            .expect("works");
        t.process(&array![1.0, 2.0, 3.0], |_| ()).expect("ok");
        t.reset();
        assert_eq!(t.pending(), 0);
        assert_eq!(t.distribution(), &array![0.2, 0.2, 0.2, 0.2, 0.2]);
    }

    #[test]
    fn errors_leave_distribution_alone() {
        let p = FilterParams::builder()
            .sample_rate(1000.0)
            .pbins(vec![1e-3, 2e-3, 3e-3])
            .build()
            .expect("params");
        let mut t = SigmaTracker::builder()
            .params(p)
            .window(400)
            .build()
            .expect("works");
        let before = t.distribution().clone();
        let err = t
            .process(&Array1::from_elem(400, 5.0), |_| panic!("no estimate"))
            .unwrap_err();
        assert!(matches!(
            err,
            TrackerError::Step(FilterStepError::DegeneratePosterior { .. })
        ));
        assert_eq!(t.distribution(), &before);
    }
}
