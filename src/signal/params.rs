use std::iter::Sum;

use ndarray::ScalarOperand;
use thiserror::Error;

pub use num_traits::{Float, One, Zero};

use super::grid::{Grid, GridError};
use super::model::{LikelihoodModel, ModelError, PointEstimate};

#[derive(Error, Debug, PartialEq)]
pub enum ParamsError {
    #[error("sample rate must be positive")]
    InvalidSampleRate,
    #[error("no grid supplied")]
    MissingGrid,
    #[error("invalid grid")]
    Grid(#[from] GridError),
    #[error("invalid likelihood model")]
    Model(#[from] ModelError),
}

/// Read-only configuration for a filter step. Set once, shared by every
/// step of a tracking run.
#[derive(Debug, Clone)]
pub struct FilterParams<T> {
    /// Sample rate of the observed signal, in hertz.
    pub sf: T,
    /// Candidate values of the tracked parameter.
    pub pbins: Grid<T>,
    /// Diffusion coefficient.
    pub alpha: T,
    /// Relaxation rate towards the flat baseline.
    pub beta: T,
    pub model: LikelihoodModel,
    pub point: PointEstimate,
}

impl<T: Float + Copy + Sum + One + Zero + ScalarOperand> FilterParams<T> {
    pub fn builder() -> FilterParamsBuilder<T> {
        FilterParamsBuilder::new()
    }
}

pub struct FilterParamsBuilder<T> {
    sf: Option<T>,
    pbins: Option<Result<Grid<T>, GridError>>,
    alpha: Option<T>,
    beta: Option<T>,
    model: Option<Result<LikelihoodModel, ModelError>>,
    pointmax: Option<bool>,
}

impl<T: Float + Copy + Sum + One + Zero + ScalarOperand> Default for FilterParamsBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float + Copy + Sum + One + Zero + ScalarOperand> FilterParamsBuilder<T> {
    pub fn new() -> Self {
        Self {
            sf: None,
            pbins: None,
            alpha: None,
            beta: None,
            model: None,
            pointmax: None,
        }
    }

    /// Interpret samples as coming in at a sample rate.
    pub fn sample_rate(mut self, hz: T) -> Self {
        self.sf.replace(hz);
        self
    }

    /// Use an already validated grid.
    pub fn grid(mut self, grid: Grid<T>) -> Self {
        self.pbins.replace(Ok(grid));
        self
    }

    /// Grid values; checked when the parameters are built.
    pub fn pbins(mut self, bins: Vec<T>) -> Self {
        self.pbins.replace(Grid::try_from(bins));
        self
    }

    /// Diffusion coefficient. (0.0 => no spreading between steps)
    pub fn alpha(mut self, alpha: T) -> Self {
        self.alpha.replace(alpha);
        self
    }

    /// Relaxation rate. (0.0 => no pull towards the flat baseline)
    pub fn beta(mut self, beta: T) -> Self {
        self.beta.replace(beta);
        self
    }

    pub fn model(mut self, model: LikelihoodModel) -> Self {
        self.model.replace(Ok(model));
        self
    }

    /// Likelihood model by name ("Gauss" or "Laplace").
    pub fn model_name(mut self, name: &str) -> Self {
        self.model.replace(LikelihoodModel::try_from(name));
        self
    }

    /// Read out the posterior maximum instead of its mean.
    pub fn pointmax(mut self, pointmax: bool) -> Self {
        self.pointmax.replace(pointmax);
        self
    }

    /// Construct the parameter set.
    pub fn build(self) -> Result<FilterParams<T>, ParamsError> {
        let sf = self.sf.unwrap_or(T::one());
        if !(sf > T::zero()) || !sf.is_finite() {
            return Err(ParamsError::InvalidSampleRate);
        }
        let pbins = self.pbins.ok_or(ParamsError::MissingGrid)??;
        let model = self.model.unwrap_or(Ok(LikelihoodModel::default()))?;
        Ok(FilterParams {
            sf,
            pbins,
            alpha: self.alpha.unwrap_or(T::zero()),
            beta: self.beta.unwrap_or(T::zero()),
            model,
            point: self.pointmax.unwrap_or(false).into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one() {
        let p = FilterParams::builder()
            .sample_rate(100.0)
            .pbins(vec![0.5, 1.0, 1.5, 2.0, 2.5])
            .alpha(0.01)
            .model_name("Laplace")
            .pointmax(true)
            .build()
            .expect("works");
        assert_eq!(p.model, LikelihoodModel::Laplace);
        assert_eq!(p.point, PointEstimate::Map);
        assert_eq!(p.beta, 0.0);
    }

    #[test]
    fn unknown_model_fails() {
        let err = FilterParams::builder()
            .sample_rate(100.0)
            .pbins(vec![0.5, 1.0, 1.5])
            .model_name("Uniform")
            .build()
            .err()
            .unwrap_or_else(|| panic!("expecting an error"));
        assert_eq!(
            err,
            ParamsError::Model(ModelError::UnknownModel("Uniform".into()))
        );
    }

    #[test]
    fn bad_sample_rate_fails() {
        for sf in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = FilterParams::builder()
                .sample_rate(sf)
                .pbins(vec![0.5, 1.0, 1.5])
                .build()
                .err()
                .unwrap_or_else(|| panic!("expecting an error"));
            assert_eq!(err, ParamsError::InvalidSampleRate);
        }
    }

    #[test]
    fn grid_errors_surface() {
        let err = FilterParams::builder()
            .sample_rate(100.0)
            .pbins(vec![0.5])
            .build()
            .err()
            .unwrap_or_else(|| panic!("expecting an error"));
        assert_eq!(err, ParamsError::Grid(GridError::TooSmall(1)));

        let err = FilterParams::<f32>::builder()
            .sample_rate(100.0)
            .build()
            .err()
            .unwrap_or_else(|| panic!("expecting an error"));
        assert_eq!(err, ParamsError::MissingGrid);
    }
}
