use std::fmt;

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ModelError {
    #[error("unsupported likelihood model \"{0}\" (expected \"Gauss\" or \"Laplace\")")]
    UnknownModel(String),
}

/// Noise distribution assumed for the observed samples, parameterised by
/// the tracked spread value.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
pub enum LikelihoodModel {
    /// Zero-mean normal, spread is the standard deviation.
    #[default]
    Gauss,
    /// Zero-mean Laplace, spread is the scale.
    Laplace,
}

impl LikelihoodModel {
    pub const fn name(&self) -> &'static str {
        match self {
            LikelihoodModel::Gauss => "Gauss",
            LikelihoodModel::Laplace => "Laplace",
        }
    }
}

impl fmt::Display for LikelihoodModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<&str> for LikelihoodModel {
    type Error = ModelError;

    /// Case-sensitive, matching the names used in parameter files.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let res = match value {
            "Gauss" => Self::Gauss,
            "Laplace" => Self::Laplace,
            _ => return Err(ModelError::UnknownModel(value.to_owned())),
        };
        Ok(res)
    }
}

/// How a single value is read out of a posterior.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
pub enum PointEstimate {
    /// Grid value with the highest posterior weight.
    Map,
    /// Posterior expectation.
    #[default]
    Mean,
}

impl From<bool> for PointEstimate {
    /// `true` selects the maximum-a-posteriori readout ("pointmax").
    fn from(pointmax: bool) -> Self {
        if pointmax {
            PointEstimate::Map
        } else {
            PointEstimate::Mean
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_parses() {
        assert_eq!(LikelihoodModel::try_from("Gauss"), Ok(LikelihoodModel::Gauss));
        assert_eq!(
            LikelihoodModel::try_from("Laplace"),
            Ok(LikelihoodModel::Laplace)
        );
    }

    #[test]
    fn it_rejects_unknown() {
        let err = LikelihoodModel::try_from("Uniform").unwrap_err();
        assert_eq!(err, ModelError::UnknownModel("Uniform".into()));
        assert!(err.to_string().contains("Uniform"));
        assert!(LikelihoodModel::try_from("gauss").is_err());
    }

    #[test]
    fn name_round_trips() {
        for m in [LikelihoodModel::Gauss, LikelihoodModel::Laplace] {
            assert_eq!(LikelihoodModel::try_from(m.name()), Ok(m));
        }
    }

    #[test]
    fn pointmax_flag() {
        assert_eq!(PointEstimate::from(true), PointEstimate::Map);
        assert_eq!(PointEstimate::from(false), PointEstimate::Mean);
    }
}
