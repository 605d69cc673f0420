use serde::Deserialize;

/// Candidate values of the tracked parameter, either listed or spelled as
/// a uniform range.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum GridConfig {
    Explicit {
        pbins: Vec<f64>,
    },
    Uniform {
        /// First grid value.
        start: f64,
        /// Distance between neighbouring values.
        step: f64,
        /// Number of grid points.
        bins: usize,
    },
}

/// Starting distribution of a run.
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PriorConfig {
    #[default]
    Uniform,
    /// All weight on the grid value nearest to `at`.
    Delta { at: f64 },
}
