use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct FilterConfig {
    /// Diffusion coefficient: how fast the distribution spreads between
    /// windows.
    /// Default: 0.0001
    #[serde(default = "default_alpha")]
    pub alpha: f64,

    /// Relaxation rate towards the flat baseline.
    /// Default: 0
    #[serde(default = "default_beta")]
    pub beta: f64,

    /// Likelihood model, "Gauss" or "Laplace".
    /// Default: "Gauss"
    #[serde(default = "default_model")]
    pub model: String,

    /// Report the posterior maximum (true) or the posterior mean (false).
    #[serde(default)]
    pub pointmax: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            alpha: default_alpha(),
            beta: default_beta(),
            model: default_model(),
            pointmax: false,
        }
    }
}

fn default_alpha() -> f64 {
    1e-4
}

fn default_beta() -> f64 {
    0.0
}

fn default_model() -> String {
    String::from("Gauss")
}
