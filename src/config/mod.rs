mod filter;
mod grid;
mod root;

pub use filter::FilterConfig;
pub use grid::{GridConfig, PriorConfig};
pub use root::{Config, ConfigurationError};
