mod estimation;

pub use estimation::{EstimationSession, SessionError, TimedEstimate};
