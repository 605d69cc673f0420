use num_traits::Float;
use std::path::Path;
use std::{
    fmt::Display,
    fs::File,
    io::{BufWriter, Write},
};
use thiserror::Error;

use super::block::tracker::Estimate;

#[derive(Error, Debug)]
pub enum ObserverError {
    #[error("unable to open dump file")]
    DumpFileError(#[source] std::io::Error),
    #[error("unable to write to dump file")]
    DumpWriteError(#[source] std::io::Error),
}

/// Optional sink for the full posterior of every filter step.
pub enum PosteriorObserver {
    NullObserver,
    PosteriorDumper(Box<PosteriorDumper>),
}

impl PosteriorObserver {
    pub fn new_posterior_dumper(
        path: &Path,
        sample_rate_hz: f64,
    ) -> Result<PosteriorObserver, ObserverError> {
        let d = PosteriorDumper::new(path, sample_rate_hz)?;
        Ok(PosteriorObserver::PosteriorDumper(Box::new(d)))
    }

    pub fn null() -> PosteriorObserver {
        PosteriorObserver::NullObserver
    }

    pub fn observe<T: Float + Display>(&mut self, e: &Estimate<'_, T>) -> Result<(), ObserverError> {
        match self {
            Self::NullObserver => Ok(()),
            Self::PosteriorDumper(d) => d.observe(e),
        }
    }

    pub fn flush(&mut self) -> Result<(), ObserverError> {
        match self {
            Self::NullObserver => Ok(()),
            Self::PosteriorDumper(d) => d.f.flush().map_err(ObserverError::DumpWriteError),
        }
    }
}

/// Writes one line per step: time of the window start in seconds, the
/// estimate, then every posterior weight.
pub struct PosteriorDumper {
    f: BufWriter<File>,
    sample_rate_hz: f64,
}

impl PosteriorDumper {
    pub fn new(path: &Path, sample_rate_hz: f64) -> Result<PosteriorDumper, ObserverError> {
        let fh = File::create(path).map_err(ObserverError::DumpFileError)?;
        Ok(PosteriorDumper {
            f: BufWriter::new(fh),
            sample_rate_hz,
        })
    }

    fn observe<T: Float + Display>(&mut self, e: &Estimate<'_, T>) -> Result<(), ObserverError> {
        let off = e.start as f64 / self.sample_rate_hz;
        let value = e.value;
        write!(self.f, "{off} {value}").map_err(ObserverError::DumpWriteError)?;
        for w in e.posterior.iter() {
            write!(self.f, " {w}").map_err(ObserverError::DumpWriteError)?;
        }
        writeln!(self.f).map_err(ObserverError::DumpWriteError)
    }
}
