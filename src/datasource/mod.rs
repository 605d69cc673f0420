mod txtfile;

pub use txtfile::{TextFileSource, TextSourceError};

use ndarray::Array1;
use std::fs::File;
use std::io::{self, BufReader, StdinLock};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataSourceError {
    #[error("text parse error")]
    TextSourceError(#[from] TextSourceError),
}

/// Where samples come from. A path of "-" reads standard input.
pub enum DataSource {
    TextSource(TextFileSource<BufReader<File>>),
    StdinSource(TextFileSource<StdinLock<'static>>),
}

impl DataSource {
    pub fn new_textfile_source(path: &Path) -> Result<DataSource, DataSourceError> {
        if path.as_os_str() == "-" {
            return Ok(DataSource::StdinSource(TextFileSource::new(io::stdin().lock())));
        }
        let ds = TextFileSource::open(path)?;
        Ok(DataSource::TextSource(ds))
    }

    pub fn next(&mut self) -> Option<Result<Array1<f64>, DataSourceError>> {
        match self {
            DataSource::TextSource(s) => s
                .next()
                .map(|i| i.map_err(DataSourceError::TextSourceError)),
            DataSource::StdinSource(s) => s
                .next()
                .map(|i| i.map_err(DataSourceError::TextSourceError)),
        }
    }
}
