use std::{
    fs::File,
    io::{self, BufRead},
    path::Path,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TextSourceError {
    #[error("unable to open file")]
    FileOpenFailed(#[source] std::io::Error),
    #[error("bad line read")]
    BadLineRead(#[source] std::io::Error),
    #[error("unparseable float on line {0}")]
    UnparsableFloat(usize),
}

/// Sample text in the usual dump layouts: one sample per line, either
/// alone or as the last of several whitespace-separated columns
/// (e.g. "time value"). Blank lines and lines starting with '#' are
/// skipped.
pub struct TextFileSource<R> {
    reader: Option<R>,
}

fn handle_line(number: usize, line: &str) -> Result<Option<f64>, TextSourceError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    let last = trimmed
        .split_ascii_whitespace()
        .last()
        .ok_or(TextSourceError::UnparsableFloat(number))?;
    let v = last
        .parse::<f64>()
        .map_err(|_| TextSourceError::UnparsableFloat(number))?;
    Ok(Some(v))
}

fn read_all<R: BufRead>(reader: R) -> Result<ndarray::Array1<f64>, TextSourceError> {
    let mut data = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(TextSourceError::BadLineRead)?;
        if let Some(v) = handle_line(i + 1, &line)? {
            data.push(v);
        }
    }
    Ok(ndarray::Array1::from_vec(data))
}

impl TextFileSource<io::BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self, TextSourceError> {
        let f = File::open(path).map_err(TextSourceError::FileOpenFailed)?;
        Ok(TextFileSource::new(io::BufReader::new(f)))
    }
}

impl<R: BufRead> TextFileSource<R> {
    pub fn new(reader: R) -> Self {
        TextFileSource {
            reader: Some(reader),
        }
    }

    /// The whole input in one block. Subsequent calls return `None`.
    pub fn next(&mut self) -> Option<Result<ndarray::Array1<f64>, TextSourceError>> {
        self.reader.take().map(read_all)
    }
}
