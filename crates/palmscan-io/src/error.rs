use std::io;
use thiserror::Error;

/// Failure reading or writing an inspection table. `path` is the file path,
/// or a label such as `<stdin>` for in-memory readers and writers.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("malformed CSV in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
}

impl TableError {
    pub(crate) fn io(path: &str, source: io::Error) -> Self {
        Self::Io { path: path.to_string(), source }
    }

    pub(crate) fn csv(path: &str, source: csv::Error) -> Self {
        Self::Csv { path: path.to_string(), source }
    }
}
