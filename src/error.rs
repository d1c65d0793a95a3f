use std::path::PathBuf;

use thiserror::Error;

/// Failures while loading the clip dataset at startup
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("could not read dataset {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("dataset {path} has no `{column}` column")]
    MissingColumn { path: PathBuf, column: &'static str },
}

/// Failure to hand a video over to the OS default handler
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("{path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: opener::OpenError,
    },
}

/// Failures while persisting session results
#[derive(Debug, Error)]
pub enum JournalError {
    #[error("could not create log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not write session results to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("could not flush session results to {path}: {source}")]
    Flush {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a submit was refused
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Please select both pitch type and result.")]
    Incomplete,
    #[error("nothing to submit in the current phase")]
    NotReady,
}
