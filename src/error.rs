//! Errors that end a run

use std::path::PathBuf;

use thiserror::Error;

/// Failures that stop the whole run. Problems with a single directory or
/// entry are handled where they happen and never reach this type.
#[derive(Error, Debug)]
pub enum TwigError {
    /// The root path does not exist or is not a directory
    #[error("'{}' is not a valid directory", .path.display())]
    InvalidRoot { path: PathBuf },

    /// The log file could not be created
    #[error("cannot create log file {}: {source}", .path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing to the console failed
    #[error("error writing output: {0}")]
    Output(#[from] std::io::Error),
}
