// Per-file error taxonomy.
//
// Every way a single upload can go wrong maps to one variant here. The
// uploader loop only needs two answers from an error: does it stop the
// whole batch (`is_fatal`) and what goes into the BBCode logs
// (`log_line`).

use crate::config::MEGABYTE;
use crate::response::ServerCode;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

fn whole_mb(bytes: &u64) -> u64 {
    bytes / MEGABYTE
}

/// Failure of one upload attempt.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("{} not found.", .0.display())]
    NotFound(PathBuf),

    #[error("{} is a directory: recursive uploads are unsupported.", .0.display())]
    IsDirectory(PathBuf),

    #[error("{} too big to upload (over {} MB).", .path.display(), whole_mb(.limit_bytes))]
    TooLarge { path: PathBuf, limit_bytes: u64 },

    /// The file could be stat'ed but not opened or read.
    #[error("couldn't create request for uploading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I sent the file, but no response was received while uploading. You might want to try uploading it again later.")]
    Network(#[source] reqwest::Error),

    #[error("I sent the file, but part of the response was lost. You should check to see if the upload succeeded.")]
    ResponseLost(#[source] reqwest::Error),

    #[error("I sent the file, but an invalid response was received. You should check to see if the upload succeeded.")]
    InvalidJson(#[source] serde_json::Error),

    /// The service answered with an `err` code.
    #[error("{}", .code.explanation())]
    Server { code: ServerCode, fatal: bool },
}

impl UploadError {
    /// Whether the batch must stop after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, UploadError::Server { fatal: true, .. })
    }

    /// Line appended to the BBCode logs for this failure, if any.
    /// Directories are only warned about on the console.
    pub fn log_line(&self, target: &Path) -> Option<String> {
        let t = target.display();
        let line = match self {
            UploadError::IsDirectory(_) => return None,
            UploadError::TooLarge { .. } => format!("Skipped overlarge file {}\n", t),
            UploadError::NotFound(_) => format!("Couldn't find {}.\n", t),
            UploadError::Io { .. } => format!("Couldn't attempt to upload {}.\n", t),
            UploadError::Network(_) => format!("No server response while uploading {}.\n", t),
            UploadError::ResponseLost(_) => format!("Lost server response while uploading {}.\n", t),
            UploadError::InvalidJson(_) => {
                format!("Invalid server response received while uploading {}.\n", t)
            }
            UploadError::Server { .. } => format!("Couldn't upload file {}.\n", t),
        };
        Some(line)
    }
}

pub type UploadResult<T> = Result<T, UploadError>;
