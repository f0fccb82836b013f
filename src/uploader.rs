// The per-file loop.
//
// Files are handled strictly one after another, in the order given. Each
// one is validated, sent and classified; the outcome is printed and noted
// in the BBCode logs. A fatal server code ends the batch on the spot.

use crate::api::ApiClient;
use crate::bblog::BbLog;
use crate::error::{UploadError, UploadResult};
use crate::response::{ServerCode, Uploaded};
use crate::ui::Console;
use std::error::Error as _;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Tally of a batch.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Summary {
    pub uploaded: usize,
    pub skipped: usize,
}

/// How a batch ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every file was attempted.
    Completed(Summary),
    /// The server reported a fatal code while uploading `at`; files after
    /// it were not attempted.
    Halted { code: ServerCode, at: PathBuf, summary: Summary },
}

impl Outcome {
    pub fn summary(&self) -> &Summary {
        match self {
            Outcome::Completed(s) => s,
            Outcome::Halted { summary, .. } => summary,
        }
    }

    pub fn is_halted(&self) -> bool {
        matches!(self, Outcome::Halted { .. })
    }
}

pub struct Uploader<W: Write> {
    api: ApiClient,
    log: BbLog,
    console: Console<W>,
}

impl<W: Write> Uploader<W> {
    pub fn new(api: ApiClient, log: BbLog, console: Console<W>) -> Self {
        Uploader { api, log, console }
    }

    /// Upload `files` in order.
    pub fn run<P: AsRef<Path>>(&mut self, files: &[P]) -> Outcome {
        let mut summary = Summary::default();
        for file in files {
            let path = file.as_ref();
            match self.process(path) {
                Ok(up) => {
                    self.console.uploaded(&up);
                    self.log.record(&up);
                    summary.uploaded += 1;
                }
                Err(err) => {
                    self.report(path, &err);
                    summary.skipped += 1;
                    if let UploadError::Server { code, fatal: true } = err {
                        log::error!("Stopping now");
                        return Outcome::Halted { code, at: path.to_path_buf(), summary };
                    }
                }
            }
        }
        Outcome::Completed(summary)
    }

    fn process(&mut self, path: &Path) -> UploadResult<Uploaded> {
        let request = self.api.build_request(path)?;
        self.console.uploading(path);
        let body = self.api.send(request)?;
        crate::response::classify(&body, self.api.settings().unknown_code_fatal)
    }

    /// Console message plus log line for a failed attempt.
    fn report(&mut self, path: &Path, err: &UploadError) {
        match err {
            UploadError::IsDirectory(_) => {
                log::warn!("{}", err);
                log::warn!("Ignoring {}", path.display());
            }
            UploadError::NotFound(_) | UploadError::TooLarge { .. } => log::warn!("{}", err),
            UploadError::Io { source, .. } => {
                log::error!("Couldn't create request for uploading {}.", path.display());
                log::debug!("{}", source);
            }
            UploadError::InvalidJson(e) => {
                log::error!("{}", err);
                log::error!("JSON error: {}", e);
            }
            UploadError::Server { .. } => {
                log::error!("Received error when uploading {}: {}", path.display(), err);
            }
            UploadError::Network(_) | UploadError::ResponseLost(_) => {
                log::error!("{}", err);
                if let Some(cause) = err.source() {
                    log::debug!("{}", cause);
                }
            }
        }
        if let Some(line) = err.log_line(path) {
            self.log.note(&line);
        }
    }

    pub fn into_console(self) -> Console<W> {
        self.console
    }
}
