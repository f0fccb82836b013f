// UI layer: everything the user sees on stdout, plus the one interactive
// prompt. Diagnostics go through `log` (stderr) instead, so stdout stays
// clean BBCode that can be piped or copied straight into a post.

use crate::response::Uploaded;
use anyhow::{Context, Result};
use dialoguer::Password;
use std::io::{self, Write};
use std::path::Path;

/// Result printer. Generic over the writer so tests can capture output.
pub struct Console<W: Write> {
    out: W,
}

impl Console<io::Stdout> {
    pub fn stdout() -> Self {
        Console { out: io::stdout() }
    }
}

impl<W: Write> Console<W> {
    pub fn new(out: W) -> Self {
        Console { out }
    }

    /// Announce that a request is about to go out.
    pub fn uploading(&mut self, target: &Path) {
        self.emit(format_args!("Uploading {}.\n", target.display()));
    }

    /// Print both BBCode snippets for a finished upload.
    pub fn uploaded(&mut self, up: &Uploaded) {
        self.emit(format_args!(
            "Image URL: {}\nThumbnail Code: {}\n",
            up.img_code(),
            up.timg_code()
        ));
    }

    // A closed stdout (e.g. `| head`) must not abort the remaining uploads.
    fn emit(&mut self, args: std::fmt::Arguments<'_>) {
        if let Err(e) = self.out.write_fmt(args).and_then(|_| self.out.flush()) {
            log::warn!("Couldn't write to stdout: {}", e);
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Ask for the account password without echoing it.
pub fn prompt_password(username: &str) -> Result<String> {
    Password::new()
        .with_prompt(format!("LPix password for {}", username))
        .interact()
        .context("No password configured and couldn't prompt for one")
}
