// Append-only BBCode logs.
//
// Two optional streams: the img log collects `[img]` codes, the timg log
// collects `[timg]` codes. Skip/error notes go to both. Nothing here is
// allowed to stop an upload run: open and write failures are reported
// and swallowed.

use crate::response::Uploaded;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

pub struct BbLog {
    img: Option<Box<dyn Write>>,
    timg: Option<Box<dyn Write>>,
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().append(true).create(true).open(path)
}

impl BbLog {
    /// Logging disabled.
    pub fn none() -> Self {
        BbLog { img: None, timg: None }
    }

    /// Open whichever logs were requested. A log that can't be opened is
    /// reported and left out.
    pub fn open(img: Option<&Path>, timg: Option<&Path>) -> Self {
        let open = |path: Option<&Path>, kind: &str| -> Option<Box<dyn Write>> {
            let path = path?;
            match open_append(path) {
                Ok(f) => Some(Box::new(f)),
                Err(e) => {
                    log::error!("Unable to open log for [{}] codes at {}: {}", kind, path.display(), e);
                    None
                }
            }
        };
        BbLog { img: open(img, "img"), timg: open(timg, "timg") }
    }

    #[cfg(test)]
    fn from_writers(img: Option<Box<dyn Write>>, timg: Option<Box<dyn Write>>) -> Self {
        BbLog { img, timg }
    }

    #[cfg(test)]
    fn is_enabled(&self) -> bool {
        self.img.is_some() || self.timg.is_some()
    }

    /// Write a skip/error note to both logs.
    pub fn note(&mut self, line: &str) {
        write_line(&mut self.img, "img", line);
        write_line(&mut self.timg, "timg", line);
    }

    /// Record a successful upload: image code to the img log, thumbnail
    /// code to the timg log.
    pub fn record(&mut self, up: &Uploaded) {
        write_line(&mut self.img, "img", &format!("{}\n", up.img_code()));
        write_line(&mut self.timg, "timg", &format!("{}\n", up.timg_code()));
    }
}

fn write_line(sink: &mut Option<Box<dyn Write>>, kind: &str, line: &str) {
    if let Some(w) = sink {
        if let Err(e) = w.write_all(line.as_bytes()).and_then(|_| w.flush()) {
            log::error!("An error occurred while writing to the [{}] log: {}", kind, e);
        }
    }
}
