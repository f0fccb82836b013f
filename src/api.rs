// API client module: a small blocking HTTP client for the LPix upload
// endpoint. One call uploads one file; classification of what came back
// lives in `response`.

use crate::config::Settings;
use crate::error::{UploadError, UploadResult};
use reqwest::blocking::{multipart, Client, Request};
use std::fs::{self, File};
use std::io;
use std::path::Path;

/// Multipart field carrying the file itself.
pub const FILE_FIELD: &str = "file";

/// Check that `path` is something we can upload: it exists, is not a
/// directory and is at most `limit_bytes` long. Returns the file size.
pub fn validate_target(path: &Path, limit_bytes: u64) -> UploadResult<u64> {
    let meta = fs::metadata(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => UploadError::NotFound(path.to_path_buf()),
        _ => UploadError::Io { path: path.to_path_buf(), source: e },
    })?;
    if meta.is_dir() {
        return Err(UploadError::IsDirectory(path.to_path_buf()));
    }
    if meta.len() > limit_bytes {
        return Err(UploadError::TooLarge { path: path.to_path_buf(), limit_bytes });
    }
    Ok(meta.len())
}

fn invalid_request(path: &Path, e: reqwest::Error) -> UploadError {
    UploadError::Io { path: path.to_path_buf(), source: io::Error::new(io::ErrorKind::InvalidInput, e) }
}

/// Client bound to one account, gallery and endpoint.
pub struct ApiClient {
    client: Client,
    settings: Settings,
}

impl ApiClient {
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        use anyhow::Context;

        let client = Client::builder()
            .user_agent(concat!("lpix-send/", env!("CARGO_PKG_VERSION")))
            .timeout(settings.timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient { client, settings })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The fixed text fields sent along with every file.
    fn fields(&self) -> [(&'static str, String); 4] {
        [
            ("username", self.settings.username.clone()),
            ("password", self.settings.password.clone()),
            ("gallery", self.settings.gallery.clone()),
            ("output", "json".to_string()),
        ]
    }

    /// Validate `path` and build the multipart POST for it. The file is
    /// streamed from an open handle when the request is sent.
    pub fn build_request(&self, path: &Path) -> UploadResult<Request> {
        let len = validate_target(path, self.settings.limit_bytes)?;

        let file = File::open(path)
            .map_err(|e| UploadError::Io { path: path.to_path_buf(), source: e })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".into());

        // The service sniffs content itself; this only keeps the part tidy.
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        let part = multipart::Part::reader_with_length(file, len)
            .file_name(file_name)
            .mime_str(mime.essence_str())
            .map_err(|e| invalid_request(path, e))?;

        let form = self
            .fields()
            .into_iter()
            .fold(multipart::Form::new().part(FILE_FIELD, part), |form, (k, v)| form.text(k, v));

        self.client
            .post(&self.settings.endpoint)
            .multipart(form)
            .build()
            .map_err(|e| invalid_request(path, e))
    }

    /// Send a built request and read the whole body. No retries.
    pub fn send(&self, request: Request) -> UploadResult<Vec<u8>> {
        let res = self.client.execute(request).map_err(UploadError::Network)?;
        log::debug!("server answered {}", res.status());
        let body = res.bytes().map_err(UploadError::ResponseLost)?;
        log::trace!("response body: {}", String::from_utf8_lossy(&body));
        Ok(body.to_vec())
    }

}
