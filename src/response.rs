// Response classification.
//
// The service always answers with a flat JSON object of strings. Success
// carries `imageurl`/`thumburl`; failure carries an `err` code that we
// translate with a fixed table.

use crate::error::{UploadError, UploadResult};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;

/// Error codes the service reports in the `err` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerCode {
    /// `err1`
    Upload,
    /// `err2`
    Auth,
    /// `err3`
    NotMedia,
    /// `err4`
    TooBig,
    /// `err5`
    Reserved,
    /// `err6`
    Maintenance,
    Unknown(String),
}

impl ServerCode {
    pub fn parse(code: &str) -> Self {
        match code {
            "err1" => ServerCode::Upload,
            "err2" => ServerCode::Auth,
            "err3" => ServerCode::NotMedia,
            "err4" => ServerCode::TooBig,
            "err5" => ServerCode::Reserved,
            "err6" => ServerCode::Maintenance,
            other => ServerCode::Unknown(other.to_string()),
        }
    }

    pub fn explanation(&self) -> String {
        match self {
            ServerCode::Upload => "something went wrong during the upload process itself.".into(),
            ServerCode::Auth => "authentication error. Check your username and password!".into(),
            ServerCode::NotMedia => "this file doesn't appear to be an image or MP3 file.".into(),
            ServerCode::TooBig => "your file is too big.".into(),
            ServerCode::Reserved => {
                "this error code is reserved by the service for future use. Maybe post about this on the forums?".into()
            }
            ServerCode::Maintenance => "the server is down for maintenance. Try again later.".into(),
            ServerCode::Unknown(code) => format!("unknown error, using the error code \"{}\".", code),
        }
    }

    /// Whether this code stops the batch. Unknown codes follow
    /// `unknown_fatal`.
    pub fn is_fatal(&self, unknown_fatal: bool) -> bool {
        match self {
            ServerCode::Auth | ServerCode::Maintenance => true,
            ServerCode::Unknown(_) => unknown_fatal,
            _ => false,
        }
    }
}

impl fmt::Display for ServerCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            ServerCode::Upload => "err1",
            ServerCode::Auth => "err2",
            ServerCode::NotMedia => "err3",
            ServerCode::TooBig => "err4",
            ServerCode::Reserved => "err5",
            ServerCode::Maintenance => "err6",
            ServerCode::Unknown(code) => code,
        };
        f.write_str(code)
    }
}

/// Raw response body as the service sends it.
#[derive(Deserialize, Debug, Default)]
#[serde(transparent)]
pub struct UploadResponse(pub HashMap<String, String>);

impl UploadResponse {
    fn get(&self, key: &str) -> &str {
        self.0.get(key).map(String::as_str).unwrap_or("")
    }
}

/// Where an uploaded file ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Uploaded {
    pub image_url: String,
    pub thumb_url: String,
}

impl Uploaded {
    pub fn img_code(&self) -> String {
        format!("[img]{}[/img]", self.image_url)
    }

    pub fn timg_code(&self) -> String {
        format!("[timg]{}[/timg]", self.thumb_url)
    }
}

/// Turn a response body into either the uploaded URLs or the error the
/// service reported.
pub fn classify(body: &[u8], unknown_fatal: bool) -> UploadResult<Uploaded> {
    let resp: UploadResponse = serde_json::from_slice(body).map_err(UploadError::InvalidJson)?;

    let err = resp.get("err");
    if !err.is_empty() {
        let code = ServerCode::parse(err);
        let fatal = code.is_fatal(unknown_fatal);
        return Err(UploadError::Server { code, fatal });
    }

    Ok(Uploaded {
        image_url: resp.get("imageurl").to_string(),
        thumb_url: resp.get("thumburl").to_string(),
    })
}
