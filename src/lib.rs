// Library root
// -----------
// The binary (`main.rs`) is a thin shell around these modules.
//
// Module responsibilities:
// - `cli`: command-line flags.
// - `config`: layered runtime settings (file, environment, flags) and
//   credentials.
// - `api`: path validation, multipart request building and transport.
// - `response`: turning the JSON reply into URLs or a server error code.
// - `error`: the per-file error taxonomy.
// - `bblog`: the optional append-only [img]/[timg] logs.
// - `ui`: stdout output and the password prompt.
// - `uploader`: the sequential per-file loop tying it all together.
pub mod api;
pub mod bblog;
pub mod cli;
pub mod config;
pub mod error;
pub mod response;
pub mod ui;
pub mod uploader;
