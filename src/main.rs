// Entrypoint for the CLI application.
// - Keeps `main` small: parse flags, set up logging, resolve settings and
//   hand the file list to the uploader.
// - Startup problems surface as `anyhow` errors; per-file problems are
//   handled inside the uploader and only a fatal server code changes the
//   exit status.

use anyhow::Result;
use clap::Parser;
use lpix_send::{
    api::ApiClient,
    bblog::BbLog,
    cli::{self, Args},
    config::Settings,
    ui::Console,
    uploader::Uploader,
};
use std::process::ExitCode;

fn init_logging(args: &Args) {
    env_logger::Builder::new()
        .filter_level(args.log_level())
        .parse_env("RUST_LOG")
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_logging(&args);

    if args.files.is_empty() {
        cli::print_usage();
        log::error!("Error: You need to specify at least one file to upload");
        return Ok(ExitCode::FAILURE);
    }

    let settings = Settings::load(&args)?;
    let api = ApiClient::new(settings)?;
    let log = BbLog::open(args.log.as_deref(), args.tlog.as_deref());

    // The uploader owns the log files; it is dropped (and the files
    // closed) before the exit code is returned.
    let outcome = Uploader::new(api, log, Console::stdout()).run(&args.files);

    let summary = outcome.summary();
    log::debug!("{} uploaded, {} skipped", summary.uploaded, summary.skipped);
    Ok(if outcome.is_halted() { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}
