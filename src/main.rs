// src/main.rs

use std::ffi::OsString;

use apex_ls_mcp::config::load_config;
use apex_ls_mcp::launcher::run_launcher;
use apex_ls_mcp::{exit_codes, logging, report_error};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(err) = logging::init_logging(None, tracing::Level::WARN) {
        eprintln!("apex-ls-mcp: {err:#}");
    }

    // Everything after argv[0] belongs to the analysis engine.
    let passthrough: Vec<OsString> = std::env::args_os().skip(1).collect();

    // Only reached when the engine could not be started.
    let err = match load_config(None) {
        Ok(cfg) => run_launcher(&cfg, passthrough).await,
        Err(err) => err,
    };
    report_error("Error running apex-ls-mcp", &err);
    std::process::exit(exit_codes::FAILURE);
}
