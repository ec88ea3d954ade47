// src/bin/apex-ls-mcp-install.rs

use apex_ls_mcp::{cli, exit_codes, logging, report_error, run_install};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = cli::parse();
    if let Err(err) = logging::init_logging(args.log_level, tracing::Level::INFO) {
        eprintln!("apex-ls-mcp-install: {err:#}");
    }

    match run_install(args).await {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            report_error("Failed to install apex-ls-mcp", &err);
            std::process::exit(exit_codes::FAILURE);
        }
    }
}
