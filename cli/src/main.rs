//! svc - profile-aware lifecycle control for a docker compose stack

use std::process::ExitCode;

use clap::Parser;

use svc_cli::cli::Cli;
use svc_cli::infra::logging;
use svc_cli::output::json::{error_code, format_error};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let json = cli.json;

    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            match format_error(&format!("{e:#}"), error_code(&e)) {
                Ok(obj) if json => println!("{obj}"),
                _ => eprintln!("Error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}
