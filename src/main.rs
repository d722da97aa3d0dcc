//! onlyoffice - command-line access to the OnlyOffice project-management API

mod cli;

use std::process::ExitCode;

use clap::Parser;

use onlyoffice::logging;

fn main() -> anyhow::Result<ExitCode> {
    let cli = cli::Cli::parse();
    logging::init(cli.verbose)?;

    match cli::run(cli) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            tracing::error!("{}", err);
            eprintln!("error: {}", err.user_message());
            if let Some(action) = err.suggested_action() {
                eprintln!("hint: {}", action);
            }
            Ok(ExitCode::FAILURE)
        }
    }
}
