use crate::prelude::*;
use std::process::ExitCode;

async fn run_subcommand(command: Command) -> Result<(), CliError> {
    match command {
        Command::Run(run_args) => run_plan(run_args).await,
        Command::Describe(describe_args) => describe(describe_args),
    }
}

pub async fn run(cli_args: CliArgs) -> ExitCode {
    match run_subcommand(cli_args.command).await {
        Ok(_) => {
            info!("{} ran successfully", BINARY_NAME);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Error running {}: {}", BINARY_NAME, e);
            ExitCode::FAILURE
        }
    }
}
