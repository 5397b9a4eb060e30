//! bizfly - Command-line client for Bizfly Cloud

use bizfly_cli::commands;
use bizfly_cli::config::{GlobalArgs, Settings};
use bizfly_cli::error::{CliError, CliResult};
use bizfly_cli::logging;
use clap::{Parser, Subcommand};

/// Bizfly Cloud Command Line
#[derive(Parser)]
#[command(name = "bizfly")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Login to Bizfly Cloud via browser
    Login(commands::login::LoginArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.global.verbose, cli.global.quiet);

    match run(cli).await {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            report_failure(&e);
            std::process::exit(e.exit_code());
        }
    }
}

fn report_failure(e: &CliError) {
    tracing::debug!(error = %e, "command failed");
    e.print();
}

async fn run(cli: Cli) -> CliResult<()> {
    let settings = Settings::load(&cli.global)?;

    match cli.command {
        Commands::Login(args) => commands::login::execute(args, &settings).await,
    }
}
