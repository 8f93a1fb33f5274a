use crate::estimate::{run_estimate, run_options, EstimateArgs, OptionsArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use salary_insights::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Salary Insights",
    about = "Serve and run the salary estimation calculator from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Estimate a salary for one role profile and print the breakdown
    Estimate(EstimateArgs),
    /// List the positions, locations, and other choices the calculator accepts
    Options(OptionsArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Estimate(args) => run_estimate(args),
        Command::Options(args) => run_options(args),
    }
}
