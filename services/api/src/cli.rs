use crate::commands::{
    run_jurisdiction, run_occupancy, run_report, run_rules, JurisdictionArgs, OccupancyArgs,
    ReportArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use dd_scoring::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Due Diligence Scoring",
    about = "Score school site candidates for occupancy conversion and state registration",
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
    /// Score a building for conversion to educational use
    Occupancy(OccupancyArgs),
    /// Score a state's school registration requirements
    Jurisdiction(JurisdictionArgs),
    /// Score a site and render the report placeholders
    Report(ReportArgs),
    /// List the active rule tables
    Rules,
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
        Command::Occupancy(args) => run_occupancy(args),
        Command::Jurisdiction(args) => run_jurisdiction(args),
        Command::Report(args) => run_report(args),
        Command::Rules => run_rules(),
    }
}
