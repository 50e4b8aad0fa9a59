use crate::report::{run_property_lookup, run_score, PropertyArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use site_scout::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Site Scout",
    about = "Rank candidate cities for a new office location and look up commercial properties",
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
    /// Collect metrics for the given cities and print the weighted ranking
    Score(ScoreArgs),
    /// Look up a property record, nearby commercial parcels and the owner contact
    Property(PropertyArgs),
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
        Command::Score(args) => run_score(args).await,
        Command::Property(args) => run_property_lookup(args).await,
    }
}
