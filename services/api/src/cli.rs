use crate::recommend::{run_recommend, RecommendArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use technician_ai::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Technician Assignment Engine",
    about = "Rank technicians for car maintenance bookings over HTTP or from the command line",
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
    /// Recommend a technician for a booking read from a JSON file
    Recommend(RecommendArgs),
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
        Command::Recommend(args) => {
            tokio::task::spawn_blocking(move || run_recommend(args)).await?
        }
    }
}
