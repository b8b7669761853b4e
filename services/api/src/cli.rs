use crate::quote::{run_price_export, run_quote, PricesArgs, QuoteArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use diag_quote::error::AppError;
use diag_quote::pricing::ScalingMethod;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Diagnostic Quote",
    about = "Price real-estate diagnostic packs over HTTP or from the command line",
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
    /// Price one job and print the itemized breakdown
    Quote(QuoteArgs),
    /// Print or export the active price table as CSV
    Prices(PricesArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// CSV price table to load instead of the configured one
    #[arg(long)]
    pub(crate) price_table: Option<PathBuf>,
    /// Default scaling method past 100 m² (multiplier or alternate)
    #[arg(long, value_parser = crate::infra::parse_scaling)]
    pub(crate) scaling: Option<ScalingMethod>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Quote(args) => run_quote(args),
        Command::Prices(args) => run_price_export(args),
    }
}
