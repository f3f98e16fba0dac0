use crate::prelude::*;
use clap::Parser;

mod error;
mod extract;
mod fragments;
mod prelude;
mod source;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Extract structured closure records from government notice PDFs"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Whether to display additional information.
    #[clap(long, env = "CLOSURES_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Reconstruct closure records from a notices PDF
    Extract(extract::ExtractOptions),

    /// Dump the positioned text fragments a PDF renders to
    Fragments(fragments::FragmentsOptions),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Extract(options) => extract::run(options, app.global).await,
        SubCommands::Fragments(options) => fragments::run(options, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
