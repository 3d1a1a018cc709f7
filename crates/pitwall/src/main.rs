use crate::prelude::*;
use clap::Parser;
use std::path::PathBuf;

mod error;
mod ergast;
mod pins;
mod prelude;
mod races;
mod render;
mod results;
mod seasons;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Explore Formula One seasons, races and race results from the terminal"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Ergast-compatible API base URL
    #[clap(long, env = "PITWALL_BASE_URL", global = true)]
    base_url: Option<String>,

    /// File used to store pinned races
    #[clap(long, env = "PITWALL_PINS_FILE", global = true)]
    pins_file: Option<PathBuf>,

    /// Whether to display additional information.
    #[clap(long, env = "PITWALL_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// List Formula One seasons
    Seasons(crate::seasons::ListOptions),

    /// List the races of a season, pinned races first
    Races(crate::races::ListOptions),

    /// Show the results of a race
    Results(crate::results::ReadOptions),

    /// Manage pinned races
    Pins(crate::pins::App),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Seasons(options) => crate::seasons::run(options, app.global).await,
        SubCommands::Races(options) => crate::races::run(options, app.global).await,
        SubCommands::Results(options) => crate::results::run(options, app.global).await,
        SubCommands::Pins(sub_app) => crate::pins::run(sub_app, app.global),
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
