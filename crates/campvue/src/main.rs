use crate::prelude::{eprintln, *};
use crate::ridb::{RidbClient, RidbConfig};
use clap::Parser;

mod activities;
mod campsite;
mod cli;
mod error;
mod facility;
mod prelude;
mod ridb;
mod serve;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Browse campgrounds, campsites and activities from the Recreation Information Database (RIDB)"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// RIDB API key
    #[clap(long, env = "RIDB_API_KEY", global = true, hide_env_values = true)]
    api_key: Option<String>,

    /// RIDB API base URL
    #[clap(long, env = "RIDB_BASE_URL", global = true)]
    base_url: Option<String>,

    /// Whether to display additional information.
    #[clap(long, env = "CAMPVUE_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

impl Global {
    /// RIDB client built from the global flags and the environment
    pub fn ridb_client(&self) -> Result<RidbClient, Error> {
        let config = RidbConfig::from_env(self.base_url.clone(), self.api_key.clone())?;

        if self.verbose {
            eprintln!(
                "RIDB API Base: {} (timeout {}s)",
                config.base_url,
                config.timeout.as_secs()
            );
        }

        RidbClient::new(&config)
    }
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// RIDB activity catalogue
    Activities(crate::activities::App),

    /// Facility (campground) operations
    Facility(crate::facility::App),

    /// Campsite operations
    Campsite(crate::campsite::App),

    /// Serve the RIDB resources over HTTP
    Serve(crate::serve::ServeOptions),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Activities(sub_app) => crate::activities::run(sub_app, app.global).await,
        SubCommands::Facility(sub_app) => crate::facility::run(sub_app, app.global).await,
        SubCommands::Campsite(sub_app) => crate::campsite::run(sub_app, app.global).await,
        SubCommands::Serve(options) => crate::serve::run(options, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
