use campvue_core::normalize::{normalize_activities, normalize_activity, ActivityOutput, Shaped};
use campvue_core::query::ACTIVITIES_MAX_PAGES;
use colored::Colorize;

use crate::cli::PagingArgs;
use crate::prelude::{eprintln, println, *};
use crate::ridb::resources;

#[derive(Debug, clap::Parser)]
#[command(name = "activities")]
#[command(about = "RIDB activity catalogue")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// List activities known to RIDB
    #[clap(name = "list")]
    List(ListOptions),

    /// Show a single activity
    #[clap(name = "get")]
    Get(GetOptions),
}

#[derive(Debug, clap::Args, Clone)]
pub struct ListOptions {
    #[clap(flatten)]
    pub paging: PagingArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args, Clone)]
pub struct GetOptions {
    /// RIDB activity ID
    pub id: String,

    /// Include the RIDB record next to the normalized one
    #[arg(long)]
    pub include_raw: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    match app.command {
        Commands::List(options) => list_handler(options, global).await,
        Commands::Get(options) => get_handler(options, global).await,
    }
}

async fn list_handler(options: ListOptions, global: crate::Global) -> Result<()> {
    let client = global.ridb_client()?;
    let paging = options.paging.paging(ACTIVITIES_MAX_PAGES)?;

    let spinner = new_spinner("Fetching activities...");
    let listing = resources::activities(&client, paging, Some(&spinner)).await;
    spinner.finish_and_clear();
    let listing = listing?;

    let activities = normalize_activities(&listing.records);

    if options.json {
        return print_json(&activities);
    }

    let total_info = listing
        .total_count
        .map(|t| format!(" (of {} total)", t))
        .unwrap_or_default();
    println!(
        "\nFound {} activit{}{}:\n",
        activities.len().to_string().bold(),
        if activities.len() == 1 { "y" } else { "ies" },
        total_info
    );

    if activities.is_empty() {
        println!("No activities found.");
        return Ok(());
    }

    print_activities(&activities);

    if listing.truncated {
        eprintln!();
        eprintln!(
            "{}",
            "Stopped at the page limit; raise --max-pages to read further.".yellow()
        );
    }

    Ok(())
}

async fn get_handler(options: GetOptions, global: crate::Global) -> Result<()> {
    let client = global.ridb_client()?;

    if global.verbose {
        eprintln!("Fetching activity {}", options.id);
    }

    let raw = resources::activity(&client, &options.id).await?;
    let normalized = normalize_activity(&raw);

    if options.json {
        return print_json(&Shaped::new(raw, normalized, options.include_raw));
    }

    print_activities(std::slice::from_ref(&normalized));

    Ok(())
}

/// Print activities as a two column table
pub fn print_activities(activities: &[ActivityOutput]) {
    let mut table = new_table();
    table.add_row(prettytable::row!["ID".bold().cyan(), "Name".bold().cyan()]);

    for activity in activities {
        table.add_row(prettytable::row![
            activity.id.to_string().bright_yellow(),
            activity.name.as_deref().unwrap_or("-").bright_white()
        ]);
    }

    table.printstd();
}
