use campvue_core::attributes::{AttributeScope, AttributeValue, ClassifiedAttribute};
use campvue_core::normalize::{classify_attributes, normalize_campsite, CampsiteOutput, Shaped};
use campvue_core::query::CAMPSITE_ATTRIBUTES_MAX_PAGES;
use colored::Colorize;

use crate::cli::{PagingArgs, QueryArgs};
use crate::prelude::{eprintln, println, *};
use crate::ridb::resources;

#[derive(Debug, clap::Parser)]
#[command(name = "campsite")]
#[command(about = "RIDB campsite operations")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Show a campsite with its features, permitted equipment and media
    #[clap(name = "get")]
    Get(GetOptions),

    /// List and classify the attributes of a campsite
    #[clap(name = "attributes")]
    Attributes(AttributesOptions),
}

#[derive(Debug, clap::Args, Clone)]
pub struct GetOptions {
    /// RIDB campsite ID
    pub id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args, Clone)]
pub struct AttributesOptions {
    /// RIDB campsite ID
    pub id: String,

    #[clap(flatten)]
    pub paging: PagingArgs,

    #[clap(flatten)]
    pub query: QueryArgs,

    /// Include the RIDB records next to the classified ones
    #[arg(long)]
    pub include_raw: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    match app.command {
        Commands::Get(options) => get_handler(options, global).await,
        Commands::Attributes(options) => attributes_handler(options, global).await,
    }
}

async fn get_handler(options: GetOptions, global: crate::Global) -> Result<()> {
    let client = global.ridb_client()?;

    let spinner = new_spinner(format!("Fetching campsite {}...", options.id));
    let campsite = resources::campsite(&client, &options.id).await;
    spinner.finish_and_clear();
    let campsite = campsite?;

    let normalized = normalize_campsite(&campsite);

    if options.json {
        return print_json(&serde_json::json!({ "normalized": normalized }));
    }

    println!(
        "\n{} {} ({}, loop {})\n",
        "Campsite".bold(),
        campsite.campsite_name.bold().bright_white(),
        campsite.campsite_type,
        campsite.loop_name
    );

    print_campsite(&normalized);

    Ok(())
}

fn print_campsite(campsite: &CampsiteOutput) {
    if !campsite.features.is_empty() {
        print_attributes(&campsite.features);
    }

    if !campsite.equipment.is_empty() {
        println!("\n{}", "Permitted equipment".bold());
        let mut table = new_table();
        table.add_row(prettytable::row![
            "Name".bold().cyan(),
            "Max Length".bold().cyan()
        ]);
        for equipment in &campsite.equipment {
            table.add_row(prettytable::row![
                equipment.name.bright_white(),
                equipment.max_length
            ]);
        }
        table.printstd();
    }

    if !campsite.media.is_empty() {
        println!("\n{}", "Media".bold());
        for media in &campsite.media {
            let marker = if media.is_primary { "*" } else { " " };
            println!(
                "{} {} {}",
                marker.bright_yellow(),
                media.title.as_deref().unwrap_or("(untitled)"),
                media.url.bright_blue()
            );
        }
    }
}

async fn attributes_handler(options: AttributesOptions, global: crate::Global) -> Result<()> {
    let client = global.ridb_client()?;
    let paging = options.paging.paging(CAMPSITE_ATTRIBUTES_MAX_PAGES)?;
    let query = options.query.query();

    let spinner = new_spinner(format!("Fetching attributes for campsite {}...", options.id));
    let listing = resources::campsite_attributes(
        &client,
        &options.id,
        paging,
        query.as_deref(),
        Some(&spinner),
    )
    .await;
    spinner.finish_and_clear();
    let listing = listing?;

    let classified = classify_attributes(&listing.records);

    if options.json {
        return print_json(&Shaped::new(listing.records, classified, options.include_raw));
    }

    println!(
        "\nFound {} attribute(s){}:\n",
        classified.len().to_string().bold(),
        listing
            .total_count
            .map(|t| format!(" (of {} total)", t))
            .unwrap_or_default()
    );

    if classified.is_empty() {
        println!("No attributes found.");
        return Ok(());
    }

    print_attributes(&classified);

    if listing.truncated {
        eprintln!();
        eprintln!(
            "{}",
            "Stopped at the page limit; raise --max-pages to read further.".yellow()
        );
    }

    Ok(())
}

fn print_attributes(attributes: &[ClassifiedAttribute]) {
    let mut table = new_table();
    table.add_row(prettytable::row![
        "Key".bold().cyan(),
        "Label".bold().cyan(),
        "Scope".bold().cyan(),
        "Type".bold().cyan(),
        "Value".bold().cyan()
    ]);

    for attribute in attributes {
        let key = if attribute.is_amenity {
            attribute.key.bright_green().to_string()
        } else {
            attribute.key.clone()
        };

        table.add_row(prettytable::row![
            key,
            attribute.label.bright_white(),
            format_scope(attribute.scope),
            format!("{:?}", attribute.value_type()).to_lowercase(),
            format_value(&attribute.value)
        ]);
    }

    table.printstd();
}

fn format_scope(scope: AttributeScope) -> String {
    match scope {
        AttributeScope::Campground => "campground".bright_magenta().to_string(),
        AttributeScope::Campsite => "campsite".bright_blue().to_string(),
        AttributeScope::Unknown => "unknown".dimmed().to_string(),
    }
}

fn format_value(value: &AttributeValue) -> String {
    match value {
        AttributeValue::Boolean(true) => value.to_string().bright_green().to_string(),
        AttributeValue::Boolean(false) => value.to_string().bright_red().to_string(),
        _ => value.to_string(),
    }
}
