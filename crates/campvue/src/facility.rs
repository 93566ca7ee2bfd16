use campvue_core::normalize::{
    normalize_activities, normalize_campsite, normalize_facility, CampsiteOutput, FacilityOutput,
    Shaped, VehicleLengths,
};
use campvue_core::query::{
    check_max_pages, PageRequest, FACILITY_CAMPSITES_MAX_PAGES, MAX_PAGE_SIZE,
    VEHICLE_LENGTHS_MAX_PAGES,
};
use colored::Colorize;

use crate::cli::{PagingArgs, QueryArgs};
use crate::prelude::{eprintln, println, *};
use crate::ridb::resources;

#[derive(Debug, clap::Parser)]
#[command(name = "facility")]
#[command(about = "RIDB facility (campground) operations")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Show a facility
    #[clap(name = "get")]
    Get(GetOptions),

    /// List the activities offered at a facility
    #[clap(name = "activities")]
    Activities(ActivitiesOptions),

    /// List the campsites of a facility
    #[clap(name = "campsites")]
    Campsites(CampsitesOptions),

    /// Longest permitted vehicle for every campsite of a facility
    #[clap(name = "vehicle-lengths")]
    VehicleLengths(VehicleLengthsOptions),
}

#[derive(Debug, clap::Args, Clone)]
pub struct GetOptions {
    /// RIDB facility ID
    pub id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args, Clone)]
pub struct ActivitiesOptions {
    /// RIDB facility ID
    pub id: String,

    /// Page size used while paging through the activities (1-50)
    #[arg(short, long, default_value_t = MAX_PAGE_SIZE)]
    pub limit: usize,

    /// Activities to skip
    #[arg(short, long, default_value = "0")]
    pub offset: usize,

    /// Keep at most this many activities (0 keeps all)
    #[arg(short, long, default_value = "0")]
    pub take: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args, Clone)]
pub struct CampsitesOptions {
    /// RIDB facility ID
    pub id: String,

    #[clap(flatten)]
    pub paging: PagingArgs,

    #[clap(flatten)]
    pub query: QueryArgs,

    /// Include the RIDB records next to the normalized ones
    #[arg(long)]
    pub include_raw: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args, Clone)]
pub struct VehicleLengthsOptions {
    /// RIDB facility ID
    pub id: String,

    /// Only consider reservable (true) or non-reservable (false) sites
    #[arg(long)]
    pub reservable: Option<bool>,

    /// Upper bound on campsite pages to read
    #[arg(long, default_value_t = VEHICLE_LENGTHS_MAX_PAGES)]
    pub max_pages: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    match app.command {
        Commands::Get(options) => get_handler(options, global).await,
        Commands::Activities(options) => activities_handler(options, global).await,
        Commands::Campsites(options) => campsites_handler(options, global).await,
        Commands::VehicleLengths(options) => vehicle_lengths_handler(options, global).await,
    }
}

async fn get_handler(options: GetOptions, global: crate::Global) -> Result<()> {
    let client = global.ridb_client()?;

    let spinner = new_spinner(format!("Fetching facility {}...", options.id));
    let facility = resources::facility(&client, &options.id).await;
    spinner.finish_and_clear();

    let facility = normalize_facility(&facility?);

    if options.json {
        return print_json(&facility);
    }

    print_facility(&facility);

    Ok(())
}

fn print_facility(facility: &FacilityOutput) {
    println!("\n{}", facility.name.bold().bright_white());
    println!(
        "{} {}",
        facility.park.bright_magenta(),
        facility
            .park_type
            .as_deref()
            .map(|kind| format!("({kind})"))
            .unwrap_or_default()
    );
    println!();

    let mut table = new_table();
    let rows = [
        ("RIDB ID", facility.ridb_id.clone()),
        (
            "Type",
            facility.facility_type.clone().unwrap_or_else(|| "-".to_string()),
        ),
        (
            "Location",
            match (facility.latitude, facility.longitude) {
                (Some(lat), Some(lon)) => format!("{lat}, {lon}"),
                _ => "-".to_string(),
            },
        ),
        ("Reservations", facility.reservations.clone()),
    ];
    for (label, value) in rows {
        table.add_row(prettytable::row![label.bold().cyan(), value]);
    }
    table.printstd();

    if let Some(description) = &facility.description {
        println!("\n{}", description);
    }
}

async fn activities_handler(options: ActivitiesOptions, global: crate::Global) -> Result<()> {
    let client = global.ridb_client()?;
    let start = PageRequest::new(options.limit, options.offset)?;
    let take = (options.take > 0).then_some(options.take);

    let spinner = new_spinner(format!("Fetching activities for facility {}...", options.id));
    let activities = resources::facility_activities(&client, &options.id, start, take).await;
    spinner.finish_and_clear();

    let activities = normalize_activities(&activities?);

    if options.json {
        return print_json(&activities);
    }

    println!(
        "\nFacility {} offers {} activit{}:\n",
        options.id.bold(),
        activities.len().to_string().bold(),
        if activities.len() == 1 { "y" } else { "ies" }
    );

    if !activities.is_empty() {
        crate::activities::print_activities(&activities);
    }

    Ok(())
}

async fn campsites_handler(options: CampsitesOptions, global: crate::Global) -> Result<()> {
    let client = global.ridb_client()?;
    let paging = options.paging.paging(FACILITY_CAMPSITES_MAX_PAGES)?;
    let query = options.query.query();

    let spinner = new_spinner(format!("Fetching campsites for facility {}...", options.id));
    let listing = resources::facility_campsites(
        &client,
        &options.id,
        paging,
        query.as_deref(),
        Some(&spinner),
    )
    .await;
    spinner.finish_and_clear();
    let listing = listing?;

    let normalized: Vec<CampsiteOutput> = listing.records.iter().map(normalize_campsite).collect();

    if options.json {
        return print_json(&Shaped::new(listing.records, normalized, options.include_raw));
    }

    println!(
        "\nFound {} campsite(s){}:\n",
        listing.records.len().to_string().bold(),
        listing
            .total_count
            .map(|t| format!(" (of {} total)", t))
            .unwrap_or_default()
    );

    if listing.records.is_empty() {
        println!("No campsites found.");
        return Ok(());
    }

    let mut table = new_table();
    table.add_row(prettytable::row![
        "ID".bold().cyan(),
        "Site".bold().cyan(),
        "Loop".bold().cyan(),
        "Type".bold().cyan(),
        "Reservable".bold().cyan(),
        "Features".bold().cyan(),
        "Equipment".bold().cyan()
    ]);

    for (campsite, output) in listing.records.iter().zip(&normalized) {
        table.add_row(prettytable::row![
            campsite.campsite_id.bright_yellow(),
            campsite.campsite_name.bright_white(),
            campsite.loop_name,
            campsite.campsite_type,
            format_flag(campsite.campsite_reservable),
            output.features.len(),
            output.equipment.len()
        ]);
    }

    table.printstd();

    if listing.truncated {
        eprintln!();
        eprintln!(
            "{}",
            "Stopped at the page limit; raise --max-pages to read further.".yellow()
        );
    }

    Ok(())
}

async fn vehicle_lengths_handler(
    options: VehicleLengthsOptions,
    global: crate::Global,
) -> Result<()> {
    let client = global.ridb_client()?;
    let max_pages = check_max_pages(options.max_pages)?;

    let spinner = new_spinner(format!("Fetching campsites for facility {}...", options.id));
    let lengths = resources::facility_vehicle_lengths(
        &client,
        &options.id,
        options.reservable,
        max_pages,
        Some(&spinner),
    )
    .await;
    spinner.finish_and_clear();
    let lengths = lengths?;

    if options.json {
        return print_json(&lengths);
    }

    print_vehicle_lengths(&lengths);

    Ok(())
}

fn print_vehicle_lengths(lengths: &VehicleLengths) {
    println!(
        "\nFacility {}: longest permitted vehicle {} ft across {} site(s)\n",
        lengths.facility_id.bold(),
        lengths.max_length.to_string().bold().bright_green(),
        lengths.sites.len()
    );

    if lengths.sites.is_empty() {
        return;
    }

    let mut table = new_table();
    table.add_row(prettytable::row![
        "Site".bold().cyan(),
        "RIDB ID".bold().cyan(),
        "Max Length".bold().cyan()
    ]);

    for site in &lengths.sites {
        table.add_row(prettytable::row![
            site.site_number.bright_white(),
            site.ridb_site_id.bright_yellow(),
            site.max_length
        ]);
    }

    table.printstd();
}

fn format_flag(flag: bool) -> String {
    if flag {
        "yes".bright_green().to_string()
    } else {
        "no".bright_red().to_string()
    }
}
