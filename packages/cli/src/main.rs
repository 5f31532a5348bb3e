#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command line explorer for the Indian diaspora population map.
//!
//! Every subcommand runs the same filter and search pipeline the map view
//! uses. Without a subcommand an interactive session starts, with a
//! terminal standing in for the map surface.
//!
//! Configuration comes from flags first, then the environment:
//!
//! * `--data` / `DIASPORA_MAP_DATA`: dataset JSON (default: embedded)
//! * `--style` / `DIASPORA_MAP_STYLE`: map style TOML (default: embedded)
//! * `RUST_LOG`: log filter

mod interactive;
mod terminal;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use diaspora_map_demographics::Dataset;
use diaspora_map_demographics_models::{Community, Country, LocationRecord};
use diaspora_map_query_models::FilterCriteria;
use diaspora_map_view::display::{self, DetailCard, StatsBar};
use diaspora_map_view::{MapStyle, ResultStatus, ViewState};

const DATA_ENV: &str = "DIASPORA_MAP_DATA";
const STYLE_ENV: &str = "DIASPORA_MAP_STYLE";

#[derive(Parser)]
#[command(name = "diaspora_map", about = "Indian diaspora population explorer")]
struct Cli {
    /// Dataset JSON file to load instead of the embedded one
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Map style TOML file to load instead of the embedded one
    #[arg(long, global = true)]
    style: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List matching locations
    List {
        #[command(flatten)]
        filters: FilterArgs,

        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Summarize matching locations
    Stats {
        #[command(flatten)]
        filters: FilterArgs,

        /// Print the raw statistics as JSON
        #[arg(long)]
        json: bool,
    },
    /// Export matching locations as a `GeoJSON` `FeatureCollection`
    Geojson {
        #[command(flatten)]
        filters: FilterArgs,

        /// Write to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Show the detail card of one location
    Show {
        /// Location id, e.g. `us-edison`
        id: String,

        /// Print the card as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the states and provinces present in the dataset
    States {
        /// Only list regions of this country (`US` or `CA`)
        #[arg(long)]
        country: Option<Country>,
    },
    /// Print the camera defaults and map layer definitions as JSON
    Style,
}

/// Filter and search flags shared by the query subcommands.
#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Keep locations in this country (repeatable)
    #[arg(long = "country")]
    countries: Vec<Country>,

    /// Keep locations in this state or province (repeatable)
    #[arg(long = "state")]
    states: Vec<String>,

    /// Keep locations with this community (repeatable)
    #[arg(long = "community")]
    communities: Vec<Community>,

    /// Minimum Indian population
    #[arg(long)]
    min_population: Option<u64>,

    /// Maximum Indian population
    #[arg(long)]
    max_population: Option<u64>,

    /// Case-insensitive city or state/province search
    #[arg(long)]
    search: Option<String>,
}

impl FilterArgs {
    fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            countries: self.countries.iter().copied().collect(),
            states: self.states.iter().cloned().collect(),
            communities: self.communities.iter().copied().collect(),
            min_population: self.min_population,
            max_population: self.max_population,
            poi_types: BTreeSet::new(),
        }
    }

    fn view<'a>(&self, dataset: &'a Dataset) -> ViewState<'a> {
        let mut view = ViewState::new(dataset);
        view.set_criteria(self.criteria());
        if let Some(query) = &self.search {
            view.set_search_query(query.as_str());
        }
        view
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let loaded;
    let dataset = match resolve_path(cli.data, DATA_ENV) {
        Some(path) => {
            loaded = diaspora_map_demographics::load_from_path(&path)?;
            &loaded
        }
        None => diaspora_map_demographics::embedded(),
    };

    let style = match resolve_path(cli.style, STYLE_ENV) {
        Some(path) => MapStyle::load(&path)?,
        None => MapStyle::default(),
    };

    match cli.command {
        None => interactive::run(dataset, &style)?,
        Some(Commands::List { filters, json }) => list(&filters.view(dataset), json)?,
        Some(Commands::Stats { filters, json }) => stats(&filters.view(dataset), json)?,
        Some(Commands::Geojson {
            filters,
            output,
            pretty,
        }) => geojson(&filters.view(dataset), output.as_deref(), pretty)?,
        Some(Commands::Show { id, json }) => show(dataset, &id, json)?,
        Some(Commands::States { country }) => {
            for state in diaspora_map_query::unique_states(dataset, country) {
                println!("{state}");
            }
        }
        Some(Commands::Style) => {
            let doc = serde_json::json!({
                "camera": style.camera,
                "layers": style.layers(),
            });
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
    }

    Ok(())
}

/// A flag value wins over the environment variable.
fn resolve_path(flag: Option<PathBuf>, env: &str) -> Option<PathBuf> {
    flag.or_else(|| {
        std::env::var(env)
            .ok()
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    })
}

fn list(view: &ViewState<'_>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let visible = view.visible();
    if json {
        println!("{}", serde_json::to_string_pretty(&visible)?);
        return Ok(());
    }

    print_records(&visible);
    println!();
    println!("{}", status_line(view));
    Ok(())
}

fn stats(view: &ViewState<'_>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let summary = view.summary();
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let bar = StatsBar::from(&summary);
    println!("Total population:   {}", bar.total_population);
    println!("Cities:             {}", bar.cities);
    println!("Average % Indian:   {}", bar.average_percent);
    println!("Points of interest: {}", bar.points_of_interest);
    Ok(())
}

fn geojson(
    view: &ViewState<'_>,
    output: Option<&Path>,
    pretty: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let collection = view.features();
    let text = if pretty {
        serde_json::to_string_pretty(&collection)?
    } else {
        diaspora_map_features::to_geojson_string(&collection)?
    };

    match output {
        Some(path) => {
            std::fs::write(path, &text)?;
            log::info!(
                "Wrote {} features to {}",
                collection.features.len(),
                path.display()
            );
        }
        None => println!("{text}"),
    }
    Ok(())
}

fn show(dataset: &Dataset, id: &str, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let record = dataset
        .find(id)
        .ok_or_else(|| format!("No location with id '{id}'"))?;
    let card = DetailCard::from(record);

    if json {
        println!("{}", serde_json::to_string_pretty(&card)?);
    } else {
        print_card(&card);
    }
    Ok(())
}

fn print_records(records: &[&LocationRecord]) {
    println!(
        "{:<18} {:<16} {:<26} {:>10} {:>7}",
        "ID", "CITY", "REGION", "INDIAN POP", "%"
    );
    for record in records {
        println!(
            "{:<18} {:<16} {:<26} {:>10} {:>7}",
            record.id,
            record.city,
            display::region_line(record),
            display::format_count(record.indian_population),
            display::format_percent(record.percent_indian()),
        );
    }
}

fn print_card(card: &DetailCard) {
    println!("{}", card.title);
    println!("{}", card.subtitle);
    println!();
    println!(
        "  Indian population: {} ({} of total)",
        card.indian_population, card.percent_indian
    );
    println!("  Total population:  {}", card.total_population);
    println!("  Communities:       {}", card.communities.join(", "));
    for tile in &card.points_of_interest {
        println!("  {} {:>5} {}", tile.icon, tile.count, tile.label);
    }
}

fn status_line(view: &ViewState<'_>) -> String {
    let bar = StatsBar::from(&view.summary());
    let status = match view.result_status() {
        ResultStatus::Unfiltered => "No filters applied".to_string(),
        ResultStatus::Matches(n) => format!("{n} matching locations"),
        ResultStatus::NoMatches => "No locations match the current filters".to_string(),
    };
    format!(
        "{status} | {} Indian residents in {} cities | avg {}",
        bar.total_population, bar.cities, bar.average_percent
    )
}
