//! Interactive map session.
//!
//! Provides a terminal-based UI using `dialoguer` that drives a
//! [`ViewState`] the same way the map sidebar does: toggling filters,
//! searching, and selecting locations. The terminal stands in for the map
//! surface behind a [`SurfaceGate`].

use diaspora_map_demographics::Dataset;
use diaspora_map_demographics_models::{Community, Country, PoiCategory};
use diaspora_map_view::display::{DetailCard, PopulationSlider, SuggestionRow};
use diaspora_map_view::{MapStyle, SurfaceEvent, SurfaceGate, ViewState};
use dialoguer::{Input, MultiSelect, Select};

use crate::terminal::TerminalSurface;

/// Actions offered by the session menu.
enum Action {
    Search,
    Countries,
    States,
    Communities,
    PoiTypes,
    Population,
    ClearFilters,
    SelectLocation,
    Dismiss,
    List,
    Quit,
}

impl Action {
    const ALL: &[Self] = &[
        Self::Search,
        Self::Countries,
        Self::States,
        Self::Communities,
        Self::PoiTypes,
        Self::Population,
        Self::ClearFilters,
        Self::SelectLocation,
        Self::Dismiss,
        Self::List,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Search => "Search cities",
            Self::Countries => "Filter by country",
            Self::States => "Filter by state / province",
            Self::Communities => "Filter by community",
            Self::PoiTypes => "Points of interest",
            Self::Population => "Population range",
            Self::ClearFilters => "Clear all filters",
            Self::SelectLocation => "Select a location",
            Self::Dismiss => "Close location details",
            Self::List => "List visible locations",
            Self::Quit => "Quit",
        }
    }
}

/// Runs the session until the user quits.
///
/// # Errors
///
/// Returns an error if reading user input fails.
pub fn run(dataset: &Dataset, style: &MapStyle) -> Result<(), Box<dyn std::error::Error>> {
    let mut view = ViewState::new(dataset);
    let mut map = SurfaceGate::new(TerminalSurface::default(), style.camera.clone());

    println!("Indian Diaspora Map");
    println!();
    map.mark_ready(&view);

    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    loop {
        println!("{}", crate::status_line(&view));

        let idx = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        match Action::ALL[idx] {
            Action::Search => search(&mut view)?,
            Action::Countries => {
                let chosen = pick_many(
                    "Countries",
                    Country::all(),
                    |c| c.display_name().to_string(),
                    |c| view.criteria().countries.contains(c),
                )?;
                for country in Country::all() {
                    if chosen.contains(country) != view.criteria().countries.contains(country) {
                        view.toggle_country(*country);
                    }
                }
            }
            Action::States => {
                for country in Country::all() {
                    let states = diaspora_map_query::unique_states(dataset, Some(*country));
                    if states.is_empty() {
                        continue;
                    }
                    let chosen = pick_many(
                        country.region_label(),
                        &states,
                        |s| (*s).to_string(),
                        |s| view.criteria().states.contains(*s),
                    )?;
                    for state in &states {
                        if chosen.contains(state) != view.criteria().states.contains(*state) {
                            view.toggle_state(state);
                        }
                    }
                }
            }
            Action::Communities => {
                let chosen = pick_many(
                    "Communities",
                    Community::all(),
                    ToString::to_string,
                    |c| view.criteria().communities.contains(c),
                )?;
                for community in Community::all() {
                    if chosen.contains(community)
                        != view.criteria().communities.contains(community)
                    {
                        view.toggle_community(*community);
                    }
                }
            }
            Action::PoiTypes => {
                let chosen = pick_many(
                    "Points of interest",
                    PoiCategory::all(),
                    |p| format!("{} {}", p.icon(), p.label()),
                    |p| view.criteria().poi_types.contains(p),
                )?;
                for category in PoiCategory::all() {
                    if chosen.contains(category) != view.criteria().poi_types.contains(category) {
                        view.toggle_poi_type(*category);
                    }
                }
            }
            Action::Population => population(&mut view)?,
            Action::ClearFilters => view.clear_filters(),
            Action::SelectLocation => {
                let visible = view.visible();
                if visible.is_empty() {
                    println!("No locations to select.");
                } else {
                    let rows: Vec<String> = visible
                        .iter()
                        .map(|r| {
                            let row = SuggestionRow::from(*r);
                            format!("{} ({}) {}", row.city, row.region, row.population)
                        })
                        .collect();
                    let idx = Select::new()
                        .with_prompt("Location")
                        .items(&rows)
                        .default(0)
                        .interact()?;
                    view.handle_event(SurfaceEvent::Click(visible[idx].id.clone()));
                }
            }
            Action::Dismiss => view.dismiss(),
            Action::List => {
                crate::print_records(&view.visible());
            }
            Action::Quit => break,
        }

        map.sync(&view);

        if let Some(record) = view.selected() {
            println!();
            crate::print_card(&DetailCard::from(record));
            println!();
        }
    }

    Ok(())
}

/// Prompts for a search term, then offers the matching locations.
fn search(view: &mut ViewState<'_>) -> Result<(), Box<dyn std::error::Error>> {
    let query: String = Input::new()
        .with_prompt("Search city or state (leave empty to clear)")
        .with_initial_text(view.search_query())
        .allow_empty(true)
        .interact_text()?;
    view.set_search_query(query);

    let suggestions = view.search_suggestions();
    if suggestions.is_empty() {
        if !view.search_query().is_empty() {
            println!("No cities found.");
        }
        return Ok(());
    }

    let mut rows: Vec<String> = suggestions
        .iter()
        .map(|r| {
            let row = SuggestionRow::from(*r);
            format!("{} ({}) {}", row.city, row.region, row.population)
        })
        .collect();
    rows.push("Keep search as filter".to_string());

    let idx = Select::new()
        .with_prompt("Matching cities")
        .items(&rows)
        .default(0)
        .interact()?;

    if let Some(record) = suggestions.get(idx) {
        view.pick_suggestion(&record.id);
    }
    Ok(())
}

/// Prompts for slider positions in thousands.
fn population(view: &mut ViewState<'_>) -> Result<(), Box<dyn std::error::Error>> {
    let (min_label, max_label) = PopulationSlider::labels(
        view.criteria().min_population,
        view.criteria().max_population,
    );
    println!("Current range: {min_label} – {max_label}");

    let low: u64 = Input::new()
        .with_prompt(format!(
            "Minimum, in thousands ({}-{})",
            PopulationSlider::MIN,
            PopulationSlider::MAX
        ))
        .default(PopulationSlider::MIN)
        .interact_text()?;
    let high: u64 = Input::new()
        .with_prompt(format!(
            "Maximum, in thousands ({}-{})",
            PopulationSlider::MIN,
            PopulationSlider::MAX
        ))
        .default(PopulationSlider::MAX)
        .interact_text()?;

    let (min, max) = PopulationSlider::bounds(low, high);
    view.set_population_range(min, max);
    Ok(())
}

/// Multi-select over `items`, pre-checking the currently active ones.
fn pick_many<T: Clone>(
    prompt: &str,
    items: &[T],
    label: impl Fn(&T) -> String,
    active: impl Fn(&T) -> bool,
) -> Result<Vec<T>, Box<dyn std::error::Error>> {
    let labels: Vec<String> = items.iter().map(&label).collect();
    let defaults: Vec<bool> = items.iter().map(&active).collect();

    let picked = MultiSelect::new()
        .with_prompt(prompt)
        .items(&labels)
        .defaults(&defaults)
        .interact()?;

    Ok(picked.into_iter().map(|i| items[i].clone()).collect())
}
