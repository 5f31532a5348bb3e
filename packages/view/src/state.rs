//! Session view state: filters, search term, selection and hover.
//!
//! [`ViewState`] owns only user input. Everything shown on screen (the
//! visible records, their features, the stats bar) is derived from that
//! input and the dataset on demand, so the derived values can never go
//! stale.

use diaspora_map_demographics::Dataset;
use diaspora_map_demographics_models::{Community, Country, LocationRecord, PoiCategory};
use diaspora_map_query_models::{CriteriaPatch, FilterCriteria, SummaryStats};
use geojson::FeatureCollection;

/// An interaction reported by the rendering surface.
///
/// Identifiers are resolved against the dataset; any other payload the
/// surface might echo back is never trusted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// Pointer entered a feature (`Some(id)`) or left all features (`None`).
    Hover(Option<String>),
    /// A feature was clicked.
    Click(String),
}

/// Whether the visible set reflects user restrictions and what they found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultStatus {
    /// No filter or search term is applied.
    Unfiltered,
    /// Restrictions are applied and this many records match.
    Matches(usize),
    /// Restrictions are applied and nothing matches.
    NoMatches,
}

/// Mutable state of one viewing session over a dataset.
#[derive(Debug, Clone)]
pub struct ViewState<'a> {
    dataset: &'a Dataset,
    criteria: FilterCriteria,
    search_query: String,
    selected: Option<&'a LocationRecord>,
    hovered: Option<&'a LocationRecord>,
}

impl<'a> ViewState<'a> {
    /// Creates a session with no filters, no search term and no selection.
    #[must_use]
    pub fn new(dataset: &'a Dataset) -> Self {
        Self {
            dataset,
            criteria: FilterCriteria::default(),
            search_query: String::new(),
            selected: None,
            hovered: None,
        }
    }

    /// The dataset this session views.
    #[must_use]
    pub const fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    /// Current filter criteria.
    #[must_use]
    pub const fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Current search term.
    #[must_use]
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// The selected record, if any.
    #[must_use]
    pub const fn selected(&self) -> Option<&'a LocationRecord> {
        self.selected
    }

    /// The record under the pointer, if any.
    #[must_use]
    pub const fn hovered(&self) -> Option<&'a LocationRecord> {
        self.hovered
    }

    // ── Filters ─────────────────────────────────────────

    /// Replaces the criteria wholesale. The selection is kept.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
    }

    /// Merges a partial update into the criteria. The selection is kept.
    pub fn apply_patch(&mut self, patch: CriteriaPatch) {
        self.criteria.apply(patch);
    }

    /// Adds the country to the filter, or removes it if already present.
    pub fn toggle_country(&mut self, country: Country) {
        toggle(&mut self.criteria.countries, country);
    }

    /// Adds the state/province to the filter, or removes it.
    pub fn toggle_state(&mut self, state: &str) {
        if !self.criteria.states.remove(state) {
            self.criteria.states.insert(state.to_string());
        }
    }

    /// Adds the community to the filter, or removes it.
    pub fn toggle_community(&mut self, community: Community) {
        toggle(&mut self.criteria.communities, community);
    }

    /// Adds the point of interest category, or removes it.
    pub fn toggle_poi_type(&mut self, category: PoiCategory) {
        toggle(&mut self.criteria.poi_types, category);
    }

    /// Sets both population bounds. `None` removes a bound.
    pub fn set_population_range(&mut self, min: Option<u64>, max: Option<u64>) {
        self.apply_patch(CriteriaPatch::population(min, max));
    }

    /// Resets all criteria and the search term. The selection is kept.
    pub fn clear_filters(&mut self) {
        self.criteria = FilterCriteria::default();
        self.search_query.clear();
    }

    /// Whether any structural filter narrows the result.
    #[must_use]
    pub fn has_active_filters(&self) -> bool {
        self.criteria.has_active_filters()
    }

    // ── Search ──────────────────────────────────────────

    /// Updates the search term.
    ///
    /// Starting a new search (going from an empty to a non-empty term)
    /// dismisses the current selection.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if self.search_query.is_empty() && !query.is_empty() && self.selected.is_some() {
            log::debug!("New search started; dismissing selection");
            self.selected = None;
        }
        self.search_query = query;
    }

    /// Records offered in the search dropdown.
    ///
    /// Empty while there is no search term; otherwise the visible records.
    #[must_use]
    pub fn search_suggestions(&self) -> Vec<&'a LocationRecord> {
        if self.search_query.is_empty() {
            return Vec::new();
        }
        self.visible()
    }

    /// Selects a record from the search dropdown and clears the search term.
    pub fn pick_suggestion(&mut self, id: &str) -> Option<&'a LocationRecord> {
        let picked = self.select(id)?;
        self.search_query.clear();
        Some(picked)
    }

    // ── Selection ───────────────────────────────────────

    /// Selects the record with this identifier.
    ///
    /// The lookup is against the whole dataset, not the visible records.
    /// An unknown identifier leaves the selection unchanged.
    pub fn select(&mut self, id: &str) -> Option<&'a LocationRecord> {
        let Some(record) = self.dataset.find(id) else {
            log::warn!("Ignoring selection of unknown record '{id}'");
            return None;
        };
        self.selected = Some(record);
        Some(record)
    }

    /// Clears the selection.
    pub fn dismiss(&mut self) {
        self.selected = None;
    }

    /// Applies a hover or click reported by the rendering surface.
    pub fn handle_event(&mut self, event: SurfaceEvent) {
        match event {
            SurfaceEvent::Hover(None) => self.hovered = None,
            SurfaceEvent::Hover(Some(id)) => match self.dataset.find(&id) {
                Some(record) => self.hovered = Some(record),
                None => log::warn!("Ignoring hover over unknown record '{id}'"),
            },
            SurfaceEvent::Click(id) => {
                self.select(&id);
            }
        }
    }

    // ── Derived ─────────────────────────────────────────

    /// Records passing the current criteria and search term, in dataset
    /// order.
    #[must_use]
    pub fn visible(&self) -> Vec<&'a LocationRecord> {
        diaspora_map_query::visible(self.dataset, &self.criteria, &self.search_query)
    }

    /// Aggregate statistics of the visible records.
    #[must_use]
    pub fn summary(&self) -> SummaryStats {
        diaspora_map_query::summarize(self.visible())
    }

    /// The visible records as map features.
    #[must_use]
    pub fn features(&self) -> FeatureCollection {
        diaspora_map_features::encode(self.visible())
    }

    /// Distinguishes "nothing applied" from "nothing matched".
    #[must_use]
    pub fn result_status(&self) -> ResultStatus {
        if !self.has_active_filters() && self.search_query.is_empty() {
            return ResultStatus::Unfiltered;
        }
        match self.visible().len() {
            0 => ResultStatus::NoMatches,
            n => ResultStatus::Matches(n),
        }
    }
}

fn toggle<T: Ord>(set: &mut std::collections::BTreeSet<T>, value: T) {
    if set.contains(&value) {
        set.remove(&value);
    } else {
        set.insert(value);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn view() -> ViewState<'static> {
        ViewState::new(diaspora_map_demographics::embedded())
    }

    #[test]
    fn starts_unrestricted() {
        let view = view();
        assert_eq!(view.visible().len(), view.dataset().len());
        assert!(view.selected().is_none());
        assert_eq!(view.result_status(), ResultStatus::Unfiltered);
    }

    #[test]
    fn filtering_does_not_clear_selection() {
        let mut view = view();
        view.select("us-houston").unwrap();

        view.toggle_country(Country::Ca);

        assert!(view.visible().iter().all(|r| r.country == Country::Ca));
        assert_eq!(view.selected().unwrap().id, "us-houston");
    }

    #[test]
    fn selection_transitions() {
        let mut view = view();
        view.select("ca-toronto");
        assert_eq!(view.selected().unwrap().id, "ca-toronto");

        view.select("ca-ottawa");
        assert_eq!(view.selected().unwrap().id, "ca-ottawa");

        view.dismiss();
        assert!(view.selected().is_none());
    }

    #[test]
    fn unknown_id_keeps_selection() {
        let mut view = view();
        view.select("ca-toronto");
        assert!(view.select("nowhere").is_none());
        assert_eq!(view.selected().unwrap().id, "ca-toronto");
    }

    #[test]
    fn select_resolves_records_outside_the_visible_set() {
        let mut view = view();
        view.toggle_country(Country::Us);
        let picked = view.select("ca-surrey").unwrap();
        assert_eq!(picked.city, "Surrey");
    }

    #[test]
    fn click_event_selects_and_hover_tracks() {
        let mut view = view();

        view.handle_event(SurfaceEvent::Hover(Some("us-dallas".to_string())));
        assert_eq!(view.hovered().unwrap().city, "Dallas");

        view.handle_event(SurfaceEvent::Click("us-seattle".to_string()));
        assert_eq!(view.selected().unwrap().city, "Seattle");

        view.handle_event(SurfaceEvent::Hover(None));
        assert!(view.hovered().is_none());

        view.handle_event(SurfaceEvent::Click("bogus".to_string()));
        assert_eq!(view.selected().unwrap().city, "Seattle");
    }

    #[test]
    fn unknown_hover_id_keeps_hovered_record() {
        let mut view = view();
        view.handle_event(SurfaceEvent::Hover(Some("us-dallas".to_string())));

        view.handle_event(SurfaceEvent::Hover(Some("bogus".to_string())));

        assert_eq!(view.hovered().unwrap().id, "us-dallas");
    }

    #[test]
    fn toggles_add_and_remove() {
        let mut view = view();
        view.toggle_state("Texas");
        view.toggle_state("Ontario");
        assert_eq!(view.visible().len(), 6);

        view.toggle_state("Texas");
        assert_eq!(
            view.criteria().states,
            BTreeSet::from(["Ontario".to_string()])
        );

        view.toggle_community(Community::Tamil);
        let ids: Vec<&str> = view.visible().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["ca-mississauga", "ca-toronto", "ca-ottawa"]);
    }

    #[test]
    fn poi_toggle_does_not_narrow() {
        let mut view = view();
        view.toggle_poi_type(PoiCategory::Grocery);
        assert!(view.criteria().poi_types.contains(&PoiCategory::Grocery));
        assert_eq!(view.visible().len(), view.dataset().len());
        assert_eq!(view.result_status(), ResultStatus::Unfiltered);
    }

    #[test]
    fn patch_merges_with_existing_criteria() {
        let mut view = view();
        view.toggle_country(Country::Us);
        view.apply_patch(CriteriaPatch {
            min_population: Some(Some(100_000)),
            ..CriteriaPatch::default()
        });

        assert!(view.criteria().countries.contains(&Country::Us));
        let ids: Vec<&str> = view.visible().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(
            ids,
            ["us-sanjose", "us-chicago", "us-houston", "us-dallas", "us-nyc", "us-la"]
        );
    }

    #[test]
    fn population_range_and_no_matches() {
        let mut view = view();
        view.set_population_range(Some(300_000), None);
        assert_eq!(view.result_status(), ResultStatus::NoMatches);
        assert_eq!(view.summary().average_percent_indian, None);

        view.set_population_range(Some(200_000), Some(250_000));
        assert_eq!(view.result_status(), ResultStatus::Matches(2));
    }

    #[test]
    fn search_suggestions_follow_query() {
        let mut view = view();
        assert!(view.search_suggestions().is_empty());

        view.set_search_query("Van");
        let ids: Vec<&str> = view
            .search_suggestions()
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, ["ca-vancouver"]);
    }

    #[test]
    fn picking_a_suggestion_selects_and_clears_query() {
        let mut view = view();
        view.set_search_query("edm");
        let picked = view.pick_suggestion("ca-edmonton").unwrap();
        assert_eq!(picked.city, "Edmonton");
        assert_eq!(view.selected().unwrap().id, "ca-edmonton");
        assert!(view.search_query().is_empty());
    }

    #[test]
    fn starting_a_new_search_dismisses_selection() {
        let mut view = view();
        view.select("us-atlanta");

        view.set_search_query("a");
        assert!(view.selected().is_none());

        view.select("us-atlanta");
        view.set_search_query("at");
        assert_eq!(view.selected().unwrap().id, "us-atlanta");
    }

    #[test]
    fn clear_filters_resets_criteria_and_search() {
        let mut view = view();
        view.toggle_country(Country::Ca);
        view.set_search_query("toronto");
        view.select("ca-toronto");

        view.clear_filters();

        assert!(!view.has_active_filters());
        assert!(view.search_query().is_empty());
        assert_eq!(view.selected().unwrap().id, "ca-toronto");
        assert_eq!(view.result_status(), ResultStatus::Unfiltered);
    }

    #[test]
    fn features_follow_visible_records() {
        let mut view = view();
        view.toggle_country(Country::Ca);
        assert_eq!(view.features().features.len(), 10);
        assert_eq!(view.summary().record_count, 10);
    }
}
