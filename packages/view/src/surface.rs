//! The rendering surface seam and its readiness gate.

use geojson::FeatureCollection;
use serde::Serialize;

use crate::state::ViewState;
use crate::style::CameraConfig;

/// Where the camera should move when a record is selected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraTarget {
    /// `[longitude, latitude]`.
    pub center: [f64; 2],
    /// Target zoom level.
    pub zoom: f64,
    /// Animation length in milliseconds.
    pub duration_ms: u64,
}

/// A map (or anything standing in for one) that draws features.
///
/// Implementations never see the view state directly. The
/// [`SurfaceGate`] pushes data and camera moves to them once they have
/// finished loading.
pub trait RenderSurface {
    /// Replaces everything drawn with `features`.
    fn replace_data(&mut self, features: &FeatureCollection);

    /// Animates the camera to `target`.
    fn fly_to(&mut self, target: &CameraTarget);
}

/// Load state of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceState {
    /// The surface exists but cannot accept updates yet.
    Loading,
    /// The surface accepts updates.
    Ready,
}

/// Wraps a [`RenderSurface`] and only forwards updates once it is ready.
///
/// Updates requested while loading are dropped. [`SurfaceGate::mark_ready`]
/// pushes the current data, so nothing requested before readiness is lost.
#[derive(Debug)]
pub struct SurfaceGate<S: RenderSurface> {
    surface: S,
    state: SurfaceState,
    camera: CameraConfig,
    pushed_ids: Option<Vec<String>>,
    focused_id: Option<String>,
}

impl<S: RenderSurface> SurfaceGate<S> {
    /// Wraps a surface that is still loading.
    #[must_use]
    pub const fn new(surface: S, camera: CameraConfig) -> Self {
        Self {
            surface,
            state: SurfaceState::Loading,
            camera,
            pushed_ids: None,
            focused_id: None,
        }
    }

    /// Current load state.
    #[must_use]
    pub const fn state(&self) -> SurfaceState {
        self.state
    }

    /// Whether updates are being forwarded.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self.state, SurfaceState::Ready)
    }

    /// The wrapped surface.
    #[must_use]
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    /// Called when the surface reports it has loaded. Pushes the current
    /// view immediately.
    pub fn mark_ready(&mut self, view: &ViewState<'_>) {
        log::debug!("Render surface ready");
        self.state = SurfaceState::Ready;
        self.pushed_ids = None;
        self.focused_id = None;
        self.sync(view);
    }

    /// Called when the surface is torn down or reloading its style.
    pub fn mark_loading(&mut self) {
        log::debug!("Render surface loading");
        self.state = SurfaceState::Loading;
    }

    /// Brings the surface in line with `view`.
    ///
    /// Data is replaced only when the visible set changed, and the camera
    /// only moves when a different record became selected. Does nothing
    /// while loading.
    pub fn sync(&mut self, view: &ViewState<'_>) {
        if !self.is_ready() {
            log::debug!("Render surface not ready; skipping sync");
            return;
        }

        let visible = view.visible();
        let ids: Vec<String> = visible.iter().map(|r| r.id.clone()).collect();
        if self.pushed_ids.as_ref() != Some(&ids) {
            let features = diaspora_map_features::encode(visible);
            self.surface.replace_data(&features);
            self.pushed_ids = Some(ids);
        }

        let selected = view.selected();
        let selected_id = selected.map(|r| r.id.clone());
        if selected_id != self.focused_id {
            if let Some(record) = selected {
                self.surface.fly_to(&self.camera.target_for(record));
            }
            self.focused_id = selected_id;
        }
    }
}

#[cfg(test)]
mod tests {
    use diaspora_map_demographics_models::Country;

    use super::*;
    use crate::style::MapStyle;

    #[derive(Debug, Default)]
    struct Recorder {
        pushes: Vec<usize>,
        flights: Vec<CameraTarget>,
    }

    impl RenderSurface for Recorder {
        fn replace_data(&mut self, features: &FeatureCollection) {
            self.pushes.push(features.features.len());
        }

        fn fly_to(&mut self, target: &CameraTarget) {
            self.flights.push(*target);
        }
    }

    fn gate() -> SurfaceGate<Recorder> {
        SurfaceGate::new(Recorder::default(), MapStyle::default().camera)
    }

    #[test]
    fn drops_updates_until_ready() {
        let mut view = ViewState::new(diaspora_map_demographics::embedded());
        let mut gate = gate();

        view.toggle_country(Country::Ca);
        view.select("ca-toronto");
        gate.sync(&view);
        assert_eq!(gate.state(), SurfaceState::Loading);
        assert!(gate.surface().pushes.is_empty());
        assert!(gate.surface().flights.is_empty());

        gate.mark_ready(&view);
        assert_eq!(gate.surface().pushes, [10]);
        assert_eq!(gate.surface().flights.len(), 1);
    }

    #[test]
    fn pushes_only_on_change() {
        let mut view = ViewState::new(diaspora_map_demographics::embedded());
        let mut gate = gate();
        gate.mark_ready(&view);
        gate.sync(&view);
        assert_eq!(gate.surface().pushes, [23]);

        view.toggle_country(Country::Us);
        gate.sync(&view);
        assert_eq!(gate.surface().pushes, [23, 13]);
    }

    #[test]
    fn flies_to_each_new_selection() {
        let mut view = ViewState::new(diaspora_map_demographics::embedded());
        let mut gate = gate();
        gate.mark_ready(&view);

        view.select("us-nyc");
        gate.sync(&view);
        gate.sync(&view);
        view.dismiss();
        gate.sync(&view);
        view.select("ca-surrey");
        gate.sync(&view);

        let flights = &gate.surface().flights;
        assert_eq!(flights.len(), 2);
        assert_eq!(flights[0].center, [-74.006, 40.7128]);
        assert!((flights[0].zoom - 9.0).abs() < f64::EPSILON);
        assert_eq!(flights[0].duration_ms, 2000);
        assert_eq!(flights[1].center, [-122.849, 49.1913]);
    }

    #[test]
    fn reloading_surface_pauses_updates() {
        let mut view = ViewState::new(diaspora_map_demographics::embedded());
        let mut gate = gate();
        gate.mark_ready(&view);
        gate.mark_loading();

        view.toggle_country(Country::Ca);
        gate.sync(&view);
        assert_eq!(gate.surface().pushes, [23]);

        gate.mark_ready(&view);
        assert_eq!(gate.surface().pushes, [23, 10]);
    }
}
