//! Map style: camera defaults and the heatmap, circle and label layers.
//!
//! The default style is embedded from `config/map_style.toml`. A different
//! file can be loaded at runtime with [`MapStyle::load`].

use std::{path::Path, sync::LazyLock};

use diaspora_map_demographics_models::LocationRecord;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{StyleError, surface::CameraTarget};

/// Source id the layers draw from.
pub const SOURCE_ID: &str = "indian-population";
/// Heatmap layer id.
pub const HEATMAP_LAYER_ID: &str = "indian-population-heat";
/// Circle layer id. Hover and click events come from this layer.
pub const POINT_LAYER_ID: &str = "indian-population-point";
/// Label layer id.
pub const LABEL_LAYER_ID: &str = "indian-population-labels";

const DEFAULT_TOML: &str = include_str!("../config/map_style.toml");

static DEFAULT: LazyLock<MapStyle> = LazyLock::new(|| {
    MapStyle::from_toml_str(DEFAULT_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse map_style.toml: {e}"))
});

/// Piecewise-linear mapping given as `[input, output]` pairs.
///
/// Inputs below the first stop or above the last are clamped to the end
/// outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stops(Vec<[f64; 2]>);

impl Stops {
    /// Builds stops from pairs without validating them.
    #[must_use]
    pub const fn new(pairs: Vec<[f64; 2]>) -> Self {
        Self(pairs)
    }

    /// Interpolates the output for `input`.
    #[must_use]
    pub fn evaluate(&self, input: f64) -> f64 {
        let Some(&[first_in, first_out]) = self.0.first() else {
            return 0.0;
        };
        if input <= first_in {
            return first_out;
        }
        for pair in self.0.windows(2) {
            let [x0, y0] = pair[0];
            let [x1, y1] = pair[1];
            if input <= x1 {
                return (input - x0).mul_add((y1 - y0) / (x1 - x0), y0);
            }
        }
        self.0.last().map_or(first_out, |last| last[1])
    }

    /// A MapLibre `interpolate` expression over `input`.
    #[must_use]
    pub fn expression(&self, input: &Value) -> Value {
        let mut expr = vec![json!("interpolate"), json!(["linear"]), input.clone()];
        for [x, y] in &self.0 {
            expr.push(json!(x));
            expr.push(json!(y));
        }
        Value::Array(expr)
    }

    fn validate(&self, name: &'static str) -> Result<(), StyleError> {
        let finite = self.0.iter().flatten().all(|v| v.is_finite());
        let increasing = self.0.windows(2).all(|w| w[0][0] < w[1][0]);
        if self.0.is_empty() || !finite || !increasing {
            return Err(StyleError::InvalidStops { name });
        }
        Ok(())
    }
}

/// Camera defaults and selection behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Initial `[longitude, latitude]`.
    pub center: [f64; 2],
    /// Initial zoom.
    pub zoom: f64,
    /// Minimum zoom.
    pub min_zoom: f64,
    /// Maximum zoom.
    pub max_zoom: f64,
    /// Zoom used when flying to a selected record.
    pub selection_zoom: f64,
    /// Fly animation length.
    pub fly_duration_ms: u64,
}

impl CameraConfig {
    /// Camera move that centers on `record`.
    #[must_use]
    pub const fn target_for(&self, record: &LocationRecord) -> CameraTarget {
        CameraTarget {
            center: [record.longitude, record.latitude],
            zoom: self.selection_zoom,
            duration_ms: self.fly_duration_ms,
        }
    }
}

/// One entry of the heatmap density color ramp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    /// Heatmap density in `0.0..=1.0`.
    pub density: f64,
    /// CSS color.
    pub color: String,
}

/// Heatmap layer shown at low zoom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapStyle {
    /// Zoom at which the layer stops rendering.
    pub max_zoom: f64,
    /// Point weight by Indian population.
    pub weight: Stops,
    /// Intensity by zoom.
    pub intensity: Stops,
    /// Radius in pixels by zoom.
    pub radius: Stops,
    /// Opacity by zoom.
    pub opacity: Stops,
    /// Density to color.
    pub color_ramp: Vec<ColorStop>,
}

/// Circle radius by population, anchored at one zoom level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadiusAtZoom {
    /// Zoom level this mapping applies at.
    pub zoom: f64,
    /// Radius in pixels by Indian population.
    pub by_population: Stops,
}

/// Circle layer shown at high zoom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleStyle {
    /// Fill color.
    pub color: String,
    /// Stroke color.
    pub stroke_color: String,
    /// Stroke width in pixels.
    pub stroke_width: f64,
    /// Stroke opacity.
    pub stroke_opacity: f64,
    /// Blur.
    pub blur: f64,
    /// Opacity by zoom.
    pub opacity: Stops,
    /// Radius mappings, ordered by zoom.
    pub radius: Vec<RadiusAtZoom>,
}

/// City name labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelStyle {
    /// Zoom at which labels appear.
    pub min_zoom: f64,
    /// Font size.
    pub text_size: f64,
    /// Offset from the point, in ems.
    pub text_offset: [f64; 2],
    /// Text color.
    pub color: String,
    /// Halo color.
    pub halo_color: String,
    /// Halo width.
    pub halo_width: f64,
}

/// Full map style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapStyle {
    /// Camera defaults.
    pub camera: CameraConfig,
    /// Heatmap layer.
    pub heatmap: HeatmapStyle,
    /// Circle layer.
    pub circle: CircleStyle,
    /// Label layer.
    pub labels: LabelStyle,
}

impl Default for MapStyle {
    fn default() -> Self {
        DEFAULT.clone()
    }
}

impl MapStyle {
    /// Parses and validates a style.
    ///
    /// # Errors
    ///
    /// * [`StyleError::Toml`] if the text is not a valid style document
    /// * [`StyleError::InvalidStops`] if any stop list is empty, contains a
    ///   non-finite number or is not strictly increasing
    pub fn from_toml_str(text: &str) -> Result<Self, StyleError> {
        let style: Self = toml::from_str(text)?;
        style.validate()?;
        Ok(style)
    }

    /// Reads a style from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::Io`] if the file cannot be read, otherwise the
    /// errors of [`MapStyle::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self, StyleError> {
        let text = std::fs::read_to_string(path)?;
        let style = Self::from_toml_str(&text)?;
        log::info!("Loaded map style from {}", path.display());
        Ok(style)
    }

    fn validate(&self) -> Result<(), StyleError> {
        self.heatmap.weight.validate("heatmap.weight")?;
        self.heatmap.intensity.validate("heatmap.intensity")?;
        self.heatmap.radius.validate("heatmap.radius")?;
        self.heatmap.opacity.validate("heatmap.opacity")?;
        self.circle.opacity.validate("circle.opacity")?;

        Stops::new(
            self.heatmap
                .color_ramp
                .iter()
                .map(|stop| [stop.density, 0.0])
                .collect(),
        )
        .validate("heatmap.color_ramp")?;

        self.radius_by_zoom(0.0).validate("circle.radius")?;
        for level in &self.circle.radius {
            level.by_population.validate("circle.radius.by_population")?;
        }
        Ok(())
    }

    fn radius_by_zoom(&self, population: f64) -> Stops {
        Stops::new(
            self.circle
                .radius
                .iter()
                .map(|level| [level.zoom, level.by_population.evaluate(population)])
                .collect(),
        )
    }

    /// Heatmap weight of a record with this Indian population.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn heat_weight(&self, indian_population: u64) -> f64 {
        self.heatmap.weight.evaluate(indian_population as f64)
    }

    /// Heatmap opacity at `zoom`.
    #[must_use]
    pub fn heat_opacity(&self, zoom: f64) -> f64 {
        self.heatmap.opacity.evaluate(zoom)
    }

    /// Circle radius in pixels of a record at `zoom`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn circle_radius(&self, zoom: f64, indian_population: u64) -> f64 {
        self.radius_by_zoom(indian_population as f64).evaluate(zoom)
    }

    /// Circle opacity at `zoom`.
    #[must_use]
    pub fn circle_opacity(&self, zoom: f64) -> f64 {
        self.circle.opacity.evaluate(zoom)
    }

    /// Whether city labels are shown at `zoom`.
    #[must_use]
    pub fn labels_visible(&self, zoom: f64) -> bool {
        zoom >= self.labels.min_zoom
    }

    /// MapLibre layer definitions, bottom to top.
    #[must_use]
    pub fn layers(&self) -> Value {
        let zoom = json!(["zoom"]);
        let population = json!(["get", "indianPopulation"]);

        let mut color_ramp = vec![
            json!("interpolate"),
            json!(["linear"]),
            json!(["heatmap-density"]),
        ];
        for stop in &self.heatmap.color_ramp {
            color_ramp.push(json!(stop.density));
            color_ramp.push(json!(stop.color));
        }

        let mut circle_radius = vec![json!("interpolate"), json!(["linear"]), zoom.clone()];
        for level in &self.circle.radius {
            circle_radius.push(json!(level.zoom));
            circle_radius.push(level.by_population.expression(&population));
        }

        json!([
            {
                "id": HEATMAP_LAYER_ID,
                "type": "heatmap",
                "source": SOURCE_ID,
                "maxzoom": self.heatmap.max_zoom,
                "paint": {
                    "heatmap-weight": self.heatmap.weight.expression(&population),
                    "heatmap-intensity": self.heatmap.intensity.expression(&zoom),
                    "heatmap-color": color_ramp,
                    "heatmap-radius": self.heatmap.radius.expression(&zoom),
                    "heatmap-opacity": self.heatmap.opacity.expression(&zoom),
                },
            },
            {
                "id": POINT_LAYER_ID,
                "type": "circle",
                "source": SOURCE_ID,
                "paint": {
                    "circle-radius": circle_radius,
                    "circle-color": self.circle.color,
                    "circle-stroke-color": self.circle.stroke_color,
                    "circle-stroke-width": self.circle.stroke_width,
                    "circle-stroke-opacity": self.circle.stroke_opacity,
                    "circle-opacity": self.circle.opacity.expression(&zoom),
                    "circle-blur": self.circle.blur,
                },
            },
            {
                "id": LABEL_LAYER_ID,
                "type": "symbol",
                "source": SOURCE_ID,
                "minzoom": self.labels.min_zoom,
                "layout": {
                    "text-field": ["get", "city"],
                    "text-size": self.labels.text_size,
                    "text-offset": self.labels.text_offset,
                    "text-anchor": "top",
                },
                "paint": {
                    "text-color": self.labels.color,
                    "text-halo-color": self.labels.halo_color,
                    "text-halo-width": self.labels.halo_width,
                },
            },
        ])
    }
}
