#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Interactive layer of the diaspora map.
//!
//! * [`state`] holds one session's filters, search term and selection and
//!   derives the visible records from them
//! * [`surface`] forwards the derived data to a map once it has loaded
//! * [`style`] describes how the map draws that data
//! * [`display`] turns records and statistics into display strings

pub mod display;
pub mod state;
pub mod style;
pub mod surface;

pub use state::{ResultStatus, SurfaceEvent, ViewState};
pub use style::MapStyle;
pub use surface::{CameraTarget, RenderSurface, SurfaceGate, SurfaceState};
use thiserror::Error;

/// Errors that can occur while loading a map style.
#[derive(Debug, Error)]
pub enum StyleError {
    /// The style file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The style file is not valid TOML or is missing fields.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A stop list is empty, non-finite or out of order.
    #[error("Invalid interpolation stops for '{name}'")]
    InvalidStops {
        /// Dotted path of the offending setting.
        name: &'static str,
    },
}
