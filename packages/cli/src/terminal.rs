//! A [`RenderSurface`] that reports map updates on the terminal.

use diaspora_map_view::{CameraTarget, RenderSurface};
use geojson::FeatureCollection;

/// Prints what a real map would draw.
#[derive(Debug, Default)]
pub struct TerminalSurface {
    points: usize,
}

impl RenderSurface for TerminalSurface {
    fn replace_data(&mut self, features: &FeatureCollection) {
        self.points = features.features.len();
        match &features.bbox {
            Some(bbox) if bbox.len() == 4 => println!(
                "[map] {} locations within [{:.2}, {:.2}] – [{:.2}, {:.2}]",
                self.points, bbox[0], bbox[1], bbox[2], bbox[3]
            ),
            _ => println!("[map] {} locations", self.points),
        }
    }

    fn fly_to(&mut self, target: &CameraTarget) {
        println!(
            "[map] flying to {:.4}, {:.4} at zoom {} ({} ms)",
            target.center[1], target.center[0], target.zoom, target.duration_ms
        );
    }
}
