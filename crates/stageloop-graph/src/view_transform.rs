use crate::geometry::{Rect, Vec2};

pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 4.0;

/// Zoom used by fit-to-view when the content would allow zooming in further.
pub const FIT_MAX_ZOOM: f32 = 2.0;

/// Pan/zoom state of the diagram canvas.
///
/// Mapping: `screen = viewport_center + pan + graph * zoom`. Pan is in
/// screen pixels, graph coordinates are the stored card positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    /// Current zoom level (0.1 to 4.0, representing 10% to 400%)
    pub zoom: f32,
    /// Current pan offset in screen coordinates
    pub pan: Vec2,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewTransform {
    pub fn new() -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::new(0.0, 0.0),
        }
    }

    /// Set the zoom level (clamped to the 0.1 - 4.0 range)
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn graph_to_screen(&self, pos: Vec2, viewport_center: Vec2) -> Vec2 {
        Vec2::new(
            viewport_center.x + self.pan.x + pos.x * self.zoom,
            viewport_center.y + self.pan.y + pos.y * self.zoom,
        )
    }

    pub fn screen_to_graph(&self, pos: Vec2, viewport_center: Vec2) -> Vec2 {
        Vec2::new(
            (pos.x - viewport_center.x - self.pan.x) / self.zoom,
            (pos.y - viewport_center.y - self.pan.y) / self.zoom,
        )
    }

    /// Zoom by `factor`, keeping the graph point under `screen_pos` fixed
    /// on screen. Wheel and pinch zoom both route through here.
    pub fn zoom_about(&mut self, factor: f32, screen_pos: Vec2, viewport_center: Vec2) {
        let anchor = self.screen_to_graph(screen_pos, viewport_center);
        self.set_zoom(self.zoom * factor);
        self.pan = Vec2::new(
            screen_pos.x - viewport_center.x - anchor.x * self.zoom,
            screen_pos.y - viewport_center.y - anchor.y * self.zoom,
        );
    }

    /// Fit `bounds` into a viewport of `viewport_size`, centered, with
    /// `padding` kept free around the content. Degenerate or empty bounds
    /// leave the view untouched.
    pub fn fit_bounds(&mut self, bounds: Rect, viewport_size: Vec2, padding: f32) {
        if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
            return;
        }
        let padded = bounds.expand(padding);
        let fit = ((viewport_size.x - padding * 2.0) / padded.width())
            .min((viewport_size.y - padding * 2.0) / padded.height());
        self.zoom = fit.clamp(MIN_ZOOM, FIT_MAX_ZOOM);

        // Place the content center at the viewport center.
        let center = padded.center();
        self.pan = Vec2::new(-center.x * self.zoom, -center.y * self.zoom);
    }
}
