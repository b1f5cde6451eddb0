//! Zoom and pan state.
//!
//! Maps layout space to screen space as `screen = layout * zoom + pan`.
//! Zoom is clamped to configured bounds except by `reset_view`, which
//! always returns to 1:1.

use pedigree_core::{Bounds, PedigreeError, Result};

pub const DEFAULT_MIN_ZOOM: f32 = 0.1;
pub const DEFAULT_MAX_ZOOM: f32 = 8.0;
pub const DEFAULT_ZOOM_STEP: f32 = 1.2;

#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    zoom: f32,
    pan_x: f32,
    pan_y: f32,
    min_zoom: f32,
    max_zoom: f32,
    zoom_step: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            zoom_step: DEFAULT_ZOOM_STEP,
        }
    }
}

impl Viewport {
    pub fn new(min_zoom: f32, max_zoom: f32, zoom_step: f32) -> Result<Self> {
        let mut view = Self::default();
        view.set_zoom_bounds(min_zoom, max_zoom)?;
        view.set_zoom_step(zoom_step)?;
        Ok(view)
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn pan(&self) -> (f32, f32) {
        (self.pan_x, self.pan_y)
    }

    pub fn zoom_bounds(&self) -> (f32, f32) {
        (self.min_zoom, self.max_zoom)
    }

    pub fn zoom_step(&self) -> f32 {
        self.zoom_step
    }

    /// Both bounds must be positive and `min <= max`. The current zoom is
    /// re-clamped into the new range.
    pub fn set_zoom_bounds(&mut self, min_zoom: f32, max_zoom: f32) -> Result<()> {
        let valid = min_zoom > 0.0 && max_zoom.is_finite() && min_zoom <= max_zoom;
        if !valid {
            return Err(PedigreeError::invalid(format!(
                "zoom bounds [{min_zoom}, {max_zoom}] must satisfy 0 < min <= max"
            )));
        }
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self.zoom = self.clamp(self.zoom);
        Ok(())
    }

    pub fn set_zoom_step(&mut self, step: f32) -> Result<()> {
        let valid = step.is_finite() && step > 1.0;
        if !valid {
            return Err(PedigreeError::invalid(format!(
                "zoom step {step} must be > 1.0"
            )));
        }
        self.zoom_step = step;
        Ok(())
    }

    fn clamp(&self, zoom: f32) -> f32 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }

    /// Set the zoom, clamped. Non-finite input is ignored.
    /// Returns `true` if the zoom changed.
    pub fn set_zoom(&mut self, zoom: f32) -> bool {
        if !zoom.is_finite() {
            return false;
        }
        let clamped = self.clamp(zoom);
        let changed = clamped != self.zoom;
        self.zoom = clamped;
        changed
    }

    pub fn zoom_in(&mut self) -> bool {
        self.set_zoom(self.zoom * self.zoom_step)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.set_zoom(self.zoom / self.zoom_step)
    }

    /// Step the zoom in or out keeping the layout point under the screen
    /// anchor `(sx, sy)` fixed (wheel zoom).
    pub fn zoom_about(&mut self, sx: f32, sy: f32, zoom_in: bool) -> bool {
        if !sx.is_finite() || !sy.is_finite() {
            return false;
        }
        let (lx, ly) = self.screen_to_layout(sx, sy);
        let changed = if zoom_in {
            self.zoom_in()
        } else {
            self.zoom_out()
        };
        if changed {
            self.pan_x = sx - lx * self.zoom;
            self.pan_y = sy - ly * self.zoom;
        }
        changed
    }

    /// Shift the pan offset. Non-finite deltas are ignored.
    pub fn pan_by(&mut self, dx: f32, dy: f32) -> bool {
        if !dx.is_finite() || !dy.is_finite() || (dx == 0.0 && dy == 0.0) {
            return false;
        }
        self.pan_x += dx;
        self.pan_y += dy;
        true
    }

    /// Zoom 1.0, pan (0, 0), regardless of the configured zoom bounds.
    pub fn reset_view(&mut self) {
        self.zoom = 1.0;
        self.pan_x = 0.0;
        self.pan_y = 0.0;
    }

    /// Zoom and pan so `extent` fills a `screen_w` × `screen_h` surface
    /// with `padding` pixels on every side, centered.
    pub fn fit_to(&mut self, extent: Bounds, screen_w: f32, screen_h: f32, padding: f32) -> bool {
        let avail_w = screen_w - 2.0 * padding;
        let avail_h = screen_h - 2.0 * padding;
        if avail_w <= 0.0 || avail_h <= 0.0 || extent.width <= 0.0 || extent.height <= 0.0 {
            return false;
        }
        let zoom = (avail_w / extent.width).min(avail_h / extent.height);
        self.set_zoom(zoom);
        let (cx, cy) = extent.center();
        self.pan_x = screen_w / 2.0 - cx * self.zoom;
        self.pan_y = screen_h / 2.0 - cy * self.zoom;
        true
    }

    pub fn screen_to_layout(&self, sx: f32, sy: f32) -> (f32, f32) {
        ((sx - self.pan_x) / self.zoom, (sy - self.pan_y) / self.zoom)
    }

    pub fn layout_to_screen(&self, lx: f32, ly: f32) -> (f32, f32) {
        (lx * self.zoom + self.pan_x, ly * self.zoom + self.pan_y)
    }
}
