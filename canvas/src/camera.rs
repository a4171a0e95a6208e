//! Geometry and camera model: pan/scale state and screen/canvas conversions.
//!
//! Screen space is CSS pixels relative to the canvas viewport's top-left
//! corner. World (canvas) space is where notes live. The two are related by
//! `screen = world * zoom + pan`.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use crate::consts::{MAX_ZOOM, MIN_ZOOM};

/// A point in either screen or world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Midpoint between `self` and `other`.
    #[must_use]
    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }
}

/// Size of the canvas viewport in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Screen-space center of the viewport.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.width * 0.5, self.height * 0.5)
    }
}

/// Camera state for pan/zoom on the infinite canvas.
///
/// `pan_x` / `pan_y` are in CSS pixels.
/// `zoom` is a scale factor (1.0 = no zoom), kept within [`MIN_ZOOM`, `MAX_ZOOM`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

impl Camera {
    /// Build a camera from persisted values, clamping the scale.
    #[must_use]
    pub fn new(pan_x: f64, pan_y: f64, zoom: f64) -> Self {
        Self { pan_x, pan_y, zoom: clamp_scale(zoom) }
    }

    /// Convert a screen-space point (CSS pixels) to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.pan_x) / self.zoom,
            y: (screen.y - self.pan_y) / self.zoom,
        }
    }

    /// Convert a world-space point to screen coordinates (CSS pixels).
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point {
            x: world.x * self.zoom + self.pan_x,
            y: world.y * self.zoom + self.pan_y,
        }
    }

    /// Convert a screen-space distance (pixels) to world-space distance.
    #[must_use]
    pub fn screen_dist_to_world(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom
    }

    /// World point currently under the center of `viewport`.
    #[must_use]
    pub fn screen_center_to_canvas(&self, viewport: Viewport) -> Point {
        self.screen_to_world(viewport.center())
    }

    /// Rescale to `proposed` (clamped) while keeping `anchor` fixed on screen.
    ///
    /// The world point under `anchor` before the change is still under
    /// `anchor` afterwards.
    #[must_use]
    pub fn zoom_anchored(&self, anchor: Point, proposed: f64) -> Camera {
        let world = self.screen_to_world(anchor);
        let zoom = clamp_scale(proposed);
        Camera {
            pan_x: anchor.x - world.x * zoom,
            pan_y: anchor.y - world.y * zoom,
            zoom,
        }
    }
}

/// Clamp a scale factor to the allowed zoom range.
///
/// Non-finite input collapses to 1.0 so a corrupt delta can't poison the camera.
#[must_use]
pub fn clamp_scale(scale: f64) -> f64 {
    if scale.is_finite() { scale.clamp(MIN_ZOOM, MAX_ZOOM) } else { 1.0 }
}

/// Angle in degrees from `center` to `pt`, measured with `atan2(dy, dx)`.
#[must_use]
pub fn angle_deg(center: Point, pt: Point) -> f64 {
    (pt.y - center.y).atan2(pt.x - center.x).to_degrees()
}
