use crate::surface::SurfaceRect;
use glam::Vec2;
use web_time::{Duration, Instant};

/// How long a position update keeps `moved_recently` true.
pub const MOVED_TIMEOUT: Duration = Duration::from_millis(100);

/// Pointer position in normalized device coordinates (x right, y up, both in
/// [-1, 1]) and its frame-to-frame displacement.
#[derive(Debug, Clone)]
pub struct PointerTracker {
    coords: Vec2,
    coords_old: Vec2,
    diff: Vec2,
    moved_until: Option<Instant>,
    inside: bool,
    pub(crate) auto_active: bool,
    auto_intensity: f32,
}

impl PointerTracker {
    pub fn new(auto_intensity: f32) -> Self {
        Self {
            coords: Vec2::ZERO,
            coords_old: Vec2::ZERO,
            diff: Vec2::ZERO,
            moved_until: None,
            inside: false,
            auto_active: false,
            auto_intensity,
        }
    }

    /// Absolute host coordinates. Outside the surface only the inside flag
    /// changes. Returns whether the position was accepted.
    pub fn set_position(&mut self, x: f32, y: f32, surface: &SurfaceRect, now: Instant) -> bool {
        self.inside = surface.contains(x, y);
        if !self.inside || !surface.has_area() {
            return false;
        }

        let nx = (x - surface.left) / surface.width;
        let ny = (y - surface.top) / surface.height;
        self.coords = Vec2::new(nx * 2.0 - 1.0, -(ny * 2.0 - 1.0));
        self.moved_until = Some(now + MOVED_TIMEOUT);
        true
    }

    pub fn set_normalized(&mut self, nx: f32, ny: f32, now: Instant) {
        self.coords = Vec2::new(nx, ny);
        self.moved_until = Some(now + MOVED_TIMEOUT);
    }

    pub fn set_outside(&mut self) {
        self.inside = false;
    }

    /// Latches the displacement since the last update.
    pub fn update(&mut self) {
        self.diff = self.coords - self.coords_old;
        self.coords_old = self.coords;
        if self.auto_active {
            self.diff *= self.auto_intensity;
        }
    }

    pub fn coords(&self) -> Vec2 {
        self.coords
    }

    pub fn diff(&self) -> Vec2 {
        self.diff
    }

    pub fn is_inside(&self) -> bool {
        self.inside
    }

    pub fn is_auto_active(&self) -> bool {
        self.auto_active
    }

    pub fn moved_recently(&self, now: Instant) -> bool {
        self.moved_until.is_some_and(|t| now < t)
    }
}
