/// Host drawing surface in host (client) pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl SurfaceRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self { left, top, width, height }
    }

    pub fn sized(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Edges are inclusive.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left && x <= self.right() && y >= self.top && y <= self.bottom()
    }

    /// Whole-pixel size of the surface, at least 1x1.
    pub fn pixel_size(&self) -> (usize, usize) {
        (clamp_dim(self.width), clamp_dim(self.height))
    }

    /// Solver grid size for a resolution fraction, at least 1x1.
    pub fn grid_size(&self, resolution: f32) -> (usize, usize) {
        let (w, h) = self.pixel_size();
        (
            clamp_dim(resolution * w as f32),
            clamp_dim(resolution * h as f32),
        )
    }
}

fn clamp_dim(v: f32) -> usize {
    if v.is_finite() && v >= 1.0 {
        v.floor() as usize
    } else {
        log::debug!("surface dimension {v} clamped to 1");
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_size_floors_and_clamps() {
        assert_eq!(SurfaceRect::sized(801.0, 601.0).grid_size(0.5), (400, 300));
        assert_eq!(SurfaceRect::sized(0.0, 0.0).grid_size(0.5), (1, 1));
        assert_eq!(SurfaceRect::sized(3.0, 1.0).grid_size(0.5), (1, 1));
    }
}
