use crate::VelocityField;
use crate::palette::{Palette, Rgba};
use glam::Vec2;
use image::RgbaImage;

#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;

/// Maps velocity magnitude through the colour ramp onto the background.
/// Purely presentational: nothing here feeds back into the solver.
#[derive(Debug, Clone)]
pub struct Compositor {
    palette: Palette,
    background: Rgba,
}

impl Compositor {
    pub fn new(palette: Palette, background: Rgba) -> Self {
        Self { palette, background }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn background(&self) -> Rgba {
        self.background
    }

    /// Colour for a single velocity sample.
    pub fn shade(&self, velocity: Vec2) -> Rgba {
        let len = velocity.length();
        let m = if len.is_nan() { 0.0 } else { len.clamp(0.0, 1.0) };
        let c = self.palette.sample(m);
        let bg = self.background.0;
        let rgb = bg.truncate() * (1.0 - m) + c.0.truncate() * m;
        let alpha = bg.w * (1.0 - m) + c.0.w * m;
        Rgba(rgb.extend(alpha))
    }

    /// Composites the whole field into `frame`, stretching the grid over the
    /// frame size. Output row 0 is the top of the surface.
    pub fn render_into(&self, field: &impl VelocityField, frame: &mut RgbaImage) {
        let (out_w, out_h) = (frame.width() as usize, frame.height() as usize);
        if out_w == 0 || out_h == 0 {
            return;
        }
        let row_bytes = out_w * 4;

        let shade_row = |row: usize, pixels: &mut [u8]| {
            // image rows run top-down, grid rows bottom-up
            let v = 1.0 - (row as f32 + 0.5) / out_h as f32;
            for (col, px) in pixels.chunks_exact_mut(4).enumerate() {
                let u = (col as f32 + 0.5) / out_w as f32;
                let vel = sample_velocity(field, u, v);
                px.copy_from_slice(&self.shade(vel).to_rgba8());
            }
        };

        #[cfg(not(target_arch = "wasm32"))]
        frame
            .par_chunks_mut(row_bytes)
            .enumerate()
            .for_each(|(row, pixels)| shade_row(row, pixels));

        #[cfg(target_arch = "wasm32")]
        frame
            .chunks_mut(row_bytes)
            .enumerate()
            .for_each(|(row, pixels)| shade_row(row, pixels));
    }

    pub fn render(&self, field: &impl VelocityField, width: u32, height: u32) -> RgbaImage {
        let mut frame = RgbaImage::new(width, height);
        self.render_into(field, &mut frame);
        frame
    }
}

/// Bilinear velocity at texture coordinates (uv in [0, 1], v up), clamped to
/// the edge cell centres.
pub fn sample_velocity(field: &impl VelocityField, u: f32, v: f32) -> Vec2 {
    let (w, h) = (field.width(), field.height());
    let fx = (u * w as f32 - 0.5).clamp(0.0, (w - 1) as f32);
    let fy = (v * h as f32 - 0.5).clamp(0.0, (h - 1) as f32);
    let x0 = fx.floor() as usize;
    let y0 = fy.floor() as usize;
    let x1 = (x0 + 1).min(w - 1);
    let y1 = (y0 + 1).min(h - 1);
    let sx = fx - x0 as f32;
    let sy = fy - y0 as f32;

    let vx = field.velocity_x();
    let vy = field.velocity_y();
    let at = |f: &[f32]| {
        let a = f[y0 * w + x0] + (f[y0 * w + x1] - f[y0 * w + x0]) * sx;
        let b = f[y1 * w + x0] + (f[y1 * w + x1] - f[y1 * w + x0]) * sx;
        a + (b - a) * sy
    };
    Vec2::new(at(vx), at(vy))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn still_field_shows_background() {
        let bg = Rgba::new(0.1, 0.2, 0.3, 0.4);
        let comp = Compositor::new(Palette::default(), bg);
        assert_eq!(comp.shade(Vec2::ZERO), bg);
    }

    #[test]
    fn fast_field_shows_last_stop_opaque() {
        let red = Rgba::new(1.0, 0.0, 0.0, 1.0);
        let comp = Compositor::new(
            Palette::new(vec![Rgba::new(0.0, 0.0, 1.0, 1.0), red]),
            Rgba::TRANSPARENT,
        );
        assert_eq!(comp.shade(Vec2::new(3.0, 4.0)), red);
    }

    #[test]
    fn half_speed_blends_both_ways() {
        let comp = Compositor::new(
            Palette::new(vec![Rgba::new(0.0, 0.0, 0.0, 1.0), Rgba::new(1.0, 1.0, 1.0, 1.0)]),
            Rgba::TRANSPARENT,
        );
        let c = comp.shade(Vec2::new(0.5, 0.0));
        // ramp gives 0.5 grey, then half-way from the transparent background
        assert!((c.0.x - 0.25).abs() < 1e-6);
        assert!((c.0.w - 0.5).abs() < 1e-6);
    }
}
