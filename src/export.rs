use crate::VelocityField;
use crate::error::Result;
use image::{ImageBuffer, Rgb, RgbImage, RgbaImage};
use std::path::{Path, PathBuf};

/// Writes composited frames and velocity debug views as PNG.
pub struct FrameExporter {
    output_dir: PathBuf,
    prefix: String,
}

impl FrameExporter {
    pub fn new(output_dir: impl Into<PathBuf>, prefix: &str) -> Self {
        Self {
            output_dir: output_dir.into(),
            prefix: prefix.to_string(),
        }
    }

    pub fn frame_path(&self, frame: usize) -> PathBuf {
        self.output_dir
            .join(format!("{}_frame_{:04}.png", self.prefix, frame))
    }

    pub fn velocity_path(&self, frame: usize) -> PathBuf {
        self.output_dir
            .join(format!("{}_velocity_{:04}.png", self.prefix, frame))
    }

    pub fn export_frame(&self, image: &RgbaImage, frame: usize) -> Result<PathBuf> {
        let path = self.frame_path(frame);
        save_png(image, &path)?;
        Ok(path)
    }

    pub fn export_velocity(&self, field: &impl VelocityField, frame: usize) -> Result<PathBuf> {
        let path = self.velocity_path(frame);
        render_velocity(field).save(&path)?;
        Ok(path)
    }
}

pub fn save_png(image: &RgbaImage, path: &Path) -> Result<()> {
    image.save(path)?;
    Ok(())
}

/// Debug view: |vx| in red, |vy| in green, one pixel per cell, top row up.
pub fn render_velocity(field: &impl VelocityField) -> RgbImage {
    let (w, h) = (field.width(), field.height());
    let mut img = ImageBuffer::new(w as u32, h as u32);

    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let idx = (h - 1 - y as usize) * w + x as usize;
        let vel_x = field.velocity_x()[idx];
        let vel_y = field.velocity_y()[idx];

        let r = (vel_x.abs() * 255.0).min(255.0) as u8;
        let g = (vel_y.abs() * 255.0).min(255.0) as u8;
        *pixel = Rgb([r, g, 128]);
    }

    img
}
