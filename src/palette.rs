//! Colour parsing and the 1D colour ramp sampled by velocity magnitude.

use crate::error::{EtherError, Result};
use glam::Vec4;

/// Straight (non-premultiplied) RGBA in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba(pub Vec4);

impl Rgba {
    pub const WHITE: Rgba = Rgba(Vec4::ONE);
    pub const TRANSPARENT: Rgba = Rgba(Vec4::ZERO);

    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self(Vec4::new(r, g, b, a))
    }

    /// Parses `#RGB`, `#RRGGBB` or `#RRGGBBAA` (leading `#` optional).
    pub fn from_hex(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
        let bad = || EtherError::InvalidColor(s.to_string());
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(bad());
        }

        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| bad());
        let nibble = |i: usize| {
            u8::from_str_radix(&hex[i..i + 1], 16)
                .map(|n| n * 17)
                .map_err(|_| bad())
        };

        let (r, g, b, a) = match hex.len() {
            3 => (nibble(0)?, nibble(1)?, nibble(2)?, 255),
            6 => (byte(0)?, byte(2)?, byte(4)?, 255),
            8 => (byte(0)?, byte(2)?, byte(4)?, byte(6)?),
            _ => return Err(bad()),
        };

        Ok(Self::from_rgba8([r, g, b, a]))
    }

    pub fn opaque(self) -> Self {
        Self(self.0.truncate().extend(1.0))
    }

    pub fn from_rgba8(c: [u8; 4]) -> Self {
        Self(Vec4::new(c[0] as f32, c[1] as f32, c[2] as f32, c[3] as f32) / 255.0)
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        let c = (self.0.clamp(Vec4::ZERO, Vec4::ONE) * 255.0).round();
        [c.x as u8, c.y as u8, c.z as u8, c.w as u8]
    }

    /// Exact at both ends: `t == 0` gives `self`, `t == 1` gives `other`.
    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        Rgba(self.0 * (1.0 - t) + other.0 * t)
    }
}

/// Ordered colour stops; always holds at least two.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    stops: Vec<Rgba>,
}

impl Palette {
    /// Builds a ramp from already-parsed stops. An empty list becomes a
    /// two-stop white ramp and a single stop is duplicated.
    pub fn new(stops: Vec<Rgba>) -> Self {
        let stops = match stops.len() {
            0 => {
                log::debug!("empty colour ramp, using white");
                vec![Rgba::WHITE, Rgba::WHITE]
            }
            1 => vec![stops[0], stops[0]],
            _ => stops,
        };
        Self { stops }
    }

    /// Parses ramp stops. Ramp colours are opaque: any alpha in the hex is dropped.
    pub fn from_hex_list<S: AsRef<str>>(colors: &[S]) -> Result<Self> {
        let stops = colors
            .iter()
            .map(|c| Rgba::from_hex(c.as_ref()).map(Rgba::opaque))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(stops))
    }

    pub fn stops(&self) -> &[Rgba] {
        &self.stops
    }

    /// Linear lookup: 0 gives the first stop, 1 the last, stops evenly spaced.
    pub fn sample(&self, t: f32) -> Rgba {
        let last = self.stops.len() - 1;
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let pos = t * last as f32;
        let i = (pos.floor() as usize).min(last - 1);
        self.stops[i].lerp(self.stops[i + 1], pos - i as f32)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
