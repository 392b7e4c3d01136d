use crate::error::{EtherError, Result};
use crate::palette::{Palette, Rgba};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything the widget accepts at construction. Field names follow the
/// camelCase keys used by the web embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EtherConfig {
    pub mouse_force: f32,
    pub cursor_size: f32,
    pub is_viscous: bool,
    pub viscous: f32,
    pub iterations_viscous: u32,
    pub iterations_poisson: u32,
    pub dt: f32,
    #[serde(rename = "BFECC")]
    pub bfecc: bool,
    pub resolution: f32,
    pub is_bounce: bool,
    pub colors: Vec<String>,
    pub background: String,
    pub auto_demo: bool,
    pub auto_speed: f32,
    pub auto_intensity: f32,
    /// Accepted for compatibility; no algorithm reads it.
    pub takeover_duration: f32,
    /// Milliseconds of idleness before the autopilot takes over.
    pub auto_resume_delay: f32,
    /// Accepted for compatibility; no algorithm reads it.
    pub auto_ramp_duration: f32,
}

impl Default for EtherConfig {
    fn default() -> Self {
        Self {
            mouse_force: 20.0,
            cursor_size: 100.0,
            is_viscous: false,
            viscous: 30.0,
            iterations_viscous: 32,
            iterations_poisson: 32,
            dt: 0.014,
            bfecc: true,
            resolution: 0.5,
            is_bounce: false,
            colors: vec!["#9D4EDD".into(), "#C77DFF".into(), "#E0AAFF".into()],
            background: "#00000000".into(),
            auto_demo: true,
            auto_speed: 0.5,
            auto_intensity: 2.2,
            takeover_duration: 0.25,
            auto_resume_delay: 1000.0,
            auto_ramp_duration: 0.6,
        }
    }
}

impl EtherConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| EtherError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        fn positive(name: &str, v: f32) -> Result<()> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(EtherError::InvalidConfig(format!("{name} must be positive, got {v}")))
            }
        }
        fn non_negative(name: &str, v: f32) -> Result<()> {
            if v.is_finite() && v >= 0.0 {
                Ok(())
            } else {
                Err(EtherError::InvalidConfig(format!("{name} must be >= 0, got {v}")))
            }
        }

        positive("dt", self.dt)?;
        positive("resolution", self.resolution)?;
        non_negative("cursorSize", self.cursor_size)?;
        non_negative("autoSpeed", self.auto_speed)?;
        non_negative("viscous", self.viscous)?;
        non_negative("autoResumeDelay", self.auto_resume_delay)?;
        if !self.mouse_force.is_finite() || !self.auto_intensity.is_finite() {
            return Err(EtherError::InvalidConfig(
                "mouseForce and autoIntensity must be finite".into(),
            ));
        }
        Ok(())
    }

    pub fn palette(&self) -> Result<Palette> {
        Palette::from_hex_list(&self.colors)
    }

    pub fn background_color(&self) -> Result<Rgba> {
        Rgba::from_hex(&self.background)
    }

    /// Pressure iterations, never zero.
    pub fn poisson_iterations(&self) -> usize {
        self.iterations_poisson.max(1) as usize
    }

    /// Viscous iterations, never zero.
    pub fn viscous_iterations(&self) -> usize {
        self.iterations_viscous.max(1) as usize
    }

    pub fn resume_delay_secs(&self) -> f32 {
        self.auto_resume_delay / 1000.0
    }
}
