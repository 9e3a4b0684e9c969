use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Result, TunnelError};

/// Top-level configuration structure for a tunnel session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TunnelConfig {
    pub canvas: CanvasConfig,
    pub packing: PackingConfig,
    pub stack: StackConfig,
    pub camera: CameraConfig,
    pub tempo: TempoConfig,
    /// Base seed; every depth band derives its own generator from it.
    pub seed: u64,
}

impl TunnelConfig {
    /// Parses a JSON document. Missing sections fall back to their defaults.
    pub fn from_json_str(source: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_json_str(&source)
    }

    pub fn validate(&self) -> Result<()> {
        self.canvas.validate()?;
        self.packing.validate()?;
        self.stack.validate()?;
        self.tempo.validate()
    }
}

/// Size of the rectangle every depth band is packed into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl CanvasConfig {
    fn validate(&self) -> Result<()> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(TunnelError::config(format!(
                "canvas must have a positive area, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// Tuning knobs for the growth-based packing algorithm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackingConfig {
    /// Depth covered by one band; mirrors sit one and two ranges behind.
    pub depth_range: f64,
    /// Clearance a new seed needs from every existing disc edge.
    pub margin: f64,
    pub growth_step: f64,
    /// Discs freeze once `distance - contact_tolerance < r1 + r2`.
    pub contact_tolerance: f64,
    pub max_attempts: u32,
    /// Ticks between each increase of the per-tick placement target.
    pub ramp_interval: u64,
    pub max_target: u32,
}

impl Default for PackingConfig {
    fn default() -> Self {
        Self {
            depth_range: 800.0,
            margin: 4.0,
            growth_step: 0.5,
            contact_tolerance: 1.0,
            max_attempts: 1000,
            ramp_interval: 120,
            max_target: 20,
        }
    }
}

impl PackingConfig {
    fn validate(&self) -> Result<()> {
        if self.depth_range <= 0.0 {
            return Err(TunnelError::config("depth_range must be positive"));
        }
        if self.growth_step <= 0.0 {
            return Err(TunnelError::config("growth_step must be positive"));
        }
        if self.margin < 0.0 || self.contact_tolerance < 0.0 {
            return Err(TunnelError::config(
                "margin and contact_tolerance cannot be negative",
            ));
        }
        if self.ramp_interval == 0 {
            return Err(TunnelError::config("ramp_interval must be at least one tick"));
        }
        if self.max_target == 0 {
            return Err(TunnelError::config("max_target must allow at least one placement"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackConfig {
    pub layers: usize,
    /// Depth distance between the offsets of neighbouring bands.
    pub spacing: f64,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            layers: 4,
            spacing: 2400.0,
        }
    }
}

impl StackConfig {
    fn validate(&self) -> Result<()> {
        if self.layers == 0 {
            return Err(TunnelError::config("the depth stack needs at least one layer"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Depth travelled by one camera animation.
    pub segment_length: f64,
    /// Cues shorter than this (seconds) switch layers instead of moving.
    pub short_cue_threshold: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            segment_length: 2400.0,
            short_cue_threshold: 0.5,
        }
    }
}

/// Musical timing used to turn note lengths in ticks into seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TempoConfig {
    /// Pulses per quarter note.
    pub ppq: f64,
    pub bpm: f64,
}

impl Default for TempoConfig {
    fn default() -> Self {
        Self {
            ppq: 3840.0 * 4.0,
            bpm: 97.0,
        }
    }
}

impl TempoConfig {
    pub fn ticks_to_seconds(&self, ticks: u64) -> f64 {
        (ticks as f64 / self.ppq) * (60.0 / self.bpm)
    }

    fn validate(&self) -> Result<()> {
        if !(self.ppq > 0.0 && self.bpm > 0.0) {
            return Err(TunnelError::config("ppq and bpm must be positive"));
        }
        Ok(())
    }
}
