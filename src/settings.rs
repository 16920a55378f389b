//! Game settings and preferences
//!
//! Stored as JSON next to the binary; missing fields take their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{DISPLAY_HZ, LOGIC_HZ};
use crate::renderer::pipeline::OUTLINE_DISTANCE;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings io: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings parse: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    /// Display name, accepted back by `parse`
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum live particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 128,
            QualityPreset::Medium => 512,
            QualityPreset::High => 2048,
        }
    }
}

/// Presentation and loop settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Particle effects (sparkles, smoke, bursts)
    pub particles: bool,
    /// Distance fog toward the sky color
    pub fog: bool,
    /// Darkened face edges on nearby geometry
    pub outlines: bool,
    pub outline_distance: f32,

    // === Display ===
    pub width: usize,
    pub height: usize,
    pub display_hz: u32,
    pub logic_hz: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,

            particles: true,
            fog: true,
            outlines: true,
            outline_distance: OUTLINE_DISTANCE,

            width: 640,
            height: 480,
            display_hz: DISPLAY_HZ,
            logic_hz: LOGIC_HZ,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset (applies preset defaults)
    pub fn from_preset(preset: QualityPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;

        // Low preset drops the per-face extras
        if preset == QualityPreset::Low {
            self.outlines = false;
            self.fog = false;
        }
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = serde_json::from_str(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Load from `path`, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Using default settings ({e})");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("star_hop_{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("roundtrip");
        let mut settings = Settings::from_preset(QualityPreset::High);
        settings.width = 320;
        settings.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"quality":"Low","fog":false}"#).unwrap();
        assert_eq!(settings.quality, QualityPreset::Low);
        assert!(!settings.fog);
        assert_eq!(settings.width, 640);
        assert_eq!(settings.logic_hz, LOGIC_HZ);
    }

    #[test]
    fn test_load_errors_and_fallback() {
        let missing = temp_path("missing");
        assert!(matches!(Settings::load(&missing), Err(SettingsError::Io(_))));

        let bad = temp_path("bad");
        std::fs::write(&bad, "{ not json").unwrap();
        assert!(matches!(Settings::load(&bad), Err(SettingsError::Parse(_))));
        assert_eq!(Settings::load_or_default(&bad), Settings::default());
        std::fs::remove_file(&bad).ok();
    }

    #[test]
    fn test_particle_cap_follows_preset_and_toggle() {
        let mut settings = Settings::from_preset(QualityPreset::Low);
        assert_eq!(settings.max_particles(), 128);
        assert!(!settings.outlines);
        settings.particles = false;
        assert_eq!(settings.max_particles(), 0);
    }

    #[test]
    fn test_preset_names_parse_back() {
        for preset in [QualityPreset::Low, QualityPreset::Medium, QualityPreset::High] {
            assert_eq!(QualityPreset::parse(preset.as_str()), Some(preset));
        }
        assert_eq!(QualityPreset::parse("MED"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::parse("ultra"), None);
    }
}
