//! Game rules and render options
//!
//! Everything a run can be tuned by lives here and loads from JSON. Missing
//! fields fall back to their defaults, so a config file only needs to name
//! the values it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Cosmetic detail presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DetailPreset {
    /// Flat terrain, no animated backdrop
    Flat,
    #[default]
    Full,
}

impl DetailPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetailPreset::Flat => "Flat",
            DetailPreset::Full => "Full",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "flat" | "low" => Some(DetailPreset::Flat),
            "full" | "high" => Some(DetailPreset::Full),
            _ => None,
        }
    }
}

/// Render-only switches; none of these affect the simulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub preset: DetailPreset,
    /// Scrolling diagonal stripes behind the arena
    pub backdrop_stripes: bool,
    /// Animated wave lines on water tiles
    pub water_animation: bool,
    /// Draw the enemy kind number on each enemy tank
    pub kind_labels: bool,
    /// Paused / won / over banners
    pub overlay_text: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            preset: DetailPreset::Full,
            backdrop_stripes: true,
            water_animation: true,
            kind_labels: true,
            overlay_text: true,
        }
    }
}

impl RenderOptions {
    pub fn from_preset(preset: DetailPreset) -> Self {
        let mut options = Self::default();
        options.apply_preset(preset);
        options
    }

    pub fn apply_preset(&mut self, preset: DetailPreset) {
        self.preset = preset;
        let full = preset == DetailPreset::Full;
        self.backdrop_stripes = full;
        self.water_animation = full;
    }
}

/// Game rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seed for the engine's random source
    pub seed: u64,

    // === Campaign ===
    pub starting_lives: u32,
    /// Enemy kills needed to clear a level
    pub kill_goal: u32,
    /// Levels in the campaign; clearing the last one ends the run
    pub total_levels: u32,
    pub score_per_kill: u64,

    // === Spawning ===
    /// Maximum enemies alive at once
    pub enemy_cap: usize,
    /// Seconds between spawn attempts
    pub spawn_interval: f32,
    /// Delay before the first spawn attempt of a level
    pub first_spawn_delay: f32,

    // === Combat ===
    pub player_bullet_cap: usize,
    pub enemy_bullet_cap: usize,
    pub player_cooldown: f32,
    pub enemy_cooldown: f32,
    pub player_speed: f32,
    pub enemy_speed: f32,
    pub bullet_speed: f32,

    // === Arena ===
    pub map_width: usize,
    pub map_height: usize,
    pub tile_size: f32,

    pub render: RenderOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 1234,

            starting_lives: 3,
            kill_goal: 10,
            total_levels: 3,
            score_per_kill: 100,

            enemy_cap: 6,
            spawn_interval: 0.65,
            first_spawn_delay: 0.55,

            player_bullet_cap: 2,
            enemy_bullet_cap: 3,
            player_cooldown: 0.18,
            enemy_cooldown: 0.55,
            player_speed: 120.0,
            enemy_speed: 90.0,
            bullet_speed: 420.0,

            map_width: 50,
            map_height: 26,
            tile_size: 28.0,

            render: RenderOptions::default(),
        }
    }
}

impl Settings {
    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&text)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject rule sets that cannot produce a playable run
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid =
            |msg: &str| -> Result<(), ConfigError> { Err(ConfigError::Invalid(msg.to_string())) };
        if self.starting_lives == 0 {
            return invalid("starting_lives must be at least 1");
        }
        if self.kill_goal == 0 {
            return invalid("kill_goal must be at least 1");
        }
        if self.total_levels == 0 {
            return invalid("total_levels must be at least 1");
        }
        if self.enemy_cap == 0 {
            return invalid("enemy_cap must be at least 1");
        }
        if self.player_bullet_cap == 0 || self.enemy_bullet_cap == 0 {
            return invalid("bullet caps must be at least 1");
        }
        let timings = [
            ("spawn_interval", self.spawn_interval),
            ("player_cooldown", self.player_cooldown),
            ("enemy_cooldown", self.enemy_cooldown),
        ];
        for (name, value) in timings {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be positive")));
            }
        }
        if !(self.first_spawn_delay.is_finite() && self.first_spawn_delay >= 0.0) {
            return invalid("first_spawn_delay must not be negative");
        }
        let speeds = [
            ("player_speed", self.player_speed),
            ("enemy_speed", self.enemy_speed),
            ("bullet_speed", self.bullet_speed),
            ("tile_size", self.tile_size),
        ];
        for (name, value) in speeds {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be positive")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.kill_goal, 10);
        assert_eq!(settings.enemy_cap, 6);
        assert_eq!(settings.player_bullet_cap, 2);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "kill_goal": 4, "render": { "kind_labels": false } }"#)
            .unwrap();
        assert_eq!(settings.kill_goal, 4);
        assert_eq!(settings.starting_lives, 3);
        assert!(!settings.render.kind_labels);
        assert!(settings.render.overlay_text);
    }

    #[test]
    fn test_rejects_zero_goal() {
        let err = Settings::from_json(r#"{ "kill_goal": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_negative_interval() {
        let settings = Settings {
            spawn_interval: -1.0,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_parse_error() {
        let err = Settings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("battle-tank-settings-{}.json", std::process::id()));
        let settings = Settings {
            seed: 99,
            total_levels: 5,
            ..Settings::default()
        };
        std::fs::write(&path, settings.to_json().unwrap()).unwrap();
        let loaded = Settings::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Settings::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_preset_parsing() {
        assert_eq!(DetailPreset::from_str("LOW"), Some(DetailPreset::Flat));
        assert_eq!(DetailPreset::from_str("full"), Some(DetailPreset::Full));
        assert_eq!(DetailPreset::from_str("ultra"), None);
        let flat = RenderOptions::from_preset(DetailPreset::Flat);
        assert!(!flat.backdrop_stripes && !flat.water_animation);
        assert_eq!(flat.preset.as_str(), "Flat");
    }
}
