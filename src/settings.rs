use asciifx::engine::CellMetrics;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub display: DisplaySettings,
    #[serde(default)]
    pub effects: HashMap<String, EffectSettings>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DisplaySettings {
    pub cell_width: Option<f64>,   // Pixel width of one glyph (default 7.2)
    pub cell_height: Option<f64>,  // Pixel height of one glyph (default 14)
    pub scheme: Option<u8>,        // Starting colour scheme, 0-9
}

#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct EffectSettings {
    pub tick_ms: Option<u64>,
    pub seed: Option<u64>,
}

impl Settings {
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => Self::parse(&content).unwrap_or_else(|e| {
                log::warn!("ignoring malformed {}: {}", path.display(), e);
                Self::default()
            }),
            Err(e) => {
                log::warn!("cannot read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("asciifx")
            .join("config.toml")
    }

    pub fn cell_metrics(&self) -> CellMetrics {
        let d = CellMetrics::default();
        CellMetrics::new(
            self.display.cell_width.unwrap_or(d.width),
            self.display.cell_height.unwrap_or(d.height),
        )
    }

    pub fn effect(&self, name: &str) -> EffectSettings {
        self.effects.get(name).copied().unwrap_or_default()
    }
}
