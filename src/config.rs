use crate::settings::Settings;
use asciifx::effects::EffectKind;
use asciifx::engine::{CellMetrics, RenderLoop};
use rand::prelude::*;
use std::time::Duration;

/// Configuration for one effect run, CLI values over settings file values
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub effect: EffectKind,
    pub tick: Option<Duration>,
    pub seed: Option<u64>,
    pub cell: CellMetrics,
    pub scheme: u8,
}

/// Extra knobs for rendering to stdout instead of the terminal
#[derive(Clone, Debug)]
pub struct PrintConfig {
    pub run: RunConfig,
    pub cols: u16,
    pub rows: u16,
    pub frames: u64,
}

/// Resolve an effect name, falling back to matrix for unknown names
pub fn effect_or_default(name: &str) -> EffectKind {
    EffectKind::from_name(name).unwrap_or_else(|| {
        let names: Vec<&str> = EffectKind::ALL.iter().map(|k| k.name()).collect();
        eprintln!("Unknown effect: {}. Using matrix.", name);
        eprintln!("Available: {}", names.join(", "));
        EffectKind::Matrix
    })
}

impl RunConfig {
    pub fn new(effect: &str, tick_ms: Option<u64>, seed: Option<u64>, settings: &Settings) -> Self {
        let effect = effect_or_default(effect);
        let stored = settings.effect(effect.name());
        Self {
            effect,
            tick: tick_ms.or(stored.tick_ms).map(Duration::from_millis),
            seed: seed.or(stored.seed),
            cell: settings.cell_metrics(),
            scheme: settings.display.scheme.unwrap_or(0),
        }
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    pub fn render_loop(&self) -> RenderLoop {
        let render = RenderLoop::new(self.effect.scene(), self.cell, self.rng());
        match self.tick {
            Some(tick) => render.with_interval(tick),
            None => render,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_settings() {
        let settings = Settings::parse("[effects.warp]\ntick_ms = 40\nseed = 3\n").unwrap();
        let from_file = RunConfig::new("starfield", None, None, &settings);
        assert_eq!(from_file.effect, EffectKind::Warp);
        assert_eq!(from_file.tick, Some(Duration::from_millis(40)));
        assert_eq!(from_file.seed, Some(3));

        let from_cli = RunConfig::new("warp", Some(10), Some(9), &settings);
        assert_eq!(from_cli.tick, Some(Duration::from_millis(10)));
        assert_eq!(from_cli.seed, Some(9));
        assert_eq!(from_cli.render_loop().interval(), Duration::from_millis(10));
    }

    #[test]
    fn test_unknown_effect_falls_back() {
        let config = RunConfig::new("batman", None, None, &Settings::default());
        assert_eq!(config.effect, EffectKind::Matrix);
        assert_eq!(config.render_loop().interval(), Duration::from_millis(50));
    }
}
