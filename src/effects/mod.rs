//! The effect catalog. Each effect is a [`Scene`] assembled from engine layers.

pub mod aurora;
pub mod city;
pub mod fire;
pub mod glitch;
pub mod hack;
pub mod lightning;
pub mod matrix;
pub mod nebula;
pub mod reactor;
pub mod stream;
pub mod warp;
pub mod water;

use crate::engine::Scene;

/// Effects available from the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectKind {
    Fire,      // buffer-based fire
    Matrix,    // digital rain
    Warp,      // perspective starfield
    Nebula,    // dust clouds and parallax stars
    Aurora,    // banded sine curtains
    Water,     // rising and falling tide
    Lightning, // masked flickering bolt
    Stream,    // hex spiral
    Glitch,    // torn slices that snap back
    Hack,      // timed intrusion sequence
    Reactor,   // layered reactor core
    City,      // scrolling skyline
}

impl EffectKind {
    pub const ALL: [EffectKind; 12] = [
        EffectKind::Fire,
        EffectKind::Matrix,
        EffectKind::Warp,
        EffectKind::Nebula,
        EffectKind::Aurora,
        EffectKind::Water,
        EffectKind::Lightning,
        EffectKind::Stream,
        EffectKind::Glitch,
        EffectKind::Hack,
        EffectKind::Reactor,
        EffectKind::City,
    ];

    /// Look up an effect by name or alias, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name.trim().to_lowercase().as_str() {
            "fire" | "doom" => EffectKind::Fire,
            "matrix" | "cmatrix" | "rain" => EffectKind::Matrix,
            "warp" | "starfield" | "stars" => EffectKind::Warp,
            "nebula" => EffectKind::Nebula,
            "aurora" => EffectKind::Aurora,
            "water" | "waves" | "ocean" => EffectKind::Water,
            "lightning" | "bolt" => EffectKind::Lightning,
            "stream" | "data" => EffectKind::Stream,
            "glitch" | "slices" => EffectKind::Glitch,
            "hack" | "boot" => EffectKind::Hack,
            "reactor" | "core" => EffectKind::Reactor,
            "city" | "skyline" => EffectKind::City,
            _ => return None,
        };
        Some(kind)
    }

    pub fn name(&self) -> &'static str {
        match self {
            EffectKind::Fire => "fire",
            EffectKind::Matrix => "matrix",
            EffectKind::Warp => "warp",
            EffectKind::Nebula => "nebula",
            EffectKind::Aurora => "aurora",
            EffectKind::Water => "water",
            EffectKind::Lightning => "lightning",
            EffectKind::Stream => "stream",
            EffectKind::Glitch => "glitch",
            EffectKind::Hack => "hack",
            EffectKind::Reactor => "reactor",
            EffectKind::City => "city",
        }
    }

    pub fn about(&self) -> &'static str {
        match self {
            EffectKind::Fire => "A procedural buffer-based ASCII fire simulation.",
            EffectKind::Matrix => "A vertical digital rain effect inspired by the classic terminal stream.",
            EffectKind::Warp => "Stars streaking toward the viewer at warp speed.",
            EffectKind::Nebula => "Drifting dust clouds behind parallax stars, with torn scanlines.",
            EffectKind::Aurora => "Layered sine curtains of light.",
            EffectKind::Water => "A tide that rises and falls, foaming at the crest.",
            EffectKind::Lightning => "Shape-bounded particle system forming a flickering lightning bolt.",
            EffectKind::Stream => "Hex digits spiralling into a dark core.",
            EffectKind::Glitch => "A data field sliced into bands that jump and snap back.",
            EffectKind::Hack => "Boot log, decrypt storm and access granted, on a loop.",
            EffectKind::Reactor => "A pulsing reactor core inside counter-rotating rings.",
            EffectKind::City => "Rain over a scrolling night skyline.",
        }
    }

    pub fn scene(&self) -> Scene {
        match self {
            EffectKind::Fire => fire::scene(),
            EffectKind::Matrix => matrix::scene(),
            EffectKind::Warp => warp::scene(),
            EffectKind::Nebula => nebula::scene(),
            EffectKind::Aurora => aurora::scene(),
            EffectKind::Water => water::scene(),
            EffectKind::Lightning => lightning::scene(),
            EffectKind::Stream => stream::scene(),
            EffectKind::Glitch => glitch::scene(),
            EffectKind::Hack => hack::scene(),
            EffectKind::Reactor => reactor::scene(),
            EffectKind::City => city::scene(),
        }
    }
}
