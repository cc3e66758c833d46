//! ASCII art animations rendered as fixed-pitch text frames.

pub mod effects;
pub mod engine;
