//! Download music from YouTube based on the name of a song.

pub mod configuration;
pub mod domain;
pub mod startup;
pub mod telemetry;
pub mod youtube;
