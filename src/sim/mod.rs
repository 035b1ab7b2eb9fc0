//! Incident physics: parameters, phase model, state and timeline playback.

pub mod config;
pub mod phase;
pub mod playback;
pub mod state;
