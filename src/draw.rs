//! Presentation of scenes and metrics in a Rerun viewer.

pub mod config;
pub mod rerun;

pub use config::RerunConfig;
pub use rerun::{animate, draw_metrics, draw_scene, start_session};
