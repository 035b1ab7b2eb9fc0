//! File I/O for run configurations.
//!
//! A run is described by one JSON document holding the incident constants,
//! the site layout and the presentation settings.

pub mod config;

pub use config::{
    PlaybackConfig, RunConfig, config_from_str, config_to_string, read_config, write_config,
};
