use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::time::Duration;

use crate::draw::RerunConfig;
use crate::scene::{Detail, GeometryBuilder, Style};
use crate::sim::config::IncidentParams;
use crate::sim::phase::PhaseModel;
use crate::sim::playback::Playback;
use crate::site::SiteLayout;

/// Time range and pacing of an animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// First frame (min).
    pub start: f64,
    /// Last frame (min).
    pub end: f64,
    /// Frame spacing (min).
    pub step: f64,
    /// Pause between frames (ms).
    pub frame_delay_ms: u64,
}

impl PlaybackConfig {
    pub fn new() -> Self {
        Self {
            start: 0.0,
            end: 15.0,
            step: 0.1,
            frame_delay_ms: 0,
        }
    }

    pub fn to_playback(&self) -> Result<Playback> {
        Ok(Playback::linear(self.start, self.end, self.step)?
            .with_frame_delay(Duration::from_millis(self.frame_delay_ms)))
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything needed to replay one incident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RunConfig {
    pub params: IncidentParams,
    pub layout: SiteLayout,
    pub detail: Detail,
    pub playback: PlaybackConfig,
    pub viewer: RerunConfig,
    /// Seed of the scatter sampler. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl RunConfig {
    /// Runs every check the model, builder and playback would run on construction.
    pub fn validate(&self) -> Result<()> {
        self.params.validate().context("Invalid incident parameters")?;
        self.layout.validate().context("Invalid site layout")?;
        self.playback.to_playback().context("Invalid playback range")?;
        ensure!(
            self.viewer.point_radius_scale.is_finite() && self.viewer.point_radius_scale > 0.0,
            "point radius scale must be positive, got {}",
            self.viewer.point_radius_scale
        );
        Ok(())
    }

    pub fn model(&self) -> Result<PhaseModel> {
        PhaseModel::new(self.params.clone())
    }

    pub fn builder(&self) -> Result<GeometryBuilder> {
        GeometryBuilder::new(self.layout.clone(), Style::new(self.detail))
    }
}

/// Writes a run configuration to a JSON file.
pub fn write_config(path: &Path, config: &RunConfig) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, config)
        .with_context(|| format!("Failed to serialize config to: {}", path.display()))?;

    Ok(())
}

/// Reads and validates a run configuration from a JSON file.
///
/// Missing fields take their default values.
pub fn read_config(path: &Path) -> Result<RunConfig> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open file: {}", path.display()))?;
    let reader = BufReader::new(file);

    let config: RunConfig = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to deserialize config from: {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid config in: {}", path.display()))?;

    Ok(config)
}

pub fn config_to_string(config: &RunConfig) -> Result<String> {
    serde_json::to_string_pretty(config).context("Failed to serialize config to string")
}

/// Parses and validates a run configuration.
pub fn config_from_str(json: &str) -> Result<RunConfig> {
    let config: RunConfig =
        serde_json::from_str(json).context("Failed to deserialize config from string")?;
    config.validate()?;
    Ok(config)
}
