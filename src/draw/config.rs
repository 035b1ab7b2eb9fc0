use serde::{Deserialize, Serialize};

/// Configuration for Rerun visualization sessions.
///
/// Controls session naming, entity paths and the mapping from scene marker
/// sizes to world-space radii.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RerunConfig {
    // Labels
    pub session_name: String,
    pub entity_prefix: String,
    pub timeline: String,

    // Radii
    /// World radius per square root of a cloud marker size.
    pub point_radius_scale: f32,
    pub wire_radius: f32,
    pub marker_radius: f32,
}

impl RerunConfig {
    pub fn new() -> Self {
        Self {
            session_name: "lngsim".to_string(),
            entity_prefix: "site".to_string(),
            timeline: "frame".to_string(),

            point_radius_scale: 0.05,
            wire_radius: 0.05,
            marker_radius: 0.5,
        }
    }

    /// Entity path of the metric series.
    pub fn metrics_prefix(&self) -> String {
        format!("{}/metrics", self.entity_prefix)
    }

    /// Entity path of the scene geometry; cleared on every frame.
    pub fn scene_prefix(&self) -> String {
        format!("{}/scene", self.entity_prefix)
    }
}

impl Default for RerunConfig {
    fn default() -> Self {
        Self::new()
    }
}
