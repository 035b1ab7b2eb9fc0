use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};

/// Preset level of visual detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Detail {
    /// Coarse meshes and sparse clouds, for fast previews.
    Draft,
    #[default]
    Standard,
    /// Smooth meshes, a third cloud band and denser debris.
    Refined,
}

/// Tessellation and sampling densities of a scene.
///
/// Only the visual density changes with the style; the physical content
/// (positions, radii, extents) stays the same.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    /// Angular segments of the tank wall and cap.
    pub tank_segments: usize,
    /// Height samples of the tank wall.
    pub tank_height_samples: usize,
    /// Radial samples of the tank cap.
    pub cap_radial_samples: usize,
    /// Angular segments of pipes.
    pub pipe_segments: usize,
    /// Ground plane samples per side.
    pub ground_samples: usize,
    /// (azimuth, elevation) samples of blast hemispheres.
    pub hemisphere_samples: (usize, usize),
    /// (azimuth, polar) samples of the fireball.
    pub fireball_samples: (usize, usize),
    /// Points per m2 of cloud area in the dilute halo.
    pub cloud_points_per_m2: f64,
    /// Adds the intermediate concentration band.
    pub cloud_mid_band: bool,
    /// Points in the primary fire cloud (the secondary cloud has the same count).
    pub fire_points: usize,
    pub smoke_points: usize,
}

impl Style {
    pub fn new(detail: Detail) -> Self {
        match detail {
            Detail::Draft => Self {
                tank_segments: 24,
                tank_height_samples: 2,
                cap_radial_samples: 2,
                pipe_segments: 8,
                ground_samples: 2,
                hemisphere_samples: (24, 12),
                fireball_samples: (16, 16),
                cloud_points_per_m2: 1.0,
                cloud_mid_band: false,
                fire_points: 80,
                smoke_points: 120,
            },
            Detail::Standard => Self {
                tank_segments: 50,
                tank_height_samples: 50,
                cap_radial_samples: 2,
                pipe_segments: 10,
                ground_samples: 10,
                hemisphere_samples: (50, 30),
                fireball_samples: (30, 30),
                cloud_points_per_m2: 2.0,
                cloud_mid_band: false,
                fire_points: 200,
                smoke_points: 300,
            },
            Detail::Refined => Self {
                tank_segments: 100,
                tank_height_samples: 100,
                cap_radial_samples: 2,
                pipe_segments: 10,
                ground_samples: 100,
                hemisphere_samples: (50, 30),
                fireball_samples: (30, 30),
                cloud_points_per_m2: 3.0,
                cloud_mid_band: true,
                fire_points: 200,
                smoke_points: 300,
            },
        }
    }

    /// Rejects sample counts that cannot form a grid cell.
    pub fn validate(&self) -> Result<()> {
        for (name, n) in [
            ("tank segments", self.tank_segments),
            ("tank height samples", self.tank_height_samples),
            ("cap radial samples", self.cap_radial_samples),
            ("pipe segments", self.pipe_segments),
            ("ground samples", self.ground_samples),
            ("hemisphere azimuth samples", self.hemisphere_samples.0),
            ("hemisphere elevation samples", self.hemisphere_samples.1),
            ("fireball azimuth samples", self.fireball_samples.0),
            ("fireball polar samples", self.fireball_samples.1),
        ] {
            ensure!(n >= 2, "{} must be at least 2, got {}", name, n);
        }
        ensure!(
            self.cloud_points_per_m2.is_finite() && self.cloud_points_per_m2 >= 0.0,
            "cloud density must be finite and non-negative, got {}",
            self.cloud_points_per_m2
        );
        Ok(())
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::new(Detail::default())
    }
}

impl From<Detail> for Style {
    fn from(detail: Detail) -> Self {
        Self::new(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        for detail in [Detail::Draft, Detail::Standard, Detail::Refined] {
            assert!(Style::new(detail).validate().is_ok(), "{:?}", detail);
        }
    }

    #[test]
    fn test_detail_increases_density() {
        let draft = Style::new(Detail::Draft);
        let refined = Style::new(Detail::Refined);
        assert!(draft.tank_segments < refined.tank_segments);
        assert!(draft.cloud_points_per_m2 < refined.cloud_points_per_m2);
        assert!(!draft.cloud_mid_band && refined.cloud_mid_band);
    }

    #[test]
    fn test_rejects_single_sample() {
        let mut style = Style::default();
        style.pipe_segments = 1;
        assert!(style.validate().is_err());
    }

    #[test]
    fn test_detail_serde_names() {
        let json = serde_json::to_string(&Detail::Refined).unwrap();
        assert_eq!(json, "\"refined\"");
        let detail: Detail = serde_json::from_str("\"draft\"").unwrap();
        assert_eq!(detail, Detail::Draft);
    }
}
