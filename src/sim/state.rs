use serde::{Deserialize, Serialize};
use std::fmt;

use super::config::OVERPRESSURE_THRESHOLDS_KPA;

/// Stage of the incident, in chronological order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Liquid pool forming at the tank base, concentrations far below LFL.
    Incipient,
    /// Vapor spreading over the pool surroundings.
    Diffusing,
    /// Local concentrations reach the lower flammable limit.
    LflCritical,
    /// Flammable cloud accumulates around the equipment room.
    HighRisk,
    /// The cloud has ignited (vapor cloud explosion).
    Explosion,
}

impl Phase {
    pub fn danger_level(self) -> DangerLevel {
        match self {
            Phase::Incipient | Phase::Diffusing => DangerLevel::Low,
            Phase::LflCritical => DangerLevel::Medium,
            Phase::HighRisk => DangerLevel::High,
            Phase::Explosion => DangerLevel::Catastrophic,
        }
    }

    /// Peak vapor concentration band (vol %) reached in this phase.
    pub fn peak_concentration(self) -> &'static str {
        match self {
            Phase::Incipient | Phase::Diffusing => "1%-3%",
            Phase::LflCritical => "5% (LFL)",
            Phase::HighRisk => "5%-15%",
            Phase::Explosion => ">12% (deflagration)",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Incipient => "incipient leak",
            Phase::Diffusing => "diffusing",
            Phase::LflCritical => "LFL critical",
            Phase::HighRisk => "high risk accumulation",
            Phase::Explosion => "vapor cloud explosion",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordered hazard rating derived from the phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DangerLevel {
    Low,
    Medium,
    High,
    Catastrophic,
}

impl DangerLevel {
    pub fn label(self) -> &'static str {
        match self {
            DangerLevel::Low => "low (warning)",
            DangerLevel::Medium => "medium (dangerous)",
            DangerLevel::High => "high (emergency)",
            DangerLevel::Catastrophic => "extreme (catastrophic)",
        }
    }
}

impl fmt::Display for DangerLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Blast consequence of the vapor cloud explosion (TNT equivalence model).
///
/// Radii satisfy `radius_50kpa_m > radius_100kpa_m > radius_400kpa_m > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlastConsequence {
    /// Mass of the released vapor inside the flammable range (kg).
    pub combustible_mass_kg: f64,
    /// Equivalent TNT charge (kg).
    pub tnt_equivalent_kg: f64,
    /// Distance to 400 kPa overpressure: total destruction of equipment (m).
    pub radius_400kpa_m: f64,
    /// Distance to 100 kPa overpressure: lethal zone, pipe deformation (m).
    pub radius_100kpa_m: f64,
    /// Distance to 50 kPa overpressure: instrument and glass damage (m).
    pub radius_50kpa_m: f64,
}

impl BlastConsequence {
    /// `(threshold kPa, radius m)` pairs, innermost ring first.
    pub fn rings(&self) -> [(f64, f64); 3] {
        let [p400, p100, p50] = OVERPRESSURE_THRESHOLDS_KPA;
        [
            (p400, self.radius_400kpa_m),
            (p100, self.radius_100kpa_m),
            (p50, self.radius_50kpa_m),
        ]
    }
}

/// Physical state of the incident at one instant.
///
/// Built by [`PhaseModel::evaluate`](super::phase::PhaseModel::evaluate) and
/// never mutated afterwards. `blast` is present iff `phase == Phase::Explosion`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhysicalState {
    pub(crate) time_min: f64,
    pub(crate) leaked_mass_kg: f64,
    pub(crate) cloud_area_m2: f64,
    pub(crate) cloud_height_m: f64,
    pub(crate) max_cloud_area_m2: f64,
    pub(crate) phase: Phase,
    pub(crate) blast: Option<BlastConsequence>,
}

impl PhysicalState {
    /// Elapsed time since the leak started (min).
    pub fn time_min(&self) -> f64 {
        self.time_min
    }

    /// Cumulative released LNG (kg).
    pub fn leaked_mass_kg(&self) -> f64 {
        self.leaked_mass_kg
    }

    /// Ground footprint of the vapor cloud (m2).
    pub fn cloud_area_m2(&self) -> f64 {
        self.cloud_area_m2
    }

    /// Height of the vapor cloud (m).
    pub fn cloud_height_m(&self) -> f64 {
        self.cloud_height_m
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn danger_level(&self) -> DangerLevel {
        self.phase.danger_level()
    }

    pub fn blast(&self) -> Option<&BlastConsequence> {
        self.blast.as_ref()
    }

    pub fn is_exploded(&self) -> bool {
        self.phase == Phase::Explosion
    }

    /// The leak is still feeding the cloud until ignition.
    pub fn is_leaking(&self) -> bool {
        !self.is_exploded()
    }

    /// Cloud area relative to its saturated extent, in `0..=1`.
    pub fn area_fraction(&self) -> f64 {
        if self.max_cloud_area_m2 > 0.0 {
            self.cloud_area_m2 / self.max_cloud_area_m2
        } else {
            0.0
        }
    }

    /// Short status line for captions and logs.
    pub fn status(&self) -> String {
        if self.is_leaking() {
            format!(
                "leak dispersing ({}, peak {})",
                self.phase,
                self.phase.peak_concentration()
            )
        } else {
            "vapor cloud explosion (VCE)".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_danger_level_is_monotone_in_phase() {
        let phases = [
            Phase::Incipient,
            Phase::Diffusing,
            Phase::LflCritical,
            Phase::HighRisk,
            Phase::Explosion,
        ];
        for w in phases.windows(2) {
            assert!(w[0] < w[1]);
            assert!(w[0].danger_level() <= w[1].danger_level());
        }
        assert_eq!(Phase::Diffusing.danger_level(), DangerLevel::Low);
        assert_eq!(Phase::Explosion.danger_level(), DangerLevel::Catastrophic);
    }

    #[test]
    fn test_rings_order() {
        let blast = BlastConsequence {
            combustible_mass_kg: 120.0,
            tnt_equivalent_kg: 40.0,
            radius_400kpa_m: 1.0,
            radius_100kpa_m: 2.0,
            radius_50kpa_m: 3.0,
        };
        let rings = blast.rings();
        assert_eq!(rings[0], (400.0, 1.0));
        assert_eq!(rings[2], (50.0, 3.0));
    }

    #[test]
    fn test_area_fraction_without_saturation() {
        let state = PhysicalState {
            time_min: 0.0,
            leaked_mass_kg: 0.0,
            cloud_area_m2: 0.0,
            cloud_height_m: 0.5,
            max_cloud_area_m2: 0.0,
            phase: Phase::Incipient,
            blast: None,
        };
        assert_eq!(state.area_fraction(), 0.0);
        assert!(state.is_leaking());
        assert!(state.status().contains("1%-3%"));
    }
}
