use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};

use crate::vecutils::{is_non_decreasing, is_strictly_increasing};

/// Overpressure thresholds (kPa) of the three blast damage rings, innermost first.
pub const OVERPRESSURE_THRESHOLDS_KPA: [f64; 3] = [400.0, 100.0, 50.0];

/// Largest accepted saturated cloud footprint (m2).
pub const MAX_CLOUD_AREA_M2: f64 = 1.0e6;
/// Largest accepted cloud height (m).
pub const MAX_CLOUD_HEIGHT_M: f64 = 1.0e3;

/// Physical parameters of the leak and explosion scenario.
///
/// All values are fixed for the lifetime of a [`PhaseModel`](super::phase::PhaseModel)
/// and checked once by [`IncidentParams::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncidentParams {
    // Leak
    /// Mass flow through the leak (kg/s).
    pub leak_rate_kg_s: f64,
    /// Elapsed time (min) at which the cloud ignites.
    pub explosion_threshold_min: f64,

    // Dispersion
    /// Cloud area breakpoints as `(time min, area m2)`, starting at `t = 0`.
    ///
    /// The area is interpolated linearly between breakpoints and holds at the
    /// last value afterwards.
    pub area_breakpoints: Vec<(f64, f64)>,
    /// Cloud height at `t = 0` (m).
    pub cloud_height_initial_m: f64,
    /// Cloud growth rate before the knee (m/min).
    pub cloud_height_early_rate: f64,
    /// Time where the growth rate changes (min).
    pub cloud_height_knee_min: f64,
    /// Cloud growth rate after the knee (m/min).
    pub cloud_height_late_rate: f64,

    // Phase onsets (min)
    pub diffusing_onset_min: f64,
    pub lfl_onset_min: f64,
    pub high_risk_onset_min: f64,

    // Explosion (TNT equivalence)
    /// Fraction of the released mass inside the flammable range.
    pub combustible_fraction: f64,
    /// Fraction of the combustion energy converted into blast (VCE efficiency).
    pub vce_efficiency: f64,
    /// Heat of combustion of LNG (J/kg).
    pub heat_of_combustion_j_kg: f64,
    /// Blast energy of TNT (J/kg).
    pub heat_of_tnt_j_kg: f64,
    /// Scaled distances (m/kg^(1/3)) for the 400, 100 and 50 kPa rings.
    pub blast_scales: [f64; 3],
}

impl IncidentParams {
    pub fn new() -> Self {
        Self {
            leak_rate_kg_s: 0.8,
            explosion_threshold_min: 10.0,
            area_breakpoints: vec![
                (0.0, 0.0),
                (1.0, 20.0),
                (3.0, 400.0),
                (5.0, 800.0),
                (10.0, 1200.0),
            ],
            cloud_height_initial_m: 0.5,
            cloud_height_early_rate: 0.5,
            cloud_height_knee_min: 5.0,
            cloud_height_late_rate: 0.2,
            diffusing_onset_min: 1.0,
            lfl_onset_min: 3.0,
            high_risk_onset_min: 5.0,
            combustible_fraction: 0.25,
            vce_efficiency: 0.03,
            heat_of_combustion_j_kg: 50e6,
            heat_of_tnt_j_kg: 4.5e6,
            blast_scales: [0.29, 0.62, 0.98],
        }
    }

    /// Cloud area once the dispersion has saturated (m2).
    pub fn max_cloud_area(&self) -> f64 {
        self.area_breakpoints.last().map_or(0.0, |&(_, a)| a)
    }

    /// Rejects inconsistent parameter sets.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("leak rate", self.leak_rate_kg_s),
            ("explosion threshold", self.explosion_threshold_min),
            ("initial cloud height", self.cloud_height_initial_m),
            ("early cloud height rate", self.cloud_height_early_rate),
            ("cloud height knee", self.cloud_height_knee_min),
            ("late cloud height rate", self.cloud_height_late_rate),
            ("diffusing onset", self.diffusing_onset_min),
            ("LFL onset", self.lfl_onset_min),
            ("high risk onset", self.high_risk_onset_min),
            ("combustible fraction", self.combustible_fraction),
            ("VCE efficiency", self.vce_efficiency),
            ("heat of combustion", self.heat_of_combustion_j_kg),
            ("heat of TNT", self.heat_of_tnt_j_kg),
            ("400 kPa blast scale", self.blast_scales[0]),
            ("100 kPa blast scale", self.blast_scales[1]),
            ("50 kPa blast scale", self.blast_scales[2]),
        ] {
            ensure!(value.is_finite(), "{} must be finite, got {}", name, value);
        }
        ensure!(
            self.leak_rate_kg_s.is_finite() && self.leak_rate_kg_s > 0.0,
            "leak rate must be finite and positive, got {}",
            self.leak_rate_kg_s
        );
        ensure!(
            self.explosion_threshold_min.is_finite() && self.explosion_threshold_min > 0.0,
            "explosion threshold must be positive, got {}",
            self.explosion_threshold_min
        );

        ensure!(
            self.area_breakpoints.len() >= 2,
            "at least 2 area breakpoints are required"
        );
        ensure!(
            self.area_breakpoints[0].0 == 0.0,
            "first area breakpoint must be at t = 0, got {}",
            self.area_breakpoints[0].0
        );
        let times: Vec<f64> = self.area_breakpoints.iter().map(|&(t, _)| t).collect();
        let areas: Vec<f64> = self.area_breakpoints.iter().map(|&(_, a)| a).collect();
        ensure!(
            times.iter().chain(areas.iter()).all(|v| v.is_finite()),
            "area breakpoints must be finite"
        );
        ensure!(
            is_strictly_increasing(&times),
            "area breakpoint times must be strictly increasing"
        );
        ensure!(
            areas[0] >= 0.0 && is_non_decreasing(&areas),
            "cloud areas must be non-negative and non-decreasing"
        );
        ensure!(
            self.max_cloud_area() <= MAX_CLOUD_AREA_M2,
            "saturated cloud area {} m2 exceeds {} m2",
            self.max_cloud_area(),
            MAX_CLOUD_AREA_M2
        );

        ensure!(
            self.cloud_height_initial_m > 0.0
                && self.cloud_height_early_rate >= 0.0
                && self.cloud_height_late_rate >= 0.0,
            "cloud height model must have a positive start and non-negative rates"
        );
        ensure!(
            self.cloud_height_knee_min > 0.0
                && self.cloud_height_knee_min <= self.explosion_threshold_min,
            "cloud height knee must lie in (0, explosion threshold]"
        );
        // Height is non-decreasing and frozen at the threshold, so this is its maximum
        let knee = self.cloud_height_knee_min;
        let peak_height = self.cloud_height_initial_m
            + self.cloud_height_early_rate * knee
            + self.cloud_height_late_rate * (self.explosion_threshold_min - knee);
        ensure!(
            peak_height.is_finite() && peak_height <= MAX_CLOUD_HEIGHT_M,
            "peak cloud height {} m exceeds {} m",
            peak_height,
            MAX_CLOUD_HEIGHT_M
        );

        ensure!(
            is_strictly_increasing(&[
                0.0,
                self.diffusing_onset_min,
                self.lfl_onset_min,
                self.high_risk_onset_min,
                self.explosion_threshold_min,
            ]),
            "phase onsets must satisfy 0 < diffusing < lfl < high risk < explosion"
        );

        for (name, fraction) in [
            ("combustible fraction", self.combustible_fraction),
            ("VCE efficiency", self.vce_efficiency),
        ] {
            ensure!(
                fraction > 0.0 && fraction <= 1.0,
                "{} must lie in (0, 1], got {}",
                name,
                fraction
            );
        }
        ensure!(
            self.heat_of_combustion_j_kg > 0.0 && self.heat_of_tnt_j_kg > 0.0,
            "heats of combustion and TNT must be positive"
        );
        ensure!(
            self.blast_scales[0] > 0.0 && is_strictly_increasing(&self.blast_scales),
            "blast scales must be positive and ordered 400 kPa < 100 kPa < 50 kPa, got {:?}",
            self.blast_scales
        );
        let tnt_kg = self.vce_efficiency
            * self.combustible_fraction
            * self.leak_rate_kg_s
            * self.explosion_threshold_min
            * 60.0
            * self.heat_of_combustion_j_kg
            / self.heat_of_tnt_j_kg;
        ensure!(
            tnt_kg.is_finite() && (self.blast_scales[2] * tnt_kg.cbrt()).is_finite(),
            "TNT equivalent charge {} kg is not finite",
            tnt_kg
        );
        Ok(())
    }
}

impl Default for IncidentParams {
    fn default() -> Self {
        Self::new()
    }
}
