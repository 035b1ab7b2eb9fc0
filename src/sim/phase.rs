//! Deterministic incident physics: elapsed time to physical state.

use anyhow::{Result, ensure};
use tracing::debug;

use super::config::IncidentParams;
use super::state::{BlastConsequence, Phase, PhysicalState};

const SECONDS_PER_MINUTE: f64 = 60.0;

/// Maps elapsed time to the physical state of the incident.
///
/// The model is pure: equal `t` always gives a bit-identical state.
#[derive(Debug, Clone)]
pub struct PhaseModel {
    params: IncidentParams,
}

impl PhaseModel {
    /// Creates a model after validating `params`.
    pub fn new(params: IncidentParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &IncidentParams {
        &self.params
    }

    /// Evaluates the state at `t_min` minutes after the leak started.
    ///
    /// Negative or non-finite times are rejected, never clamped.
    pub fn evaluate(&self, t_min: f64) -> Result<PhysicalState> {
        ensure!(
            t_min.is_finite() && t_min >= 0.0,
            "elapsed time must be finite and non-negative, got {} min",
            t_min
        );
        let p = &self.params;

        let leaked_mass_kg = leaked_mass(p, t_min);
        let phase = classify_phase(p, t_min);
        let blast = match phase {
            Phase::Explosion => Some(blast_consequence(p, leaked_mass_kg)),
            _ => None,
        };

        let state = PhysicalState {
            time_min: t_min,
            leaked_mass_kg,
            cloud_area_m2: cloud_area(p, t_min),
            cloud_height_m: cloud_height(p, t_min),
            max_cloud_area_m2: p.max_cloud_area(),
            phase,
            blast,
        };
        debug!(
            t_min,
            phase = ?state.phase,
            area = state.cloud_area_m2,
            height = state.cloud_height_m,
            "evaluated incident state"
        );
        Ok(state)
    }
}

/// Released mass (kg). Accumulation stops at ignition.
pub fn leaked_mass(p: &IncidentParams, t_min: f64) -> f64 {
    p.leak_rate_kg_s * t_min.min(p.explosion_threshold_min) * SECONDS_PER_MINUTE
}

/// Cloud footprint (m2), piecewise linear over the area breakpoints.
///
/// A breakpoint time belongs to the segment that ends there, so every
/// breakpoint maps exactly to its tabulated area.
pub fn cloud_area(p: &IncidentParams, t_min: f64) -> f64 {
    let pts = &p.area_breakpoints;
    let Some(&(t_first, a_first)) = pts.first() else {
        return 0.0;
    };
    if t_min <= t_first {
        return a_first;
    }
    for w in pts.windows(2) {
        let (t0, a0) = w[0];
        let (t1, a1) = w[1];
        if t_min <= t1 {
            return a0 + (a1 - a0) * (t_min - t0) / (t1 - t0);
        }
    }
    p.max_cloud_area()
}

/// Cloud height (m): two linear ramps, frozen at the explosion threshold.
pub fn cloud_height(p: &IncidentParams, t_min: f64) -> f64 {
    let t = t_min.min(p.explosion_threshold_min);
    let knee = p.cloud_height_knee_min;
    if t < knee {
        p.cloud_height_initial_m + p.cloud_height_early_rate * t
    } else {
        p.cloud_height_initial_m
            + p.cloud_height_early_rate * knee
            + p.cloud_height_late_rate * (t - knee)
    }
}

pub fn classify_phase(p: &IncidentParams, t_min: f64) -> Phase {
    if t_min >= p.explosion_threshold_min {
        Phase::Explosion
    } else if t_min >= p.high_risk_onset_min {
        Phase::HighRisk
    } else if t_min >= p.lfl_onset_min {
        Phase::LflCritical
    } else if t_min >= p.diffusing_onset_min {
        Phase::Diffusing
    } else {
        Phase::Incipient
    }
}

/// TNT-equivalence blast model for the released mass `leaked_mass_kg`.
pub fn blast_consequence(p: &IncidentParams, leaked_mass_kg: f64) -> BlastConsequence {
    let combustible_mass_kg = leaked_mass_kg * p.combustible_fraction;
    let tnt_equivalent_kg =
        p.vce_efficiency * combustible_mass_kg * p.heat_of_combustion_j_kg / p.heat_of_tnt_j_kg;
    let w_root = tnt_equivalent_kg.cbrt();
    let [s400, s100, s50] = p.blast_scales;
    BlastConsequence {
        combustible_mass_kg,
        tnt_equivalent_kg,
        radius_400kpa_m: s400 * w_root,
        radius_100kpa_m: s100 * w_root,
        radius_50kpa_m: s50 * w_root,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vecutils::{is_non_decreasing, linspace};

    fn model() -> PhaseModel {
        PhaseModel::new(IncidentParams::new()).unwrap()
    }

    #[test]
    fn test_area_is_linear_in_first_minute() {
        let m = model();
        for t in linspace(0., 1., 21) {
            let s = m.evaluate(t).unwrap();
            assert!((s.cloud_area_m2() - 20. * t).abs() < 1e-12, "t = {}", t);
        }
    }

    #[test]
    fn test_area_at_breakpoints() {
        let m = model();
        for (t, a) in [(1., 20.), (3., 400.), (5., 800.), (10., 1200.), (12.5, 1200.)] {
            assert_eq!(m.evaluate(t).unwrap().cloud_area_m2(), a, "t = {}", t);
        }
    }

    #[test]
    fn test_area_and_height_non_decreasing() {
        let m = model();
        let times = linspace(0., 30., 3001);
        let states: Vec<PhysicalState> = times.iter().map(|&t| m.evaluate(t).unwrap()).collect();
        let areas: Vec<f64> = states.iter().map(|s| s.cloud_area_m2()).collect();
        let heights: Vec<f64> = states.iter().map(|s| s.cloud_height_m()).collect();
        assert!(is_non_decreasing(&areas));
        assert!(is_non_decreasing(&heights));
        assert!(areas.iter().all(|&a| a <= 1200.));
        assert!(heights.iter().all(|&h| h <= 4.));
    }

    #[test]
    fn test_height_continuity() {
        let p = IncidentParams::new();
        assert_eq!(cloud_height(&p, 0.), 0.5);
        assert_eq!(cloud_height(&p, 5.), 3.0);
        assert!((cloud_height(&p, 5. - 1e-9) - 3.0).abs() < 1e-8);
        assert_eq!(cloud_height(&p, 10.), 4.0);
        assert!((cloud_height(&p, 10. - 1e-9) - 4.0).abs() < 1e-8);
        for t in [10.001, 11., 15., 1000.] {
            assert_eq!(cloud_height(&p, t), 4.0);
        }
        assert!((cloud_height(&p, 2.) - 1.5).abs() < 1e-12);
        assert!((cloud_height(&p, 7.5) - 3.5).abs() < 1e-12);
    }

    #[test]
    fn test_phase_boundaries() {
        let p = IncidentParams::new();
        assert_eq!(classify_phase(&p, 0.), Phase::Incipient);
        assert_eq!(classify_phase(&p, 0.99), Phase::Incipient);
        assert_eq!(classify_phase(&p, 1.), Phase::Diffusing);
        assert_eq!(classify_phase(&p, 3.), Phase::LflCritical);
        assert_eq!(classify_phase(&p, 4.99), Phase::LflCritical);
        assert_eq!(classify_phase(&p, 5.), Phase::HighRisk);
        assert_eq!(classify_phase(&p, 9.999), Phase::HighRisk);
        assert_eq!(classify_phase(&p, 10.), Phase::Explosion);
        assert_eq!(classify_phase(&p, 100.), Phase::Explosion);
    }

    #[test]
    fn test_leaked_mass_freezes_at_threshold() {
        let p = IncidentParams::new();
        assert_eq!(leaked_mass(&p, 0.), 0.);
        assert!((leaked_mass(&p, 1.) - 48.).abs() < 1e-9);
        assert!((leaked_mass(&p, 10.) - 480.).abs() < 1e-9);
        assert_eq!(leaked_mass(&p, 10.), leaked_mass(&p, 15.));
    }

    #[test]
    fn test_blast_consequence_values() {
        let p = IncidentParams::new();
        let blast = blast_consequence(&p, 480.);
        assert!((blast.combustible_mass_kg - 120.).abs() < 1e-9);
        assert!((blast.tnt_equivalent_kg - 40.).abs() < 1e-9);
        let root = 40_f64.cbrt();
        assert!((blast.radius_400kpa_m - 0.29 * root).abs() < 1e-9);
        assert!((blast.radius_100kpa_m - 0.62 * root).abs() < 1e-9);
        assert!((blast.radius_50kpa_m - 0.98 * root).abs() < 1e-9);
    }

    #[test]
    fn test_explosion_fields_present_iff_exploded() {
        let m = model();
        for t in linspace(0., 15., 151) {
            let s = m.evaluate(t).unwrap();
            assert_eq!(s.is_exploded(), t >= 10., "t = {}", t);
            assert_eq!(s.blast().is_some(), s.is_exploded(), "t = {}", t);
            if let Some(b) = s.blast() {
                assert!(b.radius_50kpa_m > b.radius_100kpa_m);
                assert!(b.radius_100kpa_m > b.radius_400kpa_m);
                assert!(b.radius_400kpa_m > 0.);
            }
        }
    }

    #[test]
    fn test_rejects_invalid_time() {
        let m = model();
        assert!(m.evaluate(-0.1).is_err());
        assert!(m.evaluate(f64::NAN).is_err());
        assert!(m.evaluate(f64::INFINITY).is_err());
    }

    #[test]
    fn test_rejects_invalid_params() {
        let mut params = IncidentParams::new();
        params.blast_scales = [0.98, 0.62, 0.29];
        assert!(PhaseModel::new(params).is_err());
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let m = model();
        for t in [0., 2.7, 9.9, 10., 14.3] {
            assert_eq!(m.evaluate(t).unwrap(), m.evaluate(t).unwrap());
        }
    }
}
