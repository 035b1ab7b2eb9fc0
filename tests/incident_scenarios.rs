use anyhow::Result;
use lngsim::{
    DangerLevel, Detail, GeometryBuilder, IncidentParams, Phase, PhaseModel, Playback, SiteLayout,
    Style,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::ops::ControlFlow;

fn model() -> PhaseModel {
    PhaseModel::new(IncidentParams::default()).unwrap()
}

#[test]
fn test_leak_start() -> Result<()> {
    let s = model().evaluate(0.0)?;
    assert_eq!(s.cloud_area_m2(), 0.0);
    assert_eq!(s.leaked_mass_kg(), 0.0);
    assert_eq!(s.phase(), Phase::Incipient);
    assert!(s.blast().is_none());
    Ok(())
}

#[test]
fn test_lfl_critical_at_three_minutes() -> Result<()> {
    let s = model().evaluate(3.0)?;
    assert!((s.cloud_area_m2() - 400.0).abs() < 1e-9);
    assert_eq!(s.phase(), Phase::LflCritical);
    assert_eq!(s.danger_level(), DangerLevel::Medium);
    Ok(())
}

#[test]
fn test_just_before_ignition() -> Result<()> {
    let s = model().evaluate(9.9)?;
    // Linear in the (5, 10] segment: 800 + 4.9 / 5 * 400
    assert!((s.cloud_area_m2() - 1192.0).abs() < 1e-9);
    assert!((s.cloud_area_m2() - 1200.0).abs() / 1200.0 < 0.01);
    assert_eq!(s.phase(), Phase::HighRisk);
    assert_eq!(s.danger_level(), DangerLevel::High);
    assert!(s.blast().is_none());
    Ok(())
}

#[test]
fn test_ignition() -> Result<()> {
    let s = model().evaluate(10.0)?;
    assert_eq!(s.phase(), Phase::Explosion);
    assert_eq!(s.danger_level(), DangerLevel::Catastrophic);
    assert!((s.leaked_mass_kg() - 480.0).abs() < 1e-9);
    let b = s.blast().unwrap();
    assert!((b.combustible_mass_kg - 120.0).abs() < 1e-9);
    assert!((b.tnt_equivalent_kg - 40.0).abs() < 1e-9);
    assert!(b.radius_50kpa_m > b.radius_100kpa_m);
    assert!(b.radius_100kpa_m > b.radius_400kpa_m);
    assert!(b.radius_400kpa_m > 0.0);
    assert!((b.radius_400kpa_m - 0.29 * 40f64.cbrt()).abs() < 1e-12);
    Ok(())
}

#[test]
fn test_mass_frozen_after_ignition() -> Result<()> {
    let m = model();
    let at_10 = m.evaluate(10.0)?;
    let at_15 = m.evaluate(15.0)?;
    assert_eq!(at_15.leaked_mass_kg(), at_10.leaked_mass_kg());
    assert_eq!(at_15.blast(), at_10.blast());
    assert_eq!(at_15.cloud_area_m2(), 1200.0);
    assert_eq!(at_15.cloud_height_m(), 4.0);
    Ok(())
}

#[test]
fn test_invalid_times_are_rejected() {
    let m = model();
    assert!(m.evaluate(-0.1).is_err());
    assert!(m.evaluate(f64::NAN).is_err());
    assert!(m.evaluate(f64::INFINITY).is_err());
}

#[test]
fn test_full_timeline_is_consistent() -> Result<()> {
    let m = model();
    let builder = GeometryBuilder::new(SiteLayout::default(), Style::new(Detail::Draft))?;
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let mut prev_area = 0.0;
    let mut prev_height = 0.0;

    let frames = Playback::linear(0.0, 15.0, 0.1)?.run(|_, t| {
        let s = m.evaluate(t)?;
        assert!(s.cloud_area_m2() >= prev_area);
        assert!(s.cloud_height_m() >= prev_height);
        assert_eq!(s.is_exploded(), s.blast().is_some());
        assert_eq!(s, m.evaluate(t)?);
        prev_area = s.cloud_area_m2();
        prev_height = s.cloud_height_m();

        let scene = builder.build(&s, &mut rng);
        assert_eq!(scene.group("blast/").count(), if s.is_exploded() { 3 } else { 0 });
        if s.is_exploded() {
            assert_eq!(scene.group("cloud/").count(), 0);
        }
        Ok(ControlFlow::Continue(()))
    })?;
    assert_eq!(frames, 151);
    Ok(())
}

#[test]
fn test_playback_stops_at_ignition() -> Result<()> {
    let m = model();
    let pb = Playback::along(&[0.0, 5.0, 15.0], 10)?;
    let mut ignition = None;
    let shown = pb.run(|_, t| {
        if m.evaluate(t)?.is_exploded() {
            ignition = Some(t);
            return Ok(ControlFlow::Break(()));
        }
        Ok(ControlFlow::Continue(()))
    })?;
    assert_eq!(ignition, Some(10.0));
    assert_eq!(shown, 16);
    Ok(())
}
