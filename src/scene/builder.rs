//! Turns a physical state into drawable primitives.

use std::f64::consts::PI;

use anyhow::Result;
use rand::Rng;
use tracing::{debug, warn};

use super::cloud::{Band, MarkerSize, flatten, sample_band};
use super::primitive::{GeometryPrimitive, Rgba, Scene};
use super::shapes;
use super::style::Style;
use crate::Point;
use crate::geom::bboxes::is_point_inside_bbox;
use crate::sim::state::{BlastConsequence, PhysicalState};
use crate::site::SiteLayout;

const GROUND: Rgba = (0.56, 0.74, 0.56, 0.3);
const ROAD: Rgba = (0.2, 0.2, 0.2, 1.0);
const TANK: Rgba = (0.83, 0.83, 0.83, 0.8);
const TANK_CAP: Rgba = (0.75, 0.75, 0.75, 0.9);
const ROOM: Rgba = (0.5, 0.5, 0.5, 0.6);
const PIPE: Rgba = (0.66, 0.66, 0.66, 1.0);
const LABEL: Rgba = (1.0, 1.0, 1.0, 1.0);
const CLOUD_HALO: Rgba = (0.68, 0.85, 0.9, 1.0);
const CLOUD_MID: Rgba = (0.0, 0.75, 1.0, 1.0);
const CLOUD_CORE: Rgba = (0.0, 0.0, 0.55, 1.0);
const RING_COLORS: [Rgba; 3] = [
    (0.55, 0.0, 0.0, 0.3),
    (1.0, 0.27, 0.0, 0.2),
    (1.0, 0.84, 0.0, 0.1),
];
const FIREBALL: Rgba = (1.0, 1.0, 0.0, 0.9);
const FIREBALL_SHELL: Rgba = (1.0, 0.0, 0.0, 0.3);
const FIRE: Rgba = (1.0, 0.0, 0.0, 1.0);
const FIRE_LOW: Rgba = (1.0, 0.65, 0.0, 1.0);
const SMOKE: Rgba = (0.3, 0.3, 0.3, 1.0);
const EPICENTER: Rgba = (1.0, 1.0, 0.0, 1.0);
const DAMAGE: Rgba = (1.0, 0.0, 0.0, 1.0);

/// Clouds smaller than this (m2) are not drawn.
const MIN_CLOUD_AREA: f64 = 1.0;
const CLOUD_BASE_FACTOR: f64 = 0.9;
/// Lowest sampled cloud point (m).
const CLOUD_FLOOR: f64 = 0.1;
/// Ceiling of the dense accumulation layer (m).
const ACCUMULATION_CEILING: f64 = 2.5;
/// Upper bound on the points of one cloud band.
const MAX_CLOUD_POINTS: usize = 200_000;

const FIRE_SPREAD: f64 = 5.0;
const FIRE_CEILING: f64 = 10.0;
const SMOKE_SPREAD: f64 = 10.0;
const SMOKE_CEILING: f64 = 20.0;
/// The outer shell is this much larger than the fireball core.
const SHELL_SCALE: f64 = 1.25;

/// Builds the scene for one instant from the fixed site and a style.
#[derive(Debug, Clone)]
pub struct GeometryBuilder {
    layout: SiteLayout,
    style: Style,
}

impl GeometryBuilder {
    pub fn new(layout: SiteLayout, style: Style) -> Result<Self> {
        layout.validate()?;
        style.validate()?;
        let e = layout.ground_half_extent;
        let (gmin, gmax) = (Point::new(-e, -e, f64::MIN), Point::new(e, e, f64::MAX));
        for (name, p) in [("leak source", layout.leak_source), ("epicenter", layout.epicenter)] {
            if !is_point_inside_bbox(p, gmin, gmax) {
                warn!(%p, "{} lies outside the ground plane", name);
            }
        }
        Ok(Self { layout, style })
    }

    pub fn layout(&self) -> &SiteLayout {
        &self.layout
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Builds static facility geometry followed by the phase-dependent part.
    ///
    /// All randomness comes from `rng`; a seeded generator gives identical scenes.
    pub fn build<R: Rng + ?Sized>(&self, state: &PhysicalState, rng: &mut R) -> Scene {
        let mut primitives = self.facility();

        let caption = match state.blast() {
            Some(blast) => {
                primitives.extend(self.explosion(blast, rng));
                format!("Explosion consequence (T={:.1} min)", state.time_min())
            }
            None => {
                primitives.extend(self.dispersion(state, rng));
                format!(
                    "Leak dispersion (T={:.1} min) | cloud height {:.1} m",
                    state.time_min(),
                    state.cloud_height_m()
                )
            }
        };

        for p in primitives.iter().filter(|p| p.is_empty()) {
            warn!(name = p.name(), "degenerate geometry, nothing to draw");
        }
        debug!(
            t_min = state.time_min(),
            primitives = primitives.len(),
            "scene built"
        );

        Scene::new(state.clone(), caption, primitives)
    }

    fn facility(&self) -> Vec<GeometryPrimitive> {
        let s = &self.style;
        let site = &self.layout;
        let mut out = vec![GeometryPrimitive::Surface {
            name: "ground".to_string(),
            grid: shapes::ground_plane(site.ground_half_extent, s.ground_samples),
            color: GROUND,
        }];

        for road in &site.roads {
            out.push(GeometryPrimitive::Surface {
                name: format!("road/{}", road.name),
                grid: shapes::road_strip(road.start, road.end, road.width),
                color: ROAD,
            });
        }

        let tank = &site.tank;
        out.push(GeometryPrimitive::Surface {
            name: "tank/wall".to_string(),
            grid: shapes::cylinder_wall(
                tank.base_center,
                tank.radius,
                tank.height,
                s.tank_segments,
                s.tank_height_samples,
            ),
            color: TANK,
        });
        out.push(GeometryPrimitive::Surface {
            name: "tank/cap".to_string(),
            grid: shapes::disk(
                tank.base_center.offset(0., 0., tank.height),
                tank.radius,
                s.cap_radial_samples,
                s.tank_segments,
            ),
            color: TANK_CAP,
        });

        let (vertices, quads) = shapes::room_box(&site.room);
        out.push(GeometryPrimitive::Polyhedron {
            name: "room".to_string(),
            vertices,
            quads,
            color: ROOM,
        });

        for pipe in &site.pipes {
            out.push(GeometryPrimitive::Surface {
                name: format!("pipe/{}", pipe.name),
                grid: shapes::cylinder_between(pipe.start, pipe.end, pipe.radius, s.pipe_segments),
                color: PIPE,
            });
        }

        out.push(label(
            "label/tank",
            tank.base_center.offset(0., 0., tank.height + 2.),
            &tank.label,
        ));
        out.push(label(
            "label/room",
            site.room.roof_center().offset(0., 0., 2.),
            &site.room.label,
        ));
        for (i, l) in site.labels.iter().enumerate() {
            out.push(label(&format!("label/site/{}", i), l.position, &l.text));
        }
        out
    }

    fn dispersion<R: Rng + ?Sized>(
        &self,
        state: &PhysicalState,
        rng: &mut R,
    ) -> Vec<GeometryPrimitive> {
        let area = state.cloud_area_m2();
        if area <= MIN_CLOUD_AREA {
            return Vec::new();
        }
        let height = state.cloud_height_m();
        let r = CLOUD_BASE_FACTOR * (area / PI).sqrt();
        let budget = area * self.style.cloud_points_per_m2;
        let n = if budget < MAX_CLOUD_POINTS as f64 {
            budget as usize
        } else {
            warn!(budget, "cloud point budget capped at {}", MAX_CLOUD_POINTS);
            MAX_CLOUD_POINTS
        };
        let src = self.layout.leak_source;

        let mut bands = vec![(
            "cloud/halo",
            CLOUD_HALO,
            Band {
                center: Point::new(src.x + 0.5 * r, src.y + 0.5 * r, 0.),
                spread: r,
                z_range: (CLOUD_FLOOR, 0.9 * height),
                count: n,
                size: MarkerSize::Fixed(15.),
                opacity: 0.1,
            },
        )];
        if self.style.cloud_mid_band {
            bands.push((
                "cloud/mid",
                CLOUD_MID,
                Band {
                    center: Point::new(src.x + 0.3 * r, src.y + 0.3 * r, 0.),
                    spread: 0.7 * r,
                    z_range: (CLOUD_FLOOR, 0.6 * height),
                    count: n / 2,
                    size: MarkerSize::Fixed(20.),
                    opacity: 0.2,
                },
            ));
        }
        bands.push((
            "cloud/accumulation",
            CLOUD_CORE,
            Band {
                center: self.layout.accumulation_center,
                spread: self.layout.accumulation_spread,
                z_range: (CLOUD_FLOOR, ACCUMULATION_CEILING.min(height)),
                count: n / 5,
                size: MarkerSize::Fixed(30.),
                opacity: 0.7,
            },
        ));

        bands
            .into_iter()
            .map(|(name, color, band)| GeometryPrimitive::PointCloud {
                name: name.to_string(),
                points: sample_band(rng, &band),
                color,
            })
            .collect()
    }

    fn explosion<R: Rng + ?Sized>(
        &self,
        blast: &BlastConsequence,
        rng: &mut R,
    ) -> Vec<GeometryPrimitive> {
        let s = &self.style;
        let center = self.layout.epicenter;
        let (az, polar) = s.hemisphere_samples;
        let mut out = Vec::new();

        for ((kpa, radius), color) in blast.rings().into_iter().zip(RING_COLORS) {
            out.push(GeometryPrimitive::Wireframe {
                name: format!("blast/{}kPa", kpa),
                grid: shapes::hemisphere(center, radius, az, polar),
                color,
                label: Some(format!("{} kPa: {:.2} m", kpa, radius)),
            });
        }

        let fr = self.layout.fireball_radius;
        let fireball_center = center.offset(0., 0., fr);
        let (faz, fpolar) = s.fireball_samples;
        out.push(GeometryPrimitive::Surface {
            name: "fireball".to_string(),
            grid: shapes::sphere(fireball_center, fr, faz, fpolar),
            color: FIREBALL,
        });
        out.push(GeometryPrimitive::Surface {
            name: "fireball/shell".to_string(),
            grid: shapes::sphere(fireball_center, fr * SHELL_SCALE, faz, fpolar),
            color: FIREBALL_SHELL,
        });

        let fire = sample_band(
            rng,
            &Band {
                center,
                spread: FIRE_SPREAD,
                z_range: (CLOUD_FLOOR, FIRE_CEILING),
                count: s.fire_points,
                size: MarkerSize::Uniform(50., 300.),
                opacity: 0.6,
            },
        );
        let fire_low = flatten(rng, &fire, 0.5, MarkerSize::Uniform(30., 200.), 0.8);
        let smoke = sample_band(
            rng,
            &Band {
                center,
                spread: SMOKE_SPREAD,
                z_range: (CLOUD_FLOOR, SMOKE_CEILING),
                count: s.smoke_points,
                size: MarkerSize::Uniform(10., 100.),
                opacity: 0.2,
            },
        );
        out.push(GeometryPrimitive::PointCloud {
            name: "fire/primary".to_string(),
            points: fire,
            color: FIRE,
        });
        out.push(GeometryPrimitive::PointCloud {
            name: "fire/secondary".to_string(),
            points: fire_low,
            color: FIRE_LOW,
        });
        out.push(GeometryPrimitive::PointCloud {
            name: "smoke".to_string(),
            points: smoke,
            color: SMOKE,
        });

        out.push(GeometryPrimitive::Marker {
            name: "epicenter".to_string(),
            position: center,
            label: "ignition point".to_string(),
            color: EPICENTER,
        });
        out.push(GeometryPrimitive::Marker {
            name: "room/damage".to_string(),
            position: self.layout.room.roof_center().offset(0., 0., 5.),
            label: format!(
                "{} destroyed ({:.1} m from ignition)",
                self.layout.room.label,
                self.layout.room.floor_center().horizontal_distance(&center)
            ),
            color: DAMAGE,
        });
        out
    }
}

fn label(name: &str, position: Point, text: &str) -> GeometryPrimitive {
    GeometryPrimitive::Marker {
        name: name.to_string(),
        position,
        label: text.to_string(),
        color: LABEL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::style::Detail;
    use crate::sim::config::IncidentParams;
    use crate::sim::phase::PhaseModel;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn model() -> PhaseModel {
        PhaseModel::new(IncidentParams::default()).unwrap()
    }

    fn builder(detail: Detail) -> GeometryBuilder {
        GeometryBuilder::new(SiteLayout::default(), Style::new(detail)).unwrap()
    }

    fn cloud_len(scene: &Scene, name: &str) -> usize {
        match scene.get(name) {
            Some(GeometryPrimitive::PointCloud { points, .. }) => points.len(),
            _ => 0,
        }
    }

    #[test]
    fn test_facility_always_present() {
        let b = builder(Detail::Standard);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        for t in [0.0, 4.0, 12.0] {
            let scene = b.build(&model().evaluate(t).unwrap(), &mut rng);
            for name in ["ground", "tank/wall", "tank/cap", "room", "label/tank", "label/room"] {
                assert!(scene.get(name).is_some(), "missing {} at t={}", name, t);
            }
            assert_eq!(scene.group("pipe/").count(), 4);
            assert_eq!(scene.group("road/").count(), 2);
        }
    }

    #[test]
    fn test_no_cloud_at_start() {
        let b = builder(Detail::Standard);
        let scene = b.build(&model().evaluate(0.0).unwrap(), &mut ChaCha8Rng::seed_from_u64(1));
        assert_eq!(scene.group("cloud/").count(), 0);
        assert_eq!(scene.group("blast/").count(), 0);
        assert!(scene.caption().contains("T=0.0 min"));
    }

    #[test]
    fn test_cloud_point_budget() {
        let b = builder(Detail::Standard);
        let scene = b.build(&model().evaluate(3.0).unwrap(), &mut ChaCha8Rng::seed_from_u64(2));
        // 400 m2 at 2 points per m2
        assert_eq!(cloud_len(&scene, "cloud/halo"), 800);
        assert_eq!(cloud_len(&scene, "cloud/accumulation"), 160);
        assert!(scene.get("cloud/mid").is_none());

        let refined = builder(Detail::Refined);
        let scene = refined.build(&model().evaluate(3.0).unwrap(), &mut ChaCha8Rng::seed_from_u64(2));
        assert_eq!(cloud_len(&scene, "cloud/halo"), 1200);
        assert_eq!(cloud_len(&scene, "cloud/mid"), 600);
        assert_eq!(cloud_len(&scene, "cloud/accumulation"), 240);
    }

    #[test]
    fn test_cloud_stays_below_cloud_height() {
        let b = builder(Detail::Refined);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for t in [1.5, 3.0, 7.0, 9.9] {
            let state = model().evaluate(t).unwrap();
            let scene = b.build(&state, &mut rng);
            for p in scene.group("cloud/") {
                let (pmin, pmax) = p.bounds().unwrap();
                assert!(pmin.z >= 0.1);
                assert!(pmax.z <= state.cloud_height_m());
            }
        }
    }

    #[test]
    fn test_explosion_content() {
        let b = builder(Detail::Standard);
        let state = model().evaluate(10.0).unwrap();
        let scene = b.build(&state, &mut ChaCha8Rng::seed_from_u64(4));
        assert_eq!(scene.group("cloud/").count(), 0);
        assert_eq!(scene.group("blast/").count(), 3);

        let Some(GeometryPrimitive::Wireframe { label, grid, .. }) = scene.get("blast/400kPa") else {
            panic!("missing 400 kPa ring");
        };
        let blast = state.blast().unwrap();
        assert_eq!(
            label.as_deref(),
            Some(format!("400 kPa: {:.2} m", blast.radius_400kpa_m).as_str())
        );
        let (pmin, pmax) = grid.bounds().unwrap();
        assert!((pmax.z - blast.radius_400kpa_m).abs() < 1e-9);
        assert!(pmin.z > -1e-9);

        let (fmin, fmax) = scene.get("fireball").unwrap().bounds().unwrap();
        assert!(fmin.z.abs() < 1e-9);
        assert!((fmax.z - 16.).abs() < 1e-9);

        assert_eq!(cloud_len(&scene, "fire/primary"), 200);
        assert_eq!(cloud_len(&scene, "fire/secondary"), 200);
        assert_eq!(cloud_len(&scene, "smoke"), 300);
        let (_, smoke_max) = scene.get("smoke").unwrap().bounds().unwrap();
        assert!(smoke_max.z <= 20.);
        assert!(scene.get("epicenter").is_some());
        assert!(scene.get("room/damage").is_some());
        assert!(scene.caption().starts_with("Explosion"));
    }

    #[test]
    fn test_seeded_builds_are_identical() {
        let b = builder(Detail::Standard);
        let state = model().evaluate(6.0).unwrap();
        let a = b.build(&state, &mut ChaCha8Rng::seed_from_u64(99));
        let c = b.build(&state, &mut ChaCha8Rng::seed_from_u64(99));
        assert_eq!(a.primitives(), c.primitives());
    }

    #[test]
    fn test_zero_length_pipe_is_empty() {
        let mut layout = SiteLayout::default();
        layout.pipes[1].end = layout.pipes[1].start;
        let b = GeometryBuilder::new(layout, Style::default()).unwrap();
        let scene = b.build(&model().evaluate(2.0).unwrap(), &mut ChaCha8Rng::seed_from_u64(5));
        assert!(scene.get("pipe/room_riser").unwrap().is_empty());
        assert!(!scene.get("pipe/tank_to_room").unwrap().is_empty());
    }

    #[test]
    fn test_cloud_budget_is_capped() {
        let mut style = Style::new(Detail::Refined);
        style.cloud_points_per_m2 = 1e12;
        let b = GeometryBuilder::new(SiteLayout::default(), style).unwrap();
        let scene = b.build(&model().evaluate(3.0).unwrap(), &mut ChaCha8Rng::seed_from_u64(8));
        assert_eq!(cloud_len(&scene, "cloud/halo"), MAX_CLOUD_POINTS);
        assert_eq!(cloud_len(&scene, "cloud/mid"), MAX_CLOUD_POINTS / 2);
    }

    #[test]
    fn test_rejects_invalid_layout() {
        let mut layout = SiteLayout::default();
        layout.fireball_radius = -1.;
        assert!(GeometryBuilder::new(layout, Style::default()).is_err());
    }

    #[test]
    fn test_every_tenth_minute_builds() {
        let b = builder(Detail::Draft);
        let m = model();
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        for i in 0..=150 {
            let t = i as f64 / 10.;
            let scene = b.build(&m.evaluate(t).unwrap(), &mut rng);
            assert!(!scene.is_empty());
        }
    }
}
