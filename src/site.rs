//! Static facility layout of the tank farm.

use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_4;

use crate::Point;

/// Vertical cylindrical storage tank standing on the ground.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tank {
    /// Centre of the tank base.
    pub base_center: Point,
    pub radius: f64,
    pub height: f64,
    pub label: String,
}

/// Axis-aligned equipment building (BOG compressor room).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentRoom {
    /// Corner `(min x, min y, min z)`.
    pub origin: Point,
    /// Extent along X.
    pub width: f64,
    /// Extent along Y.
    pub depth: f64,
    /// Extent along Z.
    pub height: f64,
    pub label: String,
}

impl EquipmentRoom {
    /// Centre of the floor.
    pub fn floor_center(&self) -> Point {
        self.origin.offset(self.width / 2., self.depth / 2., 0.)
    }

    /// Point above the roof centre, used for labels.
    pub fn roof_center(&self) -> Point {
        self.origin.offset(self.width / 2., self.depth / 2., self.height)
    }

    /// Corners: floor counter-clockwise from `origin`, then roof in the same order.
    pub fn corners(&self) -> [Point; 8] {
        let o = self.origin;
        let (w, d, h) = (self.width, self.depth, self.height);
        [
            o,
            o.offset(w, 0., 0.),
            o.offset(w, d, 0.),
            o.offset(0., d, 0.),
            o.offset(0., 0., h),
            o.offset(w, 0., h),
            o.offset(w, d, h),
            o.offset(0., d, h),
        ]
    }
}

/// Straight pipe run between two points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipe {
    pub name: String,
    pub start: Point,
    pub end: Point,
    pub radius: f64,
}

impl Pipe {
    pub fn new(name: &str, start: Point, end: Point, radius: f64) -> Self {
        Self {
            name: name.to_string(),
            start,
            end,
            radius,
        }
    }
}

/// Flat road strip on the ground.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Road {
    pub name: String,
    pub start: Point,
    pub end: Point,
    pub width: f64,
}

/// Text anchored in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteLabel {
    pub position: Point,
    pub text: String,
}

/// Geometry of the facility. Fixed for the whole run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteLayout {
    /// The ground spans `[-e, e] x [-e, e]` (m).
    pub ground_half_extent: f64,
    pub tank: Tank,
    pub room: EquipmentRoom,
    pub pipes: Vec<Pipe>,
    pub roads: Vec<Road>,
    pub labels: Vec<SiteLabel>,
    /// Release point at the tank bottom pipe.
    pub leak_source: Point,
    /// Low-lying spot where the dense vapor accumulates.
    pub accumulation_center: Point,
    /// Horizontal spread (standard deviation, m) of the accumulation zone.
    pub accumulation_spread: f64,
    /// Ignition point; blast radii are measured from here.
    pub epicenter: Point,
    pub fireball_radius: f64,
}

impl SiteLayout {
    /// Reference layout: one 5 m x 20 m tank, the BOG room to the south-east
    /// and two pipe racks crossing the site north to south.
    pub fn new() -> Self {
        let tank_radius = 5.0;
        let room = EquipmentRoom {
            origin: Point::new(20., -15., 0.),
            width: 12.,
            depth: 10.,
            height: 8.,
            label: "BOG compressor room".to_string(),
        };
        // Low point on the tank side of the room where the vapor pools and ignites
        let hot_spot = room.floor_center().offset(-5., 5., 0.);
        let nozzle = Point::new(
            tank_radius * FRAC_PI_4.cos(),
            tank_radius * FRAC_PI_4.sin(),
            1.5,
        );
        let room_inlet = room.floor_center().offset(-2., 2., 1.5);

        Self {
            ground_half_extent: 70.,
            tank: Tank {
                base_center: Point::origin(),
                radius: tank_radius,
                height: 20.,
                label: "LNG tank T-101".to_string(),
            },
            pipes: vec![
                Pipe::new("tank_to_room", nozzle, room_inlet, 0.7),
                Pipe::new("room_riser", room_inlet, room_inlet.offset(0., 0., 2.5), 0.7),
                Pipe::new("rack_west", Point::new(-30., -70., 2.), Point::new(-30., 70., 2.), 0.4),
                Pipe::new("rack_east", Point::new(30., -70., 2.), Point::new(30., 70., 2.), 0.4),
            ],
            roads: vec![
                Road {
                    name: "south".to_string(),
                    start: Point::new(-70., -50., 0.01),
                    end: Point::new(70., -50., 0.01),
                    width: 4.,
                },
                Road {
                    name: "north".to_string(),
                    start: Point::new(-70., 50., 0.01),
                    end: Point::new(70., 50., 0.01),
                    width: 4.,
                },
            ],
            labels: vec![
                SiteLabel {
                    position: Point::new(-30., 70., 3.),
                    text: "main pipe rack".to_string(),
                },
                SiteLabel {
                    position: Point::new(0., -50., 1.),
                    text: "main road".to_string(),
                },
            ],
            leak_source: Point::new(nozzle.x, nozzle.y, 0.5),
            accumulation_center: hot_spot,
            accumulation_spread: 4.,
            epicenter: hot_spot,
            fireball_radius: 8.,
            room,
        }
    }

    /// Rejects layouts with negative or non-finite dimensions.
    ///
    /// Zero-sized parts are accepted; they are drawn as empty primitives.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.ground_half_extent.is_finite() && self.ground_half_extent > 0.0,
            "ground extent must be positive, got {}",
            self.ground_half_extent
        );
        for (name, value) in [
            ("tank radius", self.tank.radius),
            ("tank height", self.tank.height),
            ("room width", self.room.width),
            ("room depth", self.room.depth),
            ("room height", self.room.height),
            ("accumulation spread", self.accumulation_spread),
            ("fireball radius", self.fireball_radius),
        ] {
            ensure!(
                value.is_finite() && value >= 0.0,
                "{} must be finite and non-negative, got {}",
                name,
                value
            );
        }
        for pipe in &self.pipes {
            ensure!(
                pipe.radius.is_finite() && pipe.radius >= 0.0,
                "pipe {} has invalid radius {}",
                pipe.name,
                pipe.radius
            );
            ensure!(
                pipe.start.is_finite() && pipe.end.is_finite(),
                "pipe {} has non-finite end points",
                pipe.name
            );
        }
        for road in &self.roads {
            ensure!(
                road.width.is_finite() && road.width >= 0.0,
                "road {} has invalid width {}",
                road.name,
                road.width
            );
        }
        for (name, p) in [
            ("tank base", self.tank.base_center),
            ("room origin", self.room.origin),
            ("leak source", self.leak_source),
            ("accumulation centre", self.accumulation_center),
            ("epicenter", self.epicenter),
        ] {
            ensure!(p.is_finite(), "{} must be finite, got {}", name, p);
        }
        Ok(())
    }
}

impl Default for SiteLayout {
    fn default() -> Self {
        Self::new()
    }
}
