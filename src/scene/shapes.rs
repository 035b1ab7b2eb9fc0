//! Parametric shape generators.
//!
//! All generators return plain vertex grids. Degenerate input (zero or
//! non-finite radius, zero-length axis, fewer than 2 samples) gives an empty
//! grid instead of an error.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::geom::grid::VertexGrid;
use crate::site::EquipmentRoom;
use crate::vecutils::linspace;
use crate::{Point, Vector};

/// Quad faces of a box whose corners follow [`EquipmentRoom::corners`] order.
pub const BOX_QUADS: [[usize; 4]; 6] = [
    [0, 1, 2, 3], // floor
    [4, 5, 6, 7], // roof
    [0, 1, 5, 4], // south
    [1, 2, 6, 5], // east
    [2, 3, 7, 6], // north
    [3, 0, 4, 7], // west
];

fn is_valid_size(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

/// Square ground plane `[-e, e] x [-e, e]` at `z = 0`.
pub fn ground_plane(half_extent: f64, samples: usize) -> VertexGrid {
    if !is_valid_size(half_extent) || samples < 2 {
        return VertexGrid::empty();
    }
    let xs = linspace(-half_extent, half_extent, samples);
    VertexGrid::from_fn(samples, samples, |i, j| Point::new(xs[j], xs[i], 0.))
}

/// Flat strip of width `width` centred on the segment `start -> end`.
///
/// The strip lies in the horizontal plane of `start`.
pub fn road_strip(start: Point, end: Point, width: f64) -> VertexGrid {
    let along = Vector::new(end.x - start.x, end.y - start.y, 0.);
    let Some(dir) = along.normalize() else {
        return VertexGrid::empty();
    };
    if !is_valid_size(width) {
        return VertexGrid::empty();
    }
    let half = Vector::new(-dir.dy, dir.dx, 0.) * (width / 2.);
    let ends = [start, Point::new(end.x, end.y, start.z)];
    let sides = [-half, half];
    VertexGrid::from_fn(2, 2, |i, j| ends[i] + sides[j])
}

/// Side wall of a vertical cylinder.
///
/// Rows sweep the height `[0, height]`, columns the angle `[0, 2 pi]`.
pub fn cylinder_wall(
    base_center: Point,
    radius: f64,
    height: f64,
    segments: usize,
    height_samples: usize,
) -> VertexGrid {
    if !is_valid_size(radius) || !is_valid_size(height) || segments < 2 || height_samples < 2 {
        return VertexGrid::empty();
    }
    let theta = linspace(0., TAU, segments);
    let z = linspace(0., height, height_samples);
    VertexGrid::from_fn(height_samples, segments, |i, j| {
        base_center.offset(radius * theta[j].cos(), radius * theta[j].sin(), z[i])
    })
}

/// Horizontal disk centred on `center`.
///
/// Parameterised by radius (rows, `[0, radius]`) and angle (columns), so the
/// cap triangles fan out from the centre instead of collapsing onto the rim.
pub fn disk(center: Point, radius: f64, radial_samples: usize, segments: usize) -> VertexGrid {
    if !is_valid_size(radius) || radial_samples < 2 || segments < 2 {
        return VertexGrid::empty();
    }
    let r = linspace(0., radius, radial_samples);
    let theta = linspace(0., TAU, segments);
    VertexGrid::from_fn(radial_samples, segments, |i, j| {
        center.offset(r[i] * theta[j].cos(), r[i] * theta[j].sin(), 0.)
    })
}

/// Corners and quad faces of the equipment room.
///
/// A room with any zero dimension gives no geometry.
pub fn room_box(room: &EquipmentRoom) -> (Vec<Point>, Vec<[usize; 4]>) {
    if !is_valid_size(room.width) || !is_valid_size(room.depth) || !is_valid_size(room.height) {
        return (Vec::new(), Vec::new());
    }
    (room.corners().to_vec(), BOX_QUADS.to_vec())
}

/// Cylinder of radius `radius` around the segment `p0 -> p1`.
///
/// Rows are the two end rings, columns sweep the angle. Returns an empty grid
/// when `p0 == p1` or the radius is not positive.
pub fn cylinder_between(p0: Point, p1: Point, radius: f64, segments: usize) -> VertexGrid {
    if !is_valid_size(radius) || segments < 2 {
        return VertexGrid::empty();
    }
    let axis = Vector::from_points(p0, p1);
    let length = axis.length();
    let Some(v) = axis.normalize() else {
        return VertexGrid::empty();
    };

    // Any reference not parallel to the axis gives a valid normal
    let mut reference = Vector::new(1., 0., 0.);
    if v.is_parallel(&reference) {
        reference = Vector::new(0., 1., 0.);
    }
    let Some(n1) = v.cross(reference).normalize() else {
        return VertexGrid::empty();
    };
    let n2 = v.cross(n1);

    let t = [0., length];
    let theta = linspace(0., TAU, segments);
    VertexGrid::from_fn(2, segments, |i, j| {
        p0 + v * t[i] + (n1 * theta[j].cos() + n2 * theta[j].sin()) * radius
    })
}

/// Upper half of a sphere standing on the ground plane of `center`.
///
/// Rows sweep the azimuth `[0, 2 pi]`, columns the angle from the zenith `[0, pi/2]`.
pub fn hemisphere(center: Point, radius: f64, azimuth_samples: usize, polar_samples: usize) -> VertexGrid {
    spherical_grid(center, radius, azimuth_samples, polar_samples, FRAC_PI_2)
}

/// Full sphere. Rows sweep the azimuth, columns the angle from the zenith `[0, pi]`.
pub fn sphere(center: Point, radius: f64, azimuth_samples: usize, polar_samples: usize) -> VertexGrid {
    spherical_grid(center, radius, azimuth_samples, polar_samples, PI)
}

fn spherical_grid(
    center: Point,
    radius: f64,
    azimuth_samples: usize,
    polar_samples: usize,
    max_polar: f64,
) -> VertexGrid {
    if !is_valid_size(radius) || azimuth_samples < 2 || polar_samples < 2 {
        return VertexGrid::empty();
    }
    let u = linspace(0., TAU, azimuth_samples);
    let v = linspace(0., max_polar, polar_samples);
    VertexGrid::from_fn(azimuth_samples, polar_samples, |i, j| {
        center.offset(
            radius * u[i].cos() * v[j].sin(),
            radius * u[i].sin() * v[j].sin(),
            radius * v[j].cos(),
        )
    })
}
