use std::ops::ControlFlow;

use anyhow::Result;
use rand::Rng;
use rerun as rr;

use super::config::RerunConfig;
use crate::Point;
use crate::geom::grid::{TriangleIndex, VertexGrid};
use crate::scene::{GeometryBuilder, GeometryPrimitive, Rgba, Scene};
use crate::sim::phase::PhaseModel;
use crate::sim::playback::Playback;
use crate::sim::state::PhysicalState;

/// Converts Point to native format of Rerun
impl From<Point> for rr::Vec3D {
    fn from(val: Point) -> Self {
        rr::Vec3D([val.x as f32, val.y as f32, val.z as f32])
    }
}

/// Converts TriangleIndex to native format of Rerun
impl From<TriangleIndex> for rr::TriangleIndices {
    fn from(val: TriangleIndex) -> Self {
        rr::TriangleIndices(rr::datatypes::UVec3D([
            val.0 as u32,
            val.1 as u32,
            val.2 as u32,
        ]))
    }
}

fn color(rgba: Rgba) -> rr::Color {
    let (r, g, b, a) = rgba;
    rr::Color(rr::Rgba32::from_linear_unmultiplied_rgba_f32(r, g, b, a))
}

fn albedo(rgba: Rgba) -> rr::Rgba32 {
    let (r, g, b, a) = rgba;
    rr::Rgba32::from_linear_unmultiplied_rgba_f32(r, g, b, a)
}

fn positions(pts: &[Point]) -> Vec<rr::Vec3D> {
    pts.iter().map(|p| rr::Vec3D::from(*p)).collect()
}

/// Highest vertex of a grid, where a surface label is placed.
fn label_anchor(grid: &VertexGrid) -> Option<Point> {
    grid.points()
        .iter()
        .copied()
        .max_by(|a, b| a.z.total_cmp(&b.z))
}

/// Spawns a viewer and connects to it.
pub fn start_session(config: &RerunConfig) -> Result<rr::RecordingStream> {
    let session = rr::RecordingStreamBuilder::new(config.session_name.as_str()).spawn()?;
    Ok(session)
}

/// Logs all primitives of `scene` under the scene prefix.
///
/// The previous frame is cleared first so primitives that disappear between
/// phases (the cloud after ignition) do not linger.
pub fn draw_scene(session: &rr::RecordingStream, scene: &Scene, config: &RerunConfig) -> Result<()> {
    let prefix = config.scene_prefix();
    session.log(prefix.as_str(), &rr::Clear::recursive())?;

    for primitive in scene.primitives() {
        if primitive.is_empty() {
            continue;
        }
        let path = format!("{}/{}", prefix, primitive.name());
        match primitive {
            GeometryPrimitive::Surface { grid, color: rgba, .. } => {
                session.log(
                    path,
                    &rr::Mesh3D::new(positions(grid.points()))
                        .with_triangle_indices(grid.triangles())
                        .with_albedo_factor(albedo(*rgba)),
                )?;
            }
            GeometryPrimitive::Polyhedron {
                vertices,
                quads,
                color: rgba,
                ..
            } => {
                let triangles: Vec<TriangleIndex> = quads
                    .iter()
                    .flat_map(|&[a, b, c, d]| [TriangleIndex(a, b, c), TriangleIndex(a, c, d)])
                    .collect();
                session.log(
                    path,
                    &rr::Mesh3D::new(positions(vertices))
                        .with_triangle_indices(triangles)
                        .with_albedo_factor(albedo(*rgba)),
                )?;
            }
            GeometryPrimitive::Wireframe {
                grid,
                color: rgba,
                label,
                ..
            } => {
                let lines: Vec<Vec<rr::Vec3D>> = grid
                    .polylines()
                    .into_iter()
                    .map(|line| line.into_iter().map(rr::Vec3D::from).collect())
                    .collect();
                session.log(
                    path.as_str(),
                    &rr::LineStrips3D::new(lines)
                        .with_radii([config.wire_radius])
                        .with_colors([color(*rgba)]),
                )?;
                // One label for the whole surface, not one per strip
                if let (Some(label), Some(anchor)) = (label, label_anchor(grid)) {
                    session.log(
                        format!("{}/label", path),
                        &rr::Points3D::new([rr::Vec3D::from(anchor)])
                            .with_radii([config.wire_radius])
                            .with_colors([color(*rgba)])
                            .with_labels([label.as_str()]),
                    )?;
                }
            }
            GeometryPrimitive::PointCloud {
                points, color: rgba, ..
            } => {
                let (r, g, b, _) = *rgba;
                let centers: Vec<rr::Vec3D> =
                    points.iter().map(|p| rr::Vec3D::from(p.position)).collect();
                let radii: Vec<f32> = points
                    .iter()
                    .map(|p| p.size.max(0.0).sqrt() * config.point_radius_scale)
                    .collect();
                let colors: Vec<rr::Color> =
                    points.iter().map(|p| color((r, g, b, p.opacity))).collect();
                session.log(
                    path,
                    &rr::Points3D::new(centers)
                        .with_radii(radii)
                        .with_colors(colors),
                )?;
            }
            GeometryPrimitive::Marker {
                position,
                label,
                color: rgba,
                ..
            } => {
                session.log(
                    path,
                    &rr::Points3D::new([rr::Vec3D::from(*position)])
                        .with_radii([config.marker_radius])
                        .with_colors([color(*rgba)])
                        .with_labels([label.as_str()]),
                )?;
            }
        }
    }

    session.log(
        format!("{}/caption", config.entity_prefix),
        &rr::TextDocument::new(format!("{}\n\n{}", scene.caption(), scene.state().status())),
    )?;
    Ok(())
}

/// Logs the scalar time series of one state.
pub fn draw_metrics(
    session: &rr::RecordingStream,
    state: &PhysicalState,
    config: &RerunConfig,
) -> Result<()> {
    let prefix = config.metrics_prefix();
    session.log(
        format!("{}/leaked_mass_kg", prefix),
        &rr::Scalars::single(state.leaked_mass_kg()),
    )?;
    session.log(
        format!("{}/cloud_area_m2", prefix),
        &rr::Scalars::single(state.cloud_area_m2()),
    )?;
    session.log(
        format!("{}/cloud_height_m", prefix),
        &rr::Scalars::single(state.cloud_height_m()),
    )?;
    if let Some(blast) = state.blast() {
        for (kpa, radius) in blast.rings() {
            session.log(
                format!("{}/blast_radius_m/{}kPa", prefix, kpa),
                &rr::Scalars::single(radius),
            )?;
        }
    }
    Ok(())
}

/// Plays `playback` into the session, one timeline step per frame.
///
/// Returns the number of frames drawn.
pub fn animate<R: Rng + ?Sized>(
    session: &rr::RecordingStream,
    model: &PhaseModel,
    builder: &GeometryBuilder,
    playback: &Playback,
    rng: &mut R,
    config: &RerunConfig,
) -> Result<usize> {
    playback.run(|frame, t| {
        session.set_time_sequence(config.timeline.as_str(), frame as i64);
        let state = model.evaluate(t)?;
        let scene = builder.build(&state, rng);
        draw_scene(session, &scene, config)?;
        draw_metrics(session, &state, config)?;
        Ok(ControlFlow::Continue(()))
    })
}
