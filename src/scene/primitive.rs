use crate::Point;
use crate::geom::bboxes::bounding_box;
use crate::geom::grid::VertexGrid;
use crate::sim::state::PhysicalState;

/// RGBA color tuple (red, green, blue, alpha) with values in 0.0..=1.0.
pub type Rgba = (f32, f32, f32, f32);

/// One point of a scatter cloud with its own marker size and opacity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloudPoint {
    pub position: Point,
    /// Marker area in screen points squared.
    pub size: f32,
    pub opacity: f32,
}

/// Drawable element of a scene. Carries no physics.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryPrimitive {
    /// Filled parametric surface.
    Surface {
        name: String,
        grid: VertexGrid,
        color: Rgba,
    },
    /// Parametric surface drawn as row and column lines only.
    Wireframe {
        name: String,
        grid: VertexGrid,
        color: Rgba,
        label: Option<String>,
    },
    /// Closed body made of quadrilateral faces.
    Polyhedron {
        name: String,
        vertices: Vec<Point>,
        quads: Vec<[usize; 4]>,
        color: Rgba,
    },
    PointCloud {
        name: String,
        points: Vec<CloudPoint>,
        color: Rgba,
    },
    /// Labelled point.
    Marker {
        name: String,
        position: Point,
        label: String,
        color: Rgba,
    },
}

impl GeometryPrimitive {
    pub fn name(&self) -> &str {
        match self {
            GeometryPrimitive::Surface { name, .. }
            | GeometryPrimitive::Wireframe { name, .. }
            | GeometryPrimitive::Polyhedron { name, .. }
            | GeometryPrimitive::PointCloud { name, .. }
            | GeometryPrimitive::Marker { name, .. } => name,
        }
    }

    pub fn color(&self) -> Rgba {
        match self {
            GeometryPrimitive::Surface { color, .. }
            | GeometryPrimitive::Wireframe { color, .. }
            | GeometryPrimitive::Polyhedron { color, .. }
            | GeometryPrimitive::PointCloud { color, .. }
            | GeometryPrimitive::Marker { color, .. } => *color,
        }
    }

    /// All positions held by the primitive.
    pub fn positions(&self) -> Vec<Point> {
        match self {
            GeometryPrimitive::Surface { grid, .. } | GeometryPrimitive::Wireframe { grid, .. } => {
                grid.points().to_vec()
            }
            GeometryPrimitive::Polyhedron { vertices, .. } => vertices.clone(),
            GeometryPrimitive::PointCloud { points, .. } => {
                points.iter().map(|p| p.position).collect()
            }
            GeometryPrimitive::Marker { position, .. } => vec![*position],
        }
    }

    /// True for primitives with nothing to draw (degenerate geometry).
    pub fn is_empty(&self) -> bool {
        match self {
            GeometryPrimitive::Surface { grid, .. } | GeometryPrimitive::Wireframe { grid, .. } => {
                grid.is_empty()
            }
            GeometryPrimitive::Polyhedron { vertices, .. } => vertices.is_empty(),
            GeometryPrimitive::PointCloud { points, .. } => points.is_empty(),
            GeometryPrimitive::Marker { .. } => false,
        }
    }

    pub fn bounds(&self) -> Option<(Point, Point)> {
        bounding_box(&self.positions())
    }
}

/// Ordered primitives for one instant, with the state they were built from.
#[derive(Debug, Clone)]
pub struct Scene {
    state: PhysicalState,
    caption: String,
    primitives: Vec<GeometryPrimitive>,
}

impl Scene {
    pub fn new(state: PhysicalState, caption: String, primitives: Vec<GeometryPrimitive>) -> Self {
        Self {
            state,
            caption,
            primitives,
        }
    }

    pub fn state(&self) -> &PhysicalState {
        &self.state
    }

    pub fn time_min(&self) -> f64 {
        self.state.time_min()
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn primitives(&self) -> &[GeometryPrimitive] {
        &self.primitives
    }

    /// First primitive with the given name.
    pub fn get(&self, name: &str) -> Option<&GeometryPrimitive> {
        self.primitives.iter().find(|p| p.name() == name)
    }

    /// Primitives whose name starts with `prefix`.
    pub fn group<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a GeometryPrimitive> + 'a {
        self.primitives
            .iter()
            .filter(move |p| p.name().starts_with(prefix))
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}
