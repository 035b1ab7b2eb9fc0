pub mod bboxes;
pub mod grid;
pub mod point;
pub mod vector;

/// Geometric precision
const EPS: f64 = 1e-10;
