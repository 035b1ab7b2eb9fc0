//! Structured vertex grids.
//!
//! Every parametric surface in a scene (cylinders, disks, spheres, planes)
//! is sampled on a rectangular `(u, v)` parameter grid. The grid keeps the
//! row/column structure so it can be drawn either as a triangle mesh or as
//! a wireframe of row and column polylines.

use crate::Point;
use crate::geom::bboxes::bounding_box;

/// Type for holding vertex indices for a triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriangleIndex(pub usize, pub usize, pub usize);

/// Row-major `rows x cols` grid of points.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexGrid {
    rows: usize,
    cols: usize,
    points: Vec<Point>,
}

impl VertexGrid {
    /// Grid with no vertices. Used for degenerate shapes.
    pub fn empty() -> Self {
        Self {
            rows: 0,
            cols: 0,
            points: Vec::new(),
        }
    }

    /// Builds a grid by evaluating `f(row, col)` for every node.
    ///
    /// A zero dimension gives an empty grid.
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> Point,
    {
        if rows == 0 || cols == 0 {
            return Self::empty();
        }
        let mut points = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                points.push(f(i, j));
            }
        }
        Self { rows, cols, points }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Point> {
        if row < self.rows && col < self.cols {
            Some(self.points[row * self.cols + col])
        } else {
            None
        }
    }

    /// Splits every grid cell into two triangles.
    ///
    /// Grids with fewer than 2 rows or columns have no cells and give no triangles.
    pub fn triangles(&self) -> Vec<TriangleIndex> {
        if self.rows < 2 || self.cols < 2 {
            return Vec::new();
        }
        let mut tri = Vec::with_capacity(2 * (self.rows - 1) * (self.cols - 1));
        for i in 0..self.rows - 1 {
            for j in 0..self.cols - 1 {
                let a = i * self.cols + j;
                let b = a + 1;
                let c = a + self.cols;
                let d = c + 1;
                tri.push(TriangleIndex(a, b, d));
                tri.push(TriangleIndex(a, d, c));
            }
        }
        tri
    }

    /// Returns every row followed by every column as an open polyline.
    pub fn polylines(&self) -> Vec<Vec<Point>> {
        let mut lines = Vec::with_capacity(self.rows + self.cols);
        for i in 0..self.rows {
            lines.push(self.points[i * self.cols..(i + 1) * self.cols].to_vec());
        }
        for j in 0..self.cols {
            lines.push((0..self.rows).map(|i| self.points[i * self.cols + j]).collect());
        }
        lines
    }

    pub fn bounds(&self) -> Option<(Point, Point)> {
        bounding_box(&self.points)
    }
}
