use crate::geom::EPS;
use crate::geom::point::Point;

/// Returns `(min, max)` corners of the box holding all points `pts`.
///
/// Returns `None` for an empty slice.
pub fn bounding_box(pts: &[Point]) -> Option<(Point, Point)> {
    let first = pts.first()?;
    let init = (*first, *first);
    let bbox = pts.iter().skip(1).fold(init, |(pmin, pmax), p| {
        (
            Point::new(pmin.x.min(p.x), pmin.y.min(p.y), pmin.z.min(p.z)),
            Point::new(pmax.x.max(p.x), pmax.y.max(p.y), pmax.z.max(p.z)),
        )
    });
    Some(bbox)
}

/// Checks whether a point is inside (or on the boundary of) the box `pmin..pmax`.
pub fn is_point_inside_bbox(ptest: Point, pmin: Point, pmax: Point) -> bool {
    ptest.x >= pmin.x - EPS
        && ptest.x <= pmax.x + EPS
        && ptest.y >= pmin.y - EPS
        && ptest.y <= pmax.y + EPS
        && ptest.z >= pmin.z - EPS
        && ptest.z <= pmax.z + EPS
}
