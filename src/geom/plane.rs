//! Plane fitting for curve defining points.
//!
//! The fit picks the most spread non-collinear triple of defining points
//! (first point, the point farthest from it, and the point farthest from the
//! line through those two), takes its normal, and accepts the plane only when
//! every point lies within the distance tolerance of it.

use super::core::{Point3, Tolerance, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub origin: Point3,
    /// Unit normal.
    pub normal: Vec3,
}

impl Plane {
    #[must_use]
    pub fn distance_to(self, p: Point3) -> f64 {
        p.sub_point(self.origin).dot(self.normal).abs()
    }
}

/// Shape of a set of curve defining points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointSetShape {
    /// All points coincide within tolerance.
    Coincident,
    /// All points lie on the line from `start` to `end` within tolerance.
    Collinear { start: Point3, end: Point3 },
    Planar(Plane),
    NonPlanar,
}

#[must_use]
pub fn analyze_points(points: &[Point3], tol: Tolerance) -> PointSetShape {
    let Some(&first) = points.first() else {
        return PointSetShape::Coincident;
    };

    let Some(far) = farthest_by(points, |p| p.distance_to(first)) else {
        return PointSetShape::Coincident;
    };
    if far.distance_to(first) <= tol.eps {
        return PointSetShape::Coincident;
    }

    let Some(axis) = far.sub_point(first).normalized() else {
        return PointSetShape::Coincident;
    };
    let off_line = |p: Point3| p.sub_point(first).reject_from(axis).length();

    let Some(apex) = farthest_by(points, |p| off_line(p)) else {
        return PointSetShape::Collinear { start: first, end: far };
    };
    if off_line(apex) <= tol.eps {
        let last = points[points.len() - 1];
        let end = if last.distance_to(first) > tol.eps { last } else { far };
        return PointSetShape::Collinear { start: first, end };
    }

    let normal = far.sub_point(first).cross(apex.sub_point(first)).normalized();
    let Some(normal) = normal else {
        return PointSetShape::NonPlanar;
    };
    let plane = Plane { origin: first, normal };

    if points.iter().all(|p| plane.distance_to(*p) <= tol.eps) {
        PointSetShape::Planar(plane)
    } else {
        PointSetShape::NonPlanar
    }
}

fn farthest_by(points: &[Point3], metric: impl Fn(Point3) -> f64) -> Option<Point3> {
    points
        .iter()
        .copied()
        .max_by(|a, b| metric(*a).total_cmp(&metric(*b)))
}
