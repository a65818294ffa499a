use serde::{Deserialize, Serialize};

use super::core::{Point3, Tolerance, Vec3};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CurveError {
    #[error("curve requires at least 2 defining points, got {0}")]
    TooFewPoints(usize),
    #[error("curve points must be finite")]
    NonFinite,
    #[error("curve length {length} does not exceed the distance tolerance {tolerance}")]
    TooShort { length: f64, tolerance: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line3 {
    pub start: Point3,
    pub end: Point3,
}

impl Line3 {
    #[must_use]
    pub const fn new(start: Point3, end: Point3) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub const fn direction(self) -> Vec3 {
        self.end.sub_point(self.start)
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.direction().length()
    }

    #[must_use]
    pub const fn reversed(self) -> Self {
        Self::new(self.end, self.start)
    }
}

/// Open polyline through the defining points of a general (non-line) curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point3>", into = "Vec<Point3>")]
pub struct Polyline3 {
    points: Vec<Point3>,
}

impl Polyline3 {
    pub fn new(points: Vec<Point3>) -> Result<Self, CurveError> {
        if points.len() < 2 {
            return Err(CurveError::TooFewPoints(points.len()));
        }
        if points.iter().any(|p| !p.is_finite()) {
            return Err(CurveError::NonFinite);
        }
        Ok(Self { points })
    }

    #[must_use]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| w[1].distance_to(w[0]))
            .sum()
    }

    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self { points }
    }
}

impl TryFrom<Vec<Point3>> for Polyline3 {
    type Error = CurveError;

    fn try_from(points: Vec<Point3>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<Polyline3> for Vec<Point3> {
    fn from(polyline: Polyline3) -> Self {
        polyline.points
    }
}

/// The single centerline curve that positions a linear member in space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrivingCurve {
    Line(Line3),
    Curve(Polyline3),
}

impl DrivingCurve {
    #[must_use]
    pub const fn line(start: Point3, end: Point3) -> Self {
        Self::Line(Line3::new(start, end))
    }

    pub fn through_points(points: Vec<Point3>) -> Result<Self, CurveError> {
        Polyline3::new(points).map(Self::Curve)
    }

    #[must_use]
    pub fn start_point(&self) -> Point3 {
        match self {
            Self::Line(line) => line.start,
            Self::Curve(poly) => poly.points()[0],
        }
    }

    #[must_use]
    pub fn end_point(&self) -> Point3 {
        match self {
            Self::Line(line) => line.end,
            Self::Curve(poly) => poly.points()[poly.points().len() - 1],
        }
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        match self {
            Self::Line(line) => line.length(),
            Self::Curve(poly) => poly.length(),
        }
    }

    #[must_use]
    pub fn defining_points(&self) -> Vec<Point3> {
        match self {
            Self::Line(line) => vec![line.start, line.end],
            Self::Curve(poly) => poly.points().to_vec(),
        }
    }

    #[must_use]
    pub fn as_line(&self) -> Option<Line3> {
        match self {
            Self::Line(line) => Some(*line),
            Self::Curve(_) => None,
        }
    }

    #[must_use]
    pub fn reversed(&self) -> Self {
        match self {
            Self::Line(line) => Self::Line(line.reversed()),
            Self::Curve(poly) => Self::Curve(poly.reversed()),
        }
    }

    /// Checks the length invariant: finite points and a length above `tol`.
    pub fn validate(&self, tol: Tolerance) -> Result<(), CurveError> {
        if let Self::Curve(poly) = self {
            if poly.points().len() < 2 {
                return Err(CurveError::TooFewPoints(poly.points().len()));
            }
        }
        if self.defining_points().iter().any(|p| !p.is_finite()) {
            return Err(CurveError::NonFinite);
        }
        let length = self.length();
        if length <= tol.eps {
            return Err(CurveError::TooShort {
                length,
                tolerance: tol.eps,
            });
        }
        Ok(())
    }
}
