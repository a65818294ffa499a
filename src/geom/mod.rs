//! Minimal geometry kernel: vectors, points, tolerances, driving curves and
//! point-set plane fitting.

mod core;
mod curve;
mod plane;

pub use self::core::{Point3, Tolerance, Vec3};
pub use self::curve::{CurveError, DrivingCurve, Line3, Polyline3};
pub use self::plane::{Plane, PointSetShape, analyze_points};
