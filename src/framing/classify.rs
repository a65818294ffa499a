//! Geometric category of a member's driving curve.

use serde::{Deserialize, Serialize};

use crate::geom::{CurveError, DrivingCurve, PointSetShape, Tolerance, Vec3, analyze_points};

/// Global up axis of both object models.
pub const GLOBAL_UP: Vec3 = Vec3::Z;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CurveCategory {
    LinearVertical,
    LinearOther,
    PlanarNonlinearVertical,
    PlanarNonlinearOther,
    /// Unsupported: conversions degrade and drop placement data.
    NonPlanar,
}

impl CurveCategory {
    #[must_use]
    pub const fn is_linear(self) -> bool {
        matches!(self, Self::LinearVertical | Self::LinearOther)
    }
}

/// Classifies `curve`.
///
/// `distance_tol` bounds point deviations (collinearity, planarity and the
/// minimum curve length); `angle_tol` is the angular tolerance in radians for
/// the vertical checks.
pub fn classify_curve(
    curve: &DrivingCurve,
    distance_tol: Tolerance,
    angle_tol: Tolerance,
) -> Result<CurveCategory, CurveError> {
    curve.validate(distance_tol)?;

    let points = curve.defining_points();
    let category = match analyze_points(&points, distance_tol) {
        PointSetShape::Coincident => {
            // Closed loops pass the length check but have no usable chord.
            return Err(CurveError::TooShort {
                length: 0.0,
                tolerance: distance_tol.eps,
            });
        }
        PointSetShape::Collinear { start, end } => match end.sub_point(start).normalized() {
            Some(dir) if angle_tol.is_parallel(dir, GLOBAL_UP) => CurveCategory::LinearVertical,
            Some(_) => CurveCategory::LinearOther,
            None => {
                return Err(CurveError::TooShort {
                    length: 0.0,
                    tolerance: distance_tol.eps,
                });
            }
        },
        PointSetShape::Planar(plane) => {
            if angle_tol.is_perpendicular(plane.normal, GLOBAL_UP) {
                CurveCategory::PlanarNonlinearVertical
            } else {
                CurveCategory::PlanarNonlinearOther
            }
        }
        PointSetShape::NonPlanar => CurveCategory::NonPlanar,
    };

    log::debug!("classified driving curve as {category:?}");
    Ok(category)
}
