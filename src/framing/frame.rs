//! Local member axes.
//!
//! The canonical frame of a straight member has `x` along the tangent and
//! `y0 = normalize(x × up)`, which is horizontal. Vertical members have no
//! such cross product and use global Y instead. `z = y × x` completes the
//! frame, so for a non-vertical member `z0` is the "up-facing" axis (global up
//! projected perpendicular to the tangent).
//!
//! A member oriented by `angle` has `y = rotate(y0, angle, about x)`. The
//! orientation angle is therefore the signed angle from `y0` to `y` about `x`.

use serde::{Deserialize, Serialize};

use crate::geom::{Tolerance, Vec3};

use super::classify::GLOBAL_UP;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemberFrame {
    /// Unit tangent.
    pub x: Vec3,
    pub y: Vec3,
    pub z: Vec3,
}

impl MemberFrame {
    /// Canonical frame (orientation angle 0) for a member along `tangent`.
    ///
    /// Returns `None` for a zero or non-finite tangent.
    #[must_use]
    pub fn canonical(tangent: Vec3, angle_tol: Tolerance) -> Option<Self> {
        let x = tangent.normalized()?;
        let y = if angle_tol.is_parallel(x, GLOBAL_UP) {
            Vec3::Y.reject_from(x).normalized()?
        } else {
            x.cross(GLOBAL_UP).normalized()?
        };
        Some(Self { x, y, z: y.cross(x) })
    }

    /// Frame for a member along `tangent` rotated by `angle` radians.
    #[must_use]
    pub fn oriented(tangent: Vec3, angle: f64, angle_tol: Tolerance) -> Option<Self> {
        Self::canonical(tangent, angle_tol).map(|frame| frame.rotated(angle))
    }

    /// Rotates the cross-section axes about the tangent.
    #[must_use]
    pub fn rotated(self, angle: f64) -> Self {
        let y = self.y.rotated_about(self.x, angle);
        Self { x: self.x, y, z: y.cross(self.x) }
    }

    /// Orientation angle of this frame relative to the canonical frame of its
    /// own tangent. `None` when the frame's Y axis is parallel to the tangent.
    #[must_use]
    pub fn orientation_angle(&self, angle_tol: Tolerance) -> Option<f64> {
        let canonical = Self::canonical(self.x, angle_tol)?;
        canonical.y.signed_angle_about(self.y, self.x)
    }

    /// The same cross-section seen from the opposite end of the member:
    /// tangent and local Y flip, local Z is kept.
    #[must_use]
    pub const fn reversed(self) -> Self {
        Self {
            x: self.x.neg(),
            y: self.y.neg(),
            z: self.z,
        }
    }

    /// World-space displacement for local offsets along Y and Z.
    #[must_use]
    pub fn local_offset(&self, y: f64, z: f64) -> Vec3 {
        self.y.mul_scalar(y).add(self.z.mul_scalar(z))
    }
}
