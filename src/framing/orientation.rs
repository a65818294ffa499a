//! Conversion of the cross-section rotation between the host convention and
//! the portable orientation angle.
//!
//! Every case is a row of one decision table keyed by member category, curve
//! category, the slanted-column flag and the mirrored flag. A row is an affine
//! rule `angle = sign * rotation + offset`, so push is its exact inverse.
//!
//! For straight members the portable angle is the signed angle about the
//! tangent from the canonical Y axis to the host's local Y axis (see
//! [`MemberFrame`]). The linear rows describe how the host derives its local
//! axes from its rotation parameter:
//! - vertical columns, vertical beams and sloped beams rotate away from the
//!   canonical axes directly
//! - slanted columns measure their rotation from the up-facing axis, a
//!   quarter turn clockwise from canonical Y
//!
//! A column is slanted exactly when its driving line is not vertical, so a
//! key pairing a column's slanted flag with the wrong linear category has no
//! row.
//!
//! Curved members use the host's plane-based conventions, negated for
//! mirrored elements.

use std::f64::consts::{FRAC_PI_2, TAU};

use serde::{Deserialize, Serialize};

use crate::geom::Tolerance;

use super::classify::CurveCategory;
use super::frame::MemberFrame;
use super::host::MemberCategory;

/// Everything the conversion depends on besides the angle itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AngleKey {
    pub category: MemberCategory,
    pub curve: CurveCategory,
    pub slanted: bool,
    pub mirrored: bool,
}

impl AngleKey {
    #[must_use]
    pub const fn new(category: MemberCategory, curve: CurveCategory, slanted: bool, mirrored: bool) -> Self {
        Self { category, curve, slanted, mirrored }
    }
}

/// `portable = sign * host + offset`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleRule {
    pub sign: f64,
    pub offset: f64,
    /// Pass the host value through untouched on pull (no domain wrap).
    pub verbatim: bool,
}

impl AngleRule {
    pub const IDENTITY: Self = Self::affine(1.0, 0.0);
    pub const VERBATIM: Self = Self {
        sign: 1.0,
        offset: 0.0,
        verbatim: true,
    };

    #[must_use]
    pub const fn affine(sign: f64, offset: f64) -> Self {
        Self {
            sign,
            offset,
            verbatim: false,
        }
    }

    #[must_use]
    pub fn to_portable(self, host: f64) -> f64 {
        self.sign * host + self.offset
    }

    #[must_use]
    pub fn to_host(self, portable: f64) -> f64 {
        self.sign * (portable - self.offset)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Members {
    Columns,
    NonColumns,
    All,
}

#[derive(Debug, Clone, Copy)]
struct Row {
    name: &'static str,
    members: Members,
    curve: CurveCategory,
    slanted: Option<bool>,
    mirrored: Option<bool>,
    rule: AngleRule,
}

impl Row {
    fn matches(&self, key: &AngleKey) -> bool {
        let members = match self.members {
            Members::Columns => key.category.is_column(),
            Members::NonColumns => !key.category.is_column(),
            Members::All => true,
        };
        members
            && self.curve == key.curve
            && self.slanted.is_none_or(|s| s == key.slanted)
            && self.mirrored.is_none_or(|m| m == key.mirrored)
    }
}

const TABLE: &[Row] = &[
    Row {
        name: "vertical column",
        members: Members::Columns,
        curve: CurveCategory::LinearVertical,
        slanted: Some(false),
        mirrored: None,
        rule: AngleRule::IDENTITY,
    },
    Row {
        name: "slanted column",
        members: Members::Columns,
        curve: CurveCategory::LinearOther,
        slanted: Some(true),
        mirrored: None,
        rule: AngleRule::affine(1.0, -FRAC_PI_2),
    },
    Row {
        name: "vertical beam or brace",
        members: Members::NonColumns,
        curve: CurveCategory::LinearVertical,
        slanted: None,
        mirrored: None,
        rule: AngleRule::IDENTITY,
    },
    Row {
        name: "beam or brace",
        members: Members::NonColumns,
        curve: CurveCategory::LinearOther,
        slanted: None,
        mirrored: None,
        rule: AngleRule::IDENTITY,
    },
    Row {
        name: "curve in a vertical plane",
        members: Members::All,
        curve: CurveCategory::PlanarNonlinearVertical,
        slanted: None,
        mirrored: Some(false),
        rule: AngleRule::affine(-1.0, FRAC_PI_2),
    },
    Row {
        name: "mirrored curve in a vertical plane",
        members: Members::All,
        curve: CurveCategory::PlanarNonlinearVertical,
        slanted: None,
        mirrored: Some(true),
        rule: AngleRule::affine(1.0, -FRAC_PI_2),
    },
    Row {
        name: "curve in an inclined plane",
        members: Members::All,
        curve: CurveCategory::PlanarNonlinearOther,
        slanted: None,
        mirrored: Some(false),
        rule: AngleRule::affine(-1.0, 0.0),
    },
    Row {
        name: "mirrored curve in an inclined plane",
        members: Members::All,
        curve: CurveCategory::PlanarNonlinearOther,
        slanted: None,
        mirrored: Some(true),
        rule: AngleRule::IDENTITY,
    },
    Row {
        name: "non-planar curve",
        members: Members::All,
        curve: CurveCategory::NonPlanar,
        slanted: None,
        mirrored: None,
        rule: AngleRule::VERBATIM,
    },
];

/// Looks up the conversion rule for `key`.
#[must_use]
pub fn rule_for(key: &AngleKey) -> AngleRule {
    match TABLE.iter().find(|row| row.matches(key)) {
        Some(row) => {
            log::debug!("orientation rule '{}' for {key:?}", row.name);
            row.rule
        }
        None => {
            log::warn!("no orientation rule for {key:?}; passing rotation through");
            AngleRule::VERBATIM
        }
    }
}

/// Reduces `value` into (−2π, 2π] and moves it one full turn inward when it
/// lands within `angle_tol` of either boundary. Non-finite input becomes 0.
#[must_use]
pub fn wrap_angle(value: f64, angle_tol: Tolerance) -> f64 {
    if !value.is_finite() {
        log::warn!("non-finite angle {value} replaced by 0");
        return 0.0;
    }
    let wrapped = value % TAU;
    if wrapped > TAU - angle_tol.eps {
        wrapped - TAU
    } else if wrapped < -TAU + angle_tol.eps {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Host rotation → portable orientation angle (pull).
#[must_use]
pub fn host_to_portable(rotation: f64, key: &AngleKey, angle_tol: Tolerance) -> f64 {
    let rule = rule_for(key);
    if rule.verbatim {
        return rotation;
    }
    wrap_angle(rule.to_portable(rotation), angle_tol)
}

/// Portable orientation angle → host rotation (push). The result is always
/// wrapped into the host's accepted domain.
#[must_use]
pub fn portable_to_host(angle: f64, key: &AngleKey, angle_tol: Tolerance) -> f64 {
    wrap_angle(rule_for(key).to_host(angle), angle_tol)
}

/// Portable orientation angle of a straight member measured from the host's
/// actual local axes. `None` when the frame is degenerate.
#[must_use]
pub fn measure_host_frame(frame: &MemberFrame, angle_tol: Tolerance) -> Option<f64> {
    frame
        .orientation_angle(angle_tol)
        .map(|angle| wrap_angle(angle, angle_tol))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: Tolerance = Tolerance::HOST_ANGLE;

    #[test]
    fn wrap_keeps_values_inside_domain() {
        assert_eq!(wrap_angle(0.5, TOL), 0.5);
        assert_eq!(wrap_angle(-6.0, TOL), -6.0);
        assert!((wrap_angle(7.0, TOL) - (7.0 - TAU)).abs() < 1e-12);
        assert!((wrap_angle(-7.0, TOL) - (-7.0 + TAU)).abs() < 1e-12);
    }

    #[test]
    fn wrap_moves_boundary_values_inward() {
        let near_top = TAU - TOL.eps * 0.5;
        assert!((wrap_angle(near_top, TOL) - (near_top - TAU)).abs() < 1e-12);
        let near_bottom = -TAU + TOL.eps * 0.5;
        assert!((wrap_angle(near_bottom, TOL) - (near_bottom + TAU)).abs() < 1e-12);
        assert_eq!(wrap_angle(TAU, TOL), 0.0);
    }

    #[test]
    fn wrap_replaces_non_finite() {
        assert_eq!(wrap_angle(f64::NAN, TOL), 0.0);
        assert_eq!(wrap_angle(f64::INFINITY, TOL), 0.0);
    }

    #[test]
    fn rule_inverse_round_trips() {
        for rule in [
            AngleRule::IDENTITY,
            AngleRule::affine(-1.0, FRAC_PI_2),
            AngleRule::affine(1.0, -FRAC_PI_2),
            AngleRule::affine(-1.0, 0.0),
        ] {
            for r in [-2.0, 0.0, 0.3, 1.9] {
                assert!((rule.to_host(rule.to_portable(r)) - r).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn non_planar_passes_rotation_verbatim() {
        let key = AngleKey::new(MemberCategory::Beam, CurveCategory::NonPlanar, false, true);
        assert_eq!(host_to_portable(9.0, &key, TOL), 9.0);
        // Push still honours the host domain.
        assert!((portable_to_host(9.0, &key, TOL) - (9.0 - TAU)).abs() < 1e-12);
    }
}
