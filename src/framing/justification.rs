//! Cross-section justification: where the driving curve sits relative to the
//! profile's bounding box, and the translation that bakes it into a
//! centerline.

use serde::{Deserialize, Serialize};

use crate::geom::{Line3, Tolerance};

use super::classify::GLOBAL_UP;
use super::frame::MemberFrame;
use super::profile::ProfileFrame;

/// Per-axis justification code, numbered as the host enumerates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(i32)]
pub enum AxisJustification {
    Min = 0,
    #[default]
    Center = 1,
    Max = 3,
}

impl AxisJustification {
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Min),
            1 => Some(Self::Center),
            3 => Some(Self::Max),
            _ => None,
        }
    }

    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }

    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Min => Self::Max,
            Self::Center => Self::Center,
            Self::Max => Self::Min,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum JustificationMode {
    /// One shared justification for both ends.
    #[default]
    Uniform,
    Independent,
}

/// Which justification values to read from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JustificationEnd {
    /// The pair used by both ends in uniform mode.
    Shared,
    Start,
    End,
}

/// Justification codes and raw offsets at one member end.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EndJustification {
    pub y: AxisJustification,
    pub z: AxisJustification,
    pub y_offset: f64,
    pub z_offset: f64,
}

impl EndJustification {
    pub const CENTERED: Self = Self {
        y: AxisJustification::Center,
        z: AxisJustification::Center,
        y_offset: 0.0,
        z_offset: 0.0,
    };

    #[must_use]
    pub const fn new(y: AxisJustification, z: AxisJustification, y_offset: f64, z_offset: f64) -> Self {
        Self { y, z, y_offset, z_offset }
    }

    /// Effective offsets along local Y and Z.
    ///
    /// The Z rule has the opposite sign of the Y rule: `Min` adds the
    /// half-depth and `Max` subtracts it.
    #[must_use]
    pub fn effective_offsets(&self, profile: &ProfileFrame) -> LocalOffset {
        let y = match self.y {
            AxisJustification::Min => self.y_offset - profile.dy,
            AxisJustification::Center => self.y_offset,
            AxisJustification::Max => self.y_offset + profile.dy,
        };
        let z = match self.z {
            AxisJustification::Min => self.z_offset + profile.dz,
            AxisJustification::Center => self.z_offset,
            AxisJustification::Max => self.z_offset - profile.dz,
        };
        LocalOffset { y, z }
    }

    /// The same physical justification seen from a member whose direction is
    /// reversed: local Y flips, local Z does not.
    #[must_use]
    pub const fn reversed(self) -> Self {
        Self {
            y: self.y.opposite(),
            z: self.z,
            y_offset: -self.y_offset,
            z_offset: self.z_offset,
        }
    }
}

/// Justification of a whole member.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Justification {
    pub mode: JustificationMode,
    pub start: EndJustification,
    pub end: EndJustification,
}

impl Justification {
    #[must_use]
    pub const fn uniform(shared: EndJustification) -> Self {
        Self {
            mode: JustificationMode::Uniform,
            start: shared,
            end: shared,
        }
    }

    #[must_use]
    pub const fn independent(start: EndJustification, end: EndJustification) -> Self {
        Self {
            mode: JustificationMode::Independent,
            start,
            end,
        }
    }

    /// Insertion-point default used when no justification is known.
    #[must_use]
    pub const fn centered() -> Self {
        Self::uniform(EndJustification::CENTERED)
    }

    #[must_use]
    pub fn effective_offsets(&self, profile: &ProfileFrame) -> EndOffsets {
        EndOffsets {
            start: self.start.effective_offsets(profile),
            end: self.end.effective_offsets(profile),
        }
    }

    /// Justification for the same member described with its ends swapped.
    #[must_use]
    pub const fn reversed(self) -> Self {
        Self {
            mode: self.mode,
            start: self.end.reversed(),
            end: self.start.reversed(),
        }
    }
}

/// Offset along local Y and Z.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LocalOffset {
    pub y: f64,
    pub z: f64,
}

impl LocalOffset {
    #[must_use]
    pub fn is_zero(self, tol: Tolerance) -> bool {
        tol.approx_zero_f64(self.y) && tol.approx_zero_f64(self.z)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EndOffsets {
    pub start: LocalOffset,
    pub end: LocalOffset,
}

impl EndOffsets {
    #[must_use]
    pub fn is_zero(self, tol: Tolerance) -> bool {
        self.start.is_zero(tol) && self.end.is_zero(tol)
    }
}

/// Translates the ends of `nominal` by `offsets` in the member frame oriented
/// by `angle`, producing the baked centerline.
///
/// Zero offsets return `nominal` untouched. Returns `None` if `nominal` has
/// no direction.
#[must_use]
pub fn bake_offsets(
    nominal: Line3,
    angle: f64,
    offsets: EndOffsets,
    tol: Tolerance,
    angle_tol: Tolerance,
) -> Option<Line3> {
    let frame = MemberFrame::oriented(nominal.direction(), angle, angle_tol)?;
    if offsets.is_zero(tol) {
        return Some(nominal);
    }
    Some(translate_ends(nominal, &frame, offsets, 1.0))
}

/// Nominal line recovered by [`unbake_offsets`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unbaked {
    pub nominal: Line3,
    /// `false` when the iteration cap was hit first; `nominal` is then the
    /// last iterate.
    pub converged: bool,
}

/// Recovers the nominal line whose baked centerline is `baked`.
///
/// The frame depends on the nominal direction, which differs from the baked
/// direction when the two ends carry different offsets, so the nominal line
/// is found by fixed-point iteration. It has converged once the frame of the
/// new estimate matches the frame that produced it. Equal end offsets
/// converge after one step.
#[must_use]
pub fn unbake_offsets(
    baked: Line3,
    angle: f64,
    offsets: EndOffsets,
    tol: Tolerance,
    angle_tol: Tolerance,
    max_iterations: usize,
) -> Option<Unbaked> {
    if offsets.is_zero(tol) {
        MemberFrame::oriented(baked.direction(), angle, angle_tol)?;
        return Some(Unbaked {
            nominal: baked,
            converged: true,
        });
    }

    let seed = vertical_candidate(baked, angle, offsets, angle_tol).unwrap_or(baked);
    let mut frame = MemberFrame::oriented(seed.direction(), angle, angle_tol)?;
    let cap = max_iterations.max(1);
    let mut iteration = 0;
    loop {
        iteration += 1;
        let nominal = translate_ends(baked, &frame, offsets, -1.0);
        let next = MemberFrame::oriented(nominal.direction(), angle, angle_tol)?;
        let converged = tol.approx_eq_vec3(next.x, frame.x) && tol.approx_eq_vec3(next.y, frame.y);
        if converged || iteration >= cap {
            if converged {
                log::debug!("nominal line recovered after {iteration} iteration(s)");
            }
            return Some(Unbaked { nominal, converged });
        }
        frame = next;
    }
}

/// The frame convention switches at vertical, so iterating from a leaning
/// baked line never reaches a vertical nominal line. Returns the nominal line
/// obtained with the vertical frame when that line is itself vertical.
fn vertical_candidate(baked: Line3, angle: f64, offsets: EndOffsets, angle_tol: Tolerance) -> Option<Line3> {
    let up = if baked.end.z >= baked.start.z {
        GLOBAL_UP
    } else {
        GLOBAL_UP.neg()
    };
    let frame = MemberFrame::oriented(up, angle, angle_tol)?;
    let candidate = translate_ends(baked, &frame, offsets, -1.0);
    let dir = candidate.direction().normalized()?;
    (dir.dot(up) > 0.0 && angle_tol.is_parallel(dir, up)).then_some(candidate)
}

fn translate_ends(line: Line3, frame: &MemberFrame, offsets: EndOffsets, sign: f64) -> Line3 {
    let start = frame.local_offset(offsets.start.y, offsets.start.z).mul_scalar(sign);
    let end = frame.local_offset(offsets.end.y, offsets.end.z).mul_scalar(sign);
    Line3::new(line.start.add_vec(start), line.end.add_vec(end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framing::profile::SectionPoint;
    use crate::geom::{Point3, Vec3};

    const PROFILE: ProfileFrame = ProfileFrame::new(0.1, 0.2, SectionPoint::ORIGIN);

    fn end(y: AxisJustification, z: AxisJustification, y_offset: f64, z_offset: f64) -> EndJustification {
        EndJustification::new(y, z, y_offset, z_offset)
    }

    #[test]
    fn codes_round_trip_host_numbers() {
        for code in [0, 1, 3] {
            assert_eq!(AxisJustification::from_code(code).map(AxisJustification::code), Some(code));
        }
        assert_eq!(AxisJustification::from_code(2), None);
        assert_eq!(AxisJustification::from_code(-1), None);
    }

    #[test]
    fn y_rule() {
        use AxisJustification::{Center, Max, Min};
        assert!((end(Min, Center, 0.05, 0.0).effective_offsets(&PROFILE).y - (0.05 - 0.1)).abs() < 1e-12);
        assert!((end(Max, Center, 0.05, 0.0).effective_offsets(&PROFILE).y - (0.05 + 0.1)).abs() < 1e-12);
        assert!((end(Center, Center, 0.05, 0.0).effective_offsets(&PROFILE).y - 0.05).abs() < 1e-12);
    }

    #[test]
    fn z_rule_is_inverted() {
        use AxisJustification::{Center, Max, Min};
        let raw = 0.03;
        let min = end(Center, Min, 0.0, raw).effective_offsets(&PROFILE);
        let max = end(Center, Max, 0.0, raw).effective_offsets(&PROFILE);
        assert!((min.z - (raw + 0.2)).abs() < 1e-12);
        assert!((max.z - (raw - 0.2)).abs() < 1e-12);
    }

    #[test]
    fn centered_zero_is_zero_for_any_profile() {
        for profile in [PROFILE, ProfileFrame::new(3.0, 7.0, SectionPoint::ORIGIN)] {
            let offsets = Justification::centered().effective_offsets(&profile);
            assert!(offsets.is_zero(Tolerance::new(0.0)));
        }
    }

    #[test]
    fn degenerate_profile_keeps_raw_offsets() {
        use AxisJustification::{Max, Min};
        let offsets = end(Min, Max, 0.25, -0.5).effective_offsets(&ProfileFrame::DEGENERATE);
        assert_eq!(offsets, LocalOffset { y: 0.25, z: -0.5 });
    }

    #[test]
    fn reversed_swaps_ends_and_mirrors_y() {
        use AxisJustification::{Center, Max, Min};
        let just = Justification::independent(end(Min, Max, 0.1, 0.2), end(Center, Min, -0.3, 0.0));
        let rev = just.reversed();
        assert_eq!(rev.start, end(Center, Min, 0.3, 0.0));
        assert_eq!(rev.end, end(Max, Max, -0.1, 0.2));
        assert_eq!(rev.reversed(), just);
    }

    #[test]
    fn bake_then_unbake_with_unequal_offsets() {
        let tol = Tolerance::new(1e-9);
        let nominal = Line3::new(Point3::new(1.0, 2.0, 0.5), Point3::new(6.0, 4.0, 1.5));
        let offsets = EndOffsets {
            start: LocalOffset { y: 0.15, z: -0.2 },
            end: LocalOffset { y: -0.05, z: 0.3 },
        };
        let baked = bake_offsets(nominal, 0.7, offsets, tol, Tolerance::HOST_ANGLE).unwrap();
        assert!(!tol.approx_eq_point3(baked.start, nominal.start));

        let recovered = unbake_offsets(baked, 0.7, offsets, tol, Tolerance::HOST_ANGLE, 32).unwrap();
        assert!(recovered.converged);
        assert!(tol.approx_eq_point3(recovered.nominal.start, nominal.start));
        assert!(tol.approx_eq_point3(recovered.nominal.end, nominal.end));
    }

    #[test]
    fn unbake_reports_iteration_cap() {
        let tol = Tolerance::new(1e-9);
        let nominal = Line3::new(Point3::new(1.0, 2.0, 0.5), Point3::new(6.0, 4.0, 1.5));
        let offsets = EndOffsets {
            start: LocalOffset { y: 0.15, z: -0.2 },
            end: LocalOffset { y: -0.05, z: 0.3 },
        };
        let baked = bake_offsets(nominal, 0.7, offsets, tol, Tolerance::HOST_ANGLE).unwrap();
        let capped = unbake_offsets(baked, 0.7, offsets, tol, Tolerance::HOST_ANGLE, 1).unwrap();
        assert!(!capped.converged);
    }

    #[test]
    fn equal_offsets_converge_in_one_step() {
        let tol = Tolerance::new(1e-9);
        let nominal = Line3::new(Point3::new(1.0, 2.0, 0.5), Point3::new(6.0, 4.0, 1.5));
        let offset = LocalOffset { y: 0.15, z: -0.2 };
        let offsets = EndOffsets { start: offset, end: offset };
        let baked = bake_offsets(nominal, 0.7, offsets, tol, Tolerance::HOST_ANGLE).unwrap();
        let recovered = unbake_offsets(baked, 0.7, offsets, tol, Tolerance::HOST_ANGLE, 1).unwrap();
        assert!(recovered.converged);
        assert!(tol.approx_eq_point3(recovered.nominal.start, nominal.start));
    }

    #[test]
    fn zero_offsets_are_identity() {
        let line = Line3::new(Point3::ORIGIN, Point3::new(5.0, 0.0, 0.0));
        let baked = bake_offsets(line, 1.0, EndOffsets::default(), Tolerance::DISTANCE, Tolerance::HOST_ANGLE);
        assert_eq!(baked, Some(line));
        assert_eq!(baked.unwrap().direction(), Vec3::new(5.0, 0.0, 0.0));
    }
}
