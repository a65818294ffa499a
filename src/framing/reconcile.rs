//! Centerline reconciliation between the host and portable placements.
//!
//! *Pull* reads a host member (driving curve, rotation parameter and end
//! justification) and produces a [`FramingPlacement`]: one centerline with the
//! justification translation baked in and a portable orientation angle.
//!
//! *Push* takes a [`FramingPlacement`] back to [`HostPlacementParameters`]:
//! the nominal driving curve with the baked translation removed, the host
//! rotation parameter in its accepted domain and the justification to apply.
//!
//! Only straight members carry justification through. Curved and non-planar
//! members take a degraded path that is recorded in [`ReconcileDiagnostics`].

use serde::{Deserialize, Serialize};

use crate::geom::{DrivingCurve, Line3, Tolerance};

use super::cache::ProfileFrameCache;
use super::classify::{CurveCategory, GLOBAL_UP, classify_curve};
use super::diagnostics::ReconcileDiagnostics;
use super::frame::MemberFrame;
use super::host::{HostMember, HostParameter, MemberCategory, ignored_parameters};
use super::justification::{
    AxisJustification, EndJustification, Justification, JustificationEnd, JustificationMode,
    bake_offsets, unbake_offsets,
};
use super::orientation::{AngleKey, host_to_portable, measure_host_frame, portable_to_host, wrap_angle};
use super::profile::ProfileFrame;

// ============================================================================
// Options and errors
// ============================================================================

/// What push does with a column whose driving curve runs downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ColumnElevationPolicy {
    /// Return [`ReconcileError::ColumnElevation`].
    #[default]
    Reject,
    /// Reverse the curve (swapping start and end justification) so that
    /// elevation increases.
    AutoFlip,
}

/// Options for controlling pull and push.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReconcileOptions {
    /// Distance tolerance in model units.
    pub tolerance: Tolerance,
    /// Angular tolerance in radians.
    pub angle_tolerance: Tolerance,
    pub elevation_policy: ColumnElevationPolicy,
    /// Iteration cap when recovering the nominal line from a baked one.
    pub max_decompose_iterations: usize,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            tolerance: Tolerance::DISTANCE,
            angle_tolerance: Tolerance::HOST_ANGLE,
            elevation_policy: ColumnElevationPolicy::Reject,
            max_decompose_iterations: 32,
        }
    }
}

impl ReconcileOptions {
    #[must_use]
    pub const fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    #[must_use]
    pub const fn with_angle_tolerance(mut self, angle_tolerance: Tolerance) -> Self {
        self.angle_tolerance = angle_tolerance;
        self
    }

    #[must_use]
    pub const fn with_elevation_policy(mut self, policy: ColumnElevationPolicy) -> Self {
        self.elevation_policy = policy;
        self
    }

    #[must_use]
    pub const fn with_max_decompose_iterations(mut self, iterations: usize) -> Self {
        self.max_decompose_iterations = iterations;
        self
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReconcileError {
    #[error("column start elevation {start_z} is not below end elevation {end_z}")]
    ColumnElevation { start_z: f64, end_z: f64 },
}

// ============================================================================
// Placements
// ============================================================================

/// Portable placement: baked centerline and orientation angle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FramingPlacement {
    pub centerline: DrivingCurve,
    /// Radians about the centerline.
    pub orientation_angle: f64,
    /// Justification baked into `centerline`; `None` when unknown, in which
    /// case `centerline` is taken to be the nominal curve.
    pub justification: Option<Justification>,
}

/// Host placement produced by push.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostPlacementParameters {
    /// Driving curve without justification offsets.
    pub nominal_curve: DrivingCurve,
    /// Host rotation parameter, in (−2π, 2π].
    pub rotation_param: f64,
    /// `None` places the member centred.
    pub justification: Option<Justification>,
    /// Whether a column must use the host's slanted style.
    pub slanted_column: bool,
}

// ============================================================================
// Pull
// ============================================================================

/// Everything pull needs, already read from the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullInput {
    pub category: MemberCategory,
    pub curve: DrivingCurve,
    pub rotation: f64,
    pub justification: Justification,
    pub slanted: bool,
    pub mirrored: bool,
    pub profile: ProfileFrame,
    pub local_frame: Option<MemberFrame>,
}

impl PullInput {
    /// Centred, unrotated input with a degenerate profile.
    #[must_use]
    pub fn new(category: MemberCategory, curve: DrivingCurve) -> Self {
        Self {
            category,
            curve,
            rotation: 0.0,
            justification: Justification::centered(),
            slanted: false,
            mirrored: false,
            profile: ProfileFrame::DEGENERATE,
            local_frame: None,
        }
    }

    /// Reads `member`, resolving its profile frame through `cache`. Problems
    /// with the host values are recorded in `diagnostics`.
    pub fn from_host<M: HostMember + ?Sized>(
        member: &M,
        cache: &ProfileFrameCache,
        diagnostics: &mut ReconcileDiagnostics,
    ) -> Self {
        let profile = match member.profile_key() {
            Some(key) => cache.get_or_compute(key.as_str(), || member.profile_boundary()),
            None => ProfileFrame::from_boundary(&member.profile_boundary()),
        };

        let justification = match member.justification_mode() {
            JustificationMode::Uniform => {
                Justification::uniform(read_end(member, JustificationEnd::Shared, diagnostics))
            }
            JustificationMode::Independent => Justification::independent(
                read_end(member, JustificationEnd::Start, diagnostics),
                read_end(member, JustificationEnd::End, diagnostics),
            ),
        };

        let mut rotation = member.rotation_parameter();
        if !rotation.is_finite() {
            diagnostics.warn(format!("rotation parameter {rotation} is not finite; using 0"));
            rotation = 0.0;
        }

        Self {
            category: member.category(),
            curve: member.driving_curve(),
            rotation,
            justification,
            slanted: member.is_slanted_column(),
            mirrored: member.is_mirrored(),
            profile,
            local_frame: member.local_frame(),
        }
    }
}

fn read_end<M: HostMember + ?Sized>(
    member: &M,
    end: JustificationEnd,
    diagnostics: &mut ReconcileDiagnostics,
) -> EndJustification {
    let (y_code, z_code) = member.justification_codes(end);
    let (y_offset, z_offset) = member.justification_offsets(end);
    EndJustification::new(
        read_code(y_code, "Y", end, diagnostics),
        read_code(z_code, "Z", end, diagnostics),
        read_offset(y_offset, "Y", end, diagnostics),
        read_offset(z_offset, "Z", end, diagnostics),
    )
}

fn read_code(
    code: i32,
    axis: &str,
    end: JustificationEnd,
    diagnostics: &mut ReconcileDiagnostics,
) -> AxisJustification {
    AxisJustification::from_code(code).unwrap_or_else(|| {
        diagnostics.warn(format!("{end:?} {axis} justification code {code} read as Center"));
        AxisJustification::Center
    })
}

fn read_offset(value: f64, axis: &str, end: JustificationEnd, diagnostics: &mut ReconcileDiagnostics) -> f64 {
    if value.is_finite() {
        value
    } else {
        diagnostics.warn(format!("{end:?} {axis} offset {value} is not finite; using 0"));
        0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullOutcome {
    pub placement: FramingPlacement,
    pub diagnostics: ReconcileDiagnostics,
}

/// Reads `member` and pulls it in one step.
pub fn pull_member<M: HostMember + ?Sized>(
    member: &M,
    cache: &ProfileFrameCache,
    options: &ReconcileOptions,
) -> PullOutcome {
    let mut diagnostics = ReconcileDiagnostics::new();
    let input = PullInput::from_host(member, cache, &mut diagnostics);
    pull_with(&input, options, diagnostics)
}

/// Host → portable.
#[must_use]
pub fn pull(input: &PullInput, options: &ReconcileOptions) -> PullOutcome {
    pull_with(input, options, ReconcileDiagnostics::new())
}

fn pull_with(input: &PullInput, options: &ReconcileOptions, mut diagnostics: ReconcileDiagnostics) -> PullOutcome {
    let tol = options.tolerance;
    let angle_tol = options.angle_tolerance;

    let passthrough = |diagnostics: ReconcileDiagnostics| PullOutcome {
        placement: FramingPlacement {
            centerline: input.curve.clone(),
            orientation_angle: input.rotation,
            justification: None,
        },
        diagnostics,
    };

    let curve_category = match classify_curve(&input.curve, tol, angle_tol) {
        Ok(category) => category,
        Err(err) => {
            diagnostics.warn(format!(
                "invalid driving curve ({err}); centerline passed through unchanged"
            ));
            return passthrough(diagnostics);
        }
    };
    diagnostics.curve_category = Some(curve_category);
    let slanted = pull_slanted(input, curve_category, &mut diagnostics);
    let key = AngleKey::new(input.category, curve_category, slanted, input.mirrored);

    match curve_category {
        CurveCategory::NonPlanar => {
            diagnostics.justification_dropped = true;
            diagnostics.warn("non-planar driving curve; justification offsets and rotation convention dropped");
            passthrough(diagnostics)
        }
        CurveCategory::PlanarNonlinearVertical | CurveCategory::PlanarNonlinearOther => {
            diagnostics.justification_dropped = true;
            diagnostics.warn(format!(
                "{curve_category:?} member; justification is not applied to curved members"
            ));
            PullOutcome {
                placement: FramingPlacement {
                    centerline: input.curve.clone(),
                    orientation_angle: host_to_portable(input.rotation, &key, angle_tol),
                    justification: None,
                },
                diagnostics,
            }
        }
        CurveCategory::LinearVertical | CurveCategory::LinearOther => {
            let line = Line3::new(input.curve.start_point(), input.curve.end_point());
            let angle = pull_angle(input, line, &key, angle_tol, &mut diagnostics);
            check_profile(&input.justification, &input.profile, &mut diagnostics);

            let offsets = input.justification.effective_offsets(&input.profile);
            let Some(baked) = bake_offsets(line, angle, offsets, tol, angle_tol) else {
                diagnostics.warn("driving line has no direction; centerline passed through unchanged");
                return passthrough(diagnostics);
            };
            log::debug!(
                "pulled {:?} {curve_category:?}: angle {angle}, offsets {offsets:?}",
                input.category
            );

            PullOutcome {
                placement: FramingPlacement {
                    centerline: DrivingCurve::Line(baked),
                    orientation_angle: angle,
                    justification: Some(input.justification),
                },
                diagnostics,
            }
        }
    }
}

/// A column is slanted exactly when its driving line is not vertical. The
/// host flag is kept for curved members, where no row depends on it.
fn pull_slanted(input: &PullInput, curve_category: CurveCategory, diagnostics: &mut ReconcileDiagnostics) -> bool {
    if !input.category.is_column() || !curve_category.is_linear() {
        return input.slanted;
    }
    let slanted = curve_category == CurveCategory::LinearOther;
    if slanted != input.slanted {
        diagnostics.warn(format!(
            "host slanted-column flag {} disagrees with the {curve_category:?} driving line; using {slanted}",
            input.slanted
        ));
    }
    slanted
}

/// Orientation angle of a straight member, measured from the host's local
/// axes when they are available and consistent with the driving line.
fn pull_angle(
    input: &PullInput,
    line: Line3,
    key: &AngleKey,
    angle_tol: Tolerance,
    diagnostics: &mut ReconcileDiagnostics,
) -> f64 {
    if let Some(frame) = input.local_frame {
        let along_line = line
            .direction()
            .normalized()
            .is_some_and(|dir| angle_tol.is_parallel(dir, frame.x) && dir.dot(frame.x) > 0.0);
        match measure_host_frame(&frame, angle_tol) {
            Some(angle) if along_line => return angle,
            _ => diagnostics.warn("host local axes do not match the driving line; using the rotation parameter"),
        }
    }
    host_to_portable(input.rotation, key, angle_tol)
}

fn check_profile(justification: &Justification, profile: &ProfileFrame, diagnostics: &mut ReconcileDiagnostics) {
    let uses_extents = [justification.start, justification.end]
        .iter()
        .any(|end| end.y != AxisJustification::Center || end.z != AxisJustification::Center);
    if uses_extents && profile.is_degenerate() {
        diagnostics.degenerate_profile = true;
        diagnostics.warn("profile has no usable extents; justification uses raw offsets only");
    }
}

// ============================================================================
// Push
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushInput {
    pub category: MemberCategory,
    pub placement: FramingPlacement,
    pub profile: ProfileFrame,
    pub mirrored: bool,
}

impl PushInput {
    #[must_use]
    pub const fn new(category: MemberCategory, placement: FramingPlacement) -> Self {
        Self {
            category,
            placement,
            profile: ProfileFrame::DEGENERATE,
            mirrored: false,
        }
    }

    #[must_use]
    pub const fn with_profile(mut self, profile: ProfileFrame) -> Self {
        self.profile = profile;
        self
    }

    #[must_use]
    pub const fn with_mirrored(mut self, mirrored: bool) -> Self {
        self.mirrored = mirrored;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PushOutcome {
    pub parameters: HostPlacementParameters,
    /// Host parameters the caller must not copy next to `parameters`.
    pub ignored_parameters: &'static [HostParameter],
    pub diagnostics: ReconcileDiagnostics,
}

/// Portable → host.
///
/// # Errors
///
/// [`ReconcileError::ColumnElevation`] when the start of a column's nominal
/// line is not below its end, unless the policy is
/// [`ColumnElevationPolicy::AutoFlip`] and the elevations differ.
pub fn push(input: &PushInput, options: &ReconcileOptions) -> Result<PushOutcome, ReconcileError> {
    let tol = options.tolerance;
    let angle_tol = options.angle_tolerance;
    let placement = &input.placement;
    let mut diagnostics = ReconcileDiagnostics::new();

    let finish = |parameters: HostPlacementParameters, diagnostics: ReconcileDiagnostics| PushOutcome {
        parameters,
        ignored_parameters: ignored_parameters(input.category),
        diagnostics,
    };

    let curve_category = match classify_curve(&placement.centerline, tol, angle_tol) {
        Ok(category) => category,
        Err(err) => {
            diagnostics.warn(format!("invalid centerline ({err}); passed through unchanged"));
            let parameters = HostPlacementParameters {
                nominal_curve: placement.centerline.clone(),
                rotation_param: wrap_angle(placement.orientation_angle, angle_tol),
                justification: None,
                slanted_column: false,
            };
            return Ok(finish(parameters, diagnostics));
        }
    };
    diagnostics.curve_category = Some(curve_category);

    // Straight members take their angle convention from the nominal line:
    // unequal end offsets can tilt a baked vertical line.
    let mut convention = curve_category;
    let mut parameters = match curve_category {
        CurveCategory::NonPlanar => {
            diagnostics.justification_dropped = placement.justification.is_some();
            diagnostics.warn("non-planar centerline; pushed without justification");
            HostPlacementParameters {
                nominal_curve: placement.centerline.clone(),
                rotation_param: placement.orientation_angle,
                justification: None,
                slanted_column: false,
            }
        }
        CurveCategory::PlanarNonlinearVertical | CurveCategory::PlanarNonlinearOther => {
            if placement.justification.is_some() {
                diagnostics.justification_dropped = true;
                diagnostics.warn(format!(
                    "{curve_category:?} member; justification is not applied to curved members"
                ));
            }
            HostPlacementParameters {
                nominal_curve: placement.centerline.clone(),
                rotation_param: placement.orientation_angle,
                justification: None,
                slanted_column: false,
            }
        }
        CurveCategory::LinearVertical | CurveCategory::LinearOther => {
            let baked = Line3::new(placement.centerline.start_point(), placement.centerline.end_point());
            let angle = placement.orientation_angle;
            let (nominal, justification) = match placement.justification {
                Some(justification) => {
                    let offsets = justification.effective_offsets(&input.profile);
                    let unbaked = unbake_offsets(
                        baked,
                        angle,
                        offsets,
                        tol,
                        angle_tol,
                        options.max_decompose_iterations,
                    );
                    if unbaked.is_some_and(|unbaked| !unbaked.converged) {
                        diagnostics.warn(format!(
                            "nominal line did not converge within {} iterations; using the last estimate",
                            options.max_decompose_iterations
                        ));
                    }
                    (unbaked.map(|unbaked| unbaked.nominal), Some(justification))
                }
                None => {
                    diagnostics.metadata_missing = true;
                    diagnostics.note("no stored justification; member pushed centred");
                    (Some(baked), None)
                }
            };
            let Some(nominal) = nominal else {
                diagnostics.warn("centerline has no direction; passed through unchanged");
                let parameters = HostPlacementParameters {
                    nominal_curve: placement.centerline.clone(),
                    rotation_param: wrap_angle(angle, angle_tol),
                    justification: None,
                    slanted_column: false,
                };
                return Ok(finish(parameters, diagnostics));
            };
            convention = linear_category(nominal, angle_tol);
            HostPlacementParameters {
                nominal_curve: DrivingCurve::Line(nominal),
                rotation_param: angle,
                justification,
                slanted_column: input.category.is_column() && convention == CurveCategory::LinearOther,
            }
        }
    };

    // Elevations are those of the nominal line the host will receive.
    let flip = input.category.is_column()
        && column_needs_flip(&parameters.nominal_curve, tol, options.elevation_policy)?;
    if flip {
        flip_parameters(&mut parameters, convention, angle_tol);
        diagnostics.curve_flipped = true;
        diagnostics.note("column curve reversed so that elevation increases");
    }

    let key = AngleKey::new(input.category, convention, parameters.slanted_column, input.mirrored);
    // `rotation_param` holds the portable angle until here.
    parameters.rotation_param = portable_to_host(parameters.rotation_param, &key, angle_tol);
    log::debug!(
        "pushed {:?} {curve_category:?}: rotation {}",
        input.category,
        parameters.rotation_param
    );
    Ok(finish(parameters, diagnostics))
}

fn linear_category(line: Line3, angle_tol: Tolerance) -> CurveCategory {
    match line.direction().normalized() {
        Some(dir) if angle_tol.is_parallel(dir, GLOBAL_UP) => CurveCategory::LinearVertical,
        _ => CurveCategory::LinearOther,
    }
}

/// `Ok(true)` when a downward column may be reversed.
fn column_needs_flip(
    curve: &DrivingCurve,
    tol: Tolerance,
    policy: ColumnElevationPolicy,
) -> Result<bool, ReconcileError> {
    let start_z = curve.start_point().z;
    let end_z = curve.end_point().z;
    if end_z - start_z > tol.eps {
        return Ok(false);
    }
    if policy == ColumnElevationPolicy::AutoFlip && start_z - end_z > tol.eps {
        return Ok(true);
    }
    Err(ReconcileError::ColumnElevation { start_z, end_z })
}

/// Describes the same physical member from its other end. Expects
/// `rotation_param` to still hold the portable angle.
fn flip_parameters(parameters: &mut HostPlacementParameters, curve_category: CurveCategory, angle_tol: Tolerance) {
    let angle = parameters.rotation_param;
    let reversed_angle = match parameters.nominal_curve.as_line() {
        Some(line) if curve_category.is_linear() => MemberFrame::oriented(line.direction(), angle, angle_tol)
            .and_then(|frame| frame.reversed().orientation_angle(angle_tol)),
        _ => None,
    };
    parameters.rotation_param = reversed_angle.unwrap_or(-angle);
    parameters.nominal_curve = parameters.nominal_curve.reversed();
    parameters.justification = parameters.justification.map(Justification::reversed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point3;

    fn beam(start: Point3, end: Point3) -> PullInput {
        PullInput::new(MemberCategory::Beam, DrivingCurve::line(start, end))
    }

    #[test]
    fn options_builders() {
        let options = ReconcileOptions::default()
            .with_tolerance(Tolerance::new(1e-4))
            .with_elevation_policy(ColumnElevationPolicy::AutoFlip)
            .with_max_decompose_iterations(4);
        assert_eq!(options.tolerance, Tolerance::new(1e-4));
        assert_eq!(options.angle_tolerance, Tolerance::HOST_ANGLE);
        assert_eq!(options.elevation_policy, ColumnElevationPolicy::AutoFlip);
        assert_eq!(options.max_decompose_iterations, 4);
    }

    #[test]
    fn centred_beam_pull_is_clean() {
        let input = beam(Point3::ORIGIN, Point3::new(4.0, 1.0, 0.0));
        let outcome = pull(&input, &ReconcileOptions::default());
        assert!(outcome.diagnostics.is_clean(), "{}", outcome.diagnostics);
        assert_eq!(outcome.placement.centerline, input.curve);
        assert_eq!(outcome.placement.justification, Some(Justification::centered()));
    }

    #[test]
    fn invalid_curve_passes_through() {
        let mut input = beam(Point3::ORIGIN, Point3::ORIGIN);
        input.rotation = 9.0;
        let outcome = pull(&input, &ReconcileOptions::default());
        assert_eq!(outcome.placement.centerline, input.curve);
        assert_eq!(outcome.placement.orientation_angle, 9.0);
        assert_eq!(outcome.placement.justification, None);
        assert_eq!(outcome.diagnostics.curve_category, None);
        assert!(outcome.diagnostics.has_warnings());
    }

    #[test]
    fn push_without_metadata_is_centred() {
        let placement = FramingPlacement {
            centerline: DrivingCurve::line(Point3::ORIGIN, Point3::new(3.0, 0.0, 0.0)),
            orientation_angle: 0.25,
            justification: None,
        };
        let outcome = push(&PushInput::new(MemberCategory::Beam, placement.clone()), &ReconcileOptions::default()).unwrap();
        assert_eq!(outcome.parameters.nominal_curve, placement.centerline);
        assert_eq!(outcome.parameters.justification, None);
        assert!((outcome.parameters.rotation_param - 0.25).abs() < 1e-12);
        assert!(outcome.diagnostics.metadata_missing);
        assert!(!outcome.diagnostics.has_warnings());
        assert_eq!(outcome.diagnostics.notes.len(), 1);
        assert_eq!(outcome.ignored_parameters, ignored_parameters(MemberCategory::Beam));
    }

    #[test]
    fn capped_decomposition_is_reported() {
        let justification = Justification::independent(
            EndJustification::new(AxisJustification::Center, AxisJustification::Center, 0.1, -0.05),
            EndJustification::new(AxisJustification::Center, AxisJustification::Center, -0.2, 0.15),
        );
        let placement = FramingPlacement {
            centerline: DrivingCurve::line(Point3::new(0.0, 0.0, 1.0), Point3::new(4.0, 2.0, 2.0)),
            orientation_angle: 0.3,
            justification: Some(justification),
        };
        let input = PushInput::new(MemberCategory::Beam, placement);

        let capped = push(&input, &ReconcileOptions::default().with_max_decompose_iterations(1)).unwrap();
        assert!(capped.diagnostics.has_warnings());
        assert!(!capped.diagnostics.is_clean());

        let full = push(&input, &ReconcileOptions::default()).unwrap();
        assert!(full.diagnostics.is_clean(), "{}", full.diagnostics);
    }

    #[test]
    fn column_elevation_is_checked_on_the_nominal_line() {
        // The nominal line rises 0.02 but the baked end sits 0.05 lower.
        let nominal = Line3::new(Point3::new(0.0, 0.0, 1.0), Point3::new(3.0, 0.0, 1.02));
        let justification = Justification::independent(
            EndJustification::new(AxisJustification::Center, AxisJustification::Center, 0.0, 0.0),
            EndJustification::new(AxisJustification::Center, AxisJustification::Center, 0.0, -0.05),
        );
        let offsets = justification.effective_offsets(&ProfileFrame::DEGENERATE);
        let baked = bake_offsets(nominal, 0.0, offsets, Tolerance::DISTANCE, Tolerance::HOST_ANGLE).unwrap();
        assert!(baked.end.z < baked.start.z);

        let placement = FramingPlacement {
            centerline: DrivingCurve::Line(baked),
            orientation_angle: 0.0,
            justification: Some(justification),
        };
        let options = ReconcileOptions::default().with_tolerance(Tolerance::new(1e-9));
        let outcome = push(&PushInput::new(MemberCategory::Column, placement), &options).unwrap();

        let recovered = outcome.parameters.nominal_curve.as_line().unwrap();
        assert!(Tolerance::new(1e-7).approx_eq_point3(recovered.start, nominal.start));
        assert!(Tolerance::new(1e-7).approx_eq_point3(recovered.end, nominal.end));
        assert!(!outcome.diagnostics.curve_flipped);
    }

    #[test]
    fn sloped_column_is_slanted_whatever_the_host_flag() {
        let mut input = PullInput::new(
            MemberCategory::Column,
            DrivingCurve::line(Point3::ORIGIN, Point3::new(1.0, 0.0, 3.0)),
        );
        input.rotation = 0.3;
        let flagged = PullInput {
            slanted: true,
            ..input.clone()
        };

        let options = ReconcileOptions::default();
        let unflagged = pull(&input, &options);
        assert!(unflagged.diagnostics.has_warnings());
        assert_eq!(unflagged.placement, pull(&flagged, &options).placement);
        assert!(pull(&flagged, &options).diagnostics.is_clean());

        let pushed = push(&PushInput::new(MemberCategory::Column, unflagged.placement), &options).unwrap();
        assert!(pushed.parameters.slanted_column);
        assert!((pushed.parameters.rotation_param - 0.3).abs() < 1e-12);
    }

    #[test]
    fn vertical_column_ignores_slanted_flag() {
        let mut input = PullInput::new(
            MemberCategory::Column,
            DrivingCurve::line(Point3::ORIGIN, Point3::new(0.0, 0.0, 3.0)),
        );
        input.rotation = 0.3;
        input.slanted = true;
        let outcome = pull(&input, &ReconcileOptions::default());
        assert!(outcome.diagnostics.has_warnings());
        assert!((outcome.placement.orientation_angle - 0.3).abs() < 1e-12);
    }

    #[test]
    fn flat_column_is_always_rejected() {
        let placement = FramingPlacement {
            centerline: DrivingCurve::line(Point3::ORIGIN, Point3::new(3.0, 0.0, 0.0)),
            orientation_angle: 0.0,
            justification: None,
        };
        let input = PushInput::new(MemberCategory::Column, placement);
        for policy in [ColumnElevationPolicy::Reject, ColumnElevationPolicy::AutoFlip] {
            let options = ReconcileOptions::default().with_elevation_policy(policy);
            assert_eq!(
                push(&input, &options),
                Err(ReconcileError::ColumnElevation { start_z: 0.0, end_z: 0.0 })
            );
        }
    }

    #[test]
    fn error_message_names_elevations() {
        let err = ReconcileError::ColumnElevation { start_z: 3.0, end_z: 0.0 };
        assert_eq!(err.to_string(), "column start elevation 3 is not below end elevation 0");
    }
}
