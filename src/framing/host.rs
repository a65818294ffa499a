//! Boundary with the host object model.
//!
//! The host's property system, unit conversion and profile resolution stay on
//! the other side of [`HostMember`]; this crate only sees typed values.

use serde::{Deserialize, Serialize};

use crate::geom::DrivingCurve;

use super::frame::MemberFrame;
use super::justification::{JustificationEnd, JustificationMode};
use super::profile::SectionPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberCategory {
    Beam,
    Column,
    Bracing,
    Cable,
}

impl MemberCategory {
    /// Columns follow the vertical-member convention; everything else the
    /// horizontal-member one.
    #[must_use]
    pub const fn is_column(self) -> bool {
        matches!(self, Self::Column)
    }
}

/// Host parameters whose effect is already folded into the reconciled
/// placement. Copying them verbatim next to it would apply them twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HostParameter {
    StartLevelOffset,
    EndLevelOffset,
    BaseLevelOffset,
    TopLevelOffset,
    StartExtension,
    EndExtension,
    BaseExtension,
    TopExtension,
    CrossSectionRotation,
    ColumnRotation,
    BendDirectionAngle,
    JustificationMode,
    YJustification,
    YOffset,
    ZJustification,
    ZOffset,
    StartYJustification,
    StartYOffset,
    StartZJustification,
    StartZOffset,
    EndYJustification,
    EndYOffset,
    EndZJustification,
    EndZOffset,
    BaseAttached,
    TopAttached,
    SlantedColumnStyle,
}

const BEAM_IGNORED: &[HostParameter] = &[
    HostParameter::StartLevelOffset,
    HostParameter::EndLevelOffset,
    HostParameter::StartExtension,
    HostParameter::EndExtension,
    HostParameter::CrossSectionRotation,
    HostParameter::JustificationMode,
    HostParameter::YJustification,
    HostParameter::YOffset,
    HostParameter::ZJustification,
    HostParameter::ZOffset,
    HostParameter::StartYJustification,
    HostParameter::StartYOffset,
    HostParameter::StartZJustification,
    HostParameter::StartZOffset,
    HostParameter::EndYJustification,
    HostParameter::EndYOffset,
    HostParameter::EndZJustification,
    HostParameter::EndZOffset,
];

const BRACE_IGNORED: &[HostParameter] = &[
    HostParameter::StartLevelOffset,
    HostParameter::EndLevelOffset,
    HostParameter::StartExtension,
    HostParameter::EndExtension,
    HostParameter::CrossSectionRotation,
    HostParameter::BendDirectionAngle,
    HostParameter::JustificationMode,
    HostParameter::YJustification,
    HostParameter::YOffset,
    HostParameter::ZJustification,
    HostParameter::ZOffset,
    HostParameter::StartYJustification,
    HostParameter::StartYOffset,
    HostParameter::StartZJustification,
    HostParameter::StartZOffset,
    HostParameter::EndYJustification,
    HostParameter::EndYOffset,
    HostParameter::EndZJustification,
    HostParameter::EndZOffset,
];

const COLUMN_IGNORED: &[HostParameter] = &[
    HostParameter::BaseLevelOffset,
    HostParameter::TopLevelOffset,
    HostParameter::BaseExtension,
    HostParameter::TopExtension,
    HostParameter::CrossSectionRotation,
    HostParameter::ColumnRotation,
    HostParameter::BaseAttached,
    HostParameter::TopAttached,
    HostParameter::SlantedColumnStyle,
    HostParameter::JustificationMode,
    HostParameter::YJustification,
    HostParameter::YOffset,
    HostParameter::ZJustification,
    HostParameter::ZOffset,
    HostParameter::StartYJustification,
    HostParameter::StartYOffset,
    HostParameter::StartZJustification,
    HostParameter::StartZOffset,
    HostParameter::EndYJustification,
    HostParameter::EndYOffset,
    HostParameter::EndZJustification,
    HostParameter::EndZOffset,
];

/// Host parameters a caller must not copy verbatim when it also applies the
/// reconciled rotation and justification of a member of `category`.
#[must_use]
pub const fn ignored_parameters(category: MemberCategory) -> &'static [HostParameter] {
    match category {
        MemberCategory::Beam => BEAM_IGNORED,
        MemberCategory::Bracing | MemberCategory::Cable => BRACE_IGNORED,
        MemberCategory::Column => COLUMN_IGNORED,
    }
}

/// Read access to one framing member of the host model.
pub trait HostMember {
    fn category(&self) -> MemberCategory;

    /// Cross-section rotation in radians, host convention.
    fn rotation_parameter(&self) -> f64;

    fn driving_curve(&self) -> DrivingCurve;

    fn justification_mode(&self) -> JustificationMode;

    /// Raw `(y, z)` justification codes as the host stores them.
    fn justification_codes(&self, end: JustificationEnd) -> (i32, i32);

    /// Raw `(y, z)` justification offsets in model units.
    fn justification_offsets(&self, end: JustificationEnd) -> (f64, f64);

    fn is_slanted_column(&self) -> bool;

    fn is_mirrored(&self) -> bool;

    /// Identity of the member's cross-section profile, if it has one.
    fn profile_key(&self) -> Option<String>;

    /// Closed loops of the profile in its local (Y, Z) plane.
    fn profile_boundary(&self) -> Vec<Vec<SectionPoint>>;

    /// The host's actual local axes, when the host exposes them. Pull then
    /// measures the orientation directly instead of converting the rotation
    /// parameter.
    fn local_frame(&self) -> Option<MemberFrame> {
        None
    }
}

/// Justification values as the host stores them for one end.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RawJustification {
    pub y_code: i32,
    pub z_code: i32,
    pub y_offset: f64,
    pub z_offset: f64,
}

impl RawJustification {
    pub const CENTERED: Self = Self {
        y_code: 1,
        z_code: 1,
        y_offset: 0.0,
        z_offset: 0.0,
    };

    #[must_use]
    pub const fn new(y_code: i32, z_code: i32, y_offset: f64, z_offset: f64) -> Self {
        Self { y_code, z_code, y_offset, z_offset }
    }
}

/// Plain-data snapshot of a host member, for callers that read the host up
/// front and for tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostMemberRecord {
    pub category: MemberCategory,
    pub rotation: f64,
    pub curve: DrivingCurve,
    pub justification_mode: JustificationMode,
    pub shared: RawJustification,
    pub start: RawJustification,
    pub end: RawJustification,
    pub slanted: bool,
    pub mirrored: bool,
    pub profile_key: Option<String>,
    pub profile_boundary: Vec<Vec<SectionPoint>>,
    pub local_frame: Option<MemberFrame>,
}

impl HostMemberRecord {
    /// Unjustified, unrotated member without a profile.
    #[must_use]
    pub fn new(category: MemberCategory, curve: DrivingCurve) -> Self {
        Self {
            category,
            rotation: 0.0,
            curve,
            justification_mode: JustificationMode::Uniform,
            shared: RawJustification::CENTERED,
            start: RawJustification::CENTERED,
            end: RawJustification::CENTERED,
            slanted: false,
            mirrored: false,
            profile_key: None,
            profile_boundary: Vec::new(),
            local_frame: None,
        }
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    #[must_use]
    pub fn with_uniform_justification(mut self, shared: RawJustification) -> Self {
        self.justification_mode = JustificationMode::Uniform;
        self.shared = shared;
        self
    }

    #[must_use]
    pub fn with_independent_justification(
        mut self,
        start: RawJustification,
        end: RawJustification,
    ) -> Self {
        self.justification_mode = JustificationMode::Independent;
        self.start = start;
        self.end = end;
        self
    }

    #[must_use]
    pub fn with_slanted(mut self, slanted: bool) -> Self {
        self.slanted = slanted;
        self
    }

    #[must_use]
    pub fn with_mirrored(mut self, mirrored: bool) -> Self {
        self.mirrored = mirrored;
        self
    }

    #[must_use]
    pub fn with_profile(mut self, key: impl Into<String>, boundary: Vec<Vec<SectionPoint>>) -> Self {
        self.profile_key = Some(key.into());
        self.profile_boundary = boundary;
        self
    }

    #[must_use]
    pub fn with_local_frame(mut self, frame: MemberFrame) -> Self {
        self.local_frame = Some(frame);
        self
    }

    fn raw(&self, end: JustificationEnd) -> RawJustification {
        match end {
            JustificationEnd::Shared => self.shared,
            JustificationEnd::Start => self.start,
            JustificationEnd::End => self.end,
        }
    }
}

impl HostMember for HostMemberRecord {
    fn category(&self) -> MemberCategory {
        self.category
    }

    fn rotation_parameter(&self) -> f64 {
        self.rotation
    }

    fn driving_curve(&self) -> DrivingCurve {
        self.curve.clone()
    }

    fn justification_mode(&self) -> JustificationMode {
        self.justification_mode
    }

    fn justification_codes(&self, end: JustificationEnd) -> (i32, i32) {
        let raw = self.raw(end);
        (raw.y_code, raw.z_code)
    }

    fn justification_offsets(&self, end: JustificationEnd) -> (f64, f64) {
        let raw = self.raw(end);
        (raw.y_offset, raw.z_offset)
    }

    fn is_slanted_column(&self) -> bool {
        self.slanted
    }

    fn is_mirrored(&self) -> bool {
        self.mirrored
    }

    fn profile_key(&self) -> Option<String> {
        self.profile_key.clone()
    }

    fn profile_boundary(&self) -> Vec<Vec<SectionPoint>> {
        self.profile_boundary.clone()
    }

    fn local_frame(&self) -> Option<MemberFrame> {
        self.local_frame
    }
}
