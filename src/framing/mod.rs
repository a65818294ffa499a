//! Placement reconciliation for linear framing members.
//!
//! Converts between the host placement (driving curve, end-by-end
//! justification and a rotation parameter) and the portable placement (one
//! centerline with the justification baked in and an orientation angle).
//!
//! Leaves first:
//! - [`classify`]: geometric category of the driving curve
//! - [`profile`] and [`cache`]: profile half-extents, computed once per profile
//! - [`orientation`]: rotation parameter ↔ orientation angle
//! - [`justification`]: justification codes ↔ centerline translation
//! - [`reconcile`]: pull and push of one member
//! - [`batch`]: pull and push of many members

pub mod batch;
pub mod cache;
pub mod classify;
pub mod diagnostics;
pub mod frame;
pub mod host;
pub mod justification;
pub mod orientation;
pub mod profile;
pub mod reconcile;

pub use batch::{BatchReport, PullBatch, PushBatch, pull_batch, push_batch};
pub use cache::{ProfileFrameCache, ProfileFrameCacheStats};
pub use classify::{CurveCategory, GLOBAL_UP, classify_curve};
pub use diagnostics::ReconcileDiagnostics;
pub use frame::MemberFrame;
pub use host::{
    HostMember, HostMemberRecord, HostParameter, MemberCategory, RawJustification,
    ignored_parameters,
};
pub use justification::{
    AxisJustification, EndJustification, EndOffsets, Justification, JustificationEnd,
    JustificationMode, LocalOffset, Unbaked, bake_offsets, unbake_offsets,
};
pub use orientation::{
    AngleKey, AngleRule, host_to_portable, measure_host_frame, portable_to_host, rule_for,
    wrap_angle,
};
pub use profile::{ProfileFrame, SectionPoint};
pub use reconcile::{
    ColumnElevationPolicy, FramingPlacement, HostPlacementParameters, PullInput, PullOutcome,
    PushInput, PushOutcome, ReconcileError, ReconcileOptions, pull, pull_member, push,
};
