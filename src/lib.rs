#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Bidirectional placement reconciliation for structural framing members.
//!
//! [`framing::pull`] turns a host member's driving curve, rotation parameter
//! and justification into a baked centerline and portable orientation angle;
//! [`framing::push`] goes back the other way. [`geom`] holds the small vector
//! and curve kernel both directions share.

pub mod framing;
pub mod geom;

pub use framing::{
    FramingPlacement, HostMember, HostMemberRecord, HostPlacementParameters, ReconcileError,
    ReconcileOptions, pull, pull_member, push,
};
pub use geom::{DrivingCurve, Point3, Tolerance, Vec3};
