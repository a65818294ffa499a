use framing_reconcile::framing::{
    ColumnElevationPolicy, FramingPlacement, HostMemberRecord, Justification, MemberCategory,
    ProfileFrame, PushInput, RawJustification, ReconcileError, ReconcileOptions, SectionPoint,
    pull_batch, push_batch,
};
use framing_reconcile::{DrivingCurve, HostMember, Point3, Tolerance};

fn box_profile(half_y: f64, half_z: f64) -> Vec<Vec<SectionPoint>> {
    vec![vec![
        SectionPoint::new(-half_y, -half_z),
        SectionPoint::new(half_y, -half_z),
        SectionPoint::new(half_y, half_z),
        SectionPoint::new(-half_y, half_z),
    ]]
}

fn model() -> Vec<HostMemberRecord> {
    let girder = |x: f64| {
        HostMemberRecord::new(
            MemberCategory::Beam,
            DrivingCurve::line(Point3::new(x, 0.0, 3.0), Point3::new(x, 6.0, 3.0)),
        )
        .with_profile("IPE300", box_profile(0.075, 0.15))
        .with_uniform_justification(RawJustification::new(1, 3, 0.0, 0.0))
    };
    let column = |x: f64| {
        HostMemberRecord::new(
            MemberCategory::Column,
            DrivingCurve::line(Point3::new(x, 0.0, 0.0), Point3::new(x, 0.0, 3.0)),
        )
        .with_rotation(0.5)
        .with_profile("HEB200", box_profile(0.1, 0.1))
    };
    let arc = DrivingCurve::through_points(
        (0..=6)
            .map(|i| {
                let a = f64::from(i) * 0.25;
                Point3::new(10.0 + 3.0 * a.cos(), 3.0 * a.sin(), 3.0)
            })
            .collect(),
    )
    .expect("arc points");

    vec![
        girder(0.0),
        girder(4.0),
        girder(8.0),
        column(0.0),
        column(4.0),
        HostMemberRecord::new(MemberCategory::Beam, arc).with_rotation(0.1),
        HostMemberRecord::new(
            MemberCategory::Bracing,
            DrivingCurve::line(Point3::ORIGIN, Point3::ORIGIN),
        ),
    ]
}

#[test]
fn pull_batch_reports_each_member() {
    let members = model();
    let batch = pull_batch(&members, &ReconcileOptions::default());

    assert_eq!(batch.outcomes.len(), members.len());
    assert_eq!(batch.report.converted, 5);
    assert_eq!(batch.report.degraded, 2);
    assert_eq!(batch.report.failed, 0);

    // Outcomes keep input order.
    let first = batch.outcomes[0].placement.centerline.as_line().expect("line");
    assert!(Tolerance::new(1e-12).approx_eq_point3(first.start, Point3::new(0.0, 0.0, 2.85)));
}

#[test]
fn batch_round_trip_restores_host_placement() {
    let members = model();
    let options = ReconcileOptions::default();
    let pulled = pull_batch(&members, &options);

    let inputs: Vec<PushInput> = members
        .iter()
        .zip(&pulled.outcomes)
        .map(|(member, outcome)| {
            let profile = ProfileFrame::from_boundary(&member.profile_boundary());
            PushInput::new(member.category(), outcome.placement.clone()).with_profile(profile)
        })
        .collect();
    let pushed = push_batch(&inputs, &options);

    assert_eq!(pushed.report.failed, 0);
    for (member, outcome) in members.iter().zip(&pushed.outcomes).take(5) {
        let outcome = outcome.as_ref().expect("straight members push");
        let original = member.curve.as_line().expect("line");
        let nominal = outcome.parameters.nominal_curve.as_line().expect("line");
        assert!(Tolerance::new(1e-6).approx_eq_point3(original.start, nominal.start));
        assert!(Tolerance::new(1e-6).approx_eq_point3(original.end, nominal.end));
        assert!((outcome.parameters.rotation_param - member.rotation).abs() < 1e-9);
    }
}

#[test]
fn push_batch_continues_past_rejected_columns() {
    let column = |start_z: f64, end_z: f64| {
        PushInput::new(
            MemberCategory::Column,
            FramingPlacement {
                centerline: DrivingCurve::line(Point3::new(0.0, 0.0, start_z), Point3::new(1.0, 0.0, end_z)),
                orientation_angle: 0.0,
                justification: Some(Justification::centered()),
            },
        )
    };
    let inputs = vec![column(0.0, 3.0), column(3.0, 0.0), column(0.0, 4.0)];

    let rejected = push_batch(&inputs, &ReconcileOptions::default());
    assert_eq!(rejected.report.converted, 2);
    assert_eq!(rejected.report.failed, 1);
    assert_eq!(
        rejected.outcomes[1],
        Err(ReconcileError::ColumnElevation { start_z: 3.0, end_z: 0.0 })
    );

    let options = ReconcileOptions::default().with_elevation_policy(ColumnElevationPolicy::AutoFlip);
    let flipped = push_batch(&inputs, &options);
    assert_eq!(flipped.report.failed, 0);
    assert_eq!(flipped.report.degraded, 1);
}

#[test]
fn options_and_placements_serialize() {
    let options = ReconcileOptions::default()
        .with_angle_tolerance(Tolerance::new(1e-3))
        .with_elevation_policy(ColumnElevationPolicy::AutoFlip);
    let json = serde_json::to_string(&options).expect("serialize options");
    let back: ReconcileOptions = serde_json::from_str(&json).expect("deserialize options");
    assert_eq!(back, options);

    let placement = FramingPlacement {
        centerline: DrivingCurve::line(Point3::ORIGIN, Point3::new(2.0, 0.0, 0.0)),
        orientation_angle: 0.25,
        justification: None,
    };
    let json = serde_json::to_string(&placement).expect("serialize placement");
    let back: FramingPlacement = serde_json::from_str(&json).expect("deserialize placement");
    assert_eq!(back, placement);
}
