//! Cross-section extents used by justification.

use serde::{Deserialize, Serialize};

/// Point in a profile's local (Y, Z) plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SectionPoint {
    pub y: f64,
    pub z: f64,
}

impl SectionPoint {
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    #[must_use]
    pub const fn new(y: f64, z: f64) -> Self {
        Self { y, z }
    }
}

/// Half-extents and box centre of a profile's outer boundary.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ProfileFrame {
    /// Half-width along local Y.
    pub dy: f64,
    /// Half-depth along local Z.
    pub dz: f64,
    /// Bounding box midpoint relative to the profile's nominal origin.
    pub centroid: SectionPoint,
}

impl ProfileFrame {
    /// Frame of an unknown or degenerate profile: justification degrades to
    /// the raw offsets.
    pub const DEGENERATE: Self = Self {
        dy: 0.0,
        dz: 0.0,
        centroid: SectionPoint::ORIGIN,
    };

    #[must_use]
    pub const fn new(dy: f64, dz: f64, centroid: SectionPoint) -> Self {
        Self { dy, dz, centroid }
    }

    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !(self.dy > 0.0 && self.dz > 0.0 && self.dy.is_finite() && self.dz.is_finite())
    }

    /// Derives the frame from the profile loops. Only the outer loop (largest
    /// enclosed area) contributes to the extents.
    #[must_use]
    pub fn from_boundary(loops: &[Vec<SectionPoint>]) -> Self {
        let Some(outer) = outer_loop(loops) else {
            log::warn!("profile boundary is empty; justification falls back to raw offsets");
            return Self::DEGENERATE;
        };

        let mut min = outer[0];
        let mut max = outer[0];
        for p in &outer[1..] {
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }

        let dy = (max.y - min.y) * 0.5;
        let dz = (max.z - min.z) * 0.5;
        if !(dy > 0.0 && dz > 0.0) {
            log::warn!(
                "profile boundary has non-positive extents ({dy}, {dz}); justification falls back to raw offsets"
            );
            return Self::DEGENERATE;
        }

        Self {
            dy,
            dz,
            centroid: SectionPoint::new((min.y + max.y) * 0.5, (min.z + max.z) * 0.5),
        }
    }
}

fn outer_loop(loops: &[Vec<SectionPoint>]) -> Option<&[SectionPoint]> {
    loops
        .iter()
        .filter(|l| !l.is_empty() && l.iter().all(|p| p.y.is_finite() && p.z.is_finite()))
        .max_by(|a, b| {
            loop_area(a)
                .total_cmp(&loop_area(b))
                .then_with(|| box_area(a).total_cmp(&box_area(b)))
        })
        .map(Vec::as_slice)
}

/// Absolute shoelace area of a closed loop.
fn loop_area(points: &[SectionPoint]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f64 = (0..n)
        .map(|i| {
            let a = points[i];
            let b = points[(i + 1) % n];
            a.y * b.z - b.y * a.z
        })
        .sum();
    (twice * 0.5).abs()
}

fn box_area(points: &[SectionPoint]) -> f64 {
    let (mut min_y, mut max_y, mut min_z, mut max_z) = (f64::MAX, f64::MIN, f64::MAX, f64::MIN);
    for p in points {
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
        min_z = min_z.min(p.z);
        max_z = max_z.max(p.z);
    }
    ((max_y - min_y) * (max_z - min_z)).max(0.0)
}
