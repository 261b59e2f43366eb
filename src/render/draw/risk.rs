//! Risk-pressure overlay: the per-month grand total as a glowing tube
//! with sphere joints, floating above the stacked bands.

use bevy::prelude::*;

use crate::core::FinancialSeries;
use crate::curve::{SUBDIVISIONS, SmoothedCurve, interpolate_boundary};
use crate::scale::ValueScale;

use super::outline::{RADIAL_SEGMENTS, build_tube_mesh};

/// Everything the overlay spawns: one tube plus a joint position per
/// month.
pub struct RiskGeometry {
    pub tube: Mesh,
    pub joints: Vec<Vec3>,
}

/// Build the overlay geometry. `None` when the overlay is disabled (no
/// wasted work), when the series has fewer than two months (no curve
/// can be defined), or when the thickness clamps to nothing.
pub fn build_risk_geometry(
    series: &FinancialSeries,
    scale: &ValueScale,
    enabled: bool,
    thickness: f32,
    y_offset: f32,
) -> Option<RiskGeometry> {
    if !enabled || series.len() < 2 {
        return None;
    }
    let thickness = if thickness.is_finite() {
        thickness.clamp(0.01, 0.5)
    } else {
        return None;
    };

    let totals = series.totals();
    let line = interpolate_boundary(&totals, scale, SUBDIVISIONS);
    let pts: Vec<Vec3> = line
        .iter()
        .map(|p| Vec3::new(p.x, p.y + y_offset, 0.0))
        .collect();
    let rings = pts.len();
    let curve = SmoothedCurve::through(pts)?;
    let tube = build_tube_mesh(&curve, rings, RADIAL_SEGMENTS, thickness);

    let n = series.len();
    let joints = totals
        .iter()
        .enumerate()
        .map(|(i, &total)| Vec3::new(scale.month_x(i, n), scale.project(total) + y_offset, 0.0))
        .collect();

    Some(RiskGeometry { tube, joints })
}
