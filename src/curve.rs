//! Curve interpolation: cosine-eased densification of the monthly
//! boundaries, and the Catmull-Rom smoothing used by the tube extruders.

use bevy_math::{Quat, Vec2, Vec3};
use std::f32::consts::PI;

use crate::scale::ValueScale;

/// Sub-samples emitted per month segment.
pub const SUBDIVISIONS: usize = 6;

/// Cosine ease. An S-curve that passes exactly through both endpoints
/// with zero slope at each, so the densified curve never overshoots the
/// source samples the way a cubic spline can.
#[inline]
pub fn eased(t: f32) -> f32 {
    (1.0 - (t * PI).cos()) * 0.5
}

/// Densify one boundary (currency values per month) into chart-space
/// points: x linear across the chart width, y eased between samples.
/// Every month index lands exactly on its source value.
pub fn interpolate_boundary(values: &[f32], scale: &ValueScale, subdivisions: usize) -> Vec<Vec2> {
    let n = values.len();
    let sub = subdivisions.max(1);
    match n {
        0 => return Vec::new(),
        1 => return vec![Vec2::new(scale.month_x(0, 1), scale.project(values[0]))],
        _ => {}
    }

    let mut pts = Vec::with_capacity((n - 1) * sub + 1);
    for i in 0..n - 1 {
        let x0 = scale.month_x(i, n);
        let x1 = scale.month_x(i + 1, n);
        for s in 0..sub {
            let t = s as f32 / sub as f32;
            let x = x0 + (x1 - x0) * t;
            let v = values[i] + (values[i + 1] - values[i]) * eased(t);
            pts.push(Vec2::new(x, scale.project(v)));
        }
    }
    pts.push(Vec2::new(
        scale.month_x(n - 1, n),
        scale.project(values[n - 1]),
    ));
    pts
}

/// Catmull-Rom spline through a point set, cubic Hermite form. Used to
/// smooth the outline and risk curves before tube extrusion.
#[derive(Clone, Debug)]
pub struct SmoothedCurve {
    pts: Vec<Vec3>,
    tension: f32,
}

impl SmoothedCurve {
    /// Centripetal-style default tension.
    pub fn through(pts: Vec<Vec3>) -> Option<Self> {
        (pts.len() >= 2).then_some(Self { pts, tension: 0.5 })
    }

    pub fn point_at(&self, u: f32) -> Vec3 {
        let u = u.clamp(0.0, 1.0);
        let segs = (self.pts.len() - 1) as f32;
        let scaled = u * segs;
        let i = scaled.floor() as isize;
        let t = scaled - i as f32;

        let i1 = i.clamp(0, (self.pts.len() - 2) as isize) as usize;
        let i0 = i1.saturating_sub(1);
        let i2 = (i1 + 1).min(self.pts.len() - 1);
        let i3 = (i1 + 2).min(self.pts.len() - 1);

        let p0 = self.pts[i0];
        let p1 = self.pts[i1];
        let p2 = self.pts[i2];
        let p3 = self.pts[i3];

        let v0 = (p2 - p0) * self.tension;
        let v1 = (p3 - p1) * self.tension;

        let t2 = t * t;
        let t3 = t2 * t;
        let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
        let h10 = t3 - 2.0 * t2 + t;
        let h01 = -2.0 * t3 + 3.0 * t2;
        let h11 = t3 - t2;

        p1 * h00 + v0 * h10 + p2 * h01 + v1 * h11
    }

    pub fn tangent_at(&self, u: f32) -> Vec3 {
        let eps = 0.0005;
        let a = self.point_at((u - eps).max(0.0));
        let b = self.point_at((u + eps).min(1.0));
        (b - a).normalize_or_zero()
    }
}

/// Parallel-transport frames along a curve; keeps tube cross-sections
/// from twisting between rings.
#[derive(Clone, Debug)]
pub struct CurveFrames {
    pub tangents: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub binormals: Vec<Vec3>,
}

impl CurveFrames {
    pub fn build(curve: &SmoothedCurve, samples: usize) -> CurveFrames {
        let samples = samples.max(2);
        let mut tangents = Vec::with_capacity(samples);
        for i in 0..samples {
            let u = i as f32 / (samples as f32 - 1.0);
            tangents.push(curve.tangent_at(u));
        }

        let mut normals = Vec::with_capacity(samples);
        let mut binormals = Vec::with_capacity(samples);

        let mut n0 = Vec3::Y;
        if n0.dot(tangents[0]).abs() > 0.9 {
            n0 = Vec3::X;
        }
        n0 = (n0 - tangents[0] * n0.dot(tangents[0])).normalize_or_zero();
        normals.push(n0);
        binormals.push(tangents[0].cross(n0).normalize_or_zero());

        for i in 1..samples {
            let t_prev = tangents[i - 1];
            let t_cur = tangents[i];

            let axis = t_prev.cross(t_cur);
            let axis_len = axis.length();

            let mut n_prev = normals[i - 1];
            if axis_len > 1e-8 {
                let angle = t_prev.dot(t_cur).clamp(-1.0, 1.0).acos();
                n_prev = Quat::from_axis_angle(axis / axis_len, angle) * n_prev;
            }

            let mut n_cur = (n_prev - t_cur * n_prev.dot(t_cur)).normalize_or_zero();
            if n_cur.length_squared() < 1e-10 {
                let fallback = normals[i - 1];
                n_cur = (fallback - t_cur * fallback.dot(t_cur)).normalize_or_zero();
            }
            // Sign continuity keeps adjacent rings from flipping.
            if n_cur.dot(normals[i - 1]) < 0.0 {
                n_cur = -n_cur;
            }

            binormals.push(t_cur.cross(n_cur).normalize_or_zero());
            normals.push(n_cur);
        }

        CurveFrames {
            tangents,
            normals,
            binormals,
        }
    }

    pub fn len(&self) -> usize {
        self.tangents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tangents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FinancialSeries;
    use approx::assert_relative_eq;

    fn scale_for(values: &[f32]) -> ValueScale {
        let n = values.len();
        let s = FinancialSeries::new(
            (0..n).map(|i| format!("M{i}")).collect(),
            values.to_vec(),
            vec![0.0; n],
            vec![0.0; n],
            vec![0.0; n],
            vec![0.0; n],
        )
        .unwrap();
        ValueScale::resolve(&s).unwrap()
    }

    #[test]
    fn ease_hits_both_endpoints() {
        assert_relative_eq!(eased(0.0), 0.0);
        assert_relative_eq!(eased(1.0), 1.0);
        assert_relative_eq!(eased(0.5), 0.5);
    }

    #[test]
    fn ease_never_overshoots() {
        for s in 0..=100 {
            let e = eased(s as f32 / 100.0);
            assert!((0.0..=1.0).contains(&e));
        }
    }

    #[test]
    fn interpolation_round_trips_through_every_month() {
        let values = [10_000.0, 12_000.0, 4_500.0, 30_000.0];
        let scale = scale_for(&values);
        let pts = interpolate_boundary(&values, &scale, SUBDIVISIONS);
        assert_eq!(pts.len(), (values.len() - 1) * SUBDIVISIONS + 1);
        for (i, &v) in values.iter().enumerate() {
            let p = pts[i * SUBDIVISIONS];
            assert_relative_eq!(p.x, scale.month_x(i, values.len()), epsilon = 1e-5);
            assert_relative_eq!(p.y, scale.project(v), epsilon = 1e-5);
        }
    }

    #[test]
    fn dashboard_example_round_trip() {
        let values = [10_000.0, 12_000.0];
        let scale = scale_for(&values);
        let pts = interpolate_boundary(&values, &scale, SUBDIVISIONS);
        assert_relative_eq!(pts.first().unwrap().y, scale.project(10_000.0));
        assert_relative_eq!(pts.last().unwrap().y, scale.project(12_000.0));
    }

    #[test]
    fn degenerate_inputs_do_not_panic() {
        let scale = scale_for(&[1.0]);
        assert!(interpolate_boundary(&[], &scale, SUBDIVISIONS).is_empty());
        let single = interpolate_boundary(&[500.0], &scale, SUBDIVISIONS);
        assert_eq!(single.len(), 1);
        assert_relative_eq!(single[0].x, 0.0);
    }

    #[test]
    fn smoothed_curve_passes_through_endpoints() {
        let pts = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 2.0, 0.0),
            Vec3::new(2.0, 0.5, 0.0),
        ];
        let curve = SmoothedCurve::through(pts.clone()).unwrap();
        assert!((curve.point_at(0.0) - pts[0]).length() < 1e-4);
        assert!((curve.point_at(1.0) - pts[2]).length() < 1e-4);
        assert!(SmoothedCurve::through(vec![Vec3::ZERO]).is_none());
    }

    #[test]
    fn frames_stay_orthonormal() {
        let curve = SmoothedCurve::through(vec![
            Vec3::new(-2.0, 0.0, 0.0),
            Vec3::new(0.0, 1.5, 0.0),
            Vec3::new(2.0, 0.2, 0.0),
        ])
        .unwrap();
        let frames = CurveFrames::build(&curve, 16);
        assert_eq!(frames.len(), 16);
        for i in 0..frames.len() {
            let t = frames.tangents[i];
            let n = frames.normals[i];
            assert!(t.dot(n).abs() < 1e-3);
            assert_relative_eq!(n.length(), 1.0, epsilon = 1e-3);
        }
    }
}
