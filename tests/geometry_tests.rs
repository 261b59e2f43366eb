use approx::assert_relative_eq;
use bevy::prelude::*;
use bevy_mesh::VertexAttributeValues;

use strata_charts::core::{FinancialSeries, LAYERS};
use strata_charts::curve::{SUBDIVISIONS, interpolate_boundary};
use strata_charts::render::draw::outline::build_outline_tube;
use strata_charts::render::draw::surface::build_band_mesh;
use strata_charts::scale::ValueScale;

fn sample_series() -> FinancialSeries {
    FinancialSeries::new(
        vec!["Jan".into(), "Feb".into(), "Mar".into(), "Apr".into()],
        vec![12_000.0, 13_500.0, 11_800.0, 14_200.0],
        vec![2_500.0, 1_800.0, 3_100.0, 2_200.0],
        vec![1_400.0, 2_600.0, 900.0, 1_700.0],
        vec![800.0, 1_200.0, 1_500.0, 600.0],
        vec![2_000.0, 2_000.0, 2_400.0, 2_400.0],
    )
    .expect("series")
}

fn positions(mesh: &Mesh) -> Vec<[f32; 3]> {
    match mesh.attribute(Mesh::ATTRIBUTE_POSITION).expect("positions") {
        VertexAttributeValues::Float32x3(v) => v.clone(),
        other => panic!("unexpected position format: {other:?}"),
    }
}

fn uvs(mesh: &Mesh) -> Vec<[f32; 2]> {
    match mesh.attribute(Mesh::ATTRIBUTE_UV_0).expect("uvs") {
        VertexAttributeValues::Float32x2(v) => v.clone(),
        other => panic!("unexpected uv format: {other:?}"),
    }
}

#[test]
fn band_mesh_interleaves_bottom_and_top_with_local_uv_span() {
    let series = sample_series();
    let scale = ValueScale::resolve(&series).expect("scale");
    let columns = series.boundaries();

    // The middle layer sits well above the chart floor; its UVs must
    // still span the full 0..1 range over its own band.
    let bottom_vals: Vec<f32> = columns.iter().map(|c| c[2]).collect();
    let top_vals: Vec<f32> = columns.iter().map(|c| c[3]).collect();
    let bottom = interpolate_boundary(&bottom_vals, &scale, SUBDIVISIONS);
    let top = interpolate_boundary(&top_vals, &scale, SUBDIVISIONS);

    let mesh = build_band_mesh(&bottom, &top).expect("band mesh");
    let pos = positions(&mesh);
    let uv = uvs(&mesh);

    let columns_out = bottom.len();
    assert_eq!(pos.len(), columns_out * 2);
    assert_eq!(uv.len(), pos.len());

    for i in 0..columns_out {
        let b = pos[i * 2];
        let t = pos[i * 2 + 1];
        assert!(t[1] >= b[1], "top boundary below bottom at column {i}");
        assert_relative_eq!(uv[i * 2][1], 0.0);
        assert_relative_eq!(uv[i * 2 + 1][1], 1.0);
    }
    assert_relative_eq!(uv[0][0], 0.0);
    assert_relative_eq!(uv[(columns_out - 1) * 2][0], 1.0);
}

#[test]
fn band_mesh_round_trips_month_values() {
    let series = sample_series();
    let scale = ValueScale::resolve(&series).expect("scale");
    let columns = series.boundaries();

    let top_vals: Vec<f32> = columns.iter().map(|c| c[5]).collect();
    let bottom_vals: Vec<f32> = columns.iter().map(|c| c[4]).collect();
    let top = interpolate_boundary(&top_vals, &scale, SUBDIVISIONS);
    let bottom = interpolate_boundary(&bottom_vals, &scale, SUBDIVISIONS);
    let mesh = build_band_mesh(&bottom, &top).expect("band mesh");
    let pos = positions(&mesh);

    for (m, &value) in top_vals.iter().enumerate() {
        let top_vertex = pos[m * SUBDIVISIONS * 2 + 1];
        assert_relative_eq!(top_vertex[1], scale.project(value), epsilon = 1e-4);
    }
}

#[test]
fn adjacent_layers_share_a_boundary() {
    let series = sample_series();
    let columns = series.boundaries();
    for pair in LAYERS.windows(2) {
        let upper_bottom = pair[1].key.index();
        let lower_top = pair[0].key.index() + 1;
        assert_eq!(upper_bottom, lower_top);
    }
    for col in &columns {
        for w in col.windows(2) {
            assert!(w[1] >= w[0], "stacking invariant violated: {col:?}");
        }
    }
}

#[test]
fn degenerate_boundaries_build_no_band() {
    assert!(build_band_mesh(&[], &[]).is_none());
    assert!(build_band_mesh(&[Vec2::ZERO], &[Vec2::Y]).is_none());
}

#[test]
fn outline_tube_follows_the_boundary() {
    let series = sample_series();
    let scale = ValueScale::resolve(&series).expect("scale");
    let columns = series.boundaries();
    let top_vals: Vec<f32> = columns.iter().map(|c| c[5]).collect();
    let top = interpolate_boundary(&top_vals, &scale, SUBDIVISIONS);

    let tube = build_outline_tube(&top, 0.04).expect("tube");
    let pos = positions(&tube);
    // One ring of (radial + 1) vertices per input point.
    assert_eq!(pos.len() % top.len(), 0);

    // Every tube vertex stays within the radius of the smoothed curve's
    // bounding box, i.e. no NaN and no runaway frames.
    for v in &pos {
        assert!(v.iter().all(|c| c.is_finite()));
    }
}

#[test]
fn outline_needs_at_least_two_points() {
    assert!(build_outline_tube(&[], 0.04).is_none());
    assert!(build_outline_tube(&[Vec2::new(0.0, 1.0)], 0.04).is_none());
}

#[test]
fn all_zero_series_still_builds_flat_bands() {
    let series = FinancialSeries::new(
        vec!["Jan".into(), "Feb".into(), "Mar".into()],
        vec![0.0; 3],
        vec![0.0; 3],
        vec![0.0; 3],
        vec![0.0; 3],
        vec![0.0; 3],
    )
    .expect("series");

    let scale = ValueScale::resolve(&series).expect("scale clamps, never zero");
    assert!(scale.y_scale.is_finite());

    let columns = series.boundaries();
    let bottom_vals: Vec<f32> = columns.iter().map(|c| c[0]).collect();
    let top_vals: Vec<f32> = columns.iter().map(|c| c[1]).collect();
    let bottom = interpolate_boundary(&bottom_vals, &scale, SUBDIVISIONS);
    let top = interpolate_boundary(&top_vals, &scale, SUBDIVISIONS);
    let mesh = build_band_mesh(&bottom, &top).expect("flat band");
    for v in positions(&mesh) {
        assert_relative_eq!(v[1], 0.0);
    }
}
