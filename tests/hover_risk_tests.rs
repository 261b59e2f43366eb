use approx::assert_relative_eq;

use strata_charts::core::{FinancialSeries, LayerKey};
use strata_charts::params::RenderParameters;
use strata_charts::render::HoveredLayer;
use strata_charts::render::draw::risk::build_risk_geometry;
use strata_charts::render::material::{DIMMED_OPACITY, GRADIENT_FLOOR_HOVERED, shade_for};
use strata_charts::scale::ValueScale;

fn sample_series() -> FinancialSeries {
    FinancialSeries::new(
        vec!["Jan".into(), "Feb".into(), "Mar".into()],
        vec![10_000.0, 12_000.0, 11_000.0],
        vec![2_000.0, 1_500.0, 2_500.0],
        vec![1_000.0, 800.0, 1_200.0],
        vec![500.0, 900.0, 400.0],
        vec![1_500.0, 1_500.0, 1_800.0],
    )
    .expect("series")
}

#[test]
fn hovering_one_layer_dims_exactly_the_other_four() {
    let hovered = HoveredLayer(Some(LayerKey::Overdue));
    let dimmed: Vec<LayerKey> = LayerKey::ALL
        .into_iter()
        .filter(|&k| hovered.dims(k))
        .collect();

    assert_eq!(dimmed.len(), 4);
    assert!(!dimmed.contains(&LayerKey::Overdue));
    assert!(!hovered.dims(LayerKey::Overdue));
}

#[test]
fn no_hover_dims_nothing() {
    let hovered = HoveredLayer(None);
    assert!(LayerKey::ALL.iter().all(|&k| !hovered.dims(k)));
}

#[test]
fn shading_matches_hover_state_per_layer() {
    let hovered = HoveredLayer(Some(LayerKey::Pending));
    for key in LayerKey::ALL {
        let (floor, dim) = shade_for(hovered.0 == Some(key), hovered.dims(key));
        if key == LayerKey::Pending {
            assert_relative_eq!(floor, GRADIENT_FLOOR_HOVERED);
            assert!(dim.is_none());
        } else {
            assert_eq!(dim, Some(DIMMED_OPACITY));
        }
    }
}

#[test]
fn disabled_risk_flag_builds_zero_geometry() {
    let series = sample_series();
    let scale = ValueScale::resolve(&series).expect("scale");
    assert!(build_risk_geometry(&series, &scale, false, 0.06, 0.3).is_none());
}

#[test]
fn risk_overlay_places_one_joint_per_month_above_the_totals() {
    let series = sample_series();
    let scale = ValueScale::resolve(&series).expect("scale");
    let y_offset = 0.3;

    let geometry =
        build_risk_geometry(&series, &scale, true, 0.06, y_offset).expect("risk geometry");
    assert_eq!(geometry.joints.len(), series.len());

    for (i, joint) in geometry.joints.iter().enumerate() {
        let expected_y = scale.project(series.month_total(i)) + y_offset;
        assert_relative_eq!(joint.y, expected_y, epsilon = 1e-4);
        assert_relative_eq!(joint.x, scale.month_x(i, series.len()), epsilon = 1e-4);
    }
}

#[test]
fn risk_overlay_needs_two_months() {
    let single = FinancialSeries::new(
        vec!["Jan".into()],
        vec![10_000.0],
        vec![0.0],
        vec![0.0],
        vec![0.0],
        vec![0.0],
    )
    .expect("series");
    let scale = ValueScale::resolve(&single).expect("scale");
    assert!(build_risk_geometry(&single, &scale, true, 0.06, 0.3).is_none());
}

#[test]
fn risk_overlay_rejects_malformed_thickness() {
    let series = sample_series();
    let scale = ValueScale::resolve(&series).expect("scale");
    assert!(build_risk_geometry(&series, &scale, true, f32::NAN, 0.3).is_none());
}

#[test]
fn risk_parameters_are_addressable_by_name() {
    let mut params = RenderParameters::default();
    assert!(params.risk.enabled);

    params
        .set_field("risk.enabled", serde_json::json!(false))
        .expect("toggle risk");
    assert!(!params.risk.enabled);

    params
        .set_field("risk.y_offset", serde_json::json!(0.45))
        .expect("move risk line");
    assert_relative_eq!(params.risk.y_offset, 0.45);
}
