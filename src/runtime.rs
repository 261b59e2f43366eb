use bevy::prelude::*;

use crate::core::FinancialSeries;
use crate::params::ChartControls;
use crate::render::{ControlSurface, ParamsRes, SeriesRes, StackChartPlugin};

fn build_app(mut series: FinancialSeries, controls: ChartControls) -> App {
    series.sanitize();
    let params = *controls.params();
    let bg = params.background.color;

    let mut app = App::new();
    app.insert_resource(ClearColor(Color::linear_rgba(bg.r, bg.g, bg.b, bg.a)))
        .insert_resource(SeriesRes(series))
        .insert_resource(ParamsRes(params))
        .insert_resource(ControlSurface(controls));
    app
}

/// Run the chart locally with default parameters (native only).
#[cfg(not(target_arch = "wasm32"))]
pub fn run_chart(series: FinancialSeries) {
    run_chart_with(series, ChartControls::default());
}

/// Run the chart locally, keeping `controls` as the live handle an
/// external panel/legend uses while the app runs (native only).
#[cfg(not(target_arch = "wasm32"))]
pub fn run_chart_with(series: FinancialSeries, controls: ChartControls) {
    let mut app = build_app(series, controls);
    app.add_plugins((
        DefaultPlugins.set(ImagePlugin::default_nearest()),
        StackChartPlugin,
    ))
    .run();
}

/// Run the chart into a named HTML canvas (wasm32 only).
#[cfg(target_arch = "wasm32")]
pub fn run_chart_with(series: FinancialSeries, controls: ChartControls, canvas_id: &str) {
    let mut app = build_app(series, controls);
    app.add_plugins((
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    canvas: Some(format!("#{}", canvas_id)),
                    fit_canvas_to_parent: true,
                    ..default()
                }),
                ..default()
            })
            .set(ImagePlugin::default_nearest()),
        StackChartPlugin,
    ))
    .run();
}
