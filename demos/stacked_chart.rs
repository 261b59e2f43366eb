use strata_charts::core::FinancialSeries;
use strata_charts::params::ChartControls;
use strata_charts::prelude::*;

fn main() {
    let series = generate_portfolio_year();

    // The same handle a control panel would hold: tweak a few parameters
    // before the app takes over the thread.
    let controls = ChartControls::default();
    {
        let mut params = controls.params();
        params.camera.auto_rotate = true;
        params.camera.rotate_speed = 0.12;
        params.risk.enabled = true;
    }
    controls
        .set_param("chart.depth", serde_json::json!(0.4))
        .expect("known parameter");

    run_chart_with(series, controls);
}

/// Twelve months of plausible portfolio cash flow: rent mostly lands,
/// summer brings maintenance spikes, vacancy creeps up late in the year.
fn generate_portfolio_year() -> FinancialSeries {
    let months = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];

    let mut collected = Vec::new();
    let mut pending = Vec::new();
    let mut maintenance = Vec::new();
    let mut overdue = Vec::new();
    let mut vacancy = Vec::new();

    for (i, _) in months.iter().enumerate() {
        let season = (i as f32 / 12.0 * std::f32::consts::TAU).sin();
        collected.push(14_000.0 + season * 1_200.0);
        pending.push(2_200.0 + (i as f32 * 1.7).sin() * 600.0);
        maintenance.push(1_500.0 + if (5..8).contains(&i) { 1_800.0 } else { 0.0 });
        overdue.push(700.0 + (i as f32 * 0.9).cos().abs() * 500.0);
        vacancy.push(1_200.0 + (i as f32 / 11.0) * 900.0);
    }

    FinancialSeries::new(
        months.iter().map(|m| m.to_string()).collect(),
        collected,
        pending,
        maintenance,
        overdue,
        vacancy,
    )
    .expect("aligned arrays")
    .with_title("Portfolio Financial Reality")
}
