//! Axis scale resolution for the stacked chart.
//!
//! The value axis is fixed to steps of 10 000: the ceiling is the next
//! multiple above the largest monthly grand total, clamped to at least
//! one step so an all-zero series still yields a usable scale.

use crate::core::FinancialSeries;

/// Currency units per tick.
pub const AXIS_STEP: f32 = 10_000.0;

/// World-space height of the chart body.
pub const CHART_HEIGHT: f32 = 5.0;

/// World-space width of the chart body (months are spread across it).
pub const CHART_WIDTH: f32 = 12.0;

/// Resolved value axis: ceiling, tick set and the value→world factor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueScale {
    pub axis_max: f32,
    pub y_scale: f32,
}

impl ValueScale {
    /// Resolve the axis from the series. `None` when there are no months;
    /// callers skip all downstream geometry in that case.
    pub fn resolve(series: &FinancialSeries) -> Option<ValueScale> {
        if series.is_empty() {
            return None;
        }
        let max_total = series.max_total();
        let axis_max = ((max_total / AXIS_STEP).ceil() * AXIS_STEP).max(AXIS_STEP);
        Some(ValueScale {
            axis_max,
            y_scale: CHART_HEIGHT / axis_max,
        })
    }

    /// Value-axis tick positions: one per step up to the ceiling.
    pub fn ticks(&self) -> Vec<f32> {
        let count = self.tick_count();
        (1..=count).map(|i| i as f32 * AXIS_STEP).collect()
    }

    pub fn tick_count(&self) -> usize {
        (self.axis_max / AXIS_STEP).round() as usize
    }

    /// Project a currency value into world-space height.
    #[inline]
    pub fn project(&self, value: f32) -> f32 {
        value * self.y_scale
    }

    /// World-space x of a month index, months spread evenly across the
    /// chart width. A single month sits at the center.
    pub fn month_x(&self, i: usize, months: usize) -> f32 {
        if months < 2 {
            return 0.0;
        }
        let step = CHART_WIDTH / (months - 1) as f32;
        -CHART_WIDTH * 0.5 + i as f32 * step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FinancialSeries;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn series(collected: Vec<f32>) -> FinancialSeries {
        let n = collected.len();
        FinancialSeries::new(
            (0..n).map(|i| format!("M{i}")).collect(),
            collected,
            vec![0.0; n],
            vec![0.0; n],
            vec![0.0; n],
            vec![0.0; n],
        )
        .unwrap()
    }

    #[test]
    fn empty_series_has_no_scale() {
        assert!(ValueScale::resolve(&series(vec![])).is_none());
    }

    #[test]
    fn all_zero_series_clamps_to_one_step() {
        let scale = ValueScale::resolve(&series(vec![0.0, 0.0, 0.0])).unwrap();
        assert_relative_eq!(scale.axis_max, AXIS_STEP);
        assert_eq!(scale.ticks(), vec![AXIS_STEP]);
        assert!(scale.y_scale.is_finite());
    }

    #[test]
    fn two_month_example_from_the_dashboard() {
        let scale = ValueScale::resolve(&series(vec![10_000.0, 12_000.0])).unwrap();
        assert_relative_eq!(scale.axis_max, 20_000.0);
        assert_eq!(scale.ticks(), vec![10_000.0, 20_000.0]);
    }

    #[test]
    fn tick_count_matches_axis_ceiling() {
        let scale = ValueScale::resolve(&series(vec![47_500.0])).unwrap();
        assert_relative_eq!(scale.axis_max, 50_000.0);
        assert_eq!(scale.tick_count(), 5);
        assert_eq!(scale.ticks().len(), 5);
    }

    #[test]
    fn month_x_spans_the_chart_width() {
        let scale = ValueScale::resolve(&series(vec![1.0; 4])).unwrap();
        assert_relative_eq!(scale.month_x(0, 4), -CHART_WIDTH * 0.5);
        assert_relative_eq!(scale.month_x(3, 4), CHART_WIDTH * 0.5);
        assert_relative_eq!(scale.month_x(0, 1), 0.0);
    }

    proptest! {
        #[test]
        fn axis_max_is_positive_multiple_of_step_and_covers_data(
            values in proptest::collection::vec(0.0f32..500_000.0, 1..24)
        ) {
            let s = series(values);
            let scale = ValueScale::resolve(&s).unwrap();
            prop_assert!(scale.axis_max >= s.max_total());
            prop_assert!(scale.axis_max > 0.0);
            let steps = scale.axis_max / AXIS_STEP;
            prop_assert!((steps - steps.round()).abs() < 1e-3);
            prop_assert_eq!(scale.ticks().len(), scale.tick_count());
        }
    }
}
