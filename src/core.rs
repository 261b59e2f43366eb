use error_stack::Report;
use serde::{Deserialize, Serialize};

use crate::ChartError;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
    pub const fn with_a(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
}

impl From<Color> for bevy::prelude::Color {
    #[inline]
    fn from(c: Color) -> Self {
        bevy::prelude::Color::linear_rgba(c.r, c.g, c.b, c.a)
    }
}

/// The five financial categories, in bottom-to-top stacking order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKey {
    Collected,
    Pending,
    Maintenance,
    Overdue,
    Vacancy,
}

impl LayerKey {
    pub const ALL: [LayerKey; 5] = [
        LayerKey::Collected,
        LayerKey::Pending,
        LayerKey::Maintenance,
        LayerKey::Overdue,
        LayerKey::Vacancy,
    ];

    /// Stacking position, 0 at the bottom of the stack.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            LayerKey::Collected => 0,
            LayerKey::Pending => 1,
            LayerKey::Maintenance => 2,
            LayerKey::Overdue => 3,
            LayerKey::Vacancy => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LayerKey::Collected => "collected",
            LayerKey::Pending => "pending",
            LayerKey::Maintenance => "maintenance",
            LayerKey::Overdue => "overdue",
            LayerKey::Vacancy => "vacancy",
        }
    }

    pub fn parse(s: &str) -> Option<LayerKey> {
        match s {
            "collected" => Some(LayerKey::Collected),
            "pending" => Some(LayerKey::Pending),
            "maintenance" => Some(LayerKey::Maintenance),
            "overdue" => Some(LayerKey::Overdue),
            "vacancy" => Some(LayerKey::Vacancy),
            _ => None,
        }
    }
}

/// Visual definition of one stacked band. The table is fixed for the
/// lifetime of a chart instance.
#[derive(Clone, Copy, Debug)]
pub struct LayerDef {
    pub key: LayerKey,
    pub color: Color,
    pub glow: Color,
    pub label: &'static str,
    pub opacity: f32,
}

pub const LAYERS: [LayerDef; 5] = [
    LayerDef {
        key: LayerKey::Collected,
        color: Color::rgb(0.18, 0.72, 0.45),
        glow: Color::rgb(0.35, 1.0, 0.65),
        label: "Collected",
        opacity: 0.92,
    },
    LayerDef {
        key: LayerKey::Pending,
        color: Color::rgb(0.95, 0.72, 0.20),
        glow: Color::rgb(1.0, 0.85, 0.40),
        label: "Pending",
        opacity: 0.92,
    },
    LayerDef {
        key: LayerKey::Maintenance,
        color: Color::rgb(0.25, 0.55, 0.95),
        glow: Color::rgb(0.45, 0.70, 1.0),
        label: "Maintenance",
        opacity: 0.92,
    },
    LayerDef {
        key: LayerKey::Overdue,
        color: Color::rgb(0.90, 0.30, 0.25),
        glow: Color::rgb(1.0, 0.45, 0.40),
        label: "Overdue",
        opacity: 0.92,
    },
    LayerDef {
        key: LayerKey::Vacancy,
        color: Color::rgb(0.55, 0.45, 0.85),
        glow: Color::rgb(0.70, 0.60, 1.0),
        label: "Vacancy",
        opacity: 0.92,
    },
];

pub fn layer_def(key: LayerKey) -> &'static LayerDef {
    &LAYERS[key.index()]
}

/// Warning color of the risk-pressure overlay line.
pub const RISK_COLOR: Color = Color::rgb(1.0, 0.35, 0.20);

/// Common metadata displayed above the chart.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartMeta {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Per-month boundary column: six monotonically non-decreasing partial
/// sums, from 0 up to the grand total. Adjacent pairs are the bottom and
/// top boundary of one layer.
pub type CumulativeBoundary = [f32; 6];

/// Monthly financial time series: ordered month labels plus five
/// parallel value arrays, index-aligned to the months.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialSeries {
    pub months: Vec<String>,
    pub collected: Vec<f32>,
    pub pending: Vec<f32>,
    pub maintenance: Vec<f32>,
    pub overdue: Vec<f32>,
    pub vacancy: Vec<f32>,
    #[serde(default)]
    pub meta: ChartMeta,
}

impl FinancialSeries {
    pub fn new(
        months: Vec<String>,
        collected: Vec<f32>,
        pending: Vec<f32>,
        maintenance: Vec<f32>,
        overdue: Vec<f32>,
        vacancy: Vec<f32>,
    ) -> crate::Result<Self> {
        let n = months.len();
        let lens = [
            collected.len(),
            pending.len(),
            maintenance.len(),
            overdue.len(),
            vacancy.len(),
        ];
        if lens.iter().any(|&l| l != n) {
            return Err(Report::new(ChartError).attach_printable(format!(
                "category arrays must match months length {n}, got {lens:?}"
            )));
        }
        Ok(Self {
            months,
            collected,
            pending,
            maintenance,
            overdue,
            vacancy,
            meta: ChartMeta::default(),
        })
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.meta.title = Some(title.into());
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.months.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    pub fn values(&self, key: LayerKey) -> &[f32] {
        match key {
            LayerKey::Collected => &self.collected,
            LayerKey::Pending => &self.pending,
            LayerKey::Maintenance => &self.maintenance,
            LayerKey::Overdue => &self.overdue,
            LayerKey::Vacancy => &self.vacancy,
        }
    }

    /// Clamp NaN and negative samples to zero, in place. Returns how many
    /// samples were repaired; a NaN vertex position would silently corrupt
    /// the whole scene, so this runs before any geometry is built.
    pub fn sanitize(&mut self) -> usize {
        let mut repaired = 0;
        for arr in [
            &mut self.collected,
            &mut self.pending,
            &mut self.maintenance,
            &mut self.overdue,
            &mut self.vacancy,
        ] {
            for v in arr.iter_mut() {
                if !v.is_finite() || *v < 0.0 {
                    *v = 0.0;
                    repaired += 1;
                }
            }
        }
        repaired
    }

    /// Sum of all five categories for one month.
    pub fn month_total(&self, i: usize) -> f32 {
        LayerKey::ALL
            .iter()
            .map(|&k| self.values(k).get(i).copied().unwrap_or(0.0))
            .sum()
    }

    /// Largest monthly grand total across the series.
    pub fn max_total(&self) -> f32 {
        (0..self.len())
            .map(|i| self.month_total(i))
            .fold(0.0, f32::max)
    }

    /// Grand total per month, the source of the risk-pressure overlay.
    pub fn totals(&self) -> Vec<f32> {
        (0..self.len()).map(|i| self.month_total(i)).collect()
    }

    /// The stacked boundary columns, one per month. Values within a column
    /// are non-decreasing as long as the series has been sanitized.
    pub fn boundaries(&self) -> Vec<CumulativeBoundary> {
        (0..self.len())
            .map(|i| {
                let mut col = [0.0f32; 6];
                let mut acc = 0.0;
                for (b, &key) in LayerKey::ALL.iter().enumerate() {
                    acc += self.values(key)[i];
                    col[b + 1] = acc;
                }
                col
            })
            .collect()
    }
}

/// Output of the external stability-score collaborator. The surrounding
/// panel reads it; the 3D engine never does.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StabilityScore {
    pub score: f32,
    pub details: StabilityDetails,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StabilityDetails {
    pub net_cash_flow: f32,
    pub avg_rent: f32,
    pub expense_burn: f32,
}

pub trait StabilityProvider {
    fn stability(&self, series: &FinancialSeries) -> StabilityScore;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(n: usize, fill: f32) -> FinancialSeries {
        FinancialSeries::new(
            (0..n).map(|i| format!("M{i}")).collect(),
            vec![fill; n],
            vec![fill; n],
            vec![fill; n],
            vec![fill; n],
            vec![fill; n],
        )
        .unwrap()
    }

    #[test]
    fn new_rejects_mismatched_lengths() {
        let r = FinancialSeries::new(
            vec!["Jan".into(), "Feb".into()],
            vec![1.0, 2.0],
            vec![1.0],
            vec![1.0, 2.0],
            vec![1.0, 2.0],
            vec![1.0, 2.0],
        );
        assert!(r.is_err());
    }

    #[test]
    fn boundaries_are_non_decreasing() {
        let mut s = series(4, 100.0);
        s.overdue[2] = 0.0;
        for col in s.boundaries() {
            for w in col.windows(2) {
                assert!(w[1] >= w[0]);
            }
        }
    }

    #[test]
    fn boundary_top_is_grand_total() {
        let s = series(3, 250.0);
        for (i, col) in s.boundaries().iter().enumerate() {
            assert_eq!(col[5], s.month_total(i));
            assert_eq!(col[0], 0.0);
        }
    }

    #[test]
    fn sanitize_repairs_nan_and_negative() {
        let mut s = series(2, 10.0);
        s.pending[0] = f32::NAN;
        s.vacancy[1] = -5.0;
        assert_eq!(s.sanitize(), 2);
        assert_eq!(s.pending[0], 0.0);
        assert_eq!(s.vacancy[1], 0.0);
        assert_eq!(s.sanitize(), 0);
    }

    #[test]
    fn layer_keys_are_in_stacking_order() {
        for (i, key) in LayerKey::ALL.iter().enumerate() {
            assert_eq!(key.index(), i);
            assert_eq!(layer_def(*key).key, *key);
        }
    }
}
