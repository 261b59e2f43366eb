//! The live parameter surface: one structured record driving every
//! visual parameter, plus the shared control handles an external panel
//! uses to mutate it while the chart is running.

use bevy_math::Vec3;
use error_stack::{Report, ResultExt};
use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::ChartError;
use crate::core::{Color, FinancialSeries, LayerKey};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraParams {
    pub position: Vec3,
    pub zoom: f32,
    pub auto_rotate: bool,
    pub rotate_speed: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BackgroundParams {
    pub color: Color,
    pub opacity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LightingParams {
    pub ambient: f32,
    pub key: f32,
    pub fill: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartBodyParams {
    /// Vertical placement of the whole chart body.
    pub y_offset: f32,
    /// Master opacity multiplier for the stacked bands.
    pub opacity: f32,
    /// Z spacing between successive layers.
    pub depth: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskLineParams {
    pub enabled: bool,
    pub thickness: f32,
    /// Vertical float above the stack. Tunable on its own; the original
    /// dashboard never reconciled it with the chart's placement.
    pub y_offset: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZOffsets {
    pub grid: f32,
    pub outline: f32,
    pub risk: f32,
}

/// Every tunable visual parameter, grouped by concern. Owned by the
/// chart instance, mutated only through [`ChartControls`], read every
/// frame. Cosmetic fields apply without any rebuild; only the series
/// itself and the risk-line shape trigger geometry work.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RenderParameters {
    pub camera: CameraParams,
    pub background: BackgroundParams,
    pub lighting: LightingParams,
    pub chart: ChartBodyParams,
    pub risk: RiskLineParams,
    pub layering: ZOffsets,
}

impl Default for RenderParameters {
    fn default() -> Self {
        Self {
            camera: CameraParams {
                position: Vec3::new(9.0, 6.5, 12.0),
                zoom: 1.0,
                auto_rotate: false,
                rotate_speed: 0.15,
            },
            background: BackgroundParams {
                color: Color::rgb(0.05, 0.05, 0.09),
                opacity: 1.0,
            },
            lighting: LightingParams {
                ambient: 300.0,
                key: 800_000.0,
                fill: 350_000.0,
            },
            chart: ChartBodyParams {
                y_offset: 0.0,
                opacity: 1.0,
                depth: 0.35,
            },
            risk: RiskLineParams {
                enabled: true,
                thickness: 0.06,
                y_offset: 0.3,
            },
            layering: ZOffsets {
                grid: -0.25,
                outline: 0.06,
                risk: 0.4,
            },
        }
    }
}

impl RenderParameters {
    /// Write one field by dotted name, e.g. `"risk.thickness"`. Unknown
    /// paths and type mismatches are reported; range is NOT validated
    /// here — consumers clamp at the point of use.
    pub fn set_field(&mut self, path: &str, value: serde_json::Value) -> crate::Result<()> {
        let mut doc = serde_json::to_value(*self).change_context(ChartError)?;
        let pointer = format!("/{}", path.replace('.', "/"));
        let slot = doc.pointer_mut(&pointer).ok_or_else(|| {
            Report::new(ChartError).attach_printable(format!("unknown parameter path: {path}"))
        })?;
        *slot = value;
        *self = serde_json::from_value(doc)
            .change_context(ChartError)
            .attach_printable_lazy(|| format!("rejected value for parameter {path}"))?;
        Ok(())
    }

    /// Read one field by dotted name.
    pub fn field(&self, path: &str) -> Option<serde_json::Value> {
        let doc = serde_json::to_value(*self).ok()?;
        let pointer = format!("/{}", path.replace('.', "/"));
        doc.pointer(&pointer).cloned()
    }
}

#[inline]
pub fn clamp01(v: f32) -> f32 {
    if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 }
}

#[inline]
pub fn clamp_positive(v: f32, max: f32) -> f32 {
    if v.is_finite() { v.clamp(0.0, max) } else { 0.0 }
}

/// External hover request, drained by the legend controller (the single
/// writer of the live hover state).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum HoverRequest {
    #[default]
    Unchanged,
    Enter(LayerKey),
    Leave,
}

/// Clonable handle pair shared between the running chart and external
/// control surfaces (parameter panel, host legend UI, wasm bindings).
#[derive(Clone, Default)]
pub struct ChartControls {
    params: Arc<Mutex<RenderParameters>>,
    pending_series: Arc<Mutex<Option<FinancialSeries>>>,
    hover_request: Arc<Mutex<HoverRequest>>,
    hovered: Arc<Mutex<Option<LayerKey>>>,
}

impl ChartControls {
    pub fn new(params: RenderParameters) -> Self {
        Self {
            params: Arc::new(Mutex::new(params)),
            ..Self::default()
        }
    }

    /// Lock the parameter record for direct structured edits.
    pub fn params(&self) -> MutexGuard<'_, RenderParameters> {
        self.params.lock()
    }

    pub fn set_param(&self, path: &str, value: serde_json::Value) -> crate::Result<()> {
        self.params.lock().set_field(path, value)
    }

    pub fn param(&self, path: &str) -> Option<serde_json::Value> {
        self.params.lock().field(path)
    }

    /// Queue a full series replacement; picked up on the next frame.
    pub fn set_series(&self, series: FinancialSeries) {
        *self.pending_series.lock() = Some(series);
    }

    pub fn hover_enter(&self, key: LayerKey) {
        *self.hover_request.lock() = HoverRequest::Enter(key);
    }

    pub fn hover_leave(&self) {
        *self.hover_request.lock() = HoverRequest::Leave;
    }

    /// Current hover state as last applied by the chart.
    pub fn hovered(&self) -> Option<LayerKey> {
        *self.hovered.lock()
    }

    pub(crate) fn take_series(&self) -> Option<FinancialSeries> {
        self.pending_series.lock().take()
    }

    pub(crate) fn take_hover_request(&self) -> HoverRequest {
        std::mem::take(&mut *self.hover_request.lock())
    }

    pub(crate) fn mirror_hover(&self, hovered: Option<LayerKey>) {
        *self.hovered.lock() = hovered;
    }
}
