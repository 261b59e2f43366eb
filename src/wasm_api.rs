//! WASM API exports for JavaScript interop.
//!
//! Provides `#[wasm_bindgen]` exports for driving the stacked chart from
//! a JavaScript host: series ingestion as JSON, by-name parameter
//! writes, and hover forwarding from an external legend UI. Only
//! compiled when targeting wasm32.

#![cfg(target_arch = "wasm32")]

use wasm_bindgen::prelude::*;

use crate::core::{FinancialSeries, LayerKey};
use crate::params::ChartControls;
use crate::runtime::run_chart_with;

/// JavaScript-accessible chart wrapper.
#[wasm_bindgen]
pub struct JsStackChart {
    series: FinancialSeries,
    controls: ChartControls,
    canvas_id: String,
    started: bool,
}

#[wasm_bindgen]
impl JsStackChart {
    /// Create a chart from a JSON `FinancialSeries` and a canvas element
    /// id (without `#`).
    #[wasm_bindgen(constructor)]
    pub fn new(json: &str, canvas_id: &str) -> Result<JsStackChart, JsValue> {
        let mut series: FinancialSeries = serde_json::from_str(json)
            .map_err(|e| JsValue::from_str(&format!("failed to parse series JSON: {e}")))?;
        let repaired = series.sanitize();
        if repaired > 0 {
            web_sys::console::warn_1(
                &format!("sanitized {repaired} negative/NaN samples in series").into(),
            );
        }

        Ok(JsStackChart {
            series,
            controls: ChartControls::default(),
            canvas_id: canvas_id.to_string(),
            started: false,
        })
    }

    /// Start the render loop. Call once; afterwards use the update
    /// methods, which flow into the running app through the control
    /// surface.
    #[wasm_bindgen]
    pub fn start(&mut self) {
        if self.started {
            web_sys::console::warn_1(&"chart already started".into());
            return;
        }
        self.started = true;
        run_chart_with(self.series.clone(), self.controls.clone(), &self.canvas_id);
    }

    /// Replace the whole series; picked up on the next frame.
    #[wasm_bindgen]
    pub fn set_series(&mut self, json: &str) -> Result<(), JsValue> {
        let series: FinancialSeries = serde_json::from_str(json)
            .map_err(|e| JsValue::from_str(&format!("failed to parse series JSON: {e}")))?;
        self.controls.set_series(series.clone());
        self.series = series;
        Ok(())
    }

    /// Write one render parameter by dotted name, e.g.
    /// `set_param("risk.thickness", "0.1")`.
    #[wasm_bindgen]
    pub fn set_param(&self, path: &str, value_json: &str) -> Result<(), JsValue> {
        let value: serde_json::Value = serde_json::from_str(value_json)
            .map_err(|e| JsValue::from_str(&format!("failed to parse value JSON: {e}")))?;
        self.controls
            .set_param(path, value)
            .map_err(|e| JsValue::from_str(&format!("{e:?}")))
    }

    /// Read one render parameter by dotted name, as JSON.
    #[wasm_bindgen]
    pub fn param(&self, path: &str) -> Option<String> {
        self.controls.param(path).map(|v| v.to_string())
    }

    /// Forward mouse-enter on an external legend entry
    /// (`"collected" | "pending" | "maintenance" | "overdue" | "vacancy"`).
    #[wasm_bindgen]
    pub fn hover_enter(&self, key: &str) -> Result<(), JsValue> {
        let key = LayerKey::parse(key)
            .ok_or_else(|| JsValue::from_str(&format!("unknown layer key: {key}")))?;
        self.controls.hover_enter(key);
        Ok(())
    }

    /// Forward mouse-leave from the external legend.
    #[wasm_bindgen]
    pub fn hover_leave(&self) {
        self.controls.hover_leave();
    }

    /// The layer the chart currently treats as hovered, if any.
    #[wasm_bindgen]
    pub fn hovered(&self) -> Option<String> {
        self.controls.hovered().map(|k| k.as_str().to_string())
    }
}
