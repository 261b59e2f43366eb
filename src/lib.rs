pub mod core;
pub mod curve;
pub mod params;
pub mod render;
pub mod runtime;
pub mod scale;

#[cfg(target_arch = "wasm32")]
pub mod wasm_api;

use std::fmt;

#[derive(Debug)]
pub struct ChartError;

impl fmt::Display for ChartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChartError")
    }
}

impl std::error::Error for ChartError {}

pub type Result<T> = std::result::Result<T, error_stack::Report<ChartError>>;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

pub mod prelude {
    pub use crate::core::*;
    pub use crate::params::*;
    pub use crate::render::*;
    pub use crate::runtime::*;
    pub use crate::scale::*;
}
