pub mod axes;
pub mod outline;
pub mod risk;
pub mod surface;

pub use axes::{OVERLAY_LAYER, spawn_axes, spawn_label};
pub use outline::{OUTLINE_RADIUS, build_outline_tube, build_tube_mesh};
pub use risk::{RiskGeometry, build_risk_geometry};
pub use surface::{accumulate_normals, build_band_mesh};
