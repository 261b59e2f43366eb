//! The gradient fill material: a small uniform-driven shading function
//! over `(uv.y, floor opacity, dim override)`, so hover feedback is a
//! scalar write per frame and never a geometry rebuild.

use bevy::prelude::*;
use bevy::render::render_resource::AsBindGroup;
use bevy::shader::ShaderRef;

use crate::core::LayerDef;

/// Gradient floor at rest.
pub const GRADIENT_FLOOR: f32 = 0.6;
/// Gradient floor while this layer's own legend entry is hovered.
pub const GRADIENT_FLOOR_HOVERED: f32 = 0.33;
/// Flat opacity forced onto every non-hovered layer.
pub const DIMMED_OPACITY: f32 = 0.1;

pub const GRADIENT_SHADER_PATH: &str = "embedded://strata_charts/render/shaders/gradient.wgsl";

#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct GradientMaterial {
    #[uniform(0)]
    pub color: LinearRgba,
    /// x: gradient floor opacity, y: flat dim override (< 0 disables),
    /// z: master opacity multiplier, w: unused.
    #[uniform(1)]
    pub shade: Vec4,
}

impl GradientMaterial {
    pub fn for_layer(def: &LayerDef) -> Self {
        Self {
            color: LinearRgba::new(def.color.r, def.color.g, def.color.b, def.opacity),
            shade: Vec4::new(GRADIENT_FLOOR, -1.0, 1.0, 0.0),
        }
    }

    /// Pack the shading inputs into the uniform layout the shader reads.
    pub fn encode_shade(floor: f32, dim: Option<f32>, master: f32) -> Vec4 {
        Vec4::new(floor, dim.unwrap_or(-1.0), master, 0.0)
    }

    /// Per-frame shading update. Returns true when anything changed, so
    /// callers can skip the asset write (and its GPU re-upload).
    pub fn apply_shade(&mut self, floor: f32, dim: Option<f32>, master: f32) -> bool {
        let next = Self::encode_shade(floor, dim, master);
        if self.shade == next {
            return false;
        }
        self.shade = next;
        true
    }
}

impl Material for GradientMaterial {
    fn fragment_shader() -> ShaderRef {
        GRADIENT_SHADER_PATH.into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        AlphaMode::Blend
    }
}

/// Shading inputs for one layer given the current hover state.
/// `hover_self` and `hover_other` are mutually exclusive.
pub fn shade_for(hover_self: bool, hover_other: bool) -> (f32, Option<f32>) {
    if hover_other {
        (GRADIENT_FLOOR, Some(DIMMED_OPACITY))
    } else if hover_self {
        (GRADIENT_FLOOR_HOVERED, None)
    } else {
        (GRADIENT_FLOOR, None)
    }
}
