use bevy::prelude::*;

use crate::core::{FinancialSeries, LayerKey};
use crate::params::{ChartControls, RenderParameters};
use crate::scale::ValueScale;

/// The series currently rendered. Replacing it (via [`ChartControls`])
/// triggers a chart rebuild through change detection; nothing rebuilds
/// per frame.
#[derive(Resource, Clone, Default)]
pub struct SeriesRes(pub FinancialSeries);

/// The currently hovered legend layer. Written ONLY by the legend
/// controller system; every other consumer is read-only.
#[derive(Resource, Default, Clone, Copy, PartialEq)]
pub struct HoveredLayer(pub Option<LayerKey>);

impl HoveredLayer {
    /// A layer is dimmed when some other layer is hovered.
    #[inline]
    pub fn dims(&self, key: LayerKey) -> bool {
        matches!(self.0, Some(h) if h != key)
    }
}

/// Shared handles to the external control surface.
#[derive(Resource, Clone, Default)]
pub struct ControlSurface(pub ChartControls);

/// The parameter record as the renderer sees it this frame.
#[derive(Resource, Clone, Default)]
pub struct ParamsRes(pub RenderParameters);

/// Book-keeping for the memoized chart body.
#[derive(Resource, Default)]
pub struct ChartRegistry {
    pub built: bool,
    pub root: Option<Entity>,
    /// Scale resolved at the last rebuild; reused by the risk overlay and
    /// the overlay labels.
    pub scale: Option<ValueScale>,
}

/// Book-keeping for the risk overlay, rebuilt independently so toggling
/// or re-sizing the line never touches the band meshes.
#[derive(Resource, Default)]
pub struct RiskRegistry {
    pub root: Option<Entity>,
    pub built_for: Option<RiskShape>,
}

/// The geometry-affecting slice of the risk parameters.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct RiskShape {
    pub enabled: bool,
    pub thickness: f32,
    pub y_offset: f32,
}

/// Last externally-applied camera values; the synchronizer only pushes
/// into the live camera when the parameter surface actually changed, so
/// it never fights user-driven orbit drag.
#[derive(Resource, Default, Clone, Copy, PartialEq)]
pub struct CameraSnapshot {
    pub position: Vec3,
    pub zoom: f32,
}
