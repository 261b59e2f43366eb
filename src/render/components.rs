use bevy::prelude::*;

use crate::core::LayerKey;

/// Root entity of the rebuilt chart body; despawned and respawned when
/// the series changes.
#[derive(Component)]
pub struct ChartRoot;

/// Root entity of the risk overlay; rebuilt independently of the bands.
#[derive(Component)]
pub struct RiskRoot;

/// One stacked band surface.
#[derive(Component, Clone, Copy)]
pub struct LayerSurface {
    pub key: LayerKey,
}

/// The glowing outline tube on top of one band.
#[derive(Component, Clone, Copy)]
pub struct LayerOutline {
    pub key: LayerKey,
}

/// Marker for the risk-pressure tube and its joint spheres.
#[derive(Component)]
pub struct RiskLine;

/// Grid and tick geometry, offset as one group.
#[derive(Component)]
pub struct GridGroup;

#[derive(Component)]
pub struct ChartCamera;

/// 2D camera for tick/month labels and the title.
#[derive(Component)]
pub struct OverlayCamera;

/// Screen-projected label: text pinned to a world-space anchor.
#[derive(Component)]
pub struct ProjectedLabel {
    pub world: Vec3,
}

#[derive(Component)]
pub struct KeyLight;

#[derive(Component)]
pub struct FillLight;

/// One legend swatch button.
#[derive(Component, Clone, Copy)]
pub struct LegendSwatch {
    pub key: LayerKey,
}

/// Orbit state of the chart camera.
#[derive(Component, Clone, Copy, Debug)]
pub struct OrbitState {
    pub target: Vec3,
    pub radius: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub orbit_speed: f32,
}

impl Default for OrbitState {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            radius: 16.0,
            yaw: 0.8,
            pitch: -0.4,
            orbit_speed: 0.01,
        }
    }
}

impl OrbitState {
    /// Camera position for the current orbit angles.
    pub fn eye(&self) -> Vec3 {
        let cy = self.yaw.cos();
        let sy = self.yaw.sin();
        let cp = self.pitch.cos();
        let sp = self.pitch.sin();
        self.target + Vec3::new(sy * cp, -sp, cy * cp) * self.radius
    }

    /// Re-derive orbit angles from an externally-pushed camera position,
    /// so a later drag continues from where the push left the camera.
    pub fn sync_to(&mut self, position: Vec3) {
        let offset = position - self.target;
        let radius = offset.length();
        if radius < 1e-4 {
            return;
        }
        self.radius = radius;
        self.pitch = (-offset.y / radius).clamp(-1.0, 1.0).asin();
        self.yaw = offset.x.atan2(offset.z);
    }
}
