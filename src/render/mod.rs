pub mod components;
pub mod draw;
pub mod material;
pub mod resources;
pub mod systems;

pub use components::*;
pub use material::{GradientMaterial, shade_for};
pub use resources::*;
use systems::*;

use bevy::asset::embedded_asset;
use bevy::pbr::MaterialPlugin;
use bevy::prelude::*;

#[derive(Default)]
pub struct StackChartPlugin;

impl Plugin for StackChartPlugin {
    fn build(&self, app: &mut App) {
        embedded_asset!(app, "shaders/gradient.wgsl");

        app.add_plugins(MaterialPlugin::<GradientMaterial>::default())
            .init_resource::<SeriesRes>()
            .init_resource::<ParamsRes>()
            .init_resource::<HoveredLayer>()
            .init_resource::<ControlSurface>()
            .init_resource::<ChartRegistry>()
            .init_resource::<RiskRegistry>()
            .init_resource::<CameraSnapshot>()
            .add_systems(Startup, setup_scene)
            .add_systems(
                Update,
                (
                    drain_control_surface,
                    rebuild_chart,
                    rebuild_risk,
                    handle_orbit_input,
                    sync_camera,
                    auto_rotate,
                    apply_legend_hover,
                    apply_hover_dim,
                    update_legend_visuals,
                    apply_render_params,
                    project_labels,
                )
                    .chain(),
            );
    }
}
