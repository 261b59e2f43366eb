//! Axis furniture: floor line, value ticks, grid bars, and the
//! screen-projected tick/month labels.

use bevy::prelude::*;
use bevy_camera::visibility::RenderLayers;

use crate::render::components::{GridGroup, ProjectedLabel};
use crate::scale::{CHART_WIDTH, ValueScale};

/// Render layer of the 2D overlay camera that draws the labels.
pub const OVERLAY_LAYER: usize = 1;

const GRID_COLOR: Color = Color::srgba(0.4, 0.4, 0.45, 0.5);
const AXIS_COLOR: Color = Color::srgb(0.65, 0.65, 0.72);
const LABEL_COLOR: Color = Color::srgba(0.7, 0.7, 0.7, 0.9);

fn format_tick(value: f32) -> String {
    format!("${}k", (value / 1000.0).round() as i64)
}

/// Spawn grid bars and tick marks under `root`, plus overlay label
/// entities pinned to world anchors. Nothing is spawned for an empty
/// series (the caller already skipped the scale in that case).
#[allow(clippy::too_many_arguments)]
pub fn spawn_axes(
    commands: &mut Commands,
    root: Entity,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    scale: &ValueScale,
    months: &[String],
) {
    let grid_mat = materials.add(StandardMaterial {
        base_color: GRID_COLOR,
        unlit: true,
        alpha_mode: AlphaMode::Blend,
        ..default()
    });
    let axis_mat = materials.add(StandardMaterial {
        base_color: AXIS_COLOR,
        emissive: Color::srgb(0.3, 0.3, 0.35).into(),
        unlit: true,
        ..default()
    });

    let thickness = 0.02;
    let grid_thick = thickness * 0.5;
    let left = -CHART_WIDTH * 0.5;
    let n = months.len();

    let grid = commands
        .spawn((GridGroup, Transform::default(), Visibility::default()))
        .id();
    commands.entity(root).add_child(grid);

    // Baseline along the bottom of the chart.
    let baseline = commands
        .spawn((
            Mesh3d(meshes.add(Cuboid::new(CHART_WIDTH + 0.4, thickness, thickness))),
            MeshMaterial3d(axis_mat.clone()),
            Transform::from_xyz(0.0, 0.0, 0.0),
        ))
        .id();
    commands.entity(grid).add_child(baseline);

    // Vertical value axis on the left edge.
    let axis_height = scale.project(scale.axis_max);
    let value_axis = commands
        .spawn((
            Mesh3d(meshes.add(Cuboid::new(thickness, axis_height, thickness))),
            MeshMaterial3d(axis_mat),
            Transform::from_xyz(left, axis_height * 0.5, 0.0),
        ))
        .id();
    commands.entity(grid).add_child(value_axis);

    // One horizontal grid bar and one tick label per axis step.
    for tick in scale.ticks() {
        let y = scale.project(tick);
        let bar = commands
            .spawn((
                Mesh3d(meshes.add(Cuboid::new(CHART_WIDTH, grid_thick, grid_thick))),
                MeshMaterial3d(grid_mat.clone()),
                Transform::from_xyz(0.0, y, 0.0),
            ))
            .id();
        commands.entity(grid).add_child(bar);

        spawn_label(commands, format_tick(tick), Vec3::new(left - 0.35, y, 0.0), 11.0);
    }

    // Month ticks along the baseline.
    for (i, month) in months.iter().enumerate() {
        let x = scale.month_x(i, n);
        let tick = commands
            .spawn((
                Mesh3d(meshes.add(Cuboid::new(grid_thick, 0.12, grid_thick))),
                MeshMaterial3d(grid_mat.clone()),
                Transform::from_xyz(x, -0.06, 0.0),
            ))
            .id();
        commands.entity(grid).add_child(tick);

        spawn_label(commands, month.clone(), Vec3::new(x, -0.35, 0.0), 10.0);
    }
}

/// Overlay text pinned to a world anchor; repositioned every frame by
/// the label projection system. Spawned at the top level (not under the
/// chart root) so the 3D root transform never leaks into the 2D overlay
/// coordinates; the rebuild pass despawns them by marker instead.
pub fn spawn_label(commands: &mut Commands, text: String, world: Vec3, font_size: f32) {
    commands.spawn((
        Text2d::new(text),
        TextFont {
            font_size,
            ..default()
        },
        TextColor(LABEL_COLOR),
        Transform::from_translation(Vec3::new(0.0, 0.0, 2.0)),
        Visibility::Hidden,
        ProjectedLabel { world },
        RenderLayers::layer(OVERLAY_LAYER),
    ));
}
