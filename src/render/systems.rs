use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::prelude::*;
use bevy_camera::visibility::RenderLayers;
use bevy_camera::{ClearColorConfig, PerspectiveProjection, Projection};

use crate::core::LAYERS;
use crate::curve::{SUBDIVISIONS, interpolate_boundary};
use crate::params::{HoverRequest, clamp01, clamp_positive};
use crate::scale::ValueScale;

use super::components::*;
use super::draw::{
    OUTLINE_RADIUS, OVERLAY_LAYER, build_band_mesh, build_outline_tube, build_risk_geometry,
    spawn_axes, spawn_label,
};
use super::material::{DIMMED_OPACITY, GradientMaterial, shade_for};
use super::resources::*;

const BASE_FOV: f32 = std::f32::consts::FRAC_PI_4;
const ZOOM_RANGE: (f32, f32) = (0.1, 10.0);

/// Lights, cameras and the legend UI. Geometry is spawned by the
/// rebuild systems once a series resource is present.
pub fn setup_scene(mut commands: Commands, params: Res<ParamsRes>) {
    let p = &params.0;

    commands.insert_resource(AmbientLight {
        brightness: clamp_positive(p.lighting.ambient, 10_000.0),
        ..default()
    });

    // Orbit camera, primed from the parameter surface so the first
    // external push is a no-op.
    let mut orbit = OrbitState::default();
    orbit.sync_to(p.camera.position);
    commands.spawn((
        ChartCamera,
        Camera3d::default(),
        Camera {
            order: 0,
            ..default()
        },
        Projection::from(PerspectiveProjection {
            fov: BASE_FOV / p.camera.zoom.clamp(ZOOM_RANGE.0, ZOOM_RANGE.1),
            ..default()
        }),
        Transform::from_translation(p.camera.position).looking_at(orbit.target, Vec3::Y),
        orbit,
        RenderLayers::layer(0),
    ));
    commands.insert_resource(CameraSnapshot {
        position: p.camera.position,
        zoom: p.camera.zoom,
    });

    // Key light, top-front-right.
    commands.spawn((
        KeyLight,
        PointLight {
            intensity: clamp_positive(p.lighting.key, 5_000_000.0),
            range: 100.0,
            color: Color::srgb(1.0, 0.98, 0.95),
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(8.0, 12.0, 8.0),
        RenderLayers::layer(0),
    ));

    // Fill light, softer, opposite side.
    commands.spawn((
        FillLight,
        PointLight {
            intensity: clamp_positive(p.lighting.fill, 5_000_000.0),
            range: 100.0,
            color: Color::srgb(0.9, 0.95, 1.0),
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(-6.0, 8.0, -6.0),
        RenderLayers::layer(0),
    ));

    // 2D overlay for labels and the UI root.
    commands.spawn((
        OverlayCamera,
        Camera2d::default(),
        Camera {
            order: 100,
            clear_color: ClearColorConfig::None,
            ..default()
        },
        IsDefaultUiCamera,
        RenderLayers::layer(OVERLAY_LAYER),
    ));

    spawn_legend(&mut commands);
}

fn spawn_legend(commands: &mut Commands) {
    commands
        .spawn((Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(14.0),
            left: Val::Px(0.0),
            right: Val::Px(0.0),
            justify_content: JustifyContent::Center,
            column_gap: Val::Px(16.0),
            ..default()
        },))
        .with_children(|row| {
            for def in &LAYERS {
                row.spawn((
                    Button,
                    LegendSwatch { key: def.key },
                    Node {
                        padding: UiRect::axes(Val::Px(10.0), Val::Px(6.0)),
                        align_items: AlignItems::Center,
                        column_gap: Val::Px(6.0),
                        ..default()
                    },
                    BackgroundColor(Color::srgba(1.0, 1.0, 1.0, 0.06)),
                ))
                .with_children(|btn| {
                    btn.spawn((
                        Node {
                            width: Val::Px(12.0),
                            height: Val::Px(12.0),
                            ..default()
                        },
                        BackgroundColor(def.color.into()),
                    ));
                    btn.spawn((
                        Text::new(def.label),
                        TextFont {
                            font_size: 12.0,
                            ..default()
                        },
                        TextColor(Color::srgba(0.85, 0.85, 0.9, 1.0)),
                    ));
                });
            }
        });
}

/// Pull pending edits from the external control surface into the live
/// resources. Writes only on an actual difference so change detection
/// stays meaningful.
pub fn drain_control_surface(
    controls: Res<ControlSurface>,
    mut params: ResMut<ParamsRes>,
    mut series: ResMut<SeriesRes>,
) {
    let external = *controls.0.params();
    if params.0 != external {
        params.0 = external;
    }

    if let Some(mut next) = controls.0.take_series() {
        let repaired = next.sanitize();
        if repaired > 0 {
            warn!("sanitized {repaired} negative/NaN samples in series update");
        }
        series.0 = next;
    }
}

/// Rebuild the chart body when (and only when) the series changed:
/// resolve the scale, densify each cumulative boundary, spawn one band
/// mesh + outline tube per layer, plus axes and labels.
pub fn rebuild_chart(
    mut commands: Commands,
    series: Res<SeriesRes>,
    mut registry: ResMut<ChartRegistry>,
    old_labels: Query<Entity, With<ProjectedLabel>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut gradients: ResMut<Assets<GradientMaterial>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    params: Res<ParamsRes>,
) {
    if !series.is_changed() && registry.built {
        return;
    }
    registry.built = true;

    if let Some(root) = registry.root.take() {
        commands.entity(root).try_despawn();
    }
    for label in old_labels.iter() {
        commands.entity(label).try_despawn();
    }
    registry.scale = None;

    let s = &series.0;
    let Some(scale) = ValueScale::resolve(s) else {
        // No months: no ticks, no geometry, and nothing downstream runs.
        return;
    };
    registry.scale = Some(scale);

    let root = commands
        .spawn((
            ChartRoot,
            Transform::from_xyz(0.0, params.0.chart.y_offset, 0.0),
            Visibility::default(),
        ))
        .id();
    registry.root = Some(root);

    let columns = s.boundaries();
    let depth = clamp_positive(params.0.chart.depth, 2.0);

    for def in &LAYERS {
        let b = def.key.index();
        let bottom_vals: Vec<f32> = columns.iter().map(|c| c[b]).collect();
        let top_vals: Vec<f32> = columns.iter().map(|c| c[b + 1]).collect();
        let bottom = interpolate_boundary(&bottom_vals, &scale, SUBDIVISIONS);
        let top = interpolate_boundary(&top_vals, &scale, SUBDIVISIONS);
        let z = -(b as f32) * depth;

        if let Some(mesh) = build_band_mesh(&bottom, &top) {
            let band = commands
                .spawn((
                    LayerSurface { key: def.key },
                    Mesh3d(meshes.add(mesh)),
                    MeshMaterial3d(gradients.add(GradientMaterial::for_layer(def))),
                    Transform::from_xyz(0.0, 0.0, z),
                ))
                .id();
            commands.entity(root).add_child(band);
        }

        if let Some(tube) = build_outline_tube(&top, OUTLINE_RADIUS) {
            let glow: Color = def.glow.into();
            let mat = materials.add(StandardMaterial {
                base_color: glow,
                emissive: glow.to_linear() * 0.6,
                unlit: true,
                alpha_mode: AlphaMode::Blend,
                ..default()
            });
            let outline = commands
                .spawn((
                    LayerOutline { key: def.key },
                    Mesh3d(meshes.add(tube)),
                    MeshMaterial3d(mat),
                    Transform::from_xyz(0.0, 0.0, z + params.0.layering.outline),
                ))
                .id();
            commands.entity(root).add_child(outline);
        }
    }

    spawn_axes(
        &mut commands,
        root,
        &mut meshes,
        &mut materials,
        &scale,
        &s.months,
    );

    if let Some(title) = &s.meta.title {
        spawn_label(
            &mut commands,
            title.clone(),
            Vec3::new(0.0, scale.project(scale.axis_max) + 0.8, 0.0),
            15.0,
        );
    }
}

/// Rebuild the risk overlay when the series or the overlay's own shape
/// parameters changed. Toggling or re-sizing the line never touches the
/// band meshes; disabling it builds nothing at all.
pub fn rebuild_risk(
    mut commands: Commands,
    series: Res<SeriesRes>,
    registry: Res<ChartRegistry>,
    mut risk: ResMut<RiskRegistry>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    params: Res<ParamsRes>,
) {
    let shape = RiskShape {
        enabled: params.0.risk.enabled,
        thickness: params.0.risk.thickness,
        y_offset: params.0.risk.y_offset,
    };
    if !series.is_changed() && risk.built_for == Some(shape) {
        return;
    }

    if let Some(root) = risk.root.take() {
        commands.entity(root).try_despawn();
    }
    risk.built_for = Some(shape);

    let Some(scale) = registry.scale else {
        return;
    };
    let Some(geometry) = build_risk_geometry(
        &series.0,
        &scale,
        shape.enabled,
        shape.thickness,
        shape.y_offset,
    ) else {
        return;
    };

    let warning: Color = crate::core::RISK_COLOR.into();
    let mat = materials.add(StandardMaterial {
        base_color: warning,
        emissive: warning.to_linear() * 0.8,
        unlit: true,
        ..default()
    });

    let root = commands
        .spawn((
            RiskRoot,
            Transform::from_xyz(0.0, params.0.chart.y_offset, params.0.layering.risk),
            Visibility::default(),
        ))
        .id();
    risk.root = Some(root);

    let tube = commands
        .spawn((
            RiskLine,
            Mesh3d(meshes.add(geometry.tube)),
            MeshMaterial3d(mat.clone()),
            Transform::default(),
        ))
        .id();
    commands.entity(root).add_child(tube);

    let joint_radius = (shape.thickness * 2.2).clamp(0.04, 0.6);
    let joint_mesh = meshes.add(Sphere::new(joint_radius));
    for joint in geometry.joints {
        let sphere = commands
            .spawn((
                RiskLine,
                Mesh3d(joint_mesh.clone()),
                MeshMaterial3d(mat.clone()),
                Transform::from_translation(joint),
            ))
            .id();
        commands.entity(root).add_child(sphere);
    }
}

/// Wheel zoom and drag-to-orbit, the user-driven half of camera
/// ownership.
pub fn handle_orbit_input(
    mut wheel: MessageReader<MouseWheel>,
    mut motion: MessageReader<MouseMotion>,
    mouse: Res<ButtonInput<MouseButton>>,
    mut cams: Query<(&mut OrbitState, &mut Transform), With<ChartCamera>>,
) {
    let mut scroll = 0.0f32;
    for event in wheel.read() {
        scroll += event.y;
    }

    let mut drag = Vec2::ZERO;
    if mouse.pressed(MouseButton::Left) {
        for event in motion.read() {
            drag += event.delta;
        }
    } else {
        motion.clear();
    }

    if scroll == 0.0 && drag == Vec2::ZERO {
        return;
    }

    for (mut orbit, mut transform) in &mut cams {
        if scroll != 0.0 {
            orbit.radius = (orbit.radius * (1.0 - scroll * 0.1)).clamp(4.0, 60.0);
        }
        if drag != Vec2::ZERO {
            let speed = orbit.orbit_speed;
            orbit.yaw -= drag.x * speed;
            orbit.pitch = (orbit.pitch - drag.y * speed).clamp(-1.5, 1.5);
        }
        let target = orbit.target;
        *transform = Transform::from_translation(orbit.eye()).looking_at(target, Vec3::Y);
    }
}

/// Reconcile externally-pushed camera parameters: snapshot-compare, push
/// only on an actual change so orbit drag is never fought, and recompute
/// the projection when zoom moved.
pub fn sync_camera(
    params: Res<ParamsRes>,
    mut snapshot: ResMut<CameraSnapshot>,
    mut cams: Query<(&mut OrbitState, &mut Transform, &mut Projection), With<ChartCamera>>,
) {
    let cam = params.0.camera;
    let position_changed = cam.position != snapshot.position;
    let zoom_changed = cam.zoom != snapshot.zoom;
    if !position_changed && !zoom_changed {
        return;
    }

    for (mut orbit, mut transform, mut projection) in &mut cams {
        if position_changed {
            orbit.sync_to(cam.position);
            let target = orbit.target;
            *transform = Transform::from_translation(cam.position).looking_at(target, Vec3::Y);
        }
        if zoom_changed {
            if let Projection::Perspective(perspective) = &mut *projection {
                perspective.fov = BASE_FOV / cam.zoom.clamp(ZOOM_RANGE.0, ZOOM_RANGE.1);
            }
        }
    }

    snapshot.position = cam.position;
    snapshot.zoom = cam.zoom;
}

/// Idle spin around the stack when enabled.
pub fn auto_rotate(
    time: Res<Time>,
    params: Res<ParamsRes>,
    mut cams: Query<(&mut OrbitState, &mut Transform), With<ChartCamera>>,
) {
    if !params.0.camera.auto_rotate {
        return;
    }
    let speed = params.0.camera.rotate_speed.clamp(-5.0, 5.0);
    if speed == 0.0 {
        return;
    }
    for (mut orbit, mut transform) in &mut cams {
        orbit.yaw += speed * time.delta_secs();
        let target = orbit.target;
        *transform = Transform::from_translation(orbit.eye()).looking_at(target, Vec3::Y);
    }
}

/// The ONLY writer of [`HoveredLayer`]: drains both the in-scene legend
/// buttons and the external hover slot, then mirrors the applied state
/// back to the control surface.
pub fn apply_legend_hover(
    controls: Res<ControlSurface>,
    mut hovered: ResMut<HoveredLayer>,
    swatches: Query<(&Interaction, &LegendSwatch), Changed<Interaction>>,
) {
    let mut next = hovered.0;
    for (interaction, swatch) in &swatches {
        match interaction {
            Interaction::Hovered | Interaction::Pressed => next = Some(swatch.key),
            Interaction::None => {
                if next == Some(swatch.key) {
                    next = None;
                }
            }
        }
    }

    match controls.0.take_hover_request() {
        HoverRequest::Enter(key) => next = Some(key),
        HoverRequest::Leave => next = None,
        HoverRequest::Unchanged => {}
    }

    if hovered.0 != next {
        hovered.0 = next;
        controls.0.mirror_hover(next);
    }
}

/// Per-frame shading pass: gradient floors and dim overrides for every
/// band, outline alpha for every tube. Pure uniform writes, and only
/// when a value actually moved.
pub fn apply_hover_dim(
    hovered: Res<HoveredLayer>,
    params: Res<ParamsRes>,
    mut gradients: ResMut<Assets<GradientMaterial>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    surfaces: Query<(&LayerSurface, &MeshMaterial3d<GradientMaterial>)>,
    outlines: Query<(&LayerOutline, &MeshMaterial3d<StandardMaterial>)>,
) {
    let master = clamp01(params.0.chart.opacity);

    for (surface, mat) in &surfaces {
        let (floor, dim) = shade_for(hovered.0 == Some(surface.key), hovered.dims(surface.key));
        let target = GradientMaterial::encode_shade(floor, dim, master);
        if gradients.get(&mat.0).is_some_and(|m| m.shade != target) {
            if let Some(m) = gradients.get_mut(&mat.0) {
                m.shade = target;
            }
        }
    }

    for (outline, mat) in &outlines {
        let alpha = if hovered.dims(outline.key) {
            DIMMED_OPACITY
        } else {
            1.0
        } * master;
        if materials
            .get(&mat.0)
            .is_some_and(|m| (m.base_color.alpha() - alpha).abs() > 1e-4)
        {
            if let Some(m) = materials.get_mut(&mat.0) {
                m.base_color.set_alpha(alpha);
            }
        }
    }
}

/// Brighten the hovered swatch.
pub fn update_legend_visuals(
    hovered: Res<HoveredLayer>,
    mut swatches: Query<(&LegendSwatch, &mut BackgroundColor)>,
) {
    if !hovered.is_changed() {
        return;
    }
    for (swatch, mut bg) in &mut swatches {
        let alpha = if hovered.0 == Some(swatch.key) {
            0.18
        } else {
            0.06
        };
        *bg = BackgroundColor(Color::srgba(1.0, 1.0, 1.0, alpha));
    }
}

/// Apply every cosmetic parameter: background, light intensities, chart
/// placement, per-feature z offsets. Scalar writes, clamped at the point
/// of use, no geometry ever rebuilt from here.
#[allow(clippy::type_complexity)]
pub fn apply_render_params(
    params: Res<ParamsRes>,
    mut clear: ResMut<ClearColor>,
    mut ambient: ResMut<AmbientLight>,
    mut key_lights: Query<&mut PointLight, (With<KeyLight>, Without<FillLight>)>,
    mut fill_lights: Query<&mut PointLight, (With<FillLight>, Without<KeyLight>)>,
    mut placed: Query<
        (
            &mut Transform,
            Option<&ChartRoot>,
            Option<&RiskRoot>,
            Option<&GridGroup>,
            Option<&LayerSurface>,
            Option<&LayerOutline>,
        ),
        Or<(
            With<ChartRoot>,
            With<RiskRoot>,
            With<GridGroup>,
            With<LayerSurface>,
            With<LayerOutline>,
        )>,
    >,
) {
    let p = &params.0;

    let bg = Color::linear_rgba(
        p.background.color.r,
        p.background.color.g,
        p.background.color.b,
        clamp01(p.background.opacity),
    );
    if clear.0 != bg {
        clear.0 = bg;
    }

    let ambient_target = clamp_positive(p.lighting.ambient, 10_000.0);
    if ambient.brightness != ambient_target {
        ambient.brightness = ambient_target;
    }
    for mut light in &mut key_lights {
        light.intensity = clamp_positive(p.lighting.key, 5_000_000.0);
    }
    for mut light in &mut fill_lights {
        light.intensity = clamp_positive(p.lighting.fill, 5_000_000.0);
    }

    let y_offset = if p.chart.y_offset.is_finite() {
        p.chart.y_offset.clamp(-10.0, 10.0)
    } else {
        0.0
    };
    let depth = clamp_positive(p.chart.depth, 2.0);

    for (mut transform, chart_root, risk_root, grid, surface, outline) in &mut placed {
        let target = if chart_root.is_some() {
            Vec3::new(0.0, y_offset, 0.0)
        } else if risk_root.is_some() {
            Vec3::new(0.0, y_offset, p.layering.risk)
        } else if grid.is_some() {
            Vec3::new(0.0, 0.0, p.layering.grid)
        } else if let Some(surface) = surface {
            let z = -(surface.key.index() as f32) * depth;
            Vec3::new(0.0, 0.0, z)
        } else if let Some(outline) = outline {
            let z = -(outline.key.index() as f32) * depth + p.layering.outline;
            Vec3::new(0.0, 0.0, z)
        } else {
            continue;
        };
        if transform.translation != target {
            transform.translation = target;
        }
    }
}

/// Pin the overlay labels to their world anchors: project through the
/// 3D camera, then re-express in the 2D overlay camera's centered
/// coordinates.
pub fn project_labels(
    windows: Query<&Window>,
    params: Res<ParamsRes>,
    cams: Query<(&Camera, &GlobalTransform), With<ChartCamera>>,
    mut labels: Query<(&ProjectedLabel, &mut Transform, &mut Visibility)>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let Ok((camera, cam_transform)) = cams.single() else {
        return;
    };

    let lift = Vec3::Y
        * if params.0.chart.y_offset.is_finite() {
            params.0.chart.y_offset.clamp(-10.0, 10.0)
        } else {
            0.0
        };

    for (label, mut transform, mut visibility) in &mut labels {
        match camera.world_to_viewport(cam_transform, label.world + lift) {
            Ok(viewport) => {
                transform.translation.x = viewport.x - window.width() * 0.5;
                transform.translation.y = window.height() * 0.5 - viewport.y;
                *visibility = Visibility::Visible;
            }
            Err(_) => {
                *visibility = Visibility::Hidden;
            }
        }
    }
}
