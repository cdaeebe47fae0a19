use bevy::input::mouse::MouseWheel;
use bevy::prelude::*;
use bevy_egui::EguiContexts;
use chunks::TrackedPositionXz;
use glam::Vec2 as GVec2;

#[derive(Resource, Default, Clone, Copy, Debug)]
pub struct UiInputCaptureRes {
    /// Pointer is over or interacting with egui.
    pub pointer: bool,
    /// egui wants keys, e.g. a focused text field.
    pub keyboard: bool,
}

pub fn update_ui_input_capture(mut contexts: EguiContexts, mut capture: ResMut<UiInputCaptureRes>) {
    let ctx = match contexts.ctx_mut() {
        Ok(ctx) => ctx,
        Err(_) => {
            *capture = UiInputCaptureRes::default();
            return;
        }
    };

    capture.pointer = ctx.wants_pointer_input() || ctx.is_pointer_over_area();
    capture.keyboard = ctx.wants_keyboard_input();
}

/// The point the chunk window follows.
#[derive(Component)]
pub struct Viewer;

#[derive(Component)]
pub struct TopDownCamera;

#[derive(Resource, Clone)]
pub struct TopDownCameraSettings {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub pan_speed: f32,
    pub pan_speed_fast: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    /// Distance covered by one press of the teleport key.
    pub teleport_distance: f32,
}

impl Default for TopDownCameraSettings {
    fn default() -> Self {
        Self {
            yaw: 0.8,
            pitch: 1.05,
            distance: 120.0,
            min_distance: 10.0,
            max_distance: 600.0,
            pan_speed: 60.0,
            pan_speed_fast: 240.0,
            rotate_speed: 1.8,
            zoom_speed: 0.12,
            teleport_distance: 5_000.0,
        }
    }
}

pub fn setup_viewer(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Viewer,
        Mesh3d(meshes.add(Sphere::new(1.2))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.9, 0.2, 0.15),
            emissive: LinearRgba::rgb(0.6, 0.05, 0.0),
            ..default()
        })),
        Transform::from_xyz(0.0, 1.2, 0.0),
    ));

    commands.spawn((TopDownCamera, Camera3d::default(), Transform::default()));

    commands.spawn((
        DirectionalLight {
            illuminance: 20_000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(EulerRot::XYZ, -0.8, 0.7, 0.0)),
    ));
}

pub fn top_down_camera_input(
    time: Res<Time>,
    keys: Res<ButtonInput<KeyCode>>,
    mut mouse_wheel: MessageReader<MouseWheel>,
    mut settings: ResMut<TopDownCameraSettings>,
    mut q_focus: Query<&mut Transform, With<Viewer>>,
    ui_capture: Res<UiInputCaptureRes>,
) {
    // Always drained, so scrolling over egui is not replayed later.
    let scroll: f32 = mouse_wheel.read().map(|ev| ev.y).sum();

    let mut focus = match q_focus.single_mut() {
        Ok(t) => t,
        Err(_) => return,
    };

    if !ui_capture.keyboard {
        // Rotate around focus
        if keys.pressed(KeyCode::KeyQ) {
            settings.yaw += settings.rotate_speed * time.delta_secs();
        }
        if keys.pressed(KeyCode::KeyE) {
            settings.yaw -= settings.rotate_speed * time.delta_secs();
        }
    }

    // Zoom, unless the cursor is over egui.
    if !ui_capture.pointer && scroll.abs() > 0.0 {
        let factor = (1.0 - scroll * settings.zoom_speed).clamp(0.2, 5.0);
        settings.distance =
            (settings.distance * factor).clamp(settings.min_distance, settings.max_distance);
    }

    // Pan on XZ plane, relative to camera yaw.
    let mut input = Vec2::ZERO;
    if !ui_capture.keyboard {
        if keys.pressed(KeyCode::KeyW) {
            input.y += 1.0;
        }
        if keys.pressed(KeyCode::KeyS) {
            input.y -= 1.0;
        }
        if keys.pressed(KeyCode::KeyA) {
            input.x += 1.0;
        }
        if keys.pressed(KeyCode::KeyD) {
            input.x -= 1.0;
        }
    }

    if input.length_squared() > 0.0 {
        let speed = if keys.pressed(KeyCode::ShiftLeft) || keys.pressed(KeyCode::ShiftRight) {
            settings.pan_speed_fast
        } else {
            settings.pan_speed
        };

        let yaw_rot = Quat::from_rotation_y(settings.yaw);
        let right = yaw_rot * Vec3::X;
        let forward = yaw_rot * Vec3::Z;
        let delta = (right * input.x + forward * input.y) * speed * time.delta_secs();
        focus.translation += Vec3::new(delta.x, 0.0, delta.z);
    }
}

/// Jumps the viewer far along +X so the whole window is replaced in one tick.
pub fn teleport_viewer(
    keys: Res<ButtonInput<KeyCode>>,
    settings: Res<TopDownCameraSettings>,
    ui_capture: Res<UiInputCaptureRes>,
    mut q_focus: Query<&mut Transform, With<Viewer>>,
) {
    if ui_capture.keyboard || !keys.just_pressed(KeyCode::KeyT) {
        return;
    }
    let Ok(mut focus) = q_focus.single_mut() else {
        return;
    };
    focus.translation.x += settings.teleport_distance;
    info!("viewer teleported to {}", focus.translation);
}

pub fn update_top_down_camera(
    settings: Res<TopDownCameraSettings>,
    q_focus: Query<&Transform, (With<Viewer>, Without<TopDownCamera>)>,
    mut q_cam: Query<&mut Transform, (With<TopDownCamera>, Without<Viewer>)>,
) {
    let focus = match q_focus.single() {
        Ok(v) => v.translation,
        Err(_) => return,
    };
    let mut cam = match q_cam.single_mut() {
        Ok(c) => c,
        Err(_) => return,
    };

    let rot = Quat::from_euler(EulerRot::YXZ, settings.yaw, settings.pitch, 0.0);
    let offset = rot * Vec3::new(0.0, 0.0, -settings.distance);
    cam.translation = focus + offset;
    cam.look_at(focus, Vec3::Y);
}

pub fn update_tracked_position(
    q_focus: Query<&Transform, With<Viewer>>,
    mut tracked: ResMut<TrackedPositionXz>,
) {
    let Ok(focus) = q_focus.single() else {
        return;
    };
    tracked.0 = GVec2::new(focus.translation.x, focus.translation.z);
}
