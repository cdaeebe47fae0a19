pub mod camera;
pub mod hud;

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(camera::TopDownCameraSettings::default())
            .insert_resource(camera::UiInputCaptureRes::default())
            .add_systems(Startup, camera::setup_viewer)
            .add_systems(
                Update,
                (
                    camera::update_ui_input_capture,
                    camera::top_down_camera_input,
                    camera::teleport_viewer,
                    camera::update_top_down_camera,
                    camera::update_tracked_position,
                )
                    .chain(),
            )
            .add_systems(EguiPrimaryContextPass, hud::streaming_stats_window);
    }
}
