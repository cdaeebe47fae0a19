use bevy::prelude::*;
use bevy_egui::EguiPlugin;

mod game;

use game::GamePlugin;

const DEFAULT_CONFIG_PATH: &str = "assets/generation.ron";

fn main() -> AppExit {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    // Rejected before the app exists, so no streaming tick ever runs on bad params.
    let params = match chunks::GenerationParams::load(&config_path) {
        Ok(params) => params,
        Err(e) => {
            eprintln!("{config_path}: {e}");
            return AppExit::error();
        }
    };

    App::new()
        .insert_resource(ClearColor(Color::srgb(0.60, 0.80, 0.95)))
        .insert_resource(AmbientLight {
            color: Color::WHITE,
            brightness: 300.0,
            affects_lightmapped_meshes: false,
        })
        .add_plugins(DefaultPlugins)
        .add_plugins(EguiPlugin::default())
        .add_plugins(chunks::ChunkStreamingPlugin { params })
        .add_plugins(GamePlugin)
        .run()
}
