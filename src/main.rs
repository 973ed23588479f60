use bevy::asset::AssetMetaCheck;
use bevy::log::{Level, LogPlugin};
use bevy::prelude::*;
use bevy_egui::EguiPlugin;

use chess_scene::core::{CorePlugin, WindowConfig};
use chess_scene::rendering::{ScenePlugin, TrackballPlugin};
use chess_scene::ui::ControlPanelPlugin;

fn main() {
    let window = WindowConfig::default();

    App::new()
        .add_plugins(CorePlugin)
        .insert_resource(window.clone())
        // Engine
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(window.to_window()),
                    ..default()
                })
                .set(AssetPlugin {
                    file_path: "assets".to_string(),
                    meta_check: AssetMetaCheck::Never,
                    ..default()
                })
                .set(LogPlugin {
                    level: Level::INFO,
                    filter: "wgpu=warn,naga=error,chess_scene=info".to_string(),
                    ..default()
                }),
        )
        .add_plugins(EguiPlugin::default())
        // Scene
        .add_plugins(ScenePlugin)
        .add_plugins(TrackballPlugin)
        .add_plugins(ControlPanelPlugin)
        .insert_resource(ClearColor(Color::BLACK))
        .run();
}
