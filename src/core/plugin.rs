//! Core plugin for the chess scene
//!
//! Owns the application context that every other plugin reads: the live
//! [`SceneParameters`], the fixed [`SceneConfig`], the [`WindowConfig`] and the
//! [`ControlChange`] message channel.
//!
//! # Plugin Order
//!
//! 1. [`CorePlugin`] - resources and messages
//! 2. [`bevy::DefaultPlugins`] - engine
//! 3. [`bevy_egui::EguiPlugin`] - UI framework
//! 4. [`crate::rendering::ScenePlugin`] - scene construction and render loop
//! 5. [`crate::ui::ControlPanelPlugin`] - tweak controls

use bevy::prelude::*;

use super::{
    ControlChange, LightParameters, RendererParameters, RotationParameters, SceneConfig,
    SceneParameters, ShadowParameters, WindowConfig,
};

/// Core plugin, add before any other scene plugin
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WindowConfig>()
            .init_resource::<SceneConfig>()
            .init_resource::<SceneParameters>()
            .add_message::<ControlChange>();

        app.register_type::<WindowConfig>()
            .register_type::<SceneConfig>()
            .register_type::<SceneParameters>()
            .register_type::<ShadowParameters>()
            .register_type::<LightParameters>()
            .register_type::<RotationParameters>()
            .register_type::<RendererParameters>();
    }
}
