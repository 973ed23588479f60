//! UI module - the egui control panel
//!
//! A single floating window, always expanded, with in order:
//!
//! - "Enable shadows"
//! - spotlight target X/Y/Z over ±half the board, and intensity from 0.5 to 20
//! - "Enable rotation"
//!
//! Widgets never touch the scene. Each edit is sent as a
//! [`crate::core::ControlChange`] message and handled by
//! [`crate::rendering::handle_control_changes`].

pub mod control_panel;

pub use control_panel::*;

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

/// Control panel plugin, requires `EguiPlugin`
pub struct ControlPanelPlugin;

impl Plugin for ControlPanelPlugin {
    fn build(&self, app: &mut App) {
        // Edits made in this pass are applied in the next frame's update
        app.add_systems(EguiPrimaryContextPass, control_panel_ui);
    }
}
