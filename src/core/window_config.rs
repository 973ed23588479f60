//! Window configuration resource
//!
//! The viewport is sized once at startup; native builds open a window of the
//! configured size and wasm builds attach to a canvas fitted to its parent.

use bevy::prelude::*;
use bevy::window::{PresentMode, Window, WindowResolution};

/// Configuration for the primary application window
#[derive(Resource, Debug, Clone, Reflect)]
#[reflect(Resource)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Window width in logical pixels
    pub width: u32,
    /// Window height in logical pixels
    pub height: u32,
    /// CSS selector of the canvas used on the web
    pub canvas: Option<String>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Chess Scene".to_string(),
            width: 1366,
            height: 768,
            canvas: Some("#bevy".to_string()),
        }
    }
}

impl WindowConfig {
    /// Create a Bevy Window from this configuration
    pub fn to_window(&self) -> Window {
        Window {
            title: self.title.clone(),
            resolution: WindowResolution::new(self.width, self.height),
            present_mode: PresentMode::AutoVsync,
            canvas: if cfg!(target_arch = "wasm32") {
                self.canvas.clone()
            } else {
                None
            },
            fit_canvas_to_parent: cfg!(target_arch = "wasm32"),
            prevent_default_event_handling: true,
            ..default()
        }
    }
}
