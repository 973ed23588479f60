//! Core module - application context shared by every scene system
//!
//! There are no globals in this crate. Everything a script would keep in
//! module-level variables lives in ECS resources owned by the [`App`]:
//!
//! - [`SceneParameters`] - live values edited through the control panel
//! - [`SceneConfig`] - fixed layout constants and asset paths
//! - [`WindowConfig`] - viewport settings applied at startup
//!
//! Control edits travel as [`ControlChange`] messages and are folded into the
//! parameters by [`SceneParameters::apply`], which reports the resulting
//! [`SceneDelta`].
//!
//! [`App`]: bevy::prelude::App

pub mod commands;
pub mod error;
pub mod plugin;
pub mod resources;
pub mod window_config;

// Re-export commonly used items
pub use commands::{ControlChange, SceneDelta};
pub use error::{SceneError, SceneResult};
pub use plugin::CorePlugin;
pub use resources::*;
pub use window_config::WindowConfig;
