//! Control commands and the scene deltas they produce
//!
//! The control panel never touches the scene directly. Each widget edit is sent
//! as a [`ControlChange`] message; [`SceneParameters::apply`] folds it into the
//! configuration and returns the [`SceneDelta`] the scene handler must perform.
//! Keeping the two steps apart lets the configuration side be tested without a
//! world.

use super::SceneParameters;
use bevy::ecs::message::Message;

/// A single edit made on the control panel
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub enum ControlChange {
    ShadowsEnable(bool),
    SpotLightTargetX(f32),
    SpotLightTargetY(f32),
    SpotLightTargetZ(f32),
    SpotLightIntensity(f32),
    RotationEnable(bool),
}

/// Scene work required after a parameter change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneDelta {
    /// Write the flag onto every node that currently carries one
    CastShadows(bool),
    /// Tear down and recreate the tracked lights
    RespawnLights,
    /// Rotation flag flipped; the render loop picks it up on the next frame
    RotationToggled,
}

impl SceneParameters {
    /// Fold a control edit into the parameters
    pub fn apply(&mut self, change: ControlChange) -> SceneDelta {
        match change {
            ControlChange::ShadowsEnable(enabled) => {
                self.shadows.shadows_enable = enabled;
                SceneDelta::CastShadows(enabled)
            }
            ControlChange::SpotLightTargetX(value) => {
                self.lights.spot_light_target_x = value;
                SceneDelta::RespawnLights
            }
            ControlChange::SpotLightTargetY(value) => {
                self.lights.spot_light_target_y = value;
                SceneDelta::RespawnLights
            }
            ControlChange::SpotLightTargetZ(value) => {
                self.lights.spot_light_target_z = value;
                SceneDelta::RespawnLights
            }
            ControlChange::SpotLightIntensity(value) => {
                self.lights.spot_light_intensity = value;
                SceneDelta::RespawnLights
            }
            ControlChange::RotationEnable(enabled) => {
                self.scene.rotation_enable = enabled;
                SceneDelta::RotationToggled
            }
        }
    }
}
