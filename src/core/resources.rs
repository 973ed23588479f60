//! Core resources shared by every scene system
//!
//! [`SceneParameters`] is the live tweakable record edited through the control
//! panel. [`SceneConfig`] holds the fixed layout constants and asset paths that
//! never change after startup.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Edge length of the board in world units
pub const SCENE_SIZE: f32 = 8.0;

/// Live scene parameters, mutated only through [`crate::core::ControlChange`]
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[reflect(Resource)]
pub struct SceneParameters {
    pub shadows: ShadowParameters,
    pub lights: LightParameters,
    pub scene: RotationParameters,
    pub renderer: RendererParameters,
}

impl Default for SceneParameters {
    fn default() -> Self {
        Self {
            shadows: ShadowParameters::default(),
            lights: LightParameters::default(),
            scene: RotationParameters::default(),
            renderer: RendererParameters::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Reflect)]
pub struct ShadowParameters {
    /// Value written to every node's cast-shadow flag when toggled
    pub shadows_enable: bool,
}

/// Spotlight configuration
///
/// Target coordinates and intensity are exposed on the control panel.
/// `spot_light_angle` has no widget and keeps its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
pub struct LightParameters {
    pub spot_light_target_x: f32,
    pub spot_light_target_y: f32,
    pub spot_light_target_z: f32,
    pub spot_light_intensity: f32,
    /// Cone half-angle in radians
    pub spot_light_angle: f32,
}

impl Default for LightParameters {
    fn default() -> Self {
        Self {
            spot_light_target_x: 4.0,
            spot_light_target_y: 10.0,
            spot_light_target_z: 4.0,
            spot_light_intensity: 3.0,
            spot_light_angle: std::f32::consts::PI / 12.0,
        }
    }
}

impl LightParameters {
    pub fn target(&self) -> Vec3 {
        Vec3::new(
            self.spot_light_target_x,
            self.spot_light_target_y,
            self.spot_light_target_z,
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Reflect)]
pub struct RotationParameters {
    pub rotation_enable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
pub struct RendererParameters {
    /// Linear exposure multiplier applied before tone mapping (no widget)
    pub exposure: f32,
}

impl Default for RendererParameters {
    fn default() -> Self {
        Self { exposure: 0.1 }
    }
}

impl RendererParameters {
    /// Camera EV100 equivalent of the linear exposure multiplier
    ///
    /// An exposure of 1.0 maps onto the engine's default EV100 and every halving
    /// of the multiplier adds one stop.
    pub fn ev100(&self) -> f32 {
        const BASE_EV100: f32 = 9.7;
        BASE_EV100 - self.exposure.max(f32::EPSILON).log2()
    }
}

/// Fixed configuration read once at startup
#[derive(Resource, Debug, Clone, Reflect)]
#[reflect(Resource)]
pub struct SceneConfig {
    /// Board edge length, drives every layout constant
    pub scene_size: f32,
    /// Equirectangular HDR used for background and image based lighting
    pub environment_path: String,
    /// OBJ mesh used for the rooks
    pub rook_mesh_path: String,
    /// Edge length in texels of each generated cubemap face
    pub cubemap_face_size: u32,
    /// Per-frame rotation of the rotatable group in radians
    pub rotation_step: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            scene_size: SCENE_SIZE,
            environment_path: "old_hall_2k.hdr".to_string(),
            rook_mesh_path: "rook.obj".to_string(),
            cubemap_face_size: 512,
            rotation_step: 0.003,
        }
    }
}

impl SceneConfig {
    /// Width of one board square
    pub fn unit(&self) -> f32 {
        self.scene_size / 8.0
    }

    /// Half a board square, used to centre pieces on squares
    pub fn half(&self) -> f32 {
        self.scene_size / 16.0
    }

    /// Slider bound for the spotlight target axes
    pub fn target_range(&self) -> std::ops::RangeInclusive<f32> {
        -self.scene_size / 2.0..=self.scene_size / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_parameters_match_demo() {
        let params = SceneParameters::default();
        assert!(!params.shadows.shadows_enable);
        assert!(!params.scene.rotation_enable);
        assert_eq!(params.lights.target(), Vec3::new(4.0, 10.0, 4.0));
        assert_eq!(params.lights.spot_light_intensity, 3.0);
        assert!((params.lights.spot_light_angle - 0.261_799).abs() < 1e-5);
        assert_eq!(params.renderer.exposure, 0.1);
    }

    #[test]
    fn test_layout_units() {
        let config = SceneConfig::default();
        assert_eq!(config.unit(), 1.0);
        assert_eq!(config.half(), 0.5);
        assert_eq!(config.target_range(), -4.0..=4.0);
    }

    #[test]
    fn test_ev100_darkens_with_lower_exposure() {
        let unit = RendererParameters { exposure: 1.0 };
        let tenth = RendererParameters { exposure: 0.1 };
        assert!((unit.ev100() - 9.7).abs() < 1e-5);
        assert!((tenth.ev100() - (9.7 + 10f32.log2())).abs() < 1e-4);
    }

    #[test]
    fn test_parameters_serialize_with_group_names() {
        let json = serde_json::to_value(SceneParameters::default()).unwrap();
        assert_eq!(json["scene"]["rotation_enable"], false);
        assert_eq!(json["lights"]["spot_light_intensity"], 3.0);
    }
}
