//! Scene lighting
//!
//! A spotlight from one corner of the board plus a dim ambient fill. Both are
//! tracked in [`ActiveLights`] so that any change to the light parameters can
//! tear the set down and rebuild it from the current [`SceneParameters`].

use crate::core::{SceneConfig, SceneParameters};
use crate::rendering::shadows::CastShadow;
use bevy::light::GlobalAmbientLight;
use bevy::prelude::*;

/// Spotlight colour (#555555)
pub const SPOT_COLOR: Color = Color::srgb(85.0 / 255.0, 85.0 / 255.0, 85.0 / 255.0);
/// Ambient fill colour (#202020)
pub const AMBIENT_COLOR: Color = Color::srgb(32.0 / 255.0, 32.0 / 255.0, 32.0 / 255.0);
/// Luminous power per unit of `spot_light_intensity`
pub const SPOT_LUMENS_PER_UNIT: f32 = 200_000.0;
/// Ambient brightness in cd/m²
pub const AMBIENT_BRIGHTNESS: f32 = 80.0;
pub const SPOT_RANGE: f32 = 50.0;

/// Lights currently in the scene, in creation order
#[derive(Resource, Debug, Default, Clone)]
pub struct ActiveLights(pub Vec<Entity>);

/// A uniform ambient contribution
///
/// The engine's ambient term is a single global value, so this is mirrored
/// into [`GlobalAmbientLight`] by [`sync_ambient_fill`].
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct AmbientFill {
    pub color: Color,
    pub brightness: f32,
}

/// Spotlight position for a board of the given size
pub fn spot_position(scene_size: f32) -> Vec3 {
    Vec3::new(-scene_size / 2.0, scene_size / 4.0, -scene_size / 2.0)
}

/// Transform at `position` facing `target`
///
/// A target on top of the light keeps the default orientation, and a target
/// straight above or below picks Z as the up vector.
pub fn spot_transform(position: Vec3, target: Vec3) -> Transform {
    let transform = Transform::from_translation(position);
    let Ok(direction) = Dir3::new(target - position) else {
        return transform;
    };
    let up = if direction.dot(Vec3::Y).abs() > 0.999 {
        Vec3::Z
    } else {
        Vec3::Y
    };
    transform.looking_to(direction, up)
}

/// Replace every tracked light with a fresh spotlight and ambient fill
///
/// Idempotent: after any number of calls exactly two lights exist.
pub fn spawn_lights(
    commands: &mut Commands,
    active: &mut ActiveLights,
    params: &SceneParameters,
    config: &SceneConfig,
) {
    for light in active.0.drain(..) {
        if let Ok(mut entity) = commands.get_entity(light) {
            entity.despawn();
        }
    }

    let lights = &params.lights;
    let spot = commands
        .spawn((
            SpotLight {
                color: SPOT_COLOR,
                intensity: lights.spot_light_intensity * SPOT_LUMENS_PER_UNIT,
                range: SPOT_RANGE,
                inner_angle: 0.0,
                outer_angle: lights.spot_light_angle,
                shadows_enabled: true,
                ..default()
            },
            spot_transform(spot_position(config.scene_size), lights.target()),
            CastShadow(true),
            Name::new("Spot Light"),
        ))
        .id();

    let ambient = commands
        .spawn((
            AmbientFill {
                color: AMBIENT_COLOR,
                brightness: AMBIENT_BRIGHTNESS,
            },
            Name::new("Ambient Light"),
        ))
        .id();

    active.0.extend([spot, ambient]);
    debug!(
        "[LIGHTS] Spot light aimed at {:?} with intensity {}",
        lights.target(),
        lights.spot_light_intensity
    );
}

/// Mirror the ambient fill into the engine's global ambient light
pub fn sync_ambient_fill(
    fills: Query<&AmbientFill>,
    changed: Query<(), Changed<AmbientFill>>,
    mut removed: RemovedComponents<AmbientFill>,
    ambient: Option<ResMut<GlobalAmbientLight>>,
) {
    let removed_any = removed.read().count() > 0;
    if changed.is_empty() && !removed_any {
        return;
    }
    let Some(mut ambient) = ambient else {
        return;
    };

    match fills.iter().next() {
        Some(fill) => {
            ambient.color = fill.color;
            ambient.brightness = fill.brightness;
        }
        None => ambient.brightness = 0.0,
    }
}
