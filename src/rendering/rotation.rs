//! The rotatable group and the per-frame spin
//!
//! Every board and piece mesh is a descendant of a single group entity so one
//! transform turns the whole set. The spin is a fixed increment per frame with
//! no delta-time compensation, so its speed follows the achieved frame rate.

use crate::core::{SceneConfig, SceneParameters};
use bevy::prelude::*;

/// Marker for the group holding every board and piece mesh
#[derive(Component, Debug, Default, Reflect)]
#[reflect(Component)]
pub struct RotatableGroup;

/// Entity of the rotatable group, available once the scene is set up
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rotatables(pub Entity);

/// Spawn the group at the scene origin and publish it as a resource
pub fn spawn_rotatables(commands: &mut Commands) -> Entity {
    let group = commands
        .spawn((
            Transform::default(),
            Visibility::default(),
            RotatableGroup,
            Name::new("Rotatables"),
        ))
        .id();
    commands.insert_resource(Rotatables(group));
    group
}

/// Rotate the group about world Y while rotation is enabled
///
/// The group is a scene root, so its parent space is world space.
pub fn spin_rotatables(
    params: Res<SceneParameters>,
    config: Res<SceneConfig>,
    mut groups: Query<&mut Transform, With<RotatableGroup>>,
) {
    if !params.scene.rotation_enable {
        return;
    }

    for mut transform in groups.iter_mut() {
        transform.rotate_axis(Dir3::Y, config.rotation_step);
    }
}
