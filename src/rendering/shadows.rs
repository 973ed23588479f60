//! Shadow casting flags
//!
//! Each scene node carries a [`CastShadow`] flag that mirrors the engine's
//! per-entity shadow state. The shadow toggle writes the flag on every node that
//! exists at that moment; nodes spawned later keep whatever value their
//! generator gave them.

use bevy::light::NotShadowCaster;
use bevy::prelude::*;

/// Whether this node casts shadows
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct CastShadow(pub bool);

/// Write `enabled` onto every flagged node, returning how many were visited
pub fn cast_shadows_everywhere(enabled: bool, nodes: &mut Query<&mut CastShadow>) -> usize {
    let mut visited = 0;
    for mut flag in nodes.iter_mut() {
        flag.0 = enabled;
        visited += 1;
    }
    visited
}

/// Push changed flags into the engine
///
/// Lights toggle their shadow maps; meshes gain or lose [`NotShadowCaster`].
pub fn sync_shadow_casters(
    mut commands: Commands,
    mut changed: Query<(Entity, &CastShadow, Option<&mut SpotLight>), Changed<CastShadow>>,
) {
    for (entity, flag, spot_light) in changed.iter_mut() {
        match spot_light {
            Some(mut light) => light.shadows_enabled = flag.0,
            None if flag.0 => {
                commands.entity(entity).remove::<NotShadowCaster>();
            }
            None => {
                commands.entity(entity).insert(NotShadowCaster);
            }
        }
    }
}
