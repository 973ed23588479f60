//! Rendering module - the chess scene
//!
//! Builds the static scene once at startup and keeps it in step with the live
//! [`SceneParameters`] every frame.
//!
//! # Architecture
//!
//! - `geometry` - piece profile tables and the lathe mesh builder
//! - `materials` - PBR finishes for squares and pieces
//! - `board` - 8×8 squares and the pedestal
//! - `pieces` - pawn, king and rook generators and the starting layout
//! - `lights` - spotlight and ambient fill, rebuilt on parameter changes
//! - `shadows` - per-node cast-shadow flags
//! - `rotation` - the rotatable group and its per-frame spin
//! - `camera` - trackball camera
//! - `environment` - HDR background and image based lighting
//! - `obj_loader` - Wavefront OBJ asset loader for the rooks
//!
//! # Frame Order
//!
//! Control changes are applied first, then flags are synchronised into the
//! engine, then the group spins. Asynchronous loads are resolved whenever their
//! asset arrives.

pub mod board;
pub mod camera;
pub mod environment;
pub mod geometry;
pub mod lights;
pub mod materials;
pub mod obj_loader;
pub mod pieces;
pub mod rotation;
pub mod shadows;

pub use board::*;
pub use camera::*;
pub use environment::*;
pub use lights::*;
pub use materials::*;
pub use pieces::*;
pub use rotation::*;
pub use shadows::*;

use crate::core::{ControlChange, SceneConfig, SceneDelta, SceneParameters};
use bevy::prelude::*;
use obj_loader::ObjLoader;

/// System sets for the per-frame scene update
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SceneSet {
    /// Fold control messages into parameters and scene state
    Controls,
    /// Push component state into the engine
    Sync,
    /// Per-frame animation
    Animate,
}

/// Builds the scene and runs its per-frame update
///
/// Requires [`crate::core::CorePlugin`] and the asset plugin.
pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_asset_loader::<ObjLoader>()
            .init_resource::<ActiveLights>()
            .register_type::<CastShadow>()
            .register_type::<Square>()
            .register_type::<Piece>()
            .register_type::<PieceColor>()
            .register_type::<RotatableGroup>()
            .configure_sets(
                Update,
                (SceneSet::Controls, SceneSet::Sync, SceneSet::Animate).chain(),
            )
            .add_systems(Startup, setup_scene)
            .add_systems(Update, handle_control_changes.in_set(SceneSet::Controls))
            .add_systems(
                Update,
                (
                    resolve_pending_rooks,
                    resolve_environment,
                    sync_shadow_casters,
                    sync_ambient_fill,
                )
                    .in_set(SceneSet::Sync),
            )
            .add_systems(Update, spin_rotatables.in_set(SceneSet::Animate));
    }
}

/// Build the whole scene
///
/// Everything except the rook meshes and the environment map exists once the
/// startup commands apply.
pub fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut active_lights: ResMut<ActiveLights>,
    server: Res<AssetServer>,
    config: Res<SceneConfig>,
    params: Res<SceneParameters>,
) {
    spawn_camera(&mut commands, &params);
    spawn_pedestal(&mut commands, &mut meshes, &mut materials, &config);
    spawn_lights(&mut commands, &mut active_lights, &params, &config);

    let group = spawn_rotatables(&mut commands);
    spawn_board(&mut commands, &mut meshes, &mut materials, group, &config);

    let rook_mesh: Handle<Mesh> = server.load(config.rook_mesh_path.clone());
    spawn_pieces(
        &mut commands,
        &mut meshes,
        &mut materials,
        group,
        rook_mesh,
        &config,
        &params,
    );
    request_environment(&mut commands, &server, &config);

    info!(
        "[SCENE] Scene built, board size {} with {} lights",
        config.scene_size,
        active_lights.0.len()
    );
}

/// Apply control messages and carry out the resulting scene work
///
/// Several light edits in one frame rebuild the lights once.
pub fn handle_control_changes(
    mut commands: Commands,
    mut changes: MessageReader<ControlChange>,
    mut params: ResMut<SceneParameters>,
    mut active_lights: ResMut<ActiveLights>,
    config: Res<SceneConfig>,
    mut shadow_flags: Query<&mut CastShadow>,
) {
    let mut respawn_lights = false;

    for change in changes.read() {
        match params.apply(*change) {
            SceneDelta::CastShadows(enabled) => {
                let visited = cast_shadows_everywhere(enabled, &mut shadow_flags);
                info!("[SCENE] Shadows {} on {} nodes", enabled, visited);
            }
            SceneDelta::RespawnLights => respawn_lights = true,
            SceneDelta::RotationToggled => match serde_json::to_string(&*params) {
                Ok(json) => info!("[SCENE] Parameters {}", json),
                Err(error) => warn!("[SCENE] Could not serialise parameters: {}", error),
            },
        }
    }

    if respawn_lights {
        spawn_lights(&mut commands, &mut active_lights, &params, &config);
    }
}
