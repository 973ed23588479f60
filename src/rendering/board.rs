//! Board creation
//!
//! Tiles an 8×8 grid of flattened boxes into the rotatable group, alternating
//! between two shared materials, and stands the board on a tall pedestal that
//! stays fixed in the scene while the set rotates.

use crate::core::SceneConfig;
use crate::rendering::materials::{pedestal_material, Finish, DARK_SQUARE, LIGHT_SQUARE};
use crate::rendering::shadows::CastShadow;
use bevy::prelude::*;

/// Board square coordinates, `x` and `y` in `0..8`
#[derive(Default, Component, Debug, Clone, Copy, Eq, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Square {
    pub x: u8,
    pub y: u8,
}

impl Square {
    /// Light squares are those whose coordinate sum is even
    pub fn is_light(&self) -> bool {
        (self.x + self.y).is_multiple_of(2)
    }

    /// Centre of the square's top-level mesh for a board of the given size
    pub fn center(&self, scene_size: f32) -> Vec3 {
        let unit = scene_size / 8.0;
        Vec3::new(
            unit * self.x as f32 - scene_size / 2.0 + unit / 2.0,
            -scene_size * 0.02,
            unit * self.y as f32 - scene_size / 2.0 + unit / 2.0,
        )
    }
}

/// Material handles for the two square colours
#[derive(Resource, Debug, Clone)]
pub struct BoardMaterials {
    pub light: Handle<StandardMaterial>,
    pub dark: Handle<StandardMaterial>,
}

impl BoardMaterials {
    pub fn new(materials: &mut Assets<StandardMaterial>) -> Self {
        Self {
            light: materials.add(Finish::BOARD.tinted(LIGHT_SQUARE)),
            dark: materials.add(Finish::BOARD.tinted(DARK_SQUARE)),
        }
    }

    pub fn for_square(&self, square: &Square) -> Handle<StandardMaterial> {
        if square.is_light() {
            self.light.clone()
        } else {
            self.dark.clone()
        }
    }
}

/// Spawn the 64 squares as children of `group`
///
/// Squares receive shadows but never cast them.
pub fn spawn_board(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    group: Entity,
    config: &SceneConfig,
) -> Vec<Entity> {
    let unit = config.unit();
    let square_mesh = meshes.add(Cuboid::new(unit, unit * 0.3, unit));
    let board_materials = BoardMaterials::new(materials);

    let squares: Vec<_> = (0..8u8)
        .flat_map(|i| (0..8u8).map(move |j| Square { x: i, y: j }))
        .map(|square| {
            let file = (b'a' + square.y) as char;
            (
                Mesh3d(square_mesh.clone()),
                MeshMaterial3d(board_materials.for_square(&square)),
                Transform::from_translation(square.center(config.scene_size)),
                square,
                CastShadow(false),
                ChildOf(group),
                Name::new(format!("Square {}{}", file, square.x + 1)),
            )
        })
        .collect();

    let entities = squares
        .into_iter()
        .map(|bundle| commands.spawn(bundle).id())
        .collect();

    commands.insert_resource(board_materials);
    entities
}

/// Marker for the pedestal below the board
#[derive(Component, Debug, Default)]
pub struct Pedestal;

/// Spawn the pedestal directly in the scene, outside the rotatable group
pub fn spawn_pedestal(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    config: &SceneConfig,
) -> Entity {
    let size = config.scene_size;
    let mesh = meshes.add(Cylinder::new(size * 0.35, size * 10.0).mesh().resolution(24));

    commands
        .spawn((
            Mesh3d(mesh),
            MeshMaterial3d(materials.add(pedestal_material())),
            Transform::from_xyz(0.0, -size * 5.04, 0.0),
            CastShadow(false),
            Pedestal,
            Name::new("Pedestal"),
        ))
        .id()
}
