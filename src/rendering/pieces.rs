//! Chess piece generators and the starting layout
//!
//! - **Pawn**: nine stacked boxes from [`PAWN_SEGMENTS`], one translucent
//!   material per pawn shared by its segments, each segment its own mesh.
//! - **King**: a lathed [`KING_PROFILE`] plus the two [`KING_CROSS`] boxes,
//!   grouped under one king node.
//! - **Rook**: the first object of an OBJ file, attached once the asynchronous
//!   load completes. A failed load leaves the corner empty.
//!
//! Everything is parented into the rotatable group. Only pawn segments read
//! the current shadow flag when built; kings and rooks start without shadows
//! like every other node.

use crate::assets::{fail_task, poll_load, AssetTask, LoadOutcome};
use crate::core::{SceneConfig, SceneParameters};
use crate::rendering::geometry::{
    lathe_mesh, KING_CROSS, KING_PROFILE, LATHE_SEGMENTS, PAWN_SEGMENTS,
};
use crate::rendering::materials::{Finish, PieceColor};
use crate::rendering::rotation::Rotatables;
use crate::rendering::shadows::CastShadow;
use bevy::light::NotShadowReceiver;
use bevy::prelude::*;

/// Kind of piece a mesh belongs to
#[derive(Component, Clone, Copy, PartialEq, Eq, Debug, Reflect)]
#[reflect(Component)]
pub enum PieceKind {
    Pawn,
    King,
    Rook,
}

/// Identifies the piece a mesh or group is part of
#[derive(Component, Clone, Copy, Debug, Reflect)]
#[reflect(Component)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: PieceColor,
}

/// Where and how large a piece is placed on the board plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub size: f32,
    pub color: PieceColor,
    pub x: f32,
    pub z: f32,
}

fn piece_name(kind: PieceKind, color: PieceColor) -> String {
    format!("{:?} {:?}", color, kind)
}

/// Build one pawn from [`PAWN_SEGMENTS`]
///
/// Returns the nine segment entities. Each call creates fresh meshes and one
/// new material shared only among its own segments.
pub fn spawn_pawn(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    group: Entity,
    placement: Placement,
    cast_shadow: bool,
) -> Vec<Entity> {
    let material = materials.add(Finish::GLASS.tinted(placement.color.color()));
    let piece = Piece {
        kind: PieceKind::Pawn,
        color: placement.color,
    };

    PAWN_SEGMENTS
        .iter()
        .map(|segment| {
            commands
                .spawn((
                    Mesh3d(meshes.add(segment.cuboid(placement.size))),
                    MeshMaterial3d(material.clone()),
                    Transform::from_translation(segment.center(
                        placement.size,
                        placement.x,
                        placement.z,
                    )),
                    CastShadow(cast_shadow),
                    NotShadowReceiver,
                    piece,
                    ChildOf(group),
                ))
                .id()
        })
        .collect()
}

/// Build one king: lathed body plus cross, grouped under a king node
///
/// Returns the king node; its three meshes are its children.
pub fn spawn_king(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    group: Entity,
    placement: Placement,
) -> Entity {
    let material = materials.add(Finish::LACQUER.tinted(placement.color.color()));
    let piece = Piece {
        kind: PieceKind::King,
        color: placement.color,
    };
    let Placement { size: scale, x, z, .. } = placement;

    let king = commands
        .spawn((
            Transform::default(),
            Visibility::default(),
            CastShadow(false),
            piece,
            ChildOf(group),
            Name::new(piece_name(PieceKind::King, placement.color)),
        ))
        .id();

    for segment in &KING_CROSS {
        commands.spawn((
            Mesh3d(meshes.add(segment.cuboid(scale))),
            MeshMaterial3d(material.clone()),
            Transform::from_translation(segment.center(scale, x, z)),
            CastShadow(false),
            NotShadowReceiver,
            piece,
            ChildOf(king),
        ));
    }

    commands.spawn((
        Mesh3d(meshes.add(lathe_mesh(&KING_PROFILE, LATHE_SEGMENTS))),
        MeshMaterial3d(material),
        Transform::from_xyz(x, 0.0, z).with_scale(Vec3::splat(scale)),
        CastShadow(false),
        NotShadowReceiver,
        piece,
        ChildOf(king),
    ));

    king
}

/// A rook waiting for its mesh
#[derive(Component, Debug, Clone)]
pub struct PendingRook {
    pub placement: Placement,
    pub material: Handle<StandardMaterial>,
}

/// Queue a rook whose mesh arrives through `mesh`
///
/// The material is created immediately; the piece itself appears on the first
/// frame the mesh is available. Returns the task entity.
pub fn request_rook(
    commands: &mut Commands,
    materials: &mut Assets<StandardMaterial>,
    mesh: Handle<Mesh>,
    placement: Placement,
) -> Entity {
    let material = materials.add(Finish::LACQUER.tinted(placement.color.color()));
    commands
        .spawn((
            AssetTask::new(mesh, piece_name(PieceKind::Rook, placement.color)),
            PendingRook {
                placement,
                material,
            },
        ))
        .id()
}

/// Completion and failure handling for queued rooks
pub fn resolve_pending_rooks(
    mut commands: Commands,
    server: Res<AssetServer>,
    meshes: Res<Assets<Mesh>>,
    rotatables: Option<Res<Rotatables>>,
    pending: Query<(Entity, &AssetTask<Mesh>, &PendingRook)>,
) {
    let Some(rotatables) = rotatables else {
        return;
    };

    for (task, load, rook) in pending.iter() {
        match poll_load(&server, &meshes, &load.handle) {
            LoadOutcome::Pending => {}
            LoadOutcome::Ready(_) => {
                let Placement { size, x, z, color } = rook.placement;
                commands.spawn((
                    Mesh3d(load.handle.clone()),
                    MeshMaterial3d(rook.material.clone()),
                    Transform::from_xyz(x, 0.0, z).with_scale(Vec3::splat(size)),
                    CastShadow(false),
                    NotShadowReceiver,
                    Piece {
                        kind: PieceKind::Rook,
                        color,
                    },
                    ChildOf(rotatables.0),
                    Name::new(load.label.clone()),
                ));
                commands.entity(task).despawn();
                debug!("[PIECES] {} attached", load.label);
            }
            LoadOutcome::Failed(error) => fail_task(&mut commands, task, &load.label, &error),
        }
    }
}

/// The fixed starting layout
///
/// Eight pawns per side on one rank, one king per side, and rooks in the four
/// corners.
pub struct PieceLayout {
    pub pawns: Vec<Placement>,
    pub kings: [Placement; 2],
    pub rooks: [Placement; 4],
}

impl PieceLayout {
    pub fn for_board(config: &SceneConfig) -> Self {
        let scene_size = config.scene_size;
        let (unit, half) = (config.unit(), config.half());
        let edge = scene_size / 2.0;

        let pawn_rank = |color, z| {
            (0..8).map(move |i| Placement {
                size: scene_size / 26.0,
                color,
                x: -edge + i as f32 * unit + half,
                z,
            })
        };
        let pawns = pawn_rank(PieceColor::White, unit * 2.0 + half)
            .chain(pawn_rank(PieceColor::Black, -unit * 3.0 + half))
            .collect();

        let king = |color, x, z| Placement {
            size: scene_size * 0.05,
            color,
            x,
            z,
        };
        let rook = |color, x, z| Placement {
            size: scene_size / 23.0,
            color,
            x,
            z,
        };

        Self {
            pawns,
            kings: [
                king(PieceColor::White, -unit + half, unit * 3.0 + half),
                king(PieceColor::Black, half, -unit * 4.0 + half),
            ],
            rooks: [
                rook(PieceColor::Black, -edge + half, -edge + half),
                rook(PieceColor::Black, edge - half, -edge + half),
                rook(PieceColor::White, -edge + half, edge - half),
                rook(PieceColor::White, edge - half, edge - half),
            ],
        }
    }
}

/// Spawn every piece of the starting layout into `group`
///
/// Pawns and kings exist as soon as the commands apply; rooks are queued on
/// `rook_mesh` and appear later.
pub fn spawn_pieces(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    group: Entity,
    rook_mesh: Handle<Mesh>,
    config: &SceneConfig,
    params: &SceneParameters,
) {
    let layout = PieceLayout::for_board(config);

    for placement in &layout.pawns {
        spawn_pawn(
            commands,
            meshes,
            materials,
            group,
            *placement,
            params.shadows.shadows_enable,
        );
    }
    for placement in layout.kings {
        spawn_king(commands, meshes, materials, group, placement);
    }
    for placement in layout.rooks {
        request_rook(commands, materials, rook_mesh.clone(), placement);
    }

    info!(
        "[PIECES] Spawned {} pawns and {} kings, {} rooks loading",
        layout.pawns.len(),
        layout.kings.len(),
        layout.rooks.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_counts() {
        let layout = PieceLayout::for_board(&SceneConfig::default());
        assert_eq!(layout.pawns.len(), 16);
        assert_eq!(
            layout
                .pawns
                .iter()
                .filter(|p| p.color == PieceColor::White)
                .count(),
            8
        );
    }

    #[test]
    fn test_pawn_ranks() {
        let layout = PieceLayout::for_board(&SceneConfig::default());
        let (white, black): (Vec<&Placement>, Vec<&Placement>) = layout
            .pawns
            .iter()
            .partition(|p| p.color == PieceColor::White);
        assert!(white.iter().all(|p| p.z == 2.5));
        assert!(black.iter().all(|p| p.z == -2.5));
        let files: Vec<f32> = white.iter().map(|p| p.x).collect();
        assert_eq!(files, vec![-3.5, -2.5, -1.5, -0.5, 0.5, 1.5, 2.5, 3.5]);
    }

    #[test]
    fn test_kings_and_rooks() {
        let layout = PieceLayout::for_board(&SceneConfig::default());
        assert_eq!((layout.kings[0].x, layout.kings[0].z), (-0.5, 3.5));
        assert_eq!((layout.kings[1].x, layout.kings[1].z), (0.5, -3.5));
        assert!((layout.kings[0].size - 0.4).abs() < 1e-6);

        let corners: Vec<(f32, f32)> = layout.rooks.iter().map(|r| (r.x, r.z)).collect();
        assert_eq!(
            corners,
            vec![(-3.5, -3.5), (3.5, -3.5), (-3.5, 3.5), (3.5, 3.5)]
        );
        assert!(layout.rooks[..2].iter().all(|r| r.color == PieceColor::Black));
        assert!(layout.rooks[2..].iter().all(|r| r.color == PieceColor::White));
    }

    #[test]
    fn test_piece_name() {
        assert_eq!(piece_name(PieceKind::Rook, PieceColor::Black), "Black Rook");
    }
}
