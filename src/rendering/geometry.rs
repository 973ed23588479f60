//! Procedural geometry for the pieces
//!
//! Shape data lives in named tables ([`PAWN_SEGMENTS`], [`KING_CROSS`],
//! [`KING_PROFILE`]) and the algorithms that turn them into meshes
//! ([`BoxSegment::cuboid`], [`lathe_mesh`]) know nothing about chess. Any piece
//! can reuse either half.

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::render_resource::PrimitiveTopology;
use std::f32::consts::TAU;

/// Radial segments used for every surface of revolution
pub const LATHE_SEGMENTS: u32 = 24;

/// An axis-aligned box described in multiples of a piece size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxSegment {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    /// Height of the box centre above the board plane
    pub center_y: f32,
}

impl BoxSegment {
    const fn square(width: f32, height: f32, center_y: f32) -> Self {
        Self {
            width,
            height,
            depth: width,
            center_y,
        }
    }

    /// Box primitive at the given scale
    pub fn cuboid(&self, size: f32) -> Cuboid {
        Cuboid::new(self.width * size, self.height * size, self.depth * size)
    }

    /// Centre of the scaled box placed at `(x, z)` on the board
    pub fn center(&self, size: f32, x: f32, z: f32) -> Vec3 {
        Vec3::new(x, self.center_y * size, z)
    }
}

/// Pawn silhouette, bottom to top: base plate, foot, collar, body, collar,
/// neck, collar, stem, head
pub const PAWN_SEGMENTS: [BoxSegment; 9] = [
    BoxSegment::square(1.7, 0.1, 0.0),
    BoxSegment::square(1.3, 0.8, 0.4),
    BoxSegment::square(1.4, 0.1, 0.8),
    BoxSegment::square(1.0, 0.7, 1.2),
    BoxSegment::square(1.1, 0.1, 1.6),
    BoxSegment::square(0.6, 1.1, 2.2),
    BoxSegment::square(0.7, 0.1, 2.7),
    BoxSegment::square(0.2, 0.4, 2.9),
    BoxSegment::square(0.9, 0.8, 3.2),
];

/// Cross ornament on top of the king: upright then crossbar
pub const KING_CROSS: [BoxSegment; 2] = [
    BoxSegment {
        width: 0.2,
        height: 0.7,
        depth: 0.1,
        center_y: 4.3,
    },
    BoxSegment {
        width: 0.5,
        height: 0.2,
        depth: 0.1,
        center_y: 4.3,
    },
];

/// King silhouette as `(radius, height)` pairs, starting and ending on the axis
pub const KING_PROFILE: [Vec2; 31] = [
    Vec2::new(0.0, 0.0),
    Vec2::new(1.0, 0.0),
    Vec2::new(1.05, 0.072),
    Vec2::new(0.946, 0.159),
    Vec2::new(0.997, 0.204),
    Vec2::new(0.885, 0.296),
    Vec2::new(1.0, 0.468),
    Vec2::new(0.93, 0.6),
    Vec2::new(0.67, 0.71),
    Vec2::new(0.78, 0.79),
    Vec2::new(0.688, 0.872),
    Vec2::new(0.638, 0.852),
    Vec2::new(0.43, 1.43),
    Vec2::new(0.34, 2.12),
    Vec2::new(0.334, 2.67),
    Vec2::new(0.54, 2.67),
    Vec2::new(0.643, 2.81),
    Vec2::new(0.496, 2.9),
    Vec2::new(0.5, 2.96),
    Vec2::new(0.41, 3.0),
    Vec2::new(0.445, 3.06),
    Vec2::new(0.324, 3.12),
    Vec2::new(0.4, 3.36),
    Vec2::new(0.55, 3.63),
    Vec2::new(0.612, 3.79),
    Vec2::new(0.506, 3.78),
    Vec2::new(0.273, 3.88),
    Vec2::new(0.208, 3.93),
    Vec2::new(0.263, 4.0),
    Vec2::new(0.172, 4.08),
    Vec2::new(0.0, 4.085),
];

/// Outward 2D normal at each profile point, averaged from adjacent edges
fn profile_normals(profile: &[Vec2]) -> Vec<Vec2> {
    let edge_normal = |a: Vec2, b: Vec2| {
        let d = b - a;
        Vec2::new(d.y, -d.x).normalize_or_zero()
    };

    (0..profile.len())
        .map(|j| {
            let before = (j > 0).then(|| edge_normal(profile[j - 1], profile[j]));
            let after = (j + 1 < profile.len()).then(|| edge_normal(profile[j], profile[j + 1]));
            match (before, after) {
                (Some(a), Some(b)) => (a + b).normalize_or_zero(),
                (Some(n), None) | (None, Some(n)) => n,
                (None, None) => Vec2::Y,
            }
        })
        .collect()
}

/// Sweep a 2D profile a full turn around the Y axis
///
/// Profile points are `(radius, height)`. The result is a non-indexed triangle
/// list with smooth normals and `(turn, profile)` UVs.
pub fn lathe_mesh(profile: &[Vec2], segments: u32) -> Mesh {
    let segments = segments.max(3);
    let normals_2d = profile_normals(profile);

    // Vertex ring for each segment boundary, the seam duplicated for UVs
    let ring = |i: u32| {
        let phi = i as f32 / segments as f32 * TAU;
        let (sin, cos) = phi.sin_cos();
        profile
            .iter()
            .zip(&normals_2d)
            .enumerate()
            .map(move |(j, (p, n))| {
                let position = [p.x * sin, p.y, p.x * cos];
                let normal = Vec3::new(n.x * sin, n.y, n.x * cos).normalize_or_zero();
                let uv = [
                    i as f32 / segments as f32,
                    j as f32 / (profile.len().max(2) - 1) as f32,
                ];
                (position, normal.to_array(), uv)
            })
            .collect::<Vec<_>>()
    };
    let rings: Vec<_> = (0..=segments).map(ring).collect();

    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut uvs = Vec::new();

    for i in 0..segments as usize {
        for j in 0..profile.len().saturating_sub(1) {
            let a = rings[i][j];
            let b = rings[i + 1][j];
            let c = rings[i + 1][j + 1];
            let d = rings[i][j + 1];
            for (position, normal, uv) in [a, b, d, c, d, b] {
                positions.push(position);
                normals.push(normal);
                uvs.push(uv);
            }
        }
    }

    Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::default(),
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
    .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
    .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
}
