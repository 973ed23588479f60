//! Physical material presets for the board and pieces
//!
//! Every surface in the set is one of a handful of finishes that differ only in
//! a few PBR knobs. A [`Finish`] is tinted with a colour to produce a
//! [`StandardMaterial`].

use bevy::prelude::*;

/// Light board squares
pub const LIGHT_SQUARE: Color = Color::srgb(1.0, 1.0, 1.0);
/// Dark board squares (#2d1a0a)
pub const DARK_SQUARE: Color = Color::srgb(45.0 / 255.0, 26.0 / 255.0, 10.0 / 255.0);

/// Side a piece belongs to
#[derive(Clone, Copy, Debug, Component, PartialEq, Eq, Reflect, Default)]
#[reflect(Component)]
pub enum PieceColor {
    #[default]
    White,
    Black,
}

impl PieceColor {
    pub fn color(&self) -> Color {
        match self {
            PieceColor::White => Color::WHITE,
            PieceColor::Black => Color::BLACK,
        }
    }
}

/// PBR parameters shared by a family of surfaces
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Finish {
    pub metallic: f32,
    pub roughness: f32,
    pub clearcoat: f32,
    pub clearcoat_roughness: f32,
    pub reflectance: f32,
    pub transmission: f32,
}

impl Finish {
    /// Frosted glass used by the pawns
    pub const GLASS: Finish = Finish {
        metallic: 0.0,
        roughness: 0.5,
        clearcoat: 0.0,
        clearcoat_roughness: 0.3,
        reflectance: 0.5,
        transmission: 0.9,
    };

    /// Lacquered finish used by kings and rooks
    pub const LACQUER: Finish = Finish {
        metallic: 0.3,
        roughness: 0.8,
        clearcoat: 1.0,
        clearcoat_roughness: 0.1,
        reflectance: 0.7,
        transmission: 0.0,
    };

    /// Matte coated wood used by the board squares
    pub const BOARD: Finish = Finish {
        metallic: 0.0,
        roughness: 0.9,
        clearcoat: 0.7,
        clearcoat_roughness: 0.8,
        reflectance: 0.15,
        transmission: 0.0,
    };

    /// Build a material of this finish in the given colour
    pub fn tinted(&self, color: Color) -> StandardMaterial {
        let mut material = StandardMaterial {
            base_color: color,
            metallic: self.metallic,
            perceptual_roughness: self.roughness,
            clearcoat: self.clearcoat,
            clearcoat_perceptual_roughness: self.clearcoat_roughness,
            reflectance: self.reflectance,
            ..default()
        };
        if self.transmission > 0.0 {
            material.specular_transmission = self.transmission;
            material.thickness = 0.2;
        }
        material
    }
}

/// Black pedestal under the board
pub fn pedestal_material() -> StandardMaterial {
    StandardMaterial {
        base_color: Color::BLACK,
        perceptual_roughness: 0.6,
        ..default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glass_is_transmissive() {
        let material = Finish::GLASS.tinted(Color::WHITE);
        assert_eq!(material.specular_transmission, 0.9);
        assert_eq!(material.perceptual_roughness, 0.5);
        assert_eq!(material.metallic, 0.0);
    }

    #[test]
    fn test_lacquer_is_opaque() {
        let material = Finish::LACQUER.tinted(Color::BLACK);
        assert_eq!(material.specular_transmission, 0.0);
        assert_eq!(material.clearcoat, 1.0);
        assert_eq!(material.base_color, Color::BLACK);
        assert!(matches!(material.alpha_mode, AlphaMode::Opaque));
    }

    #[test]
    fn test_board_finish_keeps_colour() {
        let material = Finish::BOARD.tinted(DARK_SQUARE);
        assert_eq!(material.base_color, DARK_SQUARE);
        assert_eq!(material.reflectance, 0.15);
    }

    #[test]
    fn test_piece_color_mapping() {
        assert_eq!(PieceColor::White.color(), Color::WHITE);
        assert_eq!(PieceColor::Black.color(), Color::BLACK);
    }
}
