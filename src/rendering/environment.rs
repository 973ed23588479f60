//! Environment map
//!
//! The equirectangular HDR is loaded asynchronously, converted to a cubemap on
//! the CPU and attached to the camera as both the background and the image
//! based light. Until that happens the background stays the clear colour; if
//! the load fails it stays that way.

use crate::assets::{fail_task, poll_load, AssetTask, LoadOutcome};
use crate::core::{SceneConfig, SceneError, SceneResult};
use crate::rendering::camera::SceneCamera;
use bevy::{
    asset::RenderAssetUsages,
    core_pipeline::Skybox,
    light::EnvironmentMapLight,
    prelude::*,
    render::render_resource::{
        Extent3d, TextureDimension, TextureFormat, TextureViewDescriptor, TextureViewDimension,
    },
};
use std::f32::consts::PI;

/// Luminance that maps HDR value 1.0 onto display white at the default EV100
pub const ENVIRONMENT_BRIGHTNESS: f32 = 1000.0;

/// Marker for the environment load task
#[derive(Component, Debug, Default)]
pub struct PendingEnvironment;

/// Cube faces in layer order: +X, -X, +Y, -Y, +Z, -Z
pub const CUBE_FACES: usize = 6;

/// World direction through face texel coordinate `(s, t)`, both in `[-1, 1]`
///
/// `t` grows downwards on every face.
pub fn face_direction(face: usize, s: f32, t: f32) -> Vec3 {
    let direction = match face {
        0 => Vec3::new(1.0, -t, -s),
        1 => Vec3::new(-1.0, -t, s),
        2 => Vec3::new(s, 1.0, t),
        3 => Vec3::new(s, -1.0, -t),
        4 => Vec3::new(s, -t, 1.0),
        _ => Vec3::new(-s, -t, -1.0),
    };
    direction.normalize()
}

/// Equirectangular texture coordinate for a unit direction, `v` growing upwards
pub fn equirect_uv(direction: Vec3) -> Vec2 {
    let u = direction.z.atan2(direction.x) / (2.0 * PI) + 0.5;
    let v = direction.y.clamp(-1.0, 1.0).asin() / PI + 0.5;
    Vec2::new(u, v)
}

fn blank_face(face_size: u32) -> Image {
    Image::new_fill(
        Extent3d {
            width: face_size,
            height: face_size,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        &[0; 8],
        TextureFormat::Rgba16Float,
        RenderAssetUsages::RENDER_WORLD,
    )
}

/// Resample an equirectangular image into an `Rgba16Float` cube texture
///
/// Nearest-texel sampling; each face is `face_size` texels square.
pub fn equirect_to_cubemap(source: &Image, face_size: u32) -> SceneResult<Image> {
    let _span = tracing::info_span!("equirect_to_cubemap", face_size).entered();

    if source.texture_descriptor.dimension != TextureDimension::D2
        || source.texture_descriptor.size.depth_or_array_layers != 1
    {
        return Err(SceneError::UnsupportedTexture {
            message: format!(
                "expected a single 2D layer, got {:?} with {} layers",
                source.texture_descriptor.dimension,
                source.texture_descriptor.size.depth_or_array_layers
            ),
        });
    }
    let (width, height) = (source.width(), source.height());
    if width == 0 || height == 0 || face_size == 0 {
        return Err(SceneError::UnsupportedTexture {
            message: format!("empty source {}x{} or face {}", width, height, face_size),
        });
    }

    let mut face = blank_face(face_size);
    let mut data = Vec::with_capacity(face_size as usize * face_size as usize * CUBE_FACES * 8);
    let scale = 2.0 / face_size as f32;
    for face_index in 0..CUBE_FACES {
        for y in 0..face_size {
            let t = (y as f32 + 0.5) * scale - 1.0;
            for x in 0..face_size {
                let s = (x as f32 + 0.5) * scale - 1.0;
                let uv = equirect_uv(face_direction(face_index, s, t));
                let sx = ((uv.x * width as f32) as u32).min(width - 1);
                let sy = (((1.0 - uv.y) * height as f32) as u32).min(height - 1);
                let sample = source.get_color_at(sx, sy)?.to_linear();
                face.set_color_at(
                    x,
                    y,
                    Color::LinearRgba(LinearRgba {
                        alpha: 1.0,
                        ..sample
                    }),
                )?;
            }
        }
        let texels = face
            .data
            .as_deref()
            .ok_or_else(|| SceneError::UnsupportedTexture {
                message: "cube face has no pixel data".to_string(),
            })?;
        data.extend_from_slice(texels);
    }

    let mut cubemap = Image::new(
        Extent3d {
            width: face_size,
            height: face_size,
            depth_or_array_layers: CUBE_FACES as u32,
        },
        TextureDimension::D2,
        data,
        TextureFormat::Rgba16Float,
        RenderAssetUsages::RENDER_WORLD,
    );
    cubemap.texture_view_descriptor = Some(TextureViewDescriptor {
        dimension: Some(TextureViewDimension::Cube),
        ..default()
    });

    debug!(
        "[ENVIRONMENT] Built {}x{} cubemap from {}x{} source",
        face_size, face_size, width, height
    );
    Ok(cubemap)
}

/// Queue the environment texture load
pub fn request_environment(commands: &mut Commands, server: &AssetServer, config: &SceneConfig) {
    let handle: Handle<Image> = server.load(config.environment_path.clone());
    commands.spawn((
        AssetTask::new(handle, config.environment_path.clone()),
        PendingEnvironment,
        Name::new("Environment Load"),
    ));
}

/// Convert the loaded texture and attach it to the camera
pub fn resolve_environment(
    mut commands: Commands,
    server: Res<AssetServer>,
    config: Res<SceneConfig>,
    mut images: ResMut<Assets<Image>>,
    tasks: Query<(Entity, &AssetTask<Image>), With<PendingEnvironment>>,
    cameras: Query<Entity, With<SceneCamera>>,
) {
    for (task, load) in tasks.iter() {
        let converted = match poll_load(&server, &images, &load.handle) {
            LoadOutcome::Pending => continue,
            LoadOutcome::Ready(source) => equirect_to_cubemap(source, config.cubemap_face_size),
            LoadOutcome::Failed(error) => Err(error),
        };

        let cubemap = match converted {
            Ok(cubemap) => images.add(cubemap),
            Err(error) => {
                fail_task(&mut commands, task, &load.label, &error);
                continue;
            }
        };

        for camera in cameras.iter() {
            commands.entity(camera).insert((
                Skybox {
                    image: cubemap.clone(),
                    brightness: ENVIRONMENT_BRIGHTNESS,
                    ..default()
                },
                EnvironmentMapLight {
                    diffuse_map: cubemap.clone(),
                    specular_map: cubemap.clone(),
                    intensity: ENVIRONMENT_BRIGHTNESS,
                    ..default()
                },
            ));
        }
        commands.entity(task).despawn();
        info!("[ENVIRONMENT] {} applied as background and lighting", load.label);
    }
}
