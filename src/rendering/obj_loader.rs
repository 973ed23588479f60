//! Wavefront OBJ loader
//!
//! Reads `v`, `vt`, `vn` and `f` records, triangulating polygons as fans and
//! flattening them into non-indexed triangle lists. `o` and `g` records start a
//! new object. The first object with faces is the primary asset of the file;
//! every object is also available as a labelled sub-asset `Object{n}`, so
//! `rook.obj#Object1` addresses the second one.
//!
//! Materials, smoothing groups and free-form geometry are ignored.

use crate::core::{SceneError, SceneResult};
use bevy::{
    asset::{io::Reader, AssetLoader, LoadContext, RenderAssetUsages},
    prelude::*,
    render::render_resource::PrimitiveTopology,
};
use thiserror::Error;

#[derive(Default, TypePath)]
pub struct ObjLoader;

#[derive(Error, Debug)]
pub enum ObjLoaderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error(transparent)]
    Parse(#[from] SceneError),
}

/// One object of an OBJ file, already flattened to triangles
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjObject {
    pub name: Option<String>,
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
}

impl ObjObject {
    fn named(name: Option<String>) -> Self {
        Self {
            name,
            ..default()
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Convert to a mesh, computing flat normals when the file had none
    pub fn into_mesh(self) -> Mesh {
        let vertex_count = self.positions.len();
        let mut mesh = Mesh::new(
            PrimitiveTopology::TriangleList,
            RenderAssetUsages::default(),
        )
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, self.positions);

        if self.normals.len() == vertex_count {
            mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, self.normals);
        } else {
            mesh.compute_flat_normals();
        }
        if self.uvs.len() == vertex_count {
            mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, self.uvs);
        }
        mesh
    }
}

fn parse_error(line: usize, message: impl Into<String>) -> SceneError {
    SceneError::ObjParse {
        line,
        message: message.into(),
    }
}

fn parse_floats<const N: usize>(fields: &[&str], line: usize) -> SceneResult<[f32; N]> {
    if fields.len() < N {
        return Err(parse_error(
            line,
            format!("expected {} components, found {}", N, fields.len()),
        ));
    }
    let mut out = [0.0; N];
    for (slot, field) in out.iter_mut().zip(fields) {
        *slot = field
            .parse()
            .map_err(|_| parse_error(line, format!("invalid number '{}'", field)))?;
    }
    Ok(out)
}

/// Resolve a 1-based (or negative, relative) OBJ index against `len` elements
fn resolve_index(field: &str, len: usize, line: usize) -> SceneResult<usize> {
    let index: i64 = field
        .parse()
        .map_err(|_| parse_error(line, format!("invalid index '{}'", field)))?;
    let resolved = if index < 0 {
        len as i64 + index
    } else {
        index - 1
    };
    if resolved < 0 || resolved >= len as i64 {
        return Err(parse_error(
            line,
            format!("index {} out of range for {} elements", index, len),
        ));
    }
    Ok(resolved as usize)
}

type Corner = (usize, Option<usize>, Option<usize>);

fn parse_corner(
    field: &str,
    counts: (usize, usize, usize),
    line: usize,
) -> SceneResult<Corner> {
    let mut parts = field.split('/');
    let position = resolve_index(parts.next().unwrap_or_default(), counts.0, line)?;
    let uv = match parts.next() {
        Some(t) if !t.is_empty() => Some(resolve_index(t, counts.1, line)?),
        _ => None,
    };
    let normal = match parts.next() {
        Some(n) if !n.is_empty() => Some(resolve_index(n, counts.2, line)?),
        _ => None,
    };
    Ok((position, uv, normal))
}

/// Parse OBJ text into its objects
///
/// Vertex data is shared across objects as the format requires. Objects without
/// faces are dropped. A file with no faces at all is an error.
pub fn parse_obj(text: &str) -> SceneResult<Vec<ObjObject>> {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();
    let mut uvs: Vec<[f32; 2]> = Vec::new();

    let mut objects = Vec::new();
    let mut current = ObjObject::default();

    for (number, raw) in text.lines().enumerate() {
        let line = number + 1;
        let mut fields = raw.split_whitespace();
        let Some(keyword) = fields.next() else {
            continue;
        };
        let fields: Vec<&str> = fields.collect();

        match keyword {
            "v" => positions.push(parse_floats::<3>(&fields, line)?),
            "vn" => normals.push(parse_floats::<3>(&fields, line)?),
            "vt" => uvs.push(parse_floats::<2>(&fields, line)?),
            "o" | "g" => {
                let name = (!fields.is_empty()).then(|| fields.join(" "));
                let finished = std::mem::replace(&mut current, ObjObject::named(name));
                if !finished.positions.is_empty() {
                    objects.push(finished);
                }
            }
            "f" => {
                if fields.len() < 3 {
                    return Err(parse_error(line, "face needs at least 3 vertices"));
                }
                let counts = (positions.len(), uvs.len(), normals.len());
                let corners = fields
                    .iter()
                    .map(|field| parse_corner(field, counts, line))
                    .collect::<SceneResult<Vec<_>>>()?;

                for i in 1..corners.len() - 1 {
                    for (p, t, n) in [corners[0], corners[i], corners[i + 1]] {
                        current.positions.push(positions[p]);
                        if let Some(t) = t {
                            current.uvs.push(uvs[t]);
                        }
                        if let Some(n) = n {
                            current.normals.push(normals[n]);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    if !current.positions.is_empty() {
        objects.push(current);
    }
    if objects.is_empty() {
        return Err(parse_error(0, "file contains no faces"));
    }
    Ok(objects)
}

impl AssetLoader for ObjLoader {
    type Asset = Mesh;
    type Settings = ();
    type Error = ObjLoaderError;

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &(),
        load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;
        let text = String::from_utf8(bytes)?;

        let mut objects = parse_obj(&text)?.into_iter();
        let primary = objects.next().ok_or_else(|| parse_error(0, "file contains no faces"))?;

        debug!(
            "[OBJ] {}: primary object {:?} with {} triangles",
            load_context.path(),
            primary.name,
            primary.triangle_count()
        );

        load_context.add_labeled_asset("Object0".to_string(), primary.clone().into_mesh());
        for (n, object) in objects.enumerate() {
            load_context.add_labeled_asset(format!("Object{}", n + 1), object.into_mesh());
        }

        Ok(primary.into_mesh())
    }

    fn extensions(&self) -> &[&str] {
        &["obj"]
    }
}
