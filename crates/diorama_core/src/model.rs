//! Wavefront OBJ models
//!
//! Loads OBJ geometry and its MTL materials with `tobj`. Diffuse maps named
//! by the MTL are decoded here too, so a loaded model is ready to attach.

use std::path::Path;
use diorama_math::Vec3;
use crate::asset_error::AssetError;
use crate::color::srgb_to_linear;
use crate::graph::TextureKey;
use crate::material::{Material, MaterialFlags};
use crate::mesh::{MeshData, Vertex};
use crate::texture::{TextureData, TextureWrap};

/// A material read from the MTL file
#[derive(Clone, Debug)]
pub struct ModelMaterial {
    pub name: String,
    /// Diffuse color (`Kd`), sRGB
    pub diffuse: [f32; 3],
    /// Dissolve (`d`)
    pub opacity: f32,
    /// Decoded diffuse map (`map_Kd`), if present and readable
    pub texture: Option<TextureData>,
}

impl ModelMaterial {
    /// Phong material for this MTL entry, using `texture` for the diffuse map
    pub fn to_material(&self, texture: Option<TextureKey>) -> Material {
        let [r, g, b] = self.diffuse.map(srgb_to_linear);
        let mut material = Material {
            color: [r, g, b, 1.0],
            opacity: self.opacity,
            texture,
            ..Material::default()
        };
        if self.opacity < 1.0 {
            material.flags = MaterialFlags::TRANSPARENT;
        }
        material
    }
}

/// One object of the OBJ file
#[derive(Clone, Debug)]
pub struct ModelMesh {
    pub name: String,
    pub mesh: MeshData,
    /// Index into [`ModelData::materials`]
    pub material_index: Option<usize>,
}

/// A loaded OBJ model
#[derive(Clone, Debug, Default)]
pub struct ModelData {
    pub name: String,
    pub meshes: Vec<ModelMesh>,
    pub materials: Vec<ModelMaterial>,
}

impl ModelData {
    /// Load an OBJ file and the MTL it references
    ///
    /// A missing or broken MTL is logged and the model falls back to white
    /// materials. Unreadable diffuse maps are dropped the same way.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AssetError::NotFound(path.display().to_string()));
        }

        let options = tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        };
        let (models, materials_result) = tobj::load_obj(path, &options)?;

        let base_dir = path.parent().unwrap_or(Path::new("."));
        let materials = match materials_result {
            Ok(materials) => materials
                .iter()
                .map(|m| convert_material(m, base_dir))
                .collect(),
            Err(e) => {
                log::warn!("No materials for {}: {}", path.display(), e);
                Vec::new()
            }
        };

        let meshes: Vec<ModelMesh> = models
            .iter()
            .filter_map(convert_model)
            .collect();

        if meshes.is_empty() {
            return Err(AssetError::Model(format!("{}: no geometry", path.display())));
        }

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("model")
            .to_string();

        log::debug!(
            "Loaded model '{}': {} meshes, {} materials",
            name,
            meshes.len(),
            materials.len()
        );

        Ok(Self { name, meshes, materials })
    }

    /// Total triangles over all meshes
    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|m| m.mesh.triangle_count()).sum()
    }
}

fn convert_model(model: &tobj::Model) -> Option<ModelMesh> {
    let mesh = &model.mesh;
    if mesh.positions.is_empty() || mesh.indices.is_empty() {
        return None;
    }

    let vertex_count = mesh.positions.len() / 3;
    let has_normals = mesh.normals.len() == mesh.positions.len();
    let has_uvs = mesh.texcoords.len() / 2 == vertex_count;

    let vertices = (0..vertex_count)
        .map(|i| {
            let position = [
                mesh.positions[i * 3],
                mesh.positions[i * 3 + 1],
                mesh.positions[i * 3 + 2],
            ];
            let normal = if has_normals {
                [mesh.normals[i * 3], mesh.normals[i * 3 + 1], mesh.normals[i * 3 + 2]]
            } else {
                [0.0; 3]
            };
            // OBJ v points up the image
            let uv = if has_uvs {
                [mesh.texcoords[i * 2], 1.0 - mesh.texcoords[i * 2 + 1]]
            } else {
                [0.0; 2]
            };
            Vertex::new(position, normal, uv)
        })
        .collect();

    let mut data = MeshData::new(vertices, mesh.indices.clone());
    if !has_normals {
        smooth_normals(&mut data);
    }

    Some(ModelMesh {
        name: model.name.clone(),
        mesh: data,
        material_index: mesh.material_id,
    })
}

fn convert_material(material: &tobj::Material, base_dir: &Path) -> ModelMaterial {
    let texture = material.diffuse_texture.as_ref().and_then(|file| {
        let path = base_dir.join(file);
        match TextureData::from_file(&path) {
            Ok(tex) => Some(tex.with_wrap(TextureWrap::Repeat)),
            Err(e) => {
                log::warn!("Dropping diffuse map of '{}': {}", material.name, e);
                None
            }
        }
    });

    ModelMaterial {
        name: material.name.clone(),
        diffuse: material.diffuse.unwrap_or([1.0, 1.0, 1.0]),
        opacity: material.dissolve.unwrap_or(1.0),
        texture,
    }
}

/// Area-weighted vertex normals from the triangle list
fn smooth_normals(mesh: &mut MeshData) {
    let mut sums = vec![Vec3::ZERO; mesh.vertices.len()];

    for tri in mesh.indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        if a >= sums.len() || b >= sums.len() || c >= sums.len() {
            continue;
        }
        let pa = Vec3::from_array(mesh.vertices[a].position);
        let pb = Vec3::from_array(mesh.vertices[b].position);
        let pc = Vec3::from_array(mesh.vertices[c].position);
        let n = (pb - pa).cross(pc - pa);
        sums[a] += n;
        sums[b] += n;
        sums[c] += n;
    }

    for (v, n) in mesh.vertices.iter_mut().zip(sums) {
        v.normal = if n.length_squared() > 0.0 {
            n.normalized().to_array()
        } else {
            [0.0, 1.0, 0.0]
        };
    }
}
