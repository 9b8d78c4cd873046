//! SceneBuilder - Diorama construction
//!
//! Turns a [`Scene`] (or a sequence of shape helper calls) into a populated
//! [`SceneGraph`] plus the [`SceneRegistry`] the animation update walks.
//!
//! Every shape hangs under its own base group together with a round shadow
//! decal. Images and models are requested from the [`AssetLoader`] when the
//! builder finishes; single textures start out as placeholders that are
//! swapped in place, while multi-textured boxes and OBJ models are only
//! attached (and registered) once their load completes.

use std::collections::HashMap;
use std::f32::consts::FRAC_PI_2;
use std::path::PathBuf;

use diorama_core::{
    animation, Animation, AssetLoader, AssetRequest, AssetTicket, EntityTemplate, GroundTemplate,
    LoadedAsset, Material, MaterialFlags, MeshData, MeshKey, ModelData, ModelTemplate, NodeKey,
    Scene, SceneGraph, SceneRegistry, ShapeTemplate, Surface, TextureData, TextureFilter, TextureKey,
    TextureWrap, Transform3D, Vec3,
};
use diorama_core::color::hex_to_linear_rgba;

/// Pixel size of the procedural shadow blob
const SHADOW_TEXTURE_SIZE: u32 = 64;

/// What to do with a background load once it finishes
#[derive(Debug)]
enum PendingAttach {
    /// Replace the pixels of a placeholder texture
    Texture { key: TextureKey, path: String },
    /// Create the shape of a multi-textured entity
    Faces {
        base: NodeKey,
        shadow: NodeKey,
        entity: EntityTemplate,
    },
    /// Add an OBJ model
    Model { template: ModelTemplate },
}

/// Builder for the diorama scene graph
///
/// # Example
/// ```ignore
/// let mut loader = AssetLoader::new("assets");
/// let diorama = SceneBuilder::new()
///     .add_ground(&GroundTemplate::default())
///     .add_box("teal_cube", Vec3::ONE, 0x44aa88, Vec3::new(-2.0, 1.0, 3.0), Animation::Spin)
///     .add_sphere("ball", 0.5, 32, 16, 0x13ecec, Vec3::new(2.0, 0.0, -4.0), Animation::Bounce)
///     .build(&mut loader);
/// ```
pub struct SceneBuilder {
    graph: SceneGraph,
    registry: SceneRegistry,
    shadow_texture: TextureKey,
    shadow_plane: MeshKey,
    textures: HashMap<String, TextureKey>,
    requests: Vec<(AssetRequest, PendingAttach)>,
}

impl SceneBuilder {
    /// Create a builder with the procedural shadow blob
    pub fn new() -> Self {
        let mut graph = SceneGraph::new();
        let shadow_texture = graph.add_texture(TextureData::round_shadow(SHADOW_TEXTURE_SIZE));
        let shadow_plane = graph.add_mesh(MeshData::plane(1.0, 1.0));

        Self {
            graph,
            registry: SceneRegistry::new(),
            shadow_texture,
            shadow_plane,
            textures: HashMap::new(),
            requests: Vec::new(),
        }
    }

    /// Create a builder populated from a scene description
    pub fn from_scene(scene: &Scene) -> Self {
        let mut builder = Self::new();

        if let Some(path) = &scene.shadow_texture {
            // The procedural blob stays in place until the image arrives
            let key = builder.shadow_texture;
            builder.request_replacement(key, path);
        }
        if let Some(ground) = &scene.ground {
            builder = builder.add_ground(ground);
        }
        for entity in &scene.entities {
            builder = builder.add_entity(entity.clone());
        }
        for model in &scene.models {
            builder = builder.add_model(model.clone());
        }

        log::info!(
            "Scene '{}': {} entities, {} models",
            scene.name,
            scene.entities.len(),
            scene.models.len()
        );
        builder
    }

    /// Add the double-sided ground plane
    ///
    /// The procedural checker is used until (or unless) the ground image loads.
    pub fn add_ground(mut self, ground: &GroundTemplate) -> Self {
        let [a, b] = ground.checker;
        let texture = self.graph.add_texture(TextureData::checker(a, b));
        if let Some(path) = &ground.texture {
            self.request_replacement(texture, path);
        }

        let mesh = self.graph.add_mesh(MeshData::plane(ground.size, ground.size));
        let material = Material::phong(0xffffff)
            .with_texture(texture)
            .with_uv_repeat(ground.repeat, ground.repeat)
            .with_flags(MaterialFlags::DOUBLE_SIDED);

        self.graph.add_mesh_node(
            "ground",
            Transform3D::identity().with_rotation(Vec3::new(-FRAC_PI_2, 0.0, 0.0)),
            mesh,
            vec![material],
            None,
        );
        self
    }

    /// Add a solid-color box
    pub fn add_box(self, name: &str, size: Vec3, color: u32, position: Vec3, animation: Animation) -> Self {
        self.add_entity(
            EntityTemplate::new(name, ShapeTemplate::cuboid(size.x, size.y, size.z), position)
                .with_color(color)
                .with_animation(animation),
        )
    }

    /// Add a box with one unlit image on every face
    pub fn add_textured_box(self, name: &str, size: Vec3, texture: &str, position: Vec3, animation: Animation) -> Self {
        self.add_entity(
            EntityTemplate::new(name, ShapeTemplate::cuboid(size.x, size.y, size.z), position)
                .with_texture(texture)
                .with_animation(animation),
        )
    }

    /// Add a box with one image per face, attached once every image has loaded
    pub fn add_multi_textured_box(
        self,
        name: &str,
        size: Vec3,
        textures: &[&str],
        position: Vec3,
        animation: Animation,
    ) -> Self {
        self.add_entity(
            EntityTemplate::new(name, ShapeTemplate::cuboid(size.x, size.y, size.z), position)
                .with_textures(textures.iter().copied())
                .with_animation(animation),
        )
    }

    /// Add a solid-color sphere
    #[allow(clippy::too_many_arguments)]
    pub fn add_sphere(
        self,
        name: &str,
        radius: f32,
        width_segments: u32,
        height_segments: u32,
        color: u32,
        position: Vec3,
        animation: Animation,
    ) -> Self {
        self.add_entity(
            EntityTemplate::new(name, ShapeTemplate::sphere(radius, width_segments, height_segments), position)
                .with_color(color)
                .with_animation(animation),
        )
    }

    /// Add a static Lambert cylinder
    pub fn add_cylinder(self, name: &str, shape: ShapeTemplate, color: u32, position: Vec3) -> Self {
        self.add_entity(EntityTemplate::new(name, shape, position).with_color(color))
    }

    /// Add any shape described by a template
    pub fn add_entity(mut self, entity: EntityTemplate) -> Self {
        let animation = entity.effective_animation();
        let base = self.graph.add_group(
            entity.name.clone(),
            Transform3D::from_position(Vec3::new(entity.position.x, 0.0, entity.position.z)),
            None,
        );
        let shadow = self.add_shadow(base, entity.shadow_height(), entity.shadow_scale());

        match &entity.surface {
            Surface::Textures(paths) => {
                let request = AssetRequest::TextureSet(paths.iter().map(PathBuf::from).collect());
                self.requests.push((request, PendingAttach::Faces { base, shadow, entity }));
            }
            Surface::Texture(path) => {
                let texture = self.texture_for(path);
                let material = surface_material(&entity, Some(texture));
                let materials = vec![material; entity.shape.material_slots()];
                attach_shape(&mut self.graph, &mut self.registry, base, shadow, &entity, materials, animation);
            }
            Surface::Color(_) => {
                let material = surface_material(&entity, None);
                let materials = vec![material; entity.shape.material_slots()];
                attach_shape(&mut self.graph, &mut self.registry, base, shadow, &entity, materials, animation);
            }
        }
        self
    }

    /// Add an OBJ model, attached once it has loaded
    pub fn add_model(mut self, template: ModelTemplate) -> Self {
        let request = AssetRequest::Model(PathBuf::from(&template.path));
        self.requests.push((request, PendingAttach::Model { template }));
        self
    }

    /// Submit asset requests and return the assembled diorama
    pub fn build(self, loader: &mut AssetLoader) -> Diorama {
        let mut pending = HashMap::new();
        for (request, attach) in self.requests {
            match loader.load_async(request) {
                Some(ticket) => {
                    pending.insert(ticket, attach);
                }
                None => log::warn!("Skipping {:?}: asset loader unavailable", attach),
            }
        }

        log::info!(
            "Built diorama: {} nodes, {} spinning, {} bouncing, {} assets loading",
            self.graph.node_count(),
            self.registry.spin_count(),
            self.registry.bounce_count(),
            pending.len()
        );

        Diorama {
            graph: self.graph,
            registry: self.registry,
            pending,
        }
    }

    fn add_shadow(&mut self, base: NodeKey, height: f32, scale: f32) -> NodeKey {
        let transform = Transform3D::from_position(Vec3::new(0.0, height, 0.0))
            .with_rotation(Vec3::new(-FRAC_PI_2, 0.0, 0.0))
            .with_uniform_scale(scale);
        self.graph.add_mesh_node(
            "shadow",
            transform,
            self.shadow_plane,
            vec![Material::decal(self.shadow_texture)],
            Some(base),
        )
    }

    /// Placeholder key for an image, shared by every use of the same path
    fn texture_for(&mut self, path: &str) -> TextureKey {
        if let Some(&key) = self.textures.get(path) {
            return key;
        }
        let placeholder = TextureData::white()
            .with_filter(TextureFilter::Linear)
            .with_wrap(TextureWrap::Clamp);
        let key = self.graph.add_texture(placeholder);
        self.request_replacement(key, path);
        self.textures.insert(path.to_string(), key);
        key
    }

    fn request_replacement(&mut self, key: TextureKey, path: &str) {
        self.requests.push((
            AssetRequest::Texture(PathBuf::from(path)),
            PendingAttach::Texture { key, path: path.to_string() },
        ));
    }
}

impl Default for SceneBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The assembled scene: graph, animation registry, and loads still in flight
pub struct Diorama {
    pub graph: SceneGraph,
    pub registry: SceneRegistry,
    pending: HashMap<AssetTicket, PendingAttach>,
}

impl Diorama {
    /// Build the diorama described by `scene`
    pub fn from_scene(scene: &Scene, loader: &mut AssetLoader) -> Self {
        SceneBuilder::from_scene(scene).build(loader)
    }

    /// Apply every background load that has finished, returning how many
    pub fn attach_loaded(&mut self, loader: &mut AssetLoader) -> usize {
        let results = loader.poll_all();
        let count = results.len();
        for result in results {
            match self.pending.remove(&result.ticket) {
                Some(attach) => self.attach(attach, result.asset),
                None => log::debug!("Ignoring load {:?} not requested by this scene", result.ticket),
            }
        }
        count
    }

    /// Advance every registered animation to time `t` (seconds)
    pub fn animate(&mut self, t: f32) {
        animation::update(&self.registry, &mut self.graph, t);
    }

    /// Whether any requested asset has not been attached yet
    pub fn is_loading(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Number of requested assets not yet attached
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    fn attach(&mut self, attach: PendingAttach, asset: LoadedAsset) {
        match (attach, asset) {
            (PendingAttach::Texture { key, path }, LoadedAsset::Texture(result)) => match result {
                Ok(data) => {
                    let (filter, wrap) = match self.graph.texture(key) {
                        Some(old) => (old.filter, old.wrap),
                        None => (data.filter, data.wrap),
                    };
                    self.graph.replace_texture(key, data.with_filter(filter).with_wrap(wrap));
                    log::debug!("Texture '{}' loaded", path);
                }
                Err(e) => log::warn!("Texture '{}' unavailable, keeping placeholder: {}", path, e),
            },

            (PendingAttach::Faces { base, shadow, entity }, LoadedAsset::TextureSet(results)) => {
                let keys: Vec<TextureKey> = results
                    .into_iter()
                    .map(|result| {
                        let data = result.unwrap_or_else(|e| {
                            log::warn!("Face texture of '{}' unavailable, using white: {}", entity.name, e);
                            TextureData::white()
                        });
                        self.graph.add_texture(data)
                    })
                    .collect();

                let slots = entity.shape.material_slots();
                let materials = (0..slots)
                    .map(|i| {
                        let texture = keys.get(i).or_else(|| keys.last()).copied();
                        surface_material(&entity, texture)
                    })
                    .collect();

                let animation = entity.effective_animation();
                attach_shape(&mut self.graph, &mut self.registry, base, shadow, &entity, materials, animation);
                log::info!("Attached '{}' ({} face textures)", entity.name, keys.len());
            }

            (PendingAttach::Model { template }, LoadedAsset::Model(result)) => match result {
                Ok(model) => self.attach_model(&template, model),
                Err(e) => log::warn!("Skipping model '{}': {}", template.path, e),
            },

            (attach, asset) => {
                log::error!("Load result {:?} does not match request {:?}", asset, attach);
            }
        }
    }

    fn attach_model(&mut self, template: &ModelTemplate, model: ModelData) {
        let name = if template.name.is_empty() { model.name.clone() } else { template.name.clone() };
        let root = self.graph.add_group(name.clone(), template.transform, None);

        let materials: Vec<Material> = model
            .materials
            .iter()
            .map(|m| {
                let texture = m.texture.clone().map(|t| self.graph.add_texture(t));
                m.to_material(texture)
            })
            .collect();

        for part in model.meshes {
            let material = part
                .material_index
                .and_then(|i| materials.get(i))
                .copied()
                .unwrap_or_else(|| Material::phong(0xffffff));
            let mesh = self.graph.add_mesh(part.mesh);
            self.graph.add_mesh_node(part.name, Transform3D::identity(), mesh, vec![material], Some(root));
        }

        log::info!("Attached model '{}' ({} materials)", name, materials.len());
    }
}

/// Create the shape node under `base` and register its animation
fn attach_shape(
    graph: &mut SceneGraph,
    registry: &mut SceneRegistry,
    base: NodeKey,
    shadow: NodeKey,
    entity: &EntityTemplate,
    materials: Vec<Material>,
    animation: Animation,
) -> NodeKey {
    let mesh = graph.add_mesh(entity.shape.create_mesh());
    let shape = graph.add_mesh_node(
        entity.name.clone(),
        Transform3D::from_position(Vec3::new(0.0, entity.position.y, 0.0)),
        mesh,
        materials,
        Some(base),
    );

    if animation.spins() {
        registry.register_spin(shape);
    }
    if animation.bounces() {
        registry.register_bounce(base, shape, shadow, entity.position);
    }
    shape
}

/// Material for one slot of an entity's surface
fn surface_material(entity: &EntityTemplate, texture: Option<TextureKey>) -> Material {
    let color = match entity.surface {
        Surface::Color(hex) => hex_to_linear_rgba(hex),
        _ => [1.0; 4],
    };
    let shading = entity.resolved_shading();
    let material = Material {
        color,
        shading,
        ..Material::default()
    };
    match texture {
        Some(key) => material.with_texture(key),
        None => material,
    }
}
