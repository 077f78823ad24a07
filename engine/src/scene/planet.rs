//! Builds the sunset planet scene into a [`World`]
//!
//! Layout: one rotating group holds the sunset backdrop, the mountain ring,
//! the black planet core and the transparent planet shell. The lights and
//! the camera live outside the group.

use crate::config::{AssetConfig, SceneConfig};
use crate::core::camera::Camera;
use crate::core::entity::{
    update_hierarchy_system, Entity, EulerRotation, Name, Parent, Transform, Visible, World,
};
use crate::graphics::assets::{AssetRegistry, Fallback, MaterialId, MeshId, TextureId};
use crate::graphics::lighting::{AmbientLight, DirectionalLight};
use crate::graphics::material::{srgb_to_linear, Material};
use crate::graphics::mesh::Mesh;
use crate::graphics::texture::{HeightMap, TextureSource};
use crate::scene::placement::{scatter_mountains, MountainSlot, Side};
use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

/// Marks the group the animation rotates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneRoot;

/// Identifies a mountain panel entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MountainTag {
    pub slot: u32,
    pub side: Side,
}

/// Entities created by [`PlanetScene::build`]
#[derive(Debug, Clone)]
pub struct PlanetHandles {
    pub root: Entity,
    pub planet: Entity,
    pub core: Entity,
    pub sunset: Entity,
    pub camera: Entity,
    pub directional_light: Entity,
    pub ambient_light: Entity,
    /// `[left, right]` per slot
    pub mountains: Vec<[Entity; 2]>,
    /// The layout the panels were spawned from
    pub layout: Vec<MountainSlot>,
}

impl PlanetHandles {
    pub fn mountain(&self, slot: usize, side: Side) -> Option<Entity> {
        let pair = self.mountains.get(slot)?;
        Some(match side {
            Side::Left => pair[0],
            Side::Right => pair[1],
        })
    }
}

/// Random source for the mountain layout: seeded when a seed is given
pub fn scene_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => {
            info!(seed, "Using fixed mountain seed");
            ChaCha8Rng::seed_from_u64(seed)
        }
        None => ChaCha8Rng::from_os_rng(),
    }
}

fn srgb(rgb: [f32; 3]) -> [f32; 3] {
    rgb.map(srgb_to_linear)
}

struct SceneTextures {
    planet_color: TextureId,
    planet_ao: TextureId,
    planet_normal: TextureId,
    planet_opacity: TextureId,
    mountain_arm: TextureId,
    mountain_color: TextureId,
    mountain_normal: TextureId,
    sunset_alpha: TextureId,
}

impl SceneTextures {
    fn load(assets: &mut AssetRegistry, paths: &AssetConfig) -> Self {
        let source = |relative: &str| TextureSource::new(paths.texture_path(relative));

        Self {
            planet_color: assets.load_texture(
                "planet_color",
                &source(&paths.planet_color).srgb().repeat().nearest(),
                Fallback::WHITE,
            ),
            planet_ao: assets.load_texture(
                "planet_ao",
                &source(&paths.planet_ao).repeat(),
                Fallback::WHITE,
            ),
            planet_normal: assets.load_texture(
                "planet_normal",
                &source(&paths.planet_normal).repeat(),
                Fallback::FLAT_NORMAL,
            ),
            planet_opacity: assets.load_texture(
                "planet_opacity",
                &source(&paths.planet_opacity).repeat(),
                Fallback::WHITE,
            ),
            mountain_arm: assets.load_texture(
                "mountain_arm",
                &source(&paths.mountain_arm).repeat(),
                Fallback::WHITE,
            ),
            mountain_color: assets.load_texture(
                "mountain_color",
                &source(&paths.mountain_color).srgb().repeat(),
                Fallback::WHITE,
            ),
            mountain_normal: assets.load_texture(
                "mountain_normal",
                &source(&paths.mountain_normal).repeat(),
                Fallback::FLAT_NORMAL,
            ),
            sunset_alpha: assets.load_texture(
                "sunset_alpha",
                &source(&paths.sunset_alpha),
                Fallback::WHITE,
            ),
        }
    }
}

/// Scene construction entry point
pub struct PlanetScene;

impl PlanetScene {
    /// Spawn every entity of the scene and register its assets
    pub fn build(
        world: &mut World,
        assets: &mut AssetRegistry,
        config: &SceneConfig,
        rng: &mut impl Rng,
    ) -> PlanetHandles {
        let textures = SceneTextures::load(assets, &config.assets);

        let height_path = config.assets.texture_path(&config.assets.mountain_displacement);
        let height_map = HeightMap::load(&height_path).unwrap_or_else(|e| {
            warn!(error = %e, "Displacement map unavailable, mountains stay flat");
            HeightMap::flat(0.0)
        });

        // Meshes
        let planet_mesh = assets.add_mesh(
            "planet",
            Mesh::sphere(
                config.planet.radius,
                config.planet.width_segments,
                config.planet.height_segments,
            ),
        );
        let core_mesh = assets.add_mesh(
            "planet_core",
            Mesh::sphere(
                config.planet.inner_radius,
                config.planet.width_segments,
                config.planet.height_segments,
            ),
        );
        let sunset_mesh = assets.add_mesh(
            "sunset",
            Mesh::plane(config.sunset.size, config.sunset.size, 1, 1),
        );

        let mountains = &config.mountains;
        let mut panel = Mesh::plane(
            mountains.panel_size,
            mountains.panel_size,
            mountains.panel_segments,
            mountains.panel_segments,
        );
        panel.displace(
            &height_map,
            mountains.displacement_scale,
            mountains.displacement_bias,
            Vec2::from(mountains.texture_repeat),
        );
        let mountain_mesh = assets.add_mesh("mountain", panel);

        // Materials
        let planet_material = assets.add_material(
            "planet",
            Material {
                color_map: Some(textures.planet_color),
                ao_map: Some(textures.planet_ao),
                normal_map: Some(textures.planet_normal),
                alpha_map: Some(textures.planet_opacity),
                uv_repeat: config.planet.texture_repeat,
                transparent: true,
                ..Material::from_srgb(config.planet.color)
            },
        );
        let core_material = assets.add_material(
            "planet_core",
            Material {
                double_sided: true,
                ..Material::standard([0.0, 0.0, 0.0, 1.0])
            },
        );
        let sunset_material = assets.add_material("sunset", Material::unlit(textures.sunset_alpha));
        let mountain_material = assets.add_material(
            "mountain",
            Material {
                color_map: Some(textures.mountain_color),
                ao_map: Some(textures.mountain_arm.clone()),
                roughness_map: Some(textures.mountain_arm.clone()),
                metalness_map: Some(textures.mountain_arm),
                normal_map: Some(textures.mountain_normal),
                uv_repeat: mountains.texture_repeat,
                ..Default::default()
            },
        );

        // Rotating group
        let root = world.spawn_with_transform((
            Name::new("Scene Group"),
            SceneRoot,
            EulerRotation::default(),
        ));

        let sunset = spawn_mesh(
            world,
            root,
            "Sunset",
            sunset_mesh,
            sunset_material,
            Transform::default(),
        );

        let layout = scatter_mountains(mountains, rng);
        let mut mountain_entities = Vec::with_capacity(layout.len());
        for slot in &layout {
            let pair = [Side::Left, Side::Right].map(|side| {
                let panel = slot.panel(side);
                let entity = spawn_mesh(
                    world,
                    root,
                    "Mountain",
                    mountain_mesh.clone(),
                    mountain_material.clone(),
                    Transform::from_position(panel.position),
                );
                let _ = world.insert_one(entity, EulerRotation(panel.rotation));
                let _ = world.insert_one(entity, Visible(panel.visible));
                let _ = world.insert_one(
                    entity,
                    MountainTag {
                        slot: slot.index,
                        side,
                    },
                );
                entity
            });
            mountain_entities.push(pair);
        }

        let core = spawn_mesh(
            world,
            root,
            "Planet Core",
            core_mesh,
            core_material,
            Transform::default(),
        );
        let planet = spawn_mesh(
            world,
            root,
            "Planet",
            planet_mesh,
            planet_material,
            Transform::default(),
        );
        let initial_rotation = EulerRotation::new(0.0, 0.0, config.planet.initial_rotation_z);
        let _ = world.insert_one(planet, initial_rotation);

        // Lights
        let lights = &config.lights;
        let directional_light = world.spawn_with_transform((
            Name::new("Directional Light"),
            Transform::from_position(Vec3::from(lights.directional_position)),
            DirectionalLight::new(srgb(lights.directional_color), lights.directional_intensity),
        ));
        let ambient_light = world.spawn((
            Name::new("Ambient Light"),
            AmbientLight::new(srgb(lights.ambient_color), lights.ambient_intensity),
        ));

        // Camera
        let (width, height) = config.window.size.unwrap_or((1280, 720));
        let camera = world.spawn_with_transform((
            Name::new("Camera"),
            Camera::from_config(&config.camera, width as f32 / height.max(1) as f32),
            Transform::from_position(Vec3::from(config.camera.position))
                .looking_at(Vec3::from(config.camera.look_at), Vec3::Y),
        ));

        world.sync_euler_rotations();
        update_hierarchy_system(world);

        info!(
            entities = world.entity_count(),
            meshes = assets.mesh_count(),
            materials = assets.material_count(),
            textures = assets.texture_count(),
            slots = layout.len(),
            "Built planet scene"
        );

        PlanetHandles {
            root,
            planet,
            core,
            sunset,
            camera,
            directional_light,
            ambient_light,
            mountains: mountain_entities,
            layout,
        }
    }
}

fn spawn_mesh(
    world: &mut World,
    parent: Entity,
    name: &str,
    mesh: MeshId,
    material: MaterialId,
    transform: Transform,
) -> Entity {
    world.spawn_with_transform((Name::new(name), Parent(parent), transform, mesh, material))
}
