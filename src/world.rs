//! Builds the scroll-driven space scene
//!
//! Lights and helpers, the torus, a field of stars, the backdrop, the textured
//! avatar cube and the moon, plus the camera rig that looks at them.

use cgmath::Vector3;
use rand::Rng;

use crate::{
    animation::Spinner,
    config::{CameraConfig, ControlsConfig, SceneConfig},
    gfx::{
        camera::{CameraRig, OrbitControls, PerspectiveCamera},
        geometry::{make_box, make_sphere, make_torus},
        resources::{Material, TextureLoader},
        scene::{Light, NodeHandle, Scene, Transform},
    },
};

/// Per-tick rotation of the torus
pub const TORUS_SPIN: [f32; 3] = [0.01, 0.005, 0.01];
/// Per-tick rotation of the moon
pub const MOON_SPIN: [f32; 3] = [0.005, 0.075, 0.005];
/// Per-tick rotation of the avatar cube
pub const AVATAR_SPIN: [f32; 3] = [0.01, 0.0, 0.0];

/// The populated scene and the handles of the nodes that move
#[derive(Debug)]
pub struct World {
    pub scene: Scene,
    pub torus: NodeHandle,
    pub moon: NodeHandle,
    pub avatar: NodeHandle,
    pub stars: Vec<NodeHandle>,
    /// Point lights in creation order
    pub lights: Vec<NodeHandle>,
}

impl World {
    /// Nodes that rotate every tick: torus, moon and avatar
    pub fn spinners(&self) -> Vec<Spinner> {
        vec![
            Spinner::new(self.torus, TORUS_SPIN.into()),
            Spinner::new(self.moon, MOON_SPIN.into()),
            Spinner::new(self.avatar, AVATAR_SPIN.into()),
        ]
    }
}

/// Populates a fresh scene; textures are requested from `loader` and may still be loading
pub fn build_world<R: Rng + ?Sized>(
    config: &SceneConfig,
    loader: &dyn TextureLoader,
    rng: &mut R,
) -> World {
    let mut scene = Scene::new();

    let mut lights = Vec::with_capacity(3);
    for (intensity, [x, y, z]) in [
        (2.0, [5.0, 5.0, 5.0]),
        (1.5, [-20.0, 10.0, 10.0]),
        (1.5, [-10.0, 10.0, -10.0]),
    ] {
        let light = scene.add_light(
            Light::point(0xffffff, intensity),
            Transform::from_position(x, y, z),
        );
        scene.add_point_light_helper(light, 1.0);
        lights.push(light);
    }
    scene.add_light(Light::ambient(0xffffff, 0.5), Transform::default());
    scene.add_grid_helper(200.0, 50);

    let torus_geometry = scene.add_geometry(make_torus(10.0, 3.0, 16, 100));
    let torus_material = scene.add_material(Material::standard("torus", 0xFF6347));
    let torus = scene.add_mesh(None, torus_geometry, torus_material, Transform::default());

    let starfield = &config.starfield;
    let star_geometry = scene.add_geometry(make_sphere(starfield.star_radius, 24, 24));
    let star_material = scene.add_material(Material::standard("star", 0xffffff));
    let stars = scene.populate_starfield(
        star_geometry,
        star_material,
        starfield.count,
        starfield.spread,
        rng,
    );

    let assets = &config.assets;
    scene.set_background(loader.load(&assets.background));

    let avatar_geometry = scene.add_geometry(make_box(3.0, 3.0, 3.0));
    let avatar_material = scene.add_material(
        Material::basic("avatar", 0xffffff).with_map(loader.load(&assets.avatar)),
    );
    let avatar = scene.add_mesh(
        None,
        avatar_geometry,
        avatar_material,
        Transform::from_position(2.0, 0.0, -5.0),
    );

    let moon_geometry = scene.add_geometry(make_sphere(3.0, 32, 32));
    let moon_material = scene.add_material(
        Material::standard("moon", 0xffffff)
            .with_map(loader.load(&assets.moon))
            .with_normal_map(loader.load(&assets.moon_normal)),
    );
    let moon = scene.add_mesh(
        None,
        moon_geometry,
        moon_material,
        Transform::from_position(-10.0, 0.0, 30.0),
    );

    let stats = scene.statistics();
    log::info!(
        "Built scene: {} nodes ({} meshes, {} lights, {} helpers), {} triangles",
        stats.node_count,
        stats.mesh_count,
        stats.light_count,
        stats.helper_count,
        stats.total_triangles
    );

    World {
        scene,
        torus,
        moon,
        avatar,
        stars,
        lights,
    }
}

/// Camera at the configured start position with orbit controls around the origin
pub fn build_camera_rig(camera: &CameraConfig, controls: &ControlsConfig, width: u32, height: u32) -> CameraRig {
    let aspect = width.max(1) as f32 / height.max(1) as f32;
    let mut perspective = PerspectiveCamera::new(camera.fov_degrees, aspect, camera.near, camera.far);
    let [x, y, z] = camera.position;
    perspective.position = Vector3::new(x, y, z);

    let mut orbit = OrbitControls::default();
    orbit.enable_damping = controls.enable_damping;
    orbit.damping_factor = controls.damping_factor;
    orbit.rotate_speed = controls.rotate_speed;
    orbit.zoom_speed = controls.zoom_speed;
    orbit.set_viewport_height(height);
    orbit.update(&mut perspective);

    CameraRig::new(perspective, orbit)
}
