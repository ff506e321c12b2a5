//! Per-frame data gathered from the scene before any GPU work
//!
//! Everything here is plain CPU data, so what the renderer will draw can be checked
//! without a device.

use cgmath::Matrix4;

use crate::gfx::{
    camera::{camera_utils::CameraUniform, perspective::PerspectiveCamera},
    geometry::Topology,
    resources::material::{srgb_to_linear, MaterialId},
    scene::{GeometryId, LightKind, NodeKind, Scene},
};

/// Point lights beyond this count are ignored by the shaders
pub const MAX_LIGHTS: usize = 8;

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuPointLight {
    /// World position, w unused
    pub position: [f32; 4],
    /// Linear color premultiplied by intensity, w unused
    pub color: [f32; 4],
}

/// Camera and lighting shared by every draw in a frame
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniform {
    pub camera: CameraUniform,
    pub ambient: [f32; 4],
    pub light_count: [u32; 4],
    pub lights: [GpuPointLight; MAX_LIGHTS],
}

/// Per-node transform and line color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct NodeUniform {
    pub model: [[f32; 4]; 4],
    pub tint: [f32; 4],
}

/// Lights found in the scene, in traversal order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneLights {
    /// Sum of all ambient lights, linear
    pub ambient: [f32; 3],
    pub points: Vec<GpuPointLight>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawKind {
    Mesh {
        geometry: GeometryId,
        material: MaterialId,
    },
    Lines {
        geometry: GeometryId,
        /// Linear RGBA
        color: [f32; 4],
    },
}

/// One node to draw with its world matrix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    /// Node index in creation order
    pub node: usize,
    pub world: Matrix4<f32>,
    pub kind: DrawKind,
}

impl DrawItem {
    pub fn uniform(&self) -> NodeUniform {
        let tint = match self.kind {
            DrawKind::Mesh { .. } => [1.0; 4],
            DrawKind::Lines { color, .. } => color,
        };
        NodeUniform {
            model: self.world.into(),
            tint,
        }
    }
}

fn linear_rgb(color: [f32; 3], intensity: f32) -> [f32; 3] {
    color.map(|c| srgb_to_linear(c) * intensity)
}

/// Walks the scene once, collecting draw items into `draws` and returning its lights
///
/// Meshes whose geometry is line topology are drawn as lines in white.
pub fn collect_frame(scene: &Scene, draws: &mut Vec<DrawItem>) -> SceneLights {
    draws.clear();
    let mut lights = SceneLights::default();

    scene.walk(|handle, node, world| match node.kind() {
        NodeKind::Mesh { geometry, material } => {
            let kind = match scene.geometry(*geometry).topology {
                Topology::Triangles => DrawKind::Mesh {
                    geometry: *geometry,
                    material: *material,
                },
                Topology::Lines => DrawKind::Lines {
                    geometry: *geometry,
                    color: [1.0; 4],
                },
            };
            draws.push(DrawItem {
                node: handle.index(),
                world: *world,
                kind,
            });
        }
        NodeKind::Light(light) => {
            let [r, g, b] = linear_rgb(light.color, light.intensity);
            match light.kind {
                LightKind::Ambient => {
                    lights.ambient[0] += r;
                    lights.ambient[1] += g;
                    lights.ambient[2] += b;
                }
                LightKind::Point => lights.points.push(GpuPointLight {
                    position: [world.w.x, world.w.y, world.w.z, 1.0],
                    color: [r, g, b, 1.0],
                }),
            }
        }
        NodeKind::Helper(helper) => {
            let [r, g, b] = linear_rgb(helper.color, 1.0);
            draws.push(DrawItem {
                node: handle.index(),
                world: *world,
                kind: DrawKind::Lines {
                    geometry: helper.geometry,
                    color: [r, g, b, 1.0],
                },
            });
        }
    });

    lights
}

impl FrameUniform {
    /// Packs camera and lights; point lights past [`MAX_LIGHTS`] are dropped
    pub fn new(camera: &PerspectiveCamera, lights: &SceneLights) -> Self {
        let mut packed = [GpuPointLight::default(); MAX_LIGHTS];
        let count = lights.points.len().min(MAX_LIGHTS);
        packed[..count].copy_from_slice(&lights.points[..count]);

        let [r, g, b] = lights.ambient;
        Self {
            camera: CameraUniform::from_camera(camera),
            ambient: [r, g, b, 1.0],
            light_count: [count as u32, 0, 0, 0],
            lights: packed,
        }
    }
}
