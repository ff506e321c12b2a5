//! Scene nodes and their transforms

use std::f32::consts::TAU;
use std::sync::atomic::{AtomicU64, Ordering};

use cgmath::{Matrix4, Rad, Vector3, Zero};

use crate::gfx::resources::material::{color_from_hex, MaterialId};

use super::scene::GeometryId;

static NEXT_SCENE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a scene, embedded in every handle it hands out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneId(u64);

impl SceneId {
    pub(crate) fn next() -> Self {
        SceneId(NEXT_SCENE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Stable reference to a node inside one particular scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle {
    pub(crate) scene: SceneId,
    pub(crate) index: u32,
}

impl NodeHandle {
    /// Position of the node in creation order
    pub fn index(self) -> usize {
        self.index as usize
    }
}

/// Position and Euler XYZ rotation (radians) of a node relative to its parent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    /// Accumulated rotation. Never wrapped, see [`Transform::wrapped_rotation`].
    pub rotation: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::zero(),
            rotation: Vector3::zero(),
        }
    }
}

impl Transform {
    pub fn from_position(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vector3::new(x, y, z),
            ..Default::default()
        }
    }

    /// Local matrix: translation, then rotation about X, Y and Z in that order
    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from_angle_x(Rad(self.rotation.x))
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_z(Rad(self.rotation.z))
    }

    pub fn rotate_by(&mut self, delta: Vector3<f32>) {
        self.rotation += delta;
    }

    /// Rotation with each angle reduced to `[0, 2π)`, for display only
    pub fn wrapped_rotation(&self) -> Vector3<f32> {
        self.rotation.map(|angle| angle.rem_euclid(TAU))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
    /// Omnidirectional light placed at the node's world position
    Point,
    /// Uniform light added to every lit surface
    Ambient,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    /// sRGB color
    pub color: [f32; 3],
    pub intensity: f32,
}

impl Light {
    pub fn point(hex: u32, intensity: f32) -> Self {
        Self::new(LightKind::Point, hex, intensity)
    }

    pub fn ambient(hex: u32, intensity: f32) -> Self {
        Self::new(LightKind::Ambient, hex, intensity)
    }

    fn new(kind: LightKind, hex: u32, intensity: f32) -> Self {
        let [r, g, b, _] = color_from_hex(hex);
        Self {
            kind,
            color: [r, g, b],
            intensity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HelperKind {
    /// Floor grid on the XZ plane
    Grid { size: f32, divisions: u32 },
    /// Wire sphere marking a point light; attached to the light as a child
    PointLight { light: NodeHandle },
}

/// Line overlay drawn unlit on top of the scene's meshes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Helper {
    pub kind: HelperKind,
    pub geometry: GeometryId,
    /// sRGB color
    pub color: [f32; 3],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeKind {
    Mesh {
        geometry: GeometryId,
        material: MaterialId,
    },
    Light(Light),
    Helper(Helper),
}

/// A node of the scene tree
///
/// The transform is free to change every frame; the kind is fixed at creation.
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub transform: Transform,
    kind: NodeKind,
    parent: Option<NodeHandle>,
    children: Vec<NodeHandle>,
}

impl SceneNode {
    pub(crate) fn new(kind: NodeKind, transform: Transform, parent: Option<NodeHandle>) -> Self {
        Self {
            transform,
            kind,
            parent,
            children: Vec::new(),
        }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    /// Child handles in insertion order
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    pub(crate) fn push_child(&mut self, child: NodeHandle) {
        self.children.push(child);
    }
}
