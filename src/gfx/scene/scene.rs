use cgmath::{Matrix4, SquareMatrix, Vector3};
use rand::Rng;

use crate::gfx::{
    geometry::{make_grid, make_sphere, wireframe, GeometryData},
    resources::{
        material::{color_from_hex, Material, MaterialId},
        texture::Texture,
    },
};

use super::node::{
    Helper, HelperKind, Light, NodeHandle, NodeKind, SceneId, SceneNode, Transform,
};

/// Grid line color, matching a mid-gray floor
const GRID_COLOR: u32 = 0x888888;

/// Geometry ID for referencing geometry registered with a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryId(pub(crate) u32);

impl GeometryId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Root of the scene tree, plus the shared geometry and materials its nodes use
///
/// Nodes are owned by the scene and addressed with [`NodeHandle`]s. Handles stay
/// valid for the scene's lifetime; using a handle with another scene panics.
#[derive(Debug)]
pub struct Scene {
    id: SceneId,
    nodes: Vec<SceneNode>,
    roots: Vec<NodeHandle>,
    geometries: Vec<GeometryData>,
    materials: Vec<Material>,
    background: Option<Texture>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Creates an empty scene
    pub fn new() -> Self {
        Self {
            id: SceneId::next(),
            nodes: Vec::new(),
            roots: Vec::new(),
            geometries: Vec::new(),
            materials: Vec::new(),
            background: None,
        }
    }

    pub fn id(&self) -> SceneId {
        self.id
    }

    /// Registers geometry that any number of nodes can share
    pub fn add_geometry(&mut self, geometry: GeometryData) -> GeometryId {
        self.geometries.push(geometry);
        GeometryId(self.geometries.len() as u32 - 1)
    }

    pub fn geometry(&self, id: GeometryId) -> &GeometryData {
        self.geometries
            .get(id.index())
            .unwrap_or_else(|| panic!("{:?} is not registered with this scene", id))
    }

    pub fn geometries(&self) -> impl Iterator<Item = (GeometryId, &GeometryData)> {
        self.geometries
            .iter()
            .enumerate()
            .map(|(i, g)| (GeometryId(i as u32), g))
    }

    /// Registers a material that any number of meshes can share
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() as u32 - 1)
    }

    pub fn material(&self, id: MaterialId) -> &Material {
        self.materials
            .get(id.index())
            .unwrap_or_else(|| panic!("{:?} is not registered with this scene", id))
    }

    pub fn materials(&self) -> impl Iterator<Item = (MaterialId, &Material)> {
        self.materials
            .iter()
            .enumerate()
            .map(|(i, m)| (MaterialId(i as u32), m))
    }

    /// Appends a node under `parent`, or at the top level when `parent` is `None`
    ///
    /// # Panics
    /// If `parent` or an ID referenced by `kind` does not belong to this scene.
    pub fn add_node(
        &mut self,
        parent: Option<NodeHandle>,
        kind: NodeKind,
        transform: Transform,
    ) -> NodeHandle {
        if let Some(parent) = parent {
            self.check(parent);
        }
        match &kind {
            NodeKind::Mesh { geometry, material } => {
                self.geometry(*geometry);
                self.material(*material);
            }
            NodeKind::Light(_) => {}
            NodeKind::Helper(helper) => {
                self.geometry(helper.geometry);
                if let HelperKind::PointLight { light } = helper.kind {
                    self.check(light);
                }
            }
        }

        let handle = NodeHandle {
            scene: self.id,
            index: self.nodes.len() as u32,
        };
        self.nodes.push(SceneNode::new(kind, transform, parent));

        match parent {
            Some(parent) => self.nodes[parent.index()].push_child(handle),
            None => self.roots.push(handle),
        }
        handle
    }

    /// Appends a mesh node
    pub fn add_mesh(
        &mut self,
        parent: Option<NodeHandle>,
        geometry: GeometryId,
        material: MaterialId,
        transform: Transform,
    ) -> NodeHandle {
        self.add_node(parent, NodeKind::Mesh { geometry, material }, transform)
    }

    /// Appends a top-level light
    pub fn add_light(&mut self, light: Light, transform: Transform) -> NodeHandle {
        self.add_node(None, NodeKind::Light(light), transform)
    }

    /// Appends a floor grid of `divisions` cells spanning `size` units
    pub fn add_grid_helper(&mut self, size: f32, divisions: u32) -> NodeHandle {
        let geometry = self.add_geometry(make_grid(size, divisions));
        let [r, g, b, _] = color_from_hex(GRID_COLOR);
        let helper = Helper {
            kind: HelperKind::Grid { size, divisions },
            geometry,
            color: [r, g, b],
        };
        self.add_node(None, NodeKind::Helper(helper), Transform::default())
    }

    /// Attaches a wire sphere of radius `size` to a light, so it follows the light
    ///
    /// # Panics
    /// If `light` is not a light node of this scene.
    pub fn add_point_light_helper(&mut self, light: NodeHandle, size: f32) -> NodeHandle {
        let color = match self.node(light).kind() {
            NodeKind::Light(l) => l.color,
            other => panic!("point light helper needs a light node, got {:?}", other),
        };
        let geometry = self.add_geometry(wireframe(&make_sphere(size, 4, 2)));
        let helper = Helper {
            kind: HelperKind::PointLight { light },
            geometry,
            color,
        };
        self.add_node(Some(light), NodeKind::Helper(helper), Transform::default())
    }

    /// Sets the backdrop drawn behind everything, independent of the tree
    pub fn set_background(&mut self, texture: Texture) {
        self.background = Some(texture);
    }

    pub fn background(&self) -> Option<&Texture> {
        self.background.as_ref()
    }

    /// Scatters `count` top-level meshes sharing one geometry and material
    ///
    /// Each coordinate is drawn uniformly from `[-spread / 2, spread / 2]`, so
    /// stars fill a cube. Coincident positions are kept.
    pub fn populate_starfield<R: Rng + ?Sized>(
        &mut self,
        geometry: GeometryId,
        material: MaterialId,
        count: usize,
        spread: f32,
        rng: &mut R,
    ) -> Vec<NodeHandle> {
        let half = spread.abs() * 0.5;
        (0..count)
            .map(|_| {
                let x = rng.random_range(-half..=half);
                let y = rng.random_range(-half..=half);
                let z = rng.random_range(-half..=half);
                self.add_mesh(None, geometry, material, Transform::from_position(x, y, z))
            })
            .collect()
    }

    fn check(&self, handle: NodeHandle) {
        assert!(
            handle.scene == self.id,
            "node handle {:?} belongs to a different scene ({:?})",
            handle,
            self.id
        );
        assert!(
            handle.index() < self.nodes.len(),
            "node handle {:?} is out of range ({} nodes)",
            handle,
            self.nodes.len()
        );
    }

    /// # Panics
    /// If the handle belongs to another scene.
    pub fn node(&self, handle: NodeHandle) -> &SceneNode {
        self.check(handle);
        &self.nodes[handle.index()]
    }

    pub fn node_mut(&mut self, handle: NodeHandle) -> &mut SceneNode {
        self.check(handle);
        &mut self.nodes[handle.index()]
    }

    pub fn transform(&self, handle: NodeHandle) -> &Transform {
        &self.node(handle).transform
    }

    pub fn transform_mut(&mut self, handle: NodeHandle) -> &mut Transform {
        &mut self.node_mut(handle).transform
    }

    /// Top-level nodes in insertion order
    pub fn roots(&self) -> &[NodeHandle] {
        &self.roots
    }

    /// All nodes in creation order
    pub fn nodes(&self) -> impl Iterator<Item = (NodeHandle, &SceneNode)> {
        let scene = self.id;
        self.nodes.iter().enumerate().map(move |(i, node)| {
            (
                NodeHandle {
                    scene,
                    index: i as u32,
                },
                node,
            )
        })
    }

    pub(crate) fn nodes_mut(&mut self) -> impl Iterator<Item = &mut SceneNode> {
        self.nodes.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Model matrix of a node, including all its ancestors
    pub fn world_matrix(&self, handle: NodeHandle) -> Matrix4<f32> {
        let node = self.node(handle);
        let local = node.transform.matrix();
        match node.parent() {
            Some(parent) => self.world_matrix(parent) * local,
            None => local,
        }
    }

    pub fn world_position(&self, handle: NodeHandle) -> Vector3<f32> {
        self.world_matrix(handle).w.truncate()
    }

    /// Depth-first traversal in insertion order
    ///
    /// The visitor receives each node together with its world matrix. Parents are
    /// always visited before their children.
    pub fn walk<F>(&self, mut visitor: F)
    where
        F: FnMut(NodeHandle, &SceneNode, &Matrix4<f32>),
    {
        let identity = Matrix4::identity();
        for &root in &self.roots {
            self.walk_from(root, &identity, &mut visitor);
        }
    }

    fn walk_from<F>(&self, handle: NodeHandle, parent_world: &Matrix4<f32>, visitor: &mut F)
    where
        F: FnMut(NodeHandle, &SceneNode, &Matrix4<f32>),
    {
        let node = &self.nodes[handle.index()];
        let world = *parent_world * node.transform.matrix();
        visitor(handle, node, &world);
        for &child in node.children() {
            self.walk_from(child, &world, visitor);
        }
    }

    /// Gets statistics about the scene
    pub fn statistics(&self) -> SceneStatistics {
        let mut stats = SceneStatistics {
            node_count: self.nodes.len(),
            geometry_count: self.geometries.len(),
            material_count: self.materials.len(),
            ..Default::default()
        };

        for node in &self.nodes {
            match node.kind() {
                NodeKind::Mesh { geometry, .. } => {
                    let data = &self.geometries[geometry.index()];
                    stats.mesh_count += 1;
                    stats.total_triangles += data.triangle_count();
                    stats.total_vertices += data.vertex_count();
                }
                NodeKind::Light(_) => stats.light_count += 1,
                NodeKind::Helper(_) => stats.helper_count += 1,
            }
        }
        stats
    }
}

/// Scene statistics for logging
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SceneStatistics {
    pub node_count: usize,
    pub mesh_count: usize,
    pub light_count: usize,
    pub helper_count: usize,
    pub geometry_count: usize,
    pub material_count: usize,
    pub total_triangles: usize,
    pub total_vertices: usize,
}
