//! Serializable copies of every node transform
//!
//! A snapshot lists transforms in node-creation order, which is stable for a
//! given world, so a saved session can be restored into a freshly built scene.

use std::path::Path;

use cgmath::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::{node::Transform, scene::Scene};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeTransform {
    pub position: [f32; 3],
    pub rotation: [f32; 3],
}

impl From<&Transform> for NodeTransform {
    fn from(transform: &Transform) -> Self {
        Self {
            position: transform.position.into(),
            rotation: transform.rotation.into(),
        }
    }
}

impl From<NodeTransform> for Transform {
    fn from(node: NodeTransform) -> Self {
        Self {
            position: Vector3::from(node.position),
            rotation: Vector3::from(node.rotation),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformSnapshot {
    pub nodes: Vec<NodeTransform>,
}

impl TransformSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?).map_err(|err| Error::io(path, err))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
        Self::from_json(&json)
    }
}

impl Scene {
    /// Copies every node transform in creation order
    pub fn snapshot_transforms(&self) -> TransformSnapshot {
        TransformSnapshot {
            nodes: self
                .nodes()
                .map(|(_, node)| NodeTransform::from(&node.transform))
                .collect(),
        }
    }

    /// Overwrites every node transform from a snapshot of the same scene layout
    ///
    /// Fails without touching the scene when the node counts differ.
    pub fn restore_transforms(&mut self, snapshot: &TransformSnapshot) -> Result<()> {
        if snapshot.nodes.len() != self.len() {
            return Err(Error::SnapshotMismatch {
                expected: self.len(),
                found: snapshot.nodes.len(),
            });
        }

        for (node, saved) in self.nodes_mut().zip(&snapshot.nodes) {
            node.transform = Transform::from(*saved);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        geometry::make_torus,
        resources::material::Material,
        scene::node::{Light, Transform},
    };

    fn sample_scene() -> Scene {
        let mut scene = Scene::new();
        let light = scene.add_light(
            Light::point(0xffffff, 2.0),
            Transform::from_position(5.0, 5.0, 5.0),
        );
        scene.add_point_light_helper(light, 1.0);
        let geometry = scene.add_geometry(make_torus(10.0, 3.0, 16, 100));
        let material = scene.add_material(Material::standard("torus", 0xFF6347));
        let torus = scene.add_mesh(None, geometry, material, Transform::default());
        scene.transform_mut(torus).rotation = Vector3::new(0.1, 0.05, 0.1);
        scene
    }

    #[test]
    fn test_snapshot_json_round_trip() {
        let scene = sample_scene();
        let snapshot = scene.snapshot_transforms();
        let json = snapshot.to_json().unwrap();

        let mut restored = sample_scene();
        for node in restored.nodes_mut() {
            node.transform = Transform::default();
        }
        restored
            .restore_transforms(&TransformSnapshot::from_json(&json).unwrap())
            .unwrap();

        for ((_, a), (_, b)) in scene.nodes().zip(restored.nodes()) {
            assert_eq!(a.transform, b.transform);
        }
    }

    #[test]
    fn test_restore_rejects_mismatched_snapshot() {
        let mut scene = sample_scene();
        let before = scene.snapshot_transforms();

        let mut short = before.clone();
        short.nodes.pop();
        let err = scene.restore_transforms(&short).unwrap_err();
        assert!(matches!(
            err,
            Error::SnapshotMismatch {
                expected: 3,
                found: 2
            }
        ));
        assert_eq!(scene.snapshot_transforms(), before);
    }

    #[test]
    fn test_snapshot_file_round_trip() {
        let path = std::env::temp_dir().join(format!(
            "scrollscape-snapshot-{}.json",
            std::process::id()
        ));
        let snapshot = sample_scene().snapshot_transforms();
        snapshot.save(&path).unwrap();
        assert_eq!(TransformSnapshot::load(&path).unwrap(), snapshot);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let err = TransformSnapshot::load(Path::new("/nonexistent/snapshot.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/snapshot.json"));
    }
}
