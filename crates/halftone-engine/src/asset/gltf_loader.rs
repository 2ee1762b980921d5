use std::path::Path;

use anyhow::{Context, Result};
use glam::Mat4;

use crate::scene::MeshData;

use super::{AssetLoader, NodeGraph, SceneNode};

/// Loads `.glb` / `.gltf` files through the `gltf` crate.
///
/// Only triangle-list primitives are kept. Primitives without normals get
/// smooth normals computed from their indices.
#[derive(Debug, Clone, Copy, Default)]
pub struct GltfLoader;

impl AssetLoader for GltfLoader {
    fn load(&self, path: &Path) -> Result<NodeGraph> {
        let (document, buffers, _images) =
            gltf::import(path).with_context(|| format!("failed to import {}", path.display()))?;

        let scene = document
            .default_scene()
            .or_else(|| document.scenes().next())
            .with_context(|| format!("{} contains no scene", path.display()))?;

        let mut nodes = Vec::with_capacity(document.nodes().len());
        for node in document.nodes() {
            let mut meshes = Vec::new();

            if let Some(mesh) = node.mesh() {
                for primitive in mesh.primitives() {
                    if primitive.mode() != gltf::mesh::Mode::Triangles {
                        log::debug!("skipping {:?} primitive in mesh {:?}", primitive.mode(), mesh.name());
                        continue;
                    }

                    let reader = primitive
                        .reader(|b| buffers.get(b.index()).map(|data| data.0.as_slice()));
                    let Some(positions) = reader.read_positions() else {
                        continue;
                    };
                    let positions: Vec<[f32; 3]> = positions.collect();

                    let indices: Vec<u32> = match reader.read_indices() {
                        Some(indices) => indices.into_u32().collect(),
                        None => (0..positions.len() as u32).collect(),
                    };

                    let mut data = MeshData { positions, normals: Vec::new(), indices };
                    match reader.read_normals() {
                        Some(normals) => data.normals = normals.collect(),
                        None => data.compute_normals(),
                    }
                    if data.normals.len() != data.positions.len() {
                        data.compute_normals();
                    }

                    meshes.push(data);
                }
            }

            nodes.push(SceneNode {
                name: node.name().map(str::to_owned),
                local: Mat4::from_cols_array_2d(&node.transform().matrix()),
                meshes,
                children: node.children().map(|c| c.index()).collect(),
            });
        }

        let roots = scene.nodes().map(|n| n.index()).collect();
        Ok(NodeGraph { nodes, roots })
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use glam::Vec3;

    use super::*;

    /// One triangle at (0,0,0), (1,0,0), (0,1,0) as little-endian f32.
    const TRIANGLE_URI: &str =
        "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAA";

    /// Root node at (1,0,0) with a child at (0,2,0) carrying a mesh of one
    /// unindexed triangle without normals and one point primitive.
    fn document(scene_fields: &str) -> String {
        format!(
            r#"{{
  "asset": {{ "version": "2.0" }},
  {scene_fields},
  "nodes": [
    {{ "translation": [1, 0, 0], "children": [1] }},
    {{ "translation": [0, 2, 0], "mesh": 0 }}
  ],
  "meshes": [{{ "primitives": [
    {{ "attributes": {{ "POSITION": 0 }} }},
    {{ "attributes": {{ "POSITION": 0 }}, "mode": 0 }}
  ] }}],
  "accessors": [{{
    "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
    "min": [0, 0, 0], "max": [1, 1, 0]
  }}],
  "bufferViews": [{{ "buffer": 0, "byteLength": 36 }}],
  "buffers": [{{ "byteLength": 36, "uri": "{TRIANGLE_URI}" }}]
}}"#
        )
    }

    fn load(name: &str, json: &str) -> Result<NodeGraph> {
        let path: PathBuf =
            std::env::temp_dir().join(format!("halftone-{name}-{}.gltf", std::process::id()));
        std::fs::write(&path, json).unwrap();
        let result = GltfLoader.load(&path);
        let _ = std::fs::remove_file(&path);
        result
    }

    // ── import ─────────────────────────────────────────────────────────────

    #[test]
    fn embedded_triangle_gets_world_transform_and_normals() {
        let graph = load(
            "default-scene",
            &document(r#""scene": 1, "scenes": [{ "nodes": [] }, { "nodes": [0] }]"#),
        )
        .unwrap();

        let leaves = graph.mesh_leaves();
        assert_eq!(leaves.len(), 1);

        let mesh = leaves[0].mesh;
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_eq!(mesh.normals.len(), 3);
        for n in &mesh.normals {
            assert!(Vec3::from(*n).distance(Vec3::Z) < 1e-6);
        }

        let origin = leaves[0].transform.transform_point3(Vec3::ZERO);
        assert!(origin.distance(Vec3::new(1.0, 2.0, 0.0)) < 1e-6);
    }

    #[test]
    fn first_scene_is_used_without_a_default() {
        let graph = load(
            "first-scene",
            &document(r#""scenes": [{ "nodes": [0] }, { "nodes": [] }]"#),
        )
        .unwrap();
        assert_eq!(graph.roots, vec![0]);
        assert_eq!(graph.mesh_leaves().len(), 1);
    }

    #[test]
    fn empty_default_scene_yields_no_leaves() {
        let graph = load(
            "empty-scene",
            &document(r#""scene": 0, "scenes": [{ "nodes": [] }, { "nodes": [0] }]"#),
        )
        .unwrap();
        assert!(graph.roots.is_empty());
        assert!(graph.mesh_leaves().is_empty());
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = GltfLoader.load(Path::new("does/not/exist.glb")).unwrap_err();
        assert!(format!("{err:#}").contains("does/not/exist.glb"));
    }
}
