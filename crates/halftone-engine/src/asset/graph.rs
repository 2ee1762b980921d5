use glam::Mat4;

use crate::scene::MeshData;

/// One node of a loaded hierarchy.
#[derive(Debug, Clone, Default)]
pub struct SceneNode {
    pub name: Option<String>,
    /// Transform relative to the parent.
    pub local: Mat4,
    /// One entry per triangle primitive; empty for pure transform nodes.
    pub meshes: Vec<MeshData>,
    /// Indices into [`NodeGraph::nodes`].
    pub children: Vec<usize>,
}

/// Flattened node hierarchy.
#[derive(Debug, Clone, Default)]
pub struct NodeGraph {
    pub nodes: Vec<SceneNode>,
    pub roots: Vec<usize>,
}

/// A mesh found while walking a [`NodeGraph`].
#[derive(Debug, Clone, Copy)]
pub struct MeshLeaf<'a> {
    pub name: Option<&'a str>,
    /// Accumulated transform from the hierarchy root.
    pub transform: Mat4,
    pub mesh: &'a MeshData,
}

impl NodeGraph {
    /// Every mesh in the hierarchy with its accumulated transform, depth first.
    ///
    /// Out-of-range child indices are skipped; a node reachable twice is
    /// visited once.
    pub fn mesh_leaves(&self) -> Vec<MeshLeaf<'_>> {
        let mut out = Vec::new();
        let mut visited = vec![false; self.nodes.len()];
        let mut stack: Vec<(usize, Mat4)> =
            self.roots.iter().rev().map(|&r| (r, Mat4::IDENTITY)).collect();

        while let Some((index, parent)) = stack.pop() {
            let Some(node) = self.nodes.get(index) else { continue };
            if std::mem::replace(&mut visited[index], true) {
                continue;
            }

            let transform = parent * node.local;
            for mesh in &node.meshes {
                out.push(MeshLeaf { name: node.name.as_deref(), transform, mesh });
            }
            for &child in node.children.iter().rev() {
                stack.push((child, transform));
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    fn mesh() -> MeshData {
        MeshData::sphere(1.0, 4, 2)
    }

    #[test]
    fn transforms_accumulate_down_the_tree() {
        let graph = NodeGraph {
            nodes: vec![
                SceneNode {
                    name: Some("root".into()),
                    local: Mat4::from_translation(Vec3::X),
                    meshes: Vec::new(),
                    children: vec![1],
                },
                SceneNode {
                    name: Some("head".into()),
                    local: Mat4::from_translation(Vec3::Y),
                    meshes: vec![mesh(), mesh()],
                    children: Vec::new(),
                },
            ],
            roots: vec![0],
        };

        let leaves = graph.mesh_leaves();
        assert_eq!(leaves.len(), 2);
        assert_eq!(leaves[0].name, Some("head"));
        assert_eq!(leaves[0].transform.transform_point3(Vec3::ZERO), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn bad_indices_and_cycles_terminate() {
        let graph = NodeGraph {
            nodes: vec![SceneNode {
                name: None,
                local: Mat4::IDENTITY,
                meshes: vec![mesh()],
                children: vec![0, 7],
            }],
            roots: vec![0, 3],
        };
        assert_eq!(graph.mesh_leaves().len(), 1);
    }

    #[test]
    fn empty_graph_has_no_leaves() {
        assert!(NodeGraph::default().mesh_leaves().is_empty());
    }
}
