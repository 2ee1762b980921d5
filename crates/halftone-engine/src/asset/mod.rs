//! Mesh-hierarchy assets and their background loading.

mod gltf_loader;
mod graph;
mod pending;

pub use gltf_loader::GltfLoader;
pub use graph::{MeshLeaf, NodeGraph, SceneNode};
pub use pending::PendingAsset;

use std::path::Path;

/// Parses a mesh hierarchy from disk.
///
/// Loaders run on a background thread, hence `Send + 'static`.
pub trait AssetLoader: Send + 'static {
    fn load(&self, path: &Path) -> anyhow::Result<NodeGraph>;
}

impl<F> AssetLoader for F
where
    F: Fn(&Path) -> anyhow::Result<NodeGraph> + Send + 'static,
{
    fn load(&self, path: &Path) -> anyhow::Result<NodeGraph> {
        self(path)
    }
}
