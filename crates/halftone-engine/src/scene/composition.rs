use std::rc::Rc;

use crate::asset::{NodeGraph, PendingAsset};
use crate::material::MaterialHandle;

use super::{
    Geometry, GeometryId, MeshData, MeshPart, ObjectId, ObjectLayout, SceneLayout, SceneObject,
};

/// Owns every renderable object of the scene.
///
/// Invariant: every part of every object holds a clone of `material`.
#[derive(Debug)]
pub struct SceneComposition {
    material: MaterialHandle,
    objects: Vec<SceneObject>,
    pending: Option<PendingAsset>,
    loaded_layout: ObjectLayout,
    next_object: u32,
    next_geometry: u64,
}

impl SceneComposition {
    /// An empty composition bound to `material`.
    pub fn new(material: MaterialHandle, layout: &SceneLayout) -> Self {
        Self {
            material,
            objects: Vec::new(),
            pending: None,
            loaded_layout: layout.loaded,
            next_object: 0,
            next_geometry: 0,
        }
    }

    /// The startup scene: torus knot and sphere.
    pub fn procedural(material: MaterialHandle, layout: &SceneLayout) -> Self {
        let mut scene = Self::new(material, layout);
        scene.insert_mesh(
            "torus knot",
            layout.torus_knot,
            MeshData::torus_knot(0.6, 0.25, 128, 32, 2, 3),
        );
        scene.insert_mesh("sphere", layout.sphere, MeshData::sphere(1.0, 32, 16));
        scene
    }

    #[inline]
    pub fn material(&self) -> &MaterialHandle {
        &self.material
    }

    #[inline]
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    #[inline]
    pub fn objects_mut(&mut self) -> &mut [SceneObject] {
        &mut self.objects
    }

    pub fn object(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    /// Whether a background load has not been consumed yet.
    #[inline]
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Registers a background load. Replaces any load still in flight.
    pub fn attach(&mut self, pending: PendingAsset) {
        self.pending = Some(pending);
    }

    /// Consumes a finished background load, if any.
    ///
    /// Returns the id of the inserted object. A failed load is logged and
    /// dropped; the object then stays absent for the rest of the session.
    pub fn sync(&mut self) -> Option<ObjectId> {
        let result = self.pending.as_ref()?.poll()?;
        let pending = self.pending.take()?;

        let name = pending
            .path()
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "asset".to_string());

        match result {
            Ok(graph) => self.insert_hierarchy(&name, &graph),
            Err(err) => {
                log::warn!("failed to load {}: {err:#}", pending.path().display());
                None
            }
        }
    }

    /// Adds one object holding every mesh of `graph`, each bound to the shared material.
    pub fn insert_hierarchy(&mut self, name: &str, graph: &NodeGraph) -> Option<ObjectId> {
        let leaves = graph.mesh_leaves();
        if leaves.is_empty() {
            log::warn!("asset '{name}' has no meshes; nothing added");
            return None;
        }

        let parts = leaves
            .into_iter()
            .map(|leaf| MeshPart {
                geometry: self.geometry(leaf.mesh.clone()),
                local: leaf.transform,
                material: self.material.clone(),
            })
            .collect::<Vec<_>>();

        log::info!("added '{name}' with {} mesh part(s)", parts.len());
        Some(self.push(name, self.loaded_layout, parts))
    }

    fn insert_mesh(&mut self, name: &str, layout: ObjectLayout, data: MeshData) -> ObjectId {
        let part = MeshPart {
            geometry: self.geometry(data),
            local: glam::Mat4::IDENTITY,
            material: self.material.clone(),
        };
        self.push(name, layout, vec![part])
    }

    fn geometry(&mut self, data: MeshData) -> Rc<Geometry> {
        let id = GeometryId(self.next_geometry);
        self.next_geometry += 1;
        Rc::new(Geometry { id, data })
    }

    fn push(&mut self, name: &str, layout: ObjectLayout, parts: Vec<MeshPart>) -> ObjectId {
        let id = ObjectId(self.next_object);
        self.next_object += 1;

        self.objects.push(SceneObject {
            id,
            name: name.to_string(),
            position: layout.position,
            rotation: glam::Vec3::ZERO,
            spin: layout.spin,
            parts,
        });
        id
    }
}
