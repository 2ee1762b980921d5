use std::rc::Rc;

use glam::{EulerRot, Mat4, Vec3};

use crate::material::MaterialHandle;

use super::MeshData;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ObjectId(pub u32);

/// Identity of uploaded geometry; the renderer caches GPU buffers by it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct GeometryId(pub u64);

#[derive(Debug)]
pub struct Geometry {
    pub id: GeometryId,
    pub data: MeshData,
}

/// One drawable piece of an object.
#[derive(Debug, Clone)]
pub struct MeshPart {
    pub geometry: Rc<Geometry>,
    /// Transform relative to the owning object.
    pub local: Mat4,
    pub material: MaterialHandle,
}

/// A renderable object.
///
/// Only `rotation` changes after insertion; it is derived from elapsed time
/// and `spin` every tick.
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub id: ObjectId,
    pub name: String,
    pub position: Vec3,
    /// Euler angles (radians), applied X then Y then Z.
    pub rotation: Vec3,
    /// Angular velocity (radians per second) per axis.
    pub spin: Vec3,
    pub parts: Vec<MeshPart>,
}

impl SceneObject {
    /// Sets `rotation = elapsed * spin`.
    #[inline]
    pub fn spin_to(&mut self, elapsed: f32) {
        self.rotation = self.spin * elapsed;
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position)
            * Mat4::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }
}
