//! Renderable objects and the composition that owns them.

mod composition;
mod config;
mod geometry;
mod object;

pub use composition::SceneComposition;
pub use config::{ObjectLayout, SceneConfig, SceneLayout};
pub use geometry::{MeshData, Vertex};
pub use object::{Geometry, GeometryId, MeshPart, ObjectId, SceneObject};
