use std::path::PathBuf;

use glam::Vec3;

use crate::camera::CameraConfig;

/// Placement and angular velocity of one object.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ObjectLayout {
    pub position: Vec3,
    /// Radians per second around X, Y, Z.
    pub spin: Vec3,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SceneLayout {
    pub torus_knot: ObjectLayout,
    pub sphere: ObjectLayout,
    pub loaded: ObjectLayout,
}

impl Default for SceneLayout {
    fn default() -> Self {
        Self {
            torus_knot: ObjectLayout {
                position: Vec3::new(3.0, 0.0, 0.0),
                spin: Vec3::new(-0.1, 0.2, 0.0),
            },
            sphere: ObjectLayout {
                position: Vec3::new(-3.0, 0.0, 0.0),
                spin: Vec3::new(-0.1, 0.2, 0.0),
            },
            loaded: ObjectLayout { position: Vec3::ZERO, spin: Vec3::new(-0.1, 0.25, 0.0) },
        }
    }
}

/// Static description of the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub camera: CameraConfig,
    /// Mesh hierarchy loaded in the background after startup.
    pub asset_path: PathBuf,
    pub layout: SceneLayout,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            asset_path: PathBuf::from("assets/suzanne.glb"),
            layout: SceneLayout::default(),
        }
    }
}
