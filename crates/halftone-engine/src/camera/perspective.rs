use glam::{Mat4, Vec3};

/// Static camera setup.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraConfig {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::splat(7.0),
            target: Vec3::ZERO,
            fov_y_degrees: 25.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

/// Perspective camera.
///
/// Invariant: `projection` is rebuilt whenever `aspect` changes through
/// [`set_aspect`](Self::set_aspect).
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    aspect: f32,
    projection: Mat4,
}

impl PerspectiveCamera {
    pub fn new(config: CameraConfig, aspect: f32) -> Self {
        let mut camera = Self {
            position: config.position,
            target: config.target,
            up: Vec3::Y,
            fov_y_degrees: config.fov_y_degrees,
            near: config.near,
            far: config.far,
            aspect: 1.0,
            projection: Mat4::IDENTITY,
        };
        camera.set_aspect(aspect);
        camera
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Updates the aspect ratio and refreshes the projection.
    ///
    /// Non-finite or non-positive values are ignored.
    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
        self.update_projection();
    }

    /// Rebuilds the projection from fov / aspect / near / far.
    pub fn update_projection(&mut self) {
        self.projection = Mat4::perspective_rh(
            self.fov_y_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        );
    }

    #[inline]
    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    #[inline]
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    #[inline]
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view()
    }
}
