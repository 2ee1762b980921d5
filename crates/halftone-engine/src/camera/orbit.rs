use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::input::{InputFrame, InputState, MouseButton};

use super::PerspectiveCamera;

/// Keeps the polar angle away from the poles so `look_at` stays defined.
const POLAR_EPSILON: f32 = 1e-4;

/// Orbit control tuning.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrbitSettings {
    /// Fraction of the pending motion applied per update. `0` disables damping.
    pub damping_factor: f32,
    pub rotate_speed: f32,
    /// Per-wheel-line zoom factor base (`0.95^lines`).
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 1.0,
            max_distance: 50.0,
        }
    }
}

/// Damped orbit around the camera target.
///
/// Input is accumulated as a pending spherical delta; each [`update`](Self::update)
/// applies `damping_factor` of it and decays the rest, so motion eases out over
/// subsequent ticks.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    settings: OrbitSettings,
    /// Pending azimuth change (radians).
    delta_theta: f32,
    /// Pending polar change (radians).
    delta_phi: f32,
    /// Pending distance multiplier.
    scale: f32,
}

impl OrbitControls {
    pub fn new(settings: OrbitSettings) -> Self {
        Self {
            settings,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
        }
    }

    #[inline]
    pub fn settings(&self) -> &OrbitSettings {
        &self.settings
    }

    /// Feeds one frame of pointer input. Left-drag rotates; the wheel zooms.
    pub fn handle_input(&mut self, state: &InputState, frame: &InputFrame, viewport_height: f32) {
        if state.button_down(MouseButton::Left) {
            let (dx, dy) = frame.pointer_delta;
            self.rotate_by_pixels(dx, dy, viewport_height);
        }
        if frame.wheel_lines != 0.0 {
            self.zoom_by_lines(frame.wheel_lines);
        }
    }

    /// A drag across the full viewport height is one full turn.
    pub fn rotate_by_pixels(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        let h = viewport_height.max(1.0);
        self.delta_theta -= TAU * dx / h * self.settings.rotate_speed;
        self.delta_phi -= TAU * dy / h * self.settings.rotate_speed;
    }

    /// Positive lines (wheel away from user) move the camera closer.
    pub fn zoom_by_lines(&mut self, lines: f32) {
        let base = 0.95f32.powf(self.settings.zoom_speed);
        self.scale *= base.powf(lines);
    }

    /// Advances the damped interpolation and moves `camera` accordingly.
    ///
    /// Returns `true` if the camera position changed.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let offset = camera.position - camera.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return false;
        }

        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

        let damping = self.settings.damping_factor;
        if damping > 0.0 {
            theta += self.delta_theta * damping;
            phi += self.delta_phi * damping;
        } else {
            theta += self.delta_theta;
            phi += self.delta_phi;
        }
        phi = phi.clamp(POLAR_EPSILON, PI - POLAR_EPSILON);

        let radius = (radius * self.scale).clamp(self.settings.min_distance, self.settings.max_distance);

        let new_offset = Vec3::new(
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
            radius * phi.sin() * theta.cos(),
        );

        if damping > 0.0 {
            self.delta_theta *= 1.0 - damping;
            self.delta_phi *= 1.0 - damping;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
        }
        self.scale = 1.0;

        let new_position = camera.target + new_offset;
        let changed = new_position.distance_squared(camera.position) > 1e-8;
        camera.position = new_position;
        changed
    }
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new(OrbitSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraConfig;

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::new(CameraConfig::default(), 1.0)
    }

    #[test]
    fn idle_update_keeps_position() {
        let mut cam = camera();
        let before = cam.position;
        let mut controls = OrbitControls::default();

        assert!(!controls.update(&mut cam));
        assert!(cam.position.distance(before) < 1e-4);
    }

    #[test]
    fn damping_eases_toward_target() {
        let mut cam = camera();
        let mut controls = OrbitControls::default();
        controls.rotate_by_pixels(100.0, 0.0, 600.0);

        let start = cam.position;
        controls.update(&mut cam);
        let first_step = cam.position.distance(start);

        let mid = cam.position;
        controls.update(&mut cam);
        let second_step = cam.position.distance(mid);

        assert!(first_step > 0.0);
        assert!(second_step < first_step);
    }

    #[test]
    fn orbit_preserves_distance() {
        let mut cam = camera();
        let radius = cam.position.length();
        let mut controls = OrbitControls::default();
        controls.rotate_by_pixels(250.0, -40.0, 600.0);

        for _ in 0..30 {
            controls.update(&mut cam);
        }
        assert!((cam.position.length() - radius).abs() < 1e-3);
    }

    #[test]
    fn wheel_zooms_in_and_clamps() {
        let mut cam = camera();
        let radius = cam.position.length();
        let mut controls = OrbitControls::default();

        controls.zoom_by_lines(1.0);
        controls.update(&mut cam);
        assert!(cam.position.length() < radius);

        controls.zoom_by_lines(-1000.0);
        controls.update(&mut cam);
        assert!((cam.position.length() - 50.0).abs() < 1e-3);
    }

    #[test]
    fn polar_angle_never_flips() {
        let mut cam = camera();
        let settings = OrbitSettings { damping_factor: 0.0, ..Default::default() };
        let mut controls = OrbitControls::new(settings);

        controls.rotate_by_pixels(0.0, 10_000.0, 600.0);
        controls.update(&mut cam);
        assert!(cam.position.y > 0.0);
        assert!(cam.position.y.is_finite());
    }
}
