use std::f32::consts::{PI, TAU};

use cgmath::{InnerSpace, Vector3, Zero};

use super::perspective::PerspectiveCamera;

const EPS: f32 = 0.000001;

/// Damped orbit control around a target point
///
/// Pointer input accumulates a pending spherical delta and a zoom scale; every
/// [`update`](OrbitControls::update) rotates the camera's offset from the target,
/// re-aims the camera, scales its zoom, then decays the pending delta. With
/// damping enabled a single drag keeps the camera gliding for a while.
///
/// Zoom changes the camera's field of view rather than its distance, so it
/// survives anything that repositions the camera afterwards.
#[derive(Debug, Clone, Copy)]
pub struct OrbitControls {
    pub target: Vector3<f32>,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    viewport_height: f32,
    /// Pending (theta, phi) change
    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new(Vector3::zero())
    }
}

impl OrbitControls {
    pub fn new(target: Vector3<f32>) -> Self {
        Self {
            target,
            enable_damping: true,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            min_zoom: 0.1,
            max_zoom: 10.0,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            viewport_height: 1.0,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
        }
    }

    /// Sets the viewport height that drag distances are measured against
    pub fn set_viewport_height(&mut self, height: u32) {
        self.viewport_height = height.max(1) as f32;
    }

    pub fn rotate_left(&mut self, angle: f32) {
        self.delta_theta -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.delta_phi -= angle;
    }

    /// Dragging the full viewport height turns the camera once around
    pub fn handle_drag(&mut self, dx: f32, dy: f32) {
        self.rotate_left(TAU * dx / self.viewport_height * self.rotate_speed);
        self.rotate_up(TAU * dy / self.viewport_height * self.rotate_speed);
    }

    /// Negative deltas (wheel away from the user) zoom in
    pub fn handle_zoom(&mut self, dy: f32) {
        let step = self.zoom_scale();
        if dy < 0.0 {
            self.scale *= step;
        } else if dy > 0.0 {
            self.scale /= step;
        }
    }

    fn zoom_scale(&self) -> f32 {
        0.95_f32.powf(self.zoom_speed)
    }

    /// Pending rotation not yet applied to the camera
    pub fn pending_rotation(&self) -> (f32, f32) {
        (self.delta_theta, self.delta_phi)
    }

    /// Applies pending rotation and zoom to the camera
    ///
    /// Returns `false` when the camera sits on the target: its position and
    /// orientation are left alone, but zoom still applies and pending rotation
    /// still decays.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        camera.zoom = (camera.zoom / self.scale).clamp(self.min_zoom, self.max_zoom);
        self.scale = 1.0;

        let moved = self.orbit(camera);
        self.decay();
        moved
    }

    fn orbit(&self, camera: &mut PerspectiveCamera) -> bool {
        let offset = camera.position - self.target;
        let radius = offset.magnitude();
        if radius < EPS {
            return false;
        }

        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

        if self.enable_damping {
            theta += self.delta_theta * self.damping_factor;
            phi += self.delta_phi * self.damping_factor;
        } else {
            theta += self.delta_theta;
            phi += self.delta_phi;
        }

        phi = phi
            .clamp(self.min_polar_angle, self.max_polar_angle)
            .clamp(EPS, PI - EPS);
        let offset = Vector3::new(
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
            radius * phi.sin() * theta.cos(),
        );
        camera.position = self.target + offset;
        camera.look_at(self.target);
        true
    }

    fn decay(&mut self) {
        if self.enable_damping {
            self.delta_theta *= 1.0 - self.damping_factor;
            self.delta_phi *= 1.0 - self.damping_factor;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn camera_at(x: f32, y: f32, z: f32) -> PerspectiveCamera {
        let mut camera = PerspectiveCamera::new(75.0, 1.6, 0.1, 1000.0);
        camera.position = Vector3::new(x, y, z);
        camera
    }

    #[test]
    fn test_update_without_input_keeps_position() {
        let mut controls = OrbitControls::default();
        let mut camera = camera_at(-3.0, 0.0, 30.0);
        assert!(controls.update(&mut camera));

        assert_abs_diff_eq!(camera.position.x, -3.0, epsilon = 1e-4);
        assert_abs_diff_eq!(camera.position.y, 0.0, epsilon = 1e-4);
        assert_abs_diff_eq!(camera.position.z, 30.0, epsilon = 1e-4);
        let forward = camera.forward();
        assert_abs_diff_eq!(forward.z, -(30.0 / 909.0_f32.sqrt()), epsilon = 1e-4);
    }

    #[test]
    fn test_damping_decays_pending_rotation() {
        let mut controls = OrbitControls::default();
        controls.rotate_left(-1.0);
        let mut camera = camera_at(0.0, 0.0, 10.0);

        controls.update(&mut camera);
        // First update moves by delta * factor
        let theta = camera.position.x.atan2(camera.position.z);
        assert_abs_diff_eq!(theta, 0.05, epsilon = 1e-5);
        assert_abs_diff_eq!(controls.pending_rotation().0, 0.95, epsilon = 1e-6);

        controls.update(&mut camera);
        let theta = camera.position.x.atan2(camera.position.z);
        assert_abs_diff_eq!(theta, 0.05 + 0.95 * 0.05, epsilon = 1e-5);
    }

    #[test]
    fn test_without_damping_rotation_applies_at_once() {
        let mut controls = OrbitControls::default();
        controls.enable_damping = false;
        controls.rotate_left(-0.5);
        let mut camera = camera_at(0.0, 0.0, 10.0);
        controls.update(&mut camera);

        assert_abs_diff_eq!(camera.position.x.atan2(camera.position.z), 0.5, epsilon = 1e-5);
        assert_eq!(controls.pending_rotation(), (0.0, 0.0));
    }

    #[test]
    fn test_drag_full_height_is_full_turn() {
        let mut controls = OrbitControls::default();
        controls.set_viewport_height(800);
        controls.handle_drag(800.0, 0.0);
        assert_abs_diff_eq!(controls.pending_rotation().0, -TAU, epsilon = 1e-5);
    }

    #[test]
    fn test_zoom_scales_camera_zoom() {
        let mut controls = OrbitControls::default();
        let mut camera = camera_at(0.0, 0.0, 10.0);
        controls.handle_zoom(-1.0);
        controls.update(&mut camera);
        assert_abs_diff_eq!(camera.zoom, 1.0 / 0.95, epsilon = 1e-5);
        assert_abs_diff_eq!(camera.position.magnitude(), 10.0, epsilon = 1e-4);

        // zoom is applied once, not on every update
        controls.update(&mut camera);
        assert_abs_diff_eq!(camera.zoom, 1.0 / 0.95, epsilon = 1e-5);

        controls.handle_zoom(1.0);
        controls.update(&mut camera);
        assert_abs_diff_eq!(camera.zoom, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut controls = OrbitControls::default();
        let mut camera = camera_at(0.0, 0.0, 10.0);
        for _ in 0..200 {
            controls.handle_zoom(-1.0);
            controls.update(&mut camera);
        }
        assert_abs_diff_eq!(camera.zoom, controls.max_zoom);
    }

    #[test]
    fn test_polar_angle_is_clamped() {
        let mut controls = OrbitControls::default();
        controls.enable_damping = false;
        controls.rotate_up(10.0);
        let mut camera = camera_at(0.0, 0.0, 10.0);
        controls.update(&mut camera);

        assert!(camera.position.y > 9.99);
        assert!(camera.position.y.is_finite() && camera.position.x.is_finite());
    }

    #[test]
    fn test_camera_on_target_is_untouched() {
        let mut controls = OrbitControls::default();
        controls.rotate_left(1.0);
        let mut camera = camera_at(0.0, 0.0, 0.0);
        let before = camera;
        assert!(!controls.update(&mut camera));
        assert_eq!(camera, before);
    }

    #[test]
    fn test_pending_rotation_decays_on_target() {
        let mut controls = OrbitControls::default();
        controls.set_viewport_height(800);
        controls.handle_drag(400.0, 0.0);
        let mut camera = camera_at(0.0, 0.0, 0.0);

        controls.update(&mut camera);
        assert_abs_diff_eq!(controls.pending_rotation().0, -PI * 0.95, epsilon = 1e-5);

        for _ in 0..600 {
            controls.update(&mut camera);
        }
        let (theta, phi) = controls.pending_rotation();
        assert!(theta.abs() < 1e-6 && phi.abs() < 1e-6);
        assert_eq!(camera.position, Vector3::zero());
    }

    #[test]
    fn test_zoom_applies_on_target() {
        let mut controls = OrbitControls::default();
        let mut camera = camera_at(0.0, 0.0, 0.0);
        controls.handle_zoom(-1.0);
        assert!(!controls.update(&mut camera));
        assert_abs_diff_eq!(camera.zoom, 1.0 / 0.95, epsilon = 1e-5);
    }
}
