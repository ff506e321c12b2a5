use cgmath::*;

use super::camera_utils::OPENGL_TO_WGPU_MATRIX;

/// Perspective camera placed by position and orientation
///
/// Looks down its local -Z axis with +Y up, like a right-handed GL camera.
/// Position and orientation are independent: the scroll override moves the camera
/// without turning it. `zoom` narrows the field of view and is left alone by both.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Magnification applied to the field of view; 1 is unzoomed
    pub zoom: f32,
    pub position: Vector3<f32>,
    pub orientation: Quaternion<f32>,
    pub up: Vector3<f32>,
}

impl PerspectiveCamera {
    pub fn new(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov_degrees,
            aspect,
            near,
            far,
            zoom: 1.0,
            position: Vector3::zero(),
            orientation: Quaternion::one(),
            up: Vector3::unit_y(),
        }
    }

    /// Updates the aspect ratio after a viewport resize. Zero-sized viewports are ignored.
    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Turns the camera to face `target` from its current position
    pub fn look_at(&mut self, target: Vector3<f32>) {
        let mut z = self.position - target;
        if z.magnitude2() == 0.0 {
            z = Vector3::unit_z();
        }
        z = z.normalize();

        let mut x = self.up.cross(z);
        if x.magnitude2() == 0.0 {
            // Looking straight along `up`; nudge the view direction off the pole
            if self.up.z.abs() == 1.0 {
                z.x += 0.0001;
            } else {
                z.z += 0.0001;
            }
            z = z.normalize();
            x = self.up.cross(z);
        }
        let x = x.normalize();
        let y = z.cross(x);

        self.orientation = Quaternion::from(Matrix3::from_cols(x, y, z)).normalize();
    }

    /// Unit vector the camera is looking along
    pub fn forward(&self) -> Vector3<f32> {
        self.orientation.rotate_vector(-Vector3::unit_z())
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::from(self.orientation.conjugate()) * Matrix4::from_translation(-self.position)
    }

    /// Vertical field of view after zoom, in degrees
    pub fn effective_fov_degrees(&self) -> f32 {
        let half = (self.fov_degrees * 0.5).to_radians();
        (half.tan() / self.zoom).atan().to_degrees() * 2.0
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX
            * perspective(Deg(self.effective_fov_degrees()), self.aspect, self.near, self.far)
    }

    pub fn view_projection_matrix(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_look_at_faces_target() {
        let mut camera = PerspectiveCamera::new(75.0, 1.6, 0.1, 1000.0);
        camera.position = Vector3::new(-3.0, 0.0, 30.0);
        camera.look_at(Vector3::zero());

        let expected = (-camera.position).normalize();
        let forward = camera.forward();
        assert_abs_diff_eq!(forward.x, expected.x, epsilon = 1e-5);
        assert_abs_diff_eq!(forward.y, expected.y, epsilon = 1e-5);
        assert_abs_diff_eq!(forward.z, expected.z, epsilon = 1e-5);
    }

    #[test]
    fn test_view_matrix_matches_look_at_rh() {
        let mut camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 1000.0);
        camera.position = Vector3::new(4.0, 5.0, 6.0);
        camera.look_at(Vector3::new(0.0, 1.0, 0.0));

        let reference = Matrix4::look_at_rh(
            Point3::new(4.0, 5.0, 6.0),
            Point3::new(0.0, 1.0, 0.0),
            Vector3::unit_y(),
        );
        let view = camera.view_matrix();
        for c in 0..4 {
            for r in 0..4 {
                assert_abs_diff_eq!(view[c][r], reference[c][r], epsilon = 1e-4);
            }
        }
    }

    #[test]
    fn test_look_at_straight_down_stays_finite() {
        let mut camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 1000.0);
        camera.position = Vector3::new(0.0, 10.0, 0.0);
        camera.look_at(Vector3::zero());
        let forward = camera.forward();
        assert!(forward.x.is_finite() && forward.y.is_finite() && forward.z.is_finite());
        assert!(forward.y < -0.99);
    }

    #[test]
    fn test_zoom_narrows_field_of_view() {
        let mut camera = PerspectiveCamera::new(90.0, 1.0, 0.1, 1000.0);
        assert_abs_diff_eq!(camera.effective_fov_degrees(), 90.0, epsilon = 1e-4);

        camera.zoom = 2.0;
        // tan(45°) / 2 = 0.5
        assert_abs_diff_eq!(
            camera.effective_fov_degrees(),
            2.0 * 0.5_f32.atan().to_degrees(),
            epsilon = 1e-4
        );
        let unzoomed = PerspectiveCamera::new(90.0, 1.0, 0.1, 1000.0).projection_matrix();
        assert_abs_diff_eq!(camera.projection_matrix()[0][0], unzoomed[0][0] * 2.0, epsilon = 1e-4);
    }

    #[test]
    fn test_resize_ignores_zero_height() {
        let mut camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 1000.0);
        camera.resize_projection(1280, 800);
        assert_abs_diff_eq!(camera.aspect, 1.6);
        camera.resize_projection(1280, 0);
        assert_abs_diff_eq!(camera.aspect, 1.6);
    }
}
