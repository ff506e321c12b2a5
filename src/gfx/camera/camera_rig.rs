use cgmath::Vector3;

use crate::input::{PointerState, ScrollState};

use super::{orbit_controls::OrbitControls, perspective::PerspectiveCamera};

/// Camera z per pixel of scroll offset
pub const SCROLL_Z_PER_PX: f32 = -0.01;
/// Camera x and y per pixel of scroll offset
pub const SCROLL_XY_PER_PX: f32 = -0.0002;

/// Camera position dictated by a scroll offset
pub fn scroll_position(offset_px: f32) -> Vector3<f32> {
    Vector3::new(
        offset_px * SCROLL_XY_PER_PX,
        offset_px * SCROLL_XY_PER_PX,
        offset_px * SCROLL_Z_PER_PX,
    )
}

/// Overwrites the camera position from the scroll offset, keeping its orientation
pub fn apply_scroll_override(camera: &mut PerspectiveCamera, offset_px: f32) {
    camera.position = scroll_position(offset_px);
}

/// The scene camera and the two inputs that move it
///
/// Each tick runs [`update_orbit`](CameraRig::update_orbit) and then
/// [`apply_scroll`](CameraRig::apply_scroll). The orbit controls turn the camera
/// toward the target; the scroll offset then decides where the camera is.
#[derive(Debug, Clone)]
pub struct CameraRig {
    pub camera: PerspectiveCamera,
    pub controls: OrbitControls,
}

impl CameraRig {
    pub fn new(camera: PerspectiveCamera, controls: OrbitControls) -> Self {
        Self { camera, controls }
    }

    /// Feeds accumulated pointer input into the orbit controls and steps them
    pub fn update_orbit(&mut self, pointer: &mut PointerState) {
        let (dx, dy) = pointer.take_drag();
        if dx != 0.0 || dy != 0.0 {
            self.controls.handle_drag(dx, dy);
        }
        let zoom = pointer.take_zoom();
        if zoom != 0.0 {
            self.controls.handle_zoom(zoom);
        }
        self.controls.update(&mut self.camera);
    }

    pub fn apply_scroll(&mut self, scroll: &ScrollState) {
        apply_scroll_override(&mut self.camera, scroll.offset_px);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.resize_projection(width, height);
        self.controls.set_viewport_height(height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rig() -> CameraRig {
        let mut camera = PerspectiveCamera::new(75.0, 1.6, 0.1, 1000.0);
        camera.position = Vector3::new(-3.0, 0.0, 30.0);
        CameraRig::new(camera, OrbitControls::default())
    }

    #[test]
    fn test_scroll_down_moves_camera_back() {
        let mut camera = PerspectiveCamera::new(75.0, 1.6, 0.1, 1000.0);
        apply_scroll_override(&mut camera, -1000.0);
        assert_relative_eq!(camera.position.x, 0.2);
        assert_relative_eq!(camera.position.y, 0.2);
        assert_relative_eq!(camera.position.z, 10.0);
    }

    #[test]
    fn test_scroll_zero_is_origin() {
        let mut camera = PerspectiveCamera::new(75.0, 1.6, 0.1, 1000.0);
        camera.position = Vector3::new(-3.0, 0.0, 30.0);
        apply_scroll_override(&mut camera, 0.0);
        assert_eq!(camera.position, Vector3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_scroll_override_is_idempotent() {
        let mut rig = rig();
        let scroll = ScrollState { offset_px: -640.0 };
        rig.apply_scroll(&scroll);
        let once = rig.camera;
        rig.apply_scroll(&scroll);
        assert_eq!(rig.camera, once);
    }

    #[test]
    fn test_scroll_keeps_orbit_orientation() {
        let mut rig = rig();
        let mut pointer = PointerState::default();
        rig.update_orbit(&mut pointer);
        let orientation = rig.camera.orientation;

        rig.apply_scroll(&ScrollState { offset_px: -1000.0 });
        assert_eq!(rig.camera.orientation, orientation);
    }

    #[test]
    fn test_orbit_then_scroll_position_is_scroll_derived() {
        let mut rig = rig();
        let mut pointer = PointerState::default();
        pointer.on_button(true);
        pointer.on_motion(120.0, -40.0);
        pointer.on_zoom(-3.0);

        rig.update_orbit(&mut pointer);
        rig.apply_scroll(&ScrollState { offset_px: -250.0 });
        assert_eq!(rig.camera.position, scroll_position(-250.0));
        // Pointer input was consumed by the orbit update
        assert_eq!(pointer.take_drag(), (0.0, 0.0));
        assert_eq!(pointer.take_zoom(), 0.0);
    }

    #[test]
    fn test_zoom_survives_scroll_override() {
        let scroll = ScrollState { offset_px: -1000.0 };
        let mut plain = rig();
        let mut zoomed = rig();
        let mut pointer = PointerState::default();
        pointer.on_zoom(-20.0);

        for _ in 0..60 {
            plain.update_orbit(&mut PointerState::default());
            plain.apply_scroll(&scroll);
            zoomed.update_orbit(&mut pointer);
            zoomed.apply_scroll(&scroll);
        }

        assert_eq!(zoomed.camera.position, plain.camera.position);
        assert!(zoomed.camera.zoom > plain.camera.zoom);
        assert_ne!(
            zoomed.camera.view_projection_matrix(),
            plain.camera.view_projection_matrix()
        );
    }

    #[test]
    fn test_resize_updates_aspect() {
        let mut rig = rig();
        rig.resize(1000, 500);
        assert_relative_eq!(rig.camera.aspect, 2.0);
    }
}
