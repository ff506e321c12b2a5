//! The self-rescheduling update/render loop
//!
//! Each tick spins the animated nodes, lets the orbit controls move the camera, then
//! pins the camera to the scroll-derived position, draws, and asks the [`Clock`] for
//! the next tick.

pub mod clock;

pub use clock::{Clock, ManualClock, WindowClock};

use std::time::Instant;

use cgmath::Vector3;

use crate::{
    gfx::{
        camera::CameraRig,
        rendering::Renderer,
        scene::{NodeHandle, Scene},
    },
    input::InputState,
    performance::PerformanceMonitor,
};

/// A node that rotates by a fixed amount every tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spinner {
    pub node: NodeHandle,
    /// Radians added to the node's Euler rotation per tick
    pub delta: Vector3<f32>,
}

impl Spinner {
    pub fn new(node: NodeHandle, delta: Vector3<f32>) -> Self {
        Self { node, delta }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
}

pub struct AnimationLoop<C: Clock, R: Renderer> {
    state: LoopState,
    clock: C,
    renderer: R,
    scene: Scene,
    rig: CameraRig,
    spinners: Vec<Spinner>,
    frames: u64,
    monitor: PerformanceMonitor,
}

impl<C: Clock, R: Renderer> AnimationLoop<C, R> {
    pub fn new(scene: Scene, rig: CameraRig, spinners: Vec<Spinner>, clock: C, renderer: R) -> Self {
        Self {
            state: LoopState::Idle,
            clock,
            renderer,
            scene,
            rig,
            spinners,
            frames: 0,
            monitor: PerformanceMonitor::new(),
        }
    }

    /// Enters the running state and performs the first tick right away
    ///
    /// # Panics
    /// Panics if the loop was already started.
    pub fn start(&mut self, input: &mut InputState) {
        assert_eq!(self.state, LoopState::Idle, "animation loop started twice");
        self.state = LoopState::Running;
        log::info!(
            "Animation loop started with {} spinners over {} nodes",
            self.spinners.len(),
            self.scene.len()
        );
        self.tick(input);
    }

    /// Runs one tick in response to the clock
    ///
    /// # Panics
    /// Panics if the loop has not been started.
    pub fn on_frame(&mut self, input: &mut InputState) {
        assert_eq!(
            self.state,
            LoopState::Running,
            "animation loop ticked before start"
        );
        self.tick(input);
    }

    fn tick(&mut self, input: &mut InputState) {
        for spinner in &self.spinners {
            self.scene.transform_mut(spinner.node).rotate_by(spinner.delta);
        }

        self.rig.update_orbit(&mut input.pointer);
        self.rig.apply_scroll(&input.scroll);

        self.renderer.render(&self.scene, &self.rig.camera);

        self.frames += 1;
        self.monitor.record_frame(Instant::now());
        self.clock.on_next_frame();
    }

    /// Propagates a new logical viewport size to the camera and renderer
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.rig.resize(width, height);
        self.renderer.set_size(width, height);
    }

    pub fn set_pixel_ratio(&mut self, ratio: f64) {
        self.renderer.set_pixel_ratio(ratio);
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Ticks performed so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn monitor(&self) -> &PerformanceMonitor {
        &self.monitor
    }
}

impl<R: Renderer> AnimationLoop<ManualClock, R> {
    /// Fires up to `n` pending frames synchronously, returning how many ran
    ///
    /// Stops early if no frame was requested.
    pub fn run_frames(&mut self, input: &mut InputState, n: usize) -> usize {
        let mut ran = 0;
        while ran < n && self.clock.fire() {
            self.on_frame(input);
            ran += 1;
        }
        ran
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        camera::{camera_rig::scroll_position, OrbitControls, PerspectiveCamera},
        geometry::{make_sphere, make_torus},
        rendering::recording::RecordingRenderer,
        resources::Material,
        scene::Transform,
    };
    use approx::assert_relative_eq;

    struct Fixture {
        anim: AnimationLoop<ManualClock, RecordingRenderer>,
        torus: NodeHandle,
        moon: NodeHandle,
    }

    fn fixture() -> Fixture {
        let mut scene = Scene::new();
        let material = scene.add_material(Material::standard("plain", 0xffffff));
        let torus_geometry = scene.add_geometry(make_torus(10.0, 3.0, 16, 100));
        let torus = scene.add_mesh(None, torus_geometry, material, Transform::default());
        let moon_geometry = scene.add_geometry(make_sphere(3.0, 32, 32));
        let moon = scene.add_mesh(
            None,
            moon_geometry,
            material,
            Transform::from_position(-10.0, 0.0, 30.0),
        );

        let mut camera = PerspectiveCamera::new(75.0, 1.6, 0.1, 1000.0);
        camera.position = Vector3::new(-3.0, 0.0, 30.0);
        let rig = CameraRig::new(camera, OrbitControls::default());
        let spinners = vec![
            Spinner::new(torus, Vector3::new(0.01, 0.005, 0.01)),
            Spinner::new(moon, Vector3::new(0.005, 0.075, 0.005)),
        ];

        Fixture {
            anim: AnimationLoop::new(scene, rig, spinners, ManualClock::new(), RecordingRenderer::default()),
            torus,
            moon,
        }
    }

    #[test]
    fn test_start_ticks_once_and_reschedules() {
        let mut f = fixture();
        let mut input = InputState::default();
        assert_eq!(f.anim.state(), LoopState::Idle);

        f.anim.start(&mut input);

        assert_eq!(f.anim.state(), LoopState::Running);
        assert_eq!(f.anim.frames(), 1);
        assert_eq!(f.anim.renderer().frames.len(), 1);
        assert!(f.anim.clock().is_pending());
    }

    #[test]
    fn test_torus_rotation_after_n_ticks() {
        let mut f = fixture();
        let mut input = InputState::default();
        assert_eq!(f.anim.scene().transform(f.torus).rotation, Vector3::new(0.0, 0.0, 0.0));

        f.anim.start(&mut input);
        assert_eq!(f.anim.run_frames(&mut input, 9), 9);

        let rotation = f.anim.scene().transform(f.torus).rotation;
        assert_relative_eq!(rotation.x, 0.1, epsilon = 1e-5);
        assert_relative_eq!(rotation.y, 0.05, epsilon = 1e-5);
        assert_relative_eq!(rotation.z, 0.1, epsilon = 1e-5);
    }

    #[test]
    fn test_torus_rotation_has_no_drift() {
        let mut f = fixture();
        let mut input = InputState::default();
        f.anim.start(&mut input);
        f.anim.run_frames(&mut input, 999);

        assert_eq!(f.anim.frames(), 1000);
        let rotation = f.anim.scene().transform(f.torus).rotation;
        assert_relative_eq!(rotation.x, 10.0, epsilon = 1e-3);
        assert_relative_eq!(rotation.y, 5.0, epsilon = 1e-3);
        assert_relative_eq!(rotation.z, 10.0, epsilon = 1e-3);
    }

    #[test]
    fn test_moon_spins_after_hundred_ticks() {
        let mut f = fixture();
        let mut input = InputState::default();
        f.anim.start(&mut input);
        f.anim.run_frames(&mut input, 99);

        assert_eq!(f.anim.frames(), 100);
        let rotation = f.anim.scene().transform(f.moon).rotation;
        assert_relative_eq!(rotation.y, 7.5, epsilon = 1e-3);
        assert_relative_eq!(rotation.x, 0.5, epsilon = 1e-4);
    }

    #[test]
    fn test_scroll_overrides_orbit_each_tick() {
        let mut f = fixture();
        let mut input = InputState::default();
        f.anim.start(&mut input);

        input.pointer.on_button(true);
        input.pointer.on_motion(120.0, -40.0);
        input.pointer.on_zoom(3.0);
        input.scroll.offset_px = -1000.0;
        f.anim.run_frames(&mut input, 1);

        let camera = f.anim.renderer().frames[1].camera;
        let expected = scroll_position(-1000.0);
        assert_relative_eq!(camera.position.x, expected.x, epsilon = 1e-5);
        assert_relative_eq!(camera.position.y, expected.y, epsilon = 1e-5);
        assert_relative_eq!(camera.position.z, expected.z, epsilon = 1e-5);
    }

    #[test]
    fn test_first_frame_uses_scroll_zero() {
        let mut f = fixture();
        let mut input = InputState::default();
        f.anim.start(&mut input);

        let camera = f.anim.renderer().frames[0].camera;
        assert_relative_eq!(camera.position.x, 0.0);
        assert_relative_eq!(camera.position.z, 0.0);
    }

    #[test]
    fn test_renderer_sees_rotations_before_drawing() {
        let mut f = fixture();
        let mut input = InputState::default();
        f.anim.start(&mut input);

        let first = &f.anim.renderer().frames[0].transforms.nodes[f.torus.index()];
        assert_relative_eq!(first.rotation[1], 0.005, epsilon = 1e-6);
    }

    #[test]
    fn test_run_frames_stops_without_request() {
        let mut f = fixture();
        let mut input = InputState::default();
        f.anim.start(&mut input);
        assert_eq!(f.anim.run_frames(&mut input, 0), 0);
        assert!(f.anim.clock().is_pending());
    }

    #[test]
    fn test_resize_reaches_camera_and_renderer() {
        let mut f = fixture();
        f.anim.resize(1000, 500);
        f.anim.set_pixel_ratio(2.0);
        assert_relative_eq!(f.anim.rig().camera.aspect, 2.0);
        assert_eq!(f.anim.renderer().size, Some((1000, 500)));
        assert_eq!(f.anim.renderer().pixel_ratio, Some(2.0));

        f.anim.resize(0, 500);
        assert_eq!(f.anim.renderer().size, Some((1000, 500)));
    }

    #[test]
    #[should_panic(expected = "animation loop ticked before start")]
    fn test_tick_before_start_panics() {
        let mut f = fixture();
        f.anim.on_frame(&mut InputState::default());
    }

    #[test]
    #[should_panic(expected = "animation loop started twice")]
    fn test_double_start_panics() {
        let mut f = fixture();
        let mut input = InputState::default();
        f.anim.start(&mut input);
        f.anim.start(&mut input);
    }
}
