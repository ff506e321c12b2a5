//! Core rendering functionality
//!
//! The [`Renderer`] trait is what the animation loop draws through; [`RenderEngine`]
//! implements it on top of wgpu.

pub mod frame;
pub mod pipeline_manager;
pub mod render_engine;

pub use frame::{collect_frame, DrawItem, DrawKind, FrameUniform, NodeUniform, SceneLights, MAX_LIGHTS};
pub use pipeline_manager::{PipelineConfig, PipelineManager};
pub use render_engine::RenderEngine;

use crate::gfx::{camera::perspective::PerspectiveCamera, scene::Scene};

/// Draws a scene as seen from a camera
///
/// Sizes passed to [`set_size`](Renderer::set_size) are logical pixels; the
/// drawable surface is that size multiplied by the pixel ratio.
pub trait Renderer {
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera);
    fn set_size(&mut self, width: u32, height: u32);
    fn set_pixel_ratio(&mut self, ratio: f64);
}

#[cfg(test)]
pub(crate) mod recording {
    use super::*;
    use crate::gfx::scene::TransformSnapshot;

    /// What a [`RecordingRenderer`] saw in one `render` call
    #[derive(Debug, Clone)]
    pub struct RecordedFrame {
        pub camera: PerspectiveCamera,
        pub transforms: TransformSnapshot,
    }

    /// Renderer that keeps every frame instead of drawing it
    #[derive(Debug, Default)]
    pub struct RecordingRenderer {
        pub frames: Vec<RecordedFrame>,
        pub size: Option<(u32, u32)>,
        pub pixel_ratio: Option<f64>,
    }

    impl Renderer for RecordingRenderer {
        fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) {
            self.frames.push(RecordedFrame {
                camera: *camera,
                transforms: scene.snapshot_transforms(),
            });
        }

        fn set_size(&mut self, width: u32, height: u32) {
            self.size = Some((width, height));
        }

        fn set_pixel_ratio(&mut self, ratio: f64) {
            self.pixel_ratio = Some(ratio);
        }
    }
}
