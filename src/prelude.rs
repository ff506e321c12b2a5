//! # scrollscape prelude
//!
//! Commonly used types in one import:
//!
//! ```no_run
//! use scrollscape::prelude::*;
//!
//! let config = SceneConfig::default();
//! let loader = ImageLoader::new(&config.assets.root);
//! let world = build_world(&config, &loader, &mut rand::rng());
//! assert_eq!(world.stars.len(), 200);
//! ```

// Re-export core application types
pub use crate::app::{ScrollscapeApp, Session};
pub use crate::config::SceneConfig;
pub use crate::error::{Error, Result};
pub use crate::world::{build_camera_rig, build_world, World};

// Re-export animation and input
pub use crate::animation::{AnimationLoop, Clock, ManualClock, Spinner, WindowClock};
pub use crate::input::{InputState, PageKey, PointerState, ScrollState, VirtualPage};

// Re-export graphics and scene types
pub use crate::gfx::camera::{CameraRig, OrbitControls, PerspectiveCamera};
pub use crate::gfx::geometry::{make_box, make_grid, make_plane, make_sphere, make_torus, GeometryData};
pub use crate::gfx::rendering::{RenderEngine, Renderer};
pub use crate::gfx::resources::{ImageLoader, Material, Texture, TextureLoader};
pub use crate::gfx::scene::{Light, NodeHandle, NodeKind, Scene, Transform, TransformSnapshot};

// Re-export performance monitoring
pub use crate::performance::{PerformanceMetrics, PerformanceMonitor};

// Re-export common external dependencies
pub use cgmath::Vector3;
