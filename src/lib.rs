// src/lib.rs
//! scrollscape
//!
//! A scroll-driven 3D backdrop built on wgpu and winit: a spinning torus, a
//! starfield, a textured avatar cube and a normal-mapped moon, with a camera that
//! follows the page scroll offset.

pub mod animation;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod gfx;
pub mod input;
pub mod performance;
pub mod prelude;
pub mod wgpu_utils;
pub mod world;

// Re-export main types for convenience
pub use app::{run, ScrollscapeApp, Session};
pub use error::{Error, Result};
