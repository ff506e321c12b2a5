//! Materials, textures and their GPU resources
//!
//! Handles textures, materials and bind groups for rendering.

pub mod material;
pub mod texture;
pub mod texture_resource;

// Re-export main types
pub use material::{Material, MaterialId, MaterialKind};
pub use texture::{ImageLoader, Texture, TextureId, TextureImage, TextureLoader, TextureState};
pub use texture_resource::{ColorSpace, TextureResource};
