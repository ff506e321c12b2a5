//! Material descriptors
//!
//! Materials are plain data registered once with the [`Scene`](crate::gfx::scene::Scene)
//! and shared by any number of meshes through a [`MaterialId`]. The renderer owns
//! the matching GPU uniform and bind group.

use super::texture::Texture;

/// Material ID for referencing materials registered with a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub(crate) u32);

impl MaterialId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Shading model of a material
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialKind {
    /// Lit by the scene's point and ambient lights
    Standard,
    /// Unlit, shows its color and map as-is
    Basic,
}

/// GPU uniform data for materials
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    /// Linear RGBA base color
    pub color: [f32; 4],
    /// x: lit, y: has color map, z: has normal map
    pub flags: [u32; 4],
}

/// Material definition
#[derive(Debug, Clone)]
pub struct Material {
    pub name: String,
    pub kind: MaterialKind,
    /// sRGB color with alpha, each channel in 0..=1
    pub color: [f32; 4],
    pub map: Option<Texture>,
    pub normal_map: Option<Texture>,
}

impl Default for Material {
    fn default() -> Self {
        Self::standard("Default", 0xffffff)
    }
}

impl Material {
    /// Lit material with a solid color given as `0xRRGGBB`
    pub fn standard(name: &str, hex: u32) -> Self {
        Self {
            name: name.to_string(),
            kind: MaterialKind::Standard,
            color: color_from_hex(hex),
            map: None,
            normal_map: None,
        }
    }

    /// Unlit material with a solid color given as `0xRRGGBB`
    pub fn basic(name: &str, hex: u32) -> Self {
        Self {
            kind: MaterialKind::Basic,
            ..Self::standard(name, hex)
        }
    }

    /// Builder pattern: Set the color map
    pub fn with_map(mut self, map: Texture) -> Self {
        self.map = Some(map);
        self
    }

    /// Builder pattern: Set the tangent-space normal map
    pub fn with_normal_map(mut self, normal_map: Texture) -> Self {
        self.normal_map = Some(normal_map);
        self
    }

    /// Base color converted to linear space for shading
    pub fn linear_color(&self) -> [f32; 4] {
        [
            srgb_to_linear(self.color[0]),
            srgb_to_linear(self.color[1]),
            srgb_to_linear(self.color[2]),
            self.color[3],
        ]
    }

    pub fn uniform(&self) -> MaterialUniform {
        let map_ready = self.map.as_ref().is_some_and(|t| t.image().is_some());
        let normal_ready = self
            .normal_map
            .as_ref()
            .is_some_and(|t| t.image().is_some());

        MaterialUniform {
            color: self.linear_color(),
            flags: [
                (self.kind == MaterialKind::Standard) as u32,
                map_ready as u32,
                normal_ready as u32,
                0,
            ],
        }
    }
}

/// Convert `0xRRGGBB` into an opaque RGBA color
pub fn color_from_hex(hex: u32) -> [f32; 4] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        1.0,
    ]
}

pub(crate) fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}
