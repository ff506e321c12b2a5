//! CPU-side texture handles and image loading
//!
//! A [`Texture`] is handed out immediately and resolves later, once its image has
//! been decoded. Clones share the same load slot, so a material holding a clone sees
//! the image as soon as the loader finishes. The renderer polls the slot each frame
//! and never blocks on it.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

static NEXT_TEXTURE_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identity of a texture, shared by all its clones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(u64);

/// Decoded RGBA8 image data
#[derive(Clone, PartialEq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    /// Row-major pixels, 4 bytes each, top row first
    pub rgba: Vec<u8>,
}

impl fmt::Debug for TextureImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextureImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba.len())
            .finish()
    }
}

#[derive(Debug)]
enum TextureLoad {
    Ready(TextureImage),
    Failed(String),
}

/// Observable load state of a texture
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextureState<'a> {
    Pending,
    Ready(&'a TextureImage),
    Failed(&'a str),
}

/// Handle to an image that may still be loading
#[derive(Debug, Clone)]
pub struct Texture {
    id: TextureId,
    path: PathBuf,
    slot: Arc<OnceLock<TextureLoad>>,
}

impl Texture {
    /// Create a handle that has not been resolved yet
    pub fn pending(path: impl Into<PathBuf>) -> Self {
        Self {
            id: TextureId(NEXT_TEXTURE_ID.fetch_add(1, Ordering::Relaxed)),
            path: path.into(),
            slot: Arc::new(OnceLock::new()),
        }
    }

    /// Create a handle that is already resolved to `image`
    pub fn from_image(path: impl Into<PathBuf>, image: TextureImage) -> Self {
        let texture = Self::pending(path);
        texture.resolve(Ok(image));
        texture
    }

    /// Store the load result. Only the first call has an effect.
    ///
    /// Returns `false` if the texture was already resolved.
    pub fn resolve(&self, result: std::result::Result<TextureImage, String>) -> bool {
        let load = match result {
            Ok(image) => TextureLoad::Ready(image),
            Err(reason) => TextureLoad::Failed(reason),
        };
        self.slot.set(load).is_ok()
    }

    pub fn id(&self) -> TextureId {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> TextureState<'_> {
        match self.slot.get() {
            None => TextureState::Pending,
            Some(TextureLoad::Ready(image)) => TextureState::Ready(image),
            Some(TextureLoad::Failed(reason)) => TextureState::Failed(reason),
        }
    }

    /// The decoded image, if loading has finished successfully
    pub fn image(&self) -> Option<&TextureImage> {
        match self.state() {
            TextureState::Ready(image) => Some(image),
            _ => None,
        }
    }
}

/// Source of textures for the scene
///
/// Implementations return immediately; the returned handle resolves whenever the
/// image becomes available.
pub trait TextureLoader {
    fn load(&self, path: &Path) -> Texture;
}

/// Decodes PNG and JPEG files relative to an asset root
#[derive(Debug, Clone)]
pub struct ImageLoader {
    root: PathBuf,
    background: bool,
}

impl ImageLoader {
    /// Create a loader that decodes on background threads
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            background: true,
        }
    }

    /// Decode on the calling thread instead, so textures are resolved on return
    pub fn blocking(mut self) -> Self {
        self.background = false;
        self
    }

    fn decode(path: &Path) -> std::result::Result<TextureImage, String> {
        let image = image::open(path).map_err(|err| err.to_string())?.to_rgba8();
        Ok(TextureImage {
            width: image.width(),
            height: image.height(),
            rgba: image.into_raw(),
        })
    }

    fn decode_into(texture: &Texture, full_path: &Path) {
        let result = Self::decode(full_path);
        match &result {
            Ok(image) => log::debug!(
                "Loaded texture {} ({}x{})",
                full_path.display(),
                image.width,
                image.height
            ),
            Err(err) => log::warn!("Failed to load texture {}: {}", full_path.display(), err),
        }
        texture.resolve(result);
    }
}

impl TextureLoader for ImageLoader {
    fn load(&self, path: &Path) -> Texture {
        let texture = Texture::pending(path);
        let full_path = self.root.join(path);

        if !self.background {
            Self::decode_into(&texture, &full_path);
            return texture;
        }

        let worker_texture = texture.clone();
        let worker_path = full_path.clone();
        let spawned = std::thread::Builder::new()
            .name(format!("texture-{}", path.display()))
            .spawn(move || Self::decode_into(&worker_texture, &worker_path));

        if let Err(err) = spawned {
            log::warn!("Could not spawn texture loader thread ({}), decoding inline", err);
            Self::decode_into(&texture, &full_path);
        }

        texture
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> TextureImage {
        TextureImage {
            width: 2,
            height: 1,
            rgba: vec![255, 255, 255, 255, 0, 0, 0, 255],
        }
    }

    #[test]
    fn test_clones_share_load_state() {
        let texture = Texture::pending("moon_01.jpg");
        let clone = texture.clone();
        assert_eq!(clone.state(), TextureState::Pending);
        assert_eq!(texture.id(), clone.id());

        assert!(texture.resolve(Ok(checker())));
        assert_eq!(clone.image().map(|i| i.width), Some(2));
    }

    #[test]
    fn test_resolve_is_write_once() {
        let texture = Texture::pending("normal.jpg");
        assert!(texture.resolve(Err("missing".to_string())));
        assert!(!texture.resolve(Ok(checker())));
        assert_eq!(texture.state(), TextureState::Failed("missing"));
    }

    #[test]
    fn test_texture_ids_are_unique() {
        let a = Texture::pending("a.png");
        let b = Texture::pending("a.png");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_missing_file_fails_without_panicking() {
        let loader = ImageLoader::new("/nonexistent-scrollscape-assets").blocking();
        let texture = loader.load(Path::new("space_image_01.jpg"));
        assert!(matches!(texture.state(), TextureState::Failed(_)));
        assert_eq!(texture.path(), Path::new("space_image_01.jpg"));
    }

    #[test]
    fn test_decodes_png_from_asset_root() {
        let root = std::env::temp_dir().join(format!("scrollscape-png-{}", std::process::id()));
        std::fs::create_dir_all(&root).unwrap();
        let image = image::RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]));
        image.save(root.join("harsh_circle.png")).unwrap();

        let loader = ImageLoader::new(&root).blocking();
        let texture = loader.load(Path::new("harsh_circle.png"));
        let decoded = texture.image().expect("png should decode");
        assert_eq!((decoded.width, decoded.height), (3, 2));
        assert_eq!(&decoded.rgba[..4], &[10, 20, 30, 255]);

        std::fs::remove_dir_all(&root).ok();
    }
}
