//! Scoped content loading.
//!
//! A [`ContentManager`] loads assets by key on first use, hands out shared
//! handles, and drops everything it loaded in one [`unload`](ContentManager::unload).
//! Screens with heavy assets own their own manager so the memory is released when
//! the screen leaves the stack.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::assets::FontAtlas;
use crate::error::ContentError;
use crate::texture::Texture;

pub struct ContentManager {
    root: PathBuf,
    textures: HashMap<String, Arc<Texture>>,
    fonts: HashMap<String, Arc<FontAtlas>>,
}

impl ContentManager {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            textures: HashMap::new(),
            fonts: HashMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load a texture, e.g. `"Backgrounds/Layer0_2"`.
    ///
    /// The key is tried as-is, then with a `.png` extension.
    pub fn load_texture(&mut self, key: &str) -> Result<Arc<Texture>, ContentError> {
        if let Some(texture) = self.textures.get(key) {
            return Ok(Arc::clone(texture));
        }

        let path = self.resolve(key, "png")?;
        let io_error = |source| ContentError::Io {
            key: key.to_string(),
            source,
        };
        let img = image::ImageReader::open(&path)
            .map_err(io_error)?
            .with_guessed_format()
            .map_err(io_error)?
            .decode()
            .map_err(|source| ContentError::Image {
                key: key.to_string(),
                source,
            })?
            .to_rgba8();
        let texture = Arc::new(Texture::from_image(img, key));
        let (width, height) = (texture.width, texture.height);

        debug!(key, width, height, "loaded texture");
        self.textures.insert(key.to_string(), Arc::clone(&texture));
        Ok(texture)
    }

    /// Load and rasterize a font at `size` pixels.
    ///
    /// The key is tried as-is, then with a `.ttf` extension. Each size is cached separately.
    pub fn load_font(&mut self, key: &str, size: f32) -> Result<Arc<FontAtlas>, ContentError> {
        let cache_key = format!("{key}@{size}");
        if let Some(font) = self.fonts.get(&cache_key) {
            return Ok(Arc::clone(font));
        }

        let path = self.resolve(key, "ttf")?;
        let data = std::fs::read(&path).map_err(|source| ContentError::Io {
            key: key.to_string(),
            source,
        })?;
        let font = FontAtlas::from_bytes(&data, size).map_err(|e| match e {
            ContentError::Font { reason, .. } => ContentError::Font {
                key: key.to_string(),
                reason,
            },
            other => other,
        })?;

        debug!(key, size, "loaded font");
        let font = Arc::new(font);
        self.fonts.insert(cache_key, Arc::clone(&font));
        Ok(font)
    }

    pub fn is_loaded(&self, key: &str) -> bool {
        self.textures.contains_key(key)
            || self
                .fonts
                .keys()
                .any(|k| k.rsplit_once('@').map(|(name, _)| name) == Some(key))
    }

    /// Drop every asset this manager loaded.
    ///
    /// Handles already given out stay valid until their last clone is dropped.
    pub fn unload(&mut self) {
        if !self.textures.is_empty() || !self.fonts.is_empty() {
            debug!(
                root = %self.root.display(),
                textures = self.textures.len(),
                fonts = self.fonts.len(),
                "unloading content"
            );
        }
        self.textures.clear();
        self.fonts.clear();
    }

    fn resolve(&self, key: &str, extension: &str) -> Result<PathBuf, ContentError> {
        let exact = self.root.join(key);
        if exact.is_file() {
            return Ok(exact);
        }

        let with_extension = self.root.join(format!("{key}.{extension}"));
        if with_extension.is_file() {
            return Ok(with_extension);
        }

        Err(ContentError::NotFound {
            key: key.to_string(),
            root: self.root.clone(),
        })
    }
}
