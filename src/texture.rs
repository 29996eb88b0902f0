use image::RgbaImage;

/// A decoded RGBA texture ready for the renderer to upload.
#[derive(Debug)]
pub struct Texture {
    pixels: RgbaImage,
    label: String,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    /// Wrap already-decoded RGBA pixels.
    ///
    /// Returns `None` if `data` does not hold exactly `width * height` pixels.
    pub fn from_rgba(data: Vec<u8>, width: u32, height: u32, label: &str) -> Option<Self> {
        let pixels = RgbaImage::from_raw(width, height, data)?;
        Some(Self {
            pixels,
            label: label.to_string(),
            width,
            height,
        })
    }

    /// Load a texture from an image file.
    pub fn from_file(path: &str) -> Result<Self, image::ImageError> {
        let img = image::open(path)?.to_rgba8();
        Ok(Self::from_image(img, path))
    }

    /// Load a texture from encoded bytes (PNG, JPEG, ...).
    pub fn from_bytes(bytes: &[u8], label: &str) -> Result<Self, image::ImageError> {
        let img = image::load_from_memory(bytes)?.to_rgba8();
        Ok(Self::from_image(img, label))
    }

    pub(crate) fn from_image(pixels: RgbaImage, label: &str) -> Self {
        let (width, height) = pixels.dimensions();
        Self {
            pixels,
            label: label.to_string(),
            width,
            height,
        }
    }

    /// Raw RGBA8 pixel data, row-major.
    pub fn pixels(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    /// The content key or path this texture was loaded from.
    pub fn label(&self) -> &str {
        &self.label
    }
}
