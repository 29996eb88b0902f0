use fontdue::{Font, FontSettings};
use glam::Vec2;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ContentError;

/// Text measurement for the font screens lay their text out with.
///
/// The same font is handed to the renderer, so measured sizes match what ends up
/// on screen.
pub trait SpriteFont {
    /// Size of `text` in pixels: total advance by one line height.
    fn measure_string(&self, text: &str) -> Vec2;

    /// Vertical distance between two lines of text.
    fn line_spacing(&self) -> f32;
}

/// Fonts loaded through a [`ContentManager`](crate::ContentManager) are shared.
impl<T: SpriteFont + ?Sized> SpriteFont for Arc<T> {
    fn measure_string(&self, text: &str) -> Vec2 {
        (**self).measure_string(text)
    }

    fn line_spacing(&self) -> f32 {
        (**self).line_spacing()
    }
}

/// Information about a single glyph in the font atlas.
#[derive(Clone, Copy, Debug)]
pub struct GlyphInfo {
    /// Position in the atlas bitmap (x, y) in pixels.
    pub atlas_x: u32,
    pub atlas_y: u32,
    /// Size of the glyph in pixels.
    pub width: u32,
    pub height: u32,
    /// Offset from the cursor position to where the glyph should be drawn.
    pub offset_x: f32,
    pub offset_y: f32,
    /// How far to advance the cursor after this glyph.
    pub advance: f32,
}

/// A font rasterized into a single-channel coverage atlas.
///
/// The atlas bitmap is what the renderer uploads; the glyph table drives both
/// drawing and [`SpriteFont`] measurement.
pub struct FontAtlas {
    glyphs: HashMap<char, GlyphInfo>,
    atlas: Vec<u8>,
    atlas_width: u32,
    atlas_height: u32,
    size: f32,
    line_height: f32,
}

impl FontAtlas {
    /// Rasterize printable ASCII from TTF/OTF data at the given pixel size.
    pub fn from_bytes(font_data: &[u8], size: f32) -> Result<Self, ContentError> {
        let font = Font::from_bytes(font_data, FontSettings::default()).map_err(|reason| {
            ContentError::Font {
                key: "<memory>".to_string(),
                reason: reason.to_string(),
            }
        })?;

        let chars: Vec<char> = (32u8..=126u8).map(|c| c as char).collect();

        let rasterized: Vec<(char, fontdue::Metrics, Vec<u8>)> = chars
            .iter()
            .map(|&c| {
                let (metrics, bitmap) = font.rasterize(c, size);
                (c, metrics, bitmap)
            })
            .collect();

        let padding = 1u32;
        let (atlas_width, atlas_height) = atlas_dimensions(&rasterized, padding);

        let mut atlas = vec![0u8; (atlas_width * atlas_height) as usize];
        let mut glyphs = HashMap::new();

        let mut x = padding;
        let mut y = padding;
        let mut row_height = 0u32;

        for (c, metrics, bitmap) in &rasterized {
            let glyph_w = metrics.width as u32;
            let glyph_h = metrics.height as u32;

            if x + glyph_w + padding > atlas_width {
                x = padding;
                y += row_height + padding;
                row_height = 0;
            }

            for gy in 0..glyph_h {
                let src = (gy * glyph_w) as usize;
                let dst = ((y + gy) * atlas_width + x) as usize;
                atlas[dst..dst + glyph_w as usize]
                    .copy_from_slice(&bitmap[src..src + glyph_w as usize]);
            }

            glyphs.insert(
                *c,
                GlyphInfo {
                    atlas_x: x,
                    atlas_y: y,
                    width: glyph_w,
                    height: glyph_h,
                    offset_x: metrics.xmin as f32,
                    offset_y: metrics.ymin as f32,
                    advance: metrics.advance_width,
                },
            );

            x += glyph_w + padding;
            row_height = row_height.max(glyph_h);
        }

        let line_height = font
            .horizontal_line_metrics(size)
            .map(|m| m.new_line_size)
            .unwrap_or(size * 1.2);

        Ok(Self {
            glyphs,
            atlas,
            atlas_width,
            atlas_height,
            size,
            line_height,
        })
    }

    /// Get glyph info for a character.
    pub fn glyph(&self, c: char) -> Option<&GlyphInfo> {
        self.glyphs.get(&c)
    }

    /// Get the font size this atlas was created with.
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Coverage bitmap, one byte per pixel, row-major.
    pub fn atlas_pixels(&self) -> &[u8] {
        &self.atlas
    }

    pub fn atlas_size(&self) -> (u32, u32) {
        (self.atlas_width, self.atlas_height)
    }
}

impl SpriteFont for FontAtlas {
    fn measure_string(&self, text: &str) -> Vec2 {
        let width = text
            .chars()
            .map(|c| {
                self.glyphs
                    .get(&c)
                    .map(|g| g.advance)
                    .unwrap_or(self.size * 0.5) // Missing glyphs advance half an em
            })
            .sum();
        Vec2::new(width, self.line_height)
    }

    fn line_spacing(&self) -> f32 {
        self.line_height
    }
}

/// Smallest power-of-two atlas (starting at 256x256) that fits every glyph with simple
/// row packing, doubling the smaller side until it does.
fn atlas_dimensions(rasterized: &[(char, fontdue::Metrics, Vec<u8>)], padding: u32) -> (u32, u32) {
    let mut atlas_width = 256u32;
    let mut atlas_height = 256u32;

    loop {
        let mut x = padding;
        let mut y = padding;
        let mut row_height = 0u32;
        let mut fits = true;

        for (_, metrics, _) in rasterized {
            let glyph_w = metrics.width as u32;
            let glyph_h = metrics.height as u32;

            if x + glyph_w + padding > atlas_width {
                x = padding;
                y += row_height + padding;
                row_height = 0;
            }

            if y + glyph_h + padding > atlas_height {
                fits = false;
                break;
            }

            x += glyph_w + padding;
            row_height = row_height.max(glyph_h);
        }

        if fits {
            return (atlas_width, atlas_height);
        }

        if atlas_width <= atlas_height {
            atlas_width *= 2;
        } else {
            atlas_height *= 2;
        }
    }
}
