//! Test doubles shared by the unit tests.

use std::path::PathBuf;

use glam::{Mat4, Vec2};

use crate::assets::SpriteFont;
use crate::draw2d::{Color, Rect, SpriteBatch};
use crate::texture::Texture;

/// Monospace font: every character is `char_width` wide, lines are `line_height` tall.
pub(crate) struct FixedFont {
    pub char_width: f32,
    pub line_height: f32,
}

impl Default for FixedFont {
    fn default() -> Self {
        Self {
            char_width: 10.0,
            line_height: 20.0,
        }
    }
}

impl SpriteFont for FixedFont {
    fn measure_string(&self, text: &str) -> Vec2 {
        Vec2::new(text.chars().count() as f32 * self.char_width, self.line_height)
    }

    fn line_spacing(&self) -> f32 {
        self.line_height
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum DrawCall {
    Begin(Mat4),
    Texture {
        label: String,
        dest: Rect,
        tint: Color,
    },
    Text {
        text: String,
        position: Vec2,
        color: Color,
        origin: Vec2,
        scale: f32,
    },
    End,
}

/// Records every call so tests can inspect what a screen drew.
#[derive(Default)]
pub(crate) struct RecordingBatch {
    pub calls: Vec<DrawCall>,
}

impl RecordingBatch {
    pub fn text_calls(&self) -> Vec<&DrawCall> {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Text { .. }))
            .collect()
    }

    pub fn text_position(&self, wanted: &str) -> Option<Vec2> {
        self.calls.iter().find_map(|c| match c {
            DrawCall::Text { text, position, .. } if text == wanted => Some(*position),
            _ => None,
        })
    }
}

impl SpriteBatch for RecordingBatch {
    fn begin(&mut self, transform: Mat4) {
        self.calls.push(DrawCall::Begin(transform));
    }

    fn draw_texture(&mut self, texture: &Texture, dest: Rect, tint: Color) {
        self.calls.push(DrawCall::Texture {
            label: texture.label().to_string(),
            dest,
            tint,
        });
    }

    fn draw_string(&mut self, text: &str, position: Vec2, color: Color, origin: Vec2, scale: f32) {
        self.calls.push(DrawCall::Text {
            text: text.to_string(),
            position,
            color,
            origin,
            scale,
        });
    }

    fn end(&mut self) {
        self.calls.push(DrawCall::End);
    }
}

/// Fresh content directory under the system temp dir holding `<key>.png`.
pub(crate) fn content_dir_with_png(test: &str, key: &str, width: u32, height: u32) -> PathBuf {
    let root = std::env::temp_dir().join(format!("phalanx-{}-{}", test, std::process::id()));
    let _ = std::fs::remove_dir_all(&root);

    let path = root.join(format!("{key}.png"));
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    image::RgbaImage::from_pixel(width, height, image::Rgba([200, 100, 50, 255]))
        .save(&path)
        .unwrap();

    root
}
