use std::ops::Mul;

use glam::{Mat4, Vec2};

use crate::texture::Texture;

/// A rectangle in base-screen pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle anchored at `position` with the given size.
    pub fn from_position_size(position: Vec2, size: Vec2) -> Self {
        Self::new(position.x, position.y, size.x, size.y)
    }

    /// Half-open containment test: the left/top edges are inside, the right/bottom are not.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }
}

/// RGBA color with premultiplied alpha.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);
    pub const YELLOW: Color = Color::rgba(1.0, 1.0, 0.0, 1.0);
    pub const GRAY: Color = Color::rgba(0.5, 0.5, 0.5, 1.0);
}

/// Scales every channel, which fades a premultiplied color towards transparent.
impl Mul<f32> for Color {
    type Output = Color;

    fn mul(self, rhs: f32) -> Color {
        Color::rgba(self.r * rhs, self.g * rhs, self.b * rhs, self.a * rhs)
    }
}

/// Immediate-mode 2D drawing surface supplied by the host renderer.
///
/// Screens open a batch with the manager's global transform, queue sprites and
/// text in base-screen coordinates, and close it again. The renderer owns the
/// GPU side: uploading [`Texture`] pixels and rasterizing the shared font.
pub trait SpriteBatch {
    /// Start a batch; all following positions are transformed by `transform`.
    fn begin(&mut self, transform: Mat4);

    /// Draw a texture stretched over `dest`, modulated by `tint`.
    fn draw_texture(&mut self, texture: &Texture, dest: Rect, tint: Color);

    /// Draw a string with the shared font.
    ///
    /// `origin` is subtracted from `position` before scaling, so an origin of half the
    /// measured size centers the text on `position`.
    fn draw_string(&mut self, text: &str, position: Vec2, color: Color, origin: Vec2, scale: f32);

    /// Flush the batch.
    fn end(&mut self);
}
