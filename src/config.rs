use std::path::PathBuf;

use glam::Vec2;

use crate::screen::Easing;

/// Which kind of pointer input menus respond to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Platform {
    /// Mouse: left click picks an entry, middle click accepts the current one.
    Desktop,
    /// Touch: a new touch picks an entry.
    Mobile,
}

impl Platform {
    /// The platform the crate was compiled for.
    pub fn current() -> Self {
        if cfg!(any(target_os = "android", target_os = "ios")) {
            Platform::Mobile
        } else {
            Platform::Desktop
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::current()
    }
}

/// Configuration for a [`ScreenManager`](crate::ScreenManager).
#[derive(Clone, Debug)]
pub struct ScreenManagerConfig {
    /// Virtual canvas size; screens lay out in these coordinates and the
    /// manager letterboxes it into the window.
    pub base_screen_size: Vec2,
    pub platform: Platform,
    /// Directory content keys are resolved against.
    pub content_root: PathBuf,
}

impl Default for ScreenManagerConfig {
    fn default() -> Self {
        Self {
            base_screen_size: Vec2::new(800.0, 480.0),
            platform: Platform::current(),
            content_root: PathBuf::from("Content"),
        }
    }
}

impl ScreenManagerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_screen_size(mut self, width: f32, height: f32) -> Self {
        self.base_screen_size = Vec2::new(width, height);
        self
    }

    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn content_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.content_root = root.into();
        self
    }
}

/// Placement and animation constants for [`MenuScreen`](crate::MenuScreen).
#[derive(Clone, Debug)]
pub struct MenuLayout {
    /// Y of the first entry.
    pub entries_top: f32,
    /// Y of the title's center when fully on screen.
    pub title_y: f32,
    pub title_scale: f32,
    /// How far entries slide in from the left while transitioning on.
    pub slide_in_distance: f32,
    /// How far entries slide out to the right while transitioning off.
    pub slide_out_distance: f32,
    /// How far the title rises while transitioning.
    pub title_slide_distance: f32,
    /// Added to the pointer's Y before hit-testing entries; measured text
    /// bounds sit slightly above where the glyphs are drawn.
    ///
    /// Applied once, not accumulated per entry: every row's hit box shifts by
    /// the same amount however far down the list it is.
    pub hit_offset_y: f32,
    /// Curve applied to the transition position before scaling the slides.
    pub slide_easing: Easing,
}

impl Default for MenuLayout {
    fn default() -> Self {
        Self {
            entries_top: 175.0,
            title_y: 80.0,
            title_scale: 1.25,
            slide_in_distance: 256.0,
            slide_out_distance: 512.0,
            title_slide_distance: 100.0,
            hit_offset_y: 5.0,
            slide_easing: Easing::EaseIn,
        }
    }
}
