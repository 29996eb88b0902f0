//! Full-screen backdrop that sits behind the menus.

use std::sync::Arc;

use tracing::debug;

use super::screen::{Screen, ScreenContext, ScreenCore};
use crate::content::ContentManager;
use crate::draw2d::{Color, Rect, SpriteBatch};
use crate::error::ContentError;
use crate::texture::Texture;

const DEFAULT_BACKGROUND: &str = "Backgrounds/Layer0_2";

/// Draws a background image that stays fixed in place whatever the screens
/// on top of it are doing.
///
/// The texture is large, so the screen loads it through its own
/// [`ContentManager`] and releases it when removed, rather than keeping it in
/// shared content for the rest of the game.
pub struct BackgroundScreen {
    core: ScreenCore,
    key: String,
    content: Option<ContentManager>,
    texture: Option<Arc<Texture>>,
}

impl Default for BackgroundScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl BackgroundScreen {
    pub fn new() -> Self {
        Self::with_texture(DEFAULT_BACKGROUND)
    }

    /// Use a different background content key.
    pub fn with_texture(key: impl Into<String>) -> Self {
        Self {
            core: ScreenCore::new(0.5, 0.5),
            key: key.into(),
            content: None,
            texture: None,
        }
    }

    pub fn texture(&self) -> Option<&Arc<Texture>> {
        self.texture.as_ref()
    }
}

impl Screen for BackgroundScreen {
    fn core(&self) -> &ScreenCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ScreenCore {
        &mut self.core
    }

    fn load_content(&mut self, ctx: &ScreenContext) -> Result<(), ContentError> {
        let content = self
            .content
            .get_or_insert_with(|| ContentManager::new(ctx.content_root));
        self.texture = Some(content.load_texture(&self.key)?);
        Ok(())
    }

    fn unload_content(&mut self) {
        self.texture = None;
        if let Some(content) = self.content.as_mut() {
            debug!(key = %self.key, "releasing background");
            content.unload();
        }
    }

    /// Never transitions off when covered: it is meant to be covered.
    fn update(
        &mut self,
        ctx: &ScreenContext,
        other_screen_has_focus: bool,
        _covered_by_other_screen: bool,
    ) {
        self.core.update(ctx.dt, other_screen_has_focus, false);
    }

    fn draw(&mut self, ctx: &ScreenContext, batch: &mut dyn SpriteBatch) {
        let Some(texture) = &self.texture else {
            return;
        };

        let fullscreen = Rect::new(
            0.0,
            0.0,
            ctx.base_screen_size.x.trunc(),
            ctx.base_screen_size.y.trunc(),
        );
        let alpha = self.core.transition_alpha();

        batch.begin(ctx.global_transform);
        batch.draw_texture(texture, fullscreen, Color::rgb(alpha, alpha, alpha));
        batch.end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Platform;
    use crate::screen::ScreenState;
    use crate::testing::{DrawCall, FixedFont, RecordingBatch, content_dir_with_png};
    use glam::{Mat4, Vec2};
    use std::path::Path;

    fn ctx<'a>(font: &'a FixedFont, root: &'a Path, dt: f32) -> ScreenContext<'a> {
        ScreenContext {
            font,
            base_screen_size: Vec2::new(800.0, 480.0),
            global_transform: Mat4::IDENTITY,
            platform: Platform::Desktop,
            content_root: root,
            dt,
            total_time: 0.0,
        }
    }

    #[test]
    fn ignores_being_covered() {
        let font = FixedFont::default();
        let mut screen = BackgroundScreen::new();
        let c = ctx(&font, Path::new("Content"), 0.25);

        for _ in 0..4 {
            screen.update(&c, true, true);
        }
        assert_eq!(screen.core().state(), ScreenState::Active);
        assert_eq!(screen.core().transition_alpha(), 1.0);
    }

    #[test]
    fn still_exits_when_asked() {
        let font = FixedFont::default();
        let mut screen = BackgroundScreen::new();
        let c = ctx(&font, Path::new("Content"), 0.5);
        screen.update(&c, false, true);

        screen.core_mut().exit();
        screen.update(&c, false, true);
        assert!(screen.core().is_finished());
    }

    #[test]
    fn draws_fullscreen_tinted_by_alpha() {
        let root = content_dir_with_png("background-draw", DEFAULT_BACKGROUND, 8, 8);
        let font = FixedFont::default();
        let mut screen = BackgroundScreen::new();

        let c = ctx(&font, &root, 0.25);
        screen.load_content(&c).unwrap();
        screen.update(&c, false, false); // halfway on

        let mut batch = RecordingBatch::default();
        screen.draw(&c, &mut batch);

        assert_eq!(
            batch.calls,
            vec![
                DrawCall::Begin(Mat4::IDENTITY),
                DrawCall::Texture {
                    label: DEFAULT_BACKGROUND.to_string(),
                    dest: Rect::new(0.0, 0.0, 800.0, 480.0),
                    tint: Color::rgb(0.5, 0.5, 0.5),
                },
                DrawCall::End,
            ]
        );
    }

    #[test]
    fn unload_releases_texture() {
        let root = content_dir_with_png("background-unload", DEFAULT_BACKGROUND, 2, 2);
        let font = FixedFont::default();
        let mut screen = BackgroundScreen::new();
        let c = ctx(&font, &root, 0.016);

        screen.load_content(&c).unwrap();
        assert!(screen.texture().is_some());

        screen.unload_content();
        assert!(screen.texture().is_none());

        let mut batch = RecordingBatch::default();
        screen.draw(&c, &mut batch);
        assert!(batch.calls.is_empty());
    }

    #[test]
    fn missing_background_propagates() {
        let font = FixedFont::default();
        let root = std::env::temp_dir().join("phalanx-no-such-content");
        let mut screen = BackgroundScreen::new();

        let err = screen.load_content(&ctx(&font, &root, 0.016)).unwrap_err();
        assert!(matches!(err, ContentError::NotFound { .. }));
    }
}
