//! A single selectable line of text in a [`MenuScreen`](super::MenuScreen).

use glam::Vec2;

use super::screen::{ScreenCommands, ScreenContext};
use crate::assets::SpriteFont;
use crate::draw2d::{Color, SpriteBatch};
use crate::input::PlayerIndex;

/// Callback fired when an entry is chosen, with the player who chose it.
pub type SelectHandler = Box<dyn FnMut(PlayerIndex, &mut ScreenCommands)>;

/// How fast the selection highlight fades in and out, per second.
const SELECTION_FADE_SPEED: f32 = 4.0;

pub struct MenuEntry {
    text: String,
    /// Top-left anchor, recomputed by the menu every draw.
    pub position: Vec2,
    enabled: bool,
    /// 0 when unselected, easing towards 1 while selected.
    selection_fade: f32,
    on_selected: Option<SelectHandler>,
}

impl MenuEntry {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            position: Vec2::ZERO,
            enabled: true,
            selection_fade: 0.0,
            on_selected: None,
        }
    }

    /// Set the callback fired when this entry is chosen.
    pub fn on_selected<F>(mut self, handler: F) -> Self
    where
        F: FnMut(PlayerIndex, &mut ScreenCommands) + 'static,
    {
        self.on_selected = Some(Box::new(handler));
        self
    }

    /// Start disabled: drawn grayed out and skipped by navigation.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn selection_fade(&self) -> f32 {
        self.selection_fade
    }

    /// Fire the selection callback, if any.
    pub fn select(&mut self, player: PlayerIndex, commands: &mut ScreenCommands) {
        if let Some(handler) = self.on_selected.as_mut() {
            handler(player, commands);
        }
    }

    pub fn update(&mut self, is_selected: bool, dt: f32) {
        let step = dt * SELECTION_FADE_SPEED;
        self.selection_fade = if is_selected {
            (self.selection_fade + step).min(1.0)
        } else {
            (self.selection_fade - step).max(0.0)
        };
    }

    /// Draw the entry at its current position, pulsing while selected.
    pub fn draw(
        &self,
        ctx: &ScreenContext,
        transition_alpha: f32,
        is_selected: bool,
        batch: &mut dyn SpriteBatch,
    ) {
        let color = if !self.enabled {
            Color::GRAY
        } else if is_selected {
            Color::YELLOW
        } else {
            Color::WHITE
        };

        let pulsate = (ctx.total_time * 6.0).sin() + 1.0;
        let scale = 1.0 + pulsate * 0.05 * self.selection_fade;
        let origin = Vec2::new(0.0, ctx.font.line_spacing() / 2.0);

        batch.draw_string(&self.text, self.position, color * transition_alpha, origin, scale);
    }

    pub fn width(&self, font: &dyn SpriteFont) -> f32 {
        font.measure_string(&self.text).x
    }

    pub fn height(&self, font: &dyn SpriteFont) -> f32 {
        font.line_spacing()
    }
}

impl std::fmt::Debug for MenuEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuEntry")
            .field("text", &self.text)
            .field("position", &self.position)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}
