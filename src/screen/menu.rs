//! A screen holding a vertical list of selectable entries.

use glam::Vec2;
use tracing::{trace, warn};
use winit::event::MouseButton;

use super::menu_entry::{MenuEntry, SelectHandler};
use super::screen::{Screen, ScreenCommands, ScreenContext, ScreenCore};
use super::transition::ScreenState;
use crate::assets::SpriteFont;
use crate::config::{MenuLayout, Platform};
use crate::draw2d::{Color, Rect, SpriteBatch};
use crate::error::ContentError;
use crate::input::{InputState, PlayerIndex};

/// Menu of options. The user moves up and down to select an entry, accepts it,
/// or cancels to back out of the screen.
///
/// # Example
///
/// ```ignore
/// let menu = MenuScreen::new("Main Menu")
///     .entry(MenuEntry::new("Play").on_selected(|player, commands| {
///         commands.push_screen(GameplayScreen::new(), Some(player));
///     }))
///     .entry(MenuEntry::new("Exit").on_selected(|_, commands| commands.quit()))
///     .on_cancel(|_, commands| commands.quit());
/// ```
pub struct MenuScreen {
    core: ScreenCore,
    entries: Vec<MenuEntry>,
    selected_entry: usize,
    title: String,
    title_color: Color,
    layout: MenuLayout,
    on_cancel: Option<SelectHandler>,
}

impl MenuScreen {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            core: ScreenCore::new(0.5, 0.5),
            entries: Vec::new(),
            selected_entry: 0,
            title: title.into(),
            title_color: Color::BLACK,
            layout: MenuLayout::default(),
            on_cancel: None,
        }
    }

    /// Append an entry; entries are laid out and navigated in insertion order.
    pub fn entry(mut self, entry: MenuEntry) -> Self {
        self.add_entry(entry);
        self
    }

    pub fn add_entry(&mut self, entry: MenuEntry) {
        self.entries.push(entry);
        self.ensure_enabled_selection();
    }

    pub fn title_color(mut self, color: Color) -> Self {
        self.title_color = color;
        self
    }

    pub fn layout(mut self, layout: MenuLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Replace the default cancel behavior (exiting the screen).
    pub fn on_cancel<F>(mut self, handler: F) -> Self
    where
        F: FnMut(PlayerIndex, &mut ScreenCommands) + 'static,
    {
        self.on_cancel = Some(Box::new(handler));
        self
    }

    /// Show over other screens without covering them.
    pub fn popup(mut self) -> Self {
        self.core.is_popup = true;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    /// Entries may be renamed or toggled; the selection is repaired on the next update.
    pub fn entries_mut(&mut self) -> &mut [MenuEntry] {
        &mut self.entries
    }

    pub fn selected_entry(&self) -> usize {
        self.selected_entry
    }

    /// Move to the previous enabled entry, wrapping from the top to the bottom.
    pub fn select_previous(&mut self) {
        let len = self.entries.len();
        for step in 1..=len {
            let index = (self.selected_entry + len - step) % len;
            if self.entries[index].is_enabled() {
                self.set_selection(index);
                return;
            }
        }
        self.warn_nothing_enabled();
    }

    /// Move to the next enabled entry, wrapping from the bottom to the top.
    pub fn select_next(&mut self) {
        let len = self.entries.len();
        for step in 1..=len {
            let index = (self.selected_entry + step) % len;
            if self.entries[index].is_enabled() {
                self.set_selection(index);
                return;
            }
        }
        self.warn_nothing_enabled();
    }

    /// Fire the chosen entry's callback. Disabled entries ignore the request.
    pub fn select_entry(
        &mut self,
        index: usize,
        player: PlayerIndex,
        commands: &mut ScreenCommands,
    ) {
        if let Some(entry) = self.entries.get_mut(index) {
            if !entry.is_enabled() {
                trace!(index, text = entry.text(), "ignoring selection of disabled entry");
                return;
            }
            trace!(index, text = entry.text(), ?player, "menu entry selected");
            entry.select(player, commands);
        }
    }

    /// Back out of the menu: the cancel handler if one is set, otherwise exit.
    pub fn cancel(&mut self, player: PlayerIndex, commands: &mut ScreenCommands) {
        match self.on_cancel.as_mut() {
            Some(handler) => handler(player, commands),
            None => self.core.exit(),
        }
    }

    /// Index of the enabled entry whose measured text bounds contain `point`.
    pub fn hit_test(&self, point: Vec2, font: &dyn SpriteFont) -> Option<usize> {
        let point = point + Vec2::new(0.0, self.layout.hit_offset_y);
        self.entries.iter().position(|entry| {
            let bounds = Rect::from_position_size(
                entry.position.trunc(),
                font.measure_string(entry.text()),
            );
            entry.is_enabled() && bounds.contains(point)
        })
    }

    /// Stack the entries vertically, centered horizontally, sliding them in from
    /// the left while transitioning on and out to the right otherwise.
    pub fn update_entry_locations(&mut self, ctx: &ScreenContext) {
        let offset = self.slide_offset();
        let sliding_on = self.core.state() == ScreenState::TransitionOn;

        let mut position = Vec2::new(0.0, self.layout.entries_top);
        for entry in &mut self.entries {
            position.x = ctx.base_screen_size.x / 2.0 - entry.width(ctx.font) / 2.0;

            if sliding_on {
                position.x -= offset * self.layout.slide_in_distance;
            } else {
                position.x += offset * self.layout.slide_out_distance;
            }

            entry.position = position;
            position.y += entry.height(ctx.font);
        }
    }

    /// Center of the title, rising as the menu transitions away.
    pub fn title_position(&self, ctx: &ScreenContext) -> Vec2 {
        Vec2::new(
            ctx.base_screen_size.x / 2.0,
            self.layout.title_y - self.slide_offset() * self.layout.title_slide_distance,
        )
    }

    fn slide_offset(&self) -> f32 {
        self.layout
            .slide_easing
            .apply(self.core.transition_position())
    }

    fn set_selection(&mut self, index: usize) {
        if index != self.selected_entry {
            trace!(from = self.selected_entry, to = index, "menu selection moved");
        }
        self.selected_entry = index;
    }

    /// Make sure the selection points at an enabled entry, searching forward.
    fn ensure_enabled_selection(&mut self) {
        let len = self.entries.len();
        if len == 0 {
            self.selected_entry = 0;
            return;
        }
        if self.selected_entry >= len {
            self.selected_entry = 0;
        }

        for step in 0..len {
            let index = (self.selected_entry + step) % len;
            if self.entries[index].is_enabled() {
                self.set_selection(index);
                return;
            }
        }
    }

    fn warn_nothing_enabled(&self) {
        if !self.entries.is_empty() {
            warn!(title = %self.title, "menu has no enabled entries to select");
        }
    }

    fn pointer_pressed(
        &mut self,
        point: Vec2,
        font: &dyn SpriteFont,
        commands: &mut ScreenCommands,
    ) {
        if let Some(index) = self.hit_test(point, font) {
            self.set_selection(index);
            let player = self.core.controlling_player().unwrap_or(PlayerIndex::One);
            self.select_entry(index, player, commands);
        }
    }
}

impl Screen for MenuScreen {
    fn core(&self) -> &ScreenCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ScreenCore {
        &mut self.core
    }

    fn load_content(&mut self, _ctx: &ScreenContext) -> Result<(), ContentError> {
        self.ensure_enabled_selection();
        Ok(())
    }

    fn handle_input(
        &mut self,
        ctx: &ScreenContext,
        input: &InputState,
        commands: &mut ScreenCommands,
    ) {
        let controlling_player = self.core.controlling_player();

        match ctx.platform {
            Platform::Mobile => {
                if input.any_touch_pressed() {
                    self.pointer_pressed(input.cursor_location(), ctx.font, commands);
                }
            }
            Platform::Desktop => {
                if input.mouse_pressed(MouseButton::Left) {
                    self.pointer_pressed(input.cursor_location(), ctx.font, commands);
                } else if input.mouse_pressed(MouseButton::Middle) {
                    self.select_entry(self.selected_entry, PlayerIndex::One, commands);
                }
            }
        }

        if input.is_menu_up(controlling_player) {
            self.select_previous();
        }

        if input.is_menu_down(controlling_player) {
            self.select_next();
        }

        // Report whichever player actually pressed, which matters when
        // `controlling_player` is `None` and anyone may drive the menu.
        if let Some(player) = input.is_menu_select(controlling_player) {
            self.select_entry(self.selected_entry, player, commands);
        } else if let Some(player) = input.is_menu_cancel(controlling_player) {
            self.cancel(player, commands);
        }
    }

    fn update(
        &mut self,
        ctx: &ScreenContext,
        other_screen_has_focus: bool,
        covered_by_other_screen: bool,
    ) {
        self.core
            .update(ctx.dt, other_screen_has_focus, covered_by_other_screen);

        self.ensure_enabled_selection();

        let is_active = self.core.is_active();
        for (i, entry) in self.entries.iter_mut().enumerate() {
            entry.update(is_active && i == self.selected_entry, ctx.dt);
        }
    }

    fn draw(&mut self, ctx: &ScreenContext, batch: &mut dyn SpriteBatch) {
        // Entries move with the transition, so lay them out every frame
        self.update_entry_locations(ctx);

        let alpha = self.core.transition_alpha();
        let is_active = self.core.is_active();

        batch.begin(ctx.global_transform);

        for (i, entry) in self.entries.iter().enumerate() {
            entry.draw(ctx, alpha, is_active && i == self.selected_entry, batch);
        }

        let title_origin = ctx.font.measure_string(&self.title) / 2.0;
        batch.draw_string(
            &self.title,
            self.title_position(ctx),
            self.title_color * alpha,
            title_origin,
            self.layout.title_scale,
        );

        batch.end();
    }
}
