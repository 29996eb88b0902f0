//! Screen manager owning the stack of screens.

use glam::{Mat4, Vec2, Vec3};
use tracing::{debug, warn};
use winit::event::WindowEvent;

use super::screen::{Screen, ScreenCommand, ScreenCommands, ScreenContext};
use super::transition::ScreenState;
use crate::assets::SpriteFont;
use crate::config::ScreenManagerConfig;
use crate::draw2d::SpriteBatch;
use crate::error::ContentError;
use crate::input::{InputState, PlayerIndex};

/// Manages a stack of screens, routing input to the topmost one and
/// coordinating their transitions.
///
/// The manager is responsible for:
/// - Loading content when a screen is added and unloading it when removed
/// - Giving input to the focused (topmost visible) screen only
/// - Telling lower screens when they are covered so they transition off
/// - Applying the [`ScreenCommand`]s screens queue while handling input
///
/// # Example
///
/// ```ignore
/// let mut screens = ScreenManager::new(ScreenManagerConfig::default(), font);
/// screens.add_screen(BackgroundScreen::new(), None)?;
/// screens.add_screen(main_menu(), None)?;
///
/// // each frame
/// screens.update(dt)?;
/// screens.draw(&mut sprite_batch);
/// ```
pub struct ScreenManager {
    screens: Vec<Box<dyn Screen>>,
    input: InputState,
    font: Box<dyn SpriteFont>,
    config: ScreenManagerConfig,
    global_transform: Mat4,
    window_focused: bool,
    total_time: f32,
    quit_requested: bool,
}

impl ScreenManager {
    pub fn new(config: ScreenManagerConfig, font: impl SpriteFont + 'static) -> Self {
        Self {
            screens: Vec::new(),
            input: InputState::new(),
            font: Box::new(font),
            config,
            global_transform: Mat4::IDENTITY,
            window_focused: true,
            total_time: 0.0,
            quit_requested: false,
        }
    }

    pub fn config(&self) -> &ScreenManagerConfig {
        &self.config
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Gamepads and synthetic input are fed through here.
    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }

    /// Screen at `index`, counted from the bottom of the stack.
    pub fn screen(&self, index: usize) -> Option<&dyn Screen> {
        self.screens.get(index).map(|s| s.as_ref())
    }

    /// Base-screen to window transform, letterboxing the base size into the window.
    pub fn global_transform(&self) -> Mat4 {
        self.global_transform
    }

    /// True once a screen has asked the game to shut down.
    pub fn is_quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Load the screen's content and put it on top of the stack.
    ///
    /// The screen is not added if loading fails.
    pub fn add_screen(
        &mut self,
        screen: impl Screen + 'static,
        controlling_player: Option<PlayerIndex>,
    ) -> Result<(), ContentError> {
        self.add_boxed(Box::new(screen), controlling_player)
    }

    fn add_boxed(
        &mut self,
        mut screen: Box<dyn Screen>,
        controlling_player: Option<PlayerIndex>,
    ) -> Result<(), ContentError> {
        let core = screen.core_mut();
        core.set_controlling_player(controlling_player);
        core.reset_exit();

        let ctx = screen_context(
            self.font.as_ref(),
            &self.config,
            self.global_transform,
            0.0,
            self.total_time,
        );
        screen.load_content(&ctx)?;

        debug!(
            screen = screen.name(),
            ?controlling_player,
            depth = self.screens.len(),
            "screen added"
        );
        self.screens.push(screen);
        Ok(())
    }

    /// Remove a screen immediately, without a transition, unloading its content.
    ///
    /// Prefer [`ScreenCore::exit`](super::ScreenCore::exit) so the screen can transition off.
    pub fn remove_screen(&mut self, index: usize) -> Option<Box<dyn Screen>> {
        if index >= self.screens.len() {
            return None;
        }
        let mut screen = self.screens.remove(index);
        screen.unload_content();
        debug!(screen = screen.name(), index, "screen removed");
        Some(screen)
    }

    /// Feed a window event to the input snapshot, tracking focus and size.
    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::Focused(focused) => self.set_window_focused(*focused),
            WindowEvent::Resized(size) => self.resize(size.width as f32, size.height as f32),
            _ => self.input.handle_event(event),
        }
    }

    /// While unfocused no screen receives input.
    pub fn set_window_focused(&mut self, focused: bool) {
        self.window_focused = focused;
    }

    /// Fit the base screen into a window of the given size, preserving aspect ratio
    /// and centering it.
    ///
    /// Zero-sized windows (minimized) keep the previous transform.
    pub fn resize(&mut self, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            debug!(width, height, "ignoring empty window size");
            return;
        }

        let base = self.config.base_screen_size;
        let scale = (width / base.x).min(height / base.y);
        let offset = (Vec2::new(width, height) - base * scale) / 2.0;

        self.global_transform = Mat4::from_translation(offset.extend(0.0))
            * Mat4::from_scale(Vec3::new(scale, scale, 1.0));
        self.input.set_global_transform(self.global_transform);
    }

    /// Run one frame: input for the focused screen, then updates for every screen.
    ///
    /// Fails only if a screen pushed during the frame fails to load. The rest of
    /// the frame's commands are still applied; the first load error is returned.
    pub fn update(&mut self, dt: f32) -> Result<(), ContentError> {
        self.total_time += dt;

        let mut commands = ScreenCommands::new();
        let focused = self.update_screens(dt, &mut commands);

        let result = self.apply_commands(&mut commands, focused);

        let mut index = 0;
        while index < self.screens.len() {
            if self.screens[index].core().is_finished() {
                self.remove_screen(index);
            } else {
                index += 1;
            }
        }

        self.input.end_frame();
        result
    }

    /// Input then update, top of the stack first. Returns the index of the screen
    /// that received input.
    fn update_screens(&mut self, dt: f32, commands: &mut ScreenCommands) -> Option<usize> {
        let ctx = screen_context(
            self.font.as_ref(),
            &self.config,
            self.global_transform,
            dt,
            self.total_time,
        );

        let focused = if self.window_focused {
            self.screens.iter().rposition(|s| {
                let core = s.core();
                !core.is_exiting()
                    && matches!(core.state(), ScreenState::TransitionOn | ScreenState::Active)
            })
        } else {
            None
        };

        if let Some(index) = focused {
            self.screens[index].handle_input(&ctx, &self.input, commands);
        }

        let mut other_screen_has_focus = !self.window_focused;
        let mut covered_by_other_screen = false;

        for screen in self.screens.iter_mut().rev() {
            screen.update(&ctx, other_screen_has_focus, covered_by_other_screen);

            let core = screen.core();
            if matches!(core.state(), ScreenState::TransitionOn | ScreenState::Active) {
                other_screen_has_focus = true;
                if !core.is_popup {
                    covered_by_other_screen = true;
                }
            }
        }

        focused
    }

    fn apply_commands(
        &mut self,
        commands: &mut ScreenCommands,
        source: Option<usize>,
    ) -> Result<(), ContentError> {
        let mut first_error = None;
        for command in commands.drain() {
            match command {
                ScreenCommand::Push {
                    screen,
                    controlling_player,
                } => {
                    if let Err(err) = self.add_boxed(screen, controlling_player) {
                        warn!(error = %err, "pushed screen failed to load");
                        first_error.get_or_insert(err);
                    }
                }
                ScreenCommand::ExitSelf => {
                    if let Some(screen) = source.and_then(|i| self.screens.get_mut(i)) {
                        debug!(screen = screen.name(), "screen exiting");
                        screen.core_mut().exit();
                    }
                }
                ScreenCommand::Quit => {
                    debug!("quit requested");
                    self.quit_requested = true;
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Draw every visible screen, bottom of the stack first.
    pub fn draw(&mut self, batch: &mut dyn SpriteBatch) {
        let ctx = screen_context(
            self.font.as_ref(),
            &self.config,
            self.global_transform,
            0.0,
            self.total_time,
        );

        for screen in &mut self.screens {
            if screen.core().state() == ScreenState::Hidden {
                continue;
            }
            screen.draw(&ctx, batch);
        }
    }
}

fn screen_context<'a>(
    font: &'a dyn SpriteFont,
    config: &'a ScreenManagerConfig,
    global_transform: Mat4,
    dt: f32,
    total_time: f32,
) -> ScreenContext<'a> {
    ScreenContext {
        font,
        base_screen_size: config.base_screen_size,
        global_transform,
        platform: config.platform,
        content_root: &config.content_root,
        dt,
        total_time,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Platform;
    use crate::screen::{BackgroundScreen, MenuEntry, MenuScreen, ScreenCore};
    use crate::testing::{FixedFont, RecordingBatch};
    use std::cell::RefCell;
    use std::rc::Rc;
    use winit::keyboard::KeyCode;

    type Log = Rc<RefCell<Vec<String>>>;

    /// Screen that logs every hook call.
    struct Probe {
        core: ScreenCore,
        name: &'static str,
        log: Log,
        fail_load: bool,
        on_input: Option<Box<dyn FnMut(&mut ScreenCommands)>>,
    }

    impl Probe {
        fn new(name: &'static str, log: &Log) -> Self {
            Self {
                core: ScreenCore::new(0.0, 0.0),
                name,
                log: Rc::clone(log),
                fail_load: false,
                on_input: None,
            }
        }

        fn timed(mut self, on: f32, off: f32) -> Self {
            self.core = ScreenCore::new(on, off);
            self
        }

        fn popup(mut self) -> Self {
            self.core.is_popup = true;
            self
        }

        fn record(&self, event: String) {
            self.log.borrow_mut().push(format!("{}:{}", self.name, event));
        }
    }

    impl Screen for Probe {
        fn core(&self) -> &ScreenCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut ScreenCore {
            &mut self.core
        }

        fn load_content(&mut self, ctx: &ScreenContext) -> Result<(), ContentError> {
            if self.fail_load {
                return Err(ContentError::NotFound {
                    key: self.name.to_string(),
                    root: ctx.content_root.to_path_buf(),
                });
            }
            self.record("load".into());
            Ok(())
        }

        fn unload_content(&mut self) {
            self.record("unload".into());
        }

        fn handle_input(
            &mut self,
            _ctx: &ScreenContext,
            _input: &InputState,
            commands: &mut ScreenCommands,
        ) {
            self.record("input".into());
            if let Some(action) = self.on_input.as_mut() {
                action(commands);
            }
        }

        fn update(
            &mut self,
            ctx: &ScreenContext,
            other_screen_has_focus: bool,
            covered_by_other_screen: bool,
        ) {
            self.record(format!("update({other_screen_has_focus},{covered_by_other_screen})"));
            self.core
                .update(ctx.dt, other_screen_has_focus, covered_by_other_screen);
        }

        fn draw(&mut self, _ctx: &ScreenContext, _batch: &mut dyn SpriteBatch) {
            self.record("draw".into());
        }
    }

    fn manager() -> ScreenManager {
        ScreenManager::new(
            ScreenManagerConfig::new().platform(Platform::Desktop),
            FixedFont::default(),
        )
    }

    fn take(log: &Log) -> Vec<String> {
        std::mem::take(&mut *log.borrow_mut())
    }

    #[test]
    fn adding_a_screen_loads_it() {
        let log = Log::default();
        let mut screens = manager();
        screens
            .add_screen(Probe::new("a", &log), Some(PlayerIndex::Two))
            .unwrap();

        assert_eq!(take(&log), vec!["a:load"]);
        assert_eq!(screens.len(), 1);
        assert_eq!(
            screens.screen(0).unwrap().core().controlling_player(),
            Some(PlayerIndex::Two)
        );
    }

    #[test]
    fn failed_load_is_not_added() {
        let log = Log::default();
        let mut screens = manager();
        let mut probe = Probe::new("broken", &log);
        probe.fail_load = true;

        assert!(screens.add_screen(probe, None).is_err());
        assert!(screens.is_empty());
    }

    #[test]
    fn frame_runs_input_then_update_then_draw() {
        let log = Log::default();
        let mut screens = manager();
        screens.add_screen(Probe::new("a", &log), None).unwrap();
        take(&log);

        screens.update(0.016).unwrap();
        screens.draw(&mut RecordingBatch::default());

        assert_eq!(take(&log), vec!["a:input", "a:update(false,false)", "a:draw"]);
    }

    #[test]
    fn only_top_screen_gets_input_and_lower_screens_are_covered() {
        let log = Log::default();
        let mut screens = manager();
        screens.add_screen(Probe::new("bottom", &log), None).unwrap();
        screens.add_screen(Probe::new("top", &log), None).unwrap();
        take(&log);

        screens.update(0.016).unwrap();
        assert_eq!(
            take(&log),
            vec!["top:input", "top:update(false,false)", "bottom:update(true,true)"]
        );

        // Instant transitions: the bottom screen is hidden and no longer drawn
        screens.draw(&mut RecordingBatch::default());
        assert_eq!(take(&log), vec!["top:draw"]);
    }

    #[test]
    fn popup_does_not_cover() {
        let log = Log::default();
        let mut screens = manager();
        screens.add_screen(Probe::new("game", &log), None).unwrap();
        screens.add_screen(Probe::new("pause", &log).popup(), None).unwrap();
        take(&log);

        screens.update(0.016).unwrap();
        assert_eq!(
            take(&log),
            vec!["pause:input", "pause:update(false,false)", "game:update(true,false)"]
        );

        screens.draw(&mut RecordingBatch::default());
        assert_eq!(take(&log), vec!["game:draw", "pause:draw"]);
    }

    #[test]
    fn unfocused_window_gets_no_input() {
        let log = Log::default();
        let mut screens = manager();
        screens.add_screen(Probe::new("a", &log), None).unwrap();
        take(&log);

        screens.set_window_focused(false);
        screens.update(0.016).unwrap();
        assert_eq!(take(&log), vec!["a:update(true,false)"]);
    }

    #[test]
    fn exit_command_transitions_off_then_removes() {
        let log = Log::default();
        let mut screens = manager();
        let mut probe = Probe::new("menu", &log).timed(0.0, 0.5);
        probe.on_input = Some(Box::new(|commands: &mut ScreenCommands| commands.exit_screen()));
        screens.add_screen(probe, None).unwrap();

        screens.update(0.016).unwrap();
        assert!(screens.screen(0).unwrap().core().is_exiting());

        screens.update(0.25).unwrap();
        assert_eq!(screens.len(), 1);
        assert_eq!(screens.screen(0).unwrap().core().state(), ScreenState::TransitionOff);

        screens.update(0.25).unwrap();
        assert!(screens.is_empty());
        assert!(take(&log).contains(&"menu:unload".to_string()));
    }

    #[test]
    fn push_command_adds_screen_on_top() {
        let log = Log::default();
        let mut screens = manager();
        let inner = Rc::clone(&log);
        let mut probe = Probe::new("menu", &log);
        probe.on_input = Some(Box::new(move |commands: &mut ScreenCommands| {
            commands.push_screen(Probe::new("game", &inner), Some(PlayerIndex::One));
        }));
        screens.add_screen(probe, None).unwrap();
        take(&log);

        screens.update(0.016).unwrap();
        assert_eq!(screens.len(), 2);
        assert!(take(&log).contains(&"game:load".to_string()));
        assert_eq!(
            screens.screen(1).unwrap().core().controlling_player(),
            Some(PlayerIndex::One)
        );
    }

    #[test]
    fn menu_cancel_exits_through_manager() {
        let mut screens = manager();
        screens
            .add_screen(MenuScreen::new("Options").entry(MenuEntry::new("Back")), None)
            .unwrap();
        for _ in 0..40 {
            screens.update(0.016).unwrap();
        }

        screens.input_mut().press_key(KeyCode::Escape);
        screens.update(0.016).unwrap();
        assert!(screens.screen(0).unwrap().core().is_exiting());

        for _ in 0..40 {
            screens.update(0.016).unwrap();
        }
        assert!(screens.is_empty());
    }

    #[test]
    fn menu_entry_can_quit() {
        let mut screens = manager();
        screens
            .add_screen(
                MenuScreen::new("Main")
                    .entry(MenuEntry::new("Exit").on_selected(|_, commands| commands.quit())),
                None,
            )
            .unwrap();

        screens.input_mut().press_key(KeyCode::Enter);
        screens.update(0.016).unwrap();
        assert!(screens.is_quit_requested());

        // Input is per-frame: nothing re-fires next frame
        screens.update(0.016).unwrap();
        assert!(!screens.input().key_pressed(KeyCode::Enter));
    }

    #[test]
    fn resize_letterboxes_base_screen() {
        let mut screens = manager();
        screens.resize(1600.0, 1200.0);

        let transform = screens.global_transform();
        let top_left = transform.transform_point3(Vec3::ZERO);
        let bottom_right = transform.transform_point3(Vec3::new(800.0, 480.0, 0.0));
        assert!((top_left - Vec3::new(0.0, 120.0, 0.0)).length() < 1e-3);
        assert!((bottom_right - Vec3::new(1600.0, 1080.0, 0.0)).length() < 1e-3);

        screens.input_mut().move_cursor(Vec2::new(800.0, 600.0));
        let cursor = screens.input().cursor_location();
        assert!((cursor - Vec2::new(400.0, 240.0)).length() < 1e-3);
    }

    #[test]
    fn failed_push_still_applies_later_commands() {
        let mut screens = manager();
        screens
            .add_screen(
                MenuScreen::new("Main").entry(MenuEntry::new("Play").on_selected(|_, commands| {
                    commands.push_screen(
                        BackgroundScreen::with_texture("Backgrounds/Missing"),
                        None,
                    );
                    commands.quit();
                })),
                None,
            )
            .unwrap();

        screens.input_mut().press_key(KeyCode::Enter);
        let err = screens.update(0.016).unwrap_err();

        assert!(matches!(err, ContentError::NotFound { .. }));
        assert!(screens.is_quit_requested());
        assert_eq!(screens.len(), 1);
    }

    #[test]
    fn minimized_window_keeps_transform() {
        let mut screens = manager();
        screens.resize(1600.0, 960.0);
        let before = screens.global_transform();

        screens.resize(0.0, 0.0);
        assert_eq!(screens.global_transform(), before);

        screens.input_mut().move_cursor(Vec2::new(800.0, 480.0));
        let cursor = screens.input().cursor_location();
        assert!(cursor.is_finite());
        assert!((cursor - Vec2::new(400.0, 240.0)).length() < 1e-3);
    }

    #[test]
    fn remove_screen_unloads() {
        let log = Log::default();
        let mut screens = manager();
        screens.add_screen(Probe::new("a", &log), None).unwrap();
        take(&log);

        assert!(screens.remove_screen(0).is_some());
        assert!(screens.remove_screen(0).is_none());
        assert_eq!(take(&log), vec!["a:unload"]);
    }
}
