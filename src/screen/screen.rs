//! The screen trait, its shared transition state, and the per-frame context.

use std::path::Path;

use glam::{Mat4, Vec2};

use super::transition::{Direction, ScreenState, TransitionTimer};
use crate::assets::SpriteFont;
use crate::config::Platform;
use crate::draw2d::SpriteBatch;
use crate::error::ContentError;
use crate::input::{InputState, PlayerIndex};

/// Shared data the [`ScreenManager`](super::ScreenManager) hands to every screen hook.
pub struct ScreenContext<'a> {
    /// Font used for all menu text.
    pub font: &'a dyn SpriteFont,
    /// Size of the virtual canvas screens lay themselves out in.
    pub base_screen_size: Vec2,
    /// Base-screen to window transform; pass to [`SpriteBatch::begin`].
    pub global_transform: Mat4,
    pub platform: Platform,
    /// Directory content keys are resolved against.
    pub content_root: &'a Path,
    /// Seconds since the previous frame.
    pub dt: f32,
    /// Seconds since the manager started.
    pub total_time: f32,
}

/// A request from a screen to the manager, applied after the frame's updates.
pub enum ScreenCommand {
    /// Put a new screen on top of the stack.
    Push {
        screen: Box<dyn Screen>,
        controlling_player: Option<PlayerIndex>,
    },
    /// Transition off and remove the screen that issued the command.
    ExitSelf,
    /// Ask the host to shut the game down.
    Quit,
}

/// Queue of [`ScreenCommand`]s collected while a screen handles input.
#[derive(Default)]
pub struct ScreenCommands {
    queue: Vec<ScreenCommand>,
}

impl ScreenCommands {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_screen(
        &mut self,
        screen: impl Screen + 'static,
        controlling_player: Option<PlayerIndex>,
    ) {
        self.queue.push(ScreenCommand::Push {
            screen: Box::new(screen),
            controlling_player,
        });
    }

    pub fn exit_screen(&mut self) {
        self.queue.push(ScreenCommand::ExitSelf);
    }

    pub fn quit(&mut self) {
        self.queue.push(ScreenCommand::Quit);
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub(crate) fn drain(&mut self) -> std::vec::Drain<'_, ScreenCommand> {
        self.queue.drain(..)
    }
}

/// Lifecycle and transition state shared by every screen.
#[derive(Clone, Debug)]
pub struct ScreenCore {
    pub timer: TransitionTimer,
    /// Popups sit over other screens without covering them.
    pub is_popup: bool,
    controlling_player: Option<PlayerIndex>,
    other_screen_has_focus: bool,
    is_exiting: bool,
    finished: bool,
}

impl ScreenCore {
    pub fn new(on_time: f32, off_time: f32) -> Self {
        Self {
            timer: TransitionTimer::new(on_time, off_time),
            is_popup: false,
            controlling_player: None,
            other_screen_has_focus: false,
            is_exiting: false,
            finished: false,
        }
    }

    pub fn state(&self) -> ScreenState {
        self.timer.state()
    }

    pub fn transition_position(&self) -> f32 {
        self.timer.position()
    }

    pub fn transition_alpha(&self) -> f32 {
        self.timer.alpha()
    }

    /// The player allowed to drive this screen, or `None` for anyone.
    pub fn controlling_player(&self) -> Option<PlayerIndex> {
        self.controlling_player
    }

    pub(crate) fn set_controlling_player(&mut self, player: Option<PlayerIndex>) {
        self.controlling_player = player;
    }

    /// True when this screen is on top, visible, and the window has focus.
    pub fn is_active(&self) -> bool {
        !self.other_screen_has_focus
            && matches!(self.state(), ScreenState::TransitionOn | ScreenState::Active)
    }

    pub fn is_exiting(&self) -> bool {
        self.is_exiting
    }

    /// True once an exiting screen has fully transitioned off.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Start transitioning off; the manager removes the screen when done.
    pub fn exit(&mut self) {
        self.is_exiting = true;
    }

    pub(crate) fn reset_exit(&mut self) {
        self.is_exiting = false;
        self.finished = false;
    }

    /// Advance the transition for this frame.
    pub fn update(&mut self, dt: f32, other_screen_has_focus: bool, covered_by_other_screen: bool) {
        self.other_screen_has_focus = other_screen_has_focus;

        if self.is_exiting {
            self.timer.set_state(ScreenState::TransitionOff);
            if !self.timer.step(dt, Direction::Off) {
                self.finished = true;
            }
        } else if covered_by_other_screen {
            let state = if self.timer.step(dt, Direction::Off) {
                ScreenState::TransitionOff
            } else {
                ScreenState::Hidden
            };
            self.timer.set_state(state);
        } else {
            let state = if self.timer.step(dt, Direction::On) {
                ScreenState::TransitionOn
            } else {
                ScreenState::Active
            };
            self.timer.set_state(state);
        }
    }
}

/// A unit of UI or gameplay living on the manager's stack.
///
/// The manager calls `handle_input`, then `update`, then `draw` once per frame.
pub trait Screen {
    fn core(&self) -> &ScreenCore;

    fn core_mut(&mut self) -> &mut ScreenCore;

    /// Name used in log output.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Load content; called when the screen is added to the manager.
    fn load_content(&mut self, _ctx: &ScreenContext) -> Result<(), ContentError> {
        Ok(())
    }

    /// Release content; called when the screen is removed.
    fn unload_content(&mut self) {}

    /// Respond to input. Only the focused screen receives it.
    fn handle_input(
        &mut self,
        _ctx: &ScreenContext,
        _input: &InputState,
        _commands: &mut ScreenCommands,
    ) {
    }

    /// Per-frame logic. The default advances the transition.
    fn update(
        &mut self,
        ctx: &ScreenContext,
        other_screen_has_focus: bool,
        covered_by_other_screen: bool,
    ) {
        self.core_mut()
            .update(ctx.dt, other_screen_has_focus, covered_by_other_screen);
    }

    fn draw(&mut self, ctx: &ScreenContext, batch: &mut dyn SpriteBatch);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_on_then_becomes_active() {
        let mut core = ScreenCore::new(0.5, 0.5);

        core.update(0.25, false, false);
        assert_eq!(core.state(), ScreenState::TransitionOn);
        assert!(core.is_active());

        core.update(0.25, false, false);
        assert_eq!(core.state(), ScreenState::Active);
        assert_eq!(core.transition_alpha(), 1.0);
    }

    #[test]
    fn covered_screen_hides() {
        let mut core = ScreenCore::new(0.0, 0.5);
        core.update(0.1, false, false);
        assert_eq!(core.state(), ScreenState::Active);

        core.update(0.25, true, true);
        assert_eq!(core.state(), ScreenState::TransitionOff);
        assert!(!core.is_active());

        core.update(0.25, true, true);
        assert_eq!(core.state(), ScreenState::Hidden);
        assert!(!core.is_finished());
    }

    #[test]
    fn exiting_screen_finishes_after_off_time() {
        let mut core = ScreenCore::new(0.0, 0.5);
        core.update(0.1, false, false);

        core.exit();
        core.update(0.3, false, false);
        assert_eq!(core.state(), ScreenState::TransitionOff);
        assert!(!core.is_finished());

        core.update(0.3, false, false);
        assert!(core.is_finished());
    }

    #[test]
    fn focus_elsewhere_deactivates() {
        let mut core = ScreenCore::new(0.0, 0.0);
        core.update(0.1, true, false);
        assert_eq!(core.state(), ScreenState::Active);
        assert!(!core.is_active());
    }

    #[test]
    fn commands_queue_in_order() {
        let mut commands = ScreenCommands::new();
        commands.exit_screen();
        commands.quit();
        assert_eq!(commands.len(), 2);

        let drained: Vec<_> = commands.drain().collect();
        assert!(matches!(drained[0], ScreenCommand::ExitSelf));
        assert!(matches!(drained[1], ScreenCommand::Quit));
        assert!(commands.is_empty());
    }
}
