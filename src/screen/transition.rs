//! Transition timing and easing for screens moving on and off.

/// Easing functions for slide animations.
///
/// These control the acceleration curve of transition animations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    /// Constant speed throughout.
    Linear,
    /// Start slow, accelerate. A quadratic power curve.
    #[default]
    EaseIn,
    /// Start fast, decelerate.
    EaseOut,
    /// Start slow, speed up, then slow down.
    EaseInOut,
}

impl Easing {
    /// Apply the easing function to a linear progress value (0.0 to 1.0).
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

/// Where a screen is in its on/off lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScreenState {
    TransitionOn,
    Active,
    TransitionOff,
    Hidden,
}

/// Direction the transition position is moving in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Direction {
    /// Towards 0: fully on screen.
    On,
    /// Towards 1: fully off screen.
    Off,
}

/// Tracks transition position for one screen.
///
/// Position 0 means fully on screen, 1 means fully transitioned off. A new
/// timer starts fully off and transitioning on.
#[derive(Clone, Debug)]
pub struct TransitionTimer {
    /// Seconds taken to transition on.
    pub on_time: f32,
    /// Seconds taken to transition off.
    pub off_time: f32,
    position: f32,
    state: ScreenState,
}

impl Default for TransitionTimer {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl TransitionTimer {
    pub fn new(on_time: f32, off_time: f32) -> Self {
        Self {
            on_time,
            off_time,
            position: 1.0,
            state: ScreenState::TransitionOn,
        }
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn state(&self) -> ScreenState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: ScreenState) {
        self.state = state;
    }

    /// Opacity derived from the position: 1 when fully on, 0 when fully off.
    pub fn alpha(&self) -> f32 {
        1.0 - self.position
    }

    /// Advance the position by `dt` seconds in `direction`.
    ///
    /// Returns `true` while still moving, `false` once the end has been reached.
    /// A zero duration completes in a single step.
    pub(crate) fn step(&mut self, dt: f32, direction: Direction) -> bool {
        let duration = match direction {
            Direction::On => self.on_time,
            Direction::Off => self.off_time,
        };

        let delta = if duration <= 0.0 { 1.0 } else { dt / duration };

        match direction {
            Direction::On => {
                self.position -= delta;
                if self.position <= 0.0 {
                    self.position = 0.0;
                    return false;
                }
            }
            Direction::Off => {
                self.position += delta;
                if self.position >= 1.0 {
                    self.position = 1.0;
                    return false;
                }
            }
        }

        true
    }
}
