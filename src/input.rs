use std::collections::HashSet;

use glam::{Mat4, Vec2};
use winit::event::{ElementState, MouseButton, TouchPhase, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Identifies one of up to four local players.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayerIndex {
    One,
    Two,
    Three,
    Four,
}

impl PlayerIndex {
    pub const ALL: [PlayerIndex; 4] = [
        PlayerIndex::One,
        PlayerIndex::Two,
        PlayerIndex::Three,
        PlayerIndex::Four,
    ];

    fn slot(self) -> usize {
        self as usize
    }
}

/// Gamepad buttons the menu queries care about.
///
/// Gamepads are polled by the host and fed in through
/// [`InputState::set_gamepad_button`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GamepadButton {
    A,
    B,
    Back,
    Start,
    DPadUp,
    DPadDown,
    LeftThumbstickUp,
    LeftThumbstickDown,
}

/// Lifecycle of a touch point within a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchState {
    /// The finger went down this frame.
    Pressed,
    /// The finger is down and was already down last frame.
    Moved,
    /// The finger was lifted this frame.
    Released,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchLocation {
    pub id: u64,
    pub position: Vec2,
    pub state: TouchState,
}

#[derive(Default)]
struct GamepadState {
    down: HashSet<GamepadButton>,
    pressed: HashSet<GamepadButton>,
}

/// Snapshot of keyboard, mouse, touch and gamepad input for one frame.
///
/// Keyboard and mouse belong to [`PlayerIndex::One`]. Queries taking a
/// `controlling_player` accept input only from that player, or from any player
/// when it is `None`; they report which player actually provided the input.
pub struct InputState {
    keys_down: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,
    keys_released: HashSet<KeyCode>,
    mouse_buttons_down: HashSet<MouseButton>,
    mouse_buttons_pressed: HashSet<MouseButton>,
    mouse_buttons_released: HashSet<MouseButton>,
    mouse_position: Vec2,
    touches: Vec<TouchLocation>,
    /// Touch ids that went down this frame, even if already lifted.
    touches_pressed: HashSet<u64>,
    gamepads: [GamepadState; 4],
    global_transform: Mat4,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            keys_down: HashSet::new(),
            keys_pressed: HashSet::new(),
            keys_released: HashSet::new(),
            mouse_buttons_down: HashSet::new(),
            mouse_buttons_pressed: HashSet::new(),
            mouse_buttons_released: HashSet::new(),
            mouse_position: Vec2::ZERO,
            touches: Vec::new(),
            touches_pressed: HashSet::new(),
            gamepads: Default::default(),
            global_transform: Mat4::IDENTITY,
        }
    }
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call once the frame has consumed its input to reset per-frame state.
    pub fn end_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.mouse_buttons_pressed.clear();
        self.mouse_buttons_released.clear();
        for pad in &mut self.gamepads {
            pad.pressed.clear();
        }
        self.touches_pressed.clear();

        self.touches.retain(|t| t.state != TouchState::Released);
        for touch in &mut self.touches {
            touch.state = TouchState::Moved;
        }
    }

    /// Process a window event and update input state.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    match event.state {
                        ElementState::Pressed => self.press_key(key),
                        ElementState::Released => self.release_key(key),
                    }
                }
            }
            WindowEvent::MouseInput { state, button, .. } => match state {
                ElementState::Pressed => self.press_mouse(*button),
                ElementState::Released => self.release_mouse(*button),
            },
            WindowEvent::CursorMoved { position, .. } => {
                self.move_cursor(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::Touch(touch) => {
                let position = Vec2::new(touch.location.x as f32, touch.location.y as f32);
                match touch.phase {
                    TouchPhase::Started => self.touch_pressed(touch.id, position),
                    TouchPhase::Moved => self.touch_moved(touch.id, position),
                    TouchPhase::Ended | TouchPhase::Cancelled => {
                        self.touch_released(touch.id, position)
                    }
                }
            }
            _ => {}
        }
    }

    pub fn press_key(&mut self, key: KeyCode) {
        if !self.keys_down.contains(&key) {
            self.keys_pressed.insert(key);
        }
        self.keys_down.insert(key);
    }

    pub fn release_key(&mut self, key: KeyCode) {
        self.keys_down.remove(&key);
        self.keys_released.insert(key);
    }

    pub fn press_mouse(&mut self, button: MouseButton) {
        if !self.mouse_buttons_down.contains(&button) {
            self.mouse_buttons_pressed.insert(button);
        }
        self.mouse_buttons_down.insert(button);
    }

    pub fn release_mouse(&mut self, button: MouseButton) {
        self.mouse_buttons_down.remove(&button);
        self.mouse_buttons_released.insert(button);
    }

    /// Move the mouse cursor, in window coordinates.
    pub fn move_cursor(&mut self, position: Vec2) {
        self.mouse_position = position;
    }

    pub fn touch_pressed(&mut self, id: u64, position: Vec2) {
        self.touches_pressed.insert(id);
        self.touches.retain(|t| t.id != id);
        self.touches.push(TouchLocation {
            id,
            position,
            state: TouchState::Pressed,
        });
    }

    pub fn touch_moved(&mut self, id: u64, position: Vec2) {
        if let Some(touch) = self.touches.iter_mut().find(|t| t.id == id) {
            touch.position = position;
        }
    }

    pub fn touch_released(&mut self, id: u64, position: Vec2) {
        if let Some(touch) = self.touches.iter_mut().find(|t| t.id == id) {
            touch.position = position;
            touch.state = TouchState::Released;
        }
    }

    /// Record the state of a gamepad button as polled by the host.
    pub fn set_gamepad_button(&mut self, player: PlayerIndex, button: GamepadButton, down: bool) {
        let pad = &mut self.gamepads[player.slot()];
        if down {
            if pad.down.insert(button) {
                pad.pressed.insert(button);
            }
        } else {
            pad.down.remove(&button);
        }
    }

    /// Set the transform from base-screen to window coordinates.
    pub fn set_global_transform(&mut self, transform: Mat4) {
        self.global_transform = transform;
    }

    /// Returns true if the key is currently held down.
    pub fn key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Returns true if the key was pressed this frame.
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Returns true if the key was released this frame.
    pub fn key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }

    /// Returns true if the mouse button is currently held down.
    pub fn mouse_down(&self, button: MouseButton) -> bool {
        self.mouse_buttons_down.contains(&button)
    }

    /// Returns true if the mouse button was pressed this frame.
    pub fn mouse_pressed(&self, button: MouseButton) -> bool {
        self.mouse_buttons_pressed.contains(&button)
    }

    /// Returns true if the mouse button was released this frame.
    pub fn mouse_released(&self, button: MouseButton) -> bool {
        self.mouse_buttons_released.contains(&button)
    }

    /// Current mouse position in window coordinates.
    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    /// Active touch points, including ones released this frame.
    pub fn touches(&self) -> &[TouchLocation] {
        &self.touches
    }

    /// Returns true if any finger went down this frame, including a tap
    /// that was lifted again before the frame ended.
    pub fn any_touch_pressed(&self) -> bool {
        !self.touches_pressed.is_empty()
    }

    /// Pointer location in base-screen coordinates.
    ///
    /// The most recent touch wins over the mouse.
    pub fn cursor_location(&self) -> Vec2 {
        let window = self
            .touches
            .last()
            .map(|t| t.position)
            .unwrap_or(self.mouse_position);

        self.global_transform
            .inverse()
            .transform_point3(window.extend(0.0))
            .truncate()
    }

    /// Was `key` pressed this frame by the controlling player?
    pub fn is_new_key_press(
        &self,
        key: KeyCode,
        controlling_player: Option<PlayerIndex>,
    ) -> Option<PlayerIndex> {
        let keyboard_player = PlayerIndex::One;
        match controlling_player {
            Some(player) if player != keyboard_player => None,
            _ => self.key_pressed(key).then_some(keyboard_player),
        }
    }

    /// Was `button` pressed this frame by the controlling player (or any player)?
    pub fn is_new_button_press(
        &self,
        button: GamepadButton,
        controlling_player: Option<PlayerIndex>,
    ) -> Option<PlayerIndex> {
        match controlling_player {
            Some(player) => self.gamepads[player.slot()]
                .pressed
                .contains(&button)
                .then_some(player),
            None => PlayerIndex::ALL
                .into_iter()
                .find(|p| self.gamepads[p.slot()].pressed.contains(&button)),
        }
    }

    fn any_new_press(
        &self,
        keys: &[KeyCode],
        buttons: &[GamepadButton],
        controlling_player: Option<PlayerIndex>,
    ) -> Option<PlayerIndex> {
        keys.iter()
            .find_map(|&k| self.is_new_key_press(k, controlling_player))
            .or_else(|| {
                buttons
                    .iter()
                    .find_map(|&b| self.is_new_button_press(b, controlling_player))
            })
    }

    /// Move to the previous menu entry?
    pub fn is_menu_up(&self, controlling_player: Option<PlayerIndex>) -> bool {
        self.any_new_press(
            &[KeyCode::ArrowUp],
            &[GamepadButton::DPadUp, GamepadButton::LeftThumbstickUp],
            controlling_player,
        )
        .is_some()
    }

    /// Move to the next menu entry?
    pub fn is_menu_down(&self, controlling_player: Option<PlayerIndex>) -> bool {
        self.any_new_press(
            &[KeyCode::ArrowDown],
            &[GamepadButton::DPadDown, GamepadButton::LeftThumbstickDown],
            controlling_player,
        )
        .is_some()
    }

    /// Accept the current menu entry? Reports the player who did.
    pub fn is_menu_select(&self, controlling_player: Option<PlayerIndex>) -> Option<PlayerIndex> {
        self.any_new_press(
            &[KeyCode::Space, KeyCode::Enter, KeyCode::NumpadEnter],
            &[GamepadButton::A, GamepadButton::Start],
            controlling_player,
        )
    }

    /// Back out of the current menu? Reports the player who did.
    pub fn is_menu_cancel(&self, controlling_player: Option<PlayerIndex>) -> Option<PlayerIndex> {
        self.any_new_press(
            &[KeyCode::Escape],
            &[GamepadButton::B, GamepadButton::Back],
            controlling_player,
        )
    }

    /// Pause the game?
    pub fn is_pause_game(&self, controlling_player: Option<PlayerIndex>) -> bool {
        self.any_new_press(
            &[KeyCode::Escape],
            &[GamepadButton::Back, GamepadButton::Start],
            controlling_player,
        )
        .is_some()
    }
}
