//! # Phalanx
//!
//! **Screen stack, menus and transitions for 2D game starter kits.**
//!
//! Phalanx owns the part of a game that sits between the window and the
//! gameplay: a stack of screens that fade and slide on and off, a menu screen
//! driven by keyboard, mouse, gamepad or touch, and a full-screen background.
//! Rendering is left to the host through the [`SpriteBatch`] and [`SpriteFont`] traits.
//!
//! ## Quick Start
//!
//! ```ignore
//! use phalanx::*;
//!
//! let mut content = ContentManager::new("Content");
//! let font = content.load_font("Fonts/Hud", 24.0)?;
//!
//! let mut screens = ScreenManager::new(ScreenManagerConfig::default(), font);
//! screens.add_screen(BackgroundScreen::new(), None)?;
//! screens.add_screen(
//!     MenuScreen::new("Main Menu")
//!         .entry(MenuEntry::new("Play"))
//!         .entry(MenuEntry::new("Exit").on_selected(|_, commands| commands.quit())),
//!     None,
//! )?;
//!
//! // every frame
//! screens.update(dt)?;
//! screens.draw(&mut sprite_batch);
//! if screens.is_quit_requested() {
//!     return Ok(());
//! }
//! ```
//!
//! ## Philosophy
//!
//! - **Screens own their transitions.** Position runs from 1 (off) to 0 (on) and back.
//! - **Commands, not back-pointers.** Screens queue [`ScreenCommand`]s; the manager applies them.
//! - **Bring your own renderer.** Anything that can draw a texture and a string will do.

mod assets;
mod config;
mod content;
mod draw2d;
mod error;
mod input;
pub mod screen;
#[cfg(test)]
mod testing;
mod texture;

pub use assets::{FontAtlas, GlyphInfo, SpriteFont};
pub use config::{MenuLayout, Platform, ScreenManagerConfig};
pub use content::ContentManager;
pub use draw2d::{Color, Rect, SpriteBatch};
pub use error::ContentError;
pub use input::{GamepadButton, InputState, PlayerIndex, TouchLocation, TouchState};
pub use screen::{
    BackgroundScreen, Easing, MenuEntry, MenuScreen, Screen, ScreenCommand, ScreenCommands,
    ScreenContext, ScreenCore, ScreenManager, ScreenState, SelectHandler, TransitionTimer,
};
pub use texture::Texture;

// Re-export glam math types for convenience
pub use glam::{Mat4, Vec2};

// Re-export commonly used winit types for convenience
pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;
