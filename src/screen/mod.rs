//! Screen management.
//!
//! A game is a stack of [`Screen`]s owned by a [`ScreenManager`]. Only the
//! topmost visible screen receives input; screens underneath keep updating and
//! transition off when something opaque covers them.
//!
//! # Overview
//!
//! Each screen carries a [`ScreenCore`] with:
//! - Its transition timing and current [`ScreenState`]
//! - Whether it is a popup (popups do not cover what is beneath them)
//! - The player controlling it, if any
//!
//! Screens talk back to the manager through [`ScreenCommands`]: push another
//! screen, exit themselves, or quit the game.
//!
//! # Example
//!
//! ```ignore
//! use phalanx::*;
//!
//! let main_menu = MenuScreen::new("Main Menu")
//!     .entry(MenuEntry::new("Play").on_selected(|player, commands| {
//!         commands.push_screen(GameplayScreen::new(), Some(player));
//!     }))
//!     .entry(MenuEntry::new("Exit").on_selected(|_, commands| commands.quit()));
//!
//! let mut screens = ScreenManager::new(ScreenManagerConfig::default(), font);
//! screens.add_screen(BackgroundScreen::new(), None)?;
//! screens.add_screen(main_menu, None)?;
//! ```

mod background;
mod manager;
mod menu;
mod menu_entry;
pub mod screen;
mod transition;

pub use background::BackgroundScreen;
pub use manager::ScreenManager;
pub use menu::MenuScreen;
pub use menu_entry::{MenuEntry, SelectHandler};
pub use screen::{Screen, ScreenCommand, ScreenCommands, ScreenContext, ScreenCore};
pub use transition::{Easing, ScreenState, TransitionTimer};
