pub mod charmap;
pub mod controller;
pub mod engine;
pub mod focus;
pub mod hotkey;
pub mod virtual_keyboard;

pub use controller::PasteController;
pub use engine::PasteEngine;
pub use focus::create_focus_probe;
pub use hotkey::create_hotkey_listener;
pub use virtual_keyboard::{KeySink, VirtualKeyboard};
