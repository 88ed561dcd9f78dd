mod dry_listener;
mod listener;
mod modifier_state;
mod r#trait;

pub use self::modifier_state::ModifierState;
pub use self::r#trait::{create_hotkey_listener, HotkeyListenerTrait};
