use evdev::KeyCode;

use crate::events::Modifiers;

/// Текущее состояние физически зажатых модификаторов.
///
/// Обновляется слушателем по потоку событий; движок читает его в пре-ролле,
/// чтобы не захватить отпускание клавиш самого хоткея.
#[derive(Debug, Default)]
pub struct ModifierState {
    ctrl: bool,
    alt: bool,
    shift: bool,
    super_key: bool,
}

impl ModifierState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_key(&mut self, key: KeyCode, pressed: bool) {
        if key == KeyCode::KEY_LEFTCTRL || key == KeyCode::KEY_RIGHTCTRL {
            self.ctrl = pressed;
        } else if key == KeyCode::KEY_LEFTALT || key == KeyCode::KEY_RIGHTALT {
            self.alt = pressed;
        } else if key == KeyCode::KEY_LEFTSHIFT || key == KeyCode::KEY_RIGHTSHIFT {
            self.shift = pressed;
        } else if key == KeyCode::KEY_LEFTMETA || key == KeyCode::KEY_RIGHTMETA {
            self.super_key = pressed;
        }
    }

    /// Зажат ли хоть один из ctrl/alt/shift/super
    pub fn any_held(&self) -> bool {
        self.ctrl || self.alt || self.shift || self.super_key
    }

    pub fn to_modifiers(&self) -> Modifiers {
        Modifiers {
            ctrl: self.ctrl,
            alt: self.alt,
            shift: self.shift,
            super_key: self.super_key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_tracking() {
        let mut state = ModifierState::new();
        assert!(!state.any_held());

        state.update_key(KeyCode::KEY_LEFTCTRL, true);
        state.update_key(KeyCode::KEY_RIGHTSHIFT, true);
        assert!(state.any_held());

        let modifiers = state.to_modifiers();
        assert!(modifiers.ctrl);
        assert!(modifiers.shift);
        assert!(!modifiers.alt);
        assert!(!modifiers.super_key);

        state.update_key(KeyCode::KEY_LEFTCTRL, false);
        state.update_key(KeyCode::KEY_RIGHTSHIFT, false);
        assert!(!state.any_held());
    }

    #[test]
    fn test_non_modifier_keys_are_ignored() {
        let mut state = ModifierState::new();
        state.update_key(KeyCode::KEY_A, true);
        assert!(!state.any_held());
    }
}
