use serde::{Deserialize, Serialize};
use std::fmt;

use crate::services::charmap;

/// Состояние клавиши
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyState {
    Pressed,
    Released,
    Repeat,
}

/// Код клавиши (evdev коды)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyCode(pub u16);

impl KeyCode {
    pub fn value(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KEY_{}", self.0)
    }
}

/// Модификаторы клавиш
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub super_key: bool,
}

impl Modifiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        !self.ctrl && !self.alt && !self.shift && !self.super_key
    }

    pub fn to_vec(&self) -> Vec<&'static str> {
        let mut result = Vec::new();
        if self.ctrl {
            result.push("ctrl");
        }
        if self.alt {
            result.push("alt");
        }
        if self.shift {
            result.push("shift");
        }
        if self.super_key {
            result.push("super");
        }
        result
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let modifiers = self.to_vec();
        if modifiers.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", modifiers.join("+"))
        }
    }
}

/// Разобранная комбинация клавиш вида "ctrl+shift+y"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HotkeySpec {
    pub modifiers: Modifiers,
    pub key: KeyCode,
}

impl HotkeySpec {
    /// Разобрать строку комбинации: модификаторы через '+', последним - основная клавиша
    pub fn parse(spec: &str) -> Result<Self, String> {
        let tokens: Vec<&str> = spec
            .split('+')
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect();

        if tokens.is_empty() {
            return Err("пустая комбинация".to_string());
        }

        let mut modifiers = Modifiers::new();
        let (key_name, modifier_names) = tokens.split_last().unwrap();

        for name in modifier_names {
            match name.to_lowercase().as_str() {
                "ctrl" => modifiers.ctrl = true,
                "alt" => modifiers.alt = true,
                "shift" => modifiers.shift = true,
                "super" | "win" | "meta" => modifiers.super_key = true,
                other => return Err(format!("неизвестный модификатор '{}'", other)),
            }
        }

        let normalized = key_name.to_lowercase();
        if charmap::is_modifier_name(&normalized) {
            return Err(format!("'{}' не может быть основной клавишей", key_name));
        }

        let key = charmap::named_code(&normalized)
            .ok_or_else(|| format!("неизвестная клавиша '{}'", key_name))?;

        Ok(Self { modifiers, key })
    }

    /// Сработала ли комбинация: точное совпадение модификаторов и основной клавиши
    pub fn matches(&self, modifiers: &Modifiers, key: KeyCode) -> bool {
        key == self.key && *modifiers == self.modifiers
    }
}

impl fmt::Display for HotkeySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.is_empty() {
            write!(f, "{}", self.key)
        } else {
            write!(f, "{}+{}", self.modifiers, self.key)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_hotkey() {
        let spec = HotkeySpec::parse("ctrl+shift+y").unwrap();
        assert!(spec.modifiers.ctrl);
        assert!(spec.modifiers.shift);
        assert!(!spec.modifiers.alt);
        assert!(!spec.modifiers.super_key);
        assert_eq!(spec.key, charmap::named_code("y").unwrap());
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            HotkeySpec::parse("Ctrl+Shift+Y").unwrap(),
            HotkeySpec::parse("ctrl+shift+y").unwrap()
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(HotkeySpec::parse("").is_err());
        assert!(HotkeySpec::parse("hyper+y").is_err());
        assert!(HotkeySpec::parse("ctrl+definitely_not_a_key").is_err());
        // Модификатор не может быть основной клавишей
        assert!(HotkeySpec::parse("ctrl+shift").is_err());
    }

    #[test]
    fn test_matches_requires_exact_modifiers() {
        let spec = HotkeySpec::parse("ctrl+shift+y").unwrap();
        let key = spec.key;

        let mut held = Modifiers::new();
        held.ctrl = true;
        held.shift = true;
        assert!(spec.matches(&held, key));

        held.alt = true;
        assert!(!spec.matches(&held, key));

        held.alt = false;
        assert!(!spec.matches(&held, charmap::named_code("x").unwrap()));
    }

    #[test]
    fn test_modifiers_display() {
        let mut m = Modifiers::new();
        assert_eq!(m.to_string(), "none");
        m.ctrl = true;
        m.super_key = true;
        assert_eq!(m.to_string(), "ctrl+super");
    }
}
