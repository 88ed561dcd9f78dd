use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::events::KeyCode;

/// Именованные клавиши, нужные движку напрямую
pub mod keys {
    use crate::events::KeyCode;

    pub const ENTER: KeyCode = KeyCode(28);
    pub const BACKSPACE: KeyCode = KeyCode(14);
    pub const HOME: KeyCode = KeyCode(102);
    pub const END: KeyCode = KeyCode(107);
    pub const RIGHT: KeyCode = KeyCode(106);
    pub const LEFT_SHIFT: KeyCode = KeyCode(42);
}

/// Нажатие, производящее один печатный символ в раскладке US
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyStroke {
    pub code: KeyCode,
    pub shift: bool,
}

impl KeyStroke {
    const fn plain(code: u16) -> Self {
        Self {
            code: KeyCode(code),
            shift: false,
        }
    }

    const fn shifted(code: u16) -> Self {
        Self {
            code: KeyCode(code),
            shift: true,
        }
    }
}

// Статическая карта печатных символов ASCII -> нажатие (раскладка US)
static CHAR_TO_STROKE: Lazy<HashMap<char, KeyStroke>> = Lazy::new(|| {
    let mut map = HashMap::new();

    // Буквы: нижний регистр без shift, верхний с shift
    let letters: [(char, u16); 26] = [
        ('a', 30), ('b', 48), ('c', 46), ('d', 32), ('e', 18), ('f', 33),
        ('g', 34), ('h', 35), ('i', 23), ('j', 36), ('k', 37), ('l', 38),
        ('m', 50), ('n', 49), ('o', 24), ('p', 25), ('q', 16), ('r', 19),
        ('s', 31), ('t', 20), ('u', 22), ('v', 47), ('w', 17), ('x', 45),
        ('y', 21), ('z', 44),
    ];
    for (ch, code) in letters {
        map.insert(ch, KeyStroke::plain(code));
        map.insert(ch.to_ascii_uppercase(), KeyStroke::shifted(code));
    }

    // Цифровой ряд и его shift-символы
    let digits: [(char, char, u16); 10] = [
        ('1', '!', 2), ('2', '@', 3), ('3', '#', 4), ('4', '$', 5),
        ('5', '%', 6), ('6', '^', 7), ('7', '&', 8), ('8', '*', 9),
        ('9', '(', 10), ('0', ')', 11),
    ];
    for (digit, symbol, code) in digits {
        map.insert(digit, KeyStroke::plain(code));
        map.insert(symbol, KeyStroke::shifted(code));
    }

    // Пунктуация и её shift-пары
    let punctuation: [(char, char, u16); 11] = [
        ('-', '_', 12),   // KEY_MINUS
        ('=', '+', 13),   // KEY_EQUAL
        ('[', '{', 26),   // KEY_LEFTBRACE
        (']', '}', 27),   // KEY_RIGHTBRACE
        (';', ':', 39),   // KEY_SEMICOLON
        ('\'', '"', 40),  // KEY_APOSTROPHE
        ('`', '~', 41),   // KEY_GRAVE
        ('\\', '|', 43),  // KEY_BACKSLASH
        (',', '<', 51),   // KEY_COMMA
        ('.', '>', 52),   // KEY_DOT
        ('/', '?', 53),   // KEY_SLASH
    ];
    for (plain, shifted, code) in punctuation {
        map.insert(plain, KeyStroke::plain(code));
        map.insert(shifted, KeyStroke::shifted(code));
    }

    map.insert(' ', KeyStroke::plain(57)); // KEY_SPACE
    map.insert('\t', KeyStroke::plain(15)); // KEY_TAB

    map
});

// Имена клавиш для разбора комбинаций и навигации
static NAME_TO_CODE: Lazy<HashMap<&'static str, u16>> = Lazy::new(|| {
    let mut map = HashMap::new();

    // Буквенные клавиши
    let letters: [(&'static str, u16); 26] = [
        ("a", 30), ("b", 48), ("c", 46), ("d", 32), ("e", 18), ("f", 33),
        ("g", 34), ("h", 35), ("i", 23), ("j", 36), ("k", 37), ("l", 38),
        ("m", 50), ("n", 49), ("o", 24), ("p", 25), ("q", 16), ("r", 19),
        ("s", 31), ("t", 20), ("u", 22), ("v", 47), ("w", 17), ("x", 45),
        ("y", 21), ("z", 44),
    ];
    for (name, code) in letters {
        map.insert(name, code);
    }

    // Цифровые клавиши (верхний ряд)
    let digits: [(&'static str, u16); 10] = [
        ("1", 2), ("2", 3), ("3", 4), ("4", 5), ("5", 6),
        ("6", 7), ("7", 8), ("8", 9), ("9", 10), ("0", 11),
    ];
    for (name, code) in digits {
        map.insert(name, code);
    }

    // Специальные клавиши
    map.insert("space", 57);      // KEY_SPACE
    map.insert("enter", 28);      // KEY_ENTER
    map.insert("escape", 1);      // KEY_ESC
    map.insert("backspace", 14);  // KEY_BACKSPACE
    map.insert("tab", 15);        // KEY_TAB
    map.insert("home", 102);      // KEY_HOME
    map.insert("end", 107);       // KEY_END
    map.insert("delete", 111);    // KEY_DELETE
    map.insert("insert", 110);    // KEY_INSERT

    // Стрелки
    map.insert("up", 103);        // KEY_UP
    map.insert("down", 108);      // KEY_DOWN
    map.insert("left", 105);      // KEY_LEFT
    map.insert("right", 106);     // KEY_RIGHT

    // Функциональные клавиши
    let f_keys: [(&'static str, u16); 12] = [
        ("f1", 59), ("f2", 60), ("f3", 61), ("f4", 62), ("f5", 63), ("f6", 64),
        ("f7", 65), ("f8", 66), ("f9", 67), ("f10", 68), ("f11", 87), ("f12", 88),
    ];
    for (name, code) in f_keys {
        map.insert(name, code);
    }

    map
});

/// Нажатие для печатного символа; None для символов вне раскладки US
pub fn lookup(ch: char) -> Option<KeyStroke> {
    CHAR_TO_STROKE.get(&ch).copied()
}

/// Код клавиши по её имени (для разбора комбинаций)
pub fn named_code(name: &str) -> Option<KeyCode> {
    NAME_TO_CODE.get(name).copied().map(KeyCode)
}

/// Является ли имя модификатором
pub fn is_modifier_name(name: &str) -> bool {
    matches!(name, "ctrl" | "alt" | "shift" | "super" | "win" | "meta")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_lookup() {
        let a = lookup('a').unwrap();
        assert_eq!(a.code.value(), 30);
        assert!(!a.shift);

        let upper_a = lookup('A').unwrap();
        assert_eq!(upper_a.code.value(), 30);
        assert!(upper_a.shift);
    }

    #[test]
    fn test_sentinel_char_is_shift_three() {
        // '#' - страж режима анти-лестницы
        let hash = lookup('#').unwrap();
        assert_eq!(hash.code.value(), 4); // KEY_3
        assert!(hash.shift);
    }

    #[test]
    fn test_punctuation_pairs() {
        assert_eq!(lookup(';').unwrap().code, lookup(':').unwrap().code);
        assert!(!lookup(';').unwrap().shift);
        assert!(lookup(':').unwrap().shift);

        let space = lookup(' ').unwrap();
        assert_eq!(space.code.value(), 57);
    }

    #[test]
    fn test_unmapped_char() {
        assert!(lookup('日').is_none());
        assert!(lookup('ё').is_none());
    }

    #[test]
    fn test_named_code() {
        assert_eq!(named_code("y").unwrap().value(), 21);
        assert_eq!(named_code("enter").unwrap(), keys::ENTER);
        assert_eq!(named_code("home").unwrap(), keys::HOME);
        assert_eq!(named_code("f5").unwrap().value(), 63);
        assert!(named_code("no_such_key").is_none());
    }

    #[test]
    fn test_modifier_names() {
        assert!(is_modifier_name("ctrl"));
        assert!(is_modifier_name("win"));
        assert!(!is_modifier_name("a"));
    }
}
