use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Поддерживаемые языки интерфейса
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    Zh,
    En,
}

impl Lang {
    /// Разобрать языковой тег из настроек; неизвестный тег трактуем как английский
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "zh" => Lang::Zh,
            _ => Lang::En,
        }
    }
}

struct Translation {
    zh: &'static str,
    en: &'static str,
}

// Пользовательские строки (zh/en), показываются только в уведомлениях -
// движок вставки к этой таблице не обращается
static TRANSLATIONS: Lazy<HashMap<&'static str, Translation>> = Lazy::new(|| {
    let mut map = HashMap::new();

    map.insert(
        "app_title",
        Translation {
            zh: "强制粘贴 - 模拟键盘输入",
            en: "ForcePaste - Auto Typer",
        },
    );
    map.insert(
        "msg_empty",
        Translation {
            zh: "剪贴板为空!",
            en: "Clipboard Empty!",
        },
    );
    map.insert(
        "msg_typing",
        Translation {
            zh: "正在输入...",
            en: "Typing...",
        },
    );
    map.insert(
        "msg_stopping",
        Translation {
            zh: "正在中断...",
            en: "Stopping...",
        },
    );
    map.insert(
        "msg_stopped",
        Translation {
            zh: "输入已中断",
            en: "Typing stopped",
        },
    );
    map.insert(
        "msg_done",
        Translation {
            zh: "输入完成",
            en: "Typing finished",
        },
    );
    map.insert(
        "err_save",
        Translation {
            zh: "配置无效",
            en: "Invalid Configuration",
        },
    );

    map
});

/// Получить локализованную строку по ключу; для неизвестного ключа возвращается сам ключ
pub fn tr(key: &'static str, lang: Lang) -> &'static str {
    match TRANSLATIONS.get(key) {
        Some(t) => match lang {
            Lang::Zh => t.zh,
            Lang::En => t.en,
        },
        None => key,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_keys() {
        assert_eq!(tr("msg_empty", Lang::En), "Clipboard Empty!");
        assert_eq!(tr("msg_empty", Lang::Zh), "剪贴板为空!");
        assert_eq!(tr("msg_typing", Lang::En), "Typing...");
    }

    #[test]
    fn test_unknown_key_falls_back_to_key() {
        assert_eq!(tr("no_such_key", Lang::En), "no_such_key");
    }

    #[test]
    fn test_lang_from_tag() {
        assert_eq!(Lang::from_tag("zh"), Lang::Zh);
        assert_eq!(Lang::from_tag("en"), Lang::En);
        assert_eq!(Lang::from_tag("de"), Lang::En);
    }
}
