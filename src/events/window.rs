use std::fmt;

/// Идентификатор окна, используемый как якорь безопасности сессии.
///
/// Бэкенды возвращают разные представления (числовой id X11, UUID окна KDE,
/// id контейнера sway), поэтому храним как непрозрачную строку: движку нужно
/// только сравнение на равенство.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WindowId(String);

impl WindowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[allow(dead_code)]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_id_equality() {
        let a = WindowId::new("94371840");
        let b = WindowId::new("94371840");
        let c = WindowId::new("94371841");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_window_id_display() {
        let id = WindowId::new("0x2e00003");
        assert_eq!(id.to_string(), "0x2e00003");
        assert_eq!(id.as_str(), "0x2e00003");
    }
}
