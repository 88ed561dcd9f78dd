pub mod keyboard;
pub mod window;

pub use keyboard::{HotkeySpec, KeyCode, KeyState, Modifiers};
pub use window::WindowId;

/// Источник запуска сессии вставки
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOrigin {
    /// Ручной запуск (кнопка/сигнал) - с задержкой btn_delay перед стартом
    Button,
    /// Запуск по глобальной комбинации клавиш - с пре-роллом hotkey_delay
    Hotkey,
}

impl std::fmt::Display for TriggerOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TriggerOrigin::Button => write!(f, "button"),
            TriggerOrigin::Hotkey => write!(f, "hotkey"),
        }
    }
}
