use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Json, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::events::HotkeySpec;

/// Настройки приложения.
///
/// Плоский набор ключей, один в один с форматом файла `paste_config.json`.
/// Порядок полей определяет порядок ключей при сохранении.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Язык интерфейса ("zh" или "en")
    pub language: String,
    /// Задержка перед стартом при ручном запуске, мс
    pub btn_delay: u64,
    /// Задержка перед стартом при запуске по хоткею, мс
    pub hotkey_delay: u64,
    /// Базовая задержка между символами, мс
    pub char_delay: u64,
    /// Случайный разброс задержки между символами, +/- мс
    pub random_jitter: u64,
    /// Глобальная комбинация запуска/остановки
    pub hotkey: String,
    /// Окно поверх остальных (используется внешним UI, движком не читается)
    pub always_on_top: bool,
    /// Преобразовывать табуляцию в 4 пробела
    pub tab_to_space: bool,
    /// Режим "анти-лестница" для редакторов с автоотступом
    pub anti_staircase: bool,
    /// Перевод строки как Shift+Enter вместо Enter
    pub shift_enter: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: "zh".to_string(),
            btn_delay: 3000,
            hotkey_delay: 100,
            char_delay: 20,
            random_jitter: 5,
            hotkey: "ctrl+shift+y".to_string(),
            always_on_top: true,
            tab_to_space: true,
            anti_staircase: false,
            shift_enter: false,
        }
    }
}

impl Settings {
    /// Загрузить настройки: дефолты, поверх них файл, поверх - переменные окружения.
    ///
    /// Отсутствующий или битый файл не фатален: возвращаются дефолты без изменений.
    /// Лишние ключи файла молча отбрасываются, недостающие берутся из дефолтов.
    pub fn load<P: AsRef<Path>>(config_path: P) -> Self {
        let config_path = config_path.as_ref();

        match Self::try_load(config_path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(
                    "Не удалось загрузить конфигурацию из {:?}: {}. Используются значения по умолчанию",
                    config_path, e
                );
                Self::default()
            }
        }
    }

    fn try_load(config_path: &Path) -> Result<Self> {
        let figment = Figment::from(Serialized::defaults(Self::default()))
            .merge(Json::file(config_path))
            .merge(Env::prefixed("FPASTE_"));

        let settings: Settings = figment
            .extract()
            .with_context(|| format!("Не удалось разобрать конфигурацию из {:?}", config_path))?;

        settings.validate()?;

        Ok(settings)
    }

    /// Сохранить полный снимок настроек, перезаписав существующий файл
    pub fn save<P: AsRef<Path>>(&self, config_path: P) -> Result<()> {
        let config_path = config_path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("Не удалось сериализовать конфигурацию")?;
        fs::write(config_path, content)
            .with_context(|| format!("Не удалось записать конфигурацию в {:?}", config_path))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        match self.language.as_str() {
            "zh" | "en" => {}
            _ => anyhow::bail!("Неверный язык интерфейса: {}", self.language),
        }

        if let Err(reason) = HotkeySpec::parse(&self.hotkey) {
            anyhow::bail!("Неверная комбинация клавиш '{}': {}", self.hotkey, reason);
        }

        Ok(())
    }
}
