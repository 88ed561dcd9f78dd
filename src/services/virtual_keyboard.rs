use tracing::{debug, info};

use crate::error::{PasteError, Result};
use crate::events::KeyCode;
use crate::services::charmap;

/// Приёмник синтетических нажатий - платформенная поверхность ввода.
///
/// Портирование на другую платформу означает новую реализацию этого трейта.
pub trait KeySink: Send {
    /// Напечатать один литеральный символ
    fn type_char(&mut self, ch: char) -> Result<()>;

    /// Одиночное нажатие именованной клавиши
    fn tap(&mut self, key: KeyCode) -> Result<()>;

    /// Аккорд: модификаторы зажаты, клавиша нажата и отпущена, модификаторы отпущены
    fn chord(&mut self, modifiers: &[KeyCode], key: KeyCode) -> Result<()>;
}

pub struct VirtualKeyboard {
    device: Option<uinput::Device>,
    device_name: String,
    dry_run: bool,
}

impl VirtualKeyboard {
    pub fn new(device_name: &str, dry_run: bool) -> Result<Self> {
        info!(
            "Инициализация VirtualKeyboard '{}' (dry_run: {})",
            device_name, dry_run
        );

        let device = if dry_run {
            None
        } else {
            Some(Self::create_virtual_device(device_name)?)
        };

        Ok(Self {
            device,
            device_name: device_name.to_string(),
            dry_run,
        })
    }

    fn create_virtual_device(device_name: &str) -> Result<uinput::Device> {
        info!(
            "Создание виртуального устройства uinput '{}' для инъекции клавиш",
            device_name
        );

        let device = uinput::default()?
            .name(device_name)
            .map_err(|e| {
                PasteError::Internal(format!("Не удалось задать имя устройства: {}", e))
            })?
            .event(uinput::event::Keyboard::All)
            .map_err(|e| {
                PasteError::Internal(format!("Не удалось включить клавиатурные события: {}", e))
            })?
            .create()
            .map_err(|e| {
                PasteError::Internal(format!(
                    "Не удалось создать виртуальное устройство '{}': {}",
                    device_name, e
                ))
            })?;

        info!("Виртуальное устройство '{}' создано успешно", device_name);
        Ok(device)
    }

    /// Отправить сырое EV_KEY событие и синхронизировать
    fn emit(&mut self, key: KeyCode, pressed: bool) -> Result<()> {
        let device = self
            .device
            .as_mut()
            .ok_or_else(|| PasteError::Internal("Виртуальное устройство недоступно".to_string()))?;

        let value = if pressed { 1 } else { 0 };
        if let Err(e) = device.write(1, key.value() as i32, value) {
            return Err(PasteError::Internal(format!(
                "Не удалось отправить событие клавиши {}: {}",
                key, e
            )));
        }

        // Синхронизируем события
        if let Err(e) = device.write(0, 0, 0) {
            return Err(PasteError::Internal(format!(
                "Не удалось синхронизировать события: {}",
                e
            )));
        }

        Ok(())
    }

    fn click(&mut self, key: KeyCode) -> Result<()> {
        self.emit(key, true)?;
        self.emit(key, false)
    }
}

impl KeySink for VirtualKeyboard {
    fn type_char(&mut self, ch: char) -> Result<()> {
        let stroke = match charmap::lookup(ch) {
            Some(stroke) => stroke,
            None => {
                // Символ вне раскладки US пропускаем, не прерывая сессию
                debug!("Символ {:?} не представлен в раскладке, пропущен", ch);
                return Ok(());
            }
        };

        if self.dry_run {
            info!("[DRY RUN] Символ {:?} -> {:?}", ch, stroke);
            return Ok(());
        }

        if stroke.shift {
            self.emit(charmap::keys::LEFT_SHIFT, true)?;
            self.click(stroke.code)?;
            self.emit(charmap::keys::LEFT_SHIFT, false)
        } else {
            self.click(stroke.code)
        }
    }

    fn tap(&mut self, key: KeyCode) -> Result<()> {
        if self.dry_run {
            info!("[DRY RUN] Нажатие {}", key);
            return Ok(());
        }

        self.click(key)
    }

    fn chord(&mut self, modifiers: &[KeyCode], key: KeyCode) -> Result<()> {
        if self.dry_run {
            info!("[DRY RUN] Аккорд {:?}+{}", modifiers, key);
            return Ok(());
        }

        for modifier in modifiers {
            self.emit(*modifier, true)?;
        }
        self.click(key)?;
        for modifier in modifiers.iter().rev() {
            self.emit(*modifier, false)?;
        }

        Ok(())
    }
}

impl Drop for VirtualKeyboard {
    fn drop(&mut self) {
        if !self.dry_run {
            info!("Закрытие виртуального устройства '{}'", self.device_name);
        }
    }
}
