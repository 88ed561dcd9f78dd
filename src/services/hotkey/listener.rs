use evdev::{Device, EventType};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::Settings;
use crate::debug_if_enabled;
use crate::error::{PasteError, Result};
use crate::events::{HotkeySpec, KeyCode, KeyState, TriggerOrigin};
use crate::services::PasteController;
use crate::utils::DeviceFinder;

use super::modifier_state::ModifierState;
use super::r#trait::HotkeyListenerTrait;

pub struct RealHotkeyListener {
    controller: Arc<PasteController>,
    device: Device,
    modifier_state: Arc<RwLock<ModifierState>>,
    hotkey: Option<HotkeySpec>,
}

impl RealHotkeyListener {
    pub fn new(
        settings: Arc<Settings>,
        controller: Arc<PasteController>,
        modifier_state: Arc<RwLock<ModifierState>>,
        device_path: &str,
    ) -> Result<Self> {
        info!("Инициализация RealHotkeyListener");

        let device_path = DeviceFinder::find_keyboard_device(device_path)?;

        // Пассивное наблюдение: без эксклюзивного захвата, пользователь
        // продолжает печатать как обычно
        let device = Device::open(&device_path).map_err(|e| {
            PasteError::DeviceNotFound(format!(
                "Не удалось открыть устройство {:?}: {}",
                device_path, e
            ))
        })?;

        info!("Слушаем устройство: {}", device.name().unwrap_or("Unknown"));

        // Неверная комбинация не валит процесс: слушатель работает без привязки
        let hotkey = match HotkeySpec::parse(&settings.hotkey) {
            Ok(spec) => Some(spec),
            Err(reason) => {
                error!(
                    "Неверная комбинация клавиш '{}': {}. Глобальный хоткей отключён",
                    settings.hotkey, reason
                );
                None
            }
        };

        Ok(Self {
            controller,
            device,
            modifier_state,
            hotkey,
        })
    }

    async fn run_impl(mut self) -> Result<()> {
        match self.hotkey {
            Some(spec) => info!("Глобальная комбинация активна: {}", spec),
            None => warn!("Слушатель запущен без глобальной комбинации"),
        }

        loop {
            // Обработка событий клавиатуры (неблокирующая)
            let events_vec = match self.device.fetch_events() {
                Ok(events) => events.collect::<Vec<_>>(),
                Err(e) => {
                    error!("Ошибка чтения событий: {}", e);
                    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
                    continue;
                }
            };

            for event in events_vec {
                self.handle_event(event);
            }

            // Небольшая задержка для предотвращения 100% загрузки CPU
            tokio::time::sleep(tokio::time::Duration::from_millis(1)).await;
        }
    }

    fn handle_event(&mut self, event: evdev::InputEvent) {
        if event.event_type() != EventType::KEY {
            return;
        }

        let state = match event.value() {
            0 => KeyState::Released,
            1 => KeyState::Pressed,
            2 => KeyState::Repeat,
            _ => return,
        };

        {
            let mut modifier_state = self.modifier_state.write();
            modifier_state.update_key(evdev::KeyCode::new(event.code()), state == KeyState::Pressed);
        }

        // Комбинацию проверяем только на нажатии основной клавиши
        if state != KeyState::Pressed {
            return;
        }

        let Some(hotkey) = self.hotkey else {
            return;
        };

        let modifiers = self.modifier_state.read().to_modifiers();
        debug_if_enabled!("Нажатие {} (модификаторы: {})", event.code(), modifiers);

        if hotkey.matches(&modifiers, KeyCode(event.code())) {
            info!("Сработала комбинация {}", hotkey);
            self.controller.handle_trigger(TriggerOrigin::Hotkey);
        }
    }
}

#[async_trait::async_trait]
impl HotkeyListenerTrait for RealHotkeyListener {
    async fn run(self: Box<Self>) -> Result<()> {
        (*self).run_impl().await
    }
}
