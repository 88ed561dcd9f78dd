mod session;
mod strategy;

pub use session::Session;
pub use strategy::{select_strategy, TypingContext, TypingStrategy, SENTINEL};

use parking_lot::{Mutex, RwLock};
use rand::Rng;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::error::Result;
use crate::events::TriggerOrigin;
use crate::services::focus::FocusProbe;
use crate::services::hotkey::ModifierState;
use crate::services::virtual_keyboard::KeySink;

/// Интервал опроса модификаторов в пре-ролле
const RELEASE_POLL: Duration = Duration::from_millis(50);
/// Бюджет ожидания отпускания модификаторов
const RELEASE_BUDGET: Duration = Duration::from_secs(2);

/// Движок вставки: превращает текст сессии в синтетические нажатия,
/// соблюдая тайминги, якорь безопасности и отмену.
pub struct PasteEngine {
    settings: Arc<Settings>,
    keyboard: Mutex<Box<dyn KeySink>>,
    probe: Box<dyn FocusProbe>,
    modifier_state: Arc<RwLock<ModifierState>>,
}

impl PasteEngine {
    pub fn new(
        settings: Arc<Settings>,
        keyboard: Box<dyn KeySink>,
        probe: Box<dyn FocusProbe>,
        modifier_state: Arc<RwLock<ModifierState>>,
    ) -> Self {
        info!(
            "Инициализация PasteEngine (режим: {})",
            if settings.anti_staircase {
                "anti-staircase"
            } else {
                "normal"
            }
        );

        Self {
            settings,
            keyboard: Mutex::new(keyboard),
            probe,
            modifier_state,
        }
    }

    /// Выполнить сессию вставки. Вызывается из выделенного рабочего потока;
    /// все паузы и вызовы ввода блокирующие - нажатия обязаны идти строго
    /// по порядку с реальными интервалами.
    pub fn execute(&self, session: &mut Session) -> Result<()> {
        if session.is_cancelled() {
            return Ok(());
        }

        if session.origin() == TriggerOrigin::Hotkey {
            let delay = self.settings.hotkey_delay;
            if delay > 0 {
                thread::sleep(Duration::from_millis(delay));
            }
            self.wait_modifiers_release();
        }

        // Якорь безопасности: окно в фокусе на момент старта
        let anchor = self.probe.active_window()?;
        debug!("Якорь безопасности сессии: окно {}", anchor);
        session.set_anchor(anchor.clone());

        let text = normalize(session.text(), self.settings.tab_to_space);
        let strategy = select_strategy(self.settings.anti_staircase);
        info!(
            "Вставка запущена: стратегия '{}', {} символов",
            strategy.name(),
            text.chars().count()
        );

        let mut keyboard = self.keyboard.lock();
        let mut ctx = TypingContext::new(
            session,
            &mut **keyboard,
            self.probe.as_ref(),
            anchor,
            &self.settings,
        );

        strategy.run(&text, &mut ctx)
    }

    /// Пре-ролл хоткея: дождаться отпускания всех модификаторов, чтобы
    /// нажатия самого хоткея не попали в вывод. Бюджет 2 секунды; по его
    /// исчерпании продолжаем с предупреждением.
    fn wait_modifiers_release(&self) {
        let deadline = Instant::now() + RELEASE_BUDGET;

        while self.modifier_state.read().any_held() {
            if Instant::now() >= deadline {
                warn!("Таймаут ожидания отпускания модификаторов, продолжаем ввод");
                return;
            }
            thread::sleep(RELEASE_POLL);
        }
    }
}

/// Нормализация текста перед воспроизведением: табуляция в 4 пробела
/// (по настройке) и приведение всех вариантов перевода строки к '\n'.
/// Чистая и идемпотентная, применяется один раз до начала таймингов.
pub fn normalize(text: &str, tab_to_space: bool) -> String {
    let text = if tab_to_space {
        text.replace('\t', "    ")
    } else {
        text.to_string()
    };

    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Задержка между символами: base + uniform(-jitter, +jitter) мс,
/// не ниже нуля. Вычисляется заново для каждого символа.
pub fn jittered_delay(base_ms: u64, jitter_ms: u64, rng: &mut impl Rng) -> Duration {
    let offset = if jitter_ms == 0 {
        0.0
    } else {
        rng.gen_range(-(jitter_ms as f64)..=jitter_ms as f64)
    };

    let delay_ms = (base_ms as f64 + offset).max(0.0);
    Duration::from_secs_f64(delay_ms / 1000.0)
}
