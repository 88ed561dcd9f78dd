use arboard::Clipboard;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::config::Settings;
use crate::error::{PasteError, Result};
use crate::events::TriggerOrigin;
use crate::i18n::{tr, Lang};
use crate::services::engine::{PasteEngine, Session};

/// Активная сессия: флаг отмены и рабочий поток
struct ActiveSession {
    cancel: Arc<AtomicBool>,
    worker: thread::JoinHandle<()>,
}

/// Управляющий слой: превращает триггеры (хоткей, сигнал) в сессии вставки.
///
/// Семантика переключателя: триггер при активной сессии не запускает новую,
/// а отменяет текущую. Одновременно живёт не более одной сессии.
pub struct PasteController {
    settings: Arc<Settings>,
    engine: Arc<PasteEngine>,
    lang: Lang,
    active: Mutex<Option<ActiveSession>>,
}

impl PasteController {
    pub fn new(settings: Arc<Settings>, engine: Arc<PasteEngine>) -> Self {
        let lang = Lang::from_tag(&settings.language);
        info!("{}", tr("app_title", lang));

        Self {
            settings,
            engine,
            lang,
            active: Mutex::new(None),
        }
    }

    /// Обработать триггер: запустить новую сессию или отменить текущую
    pub fn handle_trigger(&self, origin: TriggerOrigin) {
        let mut active = self.active.lock();

        if let Some(session) = active.as_ref() {
            if !session.worker.is_finished() {
                info!("{}", tr("msg_stopping", self.lang));
                session.cancel.store(true, Ordering::SeqCst);
                return;
            }
        }
        // Предыдущий рабочий поток уже завершился - подбираем его
        if let Some(finished) = active.take() {
            let _ = finished.worker.join();
        }

        let text = match self.read_clipboard() {
            Ok(text) => text,
            Err(e) => {
                debug!("Буфер обмена недоступен: {}", e);
                String::new()
            }
        };
        if text.is_empty() {
            // Пустой буфер - не ошибка, сессия не стартует
            warn!("{}", tr("msg_empty", self.lang));
            return;
        }

        info!(
            "Новая сессия вставки: {} символов, запуск: {}",
            text.chars().count(),
            origin
        );

        let session = Session::new(text, origin);
        let cancel = session.cancel_flag();
        let engine = Arc::clone(&self.engine);
        let settings = Arc::clone(&self.settings);
        let lang = self.lang;

        // Один выделенный рабочий поток на сессию: блокирующие паузы и
        // блокирующий ввод, нажатия идут строго по порядку
        let spawned = thread::Builder::new()
            .name("paste-worker".to_string())
            .spawn(move || {
                let mut session = session;

                if session.origin() == TriggerOrigin::Button {
                    Self::countdown(settings.btn_delay, &session);
                    if session.is_cancelled() {
                        info!("{}", tr("msg_stopped", lang));
                        return;
                    }
                }

                info!("{}", tr("msg_typing", lang));
                match engine.execute(&mut session) {
                    Ok(()) if session.is_cancelled() => info!("{}", tr("msg_stopped", lang)),
                    Ok(()) => info!("{}", tr("msg_done", lang)),
                    Err(e) => error!("Сессия вставки завершилась с ошибкой: {}", e),
                }
            });

        match spawned {
            Ok(worker) => *active = Some(ActiveSession { cancel, worker }),
            Err(e) => error!("Не удалось запустить рабочий поток: {}", e),
        }
    }

    /// Отменить активную сессию и дождаться рабочего потока
    pub fn shutdown(&self) {
        let mut active = self.active.lock();

        if let Some(session) = active.take() {
            session.cancel.store(true, Ordering::SeqCst);
            if session.worker.join().is_err() {
                error!("Рабочий поток завершился с паникой");
            }
        }
    }

    /// Текст буфера обмена; пустой или недоступный буфер трактуются одинаково
    fn read_clipboard(&self) -> Result<String> {
        let mut clipboard =
            Clipboard::new().map_err(|e| PasteError::Clipboard(e.to_string()))?;
        clipboard
            .get_text()
            .map_err(|e| PasteError::Clipboard(e.to_string()))
    }

    /// Обратный отсчёт перед ручным стартом, шаг 100 мс с проверкой отмены
    fn countdown(total_ms: u64, session: &Session) {
        let steps = total_ms / 100;

        for remaining in (1..=steps).rev() {
            if session.is_cancelled() {
                return;
            }
            if remaining % 10 == 0 {
                debug!("Старт через {:.1}s", remaining as f64 / 10.0);
            }
            thread::sleep(Duration::from_millis(100));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_countdown_zero_delay_returns_immediately() {
        let session = Session::new(String::new(), TriggerOrigin::Button);
        let started = Instant::now();
        PasteController::countdown(0, &session);
        assert!(started.elapsed() < Duration::from_millis(50));
    }

    #[test]
    fn test_countdown_stops_on_cancel() {
        let session = Session::new(String::new(), TriggerOrigin::Button);
        let flag = session.cancel_flag();

        let canceller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(150));
            flag.store(true, Ordering::SeqCst);
        });

        let started = Instant::now();
        PasteController::countdown(10_000, &session);
        canceller.join().unwrap();

        // Отсчёт прервался на ближайшем шаге, а не досидел 10 секунд
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}
