use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::events::{TriggerOrigin, WindowId};

/// Контекст одной сессии вставки: текст, источник запуска, флаг отмены и
/// якорь безопасности. Живёт от запуска до завершения или отмены.
///
/// Флаг отмены разделяется между рабочим потоком и управляющим слоем;
/// якорь записывается рабочим потоком один раз на старте и дальше
/// только читается.
pub struct Session {
    text: String,
    origin: TriggerOrigin,
    cancel: Arc<AtomicBool>,
    anchor: Option<WindowId>,
}

impl Session {
    pub fn new(text: String, origin: TriggerOrigin) -> Self {
        Self {
            text,
            origin,
            cancel: Arc::new(AtomicBool::new(false)),
            anchor: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn origin(&self) -> TriggerOrigin {
        self.origin
    }

    /// Разделяемый флаг отмены для управляющего слоя
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    pub fn set_anchor(&mut self, anchor: WindowId) {
        self.anchor = Some(anchor);
    }

    #[allow(dead_code)]
    pub fn anchor(&self) -> Option<&WindowId> {
        self.anchor.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_flag_is_shared() {
        let session = Session::new("abc".to_string(), TriggerOrigin::Button);
        let flag = session.cancel_flag();

        assert!(!session.is_cancelled());
        flag.store(true, Ordering::SeqCst);
        assert!(session.is_cancelled());
    }

    #[test]
    fn test_cancel_from_another_thread() {
        let session = Session::new("abc".to_string(), TriggerOrigin::Hotkey);
        let flag = session.cancel_flag();

        let handle = std::thread::spawn(move || {
            flag.store(true, Ordering::SeqCst);
        });
        handle.join().unwrap();

        assert!(session.is_cancelled());
    }

    #[test]
    fn test_anchor_written_once() {
        let mut session = Session::new(String::new(), TriggerOrigin::Button);
        assert!(session.anchor().is_none());

        session.set_anchor(WindowId::new("42"));
        assert_eq!(session.anchor().unwrap().as_str(), "42");
    }
}
