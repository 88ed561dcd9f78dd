use rand::rngs::ThreadRng;
use std::thread;
use std::time::Duration;
use tracing::warn;

use crate::config::Settings;
use crate::error::Result;
use crate::events::WindowId;
use crate::services::charmap::keys;
use crate::services::focus::FocusProbe;
use crate::services::virtual_keyboard::KeySink;

use super::session::Session;
use super::jittered_delay;

/// Страж режима анти-лестницы: печатается в начало строки и затем удаляется
pub const SENTINEL: char = '#';

/// Пауза после навигационных нажатий (home/right/backspace/end)
const NAV_SETTLE: Duration = Duration::from_millis(10);

/// Общее для обеих стратегий окружение: проверка отмены/фокуса,
/// эмиссия символов и перевода строки, джиттер задержек.
pub struct TypingContext<'a> {
    session: &'a Session,
    sink: &'a mut dyn KeySink,
    probe: &'a dyn FocusProbe,
    anchor: WindowId,
    settings: &'a Settings,
    rng: ThreadRng,
}

impl<'a> TypingContext<'a> {
    pub fn new(
        session: &'a Session,
        sink: &'a mut dyn KeySink,
        probe: &'a dyn FocusProbe,
        anchor: WindowId,
        settings: &'a Settings,
    ) -> Self {
        Self {
            session,
            sink,
            probe,
            anchor,
            settings,
            rng: rand::thread_rng(),
        }
    }

    /// Можно ли продолжать: сессия не отменена и фокус не ушёл с якоря.
    /// Потеря фокуса или отказ зонда поднимают флаг отмены.
    pub fn guard(&mut self) -> bool {
        if self.session.is_cancelled() {
            return false;
        }

        match self.probe.active_window() {
            Ok(current) if current == self.anchor => true,
            Ok(current) => {
                warn!(
                    "Фокус потерян ({} -> {}), ввод остановлен",
                    self.anchor, current
                );
                self.session.cancel();
                false
            }
            Err(e) => {
                warn!("Зонд фокуса отказал ({}), ввод остановлен", e);
                self.session.cancel();
                false
            }
        }
    }

    /// Напечатать литеральный символ и выдержать джиттер-паузу
    pub fn emit_char(&mut self, ch: char) -> Result<()> {
        self.sink.type_char(ch)?;
        self.sleep_jittered();
        Ok(())
    }

    /// Перевод строки: Enter или Shift+Enter по настройке, затем джиттер-пауза
    pub fn emit_newline(&mut self) -> Result<()> {
        if self.settings.shift_enter {
            self.sink.chord(&[keys::LEFT_SHIFT], keys::ENTER)?;
        } else {
            self.sink.tap(keys::ENTER)?;
        }
        self.sleep_jittered();
        Ok(())
    }

    /// Напечатать стража с короткой фиксированной паузой
    fn type_sentinel(&mut self) -> Result<()> {
        self.sink.type_char(SENTINEL)?;
        thread::sleep(NAV_SETTLE);
        Ok(())
    }

    /// Навигационное нажатие с короткой фиксированной паузой
    fn tap_nav(&mut self, key: crate::events::KeyCode) -> Result<()> {
        self.sink.tap(key)?;
        thread::sleep(NAV_SETTLE);
        Ok(())
    }

    fn sleep_jittered(&mut self) {
        let delay = jittered_delay(
            self.settings.char_delay,
            self.settings.random_jitter,
            &mut self.rng,
        );
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }
}

/// Стратегия построчной эмиссии, выбирается один раз на сессию
pub trait TypingStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn run(&self, text: &str, ctx: &mut TypingContext<'_>) -> Result<()>;
}

pub fn select_strategy(anti_staircase: bool) -> &'static dyn TypingStrategy {
    if anti_staircase {
        &AntiStaircase
    } else {
        &NormalTyping
    }
}

/// Обычный режим: посимвольная печать нормализованного текста
pub struct NormalTyping;

impl TypingStrategy for NormalTyping {
    fn name(&self) -> &'static str {
        "normal"
    }

    fn run(&self, text: &str, ctx: &mut TypingContext<'_>) -> Result<()> {
        for ch in text.chars() {
            if !ctx.guard() {
                return Ok(());
            }

            if ch == '\n' {
                ctx.emit_newline()?;
            } else {
                ctx.emit_char(ch)?;
            }
        }

        Ok(())
    }
}

/// Режим "анти-лестница" для редакторов с автоотступом.
///
/// Каждая строка печатается после стража в её начале: автоотступ редактора
/// считает отступ от стража, а не от содержимого, после чего страж удаляется
/// (home, right, backspace, end). Видимый результат идентичен обычному режиму.
pub struct AntiStaircase;

impl TypingStrategy for AntiStaircase {
    fn name(&self) -> &'static str {
        "anti-staircase"
    }

    fn run(&self, text: &str, ctx: &mut TypingContext<'_>) -> Result<()> {
        let lines: Vec<&str> = text.split('\n').collect();
        let last_index = lines.len() - 1;

        for (index, line) in lines.iter().enumerate() {
            if !ctx.guard() {
                return Ok(());
            }

            ctx.tap_nav(keys::HOME)?;
            ctx.type_sentinel()?;

            for ch in line.chars() {
                if !ctx.guard() {
                    return Ok(());
                }
                ctx.emit_char(ch)?;
            }

            if !ctx.guard() {
                return Ok(());
            }

            // Удаляем стража и возвращаемся в конец строки
            ctx.tap_nav(keys::HOME)?;
            ctx.tap_nav(keys::RIGHT)?;
            ctx.tap_nav(keys::BACKSPACE)?;
            ctx.tap_nav(keys::END)?;

            if index < last_index {
                ctx.emit_newline()?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{KeyCode, TriggerOrigin};
    use crate::services::engine::normalize;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Записывающий приёмник нажатий
    #[derive(Default)]
    struct MockSink {
        ops: Vec<SinkOp>,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum SinkOp {
        Char(char),
        Tap(KeyCode),
        Chord(Vec<KeyCode>, KeyCode),
    }

    impl KeySink for MockSink {
        fn type_char(&mut self, ch: char) -> Result<()> {
            self.ops.push(SinkOp::Char(ch));
            Ok(())
        }

        fn tap(&mut self, key: KeyCode) -> Result<()> {
            self.ops.push(SinkOp::Tap(key));
            Ok(())
        }

        fn chord(&mut self, modifiers: &[KeyCode], key: KeyCode) -> Result<()> {
            self.ops.push(SinkOp::Chord(modifiers.to_vec(), key));
            Ok(())
        }
    }

    /// Зонд, меняющий окно после заданного числа опросов
    struct SwitchingProbe {
        calls: AtomicUsize,
        switch_after: usize,
    }

    impl SwitchingProbe {
        fn stable() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                switch_after: usize::MAX,
            }
        }

        fn switching_after(n: usize) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                switch_after: n,
            }
        }
    }

    impl FocusProbe for SwitchingProbe {
        fn active_window(&self) -> Result<WindowId> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.switch_after {
                Ok(WindowId::new("anchor"))
            } else {
                Ok(WindowId::new("other"))
            }
        }
    }

    fn fast_settings() -> Settings {
        Settings {
            char_delay: 0,
            random_jitter: 0,
            ..Settings::default()
        }
    }

    fn run_strategy(
        strategy: &dyn TypingStrategy,
        text: &str,
        settings: &Settings,
        probe: &dyn FocusProbe,
        session: &Session,
    ) -> Vec<SinkOp> {
        let mut sink = MockSink::default();
        let mut ctx = TypingContext::new(
            session,
            &mut sink,
            probe,
            WindowId::new("anchor"),
            settings,
        );
        strategy.run(text, &mut ctx).unwrap();
        sink.ops
    }

    #[test]
    fn test_normal_mode_emission_sequence() {
        // Сценарий: "a\tb\nc" при включённом tab_to_space
        let settings = fast_settings();
        let text = normalize("a\tb\nc", settings.tab_to_space);
        let session = Session::new(text.clone(), TriggerOrigin::Button);
        let probe = SwitchingProbe::stable();

        let ops = run_strategy(&NormalTyping, &text, &settings, &probe, &session);

        let expected = vec![
            SinkOp::Char('a'),
            SinkOp::Char(' '),
            SinkOp::Char(' '),
            SinkOp::Char(' '),
            SinkOp::Char(' '),
            SinkOp::Char('b'),
            SinkOp::Tap(keys::ENTER),
            SinkOp::Char('c'),
        ];
        assert_eq!(ops, expected);
        assert!(!session.is_cancelled());
    }

    #[test]
    fn test_normal_mode_shift_enter() {
        let mut settings = fast_settings();
        settings.shift_enter = true;
        let session = Session::new(String::new(), TriggerOrigin::Button);
        let probe = SwitchingProbe::stable();

        let ops = run_strategy(&NormalTyping, "x\ny", &settings, &probe, &session);

        assert_eq!(
            ops[1],
            SinkOp::Chord(vec![keys::LEFT_SHIFT], keys::ENTER)
        );
    }

    #[test]
    fn test_anti_staircase_emission_sequence() {
        // Тот же сценарий в режиме анти-лестницы: на каждую строку
        // home, '#', символы, home, right, backspace, end; Enter между строками
        let settings = fast_settings();
        let text = normalize("a\tb\nc", settings.tab_to_space);
        let session = Session::new(text.clone(), TriggerOrigin::Button);
        let probe = SwitchingProbe::stable();

        let ops = run_strategy(&AntiStaircase, &text, &settings, &probe, &session);

        let mut expected = vec![SinkOp::Tap(keys::HOME), SinkOp::Char(SENTINEL)];
        for ch in "a    b".chars() {
            expected.push(SinkOp::Char(ch));
        }
        expected.extend([
            SinkOp::Tap(keys::HOME),
            SinkOp::Tap(keys::RIGHT),
            SinkOp::Tap(keys::BACKSPACE),
            SinkOp::Tap(keys::END),
            SinkOp::Tap(keys::ENTER),
            SinkOp::Tap(keys::HOME),
            SinkOp::Char(SENTINEL),
            SinkOp::Char('c'),
            SinkOp::Tap(keys::HOME),
            SinkOp::Tap(keys::RIGHT),
            SinkOp::Tap(keys::BACKSPACE),
            SinkOp::Tap(keys::END),
        ]);
        assert_eq!(ops, expected);
    }

    #[test]
    fn test_cancelled_session_emits_nothing() {
        let settings = fast_settings();
        let session = Session::new("abc".to_string(), TriggerOrigin::Button);
        session.cancel();
        let probe = SwitchingProbe::stable();

        let ops = run_strategy(&NormalTyping, "abc", &settings, &probe, &session);
        assert!(ops.is_empty());
    }

    #[test]
    fn test_focus_change_aborts_before_next_char() {
        let settings = fast_settings();
        let session = Session::new(String::new(), TriggerOrigin::Button);
        // Фокус уходит после двух успешных проверок
        let probe = SwitchingProbe::switching_after(2);

        let ops = run_strategy(&NormalTyping, "abcdef", &settings, &probe, &session);

        assert_eq!(ops, vec![SinkOp::Char('a'), SinkOp::Char('b')]);
        assert!(session.is_cancelled());
    }

    #[test]
    fn test_mid_line_cancellation_in_anti_staircase() {
        let settings = fast_settings();
        let session = Session::new(String::new(), TriggerOrigin::Button);
        let probe = SwitchingProbe::switching_after(3);

        // Одна длинная строка: отмена срабатывает внутри строки, а не на границе
        let ops = run_strategy(&AntiStaircase, "abcdefgh", &settings, &probe, &session);

        assert!(session.is_cancelled());
        assert!(ops.len() < 10);
    }

    /// Упрощённый редактор для проверки эквивалентности видимого результата
    struct EditorSim {
        buf: Vec<char>,
        cursor: usize,
    }

    impl EditorSim {
        fn new() -> Self {
            Self {
                buf: Vec::new(),
                cursor: 0,
            }
        }

        fn apply(&mut self, op: &SinkOp) {
            match op {
                SinkOp::Char(ch) => self.insert(*ch),
                SinkOp::Tap(key) | SinkOp::Chord(_, key) => match *key {
                    keys::ENTER => self.insert('\n'),
                    keys::HOME => {
                        while self.cursor > 0 && self.buf[self.cursor - 1] != '\n' {
                            self.cursor -= 1;
                        }
                    }
                    keys::END => {
                        while self.cursor < self.buf.len() && self.buf[self.cursor] != '\n' {
                            self.cursor += 1;
                        }
                    }
                    keys::RIGHT => {
                        if self.cursor < self.buf.len() {
                            self.cursor += 1;
                        }
                    }
                    keys::BACKSPACE => {
                        if self.cursor > 0 {
                            self.cursor -= 1;
                            self.buf.remove(self.cursor);
                        }
                    }
                    _ => {}
                },
            }
        }

        fn insert(&mut self, ch: char) {
            self.buf.insert(self.cursor, ch);
            self.cursor += 1;
        }

        fn text(&self) -> String {
            self.buf.iter().collect()
        }
    }

    #[test]
    fn test_anti_staircase_visible_output_matches_normal() {
        let settings = fast_settings();
        let samples = [
            "hello",
            "fn main() {\n    let x = 1;\n}",
            "\nleading\n\ntrailing\n",
            "if a:\n    if b:\n        pass",
        ];

        for sample in samples {
            let text = normalize(sample, settings.tab_to_space);

            let session_n = Session::new(text.clone(), TriggerOrigin::Button);
            let probe_n = SwitchingProbe::stable();
            let normal_ops = run_strategy(&NormalTyping, &text, &settings, &probe_n, &session_n);

            let session_a = Session::new(text.clone(), TriggerOrigin::Button);
            let probe_a = SwitchingProbe::stable();
            let stair_ops = run_strategy(&AntiStaircase, &text, &settings, &probe_a, &session_a);

            let mut editor_normal = EditorSim::new();
            for op in &normal_ops {
                editor_normal.apply(op);
            }
            let mut editor_stair = EditorSim::new();
            for op in &stair_ops {
                editor_stair.apply(op);
            }

            assert_eq!(editor_normal.text(), text);
            assert_eq!(editor_stair.text(), text, "вход: {:?}", sample);
        }
    }
}
