//! FocusProbe: границы ответственности
//!
//! Модуль отвечает ТОЛЬКО за определение идентификатора окна в фокусе.
//! Решение "прервать или продолжить сессию" принимает исключительно движок
//! вставки, сравнивая идентификатор с якорем сессии.

mod dry_run;
mod kdotool;
mod sway;
mod r#trait;
mod xdotool;

pub use self::r#trait::{create_focus_probe, FocusProbe};
