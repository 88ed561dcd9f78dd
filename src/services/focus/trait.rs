use tracing::info;

use crate::error::{PasteError, Result};
use crate::events::WindowId;

use super::dry_run::DryRunProbe;
use super::kdotool::KdotoolProbe;
use super::sway::SwayProbe;
use super::xdotool::XdotoolProbe;

/// Зонд окна в фокусе.
///
/// Опрашивается перед каждой единицей работы движка, поэтому вызов обязан
/// быть дешёвым и синхронным (рабочий поток сессии блокирующий).
pub trait FocusProbe: Send + Sync {
    /// Идентификатор окна, находящегося в фокусе прямо сейчас
    fn active_window(&self) -> Result<WindowId>;
}

/// Выбрать первый работающий бэкенд определения фокуса
pub fn create_focus_probe(dry_run: bool) -> Result<Box<dyn FocusProbe>> {
    if dry_run {
        info!("Dry-run режим - FocusProbe работает в режиме эмуляции");
        return Ok(Box::new(DryRunProbe::new()));
    }

    info!("Определяем рабочий метод детекции окна в фокусе...");

    let xdotool = XdotoolProbe::new();
    if xdotool.test().is_ok() {
        info!("Используем xdotool");
        return Ok(Box::new(xdotool));
    }

    let kdotool = KdotoolProbe::new();
    if kdotool.test().is_ok() {
        info!("Используем kdotool");
        return Ok(Box::new(kdotool));
    }

    let sway = SwayProbe::new();
    if sway.test().is_ok() {
        info!("Используем swaymsg");
        return Ok(Box::new(sway));
    }

    Err(PasteError::ServiceUnavailable(
        "Ни один метод детекции окна в фокусе не работает (xdotool/kdotool/swaymsg)".to_string(),
    ))
}
