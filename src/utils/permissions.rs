use std::fs;
use std::os::unix::fs::PermissionsExt;
use tracing::{info, warn};

use crate::error::{PasteError, Result};

/// Проверить права доступа к необходимым ресурсам.
///
/// Инъекция ввода требует повышенных прав: без доступа к /dev/input и
/// /dev/uinput движок не сможет работать, поэтому отказ фатален на старте.
pub fn check_permissions() -> Result<()> {
    info!("Проверка прав доступа...");

    check_input_devices_access()?;
    check_uinput_access()?;
    log_current_user();

    info!("Проверка прав доступа завершена успешно");
    Ok(())
}

fn check_input_devices_access() -> Result<()> {
    let input_dir = "/dev/input";

    if !std::path::Path::new(input_dir).exists() {
        return Err(PasteError::Permission(format!(
            "Директория {} не существует",
            input_dir
        )));
    }

    match fs::read_dir(input_dir) {
        Ok(_) => {
            info!("Доступ к {} подтвержден", input_dir);
            Ok(())
        }
        Err(e) => Err(PasteError::Permission(format!(
            "Нет доступа к {}: {}. Добавьте пользователя в группу 'input' или запустите через sudo",
            input_dir, e
        ))),
    }
}

fn check_uinput_access() -> Result<()> {
    let uinput_device = "/dev/uinput";

    if !std::path::Path::new(uinput_device).exists() {
        return Err(PasteError::Permission(format!(
            "{} не существует. Загрузите модуль: sudo modprobe uinput",
            uinput_device
        )));
    }

    match fs::metadata(uinput_device) {
        Ok(metadata) => {
            let mode = metadata.permissions().mode();

            // Обычно 660 или 666
            if mode & 0o006 == 0 && mode & 0o060 == 0 {
                return Err(PasteError::Permission(format!(
                    "Нет прав доступа к {}. Добавьте пользователя в группу 'uinput' или 'input'",
                    uinput_device
                )));
            }

            info!("Доступ к {} подтвержден", uinput_device);
            Ok(())
        }
        Err(e) => Err(PasteError::Permission(format!(
            "Не удалось проверить права доступа к {}: {}",
            uinput_device, e
        ))),
    }
}

fn log_current_user() {
    match std::env::var("USER") {
        Ok(user) => info!("Приложение запущено от имени пользователя: {}", user),
        Err(_) => warn!("Не удалось определить пользователя"),
    }
}
