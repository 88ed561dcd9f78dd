use std::process::Command;
use tracing::debug;

use crate::error::{PasteError, Result};
use crate::events::WindowId;

use super::r#trait::FocusProbe;

pub struct XdotoolProbe;

impl XdotoolProbe {
    pub fn new() -> Self {
        Self
    }

    pub fn test(&self) -> Result<()> {
        let output = Command::new("xdotool").arg("getactivewindow").output()?;
        if output.status.success() {
            Ok(())
        } else {
            Err(PasteError::Internal("xdotool failed".to_string()))
        }
    }
}

impl FocusProbe for XdotoolProbe {
    fn active_window(&self) -> Result<WindowId> {
        let output = Command::new("xdotool")
            .arg("getactivewindow")
            .output()
            .map_err(|e| PasteError::Internal(format!("xdotool не найден: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PasteError::Internal(format!(
                "xdotool вернул ошибку: {}",
                stderr.trim()
            )));
        }

        let id = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if id.is_empty() {
            return Err(PasteError::Internal(
                "xdotool вернул пустой идентификатор окна".to_string(),
            ));
        }

        debug!("xdotool: окно в фокусе {}", id);
        Ok(WindowId::new(id))
    }
}
