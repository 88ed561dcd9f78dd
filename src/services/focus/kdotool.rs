use std::collections::HashMap;
use std::process::Command;
use tracing::debug;

use crate::error::{PasteError, Result};
use crate::events::WindowId;

use super::r#trait::FocusProbe;

pub struct KdotoolProbe;

// Процесс запускается с повышенными правами; когда мы под sudo, kdotool должен
// обращаться к сессионной шине обычного пользователя
fn build_env_overrides() -> HashMap<String, String> {
    let mut env_vars = HashMap::new();

    if std::env::var("USER").unwrap_or_default() == "root" {
        if let Ok(sudo_user) = std::env::var("SUDO_USER") {
            if let Ok(output) = Command::new("id").args(["-u", &sudo_user]).output() {
                if let Ok(uid_str) = String::from_utf8(output.stdout) {
                    let uid = uid_str.trim();
                    let user_runtime_dir = format!("/run/user/{}", uid);
                    let dbus_address = format!("unix:path={}/bus", user_runtime_dir);

                    debug!(
                        "Подставляем переменные окружения для пользователя {}: uid={}",
                        sudo_user, uid
                    );
                    env_vars.insert("DBUS_SESSION_BUS_ADDRESS".to_string(), dbus_address);
                    env_vars.insert("XDG_RUNTIME_DIR".to_string(), user_runtime_dir);
                    env_vars.insert("USER".to_string(), sudo_user);
                }
            }
        }
    }

    if let Ok(display_var) = std::env::var("DISPLAY") {
        env_vars.insert("DISPLAY".to_string(), display_var);
    }

    env_vars
}

impl KdotoolProbe {
    pub fn new() -> Self {
        Self
    }

    fn create_command(args: &[&str]) -> Command {
        let mut cmd = if let Ok(sudo_user) = std::env::var("SUDO_USER") {
            let mut cmd = Command::new("sudo");
            cmd.args(["-E", "-u", &sudo_user, "kdotool"]);
            cmd.args(args);
            cmd
        } else {
            let mut cmd = Command::new("kdotool");
            cmd.args(args);
            cmd
        };

        for (key, value) in build_env_overrides() {
            cmd.env(key, value);
        }

        cmd
    }

    pub fn test(&self) -> Result<()> {
        let output = Self::create_command(&["getactivewindow"]).output()?;
        if !output.status.success() {
            debug!(
                "kdotool getactivewindow failed: {}",
                String::from_utf8_lossy(&output.stderr)
            );
            return Err(PasteError::Internal(
                "kdotool getactivewindow failed".to_string(),
            ));
        }
        Ok(())
    }
}

impl FocusProbe for KdotoolProbe {
    fn active_window(&self) -> Result<WindowId> {
        let output = Self::create_command(&["getactivewindow"])
            .output()
            .map_err(|e| PasteError::Internal(format!("kdotool не найден: {}", e)))?;

        if !output.status.success() {
            return Err(PasteError::Internal(
                "kdotool getactivewindow failed".to_string(),
            ));
        }

        let id = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if id.is_empty() {
            return Err(PasteError::Internal(
                "kdotool вернул пустой идентификатор окна".to_string(),
            ));
        }

        debug!("kdotool: окно в фокусе {}", id);
        Ok(WindowId::new(id))
    }
}
