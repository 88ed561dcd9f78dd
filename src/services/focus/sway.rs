use std::process::Command;
use tracing::debug;

use crate::error::{PasteError, Result};
use crate::events::WindowId;

use super::r#trait::FocusProbe;

pub struct SwayProbe;

impl SwayProbe {
    pub fn new() -> Self {
        Self
    }

    pub fn test(&self) -> Result<()> {
        let output = Command::new("swaymsg").args(["-t", "get_tree"]).output()?;
        if output.status.success() {
            Ok(())
        } else {
            Err(PasteError::Internal("swaymsg failed".to_string()))
        }
    }

    /// Рекурсивный поиск узла с "focused": true в дереве контейнеров
    fn find_focused(node: &serde_json::Value) -> Option<i64> {
        if node.get("focused").and_then(|v| v.as_bool()) == Some(true) {
            return node.get("id").and_then(|v| v.as_i64());
        }

        for key in ["nodes", "floating_nodes"] {
            if let Some(children) = node.get(key).and_then(|v| v.as_array()) {
                for child in children {
                    if let Some(id) = Self::find_focused(child) {
                        return Some(id);
                    }
                }
            }
        }

        None
    }
}

impl FocusProbe for SwayProbe {
    fn active_window(&self) -> Result<WindowId> {
        let output = Command::new("swaymsg")
            .args(["-t", "get_tree"])
            .output()
            .map_err(|e| PasteError::Internal(format!("swaymsg не найден: {}", e)))?;

        if !output.status.success() {
            return Err(PasteError::Internal("swaymsg вернул ошибку".to_string()));
        }

        let tree: serde_json::Value = serde_json::from_slice(&output.stdout)
            .map_err(|e| PasteError::Internal(format!("Не удалось разобрать дерево sway: {}", e)))?;

        match Self::find_focused(&tree) {
            Some(id) => {
                debug!("sway: контейнер в фокусе {}", id);
                Ok(WindowId::new(id.to_string()))
            }
            None => Err(PasteError::Internal(
                "Контейнер в фокусе в Sway не найден".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_focused_in_nested_tree() {
        let tree: serde_json::Value = serde_json::from_str(
            r#"{
                "id": 1,
                "focused": false,
                "nodes": [
                    {"id": 2, "focused": false, "nodes": []},
                    {"id": 3, "focused": false, "nodes": [
                        {"id": 7, "focused": true, "nodes": []}
                    ]}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(SwayProbe::find_focused(&tree), Some(7));
    }

    #[test]
    fn test_find_focused_in_floating_nodes() {
        let tree: serde_json::Value = serde_json::from_str(
            r#"{
                "id": 1,
                "nodes": [],
                "floating_nodes": [{"id": 12, "focused": true}]
            }"#,
        )
        .unwrap();

        assert_eq!(SwayProbe::find_focused(&tree), Some(12));
    }

    #[test]
    fn test_find_focused_none() {
        let tree: serde_json::Value =
            serde_json::from_str(r#"{"id": 1, "focused": false, "nodes": []}"#).unwrap();
        assert_eq!(SwayProbe::find_focused(&tree), None);
    }
}
