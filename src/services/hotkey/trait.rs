use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::Settings;
use crate::error::Result;
use crate::services::PasteController;

use super::dry_listener::DryRunHotkeyListener;
use super::listener::RealHotkeyListener;
use super::modifier_state::ModifierState;

/// Trait for hotkey listeners that can run in different modes
#[async_trait::async_trait]
pub trait HotkeyListenerTrait {
    /// Run the hotkey listener
    async fn run(self: Box<Self>) -> Result<()>;
}

/// Factory function to create an appropriate hotkey listener based on the dry_run flag
pub fn create_hotkey_listener(
    settings: Arc<Settings>,
    controller: Arc<PasteController>,
    modifier_state: Arc<RwLock<ModifierState>>,
    device_path: &str,
    dry_run: bool,
) -> Result<Box<dyn HotkeyListenerTrait + Send>> {
    if dry_run {
        Ok(Box::new(DryRunHotkeyListener::new(settings)))
    } else {
        Ok(Box::new(RealHotkeyListener::new(
            settings,
            controller,
            modifier_state,
            device_path,
        )?))
    }
}
