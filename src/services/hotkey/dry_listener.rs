use std::sync::Arc;
use tracing::{debug, info};

use crate::config::Settings;
use crate::error::Result;

use super::r#trait::HotkeyListenerTrait;

pub struct DryRunHotkeyListener {
    settings: Arc<Settings>,
}

impl DryRunHotkeyListener {
    pub fn new(settings: Arc<Settings>) -> Self {
        info!("Инициализация DryRunHotkeyListener");
        Self { settings }
    }

    async fn run_impl(self) -> Result<()> {
        info!(
            "Dry-run режим - слушатель эмулирует комбинацию '{}'",
            self.settings.hotkey
        );

        loop {
            tokio::time::sleep(tokio::time::Duration::from_secs(5)).await;
            debug!("HotkeyListener работает в dry-run режиме");
        }
    }
}

#[async_trait::async_trait]
impl HotkeyListenerTrait for DryRunHotkeyListener {
    async fn run(self: Box<Self>) -> Result<()> {
        (*self).run_impl().await
    }
}
