use crate::error::Result;
use crate::events::WindowId;

use super::r#trait::FocusProbe;

/// Эмуляция зонда: фокус никогда не меняется
pub struct DryRunProbe;

impl DryRunProbe {
    pub fn new() -> Self {
        Self
    }
}

impl FocusProbe for DryRunProbe {
    fn active_window(&self) -> Result<WindowId> {
        Ok(WindowId::new("dry-run-window"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dry_run_probe_is_stable() {
        let probe = DryRunProbe::new();
        assert_eq!(
            probe.active_window().unwrap(),
            probe.active_window().unwrap()
        );
    }
}
