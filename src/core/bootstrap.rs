use crate::core::{ChannelDefinition, ChannelRegistry, NotificationHost, Registration};
use crate::utils::error::RegistryError;

/// 啟動時註冊頻道的結果，失敗不會中斷主程式
#[derive(Debug, Default)]
pub struct BootstrapReport {
    pub outcomes: Vec<(String, Registration)>,
    pub failures: Vec<(String, RegistryError)>,
}

impl BootstrapReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn created(&self) -> usize {
        self.count(Registration::Created)
    }

    pub fn count(&self, kind: Registration) -> usize {
        self.outcomes.iter().filter(|(_, r)| *r == kind).count()
    }

    pub fn failures(&self) -> &[(String, RegistryError)] {
        &self.failures
    }

    /// 最嚴重的失敗，用於決定結束代碼
    pub fn worst_failure(&self) -> Option<&RegistryError> {
        self.failures
            .iter()
            .map(|(_, e)| e)
            .max_by_key(|e| e.severity())
    }
}

/// Runs the host's channel configuration step.
///
/// Every definition is attempted in order. A failing channel is logged and
/// reported; the remaining channels are still registered.
pub fn configure_channels<H: NotificationHost>(
    registry: &mut ChannelRegistry<H>,
    definitions: &[ChannelDefinition],
) -> BootstrapReport {
    let mut report = BootstrapReport::default();

    for definition in definitions {
        match registry.register(definition) {
            Ok(registration) => {
                report
                    .outcomes
                    .push((definition.id().to_string(), registration));
            }
            Err(e) => {
                tracing::warn!(
                    "Channel '{}' not registered, notifications may not display with categorization: {}",
                    definition.id(),
                    e
                );
                report.failures.push((definition.id().to_string(), e));
            }
        }
    }

    tracing::debug!(
        "Channel configuration finished: {} ok, {} failed",
        report.outcomes.len(),
        report.failures.len()
    );
    report
}
