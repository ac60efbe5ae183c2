//! Process-lifetime registry of notification channels.
//!
//! The registry owns the set of channel ids it has already ensured and the
//! platform handle it registers them with. Hosts pass the registry to every
//! initialization hook that needs it; repeated calls are cheap and never
//! repeat platform work.

use crate::core::{ChannelDefinition, NotificationHost, Registration};
use crate::utils::error::{RegistryError, Result};
use crate::utils::validation::Validate;
use std::collections::HashMap;

pub struct ChannelRegistry<H: NotificationHost> {
    host: H,
    supported: bool,
    registered: HashMap<String, ChannelDefinition>,
}

impl<H: NotificationHost> ChannelRegistry<H> {
    /// 建立時判斷一次平台是否支援通知頻道
    pub fn new(host: H) -> Self {
        let supported = host.supports_channels();
        if supported {
            tracing::debug!("Notification channels supported (api level {})", host.api_level());
        } else {
            tracing::info!(
                "Notification channels not supported (api level {}), registration disabled",
                host.api_level()
            );
        }

        Self {
            host,
            supported,
            registered: HashMap::new(),
        }
    }

    pub fn is_supported(&self) -> bool {
        self.supported
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.registered.contains_key(id)
    }

    /// The definition this registry last applied for `id`.
    ///
    /// After an in-process update the importance is the one first registered here.
    /// After [`Registration::Refreshed`] it is the requested importance; the platform
    /// may still hold the one chosen by an earlier process.
    pub fn registered(&self, id: &str) -> Option<&ChannelDefinition> {
        self.registered.get(id)
    }

    pub fn registered_ids(&self) -> impl Iterator<Item = &str> {
        self.registered.keys().map(String::as_str)
    }

    pub fn ensure_registered(&mut self, definition: &ChannelDefinition) -> Result<()> {
        self.register(definition).map(|_| ())
    }

    /// Same as [`ensure_registered`](Self::ensure_registered), reporting what happened.
    pub fn register(&mut self, definition: &ChannelDefinition) -> Result<Registration> {
        definition.validate()?;

        if !self.supported {
            tracing::debug!("Skipping channel '{}': platform unsupported", definition.id());
            return Ok(Registration::Unsupported);
        }

        if let Some(existing) = self.registered.get(definition.id()).cloned() {
            return self.reconcile(existing, definition);
        }

        let id = definition.id();
        let outcome = if self.host.channel_exists(id) {
            self.host
                .update_channel(id, definition.display_name(), definition.description())
                .map(|_| Registration::Refreshed)
        } else {
            self.host.create_channel(definition).map(|_| Registration::Created)
        };

        match outcome {
            Ok(registration) => {
                tracing::info!(
                    "Notification channel '{}' {} (importance: {})",
                    id,
                    registration,
                    definition.importance()
                );
                self.registered.insert(id.to_string(), definition.clone());
                Ok(registration)
            }
            Err(RegistryError::UnsupportedPlatform) => {
                // 平台在呼叫時才回報不支援，之後一律略過
                tracing::info!("Platform reported channels unsupported while registering '{}'", id);
                self.supported = false;
                Ok(Registration::Unsupported)
            }
            Err(e) => {
                tracing::warn!("Failed to register notification channel '{}': {}", id, e);
                Err(e)
            }
        }
    }

    fn reconcile(
        &mut self,
        existing: ChannelDefinition,
        requested: &ChannelDefinition,
    ) -> Result<Registration> {
        if existing == *requested {
            tracing::debug!("Channel '{}' already registered", requested.id());
            return Ok(Registration::Unchanged);
        }

        if existing.importance() != requested.importance() {
            tracing::warn!(
                "Ignoring importance {} for channel '{}' (registered as {}): importance is fixed after creation",
                requested.importance(),
                requested.id(),
                existing.importance()
            );
        }

        if existing.same_mutable_attributes(requested) {
            return Ok(Registration::Unchanged);
        }

        let updated = self.host.update_channel(
            requested.id(),
            requested.display_name(),
            requested.description(),
        );
        match updated {
            Ok(()) => tracing::info!("Notification channel '{}' updated", requested.id()),
            Err(RegistryError::UnsupportedPlatform) => {
                tracing::info!(
                    "Platform reported channels unsupported while updating '{}'",
                    requested.id()
                );
                self.supported = false;
                return Ok(Registration::Unsupported);
            }
            Err(e) => {
                // 快取保留舊定義，下次呼叫會重新嘗試更新
                tracing::warn!("Failed to update notification channel '{}': {}", requested.id(), e);
                return Err(e);
            }
        }

        let in_force = requested.clone().with_importance(existing.importance());
        self.registered.insert(requested.id().to_string(), in_force);
        Ok(Registration::Updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Importance;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Exists(String),
        Create(String, Importance),
        Update(String, String),
    }

    #[derive(Clone, Default)]
    struct MockHost {
        api_level: u32,
        level_checks: Arc<AtomicUsize>,
        existing: Arc<Mutex<HashSet<String>>>,
        calls: Arc<Mutex<Vec<Call>>>,
        failures: Arc<Mutex<HashMap<String, RegistryError>>>,
    }

    impl MockHost {
        fn new(api_level: u32) -> Self {
            Self {
                api_level,
                ..Default::default()
            }
        }

        fn with_existing(self, id: &str) -> Self {
            self.existing.lock().unwrap().insert(id.to_string());
            self
        }

        fn fail_next(&self, id: &str, error: RegistryError) {
            self.failures.lock().unwrap().insert(id.to_string(), error);
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn creates(&self) -> usize {
            self.calls()
                .iter()
                .filter(|c| matches!(c, Call::Create(..)))
                .count()
        }

        fn updates(&self) -> usize {
            self.calls()
                .iter()
                .filter(|c| matches!(c, Call::Update(..)))
                .count()
        }
    }

    impl NotificationHost for MockHost {
        fn api_level(&self) -> u32 {
            self.level_checks.fetch_add(1, Ordering::SeqCst);
            self.api_level
        }

        fn channel_exists(&self, id: &str) -> bool {
            self.calls.lock().unwrap().push(Call::Exists(id.to_string()));
            self.existing.lock().unwrap().contains(id)
        }

        fn create_channel(&self, definition: &ChannelDefinition) -> Result<()> {
            if let Some(err) = self.failures.lock().unwrap().remove(definition.id()) {
                return Err(err);
            }
            self.calls.lock().unwrap().push(Call::Create(
                definition.id().to_string(),
                definition.importance(),
            ));
            self.existing.lock().unwrap().insert(definition.id().to_string());
            Ok(())
        }

        fn update_channel(&self, id: &str, display_name: &str, _description: &str) -> Result<()> {
            if let Some(err) = self.failures.lock().unwrap().remove(id) {
                return Err(err);
            }
            self.calls
                .lock()
                .unwrap()
                .push(Call::Update(id.to_string(), display_name.to_string()));
            Ok(())
        }
    }

    #[test]
    fn test_second_call_is_fast_path() {
        let host = MockHost::new(34);
        let mut registry = ChannelRegistry::new(host.clone());
        let channel = ChannelDefinition::high_importance();

        assert_eq!(registry.register(&channel).unwrap(), Registration::Created);
        assert_eq!(registry.register(&channel).unwrap(), Registration::Unchanged);

        assert_eq!(host.creates(), 1);
        assert_eq!(host.updates(), 0);
        assert_eq!(host.calls().len(), 2); // one exists check, one create
        assert!(registry.is_registered("high_importance_channel"));
    }

    #[test]
    fn test_invalid_definition_never_reaches_platform() {
        let host = MockHost::new(34);
        let mut registry = ChannelRegistry::new(host.clone());

        let no_id = ChannelDefinition::new("", "Alerts", Importance::High);
        let no_name = ChannelDefinition::new("alerts", "", Importance::High);

        assert!(matches!(
            registry.ensure_registered(&no_id),
            Err(RegistryError::InvalidDefinition { .. })
        ));
        assert!(matches!(
            registry.ensure_registered(&no_name),
            Err(RegistryError::InvalidDefinition { .. })
        ));
        assert!(host.calls().is_empty());
    }

    #[test]
    fn test_unsupported_platform_is_silent_success() {
        let host = MockHost::new(25);
        let mut registry = ChannelRegistry::new(host.clone());

        assert!(!registry.is_supported());
        assert!(registry
            .ensure_registered(&ChannelDefinition::high_importance())
            .is_ok());
        assert_eq!(
            registry
                .register(&ChannelDefinition::high_importance())
                .unwrap(),
            Registration::Unsupported
        );
        assert!(host.calls().is_empty());
        assert_eq!(registry.registered_ids().count(), 0);
    }

    #[test]
    fn test_support_evaluated_once() {
        let host = MockHost::new(30);
        let mut registry = ChannelRegistry::new(host.clone());
        let checks_after_new = host.level_checks.load(Ordering::SeqCst);

        for i in 0..5 {
            let channel = ChannelDefinition::new(format!("c{}", i), "Name", Importance::Low);
            registry.ensure_registered(&channel).unwrap();
        }

        assert_eq!(host.level_checks.load(Ordering::SeqCst), checks_after_new);
    }

    #[test]
    fn test_changed_name_updates_in_place() {
        let host = MockHost::new(34);
        let mut registry = ChannelRegistry::new(host.clone());
        let original = ChannelDefinition::high_importance();
        let renamed = ChannelDefinition::new(
            original.id(),
            "Urgent Alerts",
            original.importance(),
        )
        .with_description(original.description());

        registry.ensure_registered(&original).unwrap();
        assert_eq!(registry.register(&renamed).unwrap(), Registration::Updated);

        assert_eq!(host.creates(), 1);
        assert_eq!(
            host.calls().last(),
            Some(&Call::Update(
                "high_importance_channel".to_string(),
                "Urgent Alerts".to_string()
            ))
        );
        assert_eq!(
            registry
                .registered("high_importance_channel")
                .unwrap()
                .display_name(),
            "Urgent Alerts"
        );
    }

    #[test]
    fn test_importance_change_is_ignored() {
        let host = MockHost::new(34);
        let mut registry = ChannelRegistry::new(host.clone());
        let original = ChannelDefinition::high_importance();
        let quieter = original.clone().with_importance(Importance::Low);

        registry.ensure_registered(&original).unwrap();
        assert_eq!(registry.register(&quieter).unwrap(), Registration::Unchanged);

        assert_eq!(host.creates(), 1);
        assert_eq!(host.updates(), 0);
        assert_eq!(
            registry
                .registered("high_importance_channel")
                .unwrap()
                .importance(),
            Importance::High
        );
    }

    #[test]
    fn test_rename_with_importance_change_keeps_original_importance() {
        let host = MockHost::new(34);
        let mut registry = ChannelRegistry::new(host.clone());
        let original = ChannelDefinition::new("promo", "Promotions", Importance::Low);
        let changed = ChannelDefinition::new("promo", "Offers", Importance::Urgent);

        registry.ensure_registered(&original).unwrap();
        assert_eq!(registry.register(&changed).unwrap(), Registration::Updated);

        let in_force = registry.registered("promo").unwrap();
        assert_eq!(in_force.display_name(), "Offers");
        assert_eq!(in_force.importance(), Importance::Low);
    }

    #[test]
    fn test_existing_platform_channel_is_refreshed() {
        let host = MockHost::new(34).with_existing("high_importance_channel");
        let mut registry = ChannelRegistry::new(host.clone());

        assert_eq!(
            registry
                .register(&ChannelDefinition::high_importance())
                .unwrap(),
            Registration::Refreshed
        );
        assert_eq!(host.creates(), 0);
        assert_eq!(host.updates(), 1);
    }

    #[test]
    fn test_rejection_is_surfaced_and_not_cached() {
        let host = MockHost::new(34);
        host.fail_next(
            "high_importance_channel",
            RegistryError::rejected("high_importance_channel", "quota exceeded"),
        );
        let mut registry = ChannelRegistry::new(host.clone());
        let channel = ChannelDefinition::high_importance();

        assert!(matches!(
            registry.ensure_registered(&channel),
            Err(RegistryError::PlatformRejected { .. })
        ));
        assert!(!registry.is_registered(channel.id()));

        // 呼叫端再次呼叫時重新嘗試
        assert_eq!(registry.register(&channel).unwrap(), Registration::Created);
        assert_eq!(host.creates(), 1);
    }

    #[test]
    fn test_rejected_update_keeps_previous_definition() {
        let host = MockHost::new(34);
        let mut registry = ChannelRegistry::new(host.clone());
        let original = ChannelDefinition::high_importance();
        let changed = original.clone().with_description("Only the loudest alerts");

        registry.ensure_registered(&original).unwrap();
        host.fail_next(
            original.id(),
            RegistryError::rejected(original.id(), "quota exceeded"),
        );

        assert!(matches!(
            registry.register(&changed),
            Err(RegistryError::PlatformRejected { .. })
        ));
        assert_eq!(registry.registered(original.id()), Some(&original));
        assert_eq!(host.updates(), 0);

        assert_eq!(registry.register(&changed).unwrap(), Registration::Updated);
        assert_eq!(host.updates(), 1);
        assert_eq!(
            registry.registered(original.id()).unwrap().description(),
            "Only the loudest alerts"
        );
    }

    #[test]
    fn test_unsupported_reported_on_update_is_silent_success() {
        let host = MockHost::new(34);
        let mut registry = ChannelRegistry::new(host.clone());
        let original = ChannelDefinition::high_importance();
        let changed = original.clone().with_description("Changed description");

        registry.ensure_registered(&original).unwrap();
        host.fail_next(original.id(), RegistryError::UnsupportedPlatform);

        assert!(registry.ensure_registered(&changed).is_ok());
        assert!(!registry.is_supported());

        let calls_before = host.calls().len();
        assert_eq!(registry.register(&changed).unwrap(), Registration::Unsupported);
        assert_eq!(host.calls().len(), calls_before);
    }

    #[test]
    fn test_unsupported_reported_by_platform_disables_registry() {
        let host = MockHost::new(34);
        host.fail_next("first", RegistryError::UnsupportedPlatform);
        let mut registry = ChannelRegistry::new(host.clone());

        let first = ChannelDefinition::new("first", "First", Importance::Default);
        let second = ChannelDefinition::new("second", "Second", Importance::Default);

        assert_eq!(registry.register(&first).unwrap(), Registration::Unsupported);
        assert!(!registry.is_supported());
        let calls_before = host.calls().len();

        assert_eq!(registry.register(&second).unwrap(), Registration::Unsupported);
        assert_eq!(host.calls().len(), calls_before);
    }
}
