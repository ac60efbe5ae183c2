use crate::core::{ChannelDefinition, NotificationHost, PlatformChannel};
use crate::utils::error::{RegistryError, Result};
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Exists(String),
    Create(String),
    Update(String),
}

#[derive(Debug, Default)]
struct HostState {
    channels: BTreeMap<String, PlatformChannel>,
    calls: Vec<HostCall>,
    rejected: HashSet<String>,
}

/// In-process notification platform.
///
/// Clones share the same state, so a test can keep a handle after giving
/// one to the registry.
#[derive(Debug, Clone)]
pub struct InMemoryNotificationHost {
    api_level: u32,
    state: Arc<Mutex<HostState>>,
}

impl InMemoryNotificationHost {
    pub fn new(api_level: u32) -> Self {
        Self {
            api_level,
            state: Arc::new(Mutex::new(HostState::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HostState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// 模擬平台拒絕某個頻道
    pub fn reject(&self, id: &str) {
        self.lock().rejected.insert(id.to_string());
    }

    pub fn allow(&self, id: &str) {
        self.lock().rejected.remove(id);
    }

    pub fn channel(&self, id: &str) -> Option<PlatformChannel> {
        self.lock().channels.get(id).cloned()
    }

    pub fn channels(&self) -> Vec<PlatformChannel> {
        self.lock().channels.values().cloned().collect()
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.lock().calls.clone()
    }

    pub fn create_count(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| matches!(c, HostCall::Create(_)))
            .count()
    }

    pub fn update_count(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| matches!(c, HostCall::Update(_)))
            .count()
    }
}

impl NotificationHost for InMemoryNotificationHost {
    fn api_level(&self) -> u32 {
        self.api_level
    }

    fn channel_exists(&self, id: &str) -> bool {
        let mut state = self.lock();
        state.calls.push(HostCall::Exists(id.to_string()));
        state.channels.contains_key(id)
    }

    fn create_channel(&self, definition: &ChannelDefinition) -> Result<()> {
        if !self.supports_channels() {
            return Err(RegistryError::UnsupportedPlatform);
        }

        let mut state = self.lock();
        state.calls.push(HostCall::Create(definition.id().to_string()));
        if state.rejected.contains(definition.id()) {
            return Err(RegistryError::rejected(
                definition.id(),
                "channel blocked by platform",
            ));
        }

        // 已存在的頻道只會更新名稱與描述
        state
            .channels
            .entry(definition.id().to_string())
            .and_modify(|existing| {
                existing.apply_update(definition.display_name(), definition.description())
            })
            .or_insert_with(|| PlatformChannel::from_definition(definition));
        Ok(())
    }

    fn update_channel(&self, id: &str, display_name: &str, description: &str) -> Result<()> {
        if !self.supports_channels() {
            return Err(RegistryError::UnsupportedPlatform);
        }

        let mut state = self.lock();
        state.calls.push(HostCall::Update(id.to_string()));
        if state.rejected.contains(id) {
            return Err(RegistryError::rejected(id, "channel blocked by platform"));
        }

        let channel = state
            .channels
            .get_mut(id)
            .ok_or_else(|| RegistryError::rejected(id, "no such channel"))?;
        channel.apply_update(display_name, description);
        Ok(())
    }
}
