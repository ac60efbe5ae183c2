use crate::core::{ChannelDefinition, NotificationHost, PlatformChannel};
use crate::utils::error::{RegistryError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Serialize, Deserialize)]
struct ChannelState {
    channels: BTreeMap<String, PlatformChannel>,
}

/// Notification platform whose channels live in a JSON file.
///
/// Channels outlive the process the way platform channels do, so a second
/// run against the same file finds them already present.
#[derive(Debug, Clone)]
pub struct FileNotificationHost {
    path: PathBuf,
    api_level: u32,
}

impl FileNotificationHost {
    pub fn new<P: AsRef<Path>>(path: P, api_level: u32) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            api_level,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn channel(&self, id: &str) -> Result<Option<PlatformChannel>> {
        Ok(self.load_state()?.channels.remove(id))
    }

    pub fn channels(&self) -> Result<Vec<PlatformChannel>> {
        Ok(self.load_state()?.channels.into_values().collect())
    }

    fn load_state(&self) -> Result<ChannelState> {
        if !self.path.exists() {
            return Ok(ChannelState::default());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(ChannelState::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn save_state(&self, state: &ChannelState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(state)?;
        fs::write(&self.path, json)?;
        tracing::debug!("Channel state written to {}", self.path.display());
        Ok(())
    }

    /// 讀寫失敗對 registry 而言就是平台拒絕
    fn modify<F>(&self, id: &str, apply: F) -> Result<()>
    where
        F: FnOnce(&mut ChannelState) -> Result<()>,
    {
        let outcome = self.load_state().and_then(|mut state| {
            apply(&mut state)?;
            self.save_state(&state)
        });

        outcome.map_err(|e| match e {
            RegistryError::PlatformRejected { .. } | RegistryError::UnsupportedPlatform => e,
            other => RegistryError::rejected(id, other.to_string()),
        })
    }
}

impl NotificationHost for FileNotificationHost {
    fn api_level(&self) -> u32 {
        self.api_level
    }

    fn channel_exists(&self, id: &str) -> bool {
        match self.load_state() {
            Ok(state) => state.channels.contains_key(id),
            Err(e) => {
                tracing::warn!(
                    "Could not read channel state from {}: {}",
                    self.path.display(),
                    e
                );
                false
            }
        }
    }

    fn create_channel(&self, definition: &ChannelDefinition) -> Result<()> {
        if !self.supports_channels() {
            return Err(RegistryError::UnsupportedPlatform);
        }

        self.modify(definition.id(), |state| {
            state
                .channels
                .entry(definition.id().to_string())
                .and_modify(|existing| {
                    existing.apply_update(definition.display_name(), definition.description())
                })
                .or_insert_with(|| PlatformChannel::from_definition(definition));
            Ok(())
        })
    }

    fn update_channel(&self, id: &str, display_name: &str, description: &str) -> Result<()> {
        if !self.supports_channels() {
            return Err(RegistryError::UnsupportedPlatform);
        }

        self.modify(id, |state| {
            let channel = state
                .channels
                .get_mut(id)
                .ok_or_else(|| RegistryError::rejected(id, "no such channel"))?;
            channel.apply_update(display_name, description);
            Ok(())
        })
    }
}
