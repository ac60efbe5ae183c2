use crate::domain::model::ChannelDefinition;
use crate::utils::error::Result;

/// 從這個 API level 開始平台才有通知頻道
pub const MIN_CHANNEL_API_LEVEL: u32 = 26;

/// The platform's notification subsystem, as seen by the registry.
pub trait NotificationHost: Send + Sync {
    fn api_level(&self) -> u32;

    fn supports_channels(&self) -> bool {
        self.api_level() >= MIN_CHANNEL_API_LEVEL
    }

    fn channel_exists(&self, id: &str) -> bool;

    fn create_channel(&self, definition: &ChannelDefinition) -> Result<()>;

    /// Importance is not part of the update; platforms fix it at creation.
    fn update_channel(&self, id: &str, display_name: &str, description: &str) -> Result<()>;
}
