pub mod bootstrap;
pub mod registry;

pub use crate::core::registry::ChannelRegistry;
pub use crate::domain::model::{ChannelDefinition, Importance, PlatformChannel, Registration};
pub use crate::domain::ports::{NotificationHost, MIN_CHANNEL_API_LEVEL};
pub use crate::utils::error::Result;
