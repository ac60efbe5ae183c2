pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::{FileNotificationHost, InMemoryNotificationHost};
pub use crate::config::toml_config::ChannelManifest;
pub use crate::core::bootstrap::{configure_channels, BootstrapReport};
pub use crate::core::{ChannelDefinition, ChannelRegistry, Importance, NotificationHost, Registration};
pub use crate::utils::error::{RegistryError, Result};
