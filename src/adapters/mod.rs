// Adapters layer: concrete notification platforms behind the NotificationHost port.

pub mod file;
pub mod memory;

pub use file::FileNotificationHost;
pub use memory::{HostCall, InMemoryNotificationHost};
