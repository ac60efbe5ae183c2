use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Notification channels are not supported on this platform")]
    UnsupportedPlatform,

    #[error("Invalid channel definition: {field} {reason}")]
    InvalidDefinition { field: String, reason: String },

    #[error("Platform rejected channel '{id}': {message}")]
    PlatformRejected { id: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigError { field: String, message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Platform,
    Definition,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RegistryError {
    pub fn invalid_definition(field: &str, reason: &str) -> Self {
        Self::InvalidDefinition {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn rejected(id: &str, message: impl Into<String>) -> Self {
        Self::PlatformRejected {
            id: id.to_string(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnsupportedPlatform | Self::PlatformRejected { .. } => ErrorCategory::Platform,
            Self::InvalidDefinition { .. } => ErrorCategory::Definition,
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnsupportedPlatform => ErrorSeverity::Low,
            Self::PlatformRejected { .. } => ErrorSeverity::Medium,
            Self::InvalidDefinition { .. }
            | Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::SerializationError(_) => ErrorSeverity::High,
            Self::IoError(_) => ErrorSeverity::Critical,
        }
    }

    /// 不支援通知頻道的平台視為成功
    pub fn is_non_fatal(&self) -> bool {
        matches!(self, Self::UnsupportedPlatform)
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::UnsupportedPlatform => {
                "No action needed; notifications will be shown without channel categories".to_string()
            }
            Self::InvalidDefinition { field, .. } => {
                format!("Provide a non-empty value for '{}' in the channel definition", field)
            }
            Self::PlatformRejected { id, .. } => format!(
                "Check the platform notification settings for '{}'; registration runs again on next startup",
                id
            ),
            Self::IoError(_) => "Check that the state file path exists and is writable".to_string(),
            Self::SerializationError(_) => {
                "The stored channel state is corrupt; remove the state file and restart".to_string()
            }
            Self::ConfigError { field, .. } | Self::InvalidConfigValueError { field, .. } => {
                format!("Fix '{}' in the channel manifest", field)
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::UnsupportedPlatform => {
                "This platform does not support notification channels".to_string()
            }
            Self::InvalidDefinition { field, reason } => {
                format!("Channel definition is invalid: {} {}", field, reason)
            }
            Self::PlatformRejected { id, message } => format!(
                "Notification channel '{}' could not be registered ({}); notifications may not be categorized",
                id, message
            ),
            Self::IoError(e) => format!("File access failed: {}", e),
            Self::SerializationError(e) => format!("Channel state could not be read: {}", e),
            Self::ConfigError { field, message } => {
                format!("Manifest problem in {}: {}", field, message)
            }
            Self::InvalidConfigValueError {
                field,
                value,
                reason,
            } => format!("Manifest value '{}' for {} is invalid: {}", value, field, reason),
        }
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;
