use crate::utils::error::{RegistryError, Result};
use crate::utils::validation::{validate_definition_field, Validate};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const HIGH_IMPORTANCE_CHANNEL_ID: &str = "high_importance_channel";
pub const HIGH_IMPORTANCE_CHANNEL_NAME: &str = "High Importance Notifications";
pub const HIGH_IMPORTANCE_CHANNEL_DESCRIPTION: &str =
    "This channel is used for important notifications.";

/// 通知的打擾程度，建立後由平台固定
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Low,
    Default,
    High,
    #[serde(alias = "max")]
    Urgent,
}

impl Importance {
    /// 對應平台端的 importance 數值
    pub fn platform_level(self) -> i32 {
        match self {
            Importance::Low => 2,
            Importance::Default => 3,
            Importance::High => 4,
            Importance::Urgent => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Importance::Low => "low",
            Importance::Default => "default",
            Importance::High => "high",
            Importance::Urgent => "urgent",
        }
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Importance {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Importance::Low),
            "default" => Ok(Importance::Default),
            "high" => Ok(Importance::High),
            "urgent" | "max" => Ok(Importance::Urgent),
            other => Err(RegistryError::InvalidConfigValueError {
                field: "importance".to_string(),
                value: other.to_string(),
                reason: "Expected one of: low, default, high, urgent".to_string(),
            }),
        }
    }
}

/// A notification category as the application wants it to exist.
///
/// Built once during startup configuration and never changed afterwards;
/// the `with_*` methods return new values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelDefinition {
    id: String,
    display_name: String,
    #[serde(default)]
    description: String,
    importance: Importance,
}

impl ChannelDefinition {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        importance: Importance,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            description: String::new(),
            importance,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_importance(mut self, importance: Importance) -> Self {
        self.importance = importance;
        self
    }

    /// 應用程式啟動時註冊的預設高重要性頻道
    pub fn high_importance() -> Self {
        Self::new(
            HIGH_IMPORTANCE_CHANNEL_ID,
            HIGH_IMPORTANCE_CHANNEL_NAME,
            Importance::High,
        )
        .with_description(HIGH_IMPORTANCE_CHANNEL_DESCRIPTION)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn importance(&self) -> Importance {
        self.importance
    }

    /// Name and description are the attributes a platform lets us change after creation.
    pub fn same_mutable_attributes(&self, other: &ChannelDefinition) -> bool {
        self.display_name == other.display_name && self.description == other.description
    }
}

impl Validate for ChannelDefinition {
    fn validate(&self) -> Result<()> {
        validate_definition_field("id", &self.id)?;
        validate_definition_field("display_name", &self.display_name)?;
        Ok(())
    }
}

/// 平台端實際保存的頻道
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformChannel {
    pub id: String,
    pub display_name: String,
    pub description: String,
    pub importance: Importance,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl PlatformChannel {
    pub fn from_definition(definition: &ChannelDefinition) -> Self {
        Self {
            id: definition.id().to_string(),
            display_name: definition.display_name().to_string(),
            description: definition.description().to_string(),
            importance: definition.importance(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// 只更新名稱與描述，importance 保持建立時的值
    pub fn apply_update(&mut self, display_name: &str, description: &str) {
        self.display_name = display_name.to_string();
        self.description = description.to_string();
        self.updated_at = Some(Utc::now());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Created,
    /// The channel survived from an earlier process; name and description were re-applied.
    Refreshed,
    Updated,
    Unchanged,
    Unsupported,
}

impl Registration {
    pub fn touched_platform(self) -> bool {
        matches!(
            self,
            Registration::Created | Registration::Refreshed | Registration::Updated
        )
    }
}

impl fmt::Display for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Registration::Created => "created",
            Registration::Refreshed => "refreshed",
            Registration::Updated => "updated",
            Registration::Unchanged => "unchanged",
            Registration::Unsupported => "skipped (unsupported platform)",
        };
        f.write_str(label)
    }
}
