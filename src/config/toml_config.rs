use crate::core::{ChannelDefinition, Importance};
use crate::utils::error::{RegistryError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_range, validate_unique_ids, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_API_LEVEL: u32 = 34;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelManifest {
    pub app: AppConfig,
    pub platform: Option<PlatformConfig>,
    #[serde(default)]
    pub channels: Vec<ChannelConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    pub api_level: Option<u32>,
    pub state_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub importance: Importance,
}

impl ChannelConfig {
    pub fn to_definition(&self) -> ChannelDefinition {
        ChannelDefinition::new(&self.id, &self.name, self.importance)
            .with_description(self.description.clone().unwrap_or_default())
    }
}

impl ChannelManifest {
    /// 未提供 manifest 時使用的內建設定
    pub fn builtin() -> Self {
        let channel = ChannelDefinition::high_importance();
        Self {
            app: AppConfig {
                name: "channel-registry".to_string(),
                description: None,
            },
            platform: None,
            channels: vec![ChannelConfig {
                id: channel.id().to_string(),
                name: channel.display_name().to_string(),
                description: Some(channel.description().to_string()),
                importance: channel.importance(),
            }],
        }
    }

    /// 從 TOML 檔案載入設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(RegistryError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析設定
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| RegistryError::ConfigError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CHANNEL_NAME})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| RegistryError::ConfigError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("app.name", &self.app.name)?;

        if self.channels.is_empty() {
            return Err(RegistryError::ConfigError {
                field: "channels".to_string(),
                message: "At least one channel must be declared".to_string(),
            });
        }

        for channel in &self.channels {
            channel.to_definition().validate()?;
        }
        validate_unique_ids("channels.id", self.channels.iter().map(|c| c.id.as_str()))?;

        if let Some(platform) = &self.platform {
            if let Some(level) = platform.api_level {
                validate_range("platform.api_level", level, 1, 100)?;
            }
            if let Some(state_file) = &platform.state_file {
                validate_path("platform.state_file", state_file)?;
            }
        }

        Ok(())
    }

    pub fn definitions(&self) -> Vec<ChannelDefinition> {
        self.channels.iter().map(ChannelConfig::to_definition).collect()
    }

    pub fn api_level(&self) -> u32 {
        self.platform
            .as_ref()
            .and_then(|p| p.api_level)
            .unwrap_or(DEFAULT_API_LEVEL)
    }

    pub fn state_file(&self) -> Option<&str> {
        self.platform.as_ref().and_then(|p| p.state_file.as_deref())
    }
}

impl Validate for ChannelManifest {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
