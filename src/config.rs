use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::ConfigurationError;
use crate::model::ModelRegistry;

/// Runtime settings for feature callbacks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Maximum number of candidates generated for a unique random column
    /// before the save fails (default: 1000)
    #[serde(default = "default_random_max_attempts")]
    pub random_max_attempts: u32,
}

fn default_random_max_attempts() -> u32 {
    1000
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            random_max_attempts: default_random_max_attempts(),
        }
    }
}

/// Column features declared in a TOML file
///
/// ```toml
/// [settings]
/// random_max_attempts = 50
///
/// [[class]]
/// name = "User"
///
/// [[class.column]]
/// name = "created_at"
/// feature = "date_created"
///
/// [[class.column]]
/// name = "token"
/// feature = "random"
/// charset = "alphanumeric"
/// length = 12
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureManifest {
    /// Settings to install; without a `[settings]` table the registry keeps
    /// its own
    #[serde(default)]
    pub settings: Option<Settings>,
    #[serde(default, rename = "class")]
    pub classes: Vec<ClassManifest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassManifest {
    pub name: String,
    /// Table the class maps to (default: the pluralized, underscored class name)
    #[serde(default)]
    pub table: Option<String>,
    #[serde(default, rename = "column")]
    pub columns: Vec<ColumnManifest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnManifest {
    pub name: String,
    pub feature: FeatureName,
    /// Name used in validation messages
    #[serde(default)]
    pub display_name: Option<String>,
    /// Charset kind, random columns only
    #[serde(default)]
    pub charset: Option<String>,
    /// String length, random columns only
    #[serde(default)]
    pub length: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureName {
    DateCreated,
    DateUpdated,
    Email,
    Link,
    Random,
}

impl FeatureManifest {
    pub fn load(path: &Path) -> Result<Self, ConfigurationError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigurationError::Manifest(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigurationError> {
        toml::from_str(content).map_err(|e| ConfigurationError::Manifest(e.to_string()))
    }

    /// Configures every declared column on the registry and installs the
    /// manifest's settings, if it has any. Stops at the first configuration
    /// error.
    pub fn apply(&self, registry: &mut ModelRegistry) -> Result<(), ConfigurationError> {
        if let Some(settings) = &self.settings {
            registry.set_settings(settings.clone());
        }

        for class in &self.classes {
            if let Some(table) = &class.table {
                registry.map_class(&class.name, table);
            }

            for column in &class.columns {
                if let Some(display_name) = &column.display_name {
                    registry.set_column_name(&class.name, &column.name, display_name);
                }
                match column.feature {
                    FeatureName::DateCreated => {
                        registry.configure_date_created_column(&class.name, &column.name)?
                    }
                    FeatureName::DateUpdated => {
                        registry.configure_date_updated_column(&class.name, &column.name)?
                    }
                    FeatureName::Email => {
                        registry.configure_email_column(&class.name, &column.name)?
                    }
                    FeatureName::Link => registry.configure_link_column(&class.name, &column.name)?,
                    FeatureName::Random => {
                        let charset = column.charset.as_deref().ok_or_else(|| {
                            ConfigurationError::Manifest(format!(
                                "Random column {}.{} needs a charset",
                                class.name, column.name
                            ))
                        })?;
                        let length = column.length.ok_or_else(|| {
                            ConfigurationError::Manifest(format!(
                                "Random column {}.{} needs a length",
                                class.name, column.name
                            ))
                        })?;
                        registry.configure_random_column(
                            &class.name,
                            &column.name,
                            charset,
                            length,
                        )?
                    }
                }
            }

            info!(
                "Applied {} column feature(s) for {}",
                class.columns.len(),
                class.name
            );
        }

        Ok(())
    }
}
