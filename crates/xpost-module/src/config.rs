use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PostError, PostResult};

/// Ten minutes, in nanoseconds.
const DEFAULT_TIMEOUT_OFFSET_NS: u64 = 10 * 60 * 1_000_000_000;

/// Configuration for the post module.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleConfig {
    /// Port the module binds to.
    pub port_id: String,
    /// Channel version the module speaks.
    pub version: String,
    /// Offset added to the current time when a send message leaves its
    /// timeout timestamp at zero.
    pub default_timeout_timestamp_offset: u64,
    /// Maximum title length in bytes.
    pub max_title_len: usize,
    /// Maximum content length in bytes.
    pub max_content_len: usize,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            port_id: "blog".into(),
            version: "blog-1".into(),
            default_timeout_timestamp_offset: DEFAULT_TIMEOUT_OFFSET_NS,
            max_title_len: 256,
            max_content_len: 8192,
        }
    }
}

impl ModuleConfig {
    /// Parse a TOML document. Missing keys take their default values.
    pub fn from_toml_str(s: &str) -> PostResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| PostError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> PostResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| PostError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> PostResult<()> {
        if self.port_id.trim().is_empty() {
            return Err(PostError::Config("port_id must not be empty".into()));
        }
        if self.version.trim().is_empty() {
            return Err(PostError::Config("version must not be empty".into()));
        }
        if self.default_timeout_timestamp_offset == 0 {
            return Err(PostError::Config(
                "default_timeout_timestamp_offset must be positive".into(),
            ));
        }
        if self.max_title_len == 0 || self.max_content_len == 0 {
            return Err(PostError::Config("length limits must be positive".into()));
        }
        Ok(())
    }
}
