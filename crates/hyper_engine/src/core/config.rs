//! Configuration system
//!
//! All pool capacities are fixed at startup (the pools never grow), so they
//! come from configuration rather than code. Supports TOML and RON files,
//! selected by extension.

pub use serde::{Deserialize, Serialize};

/// Configuration trait
///
/// Implemented by every config struct in the engine; provides format-aware
/// load/save so applications can keep their settings in either TOML or RON.
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] when the file cannot be read,
    /// [`ConfigError::Parse`] on malformed content,
    /// [`ConfigError::UnsupportedFormat`] for an unknown extension.
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    ///
    /// # Errors
    ///
    /// [`ConfigError::Serialize`] when the value cannot be encoded,
    /// [`ConfigError::UnsupportedFormat`] for an unknown extension,
    /// [`ConfigError::Io`] when the file cannot be written.
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, Default::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Pool capacities for the renderer's resource registry
///
/// One entry per resource manager. Capacities are hard limits: a manager
/// whose pool fills up fails its create calls until something is destroyed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceRegistryConfig {
    /// Slot count of the shader pool
    pub shader_pool_capacity: usize,
    /// Slot count of the texture pool
    pub texture_pool_capacity: usize,
    /// Slot count of the shader-library pool
    pub library_pool_capacity: usize,
}

impl Default for ResourceRegistryConfig {
    fn default() -> Self {
        Self {
            shader_pool_capacity: 64,
            texture_pool_capacity: 256,
            library_pool_capacity: 16,
        }
    }
}

impl Config for ResourceRegistryConfig {}
