//! Configuration system

pub use serde::{Deserialize, Serialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
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

    /// Invalid value
    #[error("Invalid value: {0}")]
    Invalid(String),
}

/// Pool capacities for the paint session arena.
///
/// Capacities bound the scratch memory of one session; they are allocated
/// once per session and never grow. An overloaded frame silently omits
/// primitives past the bound rather than reallocating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaintConfig {
    /// Maximum sprite primitives per frame
    pub sprite_capacity: usize,
    /// Maximum attached decorations per frame
    pub attached_capacity: usize,
    /// Maximum text labels per frame
    pub text_capacity: usize,
}

impl Default for PaintConfig {
    fn default() -> Self {
        Self {
            sprite_capacity: 4000,
            attached_capacity: 4000,
            text_capacity: 256,
        }
    }
}

impl PaintConfig {
    /// Validate that all capacities are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sprite_capacity == 0 {
            return Err(ConfigError::Invalid("sprite_capacity must be non-zero".into()));
        }
        if self.attached_capacity == 0 {
            return Err(ConfigError::Invalid("attached_capacity must be non-zero".into()));
        }
        if self.text_capacity == 0 {
            return Err(ConfigError::Invalid("text_capacity must be non-zero".into()));
        }
        Ok(())
    }
}

impl Config for PaintConfig {}
