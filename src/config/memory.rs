//! Customer memory store configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Where customer profiles are kept
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemoryConfig {
    #[serde(default)]
    pub backend: MemoryBackend,

    /// Directory for the file backend
    pub directory: Option<PathBuf>,
}

/// Memory store backend
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MemoryBackend {
    /// Process-local, lost on restart
    #[default]
    Memory,
    /// One YAML file per customer
    File,
}

impl MemoryConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.backend == MemoryBackend::File && self.directory.is_none() {
            return Err(ValidationError::MissingMemoryDirectory);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_backend_default() {
        let config = MemoryConfig::default();
        assert_eq!(config.backend, MemoryBackend::Memory);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_file_backend_requires_directory() {
        let config = MemoryConfig {
            backend: MemoryBackend::File,
            directory: None,
        };
        assert_eq!(config.validate(), Err(ValidationError::MissingMemoryDirectory));
    }
}
