use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// Which backing store a context should be built against.
///
/// Chosen once at startup and threaded through every context
/// construction; there is no process-global selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provider {
    InMemory,
    EmbeddedRelational,
}

impl Default for Provider {
    fn default() -> Self {
        Self::InMemory
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub provider: Provider,
    /// Contexts opened with the same name see the same data on either
    /// provider. Lesson bodies are expected to pick a unique name per
    /// invocation; see [`unique_store_name`].
    pub store_name: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            provider: Provider::InMemory,
            store_name: "default".to_string(),
        }
    }
}

impl StoreConfig {
    pub fn new(provider: Provider, store_name: impl Into<String>) -> Self {
        Self {
            provider,
            store_name: store_name.into(),
        }
    }

    pub fn with_provider(mut self, provider: Provider) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_store_name(mut self, store_name: impl Into<String>) -> Self {
        self.store_name = store_name.into();
        self
    }

    /// File backing the embedded-relational provider, derived from the
    /// store name so that equal configs resolve to the same database.
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(format!("{}.db", self.store_name))
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.store_name.is_empty() {
            return Err("Store name cannot be empty".to_string());
        }

        if self.store_name.contains(std::path::MAIN_SEPARATOR) {
            return Err("Store name cannot contain path separators".to_string());
        }

        Ok(())
    }
}

/// A store name no other lesson invocation will collide with.
pub fn unique_store_name(prefix: &str) -> String {
    format!("{}_{}", prefix, Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.provider, Provider::InMemory);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_methods() {
        let config = StoreConfig::default()
            .with_provider(Provider::EmbeddedRelational)
            .with_store_name("lesson_tx");

        assert_eq!(config.provider, Provider::EmbeddedRelational);
        assert_eq!(config.store_name, "lesson_tx");
        assert_eq!(config.database_path(), PathBuf::from("lesson_tx.db"));
    }

    #[test]
    fn test_validate_rejects_bad_names() {
        let empty = StoreConfig::default().with_store_name("");
        assert!(empty.validate().is_err());

        let path = StoreConfig::default().with_store_name("a/b");
        assert!(path.validate().is_err());
    }

    #[test]
    fn test_unique_store_name_is_unique() {
        let a = unique_store_name("lesson");
        let b = unique_store_name("lesson");
        assert!(a.starts_with("lesson_"));
        assert_ne!(a, b);
    }
}
