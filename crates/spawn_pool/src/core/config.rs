//! # Runtime Configuration
//!
//! Configuration consumed once at host startup: engine-level settings such as
//! the log filter, and the list of object pools to create before gameplay
//! starts.
//!
//! ## Example (TOML)
//!
//! ```toml
//! [engine]
//! log_level = "debug"
//!
//! [[pools]]
//! tag = "bullet"
//! prefab = "bullet"
//! count = 32
//! ```

use serde::{Serialize, Deserialize};
use std::collections::HashSet;

pub use crate::config::{Config, ConfigError};

/// # Engine Configuration
///
/// Core behavior configuration shared by the whole runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Default log filter (overridden by `RUST_LOG`)
    pub log_level: String,
    /// Target FPS for frame rate limiting
    pub target_fps: Option<u32>,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            target_fps: None, // Unlimited by default
        }
    }
    
    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
    
    /// Set target FPS
    pub fn with_target_fps(mut self, fps: u32) -> Self {
        self.target_fps = Some(fps);
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Pool Configuration
///
/// One entry of the startup pool list: the tag gameplay code will request,
/// the name of the prefab the host instantiates copies of, and how many
/// copies to create up front.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// The tag that the objects will be stored under
    pub tag: String,
    /// The prefab to spawn copies of
    pub prefab: String,
    /// The number of objects to spawn when the game starts
    #[serde(default)]
    pub count: usize,
}

impl PoolConfig {
    /// Create a pool entry
    pub fn new(tag: impl Into<String>, prefab: impl Into<String>, count: usize) -> Self {
        Self {
            tag: tag.into(),
            prefab: prefab.into(),
            count,
        }
    }
}

/// # Complete Runtime Configuration
///
/// Top-level configuration applications load at startup.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Engine core configuration
    pub engine: EngineConfig,
    /// Pools created at startup, in order
    pub pools: Vec<PoolConfig>,
}

impl RuntimeConfig {
    /// Add a pool entry (builder style)
    pub fn with_pool(mut self, pool: PoolConfig) -> Self {
        self.pools.push(pool);
        self
    }

    /// Validate the configuration
    ///
    /// Empty tags and prefab names are rejected. Duplicate tags are allowed
    /// here: the pool manager keeps the first one and warns about the rest.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (index, pool) in self.pools.iter().enumerate() {
            if pool.tag.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("pool #{index} has an empty tag")));
            }
            if pool.prefab.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "pool '{}' has an empty prefab name",
                    pool.tag
                )));
            }
        }
        Ok(())
    }

    /// Tags that appear more than once, in first-duplicate order
    pub fn duplicate_tags(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for pool in &self.pools {
            if !seen.insert(pool.tag.as_str()) && !duplicates.contains(&pool.tag.as_str()) {
                duplicates.push(pool.tag.as_str());
            }
        }
        duplicates
    }
}

impl Config for RuntimeConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_TOML: &str = r#"
[engine]
log_level = "debug"

[[pools]]
tag = "bullet"
prefab = "bullet"
count = 3

[[pools]]
tag = "spark"
prefab = "spark_fx"
"#;

    #[test]
    fn test_parse_toml() {
        let config = RuntimeConfig::from_toml_str(SAMPLE_TOML).unwrap();

        assert_eq!(config.engine.log_level, "debug");
        assert_eq!(config.engine.target_fps, None);
        assert_eq!(config.pools.len(), 2);
        assert_eq!(config.pools[0], PoolConfig::new("bullet", "bullet", 3));
        // Missing count falls back to zero
        assert_eq!(config.pools[1], PoolConfig::new("spark", "spark_fx", 0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_ron() {
        let text = r#"(
            engine: (log_level: "warn", target_fps: Some(60)),
            pools: [(tag: "rock", prefab: "asteroid", count: 8)],
        )"#;
        let config = RuntimeConfig::from_ron_str(text).unwrap();

        assert_eq!(config.engine, EngineConfig::new().with_log_level("warn").with_target_fps(60));
        assert_eq!(config.pools, vec![PoolConfig::new("rock", "asteroid", 8)]);
    }

    #[test]
    fn test_toml_text_survives_reload() {
        let config = RuntimeConfig::default()
            .with_pool(PoolConfig::new("bullet", "bullet", 16));
        let text = config.to_toml_string().unwrap();
        assert_eq!(RuntimeConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = RuntimeConfig::from_toml_str("").unwrap();
        assert_eq!(config, RuntimeConfig::default());
        assert_eq!(config.engine.log_level, "info");
    }

    #[test]
    fn test_validate_rejects_empty_tag() {
        let config = RuntimeConfig::default().with_pool(PoolConfig::new(" ", "bullet", 1));
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_empty_prefab() {
        let config = RuntimeConfig::default().with_pool(PoolConfig::new("bullet", "", 1));
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_duplicate_tags() {
        let config = RuntimeConfig::default()
            .with_pool(PoolConfig::new("a", "p", 1))
            .with_pool(PoolConfig::new("b", "p", 1))
            .with_pool(PoolConfig::new("a", "p", 2))
            .with_pool(PoolConfig::new("a", "p", 3));
        assert_eq!(config.duplicate_tags(), vec!["a"]);
    }

    #[test]
    fn test_missing_file_reports_io() {
        let err = RuntimeConfig::load_from_file("does/not/exist/pools.yaml").unwrap_err();
        // The file is read before its extension is looked at
        assert!(matches!(err, ConfigError::Io(_)));
    }

    const DEMO_TOML: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../bullet_app/config/pools.toml");
    const DEMO_RON: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../bullet_app/config/pools.ron");

    #[test]
    fn test_load_demo_toml() {
        let config = RuntimeConfig::load_from_file(DEMO_TOML).unwrap();

        assert_eq!(config.engine.log_level, "info");
        assert_eq!(config.engine.target_fps, Some(60));
        assert_eq!(
            config.pools,
            vec![
                PoolConfig::new("bullet", "bullet", 24),
                PoolConfig::new("spark", "spark", 16),
                PoolConfig::new("asteroid", "asteroid", 4),
            ]
        );
        assert!(config.validate().is_ok());
        assert!(config.duplicate_tags().is_empty());
    }

    #[test]
    fn test_load_demo_ron() {
        let config = RuntimeConfig::load_from_file(DEMO_RON).unwrap();

        assert_eq!(config.engine, EngineConfig::new().with_log_level("debug").with_target_fps(30));
        assert_eq!(
            config.pools,
            vec![PoolConfig::new("bullet", "bullet", 12), PoolConfig::new("spark", "spark", 8)]
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_existing_file_with_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pools.yaml");
        std::fs::write(&path, "pools: []").unwrap();

        let err = RuntimeConfig::load_from_file(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_save_then_load_both_formats() {
        let dir = tempfile::tempdir().unwrap();
        let config = RuntimeConfig {
            engine: EngineConfig::new().with_log_level("warn").with_target_fps(120),
            pools: vec![PoolConfig::new("bullet", "bullet", 32), PoolConfig::new("rock", "asteroid", 6)],
        };

        for name in ["pools.toml", "pools.ron"] {
            let path = dir.path().join(name);
            let path = path.to_str().unwrap();
            config.save_to_file(path).unwrap();
            assert_eq!(RuntimeConfig::load_from_file(path).unwrap(), config, "{name}");
        }
    }

    #[test]
    fn test_save_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pools.json");

        let err = RuntimeConfig::default().save_to_file(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
        assert!(!path.exists());
    }
}
