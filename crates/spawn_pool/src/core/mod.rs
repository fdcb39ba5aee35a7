//! # Core Module
//!
//! Shared configuration types consumed once at host startup.
//!
//! ## Organization
//!
//! - **Config**: Runtime configuration (engine settings and pool bootstrap list)

pub mod config;

pub use config::{
    RuntimeConfig,
    EngineConfig,
    PoolConfig,
    Config,
    ConfigError,
};
