//! # Spawn Pool
//!
//! Runtime conveniences for a frame-driven game host.
//!
//! ## Features
//!
//! - **Object Pooling**: Tagged pools of pre-instantiated entities recycled
//!   in round-robin order instead of being created and destroyed on demand
//! - **Function Timers**: One-shot deferred callbacks polled once per frame
//! - **Configuration**: Pools bootstrapped from TOML or RON at startup
//! - **Reference Host**: A small in-memory scene world implementing the
//!   host seams, for demos and tests
//!
//! ## Quick Start
//!
//! ```rust
//! use spawn_pool::prelude::*;
//!
//! let mut world = SceneWorld::new();
//! world.register_prefab(Prefab::new("bullet"));
//!
//! let config = RuntimeConfig::default().with_pool(PoolConfig::new("bullet", "bullet", 3));
//! let mut runtime = Runtime::from_config(world, &config).unwrap();
//!
//! let a = runtime.acquire("bullet").unwrap();
//! let b = runtime.acquire("bullet").unwrap();
//! let c = runtime.acquire("bullet").unwrap();
//! // The ring wraps around to the least recently handed out instance
//! assert_eq!(runtime.acquire("bullet"), Some(a));
//! assert_ne!(b, c);
//!
//! // Hand the bullet back after half a second of frame time
//! runtime.schedule_after(move |world: &mut SceneWorld| world.despawn(a), 0.5);
//! runtime.advance(0.5);
//! assert!(!runtime.host().is_active_object(a));
//! ```
//!
//! Pools never check whether the instance they hand out is still in use.
//! Size them for the peak number of concurrently live entities.

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core configuration
pub mod core;

pub mod foundation;
pub mod config;
pub mod pooling;
pub mod timers;
pub mod scene;

mod runtime;

pub use runtime::{Runtime, RuntimeError};

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        Runtime, RuntimeError,
        foundation::{
            math::{Vec3, Quat, Transform},
            time::FrameClock,
        },
        pooling::{EntityHost, ObjectPoolManager, PoolObject, PrototypeLibrary},
        timers::{FunctionTimerManager, TimerHandle, TimerScheduler},
        scene::{Behaviour, Prefab, SceneWorld},
        core::config::{Config, RuntimeConfig, EngineConfig, PoolConfig},
    };
}
