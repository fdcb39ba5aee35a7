//! Runtime context tying a host, its pools and its timers to the frame loop
//!
//! The runtime is the explicit stand-in for process-wide managers: the host
//! application creates one at startup, drives it once per frame, and hands
//! it (or borrows from it) wherever gameplay code needs pools or timers.

use crate::core::config::{ConfigError, RuntimeConfig};
use crate::foundation::math::{Quat, Vec3};
use crate::foundation::time::FrameClock;
use crate::pooling::{EntityHost, ObjectPoolManager, PoolError, PrototypeLibrary};
use crate::timers::{FunctionTimerManager, TimerHandle, TimerScheduler};
use thiserror::Error;

/// Errors raised while setting up a runtime
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Configuration failed validation
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Pool manager could not be created
    #[error("Pool error: {0}")]
    Pool(#[from] PoolError),
}

/// Host, pool manager, timers and frame clock in one place
pub struct Runtime<H: EntityHost> {
    host: H,
    pools: ObjectPoolManager<H>,
    timers: FunctionTimerManager<H>,
    clock: FrameClock,
}

impl<H: EntityHost> Runtime<H> {
    /// Wrap `host` with an empty pool manager and timer set
    pub fn new(mut host: H) -> Result<Self, RuntimeError> {
        let pools = ObjectPoolManager::new(&mut host)?;
        Ok(Self {
            host,
            pools,
            timers: FunctionTimerManager::new(),
            clock: FrameClock::new(),
        })
    }

    /// Borrow the host
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Borrow the host mutably
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Borrow the pool manager
    pub fn pools(&self) -> &ObjectPoolManager<H> {
        &self.pools
    }

    /// Borrow the pool manager together with the host it operates on
    pub fn pools_mut(&mut self) -> (&mut ObjectPoolManager<H>, &mut H) {
        (&mut self.pools, &mut self.host)
    }

    /// Borrow the timer manager
    pub fn timers(&self) -> &FunctionTimerManager<H> {
        &self.timers
    }

    /// Scheduling handle for use inside timer callbacks
    pub fn scheduler(&self) -> TimerScheduler<H> {
        self.timers.scheduler()
    }

    /// Frame clock driving [`Runtime::frame`]
    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// See [`ObjectPoolManager::create_pool`]
    pub fn create_pool(&mut self, tag: &str, prototype: H::Prototype, count: usize) -> bool {
        self.pools.create_pool(&mut self.host, tag, prototype, count)
    }

    /// See [`ObjectPoolManager::acquire`]
    pub fn acquire(&mut self, tag: &str) -> Option<H::Entity> {
        self.pools.acquire(&mut self.host, tag)
    }

    /// See [`ObjectPoolManager::acquire_at`]
    pub fn acquire_at(&mut self, tag: &str, position: Vec3, rotation: Quat) -> Option<H::Entity> {
        self.pools.acquire_at(&mut self.host, tag, position, rotation)
    }

    /// See [`ObjectPoolManager::grow`]
    pub fn grow(&mut self, tag: &str, count: usize) -> usize {
        self.pools.grow(&mut self.host, tag, count)
    }

    /// See [`ObjectPoolManager::shrink`]
    pub fn shrink(&mut self, tag: &str, count: usize) -> usize {
        self.pools.shrink(&mut self.host, tag, count)
    }

    /// Run `action` against the host after `delay_seconds` of frame time
    pub fn schedule_after(&self, action: impl FnOnce(&mut H) + 'static, delay_seconds: f32) -> TimerHandle {
        self.timers.schedule_after(action, delay_seconds)
    }

    /// Advance one frame by a fixed delta
    pub fn advance(&mut self, delta_time: f32) -> f32 {
        let delta_time = self.clock.advance(delta_time);
        self.timers.update(delta_time, &mut self.host);
        delta_time
    }

    /// Advance one frame by the wall-clock time since the previous frame
    pub fn frame(&mut self) -> f32 {
        let delta_time = self.clock.tick();
        self.timers.update(delta_time, &mut self.host);
        delta_time
    }

    /// Destroy every pooled entity, drop pending timers, and return the host
    pub fn shutdown(self) -> H {
        let Self { mut host, pools, mut timers, clock } = self;
        timers.cancel_all();
        pools.shutdown(&mut host);
        log::info!(
            "Runtime shut down after {} frames ({:.2}s)",
            clock.frame_count(),
            clock.total_time()
        );
        host
    }
}

impl<H: PrototypeLibrary> Runtime<H> {
    /// Validate `config` and create every configured pool
    pub fn from_config(host: H, config: &RuntimeConfig) -> Result<Self, RuntimeError> {
        config.validate()?;
        for tag in config.duplicate_tags() {
            log::warn!("Pool tag '{}' is configured more than once; only the first entry is used", tag);
        }

        let mut runtime = Self::new(host)?;
        let created = runtime
            .pools
            .bootstrap_from_config(&mut runtime.host, &config.pools);
        log::info!("Bootstrapped {} of {} configured pools", created, config.pools.len());
        Ok(runtime)
    }
}
