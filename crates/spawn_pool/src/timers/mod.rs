//! # Function Timers
//!
//! One-shot deferred callbacks polled once per frame.
//!
//! Scheduling and cancellation are staged and only take effect at the start
//! of the next [`FunctionTimerManager::update`], so the active list is never
//! modified while it is being swept. Callbacks may therefore schedule or
//! cancel timers freely, including through a [`TimerScheduler`] captured in
//! the callback itself.
//!
//! ```rust
//! use spawn_pool::timers::FunctionTimerManager;
//!
//! let mut timers = FunctionTimerManager::<u32>::new();
//! let mut fired = 0;
//!
//! timers.schedule_after(|fired| *fired += 1, 0.5);
//! timers.update(0.25, &mut fired);
//! assert_eq!(fired, 0);
//! timers.update(0.25, &mut fired);
//! assert_eq!(fired, 1);
//! ```

mod handle;
mod manager;

pub use handle::{CancelOnDrop, TimerHandle, TimerId};
pub use manager::{FunctionTimerManager, TimerAction, TimerScheduler};
