//! Frame-polled timer manager

use super::handle::{RemoveQueue, TimerHandle, TimerId, TimerState};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

/// Callback run when a timer expires, with mutable access to the tick context
pub type TimerAction<C> = Box<dyn FnOnce(&mut C)>;

type AddQueue<C> = Rc<RefCell<VecDeque<FunctionTimer<C>>>>;

/// One scheduled callback
struct FunctionTimer<C> {
    id: TimerId,
    action: Option<TimerAction<C>>,
    remaining: f32,
    state: Rc<TimerState>,
}

impl<C> FunctionTimer<C> {
    /// Count down and fire once the remaining time reaches zero
    fn update(&mut self, delta_time: f32, context: &mut C, to_remove: &RemoveQueue) {
        if self.state.destroyed.get() {
            return;
        }

        self.remaining -= delta_time;
        if self.remaining <= 0.0 {
            self.state.destroyed.set(true);
            self.state.fired.set(true);
            to_remove.borrow_mut().push_back(self.id);

            if let Some(action) = self.action.take() {
                log::trace!("Timer {:?} fired", self.id);
                action(context);
            }
        }
    }
}

/// Cloneable handle for scheduling timers, usable from inside callbacks
pub struct TimerScheduler<C> {
    next_id: Rc<Cell<u64>>,
    to_add: AddQueue<C>,
    to_remove: RemoveQueue,
}

impl<C> Clone for TimerScheduler<C> {
    fn clone(&self) -> Self {
        Self {
            next_id: Rc::clone(&self.next_id),
            to_add: Rc::clone(&self.to_add),
            to_remove: Rc::clone(&self.to_remove),
        }
    }
}

impl<C> TimerScheduler<C> {
    /// Run `action` once, `delay_seconds` of frame time from the next tick
    ///
    /// Negative delays behave like zero and fire on the next tick.
    pub fn schedule_after(&self, action: impl FnOnce(&mut C) + 'static, delay_seconds: f32) -> TimerHandle {
        let id = TimerId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        let state = Rc::new(TimerState::default());
        self.to_add.borrow_mut().push_back(FunctionTimer {
            id,
            action: Some(Box::new(action)),
            remaining: delay_seconds.max(0.0),
            state: Rc::clone(&state),
        });

        log::debug!("Scheduled timer {:?} to fire after {}s", id, delay_seconds);
        TimerHandle::new(id, state, &self.to_remove)
    }
}

impl<C> fmt::Debug for TimerScheduler<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerScheduler")
            .field("next_id", &self.next_id.get())
            .field("staged", &self.to_add.borrow().len())
            .finish()
    }
}

/// Manager owning every registered timer
///
/// `C` is the context handed to callbacks on each tick, typically the host
/// world so a callback can deactivate the entity it was scheduled for.
pub struct FunctionTimerManager<C = ()> {
    timers: Vec<FunctionTimer<C>>,
    scheduler: TimerScheduler<C>,
}

impl<C> Default for FunctionTimerManager<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> FunctionTimerManager<C> {
    /// Create an empty manager
    pub fn new() -> Self {
        Self {
            timers: Vec::new(),
            scheduler: TimerScheduler {
                next_id: Rc::new(Cell::new(0)),
                to_add: Rc::new(RefCell::new(VecDeque::new())),
                to_remove: Rc::new(RefCell::new(VecDeque::new())),
            },
        }
    }

    /// Scheduling handle that can be captured by callbacks
    pub fn scheduler(&self) -> TimerScheduler<C> {
        self.scheduler.clone()
    }

    /// Run `action` once after `delay_seconds` of frame time
    pub fn schedule_after(&self, action: impl FnOnce(&mut C) + 'static, delay_seconds: f32) -> TimerHandle {
        self.scheduler.schedule_after(action, delay_seconds)
    }

    /// Advance every registered timer by one frame
    ///
    /// Staged additions are applied first, then staged removals, then the
    /// registered timers are swept in insertion order.
    pub fn update(&mut self, delta_time: f32, context: &mut C) {
        let added: Vec<_> = self.scheduler.to_add.borrow_mut().drain(..).collect();
        for timer in added {
            if !self.timers.iter().any(|t| t.id == timer.id) {
                self.timers.push(timer);
            }
        }

        let removed: Vec<_> = self.scheduler.to_remove.borrow_mut().drain(..).collect();
        if !removed.is_empty() {
            self.timers.retain(|t| !removed.contains(&t.id));
        }

        for timer in &mut self.timers {
            timer.update(delta_time, context, &self.scheduler.to_remove);
        }
    }

    /// Number of timers in the active list (excludes staged additions)
    pub fn registered_count(&self) -> usize {
        self.timers.len()
    }

    /// Number of timers that will still fire, including staged ones
    pub fn pending_count(&self) -> usize {
        let registered = self.timers.iter().filter(|t| !t.state.destroyed.get()).count();
        let staged = self
            .scheduler
            .to_add
            .borrow()
            .iter()
            .filter(|t| !t.state.destroyed.get())
            .count();
        registered + staged
    }

    /// Cancel every registered and staged timer
    pub fn cancel_all(&mut self) {
        let staged = std::mem::take(&mut *self.scheduler.to_add.borrow_mut());
        for timer in staged.iter().chain(self.timers.iter()) {
            timer.state.destroyed.set(true);
        }
        self.timers.clear();
        self.scheduler.to_remove.borrow_mut().clear();
    }
}

impl<C> fmt::Debug for FunctionTimerManager<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionTimerManager")
            .field("registered", &self.timers.len())
            .field("pending", &self.pending_count())
            .finish()
    }
}
