//! Cancellation handles for scheduled timers

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

/// Identifier of a scheduled timer, unique per manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub(crate) u64);

/// Lifecycle flags shared between a timer and its handles
#[derive(Debug, Default)]
pub(crate) struct TimerState {
    pub(crate) destroyed: Cell<bool>,
    pub(crate) fired: Cell<bool>,
}

pub(crate) type RemoveQueue = Rc<RefCell<VecDeque<TimerId>>>;

/// Handle to a scheduled timer
///
/// Dropping the handle does not cancel the timer; use
/// [`TimerHandle::cancel`] or wrap it with [`TimerHandle::cancel_on_drop`].
#[derive(Debug, Clone)]
pub struct TimerHandle {
    id: TimerId,
    state: Rc<TimerState>,
    to_remove: Weak<RefCell<VecDeque<TimerId>>>,
}

impl TimerHandle {
    pub(crate) fn new(id: TimerId, state: Rc<TimerState>, to_remove: &RemoveQueue) -> Self {
        Self {
            id,
            state,
            to_remove: Rc::downgrade(to_remove),
        }
    }

    /// Identifier of the timer
    pub fn id(&self) -> TimerId {
        self.id
    }

    /// Whether the timer will still fire
    pub fn is_pending(&self) -> bool {
        !self.state.destroyed.get()
    }

    /// Whether the callback has run
    pub fn has_fired(&self) -> bool {
        self.state.fired.get()
    }

    /// Stop the timer from firing
    ///
    /// Takes effect immediately for the sweep in progress (a timer later in
    /// the same sweep is skipped) and the timer is deregistered at the next
    /// tick boundary. Cancelling a fired or cancelled timer does nothing.
    pub fn cancel(&self) {
        if self.state.destroyed.replace(true) {
            return;
        }
        if let Some(queue) = self.to_remove.upgrade() {
            queue.borrow_mut().push_back(self.id);
        }
        log::trace!("Cancelled timer {:?}", self.id);
    }

    /// Wrap the handle so the timer is cancelled when the guard is dropped
    pub fn cancel_on_drop(self) -> CancelOnDrop {
        CancelOnDrop(self)
    }
}

/// Guard that cancels its timer when dropped
#[derive(Debug)]
pub struct CancelOnDrop(TimerHandle);

impl CancelOnDrop {
    /// Borrow the wrapped handle
    pub fn handle(&self) -> &TimerHandle {
        &self.0
    }
}

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.cancel();
    }
}
