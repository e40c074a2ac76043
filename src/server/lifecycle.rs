// Server lifecycle module
// Stopped -> Listening -> Draining -> Stopped

use std::sync::atomic::{AtomicU8, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LifecycleState {
    Stopped = 0,
    Listening = 1,
    Draining = 2,
}

impl LifecycleState {
    const fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Listening,
            2 => Self::Draining,
            _ => Self::Stopped,
        }
    }
}

/// How the drain phase ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// Every in-flight connection finished within the drain timeout
    Graceful,
    /// The drain timeout elapsed with work still in flight
    Forced,
}

impl ShutdownOutcome {
    pub const fn exit_code(self) -> u8 {
        match self {
            Self::Graceful => 0,
            Self::Forced => 1,
        }
    }
}

/// Shared lifecycle state of one server
#[derive(Debug)]
pub struct Lifecycle {
    state: AtomicU8,
}

impl Lifecycle {
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(LifecycleState::Stopped as u8),
        }
    }

    pub fn state(&self) -> LifecycleState {
        LifecycleState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// Move from `from` to `to`; returns false if the current state is not `from`
    pub fn transition(&self, from: LifecycleState, to: LifecycleState) -> bool {
        self.state
            .compare_exchange(from as u8, to as u8, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}
