//! The select/lock state machine that gates pipeline invocations.
//!
//! Three phases driven by two events and one timer: a user selection moves
//! `Idle` to `Pending`, pipeline completion (success or failure) moves
//! `Pending` to `Cooldown`, and the cooldown timer moves `Cooldown` back to
//! `Idle`. While in `Pending` or `Cooldown` the machine is locked and new
//! selections are ignored outright, which debounces re-clicks while a slow
//! upstream call settles and absorbs a click burst right after data arrives.
//!
//! The machine itself is pure; wiring it to a runtime's timer is the
//! driver's job.

use common::RegionCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Pending,
    Cooldown,
}

#[derive(Debug)]
pub struct SelectionStateMachine {
    phase: Phase,
    selected: Option<RegionCode>,
}

impl SelectionStateMachine {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            selected: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn locked(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn selected(&self) -> Option<&RegionCode> {
        self.selected.as_ref()
    }

    /// Accept or ignore a selection. Returns true when the selection was
    /// accepted and a pipeline run should start. Re-selecting the current
    /// region while idle is legal and re-fires; there is no memoization.
    pub fn select(&mut self, region: RegionCode) -> bool {
        if self.locked() {
            return false;
        }
        self.selected = Some(region);
        self.phase = Phase::Pending;
        true
    }

    /// The in-flight pipeline call finished, successfully or not. The lock
    /// stays held; the cooldown starts now.
    pub fn pipeline_completed(&mut self) {
        if self.phase == Phase::Pending {
            self.phase = Phase::Cooldown;
        }
    }

    pub fn cooldown_elapsed(&mut self) {
        if self.phase == Phase::Cooldown {
            self.phase = Phase::Idle;
        }
    }
}

impl Default for SelectionStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
