// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local exclusivity gate
//!
//! Serializes the local callers of one lock instance so that exactly one of
//! them drives the store handshake at a time. Waiters are served in arrival
//! order; a waiter that times out or is interrupted leaves the queue without
//! disturbing the others.

use crate::clock::Deadline;
use crate::holder::HolderId;
use crate::interrupt::Interrupt;
use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;

/// Errors from gate operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GateError {
    #[error("gate is not held by {0}")]
    NotHolder(HolderId),
    #[error("gate acquisition interrupted")]
    Interrupted,
}

#[derive(Debug, Default)]
struct GateState {
    holder: Option<HolderId>,
    queue: VecDeque<u64>,
    next_ticket: u64,
}

impl GateState {
    fn leave_queue(&mut self, ticket: u64) {
        self.queue.retain(|t| *t != ticket);
    }
}

#[derive(Debug, Default)]
struct GateInner {
    state: Mutex<GateState>,
    turn: Condvar,
}

impl GateInner {
    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn wake_all(&self) {
        let _state = self.lock();
        self.turn.notify_all();
    }
}

/// Per-instance FIFO exclusive gate (states: free, held by one holder)
#[derive(Debug, Default)]
pub struct Gate {
    inner: Arc<GateInner>,
}

impl Gate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block until `holder` owns the gate
    pub fn acquire(&self, holder: &HolderId) {
        // Without a deadline or an interrupt the wait can only end in success.
        let _ = self.wait_for_turn(holder, None, None);
    }

    /// Block until `holder` owns the gate or `interrupt` fires.
    ///
    /// An interrupt that is already triggered cancels before waiting. On
    /// cancellation the caller is removed from the queue and owns nothing.
    pub fn acquire_interruptibly(
        &self,
        holder: &HolderId,
        interrupt: &Interrupt,
    ) -> Result<(), GateError> {
        match self.wait_for_turn(holder, None, Some(interrupt))? {
            true => Ok(()),
            false => Err(GateError::Interrupted),
        }
    }

    /// Try to own the gate within `timeout`
    pub fn try_acquire(&self, holder: &HolderId, timeout: Duration) -> bool {
        self.try_acquire_until(holder, Deadline::after(timeout))
    }

    /// Try to own the gate before `deadline` passes
    pub fn try_acquire_until(&self, holder: &HolderId, deadline: Deadline) -> bool {
        matches!(self.wait_for_turn(holder, Some(deadline), None), Ok(true))
    }

    /// Give the gate up; only the current holder may do so
    pub fn release(&self, holder: &HolderId) -> Result<(), GateError> {
        let mut state = self.inner.lock();
        if state.holder.as_ref() != Some(holder) {
            return Err(GateError::NotHolder(holder.clone()));
        }
        state.holder = None;
        self.inner.turn.notify_all();
        Ok(())
    }

    pub fn is_held_by(&self, holder: &HolderId) -> bool {
        self.inner.lock().holder.as_ref() == Some(holder)
    }

    pub fn is_held_by_current_thread(&self) -> bool {
        self.is_held_by(&HolderId::current_thread())
    }

    pub fn is_locked(&self) -> bool {
        self.inner.lock().holder.is_some()
    }

    pub fn holder(&self) -> Option<HolderId> {
        self.inner.lock().holder.clone()
    }

    /// Number of callers queued behind the holder
    pub fn waiters(&self) -> usize {
        self.inner.lock().queue.len()
    }

    /// Queue for the gate. `Ok(true)` means acquired, `Ok(false)` means the
    /// deadline passed first.
    fn wait_for_turn(
        &self,
        holder: &HolderId,
        deadline: Option<Deadline>,
        interrupt: Option<&Interrupt>,
    ) -> Result<bool, GateError> {
        if interrupt.is_some_and(Interrupt::is_interrupted) {
            return Err(GateError::Interrupted);
        }

        let mut state = self.inner.lock();
        if state.holder.is_none() && state.queue.is_empty() {
            state.holder = Some(holder.clone());
            return Ok(true);
        }
        if deadline.is_some_and(|d| d.is_expired()) {
            return Ok(false);
        }

        let ticket = state.next_ticket;
        state.next_ticket = state.next_ticket.wrapping_add(1);
        state.queue.push_back(ticket);

        let _registration = interrupt.map(|i| {
            let inner = Arc::clone(&self.inner);
            i.register(move || inner.wake_all())
        });

        loop {
            if interrupt.is_some_and(Interrupt::is_interrupted) {
                state.leave_queue(ticket);
                self.inner.turn.notify_all();
                return Err(GateError::Interrupted);
            }
            if state.holder.is_none() && state.queue.front() == Some(&ticket) {
                state.queue.pop_front();
                state.holder = Some(holder.clone());
                return Ok(true);
            }
            state = match deadline {
                None => self
                    .inner
                    .turn
                    .wait(state)
                    .unwrap_or_else(|e| e.into_inner()),
                Some(deadline) => {
                    let remaining = deadline.remaining();
                    if remaining.is_zero() {
                        state.leave_queue(ticket);
                        self.inner.turn.notify_all();
                        return Ok(false);
                    }
                    self.inner
                        .turn
                        .wait_timeout(state, remaining)
                        .unwrap_or_else(|e| e.into_inner())
                        .0
                }
            };
        }
    }
}

#[cfg(test)]
#[path = "gate_tests.rs"]
mod tests;
