//! Pointer drag handoff between the input side and the tick
//!
//! The input side never touches the particle list. It writes the held index
//! and the proposed position into a single mutex-guarded slot; the tick
//! latches that slot once, before its force pass, so a tick never observes a
//! half-applied drag.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::debug;

use crate::simulation::states::NVec3;

/// Contents of the handoff slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragHandoff {
    pub held: Option<usize>, // particle under pointer control
    pub target: NVec3, // last reported drag position
}

impl Default for DragHandoff {
    fn default() -> Self {
        Self {
            held: None,
            target: NVec3::zeros(),
        }
    }
}

/// A held particle as seen by one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Held {
    pub index: usize,
    pub position: NVec3,
}

/// Cloneable, thread-safe handle to the handoff slot
#[derive(Debug, Clone)]
pub struct DragHandle {
    slot: Arc<Mutex<DragHandoff>>,
    count: usize, // particle count, for index validation
}

impl DragHandle {
    pub fn new(count: usize) -> Self {
        Self {
            slot: Arc::new(Mutex::new(DragHandoff::default())),
            count,
        }
    }

    fn lock(&self) -> MutexGuard<'_, DragHandoff> {
        // a panicked writer can only have left a plain Copy value behind
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start holding particle `index` at `initial`.
    /// Out-of-range indices and non-finite positions are ignored
    pub fn begin_drag(&self, index: usize, initial: NVec3) {
        if index >= self.count || !is_finite(&initial) {
            debug!("begin_drag ignored: index {index}, position {initial:?}");
            return;
        }
        let mut slot = self.lock();
        slot.held = Some(index);
        slot.target = initial;
        debug!("begin_drag: particle {index}");
    }

    /// Move the held particle. Ignored when nothing is held
    pub fn update_drag(&self, position: NVec3) {
        if !is_finite(&position) {
            return;
        }
        let mut slot = self.lock();
        if slot.held.is_some() {
            slot.target = position;
        }
    }

    /// Release the held particle, if any
    pub fn end_drag(&self) {
        let mut slot = self.lock();
        if let Some(index) = slot.held.take() {
            debug!("end_drag: particle {index}");
        }
    }

    /// Copy of the current slot contents
    pub fn current(&self) -> DragHandoff {
        *self.lock()
    }

    /// Latch the slot for one tick
    pub fn latch(&self) -> Option<Held> {
        let slot = self.current();
        slot.held.map(|index| Held {
            index,
            position: slot.target,
        })
    }
}

fn is_finite(v: &NVec3) -> bool {
    v.iter().all(|c| c.is_finite())
}
