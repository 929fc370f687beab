// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Scoped conversion of signal-level faults into catchable ones.

use std::ops::{Deref, DerefMut};

use crate::engine::{Engine, FaultMode};

/// Holds an engine in [`FaultMode::Catchable`] for as long as it lives.
///
/// The previous mode is restored on drop, which covers normal return,
/// early return on a fault and unwinding out of a panic alike.
pub struct FaultGuard<'a, E: Engine + ?Sized> {
    engine: &'a mut E,
    previous: FaultMode,
}

impl<'a, E: Engine + ?Sized> FaultGuard<'a, E> {
    pub fn engage(engine: &'a mut E) -> Self {
        let previous = engine.set_fault_mode(FaultMode::Catchable);
        Self { engine, previous }
    }
}

impl<E: Engine + ?Sized> Deref for FaultGuard<'_, E> {
    type Target = E;

    fn deref(&self) -> &E {
        self.engine
    }
}

impl<E: Engine + ?Sized> DerefMut for FaultGuard<'_, E> {
    fn deref_mut(&mut self) -> &mut E {
        self.engine
    }
}

impl<E: Engine + ?Sized> Drop for FaultGuard<'_, E> {
    fn drop(&mut self) {
        self.engine.set_fault_mode(self.previous);
    }
}
