//! Pulse width cell shared between the edge handler and the main loop
//!
//! Exactly two parties touch the cell: the edge handler (interrupt
//! context) commits new widths, and the main loop takes snapshots. Both
//! operations run inside a `critical_section`, which on a single-core MCU
//! masks interrupts globally. The critical section covers copying one
//! `u32` and one flag, nothing else, so while it briefly delays edge
//! handlers on every channel it never holds them across calibration or
//! logging.

use core::cell::Cell;

use critical_section::Mutex;

/// Pulse width reported before the first falling edge
pub const UNKNOWN_PULSE_WIDTH: u32 = 0xFFFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Sample {
    width: u32,
    changed: bool,
}

/// Single-writer/single-reader cell holding the latest pulse width
pub struct PulseCell {
    inner: Mutex<Cell<Sample>>,
}

impl Default for PulseCell {
    fn default() -> Self {
        Self::new()
    }
}

impl PulseCell {
    /// Create a cell holding [`UNKNOWN_PULSE_WIDTH`]
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(Cell::new(Sample {
                width: UNKNOWN_PULSE_WIDTH,
                changed: false,
            })),
        }
    }

    /// Store a new width (writer side, interrupt context)
    ///
    /// The changed flag is recomputed against the previously stored width
    /// rather than accumulated: a differing pulse followed by an identical
    /// one before the reader looks leaves the flag clear.
    ///
    /// Returns the new value of the changed flag.
    pub fn commit(&self, width: u32) -> bool {
        critical_section::with(|cs| {
            let cell = self.inner.borrow(cs);
            let changed = width != cell.get().width;
            cell.set(Sample { width, changed });
            changed
        })
    }

    /// Copy the width and clear the changed flag (reader side)
    pub fn snapshot(&self) -> u32 {
        critical_section::with(|cs| {
            let cell = self.inner.borrow(cs);
            let sample = cell.get();
            cell.set(Sample {
                changed: false,
                ..sample
            });
            sample.width
        })
    }

    /// Copy the width and clear the flag, but only if the flag was set
    ///
    /// Unlike calling [`has_changed`](Self::has_changed) followed by
    /// [`snapshot`](Self::snapshot), the check and the clear happen in
    /// one critical section, so no commit can slip in between.
    pub fn take_if_changed(&self) -> Option<u32> {
        critical_section::with(|cs| {
            let cell = self.inner.borrow(cs);
            let sample = cell.get();
            if !sample.changed {
                return None;
            }
            cell.set(Sample {
                changed: false,
                ..sample
            });
            Some(sample.width)
        })
    }

    /// Check the changed flag without clearing it
    pub fn has_changed(&self) -> bool {
        critical_section::with(|cs| self.inner.borrow(cs).get().changed)
    }

    /// Read the width without touching the changed flag
    pub fn peek(&self) -> u32 {
        critical_section::with(|cs| self.inner.borrow(cs).get().width)
    }
}
