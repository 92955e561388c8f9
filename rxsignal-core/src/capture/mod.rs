//! Pulse width capture
//!
//! - [`PulseCell`]: the value shared between edge handler and main loop
//! - [`ReceiverChannel`]: per-pin edge state machine feeding a cell

mod cell;
mod channel;

pub use cell::{PulseCell, UNKNOWN_PULSE_WIDTH};
pub use channel::{Callbacks, CaptureMode, CaptureState, ReceiverChannel};
