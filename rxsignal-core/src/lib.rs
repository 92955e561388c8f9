//! Board-agnostic core logic for the RC receiver firmware
//!
//! This crate contains everything between the pin interrupt and the drive
//! logic that does not depend on a specific microcontroller:
//!
//! - Capture context (injected interrupt, pin level and clock capabilities)
//! - Time source with optional external counter scaling
//! - Per-channel edge capture state machine and pulse width cell
//! - Calibration engine (generic and per-device curves)
//! - Configuration types and parser
//!
//! ```text
//! ┌──────────────┐  edge   ┌─────────────────┐ commit ┌───────────┐
//! │ Interrupt    │────────►│ ReceiverChannel │───────►│ PulseCell │
//! │ binding      │         └─────────────────┘        └─────┬─────┘
//! └──────────────┘                                          │ snapshot
//!                                                           ▼
//!                                  ┌──────────────┐   ┌───────────┐
//!                                  │ Drive logic  │◄──│ Calibrate │
//!                                  └──────────────┘   └───────────┘
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod calibration;
pub mod capture;
pub mod config;
pub mod context;
pub mod time;

pub use calibration::{
    device_signal_value, generic_signal_value, SignalValue, TxRxCombo, MAX_RECEIVER_PWM,
    MAX_SIGNAL_VALUE, MIN_RECEIVER_PWM, MIN_SIGNAL_VALUE,
};
pub use capture::{
    Callbacks, CaptureMode, CaptureState, PulseCell, ReceiverChannel, UNKNOWN_PULSE_WIDTH,
};
pub use context::CaptureContext;
pub use time::{ScaleError, TickScale, TimeSource};
