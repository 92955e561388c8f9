//! RP2040-specific HAL for the RC receiver firmware
//!
//! This crate provides RP2040/Embassy implementations of the capability
//! traits in `rxsignal-hal`:
//!
//! - GPIO edge binding: per-pin armed callbacks driven by async edge waits
//! - Latched pin levels for combined-mode capture
//! - Microsecond clock and raw Embassy tick counter

#![cfg_attr(not(test), no_std)]

pub mod clock;
pub mod edge;

pub use clock::{EmbassyTicks, SystemMicros};
pub use edge::{watch_edges, GpioEdgeBinding, NUM_GPIO};
