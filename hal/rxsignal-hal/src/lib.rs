//! rxsignal Hardware Abstraction Layer
//!
//! This crate defines the capabilities the capture core consumes from the
//! platform. Chip-specific crates (RP2040, host test doubles) implement
//! them; the core never touches hardware directly.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (rxsignal-firmware, etc.)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  rxsignal-core (capture, calibration)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  rxsignal-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │ rxsignal-hal- │
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::InputLevel`] - Latched logic level of an input pin
//! - [`interrupt::InterruptBinding`] - Arm an edge trigger on a pin
//! - [`interrupt::EdgeListener`] - Receiver of edge notifications
//! - [`time::TickCounter`] - Free-running 32-bit tick counter

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod interrupt;
pub mod time;

// Re-export key traits at crate root for convenience
pub use gpio::{InputLevel, Level, PinId};
pub use interrupt::{EdgeCallback, EdgeListener, EdgeMode, InterruptBinding};
pub use time::{CounterFn, TickCounter};
