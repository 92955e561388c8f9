//! Consumers of calibrated receiver signals
//!
//! - Drive mixer: throttle and steering percentages to per-wheel commands
//! - Motor drivers: H-bridge with direction pin and PWM speed pin

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod mixer;
pub mod motor;
