//! Shared statics between executors
//!
//! The edge binding is written from the interrupt executor and read by
//! capture code on either; drive commands cross from the mixer task to
//! the motor task through a signal, so the motors only ever see the
//! latest command.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use rxsignal_drivers::mixer::DriveCommand;
use rxsignal_hal_rp2040::GpioEdgeBinding;

/// Edge interrupt binding and level latch for every GPIO
pub static EDGE_BINDING: GpioEdgeBinding = GpioEdgeBinding::new();

/// Wheel commands (updated by the drive task)
pub static DRIVE_CMD: Signal<CriticalSectionRawMutex, DriveCommand> = Signal::new();
