//! Embassy async tasks
//!
//! Edge watchers run on the interrupt executor; the drive and motor
//! tasks run on the thread executor and talk through [`crate::channels`].

pub mod drive;
pub mod edge;
pub mod motor;

pub use drive::{drive_task, Stick};
pub use edge::edge_task;
pub use motor::motor_task;
