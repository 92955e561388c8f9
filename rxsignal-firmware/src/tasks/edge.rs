//! Receiver input edge watcher
//!
//! One instance per receiver input. Spawn on the interrupt executor so
//! edge timestamps are taken ahead of anything on the thread executor.

use embassy_rp::gpio::Input;
use rxsignal_hal::PinId;
use rxsignal_hal_rp2040::watch_edges;

use crate::channels::EDGE_BINDING;

/// Feed edges of GPIO `pin` into the shared binding
///
/// Pool size matches [`crate::board::WIRED_CHANNELS`].
#[embassy_executor::task(pool_size = 2)]
pub async fn edge_task(mut input: Input<'static>, pin: PinId) -> ! {
    watch_edges(&EDGE_BINDING, &mut input, pin).await
}
