//! rxsignal - RC receiver rover firmware
//!
//! Main firmware binary for an RP2040 rover driven from a hobby RC
//! receiver. Throttle and steering pulses are timed on GPIO edge
//! interrupts, calibrated for the configured transmitter/receiver pair
//! and mixed into differential drive commands for two H-bridge motors.
//!
//! Two executors:
//! - SWI_IRQ_1 interrupt executor: one edge watcher per receiver input
//! - Thread executor: drive mixer and motor output tasks

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use rxsignal_core::config::{
    ChannelConfig, ReceiverConfig, TimeSourceConfig, TimeSourceKind,
};
use rxsignal_core::{CaptureContext, CaptureMode, ReceiverChannel, TxRxCombo};
use rxsignal_drivers::mixer::DriveMixer;
use rxsignal_drivers::motor::{HBridgeConfig, HBridgeMotor};
use rxsignal_hal::PinId;
use rxsignal_hal_rp2040::{EmbassyTicks, SystemMicros};

use crate::channels::EDGE_BINDING;
use crate::tasks::Stick;

mod board;
mod channels;
mod config;
mod tasks;

/// Executor for the edge watchers
static EXECUTOR_EDGES: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_EDGES.on_interrupt()
}

// Capture clocks
static SYSTEM_MICROS: SystemMicros = SystemMicros;
static EMBASSY_TICKS: EmbassyTicks = EmbassyTicks;

// Capture state referenced from the edge binding (must live forever)
static CONTEXT: StaticCell<CaptureContext> = StaticCell::new();
static THROTTLE: StaticCell<ReceiverChannel> = StaticCell::new();
static STEERING: StaticCell<ReceiverChannel> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("rxsignal firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load_config();
    for channel in config.channels.iter() {
        if !board::is_wired(channel.name.as_str()) {
            warn!(
                "Channel '{}' has no input on this board, ignoring",
                channel.name.as_str()
            );
        }
    }

    // Capture context and channels
    let ctx: &'static CaptureContext = CONTEXT.init(capture_context(&config.time_source));

    let throttle = bind_channel(&THROTTLE, ctx, &config, "throttle", board::THROTTLE_PIN);
    let steering = bind_channel(&STEERING, ctx, &config, "steering", board::STEERING_PIN);

    // Edge watchers preempt everything on the thread executor
    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let edge_spawner = EXECUTOR_EDGES.start(interrupt::SWI_IRQ_1);

    let throttle_input = Input::new(p.PIN_3, Pull::Up);
    let steering_input = Input::new(p.PIN_2, Pull::Up);
    edge_spawner.spawn(unwrap!(tasks::edge_task(throttle_input, board::THROTTLE_PIN)));
    edge_spawner.spawn(unwrap!(tasks::edge_task(steering_input, board::STEERING_PIN)));

    info!("Edge watchers running");

    // H-bridge outputs
    // Pin assignments are board-specific (see board.rs)
    let mut pwm_config = PwmConfig::default();
    pwm_config.top = board::MOTOR_PWM_TOP;

    let (left_pwm, _) = Pwm::new_output_a(p.PWM_SLICE3, p.PIN_6, pwm_config.clone()).split();
    let (_, right_pwm) = Pwm::new_output_b(p.PWM_SLICE4, p.PIN_9, pwm_config).split();

    let left = HBridgeMotor::new(
        Output::new(p.PIN_7, Level::Low),
        unwrap!(left_pwm),
        HBridgeConfig::default(),
    );
    let right = HBridgeMotor::new(
        Output::new(p.PIN_8, Level::Low),
        unwrap!(right_pwm),
        HBridgeConfig::default(),
    );

    info!(
        "Motors initialized (A: GPIO{}/{}, B: GPIO{}/{})",
        board::MOTOR_A_PWM,
        board::MOTOR_A_DIR,
        board::MOTOR_B_PWM,
        board::MOTOR_B_DIR
    );

    // Spawn tasks
    spawner.spawn(unwrap!(tasks::motor_task(left, right)));
    spawner.spawn(unwrap!(tasks::drive_task(
        throttle,
        steering,
        DriveMixer::new(config.drive)
    )));

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!(
            "Heartbeat: throttle {:?}, steering {:?}",
            throttle.channel.state(),
            steering.channel.state()
        );
    }
}

/// Build the capture context for the configured time source
///
/// An external source that fails to build falls back to the microsecond
/// clock rather than leaving capture untimed.
fn capture_context(time_source: &TimeSourceConfig) -> CaptureContext {
    let ctx = CaptureContext::new(&SYSTEM_MICROS).with_interrupts(&EDGE_BINDING, &EDGE_BINDING);

    match time_source.kind {
        TimeSourceKind::Builtin => {
            info!("Time source: builtin microsecond clock");
            ctx
        }
        TimeSourceKind::External => {
            let (m, d) = EmbassyTicks::micros_scale();
            if (time_source.multiplier, time_source.divisor) != (m, d) {
                debug!(
                    "Embassy ticks run at {} Hz; {}/{} would give microseconds",
                    EmbassyTicks::tick_hz(),
                    m,
                    d
                );
            }

            match ctx.with_external_counter(
                &EMBASSY_TICKS,
                time_source.multiplier,
                time_source.divisor,
            ) {
                Ok(ctx) => {
                    info!(
                        "Time source: embassy ticks x{}/{}",
                        time_source.multiplier, time_source.divisor
                    );
                    ctx
                }
                Err(e) => {
                    warn!("External time source rejected: {:?}, using builtin clock", e);
                    ctx
                }
            }
        }
    }
}

/// Create the named channel and arm it on `pin`
fn bind_channel(
    cell: &'static StaticCell<ReceiverChannel>,
    ctx: &'static CaptureContext,
    config: &ReceiverConfig,
    name: &str,
    pin: PinId,
) -> Stick {
    let channel_config = match config.channel(name) {
        Some(c) => c.clone(),
        None => {
            warn!("No [[channel]] named '{}', using defaults", name);
            ChannelConfig::new(name, CaptureMode::Combined, TxRxCombo::Legacy)
        }
    };

    let channel: &'static ReceiverChannel =
        cell.init(ReceiverChannel::new(ctx, channel_config.mode));

    if channel.setup(pin).is_none() {
        error!("Channel '{}' could not be armed on GPIO{}", name, pin);
    }

    info!(
        "Channel '{}' on GPIO{}: {:?} capture, {} calibration",
        name,
        pin,
        channel_config.mode,
        channel_config.combo.name()
    );

    Stick {
        channel,
        combo: channel_config.combo,
    }
}
