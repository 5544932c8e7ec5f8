//! Serlink - interrupt-driven serial message link firmware
//!
//! Loopback firmware for RP2040 boards: messages arriving on UART0 are
//! decoded, logged and echoed back to the host. UART0 interrupts feed the
//! link's ring buffers; a periodic task runs the resolver.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::uart::Uart;
use {defmt_rtt as _, panic_probe as _};

use serlink_core::Link;

mod config;
mod tasks;
mod uart;

use crate::config::{rp_uart_config, LINK_CONFIG, RX_BUFFER_SLOTS, TX_BUFFER_SLOTS, UART_CONFIG};
use crate::uart::Uart0Port;

/// Link state shared with the UART0 interrupt (must live forever)
pub static LINK: Link<RX_BUFFER_SLOTS, TX_BUFFER_SLOTS> = Link::new();

/// UART0 registers, reached from the interrupt and the link task
pub static PORT: Uart0Port = Uart0Port::new();

#[interrupt]
fn UART0_IRQ() {
    PORT.service(&LINK);
}

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Serlink firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    if let Err(e) = LINK_CONFIG.validate() {
        panic!("Invalid link configuration: {:?}", e);
    }

    // Startup configuration: pins, baud rate and framing. Must finish before
    // any link interrupt is enabled. The driver stays alive for the whole run.
    let _uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, rp_uart_config(&UART_CONFIG));
    info!(
        "UART0 configured: {} baud, {:?}",
        UART_CONFIG.baudrate, UART_CONFIG.parity
    );

    PORT.enable_receive_interrupt();
    interrupt::UART0_IRQ.set_priority(Priority::P1);
    // SAFETY: LINK and PORT are fully initialized statics
    unsafe { interrupt::UART0_IRQ.enable() };
    info!(
        "Link up: rx={} tx={} slots",
        RX_BUFFER_SLOTS, TX_BUFFER_SLOTS
    );

    spawner.spawn(tasks::link_task(LINK_CONFIG)).unwrap();

    // Keep the UART driver (and its pin configuration) alive
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!(
            "Main loop heartbeat: tx_busy={}",
            LINK.is_transmitter_busy()
        );
    }
}
