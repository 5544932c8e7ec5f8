//! UART0 register access for the link interrupt handlers
//!
//! Baud rate and framing are set up by the embassy blocking driver at
//! startup; after that, only this module touches the UART0 data, flag and
//! interrupt-mask registers.

use embassy_rp::interrupt::{self, InterruptExt};
use embassy_rp::pac;
use serlink_core::Link;
use serlink_hal::SerialPort;

/// Register-level handle to UART0
pub struct Uart0Port {
    _private: (),
}

impl Uart0Port {
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Enable the receive and receive-timeout interrupts
    ///
    /// With the FIFO enabled, RX fires at the FIFO trigger level and RT
    /// covers a trickle of bytes below it.
    pub fn enable_receive_interrupt(&self) {
        critical_section::with(|_| {
            pac::UART0.uartimsc().modify(|w| {
                w.set_rxim(true);
                w.set_rtim(true);
            });
        });
    }

    fn rx_ready(&self) -> bool {
        !pac::UART0.uartfr().read().rxfe()
    }

    fn tx_ready(&self) -> bool {
        pac::UART0.uartimsc().read().txim() && !pac::UART0.uartfr().read().txff()
    }

    /// Service the UART0 interrupt
    ///
    /// Drains the receive FIFO into the inbound ring, then fills the transmit
    /// FIFO until it is full or the link stops the transmit interrupt.
    pub fn service<const RX: usize, const TX: usize>(&self, link: &Link<RX, TX>) {
        while self.rx_ready() {
            link.on_receive(self);
        }
        while self.tx_ready() {
            link.on_transmit_ready(self);
        }
        pac::UART0.uarticr().write(|w| {
            w.set_rxic(true);
            w.set_rtic(true);
            w.set_txic(true);
        });
    }
}

impl SerialPort for Uart0Port {
    fn read_data(&self) -> u8 {
        pac::UART0.uartdr().read().data()
    }

    fn write_data(&self, byte: u8) {
        pac::UART0.uartdr().write(|w| w.set_data(byte));
    }

    fn set_transmit_interrupt(&self, enabled: bool) {
        critical_section::with(|_| {
            pac::UART0.uartimsc().modify(|w| w.set_txim(enabled));
        });
        if enabled {
            // The PL011 only raises TX on a FIFO level crossing, so an idle
            // transmitter needs a software kick.
            interrupt::UART0_IRQ.pend();
        }
    }
}
