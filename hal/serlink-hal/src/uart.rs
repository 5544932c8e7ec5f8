//! UART serial port abstractions
//!
//! The link only ever touches the hardware through three operations: read the
//! received byte, write the next byte to transmit, and gate the transmit-ready
//! interrupt. The receive interrupt stays enabled for the life of the link once
//! startup configuration is done.

/// Register-level serial port
///
/// Methods take `&self` because the same peripheral is reached from the
/// receive interrupt, the transmit-ready interrupt and the main context.
/// Implementations must be callable from interrupt context: no blocking, no
/// allocation.
pub trait SerialPort {
    /// Read the byte that triggered the receive interrupt
    fn read_data(&self) -> u8;

    /// Hand one byte to the transmitter
    ///
    /// Only called from the transmit-ready handler, when the hardware has
    /// signalled it can accept a byte.
    fn write_data(&self, byte: u8);

    /// Enable or disable the transmit-ready interrupt
    fn set_transmit_interrupt(&self, enabled: bool);
}

impl<T: SerialPort + ?Sized> SerialPort for &T {
    fn read_data(&self) -> u8 {
        (**self).read_data()
    }

    fn write_data(&self, byte: u8) {
        (**self).write_data(byte)
    }

    fn set_transmit_interrupt(&self, enabled: bool) {
        (**self).set_transmit_interrupt(enabled)
    }
}

/// UART configuration
///
/// Applied once at startup, before any link interrupt is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits (typically 8)
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            baudrate: 115200,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Five,
    Six,
    Seven,
    Eight,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}
