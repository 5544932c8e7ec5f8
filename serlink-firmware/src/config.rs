//! Link configuration
//!
//! Values come from `link.toml`, validated and compiled in by `build.rs`.

use serlink_core::LinkConfig;
use serlink_hal::{DataBits, Parity, StopBits, UartConfig};

include!(concat!(env!("OUT_DIR"), "/link_config.rs"));

/// Translate the board-agnostic UART settings for the RP2040 driver
pub fn rp_uart_config(config: &UartConfig) -> embassy_rp::uart::Config {
    let mut rp = embassy_rp::uart::Config::default();
    rp.baudrate = config.baudrate;
    rp.data_bits = match config.data_bits {
        DataBits::Five => embassy_rp::uart::DataBits::DataBits5,
        DataBits::Six => embassy_rp::uart::DataBits::DataBits6,
        DataBits::Seven => embassy_rp::uart::DataBits::DataBits7,
        DataBits::Eight => embassy_rp::uart::DataBits::DataBits8,
    };
    rp.parity = match config.parity {
        Parity::None => embassy_rp::uart::Parity::ParityNone,
        Parity::Even => embassy_rp::uart::Parity::ParityEven,
        Parity::Odd => embassy_rp::uart::Parity::ParityOdd,
    };
    rp.stop_bits = match config.stop_bits {
        StopBits::One => embassy_rp::uart::StopBits::STOP1,
        StopBits::Two => embassy_rp::uart::StopBits::STOP2,
    };
    rp
}
