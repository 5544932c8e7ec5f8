//! Host-side serial port double

use core::cell::{Cell, RefCell};

use serlink_hal::SerialPort;

/// Records transmitted bytes and the transmit interrupt gate
pub struct MockPort {
    rx_data: Cell<u8>,
    written: RefCell<Vec<u8>>,
    tx_enabled: Cell<bool>,
    enable_count: Cell<usize>,
}

impl MockPort {
    pub fn new() -> Self {
        Self {
            rx_data: Cell::new(0),
            written: RefCell::new(Vec::new()),
            tx_enabled: Cell::new(false),
            enable_count: Cell::new(0),
        }
    }

    /// Latch a byte into the receive data register
    pub fn receive(&self, byte: u8) {
        self.rx_data.set(byte);
    }

    pub fn written(&self) -> Vec<u8> {
        self.written.borrow().clone()
    }

    pub fn transmit_interrupt_enabled(&self) -> bool {
        self.tx_enabled.get()
    }

    /// How many times the transmit interrupt went from disabled to enabled
    pub fn enable_count(&self) -> usize {
        self.enable_count.get()
    }
}

impl SerialPort for MockPort {
    fn read_data(&self) -> u8 {
        self.rx_data.get()
    }

    fn write_data(&self, byte: u8) {
        self.written.borrow_mut().push(byte);
    }

    fn set_transmit_interrupt(&self, enabled: bool) {
        if enabled && !self.tx_enabled.get() {
            self.enable_count.set(self.enable_count.get() + 1);
        }
        self.tx_enabled.set(enabled);
    }
}
