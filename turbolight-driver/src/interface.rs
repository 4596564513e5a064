//! Device command layer
//!
//! Frames controller commands and display data into bus transactions. One
//! logical operation is always exactly one transaction, and a data block
//! shares its transaction with the single `0x40` control byte in front of
//! it: on a bit-banged bus the start, address and stop overhead of a
//! transaction costs as much as several payload bytes.

use turbolight_hal::TwoWireBus;

use crate::cmd;
use crate::framebuffer::{PAGES, WIDTH};

/// Command/data framing over a two-wire bus
pub struct DisplayInterface<B> {
    bus: B,
    address: u8,
}

impl<B: TwoWireBus> DisplayInterface<B> {
    /// Create an interface talking to `address` (masked to 7 bits)
    pub fn new(bus: B, address: u8) -> Self {
        Self {
            bus,
            address: address & 0x7F,
        }
    }

    /// Device address used for every transaction
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Retarget the interface, e.g. for a panel strapped to 0x3D
    pub fn set_address(&mut self, address: u8) {
        self.address = address & 0x7F;
    }

    /// Send a single command byte
    pub fn send_command(&mut self, c: u8) {
        self.bus
            .transaction(self.address, &[&[cmd::CONTROL_COMMAND, c]]);
    }

    /// Send a command byte followed by its argument
    pub fn send_command2(&mut self, c: u8, arg: u8) {
        self.bus
            .transaction(self.address, &[&[cmd::CONTROL_COMMAND, c, arg]]);
    }

    /// Send a run of command bytes in one transaction
    pub fn send_commands(&mut self, cmds: &[u8]) {
        self.bus
            .transaction(self.address, &[&[cmd::CONTROL_COMMAND], cmds]);
    }

    /// Point the controller's write cursor at `column` within `page`
    pub fn set_position(&mut self, column: u8, page: u8) {
        let column = column % WIDTH as u8;
        let page = page % PAGES as u8;
        self.send_commands(&[
            cmd::SET_PAGE_ADDR | page,
            cmd::SET_LOW_COLUMN | (column & 0x0F),
            cmd::SET_HIGH_COLUMN | ((column >> 4) & 0x0F),
        ]);
    }

    /// Write display RAM at the current cursor
    pub fn write_data_block(&mut self, data: &[u8]) {
        self.bus
            .transaction(self.address, &[&[cmd::CONTROL_DATA], data]);
    }

    /// Borrow the underlying bus
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Give the bus back
    pub fn release(self) -> B {
        self.bus
    }
}
