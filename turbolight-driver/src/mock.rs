//! Test doubles shared by the unit tests

use heapless::Vec;
use turbolight_hal::TwoWireBus;

/// Longest transaction the tests produce: control byte + one page
pub const MAX_TRANSACTION: usize = 1 + 128;

/// One recorded start-to-stop exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub address: u8,
    data: Vec<u8, MAX_TRANSACTION>,
}

impl Transaction {
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn is_data(&self) -> bool {
        self.data.first() == Some(&0x40)
    }
}

/// Bus that records transactions instead of toggling lines
pub struct RecordingBus {
    log: Vec<Transaction, 64>,
    open: Option<Transaction>,
}

impl RecordingBus {
    pub fn new() -> Self {
        Self {
            log: Vec::new(),
            open: None,
        }
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn get(&self, i: usize) -> &Transaction {
        &self.log[i]
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.log
    }

    /// Transactions carrying display data
    pub fn data_blocks(&self) -> impl Iterator<Item = &Transaction> {
        self.log.iter().filter(|t| t.is_data())
    }

    pub fn clear(&mut self) {
        self.log.clear();
    }
}

impl TwoWireBus for RecordingBus {
    fn begin(&mut self, address: u8) {
        assert!(self.open.is_none(), "nested transaction");
        self.open = Some(Transaction {
            address,
            data: Vec::new(),
        });
    }

    fn write_bytes(&mut self, data: &[u8]) {
        let open = self.open.as_mut().expect("write outside transaction");
        open.data.extend_from_slice(data).unwrap();
    }

    fn end(&mut self) {
        let t = self.open.take().expect("end without begin");
        self.log.push(t).unwrap();
    }
}
