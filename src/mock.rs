//! Mock I2C device for driver tests.
//!
//! Emulates a single register-addressed device: a write sets the register
//! pointer from its first byte and stores the remaining bytes, a read returns
//! consecutive registers starting at the pointer. Every transaction is logged.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
use std::vec::Vec;

/// Logged bus transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transaction {
    Write { addr: u8, data: Vec<u8> },
    Read { addr: u8, reg: u8, len: usize },
}

#[derive(Debug)]
pub struct MockI2c {
    address: u8,
    registers: [u8; 256],
    pointer: u8,
    transactions: Vec<Transaction>,
    fail: bool,
}

impl MockI2c {
    pub fn new(address: u8) -> Self {
        Self {
            address,
            registers: [0; 256],
            pointer: 0,
            transactions: Vec::new(),
            fail: false,
        }
    }

    pub fn set_register(&mut self, reg: u8, value: u8) {
        self.registers[reg as usize] = value;
    }

    pub fn set_registers(&mut self, start: u8, values: &[u8]) {
        let start = start as usize;
        self.registers[start..start + values.len()].copy_from_slice(values);
    }

    pub fn register(&self, reg: u8) -> u8 {
        self.registers[reg as usize]
    }

    /// Every following transaction is NACKed.
    pub fn fail_all(&mut self) {
        self.fail = true;
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Bytes written to `reg`, in order, excluding multi-register writes.
    pub fn writes_to(&self, reg: u8) -> Vec<u8> {
        self.transactions
            .iter()
            .filter_map(|t| match t {
                Transaction::Write { data, .. } if data.len() == 2 && data[0] == reg => {
                    Some(data[1])
                }
                _ => None,
            })
            .collect()
    }
}

impl ErrorType for MockI2c {
    type Error = ErrorKind;
}

impl I2c for MockI2c {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if self.fail || address != self.address {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        for operation in operations {
            match operation {
                Operation::Write(data) => {
                    self.transactions.push(Transaction::Write {
                        addr: address,
                        data: data.to_vec(),
                    });
                    if let Some((&reg, values)) = data.split_first() {
                        self.pointer = reg;
                        for (offset, value) in values.iter().enumerate() {
                            self.registers[reg.wrapping_add(offset as u8) as usize] = *value;
                        }
                    }
                }
                Operation::Read(buffer) => {
                    self.transactions.push(Transaction::Read {
                        addr: address,
                        reg: self.pointer,
                        len: buffer.len(),
                    });
                    for byte in buffer.iter_mut() {
                        *byte = self.registers[self.pointer as usize];
                        self.pointer = self.pointer.wrapping_add(1);
                    }
                }
            }
        }
        Ok(())
    }
}

/// Delay that returns immediately.
pub struct NoopDelay;

impl DelayNs for NoopDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}
