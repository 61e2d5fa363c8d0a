//! Scripted buses for driver tests

use std::collections::VecDeque;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use matrix_lidar_hal::{I2cBus, UartRx, UartTx};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusError {
    Nack,
    /// Zero-length write, refused like the RP2040 controller does
    EmptyWrite,
}

/// I2C device that answers reads from a queue, then with idle bytes
#[derive(Debug)]
pub struct ScriptedI2c {
    present: u8,
    incoming: VecDeque<u8>,
    pub writes: Vec<Vec<u8>>,
    pub reads: usize,
}

impl ScriptedI2c {
    pub fn new(present: u8) -> Self {
        Self {
            present,
            incoming: VecDeque::new(),
            writes: Vec::new(),
            reads: 0,
        }
    }

    pub fn queue(&mut self, bytes: &[u8]) {
        self.incoming.extend(bytes.iter().copied());
    }
}

impl I2cBus for ScriptedI2c {
    type Error = BusError;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), BusError> {
        if address != self.present {
            return Err(BusError::Nack);
        }
        if data.is_empty() {
            return Err(BusError::EmptyWrite);
        }
        self.writes.push(data.to_vec());
        Ok(())
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), BusError> {
        if address != self.present {
            return Err(BusError::Nack);
        }
        for slot in buf.iter_mut() {
            *slot = self.incoming.pop_front().unwrap_or(0xFF);
            self.reads += 1;
        }
        Ok(())
    }
}

/// UART that delivers queued bytes, at most `max_chunk` per read
#[derive(Debug)]
pub struct ScriptedUart {
    incoming: VecDeque<u8>,
    pub max_chunk: usize,
    pub writes: Vec<Vec<u8>>,
    pub flushes: usize,
}

impl Default for ScriptedUart {
    fn default() -> Self {
        Self {
            incoming: VecDeque::new(),
            max_chunk: usize::MAX,
            writes: Vec::new(),
            flushes: 0,
        }
    }
}

impl ScriptedUart {
    pub fn queue(&mut self, bytes: &[u8]) {
        self.incoming.extend(bytes.iter().copied());
    }
}

impl UartTx for ScriptedUart {
    type Error = BusError;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), BusError> {
        self.writes.push(data.to_vec());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), BusError> {
        self.flushes += 1;
        Ok(())
    }
}

impl UartRx for ScriptedUart {
    type Error = BusError;

    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, BusError> {
        let n = buf.len().min(self.max_chunk).min(self.incoming.len());
        for slot in buf.iter_mut().take(n) {
            *slot = self.incoming.pop_front().unwrap_or(0);
        }
        Ok(n)
    }
}

/// Delay that adds up the requested time instead of sleeping
#[derive(Debug, Default)]
pub struct CountingDelay {
    total_ns: u64,
}

impl CountingDelay {
    pub fn total_ms(&self) -> u64 {
        self.total_ns / 1_000_000
    }
}

impl DelayNs for CountingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}
