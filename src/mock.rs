//! In-memory timer for hosted use
//!
//! [`MockTimer`] keeps the register set in plain fields and records the order
//! of writes, so configuration sequences can be checked without hardware.

use crate::peripheral::TimerPeripheral;
use crate::register::{Cctl, Channel, Ctl, Percfg, PinSel};

/// Number of writes kept in the journal
pub const JOURNAL_LEN: usize = 32;

/// Snapshot of every register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    pub ctl: Ctl,
    pub compare: [u8; 2],
    pub cctl: [Cctl; 2],
    pub percfg: Percfg,
    pub pinsel: PinSel,
}

impl Registers {
    /// All registers cleared
    pub const RESET: Registers = Registers {
        ctl: Ctl::RESET,
        compare: [0; 2],
        cctl: [Cctl::IDLE; 2],
        percfg: Percfg::empty(),
        pinsel: PinSel::empty(),
    };

    pub const fn compare(&self, channel: Channel) -> u8 {
        self.compare[channel.index()]
    }

    pub const fn cctl(&self, channel: Channel) -> Cctl {
        self.cctl[channel.index()]
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::RESET
    }
}

/// Register touched by a write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    Ctl,
    Compare(Channel),
    Cctl(Channel),
    Percfg,
    PinSel,
}

/// Fake timer peripheral
#[derive(Debug, Clone)]
pub struct MockTimer {
    registers: Registers,
    journal: [Register; JOURNAL_LEN],
    writes: usize,
}

impl MockTimer {
    /// Timer with every register cleared
    pub const fn new() -> Self {
        Self::with_registers(Registers::RESET)
    }

    /// Timer whose registers power up holding `registers`
    pub const fn with_registers(registers: Registers) -> Self {
        Self {
            registers,
            journal: [Register::Ctl; JOURNAL_LEN],
            writes: 0,
        }
    }

    pub const fn registers(&self) -> Registers {
        self.registers
    }

    /// Register writes since creation or the last
    /// [`clear_journal`](Self::clear_journal), including those past the journal
    pub const fn writes(&self) -> usize {
        self.writes
    }

    /// The first [`JOURNAL_LEN`] of those writes, oldest first
    pub fn journal(&self) -> &[Register] {
        &self.journal[..self.writes.min(JOURNAL_LEN)]
    }

    pub fn clear_journal(&mut self) {
        self.writes = 0;
    }

    fn record(&mut self, register: Register) {
        if let Some(slot) = self.journal.get_mut(self.writes) {
            *slot = register;
        }
        self.writes += 1;
    }
}

impl Default for MockTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerPeripheral for MockTimer {
    fn write_ctl(&mut self, ctl: Ctl) {
        self.registers.ctl = ctl;
        self.record(Register::Ctl);
    }

    fn write_compare(&mut self, channel: Channel, value: u8) {
        self.registers.compare[channel.index()] = value;
        self.record(Register::Compare(channel));
    }

    fn write_cctl(&mut self, channel: Channel, cctl: Cctl) {
        self.registers.cctl[channel.index()] = cctl;
        self.record(Register::Cctl(channel));
    }

    fn modify_percfg<F>(&mut self, f: F)
    where
        F: FnOnce(Percfg) -> Percfg,
    {
        self.registers.percfg = f(self.registers.percfg);
        self.record(Register::Percfg);
    }

    fn modify_pinsel<F>(&mut self, f: F)
    where
        F: FnOnce(PinSel) -> PinSel,
    {
        self.registers.pinsel = f(self.registers.pinsel);
        self.record(Register::PinSel);
    }
}
