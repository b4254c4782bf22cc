//! Register-level access to a timer peripheral

use crate::register::{Cctl, Channel, Ctl, Percfg, PinSel};

/// Owned handle to the register set of one timer
///
/// Implementors are the only path to the timer's registers: whoever holds the
/// value owns the hardware. Writes are fire-and-forget and cannot fail.
pub trait TimerPeripheral {
    /// Writes the control register
    fn write_ctl(&mut self, ctl: Ctl);

    /// Writes the compare threshold of `channel`
    ///
    /// The new value takes effect at the next counter wrap.
    fn write_compare(&mut self, channel: Channel, value: u8);

    /// Writes the channel control register of `channel`
    fn write_cctl(&mut self, channel: Channel, cctl: Cctl);

    /// Read-modify-write of the location routing register
    fn modify_percfg<F>(&mut self, f: F)
    where
        F: FnOnce(Percfg) -> Percfg;

    /// Read-modify-write of the pin function select register
    fn modify_pinsel<F>(&mut self, f: F)
    where
        F: FnOnce(PinSel) -> PinSel;
}

impl<T> TimerPeripheral for &mut T
where
    T: TimerPeripheral,
{
    fn write_ctl(&mut self, ctl: Ctl) {
        (**self).write_ctl(ctl)
    }

    fn write_compare(&mut self, channel: Channel, value: u8) {
        (**self).write_compare(channel, value)
    }

    fn write_cctl(&mut self, channel: Channel, cctl: Cctl) {
        (**self).write_cctl(channel, cctl)
    }

    fn modify_percfg<F>(&mut self, f: F)
    where
        F: FnOnce(Percfg) -> Percfg,
    {
        (**self).modify_percfg(f)
    }

    fn modify_pinsel<F>(&mut self, f: F)
    where
        F: FnOnce(PinSel) -> PinSel,
    {
        (**self).modify_pinsel(f)
    }
}
