//! Duty-cycle waveforms
//!
//! Channel A holds a constant duty. Channel B follows a triangle wave derived
//! from the millisecond counter: `x = now >> shift` rises through its low byte
//! while bit 8 of `x` is clear and falls through the complement of that byte
//! while it is set. The ramps meet with equal values at both turning points
//! (`255 -> !0` and `!255 -> 0`), so consecutive steps never differ by more
//! than one.

use fugit::MillisDurationU32;

use crate::config::{Error, PwmConfig};
use crate::peripheral::TimerPeripheral;
use crate::pwm::PwmTimer;
use crate::time::TimeSource;

/// Triangle wave over the low nine bits of `x`: period 512, range 0..=255
pub const fn triangle(x: u32) -> u8 {
    let low = x as u8;
    if (x >> 8) & 1 == 0 {
        low
    } else {
        !low
    }
}

/// Stateless duty-cycle generator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WaveformDriver {
    static_duty: u8,
    shift: u8,
}

impl WaveformDriver {
    pub fn new(config: &PwmConfig) -> Result<Self, Error> {
        config.validate()?;

        Ok(Self {
            static_duty: config.static_duty,
            shift: config.quantization_shift,
        })
    }

    pub const fn static_duty(&self) -> u8 {
        self.static_duty
    }

    pub const fn quantization_shift(&self) -> u8 {
        self.shift
    }

    /// Duty values `(a, b)` for the counter reading `now_ms`
    ///
    /// Only the low bits of `now_ms` matter, so the counter wrapping around
    /// is harmless.
    pub const fn tick(&self, now_ms: u32) -> (u8, u8) {
        (self.static_duty, triangle(now_ms >> self.shift))
    }

    /// Full triangle period: 512 steps of `2^shift` ms
    pub const fn period(&self) -> MillisDurationU32 {
        MillisDurationU32::from_ticks(512 << self.shift)
    }

    /// One service-loop iteration: reads the clock once and writes both
    /// channels.
    pub fn drive<TIM, T>(&self, pwm: &mut PwmTimer<TIM>, time: &T)
    where
        TIM: TimerPeripheral,
        T: TimeSource + ?Sized,
    {
        pwm.apply(self.tick(time.now_ms()));
    }
}

impl Default for WaveformDriver {
    fn default() -> Self {
        let config = PwmConfig::wixel();
        Self {
            static_duty: config.static_duty,
            shift: config.quantization_shift,
        }
    }
}
