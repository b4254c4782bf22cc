//! Compiled-in PWM configuration
//!
//! The timer runs in a single fixed mode: a free-running 8-bit counter whose
//! wrap frequency is `clock / prescaler / 256`. Everything a deployment may
//! tune lives in [`PwmConfig`].

use core::fmt;

use fugit::HertzU32 as Hertz;

/// Counter wrap modulus
///
/// The counter counts 0..=255 and wraps, so the compare registers are 8 bits
/// wide and a duty value of `N` keeps the output active for `N/256` of a period.
pub const MODULUS: u32 = 256;

/// Largest quantization shift for a 32-bit millisecond counter
///
/// The triangle period is `512 << shift` milliseconds; up to this shift it
/// fits in a `u32` and divides the counter's wrap period evenly.
pub const MAX_QUANTIZATION_SHIFT: u8 = 22;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// No prescaler setting reaches the requested frequency
    FrequencyOutOfRange,
    /// Quantization shift is larger than [`MAX_QUANTIZATION_SHIFT`]
    QuantizationShift,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::FrequencyOutOfRange => f.write_str("frequency outside the prescaler range"),
            Error::QuantizationShift => f.write_str("quantization shift too large"),
        }
    }
}

/// DIV[2:0] clock division factor
///
/// Only power-of-two divisors exist, so an invalid prescaler cannot be expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Prescaler {
    Div1 = 0b000,
    Div2 = 0b001,
    Div4 = 0b010,
    Div8 = 0b011,
    Div16 = 0b100,
    Div32 = 0b101,
    Div64 = 0b110,
    Div128 = 0b111,
}

impl Prescaler {
    /// Every setting, fastest first
    pub const ALL: [Prescaler; 8] = [
        Prescaler::Div1,
        Prescaler::Div2,
        Prescaler::Div4,
        Prescaler::Div8,
        Prescaler::Div16,
        Prescaler::Div32,
        Prescaler::Div64,
        Prescaler::Div128,
    ];

    /// Raw DIV field value
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Decodes a DIV field; bits above the field are ignored.
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b111 {
            0b000 => Prescaler::Div1,
            0b001 => Prescaler::Div2,
            0b010 => Prescaler::Div4,
            0b011 => Prescaler::Div8,
            0b100 => Prescaler::Div16,
            0b101 => Prescaler::Div32,
            0b110 => Prescaler::Div64,
            _ => Prescaler::Div128,
        }
    }

    /// Division factor applied to the source clock
    pub const fn divisor(self) -> u32 {
        1 << self as u32
    }
}

/// Output polarity within one counter period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Output goes active at counter value 0 and inactive when the counter
    /// reaches the compare value.
    ActiveHigh,
    /// Output goes inactive at counter value 0 and active when the counter
    /// reaches the compare value.
    ActiveLow,
}

/// Which pin pair the timer outputs are routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Location {
    /// Default location
    Alt1,
    /// Alternative location
    Alt2,
}

/// PWM configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PwmConfig {
    /// Tick frequency feeding the prescaler
    pub clock: Hertz,
    /// Clock division ahead of the counter
    pub prescaler: Prescaler,
    /// Edge convention of both channels
    pub polarity: Polarity,
    /// Output pin location
    pub location: Location,
    /// Constant duty value of channel A
    pub static_duty: u8,
    /// Right shift applied to the millisecond counter before it feeds the
    /// triangle wave of channel B
    pub quantization_shift: u8,
}

impl PwmConfig {
    /// Reference settings on an arbitrary source clock
    pub const fn new(clock: Hertz) -> Self {
        Self {
            clock,
            prescaler: Prescaler::Div4,
            polarity: Polarity::ActiveHigh,
            location: Location::Alt1,
            static_duty: 210,
            quantization_shift: 3,
        }
    }

    /// Reference deployment: 24 MHz tick, 1:4 prescaler, 23.4 kHz PWM,
    /// channel A at 210/256 and an ~4 s triangle on channel B.
    pub const fn wixel() -> Self {
        Self::new(Hertz::from_raw(24_000_000))
    }

    /// Picks the fastest prescaler whose PWM frequency does not exceed `target`.
    pub fn with_frequency(clock: Hertz, target: Hertz) -> Result<Self, Error> {
        if target > wrap_frequency(clock, Prescaler::Div1) {
            return Err(Error::FrequencyOutOfRange);
        }

        let prescaler = Prescaler::ALL
            .iter()
            .copied()
            .find(|&p| wrap_frequency(clock, p) <= target)
            .ok_or(Error::FrequencyOutOfRange)?;

        Ok(Self::new(clock).prescaler(prescaler))
    }

    pub const fn prescaler(mut self, prescaler: Prescaler) -> Self {
        self.prescaler = prescaler;
        self
    }

    pub const fn polarity(mut self, polarity: Polarity) -> Self {
        self.polarity = polarity;
        self
    }

    pub const fn location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    pub const fn static_duty(mut self, duty: u8) -> Self {
        self.static_duty = duty;
        self
    }

    pub const fn quantization_shift(mut self, shift: u8) -> Self {
        self.quantization_shift = shift;
        self
    }

    /// PWM frequency: `clock / prescaler / 256`
    pub fn frequency(&self) -> Hertz {
        wrap_frequency(self.clock, self.prescaler)
    }

    /// Checks the settings that the types alone cannot bound.
    pub fn validate(&self) -> Result<(), Error> {
        if self.quantization_shift > MAX_QUANTIZATION_SHIFT {
            return Err(Error::QuantizationShift);
        }

        Ok(())
    }
}

impl Default for PwmConfig {
    fn default() -> Self {
        Self::wixel()
    }
}

fn wrap_frequency(clock: Hertz, prescaler: Prescaler) -> Hertz {
    Hertz::from_raw(clock.raw() / prescaler.divisor() / MODULUS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_frequency() {
        let config = PwmConfig::wixel();
        // 24 MHz / 4 / 256
        assert_eq!(config.frequency(), Hertz::from_raw(23_437));
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(PwmConfig::default(), config);
    }

    #[test]
    fn prescaler_bits() {
        for (i, p) in Prescaler::ALL.iter().enumerate() {
            assert_eq!(p.bits(), i as u8);
            assert_eq!(Prescaler::from_bits(p.bits()), *p);
            assert_eq!(p.divisor(), 1 << i);
        }
        assert_eq!(Prescaler::from_bits(0b1111_1010), Prescaler::Div4);
    }

    #[test]
    fn frequency_selection() {
        let clock = Hertz::from_raw(24_000_000);

        let config = PwmConfig::with_frequency(clock, Hertz::from_raw(23_437)).unwrap();
        assert_eq!(config.prescaler, Prescaler::Div4);

        let config = PwmConfig::with_frequency(clock, Hertz::from_raw(20_000)).unwrap();
        assert_eq!(config.prescaler, Prescaler::Div8);
        assert_eq!(config.frequency(), Hertz::from_raw(11_718));

        let config = PwmConfig::with_frequency(clock, Hertz::from_raw(93_750)).unwrap();
        assert_eq!(config.prescaler, Prescaler::Div1);

        let config = PwmConfig::with_frequency(clock, Hertz::from_raw(732)).unwrap();
        assert_eq!(config.prescaler, Prescaler::Div128);
    }

    #[test]
    fn frequency_out_of_range() {
        let clock = Hertz::from_raw(24_000_000);
        assert_eq!(
            PwmConfig::with_frequency(clock, Hertz::from_raw(100_000)),
            Err(Error::FrequencyOutOfRange)
        );
        assert_eq!(
            PwmConfig::with_frequency(clock, Hertz::from_raw(500)),
            Err(Error::FrequencyOutOfRange)
        );
    }

    #[test]
    fn shift_bound() {
        let config = PwmConfig::wixel().quantization_shift(MAX_QUANTIZATION_SHIFT);
        assert_eq!(config.validate(), Ok(()));

        let config = config.quantization_shift(MAX_QUANTIZATION_SHIFT + 1);
        assert_eq!(config.validate(), Err(Error::QuantizationShift));
    }
}
