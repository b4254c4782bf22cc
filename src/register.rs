//! Timer register values
//!
//! The timer is programmed through five logical registers:
//!
//! | Register | Purpose |
//! |----------|---------|
//! | [`Ctl`]    | prescaler, counting mode, counter start |
//! | compare  | one 8-bit threshold per [`Channel`] |
//! | [`Cctl`]   | per-channel compare/PWM mode select |
//! | [`Percfg`] | output location routing |
//! | [`PinSel`] | pin function select (GPIO or peripheral) |
//!
//! Field layouts follow an 8-bit timer (DIV[7:5] START[4] CLR[2] MODE[1:0]
//! for the control register, CMP[5:3] MODE[2] for channel control); other
//! backends translate these encodings to their own registers.

use crate::config::{Location, Polarity, Prescaler};

/// Output channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// Compare channel 0
    A,
    /// Compare channel 1
    B,
}

impl Channel {
    pub const ALL: [Channel; 2] = [Channel::A, Channel::B];

    /// Register index of this channel
    pub const fn index(self) -> usize {
        match self {
            Channel::A => 0,
            Channel::B => 1,
        }
    }
}

/// Control register: prescaler, counting mode and run bit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Ctl(u8);

impl Ctl {
    const DIV_OFFSET: u8 = 5;
    const START: u8 = 1 << 4;
    const MODE_MASK: u8 = 0b11;
    const MODE_FREE_RUNNING: u8 = 0b00;

    /// Power-on value: stopped, free-running, no division
    pub const RESET: Ctl = Ctl(0);

    pub const fn from_bits(bits: u8) -> Self {
        Ctl(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn with_prescaler(self, prescaler: Prescaler) -> Self {
        Ctl((self.0 & !(0b111 << Self::DIV_OFFSET)) | (prescaler.bits() << Self::DIV_OFFSET))
    }

    pub const fn prescaler(self) -> Prescaler {
        Prescaler::from_bits(self.0 >> Self::DIV_OFFSET)
    }

    /// Counts 0..=255 and wraps to 0
    pub const fn free_running(self) -> Self {
        Ctl((self.0 & !Self::MODE_MASK) | Self::MODE_FREE_RUNNING)
    }

    pub const fn is_free_running(self) -> bool {
        self.0 & Self::MODE_MASK == Self::MODE_FREE_RUNNING
    }

    pub const fn start(self) -> Self {
        Ctl(self.0 | Self::START)
    }

    pub const fn is_started(self) -> bool {
        self.0 & Self::START != 0
    }
}

/// Channel control register: compare mode of one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cctl(u8);

impl Cctl {
    const CMP_OFFSET: u8 = 3;
    const CMP_MASK: u8 = 0b111 << Self::CMP_OFFSET;
    const MODE_COMPARE: u8 = 1 << 2;

    /// Set output on compare-up, clear on 0
    const CMP_SET_ON_COMPARE: u8 = 0b011;
    /// Clear output on compare-up, set on 0
    const CMP_CLEAR_ON_COMPARE: u8 = 0b100;

    /// Capture mode with no edge selected: the output is not driven
    pub const IDLE: Cctl = Cctl(0);

    pub const fn from_bits(bits: u8) -> Self {
        Cctl(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Compare mode producing PWM with the given polarity
    ///
    /// `ActiveHigh` drives the output active at counter value 0 and inactive
    /// once the counter equals the compare value, so compare 0 is 0 % duty.
    pub const fn pwm(polarity: Polarity) -> Self {
        let cmp = match polarity {
            Polarity::ActiveHigh => Self::CMP_CLEAR_ON_COMPARE,
            Polarity::ActiveLow => Self::CMP_SET_ON_COMPARE,
        };
        Cctl(Self::MODE_COMPARE | (cmp << Self::CMP_OFFSET))
    }

    /// Polarity of a PWM mode value, `None` for anything else
    pub const fn polarity(self) -> Option<Polarity> {
        if self.0 & Self::MODE_COMPARE == 0 {
            return None;
        }

        match (self.0 & Self::CMP_MASK) >> Self::CMP_OFFSET {
            Self::CMP_CLEAR_ON_COMPARE => Some(Polarity::ActiveHigh),
            Self::CMP_SET_ON_COMPARE => Some(Polarity::ActiveLow),
            _ => None,
        }
    }
}

bitflags::bitflags! {
    /// Peripheral location routing
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Percfg: u8 {
        /// Timer outputs on the alternative location
        const T3CFG = 1 << 5;
    }
}

impl Percfg {
    pub const fn location(self) -> Location {
        if self.contains(Percfg::T3CFG) {
            Location::Alt2
        } else {
            Location::Alt1
        }
    }
}

bitflags::bitflags! {
    /// Pin function select: a set bit hands the pin to a peripheral
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PinSel: u8 {
        const P0 = 1 << 0;
        const P1 = 1 << 1;
        const P2 = 1 << 2;
        const P3 = 1 << 3;
        const P4 = 1 << 4;
        const P5 = 1 << 5;
        const P6 = 1 << 6;
        const P7 = 1 << 7;
    }
}

impl PinSel {
    /// Output pins of channel A and B at `location`
    pub const fn outputs(location: Location) -> PinSel {
        match location {
            Location::Alt1 => PinSel::P3.union(PinSel::P4),
            Location::Alt2 => PinSel::P7.union(PinSel::P6),
        }
    }

    /// Output pin of `channel` at `location`
    pub const fn output(location: Location, channel: Channel) -> PinSel {
        match (location, channel) {
            (Location::Alt1, Channel::A) => PinSel::P3,
            (Location::Alt1, Channel::B) => PinSel::P4,
            (Location::Alt2, Channel::A) => PinSel::P6,
            (Location::Alt2, Channel::B) => PinSel::P7,
        }
    }
}
