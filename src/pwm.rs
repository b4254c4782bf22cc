//! Dual-channel PWM
//!
//! [`PwmTimer`] puts a timer into free-running PWM mode once and afterwards
//! only rewrites the two compare thresholds. The counter and the output pins
//! are driven by the hardware on its own.
//!
//! ```
//! use dual_pwm::{mock::MockTimer, Channel, PwmConfig, PwmTimer};
//!
//! let mut pwm = PwmTimer::new(MockTimer::new(), PwmConfig::wixel());
//! pwm.initialize();
//! pwm.set_duty_cycle(Channel::A, 210);
//! assert_eq!(pwm.duty_cycle(Channel::A), 210);
//! ```

use fugit::HertzU32 as Hertz;

use crate::config::{Location, PwmConfig};
use crate::hal::PwmPin;
use crate::peripheral::TimerPeripheral;
use crate::register::{Cctl, Channel, Ctl, Percfg, PinSel};

/// Timer configured for two PWM outputs
pub struct PwmTimer<TIM> {
    tim: TIM,
    config: PwmConfig,
    duty: [u8; 2],
    enabled: [bool; 2],
    initialized: bool,
}

impl<TIM> PwmTimer<TIM>
where
    TIM: TimerPeripheral,
{
    /// Takes ownership of `tim`; no register is touched until
    /// [`initialize`](Self::initialize).
    pub fn new(tim: TIM, config: PwmConfig) -> Self {
        debug_assert!(config.validate().is_ok(), "invalid PWM configuration");

        Self {
            tim,
            config,
            duty: [0; 2],
            enabled: [false; 2],
            initialized: false,
        }
    }

    /// Starts PWM generation on both channels at 0 % duty and hands the
    /// output pins to the timer.
    ///
    /// Calling it again rewrites the same configuration and resets both
    /// channels to 0 %.
    pub fn initialize(&mut self) {
        let prescaler = self.config.prescaler;
        let location = self.config.location;

        // Free-running counter, wraps after 255
        self.tim
            .write_ctl(Ctl::RESET.with_prescaler(prescaler).free_running().start());

        // Compare thresholds before the outputs are enabled so they cannot
        // glitch to whatever the registers held at power-up
        for channel in Channel::ALL {
            self.tim.write_compare(channel, 0);
            self.duty[channel.index()] = 0;
        }

        let cctl = Cctl::pwm(self.config.polarity);
        for channel in Channel::ALL {
            self.tim.write_cctl(channel, cctl);
            self.enabled[channel.index()] = true;
        }

        self.tim.modify_percfg(|r| match location {
            Location::Alt1 => r.difference(Percfg::T3CFG),
            Location::Alt2 => r.union(Percfg::T3CFG),
        });

        // Last step: from here on the pins belong to the timer
        let pins = PinSel::outputs(location);
        self.tim.modify_pinsel(|r| r.union(pins));

        self.initialized = true;

        info!(
            "pwm: {=u32} Hz (clock {=u32} Hz / {=u32} / 256), pins {=u8:#x}",
            self.frequency().raw(),
            self.config.clock.raw(),
            prescaler.divisor(),
            pins.bits()
        );
    }

    /// Writes the compare threshold of `channel`; the new duty cycle
    /// (`duty / 256`) starts with the next counter period.
    pub fn set_duty_cycle(&mut self, channel: Channel, duty: u8) {
        debug_assert!(self.initialized, "set_duty_cycle before initialize");

        self.tim.write_compare(channel, duty);
        self.duty[channel.index()] = duty;

        trace!("pwm: {} <- {=u8}", channel, duty);
    }

    /// Last duty value written to `channel`
    pub fn duty_cycle(&self, channel: Channel) -> u8 {
        self.duty[channel.index()]
    }

    /// Writes both channels, A first
    pub fn apply(&mut self, (a, b): (u8, u8)) {
        self.set_duty_cycle(Channel::A, a);
        self.set_duty_cycle(Channel::B, b);
    }

    pub fn max_duty(&self) -> u8 {
        u8::MAX
    }

    /// PWM frequency of both channels
    pub fn frequency(&self) -> Hertz {
        self.config.frequency()
    }

    pub fn config(&self) -> &PwmConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_enabled(&self, channel: Channel) -> bool {
        self.enabled[channel.index()]
    }

    /// Borrows one channel as an [`embedded_hal::PwmPin`]
    pub fn channel(&mut self, channel: Channel) -> PwmChannel<'_, TIM> {
        PwmChannel {
            timer: self,
            channel,
        }
    }

    /// Releases the timer peripheral
    pub fn free(self) -> TIM {
        self.tim
    }

    fn set_enabled(&mut self, channel: Channel, enabled: bool) {
        let cctl = if enabled {
            Cctl::pwm(self.config.polarity)
        } else {
            Cctl::IDLE
        };

        self.tim.write_cctl(channel, cctl);
        self.enabled[channel.index()] = enabled;

        debug!("pwm: {} enabled={=bool}", channel, enabled);
    }
}

/// One output of a [`PwmTimer`]
///
/// Disabling a channel stops the compare output but leaves its pin routed to
/// the timer.
pub struct PwmChannel<'a, TIM> {
    timer: &'a mut PwmTimer<TIM>,
    channel: Channel,
}

impl<'a, TIM> PwmChannel<'a, TIM> {
    pub fn id(&self) -> Channel {
        self.channel
    }
}

impl<'a, TIM> PwmPin for PwmChannel<'a, TIM>
where
    TIM: TimerPeripheral,
{
    type Duty = u8;

    fn disable(&mut self) {
        self.timer.set_enabled(self.channel, false);
    }

    fn enable(&mut self) {
        self.timer.set_enabled(self.channel, true);
    }

    fn get_duty(&self) -> u8 {
        self.timer.duty_cycle(self.channel)
    }

    fn get_max_duty(&self) -> u8 {
        self.timer.max_duty()
    }

    fn set_duty(&mut self, duty: u8) {
        self.timer.set_duty_cycle(self.channel, duty);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Polarity;
    use crate::mock::{MockTimer, Register, Registers};

    fn initialized(config: PwmConfig) -> PwmTimer<MockTimer> {
        let mut pwm = PwmTimer::new(MockTimer::new(), config);
        pwm.initialize();
        pwm
    }

    #[test]
    fn new_leaves_registers_alone() {
        let pwm = PwmTimer::new(MockTimer::new(), PwmConfig::wixel());
        assert!(!pwm.is_initialized());
        assert_eq!(pwm.free().writes(), 0);
    }

    #[test]
    fn initialize_reference_registers() {
        let pwm = initialized(PwmConfig::wixel());
        let regs = pwm.free().registers();

        assert_eq!(regs.ctl.bits(), 0b0101_0000);
        assert_eq!(regs.compare, [0, 0]);
        assert_eq!(regs.cctl(Channel::A).bits(), 0b0010_0100);
        assert_eq!(regs.cctl(Channel::B).bits(), 0b0010_0100);
        assert!(!regs.percfg.contains(Percfg::T3CFG));
        assert_eq!(regs.pinsel.bits(), (1 << 3) | (1 << 4));
    }

    #[test]
    fn initialize_routes_pins_last() {
        let pwm = initialized(PwmConfig::wixel());
        let tim = pwm.free();
        let journal = tim.journal();

        assert_eq!(journal.first(), Some(&Register::Ctl));
        assert_eq!(journal.last(), Some(&Register::PinSel));

        let last_compare = journal
            .iter()
            .rposition(|r| matches!(r, Register::Compare(_)))
            .unwrap();
        let first_mode = journal
            .iter()
            .position(|r| matches!(r, Register::Cctl(_)))
            .unwrap();
        assert!(last_compare < first_mode);
    }

    #[test]
    fn initialize_zeroes_power_up_garbage() {
        let garbage = Registers {
            compare: [0xA5, 0x5A],
            percfg: Percfg::T3CFG,
            ..Registers::RESET
        };
        let mut pwm = PwmTimer::new(MockTimer::with_registers(garbage), PwmConfig::wixel());
        pwm.initialize();
        let regs = pwm.free().registers();

        assert_eq!(regs.compare, [0, 0]);
        assert!(!regs.percfg.contains(Percfg::T3CFG));
    }

    #[test]
    fn alternative_location_and_polarity() {
        let config = PwmConfig::wixel()
            .location(Location::Alt2)
            .polarity(Polarity::ActiveLow);
        let regs = initialized(config).free().registers();

        assert!(regs.percfg.contains(Percfg::T3CFG));
        assert_eq!(regs.pinsel, PinSel::P6 | PinSel::P7);
        assert_eq!(regs.cctl(Channel::A).polarity(), Some(Polarity::ActiveLow));
    }

    #[test]
    fn duty_writes_single_register() {
        let mut pwm = initialized(PwmConfig::wixel());
        pwm.tim.clear_journal();

        pwm.set_duty_cycle(Channel::B, 99);

        assert_eq!(pwm.tim.journal(), &[Register::Compare(Channel::B)]);
        assert_eq!(pwm.tim.registers().compare, [0, 99]);
    }

    #[test]
    fn reinitialize_resets_duty() {
        let mut pwm = initialized(PwmConfig::wixel());
        pwm.apply((40, 50));
        pwm.initialize();

        assert_eq!(pwm.duty_cycle(Channel::A), 0);
        assert_eq!(pwm.duty_cycle(Channel::B), 0);
        assert_eq!(pwm.free().registers().compare, [0, 0]);
    }

    #[test]
    fn apply_sets_both() {
        let mut pwm = initialized(PwmConfig::wixel());
        pwm.apply((210, 17));

        assert_eq!(pwm.duty_cycle(Channel::A), 210);
        assert_eq!(pwm.duty_cycle(Channel::B), 17);
        assert_eq!(pwm.free().registers().compare, [210, 17]);
    }

    #[test]
    fn pwm_pin_channel() {
        let mut pwm = initialized(PwmConfig::wixel());

        {
            let mut ch = pwm.channel(Channel::B);
            assert_eq!(ch.id(), Channel::B);
            assert_eq!(ch.get_max_duty(), 255);
            ch.set_duty(128);
            assert_eq!(ch.get_duty(), 128);
            ch.disable();
        }
        assert!(!pwm.is_enabled(Channel::B));
        assert!(pwm.is_enabled(Channel::A));

        let regs = pwm.free().registers();
        assert_eq!(regs.cctl(Channel::B), Cctl::IDLE);
        // pin stays with the timer
        assert!(regs.pinsel.contains(PinSel::P4));
        assert_eq!(regs.compare(Channel::B), 128);
    }

    #[test]
    fn reenable_restores_mode() {
        let mut pwm = initialized(PwmConfig::wixel());
        pwm.channel(Channel::A).disable();
        pwm.channel(Channel::A).enable();

        assert!(pwm.is_enabled(Channel::A));
        assert_eq!(
            pwm.free().registers().cctl(Channel::A),
            Cctl::pwm(Polarity::ActiveHigh)
        );
    }

    #[test]
    fn reference_frequency() {
        let pwm = PwmTimer::new(MockTimer::new(), PwmConfig::wixel());
        assert_eq!(pwm.frequency(), Hertz::from_raw(23_437));
        assert_eq!(pwm.max_duty(), 255);
    }
}
