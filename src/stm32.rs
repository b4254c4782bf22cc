//! TIM3 backend for STM32F7 devices
//!
//! Maps the logical timer registers onto TIM3 channels 1 and 2.
//!
//! ----------------------------------
//!  Location | PIN_CH1  | PIN_CH2  |
//! ----------|----------|----------|
//!  Alt1     | PA6 \ 2  | PA7 \ 2  |
//!  Alt2     | PB4 \ 2  | PB5 \ 2  |
//!
//! The counter is clocked from the APB1 timer clock (16 MHz out of reset), so
//! a [`PwmConfig`](crate::PwmConfig) built for this backend should use that
//! frequency as its `clock`.

use cast::u32;

use crate::config::{Location, Polarity, MODULUS};
use crate::pac::{GPIOA, GPIOB, RCC, TIM3};
use crate::peripheral::TimerPeripheral;
use crate::register::{Cctl, Channel, Ctl, Percfg, PinSel};

const CR1_CEN: u32 = 1 << 0;
const CR1_DIR: u32 = 1 << 4;
const CR1_CMS: u32 = 0b11 << 5;
const CR1_ARPE: u32 = 1 << 7;

/// CC1S, OC1FE, OC1PE, OC1M[2:0], OC1CE and OC1M[3]; shifted by 8 for channel 2
const CCMR_CHANNEL: u32 = 0xFF | (1 << 16);
const CCMR_OCPE: u32 = 1 << 3;
/// PWM mode 1: active while CNT < CCR
const CCMR_OCM_PWM1: u32 = 0b110 << 4;

/// CCxE, CCxP, CCxNP; shifted by 4 for channel 2
const CCER_CHANNEL: u32 = 0b1011;
const CCER_E: u32 = 1 << 0;
const CCER_P: u32 = 1 << 1;

const MODER_MASK: u32 = 0b11;
const MODER_ALTERNATE: u32 = 0b10;
const AFR_MASK: u32 = 0xF;
const AF2: u32 = 2;

macro_rules! route_pin {
    ($GPIOX:ident, $pin:expr, $alternate:expr) => {{
        // NOTE(unsafe) only the MODER and AFRL fields of this pin are modified
        let gpio = unsafe { &*$GPIOX::ptr() };
        let moder = 2 * $pin;
        let afr = 4 * $pin;

        if $alternate {
            gpio.afrl.modify(|r, w| unsafe {
                w.bits((r.bits() & !(AFR_MASK << afr)) | (AF2 << afr))
            });
            gpio.moder.modify(|r, w| unsafe {
                w.bits((r.bits() & !(MODER_MASK << moder)) | (MODER_ALTERNATE << moder))
            });
        } else {
            // back to input
            gpio.moder
                .modify(|r, w| unsafe { w.bits(r.bits() & !(MODER_MASK << moder)) });
        }
    }};
}

/// TIM3 as a [`TimerPeripheral`]
pub struct Tim3Pwm {
    tim: TIM3,
    percfg: Percfg,
    pinsel: PinSel,
}

impl Tim3Pwm {
    /// Enables and resets TIM3 and enables the GPIOA/GPIOB clocks.
    pub fn new(tim: TIM3) -> Self {
        // NOTE(unsafe) only the TIM3, GPIOA and GPIOB bits are modified
        let rcc = unsafe { &*RCC::ptr() };
        rcc.apb1enr.modify(|_, w| w.tim3en().set_bit());
        rcc.apb1rstr.modify(|_, w| w.tim3rst().set_bit());
        rcc.apb1rstr.modify(|_, w| w.tim3rst().clear_bit());
        rcc.ahb1enr
            .modify(|_, w| w.gpioaen().set_bit().gpioben().set_bit());

        Self {
            tim,
            percfg: Percfg::empty(),
            pinsel: PinSel::empty(),
        }
    }

    /// Stops the counter and releases TIM3
    pub fn free(self) -> TIM3 {
        self.tim.cr1.modify(|_, w| w.cen().clear_bit());
        self.tim
    }

    fn route(&self, pins: PinSel, alternate: bool) {
        let location = self.percfg.location();
        for channel in Channel::ALL {
            if !pins.contains(PinSel::output(location, channel)) {
                continue;
            }

            match (location, channel) {
                (Location::Alt1, Channel::A) => route_pin!(GPIOA, 6, alternate),
                (Location::Alt1, Channel::B) => route_pin!(GPIOA, 7, alternate),
                (Location::Alt2, Channel::A) => route_pin!(GPIOB, 4, alternate),
                (Location::Alt2, Channel::B) => route_pin!(GPIOB, 5, alternate),
            }
        }
    }
}

impl TimerPeripheral for Tim3Pwm {
    fn write_ctl(&mut self, ctl: Ctl) {
        self.tim.cr1.modify(|_, w| w.cen().clear_bit());

        let psc = ctl.prescaler().divisor() - 1;
        self.tim.psc.write(|w| unsafe { w.bits(psc) });
        self.tim.arr.write(|w| unsafe { w.bits(MODULUS - 1) });

        if ctl.is_free_running() {
            // edge-aligned up-counting, ARR buffered
            self.tim.cr1.modify(|r, w| unsafe {
                w.bits((r.bits() & !(CR1_DIR | CR1_CMS)) | CR1_ARPE)
            });
        }

        // Trigger an update event to load the prescaler value to the clock
        self.tim.egr.write(|w| w.ug().set_bit());
        // The update event also raises UIF, which nothing here waits for
        self.tim.sr.modify(|_, w| w.uif().clear_bit());

        if ctl.is_started() {
            self.tim
                .cr1
                .modify(|r, w| unsafe { w.bits(r.bits() | CR1_CEN) });
        }
    }

    fn write_compare(&mut self, channel: Channel, value: u8) {
        match channel {
            Channel::A => self.tim.ccr1().write(|w| unsafe { w.bits(u32(value)) }),
            Channel::B => self.tim.ccr2().write(|w| unsafe { w.bits(u32(value)) }),
        }
    }

    fn write_cctl(&mut self, channel: Channel, cctl: Cctl) {
        let (ccmr, ccer) = match channel {
            Channel::A => (0, 0),
            Channel::B => (8, 4),
        };

        match cctl.polarity() {
            Some(polarity) => {
                self.tim.ccmr1_output().modify(|r, w| unsafe {
                    w.bits(
                        (r.bits() & !(CCMR_CHANNEL << ccmr))
                            | ((CCMR_OCM_PWM1 | CCMR_OCPE) << ccmr),
                    )
                });

                let bits = match polarity {
                    Polarity::ActiveHigh => CCER_E,
                    Polarity::ActiveLow => CCER_E | CCER_P,
                };
                self.tim.ccer.modify(|r, w| unsafe {
                    w.bits((r.bits() & !(CCER_CHANNEL << ccer)) | (bits << ccer))
                });
            }
            None => {
                self.tim
                    .ccer
                    .modify(|r, w| unsafe { w.bits(r.bits() & !(CCER_E << ccer)) });
            }
        }
    }

    fn modify_percfg<F>(&mut self, f: F)
    where
        F: FnOnce(Percfg) -> Percfg,
    {
        let percfg = f(self.percfg);

        if percfg.location() != self.percfg.location() {
            // Pins of the old location go back to GPIO
            let stale = PinSel::outputs(self.percfg.location()).intersection(self.pinsel);
            self.route(stale, false);
            self.pinsel = self.pinsel.difference(stale);
        }

        self.percfg = percfg;
    }

    fn modify_pinsel<F>(&mut self, f: F)
    where
        F: FnOnce(PinSel) -> PinSel,
    {
        let pinsel = f(self.pinsel);

        self.route(self.pinsel.difference(pinsel), false);
        self.route(pinsel.difference(self.pinsel), true);
        self.pinsel = pinsel;
    }
}
