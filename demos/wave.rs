//! Reference PWM loop on TIM3
//!
//! PA6 holds a constant 210/256 duty cycle, PA7 sweeps up and down over ~4 s.

//#![deny(warnings)]
#![no_std]
#![no_main]

extern crate panic_halt;

use core::fmt::Write;

use cortex_m::peripheral::syst::SystClkSource;
use cortex_m_rt::{entry, exception};
use cortex_m_semihosting::hio;

use dual_pwm::{
    pac, prelude::*, stm32::Tim3Pwm, time::MillisCounter, PwmConfig, PwmTimer, WaveformDriver,
};

/// HSI, feeding both the core and the APB1 timers out of reset
const CLOCK_HZ: u32 = 16_000_000;

static MILLIS: MillisCounter = MillisCounter::new();

#[entry]
fn main() -> ! {
    let dp = pac::Peripherals::take().unwrap();
    let mut cp = cortex_m::Peripherals::take().unwrap();

    // 1 kHz tick for the millisecond counter
    cp.SYST.set_clock_source(SystClkSource::Core);
    cp.SYST.set_reload(CLOCK_HZ / 1_000 - 1);
    cp.SYST.clear_current();
    cp.SYST.enable_counter();
    cp.SYST.enable_interrupt();

    let config = PwmConfig::new(CLOCK_HZ.Hz());
    let driver = WaveformDriver::new(&config).unwrap();

    let mut pwm = PwmTimer::new(Tim3Pwm::new(dp.TIM3), config);
    pwm.initialize();

    let mut hstdout = hio::hstdout().unwrap();
    writeln!(hstdout, "PWM at {} Hz", pwm.frequency().raw()).unwrap();

    loop {
        driver.drive(&mut pwm, &MILLIS);
    }
}

#[exception]
fn SysTick() {
    MILLIS.increment();
}
