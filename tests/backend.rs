//! Compiled with a device feature, e.g. `cargo test --features stm32f746`
#![cfg(feature = "device-selected")]

use dual_pwm::prelude::*;
use dual_pwm::stm32::Tim3Pwm;
use dual_pwm::{PwmConfig, PwmTimer, TimerPeripheral};

fn assert_peripheral<T: TimerPeripheral>() {}

#[test]
fn tim3_is_a_timer_peripheral() {
    assert_peripheral::<Tim3Pwm>();
    assert_peripheral::<&mut Tim3Pwm>();
}

#[test]
fn tim3_drives_pwm_timer() {
    // never called; register access needs the target
    let _build = |tim: dual_pwm::pac::TIM3| {
        let mut pwm = PwmTimer::new(Tim3Pwm::new(tim), PwmConfig::new(16.MHz()));
        pwm.initialize();
        pwm.set_duty_cycle(dual_pwm::Channel::A, 128);
        pwm.free().free()
    };
}
