//! Dual-channel timer PWM
//!
//! Configures one hardware timer for two autonomous PWM outputs and drives
//! their duty cycles from a millisecond clock: channel A at a fixed level,
//! channel B along a triangle wave.
//!
//! ```
//! use dual_pwm::{mock::MockTimer, PwmConfig, PwmTimer, WaveformDriver};
//!
//! let config = PwmConfig::wixel();
//! let mut pwm = PwmTimer::new(MockTimer::new(), config);
//! let driver = WaveformDriver::new(&config).unwrap();
//!
//! pwm.initialize();
//! driver.drive(&mut pwm, &|| 2056u32);
//! assert_eq!(pwm.free().registers().compare, [210, 254]);
//! ```
//!
//! Any register set implementing [`TimerPeripheral`] can be driven; the
//! `stm32f7xx` device features add a TIM3 backend in [`stm32`].

#![no_std]

// This mod MUST go first, so that the others see its macros.
mod fmt;

pub(crate) use embedded_hal as hal;

#[cfg(feature = "stm32f722")]
pub use stm32f7::stm32f7x2 as pac;

#[cfg(feature = "stm32f723")]
pub use stm32f7::stm32f7x3 as pac;

#[cfg(feature = "stm32f730")]
pub use stm32f7::stm32f730 as pac;

#[cfg(feature = "stm32f732")]
pub use stm32f7::stm32f7x2 as pac;

#[cfg(feature = "stm32f733")]
pub use stm32f7::stm32f7x3 as pac;

#[cfg(feature = "stm32f745")]
pub use stm32f7::stm32f745 as pac;

#[cfg(feature = "stm32f746")]
pub use stm32f7::stm32f7x6 as pac;

#[cfg(feature = "stm32f756")]
pub use stm32f7::stm32f7x6 as pac;

#[cfg(feature = "stm32f765")]
pub use stm32f7::stm32f765 as pac;

#[cfg(feature = "stm32f767")]
pub use stm32f7::stm32f7x7 as pac;

#[cfg(feature = "stm32f769")]
pub use stm32f7::stm32f7x9 as pac;

#[cfg(feature = "stm32f777")]
pub use stm32f7::stm32f7x7 as pac;

#[cfg(feature = "stm32f778")]
pub use stm32f7::stm32f7x9 as pac;

#[cfg(feature = "stm32f779")]
pub use stm32f7::stm32f7x9 as pac;

// Enable use of interrupt macro
#[cfg(all(feature = "rt", feature = "device-selected"))]
pub use crate::pac::interrupt;

pub mod config;
pub mod mock;
pub mod peripheral;
pub mod prelude;
pub mod pwm;
pub mod register;
pub mod time;
pub mod waveform;

#[cfg(feature = "device-selected")]
pub mod stm32;

pub use crate::config::{Error, Location, Polarity, Prescaler, PwmConfig};
pub use crate::peripheral::TimerPeripheral;
pub use crate::pwm::{PwmChannel, PwmTimer};
pub use crate::register::Channel;
pub use crate::time::TimeSource;
pub use crate::waveform::WaveformDriver;
