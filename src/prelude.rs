pub use fugit::{ExtU32 as _, RateExtU32 as _};

pub use crate::hal::PwmPin as _dual_pwm_hal_PwmPin;
pub use crate::peripheral::TimerPeripheral as _dual_pwm_peripheral_TimerPeripheral;
pub use crate::time::TimeSource as _dual_pwm_time_TimeSource;
