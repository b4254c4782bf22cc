use dual_pwm::waveform::triangle;
use dual_pwm::{PwmConfig, WaveformDriver};

fn driver(shift: u8) -> WaveformDriver {
    WaveformDriver::new(&PwmConfig::wixel().quantization_shift(shift)).unwrap()
}

fn jump(a: u8, b: u8) -> u8 {
    if a > b {
        a - b
    } else {
        b - a
    }
}

#[test]
fn static_channel_is_constant() {
    let driver = WaveformDriver::new(&PwmConfig::wixel().static_duty(77)).unwrap();

    for t in (0..=u32::MAX).step_by(7919) {
        assert_eq!(driver.tick(t).0, 77);
    }
    assert_eq!(driver.tick(u32::MAX).0, 77);
}

#[test]
fn reference_sequence() {
    let driver = WaveformDriver::default();

    assert_eq!(driver.tick(0), (210, 0));
    assert_eq!(driver.tick(8), (210, 1));
    assert_eq!(driver.tick(2040), (210, 255));
    assert_eq!(driver.tick(2048), (210, 255));
    assert_eq!(driver.tick(2056), (210, 254));
}

#[test]
fn periodic_over_full_counter() {
    for shift in [0, 3, 7, 22] {
        let driver = driver(shift);
        let period = driver.period().to_millis();
        assert_eq!(period, 512 << shift);

        for t in (0..=u32::MAX).step_by(104_729) {
            assert_eq!(
                driver.tick(t).1,
                driver.tick(t.wrapping_add(period)).1,
                "shift {} t {}",
                shift,
                t
            );
        }
    }
}

#[test]
fn ramps_are_monotonic() {
    let driver = WaveformDriver::default();
    let period = driver.period().to_millis();
    let base = 10 * period;

    let mut previous = driver.tick(base).1;
    for t in base + 1..base + period {
        let x = t >> 3;
        let duty = driver.tick(t).1;

        // within one half the direction is fixed by bit 8 of x
        if x & 0xFF != 0 {
            if (x >> 8) & 1 == 0 {
                assert!(duty >= previous, "t {}", t);
            } else {
                assert!(duty <= previous, "t {}", t);
            }
        }
        previous = duty;
    }
}

#[test]
fn no_jump_larger_than_one_step() {
    let driver = WaveformDriver::default();

    let mut previous = driver.tick(0).1;
    for t in 1..3 * driver.period().to_millis() {
        let duty = driver.tick(t).1;
        assert!(jump(previous, duty) <= 1, "t {}", t);
        previous = duty;
    }
}

#[test]
fn turning_points_are_flat() {
    // x = 255 -> 256 and x = 511 -> 512
    assert_eq!(triangle(255), triangle(256));
    assert_eq!(triangle(511), triangle(512));

    for k in 0..64u32 {
        let apex = k * 512 + 255;
        assert!(jump(triangle(apex), triangle(apex + 1)) <= 1);
        let trough = k * 512 + 511;
        assert!(jump(triangle(trough), triangle(trough + 1)) <= 1);
    }
}

#[test]
fn counter_wraparound_is_continuous() {
    for shift in [0, 3, 12, 22] {
        let driver = driver(shift);

        let mut previous = driver.tick(u32::MAX - 64).1;
        for k in (0..64).rev() {
            let duty = driver.tick(u32::MAX - k).1;
            assert!(jump(previous, duty) <= 1);
            previous = duty;
        }

        assert_eq!(driver.tick(u32::MAX).1, 0);
        assert_eq!(driver.tick(0).1, 0);

        for t in 0..64 {
            let duty = driver.tick(t).1;
            assert!(jump(previous, duty) <= 1);
            previous = duty;
        }
    }
}
