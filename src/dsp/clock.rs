/// Real time measured in rendered frames.
///
/// Elapsed seconds are derived from an integer frame count, so the clock
/// never drifts and never resets: note-on and note-off timestamps taken
/// hours apart stay directly comparable.
#[derive(Debug, Clone)]
pub struct SampleClock {
    sample_rate_hz: f64,
    sample_period: f64,
    frames: u64,
}

impl SampleClock {
    /// Create a clock at time zero.
    ///
    /// The rate is fixed for the clock's lifetime. Non-finite or
    /// non-positive rates fall back to 48 kHz.
    pub fn new(sample_rate_hz: f64) -> Self {
        let sample_rate_hz = if sample_rate_hz.is_finite() && sample_rate_hz > 0.0 {
            sample_rate_hz
        } else {
            48_000.0
        };

        Self {
            sample_rate_hz,
            sample_period: 1.0 / sample_rate_hz,
            frames: 0,
        }
    }

    /// Advance by one sample period and return the new elapsed time.
    #[inline]
    pub fn advance(&mut self) -> f64 {
        self.frames += 1;
        self.elapsed_seconds()
    }

    #[inline]
    pub fn elapsed_seconds(&self) -> f64 {
        self.frames as f64 * self.sample_period
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn sample_rate_hz(&self) -> f64 {
        self.sample_rate_hz
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero() {
        let clock = SampleClock::new(44_100.0);
        assert_eq!(clock.elapsed_seconds(), 0.0);
        assert_eq!(clock.frames(), 0);
    }

    #[test]
    fn advance_is_strictly_monotonic() {
        let mut clock = SampleClock::new(44_100.0);
        let mut previous = clock.elapsed_seconds();
        for _ in 0..100_000 {
            let now = clock.advance();
            assert!(now > previous, "clock must strictly increase");
            previous = now;
        }
    }

    #[test]
    fn one_second_of_frames_is_one_second() {
        let mut clock = SampleClock::new(48_000.0);
        for _ in 0..48_000 {
            clock.advance();
        }
        assert!((clock.elapsed_seconds() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn invalid_rate_falls_back() {
        assert_eq!(SampleClock::new(0.0).sample_rate_hz(), 48_000.0);
        assert_eq!(SampleClock::new(f64::NAN).sample_rate_hz(), 48_000.0);
    }
}
