use web_time::Instant;

/// Deltas above this are treated as a suspended tab rather than a real frame.
pub const MAX_FRAME_DELTA: f32 = 0.2;
/// Substituted for a pathological delta.
pub const NOMINAL_FRAME_DELTA: f32 = 0.016;

/// Replaces deltas that would destabilise the solver.
pub fn sanitize_delta(delta: f32) -> f32 {
    if !delta.is_finite() || delta > MAX_FRAME_DELTA {
        log::debug!("frame delta {delta} out of range, using {NOMINAL_FRAME_DELTA}");
        NOMINAL_FRAME_DELTA
    } else {
        delta.max(0.0)
    }
}

#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    delta: f32,
    elapsed: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self {
            last: start,
            delta: 0.0,
            elapsed: 0.0,
        }
    }

    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> f32 {
        // saturating: a `now` earlier than the last tick yields zero
        let raw = now.saturating_duration_since(self.last).as_secs_f32();
        self.last = now;
        self.delta = sanitize_delta(raw);
        self.elapsed += self.delta;
        self.delta
    }

    pub fn delta(&self) -> f32 {
        self.delta
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use web_time::Duration;

    #[test]
    fn normal_delta_passes_through() {
        let t0 = Instant::now();
        let mut clock = FrameClock::starting_at(t0);
        let dt = clock.tick_at(t0 + Duration::from_millis(20));
        assert!((dt - 0.02).abs() < 1e-4);
    }

    #[test]
    fn suspended_tab_gets_nominal_delta() {
        let t0 = Instant::now();
        let mut clock = FrameClock::starting_at(t0);
        assert_eq!(clock.tick_at(t0 + Duration::from_secs(5)), NOMINAL_FRAME_DELTA);
        // only that frame
        let dt = clock.tick_at(t0 + Duration::from_millis(5_010));
        assert!((dt - 0.01).abs() < 1e-4);
        assert!((clock.elapsed() - 0.026).abs() < 1e-4);
    }

    #[test]
    fn backwards_time_is_zero() {
        let t0 = Instant::now();
        let mut clock = FrameClock::starting_at(t0 + Duration::from_secs(1));
        assert_eq!(clock.tick_at(t0), 0.0);
    }
}
