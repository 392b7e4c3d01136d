//! Synthetic wandering pointer that keeps the field moving while the user is
//! idle. The user always wins: any genuine input stops it immediately.

use crate::clock::sanitize_delta;
use crate::pointer::PointerTracker;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use web_time::{Duration, Instant};

/// Distance at which the current target counts as reached.
const ARRIVE_EPSILON: f32 = 0.01;
/// Targets stay this far inside the [-1, 1] square.
const TARGET_MARGIN: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutopilotState {
    Inactive,
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Activated,
    Stopped,
}

#[derive(Debug, Clone)]
pub struct Autopilot {
    enabled: bool,
    speed: f32,
    resume_delay: Duration,
    active: bool,
    current: Vec2,
    target: Vec2,
    last_time: Instant,
    rng: StdRng,
}

impl Autopilot {
    pub fn new(enabled: bool, speed: f32, resume_delay_secs: f32, now: Instant) -> Self {
        Self::with_rng(enabled, speed, resume_delay_secs, now, StdRng::from_entropy())
    }

    pub fn with_seed(enabled: bool, speed: f32, resume_delay_secs: f32, now: Instant, seed: u64) -> Self {
        Self::with_rng(enabled, speed, resume_delay_secs, now, StdRng::seed_from_u64(seed))
    }

    fn with_rng(enabled: bool, speed: f32, resume_delay_secs: f32, now: Instant, rng: StdRng) -> Self {
        let mut pilot = Self {
            enabled,
            speed,
            // delays too long for a Duration mean "never"
            resume_delay: Duration::try_from_secs_f32(resume_delay_secs.max(0.0)).unwrap_or(Duration::MAX),
            active: false,
            current: Vec2::ZERO,
            target: Vec2::ZERO,
            last_time: now,
            rng,
        };
        pilot.pick_new_target();
        pilot
    }

    fn pick_new_target(&mut self) {
        let extent = 1.0 - TARGET_MARGIN;
        self.target = Vec2::new(
            self.rng.gen_range(-1.0..=1.0) * extent,
            self.rng.gen_range(-1.0..=1.0) * extent,
        );
    }

    pub fn state(&self) -> AutopilotState {
        if self.active {
            AutopilotState::Active
        } else {
            AutopilotState::Inactive
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn current(&self) -> Vec2 {
        self.current
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    /// Hands control back to the user. Returns true if it was driving.
    pub fn force_stop(&mut self, pointer: &mut PointerTracker) -> bool {
        let was_active = self.active;
        self.active = false;
        pointer.auto_active = false;
        if was_active {
            log::trace!("autopilot stopped");
        }
        was_active
    }

    pub fn update(
        &mut self,
        now: Instant,
        last_user_interaction: Instant,
        pointer: &mut PointerTracker,
    ) -> Option<Transition> {
        if !self.enabled {
            return None;
        }

        let idle = now.saturating_duration_since(last_user_interaction);
        if idle < self.resume_delay || pointer.is_inside() {
            return self.force_stop(pointer).then_some(Transition::Stopped);
        }

        let mut transition = None;
        if !self.active {
            self.active = true;
            self.current = pointer.coords();
            self.last_time = now;
            transition = Some(Transition::Activated);
            log::trace!("autopilot active from {:?}", self.current);
        }
        pointer.auto_active = true;

        let dt = sanitize_delta(now.saturating_duration_since(self.last_time).as_secs_f32());
        self.last_time = now;

        let to_target = self.target - self.current;
        let dist = to_target.length();
        if dist < ARRIVE_EPSILON {
            self.pick_new_target();
            return transition;
        }

        let step = (self.speed * dt).min(dist);
        self.current += to_target / dist * step;
        pointer.set_normalized(self.current.x, self.current.y, now);
        transition
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn huge_resume_delay_never_activates() {
        let t0 = Instant::now();
        let mut pointer = PointerTracker::new(1.0);
        let mut pilot = Autopilot::with_seed(true, 0.5, 1e30, t0, 3);
        let later = t0 + Duration::from_secs(3600);
        assert_eq!(pilot.update(later, t0, &mut pointer), None);
        assert_eq!(pilot.state(), AutopilotState::Inactive);
    }

    #[test]
    fn targets_respect_margin() {
        let now = Instant::now();
        let mut pilot = Autopilot::with_seed(true, 1.0, 0.0, now, 7);
        for _ in 0..200 {
            pilot.pick_new_target();
            assert!(pilot.target().abs().max_element() <= 1.0 - TARGET_MARGIN + 1e-6);
        }
    }

    #[test]
    fn disabled_never_activates() {
        let t0 = Instant::now();
        let mut pointer = PointerTracker::new(1.0);
        let mut pilot = Autopilot::with_seed(false, 1.0, 0.0, t0, 1);
        assert_eq!(pilot.update(t0 + Duration::from_secs(10), t0, &mut pointer), None);
        assert_eq!(pilot.state(), AutopilotState::Inactive);
    }

    #[test]
    fn moves_at_most_speed_times_dt() {
        let t0 = Instant::now();
        let mut pointer = PointerTracker::new(1.0);
        let mut pilot = Autopilot::with_seed(true, 0.5, 0.0, t0, 3);
        let t1 = t0 + Duration::from_millis(1);
        pilot.update(t1, t0, &mut pointer);
        let before = pilot.current();
        pilot.update(t1 + Duration::from_millis(100), t0, &mut pointer);
        let moved = (pilot.current() - before).length();
        assert!(moved <= 0.05 + 1e-5, "moved {moved}");
        assert_eq!(pointer.coords(), pilot.current());
    }
}
