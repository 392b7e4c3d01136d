//! The mounted widget: owns the clock, pointer, autopilot, field and frame
//! for exactly one mount. Dropping or disposing it releases everything.

use crate::autopilot::{Autopilot, AutopilotState};
use crate::clock::FrameClock;
use crate::compositor::Compositor;
use crate::config::EtherConfig;
use crate::error::Result;
use crate::pointer::PointerTracker;
use crate::solver::{EtherSolver, SolverParams};
use crate::surface::SurfaceRect;
use image::RgbaImage;
use web_time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Running,
    Disposed,
}

/// Host input, in host (client) coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Move { x: f32, y: f32 },
    TouchStart { x: f32, y: f32, touches: usize },
    TouchMove { x: f32, y: f32, touches: usize },
    Leave,
}

pub struct LiquidEther {
    config: EtherConfig,
    state: Lifecycle,
    surface: SurfaceRect,
    clock: FrameClock,
    pointer: PointerTracker,
    autopilot: Autopilot,
    solver: EtherSolver,
    compositor: Compositor,
    frame: RgbaImage,
    last_user_interaction: Instant,
    frames_rendered: u64,
    seed: Option<u64>,
}

impl LiquidEther {
    /// Validates the config and prepares an unmounted widget.
    pub fn new(config: EtherConfig) -> Result<Self> {
        Self::build(config, None)
    }

    /// Like [`LiquidEther::new`] but with a reproducible autopilot.
    pub fn with_seed(config: EtherConfig, seed: u64) -> Result<Self> {
        Self::build(config, Some(seed))
    }

    fn build(config: EtherConfig, seed: Option<u64>) -> Result<Self> {
        config.validate()?;
        let compositor = Compositor::new(config.palette()?, config.background_color()?);
        let now = Instant::now();
        Ok(Self {
            surface: SurfaceRect::sized(0.0, 0.0),
            clock: FrameClock::starting_at(now),
            pointer: PointerTracker::new(config.auto_intensity),
            autopilot: Self::make_autopilot(&config, now, seed),
            solver: EtherSolver::new(1, 1, SolverParams::from(&config)),
            compositor,
            frame: RgbaImage::new(0, 0),
            last_user_interaction: now,
            frames_rendered: 0,
            state: Lifecycle::Uninitialized,
            seed,
            config,
        })
    }

    fn make_autopilot(config: &EtherConfig, now: Instant, seed: Option<u64>) -> Autopilot {
        let delay = config.resume_delay_secs();
        match seed {
            Some(seed) => Autopilot::with_seed(config.auto_demo, config.auto_speed, delay, now, seed),
            None => Autopilot::new(config.auto_demo, config.auto_speed, delay, now),
        }
    }

    /// Builds and mounts in one go.
    pub fn mounted(config: EtherConfig, surface: SurfaceRect, now: Instant) -> Result<Self> {
        let mut ether = Self::new(config)?;
        ether.mount(surface, now);
        Ok(ether)
    }

    /// Allocates the field and starts the clock. Only valid once, from
    /// `Uninitialized`; returns false otherwise.
    pub fn mount(&mut self, surface: SurfaceRect, now: Instant) -> bool {
        if self.state != Lifecycle::Uninitialized {
            return false;
        }
        self.clock = FrameClock::starting_at(now);
        self.last_user_interaction = now;
        self.autopilot = Self::make_autopilot(&self.config, now, self.seed);
        self.pointer = PointerTracker::new(self.config.auto_intensity);
        self.state = Lifecycle::Running;
        self.allocate(surface);
        log::debug!(
            "mounted {}x{} surface, grid {:?}",
            self.frame.width(),
            self.frame.height(),
            self.grid_size()
        );
        true
    }

    fn allocate(&mut self, surface: SurfaceRect) {
        self.surface = surface;
        let (gw, gh) = surface.grid_size(self.config.resolution);
        self.solver.resize(gw, gh);
        let (pw, ph) = surface.pixel_size();
        self.frame = RgbaImage::new(pw as u32, ph as u32);
    }

    /// Reallocates the field for a new surface size without tearing down.
    pub fn resize(&mut self, surface: SurfaceRect) {
        match self.state {
            Lifecycle::Running => {
                self.allocate(surface);
                log::debug!("resized to grid {:?}", self.grid_size());
            }
            Lifecycle::Uninitialized => self.surface = surface,
            Lifecycle::Disposed => {}
        }
    }

    /// Feeds host input. Returns true when the event was taken as genuine
    /// user interaction.
    pub fn handle_event(&mut self, event: PointerEvent, now: Instant) -> bool {
        if self.state != Lifecycle::Running {
            return false;
        }
        let (x, y) = match event {
            PointerEvent::Move { x, y } => (x, y),
            PointerEvent::TouchStart { x, y, touches } | PointerEvent::TouchMove { x, y, touches } => {
                if touches != 1 {
                    return false;
                }
                (x, y)
            }
            PointerEvent::Leave => {
                self.pointer.set_outside();
                return false;
            }
        };

        if !self.surface.contains(x, y) {
            self.pointer.set_outside();
            return false;
        }
        self.last_user_interaction = now;
        self.autopilot.force_stop(&mut self.pointer);
        self.pointer.set_position(x, y, &self.surface, now)
    }

    /// Advances one display refresh and returns the composited frame, or
    /// `None` once the widget is no longer running.
    pub fn frame(&mut self, now: Instant) -> Option<&RgbaImage> {
        if self.state != Lifecycle::Running {
            return None;
        }
        self.autopilot
            .update(now, self.last_user_interaction, &mut self.pointer);
        self.pointer.update();
        self.clock.tick_at(now);
        self.solver
            .step(self.config.dt, self.pointer.coords(), self.pointer.diff());
        self.compositor.render_into(&self.solver, &mut self.frame);
        self.frames_rendered += 1;
        Some(&self.frame)
    }

    /// Stops frames and input and frees the buffers. Idempotent.
    pub fn dispose(&mut self) {
        if self.state == Lifecycle::Disposed {
            return;
        }
        self.autopilot.force_stop(&mut self.pointer);
        self.solver.release();
        self.frame = RgbaImage::new(0, 0);
        self.state = Lifecycle::Disposed;
        log::debug!("disposed after {} frames", self.frames_rendered);
    }

    pub fn state(&self) -> Lifecycle {
        self.state
    }

    pub fn config(&self) -> &EtherConfig {
        &self.config
    }

    pub fn surface(&self) -> SurfaceRect {
        self.surface
    }

    pub fn grid_size(&self) -> (usize, usize) {
        (self.solver.width, self.solver.height)
    }

    pub fn solver(&self) -> &EtherSolver {
        &self.solver
    }

    pub fn pointer(&self) -> &PointerTracker {
        &self.pointer
    }

    pub fn autopilot_state(&self) -> AutopilotState {
        self.autopilot.state()
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn last_frame(&self) -> &RgbaImage {
        &self.frame
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }
}

impl Drop for LiquidEther {
    fn drop(&mut self) {
        self.dispose();
    }
}
