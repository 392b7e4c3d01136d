//! Decorative real-time fluid background: a pointer-stirred, approximately
//! incompressible velocity field rendered through a colour ramp.

pub mod analysis;
pub mod autopilot;
pub mod clock;
pub mod compositor;
pub mod config;
pub mod error;
pub mod export;
pub mod palette;
pub mod pointer;
pub mod solver;
pub mod surface;
pub mod widget;

#[cfg(not(target_arch = "wasm32"))]
pub mod desktop;

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Read access to a velocity grid, shared by the compositor, metrics and
/// image export.
pub trait VelocityField: Sync {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn velocity_x(&self) -> &[f32];
    fn velocity_y(&self) -> &[f32];
}

pub use analysis::{FieldMetrics, MetricsRecorder};
pub use autopilot::{Autopilot, AutopilotState, Transition};
pub use clock::FrameClock;
pub use compositor::Compositor;
pub use config::EtherConfig;
pub use error::{EtherError, Result};
pub use export::FrameExporter;
pub use palette::{Palette, Rgba};
pub use pointer::PointerTracker;
pub use solver::{EtherSolver, SolverParams};
pub use surface::SurfaceRect;
pub use widget::{LiquidEther, Lifecycle, PointerEvent};

#[cfg(not(target_arch = "wasm32"))]
pub use desktop::EtherApp;
