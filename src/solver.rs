use crate::VelocityField;
use crate::clock::sanitize_delta;
use crate::config::EtherConfig;
use glam::Vec2;

/// Solver knobs, fixed for the lifetime of a mount.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverParams {
    pub dt: f32,
    pub bfecc: bool,
    pub is_viscous: bool,
    pub viscous: f32,
    pub iterations_viscous: usize,
    pub iterations_poisson: usize,
    pub mouse_force: f32,
    pub cursor_size: f32,
    pub is_bounce: bool,
}

impl From<&EtherConfig> for SolverParams {
    fn from(config: &EtherConfig) -> Self {
        Self {
            dt: config.dt,
            bfecc: config.bfecc,
            is_viscous: config.is_viscous,
            viscous: config.viscous,
            iterations_viscous: config.viscous_iterations(),
            iterations_poisson: config.poisson_iterations(),
            mouse_force: config.mouse_force,
            cursor_size: config.cursor_size,
            is_bounce: config.is_bounce,
        }
    }
}

impl Default for SolverParams {
    fn default() -> Self {
        Self::from(&EtherConfig::default())
    }
}

/// Wall handling for the outermost ring of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Component {
    X,
    Y,
}

/// Grid-based incompressible velocity field. Buffers are row-major with row 0
/// at the bottom so that +y matches normalized device coordinates.
#[derive(Debug, Clone)]
pub struct EtherSolver {
    pub width: usize,
    pub height: usize,
    pub velocity_x: Vec<f32>,
    pub velocity_y: Vec<f32>,
    pub velocity_x_prev: Vec<f32>,
    pub velocity_y_prev: Vec<f32>,
    pub divergence: Vec<f32>,
    pub pressure: Vec<f32>,
    pub pressure_prev: Vec<f32>,
    pub params: SolverParams,
}

impl VelocityField for EtherSolver {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn velocity_x(&self) -> &[f32] {
        &self.velocity_x
    }

    fn velocity_y(&self) -> &[f32] {
        &self.velocity_y
    }
}

impl EtherSolver {
    pub fn new(width: usize, height: usize, params: SolverParams) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let size = width * height;
        Self {
            width,
            height,
            velocity_x: vec![0.0; size],
            velocity_y: vec![0.0; size],
            velocity_x_prev: vec![0.0; size],
            velocity_y_prev: vec![0.0; size],
            divergence: vec![0.0; size],
            pressure: vec![0.0; size],
            pressure_prev: vec![0.0; size],
            params,
        }
    }

    /// Reallocates every buffer; previous field data is discarded.
    pub fn resize(&mut self, width: usize, height: usize) {
        let params = std::mem::take(&mut self.params);
        *self = Self::new(width, height, params);
    }

    /// Releases the field buffers. The solver is left as an empty 1x1 grid.
    pub fn release(&mut self) {
        self.resize(1, 1);
    }

    #[inline]
    fn idx(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Index of a neighbour, clamped to the grid edge.
    #[inline]
    fn clamped(&self, x: usize, y: usize, dx: isize, dy: isize) -> usize {
        let nx = (x as isize + dx).clamp(0, self.width as isize - 1) as usize;
        let ny = (y as isize + dy).clamp(0, self.height as isize - 1) as usize;
        self.idx(nx, ny)
    }

    /// Cells travelled per unit velocity per second. Velocity is expressed in
    /// fractions of the longer grid side.
    fn cell_scale(&self) -> f32 {
        self.width.max(self.height) as f32
    }

    /// One full frame: advect, diffuse, force, divergence, pressure, project.
    pub fn step(&mut self, dt: f32, pointer: Vec2, pointer_diff: Vec2) {
        let dt = sanitize_delta(dt);
        if dt <= 0.0 {
            return;
        }

        self.advect_velocity(dt);
        if self.params.is_viscous {
            self.diffuse_velocity(dt);
        }
        self.add_force(pointer, pointer_diff);
        self.compute_divergence(dt);
        self.relax_pressure();
        self.project_velocity(dt);
    }

    pub fn advect_velocity(&mut self, dt: f32) {
        std::mem::swap(&mut self.velocity_x, &mut self.velocity_x_prev);
        std::mem::swap(&mut self.velocity_y, &mut self.velocity_y_prev);

        let k = dt * self.cell_scale();
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = self.idx(x, y);
                let spot = Vec2::new(x as f32, y as f32);
                let vel = Vec2::new(self.velocity_x_prev[idx], self.velocity_y_prev[idx]);

                let new_vel = if self.params.bfecc {
                    // back, forth, measure the round-trip error, then correct
                    let spot_old = spot - vel * k;
                    let vel_back = self.sample_prev(spot_old);
                    let spot_fwd = spot_old + vel_back * k;
                    let error = spot_fwd - spot;
                    let spot_corrected = spot - error * 0.5;
                    let vel_corrected = self.sample_prev(spot_corrected);
                    self.sample_prev(spot_corrected - vel_corrected * k)
                } else {
                    self.sample_prev(spot - vel * k)
                };

                self.velocity_x[idx] = new_vel.x;
                self.velocity_y[idx] = new_vel.y;
            }
        }
        self.set_velocity_boundaries();
    }

    /// Bilinear sample of the previous velocity at a cell-space position,
    /// clamped to the edge cells.
    fn sample_prev(&self, p: Vec2) -> Vec2 {
        let fx = p.x.clamp(0.0, (self.width - 1) as f32);
        let fy = p.y.clamp(0.0, (self.height - 1) as f32);
        let x0 = fx.floor() as usize;
        let y0 = fy.floor() as usize;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);
        let sx = fx - x0 as f32;
        let sy = fy - y0 as f32;

        let idx00 = self.idx(x0, y0);
        let idx01 = self.idx(x1, y0);
        let idx10 = self.idx(x0, y1);
        let idx11 = self.idx(x1, y1);

        let lerp2 = |f: &[f32]| {
            (1.0 - sx) * (1.0 - sy) * f[idx00]
                + sx * (1.0 - sy) * f[idx01]
                + (1.0 - sx) * sy * f[idx10]
                + sx * sy * f[idx11]
        };
        Vec2::new(lerp2(&self.velocity_x_prev), lerp2(&self.velocity_y_prev))
    }

    /// Implicit viscosity by Jacobi iteration.
    pub fn diffuse_velocity(&mut self, dt: f32) {
        let a = self.params.viscous * dt;
        let denom = 1.0 + 4.0 * a;

        // prev holds the advected field, current is the iterate
        self.velocity_x_prev.copy_from_slice(&self.velocity_x);
        self.velocity_y_prev.copy_from_slice(&self.velocity_y);
        let mut next_x = self.velocity_x.clone();
        let mut next_y = self.velocity_y.clone();

        for _ in 0..self.params.iterations_viscous {
            for y in 0..self.height {
                for x in 0..self.width {
                    let idx = self.idx(x, y);
                    let n = [
                        self.clamped(x, y, 1, 0),
                        self.clamped(x, y, -1, 0),
                        self.clamped(x, y, 0, 1),
                        self.clamped(x, y, 0, -1),
                    ];
                    let sum_x: f32 = n.iter().map(|&i| self.velocity_x[i]).sum();
                    let sum_y: f32 = n.iter().map(|&i| self.velocity_y[i]).sum();
                    next_x[idx] = (self.velocity_x_prev[idx] + a * sum_x) / denom;
                    next_y[idx] = (self.velocity_y_prev[idx] + a * sum_y) / denom;
                }
            }
            std::mem::swap(&mut self.velocity_x, &mut next_x);
            std::mem::swap(&mut self.velocity_y, &mut next_y);
        }
        self.set_velocity_boundaries();
    }

    /// Additive radial impulse at a normalized pointer position. Weight is
    /// `(1 - r)^2` inside a disk of `cursor_size / 2` cells.
    pub fn add_force(&mut self, pointer: Vec2, pointer_diff: Vec2) {
        let force = pointer_diff * 0.5 * self.params.mouse_force;
        let radius = self.params.cursor_size * 0.5;
        if force == Vec2::ZERO || radius <= 0.0 {
            return;
        }

        // keep the whole cursor disk on the surface
        let (w, h) = (self.width as f32, self.height as f32);
        let cursor_size = self.params.cursor_size;
        let keep_inside = |c: f32, extent: f32| {
            let margin = cursor_size / extent;
            if margin >= 1.0 { 0.0 } else { c.clamp(-1.0 + margin, 1.0 - margin) }
        };
        let center_ndc = Vec2::new(keep_inside(pointer.x, w), keep_inside(pointer.y, h));
        let cx = (center_ndc.x + 1.0) * 0.5 * w - 0.5;
        let cy = (center_ndc.y + 1.0) * 0.5 * h - 0.5;

        let x_min = (cx - radius).ceil().max(0.0) as usize;
        let y_min = (cy - radius).ceil().max(0.0) as usize;
        let x_max = ((cx + radius).floor().max(-1.0) + 1.0).min(w) as usize;
        let y_max = ((cy + radius).floor().max(-1.0) + 1.0).min(h) as usize;

        for y in y_min..y_max {
            for x in x_min..x_max {
                let r = Vec2::new(x as f32 - cx, y as f32 - cy).length() / radius;
                let falloff = (1.0 - r.min(1.0)).powi(2);
                if falloff > 0.0 {
                    let idx = self.idx(x, y);
                    self.velocity_x[idx] += force.x * falloff;
                    self.velocity_y[idx] += force.y * falloff;
                }
            }
        }
    }

    pub fn compute_divergence(&mut self, dt: f32) {
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = self.idx(x, y);
                let x0 = self.velocity_x[self.clamped(x, y, -1, 0)];
                let x1 = self.velocity_x[self.clamped(x, y, 1, 0)];
                let y0 = self.velocity_y[self.clamped(x, y, 0, -1)];
                let y1 = self.velocity_y[self.clamped(x, y, 0, 1)];
                self.divergence[idx] = (x1 - x0 + y1 - y0) * 0.5 / dt;
            }
        }
    }

    /// Jacobi relaxation of the pressure Poisson equation. Neighbours are taken
    /// two cells away, the stencil that matches central-difference divergence
    /// and gradient. Starts from the previous frame's pressure.
    pub fn relax_pressure(&mut self) {
        for _ in 0..self.params.iterations_poisson {
            self.relax_pressure_once();
        }
    }

    /// One Jacobi sweep. Returns the largest absolute change.
    pub fn relax_pressure_once(&mut self) -> f32 {
        std::mem::swap(&mut self.pressure, &mut self.pressure_prev);
        let mut max_change = 0.0f32;
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = self.idx(x, y);
                let p = &self.pressure_prev;
                let sum = p[self.clamped(x, y, 2, 0)]
                    + p[self.clamped(x, y, -2, 0)]
                    + p[self.clamped(x, y, 0, 2)]
                    + p[self.clamped(x, y, 0, -2)];
                let new_p = sum * 0.25 - self.divergence[idx];
                max_change = max_change.max((new_p - p[idx]).abs());
                self.pressure[idx] = new_p;
            }
        }
        max_change
    }

    pub fn project_velocity(&mut self, dt: f32) {
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = self.idx(x, y);
                let p = &self.pressure;
                let grad_x = (p[self.clamped(x, y, 1, 0)] - p[self.clamped(x, y, -1, 0)]) * 0.5;
                let grad_y = (p[self.clamped(x, y, 0, 1)] - p[self.clamped(x, y, 0, -1)]) * 0.5;
                self.velocity_x[idx] -= grad_x * dt;
                self.velocity_y[idx] -= grad_y * dt;
            }
        }
        self.set_velocity_boundaries();
    }

    /// Reflects the wall-normal component on the outer ring when bouncing is on.
    fn set_velocity_boundaries(&mut self) {
        if !self.params.is_bounce || self.width < 3 || self.height < 3 {
            return;
        }
        let (w, h) = (self.width, self.height);
        for y in 0..h {
            self.reflect(0, y, 1, y, Component::X);
            self.reflect(w - 1, y, w - 2, y, Component::X);
        }
        for x in 0..w {
            self.reflect(x, 0, x, 1, Component::Y);
            self.reflect(x, h - 1, x, h - 2, Component::Y);
        }
    }

    fn reflect(&mut self, x: usize, y: usize, nx: usize, ny: usize, normal: Component) {
        let (dst, src) = (self.idx(x, y), self.idx(nx, ny));
        let (vx, vy) = (self.velocity_x[src], self.velocity_y[src]);
        match normal {
            Component::X => {
                self.velocity_x[dst] = -vx;
                self.velocity_y[dst] = vy;
            }
            Component::Y => {
                self.velocity_x[dst] = vx;
                self.velocity_y[dst] = -vy;
            }
        }
    }

    pub fn speed_at(&self, x: usize, y: usize) -> f32 {
        let idx = self.idx(x, y);
        Vec2::new(self.velocity_x[idx], self.velocity_y[idx]).length()
    }

    /// Largest velocity magnitude in the field.
    pub fn max_speed(&self) -> f32 {
        self.velocity_x
            .iter()
            .zip(&self.velocity_y)
            .map(|(&vx, &vy)| (vx * vx + vy * vy).sqrt())
            .fold(0.0, f32::max)
    }
}
