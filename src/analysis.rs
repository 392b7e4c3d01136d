use crate::VelocityField;

#[derive(Debug, Clone)]
pub struct FieldMetrics {
    pub max_speed: f32,
    pub avg_speed: f32,
    pub kinetic_energy: f32,
    pub divergence: f32,
    pub vorticity: f32,
    pub frame: usize,
}

impl FieldMetrics {
    pub fn analyze(field: &impl VelocityField, frame: usize) -> Self {
        let (w, h) = (field.width(), field.height());
        let vx = field.velocity_x();
        let vy = field.velocity_y();

        let mut max_speed: f32 = 0.0;
        let mut speed_sum = 0.0;
        let mut kinetic_energy = 0.0;
        for (&x, &y) in vx.iter().zip(vy) {
            let speed_sq = x * x + y * y;
            let speed = speed_sq.sqrt();
            max_speed = max_speed.max(speed);
            speed_sum += speed;
            kinetic_energy += 0.5 * speed_sq;
        }

        // Central differences need a neighbour on each side
        let mut total_divergence = 0.0;
        let mut total_vorticity = 0.0;
        let mut interior = 0usize;
        for y in 1..h.saturating_sub(1) {
            for x in 1..w.saturating_sub(1) {
                let idx = y * w + x;
                let divergence = (vx[idx + 1] - vx[idx - 1] + vy[idx + w] - vy[idx - w]) / 2.0;
                let vorticity = (vy[idx + 1] - vy[idx - 1] - vx[idx + w] + vx[idx - w]) / 2.0;
                total_divergence += divergence.abs();
                total_vorticity += vorticity.abs();
                interior += 1;
            }
        }

        let size = (w * h).max(1) as f32;
        let interior = interior.max(1) as f32;
        Self {
            max_speed,
            avg_speed: speed_sum / size,
            kinetic_energy,
            divergence: total_divergence / interior,
            vorticity: total_vorticity / interior,
            frame,
        }
    }

    pub fn is_finite(&self) -> bool {
        [self.max_speed, self.avg_speed, self.kinetic_energy, self.divergence, self.vorticity]
            .iter()
            .all(|v| v.is_finite())
    }

    pub fn print_summary(&self) {
        println!("Frame {} Metrics:", self.frame);
        println!("  Max Speed: {:.6}", self.max_speed);
        println!("  Avg Speed: {:.6}", self.avg_speed);
        println!("  Kinetic Energy: {:.6}", self.kinetic_energy);
        println!("  Mean |Divergence|: {:.6}", self.divergence);
        println!("  Mean |Vorticity|: {:.6}", self.vorticity);
        println!();
    }
}

#[derive(Debug, Default)]
pub struct MetricsRecorder {
    pub history: Vec<FieldMetrics>,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_frame(&mut self, field: &impl VelocityField, frame: usize) -> &FieldMetrics {
        self.history.push(FieldMetrics::analyze(field, frame));
        &self.history[self.history.len() - 1]
    }

    pub fn print_trends(&self) {
        let (Some(first), Some(last)) = (self.history.first(), self.history.last()) else {
            return;
        };
        if self.history.len() < 2 {
            return;
        }

        println!("=== TREND ANALYSIS ===");
        println!(
            "Kinetic Energy: {:.6} -> {:.6}",
            first.kinetic_energy, last.kinetic_energy
        );
        println!("Max Speed: {:.6} -> {:.6}", first.max_speed, last.max_speed);
        println!(
            "Mean |Divergence|: {:.6} -> {:.6}",
            first.divergence, last.divergence
        );
    }
}
