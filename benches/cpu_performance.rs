use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec2;
use liquid_ether::{Compositor, EtherSolver, Palette, Rgba, SolverParams};

fn stirred(width: usize, height: usize) -> EtherSolver {
    let mut sim = EtherSolver::new(width, height, SolverParams::default());
    for _ in 0..5 {
        sim.step(0.014, Vec2::new(0.1, 0.0), Vec2::new(0.02, 0.01));
    }
    sim
}

fn benchmark_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("solver_step");

    // half-resolution grids for common surface sizes
    for &(w, h) in [(160, 90), (320, 180), (640, 360)].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(format!("{w}x{h}")), &(w, h), |b, &(w, h)| {
            let mut sim = stirred(w, h);
            b.iter(|| {
                sim.step(black_box(0.014), Vec2::new(0.1, 0.0), Vec2::new(0.02, 0.01));
            });
        });
    }
    group.finish();
}

fn benchmark_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("operations");
    let sim = stirred(320, 180);

    group.bench_function("advect_bfecc", |b| {
        let mut sim = sim.clone();
        b.iter(|| sim.advect_velocity(black_box(0.014)));
    });

    group.bench_function("advect_plain", |b| {
        let mut sim = sim.clone();
        sim.params.bfecc = false;
        b.iter(|| sim.advect_velocity(black_box(0.014)));
    });

    group.bench_function("relax_pressure_32", |b| {
        let mut sim = sim.clone();
        sim.compute_divergence(0.014);
        b.iter(|| sim.relax_pressure());
    });

    group.bench_function("diffuse_velocity_32", |b| {
        let mut sim = sim.clone();
        b.iter(|| sim.diffuse_velocity(black_box(0.014)));
    });

    group.finish();
}

fn benchmark_compositor(c: &mut Criterion) {
    let sim = stirred(320, 180);
    let compositor = Compositor::new(
        Palette::from_hex_list(&["#9D4EDD", "#C77DFF", "#E0AAFF"]).unwrap(),
        Rgba::TRANSPARENT,
    );
    let mut frame = image::RgbaImage::new(640, 360);

    c.bench_function("composite_640x360", |b| {
        b.iter(|| compositor.render_into(black_box(&sim), &mut frame));
    });
}

criterion_group!(benches, benchmark_step, benchmark_operations, benchmark_compositor);
criterion_main!(benches);
