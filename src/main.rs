#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use liquid_ether::{
        EtherConfig, FieldMetrics, FrameExporter, LiquidEther, MetricsRecorder, PointerEvent,
        SurfaceRect,
    };
    use std::path::PathBuf;
    use web_time::{Duration, Instant};

    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

        let args: Vec<String> = std::env::args().collect();
        let config = match config_path(&args) {
            Some(path) => EtherConfig::load(&path)?,
            None => EtherConfig::default(),
        };

        if args.iter().skip(1).any(|a| a == "test") {
            run_headless_test(config)?;
        } else {
            run_gui_app(config)?;
        }
        Ok(())
    }

    fn config_path(args: &[String]) -> Option<PathBuf> {
        args.iter()
            .position(|a| a == "--config")
            .and_then(|i| args.get(i + 1))
            .map(PathBuf::from)
    }

    /// Scripted drag across the surface, then idle long enough for the
    /// autopilot to take over. Exports every fifth frame.
    fn run_headless_test(config: EtherConfig) -> Result<(), Box<dyn std::error::Error>> {
        println!("Running headless liquid-ether run...");

        let frame_time = Duration::from_millis(16);
        let resume_delay = Duration::try_from_secs_f32(config.resume_delay_secs()).unwrap_or(Duration::MAX);
        let surface = SurfaceRect::sized(400.0, 300.0);
        let t0 = Instant::now();
        let mut ether = LiquidEther::with_seed(config, 42)?;
        ether.mount(surface, t0);

        let exporter = FrameExporter::new(".", "ether");
        let mut recorder = MetricsRecorder::new();

        let drag_frames = 30;
        // an autopilot that never resumes still gets a short idle tail
        let idle_frames = ((resume_delay.as_secs_f32() / frame_time.as_secs_f32()).ceil() as usize)
            .min(600)
            + 60;
        for frame in 0..drag_frames + idle_frames {
            let now = t0 + frame_time * frame as u32;
            if frame < drag_frames {
                let x = 50.0 + 300.0 * frame as f32 / drag_frames as f32;
                let y = 150.0 + 60.0 * (frame as f32 * 0.3).sin();
                ether.handle_event(PointerEvent::Move { x, y }, now);
            } else if frame == drag_frames {
                ether.handle_event(PointerEvent::Leave, now);
            }

            if ether.frame(now).is_none() {
                break;
            }
            recorder.record_frame(ether.solver(), frame);

            if frame % 5 == 0 {
                exporter.export_frame(ether.last_frame(), frame)?;
                exporter.export_velocity(ether.solver(), frame)?;
            }
            if frame % 30 == 0 {
                FieldMetrics::analyze(ether.solver(), frame).print_summary();
                println!("  Control: {:?}", ether.autopilot_state());
            }
        }

        recorder.print_trends();
        ether.dispose();
        println!("Done: {} frames rendered.", recorder.history.len());
        Ok(())
    }

    fn run_gui_app(config: EtherConfig) -> Result<(), Box<dyn std::error::Error>> {
        let app = liquid_ether::EtherApp::new(config)?;
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([960.0, 600.0])
                .with_title("liquid-ether"),
            ..Default::default()
        };

        eframe::run_native("liquid-ether", options, Box::new(|_cc| Box::new(app)))?;
        Ok(())
    }
}
