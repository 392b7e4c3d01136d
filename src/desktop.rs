use crate::config::EtherConfig;
use crate::error::Result;
use crate::surface::SurfaceRect;
use crate::widget::{LiquidEther, PointerEvent};
use crate::AutopilotState;
use eframe::egui;
use web_time::Instant;

/// Native host: mounts the widget into the central panel, forwards the
/// pointer and shows each frame as a texture.
pub struct EtherApp {
    ether: LiquidEther,
    texture: Option<egui::TextureHandle>,
    paused: bool,
    hovering: bool,
}

impl EtherApp {
    pub fn new(config: EtherConfig) -> Result<Self> {
        Ok(Self {
            ether: LiquidEther::new(config)?,
            texture: None,
            paused: false,
            hovering: false,
        })
    }

    fn sync_surface(&mut self, rect: egui::Rect, now: Instant) {
        let surface = SurfaceRect::new(rect.left(), rect.top(), rect.width(), rect.height());
        if !self.ether.mount(surface, now) && self.ether.surface() != surface {
            self.ether.resize(surface);
        }
    }

    fn forward_pointer(&mut self, ctx: &egui::Context, rect: egui::Rect, now: Instant) {
        let (hover, moving) = ctx.input(|i| (i.pointer.hover_pos(), i.pointer.is_moving()));
        match hover {
            Some(pos) if rect.contains(pos) => {
                if moving || !self.hovering {
                    self.ether
                        .handle_event(PointerEvent::Move { x: pos.x, y: pos.y }, now);
                }
                self.hovering = true;
            }
            _ => {
                if self.hovering {
                    self.ether.handle_event(PointerEvent::Leave, now);
                }
                self.hovering = false;
            }
        }
    }
}

impl eframe::App for EtherApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Pause/Resume").clicked() {
                    self.paused = !self.paused;
                }
                let pilot = match self.ether.autopilot_state() {
                    AutopilotState::Active => "autopilot",
                    AutopilotState::Inactive => "user",
                };
                let (gw, gh) = self.ether.grid_size();
                ui.label(format!(
                    "Frame: {} | Grid: {}x{} | Control: {}",
                    self.ether.frames_rendered(),
                    gw,
                    gh,
                    pilot
                ));
            });
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(egui::Color32::BLACK))
            .show(ctx, |ui| {
                let now = Instant::now();
                let (rect, _response) =
                    ui.allocate_exact_size(ui.available_size(), egui::Sense::hover());

                self.sync_surface(rect, now);
                self.forward_pointer(ctx, rect, now);

                if !self.paused {
                    if let Some(frame) = self.ether.frame(now) {
                        let size = [frame.width() as usize, frame.height() as usize];
                        let image = egui::ColorImage::from_rgba_unmultiplied(size, frame.as_raw());
                        match &mut self.texture {
                            Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
                            None => {
                                self.texture =
                                    Some(ctx.load_texture("liquid-ether", image, egui::TextureOptions::LINEAR));
                            }
                        }
                    }
                }

                if let Some(texture) = &self.texture {
                    let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                    ui.painter()
                        .image(texture.id(), rect, uv, egui::Color32::WHITE);
                }
            });

        ctx.request_repaint();
    }
}
