//! Browser binding. The page owns the canvas and the animation loop; it calls
//! `frame` from `requestAnimationFrame` and blits `output_ptr`/`output_len`
//! as RGBA into an `ImageData`.

use crate::config::EtherConfig;
use crate::surface::SurfaceRect;
use crate::widget::{LiquidEther, PointerEvent};
use wasm_bindgen::prelude::*;
use web_time::{Duration, Instant};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Warn).is_err() {
        log::debug!("logger already initialised");
    }
}

#[wasm_bindgen]
pub struct WebEther {
    ether: LiquidEther,
    origin: Instant,
}

#[wasm_bindgen]
impl WebEther {
    /// `config_json` may be empty for defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str, w: f32, h: f32) -> Result<WebEther, JsValue> {
        let config = if config_json.trim().is_empty() {
            EtherConfig::default()
        } else {
            EtherConfig::from_json_str(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?
        };
        let origin = Instant::now();
        let ether = LiquidEther::mounted(config, SurfaceRect::sized(w, h), origin)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self { ether, origin })
    }

    fn at(&self, now_ms: f64) -> Instant {
        self.origin + Duration::from_secs_f64(now_ms.max(0.0) / 1000.0)
    }

    /// Coordinates relative to the canvas' top-left corner.
    pub fn pointer_move(&mut self, x: f32, y: f32, now_ms: f64) -> bool {
        let now = self.at(now_ms);
        self.ether.handle_event(PointerEvent::Move { x, y }, now)
    }

    pub fn touch(&mut self, x: f32, y: f32, touches: usize, now_ms: f64) -> bool {
        let now = self.at(now_ms);
        self.ether
            .handle_event(PointerEvent::TouchMove { x, y, touches }, now)
    }

    pub fn pointer_leave(&mut self, now_ms: f64) {
        let now = self.at(now_ms);
        self.ether.handle_event(PointerEvent::Leave, now);
    }

    pub fn resize(&mut self, w: f32, h: f32) {
        self.ether.resize(SurfaceRect::sized(w, h));
    }

    /// Milliseconds on the same timeline as the event methods, e.g.
    /// `performance.now()` minus the value at construction.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        let now = self.at(now_ms);
        self.ether.frame(now).is_some()
    }

    pub fn dispose(&mut self) {
        self.ether.dispose();
    }

    pub fn output_ptr(&self) -> *const u8 {
        self.ether.last_frame().as_ptr()
    }

    pub fn output_len(&self) -> usize {
        self.ether.last_frame().len()
    }

    pub fn width(&self) -> u32 {
        self.ether.last_frame().width()
    }

    pub fn height(&self) -> u32 {
        self.ether.last_frame().height()
    }
}
