#![allow(dead_code)]

use sheen::renderer::{RasterId, Rasterizer, TextRequest};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Hands out sequential ids and remembers what it was asked for.
#[derive(Default)]
pub struct Recorder {
    pub texts: Vec<TextRequest>,
    pub blurs: Vec<u32>,
    pub released: Vec<RasterId>,
    next: u64,
}

impl Rasterizer for Recorder {
    fn rasterize_text(&mut self, request: &TextRequest) -> RasterId {
        self.texts.push(request.clone());
        self.next += 1;
        RasterId(self.next)
    }

    fn blur_backdrop(&mut self, radius: u32, _scale_factor: f32) -> Option<RasterId> {
        self.blurs.push(radius);
        self.next += 1;
        Some(RasterId(self.next))
    }

    fn release(&mut self, id: RasterId) {
        self.released.push(id);
    }
}

pub fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}
