//! Display lists produced by overlays, and the raster cache behind them.
//!
//! Nothing here touches a GPU. Controllers paint into [`Layer`]s of
//! [`DrawCommand`]s; the host executes them with its own painter and supplies
//! a [`Rasterizer`] for text and backdrop images.

pub mod cache;
pub mod commands;

pub use cache::{BoundedCache, RasterId, Rasterizer, SurfaceCache, TextRequest};
pub use commands::{Border, DrawCommand, Layer, GLASS_STOPS};

/// Everything a paint pass needs besides the control itself.
pub struct PaintContext<'a> {
    pub cache: &'a mut SurfaceCache,
    pub rasterizer: &'a mut dyn Rasterizer,
}

impl<'a> PaintContext<'a> {
    pub fn new(cache: &'a mut SurfaceCache, rasterizer: &'a mut dyn Rasterizer) -> Self {
        Self { cache, rasterizer }
    }

    pub fn text(&mut self, request: &TextRequest) -> RasterId {
        self.cache.text(self.rasterizer, request)
    }

    pub fn backdrop(&mut self, blur: f32) -> Option<(RasterId, u32)> {
        self.cache.backdrop(self.rasterizer, blur)
    }

    pub fn scale_factor(&self) -> f32 {
        self.cache.scale_factor()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{RasterId, Rasterizer, TextRequest};

    /// Hands out sequential ids and remembers every request.
    pub struct RecordingRasterizer {
        pub texts: Vec<TextRequest>,
        pub blurs: Vec<u32>,
        pub released: Vec<RasterId>,
        pub has_texture: bool,
        pub(crate) next: u64,
    }

    impl Default for RecordingRasterizer {
        fn default() -> Self {
            Self {
                texts: Vec::new(),
                blurs: Vec::new(),
                released: Vec::new(),
                has_texture: true,
                next: 0,
            }
        }
    }

    impl RecordingRasterizer {
        fn next_id(&mut self) -> RasterId {
            self.next += 1;
            RasterId(self.next)
        }
    }

    impl Rasterizer for RecordingRasterizer {
        fn rasterize_text(&mut self, request: &TextRequest) -> RasterId {
            self.texts.push(request.clone());
            self.next_id()
        }

        fn blur_backdrop(&mut self, radius: u32, _scale_factor: f32) -> Option<RasterId> {
            if !self.has_texture {
                return None;
            }
            self.blurs.push(radius);
            Some(self.next_id())
        }

        fn release(&mut self, id: RasterId) {
            self.released.push(id);
        }
    }
}
