use crate::canvas::raster;
use crate::canvas::Color;
use anyhow::{anyhow, Context, Result};
use base64::{engine::general_purpose, Engine as _};

/// Smallest usable surface dimension. Viewport math that comes out at zero or
/// negative is clamped here instead of producing a zero-area buffer.
pub const MIN_SURFACE_DIM: u32 = 16;

/// The full drawing buffer: a width x height grid of RGBA pixels plus the
/// presentation background fill. Ink is any pixel with non-zero alpha; the
/// background fill is deliberately not written into the buffer so the ink
/// scan keeps its contrast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelSurface {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    background: Option<Color>,
    revision: u64,
}

impl PixelSurface {
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.max(MIN_SURFACE_DIM);
        let height = height.max(MIN_SURFACE_DIM);
        Self {
            pixels: vec![0; (width as usize) * (height as usize) * 4],
            width,
            height,
            background: None,
            revision: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn background(&self) -> Option<Color> {
        self.background
    }

    /// Bumped on every mutation; lets the UI skip re-uploading an unchanged
    /// texture.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set_background(&mut self, color: Color) {
        if self.background != Some(color) {
            self.background = Some(color);
            self.revision += 1;
        }
    }

    /// Resize to the given dimensions (clamped to the minimum usable size).
    /// Returns `true` when the dimensions actually changed. Existing ink is
    /// discarded on resize.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        let width = width.max(MIN_SURFACE_DIM);
        let height = height.max(MIN_SURFACE_DIM);
        if width == self.width && height == self.height {
            return false;
        }
        self.width = width;
        self.height = height;
        self.pixels = vec![0; (width as usize) * (height as usize) * 4];
        self.revision += 1;
        true
    }

    /// Clear all ink, keeping the background fill.
    pub fn clear_ink(&mut self) {
        self.pixels.fill(0);
        self.revision += 1;
    }

    /// Return to the exact post-mount state: no ink, no background fill.
    pub fn reset(&mut self) {
        self.pixels.fill(0);
        self.background = None;
        self.revision += 1;
    }

    pub fn stamp(&mut self, point: (i32, i32), color: Color, stroke_width: u32) {
        raster::draw_brush(
            &mut self.pixels,
            self.width,
            self.height,
            point,
            color,
            stroke_width,
        );
        self.revision += 1;
    }

    pub fn stroke_segment(
        &mut self,
        start: (i32, i32),
        end: (i32, i32),
        color: Color,
        stroke_width: u32,
    ) {
        raster::draw_segment(
            &mut self.pixels,
            self.width,
            self.height,
            start,
            end,
            color,
            stroke_width,
        );
        self.revision += 1;
    }

    /// Composite ink over the background fill into an owned image. Used for
    /// the evaluation request so the service sees the surface as displayed.
    pub fn to_rgba_image(&self) -> Result<image::RgbaImage> {
        let mut flat = match self.background {
            Some(bg) => {
                let mut flat = Vec::with_capacity(self.pixels.len());
                for _ in 0..(self.pixels.len() / 4) {
                    flat.extend_from_slice(&[bg.r, bg.g, bg.b, bg.a]);
                }
                flat
            }
            None => vec![0; self.pixels.len()],
        };
        for (src, dst) in self.pixels.chunks_exact(4).zip(flat.chunks_exact_mut(4)) {
            if src[3] != 0 {
                dst.copy_from_slice(src);
            }
        }
        image::RgbaImage::from_raw(self.width, self.height, flat)
            .ok_or_else(|| anyhow!("surface buffer does not match its dimensions"))
    }

    /// Encode the surface as a base64 PNG for the evaluation request.
    pub fn encode_png_base64(&self) -> Result<String> {
        let img = self.to_rgba_image()?;
        let mut bytes = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageOutputFormat::Png,
        )
        .context("encoding surface as PNG")?;
        Ok(general_purpose::STANDARD.encode(&bytes))
    }
}
