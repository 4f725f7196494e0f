//! Rasterization of blocks into RGBA pixels for display and export.

use crate::block::Block;
use crate::canvas::Canvas;
use crate::palette::Palette;
use crate::preview::Preview;
use crate::settings::Settings;
use crate::BLOCK_SIZE;

/// Number of bytes per rendered pixel (R, G, B, A).
pub const BYTES_PER_PIXEL: usize = 4;

/// Render one block as 64 RGBA pixels, row-major. Alpha is always 255.
pub fn render_block(block: &Block, palette: &Palette, settings: &Settings) -> [[u8; 4]; 64] {
    let mut out = [[0u8; 4]; 64];
    for y in 0..BLOCK_SIZE {
        for x in 0..BLOCK_SIZE {
            let c = palette.get(block.get_pixel(x, y, settings));
            out[y * BLOCK_SIZE + x] = [c.r, c.g, c.b, 255];
        }
    }
    out
}

fn blit(rgba: &mut [u8], width: usize, index: usize, nbx: usize, pixels: &[[u8; 4]; 64]) {
    let (bx, by) = (index % nbx, index / nbx);
    for y in 0..BLOCK_SIZE {
        let row = (by * BLOCK_SIZE + y) * width + bx * BLOCK_SIZE;
        for x in 0..BLOCK_SIZE {
            let o = (row + x) * BYTES_PER_PIXEL;
            rgba[o..o + BYTES_PER_PIXEL].copy_from_slice(&pixels[y * BLOCK_SIZE + x]);
        }
    }
}

impl Canvas {
    /// The whole image as RGBA bytes, `width() * height() * 4` long.
    pub fn to_rgba(&self, palette: &Palette, settings: &Settings) -> Vec<u8> {
        let width = self.width();
        let nbx = self.size().nbx();
        let mut rgba = vec![0u8; width * self.height() * BYTES_PER_PIXEL];
        for (index, block) in self.blocks().iter().enumerate() {
            blit(&mut rgba, width, index, nbx, &render_block(block, palette, settings));
        }
        rgba
    }

    /// Like [`Canvas::to_rgba`], with uncommitted preview blocks drawn on top.
    pub fn to_rgba_with_preview(
        &self,
        preview: &Preview,
        palette: &Palette,
        settings: &Settings,
    ) -> Vec<u8> {
        let mut rgba = self.to_rgba(palette, settings);
        let width = self.width();
        let nbx = self.size().nbx();
        for index in preview.touched() {
            if let Some(block) = preview.block(index) {
                blit(&mut rgba, width, index, nbx, &render_block(block, palette, settings));
            }
        }
        rgba
    }
}

/// Nearest-neighbor enlargement of an RGBA buffer by an integer factor.
pub fn zoom(rgba: &[u8], width: usize, height: usize, factor: usize) -> Vec<u8> {
    let factor = factor.max(1);
    if factor == 1 {
        return rgba.to_vec();
    }
    let out_width = width * factor;
    let mut out = Vec::with_capacity(out_width * height * factor * BYTES_PER_PIXEL);
    for y in 0..height {
        let src = &rgba[y * width * BYTES_PER_PIXEL..(y + 1) * width * BYTES_PER_PIXEL];
        let mut line = Vec::with_capacity(out_width * BYTES_PER_PIXEL);
        for px in src.chunks_exact(BYTES_PER_PIXEL) {
            for _ in 0..factor {
                line.extend_from_slice(px);
            }
        }
        for _ in 0..factor {
            out.extend_from_slice(&line);
        }
    }
    out
}
