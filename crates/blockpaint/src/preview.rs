//! Transient overlay for uncommitted edits.
//!
//! While the pointer hovers or a line is being dragged, strokes are painted
//! onto clones of the touched blocks instead of the canonical canvas. The UI
//! rasterizes the overlay on top, and then either commits it or throws it away
//! and redraws the touched blocks from the canvas.

use crate::block::Block;
use crate::canvas::Canvas;
use crate::settings::Settings;
use crate::shapes::Surface;
use std::collections::BTreeMap;

/// Cloned blocks keyed by canvas block index.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Preview {
    blocks: BTreeMap<usize, Block>,
}

impl Preview {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Block indices touched since the last commit or cancel.
    pub fn touched(&self) -> impl Iterator<Item = usize> + '_ {
        self.blocks.keys().copied()
    }

    /// Overlay block for a canvas index, if that block was touched.
    pub fn block(&self, index: usize) -> Option<&Block> {
        self.blocks.get(&index)
    }

    fn clone_of(&mut self, canvas: &Canvas, index: usize) -> &mut Block {
        self.blocks
            .entry(index)
            .or_insert_with(|| canvas.blocks()[index])
    }

    /// Paint a pixel onto the overlay, cloning the canonical block on first touch.
    pub fn set_pixel(&mut self, canvas: &Canvas, px: i32, py: i32, color: u8, settings: &Settings) {
        if let Some((index, x, y)) = canvas.locate(px, py) {
            self.clone_of(canvas, index).set_pixel(x, y, color, settings);
        }
    }

    /// Flood the overlay copy of the block under the pixel.
    pub fn fill_block(&mut self, canvas: &Canvas, px: i32, py: i32, color: u8) {
        if let Some((index, _, _)) = canvas.locate(px, py) {
            self.clone_of(canvas, index).fill(color);
        }
    }

    /// Displayed color with the overlay applied.
    pub fn get_pixel(&self, canvas: &Canvas, px: i32, py: i32, settings: &Settings) -> Option<u8> {
        let (index, x, y) = canvas.locate(px, py)?;
        let block = self.blocks.get(&index).unwrap_or(&canvas.blocks()[index]);
        Some(block.get_pixel(x, y, settings))
    }

    /// Write every overlay block into the canvas and empty the overlay.
    /// Returns the indices that changed.
    pub fn commit(&mut self, canvas: &mut Canvas) -> Vec<usize> {
        let blocks = std::mem::take(&mut self.blocks);
        let mut indices = Vec::with_capacity(blocks.len());
        let target = canvas.blocks_mut();
        for (index, block) in blocks {
            if let Some(slot) = target.get_mut(index) {
                *slot = block;
                indices.push(index);
            }
        }
        indices
    }

    /// Drop the overlay. Returns the indices the UI must redraw from the canvas.
    pub fn cancel(&mut self) -> Vec<usize> {
        std::mem::take(&mut self.blocks).into_keys().collect()
    }

    /// Borrow the overlay together with its canvas as a drawing [`Surface`].
    pub fn surface<'a>(&'a mut self, canvas: &'a Canvas) -> PreviewSurface<'a> {
        PreviewSurface {
            preview: self,
            canvas,
        }
    }
}

/// A [`Preview`] bound to the canvas it shadows.
pub struct PreviewSurface<'a> {
    preview: &'a mut Preview,
    canvas: &'a Canvas,
}

impl Surface for PreviewSurface<'_> {
    fn bounds(&self) -> (i32, i32) {
        self.canvas.bounds()
    }

    fn set_pixel(&mut self, px: i32, py: i32, color: u8, settings: &Settings) {
        self.preview.set_pixel(self.canvas, px, py, color, settings);
    }

    fn fill_block(&mut self, px: i32, py: i32, color: u8) {
        self.preview.fill_block(self.canvas, px, py, color);
    }
}
