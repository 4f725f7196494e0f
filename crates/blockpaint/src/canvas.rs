//! The image as a row-major grid of attribute blocks.

use crate::block::Block;
use crate::settings::Settings;
use crate::shapes::Surface;
use crate::{BlockpaintError, Result, BLOCK_SIZE, GRID_LIMIT};
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// Canvas dimensions in blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridSize {
    nbx: usize,
    nby: usize,
}

impl GridSize {
    /// Both dimensions must be in `1..=255` so they fit the codec header.
    pub fn new(nbx: usize, nby: usize) -> Result<Self> {
        if nbx == 0 || nby == 0 || nbx > GRID_LIMIT || nby > GRID_LIMIT {
            return Err(BlockpaintError::InvalidDimensions {
                width: nbx,
                height: nby,
            });
        }
        Ok(Self { nbx, nby })
    }

    /// Blocks per row.
    #[inline]
    pub fn nbx(&self) -> usize {
        self.nbx
    }

    /// Blocks per column.
    #[inline]
    pub fn nby(&self) -> usize {
        self.nby
    }

    #[inline]
    pub fn blocks(&self) -> usize {
        self.nbx * self.nby
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.nbx * BLOCK_SIZE
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.nby * BLOCK_SIZE
    }
}

impl Default for GridSize {
    /// 40x25 blocks, a 320x200 pixel screen.
    fn default() -> Self {
        Self { nbx: 40, nby: 25 }
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.nbx, self.nby)
    }
}

impl FromStr for GridSize {
    type Err = BlockpaintError;

    /// Accepts `40x25` as well as the location-hash form `#40x25blocks`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || BlockpaintError::InvalidGridSize(s.to_string());
        let trimmed = s.trim();
        let trimmed = trimmed.strip_prefix('#').unwrap_or(trimmed);
        let trimmed = trimmed.strip_suffix("blocks").unwrap_or(trimmed);
        let (w, h) = trimmed.split_once(['x', 'X']).ok_or_else(invalid)?;
        let nbx = w.parse::<usize>().map_err(|_| invalid())?;
        let nby = h.parse::<usize>().map_err(|_| invalid())?;
        Self::new(nbx, nby)
    }
}

/// A grid of `nbx * nby` blocks stored row-major (`index = bx + by * nbx`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    size: GridSize,
    blocks: Vec<Block>,
}

impl Canvas {
    /// A blank canvas.
    pub fn new(size: GridSize) -> Self {
        Self {
            size,
            blocks: vec![Block::default(); size.blocks()],
        }
    }

    pub(crate) fn from_blocks(size: GridSize, blocks: Vec<Block>) -> Self {
        debug_assert_eq!(blocks.len(), size.blocks());
        Self { size, blocks }
    }

    #[inline]
    pub fn size(&self) -> GridSize {
        self.size
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.size.width()
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.size.height()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn blocks_mut(&mut self) -> &mut [Block] {
        &mut self.blocks
    }

    pub fn block(&self, bx: usize, by: usize) -> Option<&Block> {
        if bx < self.size.nbx && by < self.size.nby {
            Some(&self.blocks[bx + by * self.size.nbx])
        } else {
            None
        }
    }

    pub fn block_mut(&mut self, bx: usize, by: usize) -> Option<&mut Block> {
        if bx < self.size.nbx && by < self.size.nby {
            Some(&mut self.blocks[bx + by * self.size.nbx])
        } else {
            None
        }
    }

    /// Resolve a pixel coordinate to `(block index, x in block, y in block)`.
    /// Returns `None` outside the canvas.
    pub fn locate(&self, px: i32, py: i32) -> Option<(usize, usize, usize)> {
        if px < 0 || py < 0 {
            return None;
        }
        let (px, py) = (px as usize, py as usize);
        let (bx, by) = (px / BLOCK_SIZE, py / BLOCK_SIZE);
        if bx >= self.size.nbx || by >= self.size.nby {
            return None;
        }
        Some((bx + by * self.size.nbx, px % BLOCK_SIZE, py % BLOCK_SIZE))
    }

    /// Block containing the pixel, if it is on the canvas.
    pub fn block_at_pixel(&self, px: i32, py: i32) -> Option<&Block> {
        self.locate(px, py).map(|(index, _, _)| &self.blocks[index])
    }

    /// Displayed palette index, or `None` outside the canvas.
    pub fn get_pixel(&self, px: i32, py: i32, settings: &Settings) -> Option<u8> {
        self.locate(px, py)
            .map(|(index, x, y)| self.blocks[index].get_pixel(x, y, settings))
    }

    /// Paint one pixel of the canonical image. Off-canvas coordinates are ignored.
    pub fn set_pixel(&mut self, px: i32, py: i32, color: u8, settings: &Settings) {
        if let Some((index, x, y)) = self.locate(px, py) {
            self.blocks[index].set_pixel(x, y, color, settings);
        }
    }

    /// Flood the block under the pixel with one color.
    pub fn fill_block(&mut self, px: i32, py: i32, color: u8) {
        if let Some((index, _, _)) = self.locate(px, py) {
            self.blocks[index].fill(color);
        }
    }

    pub fn clear(&mut self) {
        self.blocks.iter_mut().for_each(Block::clear);
    }

    pub fn randomize<R: Rng>(&mut self, rng: &mut R) {
        for block in &mut self.blocks {
            block.randomize(rng);
        }
    }

    /// Mirror the image left to right.
    pub fn flip_horizontal(&mut self) {
        let nbx = self.size.nbx;
        for row in self.blocks.chunks_mut(nbx) {
            row.reverse();
            row.iter_mut().for_each(Block::flip_horizontal);
        }
    }

    /// Mirror the image top to bottom.
    pub fn flip_vertical(&mut self) {
        let (nbx, nby) = (self.size.nbx, self.size.nby);
        for by in 0..nby / 2 {
            let (top, bottom) = self.blocks.split_at_mut((nby - 1 - by) * nbx);
            top[by * nbx..(by + 1) * nbx].swap_with_slice(&mut bottom[..nbx]);
        }
        self.blocks.iter_mut().for_each(Block::flip_vertical);
    }

    /// Replace all content, keeping nothing of the previous image.
    pub fn replace(&mut self, other: Canvas) {
        *self = other;
    }
}

impl Surface for Canvas {
    fn bounds(&self) -> (i32, i32) {
        (self.width() as i32, self.height() as i32)
    }

    fn set_pixel(&mut self, px: i32, py: i32, color: u8, settings: &Settings) {
        Canvas::set_pixel(self, px, py, color, settings);
    }

    fn fill_block(&mut self, px: i32, py: i32, color: u8) {
        Canvas::fill_block(self, px, py, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn grid(nbx: usize, nby: usize) -> GridSize {
        GridSize::new(nbx, nby).unwrap()
    }

    #[test]
    fn test_grid_size_parsing() {
        assert_eq!("40x25".parse::<GridSize>().unwrap(), GridSize::default());
        assert_eq!("#12x7blocks".parse::<GridSize>().unwrap(), grid(12, 7));
        assert_eq!(" 3X4 ".parse::<GridSize>().unwrap(), grid(3, 4));
        assert!("40".parse::<GridSize>().is_err());
        assert!("0x10".parse::<GridSize>().is_err());
        assert!("256x1".parse::<GridSize>().is_err());
        assert!("axb".parse::<GridSize>().is_err());
    }

    #[test]
    fn test_default_is_320x200() {
        let canvas = Canvas::new(GridSize::default());
        assert_eq!((canvas.width(), canvas.height()), (320, 200));
        assert_eq!(canvas.blocks().len(), 1000);
    }

    #[test]
    fn test_set_pixel_locates_block() {
        let s = Settings::default();
        let mut canvas = Canvas::new(grid(3, 2));
        canvas.set_pixel(17, 9, 4, &s);
        let block = canvas.block(2, 1).unwrap();
        assert_eq!(block.fg, 4);
        assert!(block.is_set(1, 1));
        assert_eq!(canvas.get_pixel(17, 9, &s), Some(4));
    }

    #[test]
    fn test_out_of_bounds_is_ignored() {
        let s = Settings::default();
        let mut canvas = Canvas::new(grid(2, 2));
        let before = canvas.clone();
        canvas.set_pixel(-1, 0, 3, &s);
        canvas.set_pixel(0, -1, 3, &s);
        canvas.set_pixel(16, 0, 3, &s);
        canvas.set_pixel(0, 16, 3, &s);
        canvas.fill_block(99, 99, 3);
        assert_eq!(canvas, before);
        assert_eq!(canvas.get_pixel(16, 0, &s), None);
    }

    #[test]
    fn test_fill_block() {
        let s = Settings::default();
        let mut canvas = Canvas::new(grid(2, 1));
        canvas.set_pixel(9, 1, 6, &s);
        canvas.fill_block(12, 7, 2);
        assert_eq!(canvas.block(1, 0), Some(&Block { bg: 2, ..Block::default() }));
    }

    #[test]
    fn test_flip_horizontal() {
        let s = Settings::default();
        let mut canvas = Canvas::new(grid(3, 2));
        canvas.set_pixel(0, 0, 5, &s);
        canvas.set_pixel(9, 10, 7, &s);
        canvas.flip_horizontal();
        assert_eq!(canvas.get_pixel(23, 0, &s), Some(5));
        assert_eq!(canvas.get_pixel(14, 10, &s), Some(7));
        assert_eq!(canvas.get_pixel(0, 0, &s), Some(0));
        canvas.flip_horizontal();
        assert_eq!(canvas.get_pixel(0, 0, &s), Some(5));
    }

    #[test]
    fn test_flip_vertical() {
        let s = Settings::default();
        let mut canvas = Canvas::new(grid(2, 3));
        canvas.set_pixel(3, 1, 5, &s);
        canvas.set_pixel(12, 9, 8, &s);
        canvas.flip_vertical();
        assert_eq!(canvas.get_pixel(3, 22, &s), Some(5));
        assert_eq!(canvas.get_pixel(12, 14, &s), Some(8));
        assert_eq!(canvas.get_pixel(3, 1, &s), Some(0));
    }

    #[test]
    fn test_double_flip_is_identity() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut canvas = Canvas::new(grid(5, 4));
        canvas.randomize(&mut rng);
        let original = canvas.clone();
        canvas.flip_vertical();
        canvas.flip_horizontal();
        assert_ne!(canvas, original);
        canvas.flip_horizontal();
        canvas.flip_vertical();
        assert_eq!(canvas, original);
    }

    #[test]
    fn test_clear() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut canvas = Canvas::new(grid(2, 2));
        canvas.randomize(&mut rng);
        canvas.clear();
        assert_eq!(canvas, Canvas::new(grid(2, 2)));
    }
}
