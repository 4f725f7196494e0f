//! Import of Hi-Eddi `.pic` bitmaps.
//!
//! The file is a 320x200 hires screen: a two byte load address, 8000 bytes
//! of bitmap in block order and, at `0x2000` past the address, an optional
//! 1000 byte screen of attributes.

use crate::canvas::{Canvas, GridSize};
use crate::{BlockpaintError, Result, BLOCK_SIZE};

const LOAD_ADDRESS_SIZE: usize = 2;
const BITMAP_SIZE: usize = 8000;
const ATTRIBUTE_OFFSET: usize = LOAD_ADDRESS_SIZE + 0x2000;
const SCREEN_BLOCKS: usize = 1000;

/// Only 40x25 block canvases can take a Hi-Eddi picture.
pub fn grid_size() -> GridSize {
    GridSize::default()
}

/// Load a Hi-Eddi picture into the canvas, replacing every block.
///
/// Returns `true` if the file carried colors, `false` for a monochrome
/// import (white on black).
pub fn import_hires(canvas: &mut Canvas, data: &[u8]) -> Result<bool> {
    if canvas.size() != grid_size() {
        return Err(BlockpaintError::InvalidDimensions {
            width: canvas.size().nbx(),
            height: canvas.size().nby(),
        });
    }
    let needed = LOAD_ADDRESS_SIZE + BITMAP_SIZE;
    if data.len() < needed {
        return Err(BlockpaintError::BufferSizeMismatch {
            expected: needed,
            actual: data.len(),
        });
    }

    let bitmap = &data[LOAD_ADDRESS_SIZE..needed];
    let attributes = data.get(ATTRIBUTE_OFFSET..ATTRIBUTE_OFFSET + SCREEN_BLOCKS);

    for (index, (block, pix)) in canvas
        .blocks_mut()
        .iter_mut()
        .zip(bitmap.chunks_exact(BLOCK_SIZE))
        .enumerate()
    {
        block.pix.copy_from_slice(pix);
        block.mask = [0; BLOCK_SIZE];
        match attributes {
            Some(attributes) => block.set_attribute(attributes[index]),
            None => {
                block.fg = 1;
                block.bg = 0;
            }
        }
    }

    log::debug!(
        "hi-eddi import, {} bytes, {}",
        data.len(),
        if attributes.is_some() { "color" } else { "monochrome" }
    );
    Ok(attributes.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    fn bitmap() -> Vec<u8> {
        let mut data = vec![0x00, 0x20];
        data.extend((0..BITMAP_SIZE).map(|i| if i % 8 == 0 { 0x80 } else { 0 }));
        data
    }

    #[test]
    fn test_monochrome() {
        let s = Settings::default();
        let mut canvas = Canvas::new(grid_size());
        canvas.blocks_mut()[0].mask = [0xff; 8];
        canvas.blocks_mut()[0].fg = 9;
        assert!(!import_hires(&mut canvas, &bitmap()).unwrap());

        let block = canvas.blocks()[0];
        assert_eq!((block.fg, block.bg), (1, 0));
        assert_eq!(block.pix, [0x80, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(block.mask, [0; 8]);
        assert_eq!(canvas.get_pixel(8, 0, &s), Some(1));
        assert_eq!(canvas.get_pixel(9, 0, &s), Some(0));
    }

    #[test]
    fn test_color_attributes() {
        let mut data = bitmap();
        data.resize(ATTRIBUTE_OFFSET, 0);
        data.extend((0..SCREEN_BLOCKS).map(|i| (i % 256) as u8));
        let mut canvas = Canvas::new(grid_size());
        assert!(import_hires(&mut canvas, &data).unwrap());
        let block = canvas.blocks()[0x37];
        assert_eq!((block.fg, block.bg), (7, 3));
    }

    #[test]
    fn test_short_attribute_section_is_monochrome() {
        let mut data = bitmap();
        data.resize(ATTRIBUTE_OFFSET + SCREEN_BLOCKS - 1, 0x55);
        let mut canvas = Canvas::new(grid_size());
        assert!(!import_hires(&mut canvas, &data).unwrap());
        assert_eq!(canvas.blocks()[0].fg, 1);
    }

    #[test]
    fn test_rejects_bad_input() {
        let mut small = Canvas::new(GridSize::new(20, 25).unwrap());
        assert!(matches!(
            import_hires(&mut small, &bitmap()),
            Err(BlockpaintError::InvalidDimensions { width: 20, height: 25 })
        ));
        let mut canvas = Canvas::new(grid_size());
        assert!(matches!(
            import_hires(&mut canvas, &[0; 100]),
            Err(BlockpaintError::BufferSizeMismatch { expected: 8002, actual: 100 })
        ));
    }
}
