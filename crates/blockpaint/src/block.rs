//! The 8x8 attribute block and its constrained pixel-set algorithm.
//!
//! A block shows at most two palette colors: every pixel whose bit is set in
//! `pix` shows `fg`, every other pixel shows `bg`. With sprite masking enabled
//! a set bit in `mask` overrides both and shows the shared mask color.
//!
//! Row `y` is byte `y`, and pixel `x` of a row is bit `7 - x`, so the most
//! significant bit is the leftmost pixel.

use crate::bitcount::bit_count;
use crate::settings::{RecolorPolicy, Settings};
use crate::BLOCK_SIZE;
use rand::Rng;

/// Foreground color of a freshly cleared block.
pub const DEFAULT_FG: u8 = 1;
/// Background color of a freshly cleared block.
pub const DEFAULT_BG: u8 = 0;

/// One 8x8 pixel cell with its color attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Block {
    /// Palette index shown by set pixels
    pub fg: u8,
    /// Palette index shown by clear pixels
    pub bg: u8,
    /// Pixel plane, one byte per row
    pub pix: [u8; BLOCK_SIZE],
    /// Sprite mask plane, one byte per row
    pub mask: [u8; BLOCK_SIZE],
}

impl Default for Block {
    fn default() -> Self {
        Self {
            fg: DEFAULT_FG,
            bg: DEFAULT_BG,
            pix: [0; BLOCK_SIZE],
            mask: [0; BLOCK_SIZE],
        }
    }
}

#[inline]
fn bit(x: usize) -> u8 {
    debug_assert!(x < BLOCK_SIZE, "x out of block: {x}");
    0x80 >> x
}

impl Block {
    /// An empty block: `fg = 1`, `bg = 0`, no pixels, no mask.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore the empty state.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Flood the whole block with one color, dropping all detail.
    pub fn fill(&mut self, color: u8) {
        self.clear();
        self.bg = color & 0x0f;
    }

    /// Random colors and random pixels. The mask is cleared.
    pub fn randomize<R: Rng>(&mut self, rng: &mut R) {
        self.fg = rng.gen_range(0..16);
        self.bg = rng.gen_range(0..16);
        rng.fill(&mut self.pix[..]);
        self.mask = [0; BLOCK_SIZE];
    }

    /// Whether the pixel plane bit at (x, y) is set.
    #[inline]
    pub fn is_set(&self, x: usize, y: usize) -> bool {
        self.pix[y] & bit(x) != 0
    }

    /// Whether the mask plane bit at (x, y) is set.
    #[inline]
    pub fn is_masked(&self, x: usize, y: usize) -> bool {
        self.mask[y] & bit(x) != 0
    }

    /// Displayed palette index at (x, y).
    pub fn get_pixel(&self, x: usize, y: usize, settings: &Settings) -> u8 {
        if let Some(mask_color) = settings.mask_color() {
            if self.is_masked(x, y) {
                return mask_color;
            }
        }
        if self.is_set(x, y) {
            self.fg
        } else {
            self.bg
        }
    }

    fn effective_mask(&self, settings: &Settings) -> [u8; BLOCK_SIZE] {
        if settings.masking() {
            self.mask
        } else {
            [0; BLOCK_SIZE]
        }
    }

    /// Number of pixels currently showing `fg`.
    pub fn foreground_count(&self, settings: &Settings) -> u32 {
        let mask = self.effective_mask(settings);
        self.pix
            .iter()
            .zip(mask.iter())
            .map(|(&p, &m)| bit_count(p & !m))
            .sum()
    }

    /// Number of pixels currently showing `bg`.
    pub fn background_count(&self, settings: &Settings) -> u32 {
        let mask = self.effective_mask(settings);
        self.pix
            .iter()
            .zip(mask.iter())
            .map(|(&p, &m)| bit_count(!p & !m))
            .sum()
    }

    /// Make pixel (x, y) show `color` without ever showing a third color
    /// anywhere in the block.
    ///
    /// If `color` already is `fg` or `bg` only the pixel bit changes.
    /// Otherwise one of the two slots is repainted to `color`, which changes
    /// every pixel using that slot:
    ///
    /// - a slot no pixel uses is taken first (fg before bg),
    /// - else [`RecolorPolicy::MinimalChange`] takes the less used slot,
    ///   and [`RecolorPolicy::SameAsPointer`] takes the slot shown at (x, y).
    ///
    /// With sprite masking, painting the mask color sets the mask bit, and
    /// painting any other color clears it. A slot holding the mask color is
    /// freed first by moving its pixels onto the mask plane.
    pub fn set_pixel(&mut self, x: usize, y: usize, color: u8, settings: &Settings) {
        let color = color & 0x0f;
        let b = bit(x);

        if let Some(mask_color) = settings.mask_color() {
            if color == mask_color {
                self.mask[y] |= b;
                return;
            }

            // Slots showing the mask color hand their pixels to the mask plane.
            if self.fg == mask_color {
                for (m, p) in self.mask.iter_mut().zip(self.pix.iter()) {
                    *m |= *p;
                }
                self.fg = color;
            }
            if self.bg == mask_color {
                for (m, p) in self.mask.iter_mut().zip(self.pix.iter()) {
                    *m |= !*p;
                }
                self.bg = color;
            }
            self.mask[y] &= !b;
        }

        let is_set = self.pix[y] & b != 0;

        if self.fg == color {
            if !is_set && self.bg != color {
                self.pix[y] |= b;
            }
            return;
        }
        if self.bg == color {
            if is_set {
                self.pix[y] &= !b;
            }
            return;
        }

        let fsum = self.foreground_count(settings);
        let bsum = self.background_count(settings);

        if fsum == 0 {
            self.fg = color;
            self.pix[y] |= b;
        } else if bsum == 0 {
            self.bg = color;
            self.pix[y] &= !b;
        } else {
            let recolor_fg = match settings.policy {
                RecolorPolicy::MinimalChange => fsum < bsum,
                RecolorPolicy::SameAsPointer => is_set,
            };
            if recolor_fg {
                self.fg = color;
                self.pix[y] |= b;
            } else {
                self.bg = color;
                self.pix[y] &= !b;
            }
        }
    }

    /// Mirror left to right.
    pub fn flip_horizontal(&mut self) {
        for row in self.pix.iter_mut().chain(self.mask.iter_mut()) {
            *row = row.reverse_bits();
        }
    }

    /// Mirror top to bottom.
    pub fn flip_vertical(&mut self) {
        self.pix.reverse();
        self.mask.reverse();
    }

    /// Attribute byte: low nibble fg, high nibble bg.
    #[inline]
    pub fn attribute(&self) -> u8 {
        (self.fg & 0x0f) | ((self.bg & 0x0f) << 4)
    }

    /// Inverse of [`Block::attribute`].
    #[inline]
    pub fn set_attribute(&mut self, value: u8) {
        self.fg = value & 0x0f;
        self.bg = value >> 4;
    }
}
