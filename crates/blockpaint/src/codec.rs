//! Binary snapshot format and its text wrapping.
//!
//! # Layout
//!
//! ```text
//! offset 0                 nbx
//! offset 1                 nby
//! offset 2                 one attribute byte per block, fg | bg << 4
//! offset 2 + n             8 pixel bytes per block, block after block
//! offset 2 + 9n            8 mask bytes per block (masked layout only)
//! ```
//!
//! where `n = nbx * nby`. The masked layout is `17n + 2` bytes, the plain one
//! `9n + 2`. For text-only stores the buffer is base64 encoded.

use crate::block::Block;
use crate::canvas::{Canvas, GridSize};
use crate::{BlockpaintError, Result, BLOCK_SIZE};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

const HEADER_SIZE: usize = 2;

/// Which planes a snapshot carries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Layout {
    /// Attributes, pixels and the sprite mask plane.
    #[default]
    Masked,
    /// Attributes and pixels only.
    Plain,
}

impl Layout {
    /// Encoded size for a given number of blocks.
    pub fn encoded_len(self, blocks: usize) -> usize {
        match self {
            Layout::Masked => blocks * (1 + BLOCK_SIZE + BLOCK_SIZE) + HEADER_SIZE,
            Layout::Plain => blocks * (1 + BLOCK_SIZE) + HEADER_SIZE,
        }
    }
}

/// Result of matching a snapshot against the active grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// The snapshot was loaded.
    Restored,
    /// The snapshot was made for a different grid; a blank canvas is used instead.
    DimensionMismatch { nbx: usize, nby: usize },
    /// The snapshot length does not fit its header; a blank canvas is used instead.
    Corrupt { expected: usize, actual: usize },
}

/// A restored canvas together with how the restore went.
#[derive(Clone, Debug)]
pub struct Restored {
    pub canvas: Canvas,
    pub outcome: RestoreOutcome,
}

impl Restored {
    fn blank(size: GridSize, outcome: RestoreOutcome) -> Self {
        Self {
            canvas: Canvas::new(size),
            outcome,
        }
    }

    /// Whether the user should be told the stored image was damaged.
    pub fn is_corrupt(&self) -> bool {
        matches!(self.outcome, RestoreOutcome::Corrupt { .. })
    }
}

/// Serialize a canvas.
#[must_use = "this returns the encoded snapshot"]
pub fn serialize(canvas: &Canvas, layout: Layout) -> Vec<u8> {
    let size = canvas.size();
    let blocks = canvas.blocks();
    let mut out = Vec::with_capacity(layout.encoded_len(blocks.len()));

    // grid dimensions never exceed 255, see GridSize::new
    out.push(size.nbx() as u8);
    out.push(size.nby() as u8);
    out.extend(blocks.iter().map(Block::attribute));
    for block in blocks {
        out.extend_from_slice(&block.pix);
    }
    if layout == Layout::Masked {
        for block in blocks {
            out.extend_from_slice(&block.mask);
        }
    }
    out
}

/// Rebuild a canvas for the active grid from a snapshot.
///
/// A snapshot taken with other grid dimensions is not an error: the canvas
/// comes back blank with [`RestoreOutcome::DimensionMismatch`]. A length that
/// fits neither layout yields a blank canvas and [`RestoreOutcome::Corrupt`].
pub fn restore(data: &[u8], size: GridSize) -> Restored {
    if data.len() < HEADER_SIZE {
        log::warn!("snapshot too short: {} bytes", data.len());
        return Restored::blank(
            size,
            RestoreOutcome::Corrupt {
                expected: Layout::Masked.encoded_len(size.blocks()),
                actual: data.len(),
            },
        );
    }

    let (nbx, nby) = (data[0] as usize, data[1] as usize);
    if nbx != size.nbx() || nby != size.nby() {
        log::warn!("snapshot is {nbx}x{nby} blocks, canvas is {size}; starting blank");
        return Restored::blank(size, RestoreOutcome::DimensionMismatch { nbx, nby });
    }

    let n = size.blocks();
    let layout = if data.len() == Layout::Masked.encoded_len(n) {
        Layout::Masked
    } else if data.len() == Layout::Plain.encoded_len(n) {
        Layout::Plain
    } else {
        let expected = Layout::Masked.encoded_len(n);
        log::warn!("corrupt image data: expected {expected} bytes, got {}", data.len());
        return Restored::blank(
            size,
            RestoreOutcome::Corrupt {
                expected,
                actual: data.len(),
            },
        );
    };

    let attributes = &data[HEADER_SIZE..HEADER_SIZE + n];
    let pixels = &data[HEADER_SIZE + n..HEADER_SIZE + n * (1 + BLOCK_SIZE)];
    let mut blocks: Vec<Block> = attributes
        .iter()
        .zip(pixels.chunks_exact(BLOCK_SIZE))
        .map(|(&attribute, pix)| {
            let mut block = Block::default();
            block.set_attribute(attribute);
            block.pix.copy_from_slice(pix);
            block
        })
        .collect();

    if layout == Layout::Masked {
        let masks = &data[HEADER_SIZE + n * (1 + BLOCK_SIZE)..];
        for (block, mask) in blocks.iter_mut().zip(masks.chunks_exact(BLOCK_SIZE)) {
            block.mask.copy_from_slice(mask);
        }
    }

    Restored {
        canvas: Canvas::from_blocks(size, blocks),
        outcome: RestoreOutcome::Restored,
    }
}

/// Wrap a snapshot for a text-only store.
pub fn to_text(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Unwrap a stored snapshot.
///
/// Besides plain base64 this accepts base64 of a comma separated decimal
/// byte list (`"40,25,1,..."`), which older saves used.
pub fn from_text(text: &str) -> Result<Vec<u8>> {
    let decoded = STANDARD
        .decode(text.trim())
        .map_err(|e| BlockpaintError::InvalidEncoding(e.to_string()))?;
    Ok(parse_decimal_list(&decoded).unwrap_or(decoded))
}

fn parse_decimal_list(data: &[u8]) -> Option<Vec<u8>> {
    if !data.contains(&b',') || !data.iter().all(|b| b.is_ascii_digit() || *b == b',') {
        return None;
    }
    let text = std::str::from_utf8(data).ok()?;
    text.split(',').map(|v| v.parse::<u8>().ok()).collect()
}

/// Serialize straight to stored text.
pub fn serialize_text(canvas: &Canvas, layout: Layout) -> String {
    to_text(&serialize(canvas, layout))
}

/// Restore from stored text. Undecodable text counts as corrupt data.
pub fn restore_text(text: &str, size: GridSize) -> Restored {
    match from_text(text) {
        Ok(data) => restore(&data, size),
        Err(e) => {
            log::warn!("{e}");
            Restored::blank(
                size,
                RestoreOutcome::Corrupt {
                    expected: Layout::Masked.encoded_len(size.blocks()),
                    actual: 0,
                },
            )
        }
    }
}
