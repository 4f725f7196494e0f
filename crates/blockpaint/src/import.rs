//! Color reduction of true-color images into attribute blocks.
//!
//! The source is shrunk to fit the canvas (never enlarged), then every 8x8
//! tile picks the palette pair that explains its pixels best. Each pixel bit
//! then selects one of the two, optionally dithered.

use crate::canvas::Canvas;
use crate::palette::Palette;
use crate::{BlockpaintError, Result, BLOCK_SIZE, PALETTE_SIZE};
use image::imageops::{self, FilterType};
use image::RgbaImage;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

const PIXELS: usize = BLOCK_SIZE * BLOCK_SIZE;

/// How pixel bits are chosen once a block's color pair is known.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Dithering {
    /// Nearest of the two colors.
    #[default]
    None,
    /// Probabilistic choice weighted by the squared distances.
    Random,
    /// Error diffusion inside the block.
    FloydSteinberg,
}

impl Dithering {
    /// None -> Random -> FloydSteinberg -> None.
    pub fn next(self) -> Self {
        match self {
            Dithering::None => Dithering::Random,
            Dithering::Random => Dithering::FloydSteinberg,
            Dithering::FloydSteinberg => Dithering::None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Dithering::None => "none",
            Dithering::Random => "random",
            Dithering::FloydSteinberg => "floyd-steinberg",
        }
    }
}

impl fmt::Display for Dithering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dithering {
    type Err = BlockpaintError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "off" => Ok(Dithering::None),
            "random" => Ok(Dithering::Random),
            "floyd-steinberg" | "floydsteinberg" | "fs" => Ok(Dithering::FloydSteinberg),
            _ => Err(BlockpaintError::InvalidEncoding(format!(
                "unknown dithering mode {s:?}"
            ))),
        }
    }
}

/// Options for [`import_rgba`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImportOptions {
    pub dithering: Dithering,
    /// Weight of the farther color's distance in the pair score.
    /// Only used when dithering.
    pub other_color_factor: f32,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            dithering: Dithering::None,
            other_color_factor: 0.01,
        }
    }
}

impl ImportOptions {
    pub fn with_dithering(mut self, dithering: Dithering) -> Self {
        self.dithering = dithering;
        self
    }
}

/// Size of the shrunk source: `floor(w / r) x floor(h / r)` with
/// `r = max(1, w / W, h / H)`.
pub fn scaled_size(
    width: usize,
    height: usize,
    canvas_width: usize,
    canvas_height: usize,
) -> (usize, usize) {
    let rx = width as f64 / canvas_width as f64;
    let ry = height as f64 / canvas_height as f64;
    let r = rx.max(ry).max(1.0);
    let sw = ((width as f64 / r).floor() as usize).min(canvas_width);
    let sh = ((height as f64 / r).floor() as usize).min(canvas_height);
    (sw, sh)
}

/// Reduce an RGBA image onto the canvas.
///
/// Only blocks covered by the scaled image are written; their sprite masks
/// are cleared. Returns the number of blocks written.
///
/// # Errors
///
/// [`BlockpaintError::InvalidDimensions`] for an empty image and
/// [`BlockpaintError::BufferSizeMismatch`] when `rgba` is not
/// `width * height * 4` bytes long.
pub fn import_rgba<R: Rng>(
    canvas: &mut Canvas,
    rgba: &[u8],
    width: usize,
    height: usize,
    palette: &Palette,
    opts: &ImportOptions,
    rng: &mut R,
) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(BlockpaintError::InvalidDimensions { width, height });
    }
    let expected = width * height * 4;
    if rgba.len() != expected {
        return Err(BlockpaintError::BufferSizeMismatch {
            expected,
            actual: rgba.len(),
        });
    }

    let (sw, sh) = scaled_size(width, height, canvas.width(), canvas.height());
    if sw == 0 || sh == 0 {
        log::warn!("image {width}x{height} shrinks to nothing");
        return Ok(0);
    }

    let source = RgbaImage::from_raw(width as u32, height as u32, rgba.to_vec()).ok_or(
        BlockpaintError::BufferSizeMismatch {
            expected,
            actual: rgba.len(),
        },
    )?;
    let scaled = if (sw, sh) == (width, height) {
        source
    } else {
        imageops::resize(&source, sw as u32, sh as u32, FilterType::Triangle)
    };

    let ibx = sw.div_ceil(BLOCK_SIZE);
    let iby = sh.div_ceil(BLOCK_SIZE);
    let nbx = canvas.size().nbx();
    let blocks = canvas.blocks_mut();

    for by in 0..iby {
        for bx in 0..ibx {
            let tile = read_tile(&scaled, bx, by);
            let block = &mut blocks[bx + by * nbx];
            let (fg, bg, pix) = reduce_tile(&tile, palette, opts, rng);
            block.fg = fg;
            block.bg = bg;
            block.pix = pix;
            block.mask = [0; BLOCK_SIZE];
        }
    }

    log::debug!(
        "imported {width}x{height} as {sw}x{sh}, {} blocks, dithering {}",
        ibx * iby,
        opts.dithering
    );
    Ok(ibx * iby)
}

// Pixels outside the scaled image read as black.
fn read_tile(image: &RgbaImage, bx: usize, by: usize) -> [[i32; 3]; PIXELS] {
    let mut tile = [[0i32; 3]; PIXELS];
    for y in 0..BLOCK_SIZE {
        for x in 0..BLOCK_SIZE {
            let gx = (bx * BLOCK_SIZE + x) as u32;
            let gy = (by * BLOCK_SIZE + y) as u32;
            if gx < image.width() && gy < image.height() {
                let p = image.get_pixel(gx, gy).0;
                tile[y * BLOCK_SIZE + x] = [p[0] as i32, p[1] as i32, p[2] as i32];
            }
        }
    }
    tile
}

/// Pick the best color pair for one tile and raster its bits.
fn reduce_tile<R: Rng>(
    tile: &[[i32; 3]; PIXELS],
    palette: &Palette,
    opts: &ImportOptions,
    rng: &mut R,
) -> (u8, u8, [u8; BLOCK_SIZE]) {
    let mut dist = [[0i32; PIXELS]; PALETTE_SIZE];
    for (col, row) in dist.iter_mut().enumerate() {
        let c = palette.get(col as u8);
        for (d, p) in row.iter_mut().zip(tile.iter()) {
            *d = c.distance_sq(p[0], p[1], p[2]);
        }
    }

    let dithering = opts.dithering != Dithering::None;
    let factor = opts.other_color_factor as f64;
    let mut best: Option<(f64, usize, usize)> = None;
    for c1 in 1..PALETTE_SIZE {
        for c2 in 0..c1 {
            let mut sum = 0.0f64;
            for px in 0..PIXELS {
                let (a, b) = (dist[c1][px], dist[c2][px]);
                sum += a.min(b) as f64;
                if dithering {
                    sum += factor * a.max(b) as f64;
                }
            }
            if best.map_or(true, |(msum, _, _)| sum < msum) {
                best = Some((sum, c1, c2));
            }
        }
    }
    // the pair loop always runs at least once
    let (_, c1, c2) = best.unwrap_or((0.0, 1, 0));

    let pix = match opts.dithering {
        Dithering::None => raster(|px| dist[c1][px] < dist[c2][px]),
        Dithering::Random => raster(|px| {
            let (d0, d1) = (dist[c1][px] as f64, dist[c2][px] as f64);
            rng.gen::<f64>() * (d0 + d1) > d0
        }),
        Dithering::FloydSteinberg => floyd_steinberg(tile, palette, c1 as u8, c2 as u8),
    };
    (c1 as u8, c2 as u8, pix)
}

fn raster(mut foreground: impl FnMut(usize) -> bool) -> [u8; BLOCK_SIZE] {
    let mut pix = [0u8; BLOCK_SIZE];
    for (y, row) in pix.iter_mut().enumerate() {
        for x in 0..BLOCK_SIZE {
            *row <<= 1;
            if foreground(y * BLOCK_SIZE + x) {
                *row |= 1;
            }
        }
    }
    pix
}

/// Error diffusion confined to one block, scanned row by row.
fn floyd_steinberg(
    tile: &[[i32; 3]; PIXELS],
    palette: &Palette,
    fg: u8,
    bg: u8,
) -> [u8; BLOCK_SIZE] {
    let colors = [palette.get(fg), palette.get(bg)];
    let colors = colors.map(|c| [c.r as f32, c.g as f32, c.b as f32]);
    let mut error = [[0f32; 3]; PIXELS];
    let mut pix = [0u8; BLOCK_SIZE];

    for y in 0..BLOCK_SIZE {
        for x in 0..BLOCK_SIZE {
            let px = y * BLOCK_SIZE + x;
            let target: [f32; 3] = std::array::from_fn(|c| tile[px][c] as f32 + error[px][c]);
            let d = colors.map(|m| (0..3).map(|c| (m[c] - target[c]).powi(2)).sum::<f32>());
            let choice = if d[0] < d[1] { 0 } else { 1 };

            pix[y] <<= 1;
            if choice == 0 {
                pix[y] |= 1;
            }

            let err: [f32; 3] = std::array::from_fn(|c| target[c] - colors[choice][c]);
            let mut push = |nx: usize, ny: usize, weight: f32| {
                let e = &mut error[ny * BLOCK_SIZE + nx];
                for c in 0..3 {
                    e[c] += err[c] * weight;
                }
            };
            if x + 1 < BLOCK_SIZE {
                push(x + 1, y, 7.0 / 16.0);
            }
            if y + 1 < BLOCK_SIZE {
                if x > 0 {
                    push(x - 1, y + 1, 3.0 / 16.0);
                }
                push(x, y + 1, 5.0 / 16.0);
                if x + 1 < BLOCK_SIZE {
                    push(x + 1, y + 1, 3.0 / 16.0);
                }
            }
        }
    }
    pix
}
