//! # blockpaint
//!
//! The color-model engine of an 8x8 attribute-block pixel editor, in the style
//! of 1980s 8-bit home computer hires graphics.
//!
//! ## Features
//!
//! - **Block**: an 8x8 cell with two palette colors (foreground and background)
//!   and an optional sprite mask plane showing a third, shared color
//! - **Canvas**: a grid of blocks with whole-image operations (clear, randomize, flip)
//! - **History**: linear undo/redo over serialized snapshots
//! - **Codec**: compact binary layout plus base64 wrapping for text-only stores
//! - **Import**: color reduction of true-color images into block pairs, with optional dithering,
//!   and loading of Hi-Eddi hires pictures
//! - **Editor**: tools, hover preview and named commands on top of all of the above
//!
//! ## Quick Start
//!
//! ### Painting with the two-color constraint
//!
//! ```rust
//! use blockpaint::{Canvas, GridSize, Settings};
//!
//! let settings = Settings::default();
//! let mut canvas = Canvas::new(GridSize::new(1, 1)?);
//!
//! // The block has no foreground pixels yet, so fg is simply repurposed.
//! canvas.set_pixel(0, 0, 5, &settings);
//! assert_eq!(canvas.get_pixel(0, 0, &settings), Some(5));
//! assert_eq!(canvas.get_pixel(1, 0, &settings), Some(0));
//! # Ok::<(), blockpaint::BlockpaintError>(())
//! ```
//!
//! ### Snapshots and undo
//!
//! ```rust
//! use blockpaint::{Canvas, GridSize, History, Settings};
//!
//! let settings = Settings::default();
//! let mut canvas = Canvas::new(GridSize::default());
//! let mut history = History::new();
//!
//! history.save(&canvas);
//! canvas.set_pixel(10, 10, 7, &settings);
//! history.undo(&mut canvas);
//! assert_eq!(canvas.get_pixel(10, 10, &settings), Some(0));
//! ```

use thiserror::Error;

pub mod bitcount;
pub mod block;
pub mod canvas;
pub mod codec;
pub mod editor;
pub mod hires;
pub mod history;
pub mod import;
pub mod palette;
pub mod preview;
pub mod render;
pub mod settings;
pub mod shapes;
pub mod storage;

pub use block::Block;
pub use canvas::{Canvas, GridSize};
pub use codec::{Layout, RestoreOutcome, Restored};
pub use editor::{Button, Command, Editor, Tool};
pub use history::History;
pub use import::{Dithering, ImportOptions};
pub use palette::{Palette, Rgb};
pub use preview::Preview;
pub use settings::{RecolorPolicy, Settings};
pub use shapes::Surface;
pub use storage::{FileStore, KeyValueStore, MemoryStore, Session};

/// Errors reported by the engine's outer edges (codec text, import, storage).
///
/// Painting itself never fails: out-of-range coordinates are ignored.
#[derive(Debug, Error)]
pub enum BlockpaintError {
    /// Grid or image dimensions that are zero or too large
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    /// Buffer size doesn't match expected size for dimensions
    #[error("buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// Persisted text is neither base64 nor a decimal byte list
    #[error("invalid image encoding: {0}")]
    InvalidEncoding(String),

    /// A grid size string like `40x25` could not be parsed
    #[error("invalid grid size: {0:?}")]
    InvalidGridSize(String),

    /// Reading or writing a persisted entry failed
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),
}

/// Result type for blockpaint operations.
pub type Result<T> = core::result::Result<T, BlockpaintError>;

/// Side length of a block in pixels.
pub const BLOCK_SIZE: usize = 8;

/// Number of entries in an attribute palette.
pub const PALETTE_SIZE: usize = 16;

// A grid dimension is stored in a single header byte.
pub(crate) const GRID_LIMIT: usize = 255;
