//! blockpaint - Paint attribute-block images from the command line
//!
//! Every command loads the current image from a store directory, applies
//! its change and writes the image back.

use blockpaint::codec::RestoreOutcome;
use blockpaint::{
    shapes, Block, Canvas, Dithering, Editor, FileStore, GridSize, ImportOptions, Palette,
    RecolorPolicy, Session, Settings,
};
use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "blockpaint")]
#[command(author = "Mike Krüger <mkrueger@posteo.de>")]
#[command(version)]
#[command(about = "Paint 8x8 attribute-block images", long_about = None)]
struct Cli {
    /// Directory holding the current image
    #[arg(long, global = true, default_value = ".blockpaint")]
    store: PathBuf,

    /// Canvas size in blocks, e.g. 40x25 (default: size of the stored image)
    #[arg(long, global = true)]
    size: Option<GridSize>,

    /// Sprite mask color (0-15); enables the mask plane
    #[arg(long, global = true)]
    mask_color: Option<u8>,

    /// Recolor the slot covering fewer pixels when a third color is painted
    #[arg(long, global = true)]
    minimal_change: bool,

    /// Palette used for import and export (murky, lively)
    #[arg(long, global = true, default_value = "murky")]
    palette: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Axis {
    Horizontal,
    Vertical,
}

#[derive(Clone, Copy, ValueEnum)]
enum Shape {
    Outline,
    Filled,
    Ellipse,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a blank image
    New {
        /// Size in blocks
        #[arg(default_value = "40x25")]
        size: GridSize,
    },

    /// Show information about the stored image
    Info,

    /// Paint one pixel
    Paint { x: i32, y: i32, color: u8 },

    /// Fill the block under a pixel
    Fill { x: i32, y: i32, color: u8 },

    /// Draw a line between two pixels
    Line {
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        color: u8,
    },

    /// Draw a circle around a center through an edge point
    Circle {
        cx: i32,
        cy: i32,
        ex: i32,
        ey: i32,
        color: u8,

        /// Outline, filled disc, or ellipse inscribed in the two points
        #[arg(long, value_enum, default_value = "outline")]
        shape: Shape,
    },

    /// Mirror the image
    Flip {
        #[arg(value_enum)]
        axis: Axis,
    },

    /// Reset every block
    Clear,

    /// Fill the image with noise
    Random {
        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Color-reduce an image file (PNG, JPEG, GIF, WebP) onto the canvas
    Import {
        input: PathBuf,

        /// none, random or floyd-steinberg
        #[arg(short, long, default_value = "none")]
        dithering: Dithering,

        /// Seed for random dithering
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Load a Hi-Eddi .pic file (40x25 canvas only)
    ImportHires { input: PathBuf },

    /// Render the image to PNG
    Export {
        output: PathBuf,

        /// Integer zoom factor
        #[arg(short, long, default_value = "1")]
        zoom: usize,
    },
}

fn load(session: &Session<FileStore>, size: Option<GridSize>) -> blockpaint::Result<Canvas> {
    let size = match size {
        Some(size) => size,
        None => session.stored_size()?.unwrap_or_default(),
    };
    let restored = session.load(size)?;
    match restored.outcome {
        RestoreOutcome::Restored => {}
        RestoreOutcome::DimensionMismatch { nbx, nby } => {
            log::warn!("Stored image is {nbx}x{nby} blocks; starting a blank {size} canvas");
        }
        RestoreOutcome::Corrupt { expected, actual } => {
            log::warn!("Stored image is corrupt ({actual} of {expected} bytes); starting blank");
        }
    }
    Ok(restored.canvas)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let palette = Palette::by_name(&cli.palette)
        .ok_or_else(|| format!("Unknown palette '{}'", cli.palette))?;
    let policy = if cli.minimal_change {
        RecolorPolicy::MinimalChange
    } else {
        RecolorPolicy::SameAsPointer
    };
    let settings = Settings::default()
        .with_policy(policy)
        .with_mask_color(cli.mask_color);
    let mut session = Session::new(FileStore::new(&cli.store));

    let mut canvas = match cli.command {
        Commands::New { size } => Canvas::new(size),
        _ => load(&session, cli.size)?,
    };

    match cli.command {
        Commands::New { size } => {
            eprintln!("New {size} block image in '{}'", cli.store.display());
        }
        Commands::Info => {
            let used = canvas
                .blocks()
                .iter()
                .filter(|b| **b != Block::default())
                .count();
            println!(
                "size:    {} blocks, {}x{} pixels",
                canvas.size(),
                canvas.width(),
                canvas.height()
            );
            println!("painted: {used} of {} blocks", canvas.size().blocks());
            println!("store:   {}", cli.store.display());
            return Ok(());
        }
        Commands::Paint { x, y, color } => canvas.set_pixel(x, y, color, &settings),
        Commands::Fill { x, y, color } => canvas.fill_block(x, y, color),
        Commands::Line {
            x0,
            y0,
            x1,
            y1,
            color,
        } => shapes::line(&mut canvas, (x0, y0), (x1, y1), color, &settings),
        Commands::Circle {
            cx,
            cy,
            ex,
            ey,
            color,
            shape,
        } => {
            let (a, b) = ((cx, cy), (ex, ey));
            match shape {
                Shape::Outline => shapes::circle(&mut canvas, a, b, color, &settings),
                Shape::Filled => shapes::filled_circle(&mut canvas, a, b, color, &settings),
                Shape::Ellipse => shapes::ellipse_rect(&mut canvas, a, b, color, &settings),
            }
        }
        Commands::Flip { axis } => match axis {
            Axis::Horizontal => canvas.flip_horizontal(),
            Axis::Vertical => canvas.flip_vertical(),
        },
        Commands::Clear => canvas.clear(),
        Commands::Random { seed } => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            canvas.randomize(&mut rng);
        }
        Commands::Import {
            input,
            dithering,
            seed,
        } => {
            let img = image::open(&input)
                .map_err(|e| format!("Failed to open '{}': {}", input.display(), e))?;
            let rgba_img = img.to_rgba8();
            let (width, height) = rgba_img.dimensions();
            let pixels = rgba_img.into_raw();

            eprintln!(
                "Importing '{}' ({}x{}) with {} dithering",
                input.display(),
                width,
                height,
                dithering
            );

            let mut editor = Editor::with_canvas(canvas);
            if let Some(seed) = seed {
                editor = editor.with_seed(seed);
            }
            editor.set_settings(settings);
            editor.set_palette(palette.clone());
            editor.set_import_options(ImportOptions::default().with_dithering(dithering));
            let blocks = editor.import_image(&pixels, width as usize, height as usize)?;
            eprintln!("Wrote {blocks} blocks");
            canvas = editor.into_canvas();
        }
        Commands::ImportHires { input } => {
            let data = fs::read(&input)
                .map_err(|e| format!("Failed to read '{}': {}", input.display(), e))?;
            let mut editor = Editor::with_canvas(canvas);
            let color = editor.import_hires(&data)?;
            eprintln!(
                "Imported '{}' ({})",
                input.display(),
                if color { "color" } else { "monochrome" }
            );
            canvas = editor.into_canvas();
        }
        Commands::Export { output, zoom } => {
            let zoom = zoom.clamp(1, 16);
            let rgba = canvas.to_rgba(&palette, &settings);
            let (width, height) = (canvas.width() * zoom, canvas.height() * zoom);
            let rgba = blockpaint::render::zoom(&rgba, canvas.width(), canvas.height(), zoom);
            let img = image::RgbaImage::from_raw(width as u32, height as u32, rgba)
                .ok_or("Failed to create image from rendered data")?;
            img.save(&output)?;
            eprintln!("Exported: {}x{} pixels -> '{}'", width, height, output.display());
            return Ok(());
        }
    }

    session.save(&canvas)?;
    Ok(())
}
