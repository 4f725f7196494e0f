use blockpaint::import::import_rgba;
use blockpaint::*;
use image::{ImageFormat, RgbaImage};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Cursor;

/// Left half in one palette color, right half in another, as PNG bytes.
fn two_tone_png(width: u32, height: u32, left: Rgb, right: Rgb) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, _| {
        let c = if x < width / 2 { left } else { right };
        image::Rgba([c.r, c.g, c.b, 255])
    });
    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .expect("Failed to encode PNG");
    png
}

#[test]
fn test_import_decoded_png() {
    let palette = Palette::lively();
    let png = two_tone_png(32, 16, palette.get(6), palette.get(7));
    let img = image::load_from_memory(&png).unwrap().to_rgba8();
    let (width, height) = img.dimensions();

    let mut canvas = Canvas::new(GridSize::new(4, 2).unwrap());
    let mut rng = StdRng::seed_from_u64(1);
    let written = import_rgba(
        &mut canvas,
        img.as_raw(),
        width as usize,
        height as usize,
        &palette,
        &ImportOptions::default(),
        &mut rng,
    )
    .unwrap();
    assert_eq!(written, 8);

    let settings = Settings::default();
    for y in 0..16 {
        assert_eq!(canvas.get_pixel(0, y, &settings), Some(6));
        assert_eq!(canvas.get_pixel(31, y, &settings), Some(7));
    }
}

#[test]
fn test_import_never_upscales() {
    let palette = Palette::murky();
    let white = palette.get(1);
    let rgba: Vec<u8> = (0..10 * 10).flat_map(|_| [white.r, white.g, white.b, 255]).collect();

    let mut canvas = Canvas::new(GridSize::new(5, 5).unwrap());
    let mut rng = StdRng::seed_from_u64(1);
    let opts = ImportOptions::default();
    let written = import_rgba(&mut canvas, &rgba, 10, 10, &palette, &opts, &mut rng).unwrap();
    assert_eq!(written, 4);

    let settings = Settings::default();
    assert_eq!(canvas.get_pixel(9, 9, &settings), Some(1));
    // padding inside a covered block is black
    assert_eq!(canvas.get_pixel(10, 10, &settings), Some(0));
    // blocks beyond the image keep their content
    assert_eq!(canvas.blocks()[2], Block::default());
}

#[test]
fn test_editor_import_records_history() {
    let palette = Palette::murky();
    let red = palette.get(2);
    let rgba: Vec<u8> = (0..16 * 16).flat_map(|_| [red.r, red.g, red.b, 255]).collect();

    let mut editor = Editor::new(GridSize::new(2, 2).unwrap()).with_seed(11);
    editor.set_import_options(ImportOptions::default().with_dithering(Dithering::FloydSteinberg));
    assert_eq!(editor.import_image(&rgba, 16, 16).unwrap(), 4);
    assert_eq!(editor.canvas().get_pixel(5, 5, editor.settings()), Some(2));

    assert!(editor.execute(Command::Undo));
    assert_eq!(editor.canvas(), &Canvas::new(GridSize::new(2, 2).unwrap()));
}

#[test]
fn test_editor_import_hires() {
    let mut data = vec![0x00, 0x20];
    data.extend(std::iter::repeat(0xaa).take(8000));

    let mut editor = Editor::new(GridSize::default());
    assert!(!editor.import_hires(&data).unwrap());
    let settings = *editor.settings();
    assert_eq!(editor.canvas().get_pixel(0, 0, &settings), Some(1));
    assert_eq!(editor.canvas().get_pixel(1, 0, &settings), Some(0));
    assert_eq!(editor.history().len(), 1);

    let mut small = Editor::new(GridSize::new(10, 10).unwrap());
    assert!(small.import_hires(&data).is_err());
    assert!(small.history().is_empty());
}

#[test]
fn test_failed_editor_import_leaves_no_undo_step() {
    let mut canvas = Canvas::new(GridSize::new(10, 10).unwrap());
    canvas.set_pixel(3, 3, 5, &Settings::default());
    let before = canvas.clone();
    let mut editor = Editor::with_canvas(canvas);

    assert!(editor.import_hires(&[0; 9000]).is_err());
    assert!(editor.import_image(&[0; 10], 4, 4).is_err());
    assert!(editor.history().is_empty());
    assert_eq!(editor.canvas(), &before);
    assert!(!editor.execute(Command::Undo));
}
