#![no_main]

use arbitrary::Arbitrary;
use blockpaint::{Canvas, GridSize, RecolorPolicy, Settings};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Stroke {
    x: i16,
    y: i16,
    color: u8,
}

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    minimal_change: bool,
    mask_color: Option<u8>,
    strokes: Vec<Stroke>,
}

fuzz_target!(|input: FuzzInput| {
    let policy = if input.minimal_change {
        RecolorPolicy::MinimalChange
    } else {
        RecolorPolicy::SameAsPointer
    };
    let settings = Settings::default()
        .with_policy(policy)
        .with_mask_color(input.mask_color);
    let mut canvas = Canvas::new(GridSize::new(3, 2).unwrap());

    for s in &input.strokes {
        let (x, y) = (s.x as i32, s.y as i32);
        canvas.set_pixel(x, y, s.color, &settings);

        // The painted pixel shows the requested color
        if let Some(shown) = canvas.get_pixel(x, y, &settings) {
            assert_eq!(shown, s.color & 0x0f);
        }
    }
});
