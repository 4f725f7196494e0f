#![no_main]

use arbitrary::Arbitrary;
use blockpaint::codec::{self, Layout, RestoreOutcome};
use blockpaint::{Canvas, GridSize};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    nbx: u8,
    nby: u8,
    planes: Vec<u8>,
}

fuzz_target!(|input: FuzzInput| {
    // Skip invalid dimensions
    let nbx = (input.nbx as usize).clamp(1, 16);
    let nby = (input.nby as usize).clamp(1, 16);
    let size = GridSize::new(nbx, nby).unwrap();

    let mut canvas = Canvas::new(size);
    let mut bytes = input.planes.iter().copied().cycle();
    if !input.planes.is_empty() {
        for block in canvas.blocks_mut() {
            block.set_attribute(bytes.next().unwrap_or(0));
            block.pix.iter_mut().for_each(|p| *p = bytes.next().unwrap_or(0));
            block.mask.iter_mut().for_each(|m| *m = bytes.next().unwrap_or(0));
        }
    }

    let text = codec::serialize_text(&canvas, Layout::Masked);
    let restored = codec::restore_text(&text, size);
    assert_eq!(restored.outcome, RestoreOutcome::Restored);
    assert_eq!(restored.canvas, canvas);
});
