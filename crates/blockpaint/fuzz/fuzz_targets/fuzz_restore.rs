#![no_main]

use blockpaint::codec;
use blockpaint::GridSize;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary snapshots and stored text must never panic
    let size = GridSize::new(4, 3).unwrap();
    let restored = codec::restore(data, size);
    assert_eq!(restored.canvas.size(), size);

    if let Ok(text) = std::str::from_utf8(data) {
        let restored = codec::restore_text(text, size);
        assert_eq!(restored.canvas.blocks().len(), size.blocks());
    }
});
