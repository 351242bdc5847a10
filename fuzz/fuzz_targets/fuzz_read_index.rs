#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Decoding arbitrary bytes must fail cleanly, never panic.
    // Anything that decodes must survive a search and re-encode.
    let mut input = data;
    if let Ok(index) = dirjump::index::read_index(&mut input) {
        let _ = index.search(&["a", "b"][..], None);
        let mut out = Vec::new();
        let _ = dirjump::index::write_index(&index, &mut out);
    }
});
