#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Word boundaries must always land on char boundaries
    for word in dirjump::utils::split_words(data) {
        let _ = word.text(data);
        let _ = word.first_char(data);
    }
    let _ = dirjump::utils::reverse(data);
});
