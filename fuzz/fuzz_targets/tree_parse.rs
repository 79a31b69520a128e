#![no_main]
use libfuzzer_sys::fuzz_target;
use recbook::tree::{self, WriteOptions};
use recbook::{Diagnostics, Input};

fuzz_target!(|data: &[u8]| {
    let mut diagnostics = Diagnostics::new();
    if let Ok(root) = tree::load(&Input::from_bytes(data), &mut diagnostics) {
        let text = tree::to_string(&root, &WriteOptions::default());
        let _ = tree::parse_str(&text);
    }
});
