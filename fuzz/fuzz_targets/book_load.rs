#![no_main]
use libfuzzer_sys::fuzz_target;
use recbook::{load_book_str, Diagnostics, EnglishMessages};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(book) = load_book_str(s, &mut Diagnostics::new()) {
            let mut config = book.config.clone();
            let _ = config.update(&book.config, &EnglishMessages);
        }
    }
});
