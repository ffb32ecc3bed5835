#![no_main]

use libfuzzer_sys::fuzz_target;
use std::collections::HashSet;

fuzz_target!(|data: &[u8]| {
    // Must not panic on any input; unreadable documents just yield nothing.
    let mut seen = HashSet::new();
    let records = sentinela::nfe::extract(data, "12345678000190", &mut seen, &HashSet::new());
    assert!(records.is_empty() || seen.len() == 1);
});
