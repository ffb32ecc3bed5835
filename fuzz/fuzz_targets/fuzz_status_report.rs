#![no_main]

use libfuzzer_sys::fuzz_target;
use sentinela::status::{StatusReportConfig, cancelled_keys_from_csv};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Errors are fine, panics are bugs.
        let _ = cancelled_keys_from_csv(s, &StatusReportConfig::default());
    }
});
