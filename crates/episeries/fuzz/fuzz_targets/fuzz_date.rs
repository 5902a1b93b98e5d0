//! Fuzz target for date parsing.
//!
//! Parsing must never panic, and a date it accepts must be a real date.

#![no_main]

use episeries::dates::{is_no_date, parse_date};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 1_000 {
        return;
    }

    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(date) = parse_date(text) {
            if text.trim().is_empty() {
                assert!(is_no_date(date));
            }
        }
    }
});
