/*
 * fuzz_targets/parse_duration.rs
 *
 * fuzz target for duration parsing. parse_seconds must never panic, and a
 * success must agree with is_valid_duration and the u64 nanosecond cap.
 *
 * edge cases: "", "1h1h", "1:2:3:4", "99999999999999999999s", unicode digits
 */

#![no_main]

use countdown_timer::duration::{MAX_SECONDS, is_valid_duration, parse_seconds};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    /* convert to str - invalid UTF-8 should be handled gracefully */
    if let Ok(s) = core::str::from_utf8(data) {
        if let Ok(secs) = parse_seconds(s) {
            assert!(is_valid_duration(s));
            assert!(secs <= MAX_SECONDS);
        }
    }
});
