//! Fuzz target for JSON Lines frame parsing.

#![no_main]

use libfuzzer_sys::fuzz_target;
use lanecount::frames::from_jsonl_slice;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let _ = from_jsonl_slice(data);
});
