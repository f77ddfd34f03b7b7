//! Fuzz target for counter configuration parsing.
//!
//! Feeds arbitrary bytes to the JSON config parser and, when a config
//! parses, builds a counter from it. Neither step may panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use lanecount::config::io::from_json_slice;

fuzz_target!(|data: &[u8]| {
    if data.len() > 1024 * 1024 {
        return;
    }

    if let Ok(config) = from_json_slice(data) {
        let _ = config.build_counter();
    }
});
