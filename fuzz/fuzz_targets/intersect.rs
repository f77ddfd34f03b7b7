//! Fuzz target for the segment crossing kernel.
//!
//! Interprets the input as eight native-endian f64 coordinates (NaN,
//! infinities and subnormals included) and checks that the kernel never
//! panics and that a crossing is symmetric under swapping the segments.

#![no_main]

use libfuzzer_sys::fuzz_target;
use lanecount::geom::fuzz_intersect;

fuzz_target!(|data: &[u8]| {
    if data.len() < 64 {
        return;
    }

    let mut coords = [0.0f64; 8];
    for (slot, chunk) in coords.iter_mut().zip(data.chunks_exact(8)) {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(chunk);
        *slot = f64::from_ne_bytes(bytes);
    }

    let (forward, _) = fuzz_intersect(coords);
    let [ax1, ay1, ax2, ay2, bx1, by1, bx2, by2] = coords;
    let (backward, _) = fuzz_intersect([bx1, by1, bx2, by2, ax1, ay1, ax2, ay2]);
    assert_eq!(forward, backward);
});
