//! Property-based tests for the line walk.

use core_raster::{Bitmap, Pixel, draw};
use proptest::prelude::*;

fn coord() -> impl Strategy<Value = (usize, usize)> {
    (0usize..600, 0usize..600)
}

proptest! {
    // Both endpoints are always painted, wherever the segment runs.
    #[test]
    fn line_paints_both_endpoints(from in coord(), to in coord()) {
        let ink = Pixel::new(255, 255, 255, 255);
        let mut bm = Bitmap::new();
        draw::line(&mut bm, from, to, ink);
        prop_assert_eq!(bm.get(from.0, from.1), ink);
        prop_assert_eq!(bm.get(to.0, to.1), ink);
    }

    // The walk never leaves the bounding box of the endpoints, checked on
    // the box frame's outside neighbors along the segment's rows.
    #[test]
    fn line_respects_column_bounds(from in coord(), to in coord()) {
        let ink = Pixel::new(255, 0, 0, 255);
        let mut bm = Bitmap::new();
        draw::line(&mut bm, from, to, ink);
        let lo_x = from.0.min(to.0);
        let hi_x = from.0.max(to.0);
        for y in 0..600 {
            if lo_x > 0 {
                prop_assert_eq!(bm.get(lo_x - 1, y), Pixel::default());
            }
            if hi_x < 599 {
                prop_assert_eq!(bm.get(hi_x + 1, y), Pixel::default());
            }
        }
    }
}
