//! End-to-end: rewrite a fixed sequence, draw its RNA, and check the
//! result is bit-identical across runs.

use core_dna::Seq;
use core_raster::{Halt, Pixel, RasterEngine};
use core_rewrite::RewriteEngine;

/// An encoded program that only emits drawing commands: each command is
/// an `III` marker followed by its seven-base word, and the decoder
/// starves right after the last one.
fn drawing_program(words: &[&str]) -> String {
    let mut dna = String::new();
    for word in words {
        dna.push_str("III");
        dna.push_str(word);
    }
    dna
}

const SCENE: &[&str] = &[
    "PIPIIIP", // red
    "PCCIFFP", // mark the origin
    "PIIIIIP", "PIIIIIP", "PIIIIIP", // east to (3, 0)
    "PFFFFFP", // face south
    "PIIIIIP", "PIIIIIP", "PIIIIIP", // down to (3, 3)
    "PFFICCP", // diagonal back to the mark
    "PIPIICP", // add blue to the bucket
    "PIIPIIP", // fill the cell under the position
];

fn paint() -> (u64, Vec<Pixel>) {
    let dna = drawing_program(SCENE);
    let mut rewriter = RewriteEngine::new(Seq::from_bytes(dna.as_bytes()));
    rewriter.run();
    let mut raster = RasterEngine::new();
    assert_eq!(raster.run(rewriter.rna()), Halt::Completed);
    (rewriter.iterations(), raster.into_bitmap().pixels().to_vec())
}

#[test]
fn rewritten_scene_paints_expected_pixels() {
    let (_, pixels) = paint();
    let red = Pixel::new(255, 0, 0, 255);
    // Diagonal endpoints stay red.
    assert_eq!(pixels[0], red);
    assert_eq!(pixels[1 * 600 + 1], red);
    assert_eq!(pixels[2 * 600 + 2], red);
    // The fill replaced the cell at (3, 3) with the red/blue average.
    assert_eq!(pixels[3 * 600 + 3], Pixel::new(127, 0, 127, 255));
    // Off-diagonal cells are untouched.
    assert_eq!(pixels[600], Pixel::default());
}

#[test]
fn pipeline_is_deterministic() {
    let (iters_a, pixels_a) = paint();
    let (iters_b, pixels_b) = paint();
    assert_eq!(iters_a, iters_b);
    assert_eq!(pixels_a, pixels_b);
}
