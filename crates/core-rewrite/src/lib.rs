//! The rewriting engine: parse, match, replace, repeat.
//!
//! Each iteration decodes one pattern and one template off the front of
//! the live sequence, matches the pattern against what remains, and on
//! success splices the materialized template back onto the front. RNA
//! words encountered while decoding are queued as a side effect. The loop
//! ends when decoding runs off the end of the sequence; that is the
//! machine's one and only halting condition.

use core_dna::{Cursor, Rna, Seq};
use tracing::{debug, info, trace};

pub mod match_replace;
pub mod parse;

pub use match_replace::{asnat, find_postfix, protect, quote};
pub use parse::{ItemsDisplay, ParseError, PatItem, TmplItem};

use match_replace::{match_pattern, replace};

/// Iterations between progress events on the `rewrite.loop` target.
const PROGRESS_INTERVAL: u64 = 1 << 17;

/// Owns the live sequence, the RNA queue, and the scratch buffers that
/// are reused across iterations.
pub struct RewriteEngine {
    dna: Seq,
    rna: Vec<Rna>,
    pat: Vec<PatItem>,
    tmpl: Vec<TmplItem>,
    iterations: u64,
    mismatches: u64,
}

impl RewriteEngine {
    pub fn new(dna: Seq) -> RewriteEngine {
        RewriteEngine {
            dna,
            rna: Vec::new(),
            pat: Vec::new(),
            tmpl: Vec::new(),
            iterations: 0,
            mismatches: 0,
        }
    }

    /// Seed with `prefix` prepended to `dna`.
    pub fn with_prefix(prefix: &[u8], dna: Seq) -> RewriteEngine {
        RewriteEngine::new(Seq::from_bytes(prefix).append(&dna))
    }

    pub fn dna(&self) -> &Seq {
        &self.dna
    }

    pub fn rna(&self) -> &[Rna] {
        &self.rna
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn mismatches(&self) -> u64 {
        self.mismatches
    }

    pub fn into_rna(self) -> Vec<Rna> {
        self.rna
    }

    /// One full iteration. `Err(EndOfInput)` is the halt signal; the
    /// sequence and queue keep whatever state the partial decode left.
    pub fn step(&mut self) -> Result<(), ParseError> {
        let mut cur = Cursor::new(&self.dna);
        parse::pattern(&mut cur, &mut self.pat, &mut self.rna)?;
        parse::template(&mut cur, &mut self.tmpl, &mut self.rna)?;
        trace!(
            target: "rewrite.loop",
            iteration = self.iterations,
            pat = %ItemsDisplay(&self.pat),
            tmpl = %ItemsDisplay(&self.tmpl),
            "productions_decoded"
        );
        self.dna = cur.rest();
        match match_pattern(&self.pat, &self.dna) {
            Some(outcome) => {
                trace!(
                    target: "rewrite.loop",
                    consumed = outcome.consumed,
                    captures = outcome.captures.len(),
                    "pattern_matched"
                );
                self.dna = replace(&self.tmpl, &outcome.captures, &self.dna.skip(outcome.consumed));
            }
            None => {
                // The iteration is abandoned; RNA decoded above is kept.
                self.mismatches += 1;
                trace!(target: "rewrite.loop", "pattern_mismatch");
            }
        }
        self.iterations += 1;
        Ok(())
    }

    /// Drive iterations until the decoder halts, then report totals.
    pub fn run(&mut self) -> &[Rna] {
        loop {
            if self.iterations % PROGRESS_INTERVAL == 0 {
                debug!(
                    target: "rewrite.loop",
                    iteration = self.iterations,
                    dna_len = self.dna.len(),
                    rna = self.rna.len(),
                    "progress"
                );
            }
            if self.step().is_err() {
                break;
            }
        }
        info!(
            target: "rewrite.loop",
            iterations = self.iterations,
            mismatches = self.mismatches,
            rna = self.rna.len(),
            dna_len = self.dna.len(),
            "rewrite_complete"
        );
        &self.rna
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(s: &str) -> RewriteEngine {
        RewriteEngine::new(Seq::from_bytes(s.as_bytes()))
    }

    #[test]
    fn empty_sequence_halts_immediately() {
        let mut eng = engine("");
        assert_eq!(eng.step(), Err(ParseError::EndOfInput));
        assert_eq!(eng.iterations(), 0);
        assert!(eng.rna().is_empty());
    }

    #[test]
    fn single_step_rewrites_front() {
        let mut eng = engine("IIPIPICPIICICIIFICCIFPPIICCFPC");
        eng.step().unwrap();
        assert_eq!(eng.dna().as_string(), "PICFC");
        assert_eq!(eng.iterations(), 1);
    }

    #[test]
    fn mismatch_keeps_post_parse_sequence() {
        // Pattern is the literal F, but the remaining sequence starts with C.
        let mut eng = engine("PIICIICCFPC");
        eng.step().unwrap();
        assert_eq!(eng.mismatches(), 1);
        assert_eq!(eng.dna().as_string(), "CFPC");
    }

    #[test]
    fn prefix_is_prepended() {
        let eng = RewriteEngine::with_prefix(b"IIP", Seq::from_bytes(b"ICP"));
        assert_eq!(eng.dna().as_string(), "IIPICP");
    }

    #[test]
    fn run_collects_rna_until_halt() {
        // Two inline RNA words and nothing else; the decoder then starves.
        let mut eng = engine("IIIPIPIIICIIIPFFFFFP");
        let rna = eng.run().to_vec();
        assert_eq!(
            rna,
            vec![Rna::new(*b"PIPIIIC"), Rna::new(*b"PFFFFFP")]
        );
        assert_eq!(eng.iterations(), 0);
    }
}
