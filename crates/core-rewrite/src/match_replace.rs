//! Pattern matching against the live sequence and template splicing.

use std::collections::VecDeque;

use core_dna::Seq;

use crate::parse::{PatItem, TmplItem};

/// A successful match: how many bases the pattern consumed and the capture
/// groups it recorded, in close order.
pub(crate) struct MatchOutcome {
    pub consumed: usize,
    pub captures: Vec<Seq>,
}

/// Walk the pattern over `dna`. `None` means the iteration is abandoned
/// and the sequence stays as parsed; this is control flow, not a fault.
pub(crate) fn match_pattern(pat: &[PatItem], dna: &Seq) -> Option<MatchOutcome> {
    let mut i = 0usize;
    let mut captures: Vec<Seq> = Vec::new();
    let mut starts: Vec<usize> = Vec::new();
    for item in pat {
        match item {
            PatItem::Base(b) => {
                // get() sentinels past the end, so literals never match there.
                if dna.get(i) == *b {
                    i += 1;
                } else {
                    return None;
                }
            }
            PatItem::Skip(n) => {
                i = i.checked_add(*n)?;
                if i > dna.len() {
                    return None;
                }
            }
            PatItem::Search(needle) => {
                i += find_postfix(&dna.skip(i), needle)?;
            }
            PatItem::Open => starts.push(i),
            PatItem::Close => {
                let start = starts.pop().expect("groups balanced by the decoder");
                captures.push(dna.substring(start, i));
            }
        }
    }
    Some(MatchOutcome {
        consumed: i,
        captures,
    })
}

/// First occurrence of `needle` at or after the start of `dna`, reported
/// as the offset just past the match. An empty needle matches immediately.
pub fn find_postfix(dna: &Seq, needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    if needle.len() > dna.len() {
        return None;
    }
    // Needles are short (tens of bases), so a sliding window over one
    // sequential scan beats repeated random-access probing of the tree.
    let mut window: VecDeque<u8> = VecDeque::with_capacity(needle.len());
    for (idx, byte) in dna.bytes().enumerate() {
        if window.len() == needle.len() {
            window.pop_front();
        }
        window.push_back(byte);
        if window.len() == needle.len() && window.iter().eq(needle.iter()) {
            return Some(idx + 1);
        }
    }
    None
}

/// Materialize the template against the captures and splice it onto the
/// front of `tail`.
pub(crate) fn replace(tmpl: &[TmplItem], captures: &[Seq], tail: &Seq) -> Seq {
    let mut parts: Vec<Seq> = Vec::new();
    let mut builder: Vec<u8> = Vec::new();
    for item in tmpl {
        match item {
            TmplItem::Base(b) => builder.push(*b),
            TmplItem::Len(group) => {
                let len = captures.get(*group).map_or(0, Seq::len);
                asnat_into(len, &mut builder);
            }
            TmplItem::Ref { group, level } => {
                // A dangling reference contributes nothing.
                if let Some(cap) = captures.get(*group) {
                    flush(&mut builder, &mut parts);
                    parts.push(protect(*level, cap));
                }
            }
        }
    }
    flush(&mut builder, &mut parts);
    let mut out = tail.clone();
    for part in parts.iter().rev() {
        out = part.append(&out);
    }
    out
}

fn flush(builder: &mut Vec<u8>, parts: &mut Vec<Seq>) {
    if !builder.is_empty() {
        parts.push(Seq::from_bytes(builder));
        builder.clear();
    }
}

/// Little-endian nat encoding of `n`, always `P`-terminated.
pub fn asnat_into(mut n: usize, out: &mut Vec<u8>) {
    while n > 0 {
        out.push(if n % 2 == 0 { b'I' } else { b'C' });
        n /= 2;
    }
    out.push(b'P');
}

pub fn asnat(n: usize) -> Vec<u8> {
    let mut out = Vec::new();
    asnat_into(n, &mut out);
    out
}

/// Escape `seq` by quoting it `level` times. Level 0 hands the capture
/// back unchanged, structure and all; that is the common case and the
/// reason replacement stays cheap on multi-megabase captures.
pub fn protect(level: usize, seq: &Seq) -> Seq {
    let mut out = seq.clone();
    for _ in 0..level {
        out = quote(&out);
    }
    out
}

/// One escaping step: `I→C`, `C→F`, `F→P`, `P→IC`. Streams the input
/// left to right into a single fresh leaf.
pub fn quote(seq: &Seq) -> Seq {
    let mut out = Vec::with_capacity(seq.len() + seq.len() / 4);
    for byte in seq.bytes() {
        match byte {
            b'I' => out.push(b'C'),
            b'C' => out.push(b'F'),
            b'F' => out.push(b'P'),
            b'P' => out.extend_from_slice(b"IC"),
            other => unreachable!("corrupt base {other:#04x} in sequence"),
        }
    }
    Seq::from_bytes(&out)
}
