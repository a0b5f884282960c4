//! Prefix-code decoder for patterns and templates.
//!
//! The encoding is self-describing: each iteration of the rewriter decodes
//! one pattern and one template off the front of the live sequence. Seven-
//! base RNA words may appear inline anywhere in either production and are
//! emitted as a side effect of decoding.

use std::fmt;

use core_dna::{Cursor, Rna};
use thiserror::Error;

/// Decoding ran off the end of the sequence. This is the engine's normal
/// halting condition, not a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unexpected end of input")]
    EndOfInput,
}

/// One step of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatItem {
    /// Match this base literally.
    Base(u8),
    /// Advance the match offset by `n`.
    Skip(usize),
    /// Find the next occurrence of the literal base string and skip past it.
    Search(Vec<u8>),
    /// Start a capture group.
    Open,
    /// End the innermost open capture group.
    Close,
}

/// One step of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TmplItem {
    /// Emit this base literally.
    Base(u8),
    /// Splice in capture `group`, escaped `level` times.
    Ref { group: usize, level: usize },
    /// Emit the length of capture `group` as a nat encoding.
    Len(usize),
}

/// Decode one pattern into `pat`, emitting inline RNA into `rna`.
///
/// The buffers are caller-owned so a driving loop can reuse them across
/// millions of iterations; `pat` is cleared here, `rna` only appended to.
pub fn pattern(
    cur: &mut Cursor,
    pat: &mut Vec<PatItem>,
    rna: &mut Vec<Rna>,
) -> Result<(), ParseError> {
    pat.clear();
    let mut level = 0usize;
    loop {
        match cur.next() {
            b'C' => pat.push(PatItem::Base(b'I')),
            b'F' => pat.push(PatItem::Base(b'C')),
            b'P' => pat.push(PatItem::Base(b'F')),
            b'I' => match cur.next() {
                b'C' => pat.push(PatItem::Base(b'P')),
                b'P' => pat.push(PatItem::Skip(nat(cur)?)),
                b'F' => {
                    // One base after the IF marker is discarded unread.
                    cur.next();
                    pat.push(PatItem::Search(consts(cur)));
                }
                b'I' => match cur.next() {
                    b'P' => {
                        level += 1;
                        pat.push(PatItem::Open);
                    }
                    b'C' | b'F' => {
                        if level == 0 {
                            return Ok(());
                        }
                        level -= 1;
                        pat.push(PatItem::Close);
                    }
                    b'I' => rna.push(rna_word(cur)),
                    _ => return Err(ParseError::EndOfInput),
                },
                _ => return Err(ParseError::EndOfInput),
            },
            _ => return Err(ParseError::EndOfInput),
        }
    }
}

/// Decode one template into `tmpl`, emitting inline RNA into `rna`.
pub fn template(
    cur: &mut Cursor,
    tmpl: &mut Vec<TmplItem>,
    rna: &mut Vec<Rna>,
) -> Result<(), ParseError> {
    tmpl.clear();
    loop {
        match cur.next() {
            b'C' => tmpl.push(TmplItem::Base(b'I')),
            b'F' => tmpl.push(TmplItem::Base(b'C')),
            b'P' => tmpl.push(TmplItem::Base(b'F')),
            b'I' => match cur.next() {
                b'C' => tmpl.push(TmplItem::Base(b'P')),
                b'F' | b'P' => {
                    let level = nat(cur)?;
                    let group = nat(cur)?;
                    tmpl.push(TmplItem::Ref { group, level });
                }
                b'I' => match cur.next() {
                    b'C' | b'F' => return Ok(()),
                    b'P' => tmpl.push(TmplItem::Len(nat(cur)?)),
                    b'I' => rna.push(rna_word(cur)),
                    _ => return Err(ParseError::EndOfInput),
                },
                _ => return Err(ParseError::EndOfInput),
            },
            _ => return Err(ParseError::EndOfInput),
        }
    }
}

/// Little-endian natural number, one bit per base, terminated by `P`.
/// `C` is a set bit, `I` and `F` are clear bits.
pub fn nat(cur: &mut Cursor) -> Result<usize, ParseError> {
    let mut value = 0usize;
    let mut bit = 0u32;
    loop {
        match cur.next() {
            b'P' => return Ok(value),
            b'C' => {
                // Encodings wider than the machine word never occur in
                // well-formed input; excess set bits are unrepresentable.
                if bit < usize::BITS {
                    value |= 1usize << bit;
                }
            }
            b'I' | b'F' => {}
            _ => return Err(ParseError::EndOfInput),
        }
        bit += 1;
    }
}

/// Quoted base string: each base maps down one alphabet step
/// (`C→I`, `F→C`, `P→F`, `IC→P`). Stops at an `I` not followed by `C`,
/// leaving that `I` unconsumed, or at end of input.
pub fn consts(cur: &mut Cursor) -> Vec<u8> {
    let mut out = Vec::new();
    loop {
        match cur.peek() {
            b'C' => {
                cur.next();
                out.push(b'I');
            }
            b'F' => {
                cur.next();
                out.push(b'C');
            }
            b'P' => {
                cur.next();
                out.push(b'F');
            }
            b'I' => {
                cur.next();
                if cur.peek() == b'C' {
                    cur.next();
                    out.push(b'P');
                } else {
                    cur.push_back(b'I');
                    return out;
                }
            }
            _ => return out,
        }
    }
}

/// The seven bases following an `III` marker. Missing trailing bases read
/// as 0 and produce a word no drawing command matches.
fn rna_word(cur: &mut Cursor) -> Rna {
    let mut word = [0u8; 7];
    for slot in &mut word {
        *slot = cur.next();
    }
    Rna::new(word)
}

impl fmt::Display for PatItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatItem::Base(b) => write!(f, "{}", *b as char),
            PatItem::Skip(n) => write!(f, "!{n}"),
            PatItem::Search(s) => write!(f, "?{:?}", String::from_utf8_lossy(s)),
            PatItem::Open => f.write_str("("),
            PatItem::Close => f.write_str(")"),
        }
    }
}

impl fmt::Display for TmplItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TmplItem::Base(b) => write!(f, "{}", *b as char),
            TmplItem::Ref { group, level: 0 } => write!(f, "\\{group}"),
            TmplItem::Ref { group, level } => write!(f, "\\{group}({level})"),
            TmplItem::Len(n) => write!(f, "|{n}|"),
        }
    }
}

/// Renders a production the way its items read, for trace output.
pub struct ItemsDisplay<'a, T>(pub &'a [T]);

impl<T: fmt::Display> fmt::Display for ItemsDisplay<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in self.0 {
            write!(f, "{item}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_dna::Seq;

    fn cursor(s: &str) -> Cursor {
        Cursor::new(&Seq::from_bytes(s.as_bytes()))
    }

    fn parse_pattern(s: &str) -> (Vec<PatItem>, Vec<Rna>, Cursor) {
        let mut cur = cursor(s);
        let mut pat = Vec::new();
        let mut rna = Vec::new();
        pattern(&mut cur, &mut pat, &mut rna).unwrap();
        (pat, rna, cur)
    }

    #[test]
    fn single_literal_pattern() {
        let (pat, rna, mut cur) = parse_pattern("CIIC");
        assert_eq!(pat, vec![PatItem::Base(b'I')]);
        assert!(rna.is_empty());
        assert_eq!(cur.next(), 0);
    }

    #[test]
    fn group_skip_close_literal_pattern() {
        let (pat, _, _) = parse_pattern("IIPIPICPIICICIIF");
        assert_eq!(
            pat,
            vec![
                PatItem::Open,
                PatItem::Skip(2),
                PatItem::Close,
                PatItem::Base(b'P'),
            ]
        );
    }

    #[test]
    fn pattern_emits_inline_rna() {
        // III immediately followed by a 7-base word, then a terminator.
        let (pat, rna, _) = parse_pattern("IIIPIPIIICIIC");
        assert!(pat.is_empty());
        assert_eq!(rna, vec![Rna::new(*b"PIPIIIC")]);
    }

    #[test]
    fn truncated_pattern_is_end_of_input() {
        let mut cur = cursor("IIP");
        let mut pat = Vec::new();
        let mut rna = Vec::new();
        assert_eq!(
            pattern(&mut cur, &mut pat, &mut rna),
            Err(ParseError::EndOfInput)
        );
    }

    #[test]
    fn nat_reads_little_endian_bits() {
        assert_eq!(nat(&mut cursor("P")).unwrap(), 0);
        assert_eq!(nat(&mut cursor("ICP")).unwrap(), 2);
        assert_eq!(nat(&mut cursor("CIP")).unwrap(), 1);
        assert_eq!(nat(&mut cursor("CICP")).unwrap(), 5);
        assert_eq!(nat(&mut cursor("IC")), Err(ParseError::EndOfInput));
    }

    #[test]
    fn consts_unquotes_and_puts_back_the_stopper() {
        let mut cur = cursor("CFICPII");
        assert_eq!(consts(&mut cur), b"ICPF");
        assert_eq!(cur.rest().as_string(), "II");
    }

    #[test]
    fn consts_stops_at_end_of_input() {
        let mut cur = cursor("CF");
        assert_eq!(consts(&mut cur), b"IC");
        assert_eq!(cur.rest().as_string(), "");
    }

    #[test]
    fn template_with_reference_and_length() {
        // P → F literal, IF P P → ref 0 level 0, IIP CP → len 1, IIC ends.
        let mut cur = cursor("PIFPPIIPCPIIC");
        let mut tmpl = Vec::new();
        let mut rna = Vec::new();
        template(&mut cur, &mut tmpl, &mut rna).unwrap();
        assert_eq!(
            tmpl,
            vec![
                TmplItem::Base(b'F'),
                TmplItem::Ref { group: 0, level: 0 },
                TmplItem::Len(1),
            ]
        );
    }

    #[test]
    fn display_renders_productions() {
        let (pat, _, _) = parse_pattern("IIPIPICPIICICIIF");
        assert_eq!(ItemsDisplay(&pat).to_string(), "(!2)P");
        let tmpl = vec![
            TmplItem::Base(b'P'),
            TmplItem::Ref { group: 0, level: 0 },
            TmplItem::Ref { group: 1, level: 2 },
            TmplItem::Len(3),
        ];
        assert_eq!(ItemsDisplay(&tmpl).to_string(), "P\\0\\1(2)|3|");
    }
}
