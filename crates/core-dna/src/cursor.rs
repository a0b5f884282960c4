//! Streaming read position over a rope.

use std::rc::Rc;

use crate::rope::{Seq, View};

/// A forward reader over a [`Seq`]. Never mutates the underlying rope;
/// [`Cursor::rest`] materializes the unread suffix as a fresh sequence
/// that replays byte-for-byte what further [`Cursor::next`] calls would
/// have produced.
pub struct Cursor {
    /// Subtrees not yet entered, the next one on top.
    pending: Vec<Seq>,
    /// Backing storage of the current leaf and its unread window.
    data: Rc<[u8]>,
    next: usize,
    end: usize,
    /// LIFO put-back slots. `peek` occupies one; retracting a tentatively
    /// consumed base while a peeked byte is still parked needs the second.
    pushback: [u8; 2],
    pushed: usize,
}

impl Cursor {
    pub fn new(seq: &Seq) -> Cursor {
        let mut cur = Cursor {
            pending: Vec::with_capacity(16),
            data: Rc::from(&[][..]),
            next: 0,
            end: 0,
            pushback: [0; 2],
            pushed: 0,
        };
        cur.descend(seq.clone());
        cur
    }

    /// Walk the left spine of `seq`, parking right children on the stack,
    /// until the leftmost leaf becomes current.
    fn descend(&mut self, mut seq: Seq) {
        loop {
            let left = match seq.view() {
                View::Leaf(data, range) => {
                    self.data = data.clone();
                    self.next = range.start;
                    self.end = range.end;
                    return;
                }
                View::Inner(left, right) => {
                    self.pending.push(right.clone());
                    left.clone()
                }
            };
            seq = left;
        }
    }

    /// The current base, consuming it; `0` once the sequence is exhausted.
    pub fn next(&mut self) -> u8 {
        if self.pushed > 0 {
            self.pushed -= 1;
            return self.pushback[self.pushed];
        }
        loop {
            if self.next < self.end {
                let b = self.data[self.next];
                self.next += 1;
                return b;
            }
            match self.pending.pop() {
                Some(seq) => self.descend(seq),
                None => return 0,
            }
        }
    }

    /// The current base without consuming it.
    pub fn peek(&mut self) -> u8 {
        let b = self.next();
        if b != 0 {
            self.push_back(b);
        }
        b
    }

    /// Return a consumed base to the front of the stream.
    pub fn push_back(&mut self, byte: u8) {
        debug_assert!(self.pushed < self.pushback.len(), "put-back depth exceeded");
        self.pushback[self.pushed] = byte;
        self.pushed += 1;
    }

    /// The unread suffix as a rope: parked put-back bytes, then the rest
    /// of the current leaf, then every pending subtree in stream order.
    pub fn rest(&self) -> Seq {
        let mut out = match self.pushed {
            0 => Seq::empty(),
            n => {
                let mut buf = [0u8; 2];
                for (i, slot) in (0..n).rev().enumerate() {
                    buf[i] = self.pushback[slot];
                }
                Seq::from_bytes(&buf[..n])
            }
        };
        if self.next < self.end {
            out = out.append(&Seq::leaf(self.data.clone(), self.next..self.end));
        }
        for seq in self.pending.iter().rev() {
            out = out.append(seq);
        }
        out
    }
}
