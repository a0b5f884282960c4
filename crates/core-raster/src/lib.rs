//! Drawing interpreter for the RNA command stream.
//!
//! Commands are seven-base words drawn from a closed set; anything else
//! in the stream is ignored. State is a bucket of color tokens, a
//! position, a heading, a mark, and a stack of up to ten canvases whose
//! top is the active drawing surface.

use core_dna::Rna;
use tracing::{debug, info, trace};

pub mod bitmap;
pub mod bucket;
pub mod draw;

pub use bitmap::{Bitmap, Dir, HEIGHT, MAX_BITMAPS, Pixel, WIDTH};
pub use bucket::Bucket;

/// Why the interpreter stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Halt {
    /// The stream was consumed to the end.
    Completed,
    /// A clip command cut the run short; the top canvas at that moment
    /// is the final image.
    Clipped,
}

enum Step {
    Continue,
    Clip,
}

/// The drawing interpreter's full state.
pub struct RasterEngine {
    bucket: Bucket,
    dir: Dir,
    pos: (usize, usize),
    mark: (usize, usize),
    bitmaps: Vec<Bitmap>,
    commands: u64,
    ignored: u64,
}

impl Default for RasterEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterEngine {
    pub fn new() -> RasterEngine {
        RasterEngine {
            bucket: Bucket::new(),
            dir: Dir::East,
            pos: (0, 0),
            mark: (0, 0),
            bitmaps: vec![Bitmap::new()],
            commands: 0,
            ignored: 0,
        }
    }

    pub fn position(&self) -> (usize, usize) {
        self.pos
    }

    pub fn direction(&self) -> Dir {
        self.dir
    }

    pub fn mark(&self) -> (usize, usize) {
        self.mark
    }

    pub fn depth(&self) -> usize {
        self.bitmaps.len()
    }

    pub fn ignored(&self) -> u64 {
        self.ignored
    }

    /// Consume the whole stream in order, stopping early on clip.
    pub fn run(&mut self, rna: &[Rna]) -> Halt {
        for word in rna {
            if let Step::Clip = self.apply(word) {
                info!(
                    target: "raster.run",
                    commands = self.commands,
                    ignored = self.ignored,
                    "clip_halt"
                );
                return Halt::Clipped;
            }
        }
        info!(
            target: "raster.run",
            commands = self.commands,
            ignored = self.ignored,
            depth = self.bitmaps.len(),
            "stream_complete"
        );
        Halt::Completed
    }

    /// The finished image: the top canvas.
    pub fn into_bitmap(mut self) -> Bitmap {
        self.bitmaps.pop().expect("canvas stack is never empty")
    }

    fn apply(&mut self, rna: &Rna) -> Step {
        self.commands += 1;
        match rna.as_bytes() {
            b"PIPIIIC" => self.bucket.add_color(0, 0, 0),
            b"PIPIIIP" => self.bucket.add_color(255, 0, 0),
            b"PIPIICC" => self.bucket.add_color(0, 255, 0),
            b"PIPIICF" => self.bucket.add_color(255, 255, 0),
            b"PIPIICP" => self.bucket.add_color(0, 0, 255),
            b"PIPIIFC" => self.bucket.add_color(255, 0, 255),
            b"PIPIIFF" => self.bucket.add_color(0, 255, 255),
            b"PIPIIPC" => self.bucket.add_color(255, 255, 255),
            b"PIPIIPF" => self.bucket.add_alpha(0),
            b"PIPIIPP" => self.bucket.add_alpha(255),
            b"PIIPICP" => self.bucket.clear(),
            b"PIIIIIP" => self.pos = self.dir.step(self.pos),
            b"PCCCCCP" => self.dir = self.dir.turn_ccw(),
            b"PFFFFFP" => self.dir = self.dir.turn_cw(),
            b"PCCIFFP" => self.mark = self.pos,
            b"PFFICCP" => {
                let px = self.bucket.current_pixel();
                let (pos, mark) = (self.pos, self.mark);
                draw::line(self.top(), pos, mark, px);
            }
            b"PIIPIIP" => {
                let px = self.bucket.current_pixel();
                let pos = self.pos;
                draw::flood(self.top(), pos, px);
            }
            b"PCCPFFP" => {
                if self.bitmaps.len() < MAX_BITMAPS {
                    self.bitmaps.push(Bitmap::new());
                    debug!(target: "raster.cmd", depth = self.bitmaps.len(), "bitmap_pushed");
                }
            }
            b"PFFPCCP" => {
                if self.bitmaps.len() >= 2 {
                    let top = self.bitmaps.pop().expect("depth checked");
                    self.bitmaps
                        .last_mut()
                        .expect("depth checked")
                        .compose_under(&top);
                    debug!(target: "raster.cmd", depth = self.bitmaps.len(), "bitmaps_composed");
                }
            }
            b"PFFICCF" => return Step::Clip,
            _ => {
                self.ignored += 1;
                trace!(target: "raster.cmd", word = %rna, "unknown_word_ignored");
            }
        }
        Step::Continue
    }

    fn top(&mut self) -> &mut Bitmap {
        self.bitmaps.last_mut().expect("canvas stack is never empty")
    }
}
