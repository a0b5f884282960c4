//! The color bucket: an ordered pile of RGB and transparency tokens
//! averaged into the pixel that drawing operations write.

use crate::bitmap::Pixel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Color { r: u8, g: u8, b: u8 },
    Alpha(u8),
}

/// Accumulates tokens and computes the current pixel on demand. Drawing
/// reads the pixel once per line or fill, but programs repaint with the
/// same bucket for long stretches, so the computed value is cached until
/// the bucket changes.
#[derive(Debug, Default)]
pub struct Bucket {
    tokens: Vec<Token>,
    current: Option<Pixel>,
}

impl Bucket {
    pub fn new() -> Bucket {
        Bucket::default()
    }

    pub fn add_color(&mut self, r: u8, g: u8, b: u8) {
        self.tokens.push(Token::Color { r, g, b });
        self.current = None;
    }

    pub fn add_alpha(&mut self, a: u8) {
        self.tokens.push(Token::Alpha(a));
        self.current = None;
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
        self.current = None;
    }

    /// Component-wise truncating average of the color tokens, multiplied
    /// through by the average transparency. No colors average to black;
    /// no transparencies average to opaque.
    pub fn current_pixel(&mut self) -> Pixel {
        if let Some(px) = self.current {
            return px;
        }
        let mut colors = 0u32;
        let (mut r_sum, mut g_sum, mut b_sum) = (0u32, 0u32, 0u32);
        let mut alphas = 0u32;
        let mut a_sum = 0u32;
        for token in &self.tokens {
            match *token {
                Token::Color { r, g, b } => {
                    colors += 1;
                    r_sum += u32::from(r);
                    g_sum += u32::from(g);
                    b_sum += u32::from(b);
                }
                Token::Alpha(a) => {
                    alphas += 1;
                    a_sum += u32::from(a);
                }
            }
        }
        let r = if colors > 0 { r_sum / colors } else { 0 };
        let g = if colors > 0 { g_sum / colors } else { 0 };
        let b = if colors > 0 { b_sum / colors } else { 0 };
        let a = if alphas > 0 { a_sum / alphas } else { 255 };
        let px = Pixel::new(
            (r * a / 255) as u8,
            (g * a / 255) as u8,
            (b * a / 255) as u8,
            a as u8,
        );
        self.current = Some(px);
        px
    }
}
