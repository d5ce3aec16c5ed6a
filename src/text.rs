//! Font measurement for HUD text
//!
//! Rasterisation is the host's job; the game only needs string extents to centre
//! the score and the start prompt.

use std::cell::RefCell;
use std::collections::HashMap;

use glam::IVec2;

/// Metrics of a font face at a fixed pixel size
pub trait FontFace {
    /// Horizontal advance of a glyph (pixels)
    fn glyph_advance(&self, c: char) -> f64;

    /// Kerning adjustment between two consecutive glyphs (pixels)
    fn kern(&self, _prev: char, _next: char) -> f64 {
        0.0
    }

    /// Line height (pixels)
    fn height(&self) -> f64;

    /// Distance below the baseline (pixels)
    fn descent(&self) -> f64;
}

/// Monospace face with the metrics of an 8x8 arcade bitmap font
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcadeFace {
    size: f64,
}

impl ArcadeFace {
    pub fn new(size: f64) -> Self {
        Self { size }
    }
}

impl FontFace for ArcadeFace {
    fn glyph_advance(&self, _c: char) -> f64 {
        self.size
    }

    fn height(&self) -> f64 {
        self.size
    }

    fn descent(&self) -> f64 {
        self.size / 8.0
    }
}

/// Wraps a face and remembers glyph advances after the first lookup
#[derive(Debug)]
pub struct CachedFace<F> {
    face: F,
    advances: RefCell<HashMap<char, f64>>,
}

impl<F: FontFace> CachedFace<F> {
    pub fn new(face: F) -> Self {
        Self {
            face,
            advances: RefCell::new(HashMap::new()),
        }
    }

    /// Number of distinct glyphs measured so far
    pub fn cached_glyphs(&self) -> usize {
        self.advances.borrow().len()
    }
}

impl<F: FontFace> FontFace for CachedFace<F> {
    fn glyph_advance(&self, c: char) -> f64 {
        *self
            .advances
            .borrow_mut()
            .entry(c)
            .or_insert_with(|| self.face.glyph_advance(c))
    }

    fn kern(&self, prev: char, next: char) -> f64 {
        self.face.kern(prev, next)
    }

    fn height(&self) -> f64 {
        self.face.height()
    }

    fn descent(&self) -> f64 {
        self.face.descent()
    }
}

/// Pixel extent of `text`, rounded up. Newlines start a new line; width is the
/// widest line, height covers every line plus the descent of the last.
pub fn measure_string(text: &str, face: &impl FontFace) -> IVec2 {
    let line_height = face.height();
    let mut width: f64 = 0.0;
    let mut height: f64 = 0.0;
    let mut x = 0.0;
    let mut y = 0.0;
    let mut prev: Option<char> = None;

    for c in text.chars() {
        if let Some(p) = prev {
            x += face.kern(p, c);
        }
        if c == '\n' {
            x = 0.0;
            y += line_height;
            prev = None;
            continue;
        }

        x += face.glyph_advance(c);
        width = width.max(x);
        height = height.max(y + line_height);
        prev = Some(c);
    }

    IVec2::new(
        width.ceil() as i32,
        (height + face.descent()).ceil() as i32,
    )
}

/// Baseline origin (left end of the baseline) for `text` centred on a window:
/// the window centre minus half the measured size. Glyphs rise above the
/// returned y, so the text sits slightly above true centre.
pub fn center_text(text: &str, face: &impl FontFace, window_width: i32, window_height: i32) -> IVec2 {
    let size = measure_string(text, face);
    IVec2::new(
        window_width / 2 - size.x / 2,
        window_height / 2 - size.y / 2,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Proportional face with kerning on "AV"
    struct TestFace;

    impl FontFace for TestFace {
        fn glyph_advance(&self, c: char) -> f64 {
            if c == 'i' { 3.5 } else { 10.0 }
        }

        fn kern(&self, prev: char, next: char) -> f64 {
            if prev == 'A' && next == 'V' { -2.0 } else { 0.0 }
        }

        fn height(&self) -> f64 {
            12.0
        }

        fn descent(&self) -> f64 {
            2.5
        }
    }

    #[test]
    fn test_measure_single_line() {
        let size = measure_string("0 - 0", &ArcadeFace::new(32.0));
        assert_eq!(size, IVec2::new(160, 36));
    }

    #[test]
    fn test_measure_rounds_up_and_kerns() {
        assert_eq!(measure_string("ii", &TestFace), IVec2::new(7, 15));
        assert_eq!(measure_string("AV", &TestFace), IVec2::new(18, 15));
    }

    #[test]
    fn test_measure_multiline_uses_widest_line() {
        let size = measure_string("AAA\nA\nAAAA", &TestFace);
        assert_eq!(size, IVec2::new(40, 39));
        // A trailing newline adds no height until a glyph follows it
        assert_eq!(measure_string("AA\n", &TestFace), IVec2::new(20, 15));
    }

    #[test]
    fn test_measure_empty() {
        assert_eq!(measure_string("", &TestFace), IVec2::new(0, 3));
    }

    #[test]
    fn test_cached_face_measures_each_glyph_once() {
        let face = CachedFace::new(ArcadeFace::new(16.0));
        let size = measure_string("Press to Start", &face);
        assert_eq!(size.x, 14 * 16);
        // P r e s ' ' t o S a
        assert_eq!(face.cached_glyphs(), 9);
    }

    #[test]
    fn test_center_text() {
        let face = ArcadeFace::new(32.0);
        let pos = center_text("0 - 0", &face, 1600, 900);
        // Baseline origin, not the top-left corner of the glyph box
        assert_eq!(pos, IVec2::new(800 - 80, 450 - 18));
    }
}
