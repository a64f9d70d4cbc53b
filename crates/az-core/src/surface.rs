//! Places a progress frame can be drawn on.
//!
//! The tracker never talks to the terminal directly; it hands every frame to a
//! [`DisplaySurface`]. Real runs use a terminal-backed surface, tests capture
//! frames in memory.

use crate::frame::ProgressFrame;
use std::io::Write;

/// Carriage return followed by "erase to end of line".
pub const CLEAR_LINE: &str = "\r\x1b[K";

pub trait DisplaySurface {
    /// Replaces whatever progress line is currently shown with `frame`.
    fn redraw(&mut self, frame: &ProgressFrame);

    /// Called once when the transfer loop ends.
    fn finish(&mut self) {}
}

impl<S: DisplaySurface + ?Sized> DisplaySurface for &mut S {
    fn redraw(&mut self, frame: &ProgressFrame) {
        (**self).redraw(frame)
    }

    fn finish(&mut self) {
        (**self).finish()
    }
}

impl<S: DisplaySurface + ?Sized> DisplaySurface for Box<S> {
    fn redraw(&mut self, frame: &ProgressFrame) {
        (**self).redraw(frame)
    }

    fn finish(&mut self) {
        (**self).finish()
    }
}

/// Plain text surface over any writer. Write errors are swallowed; a broken
/// terminal must not abort a download.
pub struct WriterSurface<W: Write> {
    out: W,
}

impl<W: Write> WriterSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DisplaySurface for WriterSurface<W> {
    fn redraw(&mut self, frame: &ProgressFrame) {
        let _ = write!(self.out, "{}{}", CLEAR_LINE, frame);
        let _ = self.out.flush();
    }

    fn finish(&mut self) {
        let _ = writeln!(self.out);
        let _ = self.out.flush();
    }
}

/// Keeps every frame it is given.
#[derive(Debug, Default)]
pub struct CaptureSurface {
    pub frames: Vec<ProgressFrame>,
    pub finished: bool,
}

impl CaptureSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&ProgressFrame> {
        self.frames.last()
    }

    pub fn lines(&self) -> Vec<String> {
        self.frames.iter().map(|f| f.to_string()).collect()
    }
}

impl DisplaySurface for CaptureSurface {
    fn redraw(&mut self, frame: &ProgressFrame) {
        self.frames.push(frame.clone());
    }

    fn finish(&mut self) {
        self.finished = true;
    }
}

/// Draws nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSurface;

impl DisplaySurface for NullSurface {
    fn redraw(&mut self, _frame: &ProgressFrame) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_surface_rewrites_line_in_place() {
        let mut surface = WriterSurface::new(Vec::new());
        surface.redraw(&ProgressFrame::compute(0, 10, 2, 0.0));
        surface.redraw(&ProgressFrame::compute(10, 10, 2, 0.0));
        surface.finish();

        let text = String::from_utf8(surface.into_inner()).unwrap();
        assert_eq!(text.matches(CLEAR_LINE).count(), 2);
        assert!(text.starts_with(CLEAR_LINE));
        assert!(text.ends_with("[10B/10B]\n"));
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn capture_surface_records_frames() {
        fn draw<S: DisplaySurface>(mut surface: S) {
            surface.redraw(&ProgressFrame::compute(1, 2, 2, 0.0));
            surface.finish();
        }

        let mut surface = CaptureSurface::new();
        draw(&mut surface);
        assert_eq!(surface.frames.len(), 1);
        assert!(surface.finished);
        assert_eq!(surface.lines()[0], "[█░] 50.0% (0 B/s) [1B/2B]");
    }
}
