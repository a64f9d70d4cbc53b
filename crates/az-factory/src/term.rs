use az_core::surface::CLEAR_LINE;
use az_core::{DisplaySurface, ProgressFrame};
use colored::Colorize;
use std::io::{self, Stdout, Write};

/// Colored progress line on a terminal stream, rewritten in place.
pub struct TermSurface<W: Write = Stdout> {
    out: W,
}

impl TermSurface<Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> TermSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

pub fn colored_frame(frame: &ProgressFrame) -> String {
    format!(
        "{}{}{}{} {} {} {}",
        "[".cyan(),
        frame.filled_cells().green(),
        frame.empty_cells().white(),
        "]".cyan(),
        frame.percentage_text().yellow(),
        frame.rate_text().magenta(),
        frame.sizes_text().blue(),
    )
}

impl<W: Write> DisplaySurface for TermSurface<W> {
    fn redraw(&mut self, frame: &ProgressFrame) {
        let _ = write!(self.out, "{}{}", CLEAR_LINE, colored_frame(frame));
        let _ = self.out.flush();
    }

    fn finish(&mut self) {
        let _ = writeln!(self.out);
        let _ = self.out.flush();
    }
}
