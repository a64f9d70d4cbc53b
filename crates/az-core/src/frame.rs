use crate::units::{format_rate, format_size};
use std::fmt;

pub const FILLED_CELL: char = '█';
pub const EMPTY_CELL: char = '░';

/// One rendered state of a transfer: everything a surface needs to draw
/// the progress line.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressFrame {
    pub current: u64,
    pub total: u64,
    pub width: usize,
    pub filled: usize,
    /// `None` when the total is unknown.
    pub percentage: Option<f64>,
    pub rate: f64,
}

impl ProgressFrame {
    pub fn compute(current: u64, total: u64, width: usize, rate: f64) -> Self {
        let (filled, percentage) = if total == 0 {
            (0, None)
        } else {
            // u128 keeps width * current from overflowing on huge transfers
            let cells = (width as u128 * current as u128) / total as u128;
            let filled = cells.min(width as u128) as usize;
            let pct = current as f64 * 100.0 / total as f64;
            (filled, Some(pct))
        };

        Self {
            current,
            total,
            width,
            filled,
            percentage,
            rate,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.current >= self.total
    }

    pub fn filled_cells(&self) -> String {
        std::iter::repeat(FILLED_CELL).take(self.filled).collect()
    }

    pub fn empty_cells(&self) -> String {
        std::iter::repeat(EMPTY_CELL)
            .take(self.width.saturating_sub(self.filled))
            .collect()
    }

    pub fn percentage_text(&self) -> String {
        match self.percentage {
            Some(pct) => format!("{:.1}%", pct),
            None => "--.-%".to_string(),
        }
    }

    pub fn rate_text(&self) -> String {
        format!("({})", format_rate(self.rate))
    }

    pub fn sizes_text(&self) -> String {
        let total = if self.total == 0 {
            "?".to_string()
        } else {
            format_size(self.total)
        };
        format!("[{}/{}]", format_size(self.current), total)
    }
}

impl fmt::Display for ProgressFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}{}] {} {} {}",
            self.filled_cells(),
            self.empty_cells(),
            self.percentage_text(),
            self.rate_text(),
            self.sizes_text()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_done() {
        let frame = ProgressFrame::compute(50, 200, 50, 0.0);
        assert_eq!(frame.percentage_text(), "25.0%");
        assert_eq!(frame.filled, 12);
        assert_eq!(frame.filled_cells().chars().count(), 12);
        assert_eq!(frame.empty_cells().chars().count(), 38);
    }

    #[test]
    fn overshoot_clamps_bar_but_not_percentage() {
        let frame = ProgressFrame::compute(300, 200, 50, 0.0);
        assert_eq!(frame.filled, 50);
        assert_eq!(frame.empty_cells(), "");
        assert_eq!(frame.percentage_text(), "150.0%");
        assert!(frame.is_complete());
    }

    #[test]
    fn unknown_total_uses_sentinel() {
        let frame = ProgressFrame::compute(4096, 0, 50, 0.0);
        assert_eq!(frame.filled, 0);
        assert_eq!(frame.percentage, None);
        assert_eq!(frame.percentage_text(), "--.-%");
        assert_eq!(frame.sizes_text(), "[4.00KB/?]");
        assert!(!frame.is_complete());
    }

    #[test]
    fn display_layout() {
        let frame = ProgressFrame::compute(512, 1024, 4, 2048.0);
        assert_eq!(frame.to_string(), "[██░░] 50.0% (2.00 KB/s) [512B/1.00KB]");
    }

    #[test]
    fn huge_transfers_do_not_overflow() {
        let frame = ProgressFrame::compute(u64::MAX / 2, u64::MAX, 50, 0.0);
        assert_eq!(frame.filled, 24);
    }
}
