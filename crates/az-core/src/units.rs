//! Human readable byte counts and transfer rates.

pub const KB: u64 = 1024;
pub const MB: u64 = 1024 * KB;
pub const GB: u64 = 1024 * MB;

/// Formats a byte count with the largest unit whose value is at least 1.
///
/// Plain bytes carry no decimals, every other unit carries two
/// (`1023B`, `1.00KB`, `1.50MB`).
pub fn format_size(bytes: u64) -> String {
    match bytes {
        b if b >= GB => format!("{:.2}GB", b as f64 / GB as f64),
        b if b >= MB => format!("{:.2}MB", b as f64 / MB as f64),
        b if b >= KB => format!("{:.2}KB", b as f64 / KB as f64),
        b => format!("{}B", b),
    }
}

/// Formats a bytes-per-second rate. Units switch strictly above 1 KiB/s and 1 MiB/s.
pub fn format_rate(bytes_per_sec: f64) -> String {
    let rate = if bytes_per_sec.is_finite() {
        bytes_per_sec.max(0.0)
    } else {
        0.0
    };

    if rate > MB as f64 {
        format!("{:.2} MB/s", rate / MB as f64)
    } else if rate > KB as f64 {
        format!("{:.2} KB/s", rate / KB as f64)
    } else {
        format!("{:.0} B/s", rate)
    }
}
