//! Progress tracking for chunked byte transfers.

pub mod clock;
pub mod frame;
pub mod surface;
pub mod tracker;
pub mod units;

pub use clock::{Clock, ManualClock, SystemClock};
pub use frame::ProgressFrame;
pub use surface::{CaptureSurface, DisplaySurface, NullSurface, WriterSurface};
pub use tracker::{RateEstimator, TransferTracker, BAR_WIDTH, SAMPLE_INTERVAL};
pub use units::{format_rate, format_size};
