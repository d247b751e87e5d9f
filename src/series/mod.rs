//! Time-indexed scalar streams and running-mean filters.
//!
//! Per-sample statistics such as quantization error are noisy; these filters
//! smooth them before they drive decisions or get reported.

mod running_mean;
mod time_series;

pub use running_mean::RunningMean;
pub use time_series::TimeSeries;
