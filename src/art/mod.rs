//! Adaptive-resonance streaming clustering.
//!
//! [`StreamArt2a`] summarizes an unbounded stream into a bounded codebook of
//! [`MicroCategory`] values. [`StreamArt2aDrift`] adds a smoothed fit-quality
//! series on top of it.

mod category;
mod drift;
mod stream_art2a;

pub use category::{CategoryId, MicroCategory};
pub use drift::StreamArt2aDrift;
pub use stream_art2a::{Assignment, StreamArt2a};
