//! Streaming (online) SOM learning.
//!
//! A streaming model owns its map and consumes one input at a time. There are
//! no epochs; the prototypes are updated and observers notified before
//! [`StreamingSom::learn`] returns.

use crate::error::Result;
use crate::som::SelfOrganizingMap;

/// A self-organizing map that learns from an unbounded stream.
pub trait StreamingSom {
    /// Presents one input vector and updates the map immediately.
    fn learn(&mut self, input: &[f64]) -> Result<()>;

    /// The map being trained.
    fn som(&self) -> &SelfOrganizingMap;

    /// Mutable access to the map, e.g. to register observers.
    fn som_mut(&mut self) -> &mut SelfOrganizingMap;

    /// Number of inputs learned so far.
    fn iterations(&self) -> u64;

    /// Presents a sequence of inputs in order, stopping at the first error.
    fn learn_batch<'a, I>(&mut self, inputs: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a [f64]>,
        Self: Sized,
    {
        for input in inputs {
            self.learn(input)?;
        }
        Ok(())
    }
}
