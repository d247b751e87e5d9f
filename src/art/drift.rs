//! Fit-quality monitoring for StreamART2A.
//!
//! Wraps an engine and records, for every input, how far it landed from the
//! codebook as it stood before learning it. The distance is normalized by the
//! manifold size, smoothed by a running mean and appended to a time series
//! indexed by iteration. A rising series signals concept drift. Monitoring
//! never changes clustering decisions.

use crate::art::stream_art2a::{Assignment, StreamArt2a};
use crate::config::StreamArt2aConfig;
use crate::error::Result;
use crate::series::{RunningMean, TimeSeries};

/// StreamART2A engine with a smoothed fit-quality series.
pub struct StreamArt2aDrift {
    engine: StreamArt2a,
    filter: RunningMean,
    series: TimeSeries,
}

impl StreamArt2aDrift {
    /// Creates a monitored engine; the filter window is `config.fit_window`.
    pub fn new(config: StreamArt2aConfig) -> Result<Self> {
        let filter = RunningMean::new(config.fit_window)?;
        Ok(Self {
            engine: StreamArt2a::new(config)?,
            filter,
            series: TimeSeries::new(),
        })
    }

    /// Learns one input and records its fit.
    ///
    /// An input meeting an empty codebook scores 1.0.
    pub fn learn(&mut self, input: &[f64]) -> Result<Assignment> {
        let time = self.engine.iteration();
        let fit = match self.engine.nearest_distance(input)? {
            Some(distance) => distance / self.engine.manifold_size(),
            None => 1.0,
        };

        let assignment = self.engine.learn(input)?;
        let smoothed = self.filter.add(fit);
        self.series.push(time, smoothed)?;
        Ok(assignment)
    }

    /// The wrapped engine.
    pub fn engine(&self) -> &StreamArt2a {
        &self.engine
    }

    /// Smoothed fit per iteration.
    pub fn fit_series(&self) -> &TimeSeries {
        &self.series
    }

    /// Latest smoothed fit, `None` before the first input.
    pub fn current_fit(&self) -> Option<f64> {
        self.filter.mean()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> StreamArt2aConfig {
        StreamArt2aConfig {
            dimensionality: 1,
            fit_window: 4,
            ..Default::default()
        }
    }

    #[test]
    fn test_first_input_scores_one() {
        let mut monitored = StreamArt2aDrift::new(config()).unwrap();
        assert_eq!(monitored.current_fit(), None);

        monitored.learn(&[0.5]).unwrap();
        assert_eq!(monitored.current_fit(), Some(1.0));
        assert_eq!(monitored.fit_series().points(), &[(0, 1.0)]);
    }

    #[test]
    fn test_stable_stream_settles() {
        let mut monitored = StreamArt2aDrift::new(config()).unwrap();
        for _ in 0..10 {
            monitored.learn(&[0.5]).unwrap();
        }
        assert_eq!(monitored.current_fit(), Some(0.0));
        assert_eq!(monitored.fit_series().len(), 10);
        assert_eq!(monitored.engine().len(), 1);
    }

    #[test]
    fn test_shift_raises_fit() {
        let mut monitored = StreamArt2aDrift::new(config()).unwrap();
        for _ in 0..8 {
            monitored.learn(&[0.2]).unwrap();
        }
        let settled = monitored.current_fit().unwrap();

        monitored.learn(&[0.8]).unwrap();
        let shifted = monitored.current_fit().unwrap();
        assert!(shifted > settled);
        assert!((shifted - 0.6 / 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_observation_does_not_change_clustering() {
        let mut plain = StreamArt2a::new(config()).unwrap();
        let mut monitored = StreamArt2aDrift::new(config()).unwrap();
        for x in [0.1, 0.15, 0.7, 0.72, 0.4, 0.1] {
            assert_eq!(plain.learn(&[x]).unwrap(), monitored.learn(&[x]).unwrap());
        }
        assert_eq!(plain.codebook(), monitored.engine().codebook());
    }
}
