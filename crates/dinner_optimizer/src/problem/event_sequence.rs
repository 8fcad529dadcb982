use std::ops::RangeInclusive;

use serde::Serialize;

use super::error::ConfigurationError;

/// Ordered event labels. Index 0 is where every group starts, the last index is
/// where every group ends up, and everything in between is a hosted round.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(transparent)]
pub struct EventSequence {
    labels: Vec<String>,
}

impl EventSequence {
    pub const MIN_EVENTS: usize = 3;

    pub fn new<I, S>(labels: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels = labels.into_iter().map(Into::into).collect::<Vec<String>>();

        if labels.len() < Self::MIN_EVENTS {
            return Err(ConfigurationError::TooFewEvents(labels.len()));
        }

        Ok(Self { labels })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn label(&self, event: usize) -> &str {
        &self.labels[event]
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn first_round(&self) -> usize {
        1
    }

    pub fn last_round(&self) -> usize {
        self.labels.len() - 2
    }

    pub fn hosted_rounds(&self) -> RangeInclusive<usize> {
        self.first_round()..=self.last_round()
    }

    pub fn num_hosted_rounds(&self) -> usize {
        self.labels.len() - 2
    }

    pub fn is_hosted_round(&self, event: usize) -> bool {
        self.hosted_rounds().contains(&event)
    }

    /// Number of transitions between consecutive events, one leg time each.
    pub fn num_legs(&self) -> usize {
        self.labels.len() - 1
    }
}
