//! Test pacer — records waits instead of sleeping.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use ashen_veil_core::pacer::Pacer;
use async_trait::async_trait;

use crate::transport::Sent;

/// A pacer that returns immediately and records every requested wait.
///
/// A pacer obtained from [`crate::RecordingTransport::pacer`] writes into the
/// transport's log, so waits and sends can be asserted in one timeline.
#[derive(Debug, Clone, Default)]
pub struct RecordingPacer {
    log: Arc<Mutex<Vec<Sent>>>,
}

impl RecordingPacer {
    /// Creates a pacer with its own log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn sharing(log: Arc<Mutex<Vec<Sent>>>) -> Self {
        Self { log }
    }

    /// Every wait requested so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn pauses(&self) -> Vec<Duration> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter_map(|entry| match entry {
                Sent::Paused(duration) => Some(*duration),
                _ => None,
            })
            .collect()
    }

    /// Sum of every wait requested so far.
    pub fn total(&self) -> Duration {
        self.pauses().into_iter().sum()
    }
}

#[async_trait]
impl Pacer for RecordingPacer {
    async fn pause(&self, duration: Duration) {
        self.log.lock().unwrap().push(Sent::Paused(duration));
    }
}
