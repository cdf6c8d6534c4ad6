//! Pacing abstraction for determinism.
//!
//! Scene scripts and animations wait between outbound messages. In
//! production the wait is a real `tokio` sleep that suspends only the
//! current chat's task; in tests a recording implementation is injected so
//! that no test ever sleeps.

use std::time::Duration;

use async_trait::async_trait;

/// Abstraction over waiting between rendered beats.
#[async_trait]
pub trait Pacer: Send + Sync {
    /// Suspends the caller for `duration`.
    async fn pause(&self, duration: Duration);
}

/// Production pacer backed by `tokio::time::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_tokio_pacer_waits_for_requested_duration() {
        // Arrange
        let started = tokio::time::Instant::now();

        // Act
        TokioPacer.pause(Duration::from_millis(1100)).await;

        // Assert
        assert!(started.elapsed() >= Duration::from_millis(1100));
    }
}
