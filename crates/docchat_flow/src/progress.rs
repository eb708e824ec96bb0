//! Simulated upload progress.
//!
//! The transfer itself reports nothing until it settles, so progress is
//! advanced on a fixed cadence up to a ceiling below 100. The ticker task
//! lives exactly as long as its [`ProgressTicker`] handle.

use std::sync::Arc;

use docchat_core::UploadConfig;
use docchat_state::{UploadSession, UploadStatus};
use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::{CancellationToken, DropGuard};

pub struct ProgressTicker {
    _guard: DropGuard,
}

impl ProgressTicker {
    /// Spawn the periodic task. Must be called from within a tokio runtime.
    pub fn start(session: Arc<watch::Sender<UploadSession>>, config: &UploadConfig) -> Self {
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let period = config.progress_interval();
        let step = config.progress_step;
        let ceiling = config.progress_ceiling;

        tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = cancelled.cancelled() => break,
                    _ = ticks.tick() => {
                        // A settled session is never advanced again.
                        session.send_if_modified(|s| {
                            s.status == UploadStatus::Uploading && s.progress.advance(step, ceiling)
                        });
                    }
                }
            }
            tracing::debug!("Upload progress ticker stopped");
        });

        Self {
            _guard: token.drop_guard(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn fast_config() -> UploadConfig {
        UploadConfig {
            progress_interval_ms: 5,
            progress_step: 10,
            progress_ceiling: 95,
            ..UploadConfig::default()
        }
    }

    fn uploading_session() -> Arc<watch::Sender<UploadSession>> {
        let (tx, _rx) = watch::channel(UploadSession {
            status: UploadStatus::Uploading,
            ..UploadSession::default()
        });
        Arc::new(tx)
    }

    #[tokio::test]
    async fn test_advances_up_to_ceiling() {
        let session = uploading_session();
        let _ticker = ProgressTicker::start(session.clone(), &fast_config());

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(session.borrow().progress.value(), 95);
    }

    #[tokio::test]
    async fn test_stops_when_dropped() {
        let session = uploading_session();
        let ticker = ProgressTicker::start(session.clone(), &fast_config());
        tokio::time::sleep(Duration::from_millis(30)).await;
        drop(ticker);

        let stopped_at = session.borrow().progress.value();
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(session.borrow().progress.value(), stopped_at);
    }

    #[tokio::test]
    async fn test_ignores_settled_session() {
        let (tx, _rx) = watch::channel(UploadSession::default());
        let session = Arc::new(tx);
        let _ticker = ProgressTicker::start(session.clone(), &fast_config());

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(session.borrow().progress.value(), 0);
    }
}
