use async_trait::async_trait;
use std::time::{Duration, Instant};

use super::PeriodicJob;
use crate::api::SharedState;

/// Ends sessions whose browser hasn't made a request within the idle
/// timeout. Their transcript and model context are dropped with them.
#[derive(Debug)]
pub struct EvictIdleSessions {
    idle_timeout: Duration,
}

impl EvictIdleSessions {
    pub fn new(idle_timeout: Duration) -> Self {
        Self { idle_timeout }
    }
}

#[async_trait]
impl PeriodicJob for EvictIdleSessions {
    fn interval(&self) -> Duration {
        // Check at least once a minute
        (self.idle_timeout / 2).clamp(Duration::from_secs(1), Duration::from_secs(60))
    }

    async fn run_job(&self, state: &SharedState) {
        let (evicted, remaining) = {
            let mut shared_state = state.write().expect("Unable to write shared state");
            let evicted = shared_state
                .sessions
                .evict_idle(self.idle_timeout, Instant::now());
            (evicted, shared_state.sessions.len())
        };

        if evicted > 0 {
            tracing::info!("Evicted {} idle sessions, {} remaining", evicted, remaining);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_checks_at_least_once_a_minute() {
        let job = EvictIdleSessions::new(Duration::from_secs(60 * 60));
        assert_eq!(job.interval(), Duration::from_secs(60));

        let job = EvictIdleSessions::new(Duration::from_secs(10));
        assert_eq!(job.interval(), Duration::from_secs(5));
    }
}
