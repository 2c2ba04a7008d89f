mod evict_idle_sessions;

pub use evict_idle_sessions::EvictIdleSessions;

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::api::SharedState;

#[async_trait]
pub trait PeriodicJob: Debug + Send + Sync + 'static {
    fn interval(&self) -> Duration;

    async fn run_job(&self, state: &SharedState);
}

/// Run `job` on its own tokio task every `job.interval()` for the
/// lifetime of the process. The first run happens after one interval.
pub fn spawn_periodic_job(state: SharedState, job: impl PeriodicJob) -> JoinHandle<()> {
    tokio::spawn(async move {
        let period = job.interval();
        let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            tracing::debug!("Running periodic job {:?}", job);
            job.run_job(&state).await;
        }
    })
}
