//! Interval scheduler: sweeps every configured group on a fixed period

use std::sync::Arc;
use std::time::Duration;

use clan_service::{ServiceContext, SweepService};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

pub struct SweepScheduler {
    ctx: Arc<ServiceContext>,
    period: Duration,
}

impl SweepScheduler {
    pub fn new(ctx: Arc<ServiceContext>, period: Duration) -> Self {
        Self { ctx, period }
    }

    /// Sweep now and then every period until `shutdown` flips
    ///
    /// A zero period or an empty group list disables the scheduler. A sweep
    /// in progress is allowed to finish before shutdown is honoured.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        if self.period.is_zero() || self.ctx.settings().groups.is_empty() {
            info!("Interval sweeps disabled");
            return;
        }

        let mut ticker = tokio::time::interval(self.period);
        // A sweep that overruns its period delays the next one instead of bursting
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(period_secs = self.period.as_secs(), "Sweep scheduler started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = shutdown.changed() => break,
            }
            if *shutdown.borrow() {
                break;
            }

            let report = SweepService::new(&self.ctx).sweep().await;
            if report.degraded() > 0 {
                warn!(
                    synced = report.synced(),
                    degraded = report.degraded(),
                    deadline_hit = report.deadline_hit,
                    "Scheduled sweep finished with problems"
                );
            }
        }

        info!("Sweep scheduler stopped");
    }
}
