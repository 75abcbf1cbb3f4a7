use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use clan_core::{ProfileChangedEvent, Snowflake};
use clan_service::{NamePolicyService, ServiceContext, WatchOutcome};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{GatewayError, GatewayResult};

/// Sending side of the worker queues
#[derive(Debug, Clone)]
pub struct WatcherHandle {
    queues: Arc<[mpsc::Sender<ProfileChangedEvent>]>,
}

impl WatcherHandle {
    /// Worker responsible for `member_id`
    pub fn worker_for(&self, member_id: Snowflake) -> usize {
        let mut hasher = DefaultHasher::new();
        member_id.hash(&mut hasher);
        (hasher.finish() % self.queues.len() as u64) as usize
    }

    /// Queue an event without waiting
    ///
    /// Returns `Ok(false)` when the worker's queue is full and the event was
    /// dropped. The member's next profile change brings the name back.
    pub fn submit(&self, event: ProfileChangedEvent) -> GatewayResult<bool> {
        let worker = self.worker_for(event.member_id);
        match self.queues[worker].try_send(event) {
            Ok(()) => Ok(true),
            Err(TrySendError::Full(event)) => {
                warn!(worker, member_id = %event.member_id, "Watcher queue full, dropping profile change");
                Ok(false)
            }
            Err(TrySendError::Closed(_)) => Err(GatewayError::WatcherClosed),
        }
    }
}

/// Worker tasks running the name policy
#[derive(Debug)]
pub struct WatcherPool {
    handle: WatcherHandle,
    workers: Vec<JoinHandle<()>>,
}

impl WatcherPool {
    pub fn spawn(ctx: Arc<ServiceContext>, workers: usize, queue_capacity: usize) -> Self {
        let workers = workers.max(1);
        let mut queues = Vec::with_capacity(workers);
        let mut handles = Vec::with_capacity(workers);

        for worker in 0..workers {
            let (tx, rx) = mpsc::channel(queue_capacity.max(1));
            queues.push(tx);
            handles.push(tokio::spawn(run_worker(worker, ctx.clone(), rx)));
        }

        info!(workers, "Name-policy watcher started");

        Self {
            handle: WatcherHandle { queues: queues.into() },
            workers: handles,
        }
    }

    pub fn handle(&self) -> WatcherHandle {
        self.handle.clone()
    }

    /// Drain the queues and wait for the workers
    ///
    /// Workers exit once every [`WatcherHandle`] clone has been dropped.
    pub async fn shutdown(self) {
        drop(self.handle);
        for worker in self.workers {
            if let Err(e) = worker.await {
                warn!(error = %e, "Watcher worker panicked");
            }
        }
        info!("Name-policy watcher stopped");
    }
}

async fn run_worker(worker: usize, ctx: Arc<ServiceContext>, mut rx: mpsc::Receiver<ProfileChangedEvent>) {
    let service = NamePolicyService::new(&ctx);
    while let Some(event) = rx.recv().await {
        let outcome = service.handle_profile_change(&event).await;
        if !matches!(outcome, WatchOutcome::Clean) {
            debug!(worker, member_id = %event.member_id, outcome = ?outcome, "Profile change handled");
        }
    }
}
