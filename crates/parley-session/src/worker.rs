//! The long-running worker loop.
//!
//! The worker owns a job queue and runs each dispatched job on its own task.
//! A failing job is logged and reported through the host's failure path; it
//! never takes down the loop or other jobs.

use crate::bootstrap::JobHandler;
use crate::job::JobContext;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{error, info};

/// Queued job assignments the worker has not yet picked up.
const JOB_QUEUE_CAPACITY: usize = 64;

pub struct WorkerOptions {
    /// Entrypoint invoked once per dispatched job.
    pub entrypoint: Arc<dyn JobHandler>,
}

/// Sender half of the worker's job queue.
///
/// This is the seam the hosting dispatch feeds assignments through. Dropping
/// every dispatcher closes the queue and lets the worker drain and exit.
pub type JobDispatcher = mpsc::Sender<JobContext>;

pub struct Worker {
    options: WorkerOptions,
    jobs_tx: JobDispatcher,
    jobs_rx: mpsc::Receiver<JobContext>,
}

impl Worker {
    pub fn new(options: WorkerOptions) -> Self {
        let (jobs_tx, jobs_rx) = mpsc::channel(JOB_QUEUE_CAPACITY);
        Self {
            options,
            jobs_tx,
            jobs_rx,
        }
    }

    pub fn dispatcher(&self) -> JobDispatcher {
        self.jobs_tx.clone()
    }

    /// Serves jobs until every dispatcher is dropped, then drains in-flight
    /// jobs.
    pub async fn run(mut self) {
        // The worker holds one sender itself; drop it so the queue closes
        // when external dispatchers go away.
        drop(self.jobs_tx);

        let mut running = JoinSet::new();

        while let Some(ctx) = self.jobs_rx.recv().await {
            let handler = Arc::clone(&self.options.entrypoint);
            running.spawn(async move {
                let job_id = ctx.descriptor.id.clone();
                let room = ctx.descriptor.room_name.clone();
                info!(job_id = %job_id, room = %room, "job started");
                match handler.handle(ctx).await {
                    Ok(()) => info!(job_id = %job_id, room = %room, "job completed"),
                    Err(e) => error!(job_id = %job_id, room = %room, error = %e, "job failed"),
                }
            });

            // Reap finished jobs as we go so the set does not grow unbounded.
            while let Some(res) = running.try_join_next() {
                if let Err(e) = res {
                    error!(error = %e, "job task panicked");
                }
            }
        }

        while let Some(res) = running.join_next().await {
            if let Err(e) = res {
                error!(error = %e, "job task panicked");
            }
        }

        info!("worker drained, shutting down");
    }
}
