//! Dispatcher: a fixed pool of workers fed by a bounded queue.
//!
//! Ingress only ever enqueues. Each worker owns its own RNG, runs one
//! segment at a time to completion, and reports nothing back.

use std::sync::Arc;

use hamlink_core::Segment;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

use crate::forward::Forwarder;
use crate::transfer::{Transfer, TransferStatus};

/// Why a segment was not accepted for processing
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("dispatch queue is full")]
    QueueFull,
    #[error("dispatcher is shut down")]
    Closed,
}

/// Cloneable enqueue side, held by ingress
#[derive(Debug, Clone)]
pub struct DispatchHandle {
    tx: mpsc::Sender<Segment>,
}

impl DispatchHandle {
    /// Queue a segment without waiting for a worker.
    pub fn dispatch(&self, segment: Segment) -> Result<(), DispatchError> {
        self.tx.try_send(segment).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => DispatchError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => DispatchError::Closed,
        })
    }
}

pub struct Dispatcher {
    handle: DispatchHandle,
    workers: Vec<JoinHandle<()>>,
}

impl Dispatcher {
    /// Start `workers` tasks draining a queue of capacity `queue_depth`.
    ///
    /// With a `seed`, worker `i` draws from `StdRng::seed_from_u64(seed + i)`.
    pub fn spawn<F: Forwarder>(
        transfer: Transfer<F>,
        workers: usize,
        queue_depth: usize,
        seed: Option<u64>,
    ) -> Self {
        let (tx, rx) = mpsc::channel::<Segment>(queue_depth.max(1));
        let rx = Arc::new(Mutex::new(rx));

        let workers: Vec<JoinHandle<()>> = (0..workers.max(1))
            .map(|id| {
                let rng = match seed {
                    Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(id as u64)),
                    None => StdRng::from_entropy(),
                };
                tokio::spawn(worker_loop(id, transfer.clone(), Arc::clone(&rx), rng))
            })
            .collect();

        tracing::info!(workers = workers.len(), queue_depth, "dispatcher started");

        Self {
            handle: DispatchHandle { tx },
            workers,
        }
    }

    pub fn handle(&self) -> DispatchHandle {
        self.handle.clone()
    }

    /// Close the queue and wait for workers to drain what was accepted.
    ///
    /// Every other [`DispatchHandle`] must be dropped first or this waits forever.
    pub async fn shutdown(self) {
        drop(self.handle);
        for worker in self.workers {
            if let Err(e) = worker.await {
                tracing::error!(error = %e, "dispatch worker panicked");
            }
        }
        tracing::info!("dispatcher stopped");
    }
}

async fn worker_loop<F: Forwarder>(
    id: usize,
    transfer: Transfer<F>,
    rx: Arc<Mutex<mpsc::Receiver<Segment>>>,
    mut rng: StdRng,
) {
    loop {
        let next = rx.lock().await.recv().await;
        let Some(segment) = next else {
            tracing::debug!(worker = id, "queue closed, worker exiting");
            return;
        };

        if let TransferStatus::Lost = transfer.run(segment, &mut rng).await {
            tracing::debug!(worker = id, "segment dropped by loss model");
        }
    }
}
