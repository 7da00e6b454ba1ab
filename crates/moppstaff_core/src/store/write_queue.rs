//! Write-behind queue for durable store mutations.
//!
//! # Responsibility
//! - Serialize store writes through one writer thread in issue order.
//! - Hand each caller a ticket it may wait on or drop.
//!
//! # Invariants
//! - Jobs execute strictly in enqueue order; a stale snapshot can never
//!   overwrite a newer one.
//! - A failed write is logged and reported through its ticket, never
//!   retried.
//! - Dropping the queue drains every pending job before the thread exits.

use crate::store::kv::{DurableStore, StoreError};
use log::{debug, error};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::{self, JoinHandle};

pub type PersistResult = Result<(), PersistError>;

/// Failure reported by [`PersistTicket::wait`].
#[derive(Debug)]
pub enum PersistError {
    /// The store rejected the write.
    Store(StoreError),
    /// The writer is gone; the outcome of this write is unknown.
    Disconnected,
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Disconnected => {
                write!(f, "persistence writer disconnected before reporting an outcome")
            }
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Disconnected => None,
        }
    }
}

enum WriteJob {
    Save {
        key: String,
        value: Vec<u8>,
        done: Sender<Result<(), StoreError>>,
    },
    Remove {
        key: String,
        done: Sender<Result<(), StoreError>>,
    },
}

/// Completion handle for one enqueued store write.
///
/// Waiting is optional: in-memory state is already updated when the ticket
/// is issued, so callers that do not care about durability simply drop it.
#[derive(Debug)]
pub struct PersistTicket {
    outcome: Receiver<Result<(), StoreError>>,
}

impl PersistTicket {
    /// Blocks until the writer has applied this job.
    pub fn wait(self) -> PersistResult {
        match self.outcome.recv() {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(PersistError::Store(err)),
            Err(_) => Err(PersistError::Disconnected),
        }
    }

    /// Ticket that reports `err` without reaching the writer.
    pub(crate) fn failed(err: StoreError) -> Self {
        let (done, outcome) = channel();
        let _ = done.send(Err(err));
        Self { outcome }
    }
}

/// FIFO single-writer queue owning the durable store.
pub struct WriteQueue {
    jobs: Option<Sender<WriteJob>>,
    writer: Option<JoinHandle<()>>,
}

impl WriteQueue {
    /// Moves `store` into a dedicated writer thread and starts draining jobs.
    pub fn spawn<S>(store: S) -> Self
    where
        S: DurableStore + Send + 'static,
    {
        let (jobs, inbox) = channel::<WriteJob>();
        let writer = thread::spawn(move || run_writer(store, inbox));
        Self {
            jobs: Some(jobs),
            writer: Some(writer),
        }
    }

    /// Enqueues a full-value overwrite for `key`.
    pub fn enqueue_save(&self, key: &str, value: Vec<u8>) -> PersistTicket {
        self.enqueue(|done| WriteJob::Save {
            key: key.to_string(),
            value,
            done,
        })
    }

    /// Enqueues a delete for `key`.
    pub fn enqueue_remove(&self, key: &str) -> PersistTicket {
        self.enqueue(|done| WriteJob::Remove {
            key: key.to_string(),
            done,
        })
    }

    fn enqueue(
        &self,
        job: impl FnOnce(Sender<Result<(), StoreError>>) -> WriteJob,
    ) -> PersistTicket {
        let (done, outcome) = channel();
        if let Some(jobs) = &self.jobs {
            // Send only fails when the writer is gone; the ticket then
            // reports Disconnected on wait.
            let _ = jobs.send(job(done));
        }
        PersistTicket { outcome }
    }
}

impl Drop for WriteQueue {
    fn drop(&mut self) {
        // Disconnect first so the writer loop ends after the last queued job.
        self.jobs.take();
        if let Some(writer) = self.writer.take() {
            let _ = writer.join();
        }
    }
}

fn run_writer<S: DurableStore>(mut store: S, inbox: Receiver<WriteJob>) {
    while let Ok(job) = inbox.recv() {
        match job {
            WriteJob::Save { key, value, done } => {
                let result = store.save(&key, &value);
                report("store_save", &key, result, &done);
            }
            WriteJob::Remove { key, done } => {
                let result = store.remove(&key);
                report("store_remove", &key, result, &done);
            }
        }
    }
}

fn report(
    event: &str,
    key: &str,
    result: Result<(), StoreError>,
    done: &Sender<Result<(), StoreError>>,
) {
    match &result {
        Ok(()) => debug!("event={event} module=store status=ok key={key}"),
        Err(err) => error!("event={event} module=store status=error key={key} error={err}"),
    }
    // The caller may already have dropped its ticket; that is the
    // fire-and-forget path.
    let _ = done.send(result);
}
