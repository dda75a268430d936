//! Full-replacement snapshots of a task collection, and the channel that carries them
//!
//! Stores never push incremental changes: every push replaces the whole task set.
//! Late subscribers observe the latest state, intermediate states may be skipped,
//! which is exactly what full-replacement semantics call for.

use crate::task::Task;

/// The state of a task collection, as last pushed by its store
#[derive(Clone, Debug, PartialEq)]
pub enum Snapshot {
    /// Nothing has been received from the store yet
    Pending,
    /// The full task set as of the latest push
    Ready(Vec<Task>),
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::Pending
    }
}

/// See [`snapshot_channel`]
pub type SnapshotSender = tokio::sync::watch::Sender<Snapshot>;
/// See [`snapshot_channel`]
pub type SnapshotReceiver = tokio::sync::watch::Receiver<Snapshot>;

/// Create a snapshot channel, that a store uses to push full-replacement task sets
pub fn snapshot_channel() -> (SnapshotSender, SnapshotReceiver) {
    tokio::sync::watch::channel(Snapshot::default())
}

/// A live subscription to the snapshots of one store.
///
/// Close it (or drop it) when the owning session ends; this also cancels the background
/// worker that feeds it, if the store needed one.
pub struct Subscription {
    receiver: SnapshotReceiver,
    worker: Option<tokio::task::JoinHandle<()>>,
}

impl Subscription {
    /// A subscription fed directly by its store, with no background worker
    pub(crate) fn new(receiver: SnapshotReceiver) -> Self {
        Self { receiver, worker: None }
    }

    /// A subscription fed by a background worker (e.g. a long-poll loop)
    pub(crate) fn with_worker(receiver: SnapshotReceiver, worker: tokio::task::JoinHandle<()>) -> Self {
        Self { receiver, worker: Some(worker) }
    }

    /// The latest snapshot pushed by the store
    pub fn latest(&self) -> Snapshot {
        self.receiver.borrow().clone()
    }

    /// Wait until the store pushes a snapshot newer than the last observed one.
    /// Returns `false` once the store side is gone
    pub async fn changed(&mut self) -> bool {
        self.receiver.changed().await.is_ok()
    }

    pub(crate) fn receiver_mut(&mut self) -> &mut SnapshotReceiver {
        &mut self.receiver
    }

    /// Stop receiving updates and cancel the background worker, if any
    pub fn close(&mut self) {
        if let Some(worker) = self.worker.take() {
            worker.abort();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.close();
    }
}
