use std::error::Error;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::snapshot::Subscription;
use crate::task::{Task, TaskId};

/// The storage contract shared by every task store.
///
/// [`LocalStore`](crate::local_store::LocalStore) implements it over a single on-device
/// file, [`Client`](crate::client::Client) over a remote per-user document collection.
/// Either one plugs into a [`TaskListController`](crate::controller::TaskListController).
#[async_trait]
pub trait TaskStore {
    /// Returns the current task set of this store.
    /// This may trigger a full read of the persistence medium (that can be a long process,
    /// or that can even fail, e.g. in case of a remote server)
    async fn tasks(&self) -> Result<Vec<Task>, Box<dyn Error + Send + Sync>>;

    /// Persist a brand new, uncompleted task due on `date`.
    ///
    /// Callers are expected to have rejected empty titles already: an empty submission
    /// cancels the intent before any store is called
    async fn create_task(&self, title: &str, date: NaiveDate) -> Result<Task, Box<dyn Error + Send + Sync>>;

    /// Change the title of an existing task. Same non-empty precondition as
    /// [`create_task`](TaskStore::create_task); unknown ids are ignored
    async fn rename_task(&self, id: &TaskId, title: &str) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Flip the completion flag of a task. A no-op when the id is unknown
    async fn toggle_task(&self, id: &TaskId) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Remove the matching record. A no-op when the id is unknown
    async fn delete_task(&self, id: &TaskId) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Open a live subscription to this store's full-replacement snapshots
    fn subscribe(&self) -> Subscription;
}
