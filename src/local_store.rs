//! This module provides the on-device task store
//!
//! This is the fully local persistence variant: a single file holds the serialized task
//! array. Every mutation re-reads the persisted set, applies the change, and rewrites the
//! whole file before returning, then publishes the new set to subscribers. A write is
//! atomic only to the extent a single-file rewrite is; there is no partial-write recovery.

use std::error::Error;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::NaiveDate;

#[cfg(feature = "local_store_mocks_remote_store")]
use std::sync::{Arc, Mutex};

#[cfg(feature = "local_store_mocks_remote_store")]
use crate::mock_behaviour::MockBehaviour;
use crate::snapshot::{snapshot_channel, Snapshot, SnapshotSender, Subscription};
use crate::task::{Task, TaskId};
use crate::traits::TaskStore;

/// A task store backed by a local file
pub struct LocalStore {
    backing_file: PathBuf,
    snapshots: SnapshotSender,

    #[cfg(feature = "local_store_mocks_remote_store")]
    /// In case we are mocking a remote store in integration tests, this describes how
    /// operations should misbehave
    mock_behaviour: Option<Arc<Mutex<MockBehaviour>>>,
}

impl LocalStore {
    /// Open a store over the file at `path`.
    ///
    /// A missing backing file reads as an empty store (first run); a malformed one is an
    /// explicit error rather than an empty set, so corrupted data never gets overwritten
    /// silently
    pub fn open(path: &Path) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let (snapshots, _) = snapshot_channel();
        let store = Self {
            backing_file: PathBuf::from(path),
            snapshots,
            #[cfg(feature = "local_store_mocks_remote_store")]
            mock_behaviour: None,
        };

        let tasks = store.load()?;
        store.publish(tasks);
        Ok(store)
    }

    #[cfg(feature = "local_store_mocks_remote_store")]
    pub fn with_mock_behaviour(mut self, mock_behaviour: Arc<Mutex<MockBehaviour>>) -> Self {
        self.mock_behaviour = Some(mock_behaviour);
        self
    }

    /// Re-read the full persisted record set
    fn load(&self) -> Result<Vec<Task>, Box<dyn Error + Send + Sync>> {
        let file = match std::fs::File::open(&self.backing_file) {
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(format!("Unable to open file {:?}: {}", self.backing_file, err).into());
            },
            Ok(file) => file,
        };

        let tasks: Vec<Task> = serde_json::from_reader(file)?;
        Ok(tasks)
    }

    /// Rewrite the full record set to the backing file
    fn save(&self, tasks: &[Task]) -> Result<(), Box<dyn Error + Send + Sync>> {
        let file = std::fs::File::create(&self.backing_file)
            .map_err(|err| format!("Unable to save file {:?}: {}", self.backing_file, err))?;
        serde_json::to_writer(file, tasks)?;
        Ok(())
    }

    fn publish(&self, tasks: Vec<Task>) {
        self.snapshots.send_replace(Snapshot::Ready(tasks));
    }
}

#[async_trait]
impl TaskStore for LocalStore {
    async fn tasks(&self) -> Result<Vec<Task>, Box<dyn Error + Send + Sync>> {
        #[cfg(feature = "local_store_mocks_remote_store")]
        if let Some(mock) = &self.mock_behaviour {
            mock.lock().unwrap().can_get_tasks()?;
        }

        self.load()
    }

    async fn create_task(&self, title: &str, date: NaiveDate) -> Result<Task, Box<dyn Error + Send + Sync>> {
        #[cfg(feature = "local_store_mocks_remote_store")]
        if let Some(mock) = &self.mock_behaviour {
            mock.lock().unwrap().can_add_task()?;
        }

        let mut tasks = self.load()?;
        let task = Task::new(title.to_string(), date);
        tasks.push(task.clone());
        self.save(&tasks)?;
        self.publish(tasks);
        Ok(task)
    }

    async fn rename_task(&self, id: &TaskId, title: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        #[cfg(feature = "local_store_mocks_remote_store")]
        if let Some(mock) = &self.mock_behaviour {
            mock.lock().unwrap().can_update_task()?;
        }

        let mut tasks = self.load()?;
        match tasks.iter_mut().find(|task| task.id() == id) {
            None => {
                log::debug!("Renaming unknown task {}, ignoring", id);
                return Ok(());
            },
            Some(task) => task.set_title(title.to_string()),
        }
        self.save(&tasks)?;
        self.publish(tasks);
        Ok(())
    }

    async fn toggle_task(&self, id: &TaskId) -> Result<(), Box<dyn Error + Send + Sync>> {
        #[cfg(feature = "local_store_mocks_remote_store")]
        if let Some(mock) = &self.mock_behaviour {
            mock.lock().unwrap().can_update_task()?;
        }

        let mut tasks = self.load()?;
        match tasks.iter_mut().find(|task| task.id() == id) {
            None => {
                log::debug!("Toggling unknown task {}, ignoring", id);
                return Ok(());
            },
            Some(task) => {
                let done = task.done();
                task.set_done(!done);
            },
        }
        self.save(&tasks)?;
        self.publish(tasks);
        Ok(())
    }

    async fn delete_task(&self, id: &TaskId) -> Result<(), Box<dyn Error + Send + Sync>> {
        #[cfg(feature = "local_store_mocks_remote_store")]
        if let Some(mock) = &self.mock_behaviour {
            mock.lock().unwrap().can_delete_task()?;
        }

        let mut tasks = self.load()?;
        let count_before = tasks.len();
        tasks.retain(|task| task.id() != id);
        if tasks.len() == count_before {
            log::debug!("Deleting unknown task {}, ignoring", id);
            return Ok(());
        }
        self.save(&tasks)?;
        self.publish(tasks);
        Ok(())
    }

    fn subscribe(&self) -> Subscription {
        Subscription::new(self.snapshots.subscribe())
    }
}
