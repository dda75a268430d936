//! This crate implements a calendar-scoped to-do list.
//!
//! Users pick a date, view the tasks due that day, and create, rename, complete or delete tasks.
//!
//! Two storage variants ship, both behind the [`TaskStore`](traits::TaskStore) trait:
//! the [`local_store`] module persists to a single on-device file, while the [`client`] module
//! persists to a remote document database, scoped to the identity handed out by a [`session`](session::Session). \
//! Either one plugs into a [`TaskListController`], which owns the in-memory task set during a session,
//! derives the date-filtered view, and dispatches user intents back to the store. \
//! Stores publish [full-replacement snapshots](snapshot::Snapshot) of the task set; the controller
//! replaces its whole list on each push and never merges incrementally.

pub mod traits;

mod task;
pub use task::Task;
pub use task::TaskId;
pub mod snapshot;
pub use snapshot::Snapshot;
pub use snapshot::Subscription;
pub mod controller;
pub use controller::Notice;
pub use controller::TaskListController;

pub mod session;
pub mod client;
pub mod local_store;
pub use local_store::LocalStore;
pub mod config;
pub use config::RemoteConfig;

pub mod mock_behaviour;
pub mod utils;
