//! The task list controller
//!
//! Holds the authoritative in-memory task set and the selected date, derives the
//! date-filtered view, and turns user intents into store calls. The store's snapshot
//! subscription is the sole source of list truth: the controller replaces its entire
//! list on each push and never applies a mutation optimistically.

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use chrono::NaiveDate;

use crate::snapshot::{Snapshot, Subscription};
use crate::task::{Task, TaskId};
use crate::traits::TaskStore;

/// A generic failure notice for the presentation layer, naming the action that failed.
///
/// Stores reject operations for their own reasons; the details go to the log, the user
/// gets this. Rejected operations are not retried
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notice {
    CreateFailed,
    RenameFailed,
    ToggleFailed,
    DeleteFailed,
}

impl Display for Notice {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            Notice::CreateFailed => write!(f, "Failed to add task"),
            Notice::RenameFailed => write!(f, "Failed to rename task"),
            Notice::ToggleFailed => write!(f, "Failed to update task"),
            Notice::DeleteFailed => write!(f, "Failed to delete task"),
        }
    }
}

/// Drives one task list view over one store
pub struct TaskListController<S: TaskStore> {
    store: S,
    subscription: Subscription,

    selected_date: NaiveDate,
    tasks: Vec<Task>,
    loading: bool,
    is_creating: bool,
    editing: Option<TaskId>,
    notice: Option<Notice>,
}

impl<S: TaskStore> TaskListController<S> {
    /// Create a controller over `store`, initially selecting `today`.
    ///
    /// Subscribes to the store immediately: whatever it has already pushed is visible
    /// right away, anything else leaves the controller loading until the first snapshot
    pub fn new(store: S, today: NaiveDate) -> Self {
        let subscription = store.subscribe();
        let mut controller = Self {
            store,
            subscription,
            selected_date: today,
            tasks: Vec::new(),
            loading: true,
            is_creating: false,
            editing: None,
            notice: None,
        };

        let latest = controller.subscription.receiver_mut().borrow_and_update().clone();
        controller.apply(latest);
        controller
    }

    pub fn selected_date(&self) -> NaiveDate { self.selected_date }
    pub fn tasks(&self) -> &[Task] { &self.tasks }
    pub fn is_loading(&self) -> bool { self.loading }
    pub fn is_creating(&self) -> bool { self.is_creating }
    pub fn editing(&self) -> Option<&TaskId> { self.editing.as_ref() }
    pub fn store(&self) -> &S { &self.store }

    /// The tasks due on the selected day
    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.tasks.iter()
            .filter(|task| task.date() == self.selected_date)
            .collect()
    }

    /// Every day that has at least one task, regardless of the selected day.
    /// Calendar widgets consume this to badge days
    pub fn marked_dates(&self) -> BTreeSet<NaiveDate> {
        self.tasks.iter()
            .map(|task| task.date())
            .collect()
    }

    /// Take the pending failure notice, if any
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Select another day. A pure view-filter change: no store call
    pub fn select_date(&mut self, date: NaiveDate) {
        self.selected_date = date;
    }

    pub fn begin_create(&mut self) {
        self.is_creating = true;
    }

    pub fn cancel_create(&mut self) {
        self.is_creating = false;
    }

    /// Submit the create input. An empty or whitespace-only title cancels the intent:
    /// nothing reaches the store. Either way the input closes
    pub async fn submit_create(&mut self, title: &str) {
        let title = title.trim();
        if title.is_empty() {
            self.is_creating = false;
            return;
        }

        if let Err(err) = self.store.create_task(title, self.selected_date).await {
            log::error!("Unable to create task: {}", err);
            self.notice = Some(Notice::CreateFailed);
        }
        self.is_creating = false;
        self.refresh();
    }

    /// Open the edit input for `id`. Beginning an edit on a second task abandons the
    /// first edit without saving it
    pub fn begin_edit(&mut self, id: &TaskId) {
        self.editing = Some(id.clone());
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Submit the edit input. An empty or whitespace-only title abandons the edit;
    /// either way the input closes
    pub async fn submit_edit(&mut self, id: &TaskId, title: &str) {
        let title = title.trim();
        if title.is_empty() {
            self.editing = None;
            return;
        }

        if let Err(err) = self.store.rename_task(id, title).await {
            log::error!("Unable to rename task {}: {}", id, err);
            self.notice = Some(Notice::RenameFailed);
        }
        self.editing = None;
        self.refresh();
    }

    /// Flip the completion flag of `id`
    pub async fn toggle(&mut self, id: &TaskId) {
        if let Err(err) = self.store.toggle_task(id).await {
            log::error!("Unable to toggle task {}: {}", id, err);
            self.notice = Some(Notice::ToggleFailed);
        }
        self.refresh();
    }

    /// Delete `id`
    pub async fn delete(&mut self, id: &TaskId) {
        if let Err(err) = self.store.delete_task(id).await {
            log::error!("Unable to delete task {}: {}", id, err);
            self.notice = Some(Notice::DeleteFailed);
        }
        self.refresh();
    }

    /// Drain whatever the store has pushed since the last look, without blocking.
    ///
    /// This runs after every intent, so stores that publish synchronously (the local
    /// one) are reflected immediately; remote stores stay as last synced until their
    /// next push arrives
    pub fn refresh(&mut self) {
        let receiver = self.subscription.receiver_mut();
        if receiver.has_changed().unwrap_or(false) {
            let snapshot = receiver.borrow_and_update().clone();
            self.apply(snapshot);
        }
    }

    /// Wait for the next snapshot and apply it. Returns `false` once the store side is
    /// gone, so event loops know to stop polling
    pub async fn changed(&mut self) -> bool {
        if !self.subscription.changed().await {
            return false;
        }
        let snapshot = self.subscription.receiver_mut().borrow_and_update().clone();
        self.apply(snapshot);
        true
    }

    /// Close the live subscription. Call this when the owning session ends
    pub fn close(&mut self) {
        self.subscription.close();
    }

    fn apply(&mut self, snapshot: Snapshot) {
        match snapshot {
            Snapshot::Pending => self.loading = true,
            Snapshot::Ready(tasks) => {
                self.tasks = tasks;
                self.loading = false;
            },
        }
    }
}
