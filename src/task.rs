//! To-do tasks, each scoped to one calendar day

use std::fmt::{Display, Formatter};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The opaque identifier of a [`Task`].
///
/// Tasks created on this device pick a random id; tasks coming from the remote store keep
/// whatever id the server assigned to the document.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId {
    content: String,
}

impl TaskId {
    /// Generate a random TaskId.
    pub fn random() -> Self {
        let random = Uuid::new_v4().to_hyphenated().to_string();
        Self { content: random }
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }
}

impl From<String> for TaskId {
    fn from(content: String) -> Self {
        Self { content }
    }
}

impl From<&str> for TaskId {
    fn from(content: &str) -> Self {
        Self { content: content.to_string() }
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.content)
    }
}

/// A to-do task.
///
/// The serialized form is the wire shape the persistence services use
/// (`isDone`, `userId`, `date` as a `YYYY-MM-DD` string). Records that do not match it
/// (e.g. an invalid calendar date) are rejected at the storage boundary instead of being
/// silently coerced.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,

    /// The display text. Never persisted empty: an empty submission cancels the
    /// create/edit intent before any store is called
    title: String,

    /// The completion flag
    #[serde(rename = "isDone")]
    done: bool,

    /// The day this task is due. Time of day is never considered
    date: NaiveDate,

    /// Owner uid. Present on documents living in a per-user remote collection,
    /// absent from on-device records
    #[serde(rename = "userId", skip_serializing_if = "Option::is_none", default)]
    owner: Option<String>,
}

impl Task {
    /// Create a brand new, uncompleted task that is not persisted anywhere yet.
    /// This will pick a new (random) task id.
    pub fn new(title: String, date: NaiveDate) -> Self {
        Self {
            id: TaskId::random(),
            title,
            done: false,
            date,
            owner: None,
        }
    }

    pub fn id(&self) -> &TaskId { &self.id }
    pub fn title(&self) -> &str { &self.title }
    pub fn done(&self) -> bool { self.done }
    pub fn date(&self) -> NaiveDate { self.date }
    pub fn owner(&self) -> Option<&str> { self.owner.as_deref() }

    /// Rename this task.
    pub fn set_title(&mut self, new_title: String) {
        self.title = new_title;
    }

    /// Set the completion flag.
    pub fn set_done(&mut self, done: bool) {
        self.done = done;
    }
}
