//! This module provides a client to connect to the remote task service
//!
//! Documents live in a per-user collection; every query is scoped to the signed-in owner
//! and every request carries the session's bearer token. The service pushes changes as
//! full-replacement snapshots over a long-poll endpoint: whenever any client sharing the
//! identity adds, updates or deletes a document, the next poll returns the whole matching
//! document set together with a new cursor.
//!
//! Writes are fire-and-forget from the caller's perspective: they are not retried, and
//! the in-memory list is only updated by the subscription push that follows a successful
//! write (no optimistic update, no rollback).

use std::error::Error;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use crate::config::RemoteConfig;
use crate::session::AuthSession;
use crate::snapshot::{snapshot_channel, Snapshot, SnapshotSender, Subscription};
use crate::task::{Task, TaskId};
use crate::traits::TaskStore;

/// How long the subscription loop waits before reopening a failed long poll
const RETRY_PAUSE: Duration = Duration::from_secs(5);

/// One page of the owner-scoped collection, as served by the document store.
/// `cursor` orders the pushes; polling with the last seen cursor blocks until the
/// collection changes past it
#[derive(Debug, Deserialize)]
struct CollectionPage {
    cursor: u64,
    documents: Vec<Task>,
}

/// A task store that lives in a remote document database.
///
/// Built from a [`RemoteConfig`] and the [`AuthSession`] of the signed-in user; once the
/// session ends, drop the client (and close its subscriptions) and build a new one after
/// the next sign-in.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: Url,
    owner: String,
    access_token: String,
}

impl Client {
    /// Create a client for the signed-in user. This does not start a connection
    pub fn new(config: &RemoteConfig, auth: &AuthSession) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url().clone(),
            owner: auth.user.uid.clone(),
            access_token: auth.access_token.clone(),
        }
    }

    fn collection_url(&self) -> Result<Url, Box<dyn Error + Send + Sync>> {
        Ok(self.base_url.join("tasks")?)
    }

    fn document_url(&self, id: &TaskId) -> Result<Url, Box<dyn Error + Send + Sync>> {
        Ok(self.base_url.join(&format!("tasks/{}", id))?)
    }

    /// Fetch the owner's document set. With a cursor, this long-polls until the
    /// collection changes past it
    async fn fetch_page(&self, cursor: Option<u64>) -> Result<CollectionPage, Box<dyn Error + Send + Sync>> {
        let mut request = self.http.get(self.collection_url()?)
            .query(&[("owner", self.owner.as_str())])
            .bearer_auth(&self.access_token);
        if let Some(cursor) = cursor {
            request = request.query(&[("cursor", cursor.to_string())]);
        }

        let page = request.send().await?
            .error_for_status()?
            .json::<CollectionPage>()
            .await?;
        Ok(page)
    }

    async fn patch_document(&self, id: &TaskId, body: serde_json::Value) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.http.patch(self.document_url(id)?)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send().await?
            .error_for_status()?;
        Ok(())
    }

    /// The loop feeding a subscription. Each long-poll response replaces the whole
    /// snapshot. Transport errors re-open the poll after a pause; this only keeps the
    /// subscription alive, writes are never retried
    async fn watch_loop(self, snapshots: SnapshotSender) {
        let mut cursor = None;
        loop {
            match self.fetch_page(cursor).await {
                Ok(page) => {
                    cursor = Some(page.cursor);
                    snapshots.send_replace(Snapshot::Ready(page.documents));
                },
                Err(err) => {
                    log::warn!("Task subscription interrupted: {}. Reopening in {:?}", err, RETRY_PAUSE);
                    tokio::time::sleep(RETRY_PAUSE).await;
                },
            }
        }
    }
}

#[async_trait]
impl TaskStore for Client {
    async fn tasks(&self) -> Result<Vec<Task>, Box<dyn Error + Send + Sync>> {
        Ok(self.fetch_page(None).await?.documents)
    }

    async fn create_task(&self, title: &str, date: NaiveDate) -> Result<Task, Box<dyn Error + Send + Sync>> {
        let document = json!({
            "title": title,
            "isDone": false,
            "date": date,
            "userId": self.owner,
        });

        let created = self.http.post(self.collection_url()?)
            .bearer_auth(&self.access_token)
            .json(&document)
            .send().await?
            .error_for_status()?
            .json::<Task>()
            .await?;
        Ok(created)
    }

    async fn rename_task(&self, id: &TaskId, title: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.patch_document(id, json!({ "title": title })).await
    }

    async fn toggle_task(&self, id: &TaskId) -> Result<(), Box<dyn Error + Send + Sync>> {
        // The value to flip comes from the owner's current document set
        let tasks = self.tasks().await?;
        let task = match tasks.iter().find(|task| task.id() == id) {
            None => {
                log::debug!("Toggling unknown task {}, ignoring", id);
                return Ok(());
            },
            Some(task) => task,
        };

        self.patch_document(id, json!({ "isDone": !task.done() })).await
    }

    async fn delete_task(&self, id: &TaskId) -> Result<(), Box<dyn Error + Send + Sync>> {
        let response = self.http.delete(self.document_url(id)?)
            .bearer_auth(&self.access_token)
            .send().await?;

        // Deleting an already-gone document is a no-op, not an error
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            log::debug!("Deleting unknown task {}, ignoring", id);
            return Ok(());
        }
        response.error_for_status()?;
        Ok(())
    }

    /// Must be called from within a tokio runtime: this spawns the long-poll worker
    fn subscribe(&self) -> Subscription {
        let (sender, receiver) = snapshot_channel();
        let worker = tokio::spawn(self.clone().watch_loop(sender));
        Subscription::with_worker(receiver, worker)
    }
}
