//! View-local task collection with the refetch-after-write policy.
//!
//! # Design
//! The collection mirrors the server's listing for this session. Creates
//! and updates are followed by a wholesale refetch instead of a local
//! merge, trading one extra round trip for exact agreement with the
//! server. Deletes prune locally because the 204 already confirmed
//! removal. When any call fails the previous collection stays as it was:
//! stale but consistent, never half-updated.

use tracing::debug;

use crate::error::ApiError;
use crate::tasks::{TaskClient, DEFAULT_LIST_LIMIT};
use crate::types::{CreateTask, Task, UpdateTask};

pub struct TaskList {
    client: TaskClient,
    tasks: Vec<Task>,
}

impl TaskList {
    /// Empty collection; call [`refresh`](Self::refresh) to populate it.
    pub fn new(client: TaskClient) -> Self {
        Self {
            client,
            tasks: Vec::new(),
        }
    }

    /// The currently held tasks, in the server's listing order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Replace the collection with the server's current listing.
    pub async fn refresh(&mut self) -> Result<(), ApiError> {
        let fresh = self.client.list(0, DEFAULT_LIST_LIMIT).await?;
        debug!(count = fresh.len(), "task listing refreshed");
        self.tasks = fresh;
        Ok(())
    }

    /// Create a task, then resynchronize the collection.
    pub async fn create(&mut self, input: &CreateTask) -> Result<(), ApiError> {
        self.client.create(input).await?;
        self.refresh().await
    }

    /// Update a task, then resynchronize the collection.
    pub async fn update(&mut self, id: i64, input: &UpdateTask) -> Result<(), ApiError> {
        self.client.update(id, input).await?;
        self.refresh().await
    }

    /// Delete a task and prune it locally. No refetch; the 204 already
    /// confirmed the server no longer has it.
    pub async fn delete(&mut self, id: i64) -> Result<(), ApiError> {
        self.client.delete(id).await?;
        self.tasks.retain(|task| task.id != id);
        Ok(())
    }
}
