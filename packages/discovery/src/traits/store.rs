//! Storage traits for tasks and discovered businesses.
//!
//! The storage layer is split into focused traits:
//! - `TaskStore`: the task queue the controller drains
//! - `BusinessStore`: business rows and their tips/tags
//! - `DiscoveryStore`: composite trait combining both

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    business::{BusinessId, NewBusiness, NewBusinessTag, NewBusinessTip},
    task::{Task, TaskId, TaskStatus, TaskUpdate},
};

/// Queue of discovery tasks.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Find any one task in the given status.
    ///
    /// Ordering is the backend's default; callers must not rely on it.
    async fn find_one_by_status(&self, status: TaskStatus) -> Result<Option<Task>>;

    /// Apply a partial update to a task.
    async fn update_task(&self, id: TaskId, update: &TaskUpdate) -> Result<()>;
}

/// Business records and their child rows.
#[async_trait]
pub trait BusinessStore: Send + Sync {
    /// Insert a business row and return its generated id.
    async fn insert_business(&self, business: &NewBusiness) -> Result<BusinessId>;

    /// Insert tip rows. Callers skip the call for an empty slice.
    async fn insert_tips(&self, tips: &[NewBusinessTip]) -> Result<()>;

    /// Insert tag rows. Callers skip the call for an empty slice.
    async fn insert_tags(&self, tags: &[NewBusinessTag]) -> Result<()>;
}

/// Composite storage trait used by the controller.
pub trait DiscoveryStore: TaskStore + BusinessStore {}

// Blanket implementation: anything implementing both traits is a DiscoveryStore
impl<T: TaskStore + BusinessStore> DiscoveryStore for T {}
