//! In-memory storage implementation for testing and development.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::error::{DiscoveryError, Result};
use crate::traits::store::{BusinessStore, TaskStore};
use crate::types::{
    business::{Business, BusinessId, NewBusiness, NewBusinessTag, NewBusinessTip},
    task::{Task, TaskId, TaskStatus, TaskUpdate},
};

#[derive(Default)]
struct State {
    tasks: BTreeMap<TaskId, Task>,
    businesses: BTreeMap<BusinessId, Business>,
    tips: Vec<NewBusinessTip>,
    tags: Vec<NewBusinessTag>,
    next_task_id: TaskId,
    next_business_id: BusinessId,
}

/// In-memory storage for tasks, businesses, tips, and tags.
///
/// Useful for testing and development. Not suitable for production
/// as data is lost on restart. Ids start at 1 and increase, like SQLite
/// rowids.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a `todo` task.
    pub fn create_task(&self, url: impl Into<String>, platform: impl Into<String>) -> TaskId {
        let mut state = self.state.write().unwrap();
        state.next_task_id += 1;
        let id = state.next_task_id;
        state.tasks.insert(
            id,
            Task {
                id,
                url: url.into(),
                platform: platform.into(),
                status: TaskStatus::Todo,
                input_json: None,
                gpt_response: None,
                business_id: None,
                error: None,
            },
        );
        id
    }

    pub fn find_task(&self, id: TaskId) -> Option<Task> {
        self.state.read().unwrap().tasks.get(&id).cloned()
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.state.read().unwrap().tasks.values().cloned().collect()
    }

    pub fn find_business(&self, id: BusinessId) -> Option<Business> {
        self.state.read().unwrap().businesses.get(&id).cloned()
    }

    /// Tip texts for a business, in insertion order.
    pub fn tips_for(&self, business_id: BusinessId) -> Vec<String> {
        self.state
            .read()
            .unwrap()
            .tips
            .iter()
            .filter(|t| t.business_id == business_id)
            .map(|t| t.tip.clone())
            .collect()
    }

    /// Tag texts for a business, in insertion order.
    pub fn tags_for(&self, business_id: BusinessId) -> Vec<String> {
        self.state
            .read()
            .unwrap()
            .tags
            .iter()
            .filter(|t| t.business_id == business_id)
            .map(|t| t.tag.clone())
            .collect()
    }

    pub fn task_count(&self) -> usize {
        self.state.read().unwrap().tasks.len()
    }

    pub fn business_count(&self) -> usize {
        self.state.read().unwrap().businesses.len()
    }

    pub fn tip_count(&self) -> usize {
        self.state.read().unwrap().tips.len()
    }

    pub fn tag_count(&self) -> usize {
        self.state.read().unwrap().tags.len()
    }
}

fn missing_business(business_id: BusinessId) -> DiscoveryError {
    DiscoveryError::Persistence(format!("business {} does not exist", business_id).into())
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn find_one_by_status(&self, status: TaskStatus) -> Result<Option<Task>> {
        Ok(self
            .state
            .read()
            .unwrap()
            .tasks
            .values()
            .find(|t| t.status == status)
            .cloned())
    }

    async fn update_task(&self, id: TaskId, update: &TaskUpdate) -> Result<()> {
        let mut state = self.state.write().unwrap();
        let task = state.tasks.get_mut(&id).ok_or_else(|| {
            DiscoveryError::Persistence(format!("task {} does not exist", id).into())
        })?;
        update.apply_to(task);
        Ok(())
    }
}

#[async_trait]
impl BusinessStore for MemoryStore {
    async fn insert_business(&self, business: &NewBusiness) -> Result<BusinessId> {
        let mut state = self.state.write().unwrap();
        state.next_business_id += 1;
        let id = state.next_business_id;
        state.businesses.insert(id, Business::from_new(id, business));
        Ok(id)
    }

    async fn insert_tips(&self, tips: &[NewBusinessTip]) -> Result<()> {
        let mut state = self.state.write().unwrap();
        if let Some(orphan) = tips
            .iter()
            .find(|t| !state.businesses.contains_key(&t.business_id))
        {
            return Err(missing_business(orphan.business_id));
        }
        state.tips.extend_from_slice(tips);
        Ok(())
    }

    async fn insert_tags(&self, tags: &[NewBusinessTag]) -> Result<()> {
        let mut state = self.state.write().unwrap();
        if let Some(orphan) = tags
            .iter()
            .find(|t| !state.businesses.contains_key(&t.business_id))
        {
            return Err(missing_business(orphan.business_id));
        }
        state.tags.extend_from_slice(tags);
        Ok(())
    }
}
