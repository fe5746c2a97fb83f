//! Testing utilities including mock implementations.
//!
//! These let applications exercise the pipeline without network, model, or
//! webhook calls.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, RwLock};

use crate::error::{DiscoveryError, Result};
use crate::stores::MemoryStore;
use crate::traits::{
    ai::CompletionModel,
    fetcher::{DocumentFetcher, FetchedDocument},
    notifier::Notifier,
    store::{BusinessStore, TaskStore},
};
use crate::types::{
    business::{BusinessId, NewBusiness, NewBusinessTag, NewBusinessTip},
    task::{Task, TaskId, TaskStatus, TaskUpdate},
};

/// A mock completion model.
///
/// Queued responses are returned in order; once the queue is empty the
/// default response is used.
#[derive(Default, Clone)]
pub struct MockAI {
    responses: Arc<RwLock<VecDeque<String>>>,
    default_response: Arc<RwLock<String>>,
    failure: Arc<RwLock<Option<String>>>,
    prompts: Arc<RwLock<Vec<String>>>,
}

impl MockAI {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the next call.
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.responses.write().unwrap().push_back(response.into());
        self
    }

    /// Response used when the queue is empty.
    pub fn with_default_response(self, response: impl Into<String>) -> Self {
        *self.default_response.write().unwrap() = response.into();
        self
    }

    /// Make every call fail with the given message.
    pub fn failing(self, message: impl Into<String>) -> Self {
        *self.failure.write().unwrap() = Some(message.into());
        self
    }

    /// Prompts received, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.prompts.read().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.read().unwrap().len()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.read().unwrap().last().cloned()
    }
}

#[async_trait]
impl CompletionModel for MockAI {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.write().unwrap().push(prompt.to_string());

        if let Some(message) = self.failure.read().unwrap().clone() {
            return Err(DiscoveryError::Completion(message));
        }

        let queued = self.responses.write().unwrap().pop_front();
        Ok(queued.unwrap_or_else(|| self.default_response.read().unwrap().clone()))
    }
}

/// A mock fetcher serving canned pages by URL.
///
/// Unknown URLs fail like a refused connection.
#[derive(Default, Clone)]
pub struct MockFetcher {
    pages: Arc<RwLock<HashMap<String, FetchedDocument>>>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` with status 200 for `url`.
    pub fn with_page(self, url: impl Into<String>, body: impl Into<String>) -> Self {
        let url = url.into();
        let document = FetchedDocument::ok(url.clone(), body);
        self.pages.write().unwrap().insert(url, document);
        self
    }

    /// Serve `body` with an arbitrary status for `url`.
    pub fn with_status(self, url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        let url = url.into();
        let document = FetchedDocument::new(url.clone(), status, body);
        self.pages.write().unwrap().insert(url, document);
        self
    }

    /// URLs requested, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }
}

#[async_trait]
impl DocumentFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedDocument> {
        self.calls.write().unwrap().push(url.to_string());

        self.pages
            .read()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| DiscoveryError::Http(format!("connection refused: {}", url).into()))
    }
}

/// A notifier that records every message.
#[derive(Default, Clone)]
pub struct MockNotifier {
    messages: Arc<RwLock<Vec<String>>>,
    fail: bool,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record messages but report every send as failed.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.read().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn notify(&self, message: &str) -> Result<()> {
        self.messages.write().unwrap().push(message.to_string());
        if self.fail {
            return Err(DiscoveryError::Notification("webhook unreachable".into()));
        }
        Ok(())
    }
}

/// A `MemoryStore` wrapper that can be told to fail specific operations.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    fail_selection: bool,
    failing_statuses: HashSet<TaskStatus>,
    fail_business_insert: bool,
}

impl FlakyStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    /// Fail every `find_one_by_status` call.
    pub fn fail_selection(mut self) -> Self {
        self.fail_selection = true;
        self
    }

    /// Fail updates that set the given status.
    pub fn fail_updates_to(mut self, status: TaskStatus) -> Self {
        self.failing_statuses.insert(status);
        self
    }

    /// Fail every business insert.
    pub fn fail_business_insert(mut self) -> Self {
        self.fail_business_insert = true;
        self
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }
}

fn injected(operation: &str) -> DiscoveryError {
    DiscoveryError::Persistence(format!("injected failure: {}", operation).into())
}

#[async_trait]
impl TaskStore for FlakyStore {
    async fn find_one_by_status(&self, status: TaskStatus) -> Result<Option<Task>> {
        if self.fail_selection {
            return Err(injected("find_one_by_status"));
        }
        self.inner.find_one_by_status(status).await
    }

    async fn update_task(&self, id: TaskId, update: &TaskUpdate) -> Result<()> {
        if update
            .status
            .is_some_and(|status| self.failing_statuses.contains(&status))
        {
            return Err(injected("update_task"));
        }
        self.inner.update_task(id, update).await
    }
}

#[async_trait]
impl BusinessStore for FlakyStore {
    async fn insert_business(&self, business: &NewBusiness) -> Result<BusinessId> {
        if self.fail_business_insert {
            return Err(injected("insert_business"));
        }
        self.inner.insert_business(business).await
    }

    async fn insert_tips(&self, tips: &[NewBusinessTip]) -> Result<()> {
        self.inner.insert_tips(tips).await
    }

    async fn insert_tags(&self, tags: &[NewBusinessTag]) -> Result<()> {
        self.inner.insert_tags(tags).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_ai_drains_queue_then_uses_default() {
        let ai = MockAI::new()
            .with_response("first")
            .with_default_response("fallback");

        assert_eq!(ai.complete("a").await.unwrap(), "first");
        assert_eq!(ai.complete("b").await.unwrap(), "fallback");
        assert_eq!(ai.calls(), vec!["a", "b"]);
        assert_eq!(ai.last_prompt().as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn mock_fetcher_rejects_unknown_urls() {
        let fetcher = MockFetcher::new().with_page("https://known", "<html></html>");

        assert_eq!(fetcher.fetch("https://known").await.unwrap().status, 200);
        assert!(matches!(
            fetcher.fetch("https://unknown").await,
            Err(DiscoveryError::Http(_))
        ));
        assert_eq!(fetcher.call_count(), 2);
    }
}
