//! End-to-end tests for the task controller, using in-memory collaborators.

use std::sync::Arc;

use discovery::pipeline::controller::{MSG_FOUND, MSG_NOT_FOUND, MSG_NO_TASK, MSG_STARTED};
use discovery::testing::{FlakyStore, MockAI, MockFetcher, MockNotifier};
use discovery::{
    run_once, ExtractedThread, MemoryStore, PipelineDeps, PromptTemplate, RunOutcome, TaskStatus,
};

const THREAD_URL: &str = "https://news.ycombinator.com/item?id=38000000";

const FOUND_RESPONSE: &str = r#"Here is my analysis:
{
  "business_found": true,
  "product_name": "Invoicer",
  "product_description": "Invoicing for plumbers",
  "link_to_product": "https://invoicer.example",
  "revenue_in_usd": 5000,
  "detailed_tactics_used_for_revenue": "Cold email to trade associations",
  "technical_details": "Rust and Postgres",
  "additional_tips": ["Charge more", "Talk to customers"],
  "tags": ["saas", "b2b"]
}
Let me know if you need anything else."#;

fn thread_page() -> String {
    r#"<html><body><table id="hnmain"><tr><td>
      <table class="fatitem">
        <tr class="athing submission"><td class="title">Ask HN: Your profitable side project?</td></tr>
        <tr><td class="subtext"><a href="user?id=founder" class="hnuser">founder</a></td></tr>
        <tr><td><div class="toptext">I run an invoicing tool for plumbers.</div></td></tr>
      </table>
      <table class="comment-tree">
        <tr class="athing comtr"><td><table><tr>
          <td class="ind" indent="0"></td>
          <td class="default"><a class="hnuser">alice</a><div class="comment">What is your MRR?</div></td>
        </tr></table></td></tr>
        <tr class="athing comtr"><td><table><tr>
          <td class="ind" indent="1"></td>
          <td class="default"><a class="hnuser">founder</a><div class="comment">About $5k.</div></td>
        </tr></table></td></tr>
      </table>
    </td></tr></table></body></html>"#
        .to_string()
}

struct Harness {
    store: Arc<MemoryStore>,
    fetcher: MockFetcher,
    ai: MockAI,
    notifier: MockNotifier,
}

impl Harness {
    fn new(ai: MockAI) -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            fetcher: MockFetcher::new().with_page(THREAD_URL, thread_page()),
            ai,
            notifier: MockNotifier::new(),
        }
    }

    fn deps(&self) -> PipelineDeps {
        PipelineDeps::new(
            self.store.clone(),
            Arc::new(self.fetcher.clone()),
            Arc::new(self.ai.clone()),
            Arc::new(self.notifier.clone()),
        )
    }
}

#[tokio::test]
async fn found_business_is_persisted_and_task_completed() {
    let harness = Harness::new(MockAI::new().with_response(FOUND_RESPONSE));
    let task_id = harness.store.create_task(THREAD_URL, "hackernews");

    let outcome = run_once(&harness.deps()).await;

    let RunOutcome::Found { business_id, .. } = outcome else {
        panic!("expected a found outcome, got {:?}", outcome);
    };
    let task = harness.store.find_task(task_id).unwrap();
    assert_eq!(task.status, TaskStatus::OkFound);
    assert_eq!(task.business_id, Some(business_id));
    assert_eq!(task.error, None);
    assert_eq!(task.gpt_response.as_deref(), Some(FOUND_RESPONSE));
    assert!(task.is_consistent());

    let expected_input = ExtractedThread::new("I run an invoicing tool for plumbers.")
        .with_answer("What is your MRR?", "About $5k.")
        .to_json()
        .unwrap();
    assert_eq!(task.input_json.as_deref(), Some(expected_input.as_str()));
    assert!(harness.ai.last_prompt().unwrap().contains(&expected_input));

    let business = harness.store.find_business(business_id).unwrap();
    assert_eq!(business.scraped_url, THREAD_URL);
    assert_eq!(business.name.as_deref(), Some("Invoicer"));
    assert_eq!(business.url.as_deref(), Some("https://invoicer.example"));
    assert_eq!(business.revenue, Some(5000.0));
    assert_eq!(
        harness.store.tips_for(business_id),
        vec!["Charge more", "Talk to customers"]
    );
    assert_eq!(harness.store.tags_for(business_id), vec!["saas", "b2b"]);

    assert_eq!(harness.notifier.messages(), vec![MSG_STARTED, MSG_FOUND]);
}

#[tokio::test]
async fn no_business_ends_ok_not_found() {
    let harness = Harness::new(MockAI::new().with_response(r#"{"business_found": false}"#));
    let task_id = harness.store.create_task(THREAD_URL, "hackernews");

    let outcome = run_once(&harness.deps()).await;

    assert_eq!(outcome, RunOutcome::NotFound { task_id });
    let task = harness.store.find_task(task_id).unwrap();
    assert_eq!(task.status, TaskStatus::OkNotFound);
    assert_eq!(task.business_id, None);
    assert!(task.is_consistent());
    assert_eq!(harness.store.business_count(), 0);
    assert_eq!(harness.notifier.messages(), vec![MSG_STARTED, MSG_NOT_FOUND]);
}

#[tokio::test]
async fn empty_queue_reports_no_task() {
    let harness = Harness::new(MockAI::new());

    let outcome = run_once(&harness.deps()).await;

    assert_eq!(outcome, RunOutcome::NoTask);
    assert_eq!(harness.notifier.messages(), vec![MSG_STARTED, MSG_NO_TASK]);
    assert_eq!(harness.fetcher.call_count(), 0);
    assert_eq!(harness.ai.call_count(), 0);
}

#[tokio::test]
async fn unsupported_platform_errors_without_side_effects() {
    let harness = Harness::new(MockAI::new().with_response(FOUND_RESPONSE));
    let task_id = harness.store.create_task(THREAD_URL, "reddit");

    let outcome = run_once(&harness.deps()).await;

    let RunOutcome::Errored { error, .. } = outcome else {
        panic!("expected an errored outcome, got {:?}", outcome);
    };
    assert!(error.contains("reddit"));

    let task = harness.store.find_task(task_id).unwrap();
    assert_eq!(task.status, TaskStatus::Errored);
    assert!(task.error.as_deref().unwrap().contains("reddit"));
    assert_eq!(task.input_json, None);
    assert_eq!(task.gpt_response, None);
    assert!(task.is_consistent());

    assert_eq!(harness.fetcher.call_count(), 0);
    assert_eq!(harness.ai.call_count(), 0);
    assert_eq!(harness.store.business_count(), 0);

    let messages = harness.notifier.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0], MSG_STARTED);
    assert!(messages[1].starts_with("Scheduled job failed: "));
    assert!(messages[1].contains("reddit"));
}

#[tokio::test]
async fn failed_fetch_marks_task_errored() {
    let harness = Harness::new(MockAI::new().with_response(FOUND_RESPONSE));
    let harness = Harness {
        fetcher: MockFetcher::new().with_status(THREAD_URL, 404, "Not Found"),
        ..harness
    };
    let task_id = harness.store.create_task(THREAD_URL, "hackernews");

    let outcome = run_once(&harness.deps()).await;

    assert!(matches!(outcome, RunOutcome::Errored { .. }));
    let task = harness.store.find_task(task_id).unwrap();
    assert_eq!(task.status, TaskStatus::Errored);
    assert!(task.error.as_deref().unwrap().contains("404"));
    assert_eq!(harness.ai.call_count(), 0);
}

#[tokio::test]
async fn malformed_response_keeps_audit_fields() {
    let response = "I could not decide, sorry.";
    let harness = Harness::new(MockAI::new().with_response(response));
    let task_id = harness.store.create_task(THREAD_URL, "hackernews");

    run_once(&harness.deps()).await;

    let task = harness.store.find_task(task_id).unwrap();
    assert_eq!(task.status, TaskStatus::Errored);
    assert_eq!(task.gpt_response.as_deref(), Some(response));
    assert!(task.input_json.is_some());
    assert_eq!(harness.store.business_count(), 0);
}

#[tokio::test]
async fn completion_failure_marks_task_errored() {
    let harness = Harness::new(MockAI::new().failing("rate limited"));
    let task_id = harness.store.create_task(THREAD_URL, "hackernews");

    run_once(&harness.deps()).await;

    let task = harness.store.find_task(task_id).unwrap();
    assert_eq!(task.status, TaskStatus::Errored);
    assert!(task.error.as_deref().unwrap().contains("rate limited"));
    assert!(task.input_json.is_some());
    assert_eq!(task.gpt_response, None);
}

#[tokio::test]
async fn one_run_processes_exactly_one_task() {
    let harness = Harness::new(MockAI::new().with_default_response(r#"{"business_found": false}"#));
    let ids: Vec<_> = (0..3)
        .map(|_| harness.store.create_task(THREAD_URL, "hackernews"))
        .collect();

    run_once(&harness.deps()).await;

    let statuses: Vec<_> = ids
        .iter()
        .map(|id| harness.store.find_task(*id).unwrap().status)
        .collect();
    assert_eq!(
        statuses
            .iter()
            .filter(|s| **s == TaskStatus::OkNotFound)
            .count(),
        1
    );
    assert_eq!(
        statuses.iter().filter(|s| **s == TaskStatus::Todo).count(),
        2
    );
}

#[tokio::test]
async fn successive_runs_drain_the_queue() {
    let harness = Harness::new(MockAI::new().with_default_response(r#"{"business_found": false}"#));
    harness.store.create_task(THREAD_URL, "hackernews");
    harness.store.create_task(THREAD_URL, "hackernews");
    let deps = harness.deps();

    assert!(matches!(run_once(&deps).await, RunOutcome::NotFound { .. }));
    assert!(matches!(run_once(&deps).await, RunOutcome::NotFound { .. }));
    assert_eq!(run_once(&deps).await, RunOutcome::NoTask);

    assert!(harness
        .store
        .tasks()
        .iter()
        .all(|t| t.status.is_terminal() && t.is_consistent()));
}

#[tokio::test]
async fn custom_prompt_template_is_used() {
    let harness = Harness::new(MockAI::new().with_response(r#"{"business_found": false}"#));
    harness.store.create_task(THREAD_URL, "hackernews");
    let deps = harness
        .deps()
        .with_prompt(PromptTemplate::new("Judge this: {{ InputJson }}"));

    run_once(&deps).await;

    let prompt = harness.ai.last_prompt().unwrap();
    assert!(prompt.starts_with("Judge this: {\"mainComment\""));
}

#[tokio::test]
async fn notification_failures_do_not_affect_the_task() {
    let harness = Harness::new(MockAI::new().with_response(FOUND_RESPONSE));
    let harness = Harness {
        notifier: MockNotifier::failing(),
        ..harness
    };
    let task_id = harness.store.create_task(THREAD_URL, "hackernews");

    let outcome = run_once(&harness.deps()).await;

    assert!(matches!(outcome, RunOutcome::Found { .. }));
    assert_eq!(
        harness.store.find_task(task_id).unwrap().status,
        TaskStatus::OkFound
    );
    assert_eq!(harness.notifier.messages().len(), 2);
}

#[tokio::test]
async fn selection_failure_counts_as_no_task() {
    let memory = MemoryStore::new();
    memory.create_task(THREAD_URL, "hackernews");
    let store = Arc::new(FlakyStore::new(memory).fail_selection());
    let notifier = MockNotifier::new();
    let ai = MockAI::new();
    let deps = PipelineDeps::new(
        store.clone(),
        Arc::new(MockFetcher::new()),
        Arc::new(ai.clone()),
        Arc::new(notifier.clone()),
    );

    let outcome = run_once(&deps).await;

    assert_eq!(outcome, RunOutcome::NoTask);
    assert_eq!(notifier.messages(), vec![MSG_STARTED, MSG_NO_TASK]);
    assert_eq!(ai.call_count(), 0);
    assert_eq!(store.inner().tasks()[0].status, TaskStatus::Todo);
}

#[tokio::test]
async fn processing_mark_failure_abandons_task() {
    let memory = MemoryStore::new();
    let task_id = memory.create_task(THREAD_URL, "hackernews");
    let store = Arc::new(FlakyStore::new(memory).fail_updates_to(TaskStatus::Processing));
    let notifier = MockNotifier::new();
    let fetcher = MockFetcher::new().with_page(THREAD_URL, thread_page());
    let deps = PipelineDeps::new(
        store.clone(),
        Arc::new(fetcher.clone()),
        Arc::new(MockAI::new()),
        Arc::new(notifier.clone()),
    );

    let outcome = run_once(&deps).await;

    assert!(matches!(outcome, RunOutcome::Abandoned { task_id: id, .. } if id == task_id));
    assert_eq!(fetcher.call_count(), 0);
    assert_eq!(
        store.inner().find_task(task_id).unwrap().status,
        TaskStatus::Todo
    );
    let messages = notifier.messages();
    assert_eq!(messages.len(), 2);
    assert!(messages[1].starts_with("Scheduled job failed: "));
}

#[tokio::test]
async fn business_insert_failure_marks_task_errored() {
    let memory = MemoryStore::new();
    let task_id = memory.create_task(THREAD_URL, "hackernews");
    let store = Arc::new(FlakyStore::new(memory).fail_business_insert());
    let deps = PipelineDeps::new(
        store.clone(),
        Arc::new(MockFetcher::new().with_page(THREAD_URL, thread_page())),
        Arc::new(MockAI::new().with_response(FOUND_RESPONSE)),
        Arc::new(MockNotifier::new()),
    );

    let outcome = run_once(&deps).await;

    assert!(matches!(outcome, RunOutcome::Errored { .. }));
    let task = store.inner().find_task(task_id).unwrap();
    assert_eq!(task.status, TaskStatus::Errored);
    assert_eq!(task.business_id, None);
    assert_eq!(task.gpt_response.as_deref(), Some(FOUND_RESPONSE));
    assert_eq!(store.inner().business_count(), 0);
}

#[tokio::test]
async fn terminal_write_failure_still_notifies() {
    let memory = MemoryStore::new();
    let task_id = memory.create_task(THREAD_URL, "hackernews");
    let store = Arc::new(FlakyStore::new(memory).fail_updates_to(TaskStatus::OkNotFound));
    let notifier = MockNotifier::new();
    let deps = PipelineDeps::new(
        store.clone(),
        Arc::new(MockFetcher::new().with_page(THREAD_URL, thread_page())),
        Arc::new(MockAI::new().with_response(r#"{"business_found": false}"#)),
        Arc::new(notifier.clone()),
    );

    let outcome = run_once(&deps).await;

    assert_eq!(outcome, RunOutcome::NotFound { task_id });
    assert_eq!(
        store.inner().find_task(task_id).unwrap().status,
        TaskStatus::Processing
    );
    assert_eq!(notifier.messages(), vec![MSG_STARTED, MSG_NOT_FOUND]);
}
