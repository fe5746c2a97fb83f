//! Task lifecycle controller.
//!
//! One call to [`run_once`] drains at most one task:
//!
//! ```text
//! notify "started"
//!     └─► find one `todo` task ──(none)──► notify "no task" ─► done
//!             └─► mark `processing`
//!                     └─► extract thread ─► prompt ─► complete ─► parse
//!                             └─► persist business (if found)
//!                                     └─► write terminal status ─► notify outcome
//! ```
//!
//! Every failure after the task is marked `processing` becomes an `errored`
//! terminal state; nothing propagates out of `run_once`.
//!
//! Known gaps:
//! - a crash between marking `processing` and the terminal write leaves the
//!   task in `processing`; nothing requeues it
//! - selection takes no lock, so overlapping runs can pick the same task

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::error::Result;
use crate::pipeline::analysis::parse_analysis_output;
use crate::pipeline::persist::persist_business;
use crate::pipeline::prompt::PromptTemplate;
use crate::platforms::Platform;
use crate::traits::{
    ai::CompletionModel,
    fetcher::DocumentFetcher,
    notifier::{notify_best_effort, Notifier},
    store::DiscoveryStore,
};
use crate::types::{
    analysis::AnalysisOutput,
    business::BusinessId,
    task::{Task, TaskId, TaskStatus, TaskUpdate},
};

/// Sent at the start of every run.
pub const MSG_STARTED: &str = "Scheduled job started";
/// Sent when the queue has no `todo` task.
pub const MSG_NO_TASK: &str = "Scheduled job ended: No task available!";
/// Sent after a task ends `ok_found`.
pub const MSG_FOUND: &str = "Scheduled job ended successfully: A new business added!";
/// Sent after a task ends `ok_not_found`.
pub const MSG_NOT_FOUND: &str = "Scheduled job ended successfully: A business not found!";

fn failure_message(error: &str) -> String {
    format!("Scheduled job failed: {}!", error)
}

/// Collaborators for one pipeline run, passed in explicitly.
#[derive(Clone)]
pub struct PipelineDeps {
    pub store: Arc<dyn DiscoveryStore>,
    pub fetcher: Arc<dyn DocumentFetcher>,
    pub ai: Arc<dyn CompletionModel>,
    pub notifier: Arc<dyn Notifier>,
    pub prompt: PromptTemplate,
}

impl PipelineDeps {
    pub fn new(
        store: Arc<dyn DiscoveryStore>,
        fetcher: Arc<dyn DocumentFetcher>,
        ai: Arc<dyn CompletionModel>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            fetcher,
            ai,
            notifier,
            prompt: PromptTemplate::bundled(),
        }
    }

    pub fn with_prompt(mut self, prompt: PromptTemplate) -> Self {
        self.prompt = prompt;
        self
    }
}

/// What a single run did.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// No `todo` task was available (or the store could not be read).
    NoTask,
    /// Task ended `ok_found`.
    Found {
        task_id: TaskId,
        business_id: BusinessId,
    },
    /// Task ended `ok_not_found`.
    NotFound { task_id: TaskId },
    /// Task ended `errored`.
    Errored { task_id: TaskId, error: String },
    /// The task could not be marked `processing` and was left untouched.
    Abandoned { task_id: TaskId, error: String },
}

impl RunOutcome {
    pub fn task_id(&self) -> Option<TaskId> {
        match self {
            RunOutcome::NoTask => None,
            RunOutcome::Found { task_id, .. }
            | RunOutcome::NotFound { task_id }
            | RunOutcome::Errored { task_id, .. }
            | RunOutcome::Abandoned { task_id, .. } => Some(*task_id),
        }
    }
}

/// Audit fields captured while processing, written with the terminal state
/// even when a later step fails.
#[derive(Debug, Default)]
struct TaskAudit {
    input_json: Option<String>,
    gpt_response: Option<String>,
}

/// Process at most one pending task to a terminal state.
pub async fn run_once(deps: &PipelineDeps) -> RunOutcome {
    notify_best_effort(&*deps.notifier, MSG_STARTED).await;

    let Some(task) = next_task(&*deps.store).await else {
        info!("No discovery task available");
        notify_best_effort(&*deps.notifier, MSG_NO_TASK).await;
        return RunOutcome::NoTask;
    };

    info!(
        task_id = task.id,
        url = %task.url,
        platform = %task.platform,
        "Processing discovery task"
    );

    if let Err(e) = deps
        .store
        .update_task(task.id, &TaskUpdate::processing())
        .await
    {
        let message = e.to_string();
        error!(task_id = task.id, error = %message, "Failed to mark task as processing");
        notify_best_effort(&*deps.notifier, &failure_message(&message)).await;
        return RunOutcome::Abandoned {
            task_id: task.id,
            error: message,
        };
    }

    let mut audit = TaskAudit::default();
    let (update, outcome, message) = match process_task(deps, &task, &mut audit).await {
        Ok(Some(business_id)) => {
            info!(task_id = task.id, business_id = business_id, "Business found");
            (
                TaskUpdate::found(business_id),
                RunOutcome::Found {
                    task_id: task.id,
                    business_id,
                },
                MSG_FOUND.to_string(),
            )
        }
        Ok(None) => {
            info!(task_id = task.id, "No business found");
            (
                TaskUpdate::not_found(),
                RunOutcome::NotFound { task_id: task.id },
                MSG_NOT_FOUND.to_string(),
            )
        }
        Err(e) => {
            let error = e.to_string();
            warn!(task_id = task.id, error = %error, "Discovery task failed");
            (
                TaskUpdate::errored(error.clone()),
                RunOutcome::Errored {
                    task_id: task.id,
                    error: error.clone(),
                },
                failure_message(&error),
            )
        }
    };

    let update = update
        .with_input_json(audit.input_json)
        .with_gpt_response(audit.gpt_response);

    if let Err(e) = deps.store.update_task(task.id, &update).await {
        error!(
            task_id = task.id,
            status = ?update.status,
            error = %e,
            "Failed to write terminal task status"
        );
    }

    notify_best_effort(&*deps.notifier, &message).await;
    outcome
}

/// Pick any one `todo` task; a store failure counts as "none available".
async fn next_task(store: &dyn DiscoveryStore) -> Option<Task> {
    match store.find_one_by_status(TaskStatus::Todo).await {
        Ok(task) => task,
        Err(e) => {
            warn!(error = %e, "Failed to read next discovery task");
            None
        }
    }
}

/// Run the extraction and analysis steps, persisting a business if found.
async fn process_task(
    deps: &PipelineDeps,
    task: &Task,
    audit: &mut TaskAudit,
) -> Result<Option<BusinessId>> {
    let platform: Platform = task.platform.parse()?;
    let thread = platform.extract_thread(&*deps.fetcher, &task.url).await?;

    let input_json = thread.to_json()?;
    let prompt = deps.prompt.render(&input_json);
    audit.input_json = Some(input_json);

    let response = deps.ai.complete(&prompt).await?;
    let analysis = parse_analysis_output(&response);
    audit.gpt_response = Some(response);

    match analysis? {
        AnalysisOutput::NotFound => Ok(None),
        AnalysisOutput::Found(found) => {
            let business = found.into_discovered(&task.url);
            let business_id = persist_business(&*deps.store, &business).await?;
            Ok(Some(business_id))
        }
    }
}
