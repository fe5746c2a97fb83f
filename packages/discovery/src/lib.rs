//! Indie Business Discovery
//!
//! Drains a queue of discussion-thread URLs one task at a time: the thread is
//! scraped into a compact question/answer summary, a language model judges
//! whether it describes a revenue-generating indie business, and any business
//! found is stored with its tips and tags.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use discovery::{run_once, PipelineDeps, MemoryStore, LogNotifier};
//! use discovery::testing::{MockAI, MockFetcher};
//!
//! let store = Arc::new(MemoryStore::new());
//! store.create_task("https://news.ycombinator.com/item?id=1", "hackernews");
//!
//! let deps = PipelineDeps::new(
//!     store,
//!     Arc::new(MockFetcher::new()),
//!     Arc::new(MockAI::new()),
//!     Arc::new(LogNotifier),
//! );
//! let outcome = run_once(&deps).await;
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Collaborator seams (store, fetcher, model, notifier)
//! - [`types`] - Tasks, businesses, thread summaries, analysis verdicts
//! - [`platforms`] - Per-platform thread extraction
//! - [`pipeline`] - Response parsing, persistence, and the task controller
//! - [`stores`] - Storage implementations (MemoryStore, SqliteStore)
//! - [`fetchers`] - HTTP page fetching
//! - [`notifiers`] - Discord and log notifiers
//! - [`testing`] - Mock implementations for testing

pub mod error;
pub mod fetchers;
pub mod notifiers;
pub mod pipeline;
pub mod platforms;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

#[cfg(feature = "openai")]
pub mod ai;

// Re-export core types at crate root
pub use error::{DiscoveryError, Result};
pub use pipeline::{
    extract_json_block, parse_analysis_output, persist_business, run_once, PipelineDeps,
    PromptTemplate, RunOutcome,
};
pub use platforms::{extract_thread, pair_question_answers, CommentNode, Platform};
pub use traits::{
    ai::CompletionModel,
    fetcher::{DocumentFetcher, FetchedDocument},
    notifier::Notifier,
    store::{BusinessStore, DiscoveryStore, TaskStore},
};
pub use types::{
    analysis::{AnalysisOutput, BusinessFound},
    business::{Business, BusinessId, DiscoveredBusiness, NewBusiness, NewBusinessTag, NewBusinessTip},
    task::{Task, TaskId, TaskStatus, TaskUpdate},
    thread::{ExtractedThread, QuestionAnswer},
};

pub use fetchers::HttpFetcher;
pub use notifiers::LogNotifier;
pub use stores::MemoryStore;

#[cfg(feature = "discord")]
pub use notifiers::DiscordNotifier;

#[cfg(feature = "sqlite")]
pub use stores::SqliteStore;
