//! Core trait abstractions for the discovery pipeline.
//!
//! These are the seams where the pipeline meets external collaborators:
//! storage, page fetching, the language model, and the notification channel.

pub mod ai;
pub mod fetcher;
pub mod notifier;
pub mod store;
