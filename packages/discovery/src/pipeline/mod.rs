//! The task-processing pipeline.
//!
//! - [`analysis`] - lenient parsing of the model's structured payload
//! - [`persist`] - mapping a discovered business onto store rows
//! - [`prompt`] - the analysis prompt template
//! - [`controller`] - the task state machine tying it all together

pub mod analysis;
pub mod controller;
pub mod persist;
pub mod prompt;

pub use analysis::{extract_json_block, parse_analysis_output};
pub use controller::{run_once, PipelineDeps, RunOutcome};
pub use persist::persist_business;
pub use prompt::PromptTemplate;
