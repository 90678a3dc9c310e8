//! ui
//!
//! User interaction utilities: output formatting, scoped progress
//! indicators, and interactive prompts.

pub mod output;
pub mod progress;
pub mod prompts;

pub use output::Verbosity;
pub use progress::{with_progress, with_progress_sync, Progress};
