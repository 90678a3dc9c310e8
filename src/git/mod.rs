//! git
//!
//! Single interface for all Git operations.

mod interface;

pub use interface::{clone, Git, GitError};
