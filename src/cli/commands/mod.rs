//! cli::commands
//!
//! One module per subcommand.

pub mod preview;
pub mod product;
pub mod repository;
pub mod update_dependents;
