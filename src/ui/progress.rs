//! ui::progress
//!
//! Scoped progress indicators.
//!
//! # Design
//!
//! Long-running steps are wrapped in [`with_progress`]: a spinner is
//! started before the operation and is guaranteed to reach a terminal
//! state (success, info, warning, or failure) on every exit path. The
//! operation receives a [`Progress`] handle to report how it finished;
//! if it returns without reporting, the spinner is cleared silently, and
//! if it returns an error the spinner is failed with `fail_text` before
//! the error propagates.

use std::future::Future;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Handle to a running progress spinner.
///
/// Cloning is cheap; the underlying bar is reference-counted.
#[derive(Debug, Clone)]
pub struct Progress {
    bar: ProgressBar,
}

impl Progress {
    fn start(text: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(text.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }

    /// Finish the spinner with a success message.
    pub fn succeed(&self, message: impl Into<String>) {
        self.bar.finish_with_message(format!("✔ {}", message.into()));
    }

    /// Finish the spinner with an informational message.
    pub fn info(&self, message: impl Into<String>) {
        self.bar.finish_with_message(format!("ℹ {}", message.into()));
    }

    /// Finish the spinner with a warning message.
    pub fn warn(&self, message: impl Into<String>) {
        self.bar.finish_with_message(format!("⚠ {}", message.into()));
    }

    fn fail(&self, message: &str) {
        self.bar.abandon_with_message(format!("✖ {}", message));
    }

    fn clear_if_running(&self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

/// Run `operation` under a progress spinner.
///
/// The spinner starts with `start_text`. On `Ok` the spinner is left in
/// whatever terminal state the operation chose (or cleared if it chose
/// none); on `Err` the spinner fails with `fail_text` and the error is
/// returned unchanged.
pub async fn with_progress<T, E, F, Fut>(
    start_text: &str,
    fail_text: &str,
    operation: F,
) -> Result<T, E>
where
    F: FnOnce(Progress) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let progress = Progress::start(start_text);
    match operation(progress.clone()).await {
        Ok(value) => {
            progress.clear_if_running();
            Ok(value)
        }
        Err(error) => {
            progress.fail(fail_text);
            Err(error)
        }
    }
}

/// Synchronous variant of [`with_progress`] for operations with no
/// suspension points.
pub fn with_progress_sync<T, E, F>(start_text: &str, fail_text: &str, operation: F) -> Result<T, E>
where
    F: FnOnce(Progress) -> Result<T, E>,
{
    let progress = Progress::start(start_text);
    match operation(progress.clone()) {
        Ok(value) => {
            progress.clear_if_running();
            Ok(value)
        }
        Err(error) => {
            progress.fail(fail_text);
            Err(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_path_reaches_terminal_state() {
        let result: Result<u32, std::io::Error> =
            with_progress_sync("working", "failed", |progress| {
                progress.succeed("done");
                Ok(7)
            });
        assert_eq!(result.unwrap(), 7);
    }

    #[test]
    fn error_path_propagates_error() {
        let result: Result<(), std::io::Error> = with_progress_sync("working", "failed", |_| {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "boom"))
        });
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn async_operation_keeps_reported_state() {
        let result: Result<&str, std::io::Error> =
            with_progress("working", "failed", |progress| async move {
                progress.info("skipped");
                Ok("value")
            })
            .await;
        assert_eq!(result.unwrap(), "value");
    }
}
