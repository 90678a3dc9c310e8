//! ui::prompts
//!
//! Interactive prompts and confirmations.
//!
//! # Design
//!
//! Prompts are only shown in interactive mode. In non-interactive mode,
//! operations requiring user input must either have defaults or fail
//! with a clear error message.

use inquire::validator::Validation;
use inquire::{InquireError, Select, Text};
use thiserror::Error;

use crate::core::version;

/// Errors from prompts.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("prompt cancelled by user")]
    Cancelled,

    #[error("not in interactive mode: {hint}")]
    NotInteractive {
        /// How to supply the value without a prompt
        hint: String,
    },

    #[error("IO error: {0}")]
    IoError(String),
}

impl From<InquireError> for PromptError {
    fn from(err: InquireError) -> Self {
        match err {
            InquireError::OperationCanceled | InquireError::OperationInterrupted => {
                PromptError::Cancelled
            }
            other => PromptError::IoError(other.to_string()),
        }
    }
}

fn require_interactive(interactive: bool, hint: &str) -> Result<(), PromptError> {
    if interactive {
        Ok(())
    } else {
        Err(PromptError::NotInteractive {
            hint: hint.to_string(),
        })
    }
}

/// Prompt for the next version of a repository.
///
/// The current version is offered as the initial value. Input is
/// validated the same way the release itself validates: it must parse as
/// semver, must differ from the current version, and when
/// `no_pre_release` is set it must not carry a pre-release tag.
pub fn next_version(
    current_version: &str,
    no_pre_release: bool,
    interactive: bool,
) -> Result<String, PromptError> {
    require_interactive(interactive, "pass the next version as an argument")?;

    let current = current_version.to_string();
    let validator = move |input: &str| match version::validate_next(input, &current, no_pre_release)
    {
        Ok(_) => Ok(Validation::Valid),
        Err(error) => Ok(Validation::Invalid(error.to_string().into())),
    };

    let answer = Text::new("Next version? e.g. \"1.2.3\" or \"1.2.3-beta.1\"")
        .with_initial_value(current_version)
        .with_validator(validator)
        .prompt()?;
    Ok(answer)
}

/// Prompt for a human-readable release name.
pub fn release_name(interactive: bool) -> Result<String, PromptError> {
    require_interactive(interactive, "pass --name or --no-name")?;

    let answer = Text::new("Release name? i.e. issue tracker release")
        .with_validator(|input: &str| {
            if input.trim().is_empty() {
                Ok(Validation::Invalid("Release name is required".into()))
            } else {
                Ok(Validation::Valid)
            }
        })
        .prompt()?;
    Ok(answer)
}

/// Prompt to accept or skip releasing one repository of a product.
///
/// Returns `Ok(true)` when the user chooses to release.
pub fn confirm_repository_release(
    repository_name: &str,
    interactive: bool,
) -> Result<bool, PromptError> {
    require_interactive(interactive, "product releases are interactive only")?;

    let decline = format!("No! \"{repository_name}\" does not need to be released.");
    let accept = "Yes, release away!".to_string();
    let options = vec![decline.clone(), accept];

    let answer = Select::new(
        &format!(
            "Would you like to release \"{repository_name}\"? \
             See unreleased section from changelog above to decide."
        ),
        options,
    )
    .prompt()?;
    Ok(answer != decline)
}

/// Prompt for a ticket reference used to name dependency-bump branches.
///
/// Accepts one to three letters, a dash, and a number (e.g. `AB-123`);
/// the result is upper-cased.
pub fn ticket(interactive: bool) -> Result<String, PromptError> {
    require_interactive(interactive, "dependency updates are interactive only")?;

    let answer = Text::new("Ticket to associate with pull requests? (e.g. AB-4323)")
        .with_validator(|input: &str| {
            if is_valid_ticket(input) {
                Ok(Validation::Valid)
            } else {
                Ok(Validation::Invalid(
                    "Ticket must be one to three letters followed by a dash and a number".into(),
                ))
            }
        })
        .prompt()?;
    Ok(answer.to_uppercase())
}

/// Prompt to accept or skip bumping one dependent repository.
pub fn confirm_dependency_update(
    repository_name: &str,
    dependency: &str,
    current_range: &str,
    next_version: &str,
    interactive: bool,
) -> Result<bool, PromptError> {
    require_interactive(interactive, "dependency updates are interactive only")?;

    let decline = format!("No! \"{repository_name}\" does not need to be updated.");
    let accept = "Yes, update dependency!".to_string();
    let options = vec![decline.clone(), accept];

    let answer = Select::new(
        &format!(
            "Would you like to update \"{dependency}\" in \"{repository_name}\" \
             ({current_range} > {next_version})?"
        ),
        options,
    )
    .prompt()?;
    Ok(answer != decline)
}

fn is_valid_ticket(input: &str) -> bool {
    let Some((letters, digits)) = input.split_once('-') else {
        return false;
    };
    (1..=3).contains(&letters.len())
        && letters.chars().all(|c| c.is_ascii_alphabetic())
        && !digits.is_empty()
        && digits.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_interactive_prompts_fail_with_hint() {
        let error = release_name(false).unwrap_err();
        assert!(matches!(error, PromptError::NotInteractive { .. }));
        assert!(error.to_string().contains("--no-name"));
    }

    #[test]
    fn ticket_validation() {
        assert!(is_valid_ticket("ab-123"));
        assert!(is_valid_ticket("A-1"));
        assert!(is_valid_ticket("XYZ-4323"));
        assert!(!is_valid_ticket("abcd-1"));
        assert!(!is_valid_ticket("ab-"));
        assert!(!is_valid_ticket("ab123"));
        assert!(!is_valid_ticket("1a-2"));
    }
}
