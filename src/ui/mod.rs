use inquire::InquireError;

use crate::error::{Error, Result};

mod spinner;
mod style;

pub use spinner::Spinner;
pub use style::Style;

/// Check if the inquire error is a user cancellation/interruption.
const fn is_prompt_cancelled(err: &InquireError) -> bool {
    matches!(
        err,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

/// Runs a function that uses interactive prompts and treats user cancellation
/// (Ctrl+C or Escape) as `Ok(None)` instead of an error.
pub fn handle_prompt_cancellation<T, F>(f: F) -> Result<Option<T>>
where
    F: FnOnce() -> Result<T>,
{
    match f() {
        Ok(value) => Ok(Some(value)),
        Err(Error::Prompt(e)) if is_prompt_cancelled(&e) => {
            eprintln!();
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
