pub mod book;
pub mod config;

use bookshelf_core::StorageError;

/// Wrap a failed load or save with what was being attempted and, when the
/// storage layer has one, a hint on how to recover
pub fn storage_failure(error: StorageError, action: String) -> anyhow::Error {
    let context = match error.recovery_suggestion() {
        Some(hint) => format!("{}. {}", action, hint),
        None => action,
    };
    anyhow::Error::new(error).context(context)
}
