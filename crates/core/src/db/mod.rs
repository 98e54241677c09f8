//! Record store for prompts
//!
//! `PromptStore` is the persistence boundary: bulk read plus insert, update
//! and delete by primary key. Two implementations ship: `SqliteStore` for
//! real use and `MemoryStore` for tests and throwaway sessions.

use async_trait::async_trait;

use crate::errors::Result;

mod memory;
pub mod prompts;
pub mod schema;
mod sqlite;

pub use memory::MemoryStore;
pub use prompts::{NewPrompt, Prompt, PromptId, PromptUpdate};
pub use sqlite::SqliteStore;

/// Persistence operations over the prompts table
///
/// Implementations receive already-validated, trimmed drafts. Missing rows
/// are reported through the return value, not as errors, so the caller
/// decides how to surface them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PromptStore: Send + Sync {
    /// Every stored prompt, ordered by ascending id
    async fn find_all(&self) -> Result<Vec<Prompt>>;

    /// Persist a draft and return it with its assigned id
    async fn insert(&self, draft: &NewPrompt) -> Result<Prompt>;

    /// Replace the text fields of a row; `None` if the id does not exist
    async fn update_by_id(&self, id: PromptId, fields: &NewPrompt) -> Result<Option<Prompt>>;

    /// Remove a row; `false` if the id does not exist
    async fn delete_by_id(&self, id: PromptId) -> Result<bool>;
}
