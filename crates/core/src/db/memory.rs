use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use super::{NewPrompt, Prompt, PromptId, PromptStore};
use crate::errors::Result;

/// In-memory prompt store
///
/// Ids come from a counter that only moves forward, so a deleted id is
/// never handed out again (same as `AUTOINCREMENT` in the SQLite store).
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    rows:    BTreeMap<PromptId, Prompt>,
    last_id: PromptId,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PromptStore for MemoryStore {
    async fn find_all(&self) -> Result<Vec<Prompt>> {
        let inner = self.inner.lock().await;
        Ok(inner.rows.values().cloned().collect())
    }

    async fn insert(&self, draft: &NewPrompt) -> Result<Prompt> {
        let mut inner = self.inner.lock().await;
        let now = Utc::now().timestamp();

        inner.last_id += 1;
        let prompt = Prompt {
            id:          inner.last_id,
            name:        draft.name.clone(),
            description: draft.description.clone(),
            content:     draft.content.clone(),
            created_at:  now,
            updated_at:  now,
        };
        inner.rows.insert(prompt.id, prompt.clone());

        Ok(prompt)
    }

    async fn update_by_id(&self, id: PromptId, fields: &NewPrompt) -> Result<Option<Prompt>> {
        let mut inner = self.inner.lock().await;

        Ok(inner.rows.get_mut(&id).map(|row| {
            row.name = fields.name.clone();
            row.description = fields.description.clone();
            row.content = fields.content.clone();
            row.updated_at = Utc::now().timestamp();
            row.clone()
        }))
    }

    async fn delete_by_id(&self, id: PromptId) -> Result<bool> {
        let mut inner = self.inner.lock().await;
        Ok(inner.rows.remove(&id).is_some())
    }
}
