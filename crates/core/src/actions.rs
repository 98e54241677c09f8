//! Server actions: the typed data-access boundary for prompts
//!
//! Each action validates its input, calls the record store under a bounded
//! timeout, and turns "row missing" answers from the store into
//! `PromptError::NotFound`. Views and the command registry only ever talk to
//! the store through these functions.

use std::{future::Future, sync::Arc, time::Duration};

use tracing::{debug, info, warn};

use crate::{
    config::{Config, DEFAULT_ACTION_TIMEOUT_MS},
    db::{NewPrompt, Prompt, PromptId, PromptStore, PromptUpdate},
    errors::{PromptError, Result},
};

/// Handle to the prompt actions, cheap to clone
#[derive(Clone)]
pub struct PromptActions {
    store:   Arc<dyn PromptStore>,
    timeout: Duration,
}

impl PromptActions {
    pub fn new(store: Arc<dyn PromptStore>) -> Self {
        Self {
            store,
            timeout: Duration::from_millis(DEFAULT_ACTION_TIMEOUT_MS),
        }
    }

    pub fn from_config(store: Arc<dyn PromptStore>, config: &Config) -> Self {
        Self::new(store).with_timeout(config.action_timeout())
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// All prompts currently in the store
    pub async fn get_prompts(&self) -> Result<Vec<Prompt>> {
        let prompts = self.bounded("find_all", self.store.find_all()).await?;
        debug!(count = prompts.len(), "fetched prompts");
        Ok(prompts)
    }

    /// Persist a new prompt; fields are trimmed before storage
    pub async fn create_prompt(&self, input: NewPrompt) -> Result<Prompt> {
        let draft = input.normalized()?;
        let prompt = self.bounded("insert", self.store.insert(&draft)).await?;
        info!(id = prompt.id, "created prompt");
        Ok(prompt)
    }

    /// Replace name, description and content of an existing prompt
    pub async fn update_prompt(&self, input: PromptUpdate) -> Result<Prompt> {
        let fields = input.fields().normalized()?;
        let updated = self
            .bounded("update_by_id", self.store.update_by_id(input.id, &fields))
            .await?;

        match updated {
            Some(prompt) => {
                info!(id = prompt.id, "updated prompt");
                Ok(prompt)
            },
            None => Err(PromptError::NotFound(input.id)),
        }
    }

    /// Remove a prompt permanently; deleting a missing id is an error
    pub async fn delete_prompt(&self, id: PromptId) -> Result<()> {
        if self.bounded("delete_by_id", self.store.delete_by_id(id)).await? {
            info!(id, "deleted prompt");
            Ok(())
        } else {
            Err(PromptError::NotFound(id))
        }
    }

    async fn bounded<T, F>(&self, op: &'static str, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(op, timeout_ms = self.timeout.as_millis() as u64, "store call timed out");
                Err(PromptError::Store(format!(
                    "store call timed out after {} ms",
                    self.timeout.as_millis()
                )))
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use proptest::prelude::*;

    use super::*;
    use crate::db::{MemoryStore, MockPromptStore};

    fn memory_actions() -> PromptActions {
        PromptActions::new(Arc::new(MemoryStore::new()))
    }

    fn mock_actions(mock: MockPromptStore) -> PromptActions {
        PromptActions::new(Arc::new(mock))
    }

    // ========================================
    // Happy paths
    // ========================================

    #[tokio::test]
    async fn test_create_then_get() {
        let actions = memory_actions();
        let created = actions
            .create_prompt(NewPrompt::new(" A ", "B", " C"))
            .await
            .unwrap();

        assert_eq!(created.id, 1);
        assert_eq!(created.name, "A");
        assert_eq!(created.content, "C");

        let prompts = actions.get_prompts().await.unwrap();
        assert_eq!(prompts, vec![created]);
    }

    #[tokio::test]
    async fn test_update_keeps_id() {
        let actions = memory_actions();
        let created = actions
            .create_prompt(NewPrompt::new("Code Explainer", "Explains code", "Explain"))
            .await
            .unwrap();

        let updated = actions
            .update_prompt(PromptUpdate::new(created.id, "Renamed", "Still explains", "Body"))
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        let prompts = actions.get_prompts().await.unwrap();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].name, "Renamed");
    }

    #[tokio::test]
    async fn test_delete_removes_row() {
        let actions = memory_actions();
        let created = actions.create_prompt(NewPrompt::new("a", "b", "c")).await.unwrap();

        actions.delete_prompt(created.id).await.unwrap();
        assert!(actions.get_prompts().await.unwrap().is_empty());
    }

    // ========================================
    // Error taxonomy
    // ========================================

    #[tokio::test]
    async fn test_validation_never_reaches_store() {
        let mut mock = MockPromptStore::new();
        mock.expect_insert().never();
        mock.expect_update_by_id().never();
        let actions = mock_actions(mock);

        let err = actions
            .create_prompt(NewPrompt::new("name", " ", "content"))
            .await
            .unwrap_err();
        assert!(matches!(err, PromptError::Validation(_)));

        let err = actions
            .update_prompt(PromptUpdate::new(1, "", "d", "c"))
            .await
            .unwrap_err();
        assert!(matches!(err, PromptError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let actions = memory_actions();
        let err = actions
            .update_prompt(PromptUpdate::new(99, "a", "b", "c"))
            .await
            .unwrap_err();

        assert!(matches!(err, PromptError::NotFound(99)));
        assert!(actions.get_prompts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_is_not_idempotent() {
        let actions = memory_actions();
        let created = actions.create_prompt(NewPrompt::new("a", "b", "c")).await.unwrap();

        actions.delete_prompt(created.id).await.unwrap();
        let err = actions.delete_prompt(created.id).await.unwrap_err();
        assert!(matches!(err, PromptError::NotFound(id) if id == created.id));
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let mut mock = MockPromptStore::new();
        mock.expect_find_all()
            .times(1)
            .returning(|| Err(PromptError::Store("connection refused".into())));
        mock.expect_delete_by_id()
            .times(1)
            .returning(|_| Err(PromptError::Store("disk I/O error".into())));
        let actions = mock_actions(mock);

        let err = actions.get_prompts().await.unwrap_err();
        assert_eq!(err.category(), "store");

        let err = actions.delete_prompt(1).await.unwrap_err();
        assert!(err.user_message().contains("disk I/O error"));
    }

    struct SlowStore;

    #[async_trait]
    impl PromptStore for SlowStore {
        async fn find_all(&self) -> Result<Vec<Prompt>> {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Ok(vec![])
        }

        async fn insert(&self, _draft: &NewPrompt) -> Result<Prompt> {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Err(PromptError::Store("unreachable".into()))
        }

        async fn update_by_id(&self, _id: PromptId, _fields: &NewPrompt) -> Result<Option<Prompt>> {
            Ok(None)
        }

        async fn delete_by_id(&self, _id: PromptId) -> Result<bool> {
            Ok(false)
        }
    }

    #[tokio::test]
    async fn test_timeout_is_store_error() {
        let actions =
            PromptActions::new(Arc::new(SlowStore)).with_timeout(Duration::from_millis(20));

        let err = actions.get_prompts().await.unwrap_err();
        match err {
            PromptError::Store(msg) => assert!(msg.contains("timed out after 20 ms")),
            other => panic!("Expected Store error, got {:?}", other),
        }

        let err = actions
            .create_prompt(NewPrompt::new("a", "b", "c"))
            .await
            .unwrap_err();
        assert_eq!(err.category(), "store");
    }

    #[test]
    fn test_from_config_uses_timeout() {
        let mut config = Config::default();
        config.action_timeout_ms = 1234;
        let actions = PromptActions::from_config(Arc::new(MemoryStore::new()), &config);
        assert_eq!(actions.timeout(), Duration::from_millis(1234));
    }

    // ========================================
    // Properties
    // ========================================

    fn block_on<F: Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(future)
    }

    fn field() -> impl Strategy<Value = String> {
        "[ \t]{0,2}[A-Za-z0-9][A-Za-z0-9 ]{0,15}[ \t]{0,2}"
    }

    proptest! {
        #[test]
        fn prop_create_is_visible_with_fresh_id(
            seeded in 0usize..4,
            name in field(),
            description in field(),
            content in field(),
        ) {
            block_on(async {
                let actions = memory_actions();
                let mut seen = Vec::new();
                for i in 0..seeded {
                    let p = actions.create_prompt(NewPrompt::new(format!("p{i}"), "d", "c")).await.unwrap();
                    seen.push(p.id);
                }

                let created = actions
                    .create_prompt(NewPrompt::new(name.clone(), description.clone(), content.clone()))
                    .await
                    .unwrap();

                assert!(!seen.contains(&created.id));
                let prompts = actions.get_prompts().await.unwrap();
                let found = prompts.iter().find(|p| p.id == created.id).unwrap();
                assert_eq!(found.name, name.trim());
                assert_eq!(found.description, description.trim());
                assert_eq!(found.content, content.trim());
            });
        }

        #[test]
        fn prop_update_replaces_exactly_one(
            count in 1usize..5,
            pick in 0usize..5,
            name in field(),
        ) {
            block_on(async {
                let actions = memory_actions();
                for i in 0..count {
                    actions.create_prompt(NewPrompt::new(format!("p{i}"), "d", "c")).await.unwrap();
                }
                let before = actions.get_prompts().await.unwrap();
                let target = before[pick % count].clone();

                actions
                    .update_prompt(PromptUpdate::new(target.id, name.clone(), "new d", "new c"))
                    .await
                    .unwrap();

                let after = actions.get_prompts().await.unwrap();
                let matching: Vec<&Prompt> = after.iter().filter(|p| p.id == target.id).collect();
                assert_eq!(matching.len(), 1);
                assert_eq!(matching[0].name, name.trim());
                assert_eq!(after.len(), before.len());
            });
        }

        #[test]
        fn prop_delete_excludes_only_target(count in 1usize..5, pick in 0usize..5) {
            block_on(async {
                let actions = memory_actions();
                for i in 0..count {
                    actions.create_prompt(NewPrompt::new(format!("p{i}"), "d", "c")).await.unwrap();
                }
                let before = actions.get_prompts().await.unwrap();
                let target = before[pick % count].id;

                actions.delete_prompt(target).await.unwrap();

                let after = actions.get_prompts().await.unwrap();
                assert!(after.iter().all(|p| p.id != target));
                assert_eq!(after.len(), before.len() - 1);
            });
        }

        #[test]
        fn prop_blank_field_never_mutates(
            blank in "[ \t\n]{0,3}",
            slot in 0usize..3,
        ) {
            block_on(async {
                let actions = memory_actions();
                let existing = actions.create_prompt(NewPrompt::new("a", "b", "c")).await.unwrap();

                let mut fields = vec!["x".to_string(), "y".to_string(), "z".to_string()];
                fields[slot] = blank.clone();

                let create = actions
                    .create_prompt(NewPrompt::new(fields[0].clone(), fields[1].clone(), fields[2].clone()))
                    .await;
                assert!(matches!(create, Err(PromptError::Validation(_))));

                let update = actions
                    .update_prompt(PromptUpdate::new(existing.id, fields[0].clone(), fields[1].clone(), fields[2].clone()))
                    .await;
                assert!(matches!(update, Err(PromptError::Validation(_))));

                assert_eq!(actions.get_prompts().await.unwrap(), vec![existing]);
            });
        }

        #[test]
        fn prop_unknown_id_never_mutates(offset in 1i64..1000) {
            block_on(async {
                let actions = memory_actions();
                let existing = actions.create_prompt(NewPrompt::new("a", "b", "c")).await.unwrap();
                let missing = existing.id + offset;

                let update = actions.update_prompt(PromptUpdate::new(missing, "n", "d", "c")).await;
                assert!(matches!(update, Err(PromptError::NotFound(id)) if id == missing));

                let delete = actions.delete_prompt(missing).await;
                assert!(matches!(delete, Err(PromptError::NotFound(id)) if id == missing));

                assert_eq!(actions.get_prompts().await.unwrap(), vec![existing]);
            });
        }
    }
}
