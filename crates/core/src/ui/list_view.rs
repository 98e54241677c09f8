//! Prompt list view
//!
//! Owns the fetched prompt set, the currently selected prompt and the one
//! dialog that may be open on top of the list. Any successful mutation is
//! followed by a full re-fetch; the list is never patched locally.

use tracing::{debug, warn};

use super::dialog::{Dialog, DialogKind, Effect, Field, SubmitOutcome};
use crate::{
    actions::PromptActions,
    db::{Prompt, PromptId},
    errors::{PromptError, Result},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListState {
    /// Initial fetch not resolved yet
    Loading,
    Loaded(Vec<Prompt>),
    /// Fetch failed; the message is shown with a retry control
    Failed(String),
}

/// Render model for one prompt card
///
/// Cards are keyed by the store id and nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card<'a> {
    pub key:         PromptId,
    pub title:       &'a str,
    pub description: &'a str,
    pub content:     &'a str,
}

pub struct ListView {
    actions:   PromptActions,
    state:     ListState,
    selection: Option<Prompt>,
    dialog:    Option<Dialog>,
}

impl ListView {
    pub fn new(actions: PromptActions) -> Self {
        Self {
            actions,
            state: ListState::Loading,
            selection: None,
            dialog: None,
        }
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn selection(&self) -> Option<&Prompt> {
        self.selection.as_ref()
    }

    pub fn dialog(&self) -> Option<&Dialog> {
        self.dialog.as_ref()
    }

    pub fn prompts(&self) -> &[Prompt] {
        match &self.state {
            ListState::Loaded(prompts) => prompts,
            _ => &[],
        }
    }

    pub fn cards(&self) -> Vec<Card<'_>> {
        self.prompts()
            .iter()
            .map(|prompt| Card {
                key:         prompt.id,
                title:       &prompt.name,
                description: &prompt.description,
                content:     &prompt.content,
            })
            .collect()
    }

    /// Initial fetch
    pub async fn mount(&mut self) {
        self.state = ListState::Loading;
        self.fetch().await;
    }

    /// Re-fetch the whole list
    ///
    /// Already loaded content stays visible until the new list arrives. A
    /// view that never loaded goes back to the placeholder, which is also
    /// what the retry control does after a failed fetch.
    pub async fn refresh(&mut self) {
        if !matches!(self.state, ListState::Loaded(_)) {
            self.state = ListState::Loading;
        }
        self.fetch().await;
    }

    async fn fetch(&mut self) {
        match self.actions.get_prompts().await {
            Ok(prompts) => {
                debug!(count = prompts.len(), "list view loaded");
                self.state = ListState::Loaded(prompts);
            },
            Err(err) => {
                warn!(category = err.category(), "list view fetch failed: {}", err);
                self.state = ListState::Failed(err.user_message());
            },
        }
    }

    pub fn open_create(&mut self) {
        self.open(DialogKind::Create, None);
    }

    pub fn select_for_update(&mut self, id: PromptId) -> Result<()> {
        let prompt = self.find(id)?;
        self.open(DialogKind::Update, Some(prompt));
        Ok(())
    }

    pub fn select_for_delete(&mut self, id: PromptId) -> Result<()> {
        let prompt = self.find(id)?;
        self.open(DialogKind::Delete, Some(prompt));
        Ok(())
    }

    fn find(&self, id: PromptId) -> Result<Prompt> {
        self.prompts()
            .iter()
            .find(|prompt| prompt.id == id)
            .cloned()
            .ok_or(PromptError::NotFound(id))
    }

    fn open(&mut self, kind: DialogKind, target: Option<Prompt>) {
        let mut dialog = Dialog::new(kind);
        dialog.open(target.clone());
        self.selection = target;
        self.dialog = Some(dialog);
    }

    /// Type into a field of the open dialog
    pub fn edit(&mut self, field: Field, value: impl Into<String>) {
        if let Some(dialog) = self.dialog.as_mut() {
            dialog.edit(field, value);
        }
    }

    /// Submit the open dialog; refreshes the list when it succeeds
    pub async fn submit_dialog(&mut self) -> SubmitOutcome {
        let Some(dialog) = self.dialog.as_mut() else {
            return SubmitOutcome::Ignored;
        };

        let outcome = dialog.submit(&self.actions).await;
        if let SubmitOutcome::Completed(_) = outcome {
            self.dialog = None;
            self.selection = None;
            self.refresh().await;
        }
        outcome
    }

    /// Close the open dialog without submitting
    pub fn cancel_dialog(&mut self) {
        if let Some(dialog) = self.dialog.as_mut() {
            if dialog.cancel() == Effect::Dismissed {
                self.dialog = None;
                self.selection = None;
            }
        }
    }
}
