//! Create / Update / Delete dialogs
//!
//! Every dialog shares one state shape and one reducer:
//!
//! ```text
//! Closed -> Open(Idle) -> Open(Submitting) -> Closed            (success)
//!                                          -> Open(Idle) + error (failure)
//! ```
//!
//! `reduce` is pure. `Dialog` wraps a state, applies events, and performs
//! the single server action call a submit asks for.

use tracing::warn;

use crate::{
    actions::PromptActions,
    db::{NewPrompt, Prompt, PromptId, PromptUpdate},
    errors::ALL_FIELDS_REQUIRED,
};

/// Shown when Update/Delete is submitted without a target prompt
pub const PROMPT_DATA_MISSING: &str = "Prompt data is missing";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Closed,
    Idle,
    Submitting,
}

/// Editable form fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Description,
    Content,
}

/// Raw (untrimmed) form input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub name:        String,
    pub description: String,
    pub content:     String,
}

impl FormFields {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Description => &self.description,
            Field::Content => &self.content,
        }
    }

    fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Name => self.name = value,
            Field::Description => self.description = value,
            Field::Content => self.content = value,
        }
    }

    /// Trimmed draft, or `None` if any field is blank
    fn to_draft(&self) -> Option<NewPrompt> {
        NewPrompt::new(
            self.name.as_str(),
            self.description.as_str(),
            self.content.as_str(),
        )
        .normalized()
        .ok()
    }
}

impl From<&Prompt> for FormFields {
    fn from(prompt: &Prompt) -> Self {
        Self {
            name:        prompt.name.clone(),
            description: prompt.description.clone(),
            content:     prompt.content.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogState {
    pub kind:   DialogKind,
    pub phase:  Phase,
    pub fields: FormFields,
    pub target: Option<Prompt>,
    pub error:  Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogEvent {
    /// Open the dialog, optionally targeting an existing prompt
    Open(Option<Prompt>),
    Edit(Field, String),
    Submit,
    Succeeded,
    Failed(String),
    Cancel,
}

/// The one server action call a submit resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Create(NewPrompt),
    Update(PromptUpdate),
    Delete(PromptId),
}

/// What the driver must do after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Invoke exactly this server action
    Invoke(Submission),
    /// Closed after a successful action; the list must re-fetch
    Refresh,
    /// Closed without an action; the list must drop its selection
    Dismissed,
}

impl DialogState {
    pub fn new(kind: DialogKind) -> Self {
        Self {
            kind,
            phase: Phase::Closed,
            fields: FormFields::default(),
            target: None,
            error: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.phase != Phase::Closed
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == Phase::Submitting
    }

    /// Submit (and cancel) are only clickable while idle
    pub fn can_submit(&self) -> bool {
        self.phase == Phase::Idle
    }

    fn reset(&mut self) {
        self.phase = Phase::Closed;
        self.fields = FormFields::default();
        self.target = None;
        self.error = None;
    }

    fn submission(&self) -> Result<Submission, &'static str> {
        match self.kind {
            DialogKind::Create => self
                .fields
                .to_draft()
                .map(Submission::Create)
                .ok_or(ALL_FIELDS_REQUIRED),
            DialogKind::Update => {
                let target = self.target.as_ref().ok_or(PROMPT_DATA_MISSING)?;
                let draft = self.fields.to_draft().ok_or(ALL_FIELDS_REQUIRED)?;
                Ok(Submission::Update(PromptUpdate::new(
                    target.id,
                    draft.name,
                    draft.description,
                    draft.content,
                )))
            },
            DialogKind::Delete => self
                .target
                .as_ref()
                .map(|target| Submission::Delete(target.id))
                .ok_or(PROMPT_DATA_MISSING),
        }
    }
}

/// Pure transition function shared by all dialog kinds
pub fn reduce(mut state: DialogState, event: DialogEvent) -> (DialogState, Effect) {
    let effect = match (state.phase, event) {
        (Phase::Closed, DialogEvent::Open(target)) => {
            state.fields = match (state.kind, target.as_ref()) {
                (DialogKind::Update, Some(prompt)) => FormFields::from(prompt),
                _ => FormFields::default(),
            };
            state.target = target;
            state.error = None;
            state.phase = Phase::Idle;
            Effect::None
        },

        (Phase::Idle, DialogEvent::Edit(field, value)) => {
            state.fields.set(field, value);
            state.error = None;
            Effect::None
        },

        (Phase::Idle, DialogEvent::Submit) => match state.submission() {
            Ok(submission) => {
                state.error = None;
                state.phase = Phase::Submitting;
                Effect::Invoke(submission)
            },
            Err(message) => {
                state.error = Some(message.to_string());
                Effect::None
            },
        },

        (Phase::Submitting, DialogEvent::Succeeded) => {
            match state.kind {
                // Update keeps what was submitted; it is hidden anyway
                DialogKind::Update => {
                    state.phase = Phase::Closed;
                    state.target = None;
                    state.error = None;
                },
                DialogKind::Create | DialogKind::Delete => state.reset(),
            }
            Effect::Refresh
        },

        (Phase::Submitting, DialogEvent::Failed(message)) => {
            state.phase = Phase::Idle;
            state.error = Some(message);
            Effect::None
        },

        (Phase::Idle, DialogEvent::Cancel) => {
            state.reset();
            Effect::Dismissed
        },

        // Everything else is a control that is hidden or disabled in the
        // current phase.
        _ => Effect::None,
    };

    (state, effect)
}

impl DialogKind {
    pub fn title(&self) -> &'static str {
        match self {
            DialogKind::Create => "Create New Prompt",
            DialogKind::Update => "Update Prompt",
            DialogKind::Delete => "Delete Prompt",
        }
    }

    /// Description line under the title
    pub fn description(&self, target: Option<&Prompt>) -> String {
        match self {
            DialogKind::Create => {
                "Add a new prompt to your collection. Fill in all the fields below.".to_string()
            },
            DialogKind::Update => {
                "Modify the prompt details below. All fields are required.".to_string()
            },
            DialogKind::Delete => format!(
                "Are you sure you want to delete \"{}\"? This action cannot be undone.",
                target.map(|p| p.name.as_str()).unwrap_or_default()
            ),
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self {
            DialogKind::Create => "Create",
            DialogKind::Update => "Update",
            DialogKind::Delete => "Delete",
        }
    }

    pub fn busy_label(&self) -> &'static str {
        match self {
            DialogKind::Create => "Creating...",
            DialogKind::Update => "Updating...",
            DialogKind::Delete => "Deleting...",
        }
    }

    /// Used when a failure carries no message of its own
    pub fn fallback_error(&self) -> &'static str {
        match self {
            DialogKind::Create => "Failed to create prompt",
            DialogKind::Update => "Failed to update prompt",
            DialogKind::Delete => "Failed to delete prompt",
        }
    }

    pub fn has_form(&self) -> bool {
        !matches!(self, DialogKind::Delete)
    }
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Name, Field::Description, Field::Content];

    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "Title",
            Field::Description => "Description",
            Field::Content => "Content",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            Field::Name => "e.g., Code Explainer",
            Field::Description => "e.g., Explains code in simple terms",
            Field::Content => "Enter your prompt content here...",
        }
    }
}

/// Result of driving a submit to completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Action succeeded and the dialog closed. Carries the stored row for
    /// create/update.
    Completed(Option<Prompt>),
    /// Local check failed; no action was called
    Rejected,
    /// The action failed; the dialog is open with the error shown
    Failed,
    /// Submit is not available in the current phase
    Ignored,
}

/// Stateful dialog driver
#[derive(Debug, Clone)]
pub struct Dialog {
    state: DialogState,
}

impl Dialog {
    pub fn new(kind: DialogKind) -> Self {
        Self {
            state: DialogState::new(kind),
        }
    }

    pub fn create() -> Self {
        Self::new(DialogKind::Create)
    }

    pub fn update() -> Self {
        Self::new(DialogKind::Update)
    }

    pub fn delete() -> Self {
        Self::new(DialogKind::Delete)
    }

    pub fn state(&self) -> &DialogState {
        &self.state
    }

    pub fn kind(&self) -> DialogKind {
        self.state.kind
    }

    /// Apply one event and return the effect the caller must honor
    pub fn dispatch(&mut self, event: DialogEvent) -> Effect {
        let (next, effect) = reduce(self.state.clone(), event);
        self.state = next;
        effect
    }

    pub fn open(&mut self, target: Option<Prompt>) {
        self.dispatch(DialogEvent::Open(target));
    }

    pub fn edit(&mut self, field: Field, value: impl Into<String>) {
        self.dispatch(DialogEvent::Edit(field, value.into()));
    }

    pub fn cancel(&mut self) -> Effect {
        self.dispatch(DialogEvent::Cancel)
    }

    /// Validate, call the matching server action once, and settle the state
    pub async fn submit(&mut self, actions: &PromptActions) -> SubmitOutcome {
        if !self.state.can_submit() {
            return SubmitOutcome::Ignored;
        }

        let submission = match self.dispatch(DialogEvent::Submit) {
            Effect::Invoke(submission) => submission,
            _ => return SubmitOutcome::Rejected,
        };

        let result = match submission {
            Submission::Create(draft) => actions.create_prompt(draft).await.map(Some),
            Submission::Update(update) => actions.update_prompt(update).await.map(Some),
            Submission::Delete(id) => actions.delete_prompt(id).await.map(|_| None),
        };

        match result {
            Ok(prompt) => {
                self.dispatch(DialogEvent::Succeeded);
                SubmitOutcome::Completed(prompt)
            },
            Err(err) => {
                warn!(
                    dialog = self.kind().title(),
                    category = err.category(),
                    "dialog action failed: {}",
                    err
                );
                let mut message = err.user_message();
                if message.trim().is_empty() {
                    message = self.kind().fallback_error().to_string();
                }
                self.dispatch(DialogEvent::Failed(message));
                SubmitOutcome::Failed
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::db::{MemoryStore, MockPromptStore};
    use crate::errors::PromptError;

    fn sample(id: PromptId) -> Prompt {
        Prompt {
            id,
            name: "Code Explainer".into(),
            description: "Explains code in simple terms".into(),
            content: "Explain the following code".into(),
            created_at: 0,
            updated_at: 0,
        }
    }

    fn open(kind: DialogKind, target: Option<Prompt>) -> DialogState {
        reduce(DialogState::new(kind), DialogEvent::Open(target)).0
    }

    // ========================================
    // reduce() tests
    // ========================================

    #[test]
    fn test_create_opens_blank() {
        let state = open(DialogKind::Create, None);
        assert_eq!(state.phase, Phase::Idle);
        assert_eq!(state.fields, FormFields::default());
        assert!(state.error.is_none());
    }

    #[test]
    fn test_update_opens_prefilled() {
        let state = open(DialogKind::Update, Some(sample(1)));
        assert_eq!(state.fields.name, "Code Explainer");
        assert_eq!(state.fields.get(Field::Content), "Explain the following code");
    }

    #[test]
    fn test_submit_with_blank_field_stays_idle() {
        let mut state = open(DialogKind::Create, None);
        state.fields.name = "A".into();
        state.fields.description = "  ".into();
        state.fields.content = "C".into();

        let (state, effect) = reduce(state, DialogEvent::Submit);
        assert_eq!(effect, Effect::None);
        assert_eq!(state.phase, Phase::Idle);
        assert_eq!(state.error.as_deref(), Some("All fields are required"));
        assert_eq!(state.fields.description, "  ");
    }

    #[test]
    fn test_submit_trims_values() {
        let mut state = open(DialogKind::Create, None);
        state.fields.name = " A ".into();
        state.fields.description = "B\n".into();
        state.fields.content = "\tC".into();

        let (state, effect) = reduce(state, DialogEvent::Submit);
        assert_eq!(state.phase, Phase::Submitting);
        assert_eq!(effect, Effect::Invoke(Submission::Create(NewPrompt::new("A", "B", "C"))));
    }

    #[test]
    fn test_second_submit_while_submitting_is_ignored() {
        let state = open(DialogKind::Delete, Some(sample(3)));
        let (state, effect) = reduce(state, DialogEvent::Submit);
        assert_eq!(effect, Effect::Invoke(Submission::Delete(3)));

        let (state, effect) = reduce(state, DialogEvent::Submit);
        assert_eq!(effect, Effect::None);
        assert_eq!(state.phase, Phase::Submitting);
    }

    #[test]
    fn test_delete_without_target_reports_missing() {
        let state = open(DialogKind::Delete, None);
        let (state, effect) = reduce(state, DialogEvent::Submit);
        assert_eq!(effect, Effect::None);
        assert_eq!(state.error.as_deref(), Some(PROMPT_DATA_MISSING));
    }

    #[test]
    fn test_update_without_target_reports_missing() {
        let mut state = open(DialogKind::Update, None);
        state.fields = FormFields::from(&sample(1));
        let (state, _) = reduce(state, DialogEvent::Submit);
        assert_eq!(state.error.as_deref(), Some(PROMPT_DATA_MISSING));
    }

    #[test]
    fn test_failure_preserves_input() {
        let mut state = open(DialogKind::Update, Some(sample(1)));
        state.fields.name = "Renamed".into();
        let (state, _) = reduce(state, DialogEvent::Submit);
        let (state, effect) = reduce(state, DialogEvent::Failed("boom".into()));

        assert_eq!(effect, Effect::None);
        assert_eq!(state.phase, Phase::Idle);
        assert_eq!(state.error.as_deref(), Some("boom"));
        assert_eq!(state.fields.name, "Renamed");
        assert!(state.target.is_some());
    }

    #[test]
    fn test_create_success_clears_form() {
        let mut state = open(DialogKind::Create, None);
        state.fields = FormFields {
            name:        "A".into(),
            description: "B".into(),
            content:     "C".into(),
        };
        let (state, _) = reduce(state, DialogEvent::Submit);
        let (state, effect) = reduce(state, DialogEvent::Succeeded);

        assert_eq!(effect, Effect::Refresh);
        assert_eq!(state.phase, Phase::Closed);
        assert_eq!(state.fields, FormFields::default());
    }

    #[test]
    fn test_update_success_keeps_submitted_values() {
        let mut state = open(DialogKind::Update, Some(sample(1)));
        state.fields.name = "Renamed".into();
        let (state, _) = reduce(state, DialogEvent::Submit);
        let (state, effect) = reduce(state, DialogEvent::Succeeded);

        assert_eq!(effect, Effect::Refresh);
        assert!(!state.is_open());
        assert_eq!(state.fields.name, "Renamed");
        assert!(state.target.is_none());
    }

    #[test]
    fn test_cancel_resets_everything() {
        let mut state = open(DialogKind::Create, None);
        state.fields.name = "draft".into();
        let (state, _) = reduce(state, DialogEvent::Submit);
        assert!(state.error.is_some());

        let (state, effect) = reduce(state, DialogEvent::Cancel);
        assert_eq!(effect, Effect::Dismissed);
        assert_eq!(state, DialogState::new(DialogKind::Create));
    }

    #[test]
    fn test_cancel_while_submitting_is_ignored() {
        let state = open(DialogKind::Delete, Some(sample(1)));
        let (state, _) = reduce(state, DialogEvent::Submit);
        let (state, effect) = reduce(state, DialogEvent::Cancel);
        assert_eq!(effect, Effect::None);
        assert!(state.is_submitting());
    }

    #[test]
    fn test_edit_clears_error() {
        let state = open(DialogKind::Create, None);
        let (state, _) = reduce(state, DialogEvent::Submit);
        assert!(state.error.is_some());

        let (state, _) = reduce(state, DialogEvent::Edit(Field::Name, "A".into()));
        assert!(state.error.is_none());
        assert_eq!(state.fields.name, "A");
    }

    #[test]
    fn test_events_on_closed_dialog_do_nothing() {
        let closed = DialogState::new(DialogKind::Create);
        for event in [
            DialogEvent::Submit,
            DialogEvent::Cancel,
            DialogEvent::Succeeded,
            DialogEvent::Edit(Field::Name, "x".into()),
        ] {
            let (state, effect) = reduce(closed.clone(), event);
            assert_eq!(effect, Effect::None);
            assert_eq!(state, closed);
        }
    }

    #[test]
    fn test_delete_description_names_target() {
        let text = DialogKind::Delete.description(Some(&sample(1)));
        assert!(text.contains("\"Code Explainer\""));
        assert!(text.ends_with("This action cannot be undone."));
    }

    // ========================================
    // Dialog::submit() tests
    // ========================================

    #[tokio::test]
    async fn test_submit_create_calls_action_once() {
        let actions = PromptActions::new(Arc::new(MemoryStore::new()));
        let mut dialog = Dialog::create();
        dialog.open(None);
        dialog.edit(Field::Name, "A");
        dialog.edit(Field::Description, "B");
        dialog.edit(Field::Content, "C");

        let outcome = dialog.submit(&actions).await;
        match outcome {
            SubmitOutcome::Completed(Some(prompt)) => assert_eq!(prompt.id, 1),
            other => panic!("Expected Completed, got {:?}", other),
        }
        assert!(!dialog.state().is_open());
        assert_eq!(actions.get_prompts().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_submit_rejected_makes_no_call() {
        let mut mock = MockPromptStore::new();
        mock.expect_insert().never();
        let actions = PromptActions::new(Arc::new(mock));

        let mut dialog = Dialog::create();
        dialog.open(None);
        assert_eq!(dialog.submit(&actions).await, SubmitOutcome::Rejected);
        assert_eq!(dialog.state().error.as_deref(), Some("All fields are required"));
    }

    #[tokio::test]
    async fn test_submit_closed_dialog_is_ignored() {
        let actions = PromptActions::new(Arc::new(MemoryStore::new()));
        let mut dialog = Dialog::delete();
        assert_eq!(dialog.submit(&actions).await, SubmitOutcome::Ignored);
    }

    #[tokio::test]
    async fn test_submit_store_failure_shows_message() {
        let mut mock = MockPromptStore::new();
        mock.expect_delete_by_id()
            .times(1)
            .returning(|_| Err(PromptError::Store("database is locked".into())));
        let actions = PromptActions::new(Arc::new(mock));

        let mut dialog = Dialog::delete();
        dialog.open(Some(sample(1)));
        assert_eq!(dialog.submit(&actions).await, SubmitOutcome::Failed);

        let state = dialog.state();
        assert_eq!(state.phase, Phase::Idle);
        assert!(state.error.as_deref().unwrap().contains("database is locked"));
        assert_eq!(state.target.as_ref().map(|p| p.id), Some(1));
    }

    #[tokio::test]
    async fn test_submit_update_missing_row_shows_not_found() {
        let actions = PromptActions::new(Arc::new(MemoryStore::new()));
        let mut dialog = Dialog::update();
        dialog.open(Some(sample(5)));

        assert_eq!(dialog.submit(&actions).await, SubmitOutcome::Failed);
        assert_eq!(dialog.state().error.as_deref(), Some("Prompt 5 no longer exists"));
    }
}
