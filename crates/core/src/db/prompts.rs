use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::errors::{PromptError, Result};

/// Store-assigned prompt identifier
pub type PromptId = i64;

/// A persisted prompt row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Prompt {
    pub id:          PromptId,
    pub name:        String,
    pub description: String,
    pub content:     String,
    pub created_at:  i64,
    pub updated_at:  i64,
}

/// Draft data for a prompt that has not been persisted yet
///
/// Drafts carry no id; only the store hands one out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPrompt {
    pub name:        String,
    pub description: String,
    pub content:     String,
}

/// Full replacement of the three text fields of an existing prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptUpdate {
    pub id:          PromptId,
    pub name:        String,
    pub description: String,
    pub content:     String,
}

impl NewPrompt {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            name:        name.into(),
            description: description.into(),
            content:     content.into(),
        }
    }

    /// Trim every field and reject the draft if any of them ends up empty
    pub fn normalized(&self) -> Result<NewPrompt> {
        let draft = NewPrompt::new(
            self.name.trim(),
            self.description.trim(),
            self.content.trim(),
        );

        if draft.name.is_empty() || draft.description.is_empty() || draft.content.is_empty() {
            return Err(PromptError::fields_required());
        }

        Ok(draft)
    }
}

impl PromptUpdate {
    pub fn new(
        id: PromptId,
        name: impl Into<String>,
        description: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            content: content.into(),
        }
    }

    /// The replacement fields, without the id
    pub fn fields(&self) -> NewPrompt {
        NewPrompt::new(
            self.name.as_str(),
            self.description.as_str(),
            self.content.as_str(),
        )
    }
}

impl From<&Prompt> for NewPrompt {
    fn from(prompt: &Prompt) -> Self {
        NewPrompt::new(
            prompt.name.as_str(),
            prompt.description.as_str(),
            prompt.content.as_str(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_trims_fields() {
        let draft = NewPrompt::new("  Code Explainer ", "\tExplains code\n", " Explain: ");
        let normalized = draft.normalized().unwrap();

        assert_eq!(normalized.name, "Code Explainer");
        assert_eq!(normalized.description, "Explains code");
        assert_eq!(normalized.content, "Explain:");
    }

    #[test]
    fn test_normalized_rejects_blank_field() {
        for draft in [
            NewPrompt::new("", "b", "c"),
            NewPrompt::new("a", "   ", "c"),
            NewPrompt::new("a", "b", "\n\t"),
        ] {
            let err = draft.normalized().unwrap_err();
            assert!(matches!(err, PromptError::Validation(_)));
            assert_eq!(err.user_message(), "All fields are required");
        }
    }

    #[test]
    fn test_update_fields_drop_id() {
        let update = PromptUpdate::new(4, "n", "d", "c");
        assert_eq!(update.fields(), NewPrompt::new("n", "d", "c"));
    }

    #[test]
    fn test_prompt_serializes_with_id() {
        let prompt = Prompt {
            id:          1,
            name:        "Code Explainer".into(),
            description: "Explains code".into(),
            content:     "Explain this".into(),
            created_at:  10,
            updated_at:  10,
        };
        let value = serde_json::to_value(&prompt).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["name"], "Code Explainer");
    }
}
