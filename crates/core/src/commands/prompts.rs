use futures_util::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    actions::PromptActions,
    db::{NewPrompt, PromptId, PromptUpdate},
    errors::{PromptError, Result},
};

pub const LIST: &str = "prompts.list";
pub const CREATE: &str = "prompts.create";
pub const UPDATE: &str = "prompts.update";
pub const DELETE: &str = "prompts.delete";

#[derive(Deserialize)]
struct DeleteArgs {
    id: PromptId,
}

fn parse_args<T: DeserializeOwned>(command: &str, args: Value) -> Result<T> {
    serde_json::from_value(args).map_err(|e| PromptError::InvalidArgs {
        command: command.to_string(),
        reason:  e.to_string(),
    })
}

pub fn list(actions: &PromptActions, _args: Value) -> BoxFuture<'_, Result<Value>> {
    Box::pin(async move {
        let prompts = actions.get_prompts().await?;
        Ok(json!({ "prompts": prompts }))
    })
}

pub fn create(actions: &PromptActions, args: Value) -> BoxFuture<'_, Result<Value>> {
    Box::pin(async move {
        let input: NewPrompt = parse_args(CREATE, args)?;
        let prompt = actions.create_prompt(input).await?;
        Ok(json!(prompt))
    })
}

pub fn update(actions: &PromptActions, args: Value) -> BoxFuture<'_, Result<Value>> {
    Box::pin(async move {
        let input: PromptUpdate = parse_args(UPDATE, args)?;
        let prompt = actions.update_prompt(input).await?;
        Ok(json!(prompt))
    })
}

pub fn delete(actions: &PromptActions, args: Value) -> BoxFuture<'_, Result<Value>> {
    Box::pin(async move {
        let DeleteArgs { id } = parse_args(DELETE, args)?;
        actions.delete_prompt(id).await?;
        Ok(json!({ "success": true, "id": id }))
    })
}
