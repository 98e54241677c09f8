//! View layer: list view, mutation dialogs, loading placeholder and a text
//! renderer over them
//!
//! Everything here is plain state plus async drivers that call into
//! `actions`. No rendering toolkit is assumed.

pub mod chrome;
pub mod dialog;
pub mod list_view;
pub mod loading;
pub mod render;

pub use dialog::{Dialog, DialogEvent, DialogKind, DialogState, Effect, Field, Phase, SubmitOutcome};
pub use list_view::{Card, ListState, ListView};
