use crate::service::wire::{ChatResponse, SubmitResponse};
use crate::widget::form::FormId;

/// Completions reported by network tasks to the UI thread.
#[derive(Debug, Clone)]
pub enum AppEvent {
    ChatReplied(ChatResponse),
    ChatFailed(String),
    FormResponded {
        form_id: FormId,
        response: SubmitResponse,
    },
    FormFailed {
        form_id: FormId,
        detail: String,
    },
}
