use crate::widget::form::FormId;

/// User interactions collected while drawing a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    Maximize,
    Minimize,
    SendInput,
    SubmitForm(FormId),
    CopyTranscript,
}

impl UiAction {
    pub fn to_log_line(&self) -> String {
        match self {
            Self::Maximize => "widget_maximized".to_string(),
            Self::Minimize => "widget_minimized".to_string(),
            Self::SendInput => "input_sent".to_string(),
            Self::SubmitForm(form_id) => format!("form_submitted form_id={form_id}"),
            Self::CopyTranscript => "transcript_copied".to_string(),
        }
    }
}
