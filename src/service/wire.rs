use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
    pub session_id: &'a str,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub show_demo_form: bool,
    #[serde(default)]
    pub show_info_form: bool,
    #[serde(default)]
    pub lead_score: Option<i64>,
    #[serde(default)]
    pub stage: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfoRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DemoRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub session_id: &'a str,
}

/// Body returned by both form submission endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub show_form_again: bool,
}

impl SubmitResponse {
    /// Service-provided text, preferring `message` over `error`.
    pub fn display_message(&self) -> String {
        self.message
            .as_deref()
            .or(self.error.as_deref())
            .unwrap_or_default()
            .to_string()
    }
}

/// One row appended by the spreadsheet logger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeadRow {
    pub timestamp: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_score: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
}
