pub mod sheets;
pub mod wire;

use crate::error::ServiceError;
use crate::event::AppEvent;
use crate::session::SessionId;
use crate::widget::form::{FormId, FormKind, Submission};
use crate::widget::{Command, LeadProfile};
use eframe::egui;
use sheets::LeadLogger;
use std::sync::mpsc;
use tokio::runtime::Handle;
use wire::{ChatRequest, ChatResponse, DemoRequest, InfoRequest, SubmitResponse};

pub const SESSION_HEADER: &str = "X-Session-Id";

/// HTTP client for the remote chat service. Every call runs on the tokio
/// runtime and reports back to the UI thread through `tx`, waking the UI
/// when a repaint context is attached.
#[derive(Clone)]
pub struct ChatServiceClient {
    api_url: String,
    session_id: SessionId,
    http: reqwest::Client,
    tx: mpsc::Sender<AppEvent>,
    repaint: Option<egui::Context>,
    runtime_handle: Handle,
    leads: LeadLogger,
}

impl ChatServiceClient {
    pub fn new(
        api_url: impl Into<String>,
        session_id: SessionId,
        leads: LeadLogger,
        tx: mpsc::Sender<AppEvent>,
        runtime_handle: Handle,
    ) -> Self {
        Self {
            api_url: api_url.into(),
            session_id,
            http: reqwest::Client::new(),
            tx,
            repaint: None,
            runtime_handle,
            leads,
        }
    }

    pub fn with_repaint(mut self, ctx: egui::Context) -> Self {
        self.repaint = Some(ctx);
        self
    }

    pub fn execute(&self, command: Command) {
        match command {
            Command::SendChat { message } => self.send(message),
            Command::SubmitInfo {
                form_id,
                submission,
            } => self.spawn_submit(form_id, submission, FormKind::Info),
            Command::SubmitDemo {
                form_id,
                submission,
            } => self.spawn_submit(form_id, submission, FormKind::Demo),
            Command::LogLead {
                submission,
                profile,
            } => self.spawn_log_lead(submission, profile),
        }
    }

    pub fn send(&self, message: String) {
        let client = self.clone();
        self.runtime_handle.spawn(async move {
            let event = match client.post_chat(&message).await {
                Ok(response) => AppEvent::ChatReplied(response),
                Err(err) => {
                    tracing::error!(session_id = %client.session_id, error = %err, "chat request failed");
                    AppEvent::ChatFailed(err.to_string())
                }
            };
            client.notify(event);
        });
    }

    fn spawn_submit(&self, form_id: FormId, submission: Submission, kind: FormKind) {
        let client = self.clone();
        let endpoint = Endpoint::submit(kind);
        self.runtime_handle.spawn(async move {
            let result = match kind {
                FormKind::Info => client.post_info(&submission).await,
                FormKind::Demo => client.post_demo(&submission).await,
            };
            let event = match result {
                Ok(response) => {
                    tracing::info!(
                        session_id = %client.session_id,
                        endpoint = endpoint.path(),
                        success = response.success,
                        "form submitted"
                    );
                    AppEvent::FormResponded { form_id, response }
                }
                Err(err) => {
                    tracing::error!(
                        session_id = %client.session_id,
                        endpoint = endpoint.path(),
                        error = %err,
                        "form submission failed"
                    );
                    AppEvent::FormFailed {
                        form_id,
                        detail: err.to_string(),
                    }
                }
            };
            client.notify(event);
        });
    }

    fn notify(&self, event: AppEvent) {
        if self.tx.send(event).is_err() {
            tracing::debug!(session_id = %self.session_id, "event receiver gone, dropping result");
            return;
        }
        if let Some(ctx) = &self.repaint {
            ctx.request_repaint();
        }
    }

    fn spawn_log_lead(&self, submission: Submission, profile: LeadProfile) {
        let leads = self.leads.clone();
        let http = self.http.clone();
        self.runtime_handle.spawn(async move {
            leads.record(&http, &submission, &profile).await;
        });
    }

    pub async fn post_chat(&self, message: &str) -> Result<ChatResponse, ServiceError> {
        let url = self.endpoint_url(Endpoint::Chat);
        tracing::debug!(session_id = %self.session_id, %url, "sending chat message");

        let resp = self
            .http
            .post(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&ChatRequest {
                message,
                session_id: self.session_id.as_str(),
            })
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ServiceError::status(resp.status()));
        }

        resp.json()
            .await
            .map_err(|err| ServiceError::Decode(err.to_string()))
    }

    pub async fn post_info(&self, submission: &Submission) -> Result<SubmitResponse, ServiceError> {
        let resp = self
            .http
            .post(self.endpoint_url(Endpoint::Info))
            .header(reqwest::header::ACCEPT, "application/json")
            .header(SESSION_HEADER, self.session_id.as_str())
            .json(&InfoRequest {
                name: &submission.name,
                email: &submission.email,
            })
            .send()
            .await?;
        read_submit_response(resp).await
    }

    pub async fn post_demo(&self, submission: &Submission) -> Result<SubmitResponse, ServiceError> {
        let resp = self
            .http
            .post(self.endpoint_url(Endpoint::Demo))
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&DemoRequest {
                name: &submission.name,
                email: &submission.email,
                phone: &submission.phone,
                session_id: self.session_id.as_str(),
            })
            .send()
            .await?;
        read_submit_response(resp).await
    }

    fn endpoint_url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.api_url, endpoint.path())
    }
}

#[derive(Debug, Clone, Copy)]
enum Endpoint {
    Chat,
    Info,
    Demo,
}

impl Endpoint {
    fn submit(kind: FormKind) -> Self {
        match kind {
            FormKind::Info => Self::Info,
            FormKind::Demo => Self::Demo,
        }
    }

    fn path(self) -> &'static str {
        match self {
            Self::Chat => "/chat",
            Self::Info => "/submit_info",
            Self::Demo => "/submit_demo",
        }
    }
}

/// Submission endpoints report logical failures in the body, so the body is
/// read whatever the status. Only an unreadable body is a transport failure.
async fn read_submit_response(resp: reqwest::Response) -> Result<SubmitResponse, ServiceError> {
    let status = resp.status();
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|err| {
        if status.is_success() {
            ServiceError::Decode(err.to_string())
        } else {
            ServiceError::status(status)
        }
    })
}
