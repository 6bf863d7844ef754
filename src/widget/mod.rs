//! Widget state without any rendering or I/O.
//!
//! User actions and network completions are applied to [`WidgetState`],
//! which returns [`Command`]s for the caller to execute. Fixed UI delays are
//! queued as [`Deferred`] actions and fired by [`WidgetState::advance`].

pub mod form;
pub mod layout;
pub mod transcript;

use crate::config::{TimingConfig, WidgetConfig};
use crate::error::connection_error_message;
use crate::event::AppEvent;
use crate::service::wire::{ChatResponse, SubmitResponse};
use crate::session::{Author, SessionId, Turn, TurnKind};
use form::{FormId, FormKind, FormStatus, InlineForm, Submission};
use layout::{PanelLayout, Viewport};
use std::time::Instant;
use transcript::{Entry, Transcript};

const SUBMIT_FAILED_FALLBACK: &str = "Submission failed. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Minimized,
    Expanded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    Input,
    FormName(FormId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    AutoOpen,
    AutoMinimize,
    Welcome,
    Focus(FocusTarget),
    RevealForm(FormKind),
    DismissForm(FormId),
}

#[derive(Debug, Clone, Copy)]
struct Scheduled {
    due: Instant,
    action: Deferred,
}

/// Latest qualification data reported alongside chat replies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadProfile {
    pub lead_score: Option<i64>,
    pub stage: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SendChat {
        message: String,
    },
    SubmitInfo {
        form_id: FormId,
        submission: Submission,
    },
    SubmitDemo {
        form_id: FormId,
        submission: Submission,
    },
    /// Best-effort spreadsheet row; its outcome never reaches the state.
    LogLead {
        submission: Submission,
        profile: LeadProfile,
    },
}

pub struct WidgetState {
    session_id: SessionId,
    visibility: Visibility,
    auto_opened: bool,
    welcome_scheduled: bool,
    viewport: Viewport,
    layout: PanelLayout,
    transcript: Transcript,
    pub input: String,
    next_form_id: u64,
    scheduled: Vec<Scheduled>,
    focus: Option<FocusTarget>,
    profile: LeadProfile,
    copy: WidgetConfig,
    timing: TimingConfig,
}

impl WidgetState {
    pub fn new(
        session_id: SessionId,
        copy: WidgetConfig,
        timing: TimingConfig,
        viewport: Viewport,
    ) -> Self {
        Self {
            session_id,
            visibility: Visibility::Minimized,
            auto_opened: false,
            welcome_scheduled: false,
            viewport,
            layout: PanelLayout::for_viewport(viewport),
            transcript: Transcript::default(),
            input: String::new(),
            next_form_id: 1,
            scheduled: Vec::new(),
            focus: None,
            profile: LeadProfile::default(),
            copy,
            timing,
        }
    }

    /// Arms the one-time auto-open. Call once, when the widget first shows.
    pub fn start(&mut self, now: Instant) {
        self.schedule(now + self.timing.auto_open(), Deferred::AutoOpen);
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_expanded(&self) -> bool {
        self.visibility == Visibility::Expanded
    }

    pub fn layout(&self) -> PanelLayout {
        self.layout
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    #[cfg(test)]
    pub fn profile(&self) -> &LeadProfile {
        &self.profile
    }

    pub fn form_mut(&mut self, id: FormId) -> Option<&mut InlineForm> {
        self.transcript.form_mut(id)
    }

    pub fn maximize(&mut self, now: Instant) {
        self.visibility = Visibility::Expanded;
        self.layout = PanelLayout::for_viewport(self.viewport);

        if !self.welcome_scheduled {
            self.welcome_scheduled = true;
            if self.transcript.is_empty() {
                self.schedule(now + self.timing.welcome(), Deferred::Welcome);
            }
        }
        self.schedule(
            now + self.timing.input_focus(),
            Deferred::Focus(FocusTarget::Input),
        );
    }

    pub fn minimize(&mut self) {
        self.visibility = Visibility::Minimized;
    }

    /// Recomputes panel dimensions; conversation state is untouched.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if self.is_expanded() {
            self.layout = PanelLayout::for_viewport(viewport);
        }
    }

    /// Sends the current input. Blank input is a no-op.
    pub fn submit_input(&mut self) -> Option<Command> {
        let message = self.input.trim().to_string();
        if message.is_empty() {
            return None;
        }

        self.transcript.push_turn(Turn::user(message.clone()));
        self.input.clear();
        self.transcript.show_typing();
        Some(Command::SendChat { message })
    }

    pub fn submit_form(&mut self, id: FormId) -> Option<Command> {
        let form = self.transcript.form_mut(id)?;
        if form.status == FormStatus::Submitting {
            return None;
        }
        form.error = None;

        match form.validate() {
            Ok(submission) => {
                form.begin_submit();
                self.scheduled
                    .retain(|entry| entry.action != Deferred::DismissForm(id));
                Some(match form.kind {
                    FormKind::Info => Command::SubmitInfo {
                        form_id: id,
                        submission,
                    },
                    FormKind::Demo => Command::SubmitDemo {
                        form_id: id,
                        submission,
                    },
                })
            }
            Err(err) => {
                form.fail(err.to_string());
                None
            }
        }
    }

    pub fn apply(&mut self, event: AppEvent, now: Instant) -> Vec<Command> {
        match event {
            AppEvent::ChatReplied(response) => {
                self.apply_chat_reply(response, now);
                Vec::new()
            }
            AppEvent::ChatFailed(detail) => {
                self.transcript.clear_typing();
                self.transcript.push_turn(Turn::new(
                    Author::Bot,
                    connection_error_message(&detail),
                    TurnKind::ConnectionError,
                ));
                self.schedule(
                    now + self.timing.refocus_after_reply(),
                    Deferred::Focus(FocusTarget::Input),
                );
                Vec::new()
            }
            AppEvent::FormResponded { form_id, response } => {
                self.apply_form_response(form_id, response, now)
            }
            AppEvent::FormFailed { form_id, detail } => {
                match self.transcript.form_mut(form_id) {
                    Some(form) => form.fail(connection_error_message(&detail)),
                    None => tracing::debug!(%form_id, "transport failure for a form no longer shown"),
                }
                Vec::new()
            }
        }
    }

    fn apply_chat_reply(&mut self, response: ChatResponse, now: Instant) {
        self.transcript.clear_typing();

        if response.lead_score.is_some() {
            self.profile.lead_score = response.lead_score;
        }
        if response.stage.is_some() {
            self.profile.stage = response.stage.clone();
        }

        if let Some(error) = response.error.filter(|error| !error.is_empty()) {
            self.transcript
                .push_turn(Turn::new(Author::Bot, error, TurnKind::ServiceError));
        } else {
            let text = response
                .message
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| self.copy.fallback_reply.clone());
            self.transcript.push_turn(Turn::bot(text));

            let reveal_at = now + self.timing.form_reveal();
            if response.show_demo_form {
                self.schedule(reveal_at, Deferred::RevealForm(FormKind::Demo));
            }
            if response.show_info_form {
                self.schedule(reveal_at, Deferred::RevealForm(FormKind::Info));
            }
        }

        self.schedule(
            now + self.timing.refocus_after_reply(),
            Deferred::Focus(FocusTarget::Input),
        );
    }

    fn apply_form_response(
        &mut self,
        form_id: FormId,
        response: SubmitResponse,
        now: Instant,
    ) -> Vec<Command> {
        if !response.success {
            let Some(kind) = self.transcript.form(form_id).map(|form| form.kind) else {
                tracing::debug!(%form_id, "rejection for a form no longer shown");
                return Vec::new();
            };
            let mut message = response.display_message();
            if message.is_empty() {
                message = SUBMIT_FAILED_FALLBACK.to_string();
            }
            if let Some(form) = self.transcript.form_mut(form_id) {
                form.fail(message);
            }
            if kind == FormKind::Info && !response.show_form_again {
                self.schedule(
                    now + self.timing.form_dismiss(),
                    Deferred::DismissForm(form_id),
                );
            }
            return Vec::new();
        }

        let removed = self.transcript.remove_form(form_id);
        self.transcript
            .push_turn(Turn::system(response.display_message()));

        match removed {
            Some(form) if form.kind == FormKind::Info => {
                self.schedule(
                    now + self.timing.input_focus(),
                    Deferred::Focus(FocusTarget::Input),
                );
                Vec::new()
            }
            Some(form) => form
                .validate()
                .ok()
                .map(|submission| Command::LogLead {
                    submission,
                    profile: self.profile.clone(),
                })
                .into_iter()
                .collect(),
            None => {
                tracing::debug!(%form_id, "confirmation for a form no longer shown");
                Vec::new()
            }
        }
    }

    /// Fires every deferred action due at or before `now`, in due order.
    pub fn advance(&mut self, now: Instant) {
        if self.scheduled.iter().all(|entry| entry.due > now) {
            return;
        }

        let (mut due, pending): (Vec<Scheduled>, Vec<Scheduled>) = self
            .scheduled
            .drain(..)
            .partition(|entry| entry.due <= now);
        self.scheduled = pending;
        due.sort_by_key(|entry| entry.due);

        for entry in due {
            self.run(entry.action, now);
        }
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.scheduled.iter().map(|entry| entry.due).min()
    }

    pub fn take_focus_request(&mut self) -> Option<FocusTarget> {
        self.focus.take()
    }

    fn only_welcome_shown(&self) -> bool {
        self.transcript.entries().iter().all(|entry| {
            matches!(entry, Entry::Turn(turn) if turn.kind == TurnKind::Welcome)
        })
    }

    fn schedule(&mut self, due: Instant, action: Deferred) {
        self.scheduled.push(Scheduled { due, action });
    }

    fn run(&mut self, action: Deferred, now: Instant) {
        match action {
            Deferred::AutoOpen => {
                if !self.auto_opened && !self.is_expanded() {
                    self.auto_opened = true;
                    tracing::debug!("auto-opening chat panel");
                    self.maximize(now);
                    self.schedule(now + self.timing.auto_minimize(), Deferred::AutoMinimize);
                }
            }
            Deferred::AutoMinimize => {
                if self.is_expanded() && self.only_welcome_shown() {
                    tracing::debug!("no interaction after auto-open, minimizing");
                    self.minimize();
                }
            }
            Deferred::Welcome => {
                self.transcript.push_turn(Turn::new(
                    Author::Bot,
                    self.copy.welcome_message.clone(),
                    TurnKind::Welcome,
                ));
            }
            Deferred::Focus(FocusTarget::FormName(id)) if self.transcript.form(id).is_none() => {}
            Deferred::Focus(target) => self.focus = Some(target),
            Deferred::RevealForm(kind) => {
                let id = FormId(self.next_form_id);
                self.next_form_id += 1;
                tracing::debug!(kind = kind.as_str(), form_id = %id, "revealing inline form");
                self.transcript.insert_form(InlineForm::new(id, kind));
                self.schedule(
                    now + self.timing.form_focus(),
                    Deferred::Focus(FocusTarget::FormName(id)),
                );
            }
            Deferred::DismissForm(id) => {
                if self.transcript.remove_form(id).is_some() {
                    tracing::debug!(form_id = %id, "dismissed inline form");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const REVEAL: Duration = Duration::from_millis(800);

    fn state() -> WidgetState {
        WidgetState::new(
            SessionId::generate(),
            WidgetConfig::default(),
            TimingConfig::default(),
            Viewport {
                width: 1280.0,
                height: 800.0,
            },
        )
    }

    fn entry_kinds(state: &WidgetState) -> Vec<&'static str> {
        state
            .transcript()
            .entries()
            .iter()
            .map(|entry| match entry {
                Entry::Turn(turn) => turn.author.css_class(),
                Entry::Typing => "typing",
                Entry::Form(form) => form.kind.as_str(),
            })
            .collect()
    }

    fn reply(message: &str) -> ChatResponse {
        ChatResponse {
            message: Some(message.to_string()),
            ..Default::default()
        }
    }

    fn open_form(state: &mut WidgetState, kind: FormKind, now: Instant) -> FormId {
        let mut response = reply("ok");
        match kind {
            FormKind::Info => response.show_info_form = true,
            FormKind::Demo => response.show_demo_form = true,
        }
        state.apply(AppEvent::ChatReplied(response), now);
        state.advance(now + REVEAL);
        state
            .transcript()
            .forms()
            .last()
            .map(|form| form.id)
            .expect("form should be revealed")
    }

    fn fill(state: &mut WidgetState, id: FormId, name: &str, email: &str) {
        let form = state.form_mut(id).expect("form present");
        form.name = name.to_string();
        form.email = email.to_string();
    }

    #[test]
    fn starts_minimized_with_empty_transcript() {
        let state = state();
        assert_eq!(state.visibility(), Visibility::Minimized);
        assert!(state.transcript().is_empty());
        assert!(state.next_due().is_none());
    }

    #[test]
    fn auto_opens_once_then_minimizes_when_only_welcome_shown() {
        let mut state = state();
        let t0 = Instant::now();
        state.start(t0);

        state.advance(t0 + Duration::from_millis(2_999));
        assert_eq!(state.visibility(), Visibility::Minimized);

        state.advance(t0 + Duration::from_secs(3));
        assert!(state.is_expanded());
        state.advance(t0 + Duration::from_secs(4));
        assert_eq!(entry_kinds(&state), ["bot"]);

        state.advance(t0 + Duration::from_millis(12_999));
        assert!(state.is_expanded());
        state.advance(t0 + Duration::from_secs(13));
        assert_eq!(state.visibility(), Visibility::Minimized);

        state.advance(t0 + Duration::from_secs(60));
        assert_eq!(state.visibility(), Visibility::Minimized);
        assert!(state.next_due().is_none());
    }

    #[test]
    fn auto_minimize_skipped_once_user_has_sent_a_message() {
        let mut state = state();
        let t0 = Instant::now();
        state.start(t0);
        state.advance(t0 + Duration::from_secs(4));

        state.input = "do you integrate with SAP?".to_string();
        state.submit_input().expect("command issued");
        state.apply(AppEvent::ChatReplied(reply("Yes")), t0 + Duration::from_secs(5));

        state.advance(t0 + Duration::from_secs(13));
        assert!(state.is_expanded());
    }

    #[test]
    fn auto_open_does_nothing_when_user_already_opened() {
        let mut state = state();
        let t0 = Instant::now();
        state.start(t0);
        state.maximize(t0 + Duration::from_secs(1));

        state.advance(t0 + Duration::from_secs(30));
        assert!(state.is_expanded());
        assert_eq!(state.transcript().turns().count(), 1);
    }

    #[test]
    fn first_expand_welcomes_after_delay_then_focuses_input() {
        let mut state = state();
        let t0 = Instant::now();
        state.maximize(t0);
        assert!(state.is_expanded());

        state.advance(t0 + Duration::from_millis(399));
        assert!(state.transcript().is_empty());

        state.advance(t0 + Duration::from_millis(400));
        let turns: Vec<&Turn> = state.transcript().turns().collect();
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].author, Author::Bot);
        assert_eq!(turns[0].kind, TurnKind::Welcome);
        assert!(state.take_focus_request().is_none());

        state.advance(t0 + Duration::from_millis(500));
        assert_eq!(state.take_focus_request(), Some(FocusTarget::Input));
        assert!(state.take_focus_request().is_none());
    }

    #[test]
    fn welcome_is_only_offered_once() {
        let mut state = state();
        let t0 = Instant::now();
        state.maximize(t0);
        state.minimize();
        state.maximize(t0);
        state.advance(t0 + Duration::from_secs(5));
        assert_eq!(state.transcript().turns().count(), 1);
    }

    #[test]
    fn repeated_visibility_changes_leave_conversation_alone() {
        let mut state = state();
        let t0 = Instant::now();
        state.input = "hello".to_string();
        state.submit_input();
        let before = state.transcript().entries().to_vec();

        state.minimize();
        state.minimize();
        assert_eq!(state.visibility(), Visibility::Minimized);
        assert_eq!(state.transcript().entries(), before.as_slice());

        state.maximize(t0);
        state.maximize(t0);
        state.advance(t0 + Duration::from_secs(1));
        assert!(state.is_expanded());
        assert_eq!(state.transcript().entries(), before.as_slice());
    }

    #[test]
    fn resize_while_expanded_recomputes_layout_only() {
        let mut state = state();
        let t0 = Instant::now();
        state.maximize(t0);
        state.advance(t0 + Duration::from_secs(1));
        let turns = state.transcript().entries().len();

        state.resize(Viewport {
            width: 400.0,
            height: 700.0,
        });
        assert!(state.is_expanded());
        assert_eq!(state.layout().width, 384.0);
        assert_eq!(state.transcript().entries().len(), turns);
    }

    #[test]
    fn blank_input_is_a_no_op() {
        let mut state = state();
        for blank in ["", "   ", "\n\t "] {
            state.input = blank.to_string();
            assert!(state.submit_input().is_none());
        }
        assert!(state.transcript().is_empty());
    }

    #[test]
    fn send_appends_user_turn_and_typing_then_one_bot_turn() {
        let mut state = state();
        let t0 = Instant::now();
        state.input = "  pricing?  ".to_string();
        let command = state.submit_input().expect("command issued");
        assert_eq!(
            command,
            Command::SendChat {
                message: "pricing?".to_string()
            }
        );
        assert!(state.input.is_empty());
        assert_eq!(entry_kinds(&state), ["user", "typing"]);

        state.apply(AppEvent::ChatReplied(reply("Plans start at...")), t0);
        assert_eq!(entry_kinds(&state), ["user", "bot"]);
        assert_eq!(
            state.transcript().turns().last().map(|turn| turn.text.as_str()),
            Some("Plans start at...")
        );

        state.advance(t0 + Duration::from_millis(100));
        assert_eq!(state.take_focus_request(), Some(FocusTarget::Input));
    }

    #[test]
    fn missing_reply_text_uses_fallback() {
        let mut state = state();
        state.input = "hi".to_string();
        state.submit_input();
        state.apply(
            AppEvent::ChatReplied(ChatResponse {
                message: Some(String::new()),
                ..Default::default()
            }),
            Instant::now(),
        );
        assert_eq!(
            state.transcript().turns().last().map(|turn| turn.text.as_str()),
            Some("Sorry, I couldn't process your request.")
        );
    }

    #[test]
    fn service_error_field_becomes_bot_turn_without_forms() {
        let mut state = state();
        let t0 = Instant::now();
        state.input = "hi".to_string();
        state.submit_input();
        state.apply(
            AppEvent::ChatReplied(ChatResponse {
                error: Some("model unavailable".to_string()),
                show_demo_form: true,
                ..Default::default()
            }),
            t0,
        );
        state.advance(t0 + Duration::from_secs(2));
        let last = state.transcript().turns().last().expect("turn");
        assert_eq!(last.text, "model unavailable");
        assert_eq!(last.kind, TurnKind::ServiceError);
        assert_eq!(state.transcript().forms().count(), 0);
    }

    #[test]
    fn empty_error_field_is_treated_as_absent() {
        let mut state = state();
        let t0 = Instant::now();
        state.input = "hi".to_string();
        state.submit_input();
        state.apply(
            AppEvent::ChatReplied(ChatResponse {
                message: Some("Hello".to_string()),
                error: Some(String::new()),
                show_info_form: true,
                ..Default::default()
            }),
            t0,
        );
        let last = state.transcript().turns().last().expect("turn");
        assert_eq!(last.text, "Hello");
        assert_eq!(last.kind, TurnKind::Normal);

        state.advance(t0 + REVEAL);
        assert_eq!(state.transcript().forms().count(), 1);
    }

    #[test]
    fn transport_failure_replaces_typing_with_connection_error() {
        let mut state = state();
        state.input = "hi".to_string();
        state.submit_input();
        state.apply(
            AppEvent::ChatFailed("HTTP 503: Service Unavailable".to_string()),
            Instant::now(),
        );
        assert_eq!(entry_kinds(&state), ["user", "bot"]);
        let last = state.transcript().turns().last().expect("turn");
        assert_eq!(last.text, "Connection error: HTTP 503: Service Unavailable");
        assert_eq!(last.kind, TurnKind::ConnectionError);
    }

    #[test]
    fn overlapping_sends_keep_a_single_placeholder() {
        let mut state = state();
        let t0 = Instant::now();
        state.input = "one".to_string();
        state.submit_input();
        state.input = "two".to_string();
        state.submit_input();
        assert_eq!(entry_kinds(&state), ["user", "typing", "user"]);

        state.apply(AppEvent::ChatReplied(reply("a")), t0);
        state.apply(AppEvent::ChatReplied(reply("b")), t0);
        assert_eq!(entry_kinds(&state), ["user", "user", "bot", "bot"]);
    }

    #[test]
    fn demo_trigger_reveals_exactly_one_form_after_delay() {
        let mut state = state();
        let t0 = Instant::now();
        let mut response = reply("Let's set up a demo");
        response.show_demo_form = true;
        state.apply(AppEvent::ChatReplied(response), t0);

        state.advance(t0 + Duration::from_millis(799));
        assert_eq!(state.transcript().forms().count(), 0);

        state.advance(t0 + REVEAL);
        state.advance(t0 + Duration::from_secs(3));
        let forms: Vec<&InlineForm> = state.transcript().forms().collect();
        assert_eq!(forms.len(), 1);
        assert_eq!(forms[0].kind, FormKind::Demo);
    }

    #[test]
    fn both_triggers_reveal_both_forms() {
        let mut state = state();
        let t0 = Instant::now();
        let mut response = reply("ok");
        response.show_demo_form = true;
        response.show_info_form = true;
        state.apply(AppEvent::ChatReplied(response), t0);
        state.advance(t0 + REVEAL);
        assert_eq!(entry_kinds(&state), ["bot", "demo", "info"]);
    }

    #[test]
    fn revealed_form_requests_focus_on_name_field() {
        let mut state = state();
        let t0 = Instant::now();
        let id = open_form(&mut state, FormKind::Info, t0);
        state.take_focus_request();
        state.advance(t0 + REVEAL + Duration::from_millis(300));
        assert_eq!(state.take_focus_request(), Some(FocusTarget::FormName(id)));
    }

    #[test]
    fn info_form_validation_blocks_requests() {
        let mut state = state();
        let id = open_form(&mut state, FormKind::Info, Instant::now());

        fill(&mut state, id, "", "a@b.com");
        assert!(state.submit_form(id).is_none());
        let form = state.transcript().form(id).expect("form");
        assert_eq!(form.error.as_deref(), Some("Please fill in both fields."));
        assert!(form.controls_enabled());

        fill(&mut state, id, "A", "not-an-email");
        assert!(state.submit_form(id).is_none());
        assert_eq!(
            state.transcript().form(id).and_then(|form| form.error.as_deref()),
            Some("Please enter a valid email address.")
        );

        fill(&mut state, id, "A", "a@b.com");
        let command = state.submit_form(id).expect("request issued");
        assert!(matches!(command, Command::SubmitInfo { form_id, .. } if form_id == id));
        let form = state.transcript().form(id).expect("form");
        assert!(form.error.is_none());
        assert!(!form.controls_enabled());
        assert_eq!(form.submit_label(), "Submitting...");
    }

    #[test]
    fn in_flight_form_cannot_be_resubmitted() {
        let mut state = state();
        let id = open_form(&mut state, FormKind::Info, Instant::now());
        fill(&mut state, id, "A", "a@b.com");
        assert!(state.submit_form(id).is_some());
        assert!(state.submit_form(id).is_none());
    }

    #[test]
    fn demo_form_accepts_malformed_email() {
        let mut state = state();
        let id = open_form(&mut state, FormKind::Demo, Instant::now());

        fill(&mut state, id, "", "x");
        assert!(state.submit_form(id).is_none());

        fill(&mut state, id, "A", "x");
        let command = state.submit_form(id).expect("request issued");
        assert_eq!(
            command,
            Command::SubmitDemo {
                form_id: id,
                submission: Submission {
                    name: "A".to_string(),
                    email: "x".to_string(),
                    phone: String::new(),
                },
            }
        );
    }

    #[test]
    fn info_success_removes_form_and_appends_one_system_turn() {
        let mut state = state();
        let t0 = Instant::now();
        let id = open_form(&mut state, FormKind::Info, t0);
        fill(&mut state, id, "A", "a@b.com");
        state.submit_form(id);
        let system_before = state
            .transcript()
            .turns()
            .filter(|turn| turn.author == Author::System)
            .count();

        let commands = state.apply(
            AppEvent::FormResponded {
                form_id: id,
                response: SubmitResponse {
                    success: true,
                    message: Some("Thanks A!".to_string()),
                    ..Default::default()
                },
            },
            t0,
        );
        assert!(commands.is_empty());
        assert!(state.transcript().form(id).is_none());
        let system: Vec<&Turn> = state
            .transcript()
            .turns()
            .filter(|turn| turn.author == Author::System)
            .collect();
        assert_eq!(system.len(), system_before + 1);
        assert_eq!(system[system.len() - 1].text, "Thanks A!");
    }

    #[test]
    fn info_failure_keeps_form_when_reshow_requested() {
        let mut state = state();
        let t0 = Instant::now();
        let id = open_form(&mut state, FormKind::Info, t0);
        fill(&mut state, id, "A", "a@gmail.com");
        state.submit_form(id);

        state.apply(
            AppEvent::FormResponded {
                form_id: id,
                response: SubmitResponse {
                    success: false,
                    message: Some("Please use a business email.".to_string()),
                    show_form_again: true,
                    ..Default::default()
                },
            },
            t0,
        );
        state.advance(t0 + Duration::from_secs(10));
        let form = state.transcript().form(id).expect("form kept");
        assert!(form.controls_enabled());
        assert_eq!(form.submit_label(), "Continue");
        assert_eq!(form.error.as_deref(), Some("Please use a business email."));
    }

    #[test]
    fn info_failure_without_reshow_dismisses_form_after_delay() {
        let mut state = state();
        let t0 = Instant::now();
        let id = open_form(&mut state, FormKind::Info, t0);
        fill(&mut state, id, "A", "a@b.com");
        state.submit_form(id);

        state.apply(
            AppEvent::FormResponded {
                form_id: id,
                response: SubmitResponse {
                    success: false,
                    message: Some("Already registered".to_string()),
                    ..Default::default()
                },
            },
            t0,
        );
        state.advance(t0 + Duration::from_millis(1_999));
        assert!(state.transcript().form(id).is_some());
        state.advance(t0 + Duration::from_millis(2_000));
        assert!(state.transcript().form(id).is_none());
    }

    #[test]
    fn retry_after_rejection_survives_dismiss_delay() {
        let mut state = state();
        let t0 = Instant::now();
        let id = open_form(&mut state, FormKind::Info, t0);
        fill(&mut state, id, "A", "a@b.com");
        state.submit_form(id);
        state.apply(
            AppEvent::FormResponded {
                form_id: id,
                response: SubmitResponse {
                    success: false,
                    error: Some("Temporary error".to_string()),
                    ..Default::default()
                },
            },
            t0,
        );

        assert!(state.submit_form(id).is_some());
        state.advance(t0 + Duration::from_millis(2_000));
        assert!(state.transcript().form(id).is_some());

        state.apply(
            AppEvent::FormResponded {
                form_id: id,
                response: SubmitResponse {
                    success: true,
                    message: Some("Thanks A!".to_string()),
                    ..Default::default()
                },
            },
            t0 + Duration::from_millis(2_500),
        );
        assert!(state.transcript().form(id).is_none());
        assert_eq!(
            state.transcript().turns().last().map(|turn| (turn.author, turn.text.as_str())),
            Some((Author::System, "Thanks A!"))
        );
    }

    #[test]
    fn confirmation_for_dismissed_form_is_still_shown() {
        let mut state = state();
        let t0 = Instant::now();
        let id = open_form(&mut state, FormKind::Info, t0);
        fill(&mut state, id, "A", "a@b.com");
        state.submit_form(id);
        state.apply(
            AppEvent::FormResponded {
                form_id: id,
                response: SubmitResponse {
                    success: false,
                    ..Default::default()
                },
            },
            t0,
        );
        state.advance(t0 + Duration::from_secs(2));
        assert!(state.transcript().form(id).is_none());

        let commands = state.apply(
            AppEvent::FormResponded {
                form_id: id,
                response: SubmitResponse {
                    success: true,
                    message: Some("Saved".to_string()),
                    ..Default::default()
                },
            },
            t0 + Duration::from_secs(3),
        );
        assert!(commands.is_empty());
        assert_eq!(
            state.transcript().turns().last().map(|turn| (turn.author, turn.text.as_str())),
            Some((Author::System, "Saved"))
        );
    }

    #[test]
    fn form_transport_failure_shows_inline_connection_error() {
        let mut state = state();
        let id = open_form(&mut state, FormKind::Demo, Instant::now());
        fill(&mut state, id, "A", "a@corp.com");
        state.submit_form(id);

        state.apply(
            AppEvent::FormFailed {
                form_id: id,
                detail: "error sending request".to_string(),
            },
            Instant::now(),
        );
        let form = state.transcript().form(id).expect("form kept");
        assert_eq!(
            form.error.as_deref(),
            Some("Connection error: error sending request")
        );
        assert!(form.controls_enabled());
    }

    #[test]
    fn demo_success_logs_lead_with_profile() {
        let mut state = state();
        let t0 = Instant::now();
        let mut response = reply("Great");
        response.show_demo_form = true;
        response.lead_score = Some(55);
        response.stage = Some("warm_lead".to_string());
        state.apply(AppEvent::ChatReplied(response), t0);
        state.advance(t0 + REVEAL);
        let id = state.transcript().forms().next().map(|form| form.id).expect("form");

        fill(&mut state, id, "Ada", "ada@corp.com");
        state.form_mut(id).expect("form").phone = " 555 ".to_string();
        state.submit_form(id);

        let commands = state.apply(
            AppEvent::FormResponded {
                form_id: id,
                response: SubmitResponse {
                    success: true,
                    message: Some("Demo booked".to_string()),
                    ..Default::default()
                },
            },
            t0,
        );
        assert_eq!(
            commands,
            vec![Command::LogLead {
                submission: Submission {
                    name: "Ada".to_string(),
                    email: "ada@corp.com".to_string(),
                    phone: "555".to_string(),
                },
                profile: LeadProfile {
                    lead_score: Some(55),
                    stage: Some("warm_lead".to_string()),
                },
            }]
        );
        assert!(state.transcript().form(id).is_none());
        assert_eq!(
            state.transcript().turns().last().map(|turn| (turn.author, turn.text.as_str())),
            Some((Author::System, "Demo booked"))
        );
    }

    #[test]
    fn demo_failure_keeps_form_for_retry() {
        let mut state = state();
        let t0 = Instant::now();
        let id = open_form(&mut state, FormKind::Demo, t0);
        fill(&mut state, id, "A", "a@gmail.com");
        state.submit_form(id);

        let commands = state.apply(
            AppEvent::FormResponded {
                form_id: id,
                response: SubmitResponse {
                    success: false,
                    message: Some("Please provide a business email address.".to_string()),
                    ..Default::default()
                },
            },
            t0,
        );
        assert!(commands.is_empty());
        state.advance(t0 + Duration::from_secs(10));
        let form = state.transcript().form(id).expect("form kept");
        assert_eq!(form.submit_label(), "Schedule Demo");
        assert!(form.controls_enabled());
    }
}
