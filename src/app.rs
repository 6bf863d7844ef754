use crate::event::AppEvent;
use crate::service::ChatServiceClient;
use crate::theme::Theme;
use crate::ui;
use crate::ui::event::UiAction;
use crate::ui::markup::transcript_html;
use crate::widget::layout::Viewport;
use crate::widget::{Command, WidgetState};
use eframe::egui::{self, RichText};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Instant;

pub struct PalmsApp {
    rx: Receiver<AppEvent>,
    service: ChatServiceClient,
    state: WidgetState,
    theme: Theme,
    visuals_applied: bool,
}

impl PalmsApp {
    pub fn new(rx: Receiver<AppEvent>, service: ChatServiceClient, state: WidgetState) -> Self {
        Self {
            rx,
            service,
            state,
            theme: Theme::default(),
            visuals_applied: false,
        }
    }

    fn execute(&self, commands: impl IntoIterator<Item = Command>) {
        for command in commands {
            self.service.execute(command);
        }
    }

    fn drain_events(&mut self, ctx: &egui::Context) {
        loop {
            match self.rx.try_recv() {
                Ok(event) => {
                    let commands = self.state.apply(event, Instant::now());
                    self.execute(commands);
                    ctx.request_repaint();
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::warn!("event channel disconnected");
                    break;
                }
            }
        }
    }

    fn sync_viewport(&mut self, ctx: &egui::Context) {
        let rect = ctx.screen_rect();
        let viewport = Viewport {
            width: rect.width(),
            height: rect.height(),
        };
        if viewport != self.state.viewport() {
            self.state.resize(viewport);
        }
    }

    fn handle_action(&mut self, action: UiAction, ctx: &egui::Context) {
        tracing::debug!(session_id = %self.state.session_id(), "{}", action.to_log_line());
        match action {
            UiAction::Maximize => self.state.maximize(Instant::now()),
            UiAction::Minimize => self.state.minimize(),
            UiAction::SendInput => {
                if let Some(command) = self.state.submit_input() {
                    self.execute([command]);
                }
            }
            UiAction::SubmitForm(form_id) => {
                if let Some(command) = self.state.submit_form(form_id) {
                    self.execute([command]);
                }
            }
            UiAction::CopyTranscript => {
                ctx.copy_text(transcript_html(self.state.transcript().turns()));
            }
        }
        ctx.request_repaint();
    }

    fn render_page(&self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(ui.available_height() / 3.0);
                ui.label(
                    RichText::new("PALMS™ Warehouse Management")
                        .size(28.0)
                        .color(self.theme.text_muted),
                );
            });
        });
    }
}

impl eframe::App for PalmsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.visuals_applied {
            self.theme.apply_visuals(ctx);
            self.visuals_applied = true;
        }

        self.sync_viewport(ctx);
        self.drain_events(ctx);

        let now = Instant::now();
        self.state.advance(now);
        let focus = self.state.take_focus_request();

        self.render_page(ctx);
        let actions = ui::widget::show(ctx, &mut self.state, &self.theme, focus);
        for action in actions {
            self.handle_action(action, ctx);
        }

        if let Some(due) = self.state.next_due() {
            ctx.request_repaint_after(due.saturating_duration_since(now));
        }
    }
}
