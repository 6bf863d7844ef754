use crate::session::{Author, Turn};
use crate::theme::Theme;
use crate::ui::event::UiAction;
use crate::ui::form::render_form;
use crate::ui::markup::to_lines;
use crate::widget::layout::{ICON_MARGIN, ICON_SIZE};
use crate::widget::transcript::Entry;
use crate::widget::{FocusTarget, WidgetState};
use eframe::egui::{self, Align, Align2, Color32, FontId, Layout, RichText, ScrollArea};
use eframe::egui::text::{LayoutJob, TextFormat};

const TITLE: &str = "PALMS™ Assistant";
const INPUT_HINT: &str = "Type your message...";
const BUBBLE_WIDTH_RATIO: f32 = 0.8;

/// Draws the floating widget and returns what the user did this frame.
pub fn show(
    ctx: &egui::Context,
    state: &mut WidgetState,
    theme: &Theme,
    focus: Option<FocusTarget>,
) -> Vec<UiAction> {
    let mut actions = Vec::new();
    if state.is_expanded() {
        show_panel(ctx, state, theme, focus, &mut actions);
    } else {
        show_icon(ctx, theme, &mut actions);
    }
    actions
}

fn show_icon(ctx: &egui::Context, theme: &Theme, actions: &mut Vec<UiAction>) {
    egui::Area::new(egui::Id::new("palms_icon"))
        .anchor(Align2::RIGHT_BOTTOM, egui::vec2(-ICON_MARGIN, -ICON_MARGIN))
        .show(ctx, |ui| {
            let (rect, response) =
                ui.allocate_exact_size(egui::vec2(ICON_SIZE, ICON_SIZE), egui::Sense::click());
            let fill = if response.hovered() {
                theme.brand_muted
            } else {
                theme.brand
            };
            let painter = ui.painter();
            painter.circle_filled(rect.center(), ICON_SIZE / 2.0, fill);
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "💬",
                FontId::proportional(26.0),
                theme.text_on_brand,
            );

            if response
                .on_hover_cursor(egui::CursorIcon::PointingHand)
                .clicked()
            {
                actions.push(UiAction::Maximize);
            }
        });
}

fn show_panel(
    ctx: &egui::Context,
    state: &mut WidgetState,
    theme: &Theme,
    focus: Option<FocusTarget>,
    actions: &mut Vec<UiAction>,
) {
    let layout = state.layout();
    let body_height = layout
        .body_height
        .min(layout.height - theme.header_height - theme.composer_height)
        .max(0.0);

    egui::Area::new(egui::Id::new("palms_panel"))
        .anchor(
            Align2::RIGHT_BOTTOM,
            egui::vec2(-layout.margin, -layout.margin),
        )
        .show(ctx, |ui| {
            theme.panel_frame().show(ui, |ui| {
                ui.set_width(layout.width);
                ui.set_height(layout.height);
                ui.spacing_mut().item_spacing.y = 0.0;

                render_header(ui, theme, actions);

                let bubble_width = (layout.width - 2.0 * theme.spacing_16) * BUBBLE_WIDTH_RATIO;
                egui::Frame::new()
                    .inner_margin(egui::Margin::same(theme.spacing_16 as i8))
                    .show(ui, |ui| {
                        ScrollArea::vertical()
                            .id_salt("palms_transcript")
                            .auto_shrink([false, false])
                            .max_height(body_height)
                            .min_scrolled_height(body_height)
                            .stick_to_bottom(true)
                            .show(ui, |ui| {
                                ui.spacing_mut().item_spacing.y = theme.spacing_8;
                                render_entries(ui, state, theme, focus, bubble_width, actions);
                            });
                    });

                ui.with_layout(Layout::bottom_up(Align::Min), |ui| {
                    render_composer(ui, state, theme, focus, actions);
                });
            });
        });
}

fn render_header(ui: &mut egui::Ui, theme: &Theme, actions: &mut Vec<UiAction>) {
    theme.header_frame().show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.horizontal(|ui| {
            ui.label(
                RichText::new(TITLE)
                    .strong()
                    .size(16.0)
                    .color(theme.text_on_brand),
            );
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if ui
                    .add(egui::Button::new(RichText::new("−").color(theme.text_on_brand)).frame(false))
                    .on_hover_text("Minimize")
                    .clicked()
                {
                    actions.push(UiAction::Minimize);
                }
                if ui
                    .add(egui::Button::new(RichText::new("⧉").color(theme.text_on_brand)).frame(false))
                    .on_hover_text("Copy conversation as HTML")
                    .clicked()
                {
                    actions.push(UiAction::CopyTranscript);
                }
            });
        });
    });
}

fn render_entries(
    ui: &mut egui::Ui,
    state: &mut WidgetState,
    theme: &Theme,
    focus: Option<FocusTarget>,
    bubble_width: f32,
    actions: &mut Vec<UiAction>,
) {
    for index in 0..state.transcript().entries().len() {
        match &state.transcript().entries()[index] {
            Entry::Turn(turn) => render_turn(ui, turn, theme, bubble_width),
            Entry::Typing => {
                ui.with_layout(Layout::left_to_right(Align::Min), |ui| {
                    theme.bubble_frame(Author::Bot).show(ui, |ui| {
                        ui.add(egui::Spinner::new().size(14.0).color(theme.text_muted));
                    });
                });
            }
            Entry::Form(form) => {
                let id = form.id;
                if let Some(form) = state.form_mut(id) {
                    render_form(ui, form, theme, focus, actions);
                }
            }
        }
    }
}

fn render_turn(ui: &mut egui::Ui, turn: &Turn, theme: &Theme, bubble_width: f32) {
    let layout = match turn.author {
        Author::User => Layout::right_to_left(Align::Min),
        Author::Bot | Author::System => Layout::left_to_right(Align::Min),
    };
    let job = bubble_job(turn, theme, bubble_width);

    ui.with_layout(layout, |ui| {
        theme.bubble_frame(turn.author).show(ui, |ui| {
            ui.label(job);
        });
    });
}

fn bubble_job(turn: &Turn, theme: &Theme, max_width: f32) -> LayoutJob {
    let color = theme.bubble_text(turn.author, turn.kind);
    let base = TextFormat {
        font_id: FontId::proportional(14.0),
        color,
        ..Default::default()
    };

    let mut job = LayoutJob::default();
    job.wrap.max_width = max_width;

    for (index, line) in to_lines(&turn.text).iter().enumerate() {
        if index > 0 {
            job.append("\n", 0.0, base.clone());
        }

        let mut leading_space = if line.bullet { theme.bullet_indent } else { 0.0 };
        for span in &line.spans {
            let mut format = base.clone();
            if span.bold && turn.author != Author::User {
                format.color = Color32::BLACK;
            }
            if span.header {
                format.font_id = FontId::proportional(15.0);
                if turn.author != Author::User {
                    format.color = theme.heading;
                }
            }
            job.append(&span.text, leading_space, format);
            leading_space = 0.0;
        }
    }

    job
}

fn render_composer(
    ui: &mut egui::Ui,
    state: &mut WidgetState,
    theme: &Theme,
    focus: Option<FocusTarget>,
    actions: &mut Vec<UiAction>,
) {
    theme.composer_frame().show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.horizontal(|ui| {
            let send_width = 64.0;
            let input = ui.add(
                egui::TextEdit::singleline(&mut state.input)
                    .hint_text(INPUT_HINT)
                    .desired_width(ui.available_width() - send_width - theme.spacing_8),
            );
            if focus == Some(FocusTarget::Input) {
                input.request_focus();
            }

            let entered = input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            let send = egui::Button::new(RichText::new("Send").color(theme.text_on_brand))
                .fill(theme.brand)
                .min_size(egui::vec2(send_width, 0.0));
            if ui.add(send).clicked() || entered {
                actions.push(UiAction::SendInput);
            }
        });
    });
}
