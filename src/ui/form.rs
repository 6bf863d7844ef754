use crate::theme::Theme;
use crate::ui::event::UiAction;
use crate::widget::form::{InlineForm, PHONE_PLACEHOLDER};
use crate::widget::FocusTarget;
use eframe::egui::{self, RichText};

pub fn render_form(
    ui: &mut egui::Ui,
    form: &mut InlineForm,
    theme: &Theme,
    focus: Option<FocusTarget>,
    actions: &mut Vec<UiAction>,
) {
    let enabled = form.controls_enabled();

    theme.form_frame().show(ui, |ui| {
        ui.spacing_mut().item_spacing.y = theme.spacing_8;
        ui.label(
            RichText::new(form.kind.title())
                .strong()
                .color(theme.text_primary),
        );

        let name = ui.add_enabled(
            enabled,
            egui::TextEdit::singleline(&mut form.name)
                .hint_text(form.kind.name_placeholder())
                .desired_width(f32::INFINITY),
        );
        if focus == Some(FocusTarget::FormName(form.id)) {
            name.request_focus();
        }

        ui.add_enabled(
            enabled,
            egui::TextEdit::singleline(&mut form.email)
                .hint_text(form.kind.email_placeholder())
                .desired_width(f32::INFINITY),
        );

        if form.kind.has_phone() {
            ui.add_enabled(
                enabled,
                egui::TextEdit::singleline(&mut form.phone)
                    .hint_text(PHONE_PLACEHOLDER)
                    .desired_width(f32::INFINITY),
            );
        }

        let submit = egui::Button::new(
            RichText::new(form.submit_label()).color(theme.text_on_brand),
        )
        .fill(theme.brand)
        .min_size(egui::vec2(ui.available_width(), 32.0));
        if ui.add_enabled(enabled, submit).clicked() {
            actions.push(UiAction::SubmitForm(form.id));
        }

        if let Some(error) = &form.error {
            ui.label(RichText::new(error).color(theme.danger).size(12.0));
        }
    });
}
