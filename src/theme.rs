use crate::session::{Author, TurnKind};
use eframe::egui::{self, Color32, CornerRadius, FontId, Frame, Margin, Stroke, TextStyle};

#[derive(Debug, Clone)]
pub struct Theme {
    pub page_fill: Color32,
    pub panel_fill: Color32,
    pub brand: Color32,
    pub brand_muted: Color32,
    pub user_bubble: Color32,
    pub bot_bubble: Color32,
    pub system_bubble: Color32,
    pub form_fill: Color32,
    pub danger: Color32,
    pub heading: Color32,
    pub text_primary: Color32,
    pub text_muted: Color32,
    pub text_on_brand: Color32,
    pub border_subtle: Color32,
    pub spacing_8: f32,
    pub spacing_12: f32,
    pub spacing_16: f32,
    pub bullet_indent: f32,
    pub radius_8: u8,
    pub radius_12: u8,
    pub header_height: f32,
    pub composer_height: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            page_fill: Color32::from_rgb(0xE9, 0xEC, 0xEF),
            panel_fill: Color32::from_rgb(0xFA, 0xFB, 0xFC),
            brand: Color32::from_rgb(0x2F, 0x5D, 0x50),
            brand_muted: Color32::from_rgb(0x3D, 0x75, 0x65),
            user_bubble: Color32::from_rgb(0x2F, 0x5D, 0x50),
            bot_bubble: Color32::WHITE,
            system_bubble: Color32::from_rgb(0xE8, 0xF5, 0xE9),
            form_fill: Color32::WHITE,
            danger: Color32::from_rgb(0xD3, 0x2F, 0x2F),
            heading: Color32::from_rgb(0x2C, 0x5A, 0xA0),
            text_primary: Color32::from_rgb(0x21, 0x25, 0x29),
            text_muted: Color32::from_rgb(0x6C, 0x75, 0x7D),
            text_on_brand: Color32::WHITE,
            border_subtle: Color32::from_rgb(0xE1, 0xE5, 0xE9),
            spacing_8: 8.0,
            spacing_12: 12.0,
            spacing_16: 16.0,
            bullet_indent: 15.0,
            radius_8: 8,
            radius_12: 12,
            header_height: 52.0,
            composer_height: 64.0,
        }
    }
}

impl Theme {
    pub fn apply_visuals(&self, ctx: &egui::Context) {
        let mut visuals = egui::Visuals::light();
        visuals.panel_fill = self.page_fill;
        visuals.window_fill = self.panel_fill;
        visuals.override_text_color = Some(self.text_primary);
        visuals.widgets.inactive.bg_fill = self.brand;
        visuals.widgets.inactive.weak_bg_fill = self.brand;
        visuals.widgets.inactive.fg_stroke.color = self.text_on_brand;
        visuals.widgets.hovered.bg_fill = self.brand_muted;
        visuals.widgets.hovered.weak_bg_fill = self.brand_muted;
        visuals.widgets.hovered.fg_stroke.color = self.text_on_brand;
        visuals.widgets.active.bg_fill = self.brand_muted;
        visuals.widgets.active.weak_bg_fill = self.brand_muted;
        visuals.selection.bg_fill = self.brand_muted;
        visuals.selection.stroke = Stroke::new(1.0, self.brand);
        visuals.extreme_bg_color = Color32::WHITE;

        let mut style = (*ctx.style()).clone();
        style.visuals = visuals;
        style.spacing.item_spacing = egui::vec2(8.0, 8.0);
        style.spacing.button_padding = egui::vec2(12.0, 8.0);
        style.text_styles.insert(TextStyle::Heading, FontId::proportional(16.0));
        style.text_styles.insert(TextStyle::Body, FontId::proportional(14.0));
        style.text_styles.insert(TextStyle::Button, FontId::proportional(14.0));
        style.text_styles.insert(TextStyle::Small, FontId::proportional(12.0));
        ctx.set_style(style);
    }

    pub fn panel_frame(&self) -> Frame {
        Frame::new()
            .fill(self.panel_fill)
            .corner_radius(CornerRadius::same(self.radius_12))
            .stroke(Stroke::new(1.0, self.border_subtle))
            .shadow(egui::epaint::Shadow {
                offset: [0, 8],
                blur: 32,
                spread: 0,
                color: Color32::from_rgba_premultiplied(0, 0, 0, 41),
            })
    }

    pub fn header_frame(&self) -> Frame {
        Frame::new()
            .fill(self.brand)
            .inner_margin(Margin::symmetric(self.spacing_16 as i8, self.spacing_12 as i8))
            .corner_radius(CornerRadius {
                nw: self.radius_12,
                ne: self.radius_12,
                sw: 0,
                se: 0,
            })
    }

    pub fn bubble_frame(&self, author: Author) -> Frame {
        let (fill, stroke) = match author {
            Author::User => (self.user_bubble, Stroke::NONE),
            Author::Bot => (self.bot_bubble, Stroke::new(1.0, self.border_subtle)),
            Author::System => (self.system_bubble, Stroke::NONE),
        };
        Frame::new()
            .fill(fill)
            .stroke(stroke)
            .inner_margin(Margin::symmetric(self.spacing_12 as i8, 10))
            .corner_radius(CornerRadius::same(self.radius_12))
    }

    pub fn bubble_text(&self, author: Author, kind: TurnKind) -> Color32 {
        match (author, kind) {
            (Author::User, _) => self.text_on_brand,
            (_, TurnKind::ConnectionError) => self.danger,
            _ => self.text_primary,
        }
    }

    pub fn form_frame(&self) -> Frame {
        Frame::new()
            .fill(self.form_fill)
            .stroke(Stroke::new(1.0, self.border_subtle))
            .inner_margin(Margin::same(self.spacing_12 as i8))
            .corner_radius(CornerRadius::same(self.radius_8))
    }

    pub fn composer_frame(&self) -> Frame {
        Frame::new()
            .fill(Color32::WHITE)
            .inner_margin(Margin::symmetric(self.spacing_12 as i8, 10))
            .stroke(Stroke::new(1.0, self.border_subtle))
    }
}
