pub const ICON_SIZE: f32 = 64.0;
pub const ICON_MARGIN: f32 = 24.0;
const MIN_BODY_HEIGHT: f32 = 300.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

/// Dimensions of the expanded panel for a given viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelLayout {
    pub width: f32,
    pub height: f32,
    /// Distance from the bottom and right viewport edges.
    pub margin: f32,
    pub body_height: f32,
}

impl PanelLayout {
    pub fn for_viewport(viewport: Viewport) -> Self {
        let Viewport { width, height } = viewport;
        let (panel_width, panel_height, margin, body_height) = if width <= 480.0 {
            (width - 16.0, height - 60.0, 8.0, height - 160.0)
        } else if width <= 768.0 {
            (width - 24.0, height - 80.0, 12.0, height - 180.0)
        } else if width <= 1200.0 {
            (420.0, 600.0, 24.0, 450.0)
        } else {
            (480.0, 650.0, 32.0, 450.0)
        };

        Self {
            width: panel_width.max(0.0),
            height: panel_height.max(0.0),
            margin,
            body_height: body_height.max(MIN_BODY_HEIGHT),
        }
    }
}
