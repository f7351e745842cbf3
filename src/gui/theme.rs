use eframe::egui::{
    self,
    Color32,
    RichText,
    Visuals,
};

/// Accent colors used on top of egui's stock light and dark visuals.
#[derive(Clone, Copy, Debug)]
pub struct Palette {
    pub accent: Color32,
    pub success: Color32,
    pub error: Color32,
    pub warning: Color32,
    pub muted: Color32,
}

impl Palette {
    pub fn for_mode(dark: bool) -> Self {
        if dark {
            Self {
                accent: Color32::from_rgb(0x8b, 0x7c, 0xf6),
                success: Color32::from_rgb(0x50, 0xfa, 0x7b),
                error: Color32::from_rgb(0xff, 0x55, 0x55),
                warning: Color32::from_rgb(0xf1, 0xfa, 0x8c),
                muted: Color32::from_rgb(0x93, 0x9a, 0xb8),
            }
        } else {
            Self {
                accent: Color32::from_rgb(0x63, 0x4d, 0xe0),
                success: Color32::from_rgb(0x1f, 0x9d, 0x55),
                error: Color32::from_rgb(0xcb, 0x3a, 0x3a),
                warning: Color32::from_rgb(0xb5, 0x84, 0x00),
                muted: Color32::from_rgb(0x6b, 0x72, 0x80),
            }
        }
    }

    pub fn current(ctx: &egui::Context) -> Self {
        Self::for_mode(ctx.style().visuals.dark_mode)
    }

    pub fn heading(&self, content: &str) -> RichText {
        RichText::new(content).color(self.accent).strong()
    }

    pub fn hint(&self, content: &str) -> RichText {
        RichText::new(content).color(self.muted)
    }
}

pub fn set_theme(ctx: &egui::Context, dark: bool) {
    let palette = Palette::for_mode(dark);
    let mut visuals = if dark { Visuals::dark() } else { Visuals::light() };
    visuals.selection.bg_fill = palette.accent.linear_multiply(0.6);
    visuals.hyperlink_color = palette.accent;
    ctx.set_visuals(visuals);
}
