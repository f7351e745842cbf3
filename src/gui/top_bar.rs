use eframe::egui::{
    self,
    containers,
};

use crate::gui::theme::Palette;

pub enum TopBarAction {
    RefreshSubjects,
    ToggleTheme,
    Logout,
}

pub struct TopBar;

impl TopBar {
    pub fn show(ctx: &egui::Context, dark_mode: bool, busy: bool) -> Option<TopBarAction> {
        let palette = Palette::current(ctx);
        let mut action = None;

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            containers::menu::Bar::new().ui(ui, |ui| {
                ui.label(palette.heading("MindMate"));
                ui.separator();

                ui.menu_button("File", |ui| {
                    if ui.button("Refresh subjects").clicked() {
                        action = Some(TopBarAction::RefreshSubjects);
                    }
                    if ui.button("Log out").clicked() {
                        action = Some(TopBarAction::Logout);
                    }
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Log out").clicked() {
                        action = Some(TopBarAction::Logout);
                    }
                    let theme_icon = if dark_mode { "☀" } else { "🌙" };
                    if ui.button(theme_icon).on_hover_text("Toggle theme").clicked() {
                        action = Some(TopBarAction::ToggleTheme);
                    }
                    if busy {
                        ui.spinner().on_hover_text("Processing in the background");
                    }
                });
            });
        });

        action
    }
}
