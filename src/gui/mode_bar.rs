use eframe::egui;

use crate::core::content::Mode;

/// The right-hand strip for switching between the source and the generated artifacts.
pub fn show(ctx: &egui::Context, current: Mode) -> Option<Mode> {
    let mut picked = None;

    egui::SidePanel::right("mode_sidebar").exact_width(96.0).resizable(false).show(ctx, |ui| {
        ui.add_space(8.0);
        ui.vertical_centered_justified(|ui| {
            for mode in Mode::ALL {
                let text = format!("{}\n{}", mode.icon(), mode.label());
                if ui.selectable_label(mode == current, text).clicked() && mode != current {
                    picked = Some(mode);
                }
                ui.add_space(4.0);
            }
        });
    });

    picked
}
