use std::time::{
    Duration,
    Instant,
};

use eframe::egui;

use crate::gui::theme::Palette;

const TOAST_TTL: Duration = Duration::from_secs(5);
const MAX_TOASTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    created: Instant,
}

/// Short-lived notifications stacked in the bottom-right corner.
#[derive(Debug)]
pub struct Toasts {
    items: Vec<Toast>,
    ttl: Duration,
}

impl Default for Toasts {
    fn default() -> Self {
        Self::new()
    }
}

impl Toasts {
    pub fn new() -> Self {
        Self { items: Vec::new(), ttl: TOAST_TTL }
    }

    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>) {
        self.push_at(kind, message, Instant::now());
    }

    fn push_at(&mut self, kind: ToastKind, message: impl Into<String>, now: Instant) {
        let message = message.into();
        // The same message twice in a row just refreshes the existing toast.
        if let Some(last) = self.items.last_mut() {
            if last.kind == kind && last.message == message {
                last.created = now;
                return;
            }
        }

        self.items.push(Toast { kind, message, created: now });
        if self.items.len() > MAX_TOASTS {
            self.items.remove(0);
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Info, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Error, message);
    }

    pub fn items(&self) -> &[Toast] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn prune(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.items.retain(|toast| now.saturating_duration_since(toast.created) < ttl);
    }

    pub fn show(&mut self, ctx: &egui::Context) {
        self.prune(Instant::now());
        if self.items.is_empty() {
            return;
        }

        let palette = Palette::current(ctx);
        let mut dismissed = None;

        egui::Area::new(egui::Id::new("toasts"))
            .order(egui::Order::Tooltip)
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-16.0, -16.0))
            .show(ctx, |ui| {
                ui.set_max_width(360.0);
                for (index, toast) in self.items.iter().enumerate().rev() {
                    let color = match toast.kind {
                        ToastKind::Info => palette.accent,
                        ToastKind::Success => palette.success,
                        ToastKind::Error => palette.error,
                    };

                    egui::Frame::popup(ui.style()).stroke(egui::Stroke::new(1.5, color)).show(
                        ui,
                        |ui| {
                            ui.horizontal(|ui| {
                                ui.label(egui::RichText::new("●").color(color));
                                ui.label(&toast.message);
                                if ui.small_button("✕").clicked() {
                                    dismissed = Some(index);
                                }
                            });
                        },
                    );
                    ui.add_space(6.0);
                }
            });

        if let Some(index) = dismissed {
            self.items.remove(index);
        }

        ctx.request_repaint_after(Duration::from_millis(250));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toasts_expire_after_their_ttl() {
        let start = Instant::now();
        let mut toasts = Toasts::new();
        toasts.push_at(ToastKind::Error, "Failed to load subjects", start);
        toasts.push_at(ToastKind::Success, "Subject created", start + Duration::from_secs(3));

        toasts.prune(start + Duration::from_secs(4));
        assert_eq!(toasts.items().len(), 2);

        toasts.prune(start + Duration::from_secs(6));
        assert_eq!(toasts.items().len(), 1);
        assert_eq!(toasts.items()[0].message, "Subject created");

        toasts.prune(start + Duration::from_secs(9));
        assert!(toasts.is_empty());
    }

    #[test]
    fn repeated_message_is_not_stacked() {
        let start = Instant::now();
        let mut toasts = Toasts::new();
        toasts.push_at(ToastKind::Error, "Network error", start);
        toasts.push_at(ToastKind::Error, "Network error", start + Duration::from_secs(4));
        assert_eq!(toasts.items().len(), 1);

        toasts.prune(start + Duration::from_secs(6));
        assert_eq!(toasts.items().len(), 1);
    }

    #[test]
    fn oldest_toast_is_dropped_when_full() {
        let mut toasts = Toasts::new();
        for i in 0..6 {
            toasts.info(format!("message {}", i));
        }
        assert_eq!(toasts.items().len(), MAX_TOASTS);
        assert_eq!(toasts.items()[0].message, "message 2");
    }
}
