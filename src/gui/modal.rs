use eframe::egui;

#[derive(Debug, Clone, PartialEq)]
pub enum ModalResult<T> {
    Confirmed(T),
    Cancelled,
}

/// A dialog holding form data of type `T`. The dialog closes on any result, including
/// Escape or a click outside, which count as cancel.
pub struct Modal<T> {
    open: bool,
    title: String,
    width: f32,
    pub data: T,
}

impl<T: Default> Modal<T> {
    pub fn new(title: impl Into<String>) -> Self {
        Self { open: false, title: title.into(), width: 380.0, data: T::default() }
    }
}

impl<T> Modal<T> {
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    pub fn open_with(&mut self, data: T) {
        self.data = data;
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn show<F>(&mut self, ctx: &egui::Context, content: F) -> Option<ModalResult<T>>
    where
        F: FnOnce(&mut egui::Ui, &mut T) -> Option<ModalResult<T>>,
    {
        if !self.open {
            return None;
        }

        let mut result = None;
        let response = egui::Modal::new(egui::Id::new(("modal", &self.title))).show(ctx, |ui| {
            ui.set_width(self.width);
            ui.heading(&self.title);
            ui.add_space(8.0);
            result = content(ui, &mut self.data);
        });

        if result.is_none() && response.should_close() {
            result = Some(ModalResult::Cancelled);
        }
        if result.is_some() {
            self.open = false;
        }

        result
    }
}

/// Confirm and cancel buttons, right-aligned. Confirm is disabled unless `enabled`.
pub fn action_buttons<T>(
    ui: &mut egui::Ui,
    data: &T,
    confirm_text: &str,
    cancel_text: &str,
    enabled: bool,
) -> Option<ModalResult<T>>
where
    T: Clone,
{
    ui.add_space(12.0);
    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
        let confirm = ui.add_enabled(enabled, egui::Button::new(confirm_text));
        if confirm.clicked() {
            Some(ModalResult::Confirmed(data.clone()))
        } else if ui.button(cancel_text).clicked() {
            Some(ModalResult::Cancelled)
        } else {
            None
        }
    })
    .inner
}
