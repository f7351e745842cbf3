use eframe::egui;

use crate::{
    backend::{
        LoginRequest,
        SignupRequest,
    },
    gui::theme::Palette,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    SignIn,
    SignUp,
}

pub enum AuthRequest {
    Login(LoginRequest),
    Signup(SignupRequest),
}

#[derive(Debug, Default)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub name: String,
    pub email: String,
    pub password: String,
    pub pending: bool,
    pub notice: Option<String>,
    pub error: Option<String>,
}

impl AuthForm {
    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::SignIn => AuthMode::SignUp,
            AuthMode::SignUp => AuthMode::SignIn,
        };
        self.error = None;
        self.notice = None;
    }

    /// After a sign-up that did not log the user in.
    pub fn switch_to_sign_in(&mut self, notice: impl Into<String>) {
        self.mode = AuthMode::SignIn;
        self.password.clear();
        self.error = None;
        self.notice = Some(notice.into());
    }

    /// Clears everything but the email, for the next visit to the auth screen.
    pub fn reset(&mut self) {
        *self = Self { email: std::mem::take(&mut self.email), ..Self::default() };
    }

    pub fn request(&self) -> Result<AuthRequest, &'static str> {
        let email = self.email.trim();
        if email.is_empty() || self.password.is_empty() {
            return Err("Email and password are required");
        }
        if !email.contains('@') {
            return Err("Enter a valid email address");
        }

        match self.mode {
            AuthMode::SignIn => Ok(AuthRequest::Login(LoginRequest {
                email: email.to_string(),
                password: self.password.clone(),
            })),
            AuthMode::SignUp => {
                let name = self.name.trim();
                if name.is_empty() {
                    return Err("Name is required");
                }
                Ok(AuthRequest::Signup(SignupRequest {
                    name: name.to_string(),
                    email: email.to_string(),
                    password: self.password.clone(),
                }))
            }
        }
    }
}

/// Draws the sign-in / sign-up card. Returns a request when the form is submitted and
/// valid; validation errors are kept on the form.
pub fn show(ctx: &egui::Context, form: &mut AuthForm) -> Option<AuthRequest> {
    let palette = Palette::current(ctx);
    let mut submitted = false;

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space((ui.available_height() * 0.15).max(24.0));
            ui.label(palette.heading("MindMate").size(32.0));
            ui.label(palette.hint("Your AI study companion"));
            ui.add_space(24.0);

            egui::Frame::group(ui.style()).inner_margin(egui::Margin::same(20)).show(ui, |ui| {
                ui.set_width(340.0);
                let heading = match form.mode {
                    AuthMode::SignIn => "Welcome back",
                    AuthMode::SignUp => "Create an account",
                };
                ui.heading(heading);
                ui.add_space(12.0);

                if form.mode == AuthMode::SignUp {
                    ui.add(
                        egui::TextEdit::singleline(&mut form.name)
                            .hint_text("Name")
                            .desired_width(f32::INFINITY),
                    );
                    ui.add_space(6.0);
                }
                ui.add(
                    egui::TextEdit::singleline(&mut form.email)
                        .hint_text("Email")
                        .desired_width(f32::INFINITY),
                );
                ui.add_space(6.0);
                let password = ui.add(
                    egui::TextEdit::singleline(&mut form.password)
                        .hint_text("Password")
                        .password(true)
                        .desired_width(f32::INFINITY),
                );
                let enter = password.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

                if let Some(notice) = &form.notice {
                    ui.add_space(6.0);
                    ui.colored_label(palette.success, notice.as_str());
                }
                if let Some(error) = &form.error {
                    ui.add_space(6.0);
                    ui.colored_label(palette.error, error.as_str());
                }

                ui.add_space(12.0);
                let label = match (form.mode, form.pending) {
                    (_, true) => "Please wait…",
                    (AuthMode::SignIn, false) => "Sign In",
                    (AuthMode::SignUp, false) => "Sign Up",
                };
                let button = ui.add_enabled(
                    !form.pending,
                    egui::Button::new(label).min_size(egui::vec2(ui.available_width(), 32.0)),
                );
                submitted = !form.pending && (button.clicked() || enter);

                ui.add_space(8.0);
                let switch = match form.mode {
                    AuthMode::SignIn => "Don't have an account? Sign up",
                    AuthMode::SignUp => "Already have an account? Sign in",
                };
                if ui.add_enabled(!form.pending, egui::Button::new(switch).frame(false)).clicked() {
                    form.toggle_mode();
                }
            });
        });
    });

    if !submitted {
        return None;
    }

    match form.request() {
        Ok(request) => {
            form.error = None;
            form.notice = None;
            form.pending = true;
            Some(request)
        }
        Err(message) => {
            form.error = Some(message.to_string());
            None
        }
    }
}
