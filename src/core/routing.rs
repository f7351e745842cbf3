/// Top-level screens of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Auth,
    Dashboard,
}

/// Resolves a requested route against the session state: the dashboard requires a
/// session, the auth screen is only for visitors without one.
pub fn guard(requested: Route, authenticated: bool) -> Route {
    match (requested, authenticated) {
        (Route::Dashboard, false) => Route::Auth,
        (Route::Auth, true) => Route::Dashboard,
        (route, _) => route,
    }
}

/// Outcome of checking a stored token against the backend on startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenCheck {
    Valid,
    Rejected,
    /// The backend could not be reached; the stored token is trusted.
    Unreachable(String),
}

impl TokenCheck {
    pub fn keeps_session(&self) -> bool {
        !matches!(self, TokenCheck::Rejected)
    }
}
