pub mod app;
pub mod auth_view;
pub mod main_content;
pub mod message_overlay;
pub mod modal;
pub mod mode_bar;
pub mod settings;
pub mod sidebar;
pub mod theme;
pub mod toast;
pub mod top_bar;

pub use app::StudyApp;
