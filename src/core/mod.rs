pub mod config;
pub mod content;
pub mod errors;
pub mod http;
pub mod logging;
pub mod models;
pub mod poller;
pub mod progress;
pub mod routing;
pub mod session;
pub mod tasks;
pub mod tree;

pub use errors::MindmateError;
pub use models::{
    ArtifactKind,
    Document,
    DocumentType,
    Flashcard,
    Mcq,
    ProcessingStatus,
    Subject,
};
