use crate::{
    backend::AuthResponse,
    core::{
        routing::TokenCheck,
        Document,
        MindmateError,
        Subject,
    },
};

/// An error as it crosses from a background task to the UI thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskError {
    pub message: String,
    pub unauthorized: bool,
}

impl From<MindmateError> for TaskError {
    fn from(error: MindmateError) -> Self {
        Self { unauthorized: error.is_unauthorized(), message: error.to_string() }
    }
}

impl std::fmt::Display for TaskError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

pub type TaskOutcome<T> = Result<T, TaskError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollEnd {
    Completed,
    TimedOut,
    Failed(TaskError),
    Cancelled,
}

#[derive(Debug, Clone)]
pub enum TaskResult {
    TokenChecked(TokenCheck),
    Authenticated { signup: bool, result: TaskOutcome<AuthResponse> },

    SubjectsLoaded(TaskOutcome<Vec<Subject>>),
    SubjectCreated(TaskOutcome<Subject>),
    SubjectDeleted { subject_id: String, result: TaskOutcome<()> },

    DocumentsLoaded { subject_id: String, result: TaskOutcome<Vec<Document>> },
    DocumentCreated(TaskOutcome<Document>),
    DocumentOpened { document_id: String, result: TaskOutcome<Document> },
    DocumentSaved(TaskOutcome<Document>),
    DocumentRenamed(TaskOutcome<Document>),
    DocumentDeleted { document_id: String, result: TaskOutcome<()> },
    PdfAttached { document_id: String, result: TaskOutcome<Document> },

    ProcessRequested { document_id: String, result: TaskOutcome<()> },
    PollUpdate(Document),
    PollFinished { document_id: String, end: PollEnd },
}

impl TaskResult {
    pub fn task_type(&self) -> &'static str {
        match self {
            TaskResult::TokenChecked(_) => "token_check",
            TaskResult::Authenticated { signup: true, .. } => "signup",
            TaskResult::Authenticated { signup: false, .. } => "login",
            TaskResult::SubjectsLoaded(_) => "subjects_loaded",
            TaskResult::SubjectCreated(_) => "subject_created",
            TaskResult::SubjectDeleted { .. } => "subject_deleted",
            TaskResult::DocumentsLoaded { .. } => "documents_loaded",
            TaskResult::DocumentCreated(_) => "document_created",
            TaskResult::DocumentOpened { .. } => "document_opened",
            TaskResult::DocumentSaved(_) => "document_saved",
            TaskResult::DocumentRenamed(_) => "document_renamed",
            TaskResult::DocumentDeleted { .. } => "document_deleted",
            TaskResult::PdfAttached { .. } => "pdf_attached",
            TaskResult::ProcessRequested { .. } => "process_requested",
            TaskResult::PollUpdate(_) => "poll_update",
            TaskResult::PollFinished { .. } => "poll_finished",
        }
    }

    /// The failure carried by this result, if any.
    pub fn error(&self) -> Option<&TaskError> {
        match self {
            TaskResult::Authenticated { result: Err(e), .. }
            | TaskResult::SubjectsLoaded(Err(e))
            | TaskResult::SubjectCreated(Err(e))
            | TaskResult::SubjectDeleted { result: Err(e), .. }
            | TaskResult::DocumentsLoaded { result: Err(e), .. }
            | TaskResult::DocumentCreated(Err(e))
            | TaskResult::DocumentOpened { result: Err(e), .. }
            | TaskResult::DocumentSaved(Err(e))
            | TaskResult::DocumentRenamed(Err(e))
            | TaskResult::DocumentDeleted { result: Err(e), .. }
            | TaskResult::PdfAttached { result: Err(e), .. }
            | TaskResult::ProcessRequested { result: Err(e), .. }
            | TaskResult::PollFinished { end: PollEnd::Failed(e), .. } => Some(e),
            _ => None,
        }
    }
}
