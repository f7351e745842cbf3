//! The study-assistant REST API as seen by the client.

pub mod api;
#[cfg(test)]
pub(crate) mod fake;
pub mod types;

use async_trait::async_trait;

pub use api::HttpStudyApi;
pub use types::{
    AuthResponse,
    DocumentUpdate,
    LoginRequest,
    NewDocument,
    NewSubject,
    PdfUpload,
    SignupRequest,
};

use crate::core::{
    Document,
    MindmateError,
    Subject,
};

/// Every backend operation the UI needs. Implemented over HTTP by [`HttpStudyApi`];
/// tests substitute an in-memory backend.
#[async_trait]
pub trait StudyApi: Send + Sync {
    async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse, MindmateError>;
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, MindmateError>;
    /// `Ok(false)` when the backend answered but rejected the token.
    async fn validate_token(&self) -> Result<bool, MindmateError>;

    async fn list_subjects(&self) -> Result<Vec<Subject>, MindmateError>;
    async fn create_subject(&self, request: &NewSubject) -> Result<Subject, MindmateError>;
    async fn delete_subject(&self, subject_id: &str) -> Result<(), MindmateError>;

    async fn list_documents(&self, subject_id: &str) -> Result<Vec<Document>, MindmateError>;
    async fn create_document(&self, request: &NewDocument) -> Result<Document, MindmateError>;
    async fn get_document(&self, document_id: &str) -> Result<Document, MindmateError>;
    async fn update_document(
        &self,
        document_id: &str,
        update: &DocumentUpdate,
    ) -> Result<Document, MindmateError>;
    async fn delete_document(&self, document_id: &str) -> Result<(), MindmateError>;
    async fn attach_pdf(
        &self,
        document_id: &str,
        upload: PdfUpload,
    ) -> Result<Document, MindmateError>;
    async fn process_document(&self, document_id: &str) -> Result<(), MindmateError>;
}
