use async_trait::async_trait;
use reqwest::{
    header::AUTHORIZATION,
    multipart::{
        Form,
        Part,
    },
    Client,
    RequestBuilder,
};
use tracing::{
    debug,
    warn,
};

use super::{
    types::{
        DocumentEnvelope,
        ListEnvelope,
        SubjectEnvelope,
    },
    AuthResponse,
    DocumentUpdate,
    LoginRequest,
    NewDocument,
    NewSubject,
    PdfUpload,
    SignupRequest,
    StudyApi,
};
use crate::core::{
    config::AppConfig,
    http::{
        ensure_success,
        http_client,
    },
    session::Session,
    Document,
    MindmateError,
    Subject,
};

pub struct HttpStudyApi {
    client: Client,
    base_url: String,
    session: Session,
}

impl HttpStudyApi {
    pub fn new(config: &AppConfig, session: Session) -> Result<Self, MindmateError> {
        Ok(Self::with_client(http_client(config.http_timeout)?, &config.backend_url, session))
    }

    pub fn with_client(client: Client, base_url: &str, session: Session) -> Self {
        Self { client, base_url: base_url.trim_end_matches('/').to_string(), session }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attaches the bearer token, failing early when there is no session.
    fn authorized(&self, builder: RequestBuilder) -> Result<RequestBuilder, MindmateError> {
        let bearer = self.session.bearer().ok_or(MindmateError::MissingToken)?;
        Ok(builder.header(AUTHORIZATION, bearer))
    }

    async fn send_json<T>(&self, builder: RequestBuilder, fallback: &str) -> Result<T, MindmateError>
    where
        T: for<'de> serde::Deserialize<'de>,
    {
        let resp = ensure_success(builder.send().await?, fallback).await?;
        let text = resp.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Mutations may answer with the document or only with a message; in the latter
    /// case the fresh document is fetched.
    async fn send_document(
        &self,
        builder: RequestBuilder,
        document_id: &str,
        fallback: &str,
    ) -> Result<Document, MindmateError> {
        let resp = ensure_success(builder.send().await?, fallback).await?;
        let text = resp.text().await?;
        match serde_json::from_str::<DocumentEnvelope>(&text) {
            Ok(envelope) => Ok(envelope.into_inner()),
            Err(_) => {
                debug!("Response for {} carried no document, refetching", document_id);
                self.get_document(document_id).await
            }
        }
    }

    async fn send_empty(&self, builder: RequestBuilder, fallback: &str) -> Result<(), MindmateError> {
        ensure_success(builder.send().await?, fallback).await?;
        Ok(())
    }
}

#[async_trait]
impl StudyApi for HttpStudyApi {
    async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse, MindmateError> {
        debug!("POST /auth/signup for {}", request.email);
        let builder = self.client.post(self.url("/auth/signup")).json(request);
        self.send_json(builder, "Signup failed").await
    }

    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, MindmateError> {
        debug!("POST /auth/login for {}", request.email);
        let builder = self.client.post(self.url("/auth/login")).json(request);
        self.send_json(builder, "Login failed").await
    }

    async fn validate_token(&self) -> Result<bool, MindmateError> {
        let builder = match self.authorized(self.client.get(self.url("/auth/validate"))) {
            Ok(builder) => builder,
            Err(MindmateError::MissingToken) => return Ok(false),
            Err(e) => return Err(e),
        };

        let status = builder.send().await?.status();
        if !status.is_success() {
            warn!("Token validation rejected with {}", status);
        }
        Ok(status.is_success())
    }

    async fn list_subjects(&self) -> Result<Vec<Subject>, MindmateError> {
        let builder = self.authorized(self.client.get(self.url("/subjects")))?;
        let envelope: ListEnvelope<Subject> =
            self.send_json(builder, "Failed to load subjects").await?;
        Ok(envelope.into_inner())
    }

    async fn create_subject(&self, request: &NewSubject) -> Result<Subject, MindmateError> {
        let builder = self.authorized(self.client.post(self.url("/subjects")).json(request))?;
        let envelope: SubjectEnvelope = self.send_json(builder, "Failed to create subject").await?;
        Ok(envelope.into_inner())
    }

    async fn delete_subject(&self, subject_id: &str) -> Result<(), MindmateError> {
        let path = format!("/subjects/{}", subject_id);
        let builder = self.authorized(self.client.delete(self.url(&path)))?;
        self.send_empty(builder, "Failed to delete subject").await
    }

    async fn list_documents(&self, subject_id: &str) -> Result<Vec<Document>, MindmateError> {
        let path = format!("/documents/subject/{}", subject_id);
        let builder = self.authorized(self.client.get(self.url(&path)))?;
        let envelope: ListEnvelope<Document> =
            self.send_json(builder, "Failed to load documents").await?;
        Ok(envelope.into_inner())
    }

    async fn create_document(&self, request: &NewDocument) -> Result<Document, MindmateError> {
        let builder = self.authorized(self.client.post(self.url("/documents")).json(request))?;
        let envelope: DocumentEnvelope =
            self.send_json(builder, "Failed to create document").await?;
        Ok(envelope.into_inner())
    }

    async fn get_document(&self, document_id: &str) -> Result<Document, MindmateError> {
        let path = format!("/documents/{}", document_id);
        let builder = self.authorized(self.client.get(self.url(&path)))?;
        let envelope: DocumentEnvelope = self.send_json(builder, "Failed to load document").await?;
        Ok(envelope.into_inner())
    }

    async fn update_document(
        &self,
        document_id: &str,
        update: &DocumentUpdate,
    ) -> Result<Document, MindmateError> {
        let path = format!("/documents/{}", document_id);
        let builder = self.authorized(self.client.put(self.url(&path)).json(update))?;
        self.send_document(builder, document_id, "Failed to update document").await
    }

    async fn delete_document(&self, document_id: &str) -> Result<(), MindmateError> {
        let path = format!("/documents/{}", document_id);
        let builder = self.authorized(self.client.delete(self.url(&path)))?;
        self.send_empty(builder, "Failed to delete document").await
    }

    async fn attach_pdf(
        &self,
        document_id: &str,
        upload: PdfUpload,
    ) -> Result<Document, MindmateError> {
        let path = format!("/documents/{}/attach-pdf", document_id);
        let part = Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str("application/pdf")?;
        let form = Form::new().part("file", part);

        let builder = self.authorized(self.client.post(self.url(&path)).multipart(form))?;
        self.send_document(builder, document_id, "Failed to attach PDF").await
    }

    async fn process_document(&self, document_id: &str) -> Result<(), MindmateError> {
        let path = format!("/documents/process/{}", document_id);
        let builder = self.authorized(self.client.get(self.url(&path)))?;
        self.send_empty(builder, "Failed to process document").await
    }
}
