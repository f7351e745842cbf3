//! In-memory backend used by unit tests.

use std::{
    collections::{
        HashMap,
        VecDeque,
    },
    sync::Mutex,
};

use async_trait::async_trait;

use super::{
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
    Document,
    MindmateError,
    ProcessingStatus,
    Subject,
};

pub(crate) fn document(id: &str, subject_id: &str) -> Document {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "title": format!("Doc {}", id),
        "type": "text",
        "subjectId": subject_id,
    }))
    .expect("valid document json")
}

pub(crate) fn doc_with_statuses(
    id: &str,
    summary: ProcessingStatus,
    flashcards: ProcessingStatus,
    mcqs: ProcessingStatus,
) -> Document {
    let mut doc = document(id, "s1");
    doc.summary_status = summary;
    doc.flashcards_status = flashcards;
    doc.mcqs_status = mcqs;
    doc
}

enum Scripted {
    Document(Document),
    Error(String),
}

#[derive(Default)]
pub(crate) struct FakeStudyApi {
    subjects: Mutex<Vec<Subject>>,
    documents: Mutex<Vec<Document>>,
    scripted: Mutex<HashMap<String, VecDeque<Scripted>>>,
    get_calls: Mutex<HashMap<String, usize>>,
    calls: Mutex<Vec<String>>,
    process_error: Mutex<Option<String>>,
    token_valid: Mutex<Option<bool>>,
    next_id: Mutex<u32>,
}

impl FakeStudyApi {
    pub(crate) fn new() -> Self {
        Self { token_valid: Mutex::new(Some(true)), ..Self::default() }
    }

    pub(crate) fn insert_subject(&self, id: &str, name: &str) {
        self.subjects
            .lock()
            .unwrap()
            .push(Subject { id: id.to_string(), name: name.to_string() });
    }

    pub(crate) fn insert_document(&self, doc: Document) {
        let mut docs = self.documents.lock().unwrap();
        docs.retain(|d| d.id != doc.id);
        docs.push(doc);
    }

    /// Queues a response for the next `get_document(id)`; once drained, the stored
    /// document is served.
    pub(crate) fn script_document(&self, id: &str, doc: Document) {
        self.scripted
            .lock()
            .unwrap()
            .entry(id.to_string())
            .or_default()
            .push_back(Scripted::Document(doc));
    }

    pub(crate) fn script_error(&self, id: &str, message: &str) {
        self.scripted
            .lock()
            .unwrap()
            .entry(id.to_string())
            .or_default()
            .push_back(Scripted::Error(message.to_string()));
    }

    pub(crate) fn fail_process(&self, message: &str) {
        *self.process_error.lock().unwrap() = Some(message.to_string());
    }

    /// `None` simulates an unreachable backend.
    pub(crate) fn set_token_valid(&self, valid: Option<bool>) {
        *self.token_valid.lock().unwrap() = valid;
    }

    pub(crate) fn get_document_calls(&self, id: &str) -> usize {
        self.get_calls.lock().unwrap().get(id).copied().unwrap_or(0)
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn next_id(&self, prefix: &str) -> String {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        format!("{}{}", prefix, *next)
    }

    fn not_found(what: &str) -> MindmateError {
        MindmateError::Api { status: 404, message: format!("{} not found", what) }
    }
}

#[async_trait]
impl StudyApi for FakeStudyApi {
    async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse, MindmateError> {
        self.record(format!("signup {}", request.email));
        Ok(AuthResponse { message: "User created".to_string(), token: None })
    }

    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, MindmateError> {
        self.record(format!("login {}", request.email));
        if request.password == "wrong" {
            return Err(MindmateError::Api { status: 400, message: "Invalid credentials".into() });
        }
        Ok(AuthResponse { message: "Logged in".to_string(), token: Some("fake-token".into()) })
    }

    async fn validate_token(&self) -> Result<bool, MindmateError> {
        self.record("validate");
        match *self.token_valid.lock().unwrap() {
            Some(valid) => Ok(valid),
            None => Err(MindmateError::Custom("connection refused".to_string())),
        }
    }

    async fn list_subjects(&self) -> Result<Vec<Subject>, MindmateError> {
        self.record("list_subjects");
        Ok(self.subjects.lock().unwrap().clone())
    }

    async fn create_subject(&self, request: &NewSubject) -> Result<Subject, MindmateError> {
        self.record(format!("create_subject {}", request.name));
        let subject = Subject { id: self.next_id("s"), name: request.name.clone() };
        self.subjects.lock().unwrap().push(subject.clone());
        Ok(subject)
    }

    async fn delete_subject(&self, subject_id: &str) -> Result<(), MindmateError> {
        self.record(format!("delete_subject {}", subject_id));
        let mut subjects = self.subjects.lock().unwrap();
        let before = subjects.len();
        subjects.retain(|s| s.id != subject_id);
        if subjects.len() == before {
            return Err(Self::not_found("Subject"));
        }
        self.documents.lock().unwrap().retain(|d| d.subject_id.as_deref() != Some(subject_id));
        Ok(())
    }

    async fn list_documents(&self, subject_id: &str) -> Result<Vec<Document>, MindmateError> {
        self.record(format!("list_documents {}", subject_id));
        Ok(self
            .documents
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.subject_id.as_deref() == Some(subject_id))
            .cloned()
            .collect())
    }

    async fn create_document(&self, request: &NewDocument) -> Result<Document, MindmateError> {
        self.record(format!("create_document {}", request.title));
        let mut doc = document(&self.next_id("d"), &request.subject_id);
        doc.title = request.title.clone();
        doc.doc_type = request.doc_type;
        doc.content = request.content.clone().unwrap_or_default();
        self.insert_document(doc.clone());
        Ok(doc)
    }

    async fn get_document(&self, document_id: &str) -> Result<Document, MindmateError> {
        *self.get_calls.lock().unwrap().entry(document_id.to_string()).or_default() += 1;

        let scripted =
            self.scripted.lock().unwrap().get_mut(document_id).and_then(|queue| queue.pop_front());
        match scripted {
            Some(Scripted::Document(doc)) => return Ok(doc),
            Some(Scripted::Error(message)) => {
                return Err(MindmateError::Api { status: 500, message })
            }
            None => {}
        }

        self.documents
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.id == document_id)
            .cloned()
            .ok_or_else(|| Self::not_found("Document"))
    }

    async fn update_document(
        &self,
        document_id: &str,
        update: &DocumentUpdate,
    ) -> Result<Document, MindmateError> {
        self.record(format!("update_document {}", document_id));
        let mut docs = self.documents.lock().unwrap();
        let doc = docs
            .iter_mut()
            .find(|d| d.id == document_id)
            .ok_or_else(|| Self::not_found("Document"))?;
        if let Some(title) = &update.title {
            doc.title = title.clone();
        }
        if let Some(content) = &update.content {
            doc.content = content.clone();
        }
        Ok(doc.clone())
    }

    async fn delete_document(&self, document_id: &str) -> Result<(), MindmateError> {
        self.record(format!("delete_document {}", document_id));
        let mut docs = self.documents.lock().unwrap();
        let before = docs.len();
        docs.retain(|d| d.id != document_id);
        if docs.len() == before {
            return Err(Self::not_found("Document"));
        }
        Ok(())
    }

    async fn attach_pdf(
        &self,
        document_id: &str,
        upload: PdfUpload,
    ) -> Result<Document, MindmateError> {
        self.record(format!("attach_pdf {} {}", document_id, upload.file_name));
        let mut docs = self.documents.lock().unwrap();
        let doc = docs
            .iter_mut()
            .find(|d| d.id == document_id)
            .ok_or_else(|| Self::not_found("Document"))?;
        doc.file_url = Some(upload.file_name);
        Ok(doc.clone())
    }

    async fn process_document(&self, document_id: &str) -> Result<(), MindmateError> {
        self.record(format!("process {}", document_id));
        if let Some(message) = self.process_error.lock().unwrap().clone() {
            return Err(MindmateError::Api { status: 500, message });
        }
        Ok(())
    }
}
