use serde::{
    Deserialize,
    Serialize,
};

use crate::core::{
    Document,
    DocumentType,
    Subject,
};

#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewSubject {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewDocument {
    pub title: String,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(rename = "subjectId")]
    pub subject_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocumentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl DocumentUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct PdfUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// List payloads come back bare or wrapped under a collection key.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum ListEnvelope<T> {
    Bare(Vec<T>),
    Subjects { subjects: Vec<T> },
    Documents { documents: Vec<T> },
    Data { data: Vec<T> },
}

impl<T> ListEnvelope<T> {
    pub(crate) fn into_inner(self) -> Vec<T> {
        match self {
            ListEnvelope::Bare(items)
            | ListEnvelope::Subjects { subjects: items }
            | ListEnvelope::Documents { documents: items }
            | ListEnvelope::Data { data: items } => items,
        }
    }
}

/// A created subject, bare or wrapped.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum SubjectEnvelope {
    Wrapped { subject: Subject },
    Data { data: Subject },
    Bare(Subject),
}

impl SubjectEnvelope {
    pub(crate) fn into_inner(self) -> Subject {
        match self {
            SubjectEnvelope::Wrapped { subject }
            | SubjectEnvelope::Data { data: subject }
            | SubjectEnvelope::Bare(subject) => subject,
        }
    }
}

/// A single document, bare or wrapped.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum DocumentEnvelope {
    Wrapped { document: Document },
    Data { data: Document },
    Bare(Document),
}

impl DocumentEnvelope {
    pub(crate) fn into_inner(self) -> Document {
        match self {
            DocumentEnvelope::Wrapped { document }
            | DocumentEnvelope::Data { data: document }
            | DocumentEnvelope::Bare(document) => document,
        }
    }
}
