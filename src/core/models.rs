use std::{
    collections::BTreeMap,
    fmt,
};

use chrono::{
    DateTime,
    Utc,
};
use serde::{
    Deserialize,
    Deserializer,
    Serialize,
};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Subject {
    #[serde(alias = "_id", deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    #[default]
    #[serde(alias = "notes", alias = "note", alias = "Notes")]
    Text,
    #[serde(alias = "PDF")]
    Pdf,
    #[serde(alias = "video-link", alias = "video", alias = "YouTube Video")]
    Youtube,
    #[serde(alias = "website-link", alias = "link", alias = "Website Link")]
    Website,
}

impl DocumentType {
    pub const ALL: [DocumentType; 4] =
        [DocumentType::Text, DocumentType::Pdf, DocumentType::Youtube, DocumentType::Website];

    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::Text => "Notes",
            DocumentType::Pdf => "PDF",
            DocumentType::Youtube => "YouTube Video",
            DocumentType::Website => "Website Link",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            DocumentType::Text => "📝",
            DocumentType::Pdf => "📄",
            DocumentType::Youtube => "▶",
            DocumentType::Website => "🌐",
        }
    }

    /// Link documents keep their URL in the content field.
    pub fn is_link(&self) -> bool {
        matches!(self, DocumentType::Youtube | DocumentType::Website)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStatus {
    #[default]
    #[serde(alias = "not-processed", alias = "notProcessed", alias = "pending")]
    NotProcessed,
    #[serde(alias = "in_progress", alias = "in-progress")]
    Processing,
    #[serde(alias = "done")]
    Completed,
    #[serde(alias = "error")]
    Failed,
}

impl ProcessingStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProcessingStatus::Completed | ProcessingStatus::Failed)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProcessingStatus::NotProcessed => "Not processed",
            ProcessingStatus::Processing => "Processing",
            ProcessingStatus::Completed => "Completed",
            ProcessingStatus::Failed => "Failed",
        }
    }
}

/// The three artifacts the backend generates for a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Summary,
    Flashcards,
    Mcqs,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 3] =
        [ArtifactKind::Summary, ArtifactKind::Flashcards, ArtifactKind::Mcqs];

    pub fn label(&self) -> &'static str {
        match self {
            ArtifactKind::Summary => "Summary",
            ArtifactKind::Flashcards => "Flashcards",
            ArtifactKind::Mcqs => "MCQs",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Flashcard {
    #[serde(alias = "question", default, deserialize_with = "null_as_default")]
    pub front: String,
    #[serde(alias = "answer", default, deserialize_with = "null_as_default")]
    pub back: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Mcq {
    #[serde(default, deserialize_with = "null_as_default")]
    pub question: String,
    #[serde(default, deserialize_with = "option_map")]
    pub options: BTreeMap<String, String>,
    #[serde(
        rename = "correctAnswer",
        alias = "correct_answer",
        alias = "answer",
        alias = "correct",
        default,
        deserialize_with = "option_label"
    )]
    pub correct_answer: String,
}

impl Mcq {
    pub fn is_correct(&self, label: &str) -> bool {
        self.correct_answer.eq_ignore_ascii_case(label)
    }

    pub fn correct_option_text(&self) -> Option<&str> {
        self.options
            .iter()
            .find(|(label, _)| self.is_correct(label))
            .map(|(_, text)| text.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Document {
    #[serde(alias = "_id", deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub doc_type: DocumentType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(
        rename = "subjectId",
        alias = "subject_id",
        alias = "subject",
        default,
        deserialize_with = "optional_id_string"
    )]
    pub subject_id: Option<String>,
    #[serde(default, alias = "fileUrl", alias = "file_url", alias = "pdfUrl", alias = "fileName")]
    pub file_url: Option<String>,
    #[serde(default, alias = "summaryStatus", deserialize_with = "null_as_default")]
    pub summary_status: ProcessingStatus,
    #[serde(
        default,
        alias = "flashcardsStatus",
        alias = "flashcard_status",
        deserialize_with = "null_as_default"
    )]
    pub flashcards_status: ProcessingStatus,
    #[serde(default, alias = "mcqsStatus", alias = "mcq_status", deserialize_with = "null_as_default")]
    pub mcqs_status: ProcessingStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub flashcards: Vec<Flashcard>,
    #[serde(default, alias = "mcq", deserialize_with = "null_as_default")]
    pub mcqs: Vec<Mcq>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "updatedAt")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Document {
    pub fn status(&self, kind: ArtifactKind) -> ProcessingStatus {
        match kind {
            ArtifactKind::Summary => self.summary_status,
            ArtifactKind::Flashcards => self.flashcards_status,
            ArtifactKind::Mcqs => self.mcqs_status,
        }
    }

    pub fn set_status(&mut self, kind: ArtifactKind, status: ProcessingStatus) {
        match kind {
            ArtifactKind::Summary => self.summary_status = status,
            ArtifactKind::Flashcards => self.flashcards_status = status,
            ArtifactKind::Mcqs => self.mcqs_status = status,
        }
    }

    /// Every artifact is either completed or failed; polling can stop.
    pub fn all_terminal(&self) -> bool {
        ArtifactKind::ALL.iter().all(|kind| self.status(*kind).is_terminal())
    }

    pub fn any_processing(&self) -> bool {
        ArtifactKind::ALL.iter().any(|kind| self.status(*kind) == ProcessingStatus::Processing)
    }

    /// Something is still missing, so the process action is meaningful.
    pub fn needs_processing(&self) -> bool {
        ArtifactKind::ALL.iter().any(|kind| self.status(*kind) != ProcessingStatus::Completed)
    }

    pub fn has_content(&self) -> bool {
        !self.content.trim().is_empty()
    }

    pub fn has_pdf(&self) -> bool {
        self.file_url.as_deref().is_some_and(|f| !f.trim().is_empty())
            || (self.doc_type == DocumentType::Pdf && self.has_content())
    }

    /// Marks everything not yet completed as processing, mirroring what the backend does
    /// once the process request is accepted.
    pub fn mark_processing_started(&mut self) {
        for kind in ArtifactKind::ALL {
            if self.status(kind) != ProcessingStatus::Completed {
                self.set_status(kind, ProcessingStatus::Processing);
            }
        }
    }

    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "Untitled"
        } else {
            &self.title
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_title(), self.id)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
    Object {
        #[serde(alias = "_id")]
        id: Box<RawId>,
    },
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Text(text) => text,
            RawId::Number(n) => n.to_string(),
            RawId::Object { id } => id.into_string(),
        }
    }
}

fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(RawId::into_string)
}

fn optional_id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawId>::deserialize(deserializer)?.map(RawId::into_string))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawOptions {
    Map(BTreeMap<String, String>),
    List(Vec<String>),
}

/// Label for the option at `index`: A, B, C, ...
pub fn option_label_for(index: usize) -> String {
    let letter = (b'A' + (index % 26) as u8) as char;
    letter.to_string()
}

fn option_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawOptions>::deserialize(deserializer)? {
        Some(RawOptions::Map(map)) => map,
        Some(RawOptions::List(list)) => list
            .into_iter()
            .enumerate()
            .map(|(index, text)| (option_label_for(index), text))
            .collect(),
        None => BTreeMap::new(),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLabel {
    Label(String),
    Index(usize),
}

fn option_label<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawLabel>::deserialize(deserializer)? {
        Some(RawLabel::Label(label)) => label.trim().to_string(),
        Some(RawLabel::Index(index)) => option_label_for(index),
        None => String::new(),
    })
}
