//! State of the dashboard's main content view: which document is selected, whether its
//! source is being edited, and which processing requests are in flight.
//!
//! The view functions return borrowed enums so the GUI only has to match and draw.

use std::collections::HashSet;

use crate::{
    backend::DocumentUpdate,
    core::{
        ArtifactKind,
        Document,
        DocumentType,
        Flashcard,
        Mcq,
        ProcessingStatus,
    },
};

/// What the main area shows, picked from the mode strip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Source,
    Summary,
    Flashcards,
    Mcqs,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Source, Mode::Summary, Mode::Flashcards, Mode::Mcqs];

    pub fn label(&self) -> &'static str {
        match self {
            Mode::Source => "Source",
            Mode::Summary => "Summary",
            Mode::Flashcards => "Flashcards",
            Mode::Mcqs => "MCQs",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Mode::Source => "📄",
            Mode::Summary => "📋",
            Mode::Flashcards => "🗂",
            Mode::Mcqs => "❓",
        }
    }

    pub fn artifact(&self) -> Option<ArtifactKind> {
        match self {
            Mode::Source => None,
            Mode::Summary => Some(ArtifactKind::Summary),
            Mode::Flashcards => Some(ArtifactKind::Flashcards),
            Mode::Mcqs => Some(ArtifactKind::Mcqs),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Read,
    Edit,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentDraft {
    pub title: String,
    pub content: String,
}

#[derive(Debug, PartialEq)]
pub enum SourceView<'a> {
    NoSelection,
    Loading,
    /// Nothing entered yet; prompts the user to add content.
    EmptyText,
    Text(&'a str),
    Editing,
    Pdf { file: Option<&'a str> },
    Link { url: &'a str },
}

#[derive(Debug, PartialEq)]
pub enum ArtifactView<'a> {
    NoSelection,
    Loading,
    NotProcessed,
    Processing,
    Failed,
    /// Completed, but the backend produced nothing.
    Empty,
    Summary(&'a str),
    Flashcards(&'a [Flashcard]),
    Mcqs(&'a [Mcq]),
}

#[derive(Debug, Default)]
pub struct ContentState {
    mode: Mode,
    selected_id: Option<String>,
    document: Option<Document>,
    view_mode: ViewMode,
    draft: DocumentDraft,
    busy: HashSet<String>,
}

impl ContentState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Selects `document_id`. Returns true when the document has to be fetched.
    pub fn select(&mut self, document_id: &str) -> bool {
        if self.selected_id.as_deref() == Some(document_id) {
            return self.document.is_none();
        }

        self.selected_id = Some(document_id.to_string());
        self.document = None;
        self.view_mode = ViewMode::Read;
        self.draft = DocumentDraft::default();
        true
    }

    /// Replaces the selected document with a fresher copy. Copies of other documents
    /// are ignored; returns whether this one was taken.
    pub fn apply_update(&mut self, document: Document) -> bool {
        if self.selected_id.as_deref() != Some(document.id.as_str()) {
            return false;
        }
        self.document = Some(document);
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected_id = None;
        self.document = None;
        self.view_mode = ViewMode::Read;
        self.draft = DocumentDraft::default();
    }

    pub fn begin_edit(&mut self) {
        if let Some(doc) = &self.document {
            self.draft = DocumentDraft { title: doc.title.clone(), content: doc.content.clone() };
            self.view_mode = ViewMode::Edit;
        }
    }

    pub fn cancel_edit(&mut self) {
        self.view_mode = ViewMode::Read;
        self.draft = DocumentDraft::default();
    }

    pub fn draft_mut(&mut self) -> &mut DocumentDraft {
        &mut self.draft
    }

    /// The fields the draft changes, or `None` if there is nothing to save. A blank title
    /// is never sent.
    pub fn pending_update(&self) -> Option<(String, DocumentUpdate)> {
        let doc = self.document.as_ref()?;
        if self.view_mode != ViewMode::Edit {
            return None;
        }

        let title = self.draft.title.trim();
        let update = DocumentUpdate {
            title: (!title.is_empty() && title != doc.title).then(|| title.to_string()),
            content: (self.draft.content != doc.content).then(|| self.draft.content.clone()),
        };

        (!update.is_empty()).then(|| (doc.id.clone(), update))
    }

    /// A save went through; leave edit mode if it was for the selected document.
    pub fn saved(&mut self, document: Document) {
        if self.apply_update(document) {
            self.cancel_edit();
        }
    }

    /// A rename went through. An open editor stays open with its draft; the draft title
    /// follows the rename unless the user already changed it.
    pub fn renamed(&mut self, document: Document) {
        let Some(current) = self.document.as_ref().filter(|doc| doc.id == document.id) else {
            return;
        };
        if self.view_mode == ViewMode::Edit && self.draft.title == current.title {
            self.draft.title = document.title.clone();
        }
        self.document = Some(document);
    }

    pub fn source_view(&self) -> SourceView<'_> {
        if self.selected_id.is_none() {
            return SourceView::NoSelection;
        }
        let Some(doc) = &self.document else {
            return SourceView::Loading;
        };
        if self.view_mode == ViewMode::Edit {
            return SourceView::Editing;
        }

        match doc.doc_type {
            DocumentType::Pdf => {
                let file = doc
                    .file_url
                    .as_deref()
                    .filter(|f| !f.trim().is_empty())
                    .or_else(|| doc.has_content().then_some(doc.content.as_str()));
                SourceView::Pdf { file }
            }
            _ if !doc.has_content() => SourceView::EmptyText,
            DocumentType::Youtube | DocumentType::Website => {
                SourceView::Link { url: doc.content.trim() }
            }
            DocumentType::Text => SourceView::Text(&doc.content),
        }
    }

    pub fn artifact_view(&self, kind: ArtifactKind) -> ArtifactView<'_> {
        if self.selected_id.is_none() {
            return ArtifactView::NoSelection;
        }
        let Some(doc) = &self.document else {
            return ArtifactView::Loading;
        };

        match doc.status(kind) {
            ProcessingStatus::NotProcessed => ArtifactView::NotProcessed,
            ProcessingStatus::Processing => ArtifactView::Processing,
            ProcessingStatus::Failed => ArtifactView::Failed,
            ProcessingStatus::Completed => match kind {
                ArtifactKind::Summary if doc.summary.trim().is_empty() => ArtifactView::Empty,
                ArtifactKind::Summary => ArtifactView::Summary(&doc.summary),
                ArtifactKind::Flashcards if doc.flashcards.is_empty() => ArtifactView::Empty,
                ArtifactKind::Flashcards => ArtifactView::Flashcards(&doc.flashcards),
                ArtifactKind::Mcqs if doc.mcqs.is_empty() => ArtifactView::Empty,
                ArtifactKind::Mcqs => ArtifactView::Mcqs(&doc.mcqs),
            },
        }
    }

    /// The floating process button appears once the document is loaded and something
    /// is still missing.
    pub fn show_process_button(&self) -> bool {
        self.document.as_ref().is_some_and(Document::needs_processing)
    }

    pub fn can_process(&self) -> bool {
        match &self.document {
            Some(doc) => doc.needs_processing() && !self.is_busy(&doc.id),
            None => false,
        }
    }

    /// A process request for `document_id` was sent.
    pub fn process_requested(&mut self, document_id: &str) {
        self.busy.insert(document_id.to_string());
    }

    /// The backend answered the process request. On success the document stays busy
    /// until its poll finishes and the selected copy shows the pending artifacts as
    /// processing.
    pub fn process_started(&mut self, document_id: &str, accepted: bool) {
        if !accepted {
            self.busy.remove(document_id);
            return;
        }

        if let Some(doc) = self.document.as_mut().filter(|doc| doc.id == document_id) {
            doc.mark_processing_started();
        }
    }

    pub fn poll_finished(&mut self, document_id: &str) {
        self.busy.remove(document_id);
    }

    pub fn is_busy(&self, document_id: &str) -> bool {
        self.busy.contains(document_id)
    }

    pub fn document_deleted(&mut self, document_id: &str) {
        self.busy.remove(document_id);
        if self.selected_id.as_deref() == Some(document_id) {
            self.clear_selection();
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::fake::{
        doc_with_statuses,
        document,
    };

    fn loaded(doc: Document) -> ContentState {
        let mut state = ContentState::new();
        assert!(state.select(&doc.id));
        assert!(state.apply_update(doc));
        state
    }

    #[test]
    fn nothing_selected_shows_prompt_everywhere() {
        let state = ContentState::new();
        assert_eq!(state.source_view(), SourceView::NoSelection);
        for kind in ArtifactKind::ALL {
            assert_eq!(state.artifact_view(kind), ArtifactView::NoSelection);
        }
        assert!(!state.show_process_button());
    }

    #[test]
    fn empty_text_prompts_for_content_and_filled_text_reads() {
        let mut state = loaded(document("d1", "s1"));
        assert_eq!(state.source_view(), SourceView::EmptyText);

        let mut doc = document("d1", "s1");
        doc.content = "Mitochondria produce ATP".to_string();
        state.apply_update(doc);
        assert_eq!(state.source_view(), SourceView::Text("Mitochondria produce ATP"));
        assert_eq!(state.view_mode(), ViewMode::Read);
    }

    #[test]
    fn selection_shows_loading_until_the_document_arrives() {
        let mut state = ContentState::new();
        assert!(state.select("d1"));
        assert_eq!(state.source_view(), SourceView::Loading);
        assert_eq!(state.artifact_view(ArtifactKind::Summary), ArtifactView::Loading);

        // Stale responses for other documents are dropped.
        assert!(!state.apply_update(document("d2", "s1")));
        assert_eq!(state.source_view(), SourceView::Loading);
    }

    #[test]
    fn links_and_pdfs_have_their_own_views() {
        let mut link = document("d1", "s1");
        link.doc_type = DocumentType::Youtube;
        link.content = " https://youtu.be/abc ".to_string();
        assert_eq!(loaded(link).source_view(), SourceView::Link { url: "https://youtu.be/abc" });

        let mut pdf = document("d2", "s1");
        pdf.doc_type = DocumentType::Pdf;
        assert_eq!(loaded(pdf.clone()).source_view(), SourceView::Pdf { file: None });
        pdf.file_url = Some("notes.pdf".to_string());
        assert_eq!(loaded(pdf).source_view(), SourceView::Pdf { file: Some("notes.pdf") });
    }

    #[test]
    fn edit_then_save_only_sends_changes() {
        let mut doc = document("d1", "s1");
        doc.content = "old".to_string();
        let mut state = loaded(doc.clone());

        state.begin_edit();
        assert_eq!(state.source_view(), SourceView::Editing);
        assert!(state.pending_update().is_none());

        state.draft_mut().content = "new".to_string();
        state.draft_mut().title = "   ".to_string();
        let (id, update) = state.pending_update().unwrap();
        assert_eq!(id, "d1");
        assert_eq!(update.title, None);
        assert_eq!(update.content.as_deref(), Some("new"));

        doc.content = "new".to_string();
        state.saved(doc);
        assert_eq!(state.view_mode(), ViewMode::Read);
        assert_eq!(state.source_view(), SourceView::Text("new"));
    }

    #[test]
    fn rename_keeps_an_open_draft() {
        let mut doc = document("d1", "s1");
        doc.content = "old".to_string();
        let mut state = loaded(doc.clone());
        state.begin_edit();
        state.draft_mut().content = "unsaved notes".to_string();

        doc.title = "Mitosis".to_string();
        state.renamed(doc.clone());
        assert_eq!(state.view_mode(), ViewMode::Edit);
        assert_eq!(state.draft_mut().title, "Mitosis");
        let (_, update) = state.pending_update().unwrap();
        assert_eq!(update.title, None);
        assert_eq!(update.content.as_deref(), Some("unsaved notes"));

        // A title the user typed wins over a later rename.
        state.draft_mut().title = "Meiosis".to_string();
        doc.title = "Cell division".to_string();
        state.renamed(doc);
        assert_eq!(state.draft_mut().title, "Meiosis");
        assert_eq!(state.document().map(|d| d.title.as_str()), Some("Cell division"));
    }

    #[test]
    fn cancel_edit_discards_the_draft() {
        let mut state = loaded(document("d1", "s1"));
        state.begin_edit();
        state.draft_mut().content = "draft".to_string();
        state.cancel_edit();
        assert_eq!(state.source_view(), SourceView::EmptyText);
        assert!(state.pending_update().is_none());
    }

    #[test]
    fn processing_moves_through_statuses_in_order() {
        use ProcessingStatus::*;

        let mut doc = doc_with_statuses("d1", NotProcessed, NotProcessed, NotProcessed);
        doc.content = "Photosynthesis".to_string();
        let mut state = loaded(doc.clone());
        assert_eq!(state.artifact_view(ArtifactKind::Summary), ArtifactView::NotProcessed);
        assert!(state.can_process());

        state.process_requested("d1");
        assert!(!state.can_process());
        state.process_started("d1", true);
        assert_eq!(state.artifact_view(ArtifactKind::Summary), ArtifactView::Processing);
        assert!(state.show_process_button());

        doc.summary_status = Completed;
        doc.summary = "Plants turn light into sugar.".to_string();
        doc.flashcards_status = Failed;
        doc.mcqs_status = Completed;
        state.apply_update(doc);
        state.poll_finished("d1");

        assert_eq!(
            state.artifact_view(ArtifactKind::Summary),
            ArtifactView::Summary("Plants turn light into sugar.")
        );
        assert_eq!(state.artifact_view(ArtifactKind::Flashcards), ArtifactView::Failed);
        assert_eq!(state.artifact_view(ArtifactKind::Mcqs), ArtifactView::Empty);
        // The failed artifact can be retried.
        assert!(state.can_process());
    }

    #[test]
    fn rejected_process_request_frees_the_button() {
        let mut state = loaded(document("d1", "s1"));
        state.process_requested("d1");
        state.process_started("d1", false);
        assert!(state.can_process());
        assert_eq!(state.artifact_view(ArtifactKind::Summary), ArtifactView::NotProcessed);
    }

    #[test]
    fn fully_completed_document_hides_the_process_button() {
        use ProcessingStatus::Completed;
        let state = loaded(doc_with_statuses("d1", Completed, Completed, Completed));
        assert!(!state.show_process_button());
        assert!(!state.can_process());
    }

    #[test]
    fn deleting_the_selected_document_clears_the_view() {
        let mut state = loaded(document("d1", "s1"));
        state.process_requested("d1");
        state.document_deleted("d1");
        assert_eq!(state.selected_id(), None);
        assert!(!state.is_busy("d1"));

        let mut state = loaded(document("d1", "s1"));
        state.document_deleted("d2");
        assert_eq!(state.selected_id(), Some("d1"));
    }

    #[test]
    fn mode_is_independent_of_selection() {
        let mut state = ContentState::new();
        state.set_mode(Mode::Flashcards);
        state.select("d1");
        state.clear_selection();
        assert_eq!(state.mode(), Mode::Flashcards);
        assert_eq!(Mode::Flashcards.artifact(), Some(ArtifactKind::Flashcards));
        assert_eq!(Mode::Source.artifact(), None);
    }
}
