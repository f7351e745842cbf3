//! Per-document study progress for the current session: where the user is in the
//! flashcard deck and which MCQ answers they picked. Nothing here is persisted.

use std::collections::{
    HashMap,
    HashSet,
};

use crate::core::Mcq;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlashcardProgress {
    index: usize,
    flipped: bool,
}

impl FlashcardProgress {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn flip(&mut self) {
        self.flipped = !self.flipped;
    }

    pub fn has_previous(&self) -> bool {
        self.index > 0
    }

    pub fn has_next(&self, deck_len: usize) -> bool {
        self.index + 1 < deck_len
    }

    pub fn next(&mut self, deck_len: usize) {
        if self.has_next(deck_len) {
            self.set_index(self.index + 1);
        }
    }

    pub fn previous(&mut self) {
        if self.has_previous() {
            self.set_index(self.index - 1);
        }
    }

    /// Keeps the index inside a deck that may have shrunk since it was last shown.
    pub fn clamp(&mut self, deck_len: usize) {
        let max = deck_len.saturating_sub(1);
        if self.index > max {
            self.set_index(max);
        }
    }

    fn set_index(&mut self, index: usize) {
        if index != self.index {
            self.index = index;
            self.flipped = false;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum McqOutcome {
    Correct,
    Incorrect { correct_label: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct McqScore {
    pub correct: usize,
    pub answered: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct McqProgress {
    selected: HashMap<usize, String>,
    submitted: HashSet<usize>,
}

impl McqProgress {
    pub fn selected(&self, question: usize) -> Option<&str> {
        self.selected.get(&question).map(String::as_str)
    }

    pub fn is_submitted(&self, question: usize) -> bool {
        self.submitted.contains(&question)
    }

    /// Picks an option. Ignored once the question is submitted.
    pub fn select(&mut self, question: usize, label: &str) {
        if !self.is_submitted(question) {
            self.selected.insert(question, label.to_string());
        }
    }

    /// Locks in the selected answer. Returns false if nothing was selected.
    pub fn submit(&mut self, question: usize) -> bool {
        if !self.selected.contains_key(&question) {
            return false;
        }
        self.submitted.insert(question);
        true
    }

    pub fn outcome(&self, question: usize, mcq: &Mcq) -> Option<McqOutcome> {
        if !self.is_submitted(question) {
            return None;
        }
        let selected = self.selected(question)?;

        Some(if mcq.is_correct(selected) {
            McqOutcome::Correct
        } else {
            McqOutcome::Incorrect { correct_label: mcq.correct_answer.clone() }
        })
    }

    pub fn score(&self, mcqs: &[Mcq]) -> McqScore {
        let mut score = McqScore { total: mcqs.len(), ..McqScore::default() };
        for (question, mcq) in mcqs.iter().enumerate() {
            match self.outcome(question, mcq) {
                Some(McqOutcome::Correct) => {
                    score.answered += 1;
                    score.correct += 1;
                }
                Some(McqOutcome::Incorrect { .. }) => score.answered += 1,
                None => {}
            }
        }
        score
    }

    pub fn reset(&mut self) {
        self.selected.clear();
        self.submitted.clear();
    }
}

#[derive(Debug, Clone, Default)]
pub struct DocumentProgress {
    pub flashcards: FlashcardProgress,
    pub mcqs: McqProgress,
}

/// Study progress keyed by document id, kept for the lifetime of the dashboard.
#[derive(Debug, Default)]
pub struct StudyProgressStore {
    documents: HashMap<String, DocumentProgress>,
}

impl StudyProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, document_id: &str) -> Option<&DocumentProgress> {
        self.documents.get(document_id)
    }

    pub fn entry(&mut self, document_id: &str) -> &mut DocumentProgress {
        self.documents.entry(document_id.to_string()).or_default()
    }

    pub fn remove(&mut self, document_id: &str) {
        self.documents.remove(document_id);
    }

    pub fn clear(&mut self) {
        self.documents.clear();
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
