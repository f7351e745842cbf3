use crate::core::{
    Document,
    Subject,
};

#[derive(Debug, Clone)]
pub struct SubjectNode {
    pub subject: Subject,
    pub expanded: bool,
    /// `None` until the subject is first expanded.
    pub documents: Option<Vec<Document>>,
    pub loading: bool,
}

impl SubjectNode {
    fn new(subject: Subject) -> Self {
        Self { subject, expanded: false, documents: None, loading: false }
    }
}

/// The sidebar's subjects with their lazily loaded documents.
#[derive(Debug, Default)]
pub struct SubjectTree {
    nodes: Vec<SubjectNode>,
}

impl SubjectTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[SubjectNode] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Replaces the subject list, keeping expansion state and loaded documents for
    /// subjects that are still present.
    pub fn set_subjects(&mut self, subjects: Vec<Subject>) {
        let mut previous = std::mem::take(&mut self.nodes);
        self.nodes = subjects
            .into_iter()
            .map(|subject| match previous.iter().position(|n| n.subject.id == subject.id) {
                Some(pos) => {
                    let mut node = previous.swap_remove(pos);
                    node.subject = subject;
                    node
                }
                None => SubjectNode::new(subject),
            })
            .collect();
    }

    pub fn add_subject(&mut self, subject: Subject) {
        if self.node(&subject.id).is_none() {
            self.nodes.push(SubjectNode::new(subject));
        }
    }

    /// Removes the subject and returns the ids of the documents it held.
    pub fn remove_subject(&mut self, subject_id: &str) -> Vec<String> {
        let Some(pos) = self.nodes.iter().position(|n| n.subject.id == subject_id) else {
            return Vec::new();
        };
        self.nodes
            .remove(pos)
            .documents
            .unwrap_or_default()
            .into_iter()
            .map(|doc| doc.id)
            .collect()
    }

    /// Expands or collapses a subject. Returns true when its documents should be
    /// fetched now, which only happens on the first expansion.
    pub fn toggle(&mut self, subject_id: &str) -> bool {
        let Some(node) = self.node_mut(subject_id) else {
            return false;
        };
        node.expanded = !node.expanded;

        if node.expanded && node.documents.is_none() && !node.loading {
            node.loading = true;
            return true;
        }
        false
    }

    pub fn documents_loaded(&mut self, subject_id: &str, documents: Vec<Document>) {
        if let Some(node) = self.node_mut(subject_id) {
            node.documents = Some(documents);
            node.loading = false;
        }
    }

    /// A failed fetch collapses the subject so expanding it again retries.
    pub fn documents_failed(&mut self, subject_id: &str) {
        if let Some(node) = self.node_mut(subject_id) {
            node.loading = false;
            node.expanded = false;
        }
    }

    /// Adds a freshly created document under `subject_id` and expands the subject.
    /// Returns true when the subject's documents were never listed; the caller fetches
    /// them, and the new one arrives with the rest.
    pub fn add_document(&mut self, subject_id: &str, document: Document) -> bool {
        let Some(node) = self.node_mut(subject_id) else {
            return false;
        };
        node.expanded = true;

        match node.documents.as_mut() {
            Some(documents) => {
                if !documents.iter().any(|d| d.id == document.id) {
                    documents.push(document);
                }
                false
            }
            None if node.loading => false,
            None => {
                node.loading = true;
                true
            }
        }
    }

    /// Refreshes every copy of the document held in the tree.
    pub fn update_document(&mut self, document: &Document) {
        for node in &mut self.nodes {
            for doc in node.documents.iter_mut().flatten() {
                if doc.id == document.id {
                    *doc = document.clone();
                }
            }
        }
    }

    pub fn remove_document(&mut self, document_id: &str) {
        for node in &mut self.nodes {
            if let Some(documents) = node.documents.as_mut() {
                documents.retain(|d| d.id != document_id);
            }
        }
    }

    pub fn find_document(&self, document_id: &str) -> Option<&Document> {
        self.nodes.iter().flat_map(|n| n.documents.iter().flatten()).find(|d| d.id == document_id)
    }

    pub fn node(&self, subject_id: &str) -> Option<&SubjectNode> {
        self.nodes.iter().find(|n| n.subject.id == subject_id)
    }

    fn node_mut(&mut self, subject_id: &str) -> Option<&mut SubjectNode> {
        self.nodes.iter_mut().find(|n| n.subject.id == subject_id)
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::fake::document;

    fn subject(id: &str, name: &str) -> Subject {
        Subject { id: id.to_string(), name: name.to_string() }
    }

    fn tree_with_documents() -> SubjectTree {
        let mut tree = SubjectTree::new();
        tree.set_subjects(vec![subject("s1", "Biology"), subject("s2", "History")]);
        assert!(tree.toggle("s1"));
        tree.documents_loaded("s1", vec![document("d1", "s1"), document("d2", "s1")]);
        assert!(tree.toggle("s2"));
        tree.documents_loaded("s2", vec![document("d3", "s2")]);
        tree
    }

    #[test]
    fn documents_are_fetched_only_on_first_expand() {
        let mut tree = SubjectTree::new();
        tree.set_subjects(vec![subject("s1", "Biology")]);

        assert!(tree.toggle("s1"));
        // Still loading: a second expand must not fetch twice.
        tree.toggle("s1");
        assert!(!tree.toggle("s1"));

        tree.documents_loaded("s1", vec![document("d1", "s1")]);
        tree.toggle("s1");
        assert!(!tree.node("s1").unwrap().expanded);
        assert!(!tree.toggle("s1"));
        assert!(tree.node("s1").unwrap().expanded);
    }

    #[test]
    fn failed_fetch_allows_retry() {
        let mut tree = SubjectTree::new();
        tree.set_subjects(vec![subject("s1", "Biology")]);
        assert!(tree.toggle("s1"));
        tree.documents_failed("s1");
        assert!(!tree.node("s1").unwrap().expanded);
        assert!(tree.toggle("s1"));
    }

    #[test]
    fn deleting_a_subject_removes_its_documents() {
        let mut tree = tree_with_documents();
        let removed = tree.remove_subject("s1");

        assert_eq!(removed, vec!["d1".to_string(), "d2".to_string()]);
        assert!(tree.node("s1").is_none());
        assert!(tree.find_document("d1").is_none());
        assert!(tree.find_document("d3").is_some());
        assert!(tree.remove_subject("s1").is_empty());
    }

    #[test]
    fn document_mutations() {
        let mut tree = tree_with_documents();

        assert!(!tree.add_document("s2", document("d4", "s2")));
        assert!(!tree.add_document("s2", document("d4", "s2")));
        assert_eq!(tree.node("s2").and_then(|n| n.documents.as_ref()).map(Vec::len), Some(2));

        let mut renamed = document("d4", "s2");
        renamed.title = "Cold War".to_string();
        tree.update_document(&renamed);
        assert_eq!(tree.find_document("d4").map(|d| d.title.as_str()), Some("Cold War"));

        tree.remove_document("d4");
        assert!(tree.find_document("d4").is_none());
    }

    #[test]
    fn adding_to_an_unlisted_subject_fetches_its_documents() {
        let mut tree = SubjectTree::new();
        tree.add_subject(subject("s1", "Biology"));
        tree.add_subject(subject("s1", "Biology"));
        assert_eq!(tree.nodes().len(), 1);

        assert!(tree.add_document("s1", document("d3", "s1")));
        let node = tree.node("s1").unwrap();
        assert!(node.expanded);
        assert!(node.loading);
        assert!(node.documents.is_none());

        // Already loading: a second create must not fetch twice.
        assert!(!tree.add_document("s1", document("d4", "s1")));

        tree.documents_loaded(
            "s1",
            vec![document("d1", "s1"), document("d3", "s1"), document("d4", "s1")],
        );
        tree.toggle("s1");
        assert!(!tree.toggle("s1"));
        assert!(tree.find_document("d1").is_some());
    }

    #[test]
    fn refreshing_subjects_keeps_loaded_documents() {
        let mut tree = tree_with_documents();
        tree.set_subjects(vec![subject("s2", "Modern History")]);

        assert_eq!(tree.nodes().len(), 1);
        let node = tree.node("s2").unwrap();
        assert_eq!(node.subject.name, "Modern History");
        assert!(node.expanded);
        assert!(tree.find_document("d3").is_some());
    }
}
