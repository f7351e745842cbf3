use eframe::egui;

use crate::{
    backend::NewDocument,
    core::DocumentType,
    gui::{
        modal::{
            action_buttons,
            Modal,
            ModalResult,
        },
        theme::Palette,
    },
};

#[derive(Debug, Clone, Default)]
pub struct SubjectForm {
    pub name: String,
}

impl SubjectForm {
    pub fn name(&self) -> Option<String> {
        let name = self.name.trim();
        (!name.is_empty()).then(|| name.to_string())
    }
}

#[derive(Debug, Clone, Default)]
pub struct DocumentForm {
    pub subject_id: String,
    pub subject_name: String,
    pub title: String,
    pub doc_type: DocumentType,
    pub content: String,
}

impl DocumentForm {
    pub fn for_subject(subject_id: &str, subject_name: &str) -> Self {
        Self {
            subject_id: subject_id.to_string(),
            subject_name: subject_name.to_string(),
            ..Self::default()
        }
    }

    /// Builds the create request. A blank title becomes "New <type>"; link documents
    /// need an http(s) URL.
    pub fn to_request(&self) -> Result<NewDocument, String> {
        let title = match self.title.trim() {
            "" => format!("New {}", self.doc_type.label()),
            title => title.to_string(),
        };

        let content = self.content.trim();
        let content = match self.doc_type {
            DocumentType::Pdf => None,
            DocumentType::Youtube | DocumentType::Website => {
                if !(content.starts_with("http://") || content.starts_with("https://")) {
                    return Err("Enter a link starting with http:// or https://".to_string());
                }
                Some(content.to_string())
            }
            DocumentType::Text => (!content.is_empty()).then(|| self.content.clone()),
        };

        Ok(NewDocument {
            title,
            doc_type: self.doc_type,
            content,
            subject_id: self.subject_id.clone(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct RenameForm {
    pub document_id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    Subject { id: String, name: String },
    Document { id: String, title: String },
}

impl DeleteTarget {
    fn prompt(&self) -> String {
        match self {
            DeleteTarget::Subject { name, .. } => format!(
                "Delete the subject \"{}\" and all of its documents? This cannot be undone.",
                name
            ),
            DeleteTarget::Document { title, .. } => {
                format!("Delete \"{}\"? Its summary, flashcards and MCQs are lost too.", title)
            }
        }
    }
}

pub enum ModalAction {
    CreateSubject(String),
    CreateDocument(NewDocument),
    RenameDocument { document_id: String, title: String },
    Delete(DeleteTarget),
}

pub struct Modals {
    pub add_subject: Modal<SubjectForm>,
    pub add_document: Modal<DocumentForm>,
    pub rename_document: Modal<RenameForm>,
    pub confirm_delete: Modal<Option<DeleteTarget>>,
}

impl Default for Modals {
    fn default() -> Self {
        Self {
            add_subject: Modal::new("Add New Subject"),
            add_document: Modal::new("Add Document").with_width(440.0),
            rename_document: Modal::new("Rename Document"),
            confirm_delete: Modal::new("Confirm Delete"),
        }
    }
}

impl Modals {
    pub fn close_all(&mut self) {
        self.add_subject.close();
        self.add_document.close();
        self.rename_document.close();
        self.confirm_delete.close();
    }

    /// Shows whichever dialog is open and returns the confirmed action, if any.
    pub fn show(&mut self, ctx: &egui::Context) -> Option<ModalAction> {
        let palette = Palette::current(ctx);

        if let Some(ModalResult::Confirmed(form)) = self.add_subject.show(ctx, |ui, form| {
            ui.label("Enter the name of the subject you want to add.");
            ui.add_space(6.0);
            ui.add(
                egui::TextEdit::singleline(&mut form.name)
                    .hint_text("e.g., Biology")
                    .desired_width(f32::INFINITY),
            );
            action_buttons(ui, &*form, "Add Subject", "Cancel", form.name().is_some())
        }) {
            return form.name().map(ModalAction::CreateSubject);
        }

        if let Some(ModalResult::Confirmed(form)) = self.add_document.show(ctx, |ui, form| {
            ui.label(format!("Add a document to {}.", form.subject_name));
            ui.add_space(6.0);

            egui::Grid::new("add_document_grid").num_columns(2).spacing([8.0, 8.0]).show(
                ui,
                |ui| {
                    ui.label("Title");
                    ui.add(
                        egui::TextEdit::singleline(&mut form.title)
                            .hint_text(format!("New {}", form.doc_type.label())),
                    );
                    ui.end_row();

                    ui.label("Type");
                    egui::ComboBox::from_id_salt("document_type_combo")
                        .selected_text(form.doc_type.label())
                        .show_ui(ui, |ui| {
                            for doc_type in DocumentType::ALL {
                                ui.selectable_value(&mut form.doc_type, doc_type, doc_type.label());
                            }
                        });
                    ui.end_row();
                },
            );

            match form.doc_type {
                DocumentType::Text => {
                    ui.add_space(6.0);
                    ui.label("Notes (optional)");
                    ui.add(
                        egui::TextEdit::multiline(&mut form.content)
                            .desired_rows(5)
                            .desired_width(f32::INFINITY),
                    );
                }
                DocumentType::Youtube | DocumentType::Website => {
                    ui.add_space(6.0);
                    ui.label("Link");
                    ui.add(
                        egui::TextEdit::singleline(&mut form.content)
                            .hint_text("https://")
                            .desired_width(f32::INFINITY),
                    );
                }
                DocumentType::Pdf => {
                    ui.add_space(6.0);
                    ui.label(palette.hint("Attach the PDF file after the document is created."));
                }
            }

            let validation = form.to_request();
            if let Err(message) = &validation {
                // Only nag once the user has started typing the link.
                if !form.content.trim().is_empty() {
                    ui.colored_label(palette.error, message.as_str());
                }
            }
            action_buttons(ui, &*form, "Add Document", "Cancel", validation.is_ok())
        }) {
            return form.to_request().ok().map(ModalAction::CreateDocument);
        }

        if let Some(ModalResult::Confirmed(form)) = self.rename_document.show(ctx, |ui, form| {
            ui.add(egui::TextEdit::singleline(&mut form.title).desired_width(f32::INFINITY));
            let valid = !form.title.trim().is_empty();
            action_buttons(ui, &*form, "Save", "Cancel", valid)
        }) {
            return Some(ModalAction::RenameDocument {
                document_id: form.document_id,
                title: form.title.trim().to_string(),
            });
        }

        if let Some(ModalResult::Confirmed(Some(target))) =
            self.confirm_delete.show(ctx, |ui, target| {
                if let Some(target) = target {
                    ui.label(target.prompt());
                }
                action_buttons(ui, &*target, "Delete", "Cancel", target.is_some())
            })
        {
            return Some(ModalAction::Delete(target));
        }

        None
    }
}
