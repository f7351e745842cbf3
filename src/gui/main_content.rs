use eframe::egui::{
    self,
    RichText,
};

use crate::{
    core::{
        content::{
            ArtifactView,
            ContentState,
            Mode,
            SourceView,
            ViewMode,
        },
        progress::{
            McqOutcome,
            StudyProgressStore,
        },
        ArtifactKind,
        Document,
        DocumentType,
        Flashcard,
        Mcq,
        ProcessingStatus,
    },
    gui::theme::Palette,
};

const EMPTY_PROMPT: &str = "Select or add a document to get started";

pub enum ContentAction {
    BeginEdit,
    CancelEdit,
    Save,
    AttachPdf,
    Process,
}

pub fn show(
    ctx: &egui::Context,
    content: &mut ContentState,
    progress: &mut StudyProgressStore,
) -> Option<ContentAction> {
    let palette = Palette::current(ctx);
    let mut action = None;

    egui::CentralPanel::default().show(ctx, |ui| {
        let panel_rect = ui.max_rect();

        if let Some(doc) = content.document() {
            document_header(ui, doc, &palette);
            ui.separator();
        }

        match content.mode().artifact() {
            None => source(ui, content, &palette, &mut action),
            Some(kind) => artifact(ui, content, progress, kind, &palette, &mut action),
        }

        if content.mode() == Mode::Source && content.show_process_button() {
            let busy = content.selected_id().is_some_and(|id| content.is_busy(id));
            let label = if busy { "⏳ Processing…" } else { "✨ Process Document" };
            let size = egui::vec2(190.0, 36.0);
            let rect = egui::Rect::from_min_size(
                panel_rect.right_bottom() - size - egui::vec2(12.0, 12.0),
                size,
            );
            let enabled = content.can_process();
            let button = ui
                .add_enabled_ui(enabled, |ui| {
                    ui.put(rect, egui::Button::new(label).fill(palette.accent))
                })
                .inner;
            if button.clicked() {
                action = Some(ContentAction::Process);
            }
        }
    });

    action
}

fn document_header(ui: &mut egui::Ui, doc: &Document, palette: &Palette) {
    ui.horizontal_wrapped(|ui| {
        ui.heading(doc.display_title());
        ui.label(palette.hint(doc.doc_type.label()));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            for kind in ArtifactKind::ALL.iter().rev() {
                let status = doc.status(*kind);
                let color = match status {
                    ProcessingStatus::NotProcessed => palette.muted,
                    ProcessingStatus::Processing => palette.warning,
                    ProcessingStatus::Completed => palette.success,
                    ProcessingStatus::Failed => palette.error,
                };
                ui.label(RichText::new(format!("● {}", kind.label())).small().color(color))
                    .on_hover_text(status.label());
            }
        });
    });
}

fn centered_message(ui: &mut egui::Ui, text: impl Into<egui::WidgetText>) {
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() * 0.3);
        ui.label(text);
    });
}

fn source(
    ui: &mut egui::Ui,
    content: &mut ContentState,
    palette: &Palette,
    action: &mut Option<ContentAction>,
) {
    if content.view_mode() == ViewMode::Edit {
        editor(ui, content, action);
        return;
    }

    let doc_type = content.document().map(|d| d.doc_type).unwrap_or_default();
    match content.source_view() {
        SourceView::NoSelection => centered_message(ui, EMPTY_PROMPT),
        SourceView::Loading | SourceView::Editing => {
            ui.centered_and_justified(|ui| ui.spinner());
        }
        SourceView::EmptyText => {
            let (message, button) = if doc_type.is_link() {
                ("This document has no link yet.", "Add link")
            } else {
                ("This document has no content yet. Add your notes to get started.", "Add content")
            };
            ui.vertical_centered(|ui| {
                ui.add_space(ui.available_height() * 0.3);
                ui.label(palette.hint(message));
                ui.add_space(8.0);
                if ui.button(button).clicked() {
                    *action = Some(ContentAction::BeginEdit);
                }
            });
        }
        SourceView::Text(text) => {
            if ui.button("✏ Edit").clicked() {
                *action = Some(ContentAction::BeginEdit);
            }
            ui.add_space(6.0);
            egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
                ui.add(egui::Label::new(text).selectable(true).wrap());
            });
        }
        SourceView::Link { url } => {
            ui.horizontal(|ui| {
                ui.label(if doc_type == DocumentType::Youtube { "▶" } else { "🌐" });
                ui.hyperlink_to(url, url);
            });
            ui.add_space(6.0);
            if ui.button("✏ Edit link").clicked() {
                *action = Some(ContentAction::BeginEdit);
            }
        }
        SourceView::Pdf { file } => {
            match file {
                Some(file) if file.starts_with("http://") || file.starts_with("https://") => {
                    ui.horizontal(|ui| {
                        ui.label("📄");
                        ui.hyperlink_to(file, file);
                    });
                }
                Some(file) => {
                    ui.label(format!("📄 {}", file));
                }
                None => {
                    ui.label(palette.hint("No PDF attached yet."));
                }
            }
            ui.add_space(8.0);
            let label = if file.is_some() { "Replace PDF" } else { "📎 Attach PDF" };
            if ui.button(label).clicked() {
                *action = Some(ContentAction::AttachPdf);
            }
        }
    }
}

fn editor(ui: &mut egui::Ui, content: &mut ContentState, action: &mut Option<ContentAction>) {
    let can_save = content.pending_update().is_some();
    let is_link = content.document().is_some_and(|d| d.doc_type.is_link());
    let draft = content.draft_mut();

    ui.label("Title");
    ui.add(egui::TextEdit::singleline(&mut draft.title).desired_width(f32::INFINITY));
    ui.add_space(6.0);

    if is_link {
        ui.label("Link");
        ui.add(
            egui::TextEdit::singleline(&mut draft.content)
                .hint_text("https://")
                .desired_width(f32::INFINITY),
        );
    } else {
        ui.label("Content");
        egui::ScrollArea::vertical().max_height(ui.available_height() - 48.0).show(ui, |ui| {
            ui.add(
                egui::TextEdit::multiline(&mut draft.content)
                    .desired_rows(16)
                    .desired_width(f32::INFINITY),
            );
        });
    }

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        if ui.add_enabled(can_save, egui::Button::new("💾 Save")).clicked() {
            *action = Some(ContentAction::Save);
        }
        if ui.button("Cancel").clicked() {
            *action = Some(ContentAction::CancelEdit);
        }
    });
}

fn artifact(
    ui: &mut egui::Ui,
    content: &ContentState,
    progress: &mut StudyProgressStore,
    kind: ArtifactKind,
    palette: &Palette,
    action: &mut Option<ContentAction>,
) {
    let can_process = content.can_process();

    match content.artifact_view(kind) {
        ArtifactView::NoSelection => centered_message(ui, EMPTY_PROMPT),
        ArtifactView::Loading => {
            ui.centered_and_justified(|ui| ui.spinner());
        }
        ArtifactView::NotProcessed => {
            ui.vertical_centered(|ui| {
                ui.add_space(ui.available_height() * 0.3);
                ui.label(palette.hint("Process the source content first"));
                ui.add_space(8.0);
                if ui.add_enabled(can_process, egui::Button::new("✨ Process Document")).clicked() {
                    *action = Some(ContentAction::Process);
                }
            });
        }
        ArtifactView::Processing => {
            ui.vertical_centered(|ui| {
                ui.add_space(ui.available_height() * 0.3);
                ui.spinner();
                ui.label(format!("Generating {}…", kind.label().to_lowercase()));
            });
        }
        ArtifactView::Failed => {
            ui.vertical_centered(|ui| {
                ui.add_space(ui.available_height() * 0.3);
                ui.colored_label(
                    palette.error,
                    format!("Generating the {} failed.", kind.label().to_lowercase()),
                );
                ui.add_space(8.0);
                if ui.add_enabled(can_process, egui::Button::new("↻ Retry")).clicked() {
                    *action = Some(ContentAction::Process);
                }
            });
        }
        ArtifactView::Empty => centered_message(ui, palette.hint("Nothing was generated")),
        ArtifactView::Summary(text) => {
            egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
                ui.add(egui::Label::new(text).selectable(true).wrap());
            });
        }
        ArtifactView::Flashcards(cards) => {
            if let Some(id) = content.selected_id() {
                flashcards(ui, cards, progress, id, palette);
            }
        }
        ArtifactView::Mcqs(mcqs) => {
            if let Some(id) = content.selected_id() {
                quiz(ui, mcqs, progress, id, palette);
            }
        }
    }
}

fn flashcards(
    ui: &mut egui::Ui,
    cards: &[Flashcard],
    progress: &mut StudyProgressStore,
    document_id: &str,
    palette: &Palette,
) {
    let state = &mut progress.entry(document_id).flashcards;
    state.clamp(cards.len());
    let Some(card) = cards.get(state.index()) else {
        return;
    };

    ui.vertical_centered(|ui| {
        ui.label(palette.hint(&format!("Card {} of {}", state.index() + 1, cards.len())));
        ui.add_space(12.0);

        let (side, text) =
            if state.is_flipped() { ("Answer", &card.back) } else { ("Question", &card.front) };
        let card_response = egui::Frame::group(ui.style())
            .inner_margin(egui::Margin::same(24))
            .show(ui, |ui| {
                ui.set_width(ui.available_width().min(560.0));
                ui.set_min_height(180.0);
                ui.label(palette.hint(side));
                ui.add_space(8.0);
                ui.label(RichText::new(text.as_str()).size(18.0));
            })
            .response
            .interact(egui::Sense::click())
            .on_hover_text("Click to flip");
        if card_response.clicked() {
            state.flip();
        }

        ui.add_space(12.0);
        ui.horizontal(|ui| {
            if ui.add_enabled(state.has_previous(), egui::Button::new("◀ Previous")).clicked() {
                state.previous();
            }
            if ui.button("⟲ Flip").clicked() {
                state.flip();
            }
            if ui.add_enabled(state.has_next(cards.len()), egui::Button::new("Next ▶")).clicked() {
                state.next(cards.len());
            }
        });
    });
}

fn quiz(
    ui: &mut egui::Ui,
    mcqs: &[Mcq],
    progress: &mut StudyProgressStore,
    document_id: &str,
    palette: &Palette,
) {
    let state = &mut progress.entry(document_id).mcqs;
    let score = state.score(mcqs);

    ui.horizontal(|ui| {
        ui.label(format!(
            "Score: {} / {} answered ({} questions)",
            score.correct, score.answered, score.total
        ));
        if ui.add_enabled(score.answered > 0, egui::Button::new("Reset quiz")).clicked() {
            state.reset();
        }
    });
    ui.add_space(6.0);

    egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
        for (index, mcq) in mcqs.iter().enumerate() {
            egui::Frame::group(ui.style()).inner_margin(egui::Margin::same(12)).show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(RichText::new(format!("{}. {}", index + 1, mcq.question)).strong());
                ui.add_space(4.0);

                let submitted = state.is_submitted(index);
                for (label, text) in &mcq.options {
                    let selected = state.selected(index) == Some(label.as_str());
                    let option = ui.add_enabled(
                        !submitted,
                        egui::RadioButton::new(selected, format!("{}. {}", label, text)),
                    );
                    if option.clicked() {
                        state.select(index, label);
                    }
                }

                ui.add_space(4.0);
                match state.outcome(index, mcq) {
                    None => {
                        let can_submit = state.selected(index).is_some();
                        if ui.add_enabled(can_submit, egui::Button::new("Submit")).clicked() {
                            state.submit(index);
                        }
                    }
                    Some(McqOutcome::Correct) => {
                        ui.colored_label(palette.success, "✔ Correct!");
                    }
                    Some(McqOutcome::Incorrect { correct_label }) => {
                        let answer = match mcq.correct_option_text() {
                            Some(text) => format!("{}. {}", correct_label, text),
                            None => correct_label,
                        };
                        ui.colored_label(
                            palette.error,
                            format!("✘ Incorrect. The correct answer is {}", answer),
                        );
                    }
                }
            });
            ui.add_space(6.0);
        }
    });
}
