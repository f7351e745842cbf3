use eframe::egui;
use egui_ltreeview::{
    TreeView,
    TreeViewBuilder,
    TreeViewState,
};

use crate::{
    core::tree::{
        SubjectNode,
        SubjectTree,
    },
    gui::theme::Palette,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarAction {
    ToggleCollapsed,
    AddSubject,
    ToggleSubject(String),
    /// Picked from the collapsed strip: show the sidebar with this subject open.
    RevealSubject(String),
    DeleteSubject { id: String, name: String },
    AddDocument { subject_id: String, subject_name: String },
    SelectDocument(String),
    RenameDocument { id: String, title: String },
    DeleteDocument { id: String, title: String },
}

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum SidebarNodeId {
    Subject(String),
    Document(String),
    /// "Loading…" or "No documents" under the subject with this id.
    Placeholder(String),
}

/// The subject tree. Openness is driven by `SubjectTree`; the view only reports what
/// the user clicked.
#[derive(Default)]
pub struct Sidebar {
    tree_state: TreeViewState<SidebarNodeId>,
    last_selected: Option<SidebarNodeId>,
}

impl Sidebar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn show(
        &mut self,
        ctx: &egui::Context,
        tree: &SubjectTree,
        collapsed: bool,
        subjects_loading: bool,
    ) -> Option<SidebarAction> {
        let panel = egui::SidePanel::left("subject_sidebar");
        let panel = if collapsed {
            panel.exact_width(48.0).resizable(false)
        } else {
            panel.default_width(260.0).width_range(200.0..=420.0).resizable(true)
        };

        panel
            .show(ctx, |ui| {
                ui.add_space(8.0);
                if collapsed {
                    show_strip(ui, tree)
                } else {
                    self.show_tree(ui, tree, subjects_loading)
                }
            })
            .inner
    }

    fn show_tree(
        &mut self,
        ui: &mut egui::Ui,
        tree: &SubjectTree,
        subjects_loading: bool,
    ) -> Option<SidebarAction> {
        let palette = Palette::current(ui.ctx());
        let mut action = None;

        ui.horizontal(|ui| {
            if ui.button("➕ Add Subject").clicked() {
                action = Some(SidebarAction::AddSubject);
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("◀").on_hover_text("Collapse sidebar").clicked() {
                    action = Some(SidebarAction::ToggleCollapsed);
                }
            });
        });
        ui.separator();

        if subjects_loading && tree.is_empty() {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading subjects…");
            });
            return action;
        }
        if tree.is_empty() {
            ui.label(palette.hint("No subjects yet. Add one to get started."));
            return action;
        }

        ui.horizontal(|ui| {
            let buttons = selection_actions(tree, self.last_selected.as_ref());
            if buttons.is_empty() {
                ui.label(palette.hint("Select a subject or document"));
            }
            for (label, button_action) in buttons {
                if ui.small_button(label).clicked() {
                    action = Some(button_action);
                }
            }
        });
        ui.add_space(4.0);

        for node in tree.nodes() {
            let id = SidebarNodeId::Subject(node.subject.id.clone());
            self.tree_state.set_openness(id, node.expanded);
        }

        egui::ScrollArea::vertical()
            .id_salt("subject_tree_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let tree_id = ui.make_persistent_id("subject_tree");
                TreeView::new(tree_id).allow_multi_selection(false).show_state(
                    ui,
                    &mut self.tree_state,
                    |builder| {
                        for node in tree.nodes() {
                            build_subject(builder, node);
                        }
                    },
                );
            });

        let selected = self.tree_state.selected().first().cloned();
        let changed = selection_change(self.last_selected.as_ref(), selected.as_ref());
        self.last_selected = selected;

        let toggled = openness_change(tree, |id| self.tree_state.is_open(id))
            .map(SidebarAction::ToggleSubject);

        action.or(toggled).or(changed)
    }
}

fn build_subject(builder: &mut TreeViewBuilder<SidebarNodeId>, node: &SubjectNode) {
    let subject = &node.subject;
    builder.dir(SidebarNodeId::Subject(subject.id.clone()), format!("📚 {}", subject.name));

    let placeholder = SidebarNodeId::Placeholder(subject.id.clone());
    match node.documents.as_deref() {
        _ if node.loading => {
            builder.leaf(placeholder, "⏳ Loading…");
        }
        None => {}
        Some([]) => {
            builder.leaf(placeholder, "No documents");
        }
        Some(documents) => {
            for doc in documents {
                let label = format!("{} {}", doc.doc_type.icon(), doc.display_title());
                builder.leaf(SidebarNodeId::Document(doc.id.clone()), label);
            }
        }
    }

    builder.close_dir();
}

/// One button per subject in the collapsed sidebar.
fn show_strip(ui: &mut egui::Ui, tree: &SubjectTree) -> Option<SidebarAction> {
    let mut action = None;
    ui.vertical_centered(|ui| {
        if ui.button("▶").on_hover_text("Expand sidebar").clicked() {
            action = Some(SidebarAction::ToggleCollapsed);
        }
        ui.separator();

        egui::ScrollArea::vertical().id_salt("subject_strip_scroll").show(ui, |ui| {
            for node in tree.nodes() {
                let subject = &node.subject;
                let button = ui.button(subject_initial(&subject.name)).on_hover_text(&subject.name);
                if button.clicked() {
                    action = Some(SidebarAction::RevealSubject(subject.id.clone()));
                }
            }
        });
    });
    action
}

fn subject_initial(name: &str) -> String {
    name.trim()
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_else(|| "📚".to_string())
}

/// A document that just became selected opens it.
fn selection_change(
    previous: Option<&SidebarNodeId>,
    current: Option<&SidebarNodeId>,
) -> Option<SidebarAction> {
    match current {
        Some(SidebarNodeId::Document(id)) if previous != current => {
            Some(SidebarAction::SelectDocument(id.clone()))
        }
        _ => None,
    }
}

/// The first subject whose arrow the user flipped this frame.
fn openness_change<F>(tree: &SubjectTree, is_open: F) -> Option<String>
where
    F: Fn(&SidebarNodeId) -> Option<bool>,
{
    tree.nodes()
        .iter()
        .find(|node| {
            is_open(&SidebarNodeId::Subject(node.subject.id.clone()))
                .is_some_and(|open| open != node.expanded)
        })
        .map(|node| node.subject.id.clone())
}

/// Buttons above the tree for whatever is selected.
fn selection_actions(
    tree: &SubjectTree,
    selected: Option<&SidebarNodeId>,
) -> Vec<(&'static str, SidebarAction)> {
    match selected {
        Some(SidebarNodeId::Subject(id)) => match tree.node(id) {
            Some(node) => {
                let name = node.subject.name.clone();
                vec![
                    (
                        "➕ Document",
                        SidebarAction::AddDocument { subject_id: id.clone(), subject_name: name.clone() },
                    ),
                    ("🗑 Delete", SidebarAction::DeleteSubject { id: id.clone(), name }),
                ]
            }
            None => Vec::new(),
        },
        Some(SidebarNodeId::Document(id)) => match tree.find_document(id) {
            Some(doc) => vec![
                ("✏ Rename", SidebarAction::RenameDocument { id: id.clone(), title: doc.title.clone() }),
                (
                    "🗑 Delete",
                    SidebarAction::DeleteDocument {
                        id: id.clone(),
                        title: doc.display_title().to_string(),
                    },
                ),
            ],
            None => Vec::new(),
        },
        Some(SidebarNodeId::Placeholder(_)) | None => Vec::new(),
    }
}
