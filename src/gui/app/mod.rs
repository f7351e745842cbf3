mod modals;

use std::sync::Arc;

use eframe::egui;
use modals::{
    DeleteTarget,
    DocumentForm,
    ModalAction,
    Modals,
    RenameForm,
    SubjectForm,
};
use tracing::{
    debug,
    info,
    warn,
};

use super::{
    auth_view::{
        self,
        AuthForm,
        AuthRequest,
    },
    main_content::{
        self,
        ContentAction,
    },
    message_overlay::MessageOverlay,
    mode_bar,
    settings::{
        SettingsData,
        SETTINGS_FILE,
    },
    sidebar::{
        Sidebar,
        SidebarAction,
    },
    theme::set_theme,
    toast::Toasts,
    top_bar::{
        TopBar,
        TopBarAction,
    },
};
use crate::{
    backend::{
        AuthResponse,
        StudyApi,
    },
    core::{
        config::AppConfig,
        content::{
            ContentState,
            Mode,
        },
        poller::PollSettings,
        progress::StudyProgressStore,
        routing::{
            guard,
            Route,
            TokenCheck,
        },
        session::Session,
        tasks::{
            manager::Waker,
            types::TaskOutcome,
            PollEnd,
            TaskManager,
            TaskResult,
        },
        tree::SubjectTree,
        MindmateError,
    },
    persistence::DataDir,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    /// A stored token is being validated.
    Checking,
    Auth,
    Dashboard,
}

pub struct StudyApp {
    // Session
    session: Session,
    screen: Screen,
    auth: AuthForm,

    // Dashboard state
    tree: SubjectTree,
    subjects_loading: bool,
    content: ContentState,
    progress: StudyProgressStore,

    // Configuration
    settings: SettingsData,
    data_dir: DataDir,

    // UI State
    sidebar: Sidebar,
    modals: Modals,
    toasts: Toasts,
    overlay: MessageOverlay,

    task_manager: TaskManager,
}

impl StudyApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: &AppConfig,
        data_dir: DataDir,
        session: Session,
        api: Arc<dyn StudyApi>,
    ) -> Result<Self, MindmateError> {
        let ctx = cc.egui_ctx.clone();
        let waker: Waker = Arc::new(move || ctx.request_repaint());

        let mut app = Self::build(config, data_dir, session, api, Some(waker))?;
        set_theme(&cc.egui_ctx, app.settings.dark_mode);
        app.start();
        Ok(app)
    }

    fn build(
        config: &AppConfig,
        data_dir: DataDir,
        session: Session,
        api: Arc<dyn StudyApi>,
        waker: Option<Waker>,
    ) -> Result<Self, MindmateError> {
        let mut task_manager = TaskManager::new(api, PollSettings::from(config))?;
        if let Some(waker) = waker {
            task_manager = task_manager.with_waker(waker);
        }
        let settings = data_dir.load_json_or_default::<SettingsData>(SETTINGS_FILE);

        Ok(Self {
            session,
            screen: Screen::Auth,
            auth: AuthForm::default(),

            tree: SubjectTree::new(),
            subjects_loading: false,
            content: ContentState::new(),
            progress: StudyProgressStore::new(),

            settings,
            data_dir,

            sidebar: Sidebar::new(),
            modals: Modals::default(),
            toasts: Toasts::new(),
            overlay: MessageOverlay::new(),

            task_manager,
        })
    }

    /// Restores the stored session and validates it before showing the dashboard.
    fn start(&mut self) {
        if self.session.init() {
            self.screen = Screen::Checking;
            self.overlay.set_message("Checking authentication…");
            self.task_manager.check_token();
        } else {
            self.navigate(Route::Auth);
        }
    }

    fn navigate(&mut self, requested: Route) {
        match guard(requested, self.session.is_authenticated()) {
            Route::Auth => self.screen = Screen::Auth,
            Route::Dashboard => {
                if self.screen != Screen::Dashboard {
                    self.screen = Screen::Dashboard;
                    self.load_subjects();
                }
            }
        }
    }

    fn load_subjects(&mut self) {
        self.subjects_loading = true;
        self.task_manager.load_subjects();
    }

    /// Logs out: stops background polling, forgets the token and clears every piece of
    /// dashboard state.
    fn end_session(&mut self) {
        self.task_manager.cancel_all_polls();
        self.session.teardown();

        self.tree.clear();
        self.subjects_loading = false;
        self.content.reset();
        self.progress.clear();
        self.sidebar.reset();
        self.modals.close_all();
        self.overlay.clear_message();
        self.auth.reset();

        self.navigate(Route::Auth);
    }

    fn save_settings(&self) {
        if let Err(e) = self.data_dir.save_json(&self.settings, SETTINGS_FILE) {
            warn!("Failed to save settings: {}", e);
        }
    }

    fn document_title(&self, document_id: &str) -> String {
        self.tree
            .find_document(document_id)
            .map(|doc| doc.display_title().to_string())
            .unwrap_or_else(|| "Document".to_string())
    }
}

impl eframe::App for StudyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        for result in self.task_manager.poll_results() {
            self.handle_task_result(result);
        }

        match self.screen {
            Screen::Checking => {
                egui::CentralPanel::default().show(ctx, |_ui| {});
            }
            Screen::Auth => {
                if let Some(request) = auth_view::show(ctx, &mut self.auth) {
                    self.submit_auth(request);
                }
            }
            Screen::Dashboard => self.show_dashboard(ctx),
        }

        self.overlay.show(ctx);
        self.toasts.show(ctx);
    }
}

impl StudyApp {
    fn show_dashboard(&mut self, ctx: &egui::Context) {
        if let Some(action) =
            TopBar::show(ctx, self.settings.dark_mode, self.task_manager.has_active_polls())
        {
            self.handle_top_bar_action(action, ctx);
        }

        if let Some(action) = self.sidebar.show(
            ctx,
            &self.tree,
            self.settings.sidebar_collapsed,
            self.subjects_loading,
        ) {
            self.handle_sidebar_action(action);
        }

        if let Some(mode) = mode_bar::show(ctx, self.content.mode()) {
            self.content.set_mode(mode);
        }

        if let Some(action) = main_content::show(ctx, &mut self.content, &mut self.progress) {
            self.handle_content_action(action);
        }

        if let Some(action) = self.modals.show(ctx) {
            self.handle_modal_action(action);
        }
    }

    fn submit_auth(&mut self, request: AuthRequest) {
        match request {
            AuthRequest::Login(request) => {
                info!("Signing in as {}", request.email);
                self.task_manager.login(request);
            }
            AuthRequest::Signup(request) => {
                info!("Creating account for {}", request.email);
                self.task_manager.signup(request);
            }
        }
    }

    fn handle_top_bar_action(&mut self, action: TopBarAction, ctx: &egui::Context) {
        match action {
            TopBarAction::RefreshSubjects => self.load_subjects(),
            TopBarAction::ToggleTheme => {
                self.settings.dark_mode = !self.settings.dark_mode;
                set_theme(ctx, self.settings.dark_mode);
                self.save_settings();
            }
            TopBarAction::Logout => {
                self.end_session();
                self.toasts.info("Signed out");
            }
        }
    }

    fn handle_sidebar_action(&mut self, action: SidebarAction) {
        match action {
            SidebarAction::ToggleCollapsed => {
                self.settings.sidebar_collapsed = !self.settings.sidebar_collapsed;
                self.save_settings();
            }
            SidebarAction::AddSubject => self.modals.add_subject.open_with(SubjectForm::default()),
            SidebarAction::ToggleSubject(subject_id) => {
                if self.tree.toggle(&subject_id) {
                    self.task_manager.load_documents(subject_id);
                }
            }
            SidebarAction::RevealSubject(subject_id) => {
                if self.settings.sidebar_collapsed {
                    self.settings.sidebar_collapsed = false;
                    self.save_settings();
                }
                let collapsed = self.tree.node(&subject_id).is_some_and(|node| !node.expanded);
                if collapsed && self.tree.toggle(&subject_id) {
                    self.task_manager.load_documents(subject_id);
                }
            }
            SidebarAction::DeleteSubject { id, name } => {
                self.modals.confirm_delete.open_with(Some(DeleteTarget::Subject { id, name }));
            }
            SidebarAction::AddDocument { subject_id, subject_name } => {
                self.modals
                    .add_document
                    .open_with(DocumentForm::for_subject(&subject_id, &subject_name));
            }
            SidebarAction::SelectDocument(document_id) => self.select_document(document_id),
            SidebarAction::RenameDocument { id, title } => {
                self.modals.rename_document.open_with(RenameForm { document_id: id, title });
            }
            SidebarAction::DeleteDocument { id, title } => {
                self.modals.confirm_delete.open_with(Some(DeleteTarget::Document { id, title }));
            }
        }
    }

    fn select_document(&mut self, document_id: String) {
        if self.content.select(&document_id) {
            debug!("Opening document {}", document_id);
            self.task_manager.open_document(document_id);
        }
    }

    fn handle_content_action(&mut self, action: ContentAction) {
        match action {
            ContentAction::BeginEdit => self.content.begin_edit(),
            ContentAction::CancelEdit => self.content.cancel_edit(),
            ContentAction::Save => match self.content.pending_update() {
                Some((document_id, update)) => self.task_manager.save_document(document_id, update),
                None => self.content.cancel_edit(),
            },
            ContentAction::AttachPdf => {
                let Some(document_id) = self.content.selected_id().map(str::to_string) else {
                    return;
                };
                if let Some(path) =
                    rfd::FileDialog::new().add_filter("PDF", &["pdf"]).set_title("Attach PDF").pick_file()
                {
                    self.toasts.info("Uploading PDF…");
                    self.task_manager.attach_pdf(document_id, path);
                }
            }
            ContentAction::Process => self.process_selected(),
        }
    }

    fn process_selected(&mut self) {
        let Some(doc) = self.content.document() else {
            return;
        };
        if !(doc.has_content() || doc.has_pdf()) {
            self.toasts.error("Add some content to the document before processing it");
            return;
        }

        let document_id = doc.id.clone();
        info!("Requesting processing of {}", document_id);
        self.content.process_requested(&document_id);
        self.task_manager.process_document(document_id);
    }

    fn handle_modal_action(&mut self, action: ModalAction) {
        match action {
            ModalAction::CreateSubject(name) => self.task_manager.create_subject(name),
            ModalAction::CreateDocument(request) => self.task_manager.create_document(request),
            ModalAction::RenameDocument { document_id, title } => {
                self.task_manager.rename_document(document_id, title);
            }
            ModalAction::Delete(DeleteTarget::Subject { id, .. }) => {
                self.task_manager.delete_subject(id);
            }
            ModalAction::Delete(DeleteTarget::Document { id, .. }) => {
                self.task_manager.delete_document(id);
            }
        }
    }

    fn handle_task_result(&mut self, result: TaskResult) {
        if let Some(error) = result.error() {
            if error.unauthorized && self.screen == Screen::Dashboard {
                warn!("Backend rejected the session during {}", result.task_type());
                self.end_session();
                self.toasts.error("Your session has expired. Please sign in again.");
                return;
            }
        }

        match result {
            TaskResult::TokenChecked(check) => self.on_token_checked(check),
            TaskResult::Authenticated { signup, result } => self.on_authenticated(signup, result),

            other if self.screen != Screen::Dashboard => {
                debug!("Dropping {} result outside the dashboard", other.task_type());
            }

            TaskResult::SubjectsLoaded(result) => {
                self.subjects_loading = false;
                match result {
                    Ok(subjects) => self.tree.set_subjects(subjects),
                    Err(e) => self.toasts.error(format!("Failed to load subjects: {}", e)),
                }
            }
            TaskResult::SubjectCreated(result) => match result {
                Ok(subject) => {
                    self.toasts.success(format!("Subject \"{}\" created", subject.name));
                    self.tree.add_subject(subject);
                }
                Err(e) => self.toasts.error(format!("Failed to create subject: {}", e)),
            },
            TaskResult::SubjectDeleted { subject_id, result } => match result {
                Ok(()) => {
                    for document_id in self.tree.remove_subject(&subject_id) {
                        self.forget_document(&document_id);
                    }
                    self.toasts.success("Subject deleted");
                }
                Err(e) => self.toasts.error(format!("Failed to delete subject: {}", e)),
            },

            TaskResult::DocumentsLoaded { subject_id, result } => match result {
                Ok(documents) => self.tree.documents_loaded(&subject_id, documents),
                Err(e) => {
                    self.tree.documents_failed(&subject_id);
                    self.toasts.error(format!("Failed to load documents: {}", e));
                }
            },
            TaskResult::DocumentCreated(result) => match result {
                Ok(doc) => {
                    self.toasts.success(format!("\"{}\" added", doc.display_title()));
                    if let Some(subject_id) = doc.subject_id.clone() {
                        if self.tree.add_document(&subject_id, doc.clone()) {
                            self.task_manager.load_documents(subject_id);
                        }
                    }
                    self.content.set_mode(Mode::Source);
                    self.content.select(&doc.id);
                    self.content.apply_update(doc);
                }
                Err(e) => self.toasts.error(format!("Failed to create document: {}", e)),
            },
            TaskResult::DocumentOpened { document_id, result } => match result {
                Ok(doc) => {
                    self.tree.update_document(&doc);
                    self.content.apply_update(doc);
                }
                Err(e) => {
                    if self.content.selected_id() == Some(document_id.as_str()) {
                        self.content.clear_selection();
                    }
                    self.toasts.error(format!("Failed to open document: {}", e));
                }
            },
            TaskResult::DocumentSaved(result) => match result {
                Ok(doc) => {
                    self.tree.update_document(&doc);
                    self.content.saved(doc);
                    self.toasts.success("Document saved");
                }
                Err(e) => self.toasts.error(format!("Failed to save document: {}", e)),
            },
            TaskResult::DocumentRenamed(result) => match result {
                Ok(doc) => {
                    self.tree.update_document(&doc);
                    self.content.renamed(doc);
                    self.toasts.success("Document renamed");
                }
                Err(e) => self.toasts.error(format!("Failed to rename document: {}", e)),
            },
            TaskResult::DocumentDeleted { document_id, result } => match result {
                Ok(()) => {
                    self.tree.remove_document(&document_id);
                    self.forget_document(&document_id);
                    self.toasts.success("Document deleted");
                }
                Err(e) => self.toasts.error(format!("Failed to delete document: {}", e)),
            },
            TaskResult::PdfAttached { document_id, result } => match result {
                Ok(doc) => {
                    self.tree.update_document(&doc);
                    self.content.apply_update(doc);
                    self.toasts.success("PDF attached");
                }
                Err(e) => {
                    warn!("Attaching a PDF to {} failed: {}", document_id, e);
                    self.toasts.error(format!("Failed to attach PDF: {}", e));
                }
            },

            TaskResult::ProcessRequested { document_id, result } => match result {
                Ok(()) => {
                    self.content.process_started(&document_id, true);
                    self.task_manager.start_polling(document_id);
                    self.toasts.info("Processing started. This can take a few minutes.");
                }
                Err(e) => {
                    self.content.process_started(&document_id, false);
                    self.toasts.error(format!("Failed to start processing: {}", e));
                }
            },
            TaskResult::PollUpdate(doc) => {
                self.tree.update_document(&doc);
                self.content.apply_update(doc);
            }
            TaskResult::PollFinished { document_id, end } => {
                self.content.poll_finished(&document_id);
                match end {
                    PollEnd::Completed => {
                        let title = self.document_title(&document_id);
                        self.toasts.success(format!("\"{}\" finished processing", title));
                    }
                    PollEnd::TimedOut => self.toasts.error(
                        "Processing is taking longer than expected. Check back later.",
                    ),
                    PollEnd::Failed(e) => {
                        self.toasts.error(format!("Lost track of processing: {}", e))
                    }
                    PollEnd::Cancelled => {}
                }
            }
        }
    }

    fn on_token_checked(&mut self, check: TokenCheck) {
        self.overlay.clear_message();
        match check {
            TokenCheck::Valid => info!("Stored session is valid"),
            TokenCheck::Rejected => {
                info!("Stored session was rejected");
                self.session.teardown();
            }
            TokenCheck::Unreachable(reason) => {
                warn!("Could not validate the stored session: {}", reason);
                self.toasts.info("Could not reach the server. Some actions may fail.");
            }
        }
        self.screen = Screen::Auth;
        self.navigate(Route::Dashboard);
    }

    fn on_authenticated(&mut self, signup: bool, result: TaskOutcome<AuthResponse>) {
        self.auth.pending = false;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                self.auth.error = Some(e.message);
                return;
            }
        };

        match response.token {
            Some(token) => match self.session.establish(token) {
                Ok(()) => {
                    self.auth.reset();
                    self.toasts.success(if signup { "Account created" } else { "Welcome back" });
                    self.navigate(Route::Dashboard);
                }
                Err(e) => self.auth.error = Some(e.to_string()),
            },
            None if signup => {
                let notice = match response.message.trim() {
                    "" => "Account created. Please sign in.".to_string(),
                    message => format!("{}. Please sign in.", message.trim_end_matches('.')),
                };
                self.auth.switch_to_sign_in(notice);
            }
            None => {
                self.auth.error = Some("The server did not return a session token".to_string());
            }
        }
    }

    /// Drops everything the dashboard holds for a document that no longer exists.
    fn forget_document(&mut self, document_id: &str) {
        self.task_manager.cancel_poll(document_id);
        self.content.document_deleted(document_id);
        self.progress.remove(document_id);
    }
}
