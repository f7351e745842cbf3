use std::{
    collections::HashMap,
    future::Future,
    path::PathBuf,
    sync::{
        mpsc,
        Arc,
    },
};

use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;
use tracing::{
    debug,
    info,
};

use super::{
    handle::TaskHandle,
    types::{
        PollEnd,
        TaskError,
    },
    TaskResult,
};
use crate::{
    backend::{
        DocumentUpdate,
        LoginRequest,
        NewDocument,
        NewSubject,
        PdfUpload,
        SignupRequest,
        StudyApi,
    },
    core::{
        poller::{
            poll_until_terminal,
            PollOutcome,
            PollSettings,
        },
        routing::TokenCheck,
        MindmateError,
    },
};

pub type Waker = Arc<dyn Fn() + Send + Sync>;

/// Runs backend calls off the UI thread and hands their results back through a channel
/// drained once per frame.
pub struct TaskManager {
    runtime: Arc<Runtime>,
    receiver: mpsc::Receiver<TaskResult>,
    sender: mpsc::Sender<TaskResult>,
    api: Arc<dyn StudyApi>,
    poll_settings: PollSettings,
    polls: HashMap<String, TaskHandle>,
    waker: Option<Waker>,
}

impl TaskManager {
    pub fn new(api: Arc<dyn StudyApi>, poll_settings: PollSettings) -> Result<Self, MindmateError> {
        let runtime = Arc::new(Runtime::new()?);
        let (sender, receiver) = mpsc::channel();

        Ok(Self {
            runtime,
            receiver,
            sender,
            api,
            poll_settings,
            polls: HashMap::new(),
            waker: None,
        })
    }

    /// Called after every result is queued, so the UI can repaint.
    pub fn with_waker(mut self, waker: Waker) -> Self {
        self.waker = Some(waker);
        self
    }

    pub fn poll_results(&mut self) -> Vec<TaskResult> {
        let mut results = Vec::new();

        while let Ok(result) = self.receiver.try_recv() {
            results.push(result);
        }

        self.polls.retain(|_, handle| !handle.is_finished());

        results
    }

    fn task_context(&self) -> (mpsc::Sender<TaskResult>, Arc<dyn StudyApi>, Option<Waker>) {
        (self.sender.clone(), self.api.clone(), self.waker.clone())
    }

    fn spawn<F, Fut>(&self, task: F)
    where
        F: FnOnce(Arc<dyn StudyApi>) -> Fut,
        Fut: Future<Output = TaskResult> + Send + 'static,
    {
        let (sender, api, waker) = self.task_context();
        let fut = task(api);

        self.runtime.spawn(async move {
            let result = fut.await;
            debug!("Task finished: {}", result.task_type());
            let _ = sender.send(result);
            if let Some(waker) = waker {
                waker();
            }
        });
    }

    pub fn check_token(&self) {
        self.spawn(|api| async move {
            let check = match api.validate_token().await {
                Ok(true) => TokenCheck::Valid,
                Ok(false) => TokenCheck::Rejected,
                Err(e) => TokenCheck::Unreachable(e.to_string()),
            };
            TaskResult::TokenChecked(check)
        });
    }

    pub fn login(&self, request: LoginRequest) {
        self.spawn(|api| async move {
            let result = api.login(&request).await.map_err(TaskError::from);
            TaskResult::Authenticated { signup: false, result }
        });
    }

    pub fn signup(&self, request: SignupRequest) {
        self.spawn(|api| async move {
            let result = api.signup(&request).await.map_err(TaskError::from);
            TaskResult::Authenticated { signup: true, result }
        });
    }

    pub fn load_subjects(&self) {
        self.spawn(|api| async move {
            TaskResult::SubjectsLoaded(api.list_subjects().await.map_err(TaskError::from))
        });
    }

    pub fn create_subject(&self, name: String) {
        self.spawn(|api| async move {
            let request = NewSubject { name };
            TaskResult::SubjectCreated(api.create_subject(&request).await.map_err(TaskError::from))
        });
    }

    pub fn delete_subject(&self, subject_id: String) {
        self.spawn(|api| async move {
            let result = api.delete_subject(&subject_id).await.map_err(TaskError::from);
            TaskResult::SubjectDeleted { subject_id, result }
        });
    }

    pub fn load_documents(&self, subject_id: String) {
        self.spawn(|api| async move {
            let result = api.list_documents(&subject_id).await.map_err(TaskError::from);
            TaskResult::DocumentsLoaded { subject_id, result }
        });
    }

    pub fn create_document(&self, request: NewDocument) {
        self.spawn(|api| async move {
            let result = api
                .create_document(&request)
                .await
                .map(|mut doc| {
                    // Some backends omit the subject on create; the request knows it.
                    doc.subject_id.get_or_insert(request.subject_id.clone());
                    doc
                })
                .map_err(TaskError::from);
            TaskResult::DocumentCreated(result)
        });
    }

    pub fn open_document(&self, document_id: String) {
        self.spawn(|api| async move {
            let result = api.get_document(&document_id).await.map_err(TaskError::from);
            TaskResult::DocumentOpened { document_id, result }
        });
    }

    /// Saves the editor's draft.
    pub fn save_document(&self, document_id: String, update: DocumentUpdate) {
        self.spawn(|api| async move {
            TaskResult::DocumentSaved(
                api.update_document(&document_id, &update).await.map_err(TaskError::from),
            )
        });
    }

    /// Renames from the sidebar; reported separately so an open editor keeps its draft.
    pub fn rename_document(&self, document_id: String, title: String) {
        self.spawn(|api| async move {
            let update = DocumentUpdate { title: Some(title), content: None };
            TaskResult::DocumentRenamed(
                api.update_document(&document_id, &update).await.map_err(TaskError::from),
            )
        });
    }

    pub fn delete_document(&self, document_id: String) {
        self.spawn(|api| async move {
            let result = api.delete_document(&document_id).await.map_err(TaskError::from);
            TaskResult::DocumentDeleted { document_id, result }
        });
    }

    /// Reads the PDF at `path` and uploads it to the document.
    pub fn attach_pdf(&self, document_id: String, path: PathBuf) {
        self.spawn(|api| async move {
            let result = match tokio::fs::read(&path).await {
                Ok(bytes) => {
                    let file_name = path
                        .file_name()
                        .and_then(|name| name.to_str())
                        .unwrap_or("document.pdf")
                        .to_string();
                    info!("Uploading {} ({} bytes) to {}", file_name, bytes.len(), document_id);
                    api.attach_pdf(&document_id, PdfUpload { file_name, bytes }).await
                }
                Err(e) => Err(MindmateError::from(e)),
            }
            .map_err(TaskError::from);
            TaskResult::PdfAttached { document_id, result }
        });
    }

    pub fn process_document(&self, document_id: String) {
        self.spawn(|api| async move {
            let result = api.process_document(&document_id).await.map_err(TaskError::from);
            TaskResult::ProcessRequested { document_id, result }
        });
    }

    /// Starts polling `document_id` until it settles. An existing poll for the same
    /// document is replaced.
    pub fn start_polling(&mut self, document_id: String) {
        self.cancel_poll(&document_id);

        let (sender, api, waker) = self.task_context();
        let settings = self.poll_settings;
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();
        let id = document_id.clone();

        info!("Polling status of {} every {:?}", document_id, settings.interval);
        let join_handle = self.runtime.spawn(async move {
            let update_sender = sender.clone();
            let update_waker = waker.clone();
            let outcome = poll_until_terminal(api.as_ref(), &id, settings, task_cancel, |doc| {
                let _ = update_sender.send(TaskResult::PollUpdate(doc.clone()));
                if let Some(waker) = &update_waker {
                    waker();
                }
            })
            .await;

            let end = match outcome {
                PollOutcome::Completed(_) => PollEnd::Completed,
                PollOutcome::TimedOut => PollEnd::TimedOut,
                PollOutcome::Failed(e) => PollEnd::Failed(TaskError::from(e)),
                PollOutcome::Cancelled => PollEnd::Cancelled,
            };
            let _ = sender.send(TaskResult::PollFinished { document_id: id, end });
            if let Some(waker) = waker {
                waker();
            }
        });

        self.polls.insert(document_id, TaskHandle::new(cancel, join_handle));
    }

    pub fn cancel_poll(&mut self, document_id: &str) {
        if let Some(handle) = self.polls.remove(document_id) {
            debug!("Cancelling poll for {}", document_id);
            handle.cancel();
        }
    }

    pub fn cancel_all_polls(&mut self) {
        if !self.polls.is_empty() {
            info!("Cancelling {} status poll(s)", self.polls.len());
        }
        for (_, handle) in self.polls.drain() {
            handle.cancel();
        }
    }

    pub fn has_active_polls(&self) -> bool {
        self.polls.values().any(|handle| !handle.is_finished())
    }
}

impl Drop for TaskManager {
    fn drop(&mut self) {
        self.cancel_all_polls();
    }
}
