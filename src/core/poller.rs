//! Fixed-interval polling of a document's processing status.

use std::time::Duration;

use tokio::time::{
    sleep,
    Instant,
};
use tokio_util::sync::CancellationToken;
use tracing::{
    debug,
    info,
    warn,
};

use crate::{
    backend::StudyApi,
    core::{
        config::AppConfig,
        Document,
        MindmateError,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub timeout: Duration,
}

impl From<&AppConfig> for PollSettings {
    fn from(config: &AppConfig) -> Self {
        Self { interval: config.poll_interval, timeout: config.poll_timeout }
    }
}

#[derive(Debug)]
pub enum PollOutcome {
    /// All three statuses reached completed or failed.
    Completed(Document),
    TimedOut,
    /// A fetch failed; the loop stops and the last known state is kept.
    Failed(MindmateError),
    Cancelled,
}

/// Fetches `document_id` every `settings.interval` until every status is terminal, the
/// timeout elapses, a fetch fails or `cancel` fires. Each fetched document is handed to
/// `on_update` before the terminal check.
pub async fn poll_until_terminal<F>(
    api: &dyn StudyApi,
    document_id: &str,
    settings: PollSettings,
    cancel: CancellationToken,
    mut on_update: F,
) -> PollOutcome
where
    F: FnMut(&Document) + Send,
{
    let started = Instant::now();
    let mut attempts: u32 = 0;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return PollOutcome::Cancelled,
            _ = sleep(settings.interval) => {}
        }

        if started.elapsed() >= settings.timeout {
            warn!("Polling {} timed out after {} attempts", document_id, attempts);
            return PollOutcome::TimedOut;
        }

        attempts += 1;
        let fetched = tokio::select! {
            biased;
            _ = cancel.cancelled() => return PollOutcome::Cancelled,
            result = api.get_document(document_id) => result,
        };

        match fetched {
            Ok(document) => {
                debug!(
                    "Poll #{} for {}: summary={:?} flashcards={:?} mcqs={:?}",
                    attempts,
                    document_id,
                    document.summary_status,
                    document.flashcards_status,
                    document.mcqs_status
                );
                on_update(&document);
                if document.all_terminal() {
                    info!("Processing of {} finished after {} polls", document_id, attempts);
                    return PollOutcome::Completed(document);
                }
            }
            Err(e) => {
                warn!("Polling {} failed: {}", document_id, e);
                return PollOutcome::Failed(e);
            }
        }
    }
}
