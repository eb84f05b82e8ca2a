//! The workspace controller.
//!
//! Owns every store, exposes typed actions plus snapshot selectors, and
//! emits [`WorkspaceEvent`]s on a broadcast channel. All mutation flows
//! through here; out-of-order network responses are handled by request
//! generations, not locks.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use atrium_client::{ApiClient, Language};

use crate::models::{ChatStatus, ChatStore, HistoryStore, Message, ProjectRef};
use crate::services::backend::ChatBackend;
use crate::services::count_poller::{CountPoller, CountSync};
use crate::services::exchange::{ExchangeOutcome, run_exchange};
use crate::services::generation::Generation;

use super::events::WorkspaceEvent;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Tuning knobs for the synchronization layer.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// How often the chat-count poller reconciles with the backend. Also
    /// the upper bound on how long an optimistic count can diverge from
    /// server truth.
    pub poll_interval: Duration,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
        }
    }
}

struct Inner {
    chat: RwLock<ChatStore>,
    history: RwLock<HistoryStore>,
    history_generation: Generation,
    language: RwLock<Language>,
    exchange_in_flight: AtomicBool,
    sync: Arc<CountSync>,
    events: broadcast::Sender<WorkspaceEvent>,
}

/// The client-side session: one active project, one active chat, a visible
/// transcript, and the sync machinery keeping them honest.
///
/// Must be created inside a tokio runtime — construction spawns the count
/// poller, which is aborted again when the workspace drops.
pub struct Workspace {
    inner: Arc<Inner>,
    poller: Mutex<Option<CountPoller>>,
}

impl Workspace {
    pub fn new(backend: Arc<dyn ChatBackend>, options: SyncOptions) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let sync = Arc::new(CountSync::new(backend, events.clone()));
        let poller = CountPoller::spawn(sync.clone(), options.poll_interval);

        Self {
            inner: Arc::new(Inner {
                chat: RwLock::new(ChatStore::new()),
                history: RwLock::new(HistoryStore::new()),
                history_generation: Generation::new(),
                language: RwLock::new(Language::default()),
                exchange_in_flight: AtomicBool::new(false),
                sync,
                events,
            }),
            poller: Mutex::new(Some(poller)),
        }
    }

    pub fn with_client(client: ApiClient, options: SyncOptions) -> Self {
        Self::new(Arc::new(client), options)
    }

    /// Subscribe to workspace events. Slow subscribers may observe
    /// `Lagged`; snapshots are always available through the selectors.
    pub fn subscribe(&self) -> broadcast::Receiver<WorkspaceEvent> {
        self.inner.events.subscribe()
    }

    // ---- project -----------------------------------------------------

    /// Activate a project. Invalidates the history and count caches and
    /// refetches both; in-flight responses for the previous project are
    /// superseded.
    pub async fn select_project(&self, reference: impl Into<ProjectRef>) {
        let name = reference.into().resolve_name();
        info!(project = %name, "Project selected");

        self.inner.sync.generation.bump();
        self.inner.history_generation.bump();
        *self.inner.sync.project.write() = Some(name.clone());
        self.inner.history.write().clear();
        self.inner.sync.counts.write().clear();
        let _ = self
            .inner
            .events
            .send(WorkspaceEvent::ProjectSelected { name });

        self.inner.sync.refresh().await;
        self.ensure_history().await;
    }

    /// Resolved name of the active project, or the `"default"` fallback.
    pub fn project_name(&self) -> String {
        match self.inner.sync.project.read().clone() {
            Some(name) => name,
            None => ProjectRef::Title(String::new()).resolve_name(),
        }
    }

    pub fn active_project(&self) -> Option<String> {
        self.inner.sync.project.read().clone()
    }

    // ---- chat identity -----------------------------------------------

    /// Begin a fresh conversation: increments the chat id, clears the
    /// transcript and history cache, and registers a zero count entry for
    /// the new chat. Counts are not cleared.
    pub fn start_new_chat(&self) -> u32 {
        let chat_id = self.inner.chat.write().start_new_chat();
        self.inner.history_generation.bump();
        self.inner.history.write().clear();
        self.inner.sync.counts.write().append_new_chat();

        debug!(chat_id, "New chat started");
        let _ = self.inner.events.send(WorkspaceEvent::ChatReset { chat_id });
        let _ = self.inner.events.send(WorkspaceEvent::CountsUpdated);
        chat_id
    }

    /// Jump to a historical chat (1-based id = count index + 1) and
    /// hydrate its transcript.
    pub async fn select_chat(&self, index: usize) {
        let chat_id = (index + 1) as u32;
        self.inner.chat.write().set_chat_id(chat_id);
        self.inner.history_generation.bump();
        self.inner.history.write().clear();
        self.ensure_history().await;
    }

    // ---- history -----------------------------------------------------

    /// Fetch history for the active (chat, project) pair unless it has
    /// already been fetched — even an empty or failed fetch arms the
    /// guard, so a chat with zero history is fetched exactly once.
    pub async fn ensure_history(&self) {
        if self.inner.history.read().has_fetched() {
            return;
        }

        let chat_id = self.inner.chat.read().chat_id();
        let project = self.project_name();
        let generation = self.inner.history_generation.begin();
        self.inner.history.write().begin_fetch();
        debug!(chat_id, project = %project, "Fetching chat history");

        let result = self.inner.sync.backend.fetch_history(chat_id, &project).await;

        if !self.inner.history_generation.is_current(generation) {
            debug!(chat_id, "Stale history response dropped");
            return;
        }

        match result {
            Ok(entries) => {
                let messages = {
                    let mut history = self.inner.history.write();
                    history.apply_success(chat_id, &project, entries);
                    history.messages().to_vec()
                };
                let message_count = messages.len();
                if !messages.is_empty() {
                    self.inner.chat.write().set_messages(messages);
                }
                let _ = self.inner.events.send(WorkspaceEvent::HistoryLoaded {
                    chat_id,
                    message_count,
                });
            }
            Err(e) => {
                warn!(chat_id, project = %project, error = %e, "Failed to fetch chat history");
                self.inner.history.write().apply_failure(e.to_string());
            }
        }
    }

    // ---- message exchange --------------------------------------------

    /// Run one exchange: append the user message, call the inference
    /// endpoint, append the reply (or an error bubble — this never fails).
    ///
    /// Returns false when the input is empty/whitespace or another
    /// exchange is in flight; both are silently ignored, not queued.
    pub async fn submit(&self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        if self.inner.exchange_in_flight.swap(true, Ordering::SeqCst) {
            debug!("Exchange already in flight, submit ignored");
            return false;
        }

        let (chat_id, language) = {
            let mut chat = self.inner.chat.write();
            chat.push_message(Message::user(text));
            chat.mark_loading();
            (chat.chat_id(), *self.inner.language.read())
        };
        let project = self.project_name();
        let _ = self
            .inner
            .events
            .send(WorkspaceEvent::MessagesAppended { chat_id });

        let outcome =
            run_exchange(self.inner.sync.backend.as_ref(), language, text, chat_id, &project).await;

        let status = match outcome {
            ExchangeOutcome::Reply(reply) => {
                let mut chat = self.inner.chat.write();
                chat.push_message(Message::ai(reply));
                chat.mark_completed();
                ChatStatus::Completed
            }
            ExchangeOutcome::Failure { bubble, error } => {
                let mut chat = self.inner.chat.write();
                chat.push_message(Message::ai(bubble));
                chat.mark_failed(error);
                ChatStatus::Failed
            }
        };

        let _ = self
            .inner
            .events
            .send(WorkspaceEvent::MessagesAppended { chat_id });
        let _ = self
            .inner
            .events
            .send(WorkspaceEvent::StatusChanged { status: status.clone() });

        if status == ChatStatus::Completed {
            // Optimistic bump for the active slot; the next poll overwrites
            // it with server truth.
            self.inner.sync.counts.write().increment(chat_id as usize - 1);
            let _ = self.inner.events.send(WorkspaceEvent::CountsUpdated);
        }

        self.inner.exchange_in_flight.store(false, Ordering::SeqCst);
        true
    }

    // ---- counts ------------------------------------------------------

    /// Manual count refresh (same semantics as the initial project fetch).
    pub async fn refresh_counts(&self) {
        self.inner.sync.refresh().await;
    }

    // ---- selectors ---------------------------------------------------

    pub fn chat_id(&self) -> u32 {
        self.inner.chat.read().chat_id()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.inner.chat.read().messages().to_vec()
    }

    pub fn status(&self) -> ChatStatus {
        self.inner.chat.read().status().clone()
    }

    pub fn last_error(&self) -> Option<String> {
        self.inner.chat.read().error().map(String::from)
    }

    pub fn reset_flag(&self) -> bool {
        self.inner.chat.read().reset_flag()
    }

    pub fn counts(&self) -> Vec<u64> {
        self.inner.sync.counts.read().counts().to_vec()
    }

    pub fn has_fetched_history(&self) -> bool {
        self.inner.history.read().has_fetched()
    }

    pub fn language(&self) -> Language {
        *self.inner.language.read()
    }

    pub fn set_language(&self, language: Language) {
        *self.inner.language.write() = language;
    }

    /// Stop the poller and drop cached history (component teardown).
    pub fn shutdown(&self) {
        self.poller.lock().take();
        self.inner.history.write().clear();
        debug!("Workspace shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::backend::BoxFuture;
    use atrium_client::{ApiResult, HistoryEntry};
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    #[derive(Clone, Default)]
    struct TestBackend {
        history: Arc<parking_lot::Mutex<Vec<HistoryEntry>>>,
        counts: Arc<parking_lot::Mutex<Vec<u64>>>,
        reply: Arc<parking_lot::Mutex<String>>,
        history_calls: Arc<AtomicUsize>,
        query_calls: Arc<AtomicUsize>,
        history_gate: Arc<parking_lot::Mutex<Option<Arc<Notify>>>>,
        query_gate: Arc<parking_lot::Mutex<Option<Arc<Notify>>>>,
    }

    impl TestBackend {
        fn with_history(entries: Vec<(&str, &str)>) -> Self {
            let backend = Self::default();
            *backend.history.lock() = entries
                .into_iter()
                .map(|(question, reply)| HistoryEntry {
                    question: question.to_string(),
                    reply: reply.to_string(),
                    timestamp: None,
                })
                .collect();
            backend
        }
    }

    impl ChatBackend for TestBackend {
        fn fetch_history(
            &self,
            _chat_id: u32,
            _project_name: &str,
        ) -> BoxFuture<'static, ApiResult<Vec<HistoryEntry>>> {
            self.history_calls.fetch_add(1, Ordering::SeqCst);
            let entries = self.history.lock().clone();
            let gate = self.history_gate.lock().clone();
            Box::pin(async move {
                if let Some(gate) = gate {
                    gate.notified().await;
                }
                Ok(entries)
            })
        }

        fn fetch_counts(&self, _project_name: &str) -> BoxFuture<'static, ApiResult<Vec<u64>>> {
            let counts = self.counts.lock().clone();
            Box::pin(async move { Ok(counts) })
        }

        fn send_query(
            &self,
            _language: Language,
            _query: &str,
            _chat_id: u32,
            _project_name: &str,
        ) -> BoxFuture<'static, ApiResult<String>> {
            self.query_calls.fetch_add(1, Ordering::SeqCst);
            let reply = self.reply.lock().clone();
            let gate = self.query_gate.lock().clone();
            Box::pin(async move {
                if let Some(gate) = gate {
                    gate.notified().await;
                }
                Ok(reply)
            })
        }
    }

    fn workspace_for(backend: TestBackend) -> Workspace {
        Workspace::new(Arc::new(backend), SyncOptions::default())
    }

    #[tokio::test]
    async fn test_start_new_chat_increments_id_and_clears_messages() {
        let backend = TestBackend::default();
        *backend.reply.lock() = "hello".to_string();
        let workspace = workspace_for(backend);

        workspace.submit("hi").await;
        assert_eq!(workspace.messages().len(), 2);

        let previous = workspace.chat_id();
        let chat_id = workspace.start_new_chat();

        assert_eq!(chat_id, previous + 1);
        assert!(workspace.messages().is_empty());
        assert!(!workspace.has_fetched_history());
    }

    #[tokio::test]
    async fn test_zero_history_fetches_exactly_once() {
        let backend = TestBackend::default();
        let workspace = workspace_for(backend.clone());
        workspace.select_project("Alpha").await;

        let calls = backend.history_calls.load(Ordering::SeqCst);
        assert!(workspace.has_fetched_history());

        // chat_id/projectName unchanged: no further fetch.
        workspace.ensure_history().await;
        workspace.ensure_history().await;
        assert_eq!(backend.history_calls.load(Ordering::SeqCst), calls);
    }

    #[tokio::test]
    async fn test_history_hydrates_transcript_in_order() {
        let backend = TestBackend::with_history(vec![("hi", "hello")]);
        let workspace = workspace_for(backend);
        workspace.select_project("Alpha").await;

        let messages = workspace.messages();
        assert_eq!(messages, vec![Message::user("hi"), Message::ai("hello")]);
    }

    #[tokio::test]
    async fn test_empty_submit_appends_nothing_and_calls_nothing() {
        let backend = TestBackend::default();
        let workspace = workspace_for(backend.clone());

        assert!(!workspace.submit("").await);
        assert!(!workspace.submit("   \t").await);

        assert!(workspace.messages().is_empty());
        assert_eq!(backend.query_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_submit_while_in_flight_is_ignored() {
        let backend = TestBackend::default();
        *backend.reply.lock() = "slow reply".to_string();
        let gate = Arc::new(Notify::new());
        *backend.query_gate.lock() = Some(gate.clone());

        let workspace = Arc::new(workspace_for(backend.clone()));
        let first = tokio::spawn({
            let workspace = workspace.clone();
            async move { workspace.submit("first").await }
        });
        for _ in 0..16 {
            tokio::task::yield_now().await;
        }

        let len_before = workspace.messages().len();
        assert!(!workspace.submit("second").await);
        assert_eq!(workspace.messages().len(), len_before);

        gate.notify_one();
        assert!(first.await.unwrap());
        assert_eq!(backend.query_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_completed_exchange_increments_active_count() {
        let backend = TestBackend::default();
        *backend.counts.lock() = vec![2, 0];
        *backend.reply.lock() = "done".to_string();
        let workspace = workspace_for(backend);
        workspace.select_project("Alpha").await;
        workspace.select_chat(1).await;

        workspace.submit("finish it").await;

        assert_eq!(workspace.status(), ChatStatus::Completed);
        assert_eq!(workspace.counts(), vec![2, 1]);

        // A poll overwrites the optimistic value with server truth,
        // whatever it says.
        workspace.refresh_counts().await;
        assert_eq!(workspace.counts(), vec![2, 0]);
    }

    #[tokio::test]
    async fn test_empty_reply_falls_back_to_literal_bubble() {
        let backend = TestBackend::default();
        let workspace = workspace_for(backend.clone());

        // An Ok("") reply means the endpoint answered with nothing.
        assert!(workspace.submit("anyone there?").await);
        let messages = workspace.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].text, "No response received");
        assert_eq!(workspace.status(), ChatStatus::Completed);
    }

    #[tokio::test]
    async fn test_stale_history_response_is_dropped() {
        let backend = TestBackend::with_history(vec![("old question", "old reply")]);
        let gate = Arc::new(Notify::new());
        *backend.history_gate.lock() = Some(gate.clone());

        let workspace = Arc::new(workspace_for(backend));
        let in_flight = tokio::spawn({
            let workspace = workspace.clone();
            async move { workspace.ensure_history().await }
        });
        for _ in 0..16 {
            tokio::task::yield_now().await;
        }

        // The user resets before the fetch lands.
        workspace.start_new_chat();
        gate.notify_one();
        in_flight.await.unwrap();

        // The stale transcript never surfaces.
        assert!(workspace.messages().is_empty());
        assert!(!workspace.has_fetched_history());
    }

    #[tokio::test]
    async fn test_select_chat_refetches_history() {
        let backend = TestBackend::with_history(vec![("q1", "a1")]);
        let workspace = workspace_for(backend.clone());
        workspace.select_project("Alpha").await;
        let calls = backend.history_calls.load(Ordering::SeqCst);

        workspace.select_chat(3).await;

        assert_eq!(workspace.chat_id(), 4);
        assert_eq!(backend.history_calls.load(Ordering::SeqCst), calls + 1);
    }

    #[tokio::test]
    async fn test_new_chat_appends_zero_count() {
        let backend = TestBackend::default();
        *backend.counts.lock() = vec![2, 5];
        let workspace = workspace_for(backend);
        workspace.select_project("Alpha").await;
        assert_eq!(workspace.counts(), vec![2, 5]);

        workspace.start_new_chat();
        assert_eq!(workspace.counts(), vec![2, 5, 0]);
    }

    #[tokio::test]
    async fn test_reset_flag_toggles_on_new_chat_only() {
        let backend = TestBackend::default();
        let workspace = workspace_for(backend);
        assert!(!workspace.reset_flag());

        workspace.start_new_chat();
        assert!(workspace.reset_flag());

        workspace.select_chat(0).await;
        assert!(workspace.reset_flag());
    }
}
