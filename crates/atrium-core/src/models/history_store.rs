use atrium_client::HistoryEntry;

use super::message::Message;

/// Cached server-side history for one (chat, project) pair.
///
/// `has_fetched` is set after the first fetch completes — success or
/// failure, empty or not. It exists specifically to stop refetch loops when
/// a chat legitimately has zero history; only [`HistoryStore::clear`]
/// resets it.
pub struct HistoryStore {
    entries: Vec<HistoryEntry>,
    messages: Vec<Message>,
    loading: bool,
    error: Option<String>,
    has_fetched: bool,
    current_chat_id: Option<u32>,
    current_project: Option<String>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            messages: Vec::new(),
            loading: false,
            error: None,
            has_fetched: false,
            current_chat_id: None,
            current_project: None,
        }
    }

    /// Flatten server entries into the transcript shape: each entry emits
    /// its question as a user message, then its reply as an ai message, in
    /// server order.
    pub fn messages_from_entries(entries: &[HistoryEntry]) -> Vec<Message> {
        let mut messages = Vec::with_capacity(entries.len() * 2);
        for entry in entries {
            messages.push(Message::user(entry.question.clone()));
            messages.push(Message::ai(entry.reply.clone()));
        }
        messages
    }

    pub fn begin_fetch(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn apply_success(&mut self, chat_id: u32, project: &str, entries: Vec<HistoryEntry>) {
        self.messages = Self::messages_from_entries(&entries);
        self.entries = entries;
        self.current_chat_id = Some(chat_id);
        self.current_project = Some(project.to_string());
        self.loading = false;
        self.has_fetched = true;
    }

    /// A failed fetch still counts as fetched, to the same
    /// stop-the-refetch-loop effect.
    pub fn apply_failure(&mut self, error: impl Into<String>) {
        self.loading = false;
        self.error = Some(error.into());
        self.has_fetched = true;
    }

    /// Drop cached entries and re-arm fetching. Must run on session reset
    /// and teardown, otherwise stale messages from a previous chat can show
    /// transiently.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.messages.clear();
        self.has_fetched = false;
        self.error = None;
        self.loading = false;
        self.current_chat_id = None;
        self.current_project = None;
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn has_fetched(&self) -> bool {
        self.has_fetched
    }

    pub fn current_chat_id(&self) -> Option<u32> {
        self.current_chat_id
    }

    pub fn current_project(&self) -> Option<&str> {
        self.current_project.as_deref()
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::message::Sender;

    fn entry(question: &str, reply: &str) -> HistoryEntry {
        HistoryEntry {
            question: question.to_string(),
            reply: reply.to_string(),
            timestamp: None,
        }
    }

    #[test]
    fn test_transform_doubles_entries_alternating_user_first() {
        let entries = vec![entry("hi", "hello"), entry("how?", "like this")];
        let messages = HistoryStore::messages_from_entries(&entries);

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0], Message::user("hi"));
        assert_eq!(messages[1], Message::ai("hello"));
        assert_eq!(messages[2], Message::user("how?"));
        assert_eq!(messages[3], Message::ai("like this"));
        for (i, message) in messages.iter().enumerate() {
            let expected = if i % 2 == 0 { Sender::User } else { Sender::Ai };
            assert_eq!(message.sender, expected);
        }
    }

    #[test]
    fn test_empty_history_still_counts_as_fetched() {
        let mut store = HistoryStore::new();
        store.begin_fetch();
        store.apply_success(1, "Alpha", Vec::new());

        assert!(store.has_fetched());
        assert!(store.messages().is_empty());
        assert!(!store.loading());
    }

    #[test]
    fn test_failed_fetch_counts_as_fetched() {
        let mut store = HistoryStore::new();
        store.begin_fetch();
        store.apply_failure("connection refused");

        assert!(store.has_fetched());
        assert_eq!(store.error(), Some("connection refused"));
    }

    #[test]
    fn test_clear_rearms_fetching() {
        let mut store = HistoryStore::new();
        store.apply_success(1, "Alpha", vec![entry("q", "a")]);
        store.clear();

        assert!(!store.has_fetched());
        assert!(store.entries().is_empty());
        assert!(store.messages().is_empty());
        assert_eq!(store.current_chat_id(), None);
    }
}
