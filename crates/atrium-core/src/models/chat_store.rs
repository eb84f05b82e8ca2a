use super::message::Message;

/// Lifecycle of the currently displayed conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatStatus {
    Idle,
    Loading,
    Completed,
    /// Terminal for the exchange that failed; the user must resubmit.
    Failed,
}

/// Identity and transcript of the active chat session.
///
/// Chat ids are session-local integers starting at 1; they are not issued
/// by the server. Exactly one session is active at a time. `reset_flag` is
/// a toggle, not a level: consumers watch it flip to know they must discard
/// any cached transcript state.
pub struct ChatStore {
    chat_id: u32,
    messages: Vec<Message>,
    status: ChatStatus,
    error: Option<String>,
    in_progress: bool,
    reset_flag: bool,
}

impl ChatStore {
    pub fn new() -> Self {
        Self {
            chat_id: 1,
            messages: Vec::new(),
            status: ChatStatus::Idle,
            error: None,
            in_progress: false,
            reset_flag: false,
        }
    }

    /// Begin a fresh conversation: next id, empty transcript, loading
    /// status, toggled reset flag.
    pub fn start_new_chat(&mut self) -> u32 {
        self.chat_id += 1;
        self.messages.clear();
        self.status = ChatStatus::Loading;
        self.in_progress = true;
        self.error = None;
        self.reset_flag = !self.reset_flag;
        self.chat_id
    }

    /// Jump to a historical chat. Does not touch the reset flag.
    pub fn set_chat_id(&mut self, id: u32) {
        self.chat_id = id;
    }

    pub fn push_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Replace the transcript wholesale (history hydration).
    pub fn set_messages(&mut self, messages: Vec<Message>) {
        self.messages = messages;
    }

    pub fn mark_loading(&mut self) {
        self.status = ChatStatus::Loading;
    }

    pub fn mark_completed(&mut self) {
        self.status = ChatStatus::Completed;
        self.in_progress = false;
    }

    pub fn mark_failed(&mut self, error: impl Into<String>) {
        self.status = ChatStatus::Failed;
        self.in_progress = false;
        self.error = Some(error.into());
    }

    /// Clear the transcript without changing identity.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.status = ChatStatus::Idle;
        self.error = None;
        self.in_progress = false;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn chat_id(&self) -> u32 {
        self.chat_id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn status(&self) -> &ChatStatus {
        &self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn in_progress(&self) -> bool {
        self.in_progress
    }

    pub fn reset_flag(&self) -> bool {
        self.reset_flag
    }
}

impl Default for ChatStore {
    fn default() -> Self {
        Self::new()
    }
}
